//! In-memory record store.
//!
//! Records are kept per type in insertion order, with a per-type id index for
//! keyed lookups. Insertion order is what sampling and relation filtering walk,
//! so it is stable for the lifetime of the store.

use mock_core::Record;
use std::collections::HashMap;
use tracing::debug;

/// Records of one type.
#[derive(Debug, Default)]
struct Table {
    /// `(id, record)` in insertion order
    records: Vec<(String, Record)>,
    /// id -> position in `records`
    index: HashMap<String, usize>,
}

/// Keyed table of typed records plus per-type id sequences.
#[derive(Debug, Default)]
pub struct RecordStore {
    tables: Vec<(String, Table)>,
    /// Cached table lookup
    table_map: HashMap<String, usize>,
    /// Last id handed out per type
    sequences: HashMap<String, u64>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self, type_name: &str) -> Option<&Table> {
        self.table_map
            .get(type_name)
            .and_then(|&idx| self.tables.get(idx))
            .map(|(_, table)| table)
    }

    fn table_mut(&mut self, type_name: &str) -> &mut Table {
        let idx = match self.table_map.get(type_name) {
            Some(&idx) => idx,
            None => {
                self.tables.push((type_name.to_string(), Table::default()));
                let idx = self.tables.len() - 1;
                self.table_map.insert(type_name.to_string(), idx);
                idx
            }
        };
        &mut self.tables[idx].1
    }

    /// Insert a record or merge fields into an existing one.
    ///
    /// Existing field values are kept unless `override_existing` is set.
    /// Returns `true` when a new record was created.
    pub fn put(
        &mut self,
        type_name: &str,
        id: &str,
        fields: Record,
        override_existing: bool,
    ) -> bool {
        let table = self.table_mut(type_name);

        if let Some(&pos) = table.index.get(id) {
            table.records[pos].1.merge(fields, override_existing);
            return false;
        }

        debug!("Inserting {type_name}:{id}");
        table.index.insert(id.to_string(), table.records.len());
        table.records.push((id.to_string(), fields));
        true
    }

    /// Get a record by type and id.
    pub fn get(&self, type_name: &str, id: &str) -> Option<&Record> {
        let table = self.table(type_name)?;
        table
            .index
            .get(id)
            .and_then(|&pos| table.records.get(pos))
            .map(|(_, record)| record)
    }

    /// Check whether a record exists.
    pub fn contains(&self, type_name: &str, id: &str) -> bool {
        self.table(type_name)
            .map(|table| table.index.contains_key(id))
            .unwrap_or(false)
    }

    /// Get all records of a type, in insertion order.
    pub fn get_all(&self, type_name: &str) -> Vec<(&str, &Record)> {
        self.table(type_name)
            .map(|table| {
                table
                    .records
                    .iter()
                    .map(|(id, record)| (id.as_str(), record))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Insertion position of a record within its type.
    pub fn position(&self, type_name: &str, id: &str) -> Option<usize> {
        self.table(type_name)?.index.get(id).copied()
    }

    /// Number of records of a type.
    pub fn len(&self, type_name: &str) -> usize {
        self.table(type_name)
            .map(|table| table.records.len())
            .unwrap_or(0)
    }

    /// Check whether the store holds no records at all.
    pub fn is_empty(&self) -> bool {
        self.tables.iter().all(|(_, table)| table.records.is_empty())
    }

    /// Allocate a fresh `"{type}:{n}"` id.
    ///
    /// The sequence is strictly increasing per type and skips ids that callers
    /// already used for their own records.
    pub fn allocate_id(&mut self, type_name: &str) -> String {
        loop {
            let next = {
                let seq = self.sequences.entry(type_name.to_string()).or_insert(0);
                *seq += 1;
                *seq
            };
            let id = format!("{type_name}:{next}");
            if !self.contains(type_name, &id) {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mock_core::Value;

    #[test]
    fn test_put_and_get() {
        let mut store = RecordStore::new();
        assert!(store.put("Film", "f1", Record::new().with("title", "A New Hope"), false));

        let record = store.get("Film", "f1").unwrap();
        assert_eq!(record.get("title"), Some(&Value::from("A New Hope")));
        assert!(store.get("Film", "f2").is_none());
        assert!(store.get("Person", "f1").is_none());
    }

    #[test]
    fn test_put_merges_without_override() {
        let mut store = RecordStore::new();
        store.put("Person", "p1", Record::new().with("name", "Luke"), false);

        let created = store.put(
            "Person",
            "p1",
            Record::new().with("name", "Leia").with("height", 172i64),
            false,
        );
        assert!(!created);

        let record = store.get("Person", "p1").unwrap();
        assert_eq!(record.get("name"), Some(&Value::from("Luke")));
        assert_eq!(record.get("height"), Some(&Value::Int(172)));

        store.put("Person", "p1", Record::new().with("name", "Leia"), true);
        assert_eq!(
            store.get("Person", "p1").unwrap().get("name"),
            Some(&Value::from("Leia"))
        );
    }

    #[test]
    fn test_get_all_insertion_order() {
        let mut store = RecordStore::new();
        for id in ["c", "a", "b"] {
            store.put("Species", id, Record::new(), false);
        }

        let ids: Vec<&str> = store.get_all("Species").iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert_eq!(store.position("Species", "a"), Some(1));
        assert_eq!(store.len("Species"), 3);
        assert!(store.get_all("Planet").is_empty());
    }

    #[test]
    fn test_allocate_id_is_increasing() {
        let mut store = RecordStore::new();
        assert_eq!(store.allocate_id("Film"), "Film:1");
        assert_eq!(store.allocate_id("Film"), "Film:2");
        assert_eq!(store.allocate_id("Person"), "Person:1");
    }

    #[test]
    fn test_allocate_id_skips_taken_ids() {
        let mut store = RecordStore::new();
        store.put("Film", "Film:1", Record::new(), false);

        assert_eq!(store.allocate_id("Film"), "Film:2");
        assert_eq!(store.allocate_id("Film"), "Film:3");
    }
}
