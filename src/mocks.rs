//! The mock store: caller API and record ingestion.
//!
//! [`Mocks`] owns everything a mocking session needs: the schema, the record
//! store, the inferred foreign keys, the generator registry and the seeded
//! randomness provider. Nothing is global, so independent sessions never
//! observe each other.
//!
//! # Ingestion
//!
//! [`Mocks::add_example`] stores a record and learns relationships from it:
//!
//! - a string on a field typed as an object is the id of a record of that
//!   type; it is stored as a reference and `Type --field--> FieldType` is
//!   recorded
//! - a list of strings on a field typed as a list of objects is handled the
//!   same way, element by element
//! - `$<type>Id` metadata fields declare a foreign key explicitly
//!
//! Referenced records that do not exist yet are created as stubs, so a
//! reference never dangles.

use crate::base;
use crate::config::MockOptions;
use crate::error::MockError;
use crate::inference::{fk_type_from_field, AmbiguousForeignKey, TypeSpecs};
use crate::relay::{id_info, node_mock};
use crate::store::RecordStore;
use crate::value::{MockObject, MockValue, Resolver};
use mock_core::{
    is_meta_field, Record, Reference, SchemaDefinition, SchemaError, TypeDefinition, Value,
    META_ID_FIELD,
};
use mock_generator::SeededRng;
use rand::rngs::StdRng;
use std::collections::HashMap;
use tracing::debug;

/// Key form of an id value.
pub(crate) fn value_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Ref(r) => Some(r.id.clone()),
        Value::Int(i) => Some(i.to_string()),
        _ => None,
    }
}

/// Mock data session for one schema.
#[derive(Debug)]
pub struct Mocks {
    pub(crate) schema: SchemaDefinition,
    pub(crate) options: MockOptions,
    pub(crate) store: RecordStore,
    pub(crate) specs: TypeSpecs,
    pub(crate) generators: HashMap<String, Resolver>,
    pub(crate) seeds: SeededRng,
    /// Values synthesized for fields of id-less sources, by field key
    pub(crate) synthesized: HashMap<String, MockValue>,
}

impl Mocks {
    /// Create a session with default options.
    pub fn new(schema: SchemaDefinition) -> Self {
        Self::with_options(schema, MockOptions::default())
    }

    /// Create a session with the given options.
    pub fn with_options(schema: SchemaDefinition, options: MockOptions) -> Self {
        let mut generators = HashMap::new();
        generators.insert("Int".to_string(), base::int());
        generators.insert("Float".to_string(), base::float());
        generators.insert("String".to_string(), base::string());
        generators.insert("Boolean".to_string(), base::boolean());
        generators.insert("ID".to_string(), crate::relay::global_id_mock());

        if schema.has_node_interface() {
            generators.insert("Node".to_string(), node_mock());
        }

        let seeds = SeededRng::new(options.seed);

        Self {
            schema,
            options,
            store: RecordStore::new(),
            specs: TypeSpecs::new(),
            generators,
            seeds,
            synthesized: HashMap::new(),
        }
    }

    pub fn schema(&self) -> &SchemaDefinition {
        &self.schema
    }

    pub fn options(&self) -> &MockOptions {
        &self.options
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Name of the field holding a record's natural id.
    pub fn id_field(&self) -> &str {
        &self.options.id_field
    }

    /// Identity of an object: its id field, else its `$id`.
    pub fn get_id(&self, object: &MockObject) -> Option<String> {
        object
            .value(&self.options.id_field)
            .and_then(value_key)
            .or_else(|| object.value(META_ID_FIELD).and_then(value_key))
    }

    /// Identity of a stored record: its id field, else its `$id`.
    pub fn record_id(&self, record: &Record) -> Option<String> {
        record
            .get(&self.options.id_field)
            .and_then(value_key)
            .or_else(|| record.get(META_ID_FIELD).and_then(value_key))
    }

    /// Allocate a fresh `"{type}:{n}"` id.
    pub fn id(&mut self, type_name: &str) -> Result<String, MockError> {
        self.schema.get_object_type(type_name)?;
        Ok(self.store.allocate_id(type_name))
    }

    /// Register a generator for a type.
    ///
    /// For scalars and enums the generator produces the value itself; for
    /// object, interface and union types it produces a partial object.
    pub fn mock(&mut self, type_name: &str, generator: Resolver) -> Result<&mut Self, MockError> {
        self.schema.get_type(type_name)?;
        debug!("Registering generator for {type_name}");
        self.generators.insert(type_name.to_string(), generator);
        Ok(self)
    }

    /// Register several generators at once.
    pub fn mock_all<I, S>(&mut self, generators: I) -> Result<&mut Self, MockError>
    where
        I: IntoIterator<Item = (S, Resolver)>,
        S: AsRef<str>,
    {
        for (type_name, generator) in generators {
            self.mock(type_name.as_ref(), generator)?;
        }
        Ok(self)
    }

    /// Register an optional generator and ingest examples in one call.
    pub fn define(
        &mut self,
        type_name: &str,
        generator: Option<Resolver>,
        examples: Vec<Record>,
    ) -> Result<Vec<Reference>, MockError> {
        if let Some(generator) = generator {
            self.mock(type_name, generator)?;
        }
        self.add_examples(type_name, examples)
    }

    /// Ingest several example records.
    pub fn add_examples(
        &mut self,
        type_name: &str,
        records: Vec<Record>,
    ) -> Result<Vec<Reference>, MockError> {
        records
            .into_iter()
            .map(|record| self.add_example(type_name, record))
            .collect()
    }

    /// Ingest one example record and return a reference to it.
    ///
    /// Examples for interface and union types must carry a `__typename` hint;
    /// they are stored under that concrete type.
    pub fn add_example(&mut self, type_name: &str, record: Record) -> Result<Reference, MockError> {
        let store_type = self.storage_type(type_name, &record)?;
        let type_def = self.schema.get_object_type(&store_type)?.clone();

        let mut stored = Record::new();
        let id = match self.record_id(&record) {
            Some(id) => id,
            None => {
                let id = self.id(&store_type)?;
                stored.insert(META_ID_FIELD, id.clone());
                id
            }
        };

        for (key, value) in record {
            if key == "__typename" {
                continue;
            }

            if is_meta_field(&key) {
                if let Some(related) = fk_type_from_field(&self.schema, &key)? {
                    self.specs.record(&store_type, &related, &key);
                }
                stored.insert(key, value);
                continue;
            }

            let field = type_def
                .get_field(&key)
                .ok_or_else(|| SchemaError::FieldNotFound {
                    type_name: store_type.clone(),
                    field: key.clone(),
                })?;
            let target = field.field_type.named_type().to_string();
            let links_objects = self.schema.get_type(&target)?.is_object_like();
            let is_list = field.field_type.is_list();

            let value = match value {
                Value::String(fk) if links_objects && !is_list => {
                    self.record_foreign_key(&store_type, &target, &key)?;
                    self.link(&target, &fk)
                }
                Value::Ref(reference) => {
                    self.specs.record(&store_type, &reference.type_name, &key);
                    Value::Ref(self.stub_if_needed(&reference.type_name, &reference.id))
                }
                Value::List(items) if links_objects && is_list && is_id_list(&items) => {
                    self.record_foreign_key(&store_type, &target, &key)?;
                    Value::List(
                        items
                            .into_iter()
                            .map(|item| match item {
                                Value::Ref(r) => Value::Ref(self.stub_if_needed(&r.type_name, &r.id)),
                                other => match value_key(&other) {
                                    Some(fk) => self.link(&target, &fk),
                                    None => other,
                                },
                            })
                            .collect(),
                    )
                }
                other => other,
            };

            stored.insert(key, value);
        }

        debug!("Adding example {store_type}:{id}");
        self.store.put(&store_type, &id, stored, true);

        Ok(Reference::new(store_type, id))
    }

    /// Concrete type an example is stored under.
    fn storage_type(&self, type_name: &str, record: &Record) -> Result<String, MockError> {
        match self.schema.get_type(type_name)? {
            TypeDefinition::Object { .. } => Ok(type_name.to_string()),
            TypeDefinition::Interface { .. } | TypeDefinition::Union { .. } => {
                let hint = record
                    .get("__typename")
                    .and_then(Value::as_str)
                    .ok_or_else(|| MockError::AmbiguousAbstractResolution(type_name.to_string()))?;

                if self.schema.possible_types(type_name)?.contains(&hint) {
                    Ok(hint.to_string())
                } else {
                    Err(MockError::AmbiguousAbstractResolution(type_name.to_string()))
                }
            }
            TypeDefinition::Scalar { .. } | TypeDefinition::Enum { .. } => {
                Err(SchemaError::NotAnObjectType(type_name.to_string()).into())
            }
        }
    }

    /// Register `type_name.field` as a foreign key to `target`.
    ///
    /// An interface target also links every implementor, since relationship
    /// lookups are made with concrete parent types.
    fn record_foreign_key(&mut self, type_name: &str, target: &str, field: &str) -> Result<(), MockError> {
        self.specs.record(type_name, target, field);
        if self.schema.get_type(target)?.is_abstract() {
            for concrete in self.schema.possible_types(target)? {
                self.specs.record(type_name, concrete, field);
            }
        }
        Ok(())
    }

    /// Stored form of the key `id` on a field typed `target`.
    ///
    /// Object targets get a stub when needed. Interface targets link to the
    /// implementor holding the id; until one does, the key stays plain and is
    /// looked up again when the field is read.
    fn link(&mut self, target: &str, id: &str) -> Value {
        if self.schema.get_type(target).is_ok_and(TypeDefinition::is_object) {
            return Value::Ref(self.stub_if_needed(target, id));
        }
        match self.lookup_ref(target, id) {
            Some(reference) => Value::Ref(reference),
            None => {
                debug!("No {target} with id {id} yet; keeping the key");
                Value::String(id.to_string())
            }
        }
    }

    /// Reference to `type_name:id`, creating an empty stub record if needed.
    pub(crate) fn stub_if_needed(&mut self, type_name: &str, id: &str) -> Reference {
        if !self.store.contains(type_name, id) {
            debug!("Creating stub {type_name}:{id}");
            self.store.put(
                type_name,
                id,
                Record::new().with(META_ID_FIELD, id),
                false,
            );
        }
        Reference::new(type_name, id)
    }

    /// Get a record by type and id. Global ids are decoded first.
    ///
    /// Records of abstract types are looked up under each concrete type.
    pub fn get(&self, type_name: &str, id: &str) -> Option<&Record> {
        if let Some((global_type, local_id)) = id_info(id) {
            return self.store.get(&global_type, &local_id);
        }
        self.lookup_ref(type_name, id)
            .and_then(|reference| self.store.get(&reference.type_name, &reference.id))
    }

    /// Get the record a reference points at.
    pub fn get_ref(&self, reference: &Reference) -> Option<&Record> {
        self.store.get(&reference.type_name, &reference.id)
    }

    /// Reference to an existing record of `type_name` (or of one of its
    /// concrete types).
    pub fn lookup_ref(&self, type_name: &str, id: &str) -> Option<Reference> {
        if self.store.contains(type_name, id) {
            return Some(Reference::new(type_name, id));
        }
        self.schema
            .possible_types(type_name)
            .ok()?
            .into_iter()
            .find(|concrete| self.store.contains(concrete, id))
            .map(|concrete| Reference::new(concrete, id))
    }

    /// References and records of a type in insertion order.
    ///
    /// Abstract types yield the records of each concrete type in turn.
    pub(crate) fn entries(&self, type_name: &str) -> Result<Vec<(Reference, &Record)>, MockError> {
        let ty = self.schema.get_type(type_name)?;
        if !ty.is_composite() {
            return Err(SchemaError::NotAnObjectType(type_name.to_string()).into());
        }

        let concrete = if ty.is_abstract() {
            self.schema.possible_types(type_name)?
        } else {
            vec![type_name]
        };

        Ok(concrete
            .into_iter()
            .flat_map(|concrete| {
                self.store
                    .get_all(concrete)
                    .into_iter()
                    .map(move |(id, record)| (Reference::new(concrete, id), record))
            })
            .collect())
    }

    /// All records of a type, in insertion order.
    pub fn get_all(&self, type_name: &str) -> Result<Vec<&Record>, MockError> {
        Ok(self
            .entries(type_name)?
            .into_iter()
            .map(|(_, record)| record)
            .collect())
    }

    /// References to all records of a type, in insertion order.
    pub fn get_all_refs(&self, type_name: &str) -> Result<Vec<Reference>, MockError> {
        Ok(self
            .entries(type_name)?
            .into_iter()
            .map(|(reference, _)| reference)
            .collect())
    }

    /// First record of a type matching a predicate.
    pub fn find<F>(&self, type_name: &str, predicate: F) -> Result<Option<&Record>, MockError>
    where
        F: Fn(&Record) -> bool,
    {
        Ok(self
            .entries(type_name)?
            .into_iter()
            .map(|(_, record)| record)
            .find(|record| predicate(record)))
    }

    /// Field on `type_name` that refers to `related_type`, if one was inferred.
    pub fn related_key(&self, type_name: &str, related_type: &str) -> Option<&str> {
        self.specs.related_key(type_name, related_type)
    }

    /// Type pairs that were linked through more than one field.
    pub fn ambiguous_foreign_keys(&self) -> &[AmbiguousForeignKey] {
        self.specs.ambiguities()
    }

    /// Derive the seeded generator for a key.
    pub(crate) fn rng(&mut self, key: &str) -> StdRng {
        self.seeds.derive(key)
    }
}

/// Whether every element of a non-empty list can serve as an id.
fn is_id_list(items: &[Value]) -> bool {
    !items.is_empty()
        && items
            .iter()
            .all(|item| matches!(item, Value::String(_) | Value::Ref(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::to_global_id;

    const SCHEMA: &str = r#"
query: Query
types:
  - kind: object
    name: Query
    fields:
      - name: orders
        type: "[Order]"
  - kind: interface
    name: Party
    fields:
      - name: id
        type: ID!
  - kind: object
    name: Customer
    interfaces: [Party]
    fields:
      - name: id
        type: ID!
      - name: name
        type: String
      - name: orders
        type: "[Order]"
  - kind: object
    name: Order
    fields:
      - name: id
        type: ID!
      - name: total
        type: Float
      - name: customer
        type: Customer
      - name: seller
        type: Party
      - name: items
        type: "[Product]"
      - name: tags
        type: "[String]"
  - kind: object
    name: Product
    fields:
      - name: id
        type: ID!
      - name: title
        type: String
  - kind: union
    name: Purchase
    types: [Order, Product]
"#;

    fn mocks() -> Mocks {
        Mocks::new(SchemaDefinition::from_yaml(SCHEMA).unwrap())
    }

    #[test]
    fn test_add_example_infers_foreign_key() {
        let mut mocks = mocks();
        mocks
            .add_example("Customer", Record::new().with("id", "c1"))
            .unwrap();
        let order = mocks
            .add_example("Order", Record::new().with("id", "o1").with("customer", "c1"))
            .unwrap();

        assert_eq!(order, Reference::new("Order", "o1"));
        assert_eq!(mocks.related_key("Order", "Customer"), Some("customer"));
        assert_eq!(mocks.related_key("Customer", "Order"), None);

        let stored = mocks.get("Order", "o1").unwrap();
        assert_eq!(
            stored.get("customer"),
            Some(&Value::Ref(Reference::new("Customer", "c1")))
        );
    }

    #[test]
    fn test_add_example_stubs_missing_references() {
        let mut mocks = mocks();
        mocks
            .add_example(
                "Order",
                Record::new()
                    .with("customer", "c9")
                    .with("items", vec!["p1", "p2"])
                    .with("tags", vec!["gift"]),
            )
            .unwrap();

        assert!(mocks.get("Customer", "c9").is_some());
        assert!(mocks.get("Product", "p1").is_some());
        assert!(mocks.get("Product", "p2").is_some());
        assert_eq!(mocks.related_key("Order", "Product"), Some("items"));

        // scalar lists stay plain
        let orders = mocks.get_all("Order").unwrap();
        assert_eq!(orders[0].get("tags"), Some(&Value::from(vec!["gift"])));
        assert_eq!(mocks.related_key("Order", "String"), None);
    }

    #[test]
    fn test_caller_data_overrides_stub() {
        let mut mocks = mocks();
        mocks
            .add_example("Order", Record::new().with("id", "o1").with("customer", "c1"))
            .unwrap();
        mocks
            .add_example("Customer", Record::new().with("id", "c1").with("name", "Betsy"))
            .unwrap();

        let customer = mocks.get("Customer", "c1").unwrap();
        assert_eq!(customer.get("name"), Some(&Value::from("Betsy")));
        assert_eq!(mocks.get_all("Customer").unwrap().len(), 1);
    }

    #[test]
    fn test_interface_typed_foreign_key() {
        let mut mocks = mocks();
        mocks
            .add_example("Customer", Record::new().with("id", "c1"))
            .unwrap();
        mocks
            .add_example(
                "Order",
                Record::new().with("id", "o1").with("seller", "c1"),
            )
            .unwrap();
        mocks
            .add_example(
                "Order",
                Record::new().with("id", "o2").with("seller", "c2"),
            )
            .unwrap();

        assert_eq!(mocks.related_key("Order", "Party"), Some("seller"));
        assert_eq!(mocks.related_key("Order", "Customer"), Some("seller"));

        let o1 = mocks.get("Order", "o1").unwrap();
        assert_eq!(o1.get("seller"), Some(&Value::Ref(Reference::new("Customer", "c1"))));

        // no implementor holds c2, so nothing is stubbed under the interface
        let o2 = mocks.get("Order", "o2").unwrap();
        assert_eq!(o2.get("seller"), Some(&Value::from("c2")));
        assert!(mocks.get("Party", "c2").is_none());
        assert!(mocks.get("Customer", "c2").is_none());
    }

    #[test]
    fn test_generated_ids() {
        let mut mocks = mocks();
        let first = mocks.add_example("Product", Record::new()).unwrap();
        let second = mocks.add_example("Product", Record::new()).unwrap();

        assert_eq!(first.id, "Product:1");
        assert_eq!(second.id, "Product:2");
        assert_eq!(
            mocks.get("Product", "Product:1").unwrap().get(META_ID_FIELD),
            Some(&Value::from("Product:1"))
        );
        assert_eq!(mocks.id("Product").unwrap(), "Product:3");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut mocks = mocks();
        let result = mocks.add_example("Customer", Record::new().with("email", "x@y.z"));
        assert!(matches!(
            result,
            Err(MockError::SchemaMismatch(SchemaError::FieldNotFound { .. }))
        ));
    }

    #[test]
    fn test_explicit_foreign_key() {
        let mut mocks = mocks();
        mocks
            .add_example("Order", Record::new().with("$customerId", "c1"))
            .unwrap();
        assert_eq!(mocks.related_key("Order", "Customer"), Some("$customerId"));

        let result = mocks.add_example("Order", Record::new().with("$shopId", "s1"));
        assert!(matches!(
            result,
            Err(MockError::SchemaMismatch(SchemaError::UnknownRelatedType { .. }))
        ));
    }

    #[test]
    fn test_union_examples_stored_under_concrete_type() {
        let mut mocks = mocks();
        let reference = mocks
            .add_example(
                "Purchase",
                Record::new().with("__typename", "Product").with("id", "p1"),
            )
            .unwrap();

        assert_eq!(reference, Reference::new("Product", "p1"));
        assert!(mocks.get("Product", "p1").is_some());
        assert!(mocks.get("Purchase", "p1").is_some());
        assert_eq!(mocks.get_all("Purchase").unwrap().len(), 1);

        let result = mocks.add_example("Purchase", Record::new().with("id", "p2"));
        assert!(matches!(
            result,
            Err(MockError::AmbiguousAbstractResolution(_))
        ));
    }

    #[test]
    fn test_get_decodes_global_ids() {
        let mut mocks = mocks();
        mocks
            .add_example("Product", Record::new().with("id", "p1").with("title", "Lamp"))
            .unwrap();

        let record = mocks.get("Node", &to_global_id("Product", "p1")).unwrap();
        assert_eq!(record.get("title"), Some(&Value::from("Lamp")));
    }

    #[test]
    fn test_find() {
        let mut mocks = mocks();
        mocks
            .add_examples(
                "Product",
                vec![
                    Record::new().with("id", "p1").with("title", "Lamp"),
                    Record::new().with("id", "p2").with("title", "Desk"),
                ],
            )
            .unwrap();

        let desk = mocks
            .find("Product", |r| r.get("title") == Some(&Value::from("Desk")))
            .unwrap()
            .unwrap();
        assert_eq!(desk.get("id"), Some(&Value::from("p2")));
        assert!(mocks.find("Product", |_| false).unwrap().is_none());
        assert!(mocks.get_all("String").is_err());
    }

    #[test]
    fn test_mock_requires_known_type() {
        let mut mocks = mocks();
        assert!(mocks.mock("Customer", base::name()).is_ok());
        assert!(matches!(
            mocks.mock("Starship", base::name()),
            Err(MockError::SchemaMismatch(SchemaError::TypeNotFound(_)))
        ));
    }
}
