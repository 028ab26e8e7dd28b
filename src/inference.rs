//! Foreign-key inference.
//!
//! As records are ingested, every link they carry is recorded as "type A
//! refers to type B through field F". The resulting table answers
//! [`TypeSpecs::related_key`], which the synthesizer uses to decide whether a
//! field is a relationship it can resolve from the store.
//!
//! Two different fields on the same type pointing at the same related type
//! cannot both be honored. The most recent one is kept, and the conflict is
//! logged and remembered so callers can inspect it.

use mock_core::{SchemaDefinition, SchemaError};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// Two or more fields of one type registered for the same related type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguousForeignKey {
    /// Type carrying the fields
    pub type_name: String,
    /// Type the fields point at
    pub related_type: String,
    /// Every field seen for the pair, in registration order
    pub fields: Vec<String>,
}

/// Per-type foreign-key table.
#[derive(Debug, Default)]
pub struct TypeSpecs {
    /// type -> related type -> field
    fks: HashMap<String, BTreeMap<String, String>>,
    ambiguities: Vec<AmbiguousForeignKey>,
}

impl TypeSpecs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `type_name` refers to `related_type` through `field`.
    pub fn record(&mut self, type_name: &str, related_type: &str, field: &str) {
        let fks = self.fks.entry(type_name.to_string()).or_default();

        match fks.insert(related_type.to_string(), field.to_string()) {
            Some(previous) if previous != field => {
                warn!(
                    "{type_name} refers to {related_type} through both {previous:?} and {field:?}; using {field:?}"
                );
                self.note_ambiguity(type_name, related_type, &previous, field);
            }
            Some(_) => {}
            None => debug!("Inferred foreign key {type_name}.{field} -> {related_type}"),
        }
    }

    fn note_ambiguity(&mut self, type_name: &str, related_type: &str, previous: &str, field: &str) {
        let existing = self
            .ambiguities
            .iter_mut()
            .find(|a| a.type_name == type_name && a.related_type == related_type);

        match existing {
            Some(ambiguity) => {
                if !ambiguity.fields.iter().any(|f| f == field) {
                    ambiguity.fields.push(field.to_string());
                }
            }
            None => self.ambiguities.push(AmbiguousForeignKey {
                type_name: type_name.to_string(),
                related_type: related_type.to_string(),
                fields: vec![previous.to_string(), field.to_string()],
            }),
        }
    }

    /// Field on `type_name` that refers to `related_type`, if one was inferred.
    pub fn related_key(&self, type_name: &str, related_type: &str) -> Option<&str> {
        self.fks
            .get(type_name)?
            .get(related_type)
            .map(String::as_str)
    }

    /// Every (type, related type) pair that was registered through more than one field.
    pub fn ambiguities(&self) -> &[AmbiguousForeignKey] {
        &self.ambiguities
    }
}

/// Uppercase the first character.
fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Resolve the related type named by an explicit `$<type>Id` field.
///
/// Returns `Ok(None)` for metadata fields that do not follow the pattern, and
/// an error when the pattern names a type the schema does not declare as an
/// object or interface.
pub fn fk_type_from_field(
    schema: &SchemaDefinition,
    field: &str,
) -> Result<Option<String>, SchemaError> {
    let Some(stem) = field
        .strip_prefix('$')
        .and_then(|rest| rest.strip_suffix("Id"))
    else {
        return Ok(None);
    };

    if stem.is_empty() || !stem.chars().all(|c| c == '_' || c.is_ascii_alphanumeric()) {
        return Ok(None);
    }

    let type_name = upper_first(stem);
    match schema.get_object_type(&type_name) {
        Ok(_) => Ok(Some(type_name)),
        Err(_) => Err(SchemaError::UnknownRelatedType {
            field: field.to_string(),
            type_name,
        }),
    }
}
