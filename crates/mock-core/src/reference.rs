//! Record references.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to a stored record, by type name and local id.
///
/// A reference never owns the record it points to. It is resolved against the
/// record store on read, which keeps links between records cheap to copy and
/// lets two records point at each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Reference {
    /// Name of the record's type
    #[serde(rename = "type")]
    pub type_name: String,

    /// Local id of the record within its type
    pub id: String,
}

impl Reference {
    /// Create a new reference.
    pub fn new(type_name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.type_name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let r = Reference::new("Film", "Film:1");
        assert_eq!(r.to_string(), "Film:Film:1");
    }

    #[test]
    fn test_json_shape() {
        let r = Reference::new("Person", "luke");
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json, serde_json::json!({"type": "Person", "id": "luke"}));
    }
}
