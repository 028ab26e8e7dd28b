//! Schema definitions for the mock engine.
//!
//! The schema is a read-only description of a typed graph: named types, the
//! fields of object and interface types, and which concrete types stand behind
//! each abstract type. It is loaded from YAML and queried by the synthesizer
//! for "what kind of type is X", "what fields does T have" and "what
//! implements I".
//!
//! ## Type Kinds
//!
//! - `Scalar` - leaf values produced by a scalar generator
//! - `Enum` - leaf values drawn from a fixed set
//! - `Object` - records with fields, optionally implementing interfaces
//! - `Interface` - abstract type with fields, implemented by objects
//! - `Union` - abstract type listing its member objects
//!
//! The built-in scalars `Int`, `Float`, `String`, `Boolean` and `ID` always
//! exist and need not be declared.

use crate::types::TypeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Scalars that every schema provides.
pub const BUILTIN_SCALARS: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];

// ============================================================================
// Error Types
// ============================================================================

/// Error type for schema operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Error reading schema file
    #[error("Failed to read schema file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Type not found in schema
    #[error("{0} does not exist on schema")]
    TypeNotFound(String),

    /// Field not found on an object or interface type
    #[error("{field} does not exist on type {type_name}")]
    FieldNotFound { type_name: String, field: String },

    /// Type exists but is not an object or interface
    #[error("{0} is not an object or interface")]
    NotAnObjectType(String),

    /// Malformed type reference string
    #[error("Invalid type reference: {0:?}")]
    InvalidTypeRef(String),

    /// A `$<type>Id` field names a type the schema does not declare
    #[error("related id field \"{field}\" -> \"{type_name}\" does not correspond to a schema type")]
    UnknownRelatedType { field: String, type_name: String },
}

// ============================================================================
// Definitions
// ============================================================================

/// Argument accepted by a field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArgumentDefinition {
    /// Argument name
    pub name: String,

    /// Argument type
    #[serde(rename = "type")]
    pub arg_type: TypeRef,
}

/// Field declared on an object or interface type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldDefinition {
    /// Field name
    pub name: String,

    /// Declared output type
    #[serde(rename = "type")]
    pub field_type: TypeRef,

    /// Accepted arguments
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<ArgumentDefinition>,
}

impl FieldDefinition {
    /// Create a new field definition without arguments.
    pub fn new(name: impl Into<String>, field_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            field_type,
            args: Vec::new(),
        }
    }
}

/// Named type definition.
///
/// This is the closed set of type kinds the synthesizer dispatches on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeDefinition {
    /// Custom scalar
    Scalar { name: String },

    /// Enumeration
    Enum {
        name: String,
        /// Declared values, in order
        values: Vec<String>,
    },

    /// Object type
    Object {
        name: String,
        /// Interfaces this object implements
        #[serde(default)]
        interfaces: Vec<String>,
        /// Field definitions
        fields: Vec<FieldDefinition>,
    },

    /// Interface type
    Interface {
        name: String,
        /// Field definitions
        fields: Vec<FieldDefinition>,
    },

    /// Union type
    Union {
        name: String,
        /// Member object types
        types: Vec<String>,
    },
}

impl TypeDefinition {
    /// Get the type name.
    pub fn name(&self) -> &str {
        match self {
            Self::Scalar { name }
            | Self::Enum { name, .. }
            | Self::Object { name, .. }
            | Self::Interface { name, .. }
            | Self::Union { name, .. } => name,
        }
    }

    /// Get the declared fields (empty for leaf and union types).
    pub fn fields(&self) -> &[FieldDefinition] {
        match self {
            Self::Object { fields, .. } | Self::Interface { fields, .. } => fields,
            Self::Scalar { .. } | Self::Enum { .. } | Self::Union { .. } => &[],
        }
    }

    /// Get a field by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields().iter().find(|f| f.name == name)
    }

    /// Get all field names.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields().iter().map(|f| f.name.as_str()).collect()
    }

    /// Check whether this is an object type.
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object { .. })
    }

    /// Check whether this is an object or interface type.
    pub fn is_object_like(&self) -> bool {
        matches!(self, Self::Object { .. } | Self::Interface { .. })
    }

    /// Check whether this is an interface or union type.
    pub fn is_abstract(&self) -> bool {
        matches!(self, Self::Interface { .. } | Self::Union { .. })
    }

    /// Check whether this type has fields of its own or members with fields.
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            Self::Object { .. } | Self::Interface { .. } | Self::Union { .. }
        )
    }

    /// Get the interfaces an object type implements.
    pub fn interfaces(&self) -> &[String] {
        match self {
            Self::Object { interfaces, .. } => interfaces,
            _ => &[],
        }
    }
}

fn default_version() -> u32 {
    1
}

fn default_query() -> String {
    "Query".to_string()
}

/// Full schema description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDefinition {
    /// Schema version
    #[serde(default = "default_version")]
    pub version: u32,

    /// Name of the root query type
    #[serde(default = "default_query")]
    pub query: String,

    /// Name of the root mutation type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mutation: Option<String>,

    /// Name of the root subscription type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<String>,

    /// Type definitions
    pub types: Vec<TypeDefinition>,

    /// Cached type lookup (not serialized)
    #[serde(skip)]
    type_map: HashMap<String, usize>,
}

impl SchemaDefinition {
    /// Create a schema from a root query type name and type definitions.
    pub fn new(query: impl Into<String>, types: Vec<TypeDefinition>) -> Self {
        let mut schema = Self {
            version: default_version(),
            query: query.into(),
            mutation: None,
            subscription: None,
            types,
            type_map: HashMap::new(),
        };
        schema.build_type_map();
        schema
    }

    /// Load schema from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse schema from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        let mut schema: SchemaDefinition = serde_yaml::from_str(yaml)?;
        schema.build_type_map();
        Ok(schema)
    }

    /// Build the internal type lookup map, adding built-in scalars that were
    /// not declared explicitly.
    fn build_type_map(&mut self) {
        for scalar in BUILTIN_SCALARS {
            if !self.types.iter().any(|t| t.name() == scalar) {
                self.types.push(TypeDefinition::Scalar {
                    name: scalar.to_string(),
                });
            }
        }

        self.type_map = self
            .types
            .iter()
            .enumerate()
            .map(|(idx, ty)| (ty.name().to_string(), idx))
            .collect();
    }

    /// Get a type definition by name.
    pub fn get_type(&self, name: &str) -> Result<&TypeDefinition, SchemaError> {
        self.type_map
            .get(name)
            .and_then(|&idx| self.types.get(idx))
            .ok_or_else(|| SchemaError::TypeNotFound(name.to_string()))
    }

    /// Check whether a type exists.
    pub fn has_type(&self, name: &str) -> bool {
        self.type_map.contains_key(name)
    }

    /// Get an object or interface type by name.
    pub fn get_object_type(&self, name: &str) -> Result<&TypeDefinition, SchemaError> {
        let ty = self.get_type(name)?;
        if ty.is_object_like() {
            Ok(ty)
        } else {
            Err(SchemaError::NotAnObjectType(name.to_string()))
        }
    }

    /// Get a field of an object or interface type.
    pub fn get_field(&self, type_name: &str, field: &str) -> Result<&FieldDefinition, SchemaError> {
        self.get_object_type(type_name)?
            .get_field(field)
            .ok_or_else(|| SchemaError::FieldNotFound {
                type_name: type_name.to_string(),
                field: field.to_string(),
            })
    }

    /// Check whether a field is declared on an object or interface type.
    pub fn is_field(&self, type_name: &str, field: &str) -> bool {
        self.get_field(type_name, field).is_ok()
    }

    /// Get the concrete object types behind an abstract type, in declaration order.
    ///
    /// For a union these are its members; for an interface, every object type
    /// that declares it. Concrete types yield themselves.
    pub fn possible_types(&self, name: &str) -> Result<Vec<&str>, SchemaError> {
        match self.get_type(name)? {
            TypeDefinition::Union { types, .. } => Ok(types.iter().map(String::as_str).collect()),
            TypeDefinition::Interface { name, .. } => Ok(self
                .types
                .iter()
                .filter(|t| t.interfaces().iter().any(|i| i == name))
                .map(TypeDefinition::name)
                .collect()),
            TypeDefinition::Object { name, .. } => Ok(vec![name.as_str()]),
            TypeDefinition::Scalar { name } | TypeDefinition::Enum { name, .. } => {
                Err(SchemaError::NotAnObjectType(name.clone()))
            }
        }
    }

    /// Check whether a type is one of the root operation types.
    pub fn is_root_type(&self, name: &str) -> bool {
        self.query == name
            || self.mutation.as_deref() == Some(name)
            || self.subscription.as_deref() == Some(name)
    }

    /// Get all type names in the schema.
    pub fn type_names(&self) -> Vec<&str> {
        self.types.iter().map(TypeDefinition::name).collect()
    }

    // ------------------------------------------------------------------------
    // Relay conventions
    // ------------------------------------------------------------------------

    /// Check whether the schema declares a `Node` interface with an `id: ID` field.
    pub fn has_node_interface(&self) -> bool {
        matches!(self.get_type("Node"), Ok(ty) if is_node_interface(ty))
    }

    /// Check whether an object type implements the `Node` interface.
    pub fn implements_node(&self, type_name: &str) -> bool {
        match self.get_type(type_name) {
            Ok(ty @ TypeDefinition::Object { .. }) => ty
                .interfaces()
                .iter()
                .filter_map(|name| self.get_type(name).ok())
                .any(is_node_interface),
            _ => false,
        }
    }

    /// Check whether an object type follows the connection shape: a `pageInfo`
    /// object field plus an `edges` or `nodes` list field.
    pub fn is_connection_type(&self, type_name: &str) -> bool {
        let Ok(ty @ TypeDefinition::Object { .. }) = self.get_type(type_name) else {
            return false;
        };

        let page_info_is_object = ty
            .get_field("pageInfo")
            .map(|f| {
                !f.field_type.is_list()
                    && matches!(
                        self.get_type(f.field_type.named_type()),
                        Ok(TypeDefinition::Object { .. })
                    )
            })
            .unwrap_or(false);

        let list_field = ty.get_field("edges").or_else(|| ty.get_field("nodes"));

        page_info_is_object && list_field.map(|f| f.field_type.is_list()).unwrap_or(false)
    }

    /// Get the node type of a connection type.
    ///
    /// This is the type of `edges.node` when the connection has edges, and the
    /// element type of `nodes` otherwise.
    pub fn connection_node_type(&self, type_name: &str) -> Result<&str, SchemaError> {
        let ty = self.get_object_type(type_name)?;

        if let Some(edges) = ty.get_field("edges") {
            let edge_type = edges.field_type.named_type();
            return Ok(self.get_field(edge_type, "node")?.field_type.named_type());
        }

        ty.get_field("nodes")
            .map(|nodes| nodes.field_type.named_type())
            .ok_or_else(|| SchemaError::FieldNotFound {
                type_name: type_name.to_string(),
                field: "edges".to_string(),
            })
    }
}

fn is_node_interface(ty: &TypeDefinition) -> bool {
    match ty {
        TypeDefinition::Interface { name, .. } if name == "Node" => ty
            .get_field("id")
            .map(|f| f.field_type.named_type() == "ID")
            .unwrap_or(false),
        _ => false,
    }
}

// ============================================================================
// Tests
// ============================================================================
