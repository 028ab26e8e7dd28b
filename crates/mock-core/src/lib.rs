//! Core types for the graph-mocks engine.
//!
//! This crate provides the foundational types shared by the generator and the
//! mock engine:
//!
//! - [`SchemaDefinition`] - Read-only typed graph schema loaded from YAML
//! - [`TypeDefinition`] - Closed set of type kinds (scalar, enum, object, interface, union)
//! - [`TypeRef`] - Field type references (`Name`, `[T]`, `T!`)
//! - [`Value`] / [`Record`] - Stored field values and records
//! - [`Reference`] - `{type, id}` handle to a stored record
//!
//! # Architecture
//!
//! ```text
//! mock-core (this crate)
//!    │
//!    ├─── mock-generator  (seeded value generation)
//!    │
//!    └─── graph-mocks     (record store, inference, synthesis, resolution)
//! ```
//!
//! # Example
//!
//! ```rust
//! use mock_core::{SchemaDefinition, TypeRef};
//!
//! let schema = SchemaDefinition::from_yaml(r#"
//! query: Query
//! types:
//!   - kind: object
//!     name: Query
//!     fields:
//!       - name: hello
//!         type: String!
//! "#).unwrap();
//!
//! let field = schema.get_field("Query", "hello").unwrap();
//! assert_eq!(field.field_type, TypeRef::non_null(TypeRef::named("String")));
//! ```

pub mod reference;
pub mod schema;
pub mod types;
pub mod values;

// Re-exports for convenience
pub use reference::Reference;
pub use schema::{
    ArgumentDefinition, FieldDefinition, SchemaDefinition, SchemaError, TypeDefinition,
    BUILTIN_SCALARS,
};
pub use types::TypeRef;
pub use values::{is_meta_field, Record, Value, META_ID_FIELD};
