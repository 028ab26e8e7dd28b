//! Test harness for driving the engine the way a query executor would.
//!
//! The selection tree is built with plain constructors rather than parsed
//! from query text:
//!
//! ```rust
//! use graph_mocks::testing::{execute, field, on};
//! use graph_mocks::Mocks;
//! use mock_core::SchemaDefinition;
//!
//! let schema = SchemaDefinition::from_yaml(r#"
//! query: Query
//! types:
//!   - kind: object
//!     name: Query
//!     fields:
//!       - name: greeting
//!         type: String
//! "#).unwrap();
//!
//! let mut mocks = Mocks::new(schema);
//! let response = execute(&mut mocks, &[field("greeting").into()]);
//! assert!(response.errors.is_empty());
//! assert!(response.data["greeting"].is_string());
//! ```

pub mod executor;
pub mod selection;

pub use executor::{execute, execute_root, FieldError, Response};
pub use selection::{field, on, Field, Selection};
