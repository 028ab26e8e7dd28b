//! Graph Mocks Library
//!
//! Deterministic, relationally consistent fake data for a typed graph schema.
//!
//! # Features
//!
//! - Example records: seed the store with the data a test cares about
//! - Synthesis: plausible values for every field nobody supplied
//! - Relationship inference: foreign keys are learned from example records, so
//!   back-references and connections resolve without hand wiring
//! - Determinism: every field draws from a generator seeded by its own key,
//!   so the same field on the same record always reads the same
//! - Relay conventions: global ids, `Node` lookup and cursor pagination
//!
//! # Crates
//!
//! - `mock_core` - schema description and stored record types
//! - `mock_generator` - seeded generators and declarative generator configs
//!
//! # Example
//!
//! ```rust
//! use graph_mocks::testing::{execute, field};
//! use graph_mocks::Mocks;
//! use mock_core::{Record, SchemaDefinition};
//!
//! let schema = SchemaDefinition::from_yaml(r#"
//! query: Query
//! types:
//!   - kind: object
//!     name: Query
//!     fields:
//!       - name: customer
//!         type: Customer
//!   - kind: object
//!     name: Customer
//!     fields:
//!       - name: id
//!         type: ID!
//!       - name: orders
//!         type: "[Order]"
//!   - kind: object
//!     name: Order
//!     fields:
//!       - name: id
//!         type: ID!
//!       - name: customer
//!         type: Customer
//! "#).unwrap();
//!
//! let mut mocks = Mocks::new(schema);
//! mocks.add_example("Customer", Record::new().with("id", "c1")).unwrap();
//! mocks.add_example("Order", Record::new().with("id", "o1").with("customer", "c1")).unwrap();
//!
//! let response = execute(
//!     &mut mocks,
//!     &[field("customer").select([field("orders").select(["id"])]).into()],
//! );
//! assert_eq!(response.data["customer"]["orders"][0]["id"], "o1");
//! ```

pub mod base;
pub mod config;
pub mod error;
pub mod inference;
pub mod mocks;
pub mod relay;
mod resolve;
pub mod resolvers;
pub mod store;
mod synthesize;
pub mod testing;
pub mod value;

pub use config::{load_mocks, MockConfig, MockOptions};
pub use error::MockError;
pub use mocks::Mocks;
pub use value::{Args, FieldInfo, MockContext, MockObject, MockValue, Resolver};
