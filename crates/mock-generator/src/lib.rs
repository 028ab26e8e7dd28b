//! Seeded value generation for the graph-mocks engine.
//!
//! This crate provides the two leaf capabilities the mock engine builds on:
//!
//! - [`SeededRng`] - derives an independent, reproducible generator per string key
//! - [`generators`] - scalar generators plus the declarative [`GeneratorConfig`]
//!
//! # Architecture
//!
//! ```text
//! key "Film.title:Film:1"
//!        │
//!        ▼
//! ┌──────────────────┐
//! │    SeededRng     │
//! │                  │
//! │  - salt          │
//! │  - cache (StdRng)│
//! └────────┬─────────┘
//!          │ StdRng
//!          ▼
//!  generate_value(config) -> Value
//! ```
//!
//! # Example
//!
//! ```rust
//! use mock_generator::{generate_value, GeneratorConfig, SeededRng};
//!
//! let config: GeneratorConfig = serde_yaml::from_str(r#"
//! type: int_range
//! min: 90
//! max: 230
//! "#).unwrap();
//!
//! let mut seeds = SeededRng::new(42);
//! let a = generate_value(&config, &mut seeds.derive("Person.height:luke"), 0);
//! let b = generate_value(&config, &mut seeds.derive("Person.height:luke"), 0);
//! assert_eq!(a, b);
//! ```
//!
//! # Generators
//!
//! The following generator types are supported:
//!
//! - `uuid_v4` - Random UUID v4
//! - `sequential` - Sequential integers
//! - `int_range` / `float_range` - Random numbers in a range
//! - `timestamp_range` - Random RFC 3339 timestamps in a range
//! - `weighted_bool` - Booleans with a configurable true weight
//! - `one_of` - Random selection from a list of values
//! - `static` / `null` - Fixed values
//! - `word` / `words` - Random words
//! - `name` / `first_name` / `last_name` - Person names

pub mod config;
pub mod generators;
pub mod seed;

pub use config::{GeneratorConfig, GeneratorError};
pub use generators::generate_value;
pub use seed::{seed_for_key, SeededRng};
