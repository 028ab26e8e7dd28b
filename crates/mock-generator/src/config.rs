//! Declarative generator configuration.
//!
//! Per-field generators can be described in YAML instead of code:
//!
//! ```yaml
//! Person:
//!   name:
//!     type: name
//!   height:
//!     type: int_range
//!     min: 90
//!     max: 230
//!   eyeColor:
//!     type: one_of
//!     values: [blue, brown, yellow]
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Error type for generator configuration.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// A range whose minimum exceeds its maximum
    #[error("Invalid range: min {min} is greater than max {max}")]
    InvalidRange { min: String, max: String },

    /// A weight outside `[0, 1]`
    #[error("Invalid weight {0}: must be between 0.0 and 1.0")]
    InvalidWeight(f64),

    /// A timestamp that is neither RFC 3339 nor `YYYY-MM-DD`
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// A `one_of` generator without values
    #[error("one_of requires at least one value")]
    EmptyChoices,
}

/// Generator configuration for a single field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeneratorConfig {
    /// Generate UUIDs (v4)
    UuidV4,

    /// Generate sequential integers
    Sequential {
        /// Starting value
        #[serde(default)]
        start: i64,
    },

    /// Generate random integers in a range
    IntRange {
        /// Minimum value (inclusive)
        min: i64,
        /// Maximum value (inclusive)
        max: i64,
    },

    /// Generate random floats in a range
    FloatRange {
        /// Minimum value (inclusive)
        min: f64,
        /// Maximum value (inclusive)
        max: f64,
    },

    /// Generate timestamps in a range
    TimestampRange {
        /// Start timestamp (ISO 8601)
        start: String,
        /// End timestamp (ISO 8601)
        end: String,
    },

    /// Generate weighted boolean values
    WeightedBool {
        /// Weight for true value (0.0 to 1.0)
        true_weight: f64,
    },

    /// Generate random selection from a pool of values
    OneOf {
        /// Pool of values to select from
        values: Vec<serde_yaml::Value>,
    },

    /// Always generate the same value
    Static {
        /// The value to generate
        value: serde_yaml::Value,
    },

    /// Always generate null
    Null,

    /// A single random word
    Word,

    /// Several random words joined by spaces
    Words {
        /// Number of words
        #[serde(default = "default_word_count")]
        count: usize,
    },

    /// A full person name
    Name,

    /// A first name
    FirstName,

    /// A last name
    LastName,
}

fn default_word_count() -> usize {
    3
}

impl GeneratorConfig {
    /// Check the configuration for values that cannot generate anything.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        match self {
            Self::IntRange { min, max } if min > max => Err(GeneratorError::InvalidRange {
                min: min.to_string(),
                max: max.to_string(),
            }),
            Self::FloatRange { min, max }
                if !matches!(min.partial_cmp(max), Some(Ordering::Less | Ordering::Equal)) =>
            {
                Err(GeneratorError::InvalidRange {
                    min: min.to_string(),
                    max: max.to_string(),
                })
            }
            Self::WeightedBool { true_weight } if !(0.0..=1.0).contains(true_weight) => {
                Err(GeneratorError::InvalidWeight(*true_weight))
            }
            Self::TimestampRange { start, end } => {
                let start_dt = crate::generators::timestamp::parse_timestamp(start)
                    .ok_or_else(|| GeneratorError::InvalidTimestamp(start.clone()))?;
                let end_dt = crate::generators::timestamp::parse_timestamp(end)
                    .ok_or_else(|| GeneratorError::InvalidTimestamp(end.clone()))?;
                if start_dt > end_dt {
                    return Err(GeneratorError::InvalidRange {
                        min: start.clone(),
                        max: end.clone(),
                    });
                }
                Ok(())
            }
            Self::OneOf { values } if values.is_empty() => Err(GeneratorError::EmptyChoices),
            _ => Ok(()),
        }
    }
}
