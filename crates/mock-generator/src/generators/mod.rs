//! Individual value generators for different data types.
//!
//! This module provides the generation logic for each kind of value, both the
//! default scalar generators and the ones selected by a [`GeneratorConfig`].

pub mod numeric;
pub mod static_value;
pub mod text;
pub mod timestamp;
pub mod uuid;

use crate::config::GeneratorConfig;
use mock_core::Value;
use rand::Rng;

/// Generate a value based on the generator configuration.
///
/// `index` is the position of the record being generated for; only
/// `sequential` uses it.
pub fn generate_value<R: Rng>(config: &GeneratorConfig, rng: &mut R, index: u64) -> Value {
    match config {
        GeneratorConfig::UuidV4 => uuid::generate_uuid_v4(rng),

        GeneratorConfig::Sequential { start } => Value::Int(start.wrapping_add(index as i64)),

        GeneratorConfig::IntRange { min, max } => numeric::generate_int_range(rng, *min, *max),

        GeneratorConfig::FloatRange { min, max } => numeric::generate_float_range(rng, *min, *max),

        GeneratorConfig::TimestampRange { start, end } => {
            timestamp::generate_timestamp_range(rng, start, end)
        }

        GeneratorConfig::WeightedBool { true_weight } => {
            numeric::generate_weighted_bool(rng, *true_weight)
        }

        GeneratorConfig::OneOf { values } => {
            if values.is_empty() {
                Value::Null
            } else {
                let idx = rng.gen_range(0..values.len());
                static_value::yaml_to_value(&values[idx])
            }
        }

        GeneratorConfig::Static { value } => static_value::yaml_to_value(value),

        GeneratorConfig::Null => Value::Null,

        GeneratorConfig::Word => text::generate_word(rng),

        GeneratorConfig::Words { count } => text::generate_words(rng, *count),

        GeneratorConfig::Name => text::generate_name(rng),

        GeneratorConfig::FirstName => text::generate_first_name(rng),

        GeneratorConfig::LastName => text::generate_last_name(rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sequential() {
        let mut rng = StdRng::seed_from_u64(42);
        let config = GeneratorConfig::Sequential { start: 100 };

        assert_eq!(generate_value(&config, &mut rng, 0), Value::Int(100));
        assert_eq!(generate_value(&config, &mut rng, 5), Value::Int(105));
    }

    #[test]
    fn test_one_of() {
        let mut rng = StdRng::seed_from_u64(42);
        let config: GeneratorConfig =
            serde_yaml::from_str("type: one_of\nvalues: [blue, brown, 3]").unwrap();

        for _ in 0..20 {
            let value = generate_value(&config, &mut rng, 0);
            assert!(
                value == Value::from("blue") || value == Value::from("brown") || value == Value::Int(3)
            );
        }
    }

    #[test]
    fn test_static_and_null() {
        let mut rng = StdRng::seed_from_u64(42);
        let config: GeneratorConfig = serde_yaml::from_str("type: static\nvalue: Jedi").unwrap();

        assert_eq!(generate_value(&config, &mut rng, 0), Value::from("Jedi"));
        assert_eq!(
            generate_value(&GeneratorConfig::Null, &mut rng, 0),
            Value::Null
        );
    }

    #[test]
    fn test_same_seed_same_values() {
        let configs = [
            GeneratorConfig::UuidV4,
            GeneratorConfig::IntRange { min: 0, max: 1000 },
            GeneratorConfig::Words { count: 2 },
            GeneratorConfig::Name,
        ];

        let mut rng1 = StdRng::seed_from_u64(9);
        let mut rng2 = StdRng::seed_from_u64(9);
        for config in &configs {
            assert_eq!(
                generate_value(config, &mut rng1, 0),
                generate_value(config, &mut rng2, 0)
            );
        }
    }
}
