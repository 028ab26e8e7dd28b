//! Numeric value generators.

use mock_core::Value;
use rand::Rng;

/// Upper bound of the default `Int` and `Float` generators.
pub const DEFAULT_NUMERIC_MAX: f64 = 200.0;

/// Generate a default `Int`: a float in `[0, 200)` truncated toward zero.
pub fn generate_int<R: Rng>(rng: &mut R) -> Value {
    Value::Int(rng.gen_range(0.0..DEFAULT_NUMERIC_MAX).trunc() as i64)
}

/// Generate a default `Float` in `[0, 200]`.
pub fn generate_float<R: Rng>(rng: &mut R) -> Value {
    Value::Float(rng.gen_range(0.0..=DEFAULT_NUMERIC_MAX))
}

/// Generate a fair boolean.
pub fn generate_bool<R: Rng>(rng: &mut R) -> Value {
    Value::Bool(rng.gen_bool(0.5))
}

/// Generate a random integer in the given range (inclusive).
///
/// A reversed range is read with its bounds swapped.
pub fn generate_int_range<R: Rng>(rng: &mut R, min: i64, max: i64) -> Value {
    let (low, high) = if min <= max { (min, max) } else { (max, min) };
    Value::Int(rng.gen_range(low..=high))
}

/// Generate a random float in the given range (inclusive).
///
/// Non-finite or reversed bounds yield `min` unchanged.
pub fn generate_float_range<R: Rng>(rng: &mut R, min: f64, max: f64) -> Value {
    if !min.is_finite() || !max.is_finite() || min > max {
        return Value::Float(min);
    }
    Value::Float(rng.gen_range(min..=max))
}

/// Generate a boolean that is `true` with the given probability.
pub fn generate_weighted_bool<R: Rng>(rng: &mut R, true_weight: f64) -> Value {
    let p = if true_weight.is_nan() {
        0.5
    } else {
        true_weight.clamp(0.0, 1.0)
    };
    Value::Bool(rng.gen_bool(p))
}
