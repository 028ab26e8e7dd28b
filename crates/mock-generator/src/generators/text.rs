//! Text value generators backed by small fixed word lists.

use mock_core::Value;
use rand::seq::SliceRandom;
use rand::Rng;

const WORDS: &[&str] = &[
    "alpha", "anchor", "arch", "aurora", "beacon", "binary", "blade", "canyon", "cargo", "carbon",
    "cipher", "comet", "coral", "crystal", "delta", "drift", "dune", "echo", "ember", "falcon",
    "fern", "flint", "forge", "frost", "galaxy", "garnet", "glacier", "harbor", "haze", "helix",
    "horizon", "ion", "iris", "jade", "jet", "kelp", "kernel", "lagoon", "lantern", "lunar",
    "magnet", "maple", "meadow", "meteor", "mint", "nebula", "nectar", "nova", "oasis", "onyx",
    "orbit", "pebble", "pilot", "plasma", "prism", "quartz", "quill", "radar", "raven", "reef",
    "ridge", "rocket", "saber", "shadow", "signal", "solar", "spark", "summit", "talon", "tempest",
    "thistle", "thunder", "tide", "timber", "trail", "umbra", "valley", "vapor", "vector",
    "velvet", "vertex", "willow", "wind", "zenith", "zephyr",
];

const FIRST_NAMES: &[&str] = &[
    "Ada", "Aiden", "Amara", "Bea", "Caleb", "Chen", "Dara", "Diego", "Elena", "Emeka", "Farah",
    "Felix", "Grace", "Hana", "Ivan", "Jonas", "Kai", "Leila", "Luca", "Maya", "Mateo", "Nadia",
    "Noor", "Omar", "Priya", "Quinn", "Rosa", "Sami", "Tariq", "Uma", "Vera", "Wen", "Yara",
    "Zane",
];

const LAST_NAMES: &[&str] = &[
    "Abara", "Bennett", "Castillo", "Dimitrov", "Eriksen", "Fujita", "Garcia", "Haddad",
    "Ivanova", "Jensen", "Kowalski", "Larsen", "Mensah", "Nakamura", "Okafor", "Petrov",
    "Quispe", "Rossi", "Santos", "Tanaka", "Ueda", "Varga", "Walsh", "Xu", "Yilmaz", "Zhang",
];

fn pick<R: Rng>(rng: &mut R, pool: &[&str]) -> String {
    pool.choose(rng).copied().unwrap_or_default().to_string()
}

/// Generate a single random word.
pub fn generate_word<R: Rng>(rng: &mut R) -> Value {
    Value::String(pick(rng, WORDS))
}

/// Generate `count` random words joined by spaces.
pub fn generate_words<R: Rng>(rng: &mut R, count: usize) -> Value {
    let words: Vec<String> = (0..count).map(|_| pick(rng, WORDS)).collect();
    Value::String(words.join(" "))
}

/// Generate a first name.
pub fn generate_first_name<R: Rng>(rng: &mut R) -> Value {
    Value::String(pick(rng, FIRST_NAMES))
}

/// Generate a last name.
pub fn generate_last_name<R: Rng>(rng: &mut R) -> Value {
    Value::String(pick(rng, LAST_NAMES))
}

/// Generate a full name.
pub fn generate_name<R: Rng>(rng: &mut R) -> Value {
    let first = pick(rng, FIRST_NAMES);
    let last = pick(rng, LAST_NAMES);
    Value::String(format!("{first} {last}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_word() {
        let mut rng = StdRng::seed_from_u64(42);
        let value = generate_word(&mut rng);
        assert!(WORDS.contains(&value.as_str().unwrap()));
    }

    #[test]
    fn test_generate_words() {
        let mut rng = StdRng::seed_from_u64(42);
        let value = generate_words(&mut rng, 4);
        assert_eq!(value.as_str().unwrap().split(' ').count(), 4);

        assert_eq!(generate_words(&mut rng, 0), Value::String(String::new()));
    }

    #[test]
    fn test_generate_name() {
        let mut rng = StdRng::seed_from_u64(42);
        let value = generate_name(&mut rng);
        let parts: Vec<&str> = value.as_str().unwrap().split(' ').collect();

        assert_eq!(parts.len(), 2);
        assert!(FIRST_NAMES.contains(&parts[0]));
        assert!(LAST_NAMES.contains(&parts[1]));
    }

    #[test]
    fn test_deterministic() {
        let mut rng1 = StdRng::seed_from_u64(7);
        let mut rng2 = StdRng::seed_from_u64(7);
        assert_eq!(generate_first_name(&mut rng1), generate_first_name(&mut rng2));
        assert_eq!(generate_last_name(&mut rng1), generate_last_name(&mut rng2));
    }
}
