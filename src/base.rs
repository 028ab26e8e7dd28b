//! Base generators.
//!
//! `Int`, `Float`, `String`, `Boolean` and `ID` are registered on every
//! [`Mocks`](crate::Mocks); the rest are available to type generators.

use crate::value::{MockContext, MockObject, MockValue, Resolver};
use mock_generator::generators::uuid::generate_uuid_v4;
use mock_generator::generators::{numeric, text, timestamp};
use mock_generator::{generate_value, GeneratorConfig};
use std::collections::BTreeMap;

/// Integer in `[0, 200)`.
pub fn int() -> Resolver {
    Resolver::new(|ctx| Ok(numeric::generate_int(ctx.rng).into()))
}

/// Float in `[0, 200]`.
pub fn float() -> Resolver {
    Resolver::new(|ctx| Ok(numeric::generate_float(ctx.rng).into()))
}

/// A random word.
pub fn string() -> Resolver {
    Resolver::new(|ctx| Ok(text::generate_word(ctx.rng).into()))
}

pub fn boolean() -> Resolver {
    Resolver::new(|ctx| Ok(numeric::generate_bool(ctx.rng).into()))
}

pub fn uuid() -> Resolver {
    Resolver::new(|ctx| Ok(generate_uuid_v4(ctx.rng).into()))
}

/// RFC 3339 datetime.
pub fn datetime() -> Resolver {
    Resolver::new(|ctx| Ok(timestamp::generate_datetime(ctx.rng).into()))
}

/// `YYYY-MM-DD` date.
pub fn date() -> Resolver {
    Resolver::new(|ctx| Ok(timestamp::generate_date(ctx.rng).into()))
}

/// Full person name.
pub fn name() -> Resolver {
    Resolver::new(|ctx| Ok(text::generate_name(ctx.rng).into()))
}

pub fn first_name() -> Resolver {
    Resolver::new(|ctx| Ok(text::generate_first_name(ctx.rng).into()))
}

pub fn last_name() -> Resolver {
    Resolver::new(|ctx| Ok(text::generate_last_name(ctx.rng).into()))
}

pub fn word() -> Resolver {
    Resolver::new(|ctx| Ok(text::generate_word(ctx.rng).into()))
}

pub fn words(count: usize) -> Resolver {
    Resolver::new(move |ctx| Ok(text::generate_words(ctx.rng, count).into()))
}

/// The name of the field being resolved.
pub fn field_name() -> Resolver {
    Resolver::new(|ctx| Ok(MockValue::from(ctx.info.field_name.as_str())))
}

/// Field generator driven by a declarative config.
///
/// `sequential` counts from the record's insertion position within its type.
pub fn from_config(config: GeneratorConfig) -> Resolver {
    Resolver::new(move |ctx: &mut MockContext<'_>| {
        let index = ctx
            .mocks
            .get_id(ctx.source)
            .and_then(|id| ctx.mocks.store().position(&ctx.info.parent_type, &id))
            .unwrap_or(0) as u64;

        Ok(MockValue::Value(generate_value(&config, ctx.rng, index)))
    })
}

/// Type generator built from per-field configs.
///
/// Every field is deferred, so each one draws from its own field-level seed
/// when it is actually read.
pub fn type_generator(fields: BTreeMap<String, GeneratorConfig>) -> Resolver {
    Resolver::new(move |_ctx| {
        let object: MockObject = fields
            .iter()
            .map(|(field, config)| {
                (
                    field.clone(),
                    MockValue::Resolver(from_config(config.clone())),
                )
            })
            .collect();
        Ok(MockValue::Object(object))
    })
}
