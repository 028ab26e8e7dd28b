//! Shared helpers for integration tests.

#![allow(dead_code)]

use graph_mocks::resolvers::item_by_id;
use graph_mocks::{MockObject, MockOptions, Mocks, Resolver};
use mock_core::{Record, SchemaDefinition};

pub const SWAPI_SCHEMA: &str = include_str!("../fixtures/swapi.yaml");

pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter("graph_mocks=debug,test=debug")
        .try_init()
        .ok(); // Ignore if already initialized
}

pub fn schema() -> SchemaDefinition {
    SchemaDefinition::from_yaml(SWAPI_SCHEMA).expect("fixture schema should parse")
}

/// Session with root lookups by id wired up.
pub fn mocks_with(options: MockOptions) -> Mocks {
    let mut mocks = Mocks::with_options(schema(), options);
    mocks
        .mock(
            "Root",
            Resolver::constant(
                MockObject::new()
                    .with("film", item_by_id("id"))
                    .with("person", item_by_id("id"))
                    .with("customer", item_by_id("id")),
            ),
        )
        .expect("Root is declared");
    mocks
}

pub fn mocks() -> Mocks {
    mocks_with(MockOptions::default())
}

/// A few films, people and species.
pub fn seed_swapi(mocks: &mut Mocks) {
    mocks
        .add_examples(
            "Species",
            vec![
                Record::new().with("id", "s1").with("name", "Human"),
                Record::new().with("id", "s2").with("name", "Droid"),
            ],
        )
        .expect("species");
    mocks
        .add_examples(
            "Person",
            vec![
                Record::new()
                    .with("id", "p1")
                    .with("name", "Luke Skywalker")
                    .with("height", 172i64)
                    .with("$speciesId", "s1"),
                Record::new()
                    .with("id", "p2")
                    .with("name", "Leia Organa")
                    .with("$speciesId", "s1"),
                Record::new()
                    .with("id", "p3")
                    .with("name", "R2-D2")
                    .with("$speciesId", "s2"),
            ],
        )
        .expect("people");
    mocks
        .add_examples(
            "Film",
            vec![
                Record::new()
                    .with("id", "f1")
                    .with("title", "A New Hope")
                    .with("characters", vec!["p1", "p2", "p3"]),
                Record::new()
                    .with("id", "f2")
                    .with("title", "The Empire Strikes Back")
                    .with("characters", vec!["p1", "p2"]),
                Record::new()
                    .with("id", "f3")
                    .with("title", "Return of the Jedi")
                    .with("characters", vec!["p1"]),
            ],
        )
        .expect("films");
}
