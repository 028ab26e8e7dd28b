//! Session options and declarative mock configuration.
//!
//! A configuration file bundles options, per-field generator configs and
//! example records:
//!
//! ```yaml
//! options:
//!   seed: 42
//!   list_length: 3
//! generators:
//!   Person:
//!     name:
//!       type: name
//!     height:
//!       type: int_range
//!       min: 90
//!       max: 230
//! examples:
//!   Film:
//!     - id: f1
//!       title: A New Hope
//! ```

use crate::base;
use crate::error::MockError;
use crate::mocks::Mocks;
use anyhow::Context;
use mock_core::{Record, SchemaDefinition};
use mock_generator::GeneratorConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

fn default_id_field() -> String {
    "id".to_string()
}

fn default_list_length() -> usize {
    2
}

/// Options of a mocking session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockOptions {
    /// Field holding a record's natural id
    #[serde(default = "default_id_field")]
    pub id_field: String,
    /// Length of synthesized lists
    #[serde(default = "default_list_length")]
    pub list_length: usize,
    /// Salt for every derived generator
    #[serde(default)]
    pub seed: u64,
}

impl Default for MockOptions {
    fn default() -> Self {
        Self {
            id_field: default_id_field(),
            list_length: default_list_length(),
            seed: 0,
        }
    }
}

/// Options, generators and examples loaded from YAML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MockConfig {
    #[serde(default)]
    pub options: MockOptions,
    /// type -> field -> generator
    #[serde(default)]
    pub generators: BTreeMap<String, BTreeMap<String, GeneratorConfig>>,
    /// type -> example records
    #[serde(default)]
    pub examples: BTreeMap<String, Vec<Record>>,
}

impl MockConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read mock config {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse mock config {}", path.display()))
    }
}

impl Mocks {
    /// Build a session from a configuration.
    ///
    /// Generator configs are validated against the schema before any example
    /// is ingested.
    pub fn from_config(schema: SchemaDefinition, config: MockConfig) -> Result<Self, MockError> {
        let mut mocks = Mocks::with_options(schema, config.options);

        for (type_name, fields) in config.generators {
            mocks.schema.get_object_type(&type_name)?;
            for (field, generator) in &fields {
                if !mocks.schema.is_field(&type_name, field) {
                    return Err(MockError::InvalidGeneratorField {
                        type_name,
                        field: field.clone(),
                    });
                }
                generator
                    .validate()
                    .map_err(|source| MockError::InvalidGeneratorConfig {
                        type_name: type_name.clone(),
                        field: field.clone(),
                        source,
                    })?;
            }
            debug!("Configured {} field generators for {type_name}", fields.len());
            mocks.mock(&type_name, base::type_generator(fields))?;
        }

        for (type_name, records) in config.examples {
            mocks.add_examples(&type_name, records)?;
        }

        Ok(mocks)
    }
}

/// Load a schema file and a mock configuration file into a session.
pub fn load_mocks<P, Q>(schema_path: P, config_path: Q) -> anyhow::Result<Mocks>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let schema_path = schema_path.as_ref();
    let schema = SchemaDefinition::from_file(schema_path)
        .with_context(|| format!("Failed to load schema from {schema_path:?}"))?;
    let config = MockConfig::from_file(config_path)?;

    let mocks = Mocks::from_config(schema, config).context("Failed to apply mock config")?;
    info!("Loaded mocks for {} types", mocks.schema().type_names().len());
    Ok(mocks)
}
