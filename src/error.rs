//! Error types for mock resolution.

use mock_core::SchemaError;
use mock_generator::GeneratorError;

/// Error type for mock store and resolution operations.
///
/// Every error aborts only the field resolution chain it occurred in. None of
/// them are retried: synthesis is pure computation, so a retry would fail the
/// same way.
#[derive(Debug, thiserror::Error)]
pub enum MockError {
    /// Requested type or field does not exist on the schema
    #[error(transparent)]
    SchemaMismatch(#[from] SchemaError),

    /// A scalar type has no registered generator
    #[error("No mock defined for type \"{0}\"")]
    MissingGenerator(String),

    /// An abstract-type generator did not name a concrete type
    #[error(
        "Mock generated for abstract type \"{0}\" did not return a \"__typename\" field. \
         In order to resolve to a concrete type a `__typename` hint is required."
    )]
    AmbiguousAbstractResolution(String),

    /// A relational resolver could not find the local key on its source record
    #[error(
        "{resolver} is missing an id (field: \"{field}\") on {parent_type}.{field_name} returning {return_type}"
    )]
    MissingRelationKey {
        resolver: &'static str,
        field: String,
        parent_type: String,
        field_name: String,
        return_type: String,
    },

    /// A type-level generator produced a field the type does not declare
    #[error(
        "Generator for type \"{type_name}\" has an invalid field: \"{field}\" configured. \
         Generators can only be valid fields of the type"
    )]
    InvalidGeneratorField { type_name: String, field: String },

    /// A declarative generator config failed validation
    #[error("Invalid generator config for {type_name}.{field}: {source}")]
    InvalidGeneratorConfig {
        type_name: String,
        field: String,
        source: GeneratorError,
    },

    /// A generator produced a value of the wrong shape
    #[error("Value returned by the mock for {type_name} is invalid: {reason}")]
    InvalidGeneratorOutput { type_name: String, reason: String },

    /// `connection()` used on a field whose type is not a connection
    #[error("Invalid connection type: {connection_type} on parent type: {parent_type}")]
    InvalidConnectionType {
        connection_type: String,
        parent_type: String,
    },

    /// Negative `first` / `last` or malformed pagination arguments
    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),

    /// A reference points at a record that is not in the store
    #[error("Reference {type_name}:{id} does not resolve to a stored record")]
    UnresolvedReference { type_name: String, id: String },
}

impl MockError {
    /// Whether the error indicates a setup defect rather than a per-field
    /// resolution failure the caller should report alongside sibling results.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::AmbiguousAbstractResolution(_))
    }
}
