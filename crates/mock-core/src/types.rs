//! Field type references for the mock schema.
//!
//! This module defines `TypeRef`, the wrapper structure around a named type
//! that a field declares: nullability and list-ness, exactly as a GraphQL type
//! reference spells them.
//!
//! # YAML Format
//!
//! Type references are written in the usual GraphQL notation:
//! ```yaml
//! type: String
//! type: "ID!"
//! type: "[Person!]!"
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::schema::SchemaError;

/// Declared type of a field or argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A named type (scalar, enum, object, interface or union)
    Named(String),

    /// A list of the inner type
    List(Box<TypeRef>),

    /// A non-null wrapper around the inner type
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    /// Create a named type reference.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Wrap a type reference in a list.
    pub fn list(inner: TypeRef) -> Self {
        Self::List(Box::new(inner))
    }

    /// Wrap a type reference in a non-null marker.
    pub fn non_null(inner: TypeRef) -> Self {
        match inner {
            Self::NonNull(_) => inner,
            other => Self::NonNull(Box::new(other)),
        }
    }

    /// Get the innermost named type, ignoring every wrapper.
    pub fn named_type(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::List(inner) | Self::NonNull(inner) => inner.named_type(),
        }
    }

    /// Strip a single outer non-null wrapper.
    pub fn nullable(&self) -> &TypeRef {
        match self {
            Self::NonNull(inner) => inner,
            other => other,
        }
    }

    /// Check whether the (nullable) type is a list.
    pub fn is_list(&self) -> bool {
        matches!(self.nullable(), Self::List(_))
    }

    /// Get the element type of a (nullable) list type.
    pub fn list_item(&self) -> Option<&TypeRef> {
        match self.nullable() {
            Self::List(inner) => Some(inner),
            _ => None,
        }
    }

    /// Check whether this type reference is non-null.
    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

impl FromStr for TypeRef {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if let Some(inner) = trimmed.strip_suffix('!') {
            let inner: TypeRef = inner.parse()?;
            if inner.is_non_null() {
                return Err(SchemaError::InvalidTypeRef(s.to_string()));
            }
            return Ok(TypeRef::NonNull(Box::new(inner)));
        }

        if let Some(inner) = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        {
            return Ok(TypeRef::List(Box::new(inner.parse()?)));
        }

        if is_valid_name(trimmed) {
            Ok(TypeRef::Named(trimmed.to_string()))
        } else {
            Err(SchemaError::InvalidTypeRef(s.to_string()))
        }
    }
}

/// Check that a string is a valid type name (`[_A-Za-z][_0-9A-Za-z]*`).
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

// Type references are always written as strings: "[Person!]!"

impl Serialize for TypeRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TypeRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{Error, Visitor};

        struct TypeRefVisitor;

        impl<'de> Visitor<'de> for TypeRefVisitor {
            type Value = TypeRef;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a type reference such as \"[Person!]!\"")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: Error,
            {
                value.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(TypeRefVisitor)
    }
}
