//! Resolution-time values.
//!
//! Stored records only ever hold plain [`Value`]s. While a query is being
//! resolved two more shapes appear: objects whose fields may still be
//! functions ([`MockObject`]), and the functions themselves ([`Resolver`]).

use crate::error::MockError;
use crate::mocks::Mocks;
use mock_core::{Record, Reference, TypeRef, Value};
use rand::rngs::StdRng;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Field arguments, by name.
pub type Args = BTreeMap<String, Value>;

/// Field that is being resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    /// Concrete type that declares the field
    pub parent_type: String,
    /// Field name
    pub field_name: String,
    /// Declared return type
    pub return_type: TypeRef,
}

impl FieldInfo {
    pub fn new(
        parent_type: impl Into<String>,
        field_name: impl Into<String>,
        return_type: TypeRef,
    ) -> Self {
        Self {
            parent_type: parent_type.into(),
            field_name: field_name.into(),
            return_type,
        }
    }

    /// Seeded-generator key for this field on a record.
    pub fn rng_key(&self, record_id: Option<&str>) -> String {
        format!(
            "{}.{}:{}",
            self.parent_type,
            self.field_name,
            record_id.unwrap_or_default()
        )
    }
}

/// Everything a generator or field resolver gets to see.
pub struct MockContext<'a> {
    /// The store, for lookups and stub creation
    pub mocks: &'a mut Mocks,
    /// Object the field is being resolved on
    pub source: &'a MockObject,
    /// Field arguments
    pub args: &'a Args,
    /// Field being resolved
    pub info: &'a FieldInfo,
    /// Generator seeded for this field (or type)
    pub rng: &'a mut StdRng,
}

type ResolverFn = dyn Fn(&mut MockContext<'_>) -> Result<MockValue, MockError> + Send + Sync;

/// Deferred field function.
///
/// Used both as a type-level generator (registered with [`Mocks::mock`]) and
/// as the value of a single field inside a generated [`MockObject`].
#[derive(Clone)]
pub struct Resolver(Arc<ResolverFn>);

impl Resolver {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut MockContext<'_>) -> Result<MockValue, MockError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Resolver that always returns the same value.
    pub fn constant(value: impl Into<MockValue>) -> Self {
        let value = value.into();
        Self::new(move |_| Ok(value.clone()))
    }

    /// Invoke the resolver.
    pub fn call(&self, ctx: &mut MockContext<'_>) -> Result<MockValue, MockError> {
        (self.0)(ctx)
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Resolver(..)")
    }
}

/// Object whose fields are values, nested objects or resolvers.
#[derive(Debug, Clone, Default)]
pub struct MockObject(BTreeMap<String, MockValue>);

impl MockObject {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, field: &str) -> Option<&MockValue> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<MockValue>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<MockValue> {
        self.0.remove(field)
    }

    /// Builder-style field setter.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<MockValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Overlay `other` on top of this object; `other` wins on collisions.
    pub fn extend(&mut self, other: MockObject) {
        self.0.extend(other.0);
    }

    /// Add the fields of `other` this object does not have yet.
    pub fn fill(&mut self, other: MockObject) {
        for (field, value) in other.0 {
            self.0.entry(field).or_insert(value);
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &MockValue)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The `__typename` hint, if present.
    pub fn typename(&self) -> Option<&str> {
        match self.0.get("__typename") {
            Some(MockValue::Value(Value::String(name))) => Some(name),
            _ => None,
        }
    }

    /// Get a field as a plain value.
    pub fn value(&self, field: &str) -> Option<&Value> {
        match self.0.get(field) {
            Some(MockValue::Value(value)) => Some(value),
            _ => None,
        }
    }

    /// Convert to a stored record when every field is plain.
    pub fn to_record(&self) -> Option<Record> {
        self.0
            .iter()
            .map(|(k, v)| v.to_plain().map(|v| (k.clone(), v)))
            .collect()
    }
}

impl From<Record> for MockObject {
    fn from(record: Record) -> Self {
        Self(
            record
                .into_iter()
                .map(|(k, v)| (k, MockValue::Value(v)))
                .collect(),
        )
    }
}

impl FromIterator<(String, MockValue)> for MockObject {
    fn from_iter<I: IntoIterator<Item = (String, MockValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Value produced while resolving a field.
#[derive(Debug, Clone)]
pub enum MockValue {
    /// Plain stored-form value (scalars, references, records)
    Value(Value),
    /// Object that may carry resolvers
    Object(MockObject),
    /// List of resolution-time values
    List(Vec<MockValue>),
    /// Deferred field function
    Resolver(Resolver),
}

impl MockValue {
    pub fn null() -> Self {
        Self::Value(Value::Null)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Value(Value::Null))
    }

    /// Get the reference this value carries, if it is one.
    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            Self::Value(Value::Ref(r)) => Some(r),
            _ => None,
        }
    }

    /// Convert to a plain value when nothing inside is deferred.
    pub fn to_plain(&self) -> Option<Value> {
        match self {
            Self::Value(value) => Some(value.clone()),
            Self::List(items) => items
                .iter()
                .map(MockValue::to_plain)
                .collect::<Option<Vec<_>>>()
                .map(Value::List),
            Self::Object(object) => object.to_record().map(Value::Object),
            Self::Resolver(_) => None,
        }
    }

    /// Split a list value into its items.
    pub fn into_items(self) -> Option<Vec<MockValue>> {
        match self {
            Self::List(items) => Some(items),
            Self::Value(Value::List(items)) => {
                Some(items.into_iter().map(MockValue::Value).collect())
            }
            _ => None,
        }
    }
}

impl From<Value> for MockValue {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

macro_rules! impl_from_plain {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for MockValue {
                fn from(value: $ty) -> Self {
                    Self::Value(Value::from(value))
                }
            }
        )*
    };
}

impl_from_plain!(bool, i64, f64, &str, String, Reference, Record);

impl From<MockObject> for MockValue {
    fn from(object: MockObject) -> Self {
        Self::Object(object)
    }
}

impl From<Resolver> for MockValue {
    fn from(resolver: Resolver) -> Self {
        Self::Resolver(resolver)
    }
}
