//! Minimal selection executor.
//!
//! Walks a selection tree against [`Mocks::resolve`], completing lists,
//! leaves and abstract types the way a query executor does. A field that
//! fails is reported in [`Response::errors`] and becomes `null`; its
//! siblings still resolve.

use super::selection::{Field, Selection};
use crate::error::MockError;
use crate::mocks::Mocks;
use crate::value::{FieldInfo, MockValue};
use mock_core::{TypeDefinition, TypeRef};
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

/// Error reported for one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    /// Response keys and list indices leading to the field
    pub path: Vec<String>,
    pub message: String,
    /// Whether the underlying error indicates a setup defect
    pub fatal: bool,
}

/// Result of executing a selection tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub data: JsonValue,
    pub errors: Vec<FieldError>,
}

/// Execute selections against the query root type.
pub fn execute(mocks: &mut Mocks, selections: &[Selection]) -> Response {
    let root = mocks.schema().query.clone();
    execute_root(mocks, &root, selections)
}

/// Execute selections against any root type.
pub fn execute_root(mocks: &mut Mocks, root_type: &str, selections: &[Selection]) -> Response {
    let mut executor = Executor {
        mocks,
        path: Vec::new(),
        errors: Vec::new(),
    };
    let data = executor.selection_set(root_type, &MockValue::null(), selections);

    Response {
        data,
        errors: executor.errors,
    }
}

struct Executor<'a> {
    mocks: &'a mut Mocks,
    path: Vec<String>,
    errors: Vec<FieldError>,
}

impl Executor<'_> {
    fn report(&mut self, err: MockError) {
        debug!("Field {} failed: {err}", self.path.join("."));
        self.errors.push(FieldError {
            path: self.path.clone(),
            message: err.to_string(),
            fatal: err.is_fatal(),
        });
    }

    fn selection_set(
        &mut self,
        type_name: &str,
        source: &MockValue,
        selections: &[Selection],
    ) -> JsonValue {
        let mut fields = Vec::new();
        self.collect_fields(type_name, selections, &mut fields);

        let mut out = Map::new();
        for field in fields {
            let key = field.response_key().to_string();
            self.path.push(key.clone());

            let value = if field.name == "__typename" {
                JsonValue::String(type_name.to_string())
            } else {
                match self.field(type_name, source, field) {
                    Ok(value) => value,
                    Err(err) => {
                        self.report(err);
                        JsonValue::Null
                    }
                }
            };

            self.path.pop();
            out.insert(key, value);
        }

        JsonValue::Object(out)
    }

    /// Flatten inline fragments that apply to `type_name`.
    fn collect_fields<'s>(
        &self,
        type_name: &str,
        selections: &'s [Selection],
        out: &mut Vec<&'s Field>,
    ) {
        for selection in selections {
            match selection {
                Selection::Field(field) => out.push(field),
                Selection::InlineFragment {
                    type_condition,
                    selections,
                } => {
                    let applies = type_condition == type_name
                        || self
                            .mocks
                            .schema()
                            .possible_types(type_condition)
                            .map(|types| types.contains(&type_name))
                            .unwrap_or(false);
                    if applies {
                        self.collect_fields(type_name, selections, out);
                    }
                }
            }
        }
    }

    fn field(
        &mut self,
        type_name: &str,
        source: &MockValue,
        field: &Field,
    ) -> Result<JsonValue, MockError> {
        let return_type = self
            .mocks
            .schema()
            .get_field(type_name, &field.name)?
            .field_type
            .clone();
        let info = FieldInfo::new(type_name, field.name.as_str(), return_type.clone());

        let value = self.mocks.resolve(source, &field.args, &info)?;
        self.complete(&return_type, value, field)
    }

    fn complete(
        &mut self,
        field_type: &TypeRef,
        value: MockValue,
        field: &Field,
    ) -> Result<JsonValue, MockError> {
        if value.is_null() {
            return Ok(JsonValue::Null);
        }

        let field_type = field_type.nullable();
        if let Some(item_type) = field_type.list_item() {
            let items = value
                .into_items()
                .ok_or_else(|| MockError::InvalidGeneratorOutput {
                    type_name: field_type.to_string(),
                    reason: "expected a list".to_string(),
                })?;

            let mut out = Vec::with_capacity(items.len());
            for (idx, item) in items.into_iter().enumerate() {
                self.path.push(idx.to_string());
                let completed = match self.complete(item_type, item, field) {
                    Ok(value) => value,
                    Err(err) => {
                        self.report(err);
                        JsonValue::Null
                    }
                };
                self.path.pop();
                out.push(completed);
            }
            return Ok(JsonValue::Array(out));
        }

        let type_name = field_type.named_type();
        let (is_leaf, is_abstract) = match self.mocks.schema().get_type(type_name)? {
            TypeDefinition::Scalar { .. } | TypeDefinition::Enum { .. } => (true, false),
            TypeDefinition::Object { .. } => (false, false),
            TypeDefinition::Interface { .. } | TypeDefinition::Union { .. } => (false, true),
        };

        if is_leaf {
            return value
                .to_plain()
                .map(|plain| plain.to_json())
                .ok_or_else(|| MockError::InvalidGeneratorOutput {
                    type_name: type_name.to_string(),
                    reason: "leaf value is not plain".to_string(),
                });
        }

        let concrete = if is_abstract {
            self.mocks
                .resolve_type(&value)
                .ok_or_else(|| MockError::AmbiguousAbstractResolution(type_name.to_string()))?
        } else {
            type_name.to_string()
        };

        Ok(self.selection_set(&concrete, &value, &field.selections))
    }
}
