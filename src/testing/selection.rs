//! Selection trees.

use crate::value::Args;
use mock_core::Value;

/// A field selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub alias: Option<String>,
    pub args: Args,
    pub selections: Vec<Selection>,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            args: Args::new(),
            selections: Vec::new(),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }

    /// Set the sub-selections.
    pub fn select<I, S>(mut self, selections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Selection>,
    {
        self.selections = selections.into_iter().map(Into::into).collect();
        self
    }

    /// Key the field appears under in the response.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// One entry of a selection set.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Field(Field),
    /// `... on Type { ... }`
    InlineFragment {
        type_condition: String,
        selections: Vec<Selection>,
    },
}

impl From<Field> for Selection {
    fn from(field: Field) -> Self {
        Self::Field(field)
    }
}

impl From<&str> for Selection {
    fn from(name: &str) -> Self {
        Self::Field(Field::new(name))
    }
}

/// Shorthand for [`Field::new`].
pub fn field(name: impl Into<String>) -> Field {
    Field::new(name)
}

/// Inline fragment on `type_condition`.
pub fn on<I, S>(type_condition: impl Into<String>, selections: I) -> Selection
where
    I: IntoIterator<Item = S>,
    S: Into<Selection>,
{
    Selection::InlineFragment {
        type_condition: type_condition.into(),
        selections: selections.into_iter().map(Into::into).collect(),
    }
}
