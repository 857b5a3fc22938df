//! Column mapping from dataset columns to evaluator inputs

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::Row;
use crate::evaluators::RowInputs;

static COLUMN_EXPR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\$\{data\.([A-Za-z0-9_\-]+(?:\.[A-Za-z0-9_\-]+)*)\}$")
        .expect("column expression pattern is valid")
});

/// Error parsing a column expression
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid column expression '{0}', expected ${{data.<column>}}")]
pub struct ColumnExprError(pub String);

/// Reference to a dataset column, written `${data.<column>}`
///
/// Dotted paths (`${data.response.status}`) address nested object fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnRef {
    path: Vec<String>,
}

impl ColumnRef {
    /// Parse a `${data.<column>}` expression
    pub fn parse(expr: &str) -> Result<Self, ColumnExprError> {
        let captures = COLUMN_EXPR
            .captures(expr.trim())
            .ok_or_else(|| ColumnExprError(expr.to_string()))?;
        let path = captures[1].split('.').map(str::to_string).collect();
        Ok(Self { path })
    }

    /// Reference a top-level column
    pub fn column(name: impl Into<String>) -> Self {
        Self {
            path: vec![name.into()],
        }
    }

    /// Dotted column path
    pub fn column_path(&self) -> String {
        self.path.join(".")
    }

    /// Resolve the reference against a row
    pub fn resolve<'a>(&self, row: &'a Row) -> Option<&'a Value> {
        let (first, rest) = self.path.split_first()?;
        let mut current = row.get(first)?;
        for segment in rest {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${{data.{}}}", self.column_path())
    }
}

impl TryFrom<String> for ColumnRef {
    type Error = ColumnExprError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ColumnRef> for String {
    fn from(column: ColumnRef) -> Self {
        column.to_string()
    }
}

/// Mapping for one evaluator: input parameter → dataset column
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    inputs: BTreeMap<String, ColumnRef>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `input` to `column`
    pub fn with_input(mut self, input: impl Into<String>, column: ColumnRef) -> Self {
        self.inputs.insert(input.into(), column);
        self
    }

    /// Build a mapping from raw `${data.<column>}` expressions
    pub fn parse<I, K, V>(entries: I) -> Result<Self, (String, ColumnExprError)>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut mapping = Self::new();
        for (input, expr) in entries {
            let input = input.into();
            match ColumnRef::parse(expr.as_ref()) {
                Ok(column) => {
                    mapping.inputs.insert(input, column);
                }
                Err(e) => return Err((input, e)),
            }
        }
        Ok(mapping)
    }

    pub fn contains_input(&self, input: &str) -> bool {
        self.inputs.contains_key(input)
    }

    pub fn inputs(&self) -> impl Iterator<Item = (&String, &ColumnRef)> {
        self.inputs.iter()
    }

    /// Resolve every mapped input against `row`
    ///
    /// Returns the missing column path on failure.
    pub fn resolve(&self, row: &Row) -> Result<RowInputs, String> {
        self.inputs
            .iter()
            .map(|(input, column)| {
                column
                    .resolve(row)
                    .map(|value| (input.clone(), value.clone()))
                    .ok_or_else(|| column.column_path())
            })
            .collect()
    }
}
