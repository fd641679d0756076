//! Filter types for dynamic document queries.
//!
//! Field names address top-level properties of stored JSON documents.
//! String comparisons are byte-wise, which is what makes fixed-width
//! timestamp strings comparable.

use serde::{Deserialize, Serialize};

/// Filter comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Exact equality.
    Eq,
    /// Not equal.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// List membership.
    In,
    /// Field is absent or JSON `null`.
    IsNull,
    /// Field is present and not JSON `null`.
    IsNotNull,
}

/// A dynamic filter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// A string value.
    String(String),
    /// An integer value.
    Integer(i64),
    /// A floating-point value.
    Float(f64),
    /// A boolean value.
    Boolean(bool),
    /// A list of string values (for `In`).
    StringList(Vec<String>),
    /// No value (for `IsNull`, `IsNotNull`).
    Null,
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// A single filter condition on a named field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterField {
    /// The document field name to filter on.
    pub field: String,
    /// The comparison operator.
    pub op: FilterOp,
    /// The value to compare against.
    pub value: FilterValue,
}

impl FilterField {
    /// Create a new filter field.
    pub fn new(field: impl Into<String>, op: FilterOp, value: impl Into<FilterValue>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Shorthand for an equality filter on a string value.
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, FilterOp::Eq, FilterValue::String(value.into()))
    }

    /// Shorthand for a `field IS NULL` filter.
    pub fn is_null(field: impl Into<String>) -> Self {
        Self::new(field, FilterOp::IsNull, FilterValue::Null)
    }
}

/// A boolean combination of filter conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterExpr {
    /// A single condition.
    Field(FilterField),
    /// All sub-expressions must hold. An empty list matches everything.
    All(Vec<FilterExpr>),
    /// At least one sub-expression must hold. An empty list matches nothing.
    Any(Vec<FilterExpr>),
}

impl FilterExpr {
    /// Conjunction of plain field conditions.
    pub fn all(fields: impl IntoIterator<Item = FilterField>) -> Self {
        Self::All(fields.into_iter().map(Self::Field).collect())
    }

    /// Disjunction of arbitrary expressions.
    pub fn any(exprs: impl IntoIterator<Item = FilterExpr>) -> Self {
        Self::Any(exprs.into_iter().collect())
    }
}

impl From<FilterField> for FilterExpr {
    fn from(field: FilterField) -> Self {
        Self::Field(field)
    }
}
