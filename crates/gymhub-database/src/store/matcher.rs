//! In-process evaluation of filters and sort keys over JSON documents.
//!
//! Mirrors the SQL the PostgreSQL store generates: a condition on a field
//! whose JSON type does not match the filter value is false, strings
//! compare byte-wise, and sort keys compare by their text rendering with
//! missing values last.

use std::cmp::Ordering;

use serde_json::Value;

use gymhub_core::error::AppError;
use gymhub_core::result::AppResult;
use gymhub_core::types::{FilterExpr, FilterField, FilterOp, FilterValue, SortDirection, SortField};

/// Reject operator/value combinations neither backend can express.
pub fn check_filter(expr: &FilterExpr) -> AppResult<()> {
    match expr {
        FilterExpr::Field(field) => check_field(field),
        FilterExpr::All(items) | FilterExpr::Any(items) => items.iter().try_for_each(check_filter),
    }
}

fn check_field(field: &FilterField) -> AppResult<()> {
    let ok = match (field.op, &field.value) {
        (FilterOp::IsNull | FilterOp::IsNotNull, _) => true,
        (FilterOp::In, FilterValue::StringList(_)) => true,
        (FilterOp::In, _) | (_, FilterValue::StringList(_)) | (_, FilterValue::Null) => false,
        _ => true,
    };
    if ok {
        Ok(())
    } else {
        Err(AppError::internal(format!(
            "Unsupported filter {:?} on field '{}'",
            field.op, field.field
        )))
    }
}

/// Whether `doc` satisfies `expr`.
pub fn matches(doc: &Value, expr: &FilterExpr) -> bool {
    match expr {
        FilterExpr::Field(field) => matches_field(doc, field),
        FilterExpr::All(items) => items.iter().all(|e| matches(doc, e)),
        FilterExpr::Any(items) => items.iter().any(|e| matches(doc, e)),
    }
}

fn matches_field(doc: &Value, field: &FilterField) -> bool {
    let actual = doc.get(&field.field);
    match field.op {
        FilterOp::IsNull => actual.is_none_or(Value::is_null),
        FilterOp::IsNotNull => actual.is_some_and(|v| !v.is_null()),
        FilterOp::In => match (actual, &field.value) {
            (Some(Value::String(s)), FilterValue::StringList(list)) => list.contains(s),
            _ => false,
        },
        op => actual
            .and_then(|v| compare(v, &field.value))
            .is_some_and(|ordering| op_holds(op, ordering)),
    }
}

fn compare(actual: &Value, expected: &FilterValue) -> Option<Ordering> {
    match (actual, expected) {
        (Value::String(a), FilterValue::String(b)) => Some(a.as_bytes().cmp(b.as_bytes())),
        (Value::Number(a), FilterValue::Integer(b)) => a.as_f64()?.partial_cmp(&(*b as f64)),
        (Value::Number(a), FilterValue::Float(b)) => a.as_f64()?.partial_cmp(b),
        (Value::Bool(a), FilterValue::Boolean(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn op_holds(op: FilterOp, ordering: Ordering) -> bool {
    match op {
        FilterOp::Eq => ordering == Ordering::Equal,
        FilterOp::Ne => ordering != Ordering::Equal,
        FilterOp::Gt => ordering == Ordering::Greater,
        FilterOp::Gte => ordering != Ordering::Less,
        FilterOp::Lt => ordering == Ordering::Less,
        FilterOp::Lte => ordering != Ordering::Greater,
        FilterOp::In | FilterOp::IsNull | FilterOp::IsNotNull => false,
    }
}

/// Text rendering of a field, as PostgreSQL's `->>` produces it.
fn sort_key(doc: &Value, field: &str) -> Option<String> {
    match doc.get(field)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Compare two documents by a list of sort keys.
pub fn compare_docs(a: &Value, b: &Value, sort: &[SortField]) -> Ordering {
    for key in sort {
        let ordering = match (sort_key(a, &key.field), sort_key(b, &key.field)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => {
                let natural = x.as_bytes().cmp(y.as_bytes());
                match key.direction {
                    SortDirection::Asc => natural,
                    SortDirection::Desc => natural.reverse(),
                }
            }
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
