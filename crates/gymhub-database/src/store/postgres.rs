//! PostgreSQL JSONB document store.
//!
//! All collections share the `documents` table. Filters compile to
//! predicates over `body`; field names are always bound as parameters.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{Postgres, QueryBuilder};

use gymhub_core::error::{AppError, ErrorKind};
use gymhub_core::result::AppResult;
use gymhub_core::traits::{DocumentQuery, DocumentStore};
use gymhub_core::types::{FilterExpr, FilterField, FilterOp, FilterValue};

use super::matcher::check_filter;
use crate::connection::DatabasePool;

/// Document store over the `documents` table.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    db: DatabasePool,
}

impl PgDocumentStore {
    /// Create a store on an open pool.
    pub fn new(db: DatabasePool) -> Self {
        Self { db }
    }
}

fn db_error(context: &str, err: sqlx::Error) -> AppError {
    AppError::with_source(ErrorKind::Database, format!("{context}: {err}"), err)
}

fn comparison(op: FilterOp) -> &'static str {
    match op {
        FilterOp::Eq => " = ",
        FilterOp::Ne => " <> ",
        FilterOp::Gt => " > ",
        FilterOp::Gte => " >= ",
        FilterOp::Lt => " < ",
        FilterOp::Lte => " <= ",
        FilterOp::In | FilterOp::IsNull | FilterOp::IsNotNull => " = ",
    }
}

/// Opens `(jsonb_typeof(body -> f) = '<type>' AND body -> f <op> to_jsonb(`.
fn push_json_comparison(qb: &mut QueryBuilder<'_, Postgres>, field: &FilterField, json_type: &str) {
    qb.push("(jsonb_typeof(body -> ");
    qb.push_bind(field.field.clone());
    qb.push(format!(") = '{json_type}' AND body -> "));
    qb.push_bind(field.field.clone());
    qb.push(comparison(field.op));
    qb.push("to_jsonb(");
}

fn push_field(qb: &mut QueryBuilder<'_, Postgres>, field: &FilterField) {
    match (field.op, &field.value) {
        (FilterOp::IsNull, _) => {
            qb.push("(body -> ");
            qb.push_bind(field.field.clone());
            qb.push(" IS NULL OR jsonb_typeof(body -> ");
            qb.push_bind(field.field.clone());
            qb.push(") = 'null')");
        }
        (FilterOp::IsNotNull, _) => {
            qb.push("(body -> ");
            qb.push_bind(field.field.clone());
            qb.push(" IS NOT NULL AND jsonb_typeof(body -> ");
            qb.push_bind(field.field.clone());
            qb.push(") <> 'null')");
        }
        (FilterOp::In, FilterValue::StringList(values)) => {
            qb.push("(jsonb_typeof(body -> ");
            qb.push_bind(field.field.clone());
            qb.push(") = 'string' AND (body ->> ");
            qb.push_bind(field.field.clone());
            qb.push(") = ANY(");
            qb.push_bind(values.clone());
            qb.push("))");
        }
        (_, FilterValue::String(value)) => {
            qb.push("(jsonb_typeof(body -> ");
            qb.push_bind(field.field.clone());
            qb.push(") = 'string' AND (body ->> ");
            qb.push_bind(field.field.clone());
            qb.push(") COLLATE \"C\"");
            qb.push(comparison(field.op));
            qb.push_bind(value.clone());
            qb.push(")");
        }
        (_, FilterValue::Integer(value)) => {
            push_json_comparison(qb, field, "number");
            qb.push_bind(*value);
            qb.push("))");
        }
        (_, FilterValue::Float(value)) => {
            push_json_comparison(qb, field, "number");
            qb.push_bind(*value);
            qb.push("))");
        }
        (_, FilterValue::Boolean(value)) => {
            push_json_comparison(qb, field, "boolean");
            qb.push_bind(*value);
            qb.push("))");
        }
        // Rejected by `check_filter` before any SQL is built.
        (_, FilterValue::StringList(_) | FilterValue::Null) => {
            qb.push("FALSE");
        }
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, expr: &FilterExpr) {
    match expr {
        FilterExpr::Field(field) => push_field(qb, field),
        FilterExpr::All(items) | FilterExpr::Any(items) if items.is_empty() => {
            qb.push(if matches!(expr, FilterExpr::All(_)) { "TRUE" } else { "FALSE" });
        }
        FilterExpr::All(items) | FilterExpr::Any(items) => {
            let joiner = if matches!(expr, FilterExpr::All(_)) { " AND " } else { " OR " };
            qb.push("(");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    qb.push(joiner);
                }
                push_filter(qb, item);
            }
            qb.push(")");
        }
    }
}

fn scoped<'a>(
    select: &str,
    collection: &str,
    filter: Option<&FilterExpr>,
) -> AppResult<QueryBuilder<'a, Postgres>> {
    let mut qb = QueryBuilder::new(select);
    qb.push(" FROM documents WHERE collection = ");
    qb.push_bind(collection.to_string());
    if let Some(expr) = filter {
        check_filter(expr)?;
        qb.push(" AND ");
        push_filter(&mut qb, expr);
    }
    Ok(qb)
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn create_item(&self, collection: &str, id: &str, body: Value) -> AppResult<Value> {
        sqlx::query_scalar::<_, Value>(
            "INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3) RETURNING body",
        )
        .bind(collection)
        .bind(id)
        .bind(&body)
        .fetch_one(self.db.pool())
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::conflict(format!("Document '{id}' already exists in '{collection}'"))
            }
            other => db_error("Failed to create document", other),
        })
    }

    async fn read_item(&self, collection: &str, id: &str) -> AppResult<Option<Value>> {
        sqlx::query_scalar::<_, Value>(
            "SELECT body FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(self.db.pool())
        .await
        .map_err(|e| db_error("Failed to read document", e))
    }

    async fn upsert_item(&self, collection: &str, id: &str, body: Value) -> AppResult<Value> {
        sqlx::query_scalar::<_, Value>(
            "INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3) \
             ON CONFLICT (collection, id) DO UPDATE SET body = EXCLUDED.body, updated_at = now() \
             RETURNING body",
        )
        .bind(collection)
        .bind(id)
        .bind(&body)
        .fetch_one(self.db.pool())
        .await
        .map_err(|e| db_error("Failed to upsert document", e))
    }

    async fn delete_item(&self, collection: &str, id: &str) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(self.db.pool())
            .await
            .map_err(|e| db_error("Failed to delete document", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Document '{id}' not found in '{collection}'"
            )));
        }
        Ok(())
    }

    async fn query_items(&self, collection: &str, query: &DocumentQuery) -> AppResult<Vec<Value>> {
        let mut qb = scoped("SELECT body", collection, query.filter.as_ref())?;

        for (i, key) in query.sort.iter().enumerate() {
            qb.push(if i == 0 { " ORDER BY " } else { ", " });
            qb.push("(body ->> ");
            qb.push_bind(key.field.clone());
            qb.push(") COLLATE \"C\" ");
            qb.push(key.direction.as_sql());
            qb.push(" NULLS LAST");
        }

        if let Some(page) = query.page {
            qb.push(" LIMIT ");
            qb.push_bind(i64::from(page.limit));
            qb.push(" OFFSET ");
            qb.push_bind(i64::from(page.offset));
        }

        qb.build_query_scalar::<Value>()
            .fetch_all(self.db.pool())
            .await
            .map_err(|e| db_error("Failed to query documents", e))
    }

    async fn count_items(&self, collection: &str, filter: Option<&FilterExpr>) -> AppResult<u64> {
        let mut qb = scoped("SELECT COUNT(*)", collection, filter)?;
        let count = qb
            .build_query_scalar::<i64>()
            .fetch_one(self.db.pool())
            .await
            .map_err(|e| db_error("Failed to count documents", e))?;
        Ok(count.max(0) as u64)
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.db.ping().await
    }
}
