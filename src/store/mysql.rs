use async_trait::async_trait;
use serde_json::Value;
use sqlx::MySqlPool;
use tracing::debug;

use super::{Condition, Filter, Query, RecordStore, StoreError};

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// Bound as text and cast to JSON on the server.
    Json(String),
    Text(String),
    U64(u64),
}

/// ===============================
/// SQL statement container
/// ===============================
#[derive(Debug, Default, PartialEq)]
pub struct SqlStatement {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

fn json_field(name: &str) -> String {
    if name == "id" {
        "id".to_string()
    } else {
        format!("JSON_EXTRACT(doc, '$.{}')", name)
    }
}

fn escape_like(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() + 2);
    out.push('%');
    for ch in needle.to_lowercase().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('%');
    out
}

/// `id` lives in its own column and compares as plain text.
fn bind_for(name: &str, value: &Value, values: &mut Vec<SqlValue>) -> &'static str {
    if name == "id" {
        values.push(SqlValue::Text(value.as_str().unwrap_or_default().to_string()));
        "?"
    } else {
        values.push(SqlValue::Json(value.to_string()));
        "CAST(? AS JSON)"
    }
}

fn compile_condition(condition: &Condition, values: &mut Vec<SqlValue>) -> String {
    match condition {
        Condition::Eq(name, v) => {
            let placeholder = bind_for(name, v, values);
            format!("{} = {}", json_field(name), placeholder)
        }
        Condition::In(name, vs) => {
            if vs.is_empty() {
                return "1 = 0".to_string();
            }
            let placeholders = vs
                .iter()
                .map(|v| bind_for(name, v, values))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{} IN ({})", json_field(name), placeholders)
        }
        Condition::Contains(name, needle) => {
            values.push(SqlValue::Text(escape_like(needle)));
            format!("LOWER(JSON_UNQUOTE(JSON_EXTRACT(doc, '$.{}'))) LIKE ?", name)
        }
        Condition::Gte(name, v) => {
            let placeholder = bind_for(name, v, values);
            format!("{} >= {}", json_field(name), placeholder)
        }
        Condition::Lte(name, v) => {
            let placeholder = bind_for(name, v, values);
            format!("{} <= {}", json_field(name), placeholder)
        }
        Condition::Any(inner) => {
            if inner.is_empty() {
                return "1 = 0".to_string();
            }
            let parts = inner
                .iter()
                .map(|c| compile_condition(c, values))
                .collect::<Vec<_>>()
                .join(" OR ");
            format!("({})", parts)
        }
    }
}

fn where_clause(filter: &Filter, values: &mut Vec<SqlValue>) -> String {
    let mut where_sql = String::from(" WHERE 1=1");
    for condition in &filter.conditions {
        where_sql.push_str(" AND ");
        where_sql.push_str(&compile_condition(condition, values));
    }
    where_sql
}

/// ===============================
/// Build dynamic SELECT SQL
/// ===============================
pub fn build_select_sql(table: &str, query: &Query) -> SqlStatement {
    let mut values = Vec::new();
    let mut sql = format!(
        "SELECT CAST(doc AS CHAR) FROM {}{}",
        table,
        where_clause(&query.filter, &mut values)
    );

    match &query.order {
        Some(order) => sql.push_str(&format!(
            " ORDER BY {} {}",
            json_field(order.field),
            if order.descending { "DESC" } else { "ASC" }
        )),
        None => sql.push_str(" ORDER BY seq ASC"),
    }

    if let Some(limit) = query.limit {
        sql.push_str(" LIMIT ?");
        values.push(SqlValue::U64(limit));
    }

    SqlStatement { sql, values }
}

pub fn build_count_sql(table: &str, filter: &Filter) -> SqlStatement {
    let mut values = Vec::new();
    let sql = format!("SELECT COUNT(*) FROM {}{}", table, where_clause(filter, &mut values));
    SqlStatement { sql, values }
}

macro_rules! bind_all {
    ($query:expr, $values:expr) => {{
        let mut query = $query;
        for value in $values {
            query = match value {
                SqlValue::Json(v) | SqlValue::Text(v) => query.bind(v),
                SqlValue::U64(v) => query.bind(v),
            };
        }
        query
    }};
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.code().as_deref() == Some("23000") {
                return StoreError::Conflict(db_err.message().to_string());
            }
        }
        StoreError::Backend(e.to_string())
    }
}

/// MySQL backend: one table per record kind, `(seq, id, doc JSON)`.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for MySqlStore {
    async fn insert(&self, table: &'static str, id: &str, doc: Value) -> Result<(), StoreError> {
        let sql = format!("INSERT INTO {} (id, doc) VALUES (?, CAST(? AS JSON))", table);
        sqlx::query(&sql)
            .bind(id)
            .bind(doc.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get(&self, table: &'static str, id: &str) -> Result<Option<Value>, StoreError> {
        let sql = format!("SELECT CAST(doc AS CHAR) FROM {} WHERE id = ?", table);
        let raw = sqlx::query_scalar::<_, String>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        raw.map(|s| serde_json::from_str(&s).map_err(StoreError::from))
            .transpose()
    }

    async fn find_many(&self, table: &'static str, query: &Query) -> Result<Vec<Value>, StoreError> {
        let stmt = build_select_sql(table, query);
        debug!(sql = %stmt.sql, values = ?stmt.values, "Selecting documents");

        let rows = bind_all!(sqlx::query_scalar::<_, String>(&stmt.sql), stmt.values)
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|s| serde_json::from_str(s).map_err(StoreError::from))
            .collect()
    }

    async fn count(&self, table: &'static str, filter: &Filter) -> Result<u64, StoreError> {
        let stmt = build_count_sql(table, filter);
        debug!(sql = %stmt.sql, values = ?stmt.values, "Counting documents");

        let total = bind_all!(sqlx::query_scalar::<_, i64>(&stmt.sql), stmt.values)
            .fetch_one(&self.pool)
            .await?;
        Ok(total.max(0) as u64)
    }

    async fn replace(&self, table: &'static str, id: &str, doc: Value) -> Result<bool, StoreError> {
        let sql = format!("UPDATE {} SET doc = CAST(? AS JSON) WHERE id = ?", table);
        let result = sqlx::query(&sql)
            .bind(doc.to_string())
            .bind(id)
            .execute(&self.pool)
            .await?;
        // MySQL reports 0 affected rows for a no-op update, so confirm existence.
        if result.rows_affected() > 0 {
            return Ok(true);
        }
        Ok(self.get(table, id).await?.is_some())
    }

    async fn delete(&self, table: &'static str, id: &str) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = ?", table);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn next_sequence(&self, scope: &str) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sequence_counters (scope, value)
            VALUES (?, 1)
            ON DUPLICATE KEY UPDATE value = value + 1
            "#,
        )
        .bind(scope)
        .execute(&mut *tx)
        .await?;

        let value = sqlx::query_scalar::<_, i64>("SELECT value FROM sequence_counters WHERE scope = ?")
            .bind(scope)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(value.max(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn select_compiles_filters_in_order() {
        let query = Query::new(
            Filter::new()
                .eq("status", "ACTIVE")
                .is_in("id", ["a", "b"])
                .any(vec![Condition::Contains("reason", "50%".into())]),
        )
        .newest_first("applied_date")
        .limit(10);

        let stmt = build_select_sql("leave_applications", &query);
        assert_eq!(
            stmt.sql,
            "SELECT CAST(doc AS CHAR) FROM leave_applications WHERE 1=1 \
             AND JSON_EXTRACT(doc, '$.status') = CAST(? AS JSON) \
             AND id IN (?, ?) \
             AND (LOWER(JSON_UNQUOTE(JSON_EXTRACT(doc, '$.reason'))) LIKE ?) \
             ORDER BY JSON_EXTRACT(doc, '$.applied_date') DESC LIMIT ?"
        );
        assert_eq!(
            stmt.values,
            vec![
                SqlValue::Json(json!("ACTIVE").to_string()),
                SqlValue::Text("a".into()),
                SqlValue::Text("b".into()),
                SqlValue::Text("%50\\%%".into()),
                SqlValue::U64(10),
            ]
        );
    }

    #[test]
    fn empty_in_list_matches_nothing() {
        let stmt = build_count_sql("employees", &Filter::new().is_in::<String>("department_id", vec![]));
        assert_eq!(stmt.sql, "SELECT COUNT(*) FROM employees WHERE 1=1 AND 1 = 0");
        assert!(stmt.values.is_empty());
    }
}
