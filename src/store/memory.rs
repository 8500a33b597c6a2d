use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{Condition, Filter, Query, RecordStore, StoreError, UNIQUE_INDEXES, UniqueIndex};

/// In-process store; documents kept in insertion order per table.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<&'static str, Vec<(String, Value)>>>,
    sequences: Mutex<HashMap<String, u64>>,
}

fn lock_err<T>(_: std::sync::PoisonError<T>) -> StoreError {
    StoreError::Backend("memory store lock poisoned".into())
}

fn field<'a>(doc: &'a Value, name: &str) -> &'a Value {
    doc.get(name).unwrap_or(&Value::Null)
}

/// Total order used for sorting and range predicates: nulls first, then
/// booleans, numbers, strings.
pub(crate) fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => compare_values(a, b) == Ordering::Equal,
        _ => a == b,
    }
}

pub(crate) fn matches(condition: &Condition, doc: &Value) -> bool {
    match condition {
        Condition::Eq(name, v) => values_equal(field(doc, name), v),
        Condition::In(name, vs) => {
            let actual = field(doc, name);
            vs.iter().any(|v| values_equal(actual, v))
        }
        Condition::Contains(name, needle) => field(doc, name)
            .as_str()
            .map(|s| s.to_lowercase().contains(&needle.to_lowercase()))
            .unwrap_or(false),
        Condition::Gte(name, v) => {
            let actual = field(doc, name);
            !actual.is_null() && compare_values(actual, v) != Ordering::Less
        }
        Condition::Lte(name, v) => {
            let actual = field(doc, name);
            !actual.is_null() && compare_values(actual, v) != Ordering::Greater
        }
        Condition::Any(inner) => inner.iter().any(|c| matches(c, doc)),
    }
}

fn matches_all(filter: &Filter, doc: &Value) -> bool {
    filter.conditions.iter().all(|c| matches(c, doc))
}

fn unique_key(index: &UniqueIndex, doc: &Value) -> Option<Vec<Value>> {
    if let Some((name, expected)) = index.when {
        if field(doc, name).as_str() != Some(expected) {
            return None;
        }
    }

    let key: Vec<Value> = index.fields.iter().map(|f| field(doc, f).clone()).collect();
    if key.iter().any(Value::is_null) {
        None
    } else {
        Some(key)
    }
}

fn check_unique(
    table: &'static str,
    rows: &[(String, Value)],
    id: &str,
    doc: &Value,
) -> Result<(), StoreError> {
    for index in UNIQUE_INDEXES.iter().filter(|i| i.table == table) {
        let Some(key) = unique_key(index, doc) else {
            continue;
        };
        let clash = rows
            .iter()
            .filter(|(other_id, _)| other_id != id)
            .any(|(_, other)| unique_key(index, other).as_ref() == Some(&key));
        if clash {
            return Err(StoreError::Conflict(index.name.to_string()));
        }
    }
    Ok(())
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(&self, table: &'static str, id: &str, doc: Value) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().map_err(lock_err)?;
        let rows = tables.entry(table).or_default();

        if rows.iter().any(|(existing, _)| existing == id) {
            return Err(StoreError::Conflict(format!("{}.PRIMARY", table)));
        }
        check_unique(table, rows, id, &doc)?;

        rows.push((id.to_string(), doc));
        Ok(())
    }

    async fn get(&self, table: &'static str, id: &str) -> Result<Option<Value>, StoreError> {
        let tables = self.tables.lock().map_err(lock_err)?;
        Ok(tables
            .get(table)
            .and_then(|rows| rows.iter().find(|(existing, _)| existing == id))
            .map(|(_, doc)| doc.clone()))
    }

    async fn find_many(&self, table: &'static str, query: &Query) -> Result<Vec<Value>, StoreError> {
        let tables = self.tables.lock().map_err(lock_err)?;
        let mut found: Vec<Value> = tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|(_, doc)| matches_all(&query.filter, doc))
                    .map(|(_, doc)| doc.clone())
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = &query.order {
            found.sort_by(|a, b| {
                let ord = compare_values(field(a, order.field), field(b, order.field));
                if order.descending { ord.reverse() } else { ord }
            });
        }
        if let Some(limit) = query.limit {
            found.truncate(limit as usize);
        }
        Ok(found)
    }

    async fn count(&self, table: &'static str, filter: &Filter) -> Result<u64, StoreError> {
        let tables = self.tables.lock().map_err(lock_err)?;
        Ok(tables
            .get(table)
            .map(|rows| rows.iter().filter(|(_, doc)| matches_all(filter, doc)).count() as u64)
            .unwrap_or(0))
    }

    async fn replace(&self, table: &'static str, id: &str, doc: Value) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().map_err(lock_err)?;
        let Some(rows) = tables.get_mut(table) else {
            return Ok(false);
        };
        check_unique(table, rows, id, &doc)?;

        match rows.iter_mut().find(|(existing, _)| existing == id) {
            Some((_, slot)) => {
                *slot = doc;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, table: &'static str, id: &str) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().map_err(lock_err)?;
        let Some(rows) = tables.get_mut(table) else {
            return Ok(false);
        };
        let before = rows.len();
        rows.retain(|(existing, _)| existing != id);
        Ok(rows.len() != before)
    }

    async fn next_sequence(&self, scope: &str) -> Result<u64, StoreError> {
        let mut sequences = self.sequences.lock().map_err(lock_err)?;
        let value = sequences.entry(scope.to_string()).or_insert(0);
        *value += 1;
        Ok(*value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[actix_web::test]
    async fn filters_order_and_limit() {
        let store = MemoryStore::default();
        for (id, name, n) in [("a", "Alpha", 3), ("b", "beta", 1), ("c", "Gamma", 2)] {
            store
                .insert("projects", id, json!({"id": id, "name": name, "code": id, "n": n}))
                .await
                .unwrap();
        }

        let query = Query::new(Filter::new().any(vec![
            Condition::Contains("name", "ALP".into()),
            Condition::Contains("name", "bet".into()),
        ]))
        .newest_first("n");
        let found = store.find_many("projects", &query).await.unwrap();
        let ids: Vec<_> = found.iter().map(|d| d["id"].as_str().unwrap()).collect();
        assert_eq!(ids, ["a", "b"]);

        let limited = store
            .find_many("projects", &Query::new(Filter::new().gte("n", 2)).limit(1))
            .await
            .unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(store.count("projects", &Filter::new().lte("n", 2)).await.unwrap(), 2);
    }

    #[actix_web::test]
    async fn unique_index_rejects_duplicates() {
        let store = MemoryStore::default();
        store
            .insert("departments", "1", json!({"id": "1", "department_code": "HR"}))
            .await
            .unwrap();
        let err = store
            .insert("departments", "2", json!({"id": "2", "department_code": "HR"}))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[actix_web::test]
    async fn partial_unique_index_only_covers_matching_rows() {
        let store = MemoryStore::default();
        let doc = |id: &str, status: &str| {
            json!({"id": id, "employee_id": "e", "project_id": "p", "status": status})
        };
        store.insert("employee_assignments", "1", doc("1", "COMPLETED")).await.unwrap();
        store.insert("employee_assignments", "2", doc("2", "ACTIVE")).await.unwrap();
        assert!(store.insert("employee_assignments", "3", doc("3", "ACTIVE")).await.is_err());
    }

    #[actix_web::test]
    async fn sequences_are_scoped() {
        let store = MemoryStore::default();
        assert_eq!(store.next_sequence("a").await.unwrap(), 1);
        assert_eq!(store.next_sequence("a").await.unwrap(), 2);
        assert_eq!(store.next_sequence("b").await.unwrap(), 1);
    }
}
