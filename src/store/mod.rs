//! Record store used by every service.
//!
//! Records are serialized to JSON documents and kept one table per record
//! kind. Services talk to the typed [`Store`] facade; the backend behind it
//! is any [`RecordStore`] (MySQL in production, memory in tests).

pub mod memory;
pub mod mysql;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use derive_more::Display;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

/// A typed record persisted as one JSON document.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Table (collection) the record lives in.
    const TABLE: &'static str;
    /// Human readable name used in error messages.
    const LABEL: &'static str;

    fn id(&self) -> &str;
}

#[derive(Debug, Display)]
pub enum StoreError {
    #[display(fmt = "record not found")]
    NotFound,
    #[display(fmt = "unique constraint violated: {}", _0)]
    Conflict(String),
    #[display(fmt = "serialization error: {}", _0)]
    Serialization(String),
    #[display(fmt = "backend error: {}", _0)]
    Backend(String),
}

impl std::error::Error for StoreError {}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Unique key declared on a table. `when` restricts the key to documents
/// whose field equals the given string (a partial index).
#[derive(Debug, Clone, Copy)]
pub struct UniqueIndex {
    pub name: &'static str,
    pub table: &'static str,
    pub fields: &'static [&'static str],
    pub when: Option<(&'static str, &'static str)>,
}

/// Mirrors the generated unique columns in `migrations/`.
pub const UNIQUE_INDEXES: &[UniqueIndex] = &[
    UniqueIndex { name: "uq_locations_code", table: "locations", fields: &["branch_code"], when: None },
    UniqueIndex { name: "uq_departments_code", table: "departments", fields: &["department_code"], when: None },
    UniqueIndex { name: "uq_designations_code", table: "designations", fields: &["designation_code"], when: None },
    UniqueIndex { name: "uq_shifts_code", table: "shifts", fields: &["shift_code"], when: None },
    UniqueIndex { name: "uq_employees_code", table: "employees", fields: &["employee_code"], when: None },
    UniqueIndex { name: "uq_staff_profiles_code", table: "staff_profiles", fields: &["employee_code"], when: None },
    UniqueIndex { name: "uq_project_categories_code", table: "project_categories", fields: &["category_code"], when: None },
    UniqueIndex { name: "uq_projects_code", table: "projects", fields: &["code"], when: None },
    UniqueIndex {
        name: "uq_employee_assignments_active",
        table: "employee_assignments",
        fields: &["employee_id", "project_id"],
        when: Some(("status", "ACTIVE")),
    },
    UniqueIndex { name: "uq_salary_templates_code", table: "salary_templates", fields: &["template_code"], when: None },
    UniqueIndex { name: "uq_leave_policies_code", table: "leave_policies", fields: &["policy_code"], when: None },
    UniqueIndex {
        name: "uq_leave_applications_number",
        table: "leave_applications",
        fields: &["application_number"],
        when: None,
    },
    UniqueIndex {
        name: "uq_leave_balances_period",
        table: "leave_balances",
        fields: &["employee_master_id", "leave_policy_id", "year"],
        when: None,
    },
    UniqueIndex { name: "uq_camera_devices_code", table: "camera_devices", fields: &["device_code"], when: None },
    UniqueIndex {
        name: "uq_face_enrollments_employee",
        table: "face_enrollments",
        fields: &["employee_master_id"],
        when: None,
    },
    UniqueIndex { name: "uq_users_username", table: "users", fields: &["username"], when: None },
    UniqueIndex { name: "uq_refresh_tokens_jti", table: "refresh_tokens", fields: &["jti"], when: None },
];

/// One predicate over a document field.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(&'static str, Value),
    In(&'static str, Vec<Value>),
    /// Case-insensitive substring match on a text field.
    Contains(&'static str, String),
    Gte(&'static str, Value),
    Lte(&'static str, Value),
    /// Satisfied when at least one inner condition is.
    Any(Vec<Condition>),
}

/// Conjunction of conditions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub conditions: Vec<Condition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &'static str, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Eq(field, value.into()));
        self
    }

    pub fn eq_opt<V: Into<Value>>(self, field: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.eq(field, v),
            None => self,
        }
    }

    pub fn is_in<V: Into<Value>>(mut self, field: &'static str, values: impl IntoIterator<Item = V>) -> Self {
        self.conditions
            .push(Condition::In(field, values.into_iter().map(Into::into).collect()));
        self
    }

    pub fn gte(mut self, field: &'static str, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Gte(field, value.into()));
        self
    }

    pub fn lte(mut self, field: &'static str, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Lte(field, value.into()));
        self
    }

    pub fn any(mut self, conditions: Vec<Condition>) -> Self {
        self.conditions.push(Condition::Any(conditions));
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub field: &'static str,
    pub descending: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filter: Filter,
    pub order: Option<Order>,
    pub limit: Option<u64>,
}

impl Query {
    pub fn new(filter: Filter) -> Self {
        Self { filter, ..Default::default() }
    }

    pub fn newest_first(self, field: &'static str) -> Self {
        Self { order: Some(Order { field, descending: true }), ..self }
    }

    pub fn limit(self, limit: u64) -> Self {
        Self { limit: Some(limit), ..self }
    }
}

/// Backend contract: untyped JSON documents addressed by table and id.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert(&self, table: &'static str, id: &str, doc: Value) -> Result<(), StoreError>;

    async fn get(&self, table: &'static str, id: &str) -> Result<Option<Value>, StoreError>;

    async fn find_many(&self, table: &'static str, query: &Query) -> Result<Vec<Value>, StoreError>;

    async fn count(&self, table: &'static str, filter: &Filter) -> Result<u64, StoreError>;

    /// Returns false when no document with `id` exists.
    async fn replace(&self, table: &'static str, id: &str, doc: Value) -> Result<bool, StoreError>;

    async fn delete(&self, table: &'static str, id: &str) -> Result<bool, StoreError>;

    /// Atomically increments the counter for `scope` and returns the new value
    /// (the first call for a scope returns 1).
    async fn next_sequence(&self, scope: &str) -> Result<u64, StoreError>;
}

/// Typed handle over a [`RecordStore`]; cheap to clone and injected into
/// every service.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn RecordStore>,
}

impl Store {
    pub fn new(backend: Arc<dyn RecordStore>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::default()))
    }

    pub async fn create<R: Record>(&self, record: &R) -> Result<(), StoreError> {
        let doc = serde_json::to_value(record)?;
        self.backend.insert(R::TABLE, record.id(), doc).await
    }

    pub async fn find<R: Record>(&self, id: &str) -> Result<Option<R>, StoreError> {
        match self.backend.get(R::TABLE, id).await? {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    pub async fn find_first<R: Record>(&self, filter: Filter) -> Result<Option<R>, StoreError> {
        let mut found = self.find_many::<R>(Query::new(filter).limit(1)).await?;
        Ok(found.pop())
    }

    pub async fn find_many<R: Record>(&self, query: Query) -> Result<Vec<R>, StoreError> {
        self.backend
            .find_many(R::TABLE, &query)
            .await?
            .into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(StoreError::from))
            .collect()
    }

    /// Batched lookup keyed by id; unknown ids are simply absent from the map.
    pub async fn find_by_ids<R: Record>(
        &self,
        ids: impl IntoIterator<Item = String>,
    ) -> Result<HashMap<String, R>, StoreError> {
        let ids: HashSet<String> = ids.into_iter().filter(|id| !id.is_empty()).collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let records = self
            .find_many::<R>(Query::new(Filter::new().is_in("id", ids)))
            .await?;

        Ok(records
            .into_iter()
            .map(|r| (r.id().to_string(), r))
            .collect())
    }

    pub async fn count<R: Record>(&self, filter: Filter) -> Result<u64, StoreError> {
        self.backend.count(R::TABLE, &filter).await
    }

    pub async fn update<R: Record>(&self, record: &R) -> Result<(), StoreError> {
        let doc = serde_json::to_value(record)?;
        if self.backend.replace(R::TABLE, record.id(), doc).await? {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }

    pub async fn delete<R: Record>(&self, id: &str) -> Result<bool, StoreError> {
        self.backend.delete(R::TABLE, id).await
    }

    pub async fn next_sequence(&self, scope: &str) -> Result<u64, StoreError> {
        self.backend.next_sequence(scope).await
    }
}

/// New opaque record id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
