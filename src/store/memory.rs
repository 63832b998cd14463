use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use serde_json::Value;
use uuid::Uuid;

use super::{count_request, Resource, TableStore};
use crate::error::{ClinicError, Result};

/// In-process table store with the same contract as the REST backend.
///
/// Backs the `--memory` demo mode and the test suite. Tables, or single rows,
/// can be marked unavailable to exercise the error paths.
#[derive(Default)]
pub struct MemoryTableStore {
    tables: DashMap<Resource, Vec<Value>>,
    unavailable: DashSet<Resource>,
    unavailable_rows: DashSet<(Resource, String)>,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert rows as-is, assigning ids to rows without one.
    pub fn seed(&self, resource: Resource, rows: impl IntoIterator<Item = Value>) {
        let mut table = self.tables.entry(resource).or_default();
        for row in rows {
            table.push(with_id(row));
        }
    }

    /// Every call against `resource` answers 503 until `restore` is called.
    pub fn fail(&self, resource: Resource) {
        self.unavailable.insert(resource);
    }

    pub fn restore(&self, resource: Resource) {
        self.unavailable.remove(&resource);
    }

    /// `update` and `delete` of row `id` answer 503; the rest of the table
    /// keeps working.
    pub fn fail_row(&self, resource: Resource, id: &str) {
        self.unavailable_rows.insert((resource, id.to_string()));
    }

    pub fn restore_row(&self, resource: Resource, id: &str) {
        self.unavailable_rows.remove(&(resource, id.to_string()));
    }

    pub fn len(&self, resource: Resource) -> usize {
        self.tables.get(&resource).map(|t| t.len()).unwrap_or(0)
    }

    pub fn is_empty(&self, resource: Resource) -> bool {
        self.len(resource) == 0
    }

    fn check(&self, resource: Resource, method: &'static str) -> Result<()> {
        self.check_row(resource, method, None)
    }

    fn check_row(&self, resource: Resource, method: &'static str, id: Option<&str>) -> Result<()> {
        count_request(resource, method);
        let row_down = id.is_some_and(|id| {
            self.unavailable_rows
                .contains(&(resource, id.to_string()))
        });
        if row_down || self.unavailable.contains(&resource) {
            return Err(ClinicError::Status {
                resource,
                method,
                status: 503,
            });
        }
        Ok(())
    }
}

fn with_id(mut row: Value) -> Value {
    if let Value::Object(map) = &mut row {
        let missing = map
            .get("id")
            .and_then(Value::as_str)
            .map_or(true, str::is_empty);
        if missing {
            map.insert("id".into(), Value::String(Uuid::new_v4().to_string()));
        }
    }
    row
}

fn row_id(row: &Value) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

#[async_trait]
impl TableStore for MemoryTableStore {
    async fn list(&self, resource: Resource) -> Result<Vec<Value>> {
        self.check(resource, "GET")?;
        Ok(self
            .tables
            .get(&resource)
            .map(|t| t.value().clone())
            .unwrap_or_default())
    }

    async fn create(&self, resource: Resource, body: Value) -> Result<Value> {
        self.check(resource, "POST")?;
        if !body.is_object() {
            return Err(ClinicError::Validation(format!(
                "tables/{} expects a JSON object",
                resource
            )));
        }
        let row = with_id(body);
        self.tables.entry(resource).or_default().push(row.clone());
        Ok(row)
    }

    async fn update(&self, resource: Resource, id: &str, body: Value) -> Result<Value> {
        self.check_row(resource, "PUT", Some(id))?;
        let Value::Object(mut fields) = body else {
            return Err(ClinicError::Validation(format!(
                "tables/{} expects a JSON object",
                resource
            )));
        };
        let mut table = self.tables.entry(resource).or_default();
        let slot = table
            .iter_mut()
            .find(|row| row_id(row) == Some(id))
            .ok_or_else(|| ClinicError::not_found(resource, id))?;
        fields.insert("id".into(), Value::String(id.to_string()));
        *slot = Value::Object(fields);
        Ok(slot.clone())
    }

    async fn delete(&self, resource: Resource, id: &str) -> Result<()> {
        self.check_row(resource, "DELETE", Some(id))?;
        let mut table = self.tables.entry(resource).or_default();
        let before = table.len();
        table.retain(|row| row_id(row) != Some(id));
        if table.len() == before {
            return Err(ClinicError::not_found(resource, id));
        }
        Ok(())
    }
}
