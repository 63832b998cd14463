//! Table store collaborator
//!
//! The backend is a generic REST table store: every resource is addressable
//! at `tables/<name>[/<id>]` and list calls answer `{ "data": [...] }`.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ClinicError, Result};
use crate::models::Record;

#[cfg(feature = "http")]
mod http;
mod memory;

#[cfg(feature = "http")]
pub use http::HttpTableStore;
pub use memory::MemoryTableStore;

/// Every table the dashboard reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resource {
    Patients,
    DiseaseHistory,
    Appointments,
    Vitals,
    Medications,
    LabResults,
    SoapNotes,
    Messages,
    Prescriptions,
}

impl Resource {
    pub const ALL: [Resource; 9] = [
        Resource::Patients,
        Resource::DiseaseHistory,
        Resource::Appointments,
        Resource::Vitals,
        Resource::Medications,
        Resource::LabResults,
        Resource::SoapNotes,
        Resource::Messages,
        Resource::Prescriptions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Patients => "patients",
            Resource::DiseaseHistory => "disease_history",
            Resource::Appointments => "appointments",
            Resource::Vitals => "vitals",
            Resource::Medications => "medications",
            Resource::LabResults => "lab_results",
            Resource::SoapNotes => "soap_notes",
            Resource::Messages => "messages",
            Resource::Prescriptions => "prescriptions",
        }
    }

    /// Path relative to the store root, e.g. `tables/vitals/42`.
    pub fn path(&self, id: Option<&str>) -> String {
        match id {
            Some(id) => format!("tables/{}/{}", self.as_str(), id),
            None => format!("tables/{}", self.as_str()),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = ClinicError;

    fn from_str(s: &str) -> Result<Self> {
        Resource::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| ClinicError::Validation(format!("unknown table: {}", s)))
    }
}

/// CRUD surface of the table store, on raw JSON.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// `GET tables/<r>`; a response without `data` is an empty table.
    async fn list(&self, resource: Resource) -> Result<Vec<Value>>;

    /// `POST tables/<r>`, answering the created entity.
    async fn create(&self, resource: Resource, body: Value) -> Result<Value>;

    /// `PUT tables/<r>/<id>`, answering the updated entity.
    async fn update(&self, resource: Resource, id: &str, body: Value) -> Result<Value>;

    /// `DELETE tables/<r>/<id>`. Any response body is ignored.
    async fn delete(&self, resource: Resource, id: &str) -> Result<()>;
}

/// Decode every row of `R::RESOURCE`.
pub async fn fetch_all<R>(store: &dyn TableStore) -> Result<Vec<R>>
where
    R: Record + DeserializeOwned,
{
    let rows = store.list(R::RESOURCE).await?;
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(|e| ClinicError::decode(R::RESOURCE, e)))
        .collect()
}

/// POST when `id` is `None`, PUT otherwise.
pub async fn upsert<B>(
    store: &dyn TableStore,
    resource: Resource,
    id: Option<&str>,
    body: &B,
) -> Result<Value>
where
    B: Serialize + ?Sized,
{
    let body = serde_json::to_value(body).map_err(|e| ClinicError::decode(resource, e))?;
    match id {
        Some(id) => store.update(resource, id, body).await,
        None => store.create(resource, body).await,
    }
}

/// Pull the rows out of a `{ "data": [...] }` envelope.
pub(crate) fn unwrap_envelope(resource: Resource, payload: Value) -> Result<Vec<Value>> {
    match payload {
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(rows)) => Ok(rows),
            Some(Value::Null) | None => Ok(Vec::new()),
            Some(other) => Err(ClinicError::Validation(format!(
                "tables/{} answered a non-list data field: {}",
                resource, other
            ))),
        },
        other => Err(ClinicError::Validation(format!(
            "tables/{} answered a non-object envelope: {}",
            resource, other
        ))),
    }
}

pub(crate) fn count_request(resource: Resource, method: &'static str) {
    metrics::increment_counter!(
        "clinic_table_requests_total",
        "resource" => resource.as_str(),
        "method" => method
    );
}
