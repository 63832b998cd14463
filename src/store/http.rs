use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use serde_json::Value;
use tracing::{debug, instrument};

use super::{count_request, unwrap_envelope, Resource, TableStore};
use crate::error::{ClinicError, Result};

/// Table store reached over HTTP.
#[derive(Clone)]
pub struct HttpTableStore {
    client: Client,
    base_url: String,
}

impl HttpTableStore {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let mut base_url = base_url.trim().to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, resource: Resource, id: Option<&str>) -> String {
        format!("{}{}", self.base_url, resource.path(id))
    }

    async fn send(
        &self,
        method: Method,
        resource: Resource,
        id: Option<&str>,
        body: Option<Value>,
    ) -> Result<Response> {
        let label = method_label(&method);
        count_request(resource, label);

        let mut request = self.client.request(method, self.url(resource, id));
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await?;
        let status = response.status();
        debug!(%resource, method = label, status = status.as_u16(), "table store responded");

        if !status.is_success() {
            return Err(ClinicError::Status {
                resource,
                method: label,
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn json(resource: Resource, response: Response) -> Result<Value> {
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| ClinicError::decode(resource, e))
    }
}

fn method_label(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::DELETE => "DELETE",
        _ => "OTHER",
    }
}

#[async_trait]
impl TableStore for HttpTableStore {
    #[instrument(skip(self))]
    async fn list(&self, resource: Resource) -> Result<Vec<Value>> {
        let response = self.send(Method::GET, resource, None, None).await?;
        let payload = Self::json(resource, response).await?;
        if payload.is_null() {
            return Ok(Vec::new());
        }
        unwrap_envelope(resource, payload)
    }

    #[instrument(skip(self, body))]
    async fn create(&self, resource: Resource, body: Value) -> Result<Value> {
        let response = self.send(Method::POST, resource, None, Some(body)).await?;
        Self::json(resource, response).await
    }

    #[instrument(skip(self, body))]
    async fn update(&self, resource: Resource, id: &str, body: Value) -> Result<Value> {
        let response = self.send(Method::PUT, resource, Some(id), Some(body)).await?;
        Self::json(resource, response).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, resource: Resource, id: &str) -> Result<()> {
        self.send(Method::DELETE, resource, Some(id), None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_base_and_table_path() {
        let store = HttpTableStore::new("http://clinic.local/api", Duration::from_secs(1)).unwrap();
        assert_eq!(store.base_url(), "http://clinic.local/api/");
        assert_eq!(
            store.url(Resource::DiseaseHistory, Some("d-9")),
            "http://clinic.local/api/tables/disease_history/d-9"
        );
        assert_eq!(
            store.url(Resource::Messages, None),
            "http://clinic.local/api/tables/messages"
        );
    }
}
