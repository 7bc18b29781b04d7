use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use stratus_common::ProvisioningError;
use stratus_plan::{EndpointConfigRequest, EndpointRequest, ModelCreationRequest, ResourceRef};
use tracing::debug;

use crate::types::{CreateOutcome, CreatedResource, ProvisioningBackend};

/// Control plane reached over JSON/HTTP.
///
/// `POST {base}/v1/models`, `/v1/endpoint-configs` and `/v1/endpoints` each
/// take the corresponding request body and answer with [`CreateResponse`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResponse {
    pub arn: String,
    /// Set when an existing endpoint was rebound rather than created.
    #[serde(default)]
    pub updated: bool,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn post<T: Serialize + Sync>(
        &self,
        path: &str,
        resource: ResourceRef,
        body: &T,
    ) -> Result<CreatedResource, ProvisioningError> {
        let url = self.url(path);
        debug!(%url, %resource, "POST");

        let transport = |e: reqwest::Error| ProvisioningError::Transport {
            resource: resource.name.clone(),
            message: e.to_string(),
        };

        let mut builder = self.client.post(&url).json(body);
        if let Some(t) = &self.token {
            builder = builder.bearer_auth(t);
        }
        let resp = builder.send().await.map_err(transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
            return Err(ProvisioningError::Rejected {
                resource: resource.name.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let created: CreateResponse = resp.json().await.map_err(transport)?;
        Ok(CreatedResource {
            resource,
            arn: created.arn,
            outcome: if created.updated {
                CreateOutcome::Updated
            } else {
                CreateOutcome::Created
            },
        })
    }
}

#[async_trait]
impl ProvisioningBackend for HttpBackend {
    async fn create_model(
        &self,
        req: &ModelCreationRequest,
    ) -> Result<CreatedResource, ProvisioningError> {
        self.post("/models", req.resource_ref(), req).await
    }

    async fn create_endpoint_config(
        &self,
        req: &EndpointConfigRequest,
    ) -> Result<CreatedResource, ProvisioningError> {
        self.post("/endpoint-configs", req.resource_ref(), req).await
    }

    async fn create_endpoint(
        &self,
        req: &EndpointRequest,
    ) -> Result<CreatedResource, ProvisioningError> {
        self.post("/endpoints", req.resource_ref(), req).await
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
