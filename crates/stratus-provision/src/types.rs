use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stratus_common::ProvisioningError;
use stratus_plan::{EndpointConfigRequest, EndpointRequest, ModelCreationRequest, ResourceRef};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CreateOutcome {
    Created,
    /// An endpoint with the same name already existed and now points at the
    /// new configuration.
    Updated,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedResource {
    pub resource: ResourceRef,
    pub arn: String,
    pub outcome: CreateOutcome,
}

/// The external control plane. Each call either creates the resource or
/// returns the platform's refusal; no call is retried.
#[async_trait]
pub trait ProvisioningBackend: Send + Sync {
    async fn create_model(
        &self,
        req: &ModelCreationRequest,
    ) -> Result<CreatedResource, ProvisioningError>;

    async fn create_endpoint_config(
        &self,
        req: &EndpointConfigRequest,
    ) -> Result<CreatedResource, ProvisioningError>;

    async fn create_endpoint(
        &self,
        req: &EndpointRequest,
    ) -> Result<CreatedResource, ProvisioningError>;

    /// Human-readable name for logging.
    fn name(&self) -> &'static str;
}
