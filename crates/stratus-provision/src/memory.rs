use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use stratus_common::{InstanceType, ProvisioningError};
use stratus_plan::{
    EndpointConfigRequest, EndpointRequest, ModelCreationRequest, ResourceKind, ResourceRef,
};
use tokio::sync::RwLock;

use crate::types::{CreateOutcome, CreatedResource, ProvisioningBackend};

/// In-process stand-in for the control plane. Rejects what the real
/// platform rejects: unknown instance types, reused model/config names,
/// and references to resources that do not exist yet.
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    inner: Arc<RwLock<Inner>>,
    region: String,
    account: String,
}

#[derive(Debug, Default)]
struct Inner {
    models: BTreeMap<String, ModelCreationRequest>,
    endpoint_configs: BTreeMap<String, EndpointConfigRequest>,
    /// endpoint name -> bound endpoint config name
    endpoints: BTreeMap<String, String>,
    log: Vec<ResourceRef>,
}

impl MemoryBackend {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
            region: region.into(),
            account: "000000000000".to_string(),
        }
    }

    fn arn(&self, resource: &ResourceRef) -> String {
        format!(
            "arn:aws:sagemaker:{}:{}:{}/{}",
            self.region,
            self.account,
            resource.kind.as_str(),
            resource.name.to_ascii_lowercase()
        )
    }

    fn record(
        &self,
        inner: &mut Inner,
        resource: ResourceRef,
        outcome: CreateOutcome,
    ) -> CreatedResource {
        let arn = self.arn(&resource);
        inner.log.push(resource.clone());
        CreatedResource {
            resource,
            arn,
            outcome,
        }
    }

    /// Every successful call, in the order it happened.
    pub async fn creation_log(&self) -> Vec<ResourceRef> {
        self.inner.read().await.log.clone()
    }

    pub async fn endpoint_binding(&self, endpoint_name: &str) -> Option<String> {
        self.inner.read().await.endpoints.get(endpoint_name).cloned()
    }

    pub async fn model_names(&self) -> Vec<String> {
        self.inner.read().await.models.keys().cloned().collect()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new("ap-northeast-1")
    }
}

fn check_instance_type(resource: &str, t: &InstanceType) -> Result<(), ProvisioningError> {
    if t.is_known() {
        Ok(())
    } else {
        Err(ProvisioningError::UnsupportedInstanceType {
            resource: resource.to_string(),
            instance_type: t.to_string(),
        })
    }
}

#[async_trait]
impl ProvisioningBackend for MemoryBackend {
    async fn create_model(
        &self,
        req: &ModelCreationRequest,
    ) -> Result<CreatedResource, ProvisioningError> {
        check_instance_type(&req.model_name, &req.instance_type)?;

        let mut inner = self.inner.write().await;
        if inner.models.contains_key(&req.model_name) {
            return Err(ProvisioningError::NameCollision {
                kind: ResourceKind::Model.as_str(),
                name: req.model_name.clone(),
            });
        }
        inner.models.insert(req.model_name.clone(), req.clone());
        Ok(self.record(&mut inner, req.resource_ref(), CreateOutcome::Created))
    }

    async fn create_endpoint_config(
        &self,
        req: &EndpointConfigRequest,
    ) -> Result<CreatedResource, ProvisioningError> {
        let mut inner = self.inner.write().await;
        if inner.endpoint_configs.contains_key(&req.endpoint_config_name) {
            return Err(ProvisioningError::NameCollision {
                kind: ResourceKind::EndpointConfig.as_str(),
                name: req.endpoint_config_name.clone(),
            });
        }
        for v in &req.variants {
            if !inner.models.contains_key(&v.model_name) {
                return Err(ProvisioningError::MissingDependency {
                    kind: ResourceKind::EndpointConfig.as_str(),
                    name: req.endpoint_config_name.clone(),
                    missing_kind: ResourceKind::Model.as_str(),
                    missing: v.model_name.clone(),
                });
            }
            check_instance_type(&req.endpoint_config_name, &v.instance_type)?;
        }
        inner
            .endpoint_configs
            .insert(req.endpoint_config_name.clone(), req.clone());
        Ok(self.record(&mut inner, req.resource_ref(), CreateOutcome::Created))
    }

    async fn create_endpoint(
        &self,
        req: &EndpointRequest,
    ) -> Result<CreatedResource, ProvisioningError> {
        let mut inner = self.inner.write().await;
        if !inner.endpoint_configs.contains_key(&req.endpoint_config_name) {
            return Err(ProvisioningError::MissingDependency {
                kind: ResourceKind::Endpoint.as_str(),
                name: req.endpoint_name.clone(),
                missing_kind: ResourceKind::EndpointConfig.as_str(),
                missing: req.endpoint_config_name.clone(),
            });
        }
        let previous = inner
            .endpoints
            .insert(req.endpoint_name.clone(), req.endpoint_config_name.clone());
        let outcome = if previous.is_some() {
            CreateOutcome::Updated
        } else {
            CreateOutcome::Created
        };
        Ok(self.record(&mut inner, req.resource_ref(), outcome))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
