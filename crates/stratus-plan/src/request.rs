use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use stratus_common::{InstanceType, ModelDataRef};

use crate::graph::ResourceRef;
use crate::policy::PolicyStatement;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContainerDefinition {
    pub image: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_data: Option<ModelDataRef>,

    #[serde(default)]
    pub environment: BTreeMap<String, String>,
}

/// Creation request for one container-backed model resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelCreationRequest {
    /// Unique resource name: record name followed by the deploy suffix.
    pub model_name: String,

    /// The record's name, reused as the variant name on the endpoint.
    pub variant_name: String,

    pub instance_type: InstanceType,

    pub container: ContainerDefinition,

    /// Statements added to the model's execution role. Empty when the
    /// model pulls nothing from object storage.
    #[serde(default)]
    pub role_policy: Vec<PolicyStatement>,
}

impl ModelCreationRequest {
    pub fn resource_ref(&self) -> ResourceRef {
        ResourceRef::model(&self.model_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductionVariant {
    pub variant_name: String,
    pub model_name: String,
    pub initial_variant_weight: f32,
    pub initial_instance_count: u32,
    pub instance_type: InstanceType,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EndpointConfigRequest {
    pub endpoint_config_name: String,
    pub variants: Vec<ProductionVariant>,
    /// Every model this config binds to; all must exist first.
    pub depends_on: Vec<ResourceRef>,
}

impl EndpointConfigRequest {
    pub fn resource_ref(&self) -> ResourceRef {
        ResourceRef::endpoint_config(&self.endpoint_config_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EndpointRequest {
    pub endpoint_name: String,
    pub endpoint_config_name: String,
    pub depends_on: Vec<ResourceRef>,
}

impl EndpointRequest {
    pub fn resource_ref(&self) -> ResourceRef {
        ResourceRef::endpoint(&self.endpoint_name)
    }
}
