//! Turns a model table into a deployment plan: deterministic resource names,
//! per-model creation requests, the endpoint configuration that binds them,
//! and the order in which a backend must create them.

pub mod builder;
pub mod config;
pub mod graph;
pub mod identity;
pub mod policy;
pub mod request;

pub use builder::{
    build_endpoint_config_request, build_endpoint_request, build_model_request,
    DeploymentBuilder, DeploymentPlan,
};
pub use config::{ContainerImage, DeployConfig};
pub use graph::{Dependency, DependencyGraph, ResourceKind, ResourceRef};
pub use identity::{compute_deploy_suffix, compute_names, DeploySuffix, DeploymentIdentity};
pub use policy::{bucket_read_policy, Effect, PolicyStatement};
pub use request::{
    ContainerDefinition, EndpointConfigRequest, EndpointRequest, ModelCreationRequest,
    ProductionVariant,
};
