use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use stratus_common::{ConfigurationError, DeployError, ProvisioningError};
use stratus_plan::{DeploymentPlan, ResourceKind, ResourceRef};
use tracing::{error, info};

use crate::types::{CreatedResource, ProvisioningBackend};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProvisionReport {
    pub endpoint_name: String,
    pub endpoint_config_name: String,
    /// In creation order.
    pub created: Vec<CreatedResource>,
}

/// Creates every resource of `plan` one at a time, in dependency order.
///
/// Stops at the first refusal and returns it; resources created before the
/// failure are left in place for the caller's pipeline to deal with.
pub async fn provision(
    plan: &DeploymentPlan,
    backend: &dyn ProvisioningBackend,
) -> Result<ProvisionReport, DeployError> {
    let order = plan.creation_order()?;
    let mut done: HashSet<ResourceRef> = HashSet::new();
    let mut created = Vec::with_capacity(order.len());

    info!(
        backend = backend.name(),
        endpoint = %plan.identity.endpoint_name,
        steps = order.len(),
        "provisioning"
    );

    for resource in order {
        if let Some(dep) = plan
            .dependencies
            .dependencies_of(&resource)
            .chain(declared_dependencies(plan, &resource))
            .find(|d| !done.contains(*d))
        {
            return Err(ProvisioningError::OrderingViolation {
                resource: resource.to_string(),
                dependency: dep.to_string(),
            }
            .into());
        }

        let result = match resource.kind {
            ResourceKind::Model => {
                let req = plan
                    .models
                    .iter()
                    .find(|m| m.model_name == resource.name)
                    .ok_or_else(|| ConfigurationError::UnknownResource(resource.to_string()))?;
                backend.create_model(req).await
            }
            ResourceKind::EndpointConfig => {
                if plan.endpoint_config.endpoint_config_name != resource.name {
                    return Err(ConfigurationError::UnknownResource(resource.to_string()).into());
                }
                backend.create_endpoint_config(&plan.endpoint_config).await
            }
            ResourceKind::Endpoint => {
                if plan.endpoint.endpoint_name != resource.name {
                    return Err(ConfigurationError::UnknownResource(resource.to_string()).into());
                }
                backend.create_endpoint(&plan.endpoint).await
            }
        };

        match result {
            Ok(c) => {
                info!(resource = %resource, arn = %c.arn, outcome = ?c.outcome, "created");
                done.insert(resource);
                created.push(c);
            }
            Err(e) => {
                error!(resource = %resource, error = %e, "creation failed");
                return Err(e.into());
            }
        }
    }

    Ok(ProvisionReport {
        endpoint_name: plan.identity.endpoint_name.clone(),
        endpoint_config_name: plan.identity.endpoint_config_name.clone(),
        created,
    })
}

/// What the request itself says it needs. A plan read back from JSON can
/// carry a graph that lacks these edges.
fn declared_dependencies<'a>(
    plan: &'a DeploymentPlan,
    resource: &ResourceRef,
) -> &'a [ResourceRef] {
    match resource.kind {
        ResourceKind::Model => &[],
        ResourceKind::EndpointConfig => &plan.endpoint_config.depends_on,
        ResourceKind::Endpoint => &plan.endpoint.depends_on,
    }
}
