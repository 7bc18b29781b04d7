use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stratus_common::{builtin_template, ConfigurationError, ModelRecord};
use tracing::{debug, info, warn};

use crate::config::DeployConfig;
use crate::graph::{DependencyGraph, ResourceRef};
use crate::identity::{validate_resource_name, DeploymentIdentity};
use crate::policy::bucket_read_policy;
use crate::request::{
    ContainerDefinition, EndpointConfigRequest, EndpointRequest, ModelCreationRequest,
    ProductionVariant,
};

const VARIANT_WEIGHT: f32 = 1.0;
const VARIANT_INSTANCE_COUNT: u32 = 1;

/// Everything needed to stand up one endpoint, in a form any provisioning
/// backend can consume.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeploymentPlan {
    pub identity: DeploymentIdentity,
    pub models: Vec<ModelCreationRequest>,
    pub endpoint_config: EndpointConfigRequest,
    pub endpoint: EndpointRequest,
    pub dependencies: DependencyGraph,
}

impl DeploymentPlan {
    pub fn creation_order(&self) -> Result<Vec<ResourceRef>, ConfigurationError> {
        self.dependencies.creation_order()
    }
}

#[derive(Debug, Clone)]
pub struct DeploymentBuilder {
    config: DeployConfig,
}

impl DeploymentBuilder {
    pub fn new(config: DeployConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DeployConfig {
        &self.config
    }

    /// Single pass over the table. Fails on the first configuration error;
    /// nothing is sent anywhere.
    pub fn build(
        &self,
        records: &[ModelRecord],
        now: DateTime<Utc>,
    ) -> Result<DeploymentPlan, ConfigurationError> {
        if records.is_empty() {
            return Err(ConfigurationError::EmptyModelTable);
        }
        check_unique_names(records)?;

        let identity = DeploymentIdentity::new(now, &self.config)?;
        info!(
            endpoint = %identity.endpoint_name,
            endpoint_config = %identity.endpoint_config_name,
            models = records.len(),
            "building deployment plan"
        );

        let models = records
            .iter()
            .map(|r| build_model_request(r, &identity, &self.config))
            .collect::<Result<Vec<_>, _>>()?;

        let endpoint_config =
            build_endpoint_config_request(&models, &identity.endpoint_config_name);
        let endpoint = build_endpoint_request(&endpoint_config, &identity.endpoint_name);

        let mut dependencies = DependencyGraph::new();
        for m in &models {
            dependencies.add_node(m.resource_ref());
        }
        for dep in &endpoint_config.depends_on {
            dependencies.add_dependency(endpoint_config.resource_ref(), dep.clone());
        }
        for dep in &endpoint.depends_on {
            dependencies.add_dependency(endpoint.resource_ref(), dep.clone());
        }
        dependencies.creation_order()?;

        Ok(DeploymentPlan {
            identity,
            models,
            endpoint_config,
            endpoint,
            dependencies,
        })
    }
}

fn check_unique_names(records: &[ModelRecord]) -> Result<(), ConfigurationError> {
    let mut seen = HashSet::new();
    for r in records {
        if !seen.insert(r.name.as_str()) {
            return Err(ConfigurationError::DuplicateModelName(r.name.clone()));
        }
    }
    Ok(())
}

pub fn build_model_request(
    record: &ModelRecord,
    identity: &DeploymentIdentity,
    config: &DeployConfig,
) -> Result<ModelCreationRequest, ConfigurationError> {
    record.validate()?;

    let model_name = identity.model_resource_name(&record.name);
    validate_resource_name(&model_name)?;

    if builtin_template(&record.prompt_template_name).is_none() {
        warn!(
            model = %record.name,
            template = %record.prompt_template_name,
            "prompt template not in built-in table"
        );
    }

    let model_data = record.model_data_ref()?;
    let role_policy = model_data
        .iter()
        .map(|d| bucket_read_policy(&config.partition, &d.bucket))
        .collect();

    debug!(model = %model_name, instance_type = %record.instance_type, "model request");

    Ok(ModelCreationRequest {
        model_name,
        variant_name: record.name.clone(),
        instance_type: record.instance_type.clone(),
        container: ContainerDefinition {
            image: config.image_uri(),
            model_data,
            environment: record.environment.clone(),
        },
        role_policy,
    })
}

/// One variant per model, in input order.
pub fn build_endpoint_config_request(
    model_requests: &[ModelCreationRequest],
    endpoint_config_name: &str,
) -> EndpointConfigRequest {
    EndpointConfigRequest {
        endpoint_config_name: endpoint_config_name.to_string(),
        variants: model_requests
            .iter()
            .map(|m| ProductionVariant {
                variant_name: m.variant_name.clone(),
                model_name: m.model_name.clone(),
                initial_variant_weight: VARIANT_WEIGHT,
                initial_instance_count: VARIANT_INSTANCE_COUNT,
                instance_type: m.instance_type.clone(),
            })
            .collect(),
        depends_on: model_requests.iter().map(|m| m.resource_ref()).collect(),
    }
}

pub fn build_endpoint_request(
    endpoint_config: &EndpointConfigRequest,
    endpoint_name: &str,
) -> EndpointRequest {
    EndpointRequest {
        endpoint_name: endpoint_name.to_string(),
        endpoint_config_name: endpoint_config.endpoint_config_name.clone(),
        depends_on: vec![endpoint_config.resource_ref()],
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use stratus_common::{builtin_models, InstanceType};

    use super::*;
    use crate::graph::ResourceKind;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 9, 30, 7).unwrap()
    }

    fn make_record(name: &str, instance_type: &str) -> ModelRecord {
        ModelRecord::new(name, "llama2", InstanceType::new(instance_type), "org/model")
    }

    #[test]
    fn test_model_names_carry_suffix_and_are_distinct() {
        let plan = DeploymentBuilder::new(DeployConfig::default())
            .build(&builtin_models(), fixed_now())
            .unwrap();

        let names: Vec<_> = plan.models.iter().map(|m| m.model_name.as_str()).collect();
        assert_eq!(names, vec!["elyza-20240305093007", "elyza-s3-20240305093007"]);
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn test_identity_names() {
        let plan = DeploymentBuilder::new(DeployConfig::default().with_stage("dev"))
            .build(&builtin_models(), fixed_now())
            .unwrap();
        assert_eq!(
            plan.identity.endpoint_config_name,
            "dev-llm-jp-endpoint-config-20240305093007"
        );
        assert_eq!(plan.identity.endpoint_name, "dev-llm-jp-endpoint");
        assert_eq!(plan.endpoint.endpoint_config_name, plan.identity.endpoint_config_name);
    }

    #[test]
    fn test_policy_scoped_to_model_data_bucket() {
        let records = vec![
            make_record("plain", InstanceType::G5_2XLARGE),
            make_record("packed", InstanceType::G5_2XLARGE)
                .with_model_data("s3://bucket-x/path/to/model.tar.gz"),
        ];
        let plan = DeploymentBuilder::new(DeployConfig::default())
            .build(&records, fixed_now())
            .unwrap();

        assert!(plan.models[0].role_policy.is_empty());
        assert_eq!(plan.models[0].container.model_data, None);

        let packed = &plan.models[1];
        let data = packed.container.model_data.as_ref().unwrap();
        assert_eq!(data.bucket, "bucket-x");
        assert_eq!(data.key, "/path/to/model.tar.gz");
        assert_eq!(packed.role_policy.len(), 1);
        assert_eq!(
            packed.role_policy[0].resources,
            vec!["arn:aws:s3:::bucket-x", "arn:aws:s3:::bucket-x/*"]
        );
    }

    #[test]
    fn test_variants_mirror_records_in_order() {
        let records = vec![
            make_record("c", InstanceType::G5_12XLARGE),
            make_record("a", InstanceType::G5_XLARGE),
            make_record("b", "ml.inf2.xlarge"),
        ];
        let plan = DeploymentBuilder::new(DeployConfig::default())
            .build(&records, fixed_now())
            .unwrap();

        let variants = &plan.endpoint_config.variants;
        assert_eq!(variants.len(), records.len());
        for (v, r) in variants.iter().zip(&records) {
            assert_eq!(v.variant_name, r.name);
            assert_eq!(v.instance_type, r.instance_type);
            assert_eq!(v.initial_variant_weight, 1.0);
            assert_eq!(v.initial_instance_count, 1);
            assert_eq!(v.model_name, format!("{}-20240305093007", r.name));
        }
    }

    #[test]
    fn test_config_created_after_every_model() {
        let plan = DeploymentBuilder::new(DeployConfig::default())
            .build(&builtin_models(), fixed_now())
            .unwrap();
        let order = plan.creation_order().unwrap();

        let config_pos = order
            .iter()
            .position(|r| r.kind == ResourceKind::EndpointConfig)
            .unwrap();
        for m in &plan.models {
            let pos = order.iter().position(|r| *r == m.resource_ref()).unwrap();
            assert!(pos < config_pos);
        }
        assert_eq!(order.last().unwrap(), &plan.endpoint.resource_ref());
        assert_eq!(plan.dependencies.first_violation(&order), None);
        assert_eq!(plan.endpoint_config.depends_on.len(), plan.models.len());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let records = vec![
            make_record("dup", InstanceType::G5_2XLARGE),
            make_record("other", InstanceType::G5_2XLARGE),
            make_record("dup", InstanceType::G5_XLARGE),
        ];
        let err = DeploymentBuilder::new(DeployConfig::default())
            .build(&records, fixed_now())
            .unwrap_err();
        assert_eq!(err, ConfigurationError::DuplicateModelName("dup".to_string()));
    }

    #[test]
    fn test_malformed_model_data_rejected() {
        let records = vec![make_record("m", InstanceType::G5_2XLARGE).with_model_data("s3:bucket")];
        let err = DeploymentBuilder::new(DeployConfig::default())
            .build(&records, fixed_now())
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::MalformedModelData { .. }));
    }

    #[test]
    fn test_wildcard_bucket_rejected_before_any_grant() {
        let records = vec![
            make_record("ok", InstanceType::G5_2XLARGE),
            make_record("wild", InstanceType::G5_2XLARGE).with_model_data("s3://*/model.tar.gz"),
        ];
        let err = DeploymentBuilder::new(DeployConfig::default())
            .build(&records, fixed_now())
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::MalformedModelData {
                uri: "s3://*/model.tar.gz".to_string(),
                reason: "invalid bucket name",
            }
        );
    }

    #[test]
    fn test_empty_table_rejected() {
        let err = DeploymentBuilder::new(DeployConfig::default())
            .build(&[], fixed_now())
            .unwrap_err();
        assert_eq!(err, ConfigurationError::EmptyModelTable);
    }

    #[test]
    fn test_unknown_instance_type_passes_through() {
        let records = vec![make_record("m", "ml.made.up")];
        let plan = DeploymentBuilder::new(DeployConfig::default())
            .build(&records, fixed_now())
            .unwrap();
        assert_eq!(plan.models[0].instance_type.as_str(), "ml.made.up");
    }

    #[test]
    fn test_plan_serializes() {
        let plan = DeploymentBuilder::new(DeployConfig::default())
            .build(&builtin_models(), fixed_now())
            .unwrap();
        let v = serde_json::to_value(&plan).unwrap();
        assert_eq!(v["identity"]["deploy_suffix"], "-20240305093007");
        assert_eq!(v["endpoint_config"]["variants"][1]["variant_name"], "elyza-s3");
        let back: DeploymentPlan = serde_json::from_value(v).unwrap();
        assert_eq!(back, plan);
    }
}
