use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stratus_common::ConfigurationError;

use crate::config::DeployConfig;

const MAX_RESOURCE_NAME_LEN: usize = 63;

/// Timestamp-derived disambiguator appended to versioned resource names,
/// e.g. `-20240305093007`. Includes its own leading hyphen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeploySuffix(String);

impl DeploySuffix {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeploySuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// UTC time at seconds precision with every separator dropped.
pub fn compute_deploy_suffix(now: DateTime<Utc>) -> DeploySuffix {
    DeploySuffix(format!("-{}", now.format("%Y%m%d%H%M%S")))
}

/// Returns `(endpoint_config_name, endpoint_name)`.
///
/// Only the config name is versioned; the endpoint keeps its address
/// across redeploys.
pub fn compute_names(
    stage: Option<&str>,
    suffix: &DeploySuffix,
    config_base_name: &str,
    endpoint_base_name: &str,
) -> (String, String) {
    let prefix = match stage {
        Some(s) if !s.is_empty() => format!("{s}-"),
        _ => String::new(),
    };
    (
        format!("{prefix}{config_base_name}{suffix}"),
        format!("{prefix}{endpoint_base_name}"),
    )
}

/// Platform naming rule: `[A-Za-z0-9](-*[A-Za-z0-9])*`, at most 63 chars.
pub fn validate_resource_name(name: &str) -> Result<(), ConfigurationError> {
    let invalid = |reason| ConfigurationError::InvalidResourceName {
        name: name.to_string(),
        reason,
    };

    if name.is_empty() {
        return Err(invalid("empty"));
    }
    if name.len() > MAX_RESOURCE_NAME_LEN {
        return Err(invalid("longer than 63 characters"));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(invalid("only ASCII letters, digits and '-' are allowed"));
    }
    if name.starts_with('-') || name.ends_with('-') {
        return Err(invalid("must start and end with a letter or digit"));
    }
    Ok(())
}

/// Names shared by every resource of one invocation. Computed once, never
/// persisted: the next invocation gets a new suffix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentIdentity {
    pub deploy_suffix: DeploySuffix,
    pub endpoint_config_name: String,
    pub endpoint_name: String,
}

impl DeploymentIdentity {
    pub fn new(now: DateTime<Utc>, config: &DeployConfig) -> Result<Self, ConfigurationError> {
        let deploy_suffix = compute_deploy_suffix(now);
        let (endpoint_config_name, endpoint_name) = compute_names(
            config.stage.as_deref(),
            &deploy_suffix,
            &config.endpoint_config_base_name,
            &config.endpoint_base_name,
        );
        validate_resource_name(&endpoint_config_name)?;
        validate_resource_name(&endpoint_name)?;

        Ok(Self {
            deploy_suffix,
            endpoint_config_name,
            endpoint_name,
        })
    }

    pub fn model_resource_name(&self, record_name: &str) -> String {
        format!("{record_name}{}", self.deploy_suffix)
    }
}
