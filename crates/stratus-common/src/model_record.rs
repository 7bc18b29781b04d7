use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::instance_type::InstanceType;
use crate::model_data::ModelDataRef;

/// Container environment keys understood by the TGI serving image.
pub mod env {
    pub const HF_MODEL_ID: &str = "HF_MODEL_ID";
    pub const MODEL_CACHE_ROOT: &str = "MODEL_CACHE_ROOT";
    pub const SM_NUM_GPUS: &str = "SM_NUM_GPUS";
    pub const DTYPE: &str = "DTYPE";
    pub const MAX_INPUT_LENGTH: &str = "MAX_INPUT_LENGTH";
    pub const MAX_TOTAL_TOKENS: &str = "MAX_TOTAL_TOKENS";
    pub const MAX_BATCH_TOTAL_TOKENS: &str = "MAX_BATCH_TOTAL_TOKENS";
}

/// One deployable model variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelRecord {
    /// Unique within the table. Doubles as the variant name on the endpoint.
    pub name: String,

    /// Key into the prompt template table. Not validated here.
    pub prompt_template_name: String,

    pub instance_type: InstanceType,

    /// Optional `scheme://bucket/key` URI of packaged weights.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_data: Option<String>,

    /// Passed verbatim to the serving container.
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
}

impl ModelRecord {
    pub fn new(
        name: impl Into<String>,
        prompt_template_name: impl Into<String>,
        instance_type: InstanceType,
        hf_model_id: impl Into<String>,
    ) -> Self {
        let mut environment = BTreeMap::new();
        environment.insert(env::HF_MODEL_ID.to_string(), hf_model_id.into());
        Self {
            name: name.into(),
            prompt_template_name: prompt_template_name.into(),
            instance_type,
            model_data: None,
            environment,
        }
    }

    pub fn with_model_data(mut self, uri: impl Into<String>) -> Self {
        self.model_data = Some(uri.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(key.into(), value.into());
        self
    }

    pub fn hf_model_id(&self) -> Option<&str> {
        self.environment.get(env::HF_MODEL_ID).map(String::as_str)
    }

    /// Parses `model_data`, if any.
    pub fn model_data_ref(&self) -> Result<Option<ModelDataRef>, ConfigurationError> {
        self.model_data.as_deref().map(ModelDataRef::parse).transpose()
    }

    /// Checks what can be checked without the platform: required
    /// environment and a well-formed weights URI.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.hf_model_id().is_none_or(str::is_empty) {
            return Err(ConfigurationError::MissingEnvironmentKey {
                model: self.name.clone(),
                key: env::HF_MODEL_ID,
            });
        }
        self.model_data_ref()?;
        Ok(())
    }
}
