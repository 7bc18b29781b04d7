use serde::{Deserialize, Serialize};

/// Serving container image, resolved like a deep-learning-container
/// reference: `<account>.dkr.ecr.<region>.amazonaws.com/<repository>:<tag>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContainerImage {
    /// Registry account hosting the image. `None` leaves the reference
    /// unqualified (`<repository>:<tag>`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_account: Option<String>,
    pub repository: String,
    pub tag: String,
}

impl Default for ContainerImage {
    fn default() -> Self {
        Self {
            registry_account: Some("763104351884".to_string()),
            repository: "huggingface-pytorch-tgi-inference".to_string(),
            tag: "2.1.1-tgi1.4.5-gpu-py310-cu121-ubuntu22.04".to_string(),
        }
    }
}

impl ContainerImage {
    pub fn uri(&self, region: &str) -> String {
        match self.registry_account.as_deref() {
            Some(account) => format!(
                "{account}.dkr.ecr.{region}.amazonaws.com/{}:{}",
                self.repository, self.tag
            ),
            None => format!("{}:{}", self.repository, self.tag),
        }
    }
}

/// Everything that used to be a literal in the deployment definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeployConfig {
    /// Environment tag prefixed to the config and endpoint names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,

    #[serde(default = "default_region")]
    pub region: String,

    /// ARN partition used when scoping storage grants ("aws", "aws-cn", ...).
    #[serde(default = "default_partition")]
    pub partition: String,

    #[serde(default)]
    pub image: ContainerImage,

    #[serde(default = "default_endpoint_config_base_name")]
    pub endpoint_config_base_name: String,

    #[serde(default = "default_endpoint_base_name")]
    pub endpoint_base_name: String,
}

fn default_region() -> String {
    "ap-northeast-1".to_string()
}

fn default_partition() -> String {
    "aws".to_string()
}

fn default_endpoint_config_base_name() -> String {
    "llm-jp-endpoint-config".to_string()
}

fn default_endpoint_base_name() -> String {
    "llm-jp-endpoint".to_string()
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            stage: None,
            region: default_region(),
            partition: default_partition(),
            image: ContainerImage::default(),
            endpoint_config_base_name: default_endpoint_config_base_name(),
            endpoint_base_name: default_endpoint_base_name(),
        }
    }
}

impl DeployConfig {
    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    pub fn image_uri(&self) -> String {
        self.image.uri(&self.region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_uri() {
        let cfg = DeployConfig::default();
        assert_eq!(
            cfg.image_uri(),
            "763104351884.dkr.ecr.ap-northeast-1.amazonaws.com/huggingface-pytorch-tgi-inference:2.1.1-tgi1.4.5-gpu-py310-cu121-ubuntu22.04"
        );

        let unqualified = ContainerImage {
            registry_account: None,
            repository: "tgi".to_string(),
            tag: "latest".to_string(),
        };
        assert_eq!(unqualified.uri("us-east-1"), "tgi:latest");
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let cfg: DeployConfig = serde_json::from_str(r#"{ "stage": "dev" }"#).unwrap();
        assert_eq!(cfg, DeployConfig::default().with_stage("dev"));
    }
}
