use std::path::Path;

use crate::error::ConfigurationError;
use crate::instance_type::InstanceType;
use crate::model_record::{env, ModelRecord};

/// The model table shipped with the binary.
pub fn builtin_models() -> Vec<ModelRecord> {
    vec![
        tgi_defaults(ModelRecord::new(
            "elyza",
            "llama2",
            InstanceType::g5_2xlarge(),
            "elyza/ELYZA-japanese-Llama-2-7b-instruct",
        )),
        tgi_defaults(
            ModelRecord::new("elyza-s3", "llama2", InstanceType::g5_2xlarge(), "/opt/ml/model")
                .with_model_data("s3://sagemaker-ap-northeast-1-867115166077/models/elyza.tar.gz")
                .with_env(env::MODEL_CACHE_ROOT, "/opt/ml/model"),
        ),
    ]
}

fn tgi_defaults(record: ModelRecord) -> ModelRecord {
    record
        .with_env(env::SM_NUM_GPUS, "1")
        .with_env(env::DTYPE, "bfloat16")
        .with_env(env::MAX_INPUT_LENGTH, "2048")
        .with_env(env::MAX_TOTAL_TOKENS, "4096")
        .with_env(env::MAX_BATCH_TOTAL_TOKENS, "8192")
}

/// Parses a JSON array of model records.
pub fn models_from_json(json: &str) -> Result<Vec<ModelRecord>, ConfigurationError> {
    serde_json::from_str(json).map_err(|e| ConfigurationError::ModelTable(e.to_string()))
}

pub fn load_models(path: &Path) -> Result<Vec<ModelRecord>, ConfigurationError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigurationError::ModelTable(format!("{}: {e}", path.display())))?;
    models_from_json(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_models_are_valid() {
        let models = builtin_models();
        assert_eq!(models.len(), 2);
        for m in &models {
            m.validate().unwrap();
            assert_eq!(m.environment.get(env::DTYPE).map(String::as_str), Some("bfloat16"));
        }
        let s3 = models[1].model_data_ref().unwrap().unwrap();
        assert_eq!(s3.bucket, "sagemaker-ap-northeast-1-867115166077");
        assert_eq!(s3.key, "/models/elyza.tar.gz");
    }

    #[test]
    fn test_models_from_json_round_trips_builtin_table() {
        let json = serde_json::to_string(&builtin_models()).unwrap();
        assert_eq!(models_from_json(&json).unwrap(), builtin_models());
    }

    #[test]
    fn test_models_from_json_error() {
        assert!(matches!(
            models_from_json("{}"),
            Err(ConfigurationError::ModelTable(_))
        ));
    }
}
