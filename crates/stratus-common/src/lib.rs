pub mod catalog;
pub mod error;
pub mod instance_type;
pub mod model_data;
pub mod model_record;
pub mod prompt_template;

pub use catalog::{builtin_models, load_models, models_from_json};
pub use error::{ConfigurationError, DeployError, ProvisioningError};
pub use instance_type::InstanceType;
pub use model_data::ModelDataRef;
pub use model_record::ModelRecord;
pub use prompt_template::{builtin_template, Message, PromptTemplate, Role};

pub mod telemetry;
