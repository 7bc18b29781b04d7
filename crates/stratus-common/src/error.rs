use thiserror::Error;

/// Malformed or contradictory static input.
///
/// Always detected before any call reaches the provisioning platform; a
/// single configuration error aborts the whole build.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("model data URI '{uri}' is malformed: {reason}")]
    MalformedModelData { uri: String, reason: &'static str },

    #[error("duplicate model name '{0}' in model table")]
    DuplicateModelName(String),

    #[error("model table is empty")]
    EmptyModelTable,

    #[error("model '{model}' is missing required environment key {key}")]
    MissingEnvironmentKey { model: String, key: &'static str },

    #[error("resource name '{name}' is invalid: {reason}")]
    InvalidResourceName { name: String, reason: &'static str },

    #[error("dependency cycle involving {0}")]
    DependencyCycle(String),

    #[error("dependency graph names {0}, which the plan does not define")]
    UnknownResource(String),

    #[error("failed to read model table: {0}")]
    ModelTable(String),
}

/// The platform (or the path to it) refused a creation request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProvisioningError {
    #[error("unsupported instance type '{instance_type}' for '{resource}'")]
    UnsupportedInstanceType {
        resource: String,
        instance_type: String,
    },

    #[error("{kind} '{name}' already exists")]
    NameCollision { kind: &'static str, name: String },

    #[error("{kind} '{name}' references missing {missing_kind} '{missing}'")]
    MissingDependency {
        kind: &'static str,
        name: String,
        missing_kind: &'static str,
        missing: String,
    },

    #[error("'{resource}' scheduled before its dependency '{dependency}' was created")]
    OrderingViolation { resource: String, dependency: String },

    #[error("control plane rejected '{resource}' with status {status}: {body}")]
    Rejected {
        resource: String,
        status: u16,
        body: String,
    },

    #[error("transport error for '{resource}': {message}")]
    Transport { resource: String, message: String },
}

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("provisioning error: {0}")]
    Provisioning(#[from] ProvisioningError),
}

impl DeployError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}
