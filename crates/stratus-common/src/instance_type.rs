use std::fmt;

use serde::{Deserialize, Serialize};

/// Compute shape requested for a serving variant, e.g. `ml.g5.2xlarge`.
///
/// Open-ended: the planner never rejects a shape, the control plane does.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceType(String);

impl InstanceType {
    pub const G5_XLARGE: &'static str = "ml.g5.xlarge";
    pub const G5_2XLARGE: &'static str = "ml.g5.2xlarge";
    pub const G5_4XLARGE: &'static str = "ml.g5.4xlarge";
    pub const G5_12XLARGE: &'static str = "ml.g5.12xlarge";
    pub const G5_48XLARGE: &'static str = "ml.g5.48xlarge";
    pub const P4D_24XLARGE: &'static str = "ml.p4d.24xlarge";

    /// Shapes the bundled in-memory platform accepts.
    pub const KNOWN: &'static [&'static str] = &[
        Self::G5_XLARGE,
        Self::G5_2XLARGE,
        Self::G5_4XLARGE,
        Self::G5_12XLARGE,
        Self::G5_48XLARGE,
        Self::P4D_24XLARGE,
    ];

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn g5_2xlarge() -> Self {
        Self::new(Self::G5_2XLARGE)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_known(&self) -> bool {
        Self::KNOWN.contains(&self.0.as_str())
    }
}

impl fmt::Display for InstanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for InstanceType {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_plain_string() {
        let t = InstanceType::g5_2xlarge();
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"ml.g5.2xlarge\"");
        let back: InstanceType = serde_json::from_str("\"ml.inf2.xlarge\"").unwrap();
        assert_eq!(back.as_str(), "ml.inf2.xlarge");
    }

    #[test]
    fn test_is_known() {
        assert!(InstanceType::g5_2xlarge().is_known());
        assert!(!InstanceType::new("ml.t2.nano").is_known());
    }
}
