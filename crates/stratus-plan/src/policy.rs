use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub enum Effect {
    Allow,
}

/// One IAM statement attached to a model's execution role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    pub effect: Effect,
    #[serde(rename = "Action")]
    pub actions: Vec<String>,
    #[serde(rename = "Resource")]
    pub resources: Vec<String>,
}

pub const BUCKET_READ_ACTIONS: &[&str] = &["s3:GetBucket*", "s3:GetObject*", "s3:List*"];

/// Read access to exactly one bucket and its objects.
pub fn bucket_read_policy(partition: &str, bucket: &str) -> PolicyStatement {
    PolicyStatement {
        effect: Effect::Allow,
        actions: BUCKET_READ_ACTIONS.iter().map(|a| a.to_string()).collect(),
        resources: vec![
            format!("arn:{partition}:s3:::{bucket}"),
            format!("arn:{partition}:s3:::{bucket}/*"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_read_policy_is_scoped() {
        let p = bucket_read_policy("aws", "bucket-x");
        assert_eq!(p.effect, Effect::Allow);
        assert_eq!(
            p.resources,
            vec!["arn:aws:s3:::bucket-x", "arn:aws:s3:::bucket-x/*"]
        );
        assert!(p.resources.iter().all(|r| !r.starts_with("arn:aws:s3:::*")));
    }

    #[test]
    fn test_serializes_as_iam_statement() {
        let v = serde_json::to_value(bucket_read_policy("aws-cn", "b")).unwrap();
        assert_eq!(v["Effect"], "Allow");
        assert_eq!(v["Action"][1], "s3:GetObject*");
        assert_eq!(v["Resource"][0], "arn:aws-cn:s3:::b");
    }
}
