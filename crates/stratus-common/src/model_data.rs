use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Location of externally stored model weights, split out of a
/// `scheme://bucket/key...` URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDataRef {
    /// Scheme without the trailing colon, e.g. "s3".
    pub scheme: String,
    pub bucket: String,
    /// Object key with a leading `/`. `s3://bucket` yields `/`.
    pub key: String,
}

impl ModelDataRef {
    /// Splits `uri` on `/`. The bucket is the third segment and everything
    /// after it is re-joined into the key.
    pub fn parse(uri: &str) -> Result<Self, ConfigurationError> {
        let malformed = |reason| ConfigurationError::MalformedModelData {
            uri: uri.to_string(),
            reason,
        };

        let segments: Vec<&str> = uri.split('/').collect();
        if segments.len() < 3 {
            return Err(malformed("expected scheme://bucket/key"));
        }

        let scheme = segments[0]
            .strip_suffix(':')
            .filter(|s| !s.is_empty())
            .ok_or_else(|| malformed("missing scheme"))?;
        if !segments[1].is_empty() {
            return Err(malformed("expected '//' after scheme"));
        }
        let bucket = segments[2];
        if bucket.is_empty() {
            return Err(malformed("empty bucket name"));
        }
        if !is_valid_bucket_name(bucket) {
            return Err(malformed("invalid bucket name"));
        }

        Ok(Self {
            scheme: scheme.to_string(),
            bucket: bucket.to_string(),
            key: format!("/{}", segments[3..].join("/")),
        })
    }

    pub fn uri(&self) -> String {
        format!("{}://{}{}", self.scheme, self.bucket, self.key)
    }
}

/// 3-63 chars of `[a-z0-9.-]`, starting and ending with a letter or digit.
/// A storage grant is scoped to this name, so `*` must never get through.
fn is_valid_bucket_name(bucket: &str) -> bool {
    let edge_ok =
        |c: Option<char>| c.is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
    (3..=63).contains(&bucket.len())
        && bucket
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-')
        && edge_ok(bucket.chars().next())
        && edge_ok(bucket.chars().last())
}

impl FromStr for ModelDataRef {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bucket_and_key() {
        let r = ModelDataRef::parse("s3://bucket-x/path/to/model.tar.gz").unwrap();
        assert_eq!(r.scheme, "s3");
        assert_eq!(r.bucket, "bucket-x");
        assert_eq!(r.key, "/path/to/model.tar.gz");
        assert_eq!(r.uri(), "s3://bucket-x/path/to/model.tar.gz");
    }

    #[test]
    fn test_parse_bucket_only() {
        let r = ModelDataRef::parse("s3://bucket-x").unwrap();
        assert_eq!(r.bucket, "bucket-x");
        assert_eq!(r.key, "/");
    }

    #[test]
    fn test_parse_too_few_segments() {
        let err = ModelDataRef::parse("s3:/bucket").unwrap_err();
        assert!(matches!(err, ConfigurationError::MalformedModelData { .. }));
        assert!(ModelDataRef::parse("bucket").is_err());
    }

    #[test]
    fn test_parse_rejects_missing_scheme_and_bucket() {
        assert!(ModelDataRef::parse("://bucket/key").is_err());
        assert!(ModelDataRef::parse("s3:x/bucket/key").is_err());
        assert!(ModelDataRef::parse("s3:///key").is_err());
    }

    #[test]
    fn test_parse_rejects_wildcard_and_invalid_buckets() {
        for uri in [
            "s3://*/model.tar.gz",
            "s3://prod-*/x",
            "s3://Bucket/x",
            "s3://ab/x",
            "s3://-bucket/x",
            "s3://bucket./x",
            "s3://bucket_x/x",
        ] {
            assert_eq!(
                ModelDataRef::parse(uri),
                Err(ConfigurationError::MalformedModelData {
                    uri: uri.to_string(),
                    reason: "invalid bucket name",
                }),
                "{uri}"
            );
        }
        let long = format!("s3://{}/x", "a".repeat(64));
        assert!(ModelDataRef::parse(&long).is_err());
        assert!(ModelDataRef::parse(&format!("s3://{}/x", "a".repeat(63))).is_ok());
        assert!(ModelDataRef::parse("s3://my.bucket-1/x").is_ok());
    }
}
