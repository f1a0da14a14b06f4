use serde::{Deserialize, Serialize};

/// Orchestration settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// How many times a catalog write that lost a compare-and-swap race is
    /// retried against a fresh read. `0` reports the first conflict.
    pub catalog_conflict_retries: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_does_not_retry() {
        assert_eq!(UploadConfig::default().catalog_conflict_retries, 0);
    }

    #[test]
    fn deserializes_with_defaults() {
        let c: UploadConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(c, UploadConfig::default());
        let c: UploadConfig = serde_json::from_str(r#"{"catalog_conflict_retries": 3}"#).unwrap();
        assert_eq!(c.catalog_conflict_retries, 3);
    }
}
