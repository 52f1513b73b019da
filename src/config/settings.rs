//! # Translation Settings
//!
//! Defines the configuration structure consumed by the translator.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::Result;

/// Settings consumed by the translator.
///
/// The xDS server fields (`xds_listen_address`, `discovery_namespace`) are
/// carried for the embedding control plane; the translator itself never reads
/// them.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TranslationSettings {
    /// Policy applied to routes whose destination cannot be resolved
    #[validate(nested)]
    #[serde(default)]
    pub invalid_config_policy: InvalidConfigPolicy,

    /// Maximum RE2 program size for path regex matchers
    #[serde(default = "default_safe_regex_max_program_size")]
    pub safe_regex_max_program_size: u32,

    /// Bind address of the xDS server. Not consumed by the translator.
    #[serde(default)]
    pub xds_listen_address: Option<String>,

    /// Namespace watched for resources. Not consumed by the translator.
    #[serde(default)]
    pub discovery_namespace: Option<String>,
}

/// What to emit in place of a route whose destination could not be resolved
/// to any cluster.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InvalidConfigPolicy {
    /// HTTP status served by the replacement direct response
    #[validate(range(
        min = 100,
        max = 599,
        message = "Response code must be a valid HTTP status"
    ))]
    #[serde(default = "default_invalid_route_response_code")]
    pub invalid_route_response_code: u16,
}

fn default_invalid_route_response_code() -> u16 {
    404
}

fn default_safe_regex_max_program_size() -> u32 {
    1000
}

impl Default for InvalidConfigPolicy {
    fn default() -> Self {
        Self { invalid_route_response_code: default_invalid_route_response_code() }
    }
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            invalid_config_policy: InvalidConfigPolicy::default(),
            safe_regex_max_program_size: default_safe_regex_max_program_size(),
            xds_listen_address: None,
            discovery_namespace: None,
        }
    }
}

impl TranslationSettings {
    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = TranslationSettings::default();
        assert_eq!(settings.invalid_config_policy.invalid_route_response_code, 404);
        assert_eq!(settings.safe_regex_max_program_size, 1000);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_response_code_range() {
        let mut settings = TranslationSettings::default();
        settings.invalid_config_policy.invalid_route_response_code = 99;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial() {
        let settings: TranslationSettings =
            serde_json::from_str(r#"{"safe_regex_max_program_size": 200}"#)
                .expect("settings should deserialize");
        assert_eq!(settings.safe_regex_max_program_size, 200);
        assert_eq!(settings.invalid_config_policy.invalid_route_response_code, 404);
    }
}
