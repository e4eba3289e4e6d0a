// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// SDK start configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};
use crate::types::{Environment, LogLevel, UrlStrategy};

/// App secret used to sign SDK traffic. All five parts come from the
/// dashboard together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSecret {
    pub secret_id: i64,
    pub info1: i64,
    pub info2: i64,
    pub info3: i64,
    pub info4: i64,
}

/// Options handed to the native SDK when it starts.
///
/// Serialized as camelCase JSON both on the wire to the native layer and in
/// configuration files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SdkConfig {
    pub app_token: String,
    pub environment: Environment,
    pub log_level: LogLevel,
    /// Must be set for `LogLevel::Suppress` to be honoured natively.
    pub allow_suppress_log_level: bool,
    pub event_buffering: bool,
    pub send_in_background: bool,
    pub launch_deferred_deeplink: bool,
    pub needs_cost: bool,
    pub coppa_compliant: bool,
    pub play_store_kids_app: bool,
    pub link_me: bool,
    pub default_tracker: Option<String>,
    pub external_device_id: Option<String>,
    pub url_strategy: UrlStrategy,
    pub app_secret: Option<AppSecret>,
    /// Seconds to hold the first session back.
    pub delay_start: f64,
    pub preinstall_tracking: bool,
    pub preinstall_file_path: Option<String>,
    pub allow_ad_services_info_reading: bool,
    pub allow_idfa_reading: bool,
    pub skad_network_handling: bool,
    /// When false, `Bridge::launch` starts the SDK on the host's behalf.
    pub start_manually: bool,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            app_token: String::new(),
            environment: Environment::Sandbox,
            log_level: LogLevel::Info,
            allow_suppress_log_level: false,
            event_buffering: false,
            send_in_background: false,
            launch_deferred_deeplink: true,
            needs_cost: false,
            coppa_compliant: false,
            play_store_kids_app: false,
            link_me: false,
            default_tracker: None,
            external_device_id: None,
            url_strategy: UrlStrategy::Default,
            app_secret: None,
            delay_start: 0.0,
            preinstall_tracking: false,
            preinstall_file_path: None,
            allow_ad_services_info_reading: true,
            allow_idfa_reading: true,
            skad_network_handling: true,
            start_manually: true,
        }
    }
}

impl SdkConfig {
    pub fn new(app_token: impl Into<String>, environment: Environment) -> Self {
        Self {
            app_token: app_token.into(),
            environment,
            ..Default::default()
        }
    }

    /// Parse a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.app_token.trim().is_empty() {
            return Err(BridgeError::Config("app token is empty".into()));
        }
        if !self.delay_start.is_finite() || self.delay_start < 0.0 {
            return Err(BridgeError::Config(format!(
                "delay start must be a non-negative number of seconds, got {}",
                self.delay_start
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_native_sdk() {
        let config = SdkConfig::new("2fm9gkqubvpc", Environment::Production);
        assert!(config.launch_deferred_deeplink);
        assert!(config.skad_network_handling);
        assert!(config.start_manually);
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_token_is_rejected() {
        let config = SdkConfig::default();
        assert!(matches!(config.validate(), Err(BridgeError::Config(_))));
    }

    #[test]
    fn negative_delay_is_rejected() {
        let mut config = SdkConfig::new("2fm9gkqubvpc", Environment::Sandbox);
        config.delay_start = -3.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = SdkConfig::from_json_str(
            r#"{"appToken":"2fm9gkqubvpc","environment":"production","urlStrategy":"india",
                "appSecret":{"secretId":1,"info1":2,"info2":3,"info3":4,"info4":5}}"#,
        )
        .unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.url_strategy, UrlStrategy::India);
        assert_eq!(config.app_secret.unwrap().info4, 5);
        assert!(config.allow_idfa_reading);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"appToken":"2fm9gkqubvpc","logLevel":"verbose","startManually":false}}"#).unwrap();

        let config = SdkConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.log_level, LogLevel::Verbose);
        assert!(!config.start_manually);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = SdkConfig::from_json_file(dir.path().join("absent.json"));
        assert!(matches!(result, Err(BridgeError::Io(_))));
    }
}
