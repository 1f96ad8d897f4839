//! Configuration management for the Contentstack MCP Server.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::ConfigError;

/// Region used when nothing else is configured.
pub const DEFAULT_REGION: &str = "NA";

/// Environment variable names read by [`ClientConfig::resolve`].
pub const ENV_REGION: &str = "CONTENTSTACK_REGION";
pub const ENV_API_KEY: &str = "CONTENTSTACK_API_KEY";
pub const ENV_MANAGEMENT_TOKEN: &str = "CONTENTSTACK_MANAGEMENT_TOKEN";
pub const ENV_DELIVERY_TOKEN: &str = "CONTENTSTACK_DELIVERY_TOKEN";
pub const ENV_BRANCH: &str = "CONTENTSTACK_BRANCH";
pub const ENV_BASE_URL: &str = "CONTENTSTACK_BASE_URL";

/// Config file read when `--config` is not given. May be absent.
pub const DEFAULT_CONFIG_FILE: &str = "contentstack.json";

/// Contentstack hosting region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Na,
    Eu,
    AzureNa,
    AzureEu,
    GcpNa,
    GcpEu,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::Na,
        Region::Eu,
        Region::AzureNa,
        Region::AzureEu,
        Region::GcpNa,
        Region::GcpEu,
    ];

    /// Region code as used in configuration (e.g. "AZURE_EU").
    pub fn code(self) -> &'static str {
        match self {
            Region::Na => "NA",
            Region::Eu => "EU",
            Region::AzureNa => "AZURE_NA",
            Region::AzureEu => "AZURE_EU",
            Region::GcpNa => "GCP_NA",
            Region::GcpEu => "GCP_EU",
        }
    }

    /// Content Management API base URL for this region.
    pub fn base_url(self) -> &'static str {
        match self {
            Region::Na => "https://api.contentstack.io/v3",
            Region::Eu => "https://eu-api.contentstack.com/v3",
            Region::AzureNa => "https://azure-na-api.contentstack.com/v3",
            Region::AzureEu => "https://azure-eu-api.contentstack.com/v3",
            Region::GcpNa => "https://gcp-na-api.contentstack.com/v3",
            Region::GcpEu => "https://gcp-eu-api.contentstack.com/v3",
        }
    }

    /// Comma-separated list of every supported code.
    pub fn supported_codes() -> String {
        Region::ALL
            .iter()
            .map(|r| r.code())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Region {
    type Err = String;

    /// Case-insensitive match against the six region codes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        Region::ALL
            .into_iter()
            .find(|r| r.code() == upper)
            .ok_or_else(|| s.to_string())
    }
}

/// Settings loaded once at startup from the optional config file.
///
/// Every field is a fallback: environment variables and per-call
/// overrides take precedence when the client config is resolved.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    /// Default region code (NA, EU, AZURE_NA, AZURE_EU, GCP_NA, GCP_EU)
    pub region: Option<String>,

    /// Stack API key
    pub api_key: Option<String>,

    /// Management token used for every request
    pub management_token: Option<String>,

    /// Delivery token (carried for library callers, not sent)
    pub delivery_token: Option<String>,

    /// Branch to scope requests to
    pub branch: Option<String>,

    /// API base URL replacing the region's (proxies, local gateways)
    pub base_url: Option<String>,

    /// Enable debug mode for MCP message logging
    #[serde(default)]
    pub debug: bool,
}

impl Settings {
    /// Load settings from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings if the file exists, otherwise fall back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load the file named on the command line, or the optional default file.
    ///
    /// Only the default file may be missing; an explicit path must exist.
    pub fn load_from(path: Option<&str>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Self::load_or_default(DEFAULT_CONFIG_FILE),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref region) = self.region {
            if region.parse::<Region>().is_err() {
                return Err(ConfigError::Invalid(format!(
                    "Invalid region '{}'. Valid regions: {}",
                    region,
                    Region::supported_codes()
                )));
            }
        }
        Ok(())
    }
}

/// Explicit per-client values. `None` falls through to the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub region: Option<String>,
    pub api_key: Option<String>,
    pub management_token: Option<String>,
    pub delivery_token: Option<String>,
    pub branch: Option<String>,
    pub base_url: Option<String>,
}

impl ConfigOverrides {
    /// Overrides that only pin the region.
    pub fn region(region: impl Into<String>) -> Self {
        Self {
            region: Some(region.into()),
            ..Self::default()
        }
    }
}

impl From<&Settings> for ConfigOverrides {
    fn from(settings: &Settings) -> Self {
        Self {
            region: settings.region.clone(),
            api_key: settings.api_key.clone(),
            management_token: settings.management_token.clone(),
            delivery_token: settings.delivery_token.clone(),
            branch: settings.branch.clone(),
            base_url: settings.base_url.clone(),
        }
    }
}

/// Immutable per-client connection settings.
///
/// The region stays a raw string: an unknown code is reported by the
/// request builder when the first request is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub region: String,
    pub api_key: String,
    pub management_token: String,
    pub delivery_token: String,
    pub branch: Option<String>,
    /// Replaces the region base URL when set; the region is still validated.
    pub base_url: Option<String>,
}

impl ClientConfig {
    /// Resolve a config from explicit overrides, then `lookup` (usually the
    /// process environment), then `fallback` (usually the config file).
    pub fn resolve<F>(overrides: &ConfigOverrides, fallback: &ConfigOverrides, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |explicit: &Option<String>, var: &str, default: &Option<String>| {
            explicit
                .clone()
                .or_else(|| lookup(var).filter(|v| !v.is_empty()))
                .or_else(|| default.clone())
        };

        Self {
            region: pick(&overrides.region, ENV_REGION, &fallback.region)
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
            api_key: pick(&overrides.api_key, ENV_API_KEY, &fallback.api_key).unwrap_or_default(),
            management_token: pick(
                &overrides.management_token,
                ENV_MANAGEMENT_TOKEN,
                &fallback.management_token,
            )
            .unwrap_or_default(),
            delivery_token: pick(
                &overrides.delivery_token,
                ENV_DELIVERY_TOKEN,
                &fallback.delivery_token,
            )
            .unwrap_or_default(),
            branch: pick(&overrides.branch, ENV_BRANCH, &fallback.branch),
            base_url: pick(&overrides.base_url, ENV_BASE_URL, &fallback.base_url),
        }
    }

    /// Resolve against the real process environment.
    pub fn from_env(overrides: &ConfigOverrides, fallback: &ConfigOverrides) -> Self {
        Self::resolve(overrides, fallback, |key| std::env::var(key).ok())
    }

    /// Same credentials, different region.
    pub fn with_region(&self, region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..self.clone()
        }
    }
}
