//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `RECIPE_API_BASE_URL` - Root URL of the recipe API (default: `http://localhost:8080`)
//! - `RECIPE_API_TIMEOUT_SECS` - Per-request timeout in seconds (default: none)
//! - `RECIPE_EDIT_REFETCH` - `true` to re-fetch the full recipe list after every
//!   successful edit (default: `false`, the edited entry is patched in place)

use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::store::EditReconciliation;

const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Recipe API client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Root URL of the API; endpoint paths (`api/recipe`, ...) are joined onto it.
    pub base_url: Url,
    /// Request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// How the store reconciles its cache after a successful edit.
    pub edit_reconciliation: EditReconciliation,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: base_url(DEFAULT_BASE_URL).expect("Default base URL parses"),
            timeout: None,
            edit_reconciliation: EditReconciliation::default(),
        }
    }
}

impl ClientConfig {
    /// Configuration pointing at `base_url` with all other settings defaulted.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url_str: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: base_url(base_url_str)
                .map_err(|e| ConfigError::InvalidEnvVar("RECIPE_API_BASE_URL".to_string(), e))?,
            ..Self::default()
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url_raw =
            lookup("RECIPE_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = base_url(&base_url_raw)
            .map_err(|e| ConfigError::InvalidEnvVar("RECIPE_API_BASE_URL".to_string(), e))?;

        let timeout = lookup("RECIPE_API_TIMEOUT_SECS")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|&secs| secs > 0)
                    .map(Duration::from_secs)
                    .ok_or_else(|| {
                        ConfigError::InvalidEnvVar(
                            "RECIPE_API_TIMEOUT_SECS".to_string(),
                            format!("expected a positive number of seconds, got {raw:?}"),
                        )
                    })
            })
            .transpose()?;

        let refetch = match lookup("RECIPE_EDIT_REFETCH") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "RECIPE_EDIT_REFETCH".to_string(),
                    format!("expected true or false, got {raw:?}"),
                )
            })?,
            None => false,
        };
        let edit_reconciliation = if refetch {
            EditReconciliation::PatchAndRefetch
        } else {
            EditReconciliation::Patch
        };

        Ok(Self {
            base_url,
            timeout,
            edit_reconciliation,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an absolute http(s) base URL, normalised to end with `/` so that
/// relative endpoint paths join beneath it instead of replacing its last
/// segment.
fn base_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme {:?}", url.scheme()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
