use std::env;

use tracing::info;

use crate::error::PlantScanError;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// 5 MiB.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 5 * 1024 * 1024;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub max_file_bytes: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, PlantScanError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, PlantScanError> {
        let gemini_api_key = lookup("GEMINI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                PlantScanError::Config("GEMINI_API_KEY environment variable is required".into())
            })?;

        let max_file_bytes = match lookup("PLANTSCAN_MAX_FILE_BYTES") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                PlantScanError::Config(format!(
                    "PLANTSCAN_MAX_FILE_BYTES must be a byte count, got {raw:?}"
                ))
            })?,
            None => DEFAULT_MAX_FILE_BYTES,
        };

        Ok(Self {
            gemini_api_key,
            gemini_model: lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_base_url: lookup("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            max_file_bytes,
        })
    }

    /// Log the configuration with the API key masked.
    pub fn log_redacted(&self) {
        info!(
            gemini_api_key = %redact(&self.gemini_api_key),
            gemini_model = %self.gemini_model,
            gemini_base_url = %self.gemini_base_url,
            max_file_bytes = self.max_file_bytes,
            "Loaded configuration"
        );
    }
}

fn redact(secret: &str) -> String {
    let len = secret.chars().count();
    if len <= 8 {
        return "****".to_string();
    }
    let tail: String = secret.chars().skip(len - 4).collect();
    format!("****{tail}")
}
