//! Lookup configuration.
//!
//! [`LookupConfig`] is read from JSON and can then be overridden from the
//! environment with [`LookupConfig::apply_env`]. Only `spreadsheet_id` is
//! required; everything else has a default.

use crate::clock::BRASILIA_UTC_OFFSET_MINUTES;
use crate::error::{LookupError, Result};
use crate::schema::{ALTA_SHEET, EMERGENCIAL_SHEET};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const ENV_SPREADSHEET_ID: &str = "ORDER_LOOKUP_SPREADSHEET_ID";
pub const ENV_API_KEY: &str = "ORDER_LOOKUP_API_KEY";
pub const ENV_ACCESS_TOKEN: &str = "ORDER_LOOKUP_ACCESS_TOKEN";
pub const ENV_CACHE_TTL_SECS: &str = "ORDER_LOOKUP_CACHE_TTL_SECS";

const MAX_UTC_OFFSET_MINUTES: i32 = 18 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupConfig {
    #[serde(default)]
    pub spreadsheet_id: String,
    #[serde(default = "default_alta_sheet")]
    pub alta_sheet: String,
    #[serde(default = "default_emergencial_sheet")]
    pub emergencial_sheet: String,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

fn default_alta_sheet() -> String {
    ALTA_SHEET.to_string()
}

fn default_emergencial_sheet() -> String {
    EMERGENCIAL_SHEET.to_string()
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_utc_offset_minutes() -> i32 {
    BRASILIA_UTC_OFFSET_MINUTES
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            alta_sheet: default_alta_sheet(),
            emergencial_sheet: default_emergencial_sheet(),
            cache_ttl_secs: default_cache_ttl_secs(),
            utc_offset_minutes: default_utc_offset_minutes(),
            api_key: None,
            access_token: None,
        }
    }
}

impl LookupConfig {
    pub fn new(spreadsheet_id: impl Into<String>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Overrides fields from `ORDER_LOOKUP_*` environment variables.
    pub fn apply_env(self) -> Result<Self> {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    /// Same as [`apply_env`](Self::apply_env) with an explicit variable lookup.
    pub fn apply_vars<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(id) = var(ENV_SPREADSHEET_ID) {
            self.spreadsheet_id = id;
        }
        if let Some(key) = var(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(token) = var(ENV_ACCESS_TOKEN) {
            self.access_token = Some(token);
        }
        if let Some(ttl) = var(ENV_CACHE_TTL_SECS) {
            self.cache_ttl_secs = ttl.trim().parse().map_err(|_| {
                LookupError::Config(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    ENV_CACHE_TTL_SECS, ttl
                ))
            })?;
        }

        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.spreadsheet_id.trim().is_empty() {
            return Err(LookupError::Config(
                "spreadsheet_id must not be empty".to_string(),
            ));
        }

        if self.alta_sheet.trim().is_empty() || self.emergencial_sheet.trim().is_empty() {
            return Err(LookupError::Config(
                "worksheet names must not be empty".to_string(),
            ));
        }

        if self.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(LookupError::Config(format!(
                "utc_offset_minutes {} is outside ±{}",
                self.utc_offset_minutes, MAX_UTC_OFFSET_MINUTES
            )));
        }

        Ok(())
    }
}
