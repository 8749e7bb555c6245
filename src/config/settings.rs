//! Runtime settings read from the environment (and `.env`).
//!
//! * `API_URL` - remote backend base URL; unset or empty means fully local mode
//! * `DATABASE_URL` - local store location
//! * `GEMINI_API_KEY` (or `API_KEY`) - key for the cost advisor
//! * `ADVISOR_MODEL` - advisor model name
//! * `CATALOG_PATH` - TOML file with the first-run seed catalog

use crate::config::database::DEFAULT_DATABASE_URL;
use std::path::PathBuf;

/// Model used by the cost advisor when `ADVISOR_MODEL` is not set.
pub const DEFAULT_ADVISOR_MODEL: &str = "gemini-2.5-flash";

/// Seed catalog file looked up when `CATALOG_PATH` is not set.
pub const DEFAULT_CATALOG_PATH: &str = "catalog.toml";

/// Settings for the external cost advisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisorSettings {
    /// API key; without one the advisor always answers with its fallback
    pub api_key: Option<String>,
    /// Model name
    pub model: String,
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Remote backend base URL without trailing slash, `None` for local-only mode
    pub api_url: Option<String>,
    /// Local store connection URL
    pub database_url: String,
    /// Cost advisor settings
    pub advisor: AdvisorSettings,
    /// Seed catalog location
    pub catalog_path: PathBuf,
}

impl Settings {
    /// Reads settings from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            api_url: get("API_URL").map(|url| url.trim_end_matches('/').to_string()),
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            advisor: AdvisorSettings {
                api_key: get("GEMINI_API_KEY").or_else(|| get("API_KEY")),
                model: get("ADVISOR_MODEL").unwrap_or_else(|| DEFAULT_ADVISOR_MODEL.to_string()),
            },
            catalog_path: get("CATALOG_PATH")
                .map_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH), PathBuf::from),
        }
    }

    /// Whether a remote backend endpoint is configured.
    #[must_use]
    pub const fn has_remote(&self) -> bool {
        self.api_url.is_some()
    }
}
