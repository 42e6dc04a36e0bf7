//! Connection settings
//!
//! The three endpoints the tool talks to are taken from the environment,
//! falling back to placeholder values that match a default local install.

/// Environment variable holding the dizqueTV base URL
pub const DIZQUETV_URL_VAR: &str = "DIZQUETV_URL";
/// Environment variable holding the Plex base URL
pub const PLEX_URL_VAR: &str = "PLEX_URL";
/// Environment variable holding the Plex access token
pub const PLEX_TOKEN_VAR: &str = "PLEX_TOKEN";

const DEFAULT_DIZQUETV_URL: &str = "http://localhost:8000";
const DEFAULT_PLEX_URL: &str = "http://localhost:32400";
const DEFAULT_PLEX_TOKEN: &str = "thisisaplextoken";

/// Resolved connection settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the dizqueTV instance, without trailing slash
    pub dizquetv_url: String,
    /// Base URL of the Plex server, without trailing slash
    pub plex_url: String,
    /// Plex access token sent as `X-Plex-Token`
    pub plex_token: String,
}

impl Config {
    /// Reads the configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup
    ///
    /// Unset and empty variables both fall back to their default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            dizquetv_url: normalize_url(&get(DIZQUETV_URL_VAR, DEFAULT_DIZQUETV_URL)),
            plex_url: normalize_url(&get(PLEX_URL_VAR, DEFAULT_PLEX_URL)),
            plex_token: get(PLEX_TOKEN_VAR, DEFAULT_PLEX_TOKEN).trim().to_string(),
        }
    }
}

/// Strips surrounding whitespace and trailing slashes so paths can be appended
pub(crate) fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
