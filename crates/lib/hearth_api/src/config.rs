//! API server configuration.

use std::path::PathBuf;
use std::time::Duration;

use hearth_core::gemini::GeminiConfig;
use hearth_core::password::{DEFAULT_BCRYPT_COST, check_cost};
use thiserror::Error;

/// Configuration errors, raised at start-up.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "0.0.0.0:3001").
    pub bind_addr: String,
    /// Directory served as static files; `/` serves `Log_in.html` from it.
    pub static_dir: PathBuf,
    /// bcrypt cost used when capturing login passwords.
    pub bcrypt_cost: u32,
    /// Upstream model settings.
    pub gemini: GeminiConfig,
}

impl ApiConfig {
    /// Reads configuration from environment variables.
    ///
    /// | Variable                | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `3001`                  |
    /// | `GEMINI_API_KEY`        | required                |
    /// | `GEMINI_MODEL`          | `gemini-2.5-flash`      |
    /// | `GEMINI_BASE_URL`       | Google v1beta endpoint  |
    /// | `UPSTREAM_TIMEOUT_SECS` | none                    |
    /// | `STATIC_DIR`            | `public`                |
    /// | `BCRYPT_COST`           | `10`                    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ApiConfig::from_env`] with an injectable variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup("GEMINI_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::Missing("GEMINI_API_KEY"))?;

        let mut gemini = GeminiConfig::new(api_key);
        if let Some(model) = lookup("GEMINI_MODEL") {
            gemini.model = model;
        }
        if let Some(base_url) = lookup("GEMINI_BASE_URL") {
            gemini.base_url = base_url;
        }
        gemini.timeout = lookup("UPSTREAM_TIMEOUT_SECS")
            .map(|v| parse_var::<u64>("UPSTREAM_TIMEOUT_SECS", &v))
            .transpose()?
            .map(Duration::from_secs);

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = lookup("PORT")
            .map(|v| parse_var::<u16>("PORT", &v))
            .transpose()?
            .unwrap_or(3001);
        let bcrypt_cost = lookup("BCRYPT_COST")
            .map(|v| parse_var::<u32>("BCRYPT_COST", &v))
            .transpose()?
            .unwrap_or(DEFAULT_BCRYPT_COST);
        check_cost(bcrypt_cost).map_err(|e| ConfigError::Invalid {
            var: "BCRYPT_COST",
            reason: e.to_string(),
        })?;

        Ok(Self {
            bind_addr: format!("{host}:{port}"),
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("public")),
            bcrypt_cost,
            gemini,
        })
    }
}

fn parse_var<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        reason: e.to_string(),
    })
}
