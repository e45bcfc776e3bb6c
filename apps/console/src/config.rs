use std::{collections::HashMap, fs, io::ErrorKind, path::Path};

use admin_core::DEFAULT_TOKEN_ENTRY;
use anyhow::{bail, Context};
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://ec-course-api.hexschool.io/v2";
pub const DEFAULT_API_PATH: &str = "202501-react-shaoyu";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://./data/console.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base: String,
    pub api_path: String,
    pub database_url: String,
    pub token_entry: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.into(),
            api_path: DEFAULT_API_PATH.into(),
            database_url: DEFAULT_DATABASE_URL.into(),
            token_entry: DEFAULT_TOKEN_ENTRY.into(),
        }
    }
}

/// Values given on the command line. They win over file and environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_base: Option<String>,
    pub api_path: Option<String>,
    pub database_url: Option<String>,
    pub token_entry: Option<String>,
}

pub fn load_settings(config_path: &Path, overrides: &Overrides) -> anyhow::Result<Settings> {
    let file = match fs::read_to_string(config_path) {
        Ok(raw) => Some(raw),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %config_path.display(), "config: no config file, using defaults");
            None
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config '{}'", config_path.display()))
        }
    };

    resolve_settings(file.as_deref(), |key| std::env::var(key).ok(), overrides)
}

/// Layers defaults, the flat TOML table, environment and overrides, then validates.
pub fn resolve_settings(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
    overrides: &Overrides,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        match toml::from_str::<HashMap<String, String>>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("api_base") {
                    settings.api_base = v.clone();
                }
                if let Some(v) = file_cfg.get("api_path") {
                    settings.api_path = v.clone();
                }
                if let Some(v) = file_cfg.get("database_url") {
                    settings.database_url = v.clone();
                }
                if let Some(v) = file_cfg.get("token_entry") {
                    settings.token_entry = v.clone();
                }
            }
            Err(err) => warn!("config: ignoring malformed config file: {err}"),
        }
    }

    if let Some(v) = env("CATALOG_API_BASE") {
        settings.api_base = v;
    }
    if let Some(v) = env("APP__API_BASE") {
        settings.api_base = v;
    }

    if let Some(v) = env("CATALOG_API_PATH") {
        settings.api_path = v;
    }
    if let Some(v) = env("APP__API_PATH") {
        settings.api_path = v;
    }

    if let Some(v) = env("DATABASE_URL") {
        settings.database_url = v;
    }
    if let Some(v) = env("APP__DATABASE_URL") {
        settings.database_url = v;
    }

    if let Some(v) = env("APP__TOKEN_ENTRY") {
        settings.token_entry = v;
    }

    if let Some(v) = &overrides.api_base {
        settings.api_base = v.clone();
    }
    if let Some(v) = &overrides.api_path {
        settings.api_path = v.clone();
    }
    if let Some(v) = &overrides.database_url {
        settings.database_url = v.clone();
    }
    if let Some(v) = &overrides.token_entry {
        settings.token_entry = v.clone();
    }

    settings.api_base = validate_api_base(&settings.api_base)?;
    settings.api_path = settings.api_path.trim().trim_matches('/').to_string();
    if settings.api_path.is_empty() {
        bail!("api_path must not be empty");
    }
    settings.database_url = normalize_database_url(&settings.database_url);
    if settings.token_entry.trim().is_empty() {
        settings.token_entry = DEFAULT_TOKEN_ENTRY.into();
    }

    Ok(settings)
}

fn validate_api_base(raw: &str) -> anyhow::Result<String> {
    let raw = raw.trim();
    let url = Url::parse(raw).with_context(|| format!("invalid api_base '{raw}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("api_base must be an http(s) URL, got '{raw}'");
    }
    Ok(raw.trim_end_matches('/').to_string())
}

/// Turns plain file paths into `sqlite://` URLs; other URLs pass through.
pub fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return DEFAULT_DATABASE_URL.into();
    }

    if raw_database_url.starts_with("sqlite::memory:")
        || raw_database_url.starts_with("sqlite://")
        || raw_database_url.contains("://")
    {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        return format!("sqlite://{}", path.replace('\\', "/"));
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
