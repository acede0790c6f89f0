//! Settings loaded from an optional TOML file and the environment.
//!
//! Layering, lowest to highest: built-in defaults, the config file,
//! `DOGWATCH_*` environment variables, then command-line flags (applied by
//! `main`). Nested keys use `__`, e.g. `DOGWATCH_DATADOG__API_KEY`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::data::duration::parse_duration;
use crate::source::{DatadogCredentials, DEFAULT_API_BASE, DEFAULT_APP_BASE, DEFAULT_ENDPOINT};

const ENV_PREFIX: &str = "DOGWATCH";

/// Direct-mode Datadog settings; unset values fall back to `DATADOG_*`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatadogSettings {
    pub api_base: Option<String>,
    pub app_base: Option<String>,
    pub api_key: Option<String>,
    pub app_key: Option<String>,
}

impl DatadogSettings {
    /// Resolve into credentials, filling gaps from `lookup` (normally the
    /// process environment) and then the public Datadog endpoints.
    pub fn credentials<F>(&self, lookup: F) -> DatadogCredentials
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |own: &Option<String>, var: &str| {
            own.clone()
                .filter(|v| !v.is_empty())
                .or_else(|| lookup(var).filter(|v| !v.is_empty()))
        };

        DatadogCredentials {
            api_base: pick(&self.api_base, "DATADOG_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            app_base: pick(&self.app_base, "DATADOG_APP_BASE")
                .unwrap_or_else(|| DEFAULT_APP_BASE.to_string()),
            api_key: pick(&self.api_key, "DATADOG_API_KEY"),
            app_key: pick(&self.app_key, "DATADOG_APP_KEY"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Proxy base URL.
    pub endpoint: String,
    pub refresh_interval: String,
    pub debounce: String,
    pub request_timeout: String,
    pub auto_refresh: bool,
    /// Tag clause added by the "only production" toggle.
    pub prod_tag: String,
    /// Monitors carrying any of these tags are never shown.
    pub exclude_tags: Vec<String>,
    /// Query storage file; defaults under the local data directory.
    pub state_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub datadog: DatadogSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            refresh_interval: "30s".to_string(),
            debounce: "300ms".to_string(),
            request_timeout: "10s".to_string(),
            auto_refresh: true,
            prod_tag: "env:prod".to_string(),
            exclude_tags: Vec::new(),
            state_file: None,
            log_file: None,
            datadog: DatadogSettings::default(),
        }
    }
}

/// The parsed durations of [`Settings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub refresh_interval: Duration,
    pub debounce: Duration,
    pub request_timeout: Duration,
}

impl Settings {
    /// Load from `path` (required when given) or the default config file
    /// (optional), overlaid with `DOGWATCH_*` variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, env_source())
    }

    /// Like [`load`](Settings::load) with an explicit environment source.
    pub fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder();

        match path {
            Some(path) => {
                builder = builder.add_source(File::from(path).required(true));
            }
            None => {
                if let Some(default) = default_config_path() {
                    builder = builder.add_source(File::from(default).required(false));
                }
            }
        }

        let settings: Settings = builder
            .add_source(env)
            .build()
            .context("loading configuration")?
            .try_deserialize()
            .context("invalid configuration")?;

        settings.timings()?;
        Ok(settings)
    }

    pub fn timings(&self) -> Result<Timings> {
        let parse = |name: &str, value: &str| {
            parse_duration(value).map_err(|e| anyhow::anyhow!("invalid {} '{}': {}", name, value, e))
        };

        let non_zero = |name: &str, value: &str| -> Result<Duration> {
            let duration = parse(name, value)?;
            if duration.is_zero() {
                anyhow::bail!("invalid {} '{}': must be greater than zero", name, value);
            }
            Ok(duration)
        };

        Ok(Timings {
            refresh_interval: non_zero("refresh_interval", &self.refresh_interval)?,
            debounce: parse("debounce", &self.debounce)?,
            request_timeout: non_zero("request_timeout", &self.request_timeout)?,
        })
    }

    pub fn datadog_credentials(&self) -> DatadogCredentials {
        self.datadog.credentials(|var| std::env::var(var).ok())
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("exclude_tags")
}

/// `<config dir>/dogwatch/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dogwatch").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        env_source().source(Some(map))
    }

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "");
        let settings = Settings::load_with_env(Some(&path), env(&[])).unwrap();
        assert_eq!(settings, Settings::default());

        let timings = settings.timings().unwrap();
        assert_eq!(timings.refresh_interval, Duration::from_secs(30));
        assert_eq!(timings.debounce, Duration::from_millis(300));
        assert_eq!(timings.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_file_values() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
endpoint = "http://proxy.internal/api"
refresh_interval = "1m"
auto_refresh = false
exclude_tags = ["only_noc", "excludemonitor:yes"]

[datadog]
app_base = "https://app.datadoghq.eu"
"#,
        );

        let settings = Settings::load_with_env(Some(&path), env(&[])).unwrap();
        assert_eq!(settings.endpoint, "http://proxy.internal/api");
        assert_eq!(settings.timings().unwrap().refresh_interval, Duration::from_secs(60));
        assert!(!settings.auto_refresh);
        assert_eq!(settings.exclude_tags, vec!["only_noc", "excludemonitor:yes"]);
        assert_eq!(settings.datadog.app_base.as_deref(), Some("https://app.datadoghq.eu"));
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "prod_tag = \"env:production\"\ndebounce = \"100ms\"\n");

        let settings = Settings::load_with_env(
            Some(&path),
            env(&[
                ("DOGWATCH_PROD_TAG", "env:live"),
                ("DOGWATCH_EXCLUDE_TAGS", "a,b"),
                ("DOGWATCH_DATADOG__API_KEY", "secret"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.prod_tag, "env:live");
        assert_eq!(settings.debounce, "100ms");
        assert_eq!(settings.exclude_tags, vec!["a", "b"]);
        assert_eq!(settings.datadog.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Settings::load_with_env(Some(&missing), env(&[])).is_err());
    }

    #[test]
    fn test_invalid_duration_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "refresh_interval = \"soon\"\n");
        let err = Settings::load_with_env(Some(&path), env(&[])).unwrap_err();
        assert!(err.to_string().contains("refresh_interval"));
    }

    #[test]
    fn test_zero_refresh_or_timeout_is_an_error() {
        let dir = TempDir::new().unwrap();

        let path = write_config(&dir, "refresh_interval = \"0s\"\n");
        let err = Settings::load_with_env(Some(&path), env(&[])).unwrap_err();
        assert!(err.to_string().contains("refresh_interval"));

        let path = write_config(&dir, "request_timeout = \"0ms\"\n");
        let err = Settings::load_with_env(Some(&path), env(&[])).unwrap_err();
        assert!(err.to_string().contains("request_timeout"));

        // A zero debounce just means "no delay"
        let path = write_config(&dir, "debounce = \"0ms\"\n");
        let settings = Settings::load_with_env(Some(&path), env(&[])).unwrap();
        assert_eq!(settings.timings().unwrap().debounce, Duration::ZERO);

        // CLI overrides go through the same check
        let settings = Settings {
            refresh_interval: "0s".to_string(),
            ..Settings::default()
        };
        assert!(settings.timings().is_err());
    }

    #[test]
    fn test_datadog_credentials_fallbacks() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("DATADOG_API_KEY", "from-env"),
            ("DATADOG_APP_KEY", "app-env"),
            ("DATADOG_APP_BASE", "https://app.datadoghq.eu"),
        ]);
        let lookup = |var: &str| vars.get(var).map(|v| v.to_string());

        let own = DatadogSettings {
            api_key: Some("from-config".to_string()),
            ..DatadogSettings::default()
        };
        let creds = own.credentials(lookup);
        assert_eq!(creds.api_key.as_deref(), Some("from-config"));
        assert_eq!(creds.app_key.as_deref(), Some("app-env"));
        assert_eq!(creds.api_base, DEFAULT_API_BASE);
        assert_eq!(creds.app_base, "https://app.datadoghq.eu");

        let none = DatadogSettings::default().credentials(|_| None);
        assert!(none.api_key.is_none());
        assert_eq!(none.app_base, DEFAULT_APP_BASE);
    }
}
