use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub reports: ReportsConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Address to bind the HTTP server to
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ReportsConfig {
    /// Directory holding the JSON report files
    #[serde(default = "default_reports_dir")]
    pub dir: String,
    /// Glob applied to report filenames (only .json files are ever listed)
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            dir: default_reports_dir(),
            pattern: default_pattern(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_reports_dir() -> String {
    "reports".to_string()
}

fn default_pattern() -> String {
    "*.json".to_string()
}

impl Config {
    /// Load config from a TOML file, applying dot-notation overrides.
    /// A missing file yields the defaults.
    pub fn load(path: &str, overrides: &[String]) -> anyhow::Result<Self> {
        let mut table = if Path::new(path).exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path))?;
            toml::from_str::<toml::Table>(&content)
                .with_context(|| format!("Failed to parse config file {}", path))?
        } else {
            info!("Config file {} not found, using defaults", path);
            toml::Table::new()
        };

        for entry in overrides {
            apply_override(&mut table, entry)?;
        }

        let config = toml::Value::Table(table)
            .try_into::<Config>()
            .context("Invalid configuration")?;
        debug!("Loaded config: {:?}", config);
        Ok(config)
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

/// Apply a `a.b.c=value` override to a TOML table
fn apply_override(table: &mut toml::Table, entry: &str) -> anyhow::Result<()> {
    let Some((key, raw)) = entry.split_once('=') else {
        bail!("Invalid config override '{}', expected key=value", entry);
    };
    let parts: Vec<&str> = key.trim().split('.').collect();
    if parts.iter().any(|p| p.is_empty()) {
        bail!("Invalid config override key '{}'", key);
    }

    let mut current = table;
    for part in &parts[..parts.len() - 1] {
        let next = current
            .entry(part.to_string())
            .or_insert(toml::Value::Table(toml::Table::new()));
        current = match next {
            toml::Value::Table(t) => t,
            _ => bail!("Config key '{}' is not a table", part),
        };
    }

    let last = parts[parts.len() - 1];
    current.insert(last.to_string(), parse_scalar(raw.trim()));
    Ok(())
}

/// Parse a value as a TOML scalar, falling back to a plain string
fn parse_scalar(raw: &str) -> toml::Value {
    toml::from_str::<toml::Table>(&format!("v = {}", raw))
        .ok()
        .and_then(|mut t| t.remove("v"))
        .unwrap_or_else(|| toml::Value::String(raw.to_string()))
}
