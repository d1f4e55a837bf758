// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_VERSION: i64 = 1;
const DEFAULT_LOAD_LATENCY: &str = "1s";
const DEFAULT_WRITE_LATENCY: &str = "500ms";
const DEFAULT_LOG_LEVEL: &str = "info";
const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub data: Data,
    #[serde(default)]
    pub latency: Latency,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            storage: Storage::default(),
            data: Data::default(),
            latency: Latency::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Storage {
    pub db_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Data {
    pub seed_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Latency {
    pub load: Option<String>,
    pub update: Option<String>,
    pub convert: Option<String>,
}

impl Default for Latency {
    fn default() -> Self {
        Self {
            load: Some(DEFAULT_LOAD_LATENCY.to_owned()),
            update: Some(DEFAULT_WRITE_LATENCY.to_owned()),
            convert: Some(DEFAULT_WRITE_LATENCY.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub dir: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
            dir: None,
        }
    }
}

/// Simulated round-trip time per gateway operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latencies {
    pub load: Duration,
    pub update: Duration,
    pub convert: Duration,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("SELLER_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set SELLER_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(seller_db::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and keep values under [storage], [data], [latency], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(db_path) = &self.storage.db_path {
            seller_db::validate_db_path(db_path)?;
        }

        if let Some(seed_path) = &self.data.seed_path
            && seed_path.trim().is_empty()
        {
            bail!(
                "data.seed_path in {} is empty; remove it to use the bundled dataset",
                path.display()
            );
        }

        self.latencies()
            .with_context(|| format!("invalid [latency] in {}", path.display()))?;

        let level = self.log_level();
        if !LOG_LEVELS.contains(&level) {
            bail!(
                "log.level in {} is {level:?}; use one of: {}",
                path.display(),
                LOG_LEVELS.join(", ")
            );
        }
        Ok(())
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.storage.db_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => seller_db::default_db_path(),
        }
    }

    pub fn seed_path(&self) -> Option<PathBuf> {
        self.data.seed_path.as_ref().map(PathBuf::from)
    }

    pub fn latencies(&self) -> Result<Latencies> {
        Ok(Latencies {
            load: parse_duration(
                self.latency
                    .load
                    .as_deref()
                    .unwrap_or(DEFAULT_LOAD_LATENCY),
            )?,
            update: parse_duration(
                self.latency
                    .update
                    .as_deref()
                    .unwrap_or(DEFAULT_WRITE_LATENCY),
            )?,
            convert: parse_duration(
                self.latency
                    .convert
                    .as_deref()
                    .unwrap_or(DEFAULT_WRITE_LATENCY),
            )?,
        })
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.log.dir {
            return Ok(PathBuf::from(dir));
        }
        let data_root = dirs::data_local_dir().ok_or_else(|| {
            anyhow!("cannot resolve data directory; set [log].dir in the config file")
        })?;
        Ok(data_root.join(seller_db::APP_NAME).join("logs"))
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# seller config\n# Place this file at: {}\n\nversion = 1\n\n[storage]\n# Optional. Default is platform data dir (for example ~/.local/share/seller/seller.db)\n# db_path = \"/absolute/path/to/seller.db\"\n\n[data]\n# Optional JSON array of leads replacing the bundled dataset.\n# seed_path = \"/absolute/path/to/leads.json\"\n\n[latency]\nload = \"{DEFAULT_LOAD_LATENCY}\"\nupdate = \"{DEFAULT_WRITE_LATENCY}\"\nconvert = \"{DEFAULT_WRITE_LATENCY}\"\n\n[log]\nlevel = \"{DEFAULT_LOG_LEVEL}\"\n# dir = \"/absolute/path/to/logs\"\n",
            path.display(),
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid latency duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid latency duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid latency duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 1s)")
}
