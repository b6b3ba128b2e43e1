// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use talisman_app::PageKind;
use talisman_tui::UiOptions;

pub const APP_NAME: &str = "talisman";

const CONFIG_VERSION: i64 = 1;
const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_TIMEOUT: &str = "8s";
const DEFAULT_REPORT_TIMEOUT: &str = "60s";
const DEFAULT_SEARCH_DEBOUNCE: &str = "300ms";
const DEFAULT_SAFETY_TIMEOUT: &str = "10s";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub api: Api,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            api: Api::default(),
            ui: Ui::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Api {
    pub base_url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub timeout: Option<String>,
    pub report_timeout: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ui {
    pub items_per_page: Option<i64>,
    pub era_page_size: Option<i64>,
    pub days_back: Option<i64>,
    pub start_page: Option<String>,
    pub search_debounce: Option<String>,
    pub safety_timeout: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("TALISMAN_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set TALISMAN_CONFIG_PATH to the config file")
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
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
                    "config file {} is not versioned. Add `version = 1` and keep values under [api], [ui], and [log]",
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
        if let Some(base_url) = &self.api.base_url
            && base_url.trim().is_empty()
        {
            bail!(
                "api.base_url in {} is empty; remove it or set a full URL such as http://localhost:8000",
                path.display()
            );
        }

        if self.api.port == Some(0) {
            bail!("api.port in {} must be between 1 and 65535", path.display());
        }

        for (key, value) in [
            ("ui.items_per_page", self.ui.items_per_page),
            ("ui.era_page_size", self.ui.era_page_size),
            ("ui.days_back", self.ui.days_back),
        ] {
            if let Some(value) = value
                && value <= 0
            {
                bail!(
                    "{key} in {} must be positive, got {value}",
                    path.display()
                );
            }
        }

        if let Some(page) = &self.ui.start_page
            && PageKind::parse(page).is_none()
        {
            bail!(
                "ui.start_page in {} must be one of dashboard, claims, practices, remittance, analytics; got {page:?}",
                path.display()
            );
        }

        for (key, value) in [
            ("api.timeout", &self.api.timeout),
            ("api.report_timeout", &self.api.report_timeout),
            ("ui.search_debounce", &self.ui.search_debounce),
            ("ui.safety_timeout", &self.ui.safety_timeout),
        ] {
            if let Some(raw) = value {
                let parsed = parse_duration(raw)
                    .with_context(|| format!("{key} in {}", path.display()))?;
                if parsed.is_zero() {
                    bail!("{key} in {} must be positive, got {raw}", path.display());
                }
            }
        }

        Ok(())
    }

    /// `[api].base_url`, then `TALISMAN_API_URL`, then host and port.
    pub fn api_base_url(&self) -> String {
        let explicit = self
            .api
            .base_url
            .clone()
            .or_else(|| env::var("TALISMAN_API_URL").ok())
            .filter(|url| !url.trim().is_empty());
        let url = explicit.unwrap_or_else(|| {
            format!(
                "http://{}:{}",
                self.api.host.as_deref().unwrap_or(DEFAULT_HOST),
                self.api.port.unwrap_or(DEFAULT_PORT)
            )
        });
        url.trim().trim_end_matches('/').to_owned()
    }

    pub fn api_timeout(&self) -> Result<Duration> {
        parse_duration(self.api.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn report_timeout(&self) -> Result<Duration> {
        parse_duration(
            self.api
                .report_timeout
                .as_deref()
                .unwrap_or(DEFAULT_REPORT_TIMEOUT),
        )
    }

    pub fn start_page(&self) -> PageKind {
        self.ui
            .start_page
            .as_deref()
            .and_then(PageKind::parse)
            .unwrap_or(PageKind::Dashboard)
    }

    pub fn days_back(&self) -> u32 {
        positive(self.ui.days_back, 90)
    }

    pub fn ui_options(&self) -> Result<UiOptions> {
        let defaults = UiOptions::default();
        Ok(UiOptions {
            items_per_page: positive(self.ui.items_per_page, defaults.items_per_page),
            era_page_size: positive(self.ui.era_page_size, defaults.era_page_size),
            days_back: self.days_back(),
            search_debounce: parse_duration(
                self.ui
                    .search_debounce
                    .as_deref()
                    .unwrap_or(DEFAULT_SEARCH_DEBOUNCE),
            )?,
            safety_timeout: parse_duration(
                self.ui
                    .safety_timeout
                    .as_deref()
                    .unwrap_or(DEFAULT_SAFETY_TIMEOUT),
            )?,
        })
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_file(&self) -> Result<PathBuf> {
        if let Some(file) = &self.log.file {
            return Ok(PathBuf::from(file));
        }
        let data_root = dirs::data_dir().ok_or_else(|| {
            anyhow!("cannot resolve data directory; set [log].file to an explicit path")
        })?;
        Ok(data_root.join(APP_NAME).join("talisman.log"))
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# talisman config\n# Place this file at: {}\n\nversion = 1\n\n[api]\n# Optional. Overrides host and port; TALISMAN_API_URL is used when unset.\n# base_url = \"http://localhost:8000\"\nhost = \"{DEFAULT_HOST}\"\nport = {DEFAULT_PORT}\ntimeout = \"{DEFAULT_TIMEOUT}\"\n# Insights reports are slow to render server-side.\nreport_timeout = \"{DEFAULT_REPORT_TIMEOUT}\"\n\n[ui]\nitems_per_page = 10\nera_page_size = 20\ndays_back = 90\n# dashboard, claims, practices, remittance or analytics\nstart_page = \"dashboard\"\nsearch_debounce = \"{DEFAULT_SEARCH_DEBOUNCE}\"\nsafety_timeout = \"{DEFAULT_SAFETY_TIMEOUT}\"\n\n[log]\nlevel = \"{DEFAULT_LOG_LEVEL}\"\n# Optional. Default is the platform data dir (for example ~/.local/share/talisman/talisman.log)\n# file = \"/absolute/path/to/talisman.log\"\n",
            path.display(),
        )
    }
}

fn positive<T: TryFrom<i64>>(value: Option<i64>, default: T) -> T {
    value
        .filter(|value| *value > 0)
        .and_then(|value| T::try_from(value).ok())
        .unwrap_or(default)
}

fn parse_duration(raw: &str) -> Result<Duration> {
    let raw = raw.trim();
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 300ms or 8s)")
}
