use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{anyhow, Context};
use client_core::{
    transport::{DEFAULT_CUSTOMERS_PATH, DEFAULT_ORDERS_PATH},
    DateStampPolicy, LocaleDateFormatter, ServiceEndpoints,
};
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "orders.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub customers_path: String,
    pub orders_path: String,
    pub request_timeout_secs: u64,
    pub date_policy: DateStampPolicy,
    pub utc_offset_minutes: i32,
    pub require_ack: bool,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".into(),
            customers_path: DEFAULT_CUSTOMERS_PATH.into(),
            orders_path: DEFAULT_ORDERS_PATH.into(),
            request_timeout_secs: 30,
            date_policy: DateStampPolicy::AlwaysNow,
            utc_offset_minutes: LocaleDateFormatter::DEFAULT_OFFSET_MINUTES,
            require_ack: false,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn endpoints(&self) -> anyhow::Result<ServiceEndpoints> {
        ServiceEndpoints::from_base(&self.api_url, &self.customers_path, &self.orders_path)
            .with_context(|| format!("invalid orders service url '{}'", self.api_url))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn date_formatter(&self) -> anyhow::Result<LocaleDateFormatter> {
        LocaleDateFormatter::from_offset_minutes(self.utc_offset_minutes)
            .ok_or_else(|| anyhow!("utc offset out of range: {} minutes", self.utc_offset_minutes))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_url: Option<String>,
    customers_path: Option<String>,
    orders_path: Option<String>,
    request_timeout_secs: Option<u64>,
    date_policy: Option<DateStampPolicy>,
    utc_offset_minutes: Option<i32>,
    require_ack: Option<bool>,
    log_filter: Option<String>,
}

/// Defaults, then the config file, then the environment. An explicit
/// `path` must exist; the default `orders.toml` is optional.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
    };
    match fs::read_to_string(&path) {
        Ok(raw) => {
            apply_file(&mut settings, &raw)
                .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
        }
        Err(err) if !required && err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()));
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;

    if let Some(v) = file_cfg.api_url {
        settings.api_url = v;
    }
    if let Some(v) = file_cfg.customers_path {
        settings.customers_path = v;
    }
    if let Some(v) = file_cfg.orders_path {
        settings.orders_path = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
    if let Some(v) = file_cfg.date_policy {
        settings.date_policy = v;
    }
    if let Some(v) = file_cfg.utc_offset_minutes {
        settings.utc_offset_minutes = v;
    }
    if let Some(v) = file_cfg.require_ack {
        settings.require_ack = v;
    }
    if let Some(v) = file_cfg.log_filter {
        settings.log_filter = v;
    }
    Ok(())
}

fn apply_env(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    if let Some(v) = lookup("ORDERS_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = lookup("APP__API_URL") {
        settings.api_url = v;
    }

    if let Some(v) = lookup("APP__CUSTOMERS_PATH") {
        settings.customers_path = v;
    }
    if let Some(v) = lookup("APP__ORDERS_PATH") {
        settings.orders_path = v;
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        settings.request_timeout_secs = v
            .trim()
            .parse()
            .with_context(|| format!("APP__REQUEST_TIMEOUT_SECS is not a number: '{v}'"))?;
    }

    if let Some(v) = lookup("APP__DATE_POLICY") {
        settings.date_policy = v.parse().map_err(|err: String| anyhow!("APP__DATE_POLICY: {err}"))?;
    }

    if let Some(v) = lookup("APP__UTC_OFFSET_MINUTES") {
        settings.utc_offset_minutes = v
            .trim()
            .parse()
            .with_context(|| format!("APP__UTC_OFFSET_MINUTES is not a number: '{v}'"))?;
    }

    if let Some(v) = lookup("APP__REQUIRE_ACK") {
        settings.require_ack = parse_flag(&v)
            .ok_or_else(|| anyhow!("APP__REQUIRE_ACK must be true or false, got '{v}'"))?;
    }

    if let Some(v) = lookup("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    Ok(())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
