use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use client_core::{
    FixedRegions, LayoutRules, Viewport, DEFAULT_POLL_INTERVAL, DEFAULT_REQUEST_TIMEOUT,
    DEFAULT_VIDEO_FEED_TIMEOUT,
};
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "rps.toml";
const MIN_POLL_INTERVAL_MS: u64 = 50;
const MIN_REQUEST_TIMEOUT_MS: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server_url: String,
    pub poll_interval_ms: u64,
    pub request_timeout_ms: u64,
    pub video_feed_timeout_ms: u64,
    pub log_filter: String,
    pub viewport: Viewport,
    pub regions: FixedRegions,
    pub layout: LayoutRules,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT.as_millis() as u64,
            video_feed_timeout_ms: DEFAULT_VIDEO_FEED_TIMEOUT.as_millis() as u64,
            log_filter: "info".into(),
            viewport: Viewport::default(),
            regions: FixedRegions {
                header: 60,
                game_info: 110,
                instructions: 90,
                controls: 60,
            },
            layout: LayoutRules::default(),
        }
    }
}

impl Settings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(MIN_POLL_INTERVAL_MS))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.max(MIN_REQUEST_TIMEOUT_MS))
    }

    pub fn video_feed_timeout(&self) -> Duration {
        Duration::from_millis(self.video_feed_timeout_ms.max(MIN_REQUEST_TIMEOUT_MS))
    }

    pub fn with_cli_overrides(
        mut self,
        server_url: Option<String>,
        poll_interval_ms: Option<u64>,
    ) -> Self {
        if let Some(server_url) = server_url {
            self.server_url = server_url;
        }
        if let Some(poll_interval_ms) = poll_interval_ms {
            self.poll_interval_ms = poll_interval_ms;
        }
        self
    }
}

/// Loads defaults, then the settings file, then environment overrides.
///
/// An explicit `path` must exist; the default `rps.toml` is optional.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let mut settings = match path {
        Some(path) => read_settings_file(path)?,
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                read_settings_file(&default_path)?
            } else {
                Settings::default()
            }
        }
    };

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

pub fn parse_settings(raw: &str) -> Result<Settings> {
    toml::from_str(raw).context("invalid settings file")
}

fn read_settings_file(path: &Path) -> Result<Settings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    parse_settings(&raw).with_context(|| format!("failed to load '{}'", path.display()))
}

pub fn apply_env_overrides<F>(settings: &mut Settings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("RPS_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = lookup("APP__POLL_INTERVAL_MS").and_then(|v| v.parse().ok()) {
        settings.poll_interval_ms = v;
    }
    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
        settings.request_timeout_ms = v;
    }
    if let Some(v) = lookup("APP__VIDEO_FEED_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
        settings.video_feed_timeout_ms = v;
    }

    if let Some(v) = lookup("APP__LOG_FILTER") {
        settings.log_filter = v;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
