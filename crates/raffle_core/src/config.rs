use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{celebration::CelebrationOptions, error::SettingsError};

pub const DEFAULT_CONFIG_FILE: &str = "raffle.toml";
pub const CONFIG_PATH_ENV: &str = "RAFFLE_CONFIG";
/// Longest animation a draw may run.
pub const MAX_ANIMATION_DURATION_MS: u64 = 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawSettings {
    pub tick_interval_ms: u64,
    pub animation_duration_ms: u64,
}

impl Default for DrawSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 50,
            animation_duration_ms: 3000,
        }
    }
}

impl DrawSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    /// Whether the animation is over after `ticks` timer firings.
    pub fn is_finished_after(&self, ticks: u64) -> bool {
        ticks.saturating_mul(self.tick_interval_ms) > self.animation_duration_ms
    }

    /// Number of ticks a full draw takes, the last one producing the winner.
    pub fn ticks_per_draw(&self) -> u64 {
        if self.tick_interval_ms == 0 {
            return 1;
        }
        self.animation_duration_ms / self.tick_interval_ms + 1
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.tick_interval_ms == 0 {
            return Err(SettingsError::ZeroTickInterval);
        }
        if self.animation_duration_ms > MAX_ANIMATION_DURATION_MS {
            return Err(SettingsError::DurationTooLong {
                duration_ms: self.animation_duration_ms,
                max_ms: MAX_ANIMATION_DURATION_MS,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaffleSettings {
    pub draw: DrawSettings,
    pub celebration: CelebrationOptions,
}

impl RaffleSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.draw.validate()?;
        self.celebration.validate()
    }
}

/// Loads settings from `explicit_path`, else `$RAFFLE_CONFIG`, else `./raffle.toml`,
/// then applies `RAFFLE__*` environment overrides. A missing file yields defaults.
pub fn load_settings(explicit_path: Option<&Path>) -> anyhow::Result<RaffleSettings> {
    let path = explicit_path
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    let mut settings = read_settings_file(&path, explicit_path.is_some())?;
    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    Ok(settings)
}

fn read_settings_file(path: &Path, required: bool) -> anyhow::Result<RaffleSettings> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
            tracing::debug!(path = %path.display(), "no settings file; using defaults");
            return Ok(RaffleSettings::default());
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))
        }
    };

    parse_settings(&raw)
        .with_context(|| format!("failed to parse settings file '{}'", path.display()))
}

pub fn parse_settings(raw: &str) -> anyhow::Result<RaffleSettings> {
    Ok(toml::from_str::<RaffleSettings>(raw)?)
}

pub fn apply_env_overrides(settings: &mut RaffleSettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = parsed_env(&lookup, "RAFFLE__TICK_INTERVAL_MS") {
        settings.draw.tick_interval_ms = v;
    }
    if let Some(v) = parsed_env(&lookup, "RAFFLE__ANIMATION_DURATION_MS") {
        settings.draw.animation_duration_ms = v;
    }
    if let Some(v) = parsed_env(&lookup, "RAFFLE__CELEBRATION_PARTICLES") {
        settings.celebration.particle_count = v;
    }
}

fn parsed_env<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Option<T> {
    let raw = lookup(name)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(variable = name, value = %raw, "ignoring unparsable override");
            None
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
