//! Session configuration assembled from an optional TOML file and flags.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use oddone_session::SessionConfig;
use oddone_system_field_layout::derive_seed_from_phrase;

/// Reads a session configuration document, keeping defaults for missing keys.
pub(crate) fn load_config(path: &Path) -> Result<SessionConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read session config at {}", path.display()))?;
    parse_config(&contents)
        .with_context(|| format!("invalid session config at {}", path.display()))
}

fn parse_config(contents: &str) -> Result<SessionConfig> {
    let config: SessionConfig =
        toml::from_str(contents).context("failed to parse session config toml contents")?;
    if config.start_level == 0 {
        anyhow::bail!("start_level must be at least 1");
    }
    if config.start_time.is_nan() || config.start_time <= 0.0 {
        anyhow::bail!("start_time must be positive (received {})", config.start_time);
    }
    if config.tick_interval.is_zero() {
        anyhow::bail!("tick_interval_ms must be positive");
    }
    Ok(config)
}

/// Interprets a seed argument: decimal and `0x` hex values are used as-is,
/// anything else is hashed.
pub(crate) fn resolve_seed(value: &str) -> u64 {
    let trimmed = value.trim();
    if let Ok(seed) = trimmed.parse::<u64>() {
        return seed;
    }
    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        if let Ok(seed) = u64::from_str_radix(&hex.replace('_', ""), 16) {
            return seed;
        }
    }
    derive_seed_from_phrase(trimmed)
}
