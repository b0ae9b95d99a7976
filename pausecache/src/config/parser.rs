//! INI → `ConfigFile`.
//!
//! The single place INI key names are mapped to struct fields.

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::cache::Tier;
use ini::Ini;
use std::path::PathBuf;

/// Parse an `Ini` into a `ConfigFile`, starting from defaults.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = section.get("default_tier") {
            config.cache.default_tier = parse_default_tier(v)
                .ok_or_else(|| invalid("cache", "default_tier", v, "must be 'partial' or 'full'"))?;
        }
        if let Some(v) = section.get("log_stats") {
            config.cache.log_stats = parse_bool(v)
                .ok_or_else(|| invalid("cache", "log_stats", v, "must be 'true' or 'false'"))?;
        }
    }

    if let Some(section) = ini.section(Some("fixture")) {
        if let Some(v) = section.get("latency_ms") {
            config.fixture.latency_ms = v.trim().parse().map_err(|_| {
                invalid(
                    "fixture",
                    "latency_ms",
                    v,
                    "must be a non-negative integer (milliseconds)",
                )
            })?;
        }
    }

    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Tiers a read can default to. `bare` is never fetched.
pub(super) fn parse_default_tier(value: &str) -> Option<Tier> {
    match value.trim().parse::<Tier>() {
        Ok(Tier::Bare) | Err(_) => None,
        Ok(tier) => Some(tier),
    }
}

pub(super) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}

/// Expand a leading `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
