//! Simulation profile: default base stats, level and run length used by the CLI when the
//! caller does not pass them. Missing file means defaults; an unreadable one is logged.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::loader::DocumentFormat;

pub const DEFAULT_PROFILE_PATH: &str = "data/profile.json";
pub const PROFILE_PATH_ENV: &str = "DANQING_PROFILE";

pub const DEFAULT_LEVEL: i64 = 3;
pub const DEFAULT_BASE_ATK: f64 = 10_000.0;
pub const DEFAULT_BASE_HP: f64 = 200_000.0;
pub const DEFAULT_BASE_DPS: f64 = 50_000.0;
pub const DEFAULT_MAX_TIME: f64 = 180.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationProfile {
    pub base_atk: f64,
    pub base_hp: f64,
    pub base_dps: f64,
    pub level: i64,
    pub max_time: f64,
    /// Per-card level overrides, keyed by card id.
    pub card_levels: BTreeMap<String, i64>,
}

impl Default for SimulationProfile {
    fn default() -> Self {
        Self {
            base_atk: DEFAULT_BASE_ATK,
            base_hp: DEFAULT_BASE_HP,
            base_dps: DEFAULT_BASE_DPS,
            level: DEFAULT_LEVEL,
            max_time: DEFAULT_MAX_TIME,
            card_levels: BTreeMap::new(),
        }
    }
}

pub fn load_profile(path: impl AsRef<Path>) -> SimulationProfile {
    let path = path.as_ref();
    if !path.exists() {
        return SimulationProfile::default();
    }
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::warn!(path = %path.display(), "unable to read profile, using defaults: {err}");
            return SimulationProfile::default();
        }
    };
    DocumentFormat::from_path(path)
        .parse(&raw)
        .unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), "invalid profile, using defaults: {err}");
            SimulationProfile::default()
        })
}

/// `DANQING_PROFILE` if set, else the default path.
pub fn load_default_profile() -> SimulationProfile {
    match std::env::var(PROFILE_PATH_ENV) {
        Ok(path) if !path.trim().is_empty() => load_profile(path),
        _ => load_profile(DEFAULT_PROFILE_PATH),
    }
}
