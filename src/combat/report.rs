//! External request/response contract for a single simulation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::combat::effects::{resolve_deck, EffectRegistry, LevelTable};
use crate::combat::engine::{simulate, SimulationConfig, SimulationOutcome, TraceEntry, TraceMode};
use crate::combat::state::{BaseStats, EventCounts};
use crate::data::catalog::Catalog;
use crate::data::profile::{
    SimulationProfile, DEFAULT_BASE_ATK, DEFAULT_BASE_DPS, DEFAULT_BASE_HP, DEFAULT_LEVEL,
    DEFAULT_MAX_TIME,
};
use crate::error::InputError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationRequest {
    pub deck_ids: Vec<String>,
    /// Run level; clamped to the valid range.
    pub level: i64,
    pub card_levels: BTreeMap<String, i64>,
    pub base_atk: f64,
    pub base_hp: f64,
    pub base_dps: f64,
    pub max_time: f64,
    pub seed: Option<u64>,
    pub stop_at_damage: Option<f64>,
    #[serde(skip)]
    pub trace_mode: TraceMode,
}

impl Default for SimulationRequest {
    fn default() -> Self {
        Self {
            deck_ids: Vec::new(),
            level: DEFAULT_LEVEL,
            card_levels: BTreeMap::new(),
            base_atk: DEFAULT_BASE_ATK,
            base_hp: DEFAULT_BASE_HP,
            base_dps: DEFAULT_BASE_DPS,
            max_time: DEFAULT_MAX_TIME,
            seed: None,
            stop_at_damage: None,
            trace_mode: TraceMode::Off,
        }
    }
}

impl SimulationRequest {
    /// Request for `deck_ids` with stats, level and run length taken from `profile`.
    pub fn from_profile(profile: &SimulationProfile, deck_ids: Vec<String>) -> Self {
        Self {
            deck_ids,
            level: profile.level,
            card_levels: profile.card_levels.clone(),
            base_atk: profile.base_atk,
            base_hp: profile.base_hp,
            base_dps: profile.base_dps,
            max_time: profile.max_time,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), InputError> {
        positive("base_atk", self.base_atk)?;
        positive("base_hp", self.base_hp)?;
        positive("max_time", self.max_time)?;
        if !(self.base_dps.is_finite() && self.base_dps >= 0.0) {
            return Err(InputError::OutOfRange {
                field: "base_dps",
                constraint: "finite and >= 0",
                value: self.base_dps,
            });
        }
        if let Some(target) = self.stop_at_damage {
            positive("stop_at_damage", target)?;
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), InputError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(InputError::OutOfRange {
            field,
            constraint: "finite and > 0",
            value,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub deck: Vec<String>,
    pub level: u8,
    pub base_atk: f64,
    pub base_hp: f64,
    pub base_dps: f64,
    pub unknown: Vec<String>,
    /// Whole damage per second, truncated.
    pub dps: u64,
    pub combat_time: f64,
    pub total_cost: u32,
    pub events: EventCounts,
    pub details: BTreeMap<String, f64>,
    pub seed: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<TraceEntry>,
}

impl SimulationReport {
    fn new(
        request: &SimulationRequest,
        level: u8,
        unknown: Vec<String>,
        outcome: SimulationOutcome,
    ) -> Self {
        Self {
            deck: request.deck_ids.clone(),
            level,
            base_atk: request.base_atk,
            base_hp: request.base_hp,
            base_dps: request.base_dps,
            unknown,
            dps: outcome.total_dps.max(0.0) as u64,
            combat_time: outcome.combat_time,
            total_cost: outcome.total_cost,
            events: outcome.event_counts,
            details: outcome.damage_breakdown,
            seed: outcome.seed,
            trace: outcome.trace,
        }
    }
}

/// Resolve `request.deck_ids` against `catalog`, run one simulation and shape the report.
pub fn run_simulation(
    catalog: &Catalog,
    registry: &EffectRegistry,
    request: &SimulationRequest,
) -> Result<SimulationReport, InputError> {
    request.validate()?;
    let (cards, unknown) = catalog.resolve(&request.deck_ids);
    if cards.is_empty() {
        return Err(InputError::NoKnownCards {
            ids: request.deck_ids.clone(),
        });
    }
    if !unknown.is_empty() {
        tracing::warn!(?unknown, "ignoring card ids missing from the catalog");
    }

    let levels = LevelTable::new(request.level, &request.card_levels);
    let deck = resolve_deck(&cards, registry, &levels);
    let outcome = simulate(
        &deck,
        BaseStats {
            attack: request.base_atk,
            hp: request.base_hp,
            passive_dps: request.base_dps,
        },
        levels.run_level(),
        SimulationConfig {
            max_time: request.max_time,
            seed: request.seed,
            damage_target: request.stop_at_damage,
            trace_mode: request.trace_mode,
        },
    );
    Ok(SimulationReport::new(
        request,
        levels.run_level(),
        unknown,
        outcome,
    ))
}
