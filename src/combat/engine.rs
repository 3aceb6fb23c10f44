use std::collections::BTreeMap;

use serde::Serialize;

use crate::combat::effects::ResolvedCard;
use crate::combat::resolvers::RunContext;
use crate::combat::rng::{entropy_seed, Rng};
use crate::combat::state::{BaseStats, CombatState, EventCounts, StaticModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceMode {
    #[default]
    Off,
    Events,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    /// Simulated seconds; the run never goes past this.
    pub max_time: f64,
    /// `None` draws a seed from OS entropy and reports it back.
    pub seed: Option<u64>,
    /// Stop as soon as total damage reaches this amount.
    pub damage_target: Option<f64>,
    pub trace_mode: TraceMode,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_time: 180.0,
            seed: None,
            damage_target: None,
            trace_mode: TraceMode::Off,
        }
    }
}

/// State snapshot taken right after an event was dispatched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEntry {
    pub time: f64,
    pub event: &'static str,
    pub burn_stacks: u32,
    pub total_damage: f64,
    pub dot_pending: bool,
    pub explode_pending: bool,
    pub arrow_stacks: usize,
    pub active_auras: usize,
}

#[derive(Debug, Clone, Default)]
pub struct TraceCollector {
    enabled: bool,
    entries: Vec<TraceEntry>,
}

impl TraceCollector {
    pub fn new(mode: TraceMode) -> Self {
        Self {
            enabled: mode == TraceMode::Events,
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, event: &'static str, state: &CombatState) {
        if !self.enabled {
            return;
        }
        self.entries.push(TraceEntry {
            time: state.now(),
            event,
            burn_stacks: state.burn_stacks(),
            total_damage: state.total_damage(),
            dot_pending: state.dot_pending(),
            explode_pending: state.explode_pending(),
            arrow_stacks: state.arrow_stacks(),
            active_auras: state.active_auras(),
        });
    }

    pub fn into_entries(self) -> Vec<TraceEntry> {
        self.entries
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationOutcome {
    pub combat_time: f64,
    pub total_damage: f64,
    pub total_dps: f64,
    /// DPS minus the passive contribution.
    pub deck_dps: f64,
    pub passive_dps: f64,
    pub global_multiplier: f64,
    pub special_multiplier: f64,
    pub damage_breakdown: BTreeMap<String, f64>,
    pub cast_counts: BTreeMap<String, u32>,
    pub event_counts: EventCounts,
    pub total_cost: u32,
    pub seed: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<TraceEntry>,
}

/// Run one deterministic simulation of `deck` (levels and effects already resolved).
pub fn simulate(
    deck: &[ResolvedCard],
    stats: BaseStats,
    run_level: u8,
    config: SimulationConfig,
) -> SimulationOutcome {
    let seed = config.seed.unwrap_or_else(entropy_seed);
    let modifiers = StaticModifiers::from_deck(deck);
    let mut ctx = RunContext::new(
        CombatState::new(stats, modifiers),
        Rng::new(seed),
        deck,
        run_level,
    );
    ctx.seed_events();

    let mut trace = TraceCollector::new(config.trace_mode);
    let max_time = config.max_time;
    let target = config
        .damage_target
        .filter(|target| target.is_finite() && *target > 0.0);
    let rate = ctx.state.passive_rate();
    let reached = |state: &CombatState| target.is_some_and(|target| state.total_damage() >= target);
    let mut last_update = 0.0_f64;
    let mut dispatched = 0u64;

    loop {
        if reached(&ctx.state) {
            break;
        }
        let boundary = ctx
            .queue
            .peek_time()
            .map_or(max_time, |next| next.min(max_time));
        let gap = (boundary - last_update).max(0.0);

        if let Some(target) = target {
            let missing = target - ctx.state.total_damage();
            if rate > 0.0 && rate * gap >= missing {
                ctx.state.accrue_passive(missing);
                ctx.state.advance_to(last_update + missing / rate);
                break;
            }
        }
        ctx.state.accrue_passive(rate * gap);
        ctx.state.advance_to(boundary);
        last_update = boundary;

        let Some(event) = ctx.queue.pop_next() else {
            ctx.state.advance_to(max_time);
            break;
        };
        if event.time > max_time {
            ctx.state.advance_to(max_time);
            break;
        }
        ctx.state.advance_to(event.time);
        let name = event.kind.name();
        ctx.dispatch(event);
        dispatched += 1;
        trace.record(name, &ctx.state);

        if ctx.state.now() >= max_time {
            break;
        }
    }

    let state = ctx.state;
    let combat_time = state.now();
    let total_damage = state.total_damage();
    let total_dps = if combat_time > 0.0 {
        total_damage / combat_time
    } else {
        0.0
    };
    let passive_dps = state.passive_rate();
    tracing::debug!(
        seed,
        dispatched,
        combat_time,
        total_damage,
        "simulation finished"
    );

    SimulationOutcome {
        combat_time,
        total_damage,
        total_dps,
        deck_dps: total_dps - passive_dps,
        passive_dps,
        global_multiplier: state.global_multiplier(),
        special_multiplier: state.special_multiplier(),
        damage_breakdown: state.damage_breakdown().clone(),
        cast_counts: state.cast_counts().clone(),
        event_counts: state.counts(),
        total_cost: deck.iter().map(|entry| entry.card.cost).sum(),
        seed,
        trace: trace.into_entries(),
    }
}
