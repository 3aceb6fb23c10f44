//! The mutable aggregate of one simulation run. All writes go through methods so the
//! burn cap, the single-DOT/single-explode rules and fixed multipliers hold everywhere.

use std::collections::BTreeMap;

use serde::Serialize;

pub const MAX_BURN_STACKS: u32 = 12;
pub const DOT_PERIOD: f64 = 3.0;
pub const BASE_DPS_LABEL: &str = "base_dps";
/// Slack for "timer already due" comparisons.
pub const TIME_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BaseStats {
    pub attack: f64,
    /// Informational only.
    pub hp: f64,
    pub passive_dps: f64,
}

/// Deck-wide multipliers, computed once before the run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StaticModifiers {
    pub global: f64,
    pub special: f64,
}

impl Default for StaticModifiers {
    fn default() -> Self {
        Self {
            global: 1.0,
            special: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EventCounts {
    pub ice_arrow: u64,
    pub burn_add: u64,
    pub pulse: u64,
    pub explode: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DotTimer {
    due: f64,
    generation: u64,
}

#[derive(Debug, Clone)]
pub struct CombatState {
    stats: BaseStats,
    modifiers: StaticModifiers,
    now: f64,
    total_damage: f64,
    burn_stacks: u32,
    dot_timer: Option<DotTimer>,
    dot_generation: u64,
    explode_pending: bool,
    counts: EventCounts,
    arrow_counter: u64,
    arrow_stack_magnitude: Option<f64>,
    arrow_stack_expiries: Vec<f64>,
    /// Expiry of each active buff, keyed by the card that grants it.
    auras: BTreeMap<String, f64>,
    damage_breakdown: BTreeMap<String, f64>,
    cast_counts: BTreeMap<String, u32>,
}

impl CombatState {
    pub fn new(stats: BaseStats, modifiers: StaticModifiers) -> Self {
        Self {
            stats,
            modifiers,
            now: 0.0,
            total_damage: 0.0,
            burn_stacks: 0,
            dot_timer: None,
            dot_generation: 0,
            explode_pending: false,
            counts: EventCounts::default(),
            arrow_counter: 0,
            arrow_stack_magnitude: None,
            arrow_stack_expiries: Vec::new(),
            auras: BTreeMap::new(),
            damage_breakdown: BTreeMap::new(),
            cast_counts: BTreeMap::new(),
        }
    }

    pub fn stats(&self) -> BaseStats {
        self.stats
    }

    pub fn global_multiplier(&self) -> f64 {
        self.modifiers.global
    }

    pub fn special_multiplier(&self) -> f64 {
        self.modifiers.special
    }

    /// Attack scaled by the global multiplier; every damage formula starts here.
    pub fn scaled_attack(&self) -> f64 {
        self.stats.attack * self.modifiers.global
    }

    /// Passive damage per second, unaffected by procs.
    pub fn passive_rate(&self) -> f64 {
        self.stats.passive_dps * self.modifiers.global
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    /// Move the clock forward. Never moves it back.
    pub fn advance_to(&mut self, time: f64) {
        if time > self.now {
            self.now = time;
        }
    }

    pub fn total_damage(&self) -> f64 {
        self.total_damage
    }

    /// Add damage under `label`. Non-finite and non-positive amounts are ignored so the
    /// total never decreases.
    pub fn record_damage(&mut self, label: &str, amount: f64) {
        if !(amount.is_finite() && amount > 0.0) {
            return;
        }
        self.total_damage += amount;
        *self
            .damage_breakdown
            .entry(label.to_string())
            .or_insert(0.0) += amount;
    }

    pub fn accrue_passive(&mut self, amount: f64) {
        self.record_damage(BASE_DPS_LABEL, amount);
    }

    pub fn record_cast(&mut self, label: &str) {
        *self.cast_counts.entry(label.to_string()).or_insert(0) += 1;
    }

    pub fn damage_breakdown(&self) -> &BTreeMap<String, f64> {
        &self.damage_breakdown
    }

    pub fn cast_counts(&self) -> &BTreeMap<String, u32> {
        &self.cast_counts
    }

    pub fn counts(&self) -> EventCounts {
        self.counts
    }

    // Burn stacks

    pub fn burn_stacks(&self) -> u32 {
        self.burn_stacks
    }

    /// Add stacks up to the cap. The burn-add counter sees the uncapped amount.
    pub fn add_burn_stacks(&mut self, stacks: u32) -> u32 {
        self.counts.burn_add += u64::from(stacks);
        self.burn_stacks = self.burn_stacks.saturating_add(stacks).min(MAX_BURN_STACKS);
        self.burn_stacks
    }

    pub fn clear_burn_stacks(&mut self) {
        self.burn_stacks = 0;
    }

    // DOT timer

    pub fn dot_pending(&self) -> bool {
        self.dot_timer.is_some()
    }

    pub fn dot_due(&self) -> Option<f64> {
        self.dot_timer.map(|timer| timer.due)
    }

    /// Arm the single DOT timer; returns the generation the tick event must carry.
    pub fn arm_dot(&mut self, due: f64) -> u64 {
        self.dot_generation += 1;
        self.dot_timer = Some(DotTimer {
            due,
            generation: self.dot_generation,
        });
        self.dot_generation
    }

    /// Consume the timer if `generation` is the live one. Stale ticks return false.
    pub fn take_dot(&mut self, generation: u64) -> bool {
        match self.dot_timer {
            Some(timer) if timer.generation == generation => {
                self.dot_timer = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel_dot(&mut self) {
        self.dot_timer = None;
    }

    // Explode

    pub fn explode_pending(&self) -> bool {
        self.explode_pending
    }

    pub fn arm_explode(&mut self) {
        self.explode_pending = true;
    }

    pub fn disarm_explode(&mut self) {
        self.explode_pending = false;
    }

    pub fn count_explode(&mut self) {
        self.counts.explode += 1;
    }

    // Arrows and pulses

    pub fn count_ice_arrow(&mut self) {
        self.counts.ice_arrow += 1;
        self.arrow_counter += 1;
    }

    pub fn ice_arrows(&self) -> u64 {
        self.counts.ice_arrow
    }

    /// Subtract `threshold` from the arrow counter as often as it fits; returns how often.
    pub fn drain_arrow_counter(&mut self, threshold: u32) -> u32 {
        if threshold == 0 {
            return 0;
        }
        let threshold = u64::from(threshold);
        let mut procs = 0;
        while self.arrow_counter >= threshold {
            self.arrow_counter -= threshold;
            procs += 1;
        }
        procs
    }

    pub fn count_pulses(&mut self, pulses: u32) {
        self.counts.pulse += u64::from(pulses);
    }

    // Arrow stack buff

    /// The buff magnitude is fixed by the first stack ever pushed.
    pub fn push_arrow_stack(&mut self, magnitude: f64, expires_at: f64) {
        self.arrow_stack_magnitude.get_or_insert(magnitude);
        self.prune_arrow_stacks();
        self.arrow_stack_expiries.push(expires_at);
    }

    /// `magnitude ^ live_stacks`, pruning expired stacks.
    pub fn arrow_stack_multiplier(&mut self) -> f64 {
        self.prune_arrow_stacks();
        match (self.arrow_stack_magnitude, self.arrow_stack_expiries.len()) {
            (Some(magnitude), live) if live > 0 => magnitude.powi(live as i32),
            _ => 1.0,
        }
    }

    /// Arrow stacks still live at the current time.
    pub fn arrow_stacks(&self) -> usize {
        self.arrow_stack_expiries
            .iter()
            .filter(|&&expiry| expiry > self.now)
            .count()
    }

    fn prune_arrow_stacks(&mut self) {
        let now = self.now;
        self.arrow_stack_expiries.retain(|&expiry| expiry > now);
    }

    // Auras

    /// Push `name`'s expiry out to `expires_at`. Returns `true` when the aura was not
    /// active before, in which case the caller owns scheduling its expiry.
    pub fn refresh_aura(&mut self, name: &str, expires_at: f64) -> bool {
        match self.auras.get_mut(name) {
            Some(expiry) => {
                *expiry = expiry.max(expires_at);
                false
            }
            None => {
                self.auras.insert(name.to_string(), expires_at);
                true
            }
        }
    }

    /// Remove `name` if it is due. An aura refreshed past now stays and its new expiry
    /// is returned so the caller can wait for it.
    pub fn expire_aura(&mut self, name: &str) -> Option<f64> {
        let expires_at = *self.auras.get(name)?;
        if expires_at <= self.now + TIME_EPSILON {
            self.auras.remove(name);
            None
        } else {
            Some(expires_at)
        }
    }

    pub fn aura_expiry(&self, name: &str) -> Option<f64> {
        self.auras.get(name).copied()
    }

    pub fn active_auras(&self) -> usize {
        self.auras.len()
    }
}
