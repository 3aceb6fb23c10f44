//! Typed effect descriptors and the registry that maps card ids onto them.
//!
//! Resolvers only ever match on [`Effect`] variants. A new card is a new registry entry;
//! the event loop and resolver dispatch never change for it.

use std::collections::BTreeMap;

use crate::data::card::{clamp_level, Card, DpsModelKind};

pub const DEFAULT_CAST_COOLDOWN: f64 = 6.0;
/// First cast of every cast-type card.
pub const FIRST_CAST_AT: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastFlavor {
    Plain,
    /// Special damage, also amplified by the arrow stack buff and counted as an ice arrow.
    IceArrow,
    /// Special damage.
    Storm,
}

impl CastFlavor {
    pub fn is_special(self) -> bool {
        !matches!(self, Self::Plain)
    }

    pub fn label(self, card_name: &str) -> String {
        match self {
            Self::Plain => card_name.to_string(),
            Self::IceArrow => format!("{card_name}-Ice Arrow"),
            Self::Storm => format!("{card_name}-Frost Storm"),
        }
    }
}

/// Cooldown shrinks by `per_proc` for every ice arrow fired so far, down to `floor`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CooldownDecay {
    pub per_proc: f64,
    pub floor: f64,
}

impl CooldownDecay {
    pub fn apply(&self, cooldown: f64, procs: u64) -> f64 {
        if procs == 0 {
            return cooldown;
        }
        (cooldown - self.per_proc * procs as f64).max(self.floor)
    }
}

/// One role a card plays, with every level-dependent value already resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Periodic instantaneous hit.
    SkillCast {
        ratio: f64,
        cooldown: f64,
        flavor: CastFlavor,
        decay: Option<CooldownDecay>,
    },
    /// Periodic ice-arrow volley; first volley after one interval.
    ArrowVolley { count: u32, interval: f64 },
    /// Per volley sub-hit chance of one extra arrow.
    ExtraArrow { chance: f64 },
    /// Per applied stack chance of one extra burn stack.
    ExtraBurn { chance: f64 },
    /// Per arrow sub-hit chance to chain a burn application.
    ArrowIgnite { chance: f64, stacks: u32 },
    /// Every arrow hit adds an expiring stack to the ice-arrow damage buff.
    ArrowStackBuff { magnitude: f64, duration: f64 },
    /// Converts the arrow counter into one-pulse batches every `threshold` arrows.
    ArrowCounter { threshold: u32 },
    PulseEmitter {
        first_at: f64,
        batch: u32,
        interval: Option<f64>,
        ratio: Option<f64>,
    },
    PulseBonus { chance: f64, ratio: f64 },
    PulseIgnite { chance: f64, stacks: u32 },
    PulseEcho {
        chance: f64,
        efficiency: f64,
        echoes: u32,
    },
    BurnEmitter {
        first_at: f64,
        stacks: u32,
        interval: f64,
    },
    /// Overrides the default DOT tick ratio.
    BurnTick { ratio: f64 },
    /// Immediate damage per stack added.
    BurnTrigger { ratio: f64 },
    BurnExplode {
        ratio: f64,
        threshold: u32,
        delay: f64,
    },
    GlobalBonus { bonus: f64, per_category: bool },
    SpecialBonus { bonus: f64 },
}

impl Effect {
    /// Rejects shapes that would stall or corrupt the loop (non-positive periods).
    pub fn is_well_formed(&self) -> bool {
        let positive = |value: f64| value.is_finite() && value > 0.0;
        match self {
            Self::SkillCast { cooldown, ratio, .. } => positive(*cooldown) && ratio.is_finite(),
            Self::ArrowVolley { interval, .. } => positive(*interval),
            Self::PulseEmitter {
                first_at, interval, ..
            } => first_at.is_finite() && *first_at >= 0.0 && interval.map_or(true, positive),
            Self::BurnEmitter {
                first_at, interval, ..
            } => first_at.is_finite() && *first_at >= 0.0 && positive(*interval),
            Self::BurnExplode { delay, .. } => positive(*delay),
            Self::ArrowStackBuff { duration, .. } => positive(*duration),
            _ => true,
        }
    }
}

/// Builds the effects of one card at its resolved level.
pub type EffectBuilder = fn(&Card, u8) -> Vec<Effect>;

#[derive(Debug, Clone, Default)]
pub struct EffectRegistry {
    builders: BTreeMap<String, EffectBuilder>,
}

impl EffectRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: impl Into<String>, builder: EffectBuilder) -> &mut Self {
        self.builders.insert(id.into(), builder);
        self
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.builders.contains_key(id)
    }

    /// Effects for `card` at `level`. Unrecognized damage models and malformed effects
    /// degrade to nothing rather than failing the run.
    pub fn effects_for(&self, card: &Card, level: u8) -> Vec<Effect> {
        if let DpsModelKind::Unrecognized(kind) = &card.dps_model.kind {
            tracing::warn!(
                card = %card.id,
                kind = %kind,
                "unrecognized damage model, card is inert"
            );
            return Vec::new();
        }
        let effects = match self.builders.get(&card.id) {
            Some(builder) => builder(card, level),
            None => effects_from_model(card, level),
        };
        effects
            .into_iter()
            .filter(|effect| {
                let ok = effect.is_well_formed();
                if !ok {
                    tracing::warn!(card = %card.id, ?effect, "malformed effect dropped");
                }
                ok
            })
            .collect()
    }
}

/// Effects implied by the damage-model kind alone, for cards without a registry entry.
pub fn effects_from_model(card: &Card, level: u8) -> Vec<Effect> {
    let model = &card.dps_model;
    match model.kind {
        DpsModelKind::AttackScaling => vec![Effect::SkillCast {
            ratio: card.value_at(level),
            cooldown: model.params.cooldown.unwrap_or(DEFAULT_CAST_COOLDOWN),
            flavor: CastFlavor::Plain,
            decay: None,
        }],
        DpsModelKind::GlobalMultiplier => vec![Effect::GlobalBonus {
            bonus: card.value_at(level),
            per_category: model.params.per_category.unwrap_or(false),
        }],
        DpsModelKind::SpecialDamageMultiplier => vec![Effect::SpecialBonus {
            bonus: card.value_at(level),
        }],
        DpsModelKind::Passive | DpsModelKind::Unrecognized(_) => Vec::new(),
    }
}

/// Run level plus per-card overrides, all clamped to the valid range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTable {
    default: u8,
    overrides: BTreeMap<String, u8>,
}

impl LevelTable {
    pub fn new(level: i64, overrides: &BTreeMap<String, i64>) -> Self {
        Self {
            default: clamp_level(level),
            overrides: overrides
                .iter()
                .map(|(id, level)| (id.clone(), clamp_level(*level)))
                .collect(),
        }
    }

    pub fn uniform(level: i64) -> Self {
        Self::new(level, &BTreeMap::new())
    }

    pub fn run_level(&self) -> u8 {
        self.default
    }

    pub fn level_for(&self, card_id: &str) -> u8 {
        self.overrides.get(card_id).copied().unwrap_or(self.default)
    }
}

/// A deck entry ready for simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCard {
    pub card: Card,
    pub level: u8,
    pub effects: Vec<Effect>,
}

impl ResolvedCard {
    pub fn name(&self) -> &str {
        &self.card.name
    }

    pub fn skill_cast(&self) -> Option<(f64, f64, CastFlavor, Option<CooldownDecay>)> {
        self.effects.iter().find_map(|effect| match *effect {
            Effect::SkillCast {
                ratio,
                cooldown,
                flavor,
                decay,
            } => Some((ratio, cooldown, flavor, decay)),
            _ => None,
        })
    }

    pub fn explode(&self) -> Option<(f64, u32, f64)> {
        self.effects.iter().find_map(|effect| match *effect {
            Effect::BurnExplode {
                ratio,
                threshold,
                delay,
            } => Some((ratio, threshold, delay)),
            _ => None,
        })
    }
}

/// Attach levels and effects to `cards`, keeping deck order.
pub fn resolve_deck(
    cards: &[Card],
    registry: &EffectRegistry,
    levels: &LevelTable,
) -> Vec<ResolvedCard> {
    cards
        .iter()
        .map(|card| {
            let level = levels.level_for(&card.id);
            ResolvedCard {
                card: card.clone(),
                level,
                effects: registry.effects_for(card, level),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::card::{CardCategory, CardParams, DpsModel, Scaling};

    fn card(id: &str, kind: DpsModelKind, cooldown: Option<f64>) -> Card {
        Card {
            id: id.to_string(),
            name: id.to_uppercase(),
            category: CardCategory::Item,
            cost: 1,
            dps_model: DpsModel {
                kind,
                scaling: Scaling::new(0.5, 0.1),
                params: CardParams {
                    cooldown,
                    per_category: None,
                },
            },
        }
    }

    #[test]
    fn attack_scaling_without_entry_becomes_plain_cast() {
        let plain = card("x", DpsModelKind::AttackScaling, None);
        let effects = EffectRegistry::empty().effects_for(&plain, 2);
        assert_eq!(
            effects,
            vec![Effect::SkillCast {
                ratio: 0.7,
                cooldown: DEFAULT_CAST_COOLDOWN,
                flavor: CastFlavor::Plain,
                decay: None,
            }]
        );
    }

    #[test]
    fn unrecognized_model_is_inert_even_when_registered() {
        let mut registry = EffectRegistry::empty();
        registry.register("x", |_, _| vec![Effect::SpecialBonus { bonus: 1.0 }]);
        let inert = card("x", DpsModelKind::Unrecognized("WEIRD".into()), None);
        assert!(registry.effects_for(&inert, 6).is_empty());
    }

    #[test]
    fn zero_cooldown_cast_is_dropped() {
        let stalled = card("x", DpsModelKind::AttackScaling, Some(0.0));
        assert!(EffectRegistry::empty().effects_for(&stalled, 6).is_empty());
    }

    #[test]
    fn level_table_clamps_overrides() {
        let overrides = BTreeMap::from([("a".to_string(), 42), ("b".to_string(), -1)]);
        let table = LevelTable::new(9, &overrides);
        assert_eq!(table.run_level(), 6);
        assert_eq!(table.level_for("a"), 6);
        assert_eq!(table.level_for("b"), 0);
        assert_eq!(table.level_for("c"), 6);
    }

    #[test]
    fn decay_is_floored_and_ignored_without_procs() {
        let decay = CooldownDecay {
            per_proc: 1.0,
            floor: 1.0,
        };
        assert_eq!(decay.apply(60.0, 0), 60.0);
        assert_eq!(decay.apply(60.0, 10), 50.0);
        assert_eq!(decay.apply(60.0, 500), 1.0);
    }
}
