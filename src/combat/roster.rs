//! Standard card roster. Constants here override catalog scaling where the card's
//! mechanic is not expressed by the catalog's single `base + level * step` value.

use crate::combat::effects::{
    effects_from_model, CastFlavor, CooldownDecay, Effect, EffectRegistry, DEFAULT_CAST_COOLDOWN,
};
use crate::data::card::{Card, Scaling};

const VOLLEY_ARROWS: u32 = 3;
const VOLLEY_INTERVAL: Scaling = Scaling::new(16.0, -1.0);
const ARROW_COUNTER_THRESHOLD: Scaling = Scaling::new(16.0, -1.0);
const EXTRA_ARROW_CHANCE: Scaling = Scaling::new(0.70, 0.05);
const EXTRA_BURN_CHANCE: Scaling = Scaling::new(0.42, 0.03);
const ARROW_IGNITE_CHANCE: Scaling = Scaling::new(0.38, 0.02);
const FAN_PULSE_RATIO: Scaling = Scaling::new(0.52, 0.02);
const FAN_PULSE_INTERVAL: f64 = 15.0;
const DICE_BONUS_RATIO: Scaling = Scaling::new(0.7, 0.05);
const DICE_FIRST_ROLL_AT: f64 = 0.2;
const DICE_BATCH: u32 = 3;
const COIN_FLIP: f64 = 0.5;
const PULSE_IGNITE_CHANCE: Scaling = Scaling::new(0.70, 0.05);
const PULSE_IGNITE_STACKS: u32 = 3;
const MIRROR_EFFICIENCY: Scaling = Scaling::new(1.4, 0.1);
const MIRROR_ECHOES: u32 = 6;
const ANT_TICK_RATIO: Scaling = Scaling::new(0.014, 0.001);
const ANT_FIRST_BITE_AT: f64 = 0.5;
const ANT_INTERVAL: f64 = 3.0;
const EXPLODE_RATIO: Scaling = Scaling::new(0.52, 0.03);
const EXPLODE_THRESHOLD: u32 = 8;
const EXPLODE_DELAY: f64 = 1.5;
const ARROW_BUFF_DURATION: f64 = 10.0;
const STORM_COOLDOWN: f64 = 60.0;

impl EffectRegistry {
    /// Registry with every card of the standard roster.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry
            .register("yanhong", yanhong)
            .register("qihao", qihao)
            .register("wenmin", wenmin)
            .register("linfeng", linfeng)
            .register("shangguance", shangguance)
            .register("bear", bear)
            .register("icearrow_card", icearrow_card)
            .register("fan", fan)
            .register("dice", dice)
            .register("suishou", suishou)
            .register("mirror", mirror)
            .register("ant", ant)
            .register("twotails", twotails)
            .register("sixtails", sixtails)
            .register("zhouyixian", category_banner)
            .register("tiger", category_banner)
            .register("banner", category_banner)
            .register("woodsword", self_bonus);
        registry
    }
}

fn cooldown_or(card: &Card, default: f64) -> f64 {
    card.dps_model.params.cooldown.unwrap_or(default)
}

fn yanhong(card: &Card, level: u8) -> Vec<Effect> {
    vec![Effect::SkillCast {
        ratio: card.value_at(level),
        cooldown: cooldown_or(card, DEFAULT_CAST_COOLDOWN),
        flavor: CastFlavor::IceArrow,
        decay: None,
    }]
}

fn qihao(card: &Card, level: u8) -> Vec<Effect> {
    vec![Effect::SkillCast {
        ratio: card.value_at(level),
        cooldown: cooldown_or(card, STORM_COOLDOWN),
        flavor: CastFlavor::Storm,
        decay: Some(CooldownDecay {
            per_proc: 1.0,
            floor: 1.0,
        }),
    }]
}

fn wenmin(_card: &Card, level: u8) -> Vec<Effect> {
    vec![Effect::ArrowVolley {
        count: VOLLEY_ARROWS,
        interval: VOLLEY_INTERVAL.at(level),
    }]
}

fn linfeng(_card: &Card, level: u8) -> Vec<Effect> {
    vec![
        Effect::ExtraArrow {
            chance: EXTRA_ARROW_CHANCE.at(level),
        },
        Effect::ExtraBurn {
            chance: EXTRA_BURN_CHANCE.at(level),
        },
    ]
}

fn shangguance(_card: &Card, level: u8) -> Vec<Effect> {
    vec![Effect::ArrowIgnite {
        chance: ARROW_IGNITE_CHANCE.at(level),
        stacks: 1,
    }]
}

fn bear(card: &Card, level: u8) -> Vec<Effect> {
    let magnitude = card.value_at(level);
    if magnitude <= 0.0 {
        return Vec::new();
    }
    vec![Effect::ArrowStackBuff {
        magnitude,
        duration: ARROW_BUFF_DURATION,
    }]
}

/// Casts like any attack card and also turns arrow counts into pulses.
fn icearrow_card(card: &Card, level: u8) -> Vec<Effect> {
    let mut effects = effects_from_model(card, level);
    effects.push(Effect::ArrowCounter {
        threshold: ARROW_COUNTER_THRESHOLD.at(level).max(0.0) as u32,
    });
    effects
}

fn fan(_card: &Card, level: u8) -> Vec<Effect> {
    vec![Effect::PulseEmitter {
        first_at: FAN_PULSE_INTERVAL,
        batch: 1,
        interval: Some(FAN_PULSE_INTERVAL),
        ratio: Some(FAN_PULSE_RATIO.at(level)),
    }]
}

fn dice(_card: &Card, level: u8) -> Vec<Effect> {
    vec![
        Effect::PulseEmitter {
            first_at: DICE_FIRST_ROLL_AT,
            batch: DICE_BATCH,
            interval: None,
            ratio: None,
        },
        Effect::PulseBonus {
            chance: COIN_FLIP,
            ratio: DICE_BONUS_RATIO.at(level),
        },
    ]
}

fn suishou(_card: &Card, level: u8) -> Vec<Effect> {
    vec![Effect::PulseIgnite {
        chance: PULSE_IGNITE_CHANCE.at(level),
        stacks: PULSE_IGNITE_STACKS,
    }]
}

fn mirror(_card: &Card, level: u8) -> Vec<Effect> {
    vec![Effect::PulseEcho {
        chance: COIN_FLIP,
        efficiency: MIRROR_EFFICIENCY.at(level),
        echoes: MIRROR_ECHOES,
    }]
}

fn ant(_card: &Card, level: u8) -> Vec<Effect> {
    vec![
        Effect::BurnEmitter {
            first_at: ANT_FIRST_BITE_AT,
            stacks: 1,
            interval: ANT_INTERVAL,
        },
        Effect::BurnTick {
            ratio: ANT_TICK_RATIO.at(level),
        },
    ]
}

fn twotails(card: &Card, level: u8) -> Vec<Effect> {
    vec![Effect::BurnTrigger {
        ratio: card.value_at(level),
    }]
}

fn sixtails(_card: &Card, level: u8) -> Vec<Effect> {
    vec![Effect::BurnExplode {
        ratio: EXPLODE_RATIO.at(level),
        threshold: EXPLODE_THRESHOLD,
        delay: EXPLODE_DELAY,
    }]
}

fn category_banner(card: &Card, level: u8) -> Vec<Effect> {
    vec![Effect::GlobalBonus {
        bonus: card.value_at(level),
        per_category: true,
    }]
}

fn self_bonus(card: &Card, level: u8) -> Vec<Effect> {
    vec![Effect::GlobalBonus {
        bonus: card.value_at(level),
        per_category: false,
    }]
}
