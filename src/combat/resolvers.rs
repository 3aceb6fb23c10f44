//! One handler per event kind. Handlers read card behavior only through [`Effect`]
//! variants and iterate the deck in order, so RNG draws happen in a fixed sequence.

use crate::combat::effects::{CastFlavor, Effect, ResolvedCard, FIRST_CAST_AT};
use crate::combat::event::{
    Event, EventKind, EventQueue, PulseShape, PRIORITY_CHAINED, PRIORITY_EXPLODE,
};
use crate::combat::rng::Rng;
use crate::combat::state::{CombatState, DOT_PERIOD};

const DEFAULT_DOT_RATIO_BASE: f64 = 0.014;
const DEFAULT_DOT_RATIO_STEP: f64 = 0.001;
const DEFAULT_DOT_LABEL: &str = "Burn-DOT";
/// Delay between an arrow-counter crossing and the pulse it grants.
const COUNTER_PULSE_DELAY: f64 = 0.1;

/// Everything a single run owns. Dropped when the run ends.
pub struct RunContext<'a> {
    pub state: CombatState,
    pub queue: EventQueue,
    pub rng: Rng,
    pub deck: &'a [ResolvedCard],
    pub run_level: u8,
}

impl<'a> RunContext<'a> {
    pub fn new(state: CombatState, rng: Rng, deck: &'a [ResolvedCard], run_level: u8) -> Self {
        Self {
            state,
            queue: EventQueue::new(),
            rng,
            deck,
            run_level,
        }
    }

    /// Schedule the first occurrence of every periodic effect, in deck order.
    pub fn seed_events(&mut self) {
        let deck = self.deck;
        for (source, entry) in deck.iter().enumerate() {
            if entry.skill_cast().is_some() {
                self.queue
                    .schedule(Event::at(FIRST_CAST_AT, EventKind::SkillCast { source }));
            }
            for effect in &entry.effects {
                match *effect {
                    Effect::ArrowVolley { count, interval } => self.queue.schedule(Event::at(
                        interval,
                        EventKind::IceArrow {
                            source,
                            count,
                            interval,
                        },
                    )),
                    Effect::PulseEmitter {
                        first_at,
                        batch,
                        interval,
                        ratio,
                    } => self.queue.schedule(Event::at(
                        first_at,
                        EventKind::Pulse {
                            source,
                            shape: PulseShape::Batch {
                                count: batch,
                                ratio,
                                interval,
                            },
                        },
                    )),
                    Effect::BurnEmitter {
                        first_at,
                        stacks,
                        interval,
                    } => self.queue.schedule(Event::at(
                        first_at,
                        EventKind::BurnApply {
                            source: Some(source),
                            stacks,
                            interval: Some(interval),
                        },
                    )),
                    _ => {}
                }
            }
        }
    }

    /// Apply one event. The clock must already sit at `event.time`.
    pub fn dispatch(&mut self, event: Event) {
        match event.kind {
            EventKind::SkillCast { source } => self.on_skill_cast(source),
            EventKind::IceArrow {
                source,
                count,
                interval,
            } => self.on_ice_arrow(source, count, interval),
            EventKind::BurnApply {
                source,
                stacks,
                interval,
            } => self.on_burn_apply(source, stacks, interval),
            EventKind::DotTick { source, generation } => self.on_dot_tick(source, generation),
            EventKind::Pulse { source, shape } => self.on_pulse(source, shape),
            EventKind::BurnExplode { source } => self.on_burn_explode(source),
            EventKind::BuffExpire { aura } => {
                if let Some(expires_at) = self.state.expire_aura(&aura) {
                    self.queue
                        .schedule(Event::at(expires_at, EventKind::BuffExpire { aura }));
                }
            }
        }
    }

    fn now(&self) -> f64 {
        self.state.now()
    }

    /// `ratio × atk × global × special`, the formula shared by every special hit.
    fn special_hit(&self, ratio: f64) -> f64 {
        ratio * self.state.scaled_attack() * self.state.special_multiplier()
    }

    fn on_skill_cast(&mut self, source: usize) {
        let deck = self.deck;
        let Some(entry) = deck.get(source) else {
            return;
        };
        let Some((ratio, cooldown, flavor, decay)) = entry.skill_cast() else {
            return;
        };

        let mut damage = ratio * self.state.scaled_attack();
        if flavor.is_special() {
            damage *= self.state.special_multiplier();
        }
        if flavor == CastFlavor::IceArrow {
            damage *= self.state.arrow_stack_multiplier();
        }
        let label = flavor.label(entry.name());
        self.state.record_damage(&label, damage);
        self.state.record_cast(&label);

        if flavor == CastFlavor::IceArrow {
            self.state.count_ice_arrow();
            self.run_arrow_counter();
            self.apply_arrow_hit();
        }

        let next = decay.map_or(cooldown, |decay| {
            decay.apply(cooldown, self.state.ice_arrows())
        });
        self.queue.schedule(Event::at(
            self.now() + next,
            EventKind::SkillCast { source },
        ));
    }

    fn on_ice_arrow(&mut self, source: usize, count: u32, interval: f64) {
        let deck = self.deck;
        let mut hits = count;
        for effect in deck.iter().flat_map(|entry| &entry.effects) {
            if let Effect::ExtraArrow { chance } = *effect {
                let rolls = hits;
                for _ in 0..rolls {
                    if self.rng.chance(chance) {
                        hits += 1;
                    }
                }
            }
        }

        for _ in 0..hits {
            self.state.count_ice_arrow();
            for effect in deck.iter().flat_map(|entry| &entry.effects) {
                if let Effect::ArrowIgnite { chance, stacks } = *effect {
                    if self.rng.chance(chance) {
                        self.chain_burn(stacks);
                    }
                }
            }
            self.apply_arrow_hit();
        }
        self.run_arrow_counter();

        self.queue.schedule(Event::at(
            self.now() + interval,
            EventKind::IceArrow {
                source,
                count,
                interval,
            },
        ));
    }

    fn on_burn_apply(&mut self, source: Option<usize>, stacks: u32, interval: Option<f64>) {
        if stacks == 0 {
            return;
        }
        let deck = self.deck;

        let mut added = stacks;
        for effect in deck.iter().flat_map(|entry| &entry.effects) {
            if let Effect::ExtraBurn { chance } = *effect {
                let rolls = added;
                for _ in 0..rolls {
                    if self.rng.chance(chance) {
                        added += 1;
                    }
                }
            }
        }

        for entry in deck {
            for effect in &entry.effects {
                if let Effect::BurnTrigger { ratio } = *effect {
                    let damage = self.special_hit(ratio * f64::from(added));
                    self.state
                        .record_damage(&format!("{}-Passive", entry.name()), damage);
                }
            }
        }

        let now = self.now();
        let stacks_now = self.state.add_burn_stacks(added);
        if stacks_now > 0 && !self.state.dot_pending() {
            self.arm_dot(now + DOT_PERIOD);
        }

        if !self.state.explode_pending() {
            let explode = deck
                .iter()
                .enumerate()
                .find_map(|(index, entry)| entry.explode().map(|explode| (index, explode)));
            if let Some((index, (_, threshold, delay))) = explode {
                if stacks_now >= threshold {
                    self.state.arm_explode();
                    self.queue.schedule(
                        Event::at(now + delay, EventKind::BurnExplode { source: index })
                            .with_priority(PRIORITY_EXPLODE),
                    );
                }
            }
        }

        if let Some(interval) = interval.filter(|interval| *interval > 0.0) {
            self.queue.schedule(Event::at(
                now + interval,
                EventKind::BurnApply {
                    source,
                    stacks,
                    interval: Some(interval),
                },
            ));
        }
    }

    fn on_dot_tick(&mut self, source: Option<usize>, generation: u64) {
        if !self.state.take_dot(generation) {
            return;
        }
        let stacks = self.state.burn_stacks();
        if stacks == 0 {
            return;
        }

        let deck = self.deck;
        let tick = source.and_then(|index| {
            let entry = deck.get(index)?;
            entry.effects.iter().find_map(|effect| match *effect {
                Effect::BurnTick { ratio } => Some((ratio, format!("{}-Burn", entry.name()))),
                _ => None,
            })
        });
        let (ratio, label) = tick.unwrap_or_else(|| {
            (
                DEFAULT_DOT_RATIO_BASE + DEFAULT_DOT_RATIO_STEP * f64::from(self.run_level),
                DEFAULT_DOT_LABEL.to_string(),
            )
        });
        let damage = self.special_hit(ratio * f64::from(stacks));
        self.state.record_damage(&label, damage);

        self.arm_dot(self.now() + DOT_PERIOD);
    }

    fn on_pulse(&mut self, source: usize, shape: PulseShape) {
        let deck = self.deck;
        let Some(entry) = deck.get(source) else {
            return;
        };
        let (count, ratio, interval) = match shape {
            PulseShape::Echo { ratio } => {
                let damage = self.special_hit(ratio);
                self.state
                    .record_damage(&format!("{}-Echo", entry.name()), damage);
                return;
            }
            PulseShape::Batch {
                count,
                ratio,
                interval,
            } => (count, ratio, interval),
        };
        let now = self.now();

        self.state.count_pulses(count);
        if let Some(ratio) = ratio {
            let damage = self.special_hit(ratio * f64::from(count));
            self.state
                .record_damage(&format!("{}-Pulse", entry.name()), damage);
        }

        for bonus_card in deck {
            for effect in &bonus_card.effects {
                if let Effect::PulseBonus { chance, ratio } = *effect {
                    for _ in 0..count {
                        if self.rng.chance(chance) {
                            let damage = self.special_hit(ratio);
                            self.state
                                .record_damage(&format!("{}-Bonus", bonus_card.name()), damage);
                        }
                    }
                }
            }
        }

        for effect in deck.iter().flat_map(|entry| &entry.effects) {
            if let Effect::PulseIgnite { chance, stacks } = *effect {
                for _ in 0..count {
                    if self.rng.chance(chance) {
                        self.chain_burn(stacks);
                    }
                }
            }
        }

        if let Some(ratio) = ratio {
            for (echo_source, echo_card) in deck.iter().enumerate() {
                for effect in &echo_card.effects {
                    if let Effect::PulseEcho {
                        chance,
                        efficiency,
                        echoes,
                    } = *effect
                    {
                        for _ in 0..count {
                            if self.rng.chance(chance) {
                                for step in 1..=echoes {
                                    self.queue.schedule(Event::at(
                                        now + f64::from(step),
                                        EventKind::Pulse {
                                            source: echo_source,
                                            shape: PulseShape::Echo {
                                                ratio: ratio * efficiency,
                                            },
                                        },
                                    ));
                                }
                            }
                        }
                    }
                }
            }
        }

        if let Some(interval) = interval {
            self.queue.schedule(Event::at(
                now + interval,
                EventKind::Pulse { source, shape },
            ));
        }
    }

    fn on_burn_explode(&mut self, source: usize) {
        self.state.disarm_explode();
        let stacks = self.state.burn_stacks();
        if stacks == 0 {
            return;
        }
        let deck = self.deck;
        let Some(entry) = deck.get(source) else {
            return;
        };
        let Some((ratio, _, _)) = entry.explode() else {
            return;
        };
        self.state.count_explode();
        let damage = self.special_hit(ratio * f64::from(stacks));
        self.state
            .record_damage(&format!("{}-Explode", entry.name()), damage);
        self.state.clear_burn_stacks();
        self.state.cancel_dot();
    }

    /// Burn application chained from another proc; resolves after same-instant events.
    fn chain_burn(&mut self, stacks: u32) {
        self.queue.schedule(
            Event::at(
                self.now(),
                EventKind::BurnApply {
                    source: None,
                    stacks,
                    interval: None,
                },
            )
            .with_priority(PRIORITY_CHAINED),
        );
    }

    fn arm_dot(&mut self, due: f64) {
        let source = self.deck.iter().position(|entry| {
            entry
                .effects
                .iter()
                .any(|effect| matches!(effect, Effect::BurnTick { .. }))
        });
        let generation = self.state.arm_dot(due);
        self.queue
            .schedule(Event::at(due, EventKind::DotTick { source, generation }));
    }

    fn run_arrow_counter(&mut self) {
        let counter = self.deck.iter().enumerate().find_map(|(index, entry)| {
            entry.effects.iter().find_map(|effect| match *effect {
                Effect::ArrowCounter { threshold } => Some((index, threshold)),
                _ => None,
            })
        });
        let Some((source, threshold)) = counter else {
            return;
        };
        let procs = self.state.drain_arrow_counter(threshold);
        let at = self.now() + COUNTER_PULSE_DELAY;
        for _ in 0..procs {
            self.queue.schedule(Event::at(
                at,
                EventKind::Pulse {
                    source,
                    shape: PulseShape::Batch {
                        count: 1,
                        ratio: None,
                        interval: None,
                    },
                },
            ));
        }
    }

    /// Per-hit effects of any ice arrow: buff stacks and their auras. An aura keeps a
    /// single pending expiry however often it is refreshed.
    fn apply_arrow_hit(&mut self) {
        let deck = self.deck;
        let now = self.now();
        for entry in deck {
            for effect in &entry.effects {
                if let Effect::ArrowStackBuff {
                    magnitude,
                    duration,
                } = *effect
                {
                    let expires_at = now + duration;
                    self.state.push_arrow_stack(magnitude, expires_at);
                    if self.state.refresh_aura(&entry.card.id, expires_at) {
                        self.queue.schedule(Event::at(
                            expires_at,
                            EventKind::BuffExpire {
                                aura: entry.card.id.clone(),
                            },
                        ));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::state::{BaseStats, StaticModifiers};
    use crate::data::card::{Card, CardCategory, DpsModel};

    fn entry(id: &str, effects: Vec<Effect>) -> ResolvedCard {
        ResolvedCard {
            card: Card {
                id: id.to_string(),
                name: id.to_string(),
                category: CardCategory::Beast,
                cost: 1,
                dps_model: DpsModel::default(),
            },
            level: 6,
            effects,
        }
    }

    fn context(deck: &[ResolvedCard]) -> RunContext<'_> {
        context_with(deck, StaticModifiers::default())
    }

    fn context_with(deck: &[ResolvedCard], modifiers: StaticModifiers) -> RunContext<'_> {
        let stats = BaseStats {
            attack: 1000.0,
            hp: 1.0,
            passive_dps: 0.0,
        };
        RunContext::new(CombatState::new(stats, modifiers), Rng::new(1), deck, 6)
    }

    fn burn(stacks: u32) -> Event {
        Event::at(
            1.0,
            EventKind::BurnApply {
                source: None,
                stacks,
                interval: None,
            },
        )
    }

    fn volley(count: u32) -> ResolvedCard {
        entry(
            "volley",
            vec![Effect::ArrowVolley {
                count,
                interval: 10.0,
            }],
        )
    }

    fn single_pulse() -> ResolvedCard {
        entry(
            "emitter",
            vec![Effect::PulseEmitter {
                first_at: 1.0,
                batch: 3,
                interval: None,
                ratio: None,
            }],
        )
    }

    fn caster(id: &str, flavor: CastFlavor) -> ResolvedCard {
        entry(
            id,
            vec![Effect::SkillCast {
                ratio: 1.0,
                cooldown: 6.0,
                flavor,
                decay: None,
            }],
        )
    }

    /// Drain events up to `until`, returning (time, name) for each dispatched event.
    fn run(ctx: &mut RunContext<'_>, until: f64) -> Vec<(f64, &'static str)> {
        let mut seen = Vec::new();
        while ctx.queue.peek_time().is_some_and(|time| time <= until) {
            let Some(event) = ctx.queue.pop_next() else {
                break;
            };
            ctx.state.advance_to(event.time);
            seen.push((event.time, event.kind.name()));
            ctx.dispatch(event);
        }
        seen
    }

    #[test]
    fn dot_ticks_every_three_seconds_while_stacks_remain() {
        let deck = vec![entry("ant", vec![Effect::BurnTick { ratio: 0.02 }])];
        let mut ctx = context(&deck);
        ctx.queue.schedule(Event::at(
            1.0,
            EventKind::BurnApply {
                source: None,
                stacks: 2,
                interval: None,
            },
        ));
        let ticks: Vec<f64> = run(&mut ctx, 10.5)
            .into_iter()
            .filter(|(_, name)| *name == "dot_tick")
            .map(|(time, _)| time)
            .collect();
        assert_eq!(ticks, vec![4.0, 7.0, 10.0]);
        let burn = ctx.state.damage_breakdown()["ant-Burn"];
        assert!((burn - 3.0 * 0.02 * 2.0 * 1000.0).abs() < 1e-9);
    }

    #[test]
    fn dot_stops_rescheduling_at_zero_stacks() {
        let deck = Vec::new();
        let mut ctx = context(&deck);
        ctx.state.add_burn_stacks(1);
        ctx.arm_dot(3.0);
        ctx.state.clear_burn_stacks();
        run(&mut ctx, 100.0);
        assert!(ctx.queue.is_empty());
        assert!(!ctx.state.dot_pending());
        assert_eq!(ctx.state.total_damage(), 0.0);
    }

    #[test]
    fn default_dot_ratio_follows_run_level() {
        let deck = Vec::new();
        let mut ctx = context(&deck);
        ctx.state.add_burn_stacks(4);
        ctx.arm_dot(3.0);
        run(&mut ctx, 3.0);
        let expected = (0.014 + 0.006) * 4.0 * 1000.0;
        assert!((ctx.state.damage_breakdown()[DEFAULT_DOT_LABEL] - expected).abs() < 1e-9);
    }

    #[test]
    fn explode_clears_stacks_and_cancels_pending_dot() {
        let deck = vec![entry(
            "sixtails",
            vec![Effect::BurnExplode {
                ratio: 0.5,
                threshold: 8,
                delay: 1.5,
            }],
        )];
        let mut ctx = context(&deck);
        ctx.queue.schedule(Event::at(
            2.0,
            EventKind::BurnApply {
                source: None,
                stacks: 9,
                interval: None,
            },
        ));
        let seen = run(&mut ctx, 20.0);
        assert!(seen.contains(&(3.5, "burn_explode")));
        assert_eq!(ctx.state.counts().explode, 1);
        assert_eq!(ctx.state.burn_stacks(), 0);
        let explode = ctx.state.damage_breakdown()["sixtails-Explode"];
        assert!((explode - 0.5 * 9.0 * 1000.0).abs() < 1e-9);
        assert!(!ctx.state.damage_breakdown().contains_key(DEFAULT_DOT_LABEL));
    }

    #[test]
    fn zero_stack_burn_is_a_no_op() {
        let deck = vec![entry("twotails", vec![Effect::BurnTrigger { ratio: 1.0 }])];
        let mut ctx = context(&deck);
        ctx.dispatch(Event::at(
            0.0,
            EventKind::BurnApply {
                source: None,
                stacks: 0,
                interval: Some(3.0),
            },
        ));
        assert!(ctx.queue.is_empty());
        assert_eq!(ctx.state.counts().burn_add, 0);
    }

    #[test]
    fn arrow_counter_grants_delayed_pulses() {
        let deck = vec![
            entry("counter", vec![Effect::ArrowCounter { threshold: 2 }]),
            entry(
                "volley",
                vec![Effect::ArrowVolley {
                    count: 5,
                    interval: 10.0,
                }],
            ),
        ];
        let mut ctx = context(&deck);
        ctx.seed_events();
        let seen = run(&mut ctx, 10.5);
        let pulses = seen.iter().filter(|(_, name)| *name == "pulse").count();
        assert_eq!(pulses, 2);
        assert_eq!(ctx.state.counts().pulse, 2);
        assert_eq!(ctx.state.counts().ice_arrow, 5);
    }

    #[test]
    fn echo_pulses_follow_an_owned_pulse() {
        let deck = vec![
            entry(
                "fan",
                vec![Effect::PulseEmitter {
                    first_at: 1.0,
                    batch: 1,
                    interval: None,
                    ratio: Some(0.5),
                }],
            ),
            entry(
                "mirror",
                vec![Effect::PulseEcho {
                    chance: 1.0,
                    efficiency: 2.0,
                    echoes: 6,
                }],
            ),
        ];
        let mut ctx = context(&deck);
        ctx.seed_events();
        let seen = run(&mut ctx, 100.0);
        let echoes: Vec<f64> = seen
            .iter()
            .filter(|(_, name)| *name == "pulse_echo")
            .map(|(time, _)| *time)
            .collect();
        assert_eq!(echoes, vec![2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        assert_eq!(ctx.state.counts().pulse, 1);
        let echo = ctx.state.damage_breakdown()["mirror-Echo"];
        assert!((echo - 6.0 * 1.0 * 1000.0).abs() < 1e-9);
    }

    #[test]
    fn arrow_stack_buff_multiplies_ice_arrow_casts_only() {
        let deck = vec![
            caster("arrow", CastFlavor::IceArrow),
            caster("storm", CastFlavor::Storm),
            entry(
                "bear",
                vec![Effect::ArrowStackBuff {
                    magnitude: 1.5,
                    duration: 10.0,
                }],
            ),
        ];
        let mut ctx = context(&deck);
        ctx.seed_events();
        run(&mut ctx, 12.5);
        // 0.1 has no stack; 6.1 and 12.1 each see the one stack from six seconds earlier.
        let breakdown = ctx.state.damage_breakdown();
        assert!((breakdown["arrow-Ice Arrow"] - (1000.0 + 1500.0 + 1500.0)).abs() < 1e-9);
        assert!((breakdown["storm-Frost Storm"] - 3000.0).abs() < 1e-9);
    }

    #[test]
    fn buff_aura_keeps_one_pending_expiry() {
        let deck = vec![
            volley(4),
            entry(
                "bear",
                vec![Effect::ArrowStackBuff {
                    magnitude: 1.5,
                    duration: 10.0,
                }],
            ),
        ];
        let mut ctx = context(&deck);
        ctx.seed_events();
        run(&mut ctx, 10.0);
        assert_eq!(ctx.state.arrow_stacks(), 4);
        assert_eq!(ctx.state.aura_expiry("bear"), Some(20.0));
        // Next volley at 20.0 plus the single expiry.
        assert_eq!(ctx.queue.len(), 2);

        let seen = run(&mut ctx, 20.0);
        assert!(seen.contains(&(20.0, "buff_expire")));
        assert_eq!(ctx.state.aura_expiry("bear"), Some(30.0));
    }

    #[test]
    fn burn_trigger_deals_ratio_per_added_stack() {
        let deck = vec![entry("twotails", vec![Effect::BurnTrigger { ratio: 0.16 }])];
        let mut ctx = context_with(
            &deck,
            StaticModifiers {
                global: 2.0,
                special: 1.5,
            },
        );
        ctx.dispatch(burn(3));
        let expected = 0.16 * 3.0 * 1000.0 * 2.0 * 1.5;
        assert!((ctx.state.damage_breakdown()["twotails-Passive"] - expected).abs() < 1e-9);
    }

    #[test]
    fn pulse_bonus_rolls_once_per_pulse() {
        let always = [
            single_pulse(),
            entry(
                "dice",
                vec![Effect::PulseBonus {
                    chance: 1.0,
                    ratio: 0.7,
                }],
            ),
        ];
        let mut ctx = context(&always);
        ctx.seed_events();
        run(&mut ctx, 5.0);
        assert!((ctx.state.damage_breakdown()["dice-Bonus"] - 3.0 * 0.7 * 1000.0).abs() < 1e-9);

        let never = [
            single_pulse(),
            entry(
                "dice",
                vec![Effect::PulseBonus {
                    chance: 0.0,
                    ratio: 0.7,
                }],
            ),
        ];
        let mut ctx = context(&never);
        ctx.seed_events();
        run(&mut ctx, 5.0);
        assert!(!ctx.state.damage_breakdown().contains_key("dice-Bonus"));
        assert_eq!(ctx.state.counts().pulse, 3);
    }

    #[test]
    fn extra_arrow_rolls_once_per_volley_arrow() {
        for (chance, arrows) in [(1.0, 6), (0.0, 3)] {
            let deck = vec![volley(3), entry("linfeng", vec![Effect::ExtraArrow { chance }])];
            let mut ctx = context(&deck);
            ctx.seed_events();
            run(&mut ctx, 10.0);
            assert_eq!(ctx.state.counts().ice_arrow, arrows);
        }
    }

    #[test]
    fn extra_burn_rolls_once_per_applied_stack() {
        for (chance, stacks) in [(1.0, 4), (0.0, 2)] {
            let deck = vec![entry("linfeng", vec![Effect::ExtraBurn { chance }])];
            let mut ctx = context(&deck);
            ctx.dispatch(burn(2));
            assert_eq!(ctx.state.burn_stacks(), stacks);
            assert_eq!(ctx.state.counts().burn_add, u64::from(stacks));
        }
    }

    #[test]
    fn arrow_ignite_chains_a_burn_per_arrow() {
        for (chance, stacks) in [(1.0, 3), (0.0, 0)] {
            let deck = vec![
                volley(3),
                entry("shangguance", vec![Effect::ArrowIgnite { chance, stacks: 1 }]),
            ];
            let mut ctx = context(&deck);
            ctx.seed_events();
            run(&mut ctx, 10.0);
            assert_eq!(ctx.state.burn_stacks(), stacks);
        }
    }

    #[test]
    fn pulse_ignite_chains_burns_per_pulse() {
        for (chance, stacks) in [(1.0, 9), (0.0, 0)] {
            let deck = vec![
                single_pulse(),
                entry("suishou", vec![Effect::PulseIgnite { chance, stacks: 3 }]),
            ];
            let mut ctx = context(&deck);
            ctx.seed_events();
            run(&mut ctx, 5.0);
            assert_eq!(ctx.state.burn_stacks(), stacks);
        }
    }
}
