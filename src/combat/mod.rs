pub mod effects;
pub mod engine;
pub mod event;
pub mod modifiers;
pub mod report;
pub mod resolvers;
pub mod rng;
pub mod roster;
pub mod state;

pub use effects::{
    effects_from_model, resolve_deck, CastFlavor, CooldownDecay, Effect, EffectBuilder,
    EffectRegistry, LevelTable, ResolvedCard,
};
pub use engine::{
    simulate, SimulationConfig, SimulationOutcome, TraceCollector, TraceEntry, TraceMode,
};
pub use event::{Event, EventKind, EventQueue, PulseShape};
pub use report::{run_simulation, SimulationReport, SimulationRequest};
pub use rng::Rng;
pub use state::{BaseStats, CombatState, EventCounts, StaticModifiers, MAX_BURN_STACKS};
