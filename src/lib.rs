//! Deterministic discrete-event DPS simulator for card decks, with a cost-bounded deck
//! optimizer on top.

pub mod cli;
pub mod combat;
pub mod data;
pub mod error;
pub mod optimizer;
pub mod parallel;

pub use combat::{run_simulation, EffectRegistry, SimulationReport, SimulationRequest};
pub use data::Catalog;
pub use error::{ConfigError, DanqingError, ExportError, InputError};
