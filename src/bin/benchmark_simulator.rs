//! Run simulator benchmark and optionally append one line to a log file for trend tracking.
//!
//! Usage:
//!   cargo run --release --bin benchmark_simulator
//!   cargo run --release --bin benchmark_simulator -- --log
//!
//! --log  Append one row to benchmark_log.csv
//!        (date, sims_per_sec, sims_per_min, events_per_sec, sim_seconds).

use std::fs::OpenOptions;
use std::io::Write;
use std::process;
use std::time::Instant;

use danqing::combat::{
    resolve_deck, simulate, BaseStats, EffectRegistry, LevelTable, SimulationConfig, TraceMode,
};
use danqing::data::builtin_catalog;

const LOG_PATH: &str = "benchmark_log.csv";
const LOG_HEADER: &[u8] = b"date,sims_per_sec,sims_per_min,events_per_sec,sim_seconds\n";

fn main() {
    let log = std::env::args().any(|a| a == "--log");

    let catalog = match builtin_catalog() {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("catalog error: {err}");
            process::exit(1);
        }
    };
    let (cards, _) = catalog.resolve(&[
        "yanhong", "wenmin", "linfeng", "shangguance", "bear", "ant", "sixtails", "fan", "mirror",
    ]);
    let deck = resolve_deck(&cards, &EffectRegistry::standard(), &LevelTable::uniform(6));
    let stats = BaseStats {
        attack: 10_000.0,
        hp: 200_000.0,
        passive_dps: 50_000.0,
    };
    let sim_seconds = 300.0;
    let config = SimulationConfig {
        max_time: sim_seconds,
        seed: Some(7),
        damage_target: None,
        trace_mode: TraceMode::Off,
    };
    let events_per_sim = {
        let traced = simulate(
            &deck,
            stats,
            6,
            SimulationConfig {
                trace_mode: TraceMode::Events,
                ..config
            },
        );
        traced.trace.len()
    };

    // Run for at least this long or this many simulations
    const MIN_DURATION_MS: u128 = 2000;
    const MIN_SIMS: u32 = 500;

    let start = Instant::now();
    let mut sims: u32 = 0;
    while start.elapsed().as_millis() < MIN_DURATION_MS || sims < MIN_SIMS {
        let _ = simulate(&deck, stats, 6, config);
        sims += 1;
    }
    let elapsed_secs = start.elapsed().as_secs_f64();

    let sims_per_sec = sims as f64 / elapsed_secs;
    let sims_per_min = sims_per_sec * 60.0;
    let events_per_sec = sims_per_sec * events_per_sim as f64;

    println!("Simulator benchmark ({sim_seconds} s/simulation, {events_per_sim} events):");
    println!("  Simulations:  {}", sims);
    println!("  Duration:     {:.2} s", elapsed_secs);
    println!("  Sims/s:       {:.2}", sims_per_sec);
    println!("  Sims/min:     {:.2}", sims_per_min);
    println!("  Events/s:     {:.2}", events_per_sec);

    if log {
        let date = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
        let line = format!(
            "{},{:.4},{:.4},{:.4},{}\n",
            date, sims_per_sec, sims_per_min, events_per_sec, sim_seconds
        );
        if let Err(err) = append_log(&line) {
            eprintln!("unable to write {LOG_PATH}: {err}");
            process::exit(1);
        }
        println!("Appended to {}", LOG_PATH);
    }
}

fn append_log(line: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(LOG_PATH)?;
    if file.metadata().map(|m| m.len() == 0).unwrap_or(true) {
        file.write_all(LOG_HEADER)?;
    }
    file.write_all(line.as_bytes())?;
    file.flush()
}
