use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde_json::Value;

use crate::combat::{
    run_simulation, EffectRegistry, SimulationReport, SimulationRequest, TraceMode,
};
use crate::data::loader::{
    load_catalog_or_default, read_document, BUILTIN_CATALOG, CATALOG_PATH_ENV,
    DEFAULT_CATALOG_PATH,
};
use crate::data::profile::{load_default_profile, load_profile};
use crate::data::validate::{validate_catalog_document, ValidationReport, ValidationSeverity};
use crate::data::Catalog;
use crate::error::{ConfigError, DanqingError, Result};
use crate::optimizer::export::write_rankings_csv;
use crate::optimizer::{optimize_decks_with_progress, BudgetRanking, OptimizationScenario};
use crate::parallel::WorkerPool;

const USAGE: &str = "usage: danqing <simulate|optimize|validate|cards>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Simulate,
    Optimize,
    Validate,
    Cards,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("simulate") => Some(Command::Simulate),
        Some("optimize") => Some(Command::Optimize),
        Some("validate") => Some(Command::Validate),
        Some("cards") => Some(Command::Cards),
        _ => None,
    }
}

/// Dispatch `args` (program name first). Returns the process exit code:
/// 0 success, 1 runtime failure, 2 usage error.
pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Simulate) => handle_simulate(&args[2..]),
        Some(Command::Optimize) => handle_optimize(&args[2..]),
        Some(Command::Validate) => handle_validate(&args[2..]),
        Some(Command::Cards) => handle_cards(&args[2..]),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

/// `--flag value` pairs, bare `--switch`es and positional arguments.
#[derive(Debug, Default)]
struct Flags {
    values: BTreeMap<String, String>,
    switches: Vec<String>,
    positional: Vec<String>,
}

impl Flags {
    fn parse(
        args: &[String],
        value_flags: &[&str],
        switch_flags: &[&str],
    ) -> std::result::Result<Self, String> {
        let mut flags = Self::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            let Some(name) = arg.strip_prefix("--") else {
                flags.positional.push(arg.clone());
                continue;
            };
            if switch_flags.contains(&name) {
                flags.switches.push(name.to_string());
            } else if value_flags.contains(&name) {
                let value = iter
                    .next()
                    .ok_or_else(|| format!("missing value for --{name}"))?;
                flags.values.insert(name.to_string(), value.clone());
            } else {
                return Err(format!("unknown option --{name}"));
            }
        }
        Ok(flags)
    }

    fn get(&self, name: &str) -> Option<&String> {
        self.values.get(name)
    }

    fn has(&self, name: &str) -> bool {
        self.switches.iter().any(|switch| switch == name)
    }
}

const SIMULATE_USAGE: &str = "usage: danqing simulate <card-id>... [--level N] [--seed N] \
[--time SECS] [--atk X] [--hp X] [--dps X] [--stop-at DMG] [--catalog PATH] [--profile PATH] \
[--trace]";
const OPTIMIZE_USAGE: &str = "usage: danqing optimize [--min N] [--max N] [--top N] [--limit N] \
[--workers N] [--seed N] [--level N] [--time SECS] [--no-target] [--catalog PATH] [--csv PATH]";
const VALIDATE_USAGE: &str = "usage: danqing validate [--catalog PATH | PATH]";
const CARDS_USAGE: &str = "usage: danqing cards [--catalog PATH] [--json]";

/// Report a runtime failure and map it onto exit code 1.
fn fail(action: &str, err: DanqingError) -> i32 {
    eprintln!("{action} failed: {err}");
    1
}

fn usage(message: &str, usage: &str) -> i32 {
    eprintln!("{message}");
    eprintln!("{usage}");
    2
}

fn load_catalog_flag(flags: &Flags) -> Result<Catalog> {
    let explicit = flags.get("catalog").map(PathBuf::from);
    Ok(load_catalog_or_default(explicit.as_deref())?)
}

fn handle_simulate(args: &[String]) -> i32 {
    const VALUES: &[&str] = &[
        "level", "seed", "time", "atk", "hp", "dps", "stop-at", "catalog", "profile",
    ];
    let flags = match Flags::parse(args, VALUES, &["trace"]) {
        Ok(flags) => flags,
        Err(message) => return usage(&message, SIMULATE_USAGE),
    };
    let deck_ids: Vec<String> = flags
        .positional
        .iter()
        .flat_map(|arg| arg.split(','))
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();
    if deck_ids.is_empty() {
        return usage("at least one card id is required", SIMULATE_USAGE);
    }

    match simulate(&flags, deck_ids) {
        Ok(report) => print_json(&report, "simulation result"),
        Err(err) => fail("simulation", err),
    }
}

fn simulate(flags: &Flags, deck_ids: Vec<String>) -> Result<SimulationReport> {
    let catalog = load_catalog_flag(flags)?;
    let profile = match flags.get("profile") {
        Some(path) => load_profile(path),
        None => load_default_profile(),
    };

    let mut request = SimulationRequest::from_profile(&profile, deck_ids);
    request.level = parse_arg(flags.get("level"), "level", request.level);
    request.max_time = parse_arg(flags.get("time"), "time", request.max_time);
    request.base_atk = parse_arg(flags.get("atk"), "atk", request.base_atk);
    request.base_hp = parse_arg(flags.get("hp"), "hp", request.base_hp);
    request.base_dps = parse_arg(flags.get("dps"), "dps", request.base_dps);
    request.seed = parse_optional_arg(flags.get("seed"), "seed");
    request.stop_at_damage = parse_optional_arg(flags.get("stop-at"), "stop-at");
    if flags.has("trace") {
        request.trace_mode = TraceMode::Events;
    }

    Ok(run_simulation(&catalog, &EffectRegistry::standard(), &request)?)
}

fn handle_optimize(args: &[String]) -> i32 {
    const VALUES: &[&str] = &[
        "min", "max", "top", "limit", "workers", "seed", "level", "time", "catalog", "csv",
    ];
    let flags = match Flags::parse(args, VALUES, &["no-target"]) {
        Ok(flags) if flags.positional.is_empty() => flags,
        Ok(flags) => {
            let message = format!("unexpected argument '{}'", flags.positional[0]);
            return usage(&message, OPTIMIZE_USAGE);
        }
        Err(message) => return usage(&message, OPTIMIZE_USAGE),
    };

    match optimize(&flags) {
        Ok(rankings) => print_json(&rankings, "optimization result"),
        Err(err) => fail("optimization", err),
    }
}

fn optimize(flags: &Flags) -> Result<Vec<BudgetRanking>> {
    let catalog = load_catalog_flag(flags)?;

    let defaults = OptimizationScenario::default();
    let first = parse_arg(flags.get("min"), "min", *defaults.budgets.start());
    let last = parse_arg(flags.get("max"), "max", *defaults.budgets.end());
    let limit = parse_arg(flags.get("limit"), "limit", defaults.max_decks_per_budget);
    let scenario = OptimizationScenario {
        budgets: first..=last,
        max_decks_per_budget: limit,
        top_k: parse_arg(flags.get("top"), "top", defaults.top_k),
        level: parse_arg(flags.get("level"), "level", defaults.level),
        max_time: parse_arg(flags.get("time"), "time", defaults.max_time),
        seed: parse_arg(flags.get("seed"), "seed", defaults.seed),
        damage_target: if flags.has("no-target") {
            None
        } else {
            defaults.damage_target
        },
        workers: WorkerPool::with_workers(parse_arg(flags.get("workers"), "workers", 0)),
        ..defaults
    };

    let rankings = optimize_decks_with_progress(
        &catalog,
        &EffectRegistry::standard(),
        &scenario,
        |done, total| tracing::info!(done, total, "optimizer progress"),
    );

    if let Some(path) = flags.get("csv") {
        write_rankings_csv(path, &rankings)?;
    }
    Ok(rankings)
}

fn handle_validate(args: &[String]) -> i32 {
    let flags = match Flags::parse(args, &["catalog"], &[]) {
        Ok(flags) => flags,
        Err(message) => return usage(&message, VALIDATE_USAGE),
    };
    let explicit = match (flags.get("catalog"), flags.positional.as_slice()) {
        (None, []) => None,
        (Some(path), []) | (None, [path]) => Some(PathBuf::from(path)),
        _ => return usage("expected a single catalog path", VALIDATE_USAGE),
    };

    let (label, report) = match validate(explicit) {
        Ok(validated) => validated,
        Err(err) => return fail("validation", err),
    };
    for diagnostic in &report.diagnostics {
        match diagnostic.severity {
            ValidationSeverity::Error | ValidationSeverity::Warning => eprintln!("- {diagnostic}"),
            ValidationSeverity::Info => println!("- {diagnostic}"),
        }
    }
    if report.has_errors() {
        eprintln!(
            "validation failed: {} error(s), {} warning(s)",
            report.count(ValidationSeverity::Error),
            report.count(ValidationSeverity::Warning)
        );
        1
    } else {
        println!(
            "validation passed: {label} ({} warning(s))",
            report.count(ValidationSeverity::Warning)
        );
        0
    }
}

/// Validate the explicit path, then `DANQING_CATALOG`, then the default file, then the
/// built-in catalog. Returns the source label alongside the report.
fn validate(explicit: Option<PathBuf>) -> Result<(String, ValidationReport)> {
    let explicit = explicit.or_else(|| {
        std::env::var(CATALOG_PATH_ENV)
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
    });
    let (label, document) = match explicit {
        Some(path) => (path.display().to_string(), read_document(&path)?),
        None if Path::new(DEFAULT_CATALOG_PATH).exists() => (
            DEFAULT_CATALOG_PATH.to_string(),
            read_document(Path::new(DEFAULT_CATALOG_PATH))?,
        ),
        None => {
            let document = serde_json::from_str::<Value>(BUILTIN_CATALOG).map_err(|err| {
                ConfigError::Malformed {
                    path: PathBuf::from("<builtin>"),
                    message: err.to_string(),
                }
            })?;
            ("<builtin>".to_string(), document)
        }
    };
    let report = validate_catalog_document(&document, &EffectRegistry::standard());
    Ok((label, report))
}

fn handle_cards(args: &[String]) -> i32 {
    let flags = match Flags::parse(args, &["catalog"], &["json"]) {
        Ok(flags) => flags,
        Err(message) => return usage(&message, CARDS_USAGE),
    };
    let catalog = match load_catalog_flag(&flags) {
        Ok(catalog) => catalog,
        Err(err) => return fail("catalog load", err),
    };
    if flags.has("json") {
        return print_json(catalog.cards(), "card list");
    }

    println!("id\tname\tcategory\tcost\tmodel");
    for card in catalog.cards() {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            card.id,
            card.name,
            card.category,
            card.cost,
            card.dps_model.kind.as_str()
        );
    }
    0
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T, what: &str) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize {what}: {err}");
            1
        }
    }
}

fn parse_arg<T>(raw: Option<&String>, name: &str, default: T) -> T
where
    T: FromStr + Display,
{
    raw.and_then(|value| value.parse::<T>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                eprintln!("invalid {name} '{value}', defaulting to {default}");
            }
            default
        })
}

fn parse_optional_arg<T: FromStr>(raw: Option<&String>, name: &str) -> Option<T> {
    let value = raw?;
    match value.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            eprintln!("invalid {name} '{value}', ignoring");
            None
        }
    }
}
