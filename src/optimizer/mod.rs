pub mod combinations;
pub mod export;
pub mod ranking;

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use rayon::prelude::*;
use serde::Serialize;

use crate::combat::effects::{resolve_deck, EffectRegistry, LevelTable, ResolvedCard};
use crate::combat::engine::{simulate, SimulationConfig, TraceMode};
use crate::combat::state::BaseStats;
use crate::data::catalog::Catalog;
use crate::data::profile::{DEFAULT_BASE_ATK, DEFAULT_BASE_DPS, DEFAULT_BASE_HP};
use crate::optimizer::combinations::combinations_by_cost;
use crate::optimizer::ranking::{rank_decks, DeckEvaluation, RankedDeck};
use crate::parallel::{batch_ranges, WorkerPool};

/// Number of progress-reporting batches for optimize-with-progress.
const OPTIMIZE_PROGRESS_BATCH_COUNT: usize = 40;

pub const DEFAULT_BUDGETS: RangeInclusive<u32> = 10..=25;
pub const DEFAULT_MAX_DECKS_PER_BUDGET: usize = 1000;
pub const DEFAULT_TOP_K: usize = 10;
pub const DEFAULT_OPTIMIZER_LEVEL: i64 = 6;
pub const DEFAULT_OPTIMIZER_MAX_TIME: f64 = 300.0;
pub const DEFAULT_DAMAGE_TARGET: f64 = 10_000_000.0;
pub const DEFAULT_OPTIMIZER_SEED: u64 = 42;

#[derive(Debug, Clone)]
pub struct OptimizationScenario {
    /// Exact total costs to search, inclusive.
    pub budgets: RangeInclusive<u32>,
    /// Enumeration cap per budget; the first combinations found are kept.
    pub max_decks_per_budget: usize,
    pub top_k: usize,
    pub level: i64,
    pub card_levels: BTreeMap<String, i64>,
    pub stats: BaseStats,
    pub max_time: f64,
    pub damage_target: Option<f64>,
    /// Every deck runs with this seed, so rankings are reproducible.
    pub seed: u64,
    pub workers: WorkerPool,
}

impl Default for OptimizationScenario {
    fn default() -> Self {
        Self {
            budgets: DEFAULT_BUDGETS,
            max_decks_per_budget: DEFAULT_MAX_DECKS_PER_BUDGET,
            top_k: DEFAULT_TOP_K,
            level: DEFAULT_OPTIMIZER_LEVEL,
            card_levels: BTreeMap::new(),
            stats: BaseStats {
                attack: DEFAULT_BASE_ATK,
                hp: DEFAULT_BASE_HP,
                passive_dps: DEFAULT_BASE_DPS,
            },
            max_time: DEFAULT_OPTIMIZER_MAX_TIME,
            damage_target: Some(DEFAULT_DAMAGE_TARGET),
            seed: DEFAULT_OPTIMIZER_SEED,
            workers: WorkerPool::default_workers(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetRanking {
    pub budget: u32,
    /// Decks simulated for this budget.
    pub evaluated: usize,
    pub decks: Vec<RankedDeck>,
}

struct Candidate {
    budget: u32,
    indices: Vec<usize>,
}

pub fn optimize_decks(
    catalog: &Catalog,
    registry: &EffectRegistry,
    scenario: &OptimizationScenario,
) -> Vec<BudgetRanking> {
    optimize_decks_with_progress(catalog, registry, scenario, |_, _| {})
}

/// Like [optimize_decks] but runs in batches and invokes `on_progress(done, total)` with
/// deck counts after each batch.
pub fn optimize_decks_with_progress<F>(
    catalog: &Catalog,
    registry: &EffectRegistry,
    scenario: &OptimizationScenario,
    mut on_progress: F,
) -> Vec<BudgetRanking>
where
    F: FnMut(u32, u32),
{
    let levels = LevelTable::new(scenario.level, &scenario.card_levels);
    let pool = resolve_deck(catalog.cards(), registry, &levels);
    let candidates = enumerate_candidates(&pool, scenario);
    let total = candidates.len();
    if total == 0 {
        return Vec::new();
    }
    // Report total immediately so callers can show "0 / total" while the first batch runs.
    on_progress(0, total as u32);

    let config = SimulationConfig {
        max_time: scenario.max_time,
        seed: Some(scenario.seed),
        damage_target: scenario.damage_target,
        trace_mode: TraceMode::Off,
    };
    let num_batches = OPTIMIZE_PROGRESS_BATCH_COUNT.min(total);
    let mut evaluations = Vec::with_capacity(total);
    for (start, end) in batch_ranges(total, num_batches) {
        let batch = &candidates[start..end];
        let batch_results: Vec<DeckEvaluation> = scenario.workers.install(|| {
            batch
                .par_iter()
                .map(|candidate| {
                    evaluate(&pool, candidate, scenario.stats, levels.run_level(), config)
                })
                .collect()
        });
        evaluations.extend(batch_results);
        on_progress(end as u32, total as u32);
    }

    let mut by_budget: BTreeMap<u32, Vec<DeckEvaluation>> = BTreeMap::new();
    for (candidate, evaluation) in candidates.iter().zip(evaluations) {
        by_budget.entry(candidate.budget).or_default().push(evaluation);
    }

    by_budget
        .into_iter()
        .map(|(budget, evaluations)| {
            let evaluated = evaluations.len();
            let decks = rank_decks(evaluations, &pool, scenario.top_k);
            tracing::info!(
                budget,
                evaluated,
                best_deck_dps = decks.first().map_or(0.0, |deck| deck.deck_dps),
                "budget ranked"
            );
            BudgetRanking {
                budget,
                evaluated,
                decks,
            }
        })
        .collect()
}

/// Non-empty exact-cost combinations for every budget, budgets ascending.
fn enumerate_candidates(pool: &[ResolvedCard], scenario: &OptimizationScenario) -> Vec<Candidate> {
    let (first, last) = (*scenario.budgets.start(), *scenario.budgets.end());
    if first > last {
        return Vec::new();
    }
    let costs: Vec<u32> = pool.iter().map(|entry| entry.card.cost).collect();
    let table = combinations_by_cost(&costs, last, scenario.max_decks_per_budget);

    let mut candidates = Vec::new();
    for budget in first..=last {
        let Some(cell) = table.get(budget as usize) else {
            continue;
        };
        tracing::debug!(budget, combinations = cell.len(), "decks enumerated");
        candidates.extend(
            cell.iter()
                .filter(|indices| !indices.is_empty())
                .map(|indices| Candidate {
                    budget,
                    indices: indices.clone(),
                }),
        );
    }
    candidates
}

fn evaluate(
    pool: &[ResolvedCard],
    candidate: &Candidate,
    stats: BaseStats,
    run_level: u8,
    config: SimulationConfig,
) -> DeckEvaluation {
    let deck: Vec<ResolvedCard> = candidate
        .indices
        .iter()
        .map(|&index| pool[index].clone())
        .collect();
    DeckEvaluation {
        indices: candidate.indices.clone(),
        outcome: simulate(&deck, stats, run_level, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::builtin_catalog;

    fn small_scenario() -> OptimizationScenario {
        OptimizationScenario {
            budgets: 4..=5,
            max_decks_per_budget: 20,
            top_k: 3,
            max_time: 30.0,
            damage_target: None,
            workers: WorkerPool::with_workers(2),
            ..OptimizationScenario::default()
        }
    }

    #[test]
    fn rankings_cover_each_budget_with_exact_costs() {
        let catalog = builtin_catalog().unwrap();
        let rankings = optimize_decks(&catalog, &EffectRegistry::standard(), &small_scenario());
        assert_eq!(
            rankings.iter().map(|ranking| ranking.budget).collect::<Vec<_>>(),
            vec![4, 5]
        );
        for ranking in &rankings {
            assert!(ranking.evaluated <= 20);
            assert!(ranking.decks.len() <= 3);
            for deck in &ranking.decks {
                assert_eq!(deck.total_cost, ranking.budget);
            }
            for pair in ranking.decks.windows(2) {
                assert!(pair[0].deck_dps >= pair[1].deck_dps);
            }
        }
    }

    #[test]
    fn progress_reaches_total() {
        let catalog = builtin_catalog().unwrap();
        let mut reports = Vec::new();
        optimize_decks_with_progress(
            &catalog,
            &EffectRegistry::standard(),
            &small_scenario(),
            |done, total| reports.push((done, total)),
        );
        let (first, last) = (reports[0], reports[reports.len() - 1]);
        assert_eq!(first.0, 0);
        assert_eq!(last.0, last.1);
    }

    #[test]
    fn empty_budget_range_yields_nothing() {
        let catalog = builtin_catalog().unwrap();
        #[allow(clippy::reversed_empty_ranges)]
        let scenario = OptimizationScenario {
            budgets: 5..=4,
            ..small_scenario()
        };
        assert!(optimize_decks(&catalog, &EffectRegistry::standard(), &scenario).is_empty());
    }
}
