use std::collections::BTreeMap;

use serde::Serialize;

use crate::combat::effects::ResolvedCard;
use crate::combat::engine::SimulationOutcome;

/// One simulated candidate deck, by index into the optimizer's card pool.
#[derive(Debug, Clone)]
pub struct DeckEvaluation {
    pub indices: Vec<usize>,
    pub outcome: SimulationOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedDeck {
    pub rank: usize,
    pub deck_ids: Vec<String>,
    pub deck_names: Vec<String>,
    pub total_cost: u32,
    pub total_dps: f64,
    pub deck_dps: f64,
    pub combat_time: f64,
    pub global_multiplier: f64,
    pub special_multiplier: f64,
    pub damage_breakdown: BTreeMap<String, f64>,
}

/// Best `top_k` decks by deck DPS. The sort is stable, so ties keep enumeration order.
pub fn rank_decks(
    mut evaluations: Vec<DeckEvaluation>,
    pool: &[ResolvedCard],
    top_k: usize,
) -> Vec<RankedDeck> {
    evaluations.sort_by(|left, right| right.outcome.deck_dps.total_cmp(&left.outcome.deck_dps));
    evaluations.truncate(top_k);

    evaluations
        .into_iter()
        .enumerate()
        .map(|(position, evaluation)| {
            let cards = evaluation.indices.iter().filter_map(|&index| pool.get(index));
            let (deck_ids, deck_names) = cards
                .map(|entry| (entry.card.id.clone(), entry.card.name.clone()))
                .unzip();
            let outcome = evaluation.outcome;
            RankedDeck {
                rank: position + 1,
                deck_ids,
                deck_names,
                total_cost: outcome.total_cost,
                total_dps: outcome.total_dps,
                deck_dps: outcome.deck_dps,
                combat_time: outcome.combat_time,
                global_multiplier: outcome.global_multiplier,
                special_multiplier: outcome.special_multiplier,
                damage_breakdown: outcome.damage_breakdown,
            }
        })
        .collect()
}
