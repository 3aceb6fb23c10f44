//! Deck-wide multipliers computed once before the run starts.

use std::collections::BTreeMap;

use crate::combat::effects::{Effect, ResolvedCard};
use crate::combat::state::StaticModifiers;
use crate::data::card::CardCategory;

/// Number of deck cards per category.
pub fn category_counts(deck: &[ResolvedCard]) -> BTreeMap<&CardCategory, u32> {
    let mut counts = BTreeMap::new();
    for entry in deck {
        *counts.entry(&entry.card.category).or_insert(0) += 1;
    }
    counts
}

impl StaticModifiers {
    /// Fold every global and special bonus in the deck into the two run multipliers.
    /// A card contributes at most once per bonus kind.
    pub fn from_deck(deck: &[ResolvedCard]) -> Self {
        let counts = category_counts(deck);
        let mut modifiers = Self::default();
        for entry in deck {
            let global = entry.effects.iter().find_map(|effect| match *effect {
                Effect::GlobalBonus {
                    bonus,
                    per_category,
                } => Some((bonus, per_category)),
                _ => None,
            });
            if let Some((bonus, per_category)) = global {
                let scale = if per_category {
                    f64::from(counts.get(&entry.card.category).copied().unwrap_or(0))
                } else {
                    1.0
                };
                modifiers.global *= 1.0 + bonus * scale;
            }
            let special = entry.effects.iter().find_map(|effect| match *effect {
                Effect::SpecialBonus { bonus } => Some(bonus),
                _ => None,
            });
            if let Some(bonus) = special {
                modifiers.special *= 1.0 + bonus;
            }
        }
        modifiers
    }
}
