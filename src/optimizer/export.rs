//! CSV export of optimizer rankings, one row per ranked deck.

use std::io;
use std::path::Path;

use serde::Serialize;

use crate::error::ExportError;
use crate::optimizer::BudgetRanking;

const DECK_SEPARATOR: &str = "+";

#[derive(Debug, Serialize)]
struct RankingRow<'a> {
    budget: u32,
    rank: usize,
    deck_ids: String,
    deck_names: String,
    total_cost: u32,
    total_dps: f64,
    deck_dps: f64,
    combat_time: f64,
    global_multiplier: f64,
    special_multiplier: f64,
    top_source: &'a str,
}

pub fn write_rankings<W: io::Write>(
    writer: W,
    rankings: &[BudgetRanking],
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for ranking in rankings {
        for deck in &ranking.decks {
            let top_source = deck
                .damage_breakdown
                .iter()
                .max_by(|left, right| left.1.total_cmp(right.1))
                .map_or("", |(label, _)| label.as_str());
            csv_writer.serialize(RankingRow {
                budget: ranking.budget,
                rank: deck.rank,
                deck_ids: deck.deck_ids.join(DECK_SEPARATOR),
                deck_names: deck.deck_names.join(DECK_SEPARATOR),
                total_cost: deck.total_cost,
                total_dps: deck.total_dps,
                deck_dps: deck.deck_dps,
                combat_time: deck.combat_time,
                global_multiplier: deck.global_multiplier,
                special_multiplier: deck.special_multiplier,
                top_source,
            })?;
        }
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_rankings_csv(
    path: impl AsRef<Path>,
    rankings: &[BudgetRanking],
) -> Result<(), ExportError> {
    let path = path.as_ref();
    let to_export_error = |source: csv::Error| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let file = std::fs::File::create(path).map_err(|err| to_export_error(err.into()))?;
    write_rankings(file, rankings).map_err(to_export_error)?;
    tracing::info!(path = %path.display(), "rankings exported");
    Ok(())
}
