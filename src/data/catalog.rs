//! Card catalog: ordered records plus an id index.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::data::card::Card;
use crate::error::ConfigError;

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    cards: Vec<Card>,
    by_id: BTreeMap<String, usize>,
}

impl Catalog {
    /// Build from already-parsed cards. Rejects duplicate ids.
    pub fn from_cards(cards: Vec<Card>) -> Result<Self, ConfigError> {
        let mut by_id = BTreeMap::new();
        for (index, card) in cards.iter().enumerate() {
            if by_id.insert(card.id.clone(), index).is_some() {
                return Err(ConfigError::DuplicateId(card.id.clone()));
            }
        }
        Ok(Self { cards, by_id })
    }

    /// Parse a `{ cards: [...] }` document.
    pub fn from_value(document: &Value) -> Result<Self, ConfigError> {
        let entries = document
            .get("cards")
            .and_then(Value::as_array)
            .ok_or(ConfigError::MissingCards)?;

        let cards = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                Card::from_value(entry)
                    .map_err(|message| ConfigError::InvalidCard { index, message })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_cards(cards)
    }

    pub fn get(&self, id: &str) -> Option<&Card> {
        self.by_id.get(id).map(|&index| &self.cards[index])
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Split `ids` into resolved cards (input order, duplicates kept) and unknown ids.
    pub fn resolve<S: AsRef<str>>(&self, ids: &[S]) -> (Vec<Card>, Vec<String>) {
        let mut resolved = Vec::with_capacity(ids.len());
        let mut unknown = Vec::new();
        for id in ids {
            let id = id.as_ref();
            match self.get(id) {
                Some(card) => resolved.push(card.clone()),
                None => unknown.push(id.to_string()),
            }
        }
        (resolved, unknown)
    }
}
