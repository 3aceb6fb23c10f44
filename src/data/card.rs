//! Card records: the validated shape of one catalog entry.
//! Required fields are checked strictly; the damage model is parsed leniently so one odd
//! card degrades to a no-op instead of rejecting the whole catalog.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MIN_LEVEL: u8 = 0;
pub const MAX_LEVEL: u8 = 6;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub enum CardCategory {
    Human,
    Beast,
    Item,
    Other(String),
}

impl CardCategory {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "human" => Self::Human,
            "beast" => Self::Beast,
            "item" => Self::Item,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Human => "human",
            Self::Beast => "beast",
            Self::Item => "item",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for CardCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<CardCategory> for String {
    fn from(category: CardCategory) -> Self {
        category.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum DpsModelKind {
    AttackScaling,
    GlobalMultiplier,
    SpecialDamageMultiplier,
    Passive,
    /// Kind string the simulator does not know. The card simulates as a no-op.
    Unrecognized(String),
}

impl DpsModelKind {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "ATTACK_SCALING" => Self::AttackScaling,
            "GLOBAL_MULTIPLIER" => Self::GlobalMultiplier,
            "SPECIAL_DMG_MULTIPLIER" => Self::SpecialDamageMultiplier,
            "PASSIVE" => Self::Passive,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::AttackScaling => "ATTACK_SCALING",
            Self::GlobalMultiplier => "GLOBAL_MULTIPLIER",
            Self::SpecialDamageMultiplier => "SPECIAL_DMG_MULTIPLIER",
            Self::Passive => "PASSIVE",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for DpsModelKind {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<DpsModelKind> for String {
    fn from(kind: DpsModelKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Level-scaled value: `base + level * step`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scaling {
    pub base: f64,
    pub step: f64,
}

impl Scaling {
    pub const fn new(base: f64, step: f64) -> Self {
        Self { base, step }
    }

    pub fn at(&self, level: u8) -> f64 {
        self.base + f64::from(level) * self.step
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardParams {
    /// Cooldown seconds for cast-type cards.
    #[serde(rename = "cd")]
    pub cooldown: Option<f64>,
    /// Global bonus scales with the number of same-category cards in the deck.
    pub per_category: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DpsModel {
    pub kind: DpsModelKind,
    pub scaling: Scaling,
    pub params: CardParams,
}

impl Default for DpsModel {
    fn default() -> Self {
        Self {
            kind: DpsModelKind::Passive,
            scaling: Scaling::default(),
            params: CardParams::default(),
        }
    }
}

/// One catalog entry as written in the file, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCard {
    pub id: String,
    pub name: String,
    pub category: String,
    /// Kept loose so a bad cost gets a message naming the field.
    pub cost: Option<Value>,
    /// Kept loose so an odd model degrades the card instead of the catalog.
    #[serde(rename = "dpsModel")]
    pub dps_model: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDpsModel {
    #[serde(rename = "type")]
    kind: Option<DpsModelKind>,
    scaling: Scaling,
    params: CardParams,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    pub category: CardCategory,
    pub cost: u32,
    pub dps_model: DpsModel,
}

impl Card {
    /// Scaled catalog value at `level`.
    pub fn value_at(&self, level: u8) -> f64 {
        self.dps_model.scaling.at(level)
    }

    /// Parse one catalog entry. Errors name the offending field.
    pub fn from_value(entry: &Value) -> Result<Self, String> {
        if !entry.is_object() {
            return Err("entry is not an object".to_string());
        }
        let raw = RawCard::deserialize(entry).map_err(|err| format!("malformed entry: {err}"))?;
        Self::try_from(raw)
    }
}

impl TryFrom<RawCard> for Card {
    type Error = String;

    fn try_from(raw: RawCard) -> Result<Self, Self::Error> {
        let id = required(raw.id, "id")?;
        let name = required(raw.name, "name")?;
        let category = CardCategory::parse(&required(raw.category, "category")?);
        let cost = match raw.cost {
            Some(value) => value
                .as_u64()
                .and_then(|cost| u32::try_from(cost).ok())
                .ok_or_else(|| format!("'cost' must be a non-negative integer, got {value}"))?,
            None => return Err("missing 'cost'".to_string()),
        };
        let dps_model = raw
            .dps_model
            .filter(|model| !model.is_null())
            .map(lenient_dps_model)
            .unwrap_or_default();

        Ok(Self {
            id,
            name,
            category,
            cost,
            dps_model,
        })
    }
}

fn required(value: String, key: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        Err(format!("missing non-empty '{key}'"))
    } else {
        Ok(value)
    }
}

fn lenient_dps_model(raw: Value) -> DpsModel {
    match RawDpsModel::deserialize(&raw) {
        Ok(model) => DpsModel {
            kind: model.kind.unwrap_or(DpsModelKind::Passive),
            scaling: model.scaling,
            params: model.params,
        },
        Err(_) => DpsModel {
            kind: DpsModelKind::Unrecognized(raw.to_string()),
            ..DpsModel::default()
        },
    }
}

/// Clamp a raw level into `[MIN_LEVEL, MAX_LEVEL]`.
pub fn clamp_level(raw: i64) -> u8 {
    raw.clamp(i64::from(MIN_LEVEL), i64::from(MAX_LEVEL)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_full_entry() {
        let card = Card::from_value(&json!({
            "id": "qihao",
            "name": "Qi Hao",
            "category": "human",
            "cost": 3,
            "dpsModel": {
                "type": "ATTACK_SCALING",
                "scaling": {"base": 1.5, "step": 0.1},
                "params": {"cd": 60}
            }
        }))
        .unwrap();

        assert_eq!(card.category, CardCategory::Human);
        assert_eq!(card.dps_model.kind, DpsModelKind::AttackScaling);
        assert_eq!(card.dps_model.params.cooldown, Some(60.0));
        assert!((card.value_at(6) - 2.1).abs() < 1e-12);
    }

    #[test]
    fn missing_required_field_is_an_error() {
        let err =
            Card::from_value(&json!({"id": "x", "category": "item", "cost": 1})).unwrap_err();
        assert!(err.contains("'name'"), "{err}");

        let negative = json!({"id": "x", "name": "X", "category": "item", "cost": -1});
        let err = Card::from_value(&negative).unwrap_err();
        assert!(err.contains("cost"), "{err}");
    }

    #[test]
    fn odd_damage_model_is_kept_as_unrecognized() {
        let card = Card::from_value(&json!({
            "id": "x", "name": "X", "category": "spirit", "cost": 1,
            "dpsModel": {"type": "TELEPORT"}
        }))
        .unwrap();
        assert_eq!(card.category, CardCategory::Other("spirit".to_string()));
        assert_eq!(
            card.dps_model.kind,
            DpsModelKind::Unrecognized("TELEPORT".to_string())
        );
    }

    #[test]
    fn missing_model_defaults_to_passive() {
        let card = Card::from_value(&json!({"id": "x", "name": "X", "category": "item", "cost": 0}))
            .unwrap();
        assert_eq!(card.dps_model, DpsModel::default());
    }

    #[test]
    fn raw_record_converts_with_defaults_filled_in() {
        let raw: RawCard = serde_json::from_str(
            r#"{"id": "fan", "name": "Fan", "category": " Item ", "cost": 2,
                "dpsModel": {"type": "PASSIVE", "scaling": {"base": 0.5}}, "extra": true}"#,
        )
        .unwrap();
        let card = Card::try_from(raw).unwrap();
        assert_eq!(card.category, CardCategory::Item);
        assert_eq!(card.dps_model.kind, DpsModelKind::Passive);
        assert_eq!(card.dps_model.scaling, Scaling::new(0.5, 0.0));
        assert_eq!(card.dps_model.params, CardParams::default());

        let blank = RawCard {
            id: "   ".to_string(),
            ..RawCard::default()
        };
        assert_eq!(
            Card::try_from(blank).unwrap_err(),
            "missing non-empty 'id'"
        );
    }

    #[test]
    fn malformed_damage_model_degrades_to_unrecognized() {
        let card = Card::from_value(&json!({
            "id": "x", "name": "X", "category": "item", "cost": 1,
            "dpsModel": {"type": "ATTACK_SCALING", "scaling": {"base": "lots"}}
        }))
        .unwrap();
        assert!(matches!(card.dps_model.kind, DpsModelKind::Unrecognized(_)));
        assert_eq!(card.value_at(6), 0.0);

        let card = Card::from_value(&json!({
            "id": "x", "name": "X", "category": "item", "cost": 1, "dpsModel": "PASSIVE"
        }))
        .unwrap();
        assert_eq!(
            card.dps_model.kind,
            DpsModelKind::Unrecognized("\"PASSIVE\"".to_string())
        );
    }

    #[test]
    fn card_serializes_kinds_as_strings() {
        let card = Card::from_value(&json!({
            "id": "x", "name": "X", "category": "Beast", "cost": 1,
            "dpsModel": {"type": "GLOBAL_MULTIPLIER", "params": {"per_category": true}}
        }))
        .unwrap();
        let value = serde_json::to_value(&card).unwrap();
        assert_eq!(value["category"], "beast");
        assert_eq!(value["dps_model"]["kind"], "GLOBAL_MULTIPLIER");
        assert_eq!(value["dps_model"]["params"]["per_category"], true);
    }

    #[test]
    fn clamp_level_bounds() {
        assert_eq!(clamp_level(-3), 0);
        assert_eq!(clamp_level(4), 4);
        assert_eq!(clamp_level(99), 6);
    }
}
