use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::combat::effects::EffectRegistry;
use crate::data::card::{Card, CardCategory, DpsModelKind};
use crate::data::loader::read_document;
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

/// Read and validate a catalog file. Only an unreadable or unparsable file is an `Err`;
/// everything else lands in the report.
pub fn validate_catalog_file(
    path: impl AsRef<Path>,
    registry: &EffectRegistry,
) -> Result<ValidationReport, ConfigError> {
    let document = read_document(path.as_ref())?;
    Ok(validate_catalog_document(&document, registry))
}

/// Check every entry instead of stopping at the first fault like the loader does.
pub fn validate_catalog_document(document: &Value, registry: &EffectRegistry) -> ValidationReport {
    let mut report = ValidationReport::default();
    let Some(entries) = document.get("cards").and_then(Value::as_array) else {
        report.push(
            ValidationSeverity::Error,
            "catalog",
            "expected a top-level `cards` array",
        );
        return report;
    };

    let mut seen_ids = HashSet::new();
    let mut registered = 0usize;
    for (index, entry) in entries.iter().enumerate() {
        let base_context = format!("entry[{index}]");
        let card = match Card::from_value(entry) {
            Ok(card) => card,
            Err(message) => {
                report.push(ValidationSeverity::Error, base_context, message);
                continue;
            }
        };
        let context = format!("{base_context} ({})", card.id);

        if !seen_ids.insert(card.id.clone()) {
            report.push(
                ValidationSeverity::Error,
                context.clone(),
                format!("duplicate card id '{}'", card.id),
            );
        }
        if registry.is_registered(&card.id) {
            registered += 1;
        }
        check_card(&mut report, &context, entry, &card, registry);
    }

    report.push(
        ValidationSeverity::Info,
        "catalog",
        format!(
            "{} card(s), {registered} with registered effects",
            entries.len()
        ),
    );
    report
}

fn check_card(
    report: &mut ValidationReport,
    context: &str,
    raw: &Value,
    card: &Card,
    registry: &EffectRegistry,
) {
    if let CardCategory::Other(category) = &card.category {
        report.push(
            ValidationSeverity::Warning,
            context,
            format!("unknown category '{category}', per-category bonuses still count it"),
        );
    }

    if raw.get("dpsModel").is_none() {
        report.push(
            ValidationSeverity::Info,
            context,
            "no dpsModel, treated as PASSIVE with zero scaling",
        );
    }

    let is_registered = registry.is_registered(&card.id);
    let model = &card.dps_model;
    match &model.kind {
        DpsModelKind::Unrecognized(kind) => report.push(
            ValidationSeverity::Warning,
            context,
            format!("unrecognized damage model '{kind}', card will be inert"),
        ),
        DpsModelKind::AttackScaling if !is_registered => match model.params.cooldown {
            None => report.push(
                ValidationSeverity::Warning,
                context,
                "ATTACK_SCALING card without `cd` uses the 6s default cooldown",
            ),
            Some(cooldown) if !(cooldown.is_finite() && cooldown > 0.0) => report.push(
                ValidationSeverity::Warning,
                context,
                format!("non-positive cooldown {cooldown}, cast will be dropped"),
            ),
            Some(_) => {}
        },
        DpsModelKind::Passive if !is_registered => report.push(
            ValidationSeverity::Info,
            context,
            "PASSIVE card with no registered effects contributes nothing",
        ),
        _ => {}
    }
}
