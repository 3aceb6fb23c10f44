use std::fs;

use danqing::data::validate::{validate_catalog_file, ValidationSeverity};
use danqing::data::{load_catalog, load_catalog_or_default, CardCategory, DpsModelKind};
use danqing::{ConfigError, EffectRegistry};

const YAML_CATALOG: &str = r#"
cards:
  - id: ember
    name: Ember Sprite
    category: Beast
    cost: 2
    dpsModel:
      type: ATTACK_SCALING
      scaling: { base: 0.5, step: 0.1 }
      params: { cd: 4 }
  - id: charm
    name: Lucky Charm
    category: item
    cost: 1
"#;

#[test]
fn yaml_catalog_loads_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cards.yaml");
    fs::write(&path, YAML_CATALOG).unwrap();

    let catalog = load_catalog(&path).expect("yaml catalog should load");
    assert_eq!(catalog.len(), 2);

    let ember = catalog.get("ember").unwrap();
    assert_eq!(ember.category, CardCategory::Beast);
    assert_eq!(ember.dps_model.kind, DpsModelKind::AttackScaling);
    assert_eq!(ember.dps_model.params.cooldown, Some(4.0));
    assert!((ember.value_at(3) - 0.8).abs() < 1e-12);

    // No dpsModel means a passive card with zero scaling.
    let charm = catalog.get("charm").unwrap();
    assert_eq!(charm.dps_model.kind, DpsModelKind::Passive);
    assert_eq!(charm.value_at(6), 0.0);
}

#[test]
fn explicit_missing_path_is_an_error_not_a_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nowhere.json");
    assert!(matches!(
        load_catalog_or_default(Some(path.as_path())),
        Err(ConfigError::Missing { .. })
    ));
}

#[test]
fn malformed_document_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ \"cards\": [").unwrap();
    let err = load_catalog(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Malformed { .. }));
    assert!(err.to_string().contains("broken.json"));
}

#[test]
fn duplicate_ids_reject_the_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dupes.json");
    fs::write(
        &path,
        r#"{"cards": [
            {"id": "a", "name": "A", "category": "human", "cost": 1},
            {"id": "a", "name": "A again", "category": "human", "cost": 2}
        ]}"#,
    )
    .unwrap();
    assert!(matches!(
        load_catalog(&path),
        Err(ConfigError::DuplicateId(id)) if id == "a"
    ));
}

#[test]
fn validation_reports_every_problem_in_one_pass() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cards.json");
    fs::write(
        &path,
        r#"{"cards": [
            {"id": "a", "name": "A", "category": "human", "cost": 1},
            {"id": "a", "name": "A", "category": "human", "cost": 1},
            {"name": "Nameless", "category": "item", "cost": 1},
            {"id": "odd", "name": "Odd", "category": "dragon", "cost": 2,
             "dpsModel": {"type": "LASER", "scaling": {"base": 1, "step": 0}}}
        ]}"#,
    )
    .unwrap();

    let report = validate_catalog_file(&path, &EffectRegistry::standard()).unwrap();
    assert!(report.has_errors());
    assert_eq!(report.count(ValidationSeverity::Error), 2);
    assert_eq!(report.count(ValidationSeverity::Warning), 2);
    let rendered: Vec<String> = report.diagnostics.iter().map(ToString::to_string).collect();
    assert!(rendered.iter().any(|line| line.contains("'a'")));
    assert!(rendered.iter().any(|line| line.contains("LASER")));
}

#[test]
fn shipped_catalog_file_validates_cleanly() {
    let report =
        validate_catalog_file("data/cards_export.json", &EffectRegistry::standard()).unwrap();
    assert!(!report.has_errors());
    assert_eq!(report.count(ValidationSeverity::Warning), 0);
}
