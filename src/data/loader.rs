//! Load the card catalog from JSON or YAML. Falls back to the built-in catalog only when
//! no path was requested explicitly and the default file is absent.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::data::catalog::Catalog;
use crate::error::ConfigError;

pub const DEFAULT_CATALOG_PATH: &str = "data/cards_export.json";
pub const CATALOG_PATH_ENV: &str = "DANQING_CATALOG";

pub const BUILTIN_CATALOG: &str = include_str!("../../data/cards_export.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }

    pub fn parse<T: DeserializeOwned>(self, raw: &str) -> Result<T, String> {
        match self {
            Self::Json => serde_json::from_str(raw).map_err(|err| err.to_string()),
            Self::Yaml => serde_yaml::from_str(raw).map_err(|err| err.to_string()),
        }
    }
}

/// Read and parse a JSON/YAML document into a generic value.
pub fn read_document(path: &Path) -> Result<Value, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::Missing {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    DocumentFormat::from_path(path)
        .parse(&raw)
        .map_err(|message| ConfigError::Malformed {
            path: path.to_path_buf(),
            message,
        })
}

pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog, ConfigError> {
    let path = path.as_ref();
    let document = read_document(path)?;
    let catalog = Catalog::from_value(&document)?;
    tracing::debug!(path = %path.display(), cards = catalog.len(), "catalog loaded");
    Ok(catalog)
}

pub fn builtin_catalog() -> Result<Catalog, ConfigError> {
    let document: Value =
        serde_json::from_str(BUILTIN_CATALOG).map_err(|err| ConfigError::Malformed {
            path: PathBuf::from("<builtin>"),
            message: err.to_string(),
        })?;
    Catalog::from_value(&document)
}

/// Resolve the catalog: explicit path, then `DANQING_CATALOG`, then the default path,
/// then the built-in catalog.
pub fn load_catalog_or_default(explicit: Option<&Path>) -> Result<Catalog, ConfigError> {
    if let Some(path) = explicit {
        return load_catalog(path);
    }
    if let Ok(path) = env::var(CATALOG_PATH_ENV) {
        if !path.trim().is_empty() {
            return load_catalog(path);
        }
    }
    let default_path = Path::new(DEFAULT_CATALOG_PATH);
    if default_path.exists() {
        return load_catalog(default_path);
    }
    tracing::debug!("no catalog file at {DEFAULT_CATALOG_PATH}, using built-in catalog");
    builtin_catalog()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_catalog_parses() {
        let catalog = builtin_catalog().unwrap();
        assert!(catalog.get("yanhong").is_some());
        assert!(catalog.get("sixtails").is_some());
    }

    #[test]
    fn yaml_catalog_loads_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "cards:\n  - id: fan\n    name: Fan\n    category: item\n    cost: 2\n    \
             dpsModel:\n      type: PASSIVE\n      scaling: {{base: 0.5, step: 0.1}}"
        )
        .unwrap();

        let catalog = load_catalog(file.path()).unwrap();
        let fan = catalog.get("fan").unwrap();
        assert_eq!(fan.cost, 2);
        assert!((fan.value_at(1) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn explicit_missing_path_is_a_config_error() {
        let missing = Path::new("/definitely/not/here.json");
        let err = load_catalog_or_default(Some(missing)).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { .. }));
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = load_catalog(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }));
    }
}
