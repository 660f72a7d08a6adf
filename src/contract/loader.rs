//! Contract definition loader
//!
//! Reads declarative contract definitions from a directory at startup:
//! - One contract per `*.json` file; other files are ignored
//! - Files load in path order, so registration order is stable
//! - Any unreadable, malformed or invalid file fails the whole load

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::registry::{ContractRegistry, RegistryError};
use crate::schema::{SchemaDef, SchemaError};

/// On-disk contract definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContractDef {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub schema: SchemaDef,
}

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid contract JSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid schema for contract '{name}' in {}: {source}", .path.display())]
    Schema {
        path: PathBuf,
        name: String,
        #[source]
        source: SchemaError,
    },

    #[error("cannot register contract from {}: {source}", .path.display())]
    Conflict {
        path: PathBuf,
        #[source]
        source: RegistryError,
    },

    #[error("contract file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

pub type LoaderResult<T> = Result<T, LoaderError>;

/// Loads contract definitions from a directory.
#[derive(Debug, Clone)]
pub struct ContractLoader {
    dir: PathBuf,
}

impl ContractLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reads and parses every definition file, sorted by path.
    pub fn read_all(&self) -> LoaderResult<Vec<(PathBuf, ContractDef)>> {
        let entries = fs::read_dir(&self.dir).map_err(|source| LoaderError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| LoaderError::Io {
                path: self.dir.clone(),
                source,
            })?;
            let path = entry.path();

            if path.extension().map_or(true, |ext| ext != "json") {
                tracing::warn!(path = %path.display(), "skipping non-JSON file");
                continue;
            }
            paths.push(path);
        }
        paths.sort();

        paths
            .into_iter()
            .map(|path| {
                let def = read_definition(&path)?;
                Ok((path, def))
            })
            .collect()
    }

    /// Compiles every definition and registers it. Returns the number loaded.
    pub fn load_into(&self, registry: &mut ContractRegistry) -> LoaderResult<usize> {
        let defs = self.read_all()?;
        let count = defs.len();

        for (path, def) in defs {
            let schema = def.schema.compile().map_err(|source| LoaderError::Schema {
                path: path.clone(),
                name: def.name.clone(),
                source,
            })?;
            let schema = match def.description {
                Some(description) => schema.describe(description),
                None => schema,
            };

            registry
                .register_schema(&def.name, schema)
                .map_err(|source| LoaderError::Conflict {
                    path: path.clone(),
                    source,
                })?;
        }

        tracing::info!(
            dir = %self.dir.display(),
            contracts = count,
            "contract definitions loaded"
        );
        Ok(count)
    }

    /// Writes a definition to `<dir>/<name>.json`. Existing files are never
    /// overwritten.
    pub fn save(&self, def: &ContractDef) -> LoaderResult<PathBuf> {
        let path = self.dir.join(format!("{}.json", def.name));
        if path.exists() {
            return Err(LoaderError::AlreadyExists(path));
        }

        fs::create_dir_all(&self.dir).map_err(|source| LoaderError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let content = serde_json::to_string_pretty(def).map_err(|source| LoaderError::Parse {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, content).map_err(|source| LoaderError::Io {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }
}

fn read_definition(path: &Path) -> LoaderResult<ContractDef> {
    let content = fs::read_to_string(path).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| LoaderError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::KindDef;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &Path, file: &str, value: serde_json::Value) {
        fs::write(dir.join(file), value.to_string()).unwrap();
    }

    fn item_def(name: &str) -> serde_json::Value {
        json!({
            "name": name,
            "schema": {
                "type": "object",
                "strict": true,
                "fields": [{ "name": "id", "type": "integer" }]
            }
        })
    }

    #[test]
    fn test_load_into_registry() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "b.json", item_def("item-b"));
        write(tmp.path(), "a.json", item_def("item-a"));
        fs::write(tmp.path().join("README.md"), "notes").unwrap();

        let loader = ContractLoader::new(tmp.path());
        let defs = loader.read_all().unwrap();
        assert_eq!(defs[0].1.name, "item-a");
        assert_eq!(defs[1].1.name, "item-b");

        let mut registry = ContractRegistry::new();
        assert_eq!(loader.load_into(&mut registry).unwrap(), 2);
        assert!(registry.validate("item-a", &json!({ "id": 1 })).is_ok());
        assert!(registry.validate("item-b", &json!({ "id": 1, "x": 2 })).is_err());
    }

    #[test]
    fn test_malformed_json_reports_path() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("bad.json"), "{ nope").unwrap();

        let err = ContractLoader::new(tmp.path()).read_all().unwrap_err();
        match err {
            LoaderError::Parse { path, .. } => assert!(path.ends_with("bad.json")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_misspelled_definition_key_fails_load() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "item.json",
            json!({
                "name": "item",
                "schema": {
                    "type": "object",
                    "strcit": true,
                    "fields": [{ "name": "id", "type": "integer" }]
                }
            }),
        );

        let mut registry = ContractRegistry::new();
        let err = ContractLoader::new(tmp.path())
            .load_into(&mut registry)
            .unwrap_err();
        match err {
            LoaderError::Parse { path, source } => {
                assert!(path.ends_with("item.json"));
                assert!(source.to_string().contains("strcit"));
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(registry.is_empty());

        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "item.json",
            json!({ "name": "item", "descripton": "typo", "schema": { "type": "string" } }),
        );
        assert!(matches!(
            ContractLoader::new(tmp.path()).read_all(),
            Err(LoaderError::Parse { .. })
        ));
    }

    #[test]
    fn test_invalid_schema_reports_path() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "zip.json",
            json!({ "name": "zip", "schema": { "type": "string", "refine": ["zipcode"] } }),
        );

        let mut registry = ContractRegistry::new();
        let err = ContractLoader::new(tmp.path())
            .load_into(&mut registry)
            .unwrap_err();
        match err {
            LoaderError::Schema { path, name, source } => {
                assert!(path.ends_with("zip.json"));
                assert_eq!(name, "zip");
                assert_eq!(source, SchemaError::UnknownRefinement("zipcode".into()));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_across_files_rejected() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "one.json", item_def("item"));
        write(tmp.path(), "two.json", item_def("item"));

        let mut registry = ContractRegistry::new();
        let err = ContractLoader::new(tmp.path())
            .load_into(&mut registry)
            .unwrap_err();
        assert!(matches!(
            err,
            LoaderError::Conflict {
                source: RegistryError::DuplicateContract(_),
                ..
            }
        ));
    }

    #[test]
    fn test_missing_dir() {
        let tmp = TempDir::new().unwrap();
        let err = ContractLoader::new(tmp.path().join("absent"))
            .read_all()
            .unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
    }

    #[test]
    fn test_save_then_load() {
        let tmp = TempDir::new().unwrap();
        let loader = ContractLoader::new(tmp.path().join("defs"));
        let def = ContractDef {
            name: "flag".into(),
            description: Some("feature flag toggle".into()),
            schema: SchemaDef {
                coerce: true,
                ..SchemaDef::of(KindDef::Boolean)
            },
        };

        let path = loader.save(&def).unwrap();
        assert!(path.ends_with("flag.json"));
        assert!(matches!(loader.save(&def), Err(LoaderError::AlreadyExists(_))));

        let defs = loader.read_all().unwrap();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].1, def);

        let mut registry = ContractRegistry::new();
        loader.load_into(&mut registry).unwrap();
        assert_eq!(
            registry.validate("flag", &json!("true")).unwrap(),
            json!(true)
        );
        assert_eq!(
            registry.get("flag").unwrap().schema().description(),
            Some("feature flag toggle")
        );
    }
}
