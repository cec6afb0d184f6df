use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_yaml::Value;
use tracing::warn;

use super::manifest::ModuleConfig;
use super::merge::deep_merge;

/// Directory names never treated as module packages.
const SKIP_DIRS: &[&str] = &["core"];

/// Errors raised while loading a single module's configuration.
///
/// `load_all` catches all of these; only direct `load` callers see them.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("module config not found under {0}")]
    NotFound(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
    #[error("invalid module config under {path}: {source}")]
    Validation {
        path: String,
        source: serde_yaml::Error,
    },
}

/// Loads module configuration documents from disk.
///
/// A module directory supplies either a single `config.yaml`, a
/// `configs/` directory of fragments, or both. Fragments are merged onto
/// the base in lexicographic filename order so the result is
/// reproducible.
pub struct ModuleConfigLoader;

impl ModuleConfigLoader {
    pub fn load(module_path: &Path) -> Result<ModuleConfig, ConfigError> {
        let config_file = module_path.join("config.yaml");
        let configs_dir = module_path.join("configs");

        if !config_file.exists() && !configs_dir.is_dir() {
            return Err(ConfigError::NotFound(module_path.display().to_string()));
        }

        let mut document = Value::Mapping(Default::default());

        if config_file.exists() {
            document = read_yaml(&config_file)?;
        }

        if configs_dir.is_dir() {
            for fragment_path in sorted_yaml_files(&configs_dir)? {
                let fragment = read_yaml(&fragment_path)?;
                document = deep_merge(&document, &fragment);
            }
        }

        serde_yaml::from_value(document).map_err(|source| ConfigError::Validation {
            path: module_path.display().to_string(),
            source,
        })
    }

    /// Load every module under `root`, keyed by declared module id.
    ///
    /// Reserved directories are skipped, directories without any config
    /// are silently ignored, and any other failure is logged and omitted
    /// so one broken module never aborts the scan. Duplicate ids across
    /// directories resolve last-loaded-wins, with a warning.
    pub fn load_all(root: &Path) -> BTreeMap<String, ModuleConfig> {
        let mut modules = BTreeMap::new();

        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(_) => return modules,
        };

        let mut module_dirs: Vec<_> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_dir())
            .filter(|entry| is_module_dir_name(&entry.file_name().to_string_lossy()))
            .map(|entry| entry.path())
            .collect();
        module_dirs.sort();

        for module_dir in module_dirs {
            match Self::load(&module_dir) {
                Ok(config) => {
                    let id = config.id().to_string();
                    if modules.insert(id.clone(), config).is_some() {
                        warn!(module_id = %id, "duplicate module id; last-loaded config wins");
                    }
                }
                Err(ConfigError::NotFound(_)) => {}
                Err(err) => {
                    warn!(
                        module_dir = %module_dir.display(),
                        error = %err,
                        "skipping module with broken config"
                    );
                }
            }
        }

        modules
    }
}

/// A directory participates in module discovery unless it is reserved.
pub(crate) fn is_module_dir_name(name: &str) -> bool {
    !name.starts_with('_') && !name.starts_with('.') && !SKIP_DIRS.contains(&name)
}

fn read_yaml(path: &Path) -> Result<Value, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let value: Value = serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    // An empty fragment parses as null; treat it as an empty overlay.
    if value.is_null() {
        Ok(Value::Mapping(Default::default()))
    } else {
        Ok(value)
    }
}

fn sorted_yaml_files(dir: &Path) -> Result<Vec<std::path::PathBuf>, ConfigError> {
    let entries = fs::read_dir(dir).map_err(|source| ConfigError::Io {
        path: dir.display().to_string(),
        source,
    })?;

    let mut files: Vec<_> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_names_are_excluded_from_discovery() {
        assert!(!is_module_dir_name("core"));
        assert!(!is_module_dir_name("_drafts"));
        assert!(!is_module_dir_name(".git"));
        assert!(is_module_dir_name("finance"));
        assert!(is_module_dir_name("payroll"));
    }
}
