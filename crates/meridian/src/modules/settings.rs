use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use super::manifest::ModuleConfig;

/// Error enumeration for settings store failures.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings store unavailable: {0}")]
    Unavailable(String),
    #[error("setting value is not JSON-serializable: {0}")]
    Serialization(String),
}

/// Persisted key-value settings per module, optionally tenant-scoped.
///
/// Backs both module "configurables" and localization-independent
/// settings; the core only needs read/write of JSON values.
#[async_trait]
pub trait ModuleSettingsStore: Send + Sync {
    async fn get(
        &self,
        module_id: &str,
        key: &str,
        company_id: Option<i64>,
    ) -> Result<Option<JsonValue>, SettingsError>;

    async fn put(
        &self,
        module_id: &str,
        key: &str,
        company_id: Option<i64>,
        value: JsonValue,
    ) -> Result<(), SettingsError>;

    async fn all_for_module(
        &self,
        module_id: &str,
        company_id: Option<i64>,
    ) -> Result<BTreeMap<String, JsonValue>, SettingsError>;
}

/// Overlay persisted settings onto the defaults a module declares in its
/// manifest. Persisted values win; declared keys without a persisted row
/// fall back to their default.
pub async fn merged_configurables(
    config: &ModuleConfig,
    store: &dyn ModuleSettingsStore,
    company_id: Option<i64>,
) -> Result<BTreeMap<String, JsonValue>, SettingsError> {
    let mut merged = BTreeMap::new();

    if let Some(declared) = &config.configurables {
        for (key, default_value) in declared {
            let default_json = serde_json::to_value(default_value)
                .map_err(|err| SettingsError::Serialization(err.to_string()))?;
            merged.insert(key.clone(), default_json);
        }
    }

    let persisted = store.all_for_module(config.id(), company_id).await?;
    merged.extend(persisted);

    Ok(merged)
}
