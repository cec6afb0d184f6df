use async_trait::async_trait;
use metrics_exporter_prometheus::PrometheusHandle;
use meridian::modules::{
    ModuleSettingsStore, ModuleStatusRecord, ModuleStatusStore, SettingsError, StatusStoreError,
};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Module enable/disable records held in process memory. Durable storage
/// plugs in behind the same trait.
#[derive(Default)]
pub(crate) struct InMemoryModuleStatusStore {
    records: Mutex<HashMap<(String, Option<i64>), ModuleStatusRecord>>,
}

#[async_trait]
impl ModuleStatusStore for InMemoryModuleStatusStore {
    async fn fetch(
        &self,
        module_id: &str,
        company_id: Option<i64>,
    ) -> Result<Option<ModuleStatusRecord>, StatusStoreError> {
        let guard = self.records.lock().expect("status mutex poisoned");
        Ok(guard.get(&(module_id.to_string(), company_id)).cloned())
    }

    async fn upsert(&self, record: ModuleStatusRecord) -> Result<(), StatusStoreError> {
        let mut guard = self.records.lock().expect("status mutex poisoned");
        guard.insert((record.module_id.clone(), record.company_id), record);
        Ok(())
    }
}

/// Per-module settings held in process memory, keyed by
/// `(module, key, company)`.
#[derive(Default)]
pub(crate) struct InMemoryModuleSettingsStore {
    values: Mutex<HashMap<(String, String, Option<i64>), JsonValue>>,
}

#[async_trait]
impl ModuleSettingsStore for InMemoryModuleSettingsStore {
    async fn get(
        &self,
        module_id: &str,
        key: &str,
        company_id: Option<i64>,
    ) -> Result<Option<JsonValue>, SettingsError> {
        let guard = self.values.lock().expect("settings mutex poisoned");
        Ok(guard
            .get(&(module_id.to_string(), key.to_string(), company_id))
            .cloned())
    }

    async fn put(
        &self,
        module_id: &str,
        key: &str,
        company_id: Option<i64>,
        value: JsonValue,
    ) -> Result<(), SettingsError> {
        let mut guard = self.values.lock().expect("settings mutex poisoned");
        guard.insert((module_id.to_string(), key.to_string(), company_id), value);
        Ok(())
    }

    async fn all_for_module(
        &self,
        module_id: &str,
        company_id: Option<i64>,
    ) -> Result<BTreeMap<String, JsonValue>, SettingsError> {
        let guard = self.values.lock().expect("settings mutex poisoned");
        Ok(guard
            .iter()
            .filter(|((module, _, company), _)| module == module_id && *company == company_id)
            .map(|((_, key, _), value)| (key.clone(), value.clone()))
            .collect())
    }
}

pub(crate) fn parse_amount(raw: &str) -> Result<Decimal, String> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|err| format!("failed to parse '{raw}' as a decimal amount ({err})"))
}
