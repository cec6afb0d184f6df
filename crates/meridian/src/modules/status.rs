use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Module ids that can never be toggled off, whatever the persisted
/// status says. Enforced at the write path and re-checked on read.
pub const SYSTEM_MODULES: &[&str] = &["core", "users", "company"];

pub fn is_system_module(module_id: &str) -> bool {
    SYSTEM_MODULES.contains(&module_id)
}

/// Persisted enable/disable record for a module, optionally scoped to
/// one company. Absence of a record means "enabled by default".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleStatusRecord {
    pub module_id: String,
    pub company_id: Option<i64>,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_by: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled_by: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled_at: Option<DateTime<Utc>>,
}

impl ModuleStatusRecord {
    pub fn enabled_now(module_id: impl Into<String>, company_id: Option<i64>, actor: i64) -> Self {
        Self {
            module_id: module_id.into(),
            company_id,
            enabled: true,
            enabled_by: Some(actor),
            enabled_at: Some(Utc::now()),
            disabled_by: None,
            disabled_at: None,
        }
    }

    pub fn disabled_now(module_id: impl Into<String>, company_id: Option<i64>, actor: i64) -> Self {
        Self {
            module_id: module_id.into(),
            company_id,
            enabled: false,
            enabled_by: None,
            enabled_at: None,
            disabled_by: Some(actor),
            disabled_at: Some(Utc::now()),
        }
    }
}

/// Error enumeration for status store failures.
#[derive(Debug, thiserror::Error)]
pub enum StatusStoreError {
    #[error("status store unavailable: {0}")]
    Unavailable(String),
    #[error("system module '{0}' cannot be disabled")]
    SystemModule(String),
}

/// Storage abstraction over the persisted module-status mapping so the
/// registry can be exercised in isolation.
#[async_trait]
pub trait ModuleStatusStore: Send + Sync {
    async fn fetch(
        &self,
        module_id: &str,
        company_id: Option<i64>,
    ) -> Result<Option<ModuleStatusRecord>, StatusStoreError>;

    async fn upsert(&self, record: ModuleStatusRecord) -> Result<(), StatusStoreError>;
}
