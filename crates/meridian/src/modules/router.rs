use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::AppError;
use crate::modules::actions::{ActionContext, ActionRegistry, ActionResult};
use crate::modules::manifest::{ModuleConfig, ScreenConfig, WorkflowConfig};
use crate::modules::registry::ModuleRegistry;
use crate::modules::settings::{merged_configurables, ModuleSettingsStore, SettingsError};

/// Shared state for the module API routes.
#[derive(Clone)]
pub struct ModulesApiState {
    pub registry: Arc<ModuleRegistry>,
    pub actions: Arc<ActionRegistry>,
    pub settings: Arc<dyn ModuleSettingsStore>,
}

pub fn modules_router(state: ModulesApiState) -> Router {
    Router::new()
        .route("/api/v1/modules", get(list_modules))
        .route("/api/v1/modules/:module_id", get(get_module))
        .route("/api/v1/modules/:module_id/screens", get(get_screens))
        .route("/api/v1/modules/:module_id/workflows", get(get_workflows))
        .route(
            "/api/v1/modules/:module_id/configurables",
            get(get_configurables),
        )
        .route(
            "/api/v1/modules/:module_id/settings/:key",
            get(get_setting).put(put_setting),
        )
        .route(
            "/api/v1/modules/:module_id/status",
            get(get_status).put(update_status),
        )
        .route(
            "/api/v1/modules/:module_id/actions/:action_name",
            post(execute_action),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompanyScope {
    pub(crate) company_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ModuleStatusView {
    pub(crate) module_id: String,
    pub(crate) company_id: Option<i64>,
    pub(crate) enabled: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModuleStatusUpdate {
    pub(crate) enabled: bool,
    #[serde(default)]
    pub(crate) company_id: Option<i64>,
    pub(crate) actor_id: i64,
}

/// All module configurations, sorted by display name.
pub(crate) async fn list_modules(
    State(state): State<ModulesApiState>,
) -> Json<Vec<ModuleConfig>> {
    let mut modules: Vec<ModuleConfig> = state.registry.configs().values().cloned().collect();
    modules.sort_by(|a, b| a.module.name.cmp(&b.module.name));
    Json(modules)
}

pub(crate) async fn get_module(
    State(state): State<ModulesApiState>,
    Path(module_id): Path<String>,
) -> Result<Json<ModuleConfig>, AppError> {
    let config = lookup(&state, &module_id)?;
    Ok(Json(config.clone()))
}

pub(crate) async fn get_screens(
    State(state): State<ModulesApiState>,
    Path(module_id): Path<String>,
) -> Result<Json<BTreeMap<String, ScreenConfig>>, AppError> {
    let config = lookup(&state, &module_id)?;
    Ok(Json(config.screens.clone().unwrap_or_default()))
}

pub(crate) async fn get_workflows(
    State(state): State<ModulesApiState>,
    Path(module_id): Path<String>,
) -> Result<Json<BTreeMap<String, WorkflowConfig>>, AppError> {
    let config = lookup(&state, &module_id)?;
    Ok(Json(config.workflows.clone().unwrap_or_default()))
}

/// Declared configurable defaults overlaid with persisted values.
pub(crate) async fn get_configurables(
    State(state): State<ModulesApiState>,
    Path(module_id): Path<String>,
    Query(scope): Query<CompanyScope>,
) -> Result<Json<BTreeMap<String, JsonValue>>, AppError> {
    let config = lookup(&state, &module_id)?.clone();
    let merged = merged_configurables(&config, state.settings.as_ref(), scope.company_id).await?;
    Ok(Json(merged))
}

#[derive(Debug, Serialize)]
pub(crate) struct ModuleSettingView {
    pub(crate) module_id: String,
    pub(crate) key: String,
    pub(crate) company_id: Option<i64>,
    pub(crate) value: JsonValue,
}

/// One setting: persisted value if present, else the declared
/// configurable default, else not found.
pub(crate) async fn get_setting(
    State(state): State<ModulesApiState>,
    Path((module_id, key)): Path<(String, String)>,
    Query(scope): Query<CompanyScope>,
) -> Result<Json<ModuleSettingView>, AppError> {
    let config = lookup(&state, &module_id)?.clone();

    if let Some(value) = state
        .settings
        .get(&module_id, &key, scope.company_id)
        .await?
    {
        return Ok(Json(ModuleSettingView {
            module_id,
            key,
            company_id: scope.company_id,
            value,
        }));
    }

    let declared = config
        .configurables
        .as_ref()
        .and_then(|configurables| configurables.get(&key));
    match declared {
        Some(default_value) => {
            let value = serde_json::to_value(default_value)
                .map_err(|err| SettingsError::Serialization(err.to_string()))?;
            Ok(Json(ModuleSettingView {
                module_id,
                key,
                company_id: scope.company_id,
                value,
            }))
        }
        None => Err(AppError::SettingNotFound { module_id, key }),
    }
}

pub(crate) async fn put_setting(
    State(state): State<ModulesApiState>,
    Path((module_id, key)): Path<(String, String)>,
    Query(scope): Query<CompanyScope>,
    Json(value): Json<JsonValue>,
) -> Result<Json<ModuleSettingView>, AppError> {
    lookup(&state, &module_id)?;
    state
        .settings
        .put(&module_id, &key, scope.company_id, value.clone())
        .await?;
    Ok(Json(ModuleSettingView {
        module_id,
        key,
        company_id: scope.company_id,
        value,
    }))
}

pub(crate) async fn get_status(
    State(state): State<ModulesApiState>,
    Path(module_id): Path<String>,
    Query(scope): Query<CompanyScope>,
) -> Result<Json<ModuleStatusView>, AppError> {
    lookup(&state, &module_id)?;
    let enabled = state
        .registry
        .is_module_enabled(&module_id, scope.company_id)
        .await;
    Ok(Json(ModuleStatusView {
        module_id,
        company_id: scope.company_id,
        enabled,
    }))
}

pub(crate) async fn update_status(
    State(state): State<ModulesApiState>,
    Path(module_id): Path<String>,
    Json(update): Json<ModuleStatusUpdate>,
) -> Result<Json<ModuleStatusView>, AppError> {
    lookup(&state, &module_id)?;
    state
        .registry
        .set_module_enabled(&module_id, update.company_id, update.enabled, update.actor_id)
        .await?;
    Ok(Json(ModuleStatusView {
        module_id,
        company_id: update.company_id,
        enabled: update.enabled,
    }))
}

/// Invoke a registered action; outcome is always rendered as an
/// `ActionResult`, including "module disabled" and "action not found".
pub(crate) async fn execute_action(
    State(state): State<ModulesApiState>,
    Path((module_id, action_name)): Path<(String, String)>,
    Json(context): Json<ActionContext>,
) -> Json<ActionResult> {
    let enabled = state
        .registry
        .is_module_enabled(&module_id, Some(context.company_id))
        .await;
    if !enabled {
        return Json(ActionResult::failure(format!(
            "Module '{module_id}' is disabled"
        )));
    }

    let full_name = format!("{module_id}.{action_name}");
    Json(state.actions.execute(&full_name, context).await)
}

fn lookup<'a>(state: &'a ModulesApiState, module_id: &str) -> Result<&'a ModuleConfig, AppError> {
    state
        .registry
        .config(module_id)
        .ok_or_else(|| AppError::ModuleNotFound(module_id.to_string()))
}
