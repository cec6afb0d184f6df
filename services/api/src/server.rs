use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryModuleSettingsStore, InMemoryModuleStatusStore};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use meridian::config::AppConfig;
use meridian::error::AppError;
use meridian::localization::payroll::EmployeeProfile;
use meridian::localization::{
    register_builtin_localizations, LocalizationRegistry, DOMAIN_PAYROLL,
};
use meridian::modules::router::ModulesApiState;
use meridian::modules::{
    ActionContext, ActionError, ActionFuture, ActionRegistry, ActionResult, ModuleHooks,
    ModuleRegistry, ModuleSettingsStore,
};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(modules_dir) = args.modules_dir.take() {
        config.modules.root_dir = modules_dir;
    }

    meridian::telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let mut localizations = LocalizationRegistry::new();
    register_builtin_localizations(&mut localizations);
    let localizations = Arc::new(localizations);

    let status_store = Arc::new(InMemoryModuleStatusStore::default());
    let settings_store: Arc<dyn ModuleSettingsStore> =
        Arc::new(InMemoryModuleSettingsStore::default());

    let mut actions = ActionRegistry::new();
    let mut registry = ModuleRegistry::new(status_store)
        .with_hooks("payroll", payroll_module_hooks(Arc::clone(&localizations)));
    registry.initialize(&config.modules.root_dir, &mut actions);

    let module_routers: Vec<axum::Router> = registry.routers().values().cloned().collect();

    let modules_state = ModulesApiState {
        registry: Arc::new(registry),
        actions: Arc::new(actions),
        settings: settings_store,
    };

    let app = with_service_routes(modules_state, Arc::clone(&localizations), module_routers)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "module registry service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Compiled-in hooks for the payroll module: a preview action that
/// dispatches to the country strategy registered for the request.
pub(crate) fn payroll_module_hooks(localizations: Arc<LocalizationRegistry>) -> ModuleHooks {
    ModuleHooks {
        router: None,
        register_actions: Some(Box::new(move |actions| {
            let localizations = Arc::clone(&localizations);
            actions.register("payroll.preview", move |ctx| {
                let localizations = Arc::clone(&localizations);
                Box::pin(async move { preview_action(&localizations, ctx) }) as ActionFuture
            });
        })),
    }
}

fn preview_action(
    localizations: &LocalizationRegistry,
    ctx: ActionContext,
) -> Result<ActionResult, ActionError> {
    let country = ctx
        .data
        .get("country")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| ActionError::new("country is required"))?;

    let gross_pay: Decimal = ctx
        .data
        .get("gross_pay")
        .cloned()
        .ok_or_else(|| ActionError::new("gross_pay is required"))
        .and_then(|value| {
            serde_json::from_value(value)
                .map_err(|err| ActionError::new(format!("invalid gross_pay: {err}")))
        })?;

    let profile: EmployeeProfile = match ctx.data.get("profile") {
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|err| ActionError::new(format!("invalid profile: {err}")))?,
        None => EmployeeProfile::default(),
    };

    let strategy = localizations
        .get_or_raise(country, DOMAIN_PAYROLL)
        .map_err(|err| ActionError::new(err.to_string()))?
        .as_payroll()
        .ok_or_else(|| ActionError::new("payroll handler unavailable"))?;

    let result = strategy
        .calculate_salary(gross_pay, &profile)
        .map_err(|err| ActionError::new(err.to_string()))?;

    let payload = serde_json::to_value(&result)
        .map_err(|err| ActionError::new(format!("failed to encode result: {err}")))?;
    Ok(ActionResult::ok_with_data("payroll preview calculated", payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn localizations() -> Arc<LocalizationRegistry> {
        let mut registry = LocalizationRegistry::new();
        register_builtin_localizations(&mut registry);
        Arc::new(registry)
    }

    fn preview_context(data: BTreeMap<String, JsonValue>) -> ActionContext {
        ActionContext {
            user_id: 1,
            company_id: 9,
            data,
            metadata: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn preview_action_dispatches_to_the_country_strategy() {
        let mut actions = ActionRegistry::new();
        let hooks = payroll_module_hooks(localizations());
        (hooks.register_actions.expect("hook present"))(&mut actions);

        let data: BTreeMap<String, JsonValue> = [
            ("country".to_string(), json!("MYS")),
            ("gross_pay".to_string(), json!(5000)),
        ]
        .into_iter()
        .collect();

        let result = actions.execute("payroll.preview", preview_context(data)).await;
        assert!(result.success, "unexpected failure: {}", result.message);

        let payload = result.data.expect("payload present");
        assert_eq!(payload["net_pay"], json!("4420.25"));
    }

    #[tokio::test]
    async fn preview_action_requires_a_country() {
        let mut actions = ActionRegistry::new();
        let hooks = payroll_module_hooks(localizations());
        (hooks.register_actions.expect("hook present"))(&mut actions);

        let data: BTreeMap<String, JsonValue> =
            [("gross_pay".to_string(), json!(5000))].into_iter().collect();

        let result = actions.execute("payroll.preview", preview_context(data)).await;
        assert!(!result.success);
        assert!(result.message.contains("country is required"));
    }
}
