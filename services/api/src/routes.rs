use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use meridian::localization::router::localization_router;
use meridian::localization::LocalizationRegistry;
use meridian::modules::router::{modules_router, ModulesApiState};
use serde_json::json;
use std::sync::Arc;

/// Compose the service surface: module APIs, localization APIs, any
/// routers contributed by modules, and the operational endpoints.
pub(crate) fn with_service_routes(
    modules_state: ModulesApiState,
    localizations: Arc<LocalizationRegistry>,
    module_routers: Vec<axum::Router>,
) -> axum::Router {
    let mut app = modules_router(modules_state)
        .merge(localization_router(localizations))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint));

    for router in module_routers {
        app = app.merge(router);
    }

    app
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
