use crate::config::ConfigError;
use crate::localization::payroll::PayrollError;
use crate::localization::LocalizationError;
use crate::modules::loader::ConfigError as ModuleConfigError;
use crate::modules::settings::SettingsError;
use crate::modules::status::StatusStoreError;
use crate::modules::workflow::InvalidWorkflowConfig;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    ModuleConfig(ModuleConfigError),
    ModuleNotFound(String),
    SettingNotFound { module_id: String, key: String },
    Workflow(InvalidWorkflowConfig),
    Localization(LocalizationError),
    Payroll(PayrollError),
    Status(StatusStoreError),
    Settings(SettingsError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::ModuleConfig(err) => write!(f, "module config error: {}", err),
            AppError::ModuleNotFound(id) => write!(f, "module '{}' not found", id),
            AppError::SettingNotFound { module_id, key } => {
                write!(f, "setting '{}' not found for module '{}'", key, module_id)
            }
            AppError::Workflow(err) => write!(f, "workflow error: {}", err),
            AppError::Localization(err) => write!(f, "localization error: {}", err),
            AppError::Payroll(err) => write!(f, "payroll error: {}", err),
            AppError::Status(err) => write!(f, "module status error: {}", err),
            AppError::Settings(err) => write!(f, "module settings error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::ModuleConfig(err) => Some(err),
            AppError::ModuleNotFound(_) | AppError::SettingNotFound { .. } => None,
            AppError::Workflow(err) => Some(err),
            AppError::Localization(err) => Some(err),
            AppError::Payroll(err) => Some(err),
            AppError::Status(err) => Some(err),
            AppError::Settings(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::ModuleNotFound(_)
            | AppError::SettingNotFound { .. }
            | AppError::Localization(LocalizationError::HandlerNotFound { .. })
            | AppError::Localization(LocalizationError::UnknownCountry(_)) => {
                StatusCode::NOT_FOUND
            }
            AppError::Payroll(_) | AppError::Workflow(_) => StatusCode::BAD_REQUEST,
            AppError::Status(StatusStoreError::SystemModule(_)) => StatusCode::CONFLICT,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::ModuleConfig(_)
            | AppError::Status(_)
            | AppError::Settings(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<ModuleConfigError> for AppError {
    fn from(value: ModuleConfigError) -> Self {
        Self::ModuleConfig(value)
    }
}

impl From<InvalidWorkflowConfig> for AppError {
    fn from(value: InvalidWorkflowConfig) -> Self {
        Self::Workflow(value)
    }
}

impl From<LocalizationError> for AppError {
    fn from(value: LocalizationError) -> Self {
        Self::Localization(value)
    }
}

impl From<PayrollError> for AppError {
    fn from(value: PayrollError) -> Self {
        Self::Payroll(value)
    }
}

impl From<StatusStoreError> for AppError {
    fn from(value: StatusStoreError) -> Self {
        Self::Status(value)
    }
}

impl From<SettingsError> for AppError {
    fn from(value: SettingsError) -> Self {
        Self::Settings(value)
    }
}
