use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::AppError;
use crate::localization::countries::{country_name, currency_for_country, COUNTRY_CODES};
use crate::localization::payroll::{EmployeeProfile, PayrollResult};
use crate::localization::{
    LocalizationError, LocalizationRegistry, RegistryInfo, DOMAIN_EMPLOYEES, DOMAIN_PAYROLL,
};

pub fn localization_router(registry: Arc<LocalizationRegistry>) -> Router {
    Router::new()
        .route("/api/v1/localization/countries", get(list_countries))
        .route("/api/v1/localization/domains", get(list_domains))
        .route(
            "/api/v1/localization/countries/:code/domains",
            get(country_domains),
        )
        .route(
            "/api/v1/localization/countries/:code/employees/requirements",
            get(employee_requirements),
        )
        .route(
            "/api/v1/localization/countries/:code/employees/validate",
            post(validate_employee),
        )
        .route(
            "/api/v1/localization/countries/:code/payroll/preview",
            post(payroll_preview),
        )
        .with_state(registry)
}

#[derive(Debug, Serialize)]
pub(crate) struct CountryView {
    pub(crate) code: String,
    pub(crate) name: String,
    pub(crate) currency: String,
    pub(crate) has_payroll: bool,
    pub(crate) has_employees: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct DomainsView {
    pub(crate) domains: Vec<String>,
    pub(crate) registry: RegistryInfo,
}

#[derive(Debug, Serialize)]
pub(crate) struct CountryDomainsView {
    pub(crate) country_code: String,
    pub(crate) country_name: String,
    pub(crate) domains: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EmployeeRequirementsView {
    pub(crate) country_code: String,
    pub(crate) required_fields: Vec<&'static str>,
    pub(crate) optional_fields: Vec<&'static str>,
    pub(crate) tax_id_name: &'static str,
    pub(crate) statutory_requirements: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ValidationView {
    pub(crate) country_code: String,
    pub(crate) is_valid: bool,
    pub(crate) errors: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PayrollPreviewRequest {
    pub(crate) gross_pay: Decimal,
    #[serde(default)]
    pub(crate) profile: EmployeeProfile,
}

#[derive(Debug, Serialize)]
pub(crate) struct PayrollPreviewView {
    pub(crate) country_code: String,
    pub(crate) currency: String,
    #[serde(flatten)]
    pub(crate) result: PayrollResult,
}

/// Reference list of recognized countries, annotated with which
/// localization domains have a country-specific handler.
pub(crate) async fn list_countries(
    State(registry): State<Arc<LocalizationRegistry>>,
) -> Json<Vec<CountryView>> {
    let countries = COUNTRY_CODES
        .iter()
        .map(|(code, name)| CountryView {
            code: (*code).to_string(),
            name: (*name).to_string(),
            currency: currency_for_country(code).to_string(),
            has_payroll: registry
                .list_countries(Some(DOMAIN_PAYROLL))
                .iter()
                .any(|c| c == code),
            has_employees: registry
                .list_countries(Some(DOMAIN_EMPLOYEES))
                .iter()
                .any(|c| c == code),
        })
        .collect();
    Json(countries)
}

pub(crate) async fn list_domains(
    State(registry): State<Arc<LocalizationRegistry>>,
) -> Json<DomainsView> {
    Json(DomainsView {
        domains: registry.list_domains(None),
        registry: registry.info(),
    })
}

pub(crate) async fn country_domains(
    State(registry): State<Arc<LocalizationRegistry>>,
    Path(code): Path<String>,
) -> Result<Json<CountryDomainsView>, AppError> {
    let name =
        country_name(&code).ok_or_else(|| LocalizationError::UnknownCountry(code.clone()))?;
    Ok(Json(CountryDomainsView {
        country_code: crate::localization::countries::normalize_country(&code),
        country_name: name.to_string(),
        domains: registry.list_domains(Some(&code)),
    }))
}

pub(crate) async fn employee_requirements(
    State(registry): State<Arc<LocalizationRegistry>>,
    Path(code): Path<String>,
) -> Result<Json<EmployeeRequirementsView>, AppError> {
    let handler = registry
        .get_or_raise(&code, DOMAIN_EMPLOYEES)?
        .as_employees()
        .ok_or_else(|| LocalizationError::HandlerNotFound {
            country: code.clone(),
            domain: DOMAIN_EMPLOYEES.to_string(),
        })?;

    Ok(Json(EmployeeRequirementsView {
        country_code: crate::localization::countries::normalize_country(&code),
        required_fields: handler.required_fields(),
        optional_fields: handler.optional_fields(),
        tax_id_name: handler.tax_id_name(),
        statutory_requirements: handler.statutory_requirements(),
    }))
}

pub(crate) async fn validate_employee(
    State(registry): State<Arc<LocalizationRegistry>>,
    Path(code): Path<String>,
    Json(data): Json<BTreeMap<String, JsonValue>>,
) -> Result<Json<ValidationView>, AppError> {
    let handler = registry
        .get_or_raise(&code, DOMAIN_EMPLOYEES)?
        .as_employees()
        .ok_or_else(|| LocalizationError::HandlerNotFound {
            country: code.clone(),
            domain: DOMAIN_EMPLOYEES.to_string(),
        })?;

    let (is_valid, errors) = handler.validate(&data);
    Ok(Json(ValidationView {
        country_code: crate::localization::countries::normalize_country(&code),
        is_valid,
        errors,
    }))
}

/// Run the country's payroll strategy against a gross monthly figure.
/// Invalid profile inputs surface as 400, an unregistered domain as 404.
pub(crate) async fn payroll_preview(
    State(registry): State<Arc<LocalizationRegistry>>,
    Path(code): Path<String>,
    Json(request): Json<PayrollPreviewRequest>,
) -> Result<Json<PayrollPreviewView>, AppError> {
    let strategy = registry
        .get_or_raise(&code, DOMAIN_PAYROLL)?
        .as_payroll()
        .ok_or_else(|| LocalizationError::HandlerNotFound {
            country: code.clone(),
            domain: DOMAIN_PAYROLL.to_string(),
        })?;

    let result = strategy.calculate_salary(request.gross_pay, &request.profile)?;
    Ok(Json(PayrollPreviewView {
        country_code: crate::localization::countries::normalize_country(&code),
        currency: currency_for_country(&code).to_string(),
        result,
    }))
}
