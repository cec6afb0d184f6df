//! Country-specific employee data requirements and validation.

mod indonesia;
mod malaysia;
mod singapore;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use super::{DomainHandler, LocalizationRegistry, DOMAIN_EMPLOYEES};

pub use indonesia::IndonesiaEmployeeHandler;
pub use malaysia::MalaysiaEmployeeHandler;
pub use singapore::SingaporeEmployeeHandler;

/// Employee-data contract registered under the `employees` localization
/// domain: which fields a country requires, how to validate them, and
/// what the local tax identifier is called.
pub trait EmployeeLocalization: Send + Sync {
    fn required_fields(&self) -> Vec<&'static str>;

    fn optional_fields(&self) -> Vec<&'static str>;

    /// Validate a submitted employee record. Returns whether the data is
    /// acceptable plus the full list of error messages.
    fn validate(&self, data: &BTreeMap<String, JsonValue>) -> (bool, Vec<String>);

    fn tax_id_name(&self) -> &'static str;

    /// Summary of employment-law constants for the country, where known.
    fn statutory_requirements(&self) -> Option<JsonValue> {
        None
    }
}

/// Presence check shared by all handlers: a required field must exist
/// and be a non-empty, non-null value.
pub(crate) fn missing_field_errors(
    required: &[&'static str],
    data: &BTreeMap<String, JsonValue>,
) -> Vec<String> {
    required
        .iter()
        .filter(|field| {
            match data.get(**field) {
                None | Some(JsonValue::Null) => true,
                Some(JsonValue::String(s)) => s.trim().is_empty(),
                Some(_) => false,
            }
        })
        .map(|field| format!("Required field '{field}' is missing"))
        .collect()
}

/// Minimal requirements applied when no country-specific handler exists.
pub struct DefaultEmployeeHandler;

impl EmployeeLocalization for DefaultEmployeeHandler {
    fn required_fields(&self) -> Vec<&'static str> {
        vec!["first_name", "last_name", "email", "hire_date"]
    }

    fn optional_fields(&self) -> Vec<&'static str> {
        vec![
            "middle_name",
            "phone",
            "address",
            "emergency_contact",
            "bank_account",
        ]
    }

    fn validate(&self, data: &BTreeMap<String, JsonValue>) -> (bool, Vec<String>) {
        let errors = missing_field_errors(&self.required_fields(), data);
        (errors.is_empty(), errors)
    }

    fn tax_id_name(&self) -> &'static str {
        "Tax ID"
    }
}

/// Register the built-in employee handlers for Indonesia, Malaysia,
/// Singapore, and the generic default.
pub fn register_builtin_handlers(registry: &mut LocalizationRegistry) {
    registry.register("IDN", DOMAIN_EMPLOYEES, || {
        DomainHandler::Employees(Arc::new(IndonesiaEmployeeHandler))
    });
    registry.register("MYS", DOMAIN_EMPLOYEES, || {
        DomainHandler::Employees(Arc::new(MalaysiaEmployeeHandler))
    });
    registry.register("SGP", DOMAIN_EMPLOYEES, || {
        DomainHandler::Employees(Arc::new(SingaporeEmployeeHandler))
    });
    registry.register_default(DOMAIN_EMPLOYEES, || {
        DomainHandler::Employees(Arc::new(DefaultEmployeeHandler))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(pairs: &[(&str, JsonValue)]) -> BTreeMap<String, JsonValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn default_handler_flags_each_missing_required_field() {
        let data = record(&[
            ("first_name", json!("Ana")),
            ("email", json!("ana@example.com")),
        ]);
        let (valid, errors) = DefaultEmployeeHandler.validate(&data);
        assert!(!valid);
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.contains("last_name")));
        assert!(errors.iter().any(|e| e.contains("hire_date")));
    }

    #[test]
    fn empty_strings_count_as_missing() {
        let data = record(&[
            ("first_name", json!("")),
            ("last_name", json!("Tan")),
            ("email", json!("tan@example.com")),
            ("hire_date", json!("2026-01-05")),
        ]);
        let (valid, errors) = DefaultEmployeeHandler.validate(&data);
        assert!(!valid);
        assert_eq!(errors, vec!["Required field 'first_name' is missing"]);
    }
}
