use std::collections::BTreeMap;

use serde_json::{json, Value as JsonValue};

use super::{missing_field_errors, EmployeeLocalization};

/// Malaysian employee requirements: income tax number plus EPF/SOCSO/EIS
/// statutory identifiers.
pub struct MalaysiaEmployeeHandler;

/// MyKad IC format: `YYMMDD-PB-####`.
fn valid_ic(value: &str) -> bool {
    let parts: Vec<&str> = value.split('-').collect();
    matches!(parts.as_slice(), [birth, place, serial]
        if birth.len() == 6
            && place.len() == 2
            && serial.len() == 4
            && birth.chars().all(|c| c.is_ascii_digit())
            && place.chars().all(|c| c.is_ascii_digit())
            && serial.chars().all(|c| c.is_ascii_digit()))
}

impl EmployeeLocalization for MalaysiaEmployeeHandler {
    fn required_fields(&self) -> Vec<&'static str> {
        vec![
            "first_name",
            "last_name",
            "email",
            "hire_date",
            "tax_id",
            "nationality",
            "country",
        ]
    }

    fn optional_fields(&self) -> Vec<&'static str> {
        vec![
            "ic_number",
            "epf_number",
            "socso_number",
            "eis_number",
            "passport_number",
        ]
    }

    fn validate(&self, data: &BTreeMap<String, JsonValue>) -> (bool, Vec<String>) {
        let mut errors = missing_field_errors(&self.required_fields(), data);

        if let Some(JsonValue::String(ic)) = data.get("ic_number") {
            if !ic.is_empty() && !valid_ic(ic) {
                errors.push("IC number format invalid (should be YYMMDD-PB-####)".to_string());
            }
        }

        (errors.is_empty(), errors)
    }

    fn tax_id_name(&self) -> &'static str {
        "Income Tax Number"
    }

    fn statutory_requirements(&self) -> Option<JsonValue> {
        Some(json!({
            "minimum_wage_myr": 1500,
            "probation_period_max_months": 3,
            "annual_leave_min_days": 8,
            "notice_period_days": 30,
            "epf_rate_employer": 0.13,
            "epf_rate_employee": 0.11,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ic_format_check_accepts_the_standard_shape() {
        assert!(valid_ic("900101-14-5678"));
        assert!(!valid_ic("900101145678"));
        assert!(!valid_ic("9001-0114-5678"));
        assert!(!valid_ic("900101-14-56A8"));
    }

    #[test]
    fn malformed_ic_surfaces_an_error() {
        let data: BTreeMap<String, JsonValue> = [
            ("first_name", serde_json::json!("Aisyah")),
            ("last_name", serde_json::json!("Rahman")),
            ("email", serde_json::json!("aisyah@example.my")),
            ("hire_date", serde_json::json!("2026-03-01")),
            ("tax_id", serde_json::json!("SG1234567")),
            ("nationality", serde_json::json!("Malaysian")),
            ("country", serde_json::json!("MYS")),
            ("ic_number", serde_json::json!("bad-ic")),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let (valid, errors) = MalaysiaEmployeeHandler.validate(&data);
        assert!(!valid);
        assert!(errors.iter().any(|e| e.contains("IC number")));
    }
}
