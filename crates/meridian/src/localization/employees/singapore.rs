use std::collections::BTreeMap;

use serde_json::{json, Value as JsonValue};

use super::{missing_field_errors, EmployeeLocalization};

/// Singaporean employee requirements: NRIC/FIN plus work-authorization
/// fields for non-citizens.
pub struct SingaporeEmployeeHandler;

/// NRIC/FIN format: prefix S/T/F/G, seven digits, checksum letter.
fn valid_nric(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 9
        && matches!(bytes[0], b'S' | b'T' | b'F' | b'G')
        && bytes[1..8].iter().all(u8::is_ascii_digit)
        && bytes[8].is_ascii_uppercase()
}

impl EmployeeLocalization for SingaporeEmployeeHandler {
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
            "nric_fin",
            "work_permit_type",
            "work_permit_expiry",
            "cpf_number",
            "pr_status",
        ]
    }

    fn validate(&self, data: &BTreeMap<String, JsonValue>) -> (bool, Vec<String>) {
        let mut errors = missing_field_errors(&self.required_fields(), data);

        if let Some(JsonValue::String(nric)) = data.get("nric_fin") {
            if !nric.is_empty() && !valid_nric(nric) {
                errors
                    .push("NRIC/FIN format invalid (should be S/T/F/G#######[A-Z])".to_string());
            }
        }

        (errors.is_empty(), errors)
    }

    fn tax_id_name(&self) -> &'static str {
        "NRIC/FIN"
    }

    fn statutory_requirements(&self) -> Option<JsonValue> {
        Some(json!({
            "cpf_ordinary_wage_ceiling_sgd": 6800,
            "annual_leave_min_days": 7,
            "notice_period_days": 30,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nric_format_check() {
        assert!(valid_nric("S1234567A"));
        assert!(valid_nric("G7654321Z"));
        assert!(!valid_nric("A1234567Z"));
        assert!(!valid_nric("S123456A"));
        assert!(!valid_nric("S1234567a"));
    }
}
