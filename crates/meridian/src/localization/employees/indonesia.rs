use std::collections::BTreeMap;

use serde_json::{json, Value as JsonValue};

use super::{missing_field_errors, EmployeeLocalization};

const PTKP_STATUSES: &[&str] = &["TK0", "TK1", "TK2", "TK3", "K0", "K1", "K2", "K3"];

/// Indonesian employee requirements: NPWP tax number plus BPJS
/// enrollment identifiers.
pub struct IndonesiaEmployeeHandler;

/// NPWP carries formatting punctuation; it is valid when it contains
/// exactly 15 digits.
fn valid_npwp(value: &str) -> bool {
    value.chars().filter(|c| c.is_ascii_digit()).count() == 15
}

impl EmployeeLocalization for IndonesiaEmployeeHandler {
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
            "ptkp_status",
            "bpjs_kesehatan_number",
            "bpjs_ketenagakerjaan_number",
            "ktp_number",
            "kk_number",
            "religion",
        ]
    }

    fn validate(&self, data: &BTreeMap<String, JsonValue>) -> (bool, Vec<String>) {
        let mut errors = missing_field_errors(&self.required_fields(), data);

        if let Some(JsonValue::String(tax_id)) = data.get("tax_id") {
            if !tax_id.is_empty() && !valid_npwp(tax_id) {
                errors.push("NPWP must be 15 digits (format: XX.XXX.XXX.X-XXX.XXX)".to_string());
            }
        }

        if let Some(JsonValue::String(ptkp)) = data.get("ptkp_status") {
            if !ptkp.is_empty() && !PTKP_STATUSES.contains(&ptkp.as_str()) {
                errors.push(format!("Invalid PTKP status: {ptkp}"));
            }
        }

        (errors.is_empty(), errors)
    }

    fn tax_id_name(&self) -> &'static str {
        "NPWP (Nomor Pokok Wajib Pajak)"
    }

    fn statutory_requirements(&self) -> Option<JsonValue> {
        Some(json!({
            "probation_period_max_days": 90,
            "annual_leave_min_days": 12,
            "notice_period_days": 30,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete_record() -> BTreeMap<String, JsonValue> {
        [
            ("first_name", json!("Sari")),
            ("last_name", json!("Wijaya")),
            ("email", json!("sari@example.co.id")),
            ("hire_date", json!("2026-02-01")),
            ("tax_id", json!("01.234.567.8-901.234")),
            ("nationality", json!("Indonesian")),
            ("country", json!("IDN")),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    #[test]
    fn formatted_npwp_with_15_digits_passes() {
        let (valid, errors) = IndonesiaEmployeeHandler.validate(&complete_record());
        assert!(valid, "unexpected errors: {errors:?}");
    }

    #[test]
    fn short_npwp_is_rejected() {
        let mut data = complete_record();
        data.insert("tax_id".to_string(), json!("12.345"));
        let (valid, errors) = IndonesiaEmployeeHandler.validate(&data);
        assert!(!valid);
        assert!(errors.iter().any(|e| e.contains("NPWP")));
    }

    #[test]
    fn unknown_ptkp_status_is_rejected() {
        let mut data = complete_record();
        data.insert("ptkp_status".to_string(), json!("K9"));
        let (valid, errors) = IndonesiaEmployeeHandler.validate(&data);
        assert!(!valid);
        assert!(errors.iter().any(|e| e.contains("K9")));
    }
}
