//! ISO 3166-1 alpha-3 country and ISO 4217 currency reference tables.

/// Countries recognized by the localization layer.
pub const COUNTRY_CODES: &[(&str, &str)] = &[
    ("IDN", "Indonesia"),
    ("MYS", "Malaysia"),
    ("SGP", "Singapore"),
    ("USA", "United States"),
    ("GBR", "United Kingdom"),
    ("AUS", "Australia"),
    ("JPN", "Japan"),
    ("CHN", "China"),
    ("IND", "India"),
    ("DEU", "Germany"),
    ("FRA", "France"),
    ("ITA", "Italy"),
    ("ESP", "Spain"),
    ("THA", "Thailand"),
    ("VNM", "Vietnam"),
    ("PHL", "Philippines"),
    ("CAN", "Canada"),
    ("BRA", "Brazil"),
    ("MEX", "Mexico"),
    ("NLD", "Netherlands"),
];

/// Currency code, display name, symbol, and the countries using it.
pub const CURRENCY_CODES: &[(&str, &str, &str, &[&str])] = &[
    ("USD", "US Dollar", "$", &["USA"]),
    ("EUR", "Euro", "€", &["DEU", "FRA", "ITA", "ESP", "NLD"]),
    ("GBP", "British Pound", "£", &["GBR"]),
    ("JPY", "Japanese Yen", "¥", &["JPN"]),
    ("CNY", "Chinese Yuan", "¥", &["CHN"]),
    ("INR", "Indian Rupee", "₹", &["IND"]),
    ("IDR", "Indonesian Rupiah", "Rp", &["IDN"]),
    ("SGD", "Singapore Dollar", "S$", &["SGP"]),
    ("MYR", "Malaysian Ringgit", "RM", &["MYS"]),
    ("THB", "Thai Baht", "฿", &["THA"]),
    ("VND", "Vietnamese Dong", "₫", &["VNM"]),
    ("PHP", "Philippine Peso", "₱", &["PHL"]),
    ("AUD", "Australian Dollar", "A$", &["AUS"]),
    ("CAD", "Canadian Dollar", "C$", &["CAN"]),
    ("BRL", "Brazilian Real", "R$", &["BRA"]),
    ("MXN", "Mexican Peso", "MX$", &["MEX"]),
];

/// Normalize a caller-supplied country code: uppercase, with the legacy
/// alpha-2 aliases the payroll callers historically used mapped to their
/// alpha-3 equivalents.
pub fn normalize_country(code: &str) -> String {
    let upper = code.trim().to_ascii_uppercase();
    match upper.as_str() {
        "ID" => "IDN".to_string(),
        "MY" => "MYS".to_string(),
        "SG" => "SGP".to_string(),
        _ => upper,
    }
}

pub fn country_name(code: &str) -> Option<&'static str> {
    let normalized = normalize_country(code);
    COUNTRY_CODES
        .iter()
        .find(|(iso, _)| *iso == normalized)
        .map(|(_, name)| *name)
}

/// Primary currency for a country, defaulting to USD when unmapped.
pub fn currency_for_country(country_code: &str) -> &'static str {
    let normalized = normalize_country(country_code);
    CURRENCY_CODES
        .iter()
        .find(|(_, _, _, countries)| countries.contains(&normalized.as_str()))
        .map(|(code, _, _, _)| *code)
        .unwrap_or("USD")
}
