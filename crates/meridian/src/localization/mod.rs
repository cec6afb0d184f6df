//! Country-localization dispatch: a two-level registry mapping
//! `(country, domain)` to strategy handlers, with per-domain default
//! fallback and lazy, cached instantiation.
//!
//! The registry is an explicitly constructed value owned by application
//! startup and passed by reference to whatever needs lookups; built-in
//! handlers are registered through [`register_builtin_localizations`] in
//! a deterministic sequence rather than at import time.

pub mod countries;
pub mod employees;
pub mod payroll;
pub mod router;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, OnceLock};

use serde::Serialize;

use countries::normalize_country;
use employees::EmployeeLocalization;
use payroll::PayrollStrategy;

pub const DOMAIN_PAYROLL: &str = "payroll";
pub const DOMAIN_EMPLOYEES: &str = "employees";

/// Lookup failures surfaced by `get_or_raise`; plain `get` never raises.
#[derive(Debug, thiserror::Error)]
pub enum LocalizationError {
    #[error("no localization handler found for country='{country}' domain='{domain}'")]
    HandlerNotFound { country: String, domain: String },
    #[error("country code '{0}' not recognized")]
    UnknownCountry(String),
}

/// A resolved handler, tagged by domain. Each variant exposes the
/// explicit trait for its domain contract.
#[derive(Clone)]
pub enum DomainHandler {
    Payroll(Arc<dyn PayrollStrategy>),
    Employees(Arc<dyn EmployeeLocalization>),
}

impl DomainHandler {
    pub fn as_payroll(&self) -> Option<Arc<dyn PayrollStrategy>> {
        match self {
            DomainHandler::Payroll(strategy) => Some(Arc::clone(strategy)),
            _ => None,
        }
    }

    pub fn as_employees(&self) -> Option<Arc<dyn EmployeeLocalization>> {
        match self {
            DomainHandler::Employees(handler) => Some(Arc::clone(handler)),
            _ => None,
        }
    }
}

type HandlerFactory = Box<dyn Fn() -> DomainHandler + Send + Sync>;

/// Container for a registered handler: construction is deferred to the
/// first lookup and the instance cached for the process lifetime.
/// `OnceLock` makes a concurrent first access resolve idempotently.
struct HandlerEntry {
    factory: HandlerFactory,
    instance: OnceLock<DomainHandler>,
}

impl HandlerEntry {
    fn new(factory: HandlerFactory) -> Self {
        Self {
            factory,
            instance: OnceLock::new(),
        }
    }

    fn instance(&self) -> DomainHandler {
        self.instance.get_or_init(|| (self.factory)()).clone()
    }
}

/// Registry for country-specific implementations across domains.
///
/// Structure: `{country_code -> {domain -> entry}}` plus a per-domain
/// default map consulted when no country-specific entry exists.
/// Registration happens once at startup; lookups afterwards are
/// read-only and safe for concurrent callers.
#[derive(Default)]
pub struct LocalizationRegistry {
    handlers: HashMap<String, HashMap<String, HandlerEntry>>,
    defaults: HashMap<String, HandlerEntry>,
}

/// Introspection snapshot of the registry, for diagnostics endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct RegistryInfo {
    pub countries: BTreeMap<String, Vec<String>>,
    pub default_domains: Vec<String>,
    pub total_handlers: usize,
}

impl LocalizationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a country-specific handler factory.
    pub fn register<F>(&mut self, country_code: &str, domain: &str, factory: F)
    where
        F: Fn() -> DomainHandler + Send + Sync + 'static,
    {
        let country = normalize_country(country_code);
        self.handlers
            .entry(country)
            .or_default()
            .insert(domain.to_string(), HandlerEntry::new(Box::new(factory)));
    }

    /// Register the fallback handler for a domain, used when no
    /// country-specific entry exists.
    pub fn register_default<F>(&mut self, domain: &str, factory: F)
    where
        F: Fn() -> DomainHandler + Send + Sync + 'static,
    {
        self.defaults
            .insert(domain.to_string(), HandlerEntry::new(Box::new(factory)));
    }

    /// Resolve a handler: exact country+domain first, then the domain
    /// default, then absent. Never raises.
    pub fn get(&self, country_code: &str, domain: &str) -> Option<DomainHandler> {
        let country = normalize_country(country_code);

        if let Some(entry) = self
            .handlers
            .get(&country)
            .and_then(|domains| domains.get(domain))
        {
            return Some(entry.instance());
        }

        self.defaults.get(domain).map(HandlerEntry::instance)
    }

    /// Same lookup as `get` but absence is an error, for callers that
    /// cannot proceed without a strategy.
    pub fn get_or_raise(
        &self,
        country_code: &str,
        domain: &str,
    ) -> Result<DomainHandler, LocalizationError> {
        self.get(country_code, domain)
            .ok_or_else(|| LocalizationError::HandlerNotFound {
                country: country_code.to_string(),
                domain: domain.to_string(),
            })
    }

    pub fn has_handler(&self, country_code: &str, domain: &str) -> bool {
        let country = normalize_country(country_code);
        self.handlers
            .get(&country)
            .map(|domains| domains.contains_key(domain))
            .unwrap_or(false)
            || self.defaults.contains_key(domain)
    }

    /// Countries with registered handlers, optionally filtered to those
    /// covering one domain.
    pub fn list_countries(&self, domain: Option<&str>) -> Vec<String> {
        let mut countries: Vec<String> = self
            .handlers
            .iter()
            .filter(|(_, domains)| domain.map(|d| domains.contains_key(d)).unwrap_or(true))
            .map(|(country, _)| country.clone())
            .collect();
        countries.sort();
        countries
    }

    /// Registered domains, optionally restricted to one country (the
    /// unrestricted form includes default-only domains).
    pub fn list_domains(&self, country_code: Option<&str>) -> Vec<String> {
        match country_code {
            Some(code) => {
                let country = normalize_country(code);
                let mut domains: Vec<String> = self
                    .handlers
                    .get(&country)
                    .map(|domains| domains.keys().cloned().collect())
                    .unwrap_or_default();
                domains.sort();
                domains
            }
            None => {
                let mut domains: BTreeSet<String> = self
                    .handlers
                    .values()
                    .flat_map(|domains| domains.keys().cloned())
                    .collect();
                domains.extend(self.defaults.keys().cloned());
                domains.into_iter().collect()
            }
        }
    }

    pub fn info(&self) -> RegistryInfo {
        let countries: BTreeMap<String, Vec<String>> = self
            .handlers
            .iter()
            .map(|(country, domains)| {
                let mut names: Vec<String> = domains.keys().cloned().collect();
                names.sort();
                (country.clone(), names)
            })
            .collect();

        let mut default_domains: Vec<String> = self.defaults.keys().cloned().collect();
        default_domains.sort();

        let total_handlers =
            self.handlers.values().map(HashMap::len).sum::<usize>() + self.defaults.len();

        RegistryInfo {
            countries,
            default_domains,
            total_handlers,
        }
    }
}

/// Register every built-in handler, in one deterministic startup pass.
pub fn register_builtin_localizations(registry: &mut LocalizationRegistry) {
    payroll::register_builtin_strategies(registry);
    employees::register_builtin_handlers(registry);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn registry_with_defaults_only() -> LocalizationRegistry {
        let mut registry = LocalizationRegistry::new();
        registry.register_default(DOMAIN_PAYROLL, || {
            DomainHandler::Payroll(Arc::new(payroll::DefaultPayrollStrategy))
        });
        registry
    }

    #[test]
    fn unknown_country_falls_back_to_the_domain_default() {
        let registry = registry_with_defaults_only();

        let handler = registry
            .get("ZZZ", DOMAIN_PAYROLL)
            .expect("default handler resolves");
        let strategy = handler.as_payroll().expect("payroll variant");

        let result = strategy
            .calculate_salary(Decimal::from(1000), &payroll::EmployeeProfile::default())
            .expect("default strategy never fails");
        assert_eq!(result.net_pay, Decimal::from(1000));
    }

    #[test]
    fn missing_domain_is_absent_not_an_error() {
        let registry = registry_with_defaults_only();
        assert!(registry.get("ZZZ", "nonexistent_domain").is_none());
        assert!(registry
            .get_or_raise("ZZZ", "nonexistent_domain")
            .is_err());
    }

    #[test]
    fn country_lookup_is_case_insensitive_and_alias_aware() {
        let mut registry = LocalizationRegistry::new();
        registry.register("IDN", DOMAIN_PAYROLL, || {
            DomainHandler::Payroll(Arc::new(payroll::IndonesiaPayrollStrategy))
        });

        assert!(registry.get("idn", DOMAIN_PAYROLL).is_some());
        assert!(registry.get("ID", DOMAIN_PAYROLL).is_some());
        assert!(registry.get("MY", DOMAIN_PAYROLL).is_none());
    }

    #[test]
    fn instances_are_cached_per_country_domain_pair() {
        let mut registry = LocalizationRegistry::new();
        registry.register("SGP", DOMAIN_PAYROLL, || {
            DomainHandler::Payroll(Arc::new(payroll::SingaporePayrollStrategy))
        });

        let first = registry
            .get("SGP", DOMAIN_PAYROLL)
            .and_then(|h| h.as_payroll())
            .expect("handler resolves");
        let second = registry
            .get("SGP", DOMAIN_PAYROLL)
            .and_then(|h| h.as_payroll())
            .expect("handler resolves");

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn introspection_reports_countries_and_domains() {
        let mut registry = LocalizationRegistry::new();
        register_builtin_localizations(&mut registry);

        let countries = registry.list_countries(Some(DOMAIN_PAYROLL));
        assert_eq!(countries, vec!["IDN", "MYS", "SGP"]);

        let domains = registry.list_domains(None);
        assert_eq!(domains, vec![DOMAIN_EMPLOYEES, DOMAIN_PAYROLL]);

        let info = registry.info();
        assert_eq!(info.default_domains, vec![DOMAIN_EMPLOYEES, DOMAIN_PAYROLL]);
        // 3 countries x 2 domains + 2 defaults
        assert_eq!(info.total_handlers, 8);

        assert!(registry.has_handler("IDN", DOMAIN_PAYROLL));
        // Default fallback counts as having a handler.
        assert!(registry.has_handler("ZZZ", DOMAIN_PAYROLL));
        assert!(!registry.has_handler("ZZZ", "benefits"));
    }
}
