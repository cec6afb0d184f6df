//! Payroll calculation strategies, one per supported country.
//!
//! Each strategy is a pure function from gross pay and an employee
//! profile to a deduction/contribution breakdown. All money arithmetic
//! uses fixed-point decimals; rounding is half-up at the smallest
//! currency unit wherever a statutory amount is quantized. The `details`
//! labels are consumed verbatim by document rendering and must not be
//! reworded.

mod indonesia;
mod malaysia;
mod singapore;

use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::{DomainHandler, LocalizationRegistry, DOMAIN_PAYROLL};

pub use indonesia::IndonesiaPayrollStrategy;
pub use malaysia::MalaysiaPayrollStrategy;
pub use singapore::SingaporePayrollStrategy;

/// Validation failures inside a strategy; callers map these to
/// client-visible 4xx errors rather than retrying.
#[derive(Debug, thiserror::Error)]
pub enum PayrollError {
    #[error("invalid payroll input: {0}")]
    InvalidInput(String),
}

/// Employee attributes the strategies consult. Every field is optional;
/// country strategies fall back to their customary defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeProfile {
    /// Indonesian PTKP (tax-free threshold) status code, e.g. `TK0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ptkp_status: Option<String>,
    /// Age in years, used by the Singapore CPF brackets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_permanent_resident: Option<bool>,
}

/// One labelled line of a payroll breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollLine {
    pub label: String,
    pub amount: Decimal,
}

/// Result of a salary calculation; `details` preserves insertion order
/// for report rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollResult {
    pub gross_pay: Decimal,
    pub employee_deduction: Decimal,
    pub employer_contribution: Decimal,
    pub net_pay: Decimal,
    pub details: Vec<PayrollLine>,
}

impl PayrollResult {
    pub fn detail(&self, label: &str) -> Option<Decimal> {
        self.details
            .iter()
            .find(|line| line.label == label)
            .map(|line| line.amount)
    }
}

/// Country-specific payroll contract registered under the `payroll`
/// localization domain.
pub trait PayrollStrategy: Send + Sync {
    fn calculate_salary(
        &self,
        gross_pay: Decimal,
        profile: &EmployeeProfile,
    ) -> Result<PayrollResult, PayrollError>;
}

/// Fallback for countries without statutory rules: nothing withheld,
/// net pay equals gross pay.
pub struct DefaultPayrollStrategy;

impl PayrollStrategy for DefaultPayrollStrategy {
    fn calculate_salary(
        &self,
        gross_pay: Decimal,
        _profile: &EmployeeProfile,
    ) -> Result<PayrollResult, PayrollError> {
        validate_gross_pay(gross_pay)?;

        Ok(PayrollResult {
            gross_pay,
            employee_deduction: Decimal::ZERO,
            employer_contribution: Decimal::ZERO,
            net_pay: gross_pay,
            details: Vec::new(),
        })
    }
}

/// Register the built-in strategies for Indonesia, Malaysia, Singapore,
/// and the no-op default.
pub fn register_builtin_strategies(registry: &mut LocalizationRegistry) {
    registry.register("IDN", DOMAIN_PAYROLL, || {
        DomainHandler::Payroll(Arc::new(IndonesiaPayrollStrategy))
    });
    registry.register("MYS", DOMAIN_PAYROLL, || {
        DomainHandler::Payroll(Arc::new(MalaysiaPayrollStrategy))
    });
    registry.register("SGP", DOMAIN_PAYROLL, || {
        DomainHandler::Payroll(Arc::new(SingaporePayrollStrategy))
    });
    registry.register_default(DOMAIN_PAYROLL, || {
        DomainHandler::Payroll(Arc::new(DefaultPayrollStrategy))
    });
}

/// Round half-up to the whole currency unit.
pub(crate) fn to_currency_unit(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Upper bound on a monthly gross figure any strategy will accept.
/// Generous for the weakest supported currency, and small enough that
/// annualization and rate multiplication can never overflow `Decimal`.
fn max_gross_pay() -> Decimal {
    Decimal::from(1_000_000_000_000_u64)
}

/// Strategies share one input contract: gross pay must be a
/// non-negative amount within `max_gross_pay`. Anything else is a
/// client error, never a panic.
pub(crate) fn validate_gross_pay(gross_pay: Decimal) -> Result<(), PayrollError> {
    if gross_pay < Decimal::ZERO || gross_pay > max_gross_pay() {
        return Err(PayrollError::InvalidInput(format!(
            "Invalid gross pay: {gross_pay}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_strategy_passes_gross_through_untouched() {
        let result = DefaultPayrollStrategy
            .calculate_salary(Decimal::new(1234567, 2), &EmployeeProfile::default())
            .expect("default strategy never fails");

        assert_eq!(result.gross_pay, Decimal::new(1234567, 2));
        assert_eq!(result.net_pay, Decimal::new(1234567, 2));
        assert_eq!(result.employee_deduction, Decimal::ZERO);
        assert_eq!(result.employer_contribution, Decimal::ZERO);
        assert!(result.details.is_empty());
    }

    #[test]
    fn currency_rounding_is_half_up() {
        assert_eq!(to_currency_unit(Decimal::new(15, 1)), Decimal::from(2));
        assert_eq!(to_currency_unit(Decimal::new(25, 1)), Decimal::from(3));
        assert_eq!(to_currency_unit(Decimal::new(14, 1)), Decimal::from(1));
    }

    #[test]
    fn every_strategy_rejects_out_of_range_gross_pay() {
        let strategies: Vec<Box<dyn PayrollStrategy>> = vec![
            Box::new(DefaultPayrollStrategy),
            Box::new(IndonesiaPayrollStrategy),
            Box::new(MalaysiaPayrollStrategy),
            Box::new(SingaporePayrollStrategy),
        ];
        let profile = EmployeeProfile::default();

        for strategy in &strategies {
            // An absurd magnitude would overflow annualization and rate
            // multiplication; it must come back as an input error.
            let err = strategy
                .calculate_salary(Decimal::MAX, &profile)
                .expect_err("oversized gross rejected");
            assert!(matches!(err, PayrollError::InvalidInput(_)));

            let err = strategy
                .calculate_salary(Decimal::from(-1), &profile)
                .expect_err("negative gross rejected");
            assert!(matches!(err, PayrollError::InvalidInput(_)));
        }
    }

    #[test]
    fn zero_gross_pay_is_a_valid_input() {
        let result = IndonesiaPayrollStrategy
            .calculate_salary(Decimal::ZERO, &EmployeeProfile::default())
            .expect("zero gross is in range");
        assert_eq!(result.net_pay, Decimal::ZERO);
        assert_eq!(result.employee_deduction, Decimal::ZERO);
    }
}
