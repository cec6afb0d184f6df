use rust_decimal::Decimal;

use super::{
    validate_gross_pay, EmployeeProfile, PayrollError, PayrollLine, PayrollResult, PayrollStrategy,
};

/// Malaysian EPF (KWSP), SOCSO (PERKESO), and EIS contributions.
///
/// SOCSO uses a flat 0.5%-with-cap approximation of the statutory tiered
/// table; the employer side mirrors the employee SOCSO/EIS amounts.
pub struct MalaysiaPayrollStrategy;

fn epf_rate_employee() -> Decimal {
    Decimal::new(11, 2) // 11%
}

fn epf_rate_employer() -> Decimal {
    Decimal::new(13, 2) // 13%
}

fn socso_rate() -> Decimal {
    Decimal::new(5, 3) // 0.5%
}

fn socso_cap() -> Decimal {
    Decimal::new(1975, 2) // 19.75
}

fn eis_rate() -> Decimal {
    Decimal::new(2, 3) // 0.2%
}

impl PayrollStrategy for MalaysiaPayrollStrategy {
    fn calculate_salary(
        &self,
        gross_pay: Decimal,
        _profile: &EmployeeProfile,
    ) -> Result<PayrollResult, PayrollError> {
        validate_gross_pay(gross_pay)?;

        let epf_employee = gross_pay * epf_rate_employee();
        let epf_employer = gross_pay * epf_rate_employer();

        let socso = (gross_pay * socso_rate()).min(socso_cap());
        let eis = gross_pay * eis_rate();

        let employee_deduction = epf_employee + socso + eis;
        let employer_contribution = epf_employer + socso + eis;

        Ok(PayrollResult {
            gross_pay,
            employee_deduction,
            employer_contribution,
            net_pay: gross_pay - employee_deduction,
            details: vec![
                PayrollLine {
                    label: "EPF (Employee)".to_string(),
                    amount: epf_employee,
                },
                PayrollLine {
                    label: "SOCSO".to_string(),
                    amount: socso,
                },
                PayrollLine {
                    label: "EIS".to_string(),
                    amount: eis,
                },
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contributions_follow_the_flat_rates() {
        let result = MalaysiaPayrollStrategy
            .calculate_salary(Decimal::from(5000), &EmployeeProfile::default())
            .expect("calculation succeeds");

        assert_eq!(result.detail("EPF (Employee)"), Some(Decimal::from(550)));
        // 0.5% of 5000 = 25, capped at 19.75.
        assert_eq!(result.detail("SOCSO"), Some(Decimal::new(1975, 2)));
        assert_eq!(result.detail("EIS"), Some(Decimal::from(10)));

        assert_eq!(result.employee_deduction, Decimal::new(57975, 2));
        // Employer: 13% EPF plus mirrored SOCSO/EIS.
        assert_eq!(result.employer_contribution, Decimal::new(67975, 2));
        assert_eq!(result.net_pay, Decimal::new(442025, 2));
    }

    #[test]
    fn socso_cap_only_binds_above_the_threshold() {
        let result = MalaysiaPayrollStrategy
            .calculate_salary(Decimal::from(3000), &EmployeeProfile::default())
            .expect("calculation succeeds");
        // 0.5% of 3000 = 15, below the cap.
        assert_eq!(result.detail("SOCSO"), Some(Decimal::from(15)));
    }
}
