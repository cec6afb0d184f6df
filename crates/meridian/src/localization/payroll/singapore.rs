use rust_decimal::Decimal;

use super::{
    validate_gross_pay, EmployeeProfile, PayrollError, PayrollLine, PayrollResult, PayrollStrategy,
};

/// Singaporean CPF contributions with age-banded rates, plus the
/// employer-only Skills Development Levy.
///
/// CPF applies to the ordinary-wage ceiling only; net pay is computed
/// from the uncapped gross.
pub struct SingaporePayrollStrategy;

fn ordinary_wage_ceiling() -> Decimal {
    Decimal::new(680000, 2) // 6,800.00
}

fn sdl_rate() -> Decimal {
    Decimal::new(25, 4) // 0.25%
}

fn sdl_cap() -> Decimal {
    Decimal::new(1125, 2) // 11.25
}

/// (employee, employer) CPF rates for the age band.
fn cpf_rates(age: u8) -> (Decimal, Decimal) {
    if age <= 55 {
        (Decimal::new(20, 2), Decimal::new(17, 2))
    } else if age <= 60 {
        (Decimal::new(13, 2), Decimal::new(13, 2))
    } else {
        (Decimal::new(75, 3), Decimal::new(9, 2))
    }
}

impl PayrollStrategy for SingaporePayrollStrategy {
    fn calculate_salary(
        &self,
        gross_pay: Decimal,
        profile: &EmployeeProfile,
    ) -> Result<PayrollResult, PayrollError> {
        validate_gross_pay(gross_pay)?;

        let age = profile.age.unwrap_or(30);
        let (cpf_rate_employee, cpf_rate_employer) = cpf_rates(age);

        let capped_gross = gross_pay.min(ordinary_wage_ceiling());
        let cpf_employee = capped_gross * cpf_rate_employee;
        let cpf_employer = capped_gross * cpf_rate_employer;

        let sdl = (gross_pay * sdl_rate()).min(sdl_cap());

        Ok(PayrollResult {
            gross_pay,
            employee_deduction: cpf_employee,
            employer_contribution: cpf_employer + sdl,
            net_pay: gross_pay - cpf_employee,
            details: vec![
                PayrollLine {
                    label: "CPF (Employee)".to_string(),
                    amount: cpf_employee,
                },
                PayrollLine {
                    label: "CPF (Employer)".to_string(),
                    amount: cpf_employer,
                },
                PayrollLine {
                    label: "SDL".to_string(),
                    amount: sdl,
                },
            ],
        })
    }
}
