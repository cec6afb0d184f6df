use rust_decimal::Decimal;

use super::{
    to_currency_unit, validate_gross_pay, EmployeeProfile, PayrollError, PayrollLine,
    PayrollResult, PayrollStrategy,
};

/// Indonesian statutory deductions: BPJS social-security schemes plus
/// monthly PPh 21 income-tax withholding computed by annualization.
///
/// Each BPJS component is quantized to whole rupiah before summation,
/// matching how the statements are rendered downstream.
pub struct IndonesiaPayrollStrategy;

fn health_rate_employee() -> Decimal {
    Decimal::new(1, 2) // 1%
}

fn health_salary_cap() -> Decimal {
    Decimal::from(12_000_000_u64)
}

fn jht_rate_employee() -> Decimal {
    Decimal::new(2, 2) // 2%
}

fn jp_rate_employee() -> Decimal {
    Decimal::new(1, 2) // 1%
}

fn pension_salary_cap() -> Decimal {
    Decimal::from(10_054_900_u64)
}

fn occupational_expense_rate() -> Decimal {
    Decimal::new(5, 2) // 5%
}

fn max_occupational_expense_monthly() -> Decimal {
    Decimal::from(500_000_u64)
}

/// PTKP: annual tax-free income threshold by marital/dependent status.
fn ptkp_amount(status: &str) -> Result<Decimal, PayrollError> {
    let amount = match status.to_ascii_uppercase().as_str() {
        "TK0" => 54_000_000_u64,
        "K0" => 58_500_000,
        "K1" => 63_000_000,
        "K2" => 67_500_000,
        "K3" => 72_000_000,
        _ => {
            return Err(PayrollError::InvalidInput(format!(
                "Invalid PTKP status: {status}"
            )))
        }
    };
    Ok(Decimal::from(amount))
}

/// Progressive annual brackets: 5% to 60M, 15% to 250M, 25% to 500M,
/// 30% to 5B, 35% above.
fn progressive_annual_tax(taxable: Decimal) -> Decimal {
    let brackets = [
        (Decimal::from(60_000_000_u64), Decimal::new(5, 2)),
        (Decimal::from(250_000_000_u64), Decimal::new(15, 2)),
        (Decimal::from(500_000_000_u64), Decimal::new(25, 2)),
        (Decimal::from(5_000_000_000_u64), Decimal::new(30, 2)),
        (Decimal::MAX, Decimal::new(35, 2)),
    ];

    let mut annual_tax = Decimal::ZERO;
    let mut remaining = taxable;
    let mut previous_limit = Decimal::ZERO;

    for (limit, rate) in brackets {
        let taxable_in_bracket = remaining.min(limit - previous_limit);
        annual_tax += taxable_in_bracket * rate;
        remaining -= taxable_in_bracket;
        if remaining <= Decimal::ZERO {
            break;
        }
        previous_limit = limit;
    }

    annual_tax
}

/// Monthly PPh 21 withholding: subtract the occupational-expense
/// allowance and the employee JHT/JP contributions, annualize, subtract
/// PTKP, run the bracket schedule, then divide back to a monthly figure
/// rounded to whole rupiah.
fn monthly_income_tax(
    gross_pay: Decimal,
    jht_employee: Decimal,
    jp_employee: Decimal,
    ptkp_status: &str,
) -> Result<Decimal, PayrollError> {
    let occupational_expense =
        (gross_pay * occupational_expense_rate()).min(max_occupational_expense_monthly());

    let net_monthly_income = gross_pay - (occupational_expense + jht_employee + jp_employee);
    let net_annual_income = net_monthly_income * Decimal::from(12);

    let taxable_annual_income = net_annual_income - ptkp_amount(ptkp_status)?;
    if taxable_annual_income <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }

    let annual_tax = progressive_annual_tax(taxable_annual_income);
    Ok(to_currency_unit(annual_tax / Decimal::from(12)))
}

impl PayrollStrategy for IndonesiaPayrollStrategy {
    fn calculate_salary(
        &self,
        gross_pay: Decimal,
        profile: &EmployeeProfile,
    ) -> Result<PayrollResult, PayrollError> {
        validate_gross_pay(gross_pay)?;

        let ptkp_status = profile.ptkp_status.as_deref().unwrap_or("TK0");

        let health_base = gross_pay.min(health_salary_cap());
        let bpjs_kesehatan = to_currency_unit(health_base * health_rate_employee());
        let bpjs_jht = to_currency_unit(gross_pay * jht_rate_employee());
        let pension_base = gross_pay.min(pension_salary_cap());
        let bpjs_jp = to_currency_unit(pension_base * jp_rate_employee());

        let pph_21 = monthly_income_tax(gross_pay, bpjs_jht, bpjs_jp, ptkp_status)?;

        let employee_deduction = bpjs_kesehatan + bpjs_jht + bpjs_jp + pph_21;

        let employer_health = to_currency_unit(health_base * Decimal::new(4, 2));
        let employer_jht = to_currency_unit(gross_pay * Decimal::new(37, 3));
        let employer_jp = to_currency_unit(pension_base * Decimal::new(2, 2));
        let employer_jkk = to_currency_unit(gross_pay * Decimal::new(54, 4));
        let employer_jkm = to_currency_unit(gross_pay * Decimal::new(3, 3));

        let employer_contribution =
            employer_health + employer_jht + employer_jp + employer_jkk + employer_jkm;

        Ok(PayrollResult {
            gross_pay,
            employee_deduction,
            employer_contribution,
            net_pay: gross_pay - employee_deduction,
            details: vec![
                PayrollLine {
                    label: "BPJS Kesehatan (Employee)".to_string(),
                    amount: bpjs_kesehatan,
                },
                PayrollLine {
                    label: "BPJS JHT (Employee)".to_string(),
                    amount: bpjs_jht,
                },
                PayrollLine {
                    label: "BPJS JP (Employee)".to_string(),
                    amount: bpjs_jp,
                },
                PayrollLine {
                    label: "PPh 21".to_string(),
                    amount: pph_21,
                },
                PayrollLine {
                    label: "BPJS Kesehatan (Employer)".to_string(),
                    amount: employer_health,
                },
                PayrollLine {
                    label: "BPJS JHT (Employer)".to_string(),
                    amount: employer_jht,
                },
                PayrollLine {
                    label: "BPJS JP (Employer)".to_string(),
                    amount: employer_jp,
                },
                PayrollLine {
                    label: "BPJS JKK (Employer)".to_string(),
                    amount: employer_jkk,
                },
                PayrollLine {
                    label: "BPJS JKM (Employer)".to_string(),
                    amount: employer_jkm,
                },
            ],
        })
    }
}
