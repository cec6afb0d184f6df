use clap::Args;
use meridian::error::AppError;
use meridian::localization::countries::{country_name, currency_for_country};
use meridian::localization::payroll::EmployeeProfile;
use meridian::localization::{
    register_builtin_localizations, LocalizationError, LocalizationRegistry, DOMAIN_PAYROLL,
};
use meridian::modules::ModuleConfigLoader;
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct PayrollPreviewArgs {
    /// Country code (alpha-3, or the legacy ID/MY/SG aliases)
    #[arg(long)]
    pub(crate) country: String,
    /// Gross monthly pay in the country's currency
    #[arg(long, value_parser = crate::infra::parse_amount)]
    pub(crate) gross_pay: Decimal,
    /// Indonesian PTKP status (TK0 through K3)
    #[arg(long)]
    pub(crate) ptkp_status: Option<String>,
    /// Employee age, used by the Singapore CPF brackets
    #[arg(long)]
    pub(crate) age: Option<u8>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Modules directory to scan (defaults to ./modules)
    #[arg(long)]
    pub(crate) modules_dir: Option<PathBuf>,
}

pub(crate) fn run_payroll_preview(args: PayrollPreviewArgs) -> Result<(), AppError> {
    let PayrollPreviewArgs {
        country,
        gross_pay,
        ptkp_status,
        age,
    } = args;

    let mut registry = LocalizationRegistry::new();
    register_builtin_localizations(&mut registry);

    let strategy = registry
        .get_or_raise(&country, DOMAIN_PAYROLL)?
        .as_payroll()
        .ok_or_else(|| {
            AppError::from(LocalizationError::HandlerNotFound {
                country: country.clone(),
                domain: DOMAIN_PAYROLL.to_string(),
            })
        })?;

    let profile = EmployeeProfile {
        ptkp_status,
        age,
        is_permanent_resident: None,
    };
    let result = strategy.calculate_salary(gross_pay, &profile)?;

    let currency = currency_for_country(&country);
    let label = country_name(&country).unwrap_or("Unknown country");

    println!("Payroll preview for {label}");
    println!("Gross pay: {currency} {}", result.gross_pay);
    if result.details.is_empty() {
        println!("No statutory deductions registered for this country.");
    } else {
        println!("\nBreakdown");
        for line in &result.details {
            println!("- {}: {currency} {}", line.label, line.amount);
        }
    }
    println!("\nEmployee deduction: {currency} {}", result.employee_deduction);
    println!("Employer contribution: {currency} {}", result.employer_contribution);
    println!("Net pay: {currency} {}", result.net_pay);

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let root = args.modules_dir.unwrap_or_else(|| PathBuf::from("modules"));

    println!("Module registry demo");
    println!("Scanning {}", root.display());

    let modules = ModuleConfigLoader::load_all(&root);
    if modules.is_empty() {
        println!("No modules found.");
    } else {
        println!("\nModules ({})", modules.len());
        for (id, config) in &modules {
            let screens = config.screens.as_ref().map(|s| s.len()).unwrap_or(0);
            let workflows = config.workflows.as_ref().map(|w| w.len()).unwrap_or(0);
            let version = config.module.version.as_deref().unwrap_or("unversioned");
            println!(
                "- {id} ({}) v{version}: {screens} screens, {workflows} workflows",
                config.module.name
            );
        }
    }

    let mut registry = LocalizationRegistry::new();
    register_builtin_localizations(&mut registry);
    let info = registry.info();

    println!("\nLocalization coverage ({} handlers)", info.total_handlers);
    for (country, domains) in &info.countries {
        let label = country_name(country).unwrap_or("Unknown");
        println!("- {country} ({label}): {}", domains.join(", "));
    }
    println!("Default domains: {}", info.default_domains.join(", "));

    println!("\nSample payroll previews (gross 5,000 local units)");
    for country in ["IDN", "MYS", "SGP"] {
        let strategy = registry
            .get_or_raise(country, DOMAIN_PAYROLL)?
            .as_payroll()
            .ok_or_else(|| {
                AppError::from(LocalizationError::HandlerNotFound {
                    country: country.to_string(),
                    domain: DOMAIN_PAYROLL.to_string(),
                })
            })?;
        let result = strategy.calculate_salary(Decimal::from(5000), &EmployeeProfile::default())?;
        println!(
            "- {country}: net {} {} ({} deduction lines)",
            currency_for_country(country),
            result.net_pay,
            result.details.len()
        );
    }

    Ok(())
}
