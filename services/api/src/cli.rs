use crate::demo::{run_demo, run_payroll_preview, DemoArgs, PayrollPreviewArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use meridian::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Meridian Module Service",
    about = "Run the Meridian module registry and localization service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Country payroll utilities
    Payroll {
        #[command(subcommand)]
        command: PayrollCommand,
    },
    /// Scan a modules directory and print a registry summary
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum PayrollCommand {
    /// Calculate a salary breakdown for one country and gross amount
    Preview(PayrollPreviewArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured modules directory
    #[arg(long)]
    pub(crate) modules_dir: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Payroll {
            command: PayrollCommand::Preview(args),
        } => run_payroll_preview(args),
        Command::Demo(args) => run_demo(args),
    }
}
