use crate::server;
use crate::view::{run_defaults, run_export, run_report, DefaultsArgs, ExportArgs, ReportArgs};
use asso_portal::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Association Portal",
    about = "Run the association portal treasury backend or inspect a ledger from the command line",
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
    /// Treasury rules, reports and ledger exports
    Treasury {
        #[command(subcommand)]
        command: TreasuryCommand,
    },
}

#[derive(Subcommand, Debug)]
enum TreasuryCommand {
    /// Show the form pre-fill for a transaction type
    Defaults(DefaultsArgs),
    /// Render the treasury page for a role from a ledger CSV
    Report(ReportArgs),
    /// Validate a ledger CSV and re-emit it normalised on stdout
    Export(ExportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Treasury { command } => match command {
            TreasuryCommand::Defaults(args) => run_defaults(args),
            TreasuryCommand::Report(args) => run_report(args),
            TreasuryCommand::Export(args) => run_export(args),
        },
    }
}
