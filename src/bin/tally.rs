use clap::{Parser, Subcommand};
use log::error;
use tally::report::{self, TrialBalanceKind};
use tally::Ledger;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");

#[derive(Debug, Parser)]
#[command(
    name = "tally",
    about = "Checks and reports on plain-text double-entry ledgers.",
    version = VERSION,
    author = AUTHOR,
)]
struct Cli {
    #[arg(short, required = true)]
    input: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Closing balance of every account
    Balances,
    /// Trial balance, one of o, c, oc, otc
    Tb {
        #[arg(default_value = "otc")]
        kind: TrialBalanceKind,
    },
    /// Debit and credit totals per month
    Months,
}

fn main() {
    pretty_env_logger::init();
    let args = Cli::parse();
    let ledger = match Ledger::from_file(&args.input) {
        Ok(ledger) => ledger,
        Err(e) => {
            error!("Failed to check {}", args.input);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    let output = match args.command {
        Commands::Balances => report::balances(&ledger),
        Commands::Tb { kind } => report::trial_balance(&ledger, kind),
        Commands::Months => report::monthly_transactions(&ledger),
    };
    print!("{}", output);
}
