//! ovh_api CLI
//!
//! Runs the ovh_api module from the command line or as an Ansible module.
//! Results go to stdout as JSON; logs go to stderr.

use clap::{Parser, Subcommand};
use ovhapi_core::logging_facility::{self, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "ovhapi")]
#[command(about = "ovh_api - OVH API calls with change detection", long_about = None)]
struct Cli {
    /// Logging profile: development, production or test
    #[arg(long, global = true, env = "OVHAPI_LOG", default_value = "production")]
    log: Profile,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run as an Ansible module reading a JSON arguments file
    Module(commands::module::ModuleArgs),
    /// Run one call described by flags
    Call(commands::call::CallArgs),
    /// Compare two JSON snapshots offline
    Compare(commands::compare::CompareArgs),
}

fn main() {
    // A missing .env file is not an error
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    logging_facility::init(cli.log);

    let result = match cli.command {
        Commands::Module(args) => commands::module::execute(args),
        Commands::Call(args) => commands::call::execute(args),
        Commands::Compare(args) => commands::compare::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
