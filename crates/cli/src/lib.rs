pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "borong",
    about = "Borong operator CLI",
    long_about = "Operate Borong runtime readiness, migrations, and offline classification.",
    after_help = "Examples:\n  borong doctor --json\n  borong migrate\n  borong classify --text \"ada tak stok baju?\""
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Validate config and report which capability groups are satisfied")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Run the deterministic fallback classifier and extractors on a message")]
    Classify {
        #[arg(long, help = "Message text to classify")]
        text: String,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Doctor { json } => commands::doctor::run(json),
        Command::Classify { text, json } => commands::classify::run(&text, json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
