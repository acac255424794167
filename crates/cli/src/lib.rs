pub mod commands;
pub mod console;
pub mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "clichat",
    about = "Terminal customer-service chat simulator",
    long_about = "Chat with a reasoning-engine-backed support agent that can look up and return orders.",
    after_help = "Examples:\n  clichat chat\n  clichat chat --model gpt-3.5-turbo --log-level debug\n  clichat config\n  clichat catalog"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Start an interactive conversation on stdin/stdout")]
    Chat {
        #[arg(long, help = "Path to a clichat.toml config file")]
        config: Option<PathBuf>,
        #[arg(long, help = "Completion model identifier, passed through verbatim")]
        model: Option<String>,
        #[arg(long, help = "Log level written to the log file (trace|debug|info|warn|error)")]
        log_level: Option<String>,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config {
        #[arg(long, help = "Path to a clichat.toml config file")]
        config: Option<PathBuf>,
    },
    #[command(about = "Print the action catalog and the prompt for an empty conversation")]
    Catalog,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Chat { config, model, log_level } => {
            commands::chat::run(commands::chat::ChatArgs { config, model, log_level })
        }
        Command::Config { config } => commands::config::run(config.as_deref()),
        Command::Catalog => commands::CommandResult::report(commands::catalog::run()),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
