pub mod commands;
pub mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "designbot",
    about = "DesignBot furniture ordering assistant",
    long_about = "Chat with the furniture ordering assistant, replay transcripts, and inspect the catalog and configuration.",
    after_help = "Examples:\n  designbot chat\n  designbot replay conversacion.txt\n  designbot catalog"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a designbot.toml configuration file")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Start an interactive chat session on stdin/stdout")]
    Chat,
    #[command(about = "Replay a transcript (one message per line) and print every turn as JSON")]
    Replay {
        #[arg(help = "Transcript file")]
        path: PathBuf,
    },
    #[command(about = "Print the effective price catalog as JSON")]
    Catalog,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Chat => commands::chat::run(cli.config),
        Command::Replay { path } => commands::replay::run(&path, cli.config),
        Command::Catalog => commands::catalog::run(cli.config),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run(cli.config) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
