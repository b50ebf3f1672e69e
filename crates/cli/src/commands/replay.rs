use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use designbot_agent::DialogueSession;
use designbot_core::flows::DialogueState;
use designbot_core::orders::OrderExport;
use serde::Serialize;

use crate::commands::{load_config, CommandResult};
use crate::logging::init_logging;

#[derive(Debug, Serialize)]
pub struct ReplayTurn {
    pub message: String,
    pub reply: String,
    pub state: DialogueState,
}

#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub turns: Vec<ReplayTurn>,
    pub order: OrderExport,
    pub completed_orders: Vec<OrderExport>,
}

/// Feeds a transcript through a fresh session. Blank lines and lines starting
/// with `#` are skipped.
pub fn replay_transcript(session: &mut DialogueSession, transcript: &str) -> ReplayReport {
    let turns = transcript
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|message| {
            let reply = session.process_message(message);
            ReplayTurn { message: message.to_string(), reply, state: session.state() }
        })
        .collect();

    ReplayReport {
        turns,
        order: session.export_order(),
        completed_orders: session.completed_orders().to_vec(),
    }
}

fn read_transcript(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("could not read transcript `{}`", path.display()))
}

pub fn run(transcript_path: &Path, config_path: Option<PathBuf>) -> CommandResult {
    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(error) => return CommandResult::config_failure("replay", &error),
    };
    init_logging(&config.logging);

    let transcript = match read_transcript(transcript_path) {
        Ok(transcript) => transcript,
        Err(error) => {
            return CommandResult::failure("replay", "transcript_unreadable", format!("{error:#}"), 1)
        }
    };

    let mut session = match DialogueSession::from_config(&config) {
        Ok(session) => session,
        Err(error) => {
            return CommandResult::failure("replay", error.error_class(), error.to_string(), 3)
        }
    };

    let report = replay_transcript(&mut session, &transcript);
    CommandResult::success_with_data(
        "replay",
        format!("replayed {} messages", report.turns.len()),
        Some(report),
    )
}
