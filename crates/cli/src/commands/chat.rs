use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use designbot_agent::DialogueSession;

use crate::commands::{load_config, CommandResult};
use crate::logging::init_logging;

const BANNER: &str = "DesignBot: tu asistente para muebles personalizados.\n\
    Comandos: :pedido (resumen), :exportar (JSON), :nuevo (reiniciar), :salir";
const PROMPT: &str = "tú> ";

/// Outcome of a chat loop, reported once the input ends or `:salir` is typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatStats {
    pub turns: usize,
    pub completed_orders: usize,
}

pub fn run(config_path: Option<PathBuf>) -> CommandResult {
    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(error) => return CommandResult::config_failure("chat", &error),
    };
    init_logging(&config.logging);

    let mut session = match DialogueSession::from_config(&config) {
        Ok(session) => session,
        Err(error) => {
            return CommandResult::failure("chat", error.error_class(), error.to_string(), 3)
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    match run_with_io(&mut session, stdin.lock(), stdout.lock()) {
        Ok(stats) => CommandResult::success(
            "chat",
            format!(
                "chat ended after {} turns with {} confirmed orders",
                stats.turns, stats.completed_orders
            ),
        ),
        Err(error) => CommandResult::failure("chat", "io", error.to_string(), 1),
    }
}

/// Reads one message per line until EOF or `:salir`. Lines starting with `:`
/// are local commands and never reach the dialogue.
pub fn run_with_io<R, W>(
    session: &mut DialogueSession,
    input: R,
    mut output: W,
) -> io::Result<ChatStats>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "{BANNER}\n")?;
    let mut turns = 0;

    write!(output, "{PROMPT}")?;
    output.flush()?;
    for line in input.lines() {
        let line = line?;
        let message = line.trim();

        match message {
            "" => {}
            ":salir" => break,
            ":pedido" => writeln!(output, "{}\n", session.order().summary())?,
            ":exportar" => {
                let export = serde_json::to_string_pretty(&session.export_order())
                    .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))?;
                writeln!(output, "{export}\n")?;
            }
            ":nuevo" => {
                session.new_session();
                writeln!(output, "Sesión reiniciada.\n")?;
            }
            _ => {
                turns += 1;
                let reply = session.process_message(message);
                writeln!(output, "designbot> {reply}\n")?;
            }
        }

        write!(output, "{PROMPT}")?;
        output.flush()?;
    }

    writeln!(output)?;
    Ok(ChatStats { turns, completed_orders: session.completed_orders().len() })
}
