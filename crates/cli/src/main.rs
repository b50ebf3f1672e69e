use std::process::ExitCode;

fn main() -> ExitCode {
    designbot_cli::run()
}
