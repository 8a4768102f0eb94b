use std::process::ExitCode;

use relcut::ui::output;

fn main() -> ExitCode {
    match relcut::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // {:#} prints the whole context chain on one line.
            output::error(format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}
