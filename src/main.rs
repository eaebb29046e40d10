//! Binary entrypoint for the `ticketlink` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // Recording is handled in commands::check via TICKETLINK_RECORD=<dir>.
    match ticketlink::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
