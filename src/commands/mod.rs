//! Command dispatch and handlers.

pub mod check;
pub mod extract;

use crate::cli::Command;

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    match command {
        Command::Check(args) => check::run(args),
        Command::Extract { regex, flags, delimiter, text } => {
            extract::run(regex, flags, delimiter.as_deref(), text)
        }
    }
}
