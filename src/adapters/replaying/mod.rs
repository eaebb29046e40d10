//! Replaying adapters that serve recorded interactions.

pub mod host;
pub mod tracker;

pub use host::ReplayingHost;
pub use tracker::ReplayingTracker;

use std::sync::Mutex;

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;
use crate::ports::PortError;

/// Replays the next recorded `{"Ok": ..}` / `{"Err": ..}` output for `port::method`.
///
/// Mirror of `recording::record_result`. An exhausted cassette or a
/// malformed entry surfaces as an error from the port.
pub(crate) fn replay_result<T: DeserializeOwned>(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> Result<T, PortError> {
    let output = replayer
        .lock()
        .map_err(|_| format!("Replayer lock for {port} poisoned"))?
        .next_output(port, method)?;

    if let Some(message) = output.get("Err") {
        let message = message.as_str().map_or_else(|| message.to_string(), str::to_string);
        return Err(message.into());
    }
    let value = output
        .get("Ok")
        .cloned()
        .ok_or_else(|| format!("Recorded {port}::{method} output has neither Ok nor Err"))?;
    serde_json::from_value(value).map_err(|e| format!("Bad recorded {port}::{method} output: {e}").into())
}
