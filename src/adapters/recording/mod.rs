//! Recording adapters that capture interactions to cassettes.

pub mod host;
pub mod tracker;

pub use host::RecordingHost;
pub use tracker::RecordingTracker;

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::warn;

use crate::cassette::recorder::CassetteRecorder;

/// Records a fallible call as `{"Ok": value}` or `{"Err": message}`.
///
/// Mirror of `replaying::replay_result`. A value that cannot be serialized
/// is logged and skipped; recording never changes what the run sees.
pub(crate) fn record_result<I, T, E>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    I: Serialize,
    T: Serialize,
    E: std::fmt::Display,
{
    let output = match result {
        Ok(value) => serde_json::to_value(value).map(|v| serde_json::json!({ "Ok": v })),
        Err(e) => Ok(serde_json::json!({ "Err": e.to_string() })),
    };
    let (input, output) = match (serde_json::to_value(input), output) {
        (Ok(input), Ok(output)) => (input, output),
        (Err(e), _) | (_, Err(e)) => {
            warn!(port, method, error = %e, "Skipping unserializable interaction");
            return;
        }
    };

    match recorder.lock() {
        Ok(mut guard) => guard.record(port, method, input, output),
        Err(_) => warn!(port, method, "Recorder lock poisoned, interaction dropped"),
    }
}
