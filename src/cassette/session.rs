//! A recording run: one recorder per port under a timestamped directory.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::warn;

use super::config::{HOST_CASSETTE, TRACKER_CASSETTE};
use super::recorder::CassetteRecorder;

/// Recorders shared with the recording adapters for the length of a run.
pub struct RecordingSession {
    /// Recorder for host interactions.
    pub host: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for tracker interactions.
    pub tracker: Arc<Mutex<CassetteRecorder>>,
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Starts a session writing to `<root>/<timestamp>/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory already exists or cannot be created.
    pub fn new(root: PathBuf) -> Result<Self, String> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let output_dir = root.join(&timestamp);

        if output_dir.exists() {
            return Err(format!("Cassette directory already exists: {}", output_dir.display()));
        }
        std::fs::create_dir_all(&output_dir)
            .map_err(|e| format!("Failed to create cassette directory: {e}"))?;

        let commit = commit_hash();
        let recorder = |file: &str, port: &str| {
            Arc::new(Mutex::new(CassetteRecorder::new(
                output_dir.join(file),
                format!("{timestamp}-{port}"),
                commit.clone(),
            )))
        };

        Ok(Self {
            host: recorder(HOST_CASSETTE, "host"),
            tracker: recorder(TRACKER_CASSETTE, "tracker"),
            output_dir,
        })
    }

    /// Directory the cassettes are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes both cassettes. Every recording adapter must be dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if a recorder is still shared or a file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        fn write(recorder: Arc<Mutex<CassetteRecorder>>, port: &str) -> Result<(), String> {
            let recorder = Arc::try_unwrap(recorder)
                .map_err(|_| format!("Recording adapter for {port} is still alive"))?
                .into_inner()
                .map_err(|e| format!("Recorder lock for {port} poisoned: {e}"))?;
            recorder.finish().map_err(|e| format!("Failed to write {port} cassette: {e}"))?;
            Ok(())
        }

        write(self.host, "host")?;
        write(self.tracker, "tracker")?;
        Ok(self.output_dir)
    }
}

/// Commit under check: `GITHUB_SHA` on a runner, else the local HEAD.
fn commit_hash() -> String {
    if let Ok(sha) = std::env::var("GITHUB_SHA") {
        if !sha.is_empty() {
            return sha;
        }
    }
    let head = std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string());

    head.unwrap_or_else(|| {
        warn!("Could not determine commit hash, recording 'unknown'");
        "unknown".to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::config::load_replayers;

    #[test]
    fn finish_writes_both_port_cassettes() {
        let root = std::env::temp_dir().join("ticketlink_session_test");
        let _ = std::fs::remove_dir_all(&root);

        let session = RecordingSession::new(root.clone()).unwrap();
        assert!(session.output_dir().exists());
        session.host.lock().unwrap().record(
            "host",
            "event",
            serde_json::json!({}),
            serde_json::json!({"Ok": {"title": "t", "body": "", "branch": "b"}}),
        );

        let dir = session.finish().unwrap();
        assert!(dir.join(HOST_CASSETTE).exists());
        assert!(dir.join(TRACKER_CASSETTE).exists());
        let mut replayers = load_replayers(&dir).unwrap();
        assert!(replayers.host.next_output("host", "event").is_ok());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn finish_fails_while_adapter_holds_recorder() {
        let root = std::env::temp_dir().join("ticketlink_session_shared");
        let _ = std::fs::remove_dir_all(&root);

        let session = RecordingSession::new(root.clone()).unwrap();
        let held = Arc::clone(&session.tracker);
        let err = session.finish().unwrap_err();
        assert!(err.contains("tracker"));
        drop(held);

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn commit_hash_is_never_empty() {
        assert!(!commit_hash().is_empty());
    }
}
