//! Collects interactions and writes them out as a cassette.

use std::path::PathBuf;

use chrono::Utc;

use super::{Cassette, Interaction};

/// Accumulates interactions for one cassette file.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    name: String,
    commit: String,
    interactions: Vec<Interaction>,
}

impl CassetteRecorder {
    /// Creates a recorder that will write to `path`.
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        commit: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            commit: commit.into(),
            interactions: Vec::new(),
        }
    }

    /// Appends an interaction; its sequence number is its position.
    pub fn record(
        &mut self,
        port: impl Into<String>,
        method: impl Into<String>,
        input: serde_json::Value,
        output: serde_json::Value,
    ) {
        self.interactions.push(Interaction {
            seq: self.interactions.len() as u64,
            port: port.into(),
            method: method.into(),
            input,
            output,
        });
    }

    /// Number of interactions recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    /// Writes the cassette and returns its path.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML cannot be produced or the file cannot be written.
    pub fn finish(self) -> Result<PathBuf, std::io::Error> {
        let cassette = Cassette {
            name: self.name,
            recorded_at: Utc::now(),
            commit: self.commit,
            interactions: self.interactions,
        };
        let yaml = serde_yaml::to_string(&cassette).map_err(std::io::Error::other)?;
        std::fs::write(&self.path, yaml)?;
        Ok(self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_interactions_and_writes_yaml() {
        let dir = std::env::temp_dir().join("ticketlink_recorder_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("host.cassette.yaml");

        let mut recorder = CassetteRecorder::new(&path, "pr-42-host", "deadbeef");
        assert!(recorder.is_empty());
        recorder.record("host", "event", json!({}), json!({"Ok": {"title": "t"}}));
        recorder.record("host", "update_body", json!({"body": "b"}), json!({"Ok": null}));
        assert_eq!(recorder.len(), 2);

        let written = recorder.finish().unwrap();
        assert_eq!(written, path);

        let cassette = Cassette::load(&path).unwrap();
        assert_eq!(cassette.name, "pr-42-host");
        assert_eq!(cassette.commit, "deadbeef");
        let seqs: Vec<u64> = cassette.interactions.iter().map(|i| i.seq).collect();
        assert_eq!(seqs, vec![0, 1]);
        assert_eq!(cassette.interactions[1].method, "update_body");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
