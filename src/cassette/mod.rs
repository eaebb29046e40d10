//! YAML cassettes of host and tracker interactions.
//!
//! A recording run writes one cassette per port; a replaying run serves the
//! ports from cassettes instead of the network.

pub mod config;
pub mod recorder;
pub mod replayer;
pub mod session;

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One call made to a port and what it returned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Position in the recording, starting at 0.
    pub seq: u64,
    /// Port name (`host` or `tracker`).
    pub port: String,
    /// Method called on the port.
    pub method: String,
    /// Arguments of the call.
    pub input: serde_json::Value,
    /// Return value, `{"Ok": ..}` or `{"Err": ".."}` for fallible calls.
    pub output: serde_json::Value,
}

/// A recorded sequence of interactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name.
    pub name: String,
    /// Recording time.
    pub recorded_at: DateTime<Utc>,
    /// Commit the run was checking.
    pub commit: String,
    /// Interactions in call order.
    pub interactions: Vec<Interaction>,
}

impl Cassette {
    /// Reads a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a cassette.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette {}: {e}", path.display()))?;
        serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette {}: {e}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn load_reads_written_yaml() {
        let dir = std::env::temp_dir().join("ticketlink_cassette_load");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("run.cassette.yaml");
        let cassette = Cassette {
            name: "run".into(),
            recorded_at: Utc::now(),
            commit: "abc123".into(),
            interactions: vec![Interaction {
                seq: 0,
                port: "tracker".into(),
                method: "lookup".into(),
                input: json!({"ticket": "ABC-1"}),
                output: json!({"Ok": {"status": 200, "body": "{}"}}),
            }],
        };
        std::fs::write(&path, serde_yaml::to_string(&cassette).unwrap()).unwrap();

        assert_eq!(Cassette::load(&path).unwrap(), cassette);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Cassette::load(Path::new("/nonexistent/ticketlink.cassette.yaml")).unwrap_err();
        assert!(err.contains("Failed to read cassette"));
    }
}
