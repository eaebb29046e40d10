//! Serves recorded interactions back in order.

use std::collections::{HashMap, VecDeque};

use super::{Cassette, Interaction};

/// Hands out a cassette's interactions one at a time per port and method.
#[derive(Debug, Default)]
pub struct CassetteReplayer {
    queues: HashMap<(String, String), VecDeque<Interaction>>,
}

impl CassetteReplayer {
    /// Creates a replayer over every interaction in `cassette`.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<(String, String), VecDeque<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction.clone());
        }
        Self { queues }
    }

    /// Takes the next recorded output for `port::method`.
    ///
    /// # Errors
    ///
    /// Returns an error naming what was asked for when the cassette has no
    /// (more) interactions for it. A replayed run must make exactly the calls
    /// that were recorded.
    pub fn next_output(&mut self, port: &str, method: &str) -> Result<serde_json::Value, String> {
        let key = (port.to_string(), method.to_string());
        match self.queues.get_mut(&key).and_then(VecDeque::pop_front) {
            Some(interaction) => Ok(interaction.output),
            None => {
                let mut remaining: Vec<String> = self
                    .queues
                    .iter()
                    .filter(|(_, queue)| !queue.is_empty())
                    .map(|((port, method), queue)| format!("{port}::{method} x{}", queue.len()))
                    .collect();
                remaining.sort();
                Err(format!(
                    "Cassette exhausted: no interaction left for {port}::{method}. \
                     Remaining: [{}]",
                    remaining.join(", ")
                ))
            }
        }
    }

    /// Number of interactions not yet served.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn interaction(seq: u64, port: &str, method: &str, output: serde_json::Value) -> Interaction {
        Interaction { seq, port: port.into(), method: method.into(), input: json!({}), output }
    }

    fn cassette(interactions: Vec<Interaction>) -> Cassette {
        Cassette { name: "test".into(), recorded_at: Utc::now(), commit: "abc".into(), interactions }
    }

    #[test]
    fn serves_each_method_in_recorded_order() {
        let mut replayer = CassetteReplayer::new(&cassette(vec![
            interaction(0, "tracker", "lookup", json!({"Ok": {"status": 200, "body": ""}})),
            interaction(1, "host", "event", json!({"Ok": {}})),
            interaction(2, "tracker", "lookup", json!({"Ok": {"status": 404, "body": ""}})),
        ]));

        assert_eq!(
            replayer.next_output("tracker", "lookup").unwrap()["Ok"]["status"],
            json!(200)
        );
        assert_eq!(
            replayer.next_output("tracker", "lookup").unwrap()["Ok"]["status"],
            json!(404)
        );
        assert_eq!(replayer.remaining(), 1);
        assert!(replayer.next_output("host", "event").is_ok());
        assert_eq!(replayer.remaining(), 0);
    }

    #[test]
    fn exhausted_method_is_an_error() {
        let mut replayer = CassetteReplayer::new(&cassette(vec![
            interaction(0, "host", "event", json!({"Ok": {}})),
            interaction(1, "tracker", "lookup", json!({"Ok": {}})),
        ]));
        replayer.next_output("host", "event").unwrap();

        let err = replayer.next_output("host", "event").unwrap_err();
        assert!(err.contains("Cassette exhausted"));
        assert!(err.contains("tracker::lookup x1"));
    }

    #[test]
    fn unknown_method_is_an_error() {
        let mut replayer = CassetteReplayer::new(&cassette(vec![]));
        assert!(replayer.next_output("host", "post_comment").is_err());
    }
}
