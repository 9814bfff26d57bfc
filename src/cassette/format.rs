//! Cassette data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded call on a port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Position in the cassette, assigned by the recorder.
    pub seq: u64,
    /// Port name (`"fs"`, `"process"`, `"clock"`).
    pub port: String,
    /// Method name invoked on the port.
    pub method: String,
    /// Arguments passed to the method.
    pub input: serde_json::Value,
    /// Value returned by the method.
    pub output: serde_json::Value,
}

/// A named, ordered list of interactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name for this cassette.
    pub name: String,
    /// When this cassette was recorded.
    pub recorded_at: DateTime<Utc>,
    /// `tubuild` version that produced the recording.
    pub tool_version: String,
    /// Ordered list of interactions.
    pub interactions: Vec<Interaction>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_hand_written_cassette() {
        let yaml = r#"
name: scenario-c
recorded_at: 2025-03-15T14:30:00Z
tool_version: 0.1.0
interactions:
  - seq: 0
    port: fs
    method: exists
    input: { path: /work/intermediate/a.d }
    output: true
"#;
        let cassette: Cassette = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(cassette.name, "scenario-c");
        assert_eq!(cassette.interactions.len(), 1);
        assert_eq!(cassette.interactions[0].method, "exists");
        assert_eq!(cassette.interactions[0].output, json!(true));
    }
}
