//! Task identifier generation
//!
//! Two styles:
//! - `timestamp`: Unix time in milliseconds (e.g., `1718000000000`)
//! - `hash`: 7 hex chars derived from text + creation time (e.g., `7f2b4c1`)
//!
//! When several tasks are created at once, the i-th id is offset by `i`
//! (milliseconds or nanoseconds) so a batch never collides with itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How new task identifiers are generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStyle {
    #[default]
    Timestamp,
    Hash,
}

impl IdStyle {
    pub fn as_str(&self) -> &str {
        match self {
            IdStyle::Timestamp => "timestamp",
            IdStyle::Hash => "hash",
        }
    }
}

/// Generates a 7-character hash from text and timestamp
fn generate_hash(text: &str, nanos: i64) -> String {
    let input = format!("{}{}", text, nanos);
    let hash = blake3::hash(input.as_bytes());
    hash.to_hex()[..7].to_string()
}

/// Generates identifiers for a batch of new tasks
#[derive(Debug, Clone)]
pub struct IdGenerator {
    style: IdStyle,
    now: DateTime<Utc>,
}

impl IdGenerator {
    pub fn new(style: IdStyle, now: DateTime<Utc>) -> Self {
        Self { style, now }
    }

    /// Returns the identifier for the `index`-th task of the batch
    pub fn id_for(&self, index: usize, text: &str) -> String {
        let offset = index as i64;
        match self.style {
            IdStyle::Timestamp => (self.now.timestamp_millis() + offset).to_string(),
            IdStyle::Hash => {
                let nanos = self.now.timestamp_nanos_opt().unwrap_or(0) + offset;
                generate_hash(text, nanos)
            }
        }
    }

    /// Returns one identifier per text, in order
    pub fn ids_for<S: AsRef<str>>(&self, texts: &[S]) -> Vec<String> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| self.id_for(i, text.as_ref()))
            .collect()
    }
}
