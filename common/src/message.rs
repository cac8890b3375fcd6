use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned message identifier. Monotonic, never reused.
pub type MessageId = u64;

/// A chat message as it travels between the store and clients.
///
/// Field names on the wire (`user`, `message`, `timestamp`) match the
/// browser client the HTTP routes were first written for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    #[serde(rename = "user")]
    pub author: String,
    #[serde(rename = "message")]
    pub body: String,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
}
