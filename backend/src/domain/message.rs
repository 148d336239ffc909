//! Direct and global member messaging.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A message from one member to another, or a global announcement.
///
/// ## Invariants
/// - Exactly one of {`recipient_id` set, `is_global`} holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i32,
    pub sender_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<i32>,
    pub is_global: bool,
    pub subject: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
}

impl Message {
    /// Whether the addressing invariant holds for this record.
    pub fn addressing_consistent(&self) -> bool {
        self.recipient_id.is_some() != self.is_global
    }
}

/// Payload for sending a message.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub sender_id: i32,
    pub recipient_id: Option<i32>,
    pub is_global: bool,
    pub subject: String,
    pub content: String,
}
