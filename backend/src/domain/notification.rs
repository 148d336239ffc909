//! Notification inbox entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// What a notification is about; drives the email copy appended to the
/// message body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Event,
    WorkDay,
    Payment,
    Weather,
    Maintenance,
    Application,
}

/// Urgency of a notification; `high` and `urgent` additionally trigger a
/// best-effort email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl NotificationPriority {
    /// True when this priority warrants an email attempt.
    pub fn warrants_email(self) -> bool {
        matches!(self, Self::High | Self::Urgent)
    }
}

/// Read state of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    Unread,
    Read,
    Archived,
}

/// A user-facing or global alert record, separate from email delivery.
///
/// ## Invariants
/// - `user_id` unset ⇔ `is_global` (global notifications are visible to all).
/// - `read_at` set ⇔ `status ≠ unread`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i32,
    pub title: String,
    pub message: String,
    /// Serialised as `type` on the wire.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub priority: NotificationPriority,
    pub status: NotificationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i32>,
    pub is_global: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_entity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_entity_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_link: Option<String>,
}

impl Notification {
    /// Whether the addressing and read-state invariants hold.
    pub fn consistent(&self) -> bool {
        let addressing = self.user_id.is_none() == self.is_global;
        let read_state = (self.status == NotificationStatus::Unread) == self.read_at.is_none();
        addressing && read_state
    }
}

/// Payload for creating a notification record.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub priority: NotificationPriority,
    pub user_id: Option<i32>,
    pub is_global: bool,
    pub related_entity_type: Option<String>,
    pub related_entity_id: Option<i32>,
    pub expires_at: Option<DateTime<Utc>>,
    pub action_link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(NotificationPriority::Low, false)]
    #[case(NotificationPriority::Medium, false)]
    #[case(NotificationPriority::High, true)]
    #[case(NotificationPriority::Urgent, true)]
    fn only_high_and_urgent_warrant_email(
        #[case] priority: NotificationPriority,
        #[case] expected: bool,
    ) {
        assert_eq!(priority.warrants_email(), expected);
    }

    #[test]
    fn global_notifications_have_no_user() {
        let notification = Notification {
            id: 1,
            title: "t".into(),
            message: "m".into(),
            kind: NotificationKind::WorkDay,
            priority: NotificationPriority::Medium,
            status: NotificationStatus::Unread,
            user_id: None,
            is_global: true,
            related_entity_type: None,
            related_entity_id: None,
            expires_at: None,
            created_at: Utc::now(),
            read_at: None,
            action_link: None,
        };
        assert!(notification.consistent());
        let contradictory = Notification {
            user_id: Some(4),
            ..notification
        };
        assert!(!contradictory.consistent());
    }
}
