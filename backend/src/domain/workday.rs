//! Work day scheduling entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A scheduled volunteer event gardeners can sign up to attend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkDay {
    pub id: i32,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    /// Display times as entered by the organiser, e.g. "9:00 AM".
    pub start_time: String,
    pub end_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_attendees: Option<i32>,
    pub created_by: i32,
}

/// Payload for scheduling a work day.
#[derive(Debug, Clone)]
pub struct NewWorkDay {
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub start_time: String,
    pub end_time: String,
    pub max_attendees: Option<i32>,
    pub created_by: i32,
}

/// Participation state of one user at one work day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    SignedUp,
    Attended,
    Missed,
}

/// A user's sign-up record for a work day.
///
/// The workflow enforces at most one record per (work day, user) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkDayAttendance {
    pub id: i32,
    pub work_day_id: i32,
    pub user_id: i32,
    pub status: AttendanceStatus,
}
