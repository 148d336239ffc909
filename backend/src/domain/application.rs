//! Plot application entity and its state machine vocabulary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Review state of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

/// Whether the applicant held a plot in a previous season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GardenerType {
    New,
    Returning,
}

/// A gardener's request for a plot, subject to the approval workflow.
///
/// ## Invariants
/// - `status = pending` ⇔ `processed_at` and `processed_by` unset.
/// - `priority` is only meaningfully non-zero for returning gardeners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: i32,
    pub user_id: i32,
    pub status: ApplicationStatus,
    pub gardener_type: GardenerType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_area: Option<String>,
    /// Plot the applicant asked for, honoured at approval time when still
    /// available. A business-logic reference, not a store-enforced link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_plot_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gardening_experience: Option<String>,
    pub priority: i32,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_by: Option<i32>,
    /// Reviewer note; mandatory and populated on rejection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision_note: Option<String>,
}

impl Application {
    /// Whether the processed-fields invariant holds for this record.
    pub fn processing_consistent(&self) -> bool {
        let processed = self.processed_at.is_some() && self.processed_by.is_some();
        match self.status {
            ApplicationStatus::Pending => !processed,
            ApplicationStatus::Approved | ApplicationStatus::Rejected => processed,
        }
    }
}

/// Payload for creating an application.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub user_id: i32,
    pub gardener_type: GardenerType,
    pub preferred_area: Option<String>,
    pub requested_plot_id: Option<i32>,
    pub special_requests: Option<String>,
    pub gardening_experience: Option<String>,
    pub priority: i32,
}

/// Outcome applied when a reviewer processes an application.
#[derive(Debug, Clone)]
pub struct ProcessingOutcome {
    pub status: ApplicationStatus,
    pub processed_by: i32,
    pub processed_at: DateTime<Utc>,
    pub decision_note: Option<String>,
}
