//! Plot fee payment entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Settlement state of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Overdue,
}

/// A fee owed by one user for one plot.
///
/// ## Invariants
/// - `paid_date` set ⇔ `status = paid`.
/// - `amount` is integer cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: i32,
    pub user_id: i32,
    pub plot_id: i32,
    pub amount: i64,
    pub status: PaymentStatus,
    pub due_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Payment {
    /// Whether the paid-date invariant holds for this record.
    pub fn settlement_consistent(&self) -> bool {
        (self.status == PaymentStatus::Paid) == self.paid_date.is_some()
    }
}

/// Payload for creating a payment.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub user_id: i32,
    pub plot_id: i32,
    pub amount: i64,
    pub status: PaymentStatus,
    pub due_date: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Shallow-merge patch for payment updates; absent fields are untouched.
#[derive(Debug, Clone, Default)]
pub struct PaymentPatch {
    pub status: Option<PaymentStatus>,
    pub paid_date: Option<Option<DateTime<Utc>>>,
    pub notes: Option<Option<String>>,
}
