//! Garden plot entity.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Occupancy state of a plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlotStatus {
    Available,
    Assigned,
    Paid,
    Unavailable,
}

/// A garden bed unit assignable to one gardener.
///
/// ## Invariants
/// - `assigned_to` set ⇔ `status` ∈ {`assigned`, `paid`}.
/// - `plot_number` unique across all plots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Plot {
    pub id: i32,
    pub plot_number: String,
    pub status: PlotStatus,
    pub area: String,
    pub size: String,
    /// Yearly fee in integer cents.
    pub yearly_fee: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<i32>,
}

impl Plot {
    /// Whether the assignment invariant holds for this record.
    pub fn assignment_consistent(&self) -> bool {
        match self.assigned_to {
            Some(_) => matches!(self.status, PlotStatus::Assigned | PlotStatus::Paid),
            None => matches!(self.status, PlotStatus::Available | PlotStatus::Unavailable),
        }
    }
}

/// Payload for creating a plot.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewPlot {
    pub plot_number: String,
    #[serde(default = "default_status")]
    pub status: PlotStatus,
    pub area: String,
    pub size: String,
    pub yearly_fee: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_status() -> PlotStatus {
    PlotStatus::Available
}

/// Shallow-merge patch for plot updates; absent fields are untouched.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlotPatch {
    pub status: Option<PlotStatus>,
    pub area: Option<String>,
    pub size: Option<String>,
    pub yearly_fee: Option<i64>,
    /// Double-optional: `Some(None)` clears the notes, absent leaves them.
    #[serde(default, with = "crate::domain::double_option")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
    #[serde(default, with = "crate::domain::double_option")]
    #[schema(value_type = Option<i32>)]
    pub assigned_to: Option<Option<i32>>,
}
