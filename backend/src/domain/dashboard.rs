//! Dashboard aggregation.
//!
//! A read-only derived view recomputed from the store on every request; no
//! caching or staleness window.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ports::{
    ApplicationRepository, PaymentRepository, PlotRepository, WorkDayRepository,
};
use crate::domain::{ApiResult, ApplicationStatus, PaymentStatus, PlotStatus, WorkDay};

/// Plot occupancy summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlotStats {
    pub total: usize,
    pub available: usize,
    /// `round((total - available) / total * 100)`, 0 when there are no plots.
    pub percent_assigned: i32,
}

/// Application counts by status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationStats {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    /// New applications are the pending ones.
    pub new: usize,
}

/// The nearest strictly-future work day.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NextWorkDay {
    pub next_date: DateTime<Utc>,
    pub title: String,
    pub signups: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_attendees: Option<i32>,
}

/// Outstanding payment summary (`status != paid`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStats {
    /// Sum in integer cents.
    pub outstanding: i64,
    pub outstanding_count: usize,
}

/// Upcoming work day rendered in the events list.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingEvent {
    pub id: i32,
    pub title: String,
    pub date: DateTime<Utc>,
    pub start_time: String,
    pub end_time: String,
    pub attendees: usize,
}

/// Aggregated dashboard view.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub plots: PlotStats,
    pub applications: ApplicationStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_day: Option<NextWorkDay>,
    pub payments: PaymentStats,
    /// Next three upcoming work days.
    pub events: Vec<UpcomingEvent>,
}

/// Recomputes the dashboard snapshot from current store contents.
#[derive(Clone)]
pub struct DashboardService {
    plots: Arc<dyn PlotRepository>,
    applications: Arc<dyn ApplicationRepository>,
    work_days: Arc<dyn WorkDayRepository>,
    payments: Arc<dyn PaymentRepository>,
    clock: Arc<dyn Clock>,
}

impl DashboardService {
    /// Create the service with its outbound dependencies.
    pub fn new(
        plots: Arc<dyn PlotRepository>,
        applications: Arc<dyn ApplicationRepository>,
        work_days: Arc<dyn WorkDayRepository>,
        payments: Arc<dyn PaymentRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            plots,
            applications,
            work_days,
            payments,
            clock,
        }
    }

    /// Compute a fresh snapshot.
    pub async fn compute(&self) -> ApiResult<DashboardSnapshot> {
        let plots = self.plots.list().await?;
        let total = plots.len();
        let available = plots
            .iter()
            .filter(|plot| plot.status == PlotStatus::Available)
            .count();

        let applications = self.applications.list().await?;
        let pending = applications
            .iter()
            .filter(|a| a.status == ApplicationStatus::Pending)
            .count();
        let approved = applications
            .iter()
            .filter(|a| a.status == ApplicationStatus::Approved)
            .count();

        let now = self.clock.utc();
        let mut upcoming: Vec<WorkDay> = self
            .work_days
            .list()
            .await?
            .into_iter()
            .filter(|wd| wd.date > now)
            .collect();
        upcoming.sort_by_key(|wd| wd.date);

        let work_day = match upcoming.first() {
            Some(next) => {
                let signups = self.work_days.attendances_for(next.id).await?.len();
                Some(NextWorkDay {
                    next_date: next.date,
                    title: next.title.clone(),
                    signups,
                    max_attendees: next.max_attendees,
                })
            }
            None => None,
        };

        let mut events = Vec::with_capacity(3);
        for wd in upcoming.iter().take(3) {
            let attendees = self.work_days.attendances_for(wd.id).await?.len();
            events.push(UpcomingEvent {
                id: wd.id,
                title: wd.title.clone(),
                date: wd.date,
                start_time: wd.start_time.clone(),
                end_time: wd.end_time.clone(),
                attendees,
            });
        }

        let payments = self.payments.list().await?;
        let outstanding_payments: Vec<_> = payments
            .iter()
            .filter(|p| p.status != PaymentStatus::Paid)
            .collect();
        let outstanding = outstanding_payments.iter().map(|p| p.amount).sum();

        Ok(DashboardSnapshot {
            plots: PlotStats {
                total,
                available,
                percent_assigned: percent_assigned(total, available),
            },
            applications: ApplicationStats {
                total: applications.len(),
                pending,
                approved,
                new: pending,
            },
            work_day,
            payments: PaymentStats {
                outstanding,
                outstanding_count: outstanding_payments.len(),
            },
            events,
        })
    }
}

fn percent_assigned(total: usize, available: usize) -> i32 {
    if total == 0 {
        return 0;
    }
    let assigned = (total - available) as f64;
    (assigned / total as f64 * 100.0).round() as i32
}
