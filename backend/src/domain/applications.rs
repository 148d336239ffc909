//! Application workflow: submission, priority scoring, approval, rejection,
//! and revocation.
//!
//! The state machine is `pending → approved` or `pending → rejected`, with
//! a manager-only revoke collapsing an approval back into `rejected` (the
//! observed contract of the system this replaces). Approval binds a plot,
//! derives the yearly-fee payment, and fans out exactly one notification.
//!
//! All role gates run in the HTTP adapter before these operations; the
//! service receives the already-authorised actor for audit fields.

use std::sync::Arc;

use chrono::Duration;
use mockable::Clock;

use crate::domain::ports::{
    ApplicationRepository, PaymentRepository, PlotRepository, UserRepository,
};
use crate::domain::{
    ApiResult, Application, ApplicationStatus, Error, GardenEvent, GardenerType, NewApplication,
    NewPayment, NotificationService, PaymentStatus, Plot, PlotStatus, ProcessingOutcome, User,
};

/// Days between approval and the derived payment's due date.
const PAYMENT_TERM_DAYS: i64 = 30;

/// Priority floor for returning gardeners; new gardeners stay at zero.
const RETURNING_PRIORITY_BASE: i32 = 5;
/// Cap on the seniority bonus so priorities stay within the 5–10 band.
const RETURNING_PRIORITY_BONUS_CAP: usize = 5;

/// Input for submitting an application.
#[derive(Debug, Clone)]
pub struct SubmitApplication {
    pub gardener_type: GardenerType,
    pub preferred_area: Option<String>,
    pub requested_plot_id: Option<i32>,
    pub special_requests: Option<String>,
    pub gardening_experience: Option<String>,
}

/// Orchestrates the application/plot-assignment workflow.
#[derive(Clone)]
pub struct ApplicationService {
    applications: Arc<dyn ApplicationRepository>,
    plots: Arc<dyn PlotRepository>,
    payments: Arc<dyn PaymentRepository>,
    users: Arc<dyn UserRepository>,
    notifier: Arc<NotificationService>,
    clock: Arc<dyn Clock>,
}

impl ApplicationService {
    /// Create the service with its outbound dependencies.
    pub fn new(
        applications: Arc<dyn ApplicationRepository>,
        plots: Arc<dyn PlotRepository>,
        payments: Arc<dyn PaymentRepository>,
        users: Arc<dyn UserRepository>,
        notifier: Arc<NotificationService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            applications,
            plots,
            payments,
            users,
            notifier,
            clock,
        }
    }

    /// Submit a new application for the acting user.
    ///
    /// Returning gardeners receive a deterministic priority in the 5–10
    /// band, `5 + min(previous applications, 5)`, so repeat members win
    /// tie-breaks reproducibly. New gardeners keep priority 0.
    pub async fn submit(
        &self,
        actor: &User,
        input: SubmitApplication,
    ) -> ApiResult<Application> {
        let priority = match input.gardener_type {
            GardenerType::New => 0,
            GardenerType::Returning => {
                let previous = self.applications.count_for_user(actor.id).await?;
                RETURNING_PRIORITY_BASE + previous.min(RETURNING_PRIORITY_BONUS_CAP) as i32
            }
        };

        Ok(self
            .applications
            .create(NewApplication {
                user_id: actor.id,
                gardener_type: input.gardener_type,
                preferred_area: input.preferred_area,
                requested_plot_id: input.requested_plot_id,
                special_requests: input.special_requests,
                gardening_experience: input.gardening_experience,
                priority,
            })
            .await?)
    }

    /// Applications visible to the actor: everything for committee and
    /// managers, otherwise only their own.
    pub async fn list_for(&self, actor: &User) -> ApiResult<Vec<Application>> {
        if actor.role.is_committee_or_manager() {
            Ok(self.applications.list().await?)
        } else {
            Ok(self.applications.list_for_user(actor.id).await?)
        }
    }

    /// Fetch one application, enforcing owner-or-elevated visibility.
    pub async fn get_for(&self, actor: &User, id: i32) -> ApiResult<Application> {
        let application = self
            .applications
            .find(id)
            .await?
            .ok_or_else(|| Error::not_found("application not found"))?;
        if application.user_id != actor.id && !actor.role.is_committee_or_manager() {
            return Err(Error::forbidden("not your application"));
        }
        Ok(application)
    }

    /// Approve a pending application, binding a plot and deriving the
    /// yearly-fee payment.
    ///
    /// Plot selection honours the applicant's requested plot when it is
    /// still available, then falls back to the first available plot by
    /// ascending plot number. Fails with a conflict when no plot can be
    /// bound, leaving the application and every plot untouched.
    pub async fn approve(&self, actor: &User, id: i32, note: Option<String>) -> ApiResult<Application> {
        let application = self
            .applications
            .find(id)
            .await?
            .ok_or_else(|| Error::not_found("application not found"))?;
        if application.status != ApplicationStatus::Pending {
            return Err(Error::invalid_transition(
                "only pending applications can be approved",
            ));
        }

        let plot = self.claim_plot(&application).await?;

        let outcome = ProcessingOutcome {
            status: ApplicationStatus::Approved,
            processed_by: actor.id,
            processed_at: self.clock.utc(),
            decision_note: note,
        };
        let Some(approved) = self
            .applications
            .process_if(id, ApplicationStatus::Pending, outcome)
            .await?
        else {
            // Lost a race with another reviewer: give the plot back and
            // report the stale transition.
            self.plots
                .release_if_held_by(plot.id, application.user_id)
                .await?;
            return Err(Error::invalid_transition(
                "application was processed concurrently",
            ));
        };

        self.payments
            .create(NewPayment {
                user_id: approved.user_id,
                plot_id: plot.id,
                amount: plot.yearly_fee,
                status: PaymentStatus::Pending,
                due_date: self.clock.utc() + Duration::days(PAYMENT_TERM_DAYS),
                notes: Some(format!("Yearly fee for plot {}", plot.plot_number)),
            })
            .await?;

        let applicant = self
            .users
            .find(approved.user_id)
            .await?
            .ok_or_else(|| Error::internal("applicant record missing"))?;
        self.notifier
            .publish(GardenEvent::ApplicationApproved {
                application: approved.clone(),
                plot,
                applicant,
            })
            .await?;

        Ok(approved)
    }

    /// Reject a pending application with a mandatory reason.
    pub async fn reject(&self, actor: &User, id: i32, reason: &str) -> ApiResult<Application> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(Error::invalid_request("rejection requires a reason")
                .with_details(serde_json::json!({
                    "field": "note",
                    "code": "missing_field",
                })));
        }

        let application = self
            .applications
            .find(id)
            .await?
            .ok_or_else(|| Error::not_found("application not found"))?;
        if application.status != ApplicationStatus::Pending {
            return Err(Error::invalid_transition(
                "only pending applications can be rejected",
            ));
        }

        let outcome = ProcessingOutcome {
            status: ApplicationStatus::Rejected,
            processed_by: actor.id,
            processed_at: self.clock.utc(),
            decision_note: Some(reason.to_owned()),
        };
        let rejected = self
            .applications
            .process_if(id, ApplicationStatus::Pending, outcome)
            .await?
            .ok_or_else(|| {
                Error::invalid_transition("application was processed concurrently")
            })?;

        let applicant = self
            .users
            .find(rejected.user_id)
            .await?
            .ok_or_else(|| Error::internal("applicant record missing"))?;
        self.notifier
            .publish(GardenEvent::ApplicationRejected {
                application: rejected.clone(),
                applicant,
                reason: reason.to_owned(),
            })
            .await?;

        Ok(rejected)
    }

    /// Revoke an approved application.
    ///
    /// The record collapses back into `rejected` (preserving the observed
    /// contract rather than introducing a distinct terminal state) and the
    /// plot returns to the pool when the applicant still holds it.
    pub async fn revoke(&self, actor: &User, id: i32) -> ApiResult<Application> {
        let application = self
            .applications
            .find(id)
            .await?
            .ok_or_else(|| Error::not_found("application not found"))?;
        if application.status != ApplicationStatus::Approved {
            return Err(Error::invalid_transition(
                "only approved applications can be revoked",
            ));
        }

        let outcome = ProcessingOutcome {
            status: ApplicationStatus::Rejected,
            processed_by: actor.id,
            processed_at: self.clock.utc(),
            decision_note: Some("approval revoked".into()),
        };
        let revoked = self
            .applications
            .process_if(id, ApplicationStatus::Approved, outcome)
            .await?
            .ok_or_else(|| {
                Error::invalid_transition("application was processed concurrently")
            })?;

        if let Some(plot) = self.held_plot(&revoked).await? {
            self.plots
                .release_if_held_by(plot.id, revoked.user_id)
                .await?;
        }

        Ok(revoked)
    }

    /// Claim a plot for the applicant: the requested plot when still
    /// available, otherwise the first available plot by ascending number.
    /// Retries on claim races until a plot binds or none remain.
    async fn claim_plot(&self, application: &Application) -> ApiResult<Plot> {
        if let Some(requested) = application.requested_plot_id {
            if let Some(plot) = self
                .plots
                .assign_if_available(requested, application.user_id)
                .await?
            {
                return Ok(plot);
            }
        }

        loop {
            let mut available: Vec<Plot> = self
                .plots
                .list()
                .await?
                .into_iter()
                .filter(|plot| plot.status == PlotStatus::Available)
                .collect();
            available.sort_by(|a, b| a.plot_number.cmp(&b.plot_number));

            let Some(candidate) = available.into_iter().next() else {
                return Err(Error::conflict("no plot available for assignment")
                    .with_details(serde_json::json!({ "code": "no_plot_available" })));
            };
            if let Some(plot) = self
                .plots
                .assign_if_available(candidate.id, application.user_id)
                .await?
            {
                return Ok(plot);
            }
            // Claim raced with another approval; re-scan the pool.
        }
    }

    /// The plot currently assigned to the application's owner, lowest plot
    /// number first. The application itself does not store the binding.
    async fn held_plot(&self, application: &Application) -> ApiResult<Option<Plot>> {
        if let Some(requested) = application.requested_plot_id {
            if let Some(plot) = self.plots.find(requested).await? {
                if plot.assigned_to == Some(application.user_id) {
                    return Ok(Some(plot));
                }
            }
        }
        let mut held: Vec<Plot> = self
            .plots
            .list()
            .await?
            .into_iter()
            .filter(|plot| plot.assigned_to == Some(application.user_id))
            .collect();
        held.sort_by(|a, b| a.plot_number.cmp(&b.plot_number));
        Ok(held.into_iter().next())
    }
}
