//! Notification fan-out service.
//!
//! Every state-changing garden event produces exactly one stored
//! [`Notification`]. Email delivery rides along as a best-effort side
//! effect: per-user notifications of high or urgent priority, and work-day
//! broadcasts, are handed to a spawned task whose failure is logged and
//! never surfaced to the triggering operation.

use std::sync::Arc;

use mockable::Clock;
use tracing::warn;

use crate::domain::ports::{
    EmailMessage, Mailer, NotificationRepository, UserRepository,
};
use crate::domain::{
    ApiResult, Application, Error, NewNotification, Notification, NotificationKind,
    NotificationPriority, Payment, Plot, User, WorkDay,
};

/// State-changing events the fan-out reacts to.
#[derive(Debug, Clone)]
pub enum GardenEvent {
    /// An application was approved and a plot bound to the applicant.
    ApplicationApproved {
        application: Application,
        plot: Plot,
        applicant: User,
    },
    /// An application was rejected with a reviewer-supplied reason.
    ApplicationRejected {
        application: Application,
        applicant: User,
        reason: String,
    },
    /// A new work day was scheduled; announced to every member.
    WorkDayScheduled { work_day: WorkDay },
    /// A payment moved to overdue.
    PaymentOverdue { payment: Payment, user: User },
}

/// Constructs, persists, and fans out notifications.
#[derive(Clone)]
pub struct NotificationService {
    notifications: Arc<dyn NotificationRepository>,
    users: Arc<dyn UserRepository>,
    mailer: Arc<dyn Mailer>,
    clock: Arc<dyn Clock>,
}

impl NotificationService {
    /// Create the service with its outbound dependencies.
    pub fn new(
        notifications: Arc<dyn NotificationRepository>,
        users: Arc<dyn UserRepository>,
        mailer: Arc<dyn Mailer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            notifications,
            users,
            mailer,
            clock,
        }
    }

    /// Persist exactly one notification for the event and trigger any
    /// best-effort email delivery it warrants.
    pub async fn publish(&self, event: GardenEvent) -> ApiResult<Notification> {
        match event {
            GardenEvent::ApplicationApproved {
                application,
                plot,
                applicant,
            } => {
                let notification = self
                    .persist(NewNotification {
                        title: "Garden Plot Application Approved".into(),
                        message: format!(
                            "Congratulations! Your application has been approved and plot {} \
                             has been assigned to you. Please log in to review the assignment \
                             and complete the required payment.",
                            plot.plot_number
                        ),
                        kind: NotificationKind::Application,
                        priority: NotificationPriority::High,
                        user_id: Some(applicant.id),
                        is_global: false,
                        related_entity_type: Some("application".into()),
                        related_entity_id: Some(application.id),
                        expires_at: None,
                        action_link: Some(format!("/applications/{}", application.id)),
                    })
                    .await?;
                self.dispatch_to_user(&notification, &applicant);
                Ok(notification)
            }
            GardenEvent::ApplicationRejected {
                application,
                applicant,
                reason,
            } => {
                self.persist(NewNotification {
                    title: "Garden Plot Application Rejected".into(),
                    message: format!(
                        "Your application for a garden plot was not approved: {reason}"
                    ),
                    kind: NotificationKind::Application,
                    priority: NotificationPriority::Medium,
                    user_id: Some(applicant.id),
                    is_global: false,
                    related_entity_type: Some("application".into()),
                    related_entity_id: Some(application.id),
                    expires_at: None,
                    action_link: Some(format!("/applications/{}", application.id)),
                })
                .await
            }
            GardenEvent::WorkDayScheduled { work_day } => {
                let when = work_day.date.format("%A, %B %-d").to_string();
                let notification = self
                    .persist(NewNotification {
                        title: "New Work Day Scheduled".into(),
                        message: format!(
                            "A new work day has been scheduled: \"{}\" on {} from {} to {}.",
                            work_day.title, when, work_day.start_time, work_day.end_time
                        ),
                        kind: NotificationKind::WorkDay,
                        priority: NotificationPriority::Medium,
                        user_id: None,
                        is_global: true,
                        related_entity_type: Some("work_day".into()),
                        related_entity_id: Some(work_day.id),
                        expires_at: Some(work_day.date),
                        action_link: Some(format!("/workdays/{}", work_day.id)),
                    })
                    .await?;
                self.broadcast(&notification).await;
                Ok(notification)
            }
            GardenEvent::PaymentOverdue { payment, user } => {
                let notification = self
                    .persist(NewNotification {
                        title: "Plot Payment Overdue".into(),
                        message: format!(
                            "Your plot fee payment of {} is overdue. Please settle it to \
                             keep your plot membership.",
                            format_cents(payment.amount)
                        ),
                        kind: NotificationKind::Payment,
                        priority: NotificationPriority::High,
                        user_id: Some(user.id),
                        is_global: false,
                        related_entity_type: Some("payment".into()),
                        related_entity_id: Some(payment.id),
                        expires_at: None,
                        action_link: Some("/payments".into()),
                    })
                    .await?;
                self.dispatch_to_user(&notification, &user);
                Ok(notification)
            }
        }
    }

    /// Persist a caller-supplied notification (inbox POST endpoint),
    /// attempting email for high/urgent per-user records.
    pub async fn create(&self, new: NewNotification) -> ApiResult<Notification> {
        let notification = self.persist(new).await?;
        if notification.priority.warrants_email() {
            if let Some(user_id) = notification.user_id {
                match self.users.find(user_id).await? {
                    Some(user) => self.dispatch_to_user(&notification, &user),
                    None => warn!(user_id, "notification recipient not found, skipping email"),
                }
            }
            // Global high/urgent records are not mass-mailed; members see
            // them in their inbox.
        }
        Ok(notification)
    }

    /// Mark one notification read.
    pub async fn mark_read(&self, id: i32) -> ApiResult<Notification> {
        self.notifications
            .mark_read(id, self.clock.utc())
            .await?
            .ok_or_else(|| Error::not_found("notification not found"))
    }

    /// Mark every unread notification visible to the user read. Idempotent.
    pub async fn mark_all_read(&self, user_id: i32) -> ApiResult<usize> {
        Ok(self
            .notifications
            .mark_all_read_for_user(user_id, self.clock.utc())
            .await?)
    }

    /// Permanently delete a notification.
    pub async fn delete(&self, id: i32) -> ApiResult<()> {
        if self.notifications.delete(id).await? {
            Ok(())
        } else {
            Err(Error::not_found("notification not found"))
        }
    }

    async fn persist(&self, new: NewNotification) -> ApiResult<Notification> {
        if new.user_id.is_none() != new.is_global {
            return Err(Error::invalid_request(
                "notification must be either global or addressed to a user",
            ));
        }
        Ok(self.notifications.create(new).await?)
    }

    /// Hand one email to a background task; never blocks or fails the
    /// caller.
    fn dispatch_to_user(&self, notification: &Notification, user: &User) {
        if !notification.priority.warrants_email() {
            return;
        }
        let message = render_email(notification, user);
        self.spawn_send(message);
    }

    /// Email every member about a global notification (work-day broadcast).
    async fn broadcast(&self, notification: &Notification) {
        let users = match self.users.list().await {
            Ok(users) => users,
            Err(err) => {
                warn!(error = %err, "failed to load recipients for broadcast email");
                return;
            }
        };
        for user in users {
            self.spawn_send(render_email(notification, &user));
        }
    }

    fn spawn_send(&self, message: EmailMessage) {
        let mailer = Arc::clone(&self.mailer);
        tokio::spawn(async move {
            if let Err(err) = mailer.send(&message).await {
                warn!(error = %err, to = %message.to, "best-effort email delivery failed");
            }
        });
    }
}

fn format_cents(amount: i64) -> String {
    format!("${}.{:02}", amount / 100, amount.rem_euclid(100))
}

/// Render the email body for a notification, with per-kind closing copy.
fn render_email(notification: &Notification, recipient: &User) -> EmailMessage {
    let closing = match notification.kind {
        NotificationKind::WorkDay => {
            "Please sign up to participate if you can attend. Community garden success \
             depends on member participation."
        }
        NotificationKind::Payment => {
            "Please ensure timely payment to maintain your garden plot membership."
        }
        NotificationKind::Weather => "Please take appropriate measures to protect your plants.",
        NotificationKind::Maintenance => {
            "Your attention to this maintenance issue will help keep our garden in good \
             condition."
        }
        NotificationKind::Application => "Thank you for your interest in our community garden!",
        NotificationKind::Event => "We hope to see you there!",
    };
    let text = format!("{}\n\n{closing}", notification.message);
    let action = notification
        .action_link
        .as_deref()
        .map(|link| format!("<p><a href=\"{link}\">View Details</a></p>"))
        .unwrap_or_default();
    let html = format!(
        "<div><h2>{}</h2><p>{}</p><p>{closing}</p>{action}\
         <p>This is an automated message from the community garden. \
         Please do not reply to this email.</p></div>",
        notification.title, notification.message
    );
    EmailMessage {
        to: recipient.email.clone(),
        recipient_name: Some(recipient.full_name()),
        subject: notification.title.clone(),
        text,
        html: Some(html),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MailerError, MockMailer};
    use crate::domain::{ApplicationStatus, GardenerType, PaymentStatus, PlotStatus, Role};
    use crate::outbound::memory::MemoryStore;
    use chrono::Utc;
    use std::time::Duration;

    fn store() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::new())
    }

    fn service_with_mailer(store: &Arc<MemoryStore>, mailer: MockMailer) -> NotificationService {
        NotificationService::new(
            store.clone(),
            store.clone(),
            Arc::new(mailer),
            Arc::new(mockable::DefaultClock),
        )
    }

    fn applicant() -> User {
        User {
            id: 1,
            username: "ada".into(),
            password: "pw".into(),
            email: "ada@example.org".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            phone: None,
            address: None,
            role: Role::Gardener,
            created_at: Utc::now(),
        }
    }

    fn approved_event() -> GardenEvent {
        GardenEvent::ApplicationApproved {
            application: Application {
                id: 10,
                user_id: 1,
                status: ApplicationStatus::Approved,
                gardener_type: GardenerType::New,
                preferred_area: None,
                requested_plot_id: None,
                special_requests: None,
                gardening_experience: None,
                priority: 0,
                submitted_at: Utc::now(),
                processed_at: Some(Utc::now()),
                processed_by: Some(2),
                decision_note: None,
            },
            plot: Plot {
                id: 3,
                plot_number: "A1".into(),
                status: PlotStatus::Assigned,
                area: "A".into(),
                size: "10x10".into(),
                yearly_fee: 5000,
                notes: None,
                assigned_to: Some(1),
            },
            applicant: applicant(),
        }
    }

    #[tokio::test]
    async fn approval_event_persists_one_notification_and_emails_applicant() {
        let store = store();
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .withf(|message| message.to == "ada@example.org")
            .times(1)
            .returning(|_| Ok(()));
        let service = service_with_mailer(&store, mailer);

        let notification = service.publish(approved_event()).await.expect("published");
        assert_eq!(notification.kind, NotificationKind::Application);
        assert_eq!(notification.priority, NotificationPriority::High);
        assert_eq!(notification.user_id, Some(1));
        assert!(notification.consistent());

        let visible = NotificationRepository::list_for_user(&*store, 1)
            .await
            .expect("list");
        assert_eq!(visible.len(), 1);

        // Let the spawned delivery task run so the mock expectation fires.
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    #[tokio::test]
    async fn publish_succeeds_even_when_delivery_fails() {
        let store = store();
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .returning(|_| Err(MailerError::delivery("provider down")));
        let service = service_with_mailer(&store, mailer);

        let result = service.publish(approved_event()).await;
        assert!(result.is_ok(), "delivery failure must not fail the event");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    #[tokio::test]
    async fn rejection_event_does_not_email() {
        let store = store();
        let mut mailer = MockMailer::new();
        mailer.expect_send().times(0);
        let service = service_with_mailer(&store, mailer);

        let notification = service
            .publish(GardenEvent::ApplicationRejected {
                application: match approved_event() {
                    GardenEvent::ApplicationApproved { application, .. } => application,
                    _ => unreachable!(),
                },
                applicant: applicant(),
                reason: "no prior season attendance".into(),
            })
            .await
            .expect("published");
        assert_eq!(notification.priority, NotificationPriority::Medium);
        assert!(notification.message.contains("no prior season attendance"));
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    #[tokio::test]
    async fn mark_all_read_is_idempotent() {
        let store = store();
        let mut mailer = MockMailer::new();
        mailer.expect_send().returning(|_| Ok(()));
        let service = service_with_mailer(&store, mailer);

        service.publish(approved_event()).await.expect("first");
        service
            .publish(GardenEvent::PaymentOverdue {
                payment: Payment {
                    id: 1,
                    user_id: 1,
                    plot_id: 3,
                    amount: 5000,
                    status: PaymentStatus::Overdue,
                    due_date: Utc::now(),
                    paid_date: None,
                    notes: None,
                },
                user: applicant(),
            })
            .await
            .expect("second");

        let first = service.mark_all_read(1).await.expect("mark all");
        assert_eq!(first, 2);
        let second = service.mark_all_read(1).await.expect("mark all again");
        assert_eq!(second, 0);
        let unread = store.unread_count_for_user(1).await.expect("count");
        assert_eq!(unread, 0);
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    #[test]
    fn cents_format_is_dollars_and_cents() {
        assert_eq!(format_cents(5000), "$50.00");
        assert_eq!(format_cents(5), "$0.05");
        assert_eq!(format_cents(12345), "$123.45");
    }
}
