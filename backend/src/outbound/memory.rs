//! In-process keyed-collection store.
//!
//! The production store for this system: one map per entity kind behind a
//! single `RwLock`, with monotonically increasing ids per kind. All
//! repository ports are implemented on the same struct, so one instance
//! can be shared across every service. The compare-and-swap operations of
//! the plot and application ports run entirely inside the write lock,
//! which is what makes concurrent approvals safe.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};

use crate::domain::ports::{
    ApplicationRepository, EventRepository, ForumRepository, MessageRepository,
    NotificationRepository, PaymentRepository, PlotRepository, StoreError, UserRepository,
    WorkDayRepository,
};
use crate::domain::{
    Application, ApplicationStatus, AttendanceStatus, Event, ForumAnswer, ForumQuestion, Message,
    NewApplication, NewEvent, NewMessage, NewNotification, NewPayment, NewPlot, NewUser,
    NewWorkDay, Notification, NotificationStatus, Payment, PaymentPatch, Plot, PlotPatch,
    PlotStatus, ProcessingOutcome, Role, User, UserPatch, WorkDay, WorkDayAttendance,
};

#[derive(Default)]
struct Counters {
    user: i32,
    plot: i32,
    application: i32,
    work_day: i32,
    attendance: i32,
    payment: i32,
    forum_question: i32,
    forum_answer: i32,
    message: i32,
    event: i32,
    notification: i32,
}

impl Counters {
    fn next(counter: &mut i32) -> i32 {
        *counter += 1;
        *counter
    }
}

#[derive(Default)]
struct Inner {
    users: HashMap<i32, User>,
    plots: HashMap<i32, Plot>,
    applications: HashMap<i32, Application>,
    work_days: HashMap<i32, WorkDay>,
    attendances: HashMap<i32, WorkDayAttendance>,
    payments: HashMap<i32, Payment>,
    forum_questions: HashMap<i32, ForumQuestion>,
    forum_answers: HashMap<i32, ForumAnswer>,
    messages: HashMap<i32, Message>,
    events: HashMap<i32, Event>,
    notifications: HashMap<i32, Notification>,
    counters: Counters,
}

/// In-memory store implementing every repository port.
pub struct MemoryStore {
    inner: RwLock<Inner>,
    clock: Arc<dyn Clock>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty store stamping records with the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }

    /// Create an empty store with an injected clock (tests).
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            clock,
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::connection("store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::connection("store lock poisoned"))
    }
}

fn sorted_by_id<T: Clone>(map: &HashMap<i32, T>, id_of: impl Fn(&T) -> i32) -> Vec<T> {
    let mut records: Vec<T> = map.values().cloned().collect();
    records.sort_by_key(id_of);
    records
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let created_at = self.clock.utc();
        let mut inner = self.write()?;
        let id = Counters::next(&mut inner.counters.user);
        let record = User {
            id,
            username: user.username,
            password: user.password,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            address: user.address,
            role: user.role,
            created_at,
        };
        inner.users.insert(id, record.clone());
        Ok(record)
    }

    async fn find(&self, id: i32) -> Result<Option<User>, StoreError> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        Ok(sorted_by_id(&self.read()?.users, |user| user.id))
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, StoreError> {
        let mut users = sorted_by_id(&self.read()?.users, |user| user.id);
        users.retain(|user| user.role == role);
        Ok(users)
    }

    async fn update(&self, id: i32, patch: UserPatch) -> Result<Option<User>, StoreError> {
        let mut inner = self.write()?;
        let Some(user) = inner.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(first_name) = patch.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            user.last_name = last_name;
        }
        if let Some(phone) = patch.phone {
            user.phone = phone;
        }
        if let Some(address) = patch.address {
            user.address = address;
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        Ok(Some(user.clone()))
    }
}

#[async_trait]
impl PlotRepository for MemoryStore {
    async fn create(&self, plot: NewPlot) -> Result<Plot, StoreError> {
        let mut inner = self.write()?;
        let id = Counters::next(&mut inner.counters.plot);
        let record = Plot {
            id,
            plot_number: plot.plot_number,
            status: plot.status,
            area: plot.area,
            size: plot.size,
            yearly_fee: plot.yearly_fee,
            notes: plot.notes,
            assigned_to: None,
        };
        inner.plots.insert(id, record.clone());
        Ok(record)
    }

    async fn find(&self, id: i32) -> Result<Option<Plot>, StoreError> {
        Ok(self.read()?.plots.get(&id).cloned())
    }

    async fn find_by_number(&self, plot_number: &str) -> Result<Option<Plot>, StoreError> {
        Ok(self
            .read()?
            .plots
            .values()
            .find(|plot| plot.plot_number == plot_number)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Plot>, StoreError> {
        Ok(sorted_by_id(&self.read()?.plots, |plot| plot.id))
    }

    async fn update(&self, id: i32, patch: PlotPatch) -> Result<Option<Plot>, StoreError> {
        let mut inner = self.write()?;
        let Some(plot) = inner.plots.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(status) = patch.status {
            plot.status = status;
        }
        if let Some(area) = patch.area {
            plot.area = area;
        }
        if let Some(size) = patch.size {
            plot.size = size;
        }
        if let Some(yearly_fee) = patch.yearly_fee {
            plot.yearly_fee = yearly_fee;
        }
        if let Some(notes) = patch.notes {
            plot.notes = notes;
        }
        if let Some(assigned_to) = patch.assigned_to {
            plot.assigned_to = assigned_to;
        }
        Ok(Some(plot.clone()))
    }

    async fn assign_if_available(
        &self,
        id: i32,
        user_id: i32,
    ) -> Result<Option<Plot>, StoreError> {
        let mut inner = self.write()?;
        let Some(plot) = inner.plots.get_mut(&id) else {
            return Ok(None);
        };
        if plot.status != PlotStatus::Available {
            return Ok(None);
        }
        plot.status = PlotStatus::Assigned;
        plot.assigned_to = Some(user_id);
        Ok(Some(plot.clone()))
    }

    async fn release_if_held_by(
        &self,
        id: i32,
        user_id: i32,
    ) -> Result<Option<Plot>, StoreError> {
        let mut inner = self.write()?;
        let Some(plot) = inner.plots.get_mut(&id) else {
            return Ok(None);
        };
        if plot.assigned_to != Some(user_id) {
            return Ok(None);
        }
        plot.status = PlotStatus::Available;
        plot.assigned_to = None;
        Ok(Some(plot.clone()))
    }
}

#[async_trait]
impl ApplicationRepository for MemoryStore {
    async fn create(&self, application: NewApplication) -> Result<Application, StoreError> {
        let submitted_at = self.clock.utc();
        let mut inner = self.write()?;
        let id = Counters::next(&mut inner.counters.application);
        let record = Application {
            id,
            user_id: application.user_id,
            status: ApplicationStatus::Pending,
            gardener_type: application.gardener_type,
            preferred_area: application.preferred_area,
            requested_plot_id: application.requested_plot_id,
            special_requests: application.special_requests,
            gardening_experience: application.gardening_experience,
            priority: application.priority,
            submitted_at,
            processed_at: None,
            processed_by: None,
            decision_note: None,
        };
        inner.applications.insert(id, record.clone());
        Ok(record)
    }

    async fn find(&self, id: i32) -> Result<Option<Application>, StoreError> {
        Ok(self.read()?.applications.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Application>, StoreError> {
        Ok(sorted_by_id(&self.read()?.applications, |a| a.id))
    }

    async fn list_for_user(&self, user_id: i32) -> Result<Vec<Application>, StoreError> {
        let mut applications = sorted_by_id(&self.read()?.applications, |a| a.id);
        applications.retain(|a| a.user_id == user_id);
        Ok(applications)
    }

    async fn count_for_user(&self, user_id: i32) -> Result<usize, StoreError> {
        Ok(self
            .read()?
            .applications
            .values()
            .filter(|a| a.user_id == user_id)
            .count())
    }

    async fn set_priority(
        &self,
        id: i32,
        priority: i32,
    ) -> Result<Option<Application>, StoreError> {
        let mut inner = self.write()?;
        let Some(application) = inner.applications.get_mut(&id) else {
            return Ok(None);
        };
        application.priority = priority;
        Ok(Some(application.clone()))
    }

    async fn process_if(
        &self,
        id: i32,
        expected: ApplicationStatus,
        outcome: ProcessingOutcome,
    ) -> Result<Option<Application>, StoreError> {
        let mut inner = self.write()?;
        let Some(application) = inner.applications.get_mut(&id) else {
            return Ok(None);
        };
        if application.status != expected {
            return Ok(None);
        }
        application.status = outcome.status;
        application.processed_by = Some(outcome.processed_by);
        application.processed_at = Some(outcome.processed_at);
        if outcome.decision_note.is_some() {
            application.decision_note = outcome.decision_note;
        }
        Ok(Some(application.clone()))
    }
}

#[async_trait]
impl WorkDayRepository for MemoryStore {
    async fn create(&self, work_day: NewWorkDay) -> Result<WorkDay, StoreError> {
        let mut inner = self.write()?;
        let id = Counters::next(&mut inner.counters.work_day);
        let record = WorkDay {
            id,
            title: work_day.title,
            description: work_day.description,
            date: work_day.date,
            start_time: work_day.start_time,
            end_time: work_day.end_time,
            max_attendees: work_day.max_attendees,
            created_by: work_day.created_by,
        };
        inner.work_days.insert(id, record.clone());
        Ok(record)
    }

    async fn find(&self, id: i32) -> Result<Option<WorkDay>, StoreError> {
        Ok(self.read()?.work_days.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<WorkDay>, StoreError> {
        Ok(sorted_by_id(&self.read()?.work_days, |wd| wd.id))
    }

    async fn create_attendance(
        &self,
        work_day_id: i32,
        user_id: i32,
    ) -> Result<WorkDayAttendance, StoreError> {
        let mut inner = self.write()?;
        let id = Counters::next(&mut inner.counters.attendance);
        let record = WorkDayAttendance {
            id,
            work_day_id,
            user_id,
            status: AttendanceStatus::SignedUp,
        };
        inner.attendances.insert(id, record.clone());
        Ok(record)
    }

    async fn attendances_for(
        &self,
        work_day_id: i32,
    ) -> Result<Vec<WorkDayAttendance>, StoreError> {
        let mut attendances = sorted_by_id(&self.read()?.attendances, |a| a.id);
        attendances.retain(|a| a.work_day_id == work_day_id);
        Ok(attendances)
    }

    async fn attendances_for_user(
        &self,
        user_id: i32,
    ) -> Result<Vec<WorkDayAttendance>, StoreError> {
        let mut attendances = sorted_by_id(&self.read()?.attendances, |a| a.id);
        attendances.retain(|a| a.user_id == user_id);
        Ok(attendances)
    }

    async fn update_attendance_status(
        &self,
        id: i32,
        status: AttendanceStatus,
    ) -> Result<Option<WorkDayAttendance>, StoreError> {
        let mut inner = self.write()?;
        let Some(attendance) = inner.attendances.get_mut(&id) else {
            return Ok(None);
        };
        attendance.status = status;
        Ok(Some(attendance.clone()))
    }
}

#[async_trait]
impl PaymentRepository for MemoryStore {
    async fn create(&self, payment: NewPayment) -> Result<Payment, StoreError> {
        let mut inner = self.write()?;
        let id = Counters::next(&mut inner.counters.payment);
        let record = Payment {
            id,
            user_id: payment.user_id,
            plot_id: payment.plot_id,
            amount: payment.amount,
            status: payment.status,
            due_date: payment.due_date,
            paid_date: None,
            notes: payment.notes,
        };
        inner.payments.insert(id, record.clone());
        Ok(record)
    }

    async fn find(&self, id: i32) -> Result<Option<Payment>, StoreError> {
        Ok(self.read()?.payments.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Payment>, StoreError> {
        Ok(sorted_by_id(&self.read()?.payments, |p| p.id))
    }

    async fn list_for_user(&self, user_id: i32) -> Result<Vec<Payment>, StoreError> {
        let mut payments = sorted_by_id(&self.read()?.payments, |p| p.id);
        payments.retain(|p| p.user_id == user_id);
        Ok(payments)
    }

    async fn list_for_plot(&self, plot_id: i32) -> Result<Vec<Payment>, StoreError> {
        let mut payments = sorted_by_id(&self.read()?.payments, |p| p.id);
        payments.retain(|p| p.plot_id == plot_id);
        Ok(payments)
    }

    async fn update(&self, id: i32, patch: PaymentPatch) -> Result<Option<Payment>, StoreError> {
        let mut inner = self.write()?;
        let Some(payment) = inner.payments.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(status) = patch.status {
            payment.status = status;
        }
        if let Some(paid_date) = patch.paid_date {
            payment.paid_date = paid_date;
        }
        if let Some(notes) = patch.notes {
            payment.notes = notes;
        }
        Ok(Some(payment.clone()))
    }
}

#[async_trait]
impl ForumRepository for MemoryStore {
    async fn create_question(
        &self,
        user_id: i32,
        title: String,
        content: String,
    ) -> Result<ForumQuestion, StoreError> {
        let created_at = self.clock.utc();
        let mut inner = self.write()?;
        let id = Counters::next(&mut inner.counters.forum_question);
        let record = ForumQuestion {
            id,
            user_id,
            title,
            content,
            created_at,
        };
        inner.forum_questions.insert(id, record.clone());
        Ok(record)
    }

    async fn find_question(&self, id: i32) -> Result<Option<ForumQuestion>, StoreError> {
        Ok(self.read()?.forum_questions.get(&id).cloned())
    }

    async fn list_questions(&self) -> Result<Vec<ForumQuestion>, StoreError> {
        Ok(sorted_by_id(&self.read()?.forum_questions, |q| q.id))
    }

    async fn create_answer(
        &self,
        question_id: i32,
        user_id: i32,
        content: String,
    ) -> Result<ForumAnswer, StoreError> {
        let created_at = self.clock.utc();
        let mut inner = self.write()?;
        let id = Counters::next(&mut inner.counters.forum_answer);
        let record = ForumAnswer {
            id,
            question_id,
            user_id,
            content,
            created_at,
        };
        inner.forum_answers.insert(id, record.clone());
        Ok(record)
    }

    async fn answers_for(&self, question_id: i32) -> Result<Vec<ForumAnswer>, StoreError> {
        let mut answers = sorted_by_id(&self.read()?.forum_answers, |a| a.id);
        answers.retain(|a| a.question_id == question_id);
        Ok(answers)
    }
}

#[async_trait]
impl MessageRepository for MemoryStore {
    async fn create(&self, message: NewMessage) -> Result<Message, StoreError> {
        let created_at = self.clock.utc();
        let mut inner = self.write()?;
        let id = Counters::next(&mut inner.counters.message);
        let record = Message {
            id,
            sender_id: message.sender_id,
            recipient_id: message.recipient_id,
            is_global: message.is_global,
            subject: message.subject,
            content: message.content,
            created_at,
            read_at: None,
        };
        inner.messages.insert(id, record.clone());
        Ok(record)
    }

    async fn find(&self, id: i32) -> Result<Option<Message>, StoreError> {
        Ok(self.read()?.messages.get(&id).cloned())
    }

    async fn list_for_user(&self, user_id: i32) -> Result<Vec<Message>, StoreError> {
        let mut messages = sorted_by_id(&self.read()?.messages, |m| m.id);
        messages.retain(|m| m.recipient_id == Some(user_id) || m.is_global);
        Ok(messages)
    }

    async fn mark_read(
        &self,
        id: i32,
        read_at: DateTime<Utc>,
    ) -> Result<Option<Message>, StoreError> {
        let mut inner = self.write()?;
        let Some(message) = inner.messages.get_mut(&id) else {
            return Ok(None);
        };
        message.read_at = Some(read_at);
        Ok(Some(message.clone()))
    }
}

#[async_trait]
impl EventRepository for MemoryStore {
    async fn create(&self, event: NewEvent) -> Result<Event, StoreError> {
        let mut inner = self.write()?;
        let id = Counters::next(&mut inner.counters.event);
        let record = Event {
            id,
            title: event.title,
            description: event.description,
            date: event.date,
            start_time: event.start_time,
            end_time: event.end_time,
            location: event.location,
            created_by: event.created_by,
        };
        inner.events.insert(id, record.clone());
        Ok(record)
    }

    async fn find(&self, id: i32) -> Result<Option<Event>, StoreError> {
        Ok(self.read()?.events.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Event>, StoreError> {
        Ok(sorted_by_id(&self.read()?.events, |e| e.id))
    }
}

fn visible_to(notification: &Notification, user_id: i32) -> bool {
    notification.user_id == Some(user_id) || notification.is_global
}

#[async_trait]
impl NotificationRepository for MemoryStore {
    async fn create(&self, notification: NewNotification) -> Result<Notification, StoreError> {
        let created_at = self.clock.utc();
        let mut inner = self.write()?;
        let id = Counters::next(&mut inner.counters.notification);
        let record = Notification {
            id,
            title: notification.title,
            message: notification.message,
            kind: notification.kind,
            priority: notification.priority,
            status: NotificationStatus::Unread,
            user_id: notification.user_id,
            is_global: notification.is_global,
            related_entity_type: notification.related_entity_type,
            related_entity_id: notification.related_entity_id,
            expires_at: notification.expires_at,
            created_at,
            read_at: None,
            action_link: notification.action_link,
        };
        inner.notifications.insert(id, record.clone());
        Ok(record)
    }

    async fn find(&self, id: i32) -> Result<Option<Notification>, StoreError> {
        Ok(self.read()?.notifications.get(&id).cloned())
    }

    async fn list_for_user(&self, user_id: i32) -> Result<Vec<Notification>, StoreError> {
        let mut notifications: Vec<Notification> = self
            .read()?
            .notifications
            .values()
            .filter(|n| visible_to(n, user_id))
            .cloned()
            .collect();
        // Newest first.
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(notifications)
    }

    async fn unread_count_for_user(&self, user_id: i32) -> Result<usize, StoreError> {
        Ok(self
            .read()?
            .notifications
            .values()
            .filter(|n| visible_to(n, user_id) && n.status == NotificationStatus::Unread)
            .count())
    }

    async fn mark_read(
        &self,
        id: i32,
        read_at: DateTime<Utc>,
    ) -> Result<Option<Notification>, StoreError> {
        let mut inner = self.write()?;
        let Some(notification) = inner.notifications.get_mut(&id) else {
            return Ok(None);
        };
        notification.status = NotificationStatus::Read;
        notification.read_at = Some(read_at);
        Ok(Some(notification.clone()))
    }

    async fn mark_all_read_for_user(
        &self,
        user_id: i32,
        read_at: DateTime<Utc>,
    ) -> Result<usize, StoreError> {
        let mut inner = self.write()?;
        let mut transitioned = 0;
        for notification in inner.notifications.values_mut() {
            if visible_to(notification, user_id)
                && notification.status == NotificationStatus::Unread
            {
                notification.status = NotificationStatus::Read;
                notification.read_at = Some(read_at);
                transitioned += 1;
            }
        }
        Ok(transitioned)
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        Ok(self.write()?.notifications.remove(&id).is_some())
    }
}
