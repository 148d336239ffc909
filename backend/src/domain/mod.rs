//! Domain entities, access policy, and services.
//!
//! Types here are transport agnostic; the HTTP adapter maps them onto the
//! REST surface and the outbound adapters persist them through the ports in
//! [`ports`].

pub mod access;
pub mod application;
pub mod applications;
pub mod dashboard;
pub mod error;
pub mod event;
pub mod forum;
pub mod message;
pub mod notification;
pub mod notifier;
pub mod payment;
pub mod plot;
pub mod ports;
pub mod user;
pub mod workday;

pub use self::access::{authorize, Capability};
pub use self::application::{
    Application, ApplicationStatus, GardenerType, NewApplication, ProcessingOutcome,
};
pub use self::applications::ApplicationService;
pub use self::dashboard::{DashboardService, DashboardSnapshot};
pub use self::error::{Error, ErrorCode};
pub use self::event::{Event, NewEvent};
pub use self::forum::{ForumAnswer, ForumQuestion};
pub use self::message::{Message, NewMessage};
pub use self::notification::{
    NewNotification, Notification, NotificationKind, NotificationPriority, NotificationStatus,
};
pub use self::notifier::{GardenEvent, NotificationService};
pub use self::payment::{NewPayment, Payment, PaymentPatch, PaymentStatus};
pub use self::plot::{NewPlot, Plot, PlotPatch, PlotStatus};
pub use self::user::{NewUser, Role, User, UserPatch};
pub use self::workday::{AttendanceStatus, NewWorkDay, WorkDay, WorkDayAttendance};

/// Convenient result alias for domain operations.
pub type ApiResult<T> = Result<T, Error>;

/// Serde helper distinguishing "field absent" from "field explicitly null"
/// in shallow-merge patch payloads.
pub mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}
