//! OpenAPI documentation configuration.
//!
//! Defines [`ApiDoc`], the generated specification covering every REST
//! endpoint of the inbound layer plus the session-cookie security scheme.
//! Swagger UI serves the document in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::dashboard::DashboardSnapshot;
use crate::domain::{
    Application, Error, ErrorCode, Event, ForumAnswer, ForumQuestion, Message, Notification,
    Payment, Plot, User, WorkDay, WorkDayAttendance,
};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Community garden administration API",
        description = "HTTP interface for plots, applications, payments, work days, \
                       forum, messaging, notifications, and dashboard statistics."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::current_user,
        crate::inbound::http::users::register,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::update_user,
        crate::inbound::http::plots::list_plots,
        crate::inbound::http::plots::get_plot,
        crate::inbound::http::plots::create_plot,
        crate::inbound::http::plots::update_plot,
        crate::inbound::http::applications::list_applications,
        crate::inbound::http::applications::get_application,
        crate::inbound::http::applications::submit_application,
        crate::inbound::http::applications::process_application,
        crate::inbound::http::workdays::list_work_days,
        crate::inbound::http::workdays::get_work_day,
        crate::inbound::http::workdays::list_attendances,
        crate::inbound::http::workdays::create_work_day,
        crate::inbound::http::workdays::attend_work_day,
        crate::inbound::http::workdays::update_attendance,
        crate::inbound::http::payments::list_payments,
        crate::inbound::http::payments::create_payment,
        crate::inbound::http::payments::update_payment,
        crate::inbound::http::forum::list_questions,
        crate::inbound::http::forum::get_question,
        crate::inbound::http::forum::post_question,
        crate::inbound::http::forum::post_answer,
        crate::inbound::http::messages::list_messages,
        crate::inbound::http::messages::send_message,
        crate::inbound::http::messages::mark_message_read,
        crate::inbound::http::events::list_events,
        crate::inbound::http::events::create_event,
        crate::inbound::http::notifications::list_notifications,
        crate::inbound::http::notifications::unread_count,
        crate::inbound::http::notifications::create_notification,
        crate::inbound::http::notifications::mark_notification_read,
        crate::inbound::http::notifications::mark_all_read,
        crate::inbound::http::notifications::delete_notification,
        crate::inbound::http::dashboard::get_dashboard,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        Plot,
        Application,
        WorkDay,
        WorkDayAttendance,
        Payment,
        ForumQuestion,
        ForumAnswer,
        Message,
        Event,
        Notification,
        DashboardSnapshot,
    )),
    tags(
        (name = "auth", description = "Session authentication"),
        (name = "users", description = "Registration and member management"),
        (name = "plots", description = "Garden plot inventory"),
        (name = "applications", description = "Plot application workflow"),
        (name = "workdays", description = "Work day scheduling and attendance"),
        (name = "payments", description = "Plot fee tracking"),
        (name = "forum", description = "Community Q&A"),
        (name = "messages", description = "Direct and global messaging"),
        (name = "events", description = "Garden events"),
        (name = "notifications", description = "Notification inbox"),
        (name = "dashboard", description = "Aggregated statistics"),
        (name = "health", description = "Probes for orchestration")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_covers_the_core_workflow_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/login",
            "/api/applications",
            "/api/applications/{id}",
            "/api/notifications/read-all",
            "/api/dashboard",
        ] {
            assert!(
                doc.paths.paths.contains_key(path),
                "missing path: {path}"
            );
        }
    }

    #[test]
    fn error_schema_is_registered() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        assert!(schemas.contains_key("Error"));
        assert!(schemas.contains_key("Notification"));
    }
}
