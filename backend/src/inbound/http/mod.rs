//! HTTP inbound adapter exposing REST endpoints.

pub mod applications;
pub mod auth;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod forum;
pub mod health;
pub mod messages;
pub mod notifications;
pub mod payments;
pub mod plots;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;
pub mod workdays;

pub use error::ApiResult;

use actix_web::{web, Scope};

/// Mount every REST handler on the given scope.
///
/// Shared by the server bootstrap and the HTTP tests so the two cannot
/// drift apart.
pub fn mount_api(scope: Scope) -> Scope {
    scope
        .service(
            web::scope("/auth")
                .service(auth::login)
                .service(auth::logout)
                .service(auth::current_user),
        )
        .service(users::register)
        .service(users::list_users)
        .service(users::update_user)
        .service(plots::list_plots)
        .service(plots::get_plot)
        .service(plots::create_plot)
        .service(plots::update_plot)
        .service(applications::list_applications)
        .service(applications::get_application)
        .service(applications::submit_application)
        .service(applications::process_application)
        .service(workdays::list_work_days)
        .service(workdays::get_work_day)
        .service(workdays::list_attendances)
        .service(workdays::create_work_day)
        .service(workdays::attend_work_day)
        .service(workdays::update_attendance)
        .service(payments::list_payments)
        .service(payments::create_payment)
        .service(payments::update_payment)
        .service(forum::list_questions)
        .service(forum::get_question)
        .service(forum::post_question)
        .service(forum::post_answer)
        .service(messages::list_messages)
        .service(messages::send_message)
        .service(messages::mark_message_read)
        .service(events::list_events)
        .service(events::create_event)
        .service(notifications::unread_count)
        .service(notifications::mark_all_read)
        .service(notifications::list_notifications)
        .service(notifications::create_notification)
        .service(notifications::mark_notification_read)
        .service(notifications::delete_notification)
        .service(dashboard::get_dashboard)
}
