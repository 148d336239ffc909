//! Payment tracking handlers.
//!
//! ```text
//! GET  /api/payments        owner scope; manager sees all
//! POST /api/payments        authenticated (self) or manager (any user)
//! PUT  /api/payments/{id}   owner or manager
//! ```

use actix_web::{get, post, put, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::{
    Error, GardenEvent, NewPayment, Payment, PaymentPatch, PaymentStatus, Role,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Payment creation body. `user_id` may only be set by a manager.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    #[serde(default)]
    pub user_id: Option<i32>,
    pub plot_id: i32,
    /// Integer cents.
    pub amount: i64,
    #[serde(default)]
    pub status: Option<PaymentStatus>,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Payment update body; absent fields are untouched.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentRequest {
    pub status: Option<PaymentStatus>,
    #[serde(default, with = "crate::domain::double_option")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
}

/// Payments visible to the caller.
#[utoipa::path(
    get,
    path = "/api/payments",
    responses(
        (status = 200, description = "Payments", body = [Payment]),
        (status = 401, description = "Unauthenticated", body = Error)
    ),
    tags = ["payments"],
    operation_id = "listPayments"
)]
#[get("/payments")]
pub async fn list_payments(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Payment>>> {
    let actor = state.require_session_user(&session).await?;
    let payments = if actor.role == Role::Manager {
        state.payments.list().await?
    } else {
        state.payments.list_for_user(actor.id).await?
    };
    Ok(web::Json(payments))
}

/// Record a payment.
#[utoipa::path(
    post,
    path = "/api/payments",
    request_body = CreatePaymentRequest,
    responses(
        (status = 201, description = "Payment created", body = Payment),
        (status = 400, description = "Invalid payment data", body = Error),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["payments"],
    operation_id = "createPayment"
)]
#[post("/payments")]
pub async fn create_payment(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreatePaymentRequest>,
) -> ApiResult<HttpResponse> {
    let actor = state.require_session_user(&session).await?;
    let payload = payload.into_inner();

    let user_id = match payload.user_id {
        Some(user_id) if user_id != actor.id => {
            if actor.role != Role::Manager {
                return Err(Error::forbidden(
                    "only managers may record payments for other members",
                ));
            }
            user_id
        }
        _ => actor.id,
    };
    if payload.amount <= 0 {
        return Err(Error::invalid_request("amount must be positive cents"));
    }

    let status = payload.status.unwrap_or(PaymentStatus::Pending);
    let payment = state
        .payments
        .create(NewPayment {
            user_id,
            plot_id: payload.plot_id,
            amount: payload.amount,
            status,
            due_date: payload.due_date,
            notes: payload.notes,
        })
        .await?;

    // Recording an already-settled payment stamps the paid date.
    let payment = if status == PaymentStatus::Paid {
        state
            .payments
            .update(
                payment.id,
                PaymentPatch {
                    paid_date: Some(Some(Utc::now())),
                    ..PaymentPatch::default()
                },
            )
            .await?
            .unwrap_or(payment)
    } else {
        payment
    };

    Ok(HttpResponse::Created().json(payment))
}

/// Update a payment, stamping the paid date on settlement and fanning out
/// a payment-due notification when it turns overdue.
#[utoipa::path(
    put,
    path = "/api/payments/{id}",
    request_body = UpdatePaymentRequest,
    params(("id" = i32, Path, description = "Payment id")),
    responses(
        (status = 200, description = "Updated payment", body = Payment),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Payment not found", body = Error)
    ),
    tags = ["payments"],
    operation_id = "updatePayment"
)]
#[put("/payments/{id}")]
pub async fn update_payment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
    payload: web::Json<UpdatePaymentRequest>,
) -> ApiResult<web::Json<Payment>> {
    let actor = state.require_session_user(&session).await?;
    let id = path.into_inner();
    let payload = payload.into_inner();

    let existing = state
        .payments
        .find(id)
        .await?
        .ok_or_else(|| Error::not_found("payment not found"))?;
    if existing.user_id != actor.id && actor.role != Role::Manager {
        return Err(Error::forbidden("not your payment"));
    }

    // Keep the paid-date invariant: set on settlement, cleared otherwise.
    let paid_date = match payload.status {
        Some(PaymentStatus::Paid) if existing.status != PaymentStatus::Paid => {
            Some(Some(Utc::now()))
        }
        Some(status) if status != PaymentStatus::Paid => Some(None),
        _ => None,
    };

    let turned_overdue = payload.status == Some(PaymentStatus::Overdue)
        && existing.status != PaymentStatus::Overdue;

    let updated = state
        .payments
        .update(
            id,
            PaymentPatch {
                status: payload.status,
                paid_date,
                notes: payload.notes,
            },
        )
        .await?
        .ok_or_else(|| Error::not_found("payment not found"))?;

    if turned_overdue {
        match state.users.find(updated.user_id).await? {
            Some(user) => {
                if let Err(err) = state
                    .notifier
                    .publish(GardenEvent::PaymentOverdue {
                        payment: updated.clone(),
                        user,
                    })
                    .await
                {
                    warn!(error = %err, payment = updated.id, "overdue fan-out failed");
                }
            }
            None => warn!(payment = updated.id, "payment owner missing, skipping fan-out"),
        }
    }

    Ok(web::Json(updated))
}
