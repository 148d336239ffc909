//! Plot CRUD handlers.
//!
//! ```text
//! GET  /api/plots           public
//! GET  /api/plots/{id}      public
//! POST /api/plots           manager
//! PUT  /api/plots/{id}      manager
//! ```

use actix_web::{get, post, put, web, HttpResponse};

use crate::domain::{authorize, Capability, Error, NewPlot, Plot, PlotPatch};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{require_text, FieldName};
use crate::inbound::http::ApiResult;

/// List all plots.
#[utoipa::path(
    get,
    path = "/api/plots",
    responses((status = 200, description = "Plots", body = [Plot])),
    tags = ["plots"],
    operation_id = "listPlots",
    security([])
)]
#[get("/plots")]
pub async fn list_plots(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Plot>>> {
    Ok(web::Json(state.plots.list().await?))
}

/// Fetch one plot.
#[utoipa::path(
    get,
    path = "/api/plots/{id}",
    params(("id" = i32, Path, description = "Plot id")),
    responses(
        (status = 200, description = "Plot", body = Plot),
        (status = 404, description = "Plot not found", body = Error)
    ),
    tags = ["plots"],
    operation_id = "getPlot",
    security([])
)]
#[get("/plots/{id}")]
pub async fn get_plot(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<Plot>> {
    let plot = state
        .plots
        .find(path.into_inner())
        .await?
        .ok_or_else(|| Error::not_found("plot not found"))?;
    Ok(web::Json(plot))
}

/// Create a plot.
#[utoipa::path(
    post,
    path = "/api/plots",
    request_body = NewPlot,
    responses(
        (status = 201, description = "Plot created", body = Plot),
        (status = 400, description = "Invalid plot data", body = Error),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["plots"],
    operation_id = "createPlot"
)]
#[post("/plots")]
pub async fn create_plot(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<NewPlot>,
) -> ApiResult<HttpResponse> {
    let actor = state.session_user(&session).await?;
    authorize(actor.as_ref(), Capability::ManagerOnly)?;

    let mut payload = payload.into_inner();
    payload.plot_number = require_text(&payload.plot_number, FieldName::new("plotNumber"))?;
    if state
        .plots
        .find_by_number(&payload.plot_number)
        .await?
        .is_some()
    {
        return Err(Error::invalid_request("plot number already exists"));
    }

    let plot = state.plots.create(payload).await?;
    Ok(HttpResponse::Created().json(plot))
}

/// Update a plot (shallow merge).
#[utoipa::path(
    put,
    path = "/api/plots/{id}",
    request_body = PlotPatch,
    params(("id" = i32, Path, description = "Plot id")),
    responses(
        (status = 200, description = "Updated plot", body = Plot),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Plot not found", body = Error)
    ),
    tags = ["plots"],
    operation_id = "updatePlot"
)]
#[put("/plots/{id}")]
pub async fn update_plot(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
    payload: web::Json<PlotPatch>,
) -> ApiResult<web::Json<Plot>> {
    let actor = state.session_user(&session).await?;
    authorize(actor.as_ref(), Capability::ManagerOnly)?;

    let updated = state
        .plots
        .update(path.into_inner(), payload.into_inner())
        .await?
        .ok_or_else(|| Error::not_found("plot not found"))?;
    Ok(web::Json(updated))
}
