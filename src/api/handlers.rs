//! HTTP request handlers for the scheduling API.
//!
//! This module contains the handler functions for all API endpoints and
//! the router wiring. Handlers resolve the caller's tenant scope, drive
//! the stores, and publish post-commit change events; all domain rules
//! live below this layer.

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{AgentId, ShiftId, TenantId};
use crate::ports::ChangeEvent;
use crate::report::aggregate_report;
use crate::scheduling::generate_schedule;
use crate::store::CreateOutcome;

use super::context::CallerContext;
use super::request::{
    CreateShiftRequest, GenerateScheduleRequest, ReportParams, ShiftListParams,
    UpdateShiftRequest,
};
use super::response::{
    ApiErrorResponse, DeleteAgentResponse, DeleteShiftResponse, ExistingShiftResponse,
    GenerateScheduleResponse, OrphanSweepResponse, rejection_error,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/agents", get(list_agents_handler))
        .route("/agents/:id", delete(delete_agent_handler))
        .route("/schedules/generate", post(generate_handler))
        .route("/shifts", get(list_shifts_handler).post(create_shift_handler))
        .route(
            "/shifts/:id",
            put(update_shift_handler).delete(delete_shift_handler),
        )
        .route("/maintenance/orphan-shifts", post(sweep_orphans_handler))
        .route("/reports", get(report_handler))
        .with_state(state)
}

/// Maps an engine error to its HTTP response, logging it against the
/// request's correlation id.
fn engine_error_response(correlation_id: Uuid, error: EngineError) -> Response {
    warn!(correlation_id = %correlation_id, error = %error, "request failed");
    ApiErrorResponse::from(error).into_response()
}

/// Maps a request-body rejection to a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = rejection_error(rejection);
    warn!(
        correlation_id = %correlation_id,
        code = %error.code,
        "rejected request body"
    );
    (StatusCode::BAD_REQUEST, Json(error)).into_response()
}

/// Handler for `GET /agents`.
async fn list_agents_handler(State(state): State<AppState>, caller: CallerContext) -> Response {
    let agents = state.agents().all(&caller.scope).await;
    Json(agents).into_response()
}

/// Handler for `POST /schedules/generate`.
///
/// Expands the request into candidates and persists them idempotently;
/// the response always carries the full candidate list plus the count of
/// newly inserted records, which is zero on a repeated request.
async fn generate_handler(
    State(state): State<AppState>,
    caller: CallerContext,
    payload: Result<Json<GenerateScheduleRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    state.metrics().record_generation();

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    info!(
        correlation_id = %correlation_id,
        start_date = %request.start_date,
        start_times = request.start_times.len(),
        "Processing schedule generation request"
    );

    let plan = match request.plan() {
        Ok(plan) => plan,
        Err(error) => return engine_error_response(correlation_id, error),
    };

    let agents = state
        .agents()
        .candidates(&caller.scope, &request.selected_agent_ids)
        .await;
    let schedule = match generate_schedule(&plan, &agents) {
        Ok(schedule) => schedule,
        Err(error) => return engine_error_response(correlation_id, error),
    };

    let tenant_of: HashMap<AgentId, TenantId> =
        agents.iter().map(|a| (a.id, a.tenant_id)).collect();
    let outcome = state.shifts().bulk_upsert(&schedule, &tenant_of).await;

    info!(
        correlation_id = %correlation_id,
        requested = schedule.len(),
        inserted = outcome.inserted,
        fallback = outcome.fallback,
        "Schedule generation completed"
    );
    state.notify(&ChangeEvent::ScheduleGenerated {
        inserted: outcome.inserted,
    });

    Json(GenerateScheduleResponse {
        schedule,
        persisted_count: outcome.inserted,
        fallback: outcome.fallback,
    })
    .into_response()
}

/// Handler for `GET /shifts`.
async fn list_shifts_handler(
    State(state): State<AppState>,
    caller: CallerContext,
    Query(params): Query<ShiftListParams>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match params.query() {
        Ok(query) => query,
        Err(error) => return engine_error_response(correlation_id, error),
    };
    let shifts = state.shifts().query(&caller.scope, &query).await;
    Json(shifts).into_response()
}

/// Handler for `POST /shifts`.
///
/// Creation is idempotent: an occupied slot answers 200 with the
/// existing record instead of an error.
async fn create_shift_handler(
    State(state): State<AppState>,
    caller: CallerContext,
    payload: Result<Json<CreateShiftRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    state.metrics().record_shift_create();

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    // The shift is written under the agent's own tenant; the agent must
    // be visible to the caller.
    let Some(agent) = state.agents().get(&caller.scope, request.agent_id).await else {
        return engine_error_response(
            correlation_id,
            EngineError::not_found("Agent", request.agent_id),
        );
    };

    let new_shift = match request.new_shift(agent.tenant_id) {
        Ok(new_shift) => new_shift,
        Err(error) => return engine_error_response(correlation_id, error),
    };

    match state.shifts().create(new_shift).await {
        CreateOutcome::Created(shift) => {
            info!(
                correlation_id = %correlation_id,
                shift_id = %shift.id,
                agent_id = %agent.id,
                "Shift created"
            );
            state.notify(&ChangeEvent::ShiftCreated { shift_id: shift.id });
            (StatusCode::CREATED, Json(shift)).into_response()
        }
        CreateOutcome::AlreadyExists(shift) => {
            info!(
                correlation_id = %correlation_id,
                shift_id = %shift.id,
                "Shift already existed"
            );
            Json(ExistingShiftResponse {
                ok: true,
                existed: true,
                shift,
            })
            .into_response()
        }
    }
}

/// Handler for `PUT /shifts/{id}`.
async fn update_shift_handler(
    State(state): State<AppState>,
    caller: CallerContext,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateShiftRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    let edit = match request.edit() {
        Ok(edit) => edit,
        Err(error) => return engine_error_response(correlation_id, error),
    };

    match state.shifts().update(&caller.scope, ShiftId(id), edit).await {
        Ok(shift) => {
            info!(correlation_id = %correlation_id, shift_id = %shift.id, "Shift updated");
            state.notify(&ChangeEvent::ShiftUpdated { shift_id: shift.id });
            Json(shift).into_response()
        }
        Err(error) => engine_error_response(correlation_id, error),
    }
}

/// Handler for `DELETE /shifts/{id}`.
async fn delete_shift_handler(
    State(state): State<AppState>,
    caller: CallerContext,
    Path(id): Path<Uuid>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.shifts().delete(&caller.scope, ShiftId(id)).await {
        Ok(shift) => {
            info!(correlation_id = %correlation_id, shift_id = %shift.id, "Shift deleted");
            state.notify(&ChangeEvent::ShiftDeleted { shift_id: shift.id });
            Json(DeleteShiftResponse { ok: true }).into_response()
        }
        Err(error) => engine_error_response(correlation_id, error),
    }
}

/// Handler for `DELETE /agents/{id}`.
///
/// The agent deletion stands on its own; cascade cleanup runs as a
/// best-effort follow-up and the response reports how many dependent
/// shifts actually went with it.
async fn delete_agent_handler(
    State(state): State<AppState>,
    caller: CallerContext,
    Path(id): Path<Uuid>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let agent = match state.agents().delete(&caller.scope, AgentId(id)).await {
        Ok(agent) => agent,
        Err(error) => return engine_error_response(correlation_id, error),
    };

    let outcome = state
        .cleaner()
        .remove_agent_shifts(&caller.scope, agent.id)
        .await;
    info!(
        correlation_id = %correlation_id,
        agent_id = %agent.id,
        cascade_removed = outcome.cascade_removed,
        orphans_removed = outcome.orphans_removed,
        "Agent deleted"
    );
    state.notify(&ChangeEvent::AgentRemoved {
        agent_id: agent.id,
        removed_shifts: outcome.cascade_removed,
    });

    Json(DeleteAgentResponse {
        deleted_shift_count: outcome.cascade_removed,
    })
    .into_response()
}

/// Handler for `POST /maintenance/orphan-shifts`.
async fn sweep_orphans_handler(State(state): State<AppState>, caller: CallerContext) -> Response {
    let correlation_id = Uuid::new_v4();
    let removed = state.cleaner().sweep_orphans(&caller.scope).await;
    info!(correlation_id = %correlation_id, removed, "Orphan sweep completed");
    Json(OrphanSweepResponse { removed }).into_response()
}

/// Handler for `GET /reports`.
async fn report_handler(
    State(state): State<AppState>,
    caller: CallerContext,
    Query(params): Query<ReportParams>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let range = match params.range() {
        Ok(range) => range,
        Err(error) => return engine_error_response(correlation_id, error),
    };

    let shifts = state
        .shifts()
        .query(
            &caller.scope,
            &crate::store::ShiftQuery {
                start_date: range.start_date,
                end_date: range.end_date,
                agent: None,
            },
        )
        .await;
    let agents = state.agents().all(&caller.scope).await;
    let report = aggregate_report(&range, &shifts, &agents);

    info!(
        correlation_id = %correlation_id,
        shifts = shifts.len(),
        agents = report.summary.len(),
        "Report generated"
    );
    Json(report).into_response()
}
