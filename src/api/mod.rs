//! HTTP API module for the shift scheduling engine.
//!
//! This module provides the REST endpoints for schedule generation,
//! shift CRUD, agent deletion with cascade, orphan maintenance, and
//! billing reports. The caller's tenant scope arrives in headers set by
//! the external authentication collaborator.

mod context;
mod handlers;
mod request;
mod response;
mod state;

pub use context::CallerContext;
pub use handlers::create_router;
pub use request::{
    CreateShiftRequest, GenerateScheduleRequest, ReportParams, ShiftListParams,
    UpdateShiftRequest,
};
pub use response::{
    ApiError, ApiErrorResponse, DeleteAgentResponse, DeleteShiftResponse, ExistingShiftResponse,
    GenerateScheduleResponse, OrphanSweepResponse,
};
pub use state::AppState;
