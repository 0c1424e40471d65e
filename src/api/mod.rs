//! HTTP API module for the Attendance Penalty Engine.
//!
//! This module provides the REST API endpoints for evaluating punches,
//! summarising recorded penalties and checking service health.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{EvaluationRequest, PunchRequest, ShiftRequest, SummaryQuery};
pub use response::{ApiError, ApiErrorResponse, EvaluationResponse};
pub use state::AppState;
