//! HTTP request handlers for the Attendance Penalty Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::evaluate;
use crate::error::EngineResult;
use crate::models::{PunchEvent, ShiftWindow, ViolationRecord};

use super::request::{EvaluationRequest, SummaryQuery};
use super::response::{ApiError, ApiErrorResponse, EvaluationResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/evaluate", post(evaluate_handler))
        .route("/penalties/summary", get(summary_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

fn json_ok<T: serde::Serialize>(body: T) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Maps a JSON body rejection to a `400` error body.
fn json_rejection_error(correlation_id: Uuid, rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            ApiError::malformed_json(body_text)
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    }
}

/// Handler for POST /evaluate.
///
/// Evaluates the punch against the server's violation log and, when it is a
/// violation and `record` is set, appends the resulting record. A punch that
/// was already recorded returns the existing record id. The log lock is held
/// from the history count until the record is written.
async fn evaluate_handler(
    State(state): State<AppState>,
    payload: Result<Json<EvaluationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing evaluation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return ApiErrorResponse::bad_request(json_rejection_error(correlation_id, rejection))
                .into_response();
        }
    };

    let record = request.record;
    let (shift, punch) = match into_domain(request) {
        Ok(parts) => parts,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Invalid evaluation input");
            return ApiErrorResponse::from(err).into_response();
        }
    };

    let start_time = Instant::now();
    let mut log = state.log().lock().await;

    let result = match evaluate(&shift, &punch, &*log, state.policy()) {
        Ok(result) => result,
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                employee_id = %punch.employee_id,
                error = %err,
                "Evaluation failed"
            );
            return ApiErrorResponse::from(err).into_response();
        }
    };

    let record_id = if record {
        ViolationRecord::from_evaluation(&punch, &result).map(|violation| log.record(violation))
    } else {
        None
    };
    drop(log);

    info!(
        correlation_id = %correlation_id,
        employee_id = %punch.employee_id,
        violated = result.violated,
        category = result.category.map(|c| c.code()).unwrap_or("none"),
        recorded = record_id.is_some(),
        duration_us = start_time.elapsed().as_micros(),
        "Evaluation completed"
    );

    json_ok(EvaluationResponse { result, record_id })
}

fn into_domain(request: EvaluationRequest) -> EngineResult<(ShiftWindow, PunchEvent)> {
    let shift = ShiftWindow::try_from(request.shift)?;
    let punch = PunchEvent::try_from(request.punch)?;
    Ok((shift, punch))
}

/// Handler for GET /penalties/summary.
async fn summary_handler(
    State(state): State<AppState>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            warn!(correlation_id = %correlation_id, error = %rejection, "Invalid summary query");
            return ApiErrorResponse::bad_request(ApiError::invalid_input(rejection.body_text()))
                .into_response();
        }
    };
    if let Err(err) = query.validate() {
        return ApiErrorResponse::from(err).into_response();
    }

    let rows = state
        .log()
        .lock()
        .await
        .summary(query.employee_id.as_deref(), query.from, query.to);

    info!(
        correlation_id = %correlation_id,
        employee_id = query.employee_id.as_deref().unwrap_or("all"),
        rows = rows.len(),
        "Penalty summary served"
    );

    json_ok(rows)
}

/// Handler for GET /health.
async fn health_handler(State(state): State<AppState>) -> Response {
    let metadata = state.policy().metadata();
    json_ok(serde_json::json!({
        "status": "ok",
        "policy": metadata.code,
        "version": metadata.version
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigLoader, PenaltyPolicy};
    use crate::history::PenaltySummaryRow;
    use crate::models::ViolationCategory;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let config = ConfigLoader::load("./config/attendance_penalties").expect("Failed to load config");
        AppState::new(config)
    }

    async fn post_json(router: Router, body: String) -> (StatusCode, Value) {
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/evaluate")
                    .header("Content-Type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn late_punch(timestamp: &str) -> String {
        json!({
            "shift": {"start": "08:00:00", "end": "16:00:00"},
            "punch": {"employee_id": "emp_001", "timestamp": timestamp, "direction": "IN"}
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_violation_is_recorded() {
        let state = create_test_state();
        let router = create_router(state.clone());

        let (status, body) = post_json(router, late_punch("2026-01-15T08:32:00")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["violated"], true);
        assert_eq!(body["category"], "late_arrival_30_45");
        assert_eq!(body["occurrence_number"], 1);
        assert!(body["record_id"].is_string());
        assert_eq!(state.log().lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_record_false_leaves_log_untouched() {
        let state = create_test_state();
        let router = create_router(state.clone());
        let body = json!({
            "shift": {"start": "08:00:00", "end": "16:00:00"},
            "punch": {"employee_id": "emp_001", "timestamp": "2026-01-15T08:32:00", "direction": "IN"},
            "record": false
        })
        .to_string();

        let (status, body) = post_json(router, body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["violated"], true);
        assert!(body.get("record_id").is_none());
        assert!(state.log().lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_resent_punch_returns_existing_record() {
        let state = create_test_state();

        let (_, first) = post_json(create_router(state.clone()), late_punch("2026-01-05T08:35:00")).await;
        let (status, resent) =
            post_json(create_router(state.clone()), late_punch("2026-01-05T08:35:00")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(resent["record_id"], first["record_id"]);
        assert_eq!(resent["occurrence_number"], 1);
        assert_eq!(state.log().lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let (status, body) = post_json(create_router(create_test_state()), "{invalid json".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_value(body).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_shift_time_returns_invalid_input() {
        let body = json!({
            "shift": {"start": "08:00:00"},
            "punch": {"employee_id": "emp_001", "timestamp": "2026-01-15T08:32:00", "direction": "IN"}
        })
        .to_string();
        let (status, body) = post_json(create_router(create_test_state()), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_INPUT");
        assert_eq!(body["details"], "shift.end");
    }

    #[tokio::test]
    async fn test_missing_table_returns_422() {
        let policy = PenaltyPolicy::default().without_severity_table(ViolationCategory::LateArrival30To45);
        let router = create_router(AppState::new(ConfigLoader::from_policy(policy)));

        let (status, body) = post_json(router, late_punch("2026-01-15T08:32:00")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "MISSING_CONFIGURATION");
    }

    #[tokio::test]
    async fn test_summary_reflects_recorded_violations() {
        let state = create_test_state();
        for ts in ["2026-01-05T08:35:00", "2026-01-09T08:40:00"] {
            let (status, _) = post_json(create_router(state.clone()), late_punch(ts)).await;
            assert_eq!(status, StatusCode::OK);
        }

        let response = create_router(state)
            .oneshot(
                Request::builder()
                    .uri("/penalties/summary?employee_id=emp_001")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let rows: Vec<PenaltySummaryRow> = serde_json::from_slice(&body).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].occurrence_count, 2);
        // 10% then 20%
        assert_eq!(rows[0].total_percentage, rust_decimal::Decimal::new(30, 0));
    }

    #[tokio::test]
    async fn test_health() {
        let response = create_router(create_test_state())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
