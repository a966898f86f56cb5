//! HTTP request handlers for the commission engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::post,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::ReportOutcome;
use crate::report::ReportBuilder;

use super::request::ReportRequest;
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/reports", post(report_handler))
        .with_state(state)
}

/// Handler for POST /reports endpoint.
///
/// Accepts a report request and returns the report outcome.
async fn report_handler(
    State(state): State<AppState>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing report request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::validation_error(body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
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
            };
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response();
        }
    };

    let start_time = Instant::now();
    match build_report(request, &state) {
        Ok(outcome) => {
            let duration = start_time.elapsed();
            match &outcome {
                ReportOutcome::Report(report) => info!(
                    correlation_id = %correlation_id,
                    report_id = %report.report_id,
                    packets = report.summary.packet_count,
                    employees = report.summary.total_employees,
                    duration_us = duration.as_micros(),
                    "Report built successfully"
                ),
                ReportOutcome::NoData { reason } => info!(
                    correlation_id = %correlation_id,
                    reason = ?reason,
                    duration_us = duration.as_micros(),
                    "No data to report"
                ),
            }
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(outcome),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Report request rejected"
            );
            let api_error: ApiErrorResponse = err.into();
            (
                api_error.status,
                [(header::CONTENT_TYPE, "application/json")],
                Json(api_error.error),
            )
                .into_response()
        }
    }
}

/// Resolves the request against the configuration and builds the report.
fn build_report(request: ReportRequest, state: &AppState) -> EngineResult<ReportOutcome> {
    let config = state.config();
    let resolved = request.resolve(config)?;

    let mut outcome = ReportBuilder::new(config.config()).build(resolved.packets, &resolved.report);
    if let ReportOutcome::Report(report) = &mut outcome {
        let mut warnings = resolved.warnings;
        warnings.append(&mut report.warnings);
        report.warnings = warnings;
    }
    Ok(outcome)
}
