use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

use crate::db;
use crate::error::{AppError, ErrorReply};
use crate::models::{GuardianSubmission, StudentSubmission, TeacherSubmission};
use crate::state::AppState;

const SUBMIT_FAILED: &str = "Failed to save form data";
const SEARCH_FAILED: &str = "Failed to search schools";
const HEALTH_FAILED: &str = "Database connection failed";

#[derive(Debug, Serialize)]
pub struct SubmitResponse<T> {
    pub success: bool,
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match db::ping(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "healthy", "database": "connected" })),
        ),
        Err(e) => {
            error!("Health check failed: {e}");
            let detail = if state.production {
                HEALTH_FAILED.to_string()
            } else {
                e.to_string()
            };
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "database": "disconnected",
                    "error": detail,
                })),
            )
        }
    }
}

pub async fn submit_guardian_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GuardianSubmission>, JsonRejection>,
) -> Result<impl IntoResponse, ErrorReply> {
    let result = async {
        let submission = accept(payload)?;
        submission.validate()?;
        Ok::<_, AppError>(db::insert_guardian(&state.pool, &submission).await?)
    }
    .await;

    let record = settle(&state, "guardian", result)?;
    info!(id = record.id, "Stored guardian submission");
    Ok(saved(record))
}

pub async fn submit_teacher_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TeacherSubmission>, JsonRejection>,
) -> Result<impl IntoResponse, ErrorReply> {
    let result = async {
        let submission = accept(payload)?;
        submission.validate()?;
        Ok::<_, AppError>(db::insert_teacher(&state.pool, &submission).await?)
    }
    .await;

    let record = settle(&state, "teacher", result)?;
    info!(id = record.id, "Stored teacher submission");
    Ok(saved(record))
}

pub async fn submit_student_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<StudentSubmission>, JsonRejection>,
) -> Result<impl IntoResponse, ErrorReply> {
    let result = async {
        let submission = accept(payload)?;
        submission.validate()?;
        Ok::<_, AppError>(db::insert_student(&state.pool, &submission).await?)
    }
    .await;

    let record = settle(&state, "student", result)?;
    info!(id = record.id, "Stored student submission");
    Ok(saved(record))
}

pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<String>>, ErrorReply> {
    match db::search_schools(&state.pool, &params.q).await {
        Ok(names) => Ok(Json(names)),
        Err(e) => {
            error!("Error searching schools: {e}");
            Err(AppError::from(e).reply(state.production, SEARCH_FAILED))
        }
    }
}

fn accept<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::MalformedPayload(rejection.body_text()))
}

fn settle<T>(
    state: &AppState,
    role: &str,
    result: Result<T, AppError>,
) -> Result<T, ErrorReply> {
    result.map_err(|e| {
        match &e {
            AppError::Database(_) => error!(role = role, "Error saving form data: {e}"),
            _ => warn!(role = role, "Rejected submission: {e}"),
        }
        e.reply(state.production, SUBMIT_FAILED)
    })
}

fn saved<T: Serialize>(record: T) -> Json<SubmitResponse<T>> {
    Json(SubmitResponse {
        success: true,
        data: record,
    })
}
