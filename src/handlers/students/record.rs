use axum::extract::{Path, State};
use serde_json::Value;
use tracing::{info, warn};

use crate::database::Student;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, JsonObject};
use crate::state::AppState;
use crate::validation::{has_required_fields, parse_student, UPDATE_REQUIRED};

/// GET /api/students/:id - Get a single student by id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Student> {
    let student = state
        .store()
        .get_by_id(&id)
        .await?
        .ok_or_else(ApiError::student_not_found)?;

    Ok(ApiResponse::success(student))
}

/// PUT /api/students/:id - Replace every mutable field of a student
pub async fn put(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonObject(body): JsonObject,
) -> ApiResult<Student> {
    if !has_required_fields(&body, UPDATE_REQUIRED) {
        warn!("Update of {} rejected: missing required fields", id);
        return Err(ApiError::missing_fields());
    }

    // The path id always wins over any student_id in the body
    let mut merged = body;
    merged.insert("student_id".to_string(), Value::String(id.clone()));

    let student = parse_student(&merged).ok_or_else(|| {
        warn!("Update of {} rejected: invalid data types", id);
        ApiError::invalid_types()
    })?;

    if !state.store().exists(&id).await? {
        return Err(ApiError::student_not_found());
    }

    state.store().update(&student).await?;
    info!("Updated student {}", id);

    Ok(ApiResponse::success(student).with_message("Student data updated successfully"))
}

/// DELETE /api/students/:id - Delete a student
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    if !state.store().exists(&id).await? {
        return Err(ApiError::student_not_found());
    }

    state.store().delete(&id).await?;
    info!("Deleted student {}", id);

    Ok(ApiResponse::<()>::no_content())
}
