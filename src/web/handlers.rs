use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Value, json};

use super::errors::{AppError, INVALID_JSON, TODO_NOT_FOUND};
use super::{AppState, lock_db, parse_id};
use crate::models::{Todo, TodoInput};

/// Unwrap a JSON body, reporting any rejection as a bad request.
fn body(payload: Result<Json<TodoInput>, JsonRejection>) -> Result<TodoInput, AppError> {
    payload.map(|Json(input)| input).map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejected request body");
        AppError::BadRequest(INVALID_JSON.to_string())
    })
}

/// GET /todos
pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, AppError> {
    let db = lock_db(&state.db)?;
    let todos = db
        .list_todos()
        .map_err(|e| AppError::internal("Cannot retrieve todos", e))?;
    Ok(Json(todos))
}

/// POST /todos
pub async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<TodoInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    let input = body(payload)?;
    let db = lock_db(&state.db)?;
    let todo = db
        .insert_todo(&input)
        .map_err(|e| AppError::internal("Cannot create todo", e))?;
    tracing::info!(id = %todo.id, "created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

/// GET /todos/{id}
pub async fn get_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Todo>, AppError> {
    let id = parse_id(&raw_id)?;
    let db = lock_db(&state.db)?;
    db.get_todo(id)
        .map_err(|e| AppError::internal("Cannot retrieve todo", e))?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(TODO_NOT_FOUND.to_string()))
}

/// PUT /todos/{id}
pub async fn update_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<TodoInput>, JsonRejection>,
) -> Result<Json<Todo>, AppError> {
    let id = parse_id(&raw_id)?;
    let input = body(payload)?;
    let db = lock_db(&state.db)?;
    let todo = db
        .update_todo(id, &input)
        .map_err(|e| AppError::from_db(e, "Cannot update todo"))?;
    tracing::info!(%id, "updated todo");
    Ok(Json(todo))
}

/// DELETE /todos/{id}
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&raw_id)?;
    let db = lock_db(&state.db)?;
    db.delete_todo(id)
        .map_err(|e| AppError::from_db(e, "Cannot delete todo"))?;
    tracing::info!(%id, "deleted todo");
    Ok(Json(json!({ "result": "Todo deleted" })))
}
