use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::fmt::Display;

use crate::db::DbError;

pub const INVALID_ID: &str = "Invalid ID";
pub const INVALID_JSON: &str = "Cannot parse JSON";
pub const TODO_NOT_FOUND: &str = "Todo not found";

/// Application error type for web handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl AppError {
    /// Log `cause` and produce an internal error carrying only `message`.
    pub fn internal(message: &str, cause: impl Display) -> Self {
        tracing::error!(error = %cause, "{message}");
        AppError::Internal(message.to_string())
    }

    /// Map a database error, treating a missing row as not-found.
    pub fn from_db(err: DbError, message: &str) -> Self {
        match err {
            DbError::NotFound(_) => AppError::NotFound(TODO_NOT_FOUND.to_string()),
            other => AppError::internal(message, other),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable classification, used by GraphQL error extensions.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Internal(_) => "INTERNAL",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::BadRequest(msg) | AppError::NotFound(msg) | AppError::Internal(msg) => msg,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}
