// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! [`axum::response::IntoResponse`] for the shared [`TaskError`] taxonomy,
//! plus `From` impls folding the queue and session crates' own error types
//! into it, so every handler can use `?` and get the same `{"error",
//! "message"}` envelope (spec §6/§7).

use agency_core::{ErrorKind, TaskError};
use agency_queue::QueueError;
use agency_sessions::SessionError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::dto::ErrorEnvelope;

pub struct ApiError(pub TaskError);

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        Self(err)
    }
}

impl From<QueueError> for ApiError {
    fn from(err: QueueError) -> Self {
        let kind = match err {
            QueueError::Full { .. } => ErrorKind::QueueFull,
            QueueError::NotFound(_) => ErrorKind::NotFound,
            QueueError::Io { .. } | QueueError::Json { .. } => ErrorKind::InternalError,
        };
        Self(TaskError::new(kind, err.to_string()))
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        Self(TaskError::new(ErrorKind::NotFound, err.to_string()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.kind.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorEnvelope { error: self.0.kind.as_str(), message: self.0.message };
        (status, Json(body)).into_response()
    }
}
