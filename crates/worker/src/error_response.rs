// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! [`axum::response::IntoResponse`] for the shared [`TaskError`] taxonomy, so
//! every handler returns the same `{"error", "message"}` envelope and status
//! mapping (spec §6/§7).

use agency_core::TaskError;
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

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.kind.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorEnvelope { error: self.0.kind.as_str(), message: self.0.message };
        (status, Json(body)).into_response()
    }
}
