// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping from [`HelplineError`] to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use helpline_core::HelplineError;
use serde::Serialize;
use tracing::{error, warn};

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// A [`HelplineError`] on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub HelplineError);

impl From<HelplineError> for ApiError {
    fn from(err: HelplineError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            HelplineError::Validation { .. } => StatusCode::BAD_REQUEST,
            HelplineError::Unauthorized(_) | HelplineError::Auth(_) => StatusCode::UNAUTHORIZED,
            HelplineError::NotFound(_) => StatusCode::NOT_FOUND,
            HelplineError::Upstream { .. } | HelplineError::Timeout { .. } => {
                StatusCode::BAD_GATEWAY
            }
            HelplineError::Storage { .. }
            | HelplineError::Config(_)
            | HelplineError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self.0 {
            HelplineError::Validation { field, message } => ErrorResponse {
                error: message,
                field: Some(field),
            },
            err if status == StatusCode::INTERNAL_SERVER_ERROR => {
                error!(error = %err, "request failed");
                ErrorResponse {
                    error: "Beklenmeyen bir hata oluştu, lütfen daha sonra tekrar deneyin.".into(),
                    field: None,
                }
            }
            err => {
                if status == StatusCode::BAD_GATEWAY {
                    warn!(error = %err, "upstream failure reached the gateway");
                }
                ErrorResponse {
                    error: err.to_string(),
                    field: None,
                }
            }
        };
        (status, Json(body)).into_response()
    }
}
