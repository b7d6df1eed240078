// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer-session middleware for the admin routes.
//!
//! The token from `Authorization: Bearer <token>` is resolved to a live
//! [`AdminSession`], which is handed to handlers as a request extension.
//! Missing, unknown and expired tokens are all rejected (fail-closed).

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use helpline_core::HelplineError;
use helpline_core::types::AdminSession;

use crate::error::ApiError;
use crate::server::GatewayState;

/// Extract the bearer token from request headers.
pub fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

pub async fn session_middleware(
    State(state): State<GatewayState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&request)
        .ok_or_else(|| HelplineError::Unauthorized("missing bearer token".into()))?
        .to_string();

    let session: AdminSession = state.agent.auth().verify_session(&token).await.map_err(|e| {
        tracing::debug!(error = %e, "admin request rejected");
        e
    })?;

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with(header: Option<&str>) -> Request {
        let mut builder = Request::builder().uri("/admin/poll");
        if let Some(value) = header {
            builder = builder.header("authorization", value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn bearer_token_is_extracted() {
        assert_eq!(bearer_token(&request_with(Some("Bearer abc123"))), Some("abc123"));
    }

    #[test]
    fn other_schemes_and_blanks_are_ignored() {
        assert_eq!(bearer_token(&request_with(None)), None);
        assert_eq!(bearer_token(&request_with(Some("Basic abc"))), None);
        assert_eq!(bearer_token(&request_with(Some("Bearer "))), None);
    }
}
