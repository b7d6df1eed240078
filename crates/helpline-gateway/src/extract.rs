// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Body and query extractors whose rejections use the API error shape.
//!
//! Axum's own `Json`/`Query` rejections answer with plain text (422 for a
//! badly typed body). Here they become `HelplineError::Validation`, so the
//! client always gets a 400 `{error, field}`.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use helpline_core::HelplineError;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// `Json<T>` with validation-shaped rejections.
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError(json_rejection(&rejection))),
        }
    }
}

/// `Query<T>` with validation-shaped rejections.
#[derive(Debug)]
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError(query_rejection(&rejection))),
        }
    }
}

fn json_rejection(rejection: &JsonRejection) -> HelplineError {
    let detail = rejection.body_text();
    let field = match rejection {
        JsonRejection::JsonDataError(_) => field_from_detail(&detail),
        _ => None,
    };
    let field = field.unwrap_or_else(|| "body".to_string());
    HelplineError::validation(&field, message(&field, &detail))
}

fn query_rejection(rejection: &QueryRejection) -> HelplineError {
    let detail = rejection.body_text();
    let field = field_from_detail(&detail).unwrap_or_else(|| "query".to_string());
    HelplineError::validation(&field, message(&field, &detail))
}

fn message(field: &str, detail: &str) -> String {
    let reason = reason(detail);
    let reason = reason
        .strip_prefix(field)
        .and_then(|rest| rest.strip_prefix(": "))
        .unwrap_or(reason);
    format!("{field}: {reason}")
}

/// Drop axum's generic prefix, keep serde's explanation.
fn reason(detail: &str) -> &str {
    detail
        .split_once(": ")
        .map(|(_, rest)| rest)
        .unwrap_or(detail)
}

/// The offending field named in a serde error message, if any.
///
/// Handles `missing field `x``, `unknown field `x`` and the `path: ...`
/// prefix serde_path_to_error puts in front of type errors.
fn field_from_detail(detail: &str) -> Option<String> {
    for marker in ["missing field `", "unknown field `"] {
        if let Some(start) = detail.find(marker) {
            let rest = &detail[start + marker.len()..];
            return rest.find('`').map(|end| rest[..end].to_string());
        }
    }

    let (_, rest) = detail.split_once(": ")?;
    let (path, _) = rest.split_once(": ")?;
    let is_path = !path.is_empty()
        && path
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '[' | ']'));
    is_path.then(|| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_is_named() {
        let detail = "Failed to deserialize the JSON body into the target type: \
                      missing field `text` at line 1 column 2";
        assert_eq!(field_from_detail(detail).as_deref(), Some("text"));
    }

    #[test]
    fn mistyped_field_is_named_from_its_path() {
        let detail = "Failed to deserialize the JSON body into the target type: \
                      text: invalid type: integer `5`, expected a string at line 1 column 10";
        assert_eq!(field_from_detail(detail).as_deref(), Some("text"));
    }

    #[test]
    fn syntax_errors_name_no_field() {
        let detail = "Failed to parse the request body as JSON: \
                      expected value at line 1 column 1";
        assert_eq!(field_from_detail(detail), None);
    }

    #[test]
    fn message_names_the_field_once() {
        let detail = "Failed to deserialize the JSON body into the target type: \
                      text: invalid type: integer `5`, expected a string";
        assert_eq!(
            message("text", detail),
            "text: invalid type: integer `5`, expected a string"
        );
    }

    #[test]
    fn reason_drops_the_prefix() {
        assert_eq!(
            reason("Failed to deserialize query string: unknown variant `yearly`"),
            "unknown variant `yearly`"
        );
    }
}
