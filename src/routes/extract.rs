// ABOUTME: Converts axum extractor rejections and raw path segments into AppError
// ABOUTME: Keeps malformed JSON, query strings and ids inside the JSON error envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

use axum::extract::rejection::JsonRejection;
use axum::Json;
use axum_extra::extract::{Query, QueryRejection};
use tracing::debug;

use crate::errors::{AppError, AppResult};

/// Unwrap a JSON body, reporting rejections as invalid input
///
/// # Errors
///
/// Returns `INVALID_INPUT` with the rejection text
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        debug!(error = %rejection.body_text(), "Rejected request body");
        AppError::invalid_input(rejection.body_text())
    })
}

/// Unwrap a query string that may repeat keys
///
/// # Errors
///
/// Returns `INVALID_INPUT` with the rejection text
pub fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> AppResult<T> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| AppError::invalid_input(rejection.to_string()))
}

/// Parse a numeric path id; anything else names no resource
///
/// # Errors
///
/// Returns not-found for a non-numeric or non-positive id
pub fn parse_id(raw: &str, resource: &str) -> AppResult<i64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::not_found(resource))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42", "Recipe").unwrap(), 42);
        assert_eq!(parse_id("abc", "Recipe").unwrap_err().http_status(), 404);
        assert_eq!(parse_id("0", "Recipe").unwrap_err().http_status(), 404);
    }
}
