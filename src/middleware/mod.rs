// ABOUTME: HTTP middleware for request tracing, authentication and CORS
// ABOUTME: Provides request ID spans, identity resolution and cross-origin configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

/// Identity resolution from the Authorization header
pub mod auth;
/// Cross-origin configuration
pub mod cors;
/// Per-request spans
pub mod tracing;

pub use auth::{AuthMiddleware, AuthResult};
pub use cors::setup_cors;
pub use tracing::{create_request_span, trace_layer, RequestSpan, REQUEST_ID_HEADER};
