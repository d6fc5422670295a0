// ABOUTME: Unified error handling re-exported from foodgram-core
// ABOUTME: AppError, ErrorCode and the JSON error envelope used by every handler
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

//! # Unified Error Handling System
//!
//! The error types live in `foodgram-core` so they can be shared with tools
//! that do not pull in the HTTP stack. `AppError` implements axum's
//! `IntoResponse`, so handlers return `Result<Response, AppError>` directly.

pub use foodgram_core::errors::*;
