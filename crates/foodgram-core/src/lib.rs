// ABOUTME: Core types and constants for the Foodgram recipe-sharing backend
// ABOUTME: Foundation crate with error handling, domain limits, and role permissions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

#![deny(unsafe_code)]

//! # Foodgram Core
//!
//! Foundation crate providing shared types and constants for the Foodgram
//! backend. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode` and the JSON error envelope
//! - **constants**: Field lengths, value ranges and shared messages
//! - **permissions**: User roles and the permission flags they grant

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Role-based permission flags
pub mod permissions;
