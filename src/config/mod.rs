// ABOUTME: Configuration module exports
// ABOUTME: Environment-only configuration for the Foodgram server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

/// Environment variable parsing and the server configuration tree
pub mod environment;

pub use environment::{
    AuthConfig, CorsConfig, DatabaseConfig, DatabaseUrl, Environment, LogLevel, MediaConfig,
    PaginationConfig, ServerConfig,
};
