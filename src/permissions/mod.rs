// ABOUTME: Role-based permissions re-exported from foodgram-core plus per-endpoint policies
// ABOUTME: Policies decide 401 vs 403 for a request and for a specific recipe author
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

/// Endpoint access policies
pub mod policy;

pub use foodgram_core::permissions::*;
pub use policy::AccessPolicy;
