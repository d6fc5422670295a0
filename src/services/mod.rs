// ABOUTME: Domain service layer for logic spanning storage and media
// ABOUTME: Keeps route handlers thin: validation in serializers, orchestration here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

//! Domain service layer
//!
//! Operations that touch more than one backend (the database and the media
//! directory) or that shape a non-JSON response live here so handlers only
//! authenticate, check policy, validate and respond.

/// Recipe writes paired with image storage
pub mod recipes;

/// Plain-text shopping list rendering
pub mod shopping_list;
