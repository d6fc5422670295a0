// ABOUTME: Command modules for foodgram-cli
// ABOUTME: Admin account creation and reference data loading
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

pub mod admin;
pub mod reference;
