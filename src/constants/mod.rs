// ABOUTME: Application constants re-exported from foodgram-core
// ABOUTME: Field limits, pagination defaults, media layout and shared messages
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

pub use foodgram_core::constants::*;
