// ABOUTME: Renders the aggregated shopping list as a plain-text download
// ABOUTME: One "{name} ({unit}) - {total}" line per ingredient, newline-terminated
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

use std::fmt::Write as _;

use crate::models::ShoppingListItem;

/// Render aggregated rows in the order given; an empty list renders as ""
#[must_use]
pub fn render_shopping_list(items: &[ShoppingListItem]) -> String {
    items.iter().fold(String::new(), |mut out, item| {
        let _ = writeln!(
            out,
            "{} ({}) - {}",
            item.name, item.measurement_unit, item.total_amount
        );
        out
    })
}
