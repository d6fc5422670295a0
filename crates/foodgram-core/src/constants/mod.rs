// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Field lengths, value ranges, pagination defaults and shared messages for Foodgram
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single
//! large file.

/// API endpoints
pub mod endpoints {
    /// Health check endpoint
    pub const HEALTH_CHECK: &str = "/health";
    /// Public prefix for stored media
    pub const MEDIA: &str = "/media";
}

/// Network ports
pub mod ports {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 8080;
}

/// Value ranges and field lengths enforced on write
pub mod limits {
    /// Minimum recipe cooking time in minutes
    pub const MIN_COOKING_TIME: i64 = 1;
    /// Maximum recipe cooking time in minutes
    pub const MAX_COOKING_TIME: i64 = 32_000;
    /// Minimum ingredient amount within a recipe
    pub const MIN_AMOUNT: i64 = 1;
    /// Maximum ingredient amount within a recipe
    pub const MAX_AMOUNT: i64 = 32_000;

    /// Username, first name and last name
    pub const MAX_LENGTH_NAME: usize = 150;
    /// Email address
    pub const MAX_LENGTH_EMAIL: usize = 254;
    /// Tag name
    pub const MAX_LENGTH_NAME_TAG: usize = 200;
    /// Tag color (`#RRGGBB`)
    pub const MAX_LENGTH_COLOR_TAG: usize = 7;
    /// Tag slug
    pub const MAX_LENGTH_SLUG_TAG: usize = 200;
    /// Recipe name
    pub const MAX_LENGTH_NAME_RECIPE: usize = 200;
    /// Ingredient name
    pub const MAX_LENGTH_NAME_INGREDIENT: usize = 200;
    /// Ingredient measurement unit
    pub const MAX_LENGTH_MEASUREMENT_UNIT: usize = 200;
    /// Password bounds
    pub const MIN_PASSWORD_LENGTH: usize = 8;
    /// Upper bound on accepted password length (bcrypt truncates at 72 bytes)
    pub const MAX_PASSWORD_LENGTH: usize = 72;

    /// Largest decoded image accepted from a data URI
    pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;
    /// Request body limit (base64 inflates images by a third)
    pub const MAX_REQUEST_BODY_BYTES: usize = 16 * 1024 * 1024;
}

/// Pagination defaults
pub mod pagination {
    /// Items per page when `limit` is not supplied
    pub const DEFAULT_PAGE_SIZE: u32 = 6;
    /// Upper bound for `limit`
    pub const MAX_PAGE_SIZE: u32 = 100;
}

/// Reserved values
pub mod reserved {
    /// Username that would shadow the `/users/me/` endpoint
    pub const USERNAME_ME: &str = "me";
}

/// Media storage layout
pub mod media {
    /// Subdirectory of the media root holding recipe images
    pub const RECIPE_IMAGE_DIR: &str = "recipes";
    /// Image extensions accepted in data URIs
    pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];
}

/// Service identification
pub mod service_names {
    /// Service name reported by health checks and logs
    pub const FOODGRAM_SERVER: &str = "foodgram-server";
    /// JWT issuer and audience
    pub const JWT_AUDIENCE: &str = "foodgram-api";
}

/// Shopping list download
pub mod shopping_list {
    /// Filename offered in `Content-Disposition`
    pub const FILENAME: &str = "shopping_list.txt";
    /// Content type of the rendered list
    pub const CONTENT_TYPE: &str = "text/plain; charset=utf-8";
}

/// User-facing error messages shared across layers
pub mod error_messages {
    /// Duplicate favourite
    pub const ALREADY_FAVORITED: &str = "Recipe is already in favorites.";
    /// Missing favourite
    pub const NOT_FAVORITED: &str = "Recipe is not in favorites.";
    /// Duplicate cart entry
    pub const ALREADY_IN_CART: &str = "Recipe is already in the shopping cart.";
    /// Missing cart entry
    pub const NOT_IN_CART: &str = "Recipe is not in the shopping cart.";
    /// Duplicate subscription
    pub const ALREADY_SUBSCRIBED: &str = "You are already subscribed to this author.";
    /// Missing subscription
    pub const NOT_SUBSCRIBED: &str = "You are not subscribed to this author.";
    /// Self subscription
    pub const SELF_SUBSCRIPTION: &str = "You cannot subscribe to yourself.";
    /// Empty ingredient list
    pub const INGREDIENTS_REQUIRED: &str = "At least one ingredient is required.";
    /// Repeated ingredient id
    pub const DUPLICATE_INGREDIENT: &str = "Ingredients must not repeat.";
    /// Repeated tag id
    pub const DUPLICATE_TAG: &str = "Tags must not repeat.";
    /// Login failure
    pub const INVALID_CREDENTIALS: &str = "Unable to log in with provided credentials.";
    /// Wrong current password
    pub const WRONG_CURRENT_PASSWORD: &str = "Current password is incorrect.";
    /// Duplicate username
    pub const USERNAME_TAKEN: &str = "A user with that username already exists.";
    /// Duplicate email
    pub const EMAIL_TAKEN: &str = "A user with that email already exists.";
    /// Reserved username
    pub const USERNAME_RESERVED: &str = "This username is reserved.";
    /// Page past the end
    pub const INVALID_PAGE: &str = "Invalid page.";
}
