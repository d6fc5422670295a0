// ABOUTME: Foodgram CLI - command-line tool for administrative tasks
// ABOUTME: Creates admin accounts and bulk-loads ingredients and tags from JSON files
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors
//!
//! Usage:
//! ```bash
//! # Create (or promote) an admin account
//! foodgram-cli create-admin --email admin@example.com --username admin --password secret123
//!
//! # Load reference data
//! foodgram-cli load-ingredients data/ingredients.json
//! foodgram-cli load-tags data/tags.json
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use foodgram::{
    config::{DatabaseConfig, DatabaseUrl},
    database::Database,
};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "foodgram-cli",
    about = "Foodgram Management CLI",
    long_about = "Command-line tool for creating administrators and loading Foodgram reference data."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override
    #[arg(long, global = true, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Create an admin account, or promote an existing one with --force
    CreateAdmin {
        /// Admin email
        #[arg(long)]
        email: String,

        /// Admin username
        #[arg(long)]
        username: String,

        /// Admin password
        #[arg(long)]
        password: String,

        /// Given name
        #[arg(long, default_value = "Admin")]
        first_name: String,

        /// Family name
        #[arg(long, default_value = "User")]
        last_name: String,

        /// Promote and reset the password if the email is already registered
        #[arg(long)]
        force: bool,
    },

    /// Load ingredients from a JSON array of {name, measurement_unit}
    LoadIngredients {
        /// Path to the JSON file
        file: PathBuf,
    },

    /// Load tags from a JSON array of {name, color, slug}
    LoadTags {
        /// Path to the JSON file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    let database_url = cli
        .database_url
        .unwrap_or_else(|| "sqlite:./data/foodgram.db".to_owned());
    info!("Connecting to database: {}", database_url);

    let database = Database::connect(&DatabaseConfig {
        url: DatabaseUrl::parse_url(&database_url),
        max_connections: 1,
        auto_migrate: true,
    })
    .await
    .context("Failed to open database")?;

    match cli.command {
        Command::CreateAdmin {
            email,
            username,
            password,
            first_name,
            last_name,
            force,
        } => {
            commands::admin::create(
                &database,
                commands::admin::AdminAccount {
                    email,
                    username,
                    password,
                    first_name,
                    last_name,
                },
                force,
            )
            .await?;
        }
        Command::LoadIngredients { file } => {
            commands::reference::load_ingredients(&database, &file).await?;
        }
        Command::LoadTags { file } => {
            commands::reference::load_tags(&database, &file).await?;
        }
    }

    Ok(())
}
