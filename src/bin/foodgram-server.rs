// ABOUTME: Foodgram HTTP server binary
// ABOUTME: Loads configuration, opens and migrates the database, then serves the API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

//! # Foodgram Server Binary
//!
//! Configuration comes from the environment; `--http-port` overrides
//! `HTTP_PORT`.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use foodgram::{
    config::ServerConfig, database::Database, logging, resources::ServerResources,
    server::FoodgramServer,
};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "foodgram-server")]
#[command(about = "Foodgram - recipe sharing REST API")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    info!("Starting Foodgram server");
    info!("{}", config.summary());

    let database = Database::connect(&config.database)
        .await
        .context("Failed to open database")?;
    info!(url = %config.database.url, "Database ready");

    tokio::fs::create_dir_all(&config.media.root)
        .await
        .with_context(|| format!("Failed to create media root {}", config.media.root.display()))?;

    let resources = Arc::new(ServerResources::new(database, config));
    if let Err(e) = FoodgramServer::new(resources).run().await {
        error!("Server error: {e}");
        return Err(e.into());
    }

    Ok(())
}
