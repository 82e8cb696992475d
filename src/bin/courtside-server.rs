// ABOUTME: Server binary: loads configuration, opens the database, and serves the HTTP API
// ABOUTME: Command line flags override the environment for port, host, and database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

//! # Courtside Server
//!
//! Environment variables configure the server (see `config::environment`);
//! the flags below take precedence.
//!
//! ```bash
//! AUTH_JWT_SECRET=... courtside-server --port 8081 --database-url sqlite:./data/courtside.db
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use courtside_server::{
    config::ServerConfig, database::Database, errors::AppResult, logging,
    resources::ServerResources, server,
};

#[derive(Parser)]
#[command(
    name = "courtside-server",
    about = "Courtside player development API server",
    long_about = "Serve the Courtside coaching API. Configuration comes from environment \
                  variables; flags override them."
)]
struct Args {
    /// HTTP port override
    #[arg(long)]
    port: Option<u16>,

    /// Bind host override
    #[arg(long)]
    host: Option<String>,

    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load_config(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(&config.logging) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Server failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: Args) -> AppResult<ServerConfig> {
    let mut config = ServerConfig::from_env()?;
    if let Some(port) = args.port {
        config.http_port = port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(url) = args.database_url {
        config.database.url = url;
    }
    config.validate()?;
    Ok(config)
}

async fn run(config: ServerConfig) -> AppResult<()> {
    info!(
        "Starting courtside-server v{} on {}",
        env!("CARGO_PKG_VERSION"),
        config.bind_address()
    );
    let config = Arc::new(config);
    let database = Database::new(&config.database.url, config.database.max_connections).await?;
    let resources = Arc::new(ServerResources::new(database, config));
    server::serve(resources).await
}
