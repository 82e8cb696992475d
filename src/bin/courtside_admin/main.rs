// ABOUTME: Administrative CLI for bootstrapping organizations and coaches and issuing tokens
// ABOUTME: Operates directly on the database; token issuing needs the server's JWT secret
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

//! # Courtside Admin
//!
//! ```bash
//! courtside-admin create-org --name "Riverside Youth Basketball" --id riverside
//! courtside-admin create-coach --auth-uid idp|123 --email a@b.org --org riverside --admin
//! courtside-admin issue-token --auth-uid idp|123
//! ```

mod commands;

use std::env;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;

use courtside_server::{
    config::{LogFormat, LoggingConfig, DEFAULT_DATABASE_URL},
    database::Database,
    errors::AppResult,
    logging,
};

#[derive(Parser)]
#[command(
    name = "courtside-admin",
    about = "Courtside administration",
    long_about = "Bootstrap organizations and coaches, and issue development tokens"
)]
struct Cli {
    /// Database URL override (defaults to `DATABASE_URL`)
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an organization
    CreateOrg {
        /// Display name
        #[arg(long)]
        name: String,
        /// Explicit identifier; generated when omitted
        #[arg(long)]
        id: Option<String>,
    },
    /// Create a coach linked to an external identity
    CreateCoach {
        /// External identity provider user id
        #[arg(long)]
        auth_uid: String,
        /// Contact email
        #[arg(long)]
        email: String,
        /// Given name
        #[arg(long, default_value = "")]
        first_name: String,
        /// Family name
        #[arg(long, default_value = "")]
        last_name: String,
        /// Organization to join
        #[arg(long)]
        org: Option<String>,
        /// Grant organization administrator
        #[arg(long)]
        admin: bool,
        /// Grant platform administrator
        #[arg(long)]
        superadmin: bool,
    },
    /// Issue a signed token for an existing coach
    IssueToken {
        /// External identity of the coach
        #[arg(long)]
        auth_uid: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let logging_config = LoggingConfig {
        level: if cli.verbose { "debug" } else { "warn" }.to_owned(),
        format: LogFormat::Compact,
    };
    if let Err(e) = logging::init(&logging_config) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let database_url = cli
        .database_url
        .or_else(|| env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned());
    let database = Database::new(&database_url, 1).await?;

    match cli.command {
        Command::CreateOrg { name, id } => {
            commands::organization::create(&database, &name, id.as_deref()).await
        }
        Command::CreateCoach {
            auth_uid,
            email,
            first_name,
            last_name,
            org,
            admin,
            superadmin,
        } => {
            let request = courtside_server::database::CreateCoachRequest {
                auth_uid,
                email,
                first_name,
                last_name,
                org_id: org,
                is_admin: admin,
                is_superadmin: superadmin,
            };
            commands::coach::create(&database, &request).await
        }
        Command::IssueToken { auth_uid } => commands::token::issue(&database, &auth_uid).await,
    }
}
