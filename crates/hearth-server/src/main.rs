// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Hearth community server binary.

use std::path::PathBuf;

use axum::http::HeaderValue;
use clap::{Parser, Subcommand};
use hearth_community_core::UserId;
use hearth_server::{create_app_state, create_router, issue_token};
use hearth_server_config::{HttpConfig, LogFormat, LoggingConfig, ServerConfig};
use tower_http::{
	cors::{AllowOrigin, Any, CorsLayer},
	trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Hearth server - HTTP API for community membership.
#[derive(Parser, Debug)]
#[command(name = "hearth-server", about = "Hearth community server", version)]
struct Args {
	/// Config file to use instead of /etc/hearth/server.toml
	#[arg(long, value_name = "PATH")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version information
	Version,
	/// Apply database migrations and exit
	Migrate,
	/// Print a bearer token for a user
	IssueToken {
		/// User UUID
		user_id: String,
	},
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("hearth-server version: {}", env!("CARGO_PKG_VERSION"));
		return Ok(());
	}

	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => hearth_server_config::load_config_with_file(path)?,
		None => hearth_server_config::load_config()?,
	};

	if let Some(Command::IssueToken { user_id }) = &args.command {
		let user_id: UserId = user_id.parse()?;
		println!("{}", issue_token(&config.auth.secret, user_id)?);
		return Ok(());
	}

	init_tracing(&config.logging);

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		database = %config.database.url,
		environment = %config.auth.environment,
		"starting hearth-server"
	);

	let pool =
		hearth_server_db::create_pool(&config.database.url, config.database.max_connections).await?;
	hearth_server_db::run_migrations(&pool).await?;

	if let Some(Command::Migrate) = args.command {
		tracing::info!("migrations applied");
		return Ok(());
	}

	serve(config, pool).await
}

fn init_tracing(logging: &LoggingConfig) {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(logging.level.as_filter()));
	let registry = tracing_subscriber::registry().with(filter);

	match logging.format {
		LogFormat::Json => registry
			.with(tracing_subscriber::fmt::layer().json())
			.init(),
		LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
	}
}

fn cors_layer(http: &HttpConfig) -> CorsLayer {
	let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

	if http.cors_origins.iter().any(|o| o == "*") {
		return layer.allow_origin(Any);
	}

	let origins: Vec<HeaderValue> = http
		.cors_origins
		.iter()
		.filter_map(|origin| match HeaderValue::from_str(origin) {
			Ok(value) => Some(value),
			Err(_) => {
				tracing::warn!(%origin, "ignoring invalid CORS origin");
				None
			}
		})
		.collect();
	layer.allow_origin(AllowOrigin::list(origins))
}

async fn serve(
	config: ServerConfig,
	pool: sqlx::SqlitePool,
) -> Result<(), Box<dyn std::error::Error>> {
	let state = create_app_state(pool, &config.auth);
	let app = create_router(state)
		.layer(TraceLayer::new_for_http())
		.layer(cors_layer(&config.http));

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr).await?;

	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	tracing::info!("Server shutdown complete");
	Ok(())
}
