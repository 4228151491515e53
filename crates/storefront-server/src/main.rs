// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Storefront server binary.

use std::path::PathBuf;

use axum::{extract::Request, ServiceExt};
use clap::{Parser, Subcommand};
use storefront_server::{create_app_state, create_router, with_locale_routing};
use storefront_server_config::LogFormat;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod version;

/// Storefront server - locale-aware HTTP server for the storefront.
#[derive(Parser, Debug)]
#[command(name = "storefront-server", about = "Storefront HTTP server", version)]
struct Args {
	/// Config file to load instead of /etc/storefront/server.toml
	#[arg(long, env = "STOREFRONT_SERVER_CONFIG")]
	config: Option<PathBuf>,

	/// Subcommands for storefront-server (e.g., `version`)
	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version and build information
	Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	// Load .env file if present
	dotenvy::dotenv().ok();

	let config = match args.config {
		Some(path) => storefront_server_config::load_config_with_file(path)?,
		None => storefront_server_config::load_config()?,
	};

	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| config.logging.level.clone().into());
	let registry = tracing_subscriber::registry().with(filter);
	match config.logging.format {
		LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
		LogFormat::Plain => registry.with(tracing_subscriber::fmt::layer()).init(),
	}

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		default_locale = %config.locale.default_locale,
		"starting storefront-server"
	);

	let state = create_app_state(&config)?;
	let router = create_router(state.clone()).layer(TraceLayer::new_for_http());
	let app = with_locale_routing(&state, router);

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr).await?;

	tokio::select! {
		result = axum::serve(listener, ServiceExt::<Request>::into_make_service(app)) => {
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
