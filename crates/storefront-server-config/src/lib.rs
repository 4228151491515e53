// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration management for the storefront server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`STOREFRONT_SERVER_*`)
//!
//! # Usage
//!
//! ```ignore
//! use storefront_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Server listening on {}", config.socket_addr());
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub logging: LoggingConfig,
	pub locale: LocaleConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`STOREFRONT_SERVER_*`)
/// 2. Config file (`/etc/storefront/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<ServerConfig, ConfigError> {
	let mut merged = ServerConfigLayer::default();
	merged.merge(EnvSource.load()?);
	finalize(merged)
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
pub fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();
	let locale = layer.locale.unwrap_or_default().finalize()?;

	validate_config(&http, &locale)?;

	info!(
		host = %http.host,
		port = http.port,
		log_format = ?logging.format,
		default_locale = %locale.default_locale,
		cookie_name = %locale.cookie_name,
		geo_country_header = %locale.geo_country_header,
		excluded_prefixes = locale.excluded_prefixes.len(),
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		logging,
		locale,
	})
}

/// Validate cross-field configuration rules.
fn validate_config(http: &HttpConfig, locale: &LocaleConfig) -> Result<(), ConfigError> {
	if http.port == 0 {
		return Err(ConfigError::Validation(
			"STOREFRONT_SERVER_PORT must not be 0".to_string(),
		));
	}

	if !is_cookie_token(&locale.cookie_name) {
		return Err(ConfigError::Validation(format!(
			"locale cookie name '{}' is not a valid cookie token",
			locale.cookie_name
		)));
	}

	if locale.cookie_max_age_secs == 0 {
		return Err(ConfigError::Validation(
			"locale cookie max age must be positive".to_string(),
		));
	}

	if locale.geo_country_header.is_empty()
		|| !locale
			.geo_country_header
			.bytes()
			.all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
	{
		return Err(ConfigError::Validation(format!(
			"geo country header '{}' is not a valid header name",
			locale.geo_country_header
		)));
	}

	Ok(())
}

fn is_cookie_token(name: &str) -> bool {
	!name.is_empty()
		&& name
			.bytes()
			.all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use std::io::Write;
	use storefront_common_i18n::LocaleCode;

	#[test]
	fn test_socket_addr() {
		let config = ServerConfig {
			http: HttpConfig {
				host: "127.0.0.1".to_string(),
				port: 9000,
			},
			..Default::default()
		};
		assert_eq!(config.socket_addr(), "127.0.0.1:9000");
	}

	#[test]
	fn test_finalize_empty_layer_uses_defaults() {
		let config = finalize(ServerConfigLayer::default()).unwrap();
		assert_eq!(config.http.port, 3000);
		assert_eq!(config.locale.default_locale, LocaleCode::En);
		assert_eq!(config.locale.cookie_name, "locale");
	}

	#[test]
	fn test_zero_port_is_rejected() {
		let layer = ServerConfigLayer {
			http: Some(HttpConfigLayer {
				port: Some(0),
				..Default::default()
			}),
			..Default::default()
		};
		assert!(matches!(finalize(layer), Err(ConfigError::Validation(_))));
	}

	#[test]
	fn test_bad_cookie_name_is_rejected() {
		let layer = ServerConfigLayer {
			locale: Some(LocaleConfigLayer {
				cookie_name: Some("my locale;".to_string()),
				..Default::default()
			}),
			..Default::default()
		};
		let err = finalize(layer).unwrap_err();
		assert!(err.to_string().contains("cookie token"));
	}

	#[test]
	fn test_load_config_with_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(
			file,
			"[http]\nhost = \"127.0.0.1\"\nport = 4100\n\n[locale]\ndefault_locale = \"fr\"\ncookie_name = \"shop_locale\""
		)
		.unwrap();

		let config = load_config_with_file(file.path()).unwrap();
		assert_eq!(config.locale.cookie_name, "shop_locale");
		assert_eq!(config.locale.default_locale, LocaleCode::Fr);
	}

	proptest! {
		#[test]
		fn cookie_token_rejects_separators(name in "[a-z]{1,8}[ ;,=\"][a-z]{0,8}") {
			prop_assert!(!is_cookie_token(&name));
		}

		#[test]
		fn cookie_token_accepts_plain_names(name in "[A-Za-z0-9_.-]{1,16}") {
			prop_assert!(is_cookie_token(&name));
		}
	}
}
