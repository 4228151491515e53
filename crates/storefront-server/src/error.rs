// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Server startup errors.
//!
//! Request handling never fails on locale grounds; these errors only surface
//! while building application state or binding the listener.

use http::header::InvalidHeaderName;
use storefront_common_i18n::RegistryError;
use storefront_server_config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
	#[error("configuration error: {0}")]
	Config(#[from] ConfigError),

	#[error("locale registry error: {0}")]
	Registry(#[from] RegistryError),

	#[error("invalid geo country header name '{name}': {source}")]
	GeoHeader {
		name: String,
		#[source]
		source: InvalidHeaderName,
	},

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}
