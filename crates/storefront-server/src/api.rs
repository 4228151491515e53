// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Application state and router construction.

use std::sync::Arc;

use axum::{extract::FromRef, routing::get, Router};
use http::header::HeaderName;
use storefront_common_i18n::{LocaleCookies, LocaleRegistry};
use storefront_server_config::ServerConfig;
use tower::Layer;

use crate::{
	error::ServerError,
	locale_middleware::{LocaleRoutingLayer, LocaleRoutingService},
	routes,
	routing::{ExcludedPaths, LocaleRouter},
};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
	pub registry: Arc<LocaleRegistry>,
	pub router: Arc<LocaleRouter>,
	pub cookies: LocaleCookies,
	pub geo_header: HeaderName,
}

impl FromRef<AppState> for Arc<LocaleRegistry> {
	fn from_ref(state: &AppState) -> Self {
		state.registry.clone()
	}
}

/// Build application state from resolved configuration.
pub fn create_app_state(config: &ServerConfig) -> Result<AppState, ServerError> {
	let locale = &config.locale;

	let registry = Arc::new(LocaleRegistry::builtin().with_default(locale.default_locale)?);
	let router = Arc::new(LocaleRouter::new(
		registry.clone(),
		ExcludedPaths::new(locale.excluded_prefixes.iter().cloned()),
	));
	let geo_header =
		HeaderName::from_bytes(locale.geo_country_header.as_bytes()).map_err(|e| ServerError::GeoHeader {
			name: locale.geo_country_header.clone(),
			source: e,
		})?;

	tracing::debug!(
		default_locale = %registry.default_locale(),
		locales = registry.descriptors().len(),
		"locale registry ready"
	);

	Ok(AppState {
		registry,
		router,
		cookies: LocaleCookies::new(locale.cookie_name.clone(), locale.cookie_max_age_secs),
		geo_header,
	})
}

/// Routes, without locale routing applied.
pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/api/health", get(routes::health::health_check))
		.route("/api/locales", get(routes::locales::list_locales))
		.route("/", get(routes::pages::home))
		.route("/products", get(routes::pages::product_list))
		.route("/products/{slug}", get(routes::pages::product_detail))
		.route("/cart", get(routes::pages::cart))
		.fallback(routes::pages::not_found)
		.with_state(state)
}

/// Wrap `router` in the locale routing layer configured by `state`.
pub fn with_locale_routing(state: &AppState, router: Router) -> LocaleRoutingService<Router> {
	LocaleRoutingLayer::new(state.router.clone(), state.cookies.clone(), state.geo_header.clone()).layer(router)
}

/// The complete application: routes behind locale routing.
pub fn create_app(state: AppState) -> LocaleRoutingService<Router> {
	let router = create_router(state.clone());
	with_locale_routing(&state, router)
}
