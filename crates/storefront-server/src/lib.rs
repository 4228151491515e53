// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Storefront HTTP server.
//!
//! Every page request passes through [`LocaleRoutingLayer`], which decides
//! per request whether to rewrite a locale-prefixed path, redirect an
//! unprefixed one, or leave API and asset traffic alone. Page handlers read
//! the outcome through the [`ResolvedLocale`] extractor.

pub mod api;
pub mod cookie_store;
pub mod error;
pub mod extract;
pub mod locale_middleware;
pub mod routes;
pub mod routing;

pub use api::{create_app, create_app_state, create_router, with_locale_routing, AppState};
pub use cookie_store::CookiePreferences;
pub use error::ServerError;
pub use extract::ResolvedLocale;
pub use locale_middleware::{LocaleRoutingLayer, LocaleRoutingService};
pub use routing::{ExcludedPaths, LocaleRouter, RequestSignals, RouteAction, RoutingDecision};
pub use storefront_server_config::ServerConfig;
