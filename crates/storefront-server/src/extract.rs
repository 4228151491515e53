// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Extractor for the locale chosen by the routing layer.

use std::{convert::Infallible, sync::Arc};

use axum::{
	extract::{FromRef, FromRequestParts},
	http::request::Parts,
};
use serde::Serialize;
use storefront_common_i18n::{LocaleCode, LocaleRegistry};

/// The locale governing the current response.
///
/// Inserted as a request extension by
/// [`LocaleRoutingLayer`](crate::locale_middleware::LocaleRoutingLayer).
/// Requests the layer did not route (excluded paths) fall back to the
/// registry's default locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResolvedLocale(pub LocaleCode);

impl<S> FromRequestParts<S> for ResolvedLocale
where
	S: Send + Sync,
	Arc<LocaleRegistry>: FromRef<S>,
{
	type Rejection = Infallible;

	async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
		if let Some(resolved) = parts.extensions.get::<ResolvedLocale>() {
			return Ok(*resolved);
		}

		let registry: Arc<LocaleRegistry> = FromRef::from_ref(state);
		Ok(ResolvedLocale(registry.default_locale()))
	}
}
