// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Tower layer applying locale routing to every inbound request.
//!
//! The layer wraps the whole router, so it sees the original URI before
//! route matching:
//!
//! - prefixed page paths are rewritten in place (`/ru/products` is served by
//!   the `/products` route) and tagged with a [`ResolvedLocale`] extension
//! - unprefixed page paths get a `307 Temporary Redirect` to their
//!   locale-qualified form, query string kept
//! - excluded paths are passed to the router untouched
//!
//! Routed responses carry the locale cookies.
//!
//! # Example
//!
//! ```ignore
//! let app = LocaleRoutingLayer::new(router, cookies, geo_header).layer(create_router(state));
//! axum::serve(listener, axum::ServiceExt::<Request>::into_make_service(app)).await?;
//! ```

use std::{
	future::Future,
	pin::Pin,
	sync::Arc,
	task::{ready, Context, Poll},
};

use axum::{
	body::Body,
	http::{
		header::{self, HeaderName},
		uri::PathAndQuery,
		HeaderMap, HeaderValue, Request, Uri,
	},
	response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use pin_project_lite::pin_project;
use storefront_common_i18n::{load_preference, LocaleCookies, PreferenceStore};
use tower::{Layer, Service};

use crate::cookie_store::CookiePreferences;
use crate::extract::ResolvedLocale;
use crate::routing::{LocaleRouter, RequestSignals, RouteAction};

/// Layer that routes requests by locale. See the module docs.
#[derive(Clone)]
pub struct LocaleRoutingLayer {
	router: Arc<LocaleRouter>,
	cookies: LocaleCookies,
	geo_header: HeaderName,
}

impl LocaleRoutingLayer {
	pub fn new(router: Arc<LocaleRouter>, cookies: LocaleCookies, geo_header: HeaderName) -> Self {
		Self {
			router,
			cookies,
			geo_header,
		}
	}
}

impl<S> Layer<S> for LocaleRoutingLayer {
	type Service = LocaleRoutingService<S>;

	fn layer(&self, inner: S) -> Self::Service {
		LocaleRoutingService {
			inner,
			router: self.router.clone(),
			cookies: self.cookies.clone(),
			geo_header: self.geo_header.clone(),
		}
	}
}

/// Service wrapper for [`LocaleRoutingLayer`].
#[derive(Clone)]
pub struct LocaleRoutingService<S> {
	inner: S,
	router: Arc<LocaleRouter>,
	cookies: LocaleCookies,
	geo_header: HeaderName,
}

impl<S> Service<Request<Body>> for LocaleRoutingService<S>
where
	S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
	S::Future: Send,
{
	type Response = Response;
	type Error = S::Error;
	type Future = LocaleRoutingFuture<S::Future>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, mut req: Request<Body>) -> Self::Future {
		let path = req.uri().path().to_string();

		if self.router.is_excluded(&path) {
			return LocaleRoutingFuture::Inner {
				fut: self.inner.call(req),
				set_cookies: Vec::new(),
			};
		}

		let headers = req.headers();
		let mut store = CookiePreferences::from_headers(self.router.registry(), self.cookies.clone(), headers);
		let existing = load_preference(&store);
		let signals = RequestSignals {
			preference: existing.as_ref(),
			accept_language: header_str(headers, &header::ACCEPT_LANGUAGE),
			referrer: header_str(headers, &header::REFERER),
			country: header_str(headers, &self.geo_header),
		};

		let decision = self.router.decide(&path, &signals, Utc::now());

		if let Some(record) = decision.persist {
			if let Err(e) = store.save(&record) {
				tracing::warn!(error = %e, "failed to encode locale cookies");
			}
		}
		let set_cookies = store.into_set_cookies();

		match decision.action {
			RouteAction::PassThrough => LocaleRoutingFuture::Inner {
				fut: self.inner.call(req),
				set_cookies,
			},
			RouteAction::ExternalRedirect => {
				let location = with_query(&decision.target_path, req.uri());
				tracing::debug!(from = %path, to = %location, "redirecting to locale-prefixed path");

				let mut resp = Redirect::temporary(&location).into_response();
				append_cookies(resp.headers_mut(), set_cookies);
				LocaleRoutingFuture::Redirect { resp: Some(resp) }
			}
			RouteAction::InternalRewrite => {
				match rewrite_uri(req.uri(), &decision.target_path) {
					Some(uri) => {
						tracing::debug!(from = %path, to = %decision.target_path, "rewriting locale-prefixed path");
						*req.uri_mut() = uri;
					}
					None => {
						tracing::warn!(path = %path, "could not rewrite locale-prefixed path");
					}
				}
				if let Some(locale) = decision.locale {
					req.extensions_mut().insert(ResolvedLocale(locale));
				}

				LocaleRoutingFuture::Inner {
					fut: self.inner.call(req),
					set_cookies,
				}
			}
		}
	}
}

pin_project! {
	/// Future for [`LocaleRoutingService`].
	#[project = LocaleRoutingFutureProj]
	pub enum LocaleRoutingFuture<F> {
		Inner { #[pin] fut: F, set_cookies: Vec<HeaderValue> },
		Redirect { resp: Option<Response> },
	}
}

impl<F, E> Future for LocaleRoutingFuture<F>
where
	F: Future<Output = Result<Response, E>>,
{
	type Output = Result<Response, E>;

	fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		match self.project() {
			LocaleRoutingFutureProj::Inner { fut, set_cookies } => {
				let mut resp = ready!(fut.poll(cx))?;
				append_cookies(resp.headers_mut(), std::mem::take(set_cookies));
				Poll::Ready(Ok(resp))
			}
			LocaleRoutingFutureProj::Redirect { resp } => {
				Poll::Ready(Ok(resp.take().expect("polled after completion")))
			}
		}
	}
}

fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
	headers
		.get(name)
		.and_then(|v| v.to_str().ok())
		.map(str::trim)
		.filter(|v| !v.is_empty())
}

fn append_cookies(headers: &mut HeaderMap, values: Vec<HeaderValue>) {
	for value in values {
		headers.append(header::SET_COOKIE, value);
	}
}

fn with_query(path: &str, uri: &Uri) -> String {
	match uri.query() {
		Some(query) => format!("{path}?{query}"),
		None => path.to_string(),
	}
}

/// Replace the path of `uri`, keeping scheme, authority and query.
fn rewrite_uri(uri: &Uri, path: &str) -> Option<Uri> {
	let path_and_query: PathAndQuery = with_query(path, uri).parse().ok()?;
	let mut parts = uri.clone().into_parts();
	parts.path_and_query = Some(path_and_query);
	Uri::from_parts(parts).ok()
}
