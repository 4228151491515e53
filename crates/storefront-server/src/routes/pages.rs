// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Storefront page handlers.
//!
//! These are served at de-prefixed paths after locale routing. Rendering is
//! left to the frontend; each page reports which locale governs it.

use axum::{
	extract::Path,
	http::{StatusCode, Uri},
	response::IntoResponse,
	Json,
};
use serde::Serialize;

use crate::extract::ResolvedLocale;

#[derive(Debug, Serialize)]
pub struct PageResponse {
	pub page: &'static str,
	pub locale: ResolvedLocale,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub slug: Option<String>,
}

fn page(name: &'static str, locale: ResolvedLocale, slug: Option<String>) -> Json<PageResponse> {
	Json(PageResponse {
		page: name,
		locale,
		slug,
	})
}

/// GET /
pub async fn home(locale: ResolvedLocale) -> Json<PageResponse> {
	page("home", locale, None)
}

/// GET /products
pub async fn product_list(locale: ResolvedLocale) -> Json<PageResponse> {
	page("products", locale, None)
}

/// GET /products/{slug}
pub async fn product_detail(locale: ResolvedLocale, Path(slug): Path<String>) -> Json<PageResponse> {
	page("product", locale, Some(slug))
}

/// GET /cart
pub async fn cart(locale: ResolvedLocale) -> Json<PageResponse> {
	page("cart", locale, None)
}

#[derive(Debug, Serialize)]
pub struct NotFoundResponse {
	pub error: &'static str,
	pub path: String,
	pub locale: ResolvedLocale,
}

pub async fn not_found(locale: ResolvedLocale, uri: Uri) -> impl IntoResponse {
	(
		StatusCode::NOT_FOUND,
		Json(NotFoundResponse {
			error: "not_found",
			path: uri.path().to_string(),
			locale,
		}),
	)
}
