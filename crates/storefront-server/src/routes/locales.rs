// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Supported-locale listing for the locale switcher.

use axum::{
	extract::{Query, State},
	Json,
};
use serde::{Deserialize, Serialize};
use storefront_common_i18n::{switch_targets, LocaleCode, LocaleDescriptor};

use crate::api::AppState;

#[derive(Debug, Deserialize)]
pub struct LocalesQuery {
	/// Page path the switcher is rendered on. When given, each locale is
	/// paired with the path selecting it navigates to.
	pub path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LocalesResponse {
	pub default_locale: LocaleCode,
	pub locales: Vec<LocaleDescriptor>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub switch_targets: Option<Vec<SwitchTargetEntry>>,
}

#[derive(Debug, Serialize)]
pub struct SwitchTargetEntry {
	pub locale: LocaleCode,
	pub badge: &'static str,
	pub path: String,
}

/// GET /api/locales - List supported locales.
pub async fn list_locales(
	State(state): State<AppState>,
	Query(query): Query<LocalesQuery>,
) -> Json<LocalesResponse> {
	let registry = &state.registry;

	let switch_targets = query
		.path
		.filter(|p| p.starts_with('/'))
		.map(|path| {
			switch_targets(registry, &path)
				.into_iter()
				.map(|target| SwitchTargetEntry {
					locale: target.descriptor.code,
					badge: target.descriptor.badge,
					path: target.path,
				})
				.collect()
		});

	Json(LocalesResponse {
		default_locale: registry.default_locale(),
		locales: registry.descriptors().to_vec(),
		switch_targets,
	})
}
