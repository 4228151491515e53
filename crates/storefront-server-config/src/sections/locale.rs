// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Locale routing configuration.

use serde::Deserialize;
use storefront_common_i18n::{LocaleCode, DEFAULT_LOCALE, LOCALE_COOKIE_MAX_AGE_SECS, LOCALE_COOKIE_NAME};

use crate::error::ConfigError;

/// Upstream header carrying the visitor's two-letter country code.
pub const DEFAULT_GEO_COUNTRY_HEADER: &str = "x-country-code";

/// Path prefixes that never take part in locale routing.
pub const DEFAULT_EXCLUDED_PREFIXES: &[&str] = &["/api", "/_next", "/static", "/assets", "/favicon", "/.well-known"];

/// Locale configuration (runtime, fully resolved).
#[derive(Debug, Clone, PartialEq)]
pub struct LocaleConfig {
	pub default_locale: LocaleCode,
	pub cookie_name: String,
	pub cookie_max_age_secs: u64,
	pub geo_country_header: String,
	pub excluded_prefixes: Vec<String>,
}

impl Default for LocaleConfig {
	fn default() -> Self {
		Self {
			default_locale: DEFAULT_LOCALE,
			cookie_name: LOCALE_COOKIE_NAME.to_string(),
			cookie_max_age_secs: LOCALE_COOKIE_MAX_AGE_SECS,
			geo_country_header: DEFAULT_GEO_COUNTRY_HEADER.to_string(),
			excluded_prefixes: DEFAULT_EXCLUDED_PREFIXES.iter().map(|p| p.to_string()).collect(),
		}
	}
}

/// Locale configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct LocaleConfigLayer {
	#[serde(default)]
	pub default_locale: Option<String>,
	#[serde(default)]
	pub cookie_name: Option<String>,
	#[serde(default)]
	pub cookie_max_age_secs: Option<u64>,
	#[serde(default)]
	pub geo_country_header: Option<String>,
	#[serde(default)]
	pub excluded_prefixes: Option<Vec<String>>,
}

impl LocaleConfigLayer {
	pub fn merge(&mut self, other: LocaleConfigLayer) {
		if other.default_locale.is_some() {
			self.default_locale = other.default_locale;
		}
		if other.cookie_name.is_some() {
			self.cookie_name = other.cookie_name;
		}
		if other.cookie_max_age_secs.is_some() {
			self.cookie_max_age_secs = other.cookie_max_age_secs;
		}
		if other.geo_country_header.is_some() {
			self.geo_country_header = other.geo_country_header;
		}
		if other.excluded_prefixes.is_some() {
			self.excluded_prefixes = other.excluded_prefixes;
		}
	}

	pub fn finalize(self) -> Result<LocaleConfig, ConfigError> {
		let defaults = LocaleConfig::default();

		let default_locale = match self.default_locale {
			Some(code) => code.parse::<LocaleCode>().map_err(|e| ConfigError::InvalidValue {
				key: "locale.default_locale".to_string(),
				message: e.to_string(),
			})?,
			None => defaults.default_locale,
		};

		let excluded_prefixes = self
			.excluded_prefixes
			.map(|prefixes| prefixes.into_iter().map(normalize_prefix).filter(|p| p != "/").collect())
			.unwrap_or(defaults.excluded_prefixes);

		Ok(LocaleConfig {
			default_locale,
			cookie_name: self.cookie_name.unwrap_or(defaults.cookie_name),
			cookie_max_age_secs: self.cookie_max_age_secs.unwrap_or(defaults.cookie_max_age_secs),
			geo_country_header: self
				.geo_country_header
				.map(|h| h.trim().to_ascii_lowercase())
				.unwrap_or(defaults.geo_country_header),
			excluded_prefixes,
		})
	}
}

/// `api/` and `/api/` both become `/api`.
fn normalize_prefix(prefix: String) -> String {
	let trimmed = prefix.trim().trim_matches('/');
	format!("/{trimmed}")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let config = LocaleConfigLayer::default().finalize().unwrap();
		assert_eq!(config.default_locale, LocaleCode::En);
		assert_eq!(config.cookie_name, "locale");
		assert_eq!(config.cookie_max_age_secs, 31_536_000);
		assert_eq!(config.geo_country_header, "x-country-code");
		assert!(config.excluded_prefixes.iter().any(|p| p == "/api"));
	}

	#[test]
	fn test_invalid_default_locale_is_rejected() {
		let layer = LocaleConfigLayer {
			default_locale: Some("klingon".to_string()),
			..Default::default()
		};
		let err = layer.finalize().unwrap_err();
		assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "locale.default_locale"));
	}

	#[test]
	fn test_prefixes_are_normalized() {
		let layer = LocaleConfigLayer {
			excluded_prefixes: Some(vec!["api/".to_string(), " /media/ ".to_string(), "/".to_string()]),
			..Default::default()
		};
		let config = layer.finalize().unwrap();
		assert_eq!(config.excluded_prefixes, vec!["/api".to_string(), "/media".to_string()]);
	}

	#[test]
	fn test_merge_overwrites() {
		let mut base = LocaleConfigLayer {
			default_locale: Some("en".to_string()),
			cookie_name: Some("locale".to_string()),
			..Default::default()
		};
		base.merge(LocaleConfigLayer {
			default_locale: Some("zh-Hans".to_string()),
			..Default::default()
		});
		let config = base.finalize().unwrap();
		assert_eq!(config.default_locale, LocaleCode::ZhHans);
		assert_eq!(config.cookie_name, "locale");
	}

	#[test]
	fn test_deserialize_empty() {
		let layer: LocaleConfigLayer = toml::from_str("").unwrap();
		assert_eq!(layer, LocaleConfigLayer::default());
	}
}
