// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Signal extractors.
//!
//! Each extractor turns one raw request or browser fact into a candidate
//! locale. They are total: malformed input yields `None`, never an error and
//! never a locale that is not in the registry.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;
use url::Url;

use crate::locale::{LocaleCode, LocaleRegistry};
use crate::path::split_locale_prefix;
use crate::preference::PreferenceRecord;

const MAX_EVIDENCE_CHARS: usize = 128;

/// Where a piece of locale evidence came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSource {
	PathPrefix,
	PersistedPreference,
	AcceptLanguageHeader,
	Referrer,
	GeoCountry,
	BrowserLanguage,
}

impl fmt::Display for SignalSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			SignalSource::PathPrefix => "path_prefix",
			SignalSource::PersistedPreference => "persisted_preference",
			SignalSource::AcceptLanguageHeader => "accept_language",
			SignalSource::Referrer => "referrer",
			SignalSource::GeoCountry => "geo_country",
			SignalSource::BrowserLanguage => "browser_language",
		};
		f.write_str(name)
	}
}

/// One piece of evidence about which locale is preferred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signal {
	pub source: SignalSource,
	pub locale: Option<LocaleCode>,
	/// Raw input, truncated, kept for diagnostics only.
	pub evidence: String,
}

impl Signal {
	pub fn new(source: SignalSource, locale: Option<LocaleCode>, evidence: &str) -> Self {
		Self {
			source,
			locale,
			evidence: evidence.chars().take(MAX_EVIDENCE_CHARS).collect(),
		}
	}
}

/// A single entry of an `Accept-Language` header.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageRange<'a> {
	pub tag: &'a str,
	pub weight: f32,
}

/// Parse an `Accept-Language` value into ranges ordered by descending weight.
///
/// A missing weight is `1.0`; a malformed or out-of-range weight is `0.0`.
/// Ties keep their header order.
pub fn parse_accept_language(header: &str) -> Vec<LanguageRange<'_>> {
	let mut ranges: Vec<LanguageRange<'_>> = header
		.split(',')
		.filter_map(|entry| {
			let mut parts = entry.split(';');
			let tag = parts.next()?.trim();
			if tag.is_empty() {
				return None;
			}

			let weight = parts
				.filter_map(|param| {
					let (key, value) = param.split_once('=')?;
					key.trim().eq_ignore_ascii_case("q").then(|| value.trim())
				})
				.next()
				.map_or(1.0, parse_weight);

			Some(LanguageRange { tag, weight })
		})
		.collect();

	ranges.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(Ordering::Equal));
	ranges
}

fn parse_weight(raw: &str) -> f32 {
	match raw.parse::<f32>() {
		Ok(w) if w.is_finite() && (0.0..=1.0).contains(&w) => w,
		_ => 0.0,
	}
}

/// Locale named by the first path segment.
pub fn from_path(registry: &LocaleRegistry, path: &str) -> Option<LocaleCode> {
	split_locale_prefix(registry, path).0
}

/// Highest-weighted supported language from an `Accept-Language` header.
pub fn from_accept_language(registry: &LocaleRegistry, header: &str) -> Option<LocaleCode> {
	parse_accept_language(header)
		.into_iter()
		.find_map(|range| registry.match_language_tag(range.tag))
}

/// Locale of a stored preference, if it is still supported.
pub fn from_preference(registry: &LocaleRegistry, record: Option<&PreferenceRecord>) -> Option<LocaleCode> {
	record
		.map(|r| r.locale)
		.filter(|locale| registry.is_supported(*locale))
}

/// Locale whose search engines include the referrer's host.
pub fn from_referrer(registry: &LocaleRegistry, referrer: &str) -> Option<LocaleCode> {
	let url = Url::parse(referrer.trim()).ok()?;
	registry.locale_for_host(url.host_str()?)
}

/// Locale mapped from a two-letter country code.
pub fn from_geo_country(registry: &LocaleRegistry, country_code: &str) -> Option<LocaleCode> {
	registry.locale_for_country(country_code)
}

/// First supported locale in the browser's ordered language list.
pub fn from_browser_languages<S: AsRef<str>>(registry: &LocaleRegistry, languages: &[S]) -> Option<LocaleCode> {
	languages
		.iter()
		.find_map(|lang| registry.match_language_tag(lang.as_ref()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::Utc;
	use proptest::prelude::*;

	fn registry() -> LocaleRegistry {
		LocaleRegistry::builtin()
	}

	#[test]
	fn accept_language_prefers_higher_weight() {
		let r = registry();
		assert_eq!(from_accept_language(&r, "fr;q=0.9,en;q=0.8"), Some(LocaleCode::Fr));
		assert_eq!(from_accept_language(&r, "en;q=0.8,fr;q=0.9"), Some(LocaleCode::Fr));
	}

	#[test]
	fn accept_language_skips_unsupported_tags() {
		let r = registry();
		assert_eq!(from_accept_language(&r, "xx-XX,en;q=0.5"), Some(LocaleCode::En));
		assert_eq!(from_accept_language(&r, "xx-XX"), None);
		assert_eq!(from_accept_language(&r, ""), None);
		assert_eq!(from_accept_language(&r, " , ;q=1"), None);
	}

	#[test]
	fn accept_language_matches_primary_subtag() {
		let r = registry();
		assert_eq!(from_accept_language(&r, "de-AT,en;q=0.1"), Some(LocaleCode::De));
		assert_eq!(from_accept_language(&r, "zh-TW;q=0.9,ja;q=0.8"), Some(LocaleCode::ZhHant));
	}

	#[test]
	fn malformed_weight_sorts_last() {
		let r = registry();
		assert_eq!(from_accept_language(&r, "ru;q=abc,ja;q=0.1"), Some(LocaleCode::Ja));
		assert_eq!(from_accept_language(&r, "ru;q=7,ja;q=0.1"), Some(LocaleCode::Ja));
		assert_eq!(from_accept_language(&r, "ru;q=abc"), Some(LocaleCode::Ru));
	}

	#[test]
	fn parse_accept_language_keeps_order_on_ties() {
		let ranges = parse_accept_language("es, pt ;Q=1.0, de;q=0.5, fr");
		let tags: Vec<_> = ranges.iter().map(|r| r.tag).collect();
		assert_eq!(tags, vec!["es", "pt", "fr", "de"]);
		assert_eq!(ranges[3].weight, 0.5);
	}

	#[test]
	fn referrer_matches_search_engine() {
		let r = registry();
		assert_eq!(
			from_referrer(&r, "https://www.yandex.ru/search/?text=shop"),
			Some(LocaleCode::Ru)
		);
		assert_eq!(from_referrer(&r, "https://www.baidu.com/s?wd=x"), Some(LocaleCode::ZhHans));
		assert_eq!(from_referrer(&r, "https://shop.example.com/"), None);
		assert_eq!(from_referrer(&r, "not a url"), None);
		assert_eq!(from_referrer(&r, ""), None);
	}

	#[test]
	fn geo_country_uses_static_table() {
		let r = registry();
		assert_eq!(from_geo_country(&r, "MX"), Some(LocaleCode::Es));
		assert_eq!(from_geo_country(&r, "jp"), Some(LocaleCode::Ja));
		assert_eq!(from_geo_country(&r, "XX"), None);
	}

	#[test]
	fn browser_languages_scan_in_order() {
		let r = registry();
		assert_eq!(
			from_browser_languages(&r, &["it-IT", "pt-BR", "en-US"]),
			Some(LocaleCode::Pt)
		);
		assert_eq!(from_browser_languages(&r, &["zh-HK"]), Some(LocaleCode::ZhHant));
		assert_eq!(from_browser_languages::<&str>(&r, &[]), None);
	}

	#[test]
	fn preference_is_filtered_by_registry() {
		let r = LocaleRegistry::new(
			vec![crate::BUILTIN_LOCALES[2].clone()],
			crate::BUILTIN_COUNTRIES,
			LocaleCode::En,
		)
		.unwrap();
		let record = PreferenceRecord::explicit(LocaleCode::Ru, Utc::now());
		assert_eq!(from_preference(&r, Some(&record)), None);
		assert_eq!(from_preference(&r, None), None);
	}

	#[test]
	fn signal_evidence_is_truncated() {
		let long = "a".repeat(500);
		let signal = Signal::new(SignalSource::Referrer, None, &long);
		assert_eq!(signal.evidence.len(), MAX_EVIDENCE_CHARS);
	}

	proptest! {
		#[test]
		fn extractors_are_total(input in ".{0,64}") {
			let r = registry();
			let _ = from_path(&r, &input);
			let _ = from_accept_language(&r, &input);
			let _ = from_referrer(&r, &input);
			let _ = from_geo_country(&r, &input);
			let _ = from_browser_languages(&r, &[input.as_str()]);
		}

		#[test]
		fn accept_language_only_returns_supported(header in "[a-zA-Z;=,.0-9 -]{0,40}") {
			let r = registry();
			if let Some(locale) = from_accept_language(&r, &header) {
				prop_assert!(r.is_supported(locale));
			}
		}
	}
}
