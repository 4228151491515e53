// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Per-request locale routing decisions.
//!
//! A request path is in one of two states:
//!
//! - **HasPrefix** (`/ru/products`): rewritten internally to `/products`.
//!   Never redirected.
//! - **NoPrefix** (`/products`): redirected once to a locale-qualified path
//!   chosen by the resolution policy, the default locale included.
//!
//! Excluded paths (API, build assets, anything with a file extension) bypass
//! both states. [`LocaleRouter::decide`] is pure; the tower layer in
//! [`crate::locale_middleware`] applies its result.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use storefront_common_i18n::{
	resolve, split_locale_prefix, with_locale_prefix, LocaleCode, LocaleRegistry, PreferenceRecord,
	ResolutionInput,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAction {
	PassThrough,
	InternalRewrite,
	ExternalRedirect,
}

/// Outcome of routing a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingDecision {
	pub action: RouteAction,
	/// Path to serve (rewrite) or to send the client to (redirect).
	pub target_path: String,
	/// Locale governing the response. `None` for pass-through.
	pub locale: Option<LocaleCode>,
	/// Record to write back to the preference cookies.
	pub persist: Option<PreferenceRecord>,
}

impl RoutingDecision {
	fn pass_through(path: &str) -> Self {
		Self {
			action: RouteAction::PassThrough,
			target_path: path.to_string(),
			locale: None,
			persist: None,
		}
	}
}

/// Raw request facts the router consults.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSignals<'a> {
	pub preference: Option<&'a PreferenceRecord>,
	pub accept_language: Option<&'a str>,
	pub referrer: Option<&'a str>,
	pub country: Option<&'a str>,
}

/// Paths that never take part in locale routing.
#[derive(Debug, Clone)]
pub struct ExcludedPaths {
	prefixes: Vec<String>,
}

impl ExcludedPaths {
	pub fn new<I, S>(prefixes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			prefixes: prefixes.into_iter().map(Into::into).collect(),
		}
	}

	/// `true` for paths under a configured prefix (on a segment boundary) and
	/// for paths whose last segment carries a file extension.
	pub fn is_excluded(&self, path: &str) -> bool {
		let under_prefix = self.prefixes.iter().any(|prefix| {
			path.strip_prefix(prefix.as_str())
				.is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
		});
		under_prefix || has_file_extension(path)
	}
}

fn has_file_extension(path: &str) -> bool {
	let last = path.rsplit('/').next().unwrap_or_default();
	match last.rfind('.') {
		Some(idx) => idx + 1 < last.len(),
		None => false,
	}
}

/// Decides rewrite, redirect or pass-through for request paths.
#[derive(Debug, Clone)]
pub struct LocaleRouter {
	registry: Arc<LocaleRegistry>,
	excluded: ExcludedPaths,
}

impl LocaleRouter {
	pub fn new(registry: Arc<LocaleRegistry>, excluded: ExcludedPaths) -> Self {
		Self { registry, excluded }
	}

	pub fn registry(&self) -> &Arc<LocaleRegistry> {
		&self.registry
	}

	pub fn is_excluded(&self, path: &str) -> bool {
		self.excluded.is_excluded(path)
	}

	#[tracing::instrument(level = "debug", skip(self, signals, now), fields(action, locale))]
	pub fn decide(&self, path: &str, signals: &RequestSignals<'_>, now: DateTime<Utc>) -> RoutingDecision {
		if self.excluded.is_excluded(path) {
			tracing::Span::current().record("action", "pass_through");
			return RoutingDecision::pass_through(path);
		}

		let existing = signals.preference.filter(|p| self.registry.is_supported(p.locale));

		let decision = match split_locale_prefix(&self.registry, path) {
			(Some(locale), rest) => RoutingDecision {
				action: RouteAction::InternalRewrite,
				target_path: rest.to_string(),
				locale: Some(locale),
				persist: Some(record_for_prefixed(existing, locale, now)),
			},
			(None, _) => {
				let input = ResolutionInput {
					preference: existing,
					referrer: signals.referrer,
					accept_language: signals.accept_language,
					country: signals.country,
				};
				let resolution = resolve(&self.registry, &input);
				tracing::debug!(
					resolved_from = ?resolution.resolved_from,
					signals = ?resolution.signals,
					"resolved locale for unprefixed path"
				);

				// A valid stored record always wins, so it is kept as is.
				let persist = match existing {
					Some(record) if record.locale == resolution.locale => *record,
					_ => PreferenceRecord::implicit(resolution.locale, now),
				};

				RoutingDecision {
					action: RouteAction::ExternalRedirect,
					target_path: with_locale_prefix(&self.registry, path, resolution.locale),
					locale: Some(resolution.locale),
					persist: Some(persist),
				}
			}
		};

		let span = tracing::Span::current();
		span.record("action", tracing::field::debug(decision.action));
		if let Some(locale) = decision.locale {
			span.record("locale", locale.as_str());
		}
		decision
	}
}

/// The record written when a prefixed path is served. Explicitness is never
/// downgraded, and an unchanged record keeps its timestamp.
fn record_for_prefixed(
	existing: Option<&PreferenceRecord>,
	locale: LocaleCode,
	now: DateTime<Utc>,
) -> PreferenceRecord {
	match existing {
		Some(record) if record.locale == locale => *record,
		Some(record) => PreferenceRecord {
			locale,
			set_explicitly: record.set_explicitly,
			set_at: now,
		},
		None => PreferenceRecord::implicit(locale, now),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::{Duration, TimeZone};
	use proptest::prelude::*;
	use storefront_server_config::DEFAULT_EXCLUDED_PREFIXES;

	fn router() -> LocaleRouter {
		LocaleRouter::new(
			Arc::new(LocaleRegistry::builtin()),
			ExcludedPaths::new(DEFAULT_EXCLUDED_PREFIXES.iter().copied()),
		)
	}

	fn now() -> DateTime<Utc> {
		Utc.timestamp_millis_opt(1_750_000_000_000).unwrap()
	}

	#[test]
	fn unprefixed_path_redirects_with_header_locale() {
		let signals = RequestSignals {
			accept_language: Some("ru;q=1.0"),
			..Default::default()
		};
		let decision = router().decide("/products", &signals, now());
		assert_eq!(decision.action, RouteAction::ExternalRedirect);
		assert_eq!(decision.target_path, "/ru/products");
		assert_eq!(decision.persist, Some(PreferenceRecord::implicit(LocaleCode::Ru, now())));
	}

	#[test]
	fn prefixed_path_is_rewritten_not_redirected() {
		let existing = PreferenceRecord::implicit(LocaleCode::Ru, now() - Duration::hours(1));
		let signals = RequestSignals {
			preference: Some(&existing),
			accept_language: Some("de"),
			..Default::default()
		};
		let decision = router().decide("/ru/products", &signals, now());
		assert_eq!(decision.action, RouteAction::InternalRewrite);
		assert_eq!(decision.target_path, "/products");
		assert_eq!(decision.locale, Some(LocaleCode::Ru));
		assert_eq!(decision.persist, Some(existing));
	}

	#[test]
	fn rewrite_never_downgrades_explicit_record() {
		let existing = PreferenceRecord::explicit(LocaleCode::Ja, now() - Duration::days(2));
		let signals = RequestSignals {
			preference: Some(&existing),
			..Default::default()
		};
		let decision = router().decide("/fr/cart", &signals, now());
		let persisted = decision.persist.unwrap();
		assert_eq!(persisted.locale, LocaleCode::Fr);
		assert!(persisted.set_explicitly);
		assert_eq!(persisted.set_at, now());
	}

	#[test]
	fn root_redirects_to_default_locale_root() {
		let decision = router().decide("/", &RequestSignals::default(), now());
		assert_eq!(decision.action, RouteAction::ExternalRedirect);
		assert_eq!(decision.target_path, "/en");

		let decision = router().decide("/en", &RequestSignals::default(), now());
		assert_eq!(decision.action, RouteAction::InternalRewrite);
		assert_eq!(decision.target_path, "/");
	}

	#[test]
	fn explicit_cookie_beats_header_on_redirect() {
		let existing = PreferenceRecord::explicit(LocaleCode::De, now() - Duration::days(1));
		let signals = RequestSignals {
			preference: Some(&existing),
			accept_language: Some("es"),
			referrer: Some("https://www.google.fr/"),
			..Default::default()
		};
		let decision = router().decide("/products/boots", &signals, now());
		assert_eq!(decision.target_path, "/de/products/boots");
		assert_eq!(decision.persist, Some(existing));
	}

	#[test]
	fn implicit_cookie_sticks_against_ambient_signals() {
		let existing = PreferenceRecord::implicit(LocaleCode::Es, now() - Duration::days(1));
		let signals = RequestSignals {
			preference: Some(&existing),
			accept_language: Some("en-US,en;q=0.9"),
			referrer: Some("https://www.google.de/"),
			country: Some("BR"),
		};
		let decision = router().decide("/cart", &signals, now());
		assert_eq!(decision.action, RouteAction::ExternalRedirect);
		assert_eq!(decision.target_path, "/es/cart");
		assert_eq!(decision.persist, Some(existing));
	}

	#[test]
	fn locale_read_under_prefix_carries_to_unprefixed_link() {
		let r = router();
		let header = RequestSignals {
			accept_language: Some("en-US"),
			..Default::default()
		};
		let first = r.decide("/ru/products", &header, now());
		let stored = first.persist.unwrap();
		assert!(!stored.set_explicitly);

		let signals = RequestSignals {
			preference: Some(&stored),
			..header
		};
		let second = r.decide("/cart", &signals, now() + Duration::minutes(5));
		assert_eq!(second.target_path, "/ru/cart");
		assert_eq!(second.persist, Some(stored));
	}

	#[test]
	fn excluded_paths_pass_through() {
		let r = router();
		for path in ["/api/health", "/_next/static/chunk.js", "/favicon.ico", "/robots.txt", "/ru/logo.png"] {
			let decision = r.decide(path, &RequestSignals::default(), now());
			assert_eq!(decision.action, RouteAction::PassThrough, "{path}");
			assert_eq!(decision.target_path, path);
			assert_eq!(decision.persist, None);
		}
	}

	#[test]
	fn exclusion_respects_segment_boundaries() {
		let excluded = ExcludedPaths::new(["/api"]);
		assert!(excluded.is_excluded("/api"));
		assert!(excluded.is_excluded("/api/locales"));
		assert!(!excluded.is_excluded("/apiary"));
		assert!(!excluded.is_excluded("/products/v2."));
	}

	proptest! {
		#[test]
		fn redirect_lands_on_a_rewritten_path(
			segments in proptest::collection::vec("[a-z0-9-]{1,8}", 0..4),
			header in proptest::option::of("[a-zA-Z;=,.0-9 -]{0,24}"),
		) {
			let r = router();
			let path = format!("/{}", segments.join("/"));
			let signals = RequestSignals {
				accept_language: header.as_deref(),
				..Default::default()
			};

			let first = r.decide(&path, &signals, now());
			match first.action {
				RouteAction::PassThrough => {}
				RouteAction::InternalRewrite => {
					let again = r.decide(&path, &signals, now());
					prop_assert_eq!(again.action, RouteAction::InternalRewrite);
				}
				RouteAction::ExternalRedirect => {
					let second = r.decide(&first.target_path, &signals, now());
					prop_assert_eq!(second.action, RouteAction::InternalRewrite);
					prop_assert_eq!(second.locale, first.locale);
				}
			}
		}
	}
}
