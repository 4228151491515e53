// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Locale resolution policy.

use serde::Serialize;

use crate::locale::{LocaleCode, LocaleRegistry};
use crate::preference::PreferenceRecord;
use crate::signals::{self, Signal, SignalSource};

/// Raw facts available when resolving a locale. Every field is optional.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolutionInput<'a> {
	pub preference: Option<&'a PreferenceRecord>,
	pub referrer: Option<&'a str>,
	pub accept_language: Option<&'a str>,
	pub country: Option<&'a str>,
}

/// Which step of the chain produced the locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedFrom {
	ExplicitPreference,
	ImplicitPreference,
	Referrer,
	AcceptLanguage,
	GeoCountry,
	Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
	pub locale: LocaleCode,
	pub resolved_from: ResolvedFrom,
	/// Signals evaluated before a match was found, in chain order.
	pub signals: Vec<Signal>,
}

/// Resolve the effective locale.
///
/// Resolution order (highest to lowest priority):
/// 1. Stored preference, explicit or silently defaulted
/// 2. Search-engine referrer
/// 3. `Accept-Language` header
/// 4. Geo country code
/// 5. Registry default locale
///
/// A stored record naming an unsupported locale is no signal. Whether it was
/// explicit only affects [`Resolution::resolved_from`].
///
/// The result depends only on the inputs, so resolving the same input twice
/// always gives the same locale.
///
/// # Example
///
/// ```
/// use storefront_common_i18n::{resolve, LocaleCode, LocaleRegistry, ResolutionInput};
///
/// let registry = LocaleRegistry::builtin();
/// let input = ResolutionInput {
///     accept_language: Some("fr;q=0.9,en;q=0.8"),
///     ..Default::default()
/// };
/// assert_eq!(resolve(&registry, &input).locale, LocaleCode::Fr);
///
/// // Nothing to go on: the default locale.
/// let input = ResolutionInput::default();
/// assert_eq!(resolve(&registry, &input).locale, registry.default_locale());
/// ```
pub fn resolve(registry: &LocaleRegistry, input: &ResolutionInput<'_>) -> Resolution {
	let mut evaluated = Vec::new();

	if let Some(record) = input.preference {
		let locale = signals::from_preference(registry, Some(record));
		evaluated.push(Signal::new(
			SignalSource::PersistedPreference,
			locale,
			record.locale.as_str(),
		));
		if let Some(locale) = locale {
			let source = if record.set_explicitly {
				ResolvedFrom::ExplicitPreference
			} else {
				ResolvedFrom::ImplicitPreference
			};
			return finish(locale, source, evaluated);
		}
	}

	if let Some(referrer) = input.referrer {
		let locale = signals::from_referrer(registry, referrer);
		evaluated.push(Signal::new(SignalSource::Referrer, locale, referrer));
		if let Some(locale) = locale {
			return finish(locale, ResolvedFrom::Referrer, evaluated);
		}
	}

	if let Some(header) = input.accept_language {
		let locale = signals::from_accept_language(registry, header);
		evaluated.push(Signal::new(SignalSource::AcceptLanguageHeader, locale, header));
		if let Some(locale) = locale {
			return finish(locale, ResolvedFrom::AcceptLanguage, evaluated);
		}
	}

	if let Some(country) = input.country {
		let locale = signals::from_geo_country(registry, country);
		evaluated.push(Signal::new(SignalSource::GeoCountry, locale, country));
		if let Some(locale) = locale {
			return finish(locale, ResolvedFrom::GeoCountry, evaluated);
		}
	}

	finish(registry.default_locale(), ResolvedFrom::Default, evaluated)
}

fn finish(locale: LocaleCode, resolved_from: ResolvedFrom, signals: Vec<Signal>) -> Resolution {
	tracing::trace!(%locale, ?resolved_from, evaluated = signals.len(), "locale resolved");
	Resolution {
		locale,
		resolved_from,
		signals,
	}
}
