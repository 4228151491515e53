// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Supported locales and the registry that describes them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Locale used when no signal produces a match and no default is configured.
pub const DEFAULT_LOCALE: LocaleCode = LocaleCode::En;

/// A supported locale identifier.
///
/// This is a closed set: values that do not parse into a `LocaleCode` are
/// never stored anywhere in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LocaleCode {
	#[serde(rename = "zh-Hans")]
	ZhHans,
	#[serde(rename = "zh-Hant")]
	ZhHant,
	#[serde(rename = "en")]
	En,
	#[serde(rename = "ru")]
	Ru,
	#[serde(rename = "ja")]
	Ja,
	#[serde(rename = "de")]
	De,
	#[serde(rename = "fr")]
	Fr,
	#[serde(rename = "es")]
	Es,
	#[serde(rename = "pt")]
	Pt,
}

impl LocaleCode {
	pub const ALL: [LocaleCode; 9] = [
		LocaleCode::ZhHans,
		LocaleCode::ZhHant,
		LocaleCode::En,
		LocaleCode::Ru,
		LocaleCode::Ja,
		LocaleCode::De,
		LocaleCode::Fr,
		LocaleCode::Es,
		LocaleCode::Pt,
	];

	/// Canonical code, as used in URL prefixes, cookies and storage.
	pub fn as_str(self) -> &'static str {
		match self {
			LocaleCode::ZhHans => "zh-Hans",
			LocaleCode::ZhHant => "zh-Hant",
			LocaleCode::En => "en",
			LocaleCode::Ru => "ru",
			LocaleCode::Ja => "ja",
			LocaleCode::De => "de",
			LocaleCode::Fr => "fr",
			LocaleCode::Es => "es",
			LocaleCode::Pt => "pt",
		}
	}

	/// The language subtag, e.g. `zh` for `zh-Hans`.
	pub fn primary_subtag(self) -> &'static str {
		let code = self.as_str();
		code.split('-').next().unwrap_or(code)
	}

	/// Parse a canonical code. Matching is exact and case-sensitive.
	pub fn parse(code: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|locale| locale.as_str() == code)
	}
}

impl fmt::Display for LocaleCode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale: {0}")]
pub struct UnknownLocale(pub String);

impl FromStr for LocaleCode {
	type Err = UnknownLocale;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s).ok_or_else(|| UnknownLocale(s.to_string()))
	}
}

/// Static description of a supported locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocaleDescriptor {
	pub code: LocaleCode,
	/// Native display name.
	pub name: &'static str,
	/// Short label shown by the switcher.
	pub badge: &'static str,
	pub flag: &'static str,
	/// Home region (ISO 3166-1 alpha-2).
	pub region: &'static str,
	/// Hostnames of search engines whose referrals imply this locale.
	pub search_engines: &'static [&'static str],
}

pub const BUILTIN_LOCALES: &[LocaleDescriptor] = &[
	LocaleDescriptor {
		code: LocaleCode::ZhHans,
		name: "简体中文",
		badge: "简",
		flag: "🇨🇳",
		region: "CN",
		search_engines: &["baidu.com", "sogou.com", "so.com", "360.cn", "bing.cn"],
	},
	LocaleDescriptor {
		code: LocaleCode::ZhHant,
		name: "繁體中文",
		badge: "繁",
		flag: "🇹🇼",
		region: "TW",
		search_engines: &["google.com.tw", "yahoo.com.tw", "google.com.hk", "pchome.com.tw"],
	},
	LocaleDescriptor {
		code: LocaleCode::En,
		name: "English",
		badge: "EN",
		flag: "🇺🇸",
		region: "US",
		search_engines: &["google.com", "bing.com", "yahoo.com", "duckduckgo.com"],
	},
	LocaleDescriptor {
		code: LocaleCode::Ru,
		name: "Русский",
		badge: "RU",
		flag: "🇷🇺",
		region: "RU",
		search_engines: &["yandex.ru", "mail.ru", "rambler.ru", "google.ru"],
	},
	LocaleDescriptor {
		code: LocaleCode::Ja,
		name: "日本語",
		badge: "JA",
		flag: "🇯🇵",
		region: "JP",
		search_engines: &["google.co.jp", "yahoo.co.jp", "goo.ne.jp"],
	},
	LocaleDescriptor {
		code: LocaleCode::De,
		name: "Deutsch",
		badge: "DE",
		flag: "🇩🇪",
		region: "DE",
		search_engines: &["google.de", "yahoo.de", "web.de"],
	},
	LocaleDescriptor {
		code: LocaleCode::Fr,
		name: "Français",
		badge: "FR",
		flag: "🇫🇷",
		region: "FR",
		search_engines: &["google.fr", "yahoo.fr", "orange.fr", "qwant.com"],
	},
	LocaleDescriptor {
		code: LocaleCode::Es,
		name: "Español",
		badge: "ES",
		flag: "🇪🇸",
		region: "ES",
		search_engines: &["google.es", "yahoo.es", "terra.es", "google.com.mx"],
	},
	LocaleDescriptor {
		code: LocaleCode::Pt,
		name: "Português",
		badge: "PT",
		flag: "🇧🇷",
		region: "BR",
		search_engines: &["google.com.br", "yahoo.com.br", "uol.com.br", "google.pt"],
	},
];

pub const BUILTIN_COUNTRIES: &[(&str, LocaleCode)] = &[
	("CN", LocaleCode::ZhHans),
	("TW", LocaleCode::ZhHant),
	("HK", LocaleCode::ZhHant),
	("MO", LocaleCode::ZhHant),
	("US", LocaleCode::En),
	("GB", LocaleCode::En),
	("CA", LocaleCode::En),
	("AU", LocaleCode::En),
	("NZ", LocaleCode::En),
	("IE", LocaleCode::En),
	("RU", LocaleCode::Ru),
	("BY", LocaleCode::Ru),
	("KZ", LocaleCode::Ru),
	("JP", LocaleCode::Ja),
	("DE", LocaleCode::De),
	("AT", LocaleCode::De),
	("CH", LocaleCode::De),
	("FR", LocaleCode::Fr),
	("BE", LocaleCode::Fr),
	("LU", LocaleCode::Fr),
	("ES", LocaleCode::Es),
	("MX", LocaleCode::Es),
	("AR", LocaleCode::Es),
	("CO", LocaleCode::Es),
	("CL", LocaleCode::Es),
	("PE", LocaleCode::Es),
	("BR", LocaleCode::Pt),
	("PT", LocaleCode::Pt),
];

/// Region-qualified tags that map onto a script variant rather than their
/// primary subtag. Keys are lower-case.
const TAG_ALIASES: &[(&str, LocaleCode)] = &[
	("zh-cn", LocaleCode::ZhHans),
	("zh-sg", LocaleCode::ZhHans),
	("zh-tw", LocaleCode::ZhHant),
	("zh-hk", LocaleCode::ZhHant),
	("zh-mo", LocaleCode::ZhHant),
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	#[error("default locale {0} is not in the registry")]
	DefaultNotListed(LocaleCode),

	#[error("locale {0} is listed more than once")]
	DuplicateLocale(LocaleCode),

	#[error("search engine host {host} is claimed by both {first} and {second}")]
	DuplicateHost {
		host: String,
		first: LocaleCode,
		second: LocaleCode,
	},
}

/// Immutable table of supported locales, built once and shared.
#[derive(Debug, Clone)]
pub struct LocaleRegistry {
	descriptors: Vec<LocaleDescriptor>,
	countries: &'static [(&'static str, LocaleCode)],
	default_locale: LocaleCode,
}

impl LocaleRegistry {
	pub fn new(
		descriptors: Vec<LocaleDescriptor>,
		countries: &'static [(&'static str, LocaleCode)],
		default_locale: LocaleCode,
	) -> Result<Self, RegistryError> {
		let mut seen_hosts: Vec<(&str, LocaleCode)> = Vec::new();
		for (i, descriptor) in descriptors.iter().enumerate() {
			if descriptors[..i].iter().any(|d| d.code == descriptor.code) {
				return Err(RegistryError::DuplicateLocale(descriptor.code));
			}
			for host in descriptor.search_engines {
				if let Some((_, first)) = seen_hosts.iter().find(|(h, _)| h.eq_ignore_ascii_case(host)) {
					return Err(RegistryError::DuplicateHost {
						host: host.to_string(),
						first: *first,
						second: descriptor.code,
					});
				}
				seen_hosts.push((*host, descriptor.code));
			}
		}

		if !descriptors.iter().any(|d| d.code == default_locale) {
			return Err(RegistryError::DefaultNotListed(default_locale));
		}

		Ok(Self {
			descriptors,
			countries,
			default_locale,
		})
	}

	/// The built-in locale table with [`DEFAULT_LOCALE`] as default.
	pub fn builtin() -> Self {
		Self {
			descriptors: BUILTIN_LOCALES.to_vec(),
			countries: BUILTIN_COUNTRIES,
			default_locale: DEFAULT_LOCALE,
		}
	}

	/// Replace the default locale. It must be listed in the registry.
	pub fn with_default(mut self, default_locale: LocaleCode) -> Result<Self, RegistryError> {
		if !self.is_supported(default_locale) {
			return Err(RegistryError::DefaultNotListed(default_locale));
		}
		self.default_locale = default_locale;
		Ok(self)
	}

	pub fn default_locale(&self) -> LocaleCode {
		self.default_locale
	}

	pub fn descriptors(&self) -> &[LocaleDescriptor] {
		&self.descriptors
	}

	pub fn descriptor(&self, code: LocaleCode) -> Option<&LocaleDescriptor> {
		self.descriptors.iter().find(|d| d.code == code)
	}

	pub fn is_supported(&self, code: LocaleCode) -> bool {
		self.descriptor(code).is_some()
	}

	/// Validate a raw code string against the registry. Exact match only.
	pub fn supported(&self, code: &str) -> Option<LocaleCode> {
		LocaleCode::parse(code).filter(|locale| self.is_supported(*locale))
	}

	/// Match a language tag (`de-AT`, `zh-TW`, `EN`) to a supported locale.
	///
	/// An exact (case-insensitive) code or alias match wins; otherwise the
	/// first locale in registry order sharing the primary subtag is returned.
	pub fn match_language_tag(&self, tag: &str) -> Option<LocaleCode> {
		let tag = tag.trim().replace('_', "-").to_ascii_lowercase();
		if tag.is_empty() {
			return None;
		}

		if let Some(d) = self
			.descriptors
			.iter()
			.find(|d| d.code.as_str().eq_ignore_ascii_case(&tag))
		{
			return Some(d.code);
		}

		if let Some((_, code)) = TAG_ALIASES.iter().find(|(alias, _)| *alias == tag) {
			if self.is_supported(*code) {
				return Some(*code);
			}
		}

		let primary = tag.split('-').next().unwrap_or(tag.as_str());
		self
			.descriptors
			.iter()
			.find(|d| d.code.primary_subtag() == primary)
			.map(|d| d.code)
	}

	/// Locale whose search-engine list contains `host` or a parent domain of it.
	pub fn locale_for_host(&self, host: &str) -> Option<LocaleCode> {
		let host = host.trim_end_matches('.').to_ascii_lowercase();
		self.descriptors.iter().find_map(|d| {
			d.search_engines
				.iter()
				.any(|engine| {
					host == *engine
						|| host
							.strip_suffix(engine)
							.is_some_and(|rest| rest.ends_with('.'))
				})
				.then_some(d.code)
		})
	}

	pub fn locale_for_country(&self, country_code: &str) -> Option<LocaleCode> {
		let country_code = country_code.trim();
		self
			.countries
			.iter()
			.find(|(country, _)| country.eq_ignore_ascii_case(country_code))
			.map(|(_, code)| *code)
			.filter(|code| self.is_supported(*code))
	}
}

impl Default for LocaleRegistry {
	fn default() -> Self {
		Self::builtin()
	}
}
