// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Encoding of the preference record into locale cookies.
//!
//! Two cookies are always written together:
//!
//! ```text
//! locale=ru; Max-Age=31536000; Path=/; SameSite=Lax
//! locale_pref=implicit.1718000000000; Max-Age=31536000; Path=/; SameSite=Lax
//! ```
//!
//! `locale` carries the code; `locale_pref` carries whether the choice was
//! explicit and when it was made (unix millis). A missing or corrupt
//! `locale_pref` reads as an implicit record set at the epoch.

use chrono::{DateTime, Utc};

use crate::locale::LocaleRegistry;
use crate::preference::PreferenceRecord;

/// Default name of the cookie holding the locale code.
pub const LOCALE_COOKIE_NAME: &str = "locale";

/// One year.
pub const LOCALE_COOKIE_MAX_AGE_SECS: u64 = 31_536_000;

const EXPLICIT: &str = "explicit";
const IMPLICIT: &str = "implicit";

/// Cookie naming and lifetime for the locale preference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleCookies {
	name: String,
	meta_name: String,
	max_age_secs: u64,
}

impl Default for LocaleCookies {
	fn default() -> Self {
		Self::new(LOCALE_COOKIE_NAME, LOCALE_COOKIE_MAX_AGE_SECS)
	}
}

impl LocaleCookies {
	pub fn new(name: impl Into<String>, max_age_secs: u64) -> Self {
		let name = name.into();
		let meta_name = format!("{name}_pref");
		Self {
			name,
			meta_name,
			max_age_secs,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn meta_name(&self) -> &str {
		&self.meta_name
	}

	pub fn max_age_secs(&self) -> u64 {
		self.max_age_secs
	}

	/// Read the record from a `Cookie` header value (`a=1; b=2`).
	///
	/// Unknown or unsupported locale values yield `None`.
	pub fn read(&self, registry: &LocaleRegistry, cookie_header: &str) -> Option<PreferenceRecord> {
		let locale = registry.supported(cookie_value(cookie_header, &self.name)?)?;
		let (set_explicitly, set_at) = cookie_value(cookie_header, &self.meta_name)
			.and_then(decode_meta)
			.unwrap_or((false, DateTime::<Utc>::UNIX_EPOCH));

		Some(PreferenceRecord {
			locale,
			set_explicitly,
			set_at,
		})
	}

	/// `Set-Cookie` values persisting `record`, locale cookie first.
	pub fn set_cookie_values(&self, record: &PreferenceRecord) -> [String; 2] {
		[
			self.format(&self.name, record.locale.as_str()),
			self.format(&self.meta_name, &encode_meta(record)),
		]
	}

	fn format(&self, name: &str, value: &str) -> String {
		format!(
			"{name}={value}; Max-Age={}; Path=/; SameSite=Lax",
			self.max_age_secs
		)
	}
}

/// Find a cookie's value in a `Cookie` header.
pub fn cookie_value<'a>(cookie_header: &'a str, cookie_name: &str) -> Option<&'a str> {
	cookie_header.split(';').find_map(|cookie| {
		let (name, value) = cookie.trim().split_once('=')?;
		(name.trim() == cookie_name).then(|| value.trim().trim_matches('"'))
	})
}

fn encode_meta(record: &PreferenceRecord) -> String {
	let kind = if record.set_explicitly { EXPLICIT } else { IMPLICIT };
	format!("{kind}.{}", record.set_at.timestamp_millis())
}

fn decode_meta(value: &str) -> Option<(bool, DateTime<Utc>)> {
	let (kind, millis) = value.split_once('.')?;
	let set_explicitly = match kind {
		EXPLICIT => true,
		IMPLICIT => false,
		_ => return None,
	};
	let set_at = DateTime::<Utc>::from_timestamp_millis(millis.parse().ok()?)?;
	Some((set_explicitly, set_at))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::locale::LocaleCode;
	use chrono::TimeZone;

	fn registry() -> LocaleRegistry {
		LocaleRegistry::builtin()
	}

	#[test]
	fn set_cookie_values_carry_required_attributes() {
		let cookies = LocaleCookies::default();
		let at = Utc.timestamp_millis_opt(1_718_000_000_123).unwrap();
		let [locale, meta] = cookies.set_cookie_values(&PreferenceRecord::explicit(LocaleCode::Ru, at));
		assert_eq!(locale, "locale=ru; Max-Age=31536000; Path=/; SameSite=Lax");
		assert_eq!(
			meta,
			"locale_pref=explicit.1718000000123; Max-Age=31536000; Path=/; SameSite=Lax"
		);
	}

	#[test]
	fn read_restores_written_record() {
		let cookies = LocaleCookies::default();
		let at = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
		let header = "session=abc; locale=zh-Hant; locale_pref=implicit.1700000000000";
		assert_eq!(
			cookies.read(&registry(), header),
			Some(PreferenceRecord::implicit(LocaleCode::ZhHant, at))
		);
	}

	#[test]
	fn corrupt_meta_reads_as_implicit_epoch() {
		let cookies = LocaleCookies::default();
		let record = cookies.read(&registry(), "locale=de; locale_pref=yes.soon").unwrap();
		assert_eq!(record.locale, LocaleCode::De);
		assert!(!record.set_explicitly);
		assert_eq!(record.set_at, DateTime::<Utc>::UNIX_EPOCH);

		let record = cookies.read(&registry(), "locale=de").unwrap();
		assert!(!record.set_explicitly);
	}

	#[test]
	fn unknown_locale_cookie_is_no_record() {
		let cookies = LocaleCookies::default();
		assert_eq!(cookies.read(&registry(), "locale=klingon"), None);
		assert_eq!(cookies.read(&registry(), "locale="), None);
		assert_eq!(cookies.read(&registry(), ""), None);
		assert_eq!(cookies.read(&registry(), "locale_pref=explicit.1"), None);
	}

	#[test]
	fn custom_cookie_name_derives_meta_name() {
		let cookies = LocaleCookies::new("shop_locale", 60);
		assert_eq!(cookies.meta_name(), "shop_locale_pref");
		let record = cookies
			.read(&registry(), "locale=fr; shop_locale=ja; shop_locale_pref=explicit.5")
			.unwrap();
		assert_eq!(record.locale, LocaleCode::Ja);
		assert!(record.set_explicitly);
	}

	#[test]
	fn cookie_value_matches_whole_names() {
		assert_eq!(cookie_value("xlocale=ru; locale=en", "locale"), Some("en"));
		assert_eq!(cookie_value("locale=\"fr\"", "locale"), Some("fr"));
		assert_eq!(cookie_value("nothing here", "locale"), None);
	}
}
