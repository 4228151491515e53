// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Request-scoped preference store backed by the locale cookies.

use axum::http::{header, HeaderMap, HeaderValue};
use storefront_common_i18n::{
	LocaleCookies, LocaleRegistry, PreferenceRecord, PreferenceStore, PreferenceStoreError,
};

/// The preference record as carried by one request's `Cookie` headers.
///
/// Saving does not touch the request; it queues `Set-Cookie` values for the
/// response, retrieved with [`CookiePreferences::into_set_cookies`].
#[derive(Debug)]
pub struct CookiePreferences {
	cookies: LocaleCookies,
	record: Option<PreferenceRecord>,
	pending: Vec<HeaderValue>,
}

impl CookiePreferences {
	pub fn from_headers(registry: &LocaleRegistry, cookies: LocaleCookies, headers: &HeaderMap) -> Self {
		let record = cookie_header(headers).and_then(|value| cookies.read(registry, &value));
		Self {
			cookies,
			record,
			pending: Vec::new(),
		}
	}

	pub fn into_set_cookies(self) -> Vec<HeaderValue> {
		self.pending
	}
}

impl PreferenceStore for CookiePreferences {
	fn load(&self) -> Result<Option<PreferenceRecord>, PreferenceStoreError> {
		Ok(self.record)
	}

	fn save(&mut self, record: &PreferenceRecord) -> Result<(), PreferenceStoreError> {
		let values = self
			.cookies
			.set_cookie_values(record)
			.into_iter()
			.map(|value| {
				HeaderValue::from_str(&value).map_err(|e| PreferenceStoreError::Serialization(e.to_string()))
			})
			.collect::<Result<Vec<_>, _>>()?;

		self.pending.clear();
		self.pending.extend(values);
		self.record = Some(*record);
		Ok(())
	}
}

/// All `Cookie` headers of a request joined into one `a=1; b=2` string.
/// HTTP/2 clients may split cookies across several header fields.
fn cookie_header(headers: &HeaderMap) -> Option<String> {
	let parts: Vec<&str> = headers
		.get_all(header::COOKIE)
		.iter()
		.filter_map(|v| v.to_str().ok())
		.collect();
	(!parts.is_empty()).then(|| parts.join("; "))
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::{TimeZone, Utc};
	use storefront_common_i18n::{load_preference, LocaleCode};

	fn registry() -> LocaleRegistry {
		LocaleRegistry::builtin()
	}

	#[test]
	fn reads_record_from_split_cookie_headers() {
		let mut headers = HeaderMap::new();
		headers.append(header::COOKIE, HeaderValue::from_static("session=x; locale=ja"));
		headers.append(header::COOKIE, HeaderValue::from_static("locale_pref=explicit.1700000000000"));

		let store = CookiePreferences::from_headers(&registry(), LocaleCookies::default(), &headers);
		let record = load_preference(&store).unwrap();
		assert_eq!(record.locale, LocaleCode::Ja);
		assert!(record.set_explicitly);
	}

	#[test]
	fn missing_or_invalid_cookie_is_no_record() {
		let store = CookiePreferences::from_headers(&registry(), LocaleCookies::default(), &HeaderMap::new());
		assert_eq!(load_preference(&store), None);

		let mut headers = HeaderMap::new();
		headers.insert(header::COOKIE, HeaderValue::from_static("locale=xx"));
		let store = CookiePreferences::from_headers(&registry(), LocaleCookies::default(), &headers);
		assert_eq!(load_preference(&store), None);
	}

	#[test]
	fn save_queues_both_cookies() {
		let mut store = CookiePreferences::from_headers(&registry(), LocaleCookies::default(), &HeaderMap::new());
		let at = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
		store.save(&PreferenceRecord::implicit(LocaleCode::Ru, at)).unwrap();
		store.save(&PreferenceRecord::explicit(LocaleCode::De, at)).unwrap();

		assert_eq!(store.load().unwrap().map(|r| r.locale), Some(LocaleCode::De));
		let values = store.into_set_cookies();
		assert_eq!(values.len(), 2);
		assert_eq!(values[0], "locale=de; Max-Age=31536000; Path=/; SameSite=Lax");
		assert_eq!(
			values[1],
			"locale_pref=explicit.1700000000000; Max-Age=31536000; Path=/; SameSite=Lax"
		);
	}
}
