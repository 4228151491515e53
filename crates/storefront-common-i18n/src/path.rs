// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Locale prefixes on URL paths.
//!
//! Every storefront page has a canonical, locale-qualified URL
//! (`/<locale>/<rest>`), the default locale included.

use crate::locale::{LocaleCode, LocaleDescriptor, LocaleRegistry};

/// Split a path into its locale prefix (if the first segment is a supported
/// locale) and the remainder. The remainder always starts with `/`.
pub fn split_locale_prefix<'a>(registry: &LocaleRegistry, path: &'a str) -> (Option<LocaleCode>, &'a str) {
	let Some(rest) = path.strip_prefix('/') else {
		return (None, path);
	};
	let (segment, remainder) = match rest.find('/') {
		Some(idx) => (&rest[..idx], &rest[idx..]),
		None => (rest, ""),
	};

	match registry.supported(segment) {
		Some(locale) if remainder.is_empty() => (Some(locale), "/"),
		Some(locale) => (Some(locale), remainder),
		None => (None, path),
	}
}

/// Remove a leading locale segment, if any.
pub fn strip_locale_prefix(registry: &LocaleRegistry, path: &str) -> String {
	let (_, rest) = split_locale_prefix(registry, path);
	if rest.is_empty() {
		"/".to_string()
	} else {
		rest.to_string()
	}
}

/// Replace any existing locale prefix with `locale`.
///
/// Empty segments are dropped, so the result never contains `//` and applying
/// it twice with the same locale yields the same path.
pub fn with_locale_prefix(registry: &LocaleRegistry, path: &str, locale: LocaleCode) -> String {
	let (_, rest) = split_locale_prefix(registry, path);
	let mut out = String::with_capacity(rest.len() + 8);
	out.push('/');
	out.push_str(locale.as_str());
	for segment in rest.split('/').filter(|s| !s.is_empty()) {
		out.push('/');
		out.push_str(segment);
	}
	out
}

/// A switcher entry: a locale and the path selecting it would navigate to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchTarget<'a> {
	pub descriptor: &'a LocaleDescriptor,
	pub path: String,
}

/// Every supported locale paired with the locale-qualified form of `path`.
pub fn switch_targets<'a>(registry: &'a LocaleRegistry, path: &str) -> Vec<SwitchTarget<'a>> {
	registry
		.descriptors()
		.iter()
		.map(|descriptor| SwitchTarget {
			descriptor,
			path: with_locale_prefix(registry, path, descriptor.code),
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn registry() -> LocaleRegistry {
		LocaleRegistry::builtin()
	}

	#[test]
	fn split_recognises_supported_prefix() {
		let r = registry();
		assert_eq!(split_locale_prefix(&r, "/ru/products"), (Some(LocaleCode::Ru), "/products"));
		assert_eq!(split_locale_prefix(&r, "/zh-Hant"), (Some(LocaleCode::ZhHant), "/"));
		assert_eq!(split_locale_prefix(&r, "/de/"), (Some(LocaleCode::De), "/"));
		assert_eq!(split_locale_prefix(&r, "/products"), (None, "/products"));
		assert_eq!(split_locale_prefix(&r, "/RU/products"), (None, "/RU/products"));
		assert_eq!(split_locale_prefix(&r, "/"), (None, "/"));
	}

	#[test]
	fn strip_only_removes_first_segment() {
		let r = registry();
		assert_eq!(strip_locale_prefix(&r, "/ru/de/cart"), "/de/cart");
		assert_eq!(strip_locale_prefix(&r, "/fr"), "/");
		assert_eq!(strip_locale_prefix(&r, "/cart"), "/cart");
	}

	#[test]
	fn with_prefix_replaces_existing_prefix() {
		let r = registry();
		assert_eq!(with_locale_prefix(&r, "/products", LocaleCode::Ru), "/ru/products");
		assert_eq!(with_locale_prefix(&r, "/ru/products", LocaleCode::De), "/de/products");
		assert_eq!(with_locale_prefix(&r, "/", LocaleCode::En), "/en");
		assert_eq!(with_locale_prefix(&r, "/ja", LocaleCode::Pt), "/pt");
		assert_eq!(with_locale_prefix(&r, "//products//x/", LocaleCode::Fr), "/fr/products/x");
	}

	#[test]
	fn switch_targets_cover_every_locale() {
		let r = registry();
		let targets = switch_targets(&r, "/es/cart");
		assert_eq!(targets.len(), r.descriptors().len());
		assert!(targets
			.iter()
			.any(|t| t.descriptor.code == LocaleCode::Ja && t.path == "/ja/cart"));
	}

	proptest! {
		#[test]
		fn with_prefix_is_idempotent(
			segments in proptest::collection::vec("[a-z0-9-]{0,8}", 0..5),
			idx in 0usize..9,
		) {
			let r = registry();
			let locale = LocaleCode::ALL[idx];
			let path = format!("/{}", segments.join("/"));
			let once = with_locale_prefix(&r, &path, locale);
			let twice = with_locale_prefix(&r, &once, locale);
			prop_assert_eq!(&once, &twice);
			prop_assert!(!once.contains("//"));
			prop_assert_eq!(split_locale_prefix(&r, &once).0, Some(locale));
		}

		#[test]
		fn split_never_panics(path in ".{0,40}") {
			let r = registry();
			let _ = split_locale_prefix(&r, &path);
			let _ = strip_locale_prefix(&r, &path);
		}
	}
}
