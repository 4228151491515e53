// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Locale resolution for the storefront.
//!
//! This crate is shared by the server-side request interceptor and the
//! client-side reconciler. It holds:
//!
//! - [`LocaleRegistry`]: the immutable table of supported locales
//! - [`signals`]: pure extractors turning raw facts into candidate locales
//! - [`resolve`]: the fixed-priority policy merging those candidates
//! - [`PreferenceRecord`] and the [`PreferenceStore`] seam
//! - [`LocaleCookies`]: the cookie encoding of the preference record
//! - locale-prefix helpers for URL paths
//!
//! # Example
//!
//! ```
//! use storefront_common_i18n::{resolve, with_locale_prefix, LocaleCode, LocaleRegistry, ResolutionInput};
//!
//! let registry = LocaleRegistry::builtin();
//!
//! let input = ResolutionInput {
//!     accept_language: Some("ru;q=1.0"),
//!     ..Default::default()
//! };
//! let locale = resolve(&registry, &input).locale;
//! assert_eq!(locale, LocaleCode::Ru);
//!
//! assert_eq!(with_locale_prefix(&registry, "/products", locale), "/ru/products");
//! ```

mod cookie;
mod locale;
mod path;
mod preference;
mod resolve;
pub mod signals;

pub use cookie::{cookie_value, LocaleCookies, LOCALE_COOKIE_MAX_AGE_SECS, LOCALE_COOKIE_NAME};
pub use locale::{
	LocaleCode, LocaleDescriptor, LocaleRegistry, RegistryError, UnknownLocale, BUILTIN_COUNTRIES,
	BUILTIN_LOCALES, DEFAULT_LOCALE,
};
pub use path::{split_locale_prefix, strip_locale_prefix, switch_targets, with_locale_prefix, SwitchTarget};
pub use preference::{converge, load_preference, PreferenceRecord, PreferenceStore, PreferenceStoreError};
pub use resolve::{resolve, Resolution, ResolutionInput, ResolvedFrom};
pub use signals::{Signal, SignalSource};
