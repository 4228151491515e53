// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client-side locale handling for the storefront.
//!
//! The server decides the locale for every page request; this crate keeps the
//! page's view of that decision consistent afterwards:
//!
//! - [`ClientReconciler`] runs at mount, converges client storage with the
//!   locale cookies and decides whether to offer a [`LanguagePrompt`]
//! - [`LocalPreferences`] persists the preference record in a
//!   [`KeyValueStore`] such as `localStorage`
//! - [`ChangeBroadcaster`] tells locale-dependent components about switches
//!
//! Browser effects go through the [`Navigator`] trait so the logic runs
//! anywhere.

mod broadcast;
mod error;
mod navigator;
mod prompt;
mod reconciler;
mod store;

pub use broadcast::{ChangeBroadcaster, LocaleChanged, Subscription};
pub use error::StoreError;
pub use navigator::Navigator;
pub use prompt::{LanguagePrompt, PromptChoice};
pub use reconciler::{ClientReconciler, PageContext};
pub use store::{
	KeyValueStore, LocalPreferences, MemoryStore, UnavailableStore, LOCALE_KEY, LOCALE_META_KEY,
	PREFERENCE_SET_KEY,
};
