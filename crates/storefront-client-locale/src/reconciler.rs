// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client-side locale reconciliation.
//!
//! [`ClientReconciler::mount`] runs synchronously when a page becomes
//! interactive, before any locale-dependent UI reads the current locale. It:
//!
//! 1. converges the client store with the record carried by the locale
//!    cookies (newer explicit record wins, in either direction)
//! 2. derives the current locale from the path, then the stored preference,
//!    then the registry default
//! 3. on a first visit, offers a [`LanguagePrompt`] when the browser's
//!    language differs from the current locale and is not the default
//!
//! After mount it follows path changes and externally published
//! [`LocaleChanged`] events without re-running first-visit logic.

use std::{cell::Cell, rc::Rc, sync::Arc};

use chrono::Utc;
use storefront_common_i18n::{
	converge, load_preference, signals, with_locale_prefix, LocaleCode, LocaleCookies, LocaleRegistry,
	PreferenceRecord, PreferenceStore,
};

use crate::broadcast::{ChangeBroadcaster, LocaleChanged, Subscription};
use crate::navigator::Navigator;
use crate::prompt::{LanguagePrompt, PromptChoice};
use crate::store::{KeyValueStore, LocalPreferences};

/// What the page knows at mount time.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
	pub path: &'a str,
	/// `navigator.languages`, most preferred first.
	pub browser_languages: &'a [String],
	/// `document.cookie`, if readable.
	pub cookie_header: Option<&'a str>,
}

pub struct ClientReconciler<S, N> {
	registry: Arc<LocaleRegistry>,
	cookies: LocaleCookies,
	preferences: LocalPreferences<S>,
	navigator: N,
	broadcaster: ChangeBroadcaster,
	path: String,
	current: Rc<Cell<LocaleCode>>,
	prompt: Option<LanguagePrompt>,
	_subscription: Subscription,
}

impl<S: KeyValueStore, N: Navigator> ClientReconciler<S, N> {
	pub fn mount(
		registry: Arc<LocaleRegistry>,
		cookies: LocaleCookies,
		store: S,
		navigator: N,
		broadcaster: ChangeBroadcaster,
		page: PageContext<'_>,
	) -> Self {
		let current = Rc::new(Cell::new(registry.default_locale()));
		let subscription = {
			let current = current.clone();
			broadcaster.subscribe(move |event| current.set(event.locale))
		};

		let mut reconciler = Self {
			preferences: LocalPreferences::new(store, registry.clone()),
			registry,
			cookies,
			navigator,
			broadcaster,
			path: page.path.to_string(),
			current,
			prompt: None,
			_subscription: subscription,
		};

		reconciler.converge_with_cookie(page.cookie_header);

		let stored = load_preference(&reconciler.preferences);
		let initial = signals::from_path(&reconciler.registry, page.path)
			.or(stored.map(|r| r.locale))
			.unwrap_or(reconciler.registry.default_locale());
		reconciler.current.set(initial);

		if reconciler.preferences.is_first_visit() {
			reconciler.prompt = reconciler.detect_prompt(page.browser_languages);
		}

		tracing::debug!(
			path = %reconciler.path,
			locale = %initial,
			prompt = reconciler.prompt.is_some(),
			"locale reconciler mounted"
		);
		reconciler
	}

	pub fn current_locale(&self) -> LocaleCode {
		self.current.get()
	}

	pub fn path(&self) -> &str {
		&self.path
	}

	pub fn prompt(&self) -> Option<&LanguagePrompt> {
		self.prompt.as_ref()
	}

	pub fn preferences(&self) -> &LocalPreferences<S> {
		&self.preferences
	}

	pub fn navigator(&self) -> &N {
		&self.navigator
	}

	pub fn choose(&mut self, choice: PromptChoice) {
		match choice {
			PromptChoice::Accept => self.accept_prompt(),
			PromptChoice::KeepCurrent => self.keep_current(),
			PromptChoice::Dismiss => self.dismiss_prompt(),
		}
	}

	/// Switch to the detected locale as an explicit choice.
	pub fn accept_prompt(&mut self) {
		if let Some(prompt) = self.prompt.take() {
			self.commit_explicit(prompt.detected.code);
		}
	}

	/// Stay on the current locale; the prompt will not be offered again.
	pub fn keep_current(&mut self) {
		if self.prompt.take().is_some() {
			if let Err(e) = self.preferences.mark_preference_set() {
				tracing::warn!(error = %e, "failed to remember language choice");
			}
		}
	}

	/// Close the prompt without remembering anything.
	pub fn dismiss_prompt(&mut self) {
		self.prompt = None;
	}

	/// Explicit switch from the locale switcher. Returns the path navigated
	/// to, or `None` when `locale` is not in the registry.
	pub fn switch_locale(&mut self, locale: LocaleCode) -> Option<String> {
		if !self.registry.is_supported(locale) {
			tracing::debug!(%locale, "ignoring switch to unsupported locale");
			return None;
		}
		Some(self.commit_explicit(locale))
	}

	/// Follow a navigation the reconciler did not initiate (back/forward).
	pub fn on_path_changed(&mut self, path: &str) {
		self.path = path.to_string();
		if let Some(locale) = signals::from_path(&self.registry, path) {
			self.current.set(locale);
		}
	}

	fn commit_explicit(&mut self, locale: LocaleCode) -> String {
		let record = PreferenceRecord::explicit(locale, Utc::now());
		if let Err(e) = self.preferences.save(&record) {
			tracing::warn!(error = %e, "failed to store locale preference");
		}
		self.mirror_to_cookie(&record);

		let target = with_locale_prefix(&self.registry, &self.path, locale);
		if target != self.path {
			self.navigator.navigate(&target);
			self.path = target.clone();
		}

		self.prompt = None;
		self.current.set(locale);
		self.broadcaster.publish(LocaleChanged { locale });
		target
	}

	fn converge_with_cookie(&mut self, cookie_header: Option<&str>) {
		let local = load_preference(&self.preferences);
		let observed = cookie_header.and_then(|header| self.cookies.read(&self.registry, header));

		if let Some(adopted) = converge(local.as_ref(), observed.as_ref()) {
			tracing::debug!(locale = %adopted.locale, "adopting newer explicit preference from cookie");
			if let Err(e) = self.preferences.save(&adopted) {
				tracing::warn!(error = %e, "failed to store locale preference");
			}
		} else if let Some(pushed) = converge(observed.as_ref(), local.as_ref()) {
			tracing::debug!(locale = %pushed.locale, "pushing newer explicit preference to cookie");
			self.mirror_to_cookie(&pushed);
		}
	}

	fn mirror_to_cookie(&mut self, record: &PreferenceRecord) {
		for cookie in self.cookies.set_cookie_values(record) {
			self.navigator.set_cookie(&cookie);
		}
	}

	fn detect_prompt(&self, browser_languages: &[String]) -> Option<LanguagePrompt> {
		let detected = signals::from_browser_languages(&self.registry, browser_languages)?;
		let current = self.current.get();
		if detected == current || detected == self.registry.default_locale() {
			return None;
		}

		Some(LanguagePrompt {
			detected: self.registry.descriptor(detected)?.clone(),
			current: self.registry.descriptor(current)?.clone(),
		})
	}
}
