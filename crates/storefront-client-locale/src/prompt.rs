// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The first-visit language prompt.

use serde::Serialize;
use storefront_common_i18n::{LocaleCode, LocaleDescriptor};

/// Banner offering to switch to the browser's language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguagePrompt {
	pub detected: LocaleDescriptor,
	pub current: LocaleDescriptor,
}

impl LanguagePrompt {
	pub fn detected_locale(&self) -> LocaleCode {
		self.detected.code
	}

	pub fn current_locale(&self) -> LocaleCode {
		self.current.code
	}
}

/// How the user answered the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptChoice {
	/// Switch to the detected locale and remember the choice.
	Accept,
	/// Stay on the current locale and stop asking.
	KeepCurrent,
	/// Close for now; the prompt may return while no choice is stored.
	Dismiss,
}
