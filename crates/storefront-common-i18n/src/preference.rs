// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The persisted locale preference and the stores that hold it.
//!
//! The same logical [`PreferenceRecord`] lives in two places: the `locale`
//! cookies on the server side and a key/value store in the browser. The two
//! copies are reconciled with [`converge`]: last write wins, but only an
//! explicit record can replace another one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::locale::LocaleCode;

/// A locale preference. Always written as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceRecord {
	pub locale: LocaleCode,
	/// `true` when the user affirmatively chose this locale.
	pub set_explicitly: bool,
	pub set_at: DateTime<Utc>,
}

impl PreferenceRecord {
	pub fn explicit(locale: LocaleCode, set_at: DateTime<Utc>) -> Self {
		Self {
			locale,
			set_explicitly: true,
			set_at,
		}
	}

	pub fn implicit(locale: LocaleCode, set_at: DateTime<Utc>) -> Self {
		Self {
			locale,
			set_explicitly: false,
			set_at,
		}
	}

	/// Whether a side holding `current` should adopt `self`.
	pub fn supersedes(&self, current: Option<&PreferenceRecord>) -> bool {
		self.set_explicitly && current.map_or(true, |c| self.set_at > c.set_at)
	}
}

/// Reconcile a locally held record with one observed from the other side.
///
/// Returns the record the local side should adopt, or `None` when it should
/// keep what it has.
pub fn converge(
	local: Option<&PreferenceRecord>,
	observed: Option<&PreferenceRecord>,
) -> Option<PreferenceRecord> {
	observed.filter(|o| o.supersedes(local)).copied()
}

#[derive(Debug, thiserror::Error)]
pub enum PreferenceStoreError {
	#[error("preference storage is unavailable")]
	Unavailable,

	#[error("preference storage backend error: {0}")]
	Backend(String),

	#[error("preference record could not be encoded: {0}")]
	Serialization(String),
}

/// A physical persistence point for the preference record.
pub trait PreferenceStore {
	fn load(&self) -> Result<Option<PreferenceRecord>, PreferenceStoreError>;

	/// Replace the stored record.
	fn save(&mut self, record: &PreferenceRecord) -> Result<(), PreferenceStoreError>;
}

/// Load a record, treating any storage failure as "no record".
pub fn load_preference<S: PreferenceStore + ?Sized>(store: &S) -> Option<PreferenceRecord> {
	match store.load() {
		Ok(record) => record,
		Err(e) => {
			tracing::debug!(error = %e, "preference store unreadable, ignoring");
			None
		}
	}
}
