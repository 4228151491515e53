// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Durable client-side preference storage.
//!
//! The record is spread over three keys:
//!
//! | key                       | value                                  |
//! |---------------------------|----------------------------------------|
//! | `locale`                  | locale code                            |
//! | `language-preference-set` | `"true"` once the user made a choice   |
//! | `locale-meta`             | JSON `{"setExplicitly":..,"setAt":..}` |
//!
//! Writes go through [`KeyValueStore::set_all`] so a record is never
//! partially replaced.

use std::{cell::RefCell, collections::BTreeMap, rc::Rc, sync::Arc};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storefront_common_i18n::{LocaleRegistry, PreferenceRecord, PreferenceStore, PreferenceStoreError};

use crate::error::StoreError;

pub const LOCALE_KEY: &str = "locale";
pub const PREFERENCE_SET_KEY: &str = "language-preference-set";
pub const LOCALE_META_KEY: &str = "locale-meta";

/// A string key/value store such as the browser's `localStorage`.
pub trait KeyValueStore {
	fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

	/// Write every entry or none of them.
	fn set_all(&mut self, entries: &[(&str, String)]) -> Result<(), StoreError>;
}

/// In-memory store. Clones share the same entries, like two handles on one
/// page's storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
	entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.entries.borrow().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.borrow().is_empty()
	}

	/// Drop every entry, as when the user clears site data.
	pub fn clear(&self) {
		self.entries.borrow_mut().clear();
	}
}

impl KeyValueStore for MemoryStore {
	fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
		Ok(self.entries.borrow().get(key).cloned())
	}

	fn set_all(&mut self, entries: &[(&str, String)]) -> Result<(), StoreError> {
		let mut map = self.entries.borrow_mut();
		for (key, value) in entries {
			map.insert((*key).to_string(), value.clone());
		}
		Ok(())
	}
}

/// Store for contexts without client storage (prerendering, locked-down
/// browsers). Every operation fails with [`StoreError::Unavailable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
	fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
		Err(StoreError::Unavailable)
	}

	fn set_all(&mut self, _entries: &[(&str, String)]) -> Result<(), StoreError> {
		Err(StoreError::Unavailable)
	}
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocaleMeta {
	set_explicitly: bool,
	set_at: DateTime<Utc>,
}

/// [`PreferenceStore`] over a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct LocalPreferences<S> {
	store: S,
	registry: Arc<LocaleRegistry>,
}

impl<S: KeyValueStore> LocalPreferences<S> {
	pub fn new(store: S, registry: Arc<LocaleRegistry>) -> Self {
		Self { store, registry }
	}

	/// `true` when neither a supported locale nor the preference-set flag is
	/// stored. Unreadable storage counts as a returning visitor, so no prompt
	/// is shown.
	pub fn is_first_visit(&self) -> bool {
		let locale = self.store.get(LOCALE_KEY);
		let flag = self.store.get(PREFERENCE_SET_KEY);
		match (locale, flag) {
			(Ok(code), Ok(None)) => code.and_then(|c| self.registry.supported(&c)).is_none(),
			(Ok(_), Ok(Some(_))) => false,
			(Err(e), _) | (_, Err(e)) => {
				tracing::debug!(error = %e, "client storage unreadable, treating as returning visitor");
				false
			}
		}
	}

	/// Record that the user made a choice, without touching the locale.
	pub fn mark_preference_set(&mut self) -> Result<(), StoreError> {
		self.store.set_all(&[(PREFERENCE_SET_KEY, "true".to_string())])
	}

	pub fn inner(&self) -> &S {
		&self.store
	}
}

impl<S: KeyValueStore> PreferenceStore for LocalPreferences<S> {
	fn load(&self) -> Result<Option<PreferenceRecord>, PreferenceStoreError> {
		let Some(code) = self.store.get(LOCALE_KEY)? else {
			return Ok(None);
		};
		let Some(locale) = self.registry.supported(&code) else {
			tracing::debug!(code = %code, "ignoring stored locale not in registry");
			return Ok(None);
		};

		let meta = self
			.store
			.get(LOCALE_META_KEY)?
			.and_then(|raw| serde_json::from_str::<LocaleMeta>(&raw).ok());

		// Records written before the meta key existed were always user choices.
		let set_explicitly = match &meta {
			Some(meta) => meta.set_explicitly,
			None => self.store.get(PREFERENCE_SET_KEY)?.as_deref() == Some("true"),
		};

		Ok(Some(PreferenceRecord {
			locale,
			set_explicitly,
			set_at: meta.map_or(DateTime::<Utc>::UNIX_EPOCH, |m| m.set_at),
		}))
	}

	fn save(&mut self, record: &PreferenceRecord) -> Result<(), PreferenceStoreError> {
		let meta = serde_json::to_string(&LocaleMeta {
			set_explicitly: record.set_explicitly,
			set_at: record.set_at,
		})
		.map_err(|e| PreferenceStoreError::Serialization(e.to_string()))?;

		let mut entries = vec![
			(LOCALE_KEY, record.locale.as_str().to_string()),
			(LOCALE_META_KEY, meta),
		];
		if record.set_explicitly {
			entries.push((PREFERENCE_SET_KEY, "true".to_string()));
		}

		self.store.set_all(&entries)?;
		Ok(())
	}
}
