// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use storefront_common_i18n::PreferenceStoreError;
use thiserror::Error;

/// Errors from a client key/value store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
	#[error("client storage is unavailable")]
	Unavailable,

	#[error("client storage rejected the write: {0}")]
	Rejected(String),
}

impl From<StoreError> for PreferenceStoreError {
	fn from(err: StoreError) -> Self {
		match err {
			StoreError::Unavailable => PreferenceStoreError::Unavailable,
			StoreError::Rejected(message) => PreferenceStoreError::Backend(message),
		}
	}
}
