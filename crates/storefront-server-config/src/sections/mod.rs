// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

mod http;
mod locale;
mod logging;

pub use http::{HttpConfig, HttpConfigLayer};
pub use locale::{LocaleConfig, LocaleConfigLayer, DEFAULT_EXCLUDED_PREFIXES, DEFAULT_GEO_COUNTRY_HEADER};
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
