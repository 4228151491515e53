// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Build information for storefront-server.

/// Format version info for display.
pub fn format_version_info() -> String {
	format!(
		"storefront-server version: {}\n\
         Git SHA:                   {}\n\
         Platform:                  {}-{}",
		env!("CARGO_PKG_VERSION"),
		option_env!("STOREFRONT_GIT_SHA").unwrap_or("unknown"),
		std::env::consts::OS,
		std::env::consts::ARCH,
	)
}
