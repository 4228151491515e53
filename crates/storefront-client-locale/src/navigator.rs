// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

/// Browser effects the reconciler needs: client-side navigation and cookie
/// writes (`document.cookie`).
pub trait Navigator {
	fn navigate(&mut self, path: &str);

	/// Store one cookie, given in `Set-Cookie` syntax.
	fn set_cookie(&mut self, cookie: &str);
}

impl<N: Navigator + ?Sized> Navigator for &mut N {
	fn navigate(&mut self, path: &str) {
		(**self).navigate(path);
	}

	fn set_cookie(&mut self, cookie: &str) {
		(**self).set_cookie(cookie);
	}
}
