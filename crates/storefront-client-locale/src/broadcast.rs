// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-process publish/subscribe for locale changes.
//!
//! Delivery is synchronous, in registration order, to the subscribers present
//! when [`ChangeBroadcaster::publish`] is called. There is no replay: a
//! subscriber added later never sees an earlier event. Subscriptions end when
//! their [`Subscription`] handle is dropped.

use std::{
	cell::RefCell,
	fmt,
	rc::{Rc, Weak},
};

use serde::Serialize;
use storefront_common_i18n::LocaleCode;

/// The active locale changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LocaleChanged {
	pub locale: LocaleCode,
}

impl LocaleChanged {
	pub const EVENT_NAME: &'static str = "localeChange";
}

type Handler = Rc<dyn Fn(&LocaleChanged)>;

#[derive(Default)]
struct Subscribers {
	next_id: u64,
	handlers: Vec<(u64, Handler)>,
}

/// Cheap to clone; clones share subscribers.
#[derive(Clone, Default)]
pub struct ChangeBroadcaster {
	inner: Rc<RefCell<Subscribers>>,
}

impl fmt::Debug for ChangeBroadcaster {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ChangeBroadcaster")
			.field("subscribers", &self.subscriber_count())
			.finish()
	}
}

impl ChangeBroadcaster {
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use = "the subscription ends when the handle is dropped"]
	pub fn subscribe<F>(&self, handler: F) -> Subscription
	where
		F: Fn(&LocaleChanged) + 'static,
	{
		let handler: Handler = Rc::new(handler);
		let mut subs = self.inner.borrow_mut();
		let id = subs.next_id;
		subs.next_id += 1;
		subs.handlers.push((id, handler));
		Subscription {
			id,
			subscribers: Rc::downgrade(&self.inner),
		}
	}

	/// Deliver `event` and return how many subscribers received it.
	///
	/// Handlers may subscribe, unsubscribe or publish from inside a delivery.
	pub fn publish(&self, event: LocaleChanged) -> usize {
		let snapshot: Vec<Handler> = self
			.inner
			.borrow()
			.handlers
			.iter()
			.map(|(_, h)| Rc::clone(h))
			.collect();

		tracing::debug!(
			event = LocaleChanged::EVENT_NAME,
			locale = %event.locale,
			subscribers = snapshot.len(),
			"publishing locale change"
		);

		for handler in &snapshot {
			handler(&event);
		}
		snapshot.len()
	}

	pub fn subscriber_count(&self) -> usize {
		self.inner.borrow().handlers.len()
	}
}

/// Handle keeping a subscription alive.
pub struct Subscription {
	id: u64,
	subscribers: Weak<RefCell<Subscribers>>,
}

impl Subscription {
	pub fn unsubscribe(self) {}
}

impl fmt::Debug for Subscription {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Subscription").field("id", &self.id).finish()
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		let Some(subscribers) = self.subscribers.upgrade() else {
			return;
		};
		// Released outside the borrow: the handler may own other subscriptions.
		let removed = {
			let mut subs = subscribers.borrow_mut();
			subs.handlers
				.iter()
				.position(|(id, _)| *id == self.id)
				.map(|idx| subs.handlers.remove(idx))
		};
		drop(removed);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::cell::Cell;

	fn changed(locale: LocaleCode) -> LocaleChanged {
		LocaleChanged { locale }
	}

	#[test]
	fn delivers_in_registration_order() {
		let broadcaster = ChangeBroadcaster::new();
		let log = Rc::new(RefCell::new(Vec::new()));

		let subs: Vec<Subscription> = (0..3)
			.map(|n| {
				let log = log.clone();
				broadcaster.subscribe(move |e| log.borrow_mut().push((n, e.locale)))
			})
			.collect();

		assert_eq!(broadcaster.publish(changed(LocaleCode::Fr)), 3);
		assert_eq!(
			*log.borrow(),
			vec![(0, LocaleCode::Fr), (1, LocaleCode::Fr), (2, LocaleCode::Fr)]
		);
		drop(subs);
	}

	#[test]
	fn late_subscriber_gets_no_replay() {
		let broadcaster = ChangeBroadcaster::new();
		broadcaster.publish(changed(LocaleCode::De));

		let seen = Rc::new(Cell::new(None));
		let seen_in = seen.clone();
		let _sub = broadcaster.subscribe(move |e| seen_in.set(Some(e.locale)));
		assert_eq!(seen.get(), None);

		broadcaster.publish(changed(LocaleCode::Ja));
		assert_eq!(seen.get(), Some(LocaleCode::Ja));
	}

	#[test]
	fn dropping_subscription_stops_delivery() {
		let broadcaster = ChangeBroadcaster::new();
		let count = Rc::new(Cell::new(0));
		let count_in = count.clone();
		let sub = broadcaster.subscribe(move |_| count_in.set(count_in.get() + 1));

		broadcaster.publish(changed(LocaleCode::Es));
		sub.unsubscribe();
		broadcaster.publish(changed(LocaleCode::Es));

		assert_eq!(count.get(), 1);
		assert_eq!(broadcaster.subscriber_count(), 0);
	}

	#[test]
	fn subscribing_during_delivery_does_not_receive_current_event() {
		let broadcaster = ChangeBroadcaster::new();
		let late_calls = Rc::new(Cell::new(0));
		let held = Rc::new(RefCell::new(Vec::new()));

		let b = broadcaster.clone();
		let late_calls_in = late_calls.clone();
		let held_in = held.clone();
		let _outer = broadcaster.subscribe(move |_| {
			let late_calls = late_calls_in.clone();
			let sub = b.subscribe(move |_| late_calls.set(late_calls.get() + 1));
			held_in.borrow_mut().push(sub);
		});

		broadcaster.publish(changed(LocaleCode::Pt));
		assert_eq!(late_calls.get(), 0);

		broadcaster.publish(changed(LocaleCode::Pt));
		assert_eq!(late_calls.get(), 1);
	}

	#[test]
	fn subscription_outliving_broadcaster_is_harmless() {
		let broadcaster = ChangeBroadcaster::new();
		let sub = broadcaster.subscribe(|_| {});
		drop(broadcaster);
		drop(sub);
	}
}
