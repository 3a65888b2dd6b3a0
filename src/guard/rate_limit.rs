//! Fixed-window request counter keyed by caller identity.
//!
//! A burst spanning a window boundary can admit up to twice the budget across the boundary;
//! that is an accepted property of fixed-window counting, not a bug. Callers who need a
//! continuously sliding interval should look at [`crate::guard::BruteForceGuard`] for the
//! shape of that bookkeeping.

// self
use crate::{
	_prelude::*,
	guard::{Decision, RetryDirective},
	identity::ClientKey,
	policy::RateLimitRule,
};

type SlotMap = Arc<Mutex<HashMap<ClientKey, WindowSlot>>>;

#[derive(Clone, Copy, Debug)]
struct WindowSlot {
	window_index: i64,
	count: u32,
}

/// Fixed-window request counter shared by every clone of the limiter.
///
/// A key's slot is lazily reset when a request arrives in a later window, so the map holds at
/// most one slot per identity ever seen; there is no background sweep. Deployments with very
/// large identity cardinality still need external eviction of idle keys.
#[derive(Clone, Debug)]
pub struct RateLimiter {
	rule: RateLimitRule,
	slots: SlotMap,
}
impl RateLimiter {
	/// Creates a limiter with its own isolated store.
	pub fn new(rule: RateLimitRule) -> Self {
		Self { rule, slots: Default::default() }
	}

	/// Returns the configured budget rule.
	pub const fn rule(&self) -> RateLimitRule {
		self.rule
	}

	/// Checks the caller's budget for the window containing `now` and counts the request when
	/// admitted. The rejecting request itself is never counted.
	pub fn check_and_increment_at(&self, key: &ClientKey, now: OffsetDateTime) -> Decision {
		// Index arithmetic counts in whole seconds; a rule that bypassed policy validation with
		// a sub-second window collapses to one second instead of dividing by zero.
		let window_seconds = self.rule.window.whole_seconds().max(1);
		let window_index = now.unix_timestamp().div_euclid(window_seconds);
		let mut slots = self.slots.lock();
		let slot = slots
			.entry(key.clone())
			.and_modify(|slot| {
				if slot.window_index != window_index {
					*slot = WindowSlot { window_index, count: 0 };
				}
			})
			.or_insert(WindowSlot { window_index, count: 0 });

		if slot.count >= self.rule.limit {
			let window_end = OffsetDateTime::from_unix_timestamp(
				(window_index + 1) * window_seconds,
			)
			.unwrap_or(now + self.rule.window);

			return Decision::Reject(RetryDirective::new(window_end, window_end - now));
		}

		slot.count += 1;

		Decision::Allow
	}

	/// Convenience wrapper around [`Self::check_and_increment_at`] using the current clock.
	pub fn check_and_increment(&self, key: &ClientKey) -> Decision {
		self.check_and_increment_at(key, OffsetDateTime::now_utc())
	}
}
