//! Abuse-throttling guards protecting credential-checking endpoints.
//!
//! Two independent counters gate the authentication surface: a fixed-window request budget
//! ([`RateLimiter`]) and a sliding-window failure log ([`BruteForceGuard`]). Each store sits
//! behind its own mutex; the two are never updated together atomically. Every
//! read-modify-write on a counter entry executes as one critical section, so concurrent
//! requests can never over-admit past the configured budget.

pub mod brute_force;
pub mod rate_limit;

pub use brute_force::*;
pub use rate_limit::*;

// self
use crate::_prelude::*;

/// Outcome of a rate-limit admission check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
	/// The request is within budget and has been counted.
	Allow,
	/// The request exceeds the window budget and was not counted.
	Reject(RetryDirective),
}

/// Machine-readable retry hint accompanying a rejection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryDirective {
	/// Instant when it is safe to retry.
	pub earliest_retry_at: OffsetDateTime,
	/// Suggested backoff duration.
	pub recommended_backoff: Duration,
}
impl RetryDirective {
	/// Creates a new directive with the provided timing metadata.
	pub fn new(earliest_retry_at: OffsetDateTime, recommended_backoff: Duration) -> Self {
		Self { earliest_retry_at, recommended_backoff }
	}
}

/// Outcome of a brute-force lockout evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
	/// The identity is below its failure budget.
	Allowed,
	/// The identity accumulated too many recent failures and must wait.
	Locked,
}
