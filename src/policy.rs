//! Injected gate configuration: signing material, token validity windows, and guard budgets.

// self
use crate::{
	_prelude::*,
	token::{SignatureScheme, SigningKey},
};

/// Default access-token validity window.
pub const DEFAULT_ACCESS_TTL: Duration = Duration::minutes(30);
/// Default refresh-token validity window.
pub const DEFAULT_REFRESH_TTL: Duration = Duration::days(7);
/// Default fixed-window request budget.
pub const DEFAULT_RATE_LIMIT: u32 = 60;
/// Default fixed-window length for the rate limiter.
pub const DEFAULT_RATE_WINDOW: Duration = Duration::seconds(60);
/// Default failure budget before lockout.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
/// Default sliding-window length for the brute-force guard.
pub const DEFAULT_BRUTE_FORCE_WINDOW: Duration = Duration::seconds(300);

/// Validation failures raised while building a [`GatePolicy`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum PolicyError {
	/// Signing key material was empty.
	#[error("Signing key must not be empty.")]
	EmptySigningKey,
	/// A validity window or guard window was zero or negative.
	#[error("The {field} duration must be positive.")]
	NonPositiveDuration {
		/// Name of the offending configuration field.
		field: &'static str,
	},
	/// The refresh validity window does not strictly exceed the access window.
	#[error("Refresh TTL must strictly exceed the access TTL.")]
	RefreshNotLongerThanAccess,
	/// A guard window is shorter than the one-second counting granularity.
	#[error("The {field} window must be at least one second.")]
	WindowTooShort {
		/// Name of the offending configuration field.
		field: &'static str,
	},
	/// A guard budget was configured as zero.
	#[error("The {field} budget must be at least one.")]
	ZeroBudget {
		/// Name of the offending configuration field.
		field: &'static str,
	},
}

/// Fixed-window request budget for the rate limiter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitRule {
	/// Maximum requests admitted per window.
	pub limit: u32,
	/// Fixed window length.
	pub window: Duration,
}

/// Sliding-window failure budget for the brute-force guard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BruteForceRule {
	/// Failures tolerated within the trailing window before lockout.
	pub max_attempts: u32,
	/// Trailing window length.
	pub window: Duration,
}

/// Validated gate configuration shared by the token lifecycle and both guards.
#[derive(Clone, Debug)]
pub struct GatePolicy {
	/// HMAC signing key material.
	pub signing_key: SigningKey,
	/// Signature scheme applied to every issued token.
	pub scheme: SignatureScheme,
	/// Access-token validity window.
	pub access_ttl: Duration,
	/// Refresh-token validity window; strictly exceeds `access_ttl`.
	pub refresh_ttl: Duration,
	/// Request budget enforced before credential-checking endpoints run.
	pub rate_limit: RateLimitRule,
	/// Failure budget enforced on authentication failures.
	pub brute_force: BruteForceRule,
}
impl GatePolicy {
	/// Returns a builder seeded with the provided signing key and default windows.
	pub fn builder(signing_key: impl Into<String>) -> GatePolicyBuilder {
		GatePolicyBuilder::new(signing_key)
	}
}

/// Builder for [`GatePolicy`].
#[derive(Clone, Debug)]
pub struct GatePolicyBuilder {
	signing_key: String,
	scheme: SignatureScheme,
	access_ttl: Duration,
	refresh_ttl: Duration,
	rate_limit: RateLimitRule,
	brute_force: BruteForceRule,
}
impl GatePolicyBuilder {
	fn new(signing_key: impl Into<String>) -> Self {
		Self {
			signing_key: signing_key.into(),
			scheme: SignatureScheme::Hs256,
			access_ttl: DEFAULT_ACCESS_TTL,
			refresh_ttl: DEFAULT_REFRESH_TTL,
			rate_limit: RateLimitRule { limit: DEFAULT_RATE_LIMIT, window: DEFAULT_RATE_WINDOW },
			brute_force: BruteForceRule {
				max_attempts: DEFAULT_MAX_ATTEMPTS,
				window: DEFAULT_BRUTE_FORCE_WINDOW,
			},
		}
	}

	/// Selects the signature scheme.
	pub fn scheme(mut self, scheme: SignatureScheme) -> Self {
		self.scheme = scheme;

		self
	}

	/// Sets the access-token validity window.
	pub fn access_ttl(mut self, ttl: Duration) -> Self {
		self.access_ttl = ttl;

		self
	}

	/// Sets the refresh-token validity window.
	pub fn refresh_ttl(mut self, ttl: Duration) -> Self {
		self.refresh_ttl = ttl;

		self
	}

	/// Sets the fixed-window request budget.
	pub fn rate_limit(mut self, limit: u32, window: Duration) -> Self {
		self.rate_limit = RateLimitRule { limit, window };

		self
	}

	/// Sets the sliding-window failure budget.
	pub fn brute_force(mut self, max_attempts: u32, window: Duration) -> Self {
		self.brute_force = BruteForceRule { max_attempts, window };

		self
	}

	/// Validates the configuration and produces a [`GatePolicy`].
	pub fn build(self) -> Result<GatePolicy, PolicyError> {
		if self.signing_key.is_empty() {
			return Err(PolicyError::EmptySigningKey);
		}

		for (field, duration) in [
			("access_ttl", self.access_ttl),
			("refresh_ttl", self.refresh_ttl),
			("rate_limit.window", self.rate_limit.window),
			("brute_force.window", self.brute_force.window),
		] {
			if !duration.is_positive() {
				return Err(PolicyError::NonPositiveDuration { field });
			}
		}

		if self.refresh_ttl <= self.access_ttl {
			return Err(PolicyError::RefreshNotLongerThanAccess);
		}

		// Window indices are computed in whole seconds; a sub-second window would truncate to a
		// zero-length window.
		for (field, window) in [
			("rate_limit.window", self.rate_limit.window),
			("brute_force.window", self.brute_force.window),
		] {
			if window < Duration::SECOND {
				return Err(PolicyError::WindowTooShort { field });
			}
		}

		if self.rate_limit.limit == 0 {
			return Err(PolicyError::ZeroBudget { field: "rate_limit.limit" });
		}
		if self.brute_force.max_attempts == 0 {
			return Err(PolicyError::ZeroBudget { field: "brute_force.max_attempts" });
		}

		Ok(GatePolicy {
			signing_key: SigningKey::new(self.signing_key),
			scheme: self.scheme,
			access_ttl: self.access_ttl,
			refresh_ttl: self.refresh_ttl,
			rate_limit: self.rate_limit,
			brute_force: self.brute_force,
		})
	}
}
