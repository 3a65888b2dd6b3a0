//! Hardened response header set injected on every response.

// self
use crate::_prelude::*;

/// Baseline security headers applied when no override is configured.
pub const DEFAULT_SECURE_HEADERS: [(&str, &str); 7] = [
	("strict-transport-security", "max-age=63072000; includeSubDomains; preload"),
	("x-frame-options", "DENY"),
	("x-xss-protection", "1; mode=block"),
	("x-content-type-options", "nosniff"),
	("referrer-policy", "no-referrer"),
	("permissions-policy", "camera=(), microphone=(), geolocation=()"),
	("content-security-policy", "default-src 'self'"),
];

/// Secure response header set with per-deployment overrides.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecureHeaders(BTreeMap<String, String>);
impl SecureHeaders {
	/// Overrides or adds a header value.
	pub fn overridden(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.0.insert(name.into().to_ascii_lowercase(), value.into());

		self
	}

	/// Iterates the header pairs to apply to a response.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
	}
}
impl Default for SecureHeaders {
	fn default() -> Self {
		Self(
			DEFAULT_SECURE_HEADERS
				.iter()
				.map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
				.collect(),
		)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_cover_the_baseline_set() {
		let headers = SecureHeaders::default();
		let map: BTreeMap<_, _> = headers.iter().collect();

		assert_eq!(map.len(), DEFAULT_SECURE_HEADERS.len());
		assert_eq!(map.get("x-frame-options"), Some(&"DENY"));
		assert_eq!(map.get("content-security-policy"), Some(&"default-src 'self'"));
	}

	#[test]
	fn overrides_replace_and_extend() {
		let headers = SecureHeaders::default()
			.overridden("X-Frame-Options", "SAMEORIGIN")
			.overridden("x-custom", "1");
		let map: BTreeMap<_, _> = headers.iter().collect();

		assert_eq!(map.get("x-frame-options"), Some(&"SAMEORIGIN"));
		assert_eq!(map.get("x-custom"), Some(&"1"));
		assert_eq!(map.len(), DEFAULT_SECURE_HEADERS.len() + 1);
	}
}
