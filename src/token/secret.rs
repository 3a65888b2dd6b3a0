//! Secure signing-key wrapper that redacts sensitive material.

// self
use crate::_prelude::*;

/// Redacted signing-key wrapper keeping key material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningKey(String);
impl SigningKey {
	/// Wraps new key material.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner key material. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for SigningKey {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for SigningKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("SigningKey").field(&"<redacted>").finish()
	}
}
impl Display for SigningKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
