//! Credential-store contract and built-in implementations.
//!
//! The gate never owns the storage schema for principal records; it only needs lookup by a
//! unique identifier, creation, and an atomic secret update. Backends fail atomically on
//! storage errors, leaving no partial state.

pub mod memory;

pub use memory::MemoryCredentialStore;

// self
use crate::{_prelude::*, identity::PrincipalId};

/// Boxed future returned by [`CredentialStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract for principal records.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Fetches at most one principal matching the unique identifier, or none.
	fn find_by_identifier<'a>(
		&'a self,
		identifier: &'a str,
	) -> StoreFuture<'a, Option<PrincipalRecord>>;

	/// Persists a new principal; fails with [`StoreError::Conflict`] when the identifier is
	/// already taken.
	fn create(&self, principal: NewPrincipal) -> StoreFuture<'_, PrincipalRecord>;

	/// Replaces the principal's secret digest transactionally.
	fn update_secret<'a>(
		&'a self,
		id: &'a PrincipalId,
		secret_digest: &'a str,
	) -> StoreFuture<'a, ()>;
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
	/// Uniqueness violation on the identifier column.
	#[error("Identifier is already taken.")]
	Conflict,
	/// The targeted principal does not exist.
	#[error("Principal not found.")]
	NotFound,
}

/// Stored principal record.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalRecord {
	/// Stable principal identifier.
	pub id: PrincipalId,
	/// Unique login identifier (username, email, ...).
	pub identifier: String,
	/// Hashed secret; never the plaintext.
	pub secret_digest: String,
	/// Optional delivery address for notifications.
	pub contact: Option<String>,
}
impl PrincipalRecord {
	/// Builds the opaque subject payload signed into this principal's tokens.
	pub fn subject(&self) -> Json {
		serde_json::json!({ "principal_id": self.id.as_ref() })
	}
}
impl Debug for PrincipalRecord {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PrincipalRecord")
			.field("id", &self.id)
			.field("identifier", &self.identifier)
			.field("secret_digest", &"<redacted>")
			.field("contact", &self.contact)
			.finish()
	}
}

/// Input for creating a principal; the secret is already hashed by the time it reaches the
/// store.
#[derive(Clone, PartialEq, Eq)]
pub struct NewPrincipal {
	/// Unique login identifier.
	pub identifier: String,
	/// Hashed secret.
	pub secret_digest: String,
	/// Optional delivery address for notifications.
	pub contact: Option<String>,
}
impl Debug for NewPrincipal {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("NewPrincipal")
			.field("identifier", &self.identifier)
			.field("secret_digest", &"<redacted>")
			.field("contact", &self.contact)
			.finish()
	}
}
