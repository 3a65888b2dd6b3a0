//! Thread-safe in-memory [`CredentialStore`] implementation for local development and tests.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::{
	_prelude::*,
	identity::PrincipalId,
	store::{CredentialStore, NewPrincipal, PrincipalRecord, StoreError, StoreFuture},
};

type RecordMap = Arc<RwLock<HashMap<PrincipalId, PrincipalRecord>>>;

/// Thread-safe storage backend that keeps records in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryCredentialStore {
	records: RecordMap,
	next_id: Arc<AtomicU64>,
}
impl MemoryCredentialStore {
	/// Returns the number of stored principals.
	pub fn len(&self) -> usize {
		self.records.read().len()
	}

	/// Returns `true` when no principal is stored.
	pub fn is_empty(&self) -> bool {
		self.records.read().is_empty()
	}

	fn find_now(records: RecordMap, identifier: String) -> Option<PrincipalRecord> {
		records.read().values().find(|record| record.identifier == identifier).cloned()
	}

	fn create_now(
		records: RecordMap,
		next_id: Arc<AtomicU64>,
		principal: NewPrincipal,
	) -> Result<PrincipalRecord, StoreError> {
		let mut guard = records.write();

		if guard.values().any(|record| record.identifier == principal.identifier) {
			return Err(StoreError::Conflict);
		}

		let sequence = next_id.fetch_add(1, Ordering::Relaxed) + 1;
		let id = PrincipalId::new(format!("principal-{sequence}"))
			.map_err(|e| StoreError::Backend { message: e.to_string() })?;
		let record = PrincipalRecord {
			id: id.clone(),
			identifier: principal.identifier,
			secret_digest: principal.secret_digest,
			contact: principal.contact,
		};

		guard.insert(id, record.clone());

		Ok(record)
	}

	fn update_now(
		records: RecordMap,
		id: PrincipalId,
		secret_digest: String,
	) -> Result<(), StoreError> {
		let mut guard = records.write();

		match guard.get_mut(&id) {
			Some(record) => {
				record.secret_digest = secret_digest;

				Ok(())
			},
			None => Err(StoreError::NotFound),
		}
	}
}
impl CredentialStore for MemoryCredentialStore {
	fn find_by_identifier<'a>(
		&'a self,
		identifier: &'a str,
	) -> StoreFuture<'a, Option<PrincipalRecord>> {
		let records = self.records.clone();
		let identifier = identifier.to_owned();

		Box::pin(async move { Ok(Self::find_now(records, identifier)) })
	}

	fn create(&self, principal: NewPrincipal) -> StoreFuture<'_, PrincipalRecord> {
		let records = self.records.clone();
		let next_id = self.next_id.clone();

		Box::pin(async move { Self::create_now(records, next_id, principal) })
	}

	fn update_secret<'a>(
		&'a self,
		id: &'a PrincipalId,
		secret_digest: &'a str,
	) -> StoreFuture<'a, ()> {
		let records = self.records.clone();
		let id = id.to_owned();
		let secret_digest = secret_digest.to_owned();

		Box::pin(async move { Self::update_now(records, id, secret_digest) })
	}
}
