//! Request-boundary security toolkit: bearer-token lifecycles with refresh rotation,
//! fixed-window rate limiting, brute-force lockout, and the credential flows they guard.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod error;
pub mod flows;
pub mod guard;
pub mod hasher;
pub mod http;
pub mod identity;
pub mod notify;
pub mod obs;
pub mod policy;
pub mod store;
pub mod token;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::{
		_prelude::*,
		flows::Gate,
		hasher::{Argon2Hasher, SecretHasher},
		identity::ClientKey,
		notify::{MemoryNotifier, Notifier},
		policy::GatePolicy,
		store::{CredentialStore, MemoryCredentialStore, NewPrincipal},
	};

	/// Constructs a [`Gate`] backed by in-memory collaborators, returning the concrete store and
	/// notifier handles so tests can inspect them.
	pub fn build_memory_gate(
		policy: GatePolicy,
	) -> (Gate, Arc<MemoryCredentialStore>, Arc<MemoryNotifier>) {
		let store_backend = Arc::new(MemoryCredentialStore::default());
		let store: Arc<dyn CredentialStore> = store_backend.clone();
		let notifier_backend = Arc::new(MemoryNotifier::default());
		let notifier: Arc<dyn Notifier> = notifier_backend.clone();
		let hasher: Arc<dyn SecretHasher> = Arc::new(Argon2Hasher::default());
		let gate = Gate::new(policy, store, hasher, notifier);

		(gate, store_backend, notifier_backend)
	}

	/// Builds a policy fixture with short guard windows suitable for deterministic tests.
	pub fn test_policy() -> GatePolicy {
		GatePolicy::builder("test-signing-key-material")
			.access_ttl(Duration::minutes(30))
			.refresh_ttl(Duration::days(7))
			.rate_limit(5, Duration::seconds(60))
			.brute_force(3, Duration::seconds(60))
			.build()
			.expect("Test policy fixture should validate.")
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value as Json;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use url;
#[cfg(test)] use {auth_gate as _, httpmock as _, tokio as _};
