//! Notification delivery contract (email, magic links, webhooks).
//!
//! Delivery failure must never roll back an already-committed credential-store mutation; the
//! flows surface it as a degraded success instead. That eventual-consistency gap is accepted.

pub mod memory;
#[cfg(feature = "reqwest")] pub mod webhook;

pub use memory::MemoryNotifier;
#[cfg(feature = "reqwest")] pub use webhook::WebhookNotifier;

// self
use crate::_prelude::*;

/// Boxed future returned by [`Notifier::deliver`].
pub type NotifyFuture<'a> = Pin<Box<dyn Future<Output = Result<(), NotifyError>> + 'a + Send>>;

/// Error type produced by [`Notifier`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum NotifyError {
	/// Transport-level delivery failure.
	#[error("Notification delivery failed: {message}.")]
	Delivery {
		/// Human-readable error payload.
		message: String,
	},
	/// The delivery endpoint rejected the message.
	#[error("Notification endpoint rejected the message with status {status}.")]
	Rejected {
		/// HTTP status returned by the endpoint.
		status: u16,
	},
}

/// A message to deliver to a principal's contact address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
	/// Delivery address.
	pub recipient: String,
	/// Message subject line.
	pub subject: String,
	/// Message body.
	pub body: String,
}

/// Delivery contract implemented by notification backends.
pub trait Notifier
where
	Self: Send + Sync,
{
	/// Attempts to deliver the message.
	fn deliver<'a>(&'a self, message: &'a Message) -> NotifyFuture<'a>;
}
