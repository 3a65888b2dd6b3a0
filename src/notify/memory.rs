//! In-process [`Notifier`] that records messages for tests and demos.

// self
use crate::{
	_prelude::*,
	notify::{Message, Notifier, NotifyError, NotifyFuture},
};

/// Recording notifier; optionally fails every delivery to exercise degraded-success paths.
#[derive(Clone, Debug, Default)]
pub struct MemoryNotifier {
	sent: Arc<RwLock<Vec<Message>>>,
	failing: Arc<RwLock<bool>>,
}
impl MemoryNotifier {
	/// Returns a copy of every delivered message.
	pub fn sent(&self) -> Vec<Message> {
		self.sent.read().clone()
	}

	/// Makes subsequent deliveries fail (or succeed again).
	pub fn set_failing(&self, failing: bool) {
		*self.failing.write() = failing;
	}
}
impl Notifier for MemoryNotifier {
	fn deliver<'a>(&'a self, message: &'a Message) -> NotifyFuture<'a> {
		let sent = self.sent.clone();
		let failing = *self.failing.read();
		let message = message.clone();

		Box::pin(async move {
			if failing {
				return Err(NotifyError::Delivery { message: "memory notifier set to fail".into() });
			}

			sent.write().push(message);

			Ok(())
		})
	}
}
