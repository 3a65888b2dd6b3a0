//! Webhook-backed [`Notifier`] that posts messages to an HTTP endpoint.

// crates.io
use reqwest::Client;
// self
use crate::{
	_prelude::*,
	notify::{Message, Notifier, NotifyError, NotifyFuture},
};

/// Posts each message as a JSON document to a configured endpoint.
#[derive(Clone, Debug)]
pub struct WebhookNotifier {
	client: Client,
	endpoint: Url,
}
impl WebhookNotifier {
	/// Creates a notifier targeting the provided endpoint with a default client.
	pub fn new(endpoint: Url) -> Self {
		Self::with_client(Client::new(), endpoint)
	}

	/// Creates a notifier that reuses a caller-provided client.
	pub fn with_client(client: Client, endpoint: Url) -> Self {
		Self { client, endpoint }
	}
}
impl Notifier for WebhookNotifier {
	fn deliver<'a>(&'a self, message: &'a Message) -> NotifyFuture<'a> {
		Box::pin(async move {
			let response = self
				.client
				.post(self.endpoint.clone())
				.json(message)
				.send()
				.await
				.map_err(|e| NotifyError::Delivery { message: e.to_string() })?;
			let status = response.status();

			if !status.is_success() {
				return Err(NotifyError::Rejected { status: status.as_u16() });
			}

			Ok(())
		})
	}
}
