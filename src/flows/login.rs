//! Credential login flow.

// self
use crate::{
	_prelude::*,
	flows::Gate,
	http::CookieDirective,
	identity::ClientKey,
	obs::{self, GateStage, StageOutcome, StageSpan},
	store::PrincipalRecord,
	token::TokenPair,
};

/// Plaintext credentials presented at login.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
	/// Unique login identifier (username, email, ...).
	pub identifier: String,
	/// Plaintext secret; hashed digests never pass through here.
	pub secret: String,
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("identifier", &self.identifier)
			.field("secret", &"<redacted>")
			.finish()
	}
}

/// Successful login result.
#[derive(Clone, Debug)]
pub struct LoginOutcome {
	/// The authenticated principal.
	pub principal: PrincipalRecord,
	/// Freshly minted token pair.
	pub tokens: TokenPair,
	/// Directive that installs the refresh token on its cookie channel.
	pub refresh_cookie: CookieDirective,
}

impl Gate {
	/// Verifies credentials and mints a token pair, with guard admission anchored at `now`.
	///
	/// An unknown identifier and a wrong secret both surface as
	/// [`Error::InvalidCredentials`], and both count one failure against the caller's
	/// lockout log. Guard rejections and infrastructure failures (storage, hashing) are
	/// propagated as themselves and never counted; a successful login clears the log.
	pub async fn login_at(
		&self,
		key: &ClientKey,
		credentials: &Credentials,
		now: OffsetDateTime,
	) -> Result<LoginOutcome> {
		const STAGE: GateStage = GateStage::Login;

		let span = StageSpan::new(STAGE, "login_at");

		obs::record_stage_outcome(STAGE, StageOutcome::Attempt);

		let result = span.instrument(self.login_inner(key, credentials, now)).await;

		match &result {
			Ok(_) => obs::record_stage_outcome(STAGE, StageOutcome::Success),
			Err(e) => {
				obs::record_stage_outcome(STAGE, StageOutcome::Failure);
				obs::note_rejection(STAGE, e);
			},
		}

		result
	}

	/// Convenience wrapper around [`Self::login_at`] using the current clock.
	pub async fn login(
		&self,
		key: &ClientKey,
		credentials: &Credentials,
	) -> Result<LoginOutcome> {
		self.login_at(key, credentials, OffsetDateTime::now_utc()).await
	}

	async fn login_inner(
		&self,
		key: &ClientKey,
		credentials: &Credentials,
		now: OffsetDateTime,
	) -> Result<LoginOutcome> {
		self.admit_at(key, now)?;

		let Some(principal) = self.store.find_by_identifier(&credentials.identifier).await? else {
			// Unknown identifier and wrong secret must be indistinguishable to the caller.
			self.brute_force.record_failure_at(key, now);

			return Err(Error::InvalidCredentials);
		};

		if !self.hasher.verify(&credentials.secret, &principal.secret_digest)? {
			self.brute_force.record_failure_at(key, now);

			return Err(Error::InvalidCredentials);
		}

		self.brute_force.record_success(key);

		let tokens = self.lifecycle.issue_at(&principal.subject(), now)?;
		let refresh_cookie = tokens.refresh_cookie(now);

		Ok(LoginOutcome { principal, tokens, refresh_cookie })
	}
}
