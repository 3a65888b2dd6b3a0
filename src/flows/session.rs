//! Per-request session resolution and logout.

// self
use crate::{
	_prelude::*,
	flows::Gate,
	http::{self, CookieDirective},
	obs::{self, GateStage, StageOutcome, StageSpan},
	token::Authentication,
};

/// Resolved session for one authenticated request, plus the response-side directives a renewal
/// produced.
#[derive(Clone, Debug)]
pub struct SessionOutcome {
	/// Resolved subject payload.
	pub subject: Json,
	/// Replacement access token to surface via [`http::RENEWED_ACCESS_HEADER`], when the request
	/// triggered a renewal.
	pub renewed_access_token: Option<String>,
	/// Rotated refresh-channel cookie to re-set, when the request triggered a renewal.
	pub refresh_cookie: Option<CookieDirective>,
}
impl SessionOutcome {
	/// Returns `true` when the request rode a still-valid access token with no side effects.
	pub const fn is_active(&self) -> bool {
		self.renewed_access_token.is_none()
	}
}

impl Gate {
	/// Resolves the caller's session from the raw `Authorization` header value and the
	/// refresh-channel cookie value, evaluated at `now`.
	///
	/// A header that is not bearer-shaped counts as an absent access token, pushing the request
	/// onto the refresh channel like any other access-less request.
	pub fn authenticate_at(
		&self,
		authorization: Option<&str>,
		refresh_cookie: Option<&str>,
		now: OffsetDateTime,
	) -> Result<SessionOutcome> {
		const STAGE: GateStage = GateStage::Authenticate;

		let _guard = StageSpan::new(STAGE, "authenticate_at").entered();

		obs::record_stage_outcome(STAGE, StageOutcome::Attempt);

		let bearer = authorization.and_then(http::parse_bearer);
		let result =
			self.lifecycle.authenticate_at(bearer, refresh_cookie, now).map(|auth| match auth {
				Authentication::Active { subject } =>
					SessionOutcome { subject, renewed_access_token: None, refresh_cookie: None },
				Authentication::Renewed { subject, tokens } => {
					let refresh_cookie = tokens.refresh_cookie(now);

					SessionOutcome {
						subject,
						renewed_access_token: Some(tokens.access_token),
						refresh_cookie: Some(refresh_cookie),
					}
				},
			});

		obs::record_stage_outcome(
			STAGE,
			if result.is_ok() { StageOutcome::Success } else { StageOutcome::Failure },
		);

		result
	}

	/// Convenience wrapper around [`Self::authenticate_at`] using the current clock.
	pub fn authenticate(
		&self,
		authorization: Option<&str>,
		refresh_cookie: Option<&str>,
	) -> Result<SessionOutcome> {
		self.authenticate_at(authorization, refresh_cookie, OffsetDateTime::now_utc())
	}

	/// Validates the caller's session, then returns the directive that clears the refresh
	/// channel.
	///
	/// Logout requires a live session; an unauthenticated caller cannot probe the endpoint.
	/// Already-issued access tokens stay usable until their natural expiry.
	pub fn logout_at(
		&self,
		authorization: Option<&str>,
		refresh_cookie: Option<&str>,
		now: OffsetDateTime,
	) -> Result<CookieDirective> {
		const STAGE: GateStage = GateStage::Logout;

		let _guard = StageSpan::new(STAGE, "logout_at").entered();

		obs::record_stage_outcome(STAGE, StageOutcome::Attempt);

		let result = self
			.authenticate_at(authorization, refresh_cookie, now)
			.map(|_| self.lifecycle.invalidate());

		obs::record_stage_outcome(
			STAGE,
			if result.is_ok() { StageOutcome::Success } else { StageOutcome::Failure },
		);

		result
	}

	/// Convenience wrapper around [`Self::logout_at`] using the current clock.
	pub fn logout(
		&self,
		authorization: Option<&str>,
		refresh_cookie: Option<&str>,
	) -> Result<CookieDirective> {
		self.logout_at(authorization, refresh_cookie, OffsetDateTime::now_utc())
	}
}
