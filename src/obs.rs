//! Optional observability helpers for gate stages.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `auth_gate.stage` with the `stage` and
//!   `call` fields, plus warning events that distinguish integrity failures (tampered or
//!   wrong-key tokens) from mere expiry.
//! - Enable `metrics` to increment the `auth_gate_stage_total` counter for every
//!   attempt/success/failure, labeled by `stage` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Gate stages observed across the request pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GateStage {
	/// Guard pipeline (rate limit + lockout) ahead of credential checks.
	Admission,
	/// Credential login flow.
	Login,
	/// Bearer validation / refresh renewal.
	Authenticate,
	/// Refresh-channel clearing.
	Logout,
	/// Principal registration flow.
	Register,
	/// Password reset flow.
	PasswordReset,
}
impl GateStage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			GateStage::Admission => "admission",
			GateStage::Login => "login",
			GateStage::Authenticate => "authenticate",
			GateStage::Logout => "logout",
			GateStage::Register => "register",
			GateStage::PasswordReset => "password_reset",
		}
	}
}
impl Display for GateStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageOutcome {
	/// Entry to a gate stage.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl StageOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StageOutcome::Attempt => "attempt",
			StageOutcome::Success => "success",
			StageOutcome::Failure => "failure",
		}
	}
}
impl Display for StageOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Logs a token rejection, separating integrity failures from expiry for security monitoring.
///
/// The caller-visible error stays generic either way; only server-side observability keeps the
/// distinction.
pub fn note_rejection(stage: GateStage, error: &Error) {
	#[cfg(feature = "tracing")]
	{
		if error.is_integrity_failure() {
			::tracing::warn!(
				stage = stage.as_str(),
				class = "integrity",
				"rejected token with an invalid signature or malformed structure",
			);
		} else {
			::tracing::info!(
				stage = stage.as_str(),
				class = "expiry",
				error = %error,
				"rejected request",
			);
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (stage, error);
	}
}
