//! Optional observability helpers for the action's remote steps.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (default) to emit structured spans named `session_revoke.step` with the
//!   `step` and `stage` fields (failed steps also carry `kind`), plus the lifecycle events logged by the action.
//! - Enable `metrics` to increment the `session_revoke_step_total` counter for every
//!   attempt/success/failure, labeled by `step` + `outcome`.

mod metrics;
mod tracing;

pub use self::{metrics::*, tracing::*};

// self
use crate::_prelude::*;

/// Runs one remote step inside a [`StepSpan`] and counts its attempt and outcome.
pub async fn observe<T, Fut>(step: ActionStep, stage: &'static str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = StepSpan::new(step, stage);

	record_step_outcome(step, StepOutcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => record_step_outcome(step, StepOutcome::Success),
		Err(e) => {
			span.record_failure(e);
			record_step_outcome(step, StepOutcome::Failure);
		},
	}

	result
}

/// Remote steps performed during an invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionStep {
	/// OAuth 2.0 client-credentials token exchange.
	TokenExchange,
	/// Email to user identifier lookup.
	IdentityLookup,
	/// Session invalidation for the resolved user.
	SessionReset,
}
impl ActionStep {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ActionStep::TokenExchange => "token_exchange",
			ActionStep::IdentityLookup => "identity_lookup",
			ActionStep::SessionReset => "session_reset",
		}
	}
}
impl Display for ActionStep {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepOutcome {
	/// Entry to a step.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl StepOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StepOutcome::Attempt => "attempt",
			StepOutcome::Success => "success",
			StepOutcome::Failure => "failure",
		}
	}
}
impl Display for StepOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
