// self
use crate::obs::{ActionStep, StepOutcome};

/// Counter incremented once per step outcome, labeled by `step` and `outcome`.
pub const STEP_COUNTER: &str = "session_revoke_step_total";

/// Bumps [`STEP_COUNTER`] on the global recorder. No-op without the `metrics` feature.
pub fn record_step_outcome(step: ActionStep, outcome: StepOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(STEP_COUNTER, "step" => step.as_str(), "outcome" => outcome.as_str())
		.increment(1);
	#[cfg(not(feature = "metrics"))]
	let _ = (step, outcome);
}
