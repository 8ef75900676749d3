// self
use crate::{_prelude::*, obs::ActionStep};

/// Future returned by [`StepSpan::instrument`].
#[cfg(feature = "tracing")]
pub type InstrumentedStep<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`StepSpan::instrument`].
#[cfg(not(feature = "tracing"))]
pub type InstrumentedStep<F> = F;

/// `session_revoke.step` span around one remote call.
///
/// The `kind` field stays empty until [`StepSpan::record_failure`] stamps the error class.
#[derive(Clone, Debug)]
pub struct StepSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl StepSpan {
	/// Opens a span for `step`; `stage` names the client method doing the work.
	pub fn new(step: ActionStep, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"session_revoke.step",
				step = step.as_str(),
				stage,
				kind = tracing::field::Empty
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (step, stage);

			Self {}
		}
	}

	/// Runs `fut` inside the span.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedStep<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			tracing::Instrument::instrument(fut, self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}

	/// Stamps the span with the failure's classification.
	pub fn record_failure(&self, err: &Error) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("kind", err.kind().as_str());
			tracing::debug!(parent: &self.span, error = %err, "Step failed.");
		}
		#[cfg(not(feature = "tracing"))]
		let _ = err;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn span_passes_output_through() {
		let span = StepSpan::new(ActionStep::IdentityLookup, "resolve_identity");
		let value = span.instrument(async { 7 }).await;

		span.record_failure(&Error::fatal("boom"));

		assert_eq!(value, 7);
	}
}
