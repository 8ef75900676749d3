//! Host-facing lifecycle: `invoke`, `error`, and `halt`.
//!
//! An invocation walks [`InvocationStage`] in order (validate, resolve auth, look up the user,
//! pause, reset sessions) and stops at the first failure. Classified errors travel up
//! unchanged; anything unclassified becomes fatal at the `invoke` boundary.

// std
use std::convert::Infallible;
// self
use crate::{
	_prelude::*,
	auth::AuthResolver,
	context::{ErrorParams, ExecutionContext, HaltParams, InvocationParams},
	delay,
	http::ReqwestHttpClient,
	workspace::WorkspaceClient,
};

/// Placeholder reported by `halt` for fields the host did not supply.
pub const UNKNOWN: &str = "unknown";

/// Stages an invocation moves through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InvocationStage {
	/// Checking `userEmail`.
	Validating,
	/// Building the `Authorization` header.
	AuthResolving,
	/// Resolving the email to a user identifier.
	LookingUp,
	/// Pausing between the two remote calls.
	Delaying,
	/// Resetting the user's sessions.
	Invalidating,
	/// Result assembled.
	Succeeded,
}
impl InvocationStage {
	/// Returns a stable label suitable for span or log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			InvocationStage::Validating => "validating",
			InvocationStage::AuthResolving => "auth_resolving",
			InvocationStage::LookingUp => "looking_up",
			InvocationStage::Delaying => "delaying",
			InvocationStage::Invalidating => "invalidating",
			InvocationStage::Succeeded => "succeeded",
		}
	}
}
impl Display for InvocationStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Success artifact returned to the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResult {
	/// Email the host asked about.
	pub user_email: String,
	/// Workspace identifier the email resolved to.
	pub user_id: String,
	/// Always `true` on success.
	pub sessions_revoked: bool,
	/// Instant the reset completed.
	#[serde(with = "time::serde::rfc3339")]
	pub revoked_at: OffsetDateTime,
}

/// Acknowledgment returned when the host abandons a job.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HaltResult {
	/// Email of the abandoned job, or `unknown`.
	pub user_email: String,
	/// Host-supplied reason, or `unknown`.
	pub reason: String,
	/// Instant the halt was acknowledged.
	#[serde(with = "time::serde::rfc3339")]
	pub halted_at: OffsetDateTime,
	/// Always `true`; there is nothing to clean up.
	pub cleanup_completed: bool,
}

/// Revokes every active session of one workspace user per invocation.
///
/// The action owns the HTTP client and the credential resolver only; all per-job state lives in
/// the parameters and context, so one instance may serve concurrent invocations.
#[derive(Clone, Debug, Default)]
pub struct RevokeSessionsAction {
	http: ReqwestHttpClient,
	resolver: AuthResolver,
}
impl RevokeSessionsAction {
	/// Creates an action with the default transport and credential order.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates an action that reuses the caller-provided transport.
	pub fn with_http_client(http: ReqwestHttpClient) -> Self {
		Self { http, resolver: AuthResolver::default() }
	}

	/// Replaces the credential resolver.
	pub fn with_resolver(mut self, resolver: AuthResolver) -> Self {
		self.resolver = resolver;

		self
	}

	/// Runs one invocation.
	///
	/// At most one lookup and one reset are issued. Failures are either
	/// [`Error::Retryable`] or [`Error::Fatal`]; nothing else reaches the host.
	pub async fn invoke(
		&self,
		params: InvocationParams,
		context: &ExecutionContext,
	) -> Result<InvocationResult> {
		#[cfg(feature = "tracing")]
		tracing::info!("Starting session revocation.");

		let mut stage = InvocationStage::Validating;
		let result = self.run(&params, context, &mut stage).await.map_err(Error::into_classified);

		match &result {
			Ok(_) => {
				#[cfg(feature = "tracing")]
				tracing::info!("Session revocation completed.");
			},
			Err(e) => {
				#[cfg(feature = "tracing")]
				tracing::warn!(
					stage = stage.as_str(),
					kind = e.kind().as_str(),
					error = %e,
					"Session revocation failed."
				);
				#[cfg(not(feature = "tracing"))]
				let _ = (stage, e);
			},
		}

		result
	}

	/// Receives the error of a failed invocation and hands it straight back.
	///
	/// The host owns retry and backoff; this entry point never recovers.
	pub fn error(&self, params: ErrorParams, context: &ExecutionContext) -> Result<Infallible> {
		let _ = context;

		#[cfg(feature = "tracing")]
		tracing::info!(
			kind = params.error.kind().as_str(),
			"Re-raising invocation error to the host."
		);

		Err(params.error)
	}

	/// Acknowledges that the host abandoned the job. Performs no I/O.
	pub fn halt(&self, params: HaltParams, context: &ExecutionContext) -> HaltResult {
		let _ = context;
		let reason = or_unknown(params.reason);

		#[cfg(feature = "tracing")]
		tracing::info!(reason = reason.as_str(), "Session revocation halted.");

		HaltResult {
			user_email: or_unknown(params.user_email),
			reason,
			halted_at: OffsetDateTime::now_utc(),
			cleanup_completed: true,
		}
	}

	async fn run(
		&self,
		params: &InvocationParams,
		context: &ExecutionContext,
		stage: &mut InvocationStage,
	) -> Result<InvocationResult> {
		let email = validate_email(params.user_email.as_deref())?;

		enter(stage, InvocationStage::AuthResolving);

		let auth = self.resolver.resolve(context, &self.http).await?;

		enter(stage, InvocationStage::LookingUp);

		let client =
			WorkspaceClient::new(self.http.clone(), context.base_url(params.address.as_deref())?);
		let user = client.resolve_identity(email, &auth).await?;

		enter(stage, InvocationStage::Delaying);
		tokio::time::sleep(delay::parse_delay_duration(params.delay.as_deref())).await;
		enter(stage, InvocationStage::Invalidating);

		let sessions_revoked = client.invalidate_sessions(&user.id, &auth).await?;

		enter(stage, InvocationStage::Succeeded);

		Ok(InvocationResult {
			user_email: email.to_owned(),
			user_id: user.id,
			sessions_revoked,
			revoked_at: OffsetDateTime::now_utc(),
		})
	}
}

/// Checks that `email` is present, not blank, and shaped like `local@domain.tld`.
pub fn validate_email(email: Option<&str>) -> Result<&str> {
	let email = email
		.filter(|value| !value.trim().is_empty())
		.ok_or_else(|| Error::fatal("Invalid or missing userEmail parameter"))?;

	if is_email_shaped(email) { Ok(email) } else { Err(Error::fatal("Invalid email format")) }
}

fn is_email_shaped(email: &str) -> bool {
	let valid_part = |part: &str| !part.is_empty() && !part.contains(char::is_whitespace);
	let Some((local, domain)) = email.split_once('@') else {
		return false;
	};

	if !valid_part(local) || !valid_part(domain) || domain.contains('@') {
		return false;
	}

	domain.char_indices().any(|(idx, c)| c == '.' && idx > 0 && idx + 1 < domain.len())
}

fn or_unknown(value: Option<String>) -> String {
	value.filter(|value| !value.is_empty()).unwrap_or_else(|| UNKNOWN.into())
}

fn enter(current: &mut InvocationStage, next: InvocationStage) {
	#[cfg(feature = "tracing")]
	tracing::debug!(from = current.as_str(), to = next.as_str(), "Invocation stage changed.");

	*current = next;
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::context::secret;

	fn unreachable_context() -> ExecutionContext {
		ExecutionContext::default()
			.with_env(crate::context::env::ADDRESS, "http://127.0.0.1:9")
			.with_secret(secret::BEARER_AUTH_TOKEN, "token")
	}

	#[test]
	fn email_shape_accepts_common_addresses() {
		for email in ["ada@example.com", "ada.lovelace+ops@mail.example.co.uk", "a@b.c"] {
			assert_eq!(validate_email(Some(email)).expect("Email should validate."), email);
		}
	}

	#[test]
	fn email_shape_rejects_malformed_addresses() {
		for email in [
			"ada",
			"ada@",
			"@example.com",
			"ada@example",
			"ada@@example.com",
			"ada@.com",
			"ada@example.",
			"a da@example.com",
			"ada@exa mple.com",
		] {
			let err = validate_email(Some(email)).expect_err("Email should be rejected.");

			assert_eq!(err.to_string(), "Invalid email format", "input {email:?}");
		}
	}

	#[test]
	fn blank_email_is_missing() {
		for email in [None, Some(""), Some("   "), Some("\t\n")] {
			let err = validate_email(email).expect_err("Blank email should be rejected.");

			assert_eq!(err.to_string(), "Invalid or missing userEmail parameter");
			assert_eq!(err.kind(), ErrorKind::Fatal);
		}
	}

	#[tokio::test]
	async fn invalid_email_fails_before_any_network_call() {
		let action = RevokeSessionsAction::new();
		let err = action
			.invoke(InvocationParams::new("not-an-email"), &unreachable_context())
			.await
			.expect_err("Invalid email should be fatal.");

		assert!(matches!(err, Error::Fatal { .. }));
		assert_eq!(err.to_string(), "Invalid email format");
	}

	#[tokio::test]
	async fn unreachable_workspace_is_fatal_unexpected() {
		let action = RevokeSessionsAction::new();
		let err = action
			.invoke(InvocationParams::new("ada@example.com").with_delay("0"), &unreachable_context())
			.await
			.expect_err("Connection failures should surface.");

		assert!(matches!(err, Error::Fatal { .. }));
		assert!(err.to_string().starts_with("Unexpected error: "));
	}

	#[test]
	fn error_entry_point_returns_the_same_error() {
		let action = RevokeSessionsAction::new();
		let original = Error::Retryable {
			message: "Workspace API rate limit exceeded".into(),
			status: Some(429),
			retry_after: None,
		};
		let err = action
			.error(
				ErrorParams::new(InvocationParams::new("ada@example.com"), original),
				&ExecutionContext::default(),
			)
			.expect_err("The error entry point never succeeds.");

		assert!(err.is_retryable());
		assert_eq!(err.status(), Some(429));
		assert_eq!(err.to_string(), "Workspace API rate limit exceeded");
	}

	#[test]
	fn halt_defaults_missing_fields_to_unknown() {
		let action = RevokeSessionsAction::new();
		let before = OffsetDateTime::now_utc();
		let halted = action.halt(HaltParams::with_reason("timeout"), &ExecutionContext::default());

		assert_eq!(halted.user_email, UNKNOWN);
		assert_eq!(halted.reason, "timeout");
		assert!(halted.cleanup_completed);
		assert!(halted.halted_at >= before);

		let halted = action.halt(HaltParams::default(), &ExecutionContext::default());

		assert_eq!(halted.reason, UNKNOWN);

		let halted = action.halt(
			HaltParams { user_email: Some(String::new()), reason: Some(String::new()) },
			&ExecutionContext::default(),
		);

		assert_eq!(halted.user_email, UNKNOWN);
		assert_eq!(halted.reason, UNKNOWN);
	}

	#[test]
	fn results_serialize_in_camel_case() {
		let result = InvocationResult {
			user_email: "ada@example.com".into(),
			user_id: "U123".into(),
			sessions_revoked: true,
			revoked_at: time::macros::datetime!(2026-10-16 12:00:00 UTC),
		};
		let value = serde_json::to_value(&result).expect("Result should serialize.");

		assert_eq!(value["userEmail"], "ada@example.com");
		assert_eq!(value["userId"], "U123");
		assert_eq!(value["sessionsRevoked"], true);
		assert_eq!(value["revokedAt"], "2026-10-16T12:00:00Z");
	}
}
