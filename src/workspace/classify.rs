//! Fatal-versus-retryable classification for workspace API failures.
//!
//! HTTP-level failures are classified the same way for every method. Application-level codes
//! (`{"ok":false,"error":"..."}`) are always fatal, with method-specific wording.

// self
use crate::_prelude::*;

/// Classifies a non-2xx response. Only 429 and 5xx are worth another attempt.
pub fn classify_status(status: StatusCode, retry_after: Option<Duration>) -> Error {
	let code = Some(status.as_u16());

	if status == StatusCode::TOO_MANY_REQUESTS {
		Error::Retryable {
			message: "Workspace API rate limit exceeded".into(),
			status: code,
			retry_after,
		}
	} else if status.is_server_error() {
		Error::Retryable {
			message: format!("Workspace API server error: {status}"),
			status: code,
			retry_after,
		}
	} else {
		Error::Fatal { message: format!("Workspace API error: {status}"), status: code }
	}
}

/// Classifies an application error returned by `users.lookupByEmail`.
pub fn classify_lookup_error(code: &str, email: &str) -> Error {
	match code {
		"users_not_found" => Error::fatal(format!("User not found with email: {email}")),
		_ => classify_common(code),
	}
}

/// Classifies an application error returned by `admin.users.session.reset`.
pub fn classify_reset_error(code: &str, user_id: &str) -> Error {
	match code {
		"user_not_found" => Error::fatal(format!("User not found with ID: {user_id}")),
		"missing_scope" => Error::fatal("Token missing required scope: admin.users:write"),
		_ => classify_common(code),
	}
}

fn classify_common(code: &str) -> Error {
	match code {
		"invalid_auth" | "not_authed" => Error::fatal("Invalid or missing authentication token"),
		"account_inactive" | "token_revoked" =>
			Error::fatal("Authentication token is inactive or revoked"),
		other => Error::fatal(format!("Workspace API error: {other}")),
	}
}
