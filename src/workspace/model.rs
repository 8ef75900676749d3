//! Wire shapes exchanged with the workspace API.

// self
use crate::_prelude::*;

/// Workspace user resolved from an email address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceUser {
	/// Workspace-internal user identifier.
	pub id: String,
}

/// Envelope every workspace API method answers with.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ApiResponse {
	/// `true` when the method succeeded.
	#[serde(default)]
	pub ok: bool,
	/// Application error code when `ok` is `false`.
	#[serde(default)]
	pub error: Option<String>,
	/// User record returned by `users.lookupByEmail`.
	#[serde(default)]
	pub user: Option<WorkspaceUser>,
}
impl ApiResponse {
	/// Returns the application error code, or `unknown_error` when the API omitted it.
	pub fn error_code(&self) -> &str {
		self.error.as_deref().unwrap_or("unknown_error")
	}
}

/// JSON body of `admin.users.session.reset`.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct SessionResetRequest<'a> {
	/// User whose sessions are invalidated.
	pub user_id: &'a str,
}
