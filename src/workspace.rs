//! Workspace API client: resolve a user by email, then reset that user's sessions.
//!
//! Both calls are single request/response round trips. Neither retries; the error
//! classification in [`classify`] tells the host whether the whole invocation is worth re-running.

pub mod classify;
pub mod model;

pub use classify::*;
pub use model::*;

// crates.io
use reqwest::{
	RequestBuilder,
	header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue, USER_AGENT},
};
// self
use crate::{
	_prelude::*,
	auth::AuthorizationHeader,
	http::{self, ReqwestHttpClient},
	obs::{self, ActionStep},
};

/// Path of the email lookup method.
pub const LOOKUP_BY_EMAIL_PATH: &str = "/api/users.lookupByEmail";
/// Path of the session reset method.
pub const SESSION_RESET_PATH: &str = "/api/admin.users.session.reset";

/// Client bound to one workspace base address.
#[derive(Clone, Debug)]
pub struct WorkspaceClient {
	http: ReqwestHttpClient,
	base_url: String,
}
impl WorkspaceClient {
	/// Creates a client for `base_url`; trailing slashes are stripped.
	pub fn new(http: ReqwestHttpClient, base_url: impl Into<String>) -> Self {
		let base_url = base_url.into().trim_end_matches('/').to_owned();

		Self { http, base_url }
	}

	/// Returns the normalized base address.
	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	/// Resolves the workspace user registered under `email`.
	pub async fn resolve_identity(
		&self,
		email: &str,
		auth: &AuthorizationHeader,
	) -> Result<WorkspaceUser> {
		obs::observe(ActionStep::IdentityLookup, "resolve_identity", async move {
			let mut url = self.endpoint(LOOKUP_BY_EMAIL_PATH)?;

			url.query_pairs_mut().append_pair("email", email);

			let response = self.send(self.with_headers(self.http.get(url), auth)).await?;

			if !response.ok {
				return Err(classify::classify_lookup_error(response.error_code(), email));
			}

			response.user.ok_or_else(|| {
				Error::fatal(format!("Workspace API returned no user for email: {email}"))
			})
		})
		.await
	}

	/// Invalidates every active session of `user_id`.
	pub async fn invalidate_sessions(
		&self,
		user_id: &str,
		auth: &AuthorizationHeader,
	) -> Result<bool> {
		obs::observe(ActionStep::SessionReset, "invalidate_sessions", async move {
			let url = self.endpoint(SESSION_RESET_PATH)?;
			let body =
				serde_json::to_vec(&SessionResetRequest { user_id }).map_err(Error::unexpected)?;
			let response = self.send(self.with_headers(self.http.post(url), auth).body(body)).await?;

			if !response.ok {
				return Err(classify::classify_reset_error(response.error_code(), user_id));
			}

			Ok(true)
		})
		.await
	}

	fn endpoint(&self, path: &str) -> Result<Url> {
		Ok(Url::parse(&format!("{}{path}", self.base_url))?)
	}

	fn with_headers(&self, builder: RequestBuilder, auth: &AuthorizationHeader) -> RequestBuilder {
		builder
			.header(AUTHORIZATION, auth.expose())
			.header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
			.header(USER_AGENT, HeaderValue::from_static(http::USER_AGENT))
	}

	async fn send(&self, request: RequestBuilder) -> Result<ApiResponse> {
		let response = request.send().await?;
		let status = response.status();

		if !status.is_success() {
			return Err(classify::classify_status(
				status,
				http::parse_retry_after(response.headers()),
			));
		}

		let bytes = response.bytes().await?;
		let de = &mut serde_json::Deserializer::from_slice(&bytes);

		Ok(serde_path_to_error::deserialize(de)?)
	}
}
