//! Demonstrates revoking a user's sessions with client-credentials authentication against a
//! mock workspace API.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use session_revoke_action::{
	action::RevokeSessionsAction,
	context::{ExecutionContext, HaltParams, InvocationParams, env, secret},
	http::ReqwestHttpClient,
	reqwest::Client,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"bearer\",\"expires_in\":900}",
			);
		})
		.await;
	let lookup_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/users.lookupByEmail")
				.query_param("email", "ada@example.com")
				.header("authorization", "Bearer demo-access");
			then.status(200).json_body(json!({ "ok": true, "user": { "id": "U42" } }));
		})
		.await;
	let reset_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/admin.users.session.reset")
				.json_body(json!({ "user_id": "U42" }));
			then.status(200).json_body(json!({ "ok": true }));
		})
		.await;
	let context = ExecutionContext::default()
		.with_env(env::ADDRESS, server.base_url())
		.with_env(env::CLIENT_CREDENTIALS_TOKEN_URL, server.url("/oauth/token"))
		.with_env(env::CLIENT_CREDENTIALS_CLIENT_ID, "demo-client")
		.with_env(env::CLIENT_CREDENTIALS_SCOPE, "admin.users:write")
		.with_secret(secret::CLIENT_CREDENTIALS_CLIENT_SECRET, "super-secret");
	// The mock server presents a self-signed certificate.
	let action = RevokeSessionsAction::with_http_client(ReqwestHttpClient::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	));
	let result = action
		.invoke(InvocationParams::new("ada@example.com").with_delay("250ms"), &context)
		.await?;

	println!("Revoked sessions: {}.", serde_json::to_string_pretty(&result)?);

	let halted = action.halt(HaltParams::with_reason("operator cancelled"), &context);

	println!("Halt acknowledgment: {}.", serde_json::to_string_pretty(&halted)?);

	token_mock.assert_async().await;
	lookup_mock.assert_async().await;
	reset_mock.assert_async().await;

	Ok(())
}
