mod common;

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
use httpmock::prelude::*;
// self
use common::*;
use session_revoke_action::{
	auth::{AuthResolver, ClientAuthStyle, ClientCredentialsConfig},
	context::{ExecutionContext, env, secret},
	error::{Error, ErrorKind},
	http::USER_AGENT,
};

const TOKEN_PATH: &str = "/oauth/token";
const TOKEN_BODY: &str = "{\"access_token\":\"cc-token\",\"token_type\":\"bearer\",\"expires_in\":3600}";

fn context(server: &MockServer) -> ExecutionContext {
	ExecutionContext::default()
		.with_env(env::CLIENT_CREDENTIALS_TOKEN_URL, server.url(TOKEN_PATH))
		.with_env(env::CLIENT_CREDENTIALS_CLIENT_ID, "client-id")
		.with_secret(secret::CLIENT_CREDENTIALS_CLIENT_SECRET, "client-secret")
}

#[tokio::test]
async fn header_style_sends_basic_client_auth() {
	let server = MockServer::start_async().await;
	let expected = format!("Basic {}", STANDARD.encode("client-id:client-secret"));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TOKEN_PATH)
				.header("authorization", expected.as_str())
				.header("user-agent", USER_AGENT)
				.form_urlencoded_tuple("grant_type", "client_credentials")
				.form_urlencoded_tuple("scope", "admin users:write")
				.form_urlencoded_tuple("audience", "https://api.example.com");
			then.status(200).header("content-type", "application/json").body(TOKEN_BODY);
		})
		.await;
	let ctx = context(&server)
		.with_env(env::CLIENT_CREDENTIALS_SCOPE, "admin users:write")
		.with_env(env::CLIENT_CREDENTIALS_AUDIENCE, "https://api.example.com");
	let header = AuthResolver::default()
		.resolve(&ctx, &test_reqwest_http_client())
		.await
		.expect("Client-credentials exchange should succeed.");

	assert_eq!(header.expose(), "Bearer cc-token");

	mock.assert_async().await;
}

#[tokio::test]
async fn params_style_sends_credentials_in_body() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TOKEN_PATH)
				.header_missing("authorization")
				.form_urlencoded_tuple("grant_type", "client_credentials")
				.form_urlencoded_tuple("client_id", "client-id")
				.form_urlencoded_tuple("client_secret", "client-secret");
			then.status(200).header("content-type", "application/json").body(TOKEN_BODY);
		})
		.await;
	let ctx = context(&server).with_env(env::CLIENT_CREDENTIALS_AUTH_STYLE, "InParams");
	let header = AuthResolver::default()
		.resolve(&ctx, &test_reqwest_http_client())
		.await
		.expect("Client-credentials exchange should succeed.");

	assert_eq!(header.expose(), "Bearer cc-token");

	mock.assert_async().await;
}

#[tokio::test]
async fn rejected_exchange_echoes_status_and_body() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_client\"}");
		})
		.await;
	let config = ClientCredentialsConfig::new(server.url(TOKEN_PATH), "client-id", "wrong")
		.with_auth_style(ClientAuthStyle::InHeader);
	let err = config
		.exchange(&test_reqwest_http_client())
		.await
		.expect_err("Rejected exchange should fail.");

	assert_eq!(err.kind(), ErrorKind::Fatal);
	assert_eq!(err.status(), Some(401));
	assert_eq!(
		err.to_string(),
		"OAuth2 token request failed: 401 Unauthorized - {\"error\":\"invalid_client\"}"
	);

	mock.assert_async().await;
}

#[tokio::test]
async fn response_without_access_token_is_fatal() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"token_type\":\"bearer\"}");
		})
		.await;
	let err = AuthResolver::default()
		.resolve(&context(&server), &test_reqwest_http_client())
		.await
		.expect_err("Missing access token should fail.");

	assert!(matches!(err, Error::Fatal { .. }));
	assert_eq!(err.to_string(), "No access_token in OAuth2 response: {\"token_type\":\"bearer\"}");
}

#[tokio::test]
async fn static_bearer_token_skips_the_exchange() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).header("content-type", "application/json").body(TOKEN_BODY);
		})
		.await;
	let ctx = context(&server).with_secret(secret::BEARER_AUTH_TOKEN, "Bearer static");
	let header = AuthResolver::default()
		.resolve(&ctx, &test_reqwest_http_client())
		.await
		.expect("Bearer token should resolve.");

	assert_eq!(header.expose(), "Bearer static");

	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn empty_error_body_still_reports_status() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(401);
		})
		.await;
	let err = AuthResolver::default()
		.resolve(&context(&server), &test_reqwest_http_client())
		.await
		.expect_err("Rejected exchange should fail.");

	assert_eq!(err.kind(), ErrorKind::Fatal);
	assert_eq!(err.status(), Some(401));
	assert_eq!(err.to_string(), "OAuth2 token request failed: 401 Unauthorized - ");
}

#[tokio::test]
async fn token_type_is_optional() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"abc\",\"expires_in\":3600}");
		})
		.await;
	let header = AuthResolver::default()
		.resolve(&context(&server), &test_reqwest_http_client())
		.await
		.expect("Token without token_type should be accepted.");

	assert_eq!(header.expose(), "Bearer abc");
}

#[tokio::test]
async fn any_success_status_carries_the_token() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(201).header("content-type", "application/json").body(TOKEN_BODY);
		})
		.await;
	let header = AuthResolver::default()
		.resolve(&context(&server), &test_reqwest_http_client())
		.await
		.expect("201 responses should be accepted.");

	assert_eq!(header.expose(), "Bearer cc-token");
}

#[tokio::test]
async fn empty_access_token_echoes_body() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"\",\"token_type\":\"bearer\"}");
		})
		.await;
	let err = AuthResolver::default()
		.resolve(&context(&server), &test_reqwest_http_client())
		.await
		.expect_err("Empty access token should fail.");

	assert_eq!(err.kind(), ErrorKind::Fatal);
	assert_eq!(err.status(), Some(200));
	assert_eq!(
		err.to_string(),
		"No access_token in OAuth2 response: {\"access_token\":\"\",\"token_type\":\"bearer\"}"
	);
}
