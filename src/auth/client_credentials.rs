//! OAuth 2.0 client-credentials exchange used when only a client secret is configured.
//!
//! The exchange runs through an `oauth2` [`Client`] on top of the instrumented
//! reqwest handle, so failures can echo the token endpoint's status and body. The grant is
//! performed once per invocation; nothing is cached.

// crates.io
use oauth2::{
	AccessToken, AuthType, Client, ClientId, ClientSecret, EndpointNotSet, EndpointSet,
	HttpClientError, RefreshToken, RequestTokenError, Scope, StandardRevocableToken,
	TokenResponse, TokenUrl,
	basic::{
		BasicErrorResponse, BasicRequestTokenError, BasicRevocationErrorResponse,
		BasicTokenIntrospectionResponse, BasicTokenType,
	},
};
// self
use crate::{
	_prelude::*,
	auth::{AuthorizationHeader, CredentialFuture, CredentialProvider},
	context::{ExecutionContext, env, secret},
	http::{ReqwestHttpClient, ResponseMetadata, ResponseMetadataSlot},
	obs::{self, ActionStep},
};

type TokenClient = Client<
	BasicErrorResponse,
	IssuedToken,
	BasicTokenIntrospectionResponse,
	StandardRevocableToken,
	BasicRevocationErrorResponse,
	EndpointNotSet,
	EndpointNotSet,
	EndpointNotSet,
	EndpointNotSet,
	EndpointSet,
>;

/// Token endpoint success body. Only `access_token` is required; many issuers omit
/// `token_type`, and the header is always built as `Bearer` anyway.
#[derive(Clone, Debug, Deserialize, Serialize)]
struct IssuedToken {
	access_token: AccessToken,
	#[serde(default = "bearer_token_type")]
	token_type: BasicTokenType,
}
impl TokenResponse for IssuedToken {
	type TokenType = BasicTokenType;

	fn access_token(&self) -> &AccessToken {
		&self.access_token
	}

	fn token_type(&self) -> &Self::TokenType {
		&self.token_type
	}

	fn expires_in(&self) -> Option<std::time::Duration> {
		None
	}

	fn refresh_token(&self) -> Option<&RefreshToken> {
		None
	}

	fn scopes(&self) -> Option<&Vec<Scope>> {
		None
	}
}

fn bearer_token_type() -> BasicTokenType {
	BasicTokenType::Bearer
}

/// Where the client id/secret travel during the token exchange.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClientAuthStyle {
	#[default]
	/// HTTP Basic `Authorization` header.
	InHeader,
	/// `client_id`/`client_secret` form parameters.
	InParams,
}
impl ClientAuthStyle {
	/// Reads the configured style; only `InParams` (any case) switches away from the header.
	pub fn from_config(raw: Option<&str>) -> Self {
		match raw {
			Some(value) if value.eq_ignore_ascii_case("InParams") => Self::InParams,
			_ => Self::InHeader,
		}
	}
}

/// Client-credentials settings gathered from the execution context.
#[derive(Clone)]
pub struct ClientCredentialsConfig {
	/// Token endpoint.
	pub token_url: String,
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	client_secret: String,
	/// Optional whitespace-delimited scopes.
	pub scope: Option<String>,
	/// Optional `audience` form parameter.
	pub audience: Option<String>,
	/// Client authentication style.
	pub auth_style: ClientAuthStyle,
}
impl ClientCredentialsConfig {
	/// Creates a config for the provided endpoint and client pair.
	pub fn new(
		token_url: impl Into<String>,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> Self {
		Self {
			token_url: token_url.into(),
			client_id: client_id.into(),
			client_secret: client_secret.into(),
			scope: None,
			audience: None,
			auth_style: ClientAuthStyle::default(),
		}
	}

	/// Reads the config from `context`.
	///
	/// Returns `Ok(None)` when no client secret is configured and a fatal error when the secret
	/// is present but the token URL or client id is missing.
	pub fn from_context(context: &ExecutionContext) -> Result<Option<Self>> {
		let Some(client_secret) = context.secret(secret::CLIENT_CREDENTIALS_CLIENT_SECRET) else {
			return Ok(None);
		};
		let (Some(token_url), Some(client_id)) = (
			context.env(env::CLIENT_CREDENTIALS_TOKEN_URL),
			context.env(env::CLIENT_CREDENTIALS_CLIENT_ID),
		) else {
			return Err(Error::fatal(format!(
				"OAuth2 Client Credentials flow requires {} and {}",
				env::CLIENT_CREDENTIALS_TOKEN_URL,
				env::CLIENT_CREDENTIALS_CLIENT_ID
			)));
		};
		let mut config = Self::new(token_url, client_id, client_secret)
			.with_auth_style(ClientAuthStyle::from_config(
				context.env(env::CLIENT_CREDENTIALS_AUTH_STYLE),
			));

		config.scope = context.env(env::CLIENT_CREDENTIALS_SCOPE).map(str::to_owned);
		config.audience = context.env(env::CLIENT_CREDENTIALS_AUDIENCE).map(str::to_owned);

		Ok(Some(config))
	}

	/// Overrides the client authentication style.
	pub fn with_auth_style(mut self, style: ClientAuthStyle) -> Self {
		self.auth_style = style;

		self
	}

	/// Sets the requested scopes.
	pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = Some(scope.into());

		self
	}

	/// Sets the `audience` form parameter.
	pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
		self.audience = Some(audience.into());

		self
	}

	/// Performs the `client_credentials` grant and returns a bearer header for the issued token.
	pub async fn exchange(&self, http: &ReqwestHttpClient) -> Result<AuthorizationHeader> {
		obs::observe(ActionStep::TokenExchange, "exchange", self.request_token(http)).await
	}

	fn client(&self) -> Result<TokenClient> {
		let token_url = TokenUrl::new(self.token_url.clone()).map_err(Error::from)?;
		let client = Client::new(ClientId::new(self.client_id.clone()))
			.set_client_secret(ClientSecret::new(self.client_secret.clone()))
			.set_token_uri(token_url);

		Ok(match self.auth_style {
			ClientAuthStyle::InHeader => client.set_auth_type(AuthType::BasicAuth),
			ClientAuthStyle::InParams => client.set_auth_type(AuthType::RequestBody),
		})
	}

	async fn request_token(&self, http: &ReqwestHttpClient) -> Result<AuthorizationHeader> {
		let client = self.client()?;
		let slot = ResponseMetadataSlot::default();
		let handle = http.instrumented(slot.clone());
		let mut request = client.exchange_client_credentials();

		for scope in self.scope.iter().flat_map(|value| value.split_whitespace()) {
			request = request.add_scope(Scope::new(scope.to_owned()));
		}
		if let Some(audience) = &self.audience {
			request = request.add_extra_param("audience", audience.as_str());
		}

		let response = request
			.request_async(&handle)
			.await
			.map_err(|err| map_token_error(err, slot.take()))?;
		let token = response.access_token().secret();

		if token.is_empty() {
			let meta = slot.take().unwrap_or_default();

			return Err(Error::Fatal {
				message: format!(
					"No access_token in OAuth2 response: {}",
					meta.body_preview.unwrap_or_default()
				),
				status: meta.status,
			});
		}

		Ok(AuthorizationHeader::bearer(token))
	}
}
impl Debug for ClientCredentialsConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientCredentialsConfig")
			.field("token_url", &self.token_url)
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.field("scope", &self.scope)
			.field("audience", &self.audience)
			.field("auth_style", &self.auth_style)
			.finish()
	}
}

/// Client secret stored in `OAUTH2_CLIENT_CREDENTIALS_CLIENT_SECRET`, exchanged for a token.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClientCredentialsProvider;
impl CredentialProvider for ClientCredentialsProvider {
	fn label(&self) -> &'static str {
		secret::CLIENT_CREDENTIALS_CLIENT_SECRET
	}

	fn resolve<'a>(
		&'a self,
		context: &'a ExecutionContext,
		http: &'a ReqwestHttpClient,
	) -> CredentialFuture<'a> {
		Box::pin(async move {
			let Some(config) = ClientCredentialsConfig::from_context(context)? else {
				return Ok(None);
			};

			config.exchange(http).await.map(Some)
		})
	}
}

fn map_token_error(
	err: BasicRequestTokenError<HttpClientError<ReqwestError>>,
	meta: Option<ResponseMetadata>,
) -> Error {
	let status = meta.as_ref().and_then(|value| value.status);
	let body = meta.and_then(|value| value.body_preview).unwrap_or_default();
	let success = status.is_some_and(|code| (200..300).contains(&code));

	match err {
		RequestTokenError::Request(HttpClientError::Reqwest(inner)) => Error::from(*inner),
		RequestTokenError::Request(other) => Error::unexpected(other),
		RequestTokenError::Parse(..) | RequestTokenError::Other(_) if success => Error::Fatal {
			message: format!("No access_token in OAuth2 response: {body}"),
			status,
		},
		RequestTokenError::ServerResponse(_)
		| RequestTokenError::Parse(..)
		| RequestTokenError::Other(_) => Error::Fatal {
			message: format!("OAuth2 token request failed: {} - {body}", status_label(status)),
			status,
		},
	}
}

fn status_label(status: Option<u16>) -> String {
	match status.and_then(|code| StatusCode::from_u16(code).ok()) {
		Some(code) => code.to_string(),
		None => "unknown status".into(),
	}
}
