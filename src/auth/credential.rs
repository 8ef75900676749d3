//! Ordered credential providers and the resolver that walks them.
//!
//! Each provider inspects the [`ExecutionContext`] and yields `Some(header)` when its credential
//! shape is configured. [`AuthResolver`] asks them in order and the first `Some` wins, so the
//! provider order is the priority contract: bearer token, basic pair, authorization-code token,
//! then client credentials.

// self
use crate::{
	_prelude::*,
	auth::{AuthorizationHeader, ClientCredentialsProvider},
	context::{ExecutionContext, secret},
	http::ReqwestHttpClient,
};

/// Boxed future returned by [`CredentialProvider::resolve`].
pub type CredentialFuture<'a> =
	Pin<Box<dyn Future<Output = Result<Option<AuthorizationHeader>>> + 'a + Send>>;

/// One accepted credential shape.
///
/// Implementors must be `Send + Sync` so a resolver can be shared across concurrent invocations.
/// Returning `Ok(None)` means "not configured, ask the next provider"; returning an error stops
/// resolution and surfaces the failure unchanged.
pub trait CredentialProvider
where
	Self: Send + Sync,
{
	/// Secret name(s) listed in the "no authentication configured" message.
	fn label(&self) -> &'static str;

	/// Produces a header when this credential shape is present in `context`.
	fn resolve<'a>(
		&'a self,
		context: &'a ExecutionContext,
		http: &'a ReqwestHttpClient,
	) -> CredentialFuture<'a>;
}

/// Static bearer token stored in `BEARER_AUTH_TOKEN`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BearerTokenProvider;
impl CredentialProvider for BearerTokenProvider {
	fn label(&self) -> &'static str {
		secret::BEARER_AUTH_TOKEN
	}

	fn resolve<'a>(
		&'a self,
		context: &'a ExecutionContext,
		_http: &'a ReqwestHttpClient,
	) -> CredentialFuture<'a> {
		let header = context.secret(secret::BEARER_AUTH_TOKEN).map(AuthorizationHeader::bearer);

		Box::pin(async move { Ok(header) })
	}
}

/// HTTP Basic pair stored in `BASIC_USERNAME` and `BASIC_PASSWORD`; both must be set.
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicCredentialsProvider;
impl CredentialProvider for BasicCredentialsProvider {
	fn label(&self) -> &'static str {
		"BASIC_USERNAME/BASIC_PASSWORD"
	}

	fn resolve<'a>(
		&'a self,
		context: &'a ExecutionContext,
		_http: &'a ReqwestHttpClient,
	) -> CredentialFuture<'a> {
		let header = context
			.secret(secret::BASIC_USERNAME)
			.zip(context.secret(secret::BASIC_PASSWORD))
			.map(|(username, password)| AuthorizationHeader::basic(username, password));

		Box::pin(async move { Ok(header) })
	}
}

/// Access token obtained earlier through the authorization-code grant.
#[derive(Clone, Copy, Debug, Default)]
pub struct AuthorizationCodeTokenProvider;
impl CredentialProvider for AuthorizationCodeTokenProvider {
	fn label(&self) -> &'static str {
		secret::AUTHORIZATION_CODE_ACCESS_TOKEN
	}

	fn resolve<'a>(
		&'a self,
		context: &'a ExecutionContext,
		_http: &'a ReqwestHttpClient,
	) -> CredentialFuture<'a> {
		let header = context
			.secret(secret::AUTHORIZATION_CODE_ACCESS_TOKEN)
			.map(AuthorizationHeader::bearer);

		Box::pin(async move { Ok(header) })
	}
}

/// Walks an ordered provider list and returns the first header produced.
#[derive(Clone)]
pub struct AuthResolver {
	providers: Vec<Arc<dyn CredentialProvider>>,
}
impl AuthResolver {
	/// Builds a resolver with a custom provider order.
	pub fn with_providers(providers: Vec<Arc<dyn CredentialProvider>>) -> Self {
		Self { providers }
	}

	/// Labels of every accepted credential shape, in priority order.
	pub fn labels(&self) -> Vec<&'static str> {
		self.providers.iter().map(|provider| provider.label()).collect()
	}

	/// Resolves the `Authorization` header for one invocation.
	pub async fn resolve(
		&self,
		context: &ExecutionContext,
		http: &ReqwestHttpClient,
	) -> Result<AuthorizationHeader> {
		for provider in &self.providers {
			if let Some(header) = provider.resolve(context, http).await? {
				return Ok(header);
			}
		}

		Err(Error::fatal(format!(
			"No authentication configured. Provide one of: {}",
			self.labels().join(", ")
		)))
	}
}
impl Default for AuthResolver {
	fn default() -> Self {
		Self::with_providers(vec![
			Arc::new(BearerTokenProvider),
			Arc::new(BasicCredentialsProvider),
			Arc::new(AuthorizationCodeTokenProvider),
			Arc::new(ClientCredentialsProvider),
		])
	}
}
impl Debug for AuthResolver {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthResolver").field("providers", &self.labels()).finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	async fn resolve(context: &ExecutionContext) -> Result<AuthorizationHeader> {
		AuthResolver::default().resolve(context, &ReqwestHttpClient::default()).await
	}

	#[tokio::test]
	async fn bearer_token_wins_over_everything_else() {
		let ctx = ExecutionContext::default()
			.with_secret(secret::BEARER_AUTH_TOKEN, "static-token")
			.with_secret(secret::BASIC_USERNAME, "admin")
			.with_secret(secret::BASIC_PASSWORD, "hunter2")
			.with_secret(secret::AUTHORIZATION_CODE_ACCESS_TOKEN, "code-token");
		let header = resolve(&ctx).await.expect("Bearer token should resolve.");

		assert_eq!(header.expose(), "Bearer static-token");
	}

	#[tokio::test]
	async fn basic_pair_wins_over_authorization_code_token() {
		let ctx = ExecutionContext::default()
			.with_secret(secret::BASIC_USERNAME, "admin")
			.with_secret(secret::BASIC_PASSWORD, "s3cret")
			.with_secret(secret::AUTHORIZATION_CODE_ACCESS_TOKEN, "code-token");
		let header = resolve(&ctx).await.expect("Basic pair should resolve.");

		assert_eq!(header.expose(), "Basic YWRtaW46czNjcmV0");
	}

	#[tokio::test]
	async fn incomplete_basic_pair_is_skipped() {
		let ctx = ExecutionContext::default()
			.with_secret(secret::BASIC_USERNAME, "admin")
			.with_secret(secret::AUTHORIZATION_CODE_ACCESS_TOKEN, "Bearer code-token");
		let header = resolve(&ctx).await.expect("Authorization-code token should resolve.");

		assert_eq!(header.expose(), "Bearer code-token");
	}

	#[tokio::test]
	async fn missing_credentials_list_every_option() {
		let err = resolve(&ExecutionContext::default())
			.await
			.expect_err("Resolution without credentials should fail.");

		assert_eq!(err.kind(), ErrorKind::Fatal);

		let message = err.to_string();

		assert!(message.starts_with("No authentication configured"));

		for label in AuthResolver::default().labels() {
			assert!(message.contains(label), "{message} should mention {label}");
		}
	}

	#[tokio::test]
	async fn client_credentials_without_endpoint_config_is_fatal() {
		let ctx = ExecutionContext::default()
			.with_secret(secret::CLIENT_CREDENTIALS_CLIENT_SECRET, "cc-secret");
		let err = resolve(&ctx).await.expect_err("Missing token URL should be fatal.");

		assert_eq!(err.kind(), ErrorKind::Fatal);
		assert!(err.to_string().contains("OAUTH2_CLIENT_CREDENTIALS_TOKEN_URL"));
	}
}
