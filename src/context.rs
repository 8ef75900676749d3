//! Host-supplied invocation parameters and execution context.
//!
//! The host hands every entry point a fresh set of parameters plus a context holding the
//! `environment` and `secrets` maps. Nothing here is mutated by the action; empty values are
//! treated exactly like missing ones.

// crates.io
use serde::de::{self, Deserializer, Visitor};
// self
use crate::_prelude::*;

/// Environment keys read by the action.
pub mod env {
	/// Default workspace base address.
	pub const ADDRESS: &str = "ADDRESS";
	/// Token endpoint for the client-credentials grant.
	pub const CLIENT_CREDENTIALS_TOKEN_URL: &str = "OAUTH2_CLIENT_CREDENTIALS_TOKEN_URL";
	/// Client identifier for the client-credentials grant.
	pub const CLIENT_CREDENTIALS_CLIENT_ID: &str = "OAUTH2_CLIENT_CREDENTIALS_CLIENT_ID";
	/// Optional whitespace-delimited scope list.
	pub const CLIENT_CREDENTIALS_SCOPE: &str = "OAUTH2_CLIENT_CREDENTIALS_SCOPE";
	/// Optional `audience` form parameter.
	pub const CLIENT_CREDENTIALS_AUDIENCE: &str = "OAUTH2_CLIENT_CREDENTIALS_AUDIENCE";
	/// Client authentication style (`InParams` or header, the default).
	pub const CLIENT_CREDENTIALS_AUTH_STYLE: &str = "OAUTH2_CLIENT_CREDENTIALS_AUTH_STYLE";
}

/// Secret keys read by the action, in resolution priority order.
pub mod secret {
	/// Static bearer token.
	pub const BEARER_AUTH_TOKEN: &str = "BEARER_AUTH_TOKEN";
	/// HTTP Basic username.
	pub const BASIC_USERNAME: &str = "BASIC_USERNAME";
	/// HTTP Basic password.
	pub const BASIC_PASSWORD: &str = "BASIC_PASSWORD";
	/// Access token previously obtained through the authorization-code grant.
	pub const AUTHORIZATION_CODE_ACCESS_TOKEN: &str = "OAUTH2_AUTHORIZATION_CODE_ACCESS_TOKEN";
	/// Client secret for the client-credentials grant.
	pub const CLIENT_CREDENTIALS_CLIENT_SECRET: &str = "OAUTH2_CLIENT_CREDENTIALS_CLIENT_SECRET";
}

/// Environment and secrets supplied by the host for a single invocation.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExecutionContext {
	/// Plain configuration values.
	pub environment: HashMap<String, String>,
	/// Credential material; never logged.
	pub secrets: HashMap<String, String>,
}
impl ExecutionContext {
	/// Adds or replaces an environment value.
	pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.environment.insert(key.into(), value.into());

		self
	}

	/// Adds or replaces a secret value.
	pub fn with_secret(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.secrets.insert(key.into(), value.into());

		self
	}

	/// Returns a non-empty environment value.
	pub fn env(&self, key: &str) -> Option<&str> {
		non_empty(self.environment.get(key))
	}

	/// Returns a non-empty secret value.
	pub fn secret(&self, key: &str) -> Option<&str> {
		non_empty(self.secrets.get(key))
	}

	/// Resolves the workspace base address: the per-invocation override wins over `ADDRESS`.
	///
	/// Trailing slashes are stripped so paths can be appended verbatim.
	pub fn base_url(&self, address: Option<&str>) -> Result<String> {
		let raw = address
			.filter(|value| !value.is_empty())
			.or_else(|| self.env(env::ADDRESS))
			.ok_or_else(|| {
				Error::fatal(
					"No URL specified. Provide address parameter or ADDRESS environment variable",
				)
			})?;

		Ok(raw.trim_end_matches('/').to_owned())
	}
}
impl Debug for ExecutionContext {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let mut secret_keys = self.secrets.keys().collect::<Vec<_>>();

		secret_keys.sort();

		f.debug_struct("ExecutionContext")
			.field("environment", &self.environment)
			.field("secret_keys", &secret_keys)
			.finish()
	}
}

/// Parameters accepted by [`invoke`](crate::action::RevokeSessionsAction::invoke).
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InvocationParams {
	/// Email of the user whose sessions are revoked.
	#[serde(deserialize_with = "lenient_string")]
	pub user_email: Option<String>,
	/// Optional pause between lookup and reset, e.g. `250ms` or `2s`.
	#[serde(deserialize_with = "lenient_string")]
	pub delay: Option<String>,
	/// Optional base address overriding the `ADDRESS` environment value.
	#[serde(deserialize_with = "lenient_string")]
	pub address: Option<String>,
}
impl InvocationParams {
	/// Creates parameters targeting the provided email.
	pub fn new(user_email: impl Into<String>) -> Self {
		Self { user_email: Some(user_email.into()), ..Default::default() }
	}

	/// Overrides the inter-call delay expression.
	pub fn with_delay(mut self, delay: impl Into<String>) -> Self {
		self.delay = Some(delay.into());

		self
	}

	/// Overrides the workspace base address.
	pub fn with_address(mut self, address: impl Into<String>) -> Self {
		self.address = Some(address.into());

		self
	}
}

/// Parameters accepted by [`error`](crate::action::RevokeSessionsAction::error).
#[derive(Debug)]
pub struct ErrorParams {
	/// Original invocation parameters.
	pub params: InvocationParams,
	/// Error raised by the failed invocation.
	pub error: Error,
}
impl ErrorParams {
	/// Pairs the failed invocation's parameters with its error.
	pub fn new(params: InvocationParams, error: Error) -> Self {
		Self { params, error }
	}
}

/// Parameters accepted by [`halt`](crate::action::RevokeSessionsAction::halt).
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HaltParams {
	/// Email of the job being abandoned, when the host still knows it.
	#[serde(deserialize_with = "lenient_string")]
	pub user_email: Option<String>,
	/// Host-supplied reason (timeout, cancellation, shutdown).
	#[serde(deserialize_with = "lenient_string")]
	pub reason: Option<String>,
}
impl HaltParams {
	/// Creates halt parameters carrying only a reason.
	pub fn with_reason(reason: impl Into<String>) -> Self {
		Self { reason: Some(reason.into()), ..Default::default() }
	}
}

fn non_empty(value: Option<&String>) -> Option<&str> {
	value.map(String::as_str).filter(|value| !value.is_empty())
}

// Hosts send loosely typed JSON; anything other than a string is treated as absent.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	struct LenientString;
	impl<'de> Visitor<'de> for LenientString {
		type Value = Option<String>;

		fn expecting(&self, f: &mut Formatter) -> FmtResult {
			f.write_str("any JSON value")
		}

		fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E>
		where
			E: de::Error,
		{
			Ok(Some(value.to_owned()))
		}

		fn visit_string<E>(self, value: String) -> std::result::Result<Self::Value, E>
		where
			E: de::Error,
		{
			Ok(Some(value))
		}

		fn visit_none<E>(self) -> std::result::Result<Self::Value, E>
		where
			E: de::Error,
		{
			Ok(None)
		}

		fn visit_unit<E>(self) -> std::result::Result<Self::Value, E>
		where
			E: de::Error,
		{
			Ok(None)
		}

		fn visit_some<D>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error>
		where
			D: Deserializer<'de>,
		{
			deserializer.deserialize_any(self)
		}

		fn visit_bool<E>(self, _: bool) -> std::result::Result<Self::Value, E>
		where
			E: de::Error,
		{
			Ok(None)
		}

		fn visit_i64<E>(self, _: i64) -> std::result::Result<Self::Value, E>
		where
			E: de::Error,
		{
			Ok(None)
		}

		fn visit_u64<E>(self, _: u64) -> std::result::Result<Self::Value, E>
		where
			E: de::Error,
		{
			Ok(None)
		}

		fn visit_f64<E>(self, _: f64) -> std::result::Result<Self::Value, E>
		where
			E: de::Error,
		{
			Ok(None)
		}

		fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
		where
			A: de::SeqAccess<'de>,
		{
			while seq.next_element::<de::IgnoredAny>()?.is_some() {}

			Ok(None)
		}

		fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
		where
			A: de::MapAccess<'de>,
		{
			while map.next_entry::<de::IgnoredAny, de::IgnoredAny>()?.is_some() {}

			Ok(None)
		}
	}

	deserializer.deserialize_any(LenientString)
}
