//! Redacted `Authorization` header value.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
// self
use crate::_prelude::*;

const BEARER_PREFIX: &str = "Bearer ";

/// Ready-to-send `Authorization` header value that keeps credentials out of logs.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthorizationHeader(String);
impl AuthorizationHeader {
	/// Builds a bearer header; a token that already carries the `Bearer ` prefix is kept as is.
	pub fn bearer(token: impl AsRef<str>) -> Self {
		let token = token.as_ref();

		if token.starts_with(BEARER_PREFIX) {
			Self(token.to_owned())
		} else {
			Self(format!("{BEARER_PREFIX}{token}"))
		}
	}

	/// Builds an HTTP Basic header from a username/password pair.
	pub fn basic(username: &str, password: &str) -> Self {
		Self(format!("Basic {}", STANDARD.encode(format!("{username}:{password}"))))
	}

	/// Returns the raw header value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns the authentication scheme (`Bearer` or `Basic`).
	pub fn scheme(&self) -> &str {
		self.0.split_once(' ').map_or(self.0.as_str(), |(scheme, _)| scheme)
	}
}
impl AsRef<str> for AuthorizationHeader {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for AuthorizationHeader {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("AuthorizationHeader").field(&format!("{} <redacted>", self.scheme())).finish()
	}
}
impl Display for AuthorizationHeader {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{} <redacted>", self.scheme())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn bearer_prefix_is_added_only_once() {
		assert_eq!(AuthorizationHeader::bearer("xoxb-1").expose(), "Bearer xoxb-1");
		assert_eq!(AuthorizationHeader::bearer("Bearer xoxb-1").expose(), "Bearer xoxb-1");
	}

	#[test]
	fn basic_encodes_username_and_password() {
		let header = AuthorizationHeader::basic("admin", "s3cret");

		assert_eq!(header.expose(), "Basic YWRtaW46czNjcmV0");
		assert_eq!(header.scheme(), "Basic");
	}

	#[test]
	fn formatters_redact() {
		let header = AuthorizationHeader::bearer("super-secret");

		assert_eq!(format!("{header:?}"), "AuthorizationHeader(\"Bearer <redacted>\")");
		assert_eq!(format!("{header}"), "Bearer <redacted>");
	}
}
