//! Action-level error taxonomy shared by the resolver, the workspace client, and the host contract.

// self
use crate::_prelude::*;

/// Action-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Classification the host inspects to decide whether to re-run the job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
	/// Transient upstream condition; the whole invocation may be retried.
	Retryable,
	/// Permanent failure; re-running the job with the same input will fail again.
	Fatal,
}
impl ErrorKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ErrorKind::Retryable => "retryable",
			ErrorKind::Fatal => "fatal",
		}
	}
}
impl Display for ErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Canonical action error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Temporary upstream failure; the host may re-invoke with its own backoff.
	#[error("{message}")]
	Retryable {
		/// Human-readable description surfaced to the host.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Permanent failure; the host should not blindly retry.
	#[error("{message}")]
	Fatal {
		/// Human-readable description surfaced to the host.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Failure nobody classified at the point of detection (network, malformed JSON, bad URL).
	#[error("Unexpected error: {source}")]
	Unexpected {
		/// Underlying failure.
		#[source]
		source: BoxError,
	},
}
impl Error {
	/// Builds a [`Error::Retryable`] without HTTP metadata.
	pub fn retryable(message: impl Into<String>) -> Self {
		Self::Retryable { message: message.into(), status: None, retry_after: None }
	}

	/// Builds a [`Error::Fatal`] without HTTP metadata.
	pub fn fatal(message: impl Into<String>) -> Self {
		Self::Fatal { message: message.into(), status: None }
	}

	/// Wraps an arbitrary failure inside [`Error::Unexpected`].
	pub fn unexpected(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Unexpected { source: Box::new(src) }
	}

	/// Returns the host-facing classification; unclassified failures count as fatal.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Retryable { .. } => ErrorKind::Retryable,
			Self::Fatal { .. } | Self::Unexpected { .. } => ErrorKind::Fatal,
		}
	}

	/// Returns `true` when the host may re-invoke the job.
	pub fn is_retryable(&self) -> bool {
		matches!(self.kind(), ErrorKind::Retryable)
	}

	/// Returns the HTTP status that triggered the error, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Retryable { status, .. } | Self::Fatal { status, .. } => *status,
			Self::Unexpected { .. } => None,
		}
	}

	/// Folds [`Error::Unexpected`] into [`Error::Fatal`] and leaves classified errors untouched.
	pub fn into_classified(self) -> Self {
		match self {
			Self::Unexpected { .. } => Self::Fatal { message: self.to_string(), status: None },
			classified => classified,
		}
	}
}
impl From<ReqwestError> for Error {
	fn from(e: ReqwestError) -> Self {
		Self::unexpected(e)
	}
}
impl From<url::ParseError> for Error {
	fn from(e: url::ParseError) -> Self {
		Self::unexpected(e)
	}
}
impl From<serde_path_to_error::Error<serde_json::Error>> for Error {
	fn from(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
		Self::unexpected(e)
	}
}
