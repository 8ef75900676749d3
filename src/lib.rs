//! Job action that revokes every active workspace session for a user identified by email.
//!
//! The host scheduler drives [`action::RevokeSessionsAction`] through its `invoke`, `error`, and
//! `halt` entry points. Every failure leaves the crate tagged as retryable or fatal, so the host
//! alone decides whether to run the job again.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod action;
pub mod auth;
pub mod context;
pub mod delay;
pub mod error;
pub mod http;
pub mod obs;
pub mod workspace;

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError, StatusCode};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, ErrorKind, Result};
}

pub use oauth2;
pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
