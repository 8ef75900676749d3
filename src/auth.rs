//! Authorization resolution: turns whichever credential shape the host configured into a single
//! ready-to-send `Authorization` header.

pub mod client_credentials;
pub mod credential;
pub mod header;

pub use client_credentials::*;
pub use credential::*;
pub use header::*;
