//! `twoface::Error` wraps a Rust error type with a user-facing description. This stops blog readers
//! and writers from seeing internal errors, which might contain store details (DSNs, file paths,
//! lock state) that should be kept private.

mod extensions;
pub mod externalerror;
mod integrations;

pub use extensions::*;
pub use externalerror::{Cause, ExternalError};
pub use integrations::json_error_handler;
use std::fmt;
use std::fmt::{Display, Formatter};

/// Wraps a Rust error type with a user-facing description.
#[derive(Debug)]
pub struct TfError {
    /// The underlying error, from some function. May contain sensitive information, so it should
    /// not be shown to users.
    pub internal: anyhow::Error,
    /// A user-friendly error that doesn't contain any sensitive information.
    pub external: ExternalError,
}

impl TfError {
    /// Was this error caused by something the caller sent, rather than by the server?
    pub fn is_user_error(&self) -> bool {
        !matches!(self.external.cause, Cause::ServerError)
    }
}

/// Displaying a twoface::Error will only display the external section. The internal error remains
/// private.
impl Display for TfError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::result::Result<(), fmt::Error> {
        write!(f, "{}", self.external)
    }
}

/// Return type of a function that could fail. If it fails, it includes a twoface error (an error with
/// both internal- and external-facing values).
pub type Fallible<T> = Result<T, TfError>;
