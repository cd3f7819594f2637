use actix_web::http::StatusCode;
use std::fmt;

/// Used to create HTTP responses with the given text and status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExternalError {
    /// A user-facing explanation of what caused the error.
    pub cause: Cause,
    /// Error text that will describe the problem to the user.
    pub text: &'static str,
}

/// A user-facing explanation of what caused the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cause {
    ServerError,
    UserInvalidField,
    NotFound,
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        // Make fmt::Display the same as fmt::Debug, i.e. each variant's name.
        write!(f, "{:?}", self)
    }
}

impl From<Cause> for StatusCode {
    /// Causes can be mapped to HTTP status codes. ExternalError doesn't use status codes directly,
    /// because some components (e.g. the datastore) shouldn't need to know about HTTP codes.
    fn from(cause: Cause) -> StatusCode {
        match cause {
            Cause::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
            Cause::UserInvalidField => StatusCode::BAD_REQUEST,
            Cause::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl fmt::Display for ExternalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}: {}", self.cause, self.text)
    }
}

impl Default for ExternalError {
    // Default to ServerError and a very vague generic message.
    fn default() -> Self {
        Self {
            cause: Cause::ServerError,
            text: "Internal server error",
        }
    }
}
