use crate::twoface::{ExternalError, Fallible, TfError};
use actix_web::error::BlockingError;
use anyhow::anyhow;

/// Convenience extension used to extract errors from `web::block`.
pub trait BlockingResp<T> {
    /// Convert the return from a web::block into a normal `Fallible<T>`.
    fn to_resp(self) -> Fallible<T>;
}

impl<T, I: Into<TfError>> BlockingResp<T> for Result<Result<T, I>, BlockingError> {
    fn to_resp(self) -> Fallible<T> {
        match self {
            Ok(query_result) => query_result.map_err(Into::into),
            Err(e) => Err(TfError {
                internal: anyhow!("DB operation cancelled: {}", e),
                external: ExternalError::default(),
            }),
        }
    }
}
