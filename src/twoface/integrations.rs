//! Integrate twoface with actix-web.

use crate::twoface::{Cause, Describe, ExternalError, TfError};
use actix_web::{
    error::JsonPayloadError,
    http::{header, StatusCode},
    HttpRequest, HttpResponse,
};
use anyhow::anyhow;
use serde::Serialize;
use tracing::{error, warn};

// Twoface errors can be used as Actix-web errors.
// If a handler returns a Twoface error, the external portion will be shown to the user.
// The internal portion will only be logged.
impl actix_web::ResponseError for TfError {
    fn status_code(&self) -> StatusCode {
        self.external.cause.into()
    }

    fn error_response(&self) -> HttpResponse {
        if self.is_user_error() {
            warn!("{:#}", self.internal);
        } else {
            error!("{:#}", self.internal);
        }
        let resp = serde_json::to_string(&ErrBody {
            error: self.to_string(),
        })
        .unwrap_or_else(|e| {
            error!("Serde error: {}", e);
            "{\"error\": \"ServerError: internal server error\"}".to_owned()
        });
        HttpResponse::build(self.status_code())
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .body(resp)
    }
}

#[derive(Serialize)]
struct ErrBody {
    error: String,
}

/// Used as the `JsonConfig` error handler, so that malformed post bodies get the same JSON error
/// shape as every other failure.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let text = match err {
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            "Request body is too large"
        }
        JsonPayloadError::ContentType => "Request body must be JSON",
        _ => "Request body is not a valid post",
    };
    anyhow!("couldn't extract JSON body: {}", err)
        .describe(ExternalError {
            cause: Cause::UserInvalidField,
            text,
        })
        .into()
}
