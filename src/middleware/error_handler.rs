use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::core::AppError;

/// Render malformed JSON bodies in the same error shape as every other failure
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(path = %req.path(), error = %err, "Rejected request body");
    AppError::validation("body", err.to_string()).into()
}

/// JSON extractor configuration shared by the server and the HTTP tests
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(1 << 20)
        .error_handler(json_error_handler)
}
