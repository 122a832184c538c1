use actix_web::error::{
    ErrorBadRequest, ErrorInternalServerError, ErrorNotFound, ErrorUnauthorized,
};
use actix_web::Error;
use serde_derive::Serialize;

/// Error envelope returned by the request-style endpoints. Successful
/// responses carry the bare resource JSON; only failures are enveloped.
#[derive(Serialize, Default)]
pub(crate) struct JsonResponse {
    pub(crate) status: String,
    pub(crate) message: String,
    pub(crate) code: u32,
}

#[derive(Default)]
pub(crate) struct JsonResponseBuilder {
    message: String,
}

impl JsonResponse {
    pub(crate) fn build() -> JsonResponseBuilder {
        JsonResponseBuilder::default()
    }

    pub(crate) fn unauthorized(message: &str) -> Error {
        Self::build().set_msg(message).unauthorized()
    }

    pub(crate) fn not_found(message: &str) -> Error {
        Self::build().set_msg(message).not_found()
    }

    pub(crate) fn internal_server_error(message: &str) -> Error {
        Self::build().set_msg(message).internal_server_error()
    }
}

impl JsonResponseBuilder {
    pub(crate) fn set_msg(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    fn envelope(self, code: u32, fallback: &str) -> String {
        let message = if self.message.trim().is_empty() {
            fallback.to_string()
        } else {
            self.message
        };
        let body = JsonResponse {
            status: "Error".to_string(),
            message,
            code,
        };
        serde_json::to_string(&body)
            .unwrap_or_else(|_| format!(r#"{{"status":"Error","message":"","code":{}}}"#, code))
    }

    pub(crate) fn unauthorized(self) -> Error {
        ErrorUnauthorized(self.envelope(401, "Unauthorized"))
    }

    pub(crate) fn form_error(self) -> Error {
        ErrorBadRequest(self.envelope(400, "Validation error"))
    }

    pub(crate) fn not_found(self) -> Error {
        ErrorNotFound(self.envelope(404, "Object not found"))
    }

    pub(crate) fn internal_server_error(self) -> Error {
        ErrorInternalServerError(self.envelope(500, "Internal error"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;

    #[test]
    fn unauthorized_is_401_and_does_not_echo_detail() {
        let err = JsonResponse::unauthorized("");
        let resp = err.as_response_error().error_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn envelope_carries_message_and_code() {
        let body = JsonResponse::build().set_msg("boom").envelope(500, "x");
        assert_eq!(
            body,
            r#"{"status":"Error","message":"boom","code":500}"#
        );
    }
}
