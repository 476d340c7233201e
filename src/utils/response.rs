use actix_web::HttpResponse;
use serde::Serialize;

use crate::models::message::MessageOut;
use crate::utils::error::AppError;

/// Uniform response body: every endpoint answers with this shape, success
/// or failure, so clients render one toast path.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(rename = "isAcceptingMessage", skip_serializing_if = "Option::is_none")]
    pub is_accepting_message: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<MessageOut>>,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            is_accepting_message: None,
            messages: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            is_accepting_message: None,
            messages: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_accepting(mut self, accepting: bool) -> Self {
        self.is_accepting_message = Some(accepting);
        self
    }

    pub fn with_messages(mut self, messages: Vec<MessageOut>) -> Self {
        self.messages = Some(messages);
        self
    }
}

/// Maps an error class to its HTTP status with the uniform body.
pub fn error_response(err: &AppError) -> HttpResponse {
    let body = ApiResponse::fail(err.message());
    match err {
        AppError::Validation(_) => HttpResponse::BadRequest().json(body),
        AppError::NotFound(_) => HttpResponse::NotFound().json(body),
        AppError::Conflict(_) => HttpResponse::Forbidden().json(body),
        AppError::Unauthorized(_) => HttpResponse::Unauthorized().json(body),
        AppError::Email(_) => HttpResponse::ServiceUnavailable().json(body),
        AppError::Database(_) | AppError::Internal(_) => {
            HttpResponse::InternalServerError().json(body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_are_skipped() {
        let body = serde_json::to_value(ApiResponse::ok("done")).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "done");
        assert!(body.get("data").is_none());
        assert!(body.get("isAcceptingMessage").is_none());
        assert!(body.get("messages").is_none());
    }

    #[test]
    fn test_accepting_flag_uses_wire_name() {
        let body = serde_json::to_value(ApiResponse::ok("ok").with_accepting(false)).unwrap();
        assert_eq!(body["isAcceptingMessage"], false);
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(error_response(&AppError::Validation("v".into())).status(), 400);
        assert_eq!(error_response(&AppError::NotFound("n".into())).status(), 404);
        assert_eq!(error_response(&AppError::Conflict("c".into())).status(), 403);
        assert_eq!(error_response(&AppError::Unauthorized("u".into())).status(), 401);
        assert_eq!(error_response(&AppError::Email("e".into())).status(), 503);
        assert_eq!(error_response(&AppError::Database("d".into())).status(), 500);
        assert_eq!(error_response(&AppError::Internal("i".into())).status(), 500);
    }
}
