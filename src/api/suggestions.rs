use actix_web::{web, HttpResponse};
use futures::StreamExt;

use crate::services::suggestion_service;
use crate::utils::response::ApiResponse;

#[utoipa::path(
    get,
    path = "/api/v1/suggestions/messages",
    tag = "Suggestions",
    responses(
        (status = 200, description = "Chunked plain-text stream of suggested messages, pipe-separated"),
        (status = 500, description = "AI API unavailable")
    )
)]
pub async fn suggest_messages() -> HttpResponse {
    log::info!("💡 GET /suggestions/messages");

    match suggestion_service::stream_suggestions().await {
        Ok(stream) => {
            let body = stream.map(|item| match item {
                Ok(text) => Ok(web::Bytes::from(text)),
                Err(e) => Err(std::io::Error::new(std::io::ErrorKind::Other, e)),
            });

            HttpResponse::Ok()
                .content_type("text/plain")
                .insert_header(("Cache-Control", "no-cache"))
                .streaming(body)
        }
        Err(e) => {
            log::error!("❌ Suggestion stream failed to open: {}", e);
            HttpResponse::InternalServerError().json(ApiResponse::fail(
                "error while getting the message from ai",
            ))
        }
    }
}
