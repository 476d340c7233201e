use actix_web::{web, HttpResponse};

use crate::database::MongoDB;
use crate::services::message_service::{self, SendOutcome};
use crate::services::session_service::SessionClaims;
use crate::utils::response::{error_response, ApiResponse};

#[utoipa::path(
    post,
    path = "/api/v1/messages/send",
    tag = "Messages",
    request_body = message_service::SendMessageRequest,
    responses(
        (status = 200, description = "Message stored, or recipient not accepting", body = ApiResponse),
        (status = 400, description = "Invalid username or message content"),
        (status = 404, description = "Unknown username")
    )
)]
pub async fn send_message(
    db: web::Data<MongoDB>,
    request: web::Json<message_service::SendMessageRequest>,
) -> HttpResponse {
    log::info!("💌 POST /messages/send - to: {}", request.user_name);

    match message_service::send_message(&db, &request).await {
        Ok(SendOutcome::Delivered) => {
            log::info!("✅ Message delivered to {}", request.user_name);
            HttpResponse::Ok().json(ApiResponse::ok("Message sent successfully 🎉"))
        }
        Ok(SendOutcome::RecipientNotAccepting) => {
            log::info!("🔕 {} is not accepting messages", request.user_name);
            HttpResponse::Ok().json(ApiResponse::ok("User is busy | Not accepting your msg"))
        }
        Err(e) => {
            log::warn!("❌ Message to {} rejected: {}", request.user_name, e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/messages",
    tag = "Messages",
    responses(
        (status = 200, description = "Inbox messages, newest first", body = ApiResponse),
        (status = 401, description = "No session")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_messages(
    session: web::ReqData<SessionClaims>,
    db: web::Data<MongoDB>,
) -> HttpResponse {
    log::info!("📬 GET /messages - user: {}", session.user_name);

    match message_service::get_messages(&db, &session.sub).await {
        Ok(messages) => {
            let notice = if messages.is_empty() {
                "no messages to show"
            } else {
                "Messages fetched successfully 🎉"
            };
            HttpResponse::Ok().json(ApiResponse::ok(notice).with_messages(messages))
        }
        Err(e) => {
            log::error!("❌ Failed to list messages for {}: {}", session.sub, e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/messages/{msg_id}",
    tag = "Messages",
    responses(
        (status = 200, description = "Message deleted", body = ApiResponse),
        (status = 400, description = "Malformed message id"),
        (status = 401, description = "No session, or session user no longer exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_message(
    session: web::ReqData<SessionClaims>,
    db: web::Data<MongoDB>,
    msg_id: web::Path<String>,
) -> HttpResponse {
    log::info!("🗑️ DELETE /messages/{} - user: {}", msg_id, session.user_name);

    match message_service::delete_message(&db, &session.sub, &msg_id).await {
        Ok(()) => {
            log::info!("✅ Message {} deleted", msg_id);
            HttpResponse::Ok().json(ApiResponse::ok("message deleted successfully 🎉🎉"))
        }
        Err(e) => {
            log::warn!("❌ Delete of {} failed: {}", msg_id, e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/messages/accepting",
    tag = "Messages",
    responses(
        (status = 200, description = "Current accepting-messages flag", body = ApiResponse),
        (status = 401, description = "No session")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_accepting(
    session: web::ReqData<SessionClaims>,
    db: web::Data<MongoDB>,
) -> HttpResponse {
    log::info!("🔎 GET /messages/accepting - user: {}", session.user_name);

    match message_service::get_accepting(&db, &session.sub).await {
        Ok(accepting) => HttpResponse::Ok()
            .json(ApiResponse::ok("successfully got the response").with_accepting(accepting)),
        Err(e) => {
            log::warn!("❌ Accepting lookup failed for {}: {}", session.sub, e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/messages/accepting",
    tag = "Messages",
    request_body = message_service::AcceptingRequest,
    responses(
        (status = 200, description = "Flag updated", body = ApiResponse),
        (status = 401, description = "No session")
    ),
    security(("bearer_auth" = []))
)]
pub async fn set_accepting(
    session: web::ReqData<SessionClaims>,
    db: web::Data<MongoDB>,
    request: web::Json<message_service::AcceptingRequest>,
) -> HttpResponse {
    log::info!(
        "🔧 POST /messages/accepting - user: {} -> {}",
        session.user_name,
        request.is_accepting_message
    );

    match message_service::set_accepting(&db, &session.sub, request.is_accepting_message).await {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::ok(
            "toggle the accept-messaging field successfully 🎉",
        )),
        Err(e) => {
            log::warn!("❌ Accepting toggle failed for {}: {}", session.sub, e);
            error_response(&e)
        }
    }
}
