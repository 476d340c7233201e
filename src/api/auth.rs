use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::database::MongoDB;
use crate::middleware::session::tokens_from_request;
use crate::services::{auth_service, session_service};
use crate::utils::response::{error_response, ApiResponse};

#[derive(Debug, Deserialize)]
pub struct UserNameQuery {
    #[serde(rename = "userName")]
    pub user_name: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/sign-up",
    tag = "Auth",
    request_body = auth_service::SignUpRequest,
    responses(
        (status = 200, description = "User registered, OTP emailed", body = ApiResponse),
        (status = 403, description = "Verified user already holds the email or username"),
        (status = 503, description = "OTP email delivery failed")
    )
)]
pub async fn sign_up(
    db: web::Data<MongoDB>,
    request: web::Json<auth_service::SignUpRequest>,
) -> HttpResponse {
    log::info!("📝 POST /auth/sign-up - userName: {}", request.user_name);

    match auth_service::sign_up(&db, &request).await {
        Ok(()) => {
            log::info!("✅ Signup accepted: {}", request.user_name);
            HttpResponse::Ok().json(ApiResponse::ok(
                "user registered and otp is send to respective email",
            ))
        }
        Err(e) => {
            log::warn!("❌ Signup failed: {} - {}", request.user_name, e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/verify-otp",
    tag = "Auth",
    request_body = auth_service::VerifyOtpRequest,
    responses(
        (status = 200, description = "Account verified, session cookie set", body = ApiResponse),
        (status = 404, description = "Unknown username or missing parameters"),
        (status = 403, description = "Already verified, code expired or wrong code")
    )
)]
pub async fn verify_otp(
    db: web::Data<MongoDB>,
    query: web::Query<UserNameQuery>,
    request: web::Json<auth_service::VerifyOtpRequest>,
) -> HttpResponse {
    let user_name = match query.user_name.as_deref() {
        Some(name) if !name.is_empty() => name,
        _ => {
            return HttpResponse::NotFound()
                .json(ApiResponse::fail("userName expected from query params"));
        }
    };

    if request.otp.is_empty() {
        return HttpResponse::NotFound().json(ApiResponse::fail("otp expected from body"));
    }

    log::info!("🔑 POST /auth/verify-otp - userName: {}", user_name);

    match auth_service::verify_otp(&db, user_name, &request.otp).await {
        Ok(token) => {
            log::info!("✅ Account verified: {}", user_name);
            HttpResponse::Ok()
                .append_header(("Set-Cookie", session_service::session_cookie(&token)))
                .json(ApiResponse::ok("Account verified successfully"))
        }
        Err(e) => {
            log::warn!("❌ OTP verification failed: {} - {}", user_name, e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = auth_service::LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = auth_service::AuthResponse),
        (status = 401, description = "Invalid credentials or unverified account")
    )
)]
pub async fn login(
    db: web::Data<MongoDB>,
    request: web::Json<auth_service::LoginRequest>,
) -> HttpResponse {
    log::info!("🔐 POST /auth/login - email: {}", request.email);

    match auth_service::login(&db, &request).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", request.email);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", request.email, e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/session",
    tag = "Auth",
    responses(
        (status = 200, description = "Resolved session, or a logged-out notice", body = ApiResponse),
        (status = 500, description = "Session token could not be decrypted")
    )
)]
pub async fn get_session(req: HttpRequest) -> HttpResponse {
    let (bearer, cookie) = tokens_from_request(&req);

    match session_service::resolve_session(bearer.as_deref(), cookie.as_deref()) {
        Ok(Some(claims)) => HttpResponse::Ok().json(
            ApiResponse::ok("Session send successfully 🎉🎉")
                .with_data(serde_json::json!({ "session": claims })),
        ),
        Ok(None) => HttpResponse::Ok().json(ApiResponse::fail("You are not logged in")),
        Err(e) => {
            log::warn!("❌ Session decryption failed: {}", e);
            HttpResponse::InternalServerError().json(ApiResponse::fail(
                "server error while decrypting the session",
            ))
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/auth/session",
    tag = "Auth",
    responses(
        (status = 200, description = "Session cookie cleared", body = ApiResponse)
    )
)]
pub async fn delete_session() -> HttpResponse {
    log::info!("👋 DELETE /auth/session");

    HttpResponse::Ok()
        .append_header(("Set-Cookie", session_service::clear_session_cookie()))
        .json(ApiResponse::ok("Logged out successfully"))
}
