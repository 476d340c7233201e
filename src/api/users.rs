use actix_web::{web, HttpResponse};

use crate::api::auth::UserNameQuery;
use crate::database::MongoDB;
use crate::services::user_service;
use crate::utils::response::{error_response, ApiResponse};

#[utoipa::path(
    get,
    path = "/api/v1/users/check-username",
    tag = "Users",
    responses(
        (status = 200, description = "Username is free", body = ApiResponse),
        (status = 400, description = "Username fails the schema"),
        (status = 403, description = "A verified user already holds it")
    )
)]
pub async fn check_username(db: web::Data<MongoDB>, query: web::Query<UserNameQuery>) -> HttpResponse {
    let user_name = match query.user_name.as_deref() {
        Some(name) if !name.is_empty() => name,
        _ => {
            return HttpResponse::NotFound()
                .json(ApiResponse::fail("userName expected from query params"));
        }
    };

    log::info!("🔎 GET /users/check-username - {}", user_name);

    match user_service::check_username_available(&db, user_name).await {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::ok("Valid userName")),
        Err(e) => {
            log::info!("ℹ️  Username {} unavailable: {}", user_name, e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/users/profile",
    tag = "Users",
    responses(
        (status = 200, description = "Public profile of a verified user", body = ApiResponse),
        (status = 404, description = "No verified user with this username")
    )
)]
pub async fn get_profile(db: web::Data<MongoDB>, query: web::Query<UserNameQuery>) -> HttpResponse {
    let user_name = match query.user_name.as_deref() {
        Some(name) if !name.is_empty() => name,
        _ => return HttpResponse::NotFound().json(ApiResponse::fail("user Not exist")),
    };

    log::info!("👤 GET /users/profile - {}", user_name);

    match user_service::get_profile(&db, user_name).await {
        Ok(profile) => HttpResponse::Ok().json(
            ApiResponse::ok("User exist with this userName")
                .with_data(serde_json::json!({ "user": profile })),
        ),
        Err(e) => {
            log::info!("ℹ️  Profile lookup failed for {}: {}", user_name, e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    responses(
        (status = 200, description = "Directory of users", body = ApiResponse)
    )
)]
pub async fn list_users(db: web::Data<MongoDB>) -> HttpResponse {
    log::info!("📋 GET /users");

    match user_service::list_users(&db).await {
        Ok(users) => HttpResponse::Ok().json(
            ApiResponse::ok("user Send successfully")
                .with_data(serde_json::json!({ "users": users })),
        ),
        Err(e) => {
            log::error!("❌ Failed to list users: {}", e);
            error_response(&e)
        }
    }
}
