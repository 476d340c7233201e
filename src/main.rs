mod api;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    log::info!("🚀 Starting Feedback Service...");
    log::info!("📊 Database: {}", database_url);

    // Initialize MongoDB connection
    let db = database::MongoDB::new(&database_url)
        .await
        .expect("Failed to connect to MongoDB");

    let db_data = web::Data::new(db.clone());

    log::info!("✅ MongoDB connected successfully");

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:3000") // Frontend Web
            .allowed_origin("http://127.0.0.1:3000")
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .supports_credentials()
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(Logger::default())
            // Swagger UI
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Auth: signup, OTP verification, login, session lifecycle
            .service(
                web::scope("/api/v1/auth")
                    .route("/sign-up", web::post().to(api::auth::sign_up))
                    .route("/verify-otp", web::post().to(api::auth::verify_otp))
                    .route("/login", web::post().to(api::auth::login))
                    .route("/session", web::get().to(api::auth::get_session))
                    .route("/session", web::delete().to(api::auth::delete_session)),
            )
            // Users: availability check, public profile, directory
            .service(
                web::scope("/api/v1/users")
                    .route("/check-username", web::get().to(api::users::check_username))
                    .route("/profile", web::get().to(api::users::get_profile))
                    .route("", web::get().to(api::users::list_users)),
            )
            // Messages: anonymous submission is public, the inbox is guarded
            .service(
                web::scope("/api/v1/messages")
                    .route("/send", web::post().to(api::messages::send_message))
                    .service(
                        web::scope("")
                            .wrap(middleware::SessionGuard)
                            .route("/accepting", web::get().to(api::messages::get_accepting))
                            .route("/accepting", web::post().to(api::messages::set_accepting))
                            .route("", web::get().to(api::messages::get_messages))
                            .route("/{msg_id}", web::delete().to(api::messages::delete_message)),
                    ),
            )
            // Suggestions: streamed AI-generated feedback ideas
            .service(
                web::scope("/api/v1/suggestions")
                    .route("/messages", web::get().to(api::suggestions::suggest_messages)),
            )
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
