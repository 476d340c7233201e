use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Feedback Service API",
        version = "1.0.0",
        description = "Anonymous feedback collection platform. \n\n**Authentication:** dashboard endpoints accept either a JWT Bearer token (credentials login) or the `session` cookie minted at OTP verification.\n\n**Features:**\n- Signup with email OTP verification\n- Anonymous message submission to public usernames\n- Inbox management (list, delete, accepting-messages toggle)\n- AI-suggested feedback messages (streamed)",
        contact(
            name = "Feedback Service Team",
            email = "support@feedback-service.dev"
        )
    ),
    paths(
        // Auth endpoints
        crate::api::auth::sign_up,
        crate::api::auth::verify_otp,
        crate::api::auth::login,
        crate::api::auth::get_session,
        crate::api::auth::delete_session,

        // Health
        crate::api::health::health_check,

        // Users
        crate::api::users::check_username,
        crate::api::users::get_profile,
        crate::api::users::list_users,

        // Messages
        crate::api::messages::send_message,
        crate::api::messages::get_messages,
        crate::api::messages::delete_message,
        crate::api::messages::get_accepting,
        crate::api::messages::set_accepting,

        // Suggestions
        crate::api::suggestions::suggest_messages,
    ),
    components(
        schemas(
            // Auth
            crate::services::auth_service::SignUpRequest,
            crate::services::auth_service::VerifyOtpRequest,
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::AuthResponse,
            crate::services::auth_service::UserInfo,

            // Users
            crate::services::user_service::PublicProfile,
            crate::services::user_service::DirectoryEntry,

            // Messages
            crate::services::message_service::SendMessageRequest,
            crate::services::message_service::AcceptingRequest,
            crate::models::message::MessageOut,

            // Shared
            crate::utils::response::ApiResponse,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Signup, OTP verification, credentials login and session lifecycle."),
        (name = "Users", description = "Username availability, public profiles and the user directory."),
        (name = "Messages", description = "Anonymous message submission and the recipient's inbox."),
        (name = "Suggestions", description = "AI-generated feedback suggestions, streamed as plain text."),
        (name = "Health", description = "Health check endpoint for monitoring service status."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Enter your JWT session token"))
                        .build(),
                ),
            );
        }
    }
}
