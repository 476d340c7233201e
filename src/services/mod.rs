pub mod auth_service;
pub mod email_service;
pub mod message_service;
pub mod session_service;
pub mod suggestion_service;
pub mod user_service;
