use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::User;

pub const SESSION_COOKIE: &str = "session";

// Fixed validity window for every minted token, whichever entry point
// (credentials login or OTP verification) produced it.
const SESSION_TTL_DAYS: i64 = 7;

// Session claims. `exp` is the enforced expiry; `expires` duplicates the
// same instant as payload data for clients that render it.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    pub sub: String, // user id (hex ObjectId)
    pub user_name: String,
    pub is_verified: bool,
    pub is_accepting_message: bool,
    pub expires: i64,
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
}

fn get_session_secret() -> String {
    std::env::var("AUTH_SECRET").unwrap_or_else(|_| "default-secret-change-me".to_string())
}

/// Signs a session token for the given identity and capability flags.
pub fn encrypt(
    user_id: &str,
    user_name: &str,
    is_verified: bool,
    is_accepting_message: bool,
) -> Result<String, String> {
    let now = Utc::now();
    let expires_at = now + Duration::days(SESSION_TTL_DAYS);

    let claims = SessionClaims {
        sub: user_id.to_string(),
        user_name: user_name.to_string(),
        is_verified,
        is_accepting_message,
        expires: expires_at.timestamp(),
        iat: now.timestamp() as usize,
        exp: expires_at.timestamp() as usize,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(get_session_secret().as_ref()),
    )
    .map_err(|e| format!("Failed to generate session token: {}", e))
}

pub fn create_session(user: &User) -> Result<String, String> {
    let user_id = user
        .id
        .map(|id| id.to_hex())
        .ok_or_else(|| "user record has no id".to_string())?;
    encrypt(
        &user_id,
        &user.user_name,
        user.is_verified,
        user.is_accepting_message,
    )
}

/// Verifies signature, algorithm and expiry. An absent/empty token is "no
/// session" (`Ok(None)`); a malformed or expired one is a distinguished
/// decryption error so callers can tell the two apart.
pub fn decrypt(token: &str) -> Result<Option<SessionClaims>, String> {
    if token.is_empty() {
        return Ok(None);
    }

    let validation = Validation::new(Algorithm::HS256);

    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(get_session_secret().as_ref()),
        &validation,
    )
    .map(|data| Some(data.claims))
    .map_err(|_| "Error while decrypting the session".to_string())
}

/// One logical session per request, from whichever source is present: the
/// bearer token (credentials login) is authoritative and the `session`
/// cookie (OTP verification) is only consulted when no bearer session
/// exists. Pure read: no refresh or rotation happens here.
pub fn resolve_session(
    bearer: Option<&str>,
    cookie: Option<&str>,
) -> Result<Option<SessionClaims>, String> {
    if let Some(token) = bearer {
        if let Some(claims) = decrypt(token)? {
            return Ok(Some(claims));
        }
    }

    match cookie {
        Some(token) => decrypt(token),
        None => Ok(None),
    }
}

/// Set-Cookie value carrying a fresh session token. Max-Age is one day;
/// the token itself stays valid for the full window and keeps working as a
/// bearer credential after the cookie lapses.
pub fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; Max-Age=86400; SameSite=Strict",
        SESSION_COOKIE, token
    )
}

/// Set-Cookie value that expires the session cookie immediately.
pub fn clear_session_cookie() -> String {
    format!(
        "{}=; Path=/; HttpOnly; Max-Age=0; SameSite=Strict",
        SESSION_COOKIE
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mint() -> String {
        encrypt("507f1f77bcf86cd799439011", "Some_User9", true, true).unwrap()
    }

    #[test]
    fn test_token_round_trip() {
        let token = mint();
        let claims = decrypt(&token).unwrap().unwrap();
        assert_eq!(claims.sub, "507f1f77bcf86cd799439011");
        assert_eq!(claims.user_name, "Some_User9");
        assert!(claims.is_verified);
        assert!(claims.is_accepting_message);
        assert_eq!(claims.expires, claims.exp as i64);
    }

    #[test]
    fn test_empty_token_is_no_session() {
        assert_eq!(decrypt("").unwrap().map(|c| c.sub), None);
    }

    #[test]
    fn test_garbage_token_is_a_decryption_error() {
        let err = decrypt("not-a-jwt").unwrap_err();
        assert_eq!(err, "Error while decrypting the session");
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let mut token = mint();
        token.push('x');
        assert!(decrypt(&token).is_err());
    }

    #[test]
    fn test_bearer_wins_over_cookie() {
        let bearer = encrypt("a".repeat(24).as_str(), "Bearer_1x", true, true).unwrap();
        let cookie = encrypt("b".repeat(24).as_str(), "Cookie_1x", true, false).unwrap();
        let claims = resolve_session(Some(&bearer), Some(&cookie))
            .unwrap()
            .unwrap();
        assert_eq!(claims.user_name, "Bearer_1x");
    }

    #[test]
    fn test_cookie_is_the_fallback() {
        let cookie = mint();
        let claims = resolve_session(None, Some(&cookie)).unwrap().unwrap();
        assert_eq!(claims.user_name, "Some_User9");

        // empty bearer is "no bearer session", not an error
        let claims = resolve_session(Some(""), Some(&cookie)).unwrap().unwrap();
        assert_eq!(claims.user_name, "Some_User9");
    }

    #[test]
    fn test_no_sources_is_anonymous() {
        assert!(resolve_session(None, None).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_bearer_is_an_error_even_with_valid_cookie() {
        let cookie = mint();
        assert!(resolve_session(Some("corrupt"), Some(&cookie)).is_err());
    }

    #[test]
    fn test_cookie_strings() {
        let set = session_cookie("tok");
        assert!(set.starts_with("session=tok;"));
        assert!(set.contains("HttpOnly"));
        assert!(clear_session_cookie().contains("Max-Age=0"));
    }
}
