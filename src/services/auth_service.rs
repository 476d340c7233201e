use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{DateTime, Duration, Utc};
use mongodb::bson::{doc, DateTime as BsonDateTime};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::database::MongoDB;
use crate::models::user::User;
use crate::services::{email_service, session_service};
use crate::utils::error::AppError;
use crate::utils::validation;

const OTP_TTL_HOURS: i64 = 1;

// Request/Response structures
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SignUpRequest {
    #[serde(rename = "userName")]
    pub user_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct VerifyOtpRequest {
    pub otp: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserInfo {
    pub id: String,
    #[serde(rename = "userName")]
    pub user_name: String,
    pub email: String,
    #[serde(rename = "isVerified")]
    pub is_verified: bool,
    #[serde(rename = "isAcceptingMessage")]
    pub is_accepting_message: bool,
}

impl UserInfo {
    fn from_user(user: &User) -> Self {
        Self {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            user_name: user.user_name.clone(),
            email: user.email.clone(),
            is_verified: user.is_verified,
            is_accepting_message: user.is_accepting_message,
        }
    }
}

fn generate_otp() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

/// Registers (or re-registers) an account and emails the verification code.
///
/// A verified user already holding the email or username rejects the signup;
/// an unverified one is overwritten in place, so abandoned signups never
/// squat a handle.
pub async fn sign_up(db: &MongoDB, request: &SignUpRequest) -> Result<(), AppError> {
    validation::validate_user_name(&request.user_name).map_err(AppError::Validation)?;
    validation::validate_email(&request.email).map_err(AppError::Validation)?;
    validation::validate_password(&request.password).map_err(AppError::Validation)?;

    let collection = db.collection::<User>("users");

    let otp = generate_otp();
    let expiration =
        BsonDateTime::from_millis((Utc::now() + Duration::hours(OTP_TTL_HOURS)).timestamp_millis());
    let hashed_password = hash(&request.password, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

    let verified_filter = doc! {
        "$and": [
            { "$or": [ { "email": &request.email }, { "user_name": &request.user_name } ] },
            { "is_verified": true },
        ]
    };

    if collection
        .find_one(verified_filter)
        .await
        .map_err(AppError::db)?
        .is_some()
    {
        return Err(AppError::Conflict(
            "User Already exist with this email or userName".to_string(),
        ));
    }

    // Overwrite a colliding unverified record with the fresh attempt
    let unverified_filter = doc! {
        "$and": [
            { "$or": [ { "email": &request.email }, { "user_name": &request.user_name } ] },
            { "is_verified": false },
        ]
    };
    let update = doc! {
        "$set": {
            "email": &request.email,
            "user_name": &request.user_name,
            "password": &hashed_password,
            "verification_code": &otp,
            "verification_code_expiration": expiration,
            "updated_at": BsonDateTime::now(),
        }
    };

    let updated = collection
        .find_one_and_update(unverified_filter, update)
        .await
        .map_err(AppError::db)?;

    if updated.is_none() {
        let new_user = User {
            id: None,
            email: request.email.clone(),
            user_name: request.user_name.clone(),
            password: hashed_password,
            verification_code: otp.clone(),
            verification_code_expiration: expiration,
            is_verified: false,
            is_accepting_message: true,
            messages: Vec::new(),
            created_at: Some(BsonDateTime::now()),
            updated_at: Some(BsonDateTime::now()),
        };

        collection
            .insert_one(&new_user)
            .await
            .map_err(|e| AppError::Database(format!("Failed to create user: {}", e)))?;
    }

    // The record is written before delivery: a failed send surfaces an error,
    // but the pending signup stays in place for the next attempt to overwrite.
    email_service::send_verification_email(&request.email, &request.user_name, &otp)
        .await
        .map_err(|e| AppError::Email(format!("error while sending email {}", e)))?;

    log::info!("✅ Signup OTP issued for {}", request.user_name);

    Ok(())
}

/// The check order (already-verified → expiry → code match) is a behavioral
/// contract; existence is the caller's first check. Do not reorder.
pub fn check_verification(user: &User, otp: &str, now: DateTime<Utc>) -> Result<(), AppError> {
    if user.is_verified {
        return Err(AppError::Conflict("Account already verified".to_string()));
    }

    if user.verification_code_expiration.timestamp_millis() < now.timestamp_millis() {
        return Err(AppError::Conflict(
            "older verification code expire".to_string(),
        ));
    }

    if user.verification_code != otp {
        return Err(AppError::Conflict(
            "wrong entered verification code".to_string(),
        ));
    }

    Ok(())
}

/// Verifies the emailed code and activates the account. Returns a freshly
/// minted session token for the cookie.
pub async fn verify_otp(db: &MongoDB, user_name: &str, otp: &str) -> Result<String, AppError> {
    let collection = db.collection::<User>("users");

    let user = collection
        .find_one(doc! { "user_name": user_name })
        .await
        .map_err(AppError::db)?
        .ok_or_else(|| AppError::NotFound("no user exist with this userName".to_string()))?;

    check_verification(&user, otp, Utc::now())?;

    collection
        .update_one(
            doc! { "user_name": user_name },
            doc! { "$set": { "is_verified": true, "updated_at": BsonDateTime::now() } },
        )
        .await
        .map_err(AppError::db)?;

    let mut verified = user;
    verified.is_verified = true;

    session_service::create_session(&verified).map_err(AppError::Internal)
}

/// Credentials login: only a verified account can authenticate. Mints the
/// same session claims the OTP flow does, returned as a bearer token.
pub async fn login(db: &MongoDB, request: &LoginRequest) -> Result<AuthResponse, AppError> {
    let collection = db.collection::<User>("users");

    let user = collection
        .find_one(doc! { "email": &request.email })
        .await
        .map_err(AppError::db)?
        .ok_or_else(|| AppError::Unauthorized("User not exist with this email".to_string()))?;

    if !user.is_verified {
        return Err(AppError::Unauthorized("Verify email".to_string()));
    }

    let valid = verify(&request.password, &user.password)
        .map_err(|e| AppError::Internal(format!("Password verification error: {}", e)))?;

    if !valid {
        return Err(AppError::Unauthorized("Wrong password".to_string()));
    }

    let token = session_service::create_session(&user).map_err(AppError::Internal)?;

    Ok(AuthResponse {
        success: true,
        token,
        user: UserInfo::from_user(&user),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    fn pending_user(otp: &str, expires_in_secs: i64) -> User {
        User {
            id: Some(ObjectId::new()),
            email: "master@gmail.com".to_string(),
            user_name: "Some_User9".to_string(),
            password: "$2b$10$hash".to_string(),
            verification_code: otp.to_string(),
            verification_code_expiration: BsonDateTime::from_millis(
                (Utc::now() + Duration::seconds(expires_in_secs)).timestamp_millis(),
            ),
            is_verified: false,
            is_accepting_message: true,
            messages: Vec::new(),
            created_at: Some(BsonDateTime::now()),
            updated_at: Some(BsonDateTime::now()),
        }
    }

    #[test]
    fn test_generate_otp_is_six_digits() {
        for _ in 0..100 {
            let otp = generate_otp();
            assert_eq!(otp.len(), 6);
            let value: u32 = otp.parse().unwrap();
            assert!((100_000..=999_999).contains(&value));
        }
    }

    #[test]
    fn test_check_passes_with_fresh_matching_code() {
        let user = pending_user("123456", 3600);
        assert!(check_verification(&user, "123456", Utc::now()).is_ok());
    }

    #[test]
    fn test_already_verified_wins_over_every_other_failure() {
        // expired AND wrong code, but the verified state is reported first
        let mut user = pending_user("123456", -60);
        user.is_verified = true;
        let err = check_verification(&user, "999999", Utc::now()).unwrap_err();
        assert_eq!(err.message(), "Account already verified");
    }

    #[test]
    fn test_expiry_is_checked_before_the_code() {
        // wrong code too, but expiry is reported
        let user = pending_user("123456", -60);
        let err = check_verification(&user, "999999", Utc::now()).unwrap_err();
        assert_eq!(err.message(), "older verification code expire");
    }

    #[test]
    fn test_wrong_code_is_the_last_check() {
        let user = pending_user("123456", 3600);
        let err = check_verification(&user, "654321", Utc::now()).unwrap_err();
        assert_eq!(err.message(), "wrong entered verification code");
    }

    #[test]
    fn test_code_valid_exactly_at_the_expiry_instant() {
        let user = pending_user("123456", 0);
        // now == expiration is still within bounds
        let now = DateTime::from_timestamp_millis(
            user.verification_code_expiration.timestamp_millis(),
        )
        .unwrap();
        assert!(check_verification(&user, "123456", now).is_ok());
    }
}
