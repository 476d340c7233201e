use futures::TryStreamExt;
use mongodb::bson::doc;
use serde::Serialize;

use crate::database::MongoDB;
use crate::models::user::User;
use crate::utils::error::AppError;
use crate::utils::validation;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PublicProfile {
    pub id: String,
    #[serde(rename = "userName")]
    pub user_name: String,
    pub email: String,
    #[serde(rename = "isAcceptingMessage")]
    pub is_accepting_message: bool,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct DirectoryEntry {
    pub id: String,
    pub email: String,
    #[serde(rename = "userName")]
    pub user_name: String,
}

/// Availability check for the signup form: the handle is taken only when a
/// verified user holds it.
pub async fn check_username_available(db: &MongoDB, user_name: &str) -> Result<(), AppError> {
    validation::validate_user_name(user_name).map_err(AppError::Validation)?;

    let collection = db.collection::<User>("users");

    let existing = collection
        .find_one(doc! {
            "$and": [ { "user_name": user_name }, { "is_verified": true } ]
        })
        .await
        .map_err(AppError::db)?;

    if existing.is_some() {
        return Err(AppError::Conflict(
            "User already exist with this userName".to_string(),
        ));
    }

    Ok(())
}

/// Public profile behind a feedback page; only verified users are
/// addressable.
pub async fn get_profile(db: &MongoDB, user_name: &str) -> Result<PublicProfile, AppError> {
    let collection = db.collection::<User>("users");

    let user = collection
        .find_one(doc! {
            "$and": [ { "user_name": user_name }, { "is_verified": true } ]
        })
        .await
        .map_err(AppError::db)?
        .ok_or_else(|| AppError::NotFound("user Not exist".to_string()))?;

    Ok(PublicProfile {
        id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
        user_name: user.user_name,
        email: user.email,
        is_accepting_message: user.is_accepting_message,
    })
}

pub async fn list_users(db: &MongoDB) -> Result<Vec<DirectoryEntry>, AppError> {
    let collection = db.collection::<User>("users");

    let mut cursor = collection.find(doc! {}).await.map_err(AppError::db)?;

    let mut users = Vec::new();
    while let Some(user) = cursor.try_next().await.map_err(AppError::db)? {
        users.push(DirectoryEntry {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            email: user.email,
            user_name: user.user_name,
        });
    }

    Ok(users)
}
