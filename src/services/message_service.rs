use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use serde::Deserialize;

use crate::database::MongoDB;
use crate::models::message::{Message, MessageOut};
use crate::models::user::User;
use crate::services::email_service;
use crate::utils::error::AppError;
use crate::utils::validation;

// Request structures
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SendMessageRequest {
    #[serde(rename = "userName")]
    pub user_name: String,
    pub message: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AcceptingRequest {
    #[serde(rename = "isAcceptingMessage")]
    pub is_accepting_message: bool,
}

/// A declined delivery is not an error: the sender gets a success response
/// with a notice and nothing is stored.
#[derive(Debug, PartialEq, Eq)]
pub enum SendOutcome {
    Delivered,
    RecipientNotAccepting,
}

/// Appends an anonymous message to the recipient's inbox. The `$push` is
/// single-document atomic and final; the notification email is
/// fire-and-forget and never rolls the message back.
pub async fn send_message(
    db: &MongoDB,
    request: &SendMessageRequest,
) -> Result<SendOutcome, AppError> {
    if request.user_name.is_empty() {
        return Err(AppError::Validation("userName is required".to_string()));
    }
    if request.message.is_empty() {
        return Err(AppError::Validation("message is required".to_string()));
    }
    validation::validate_message_content(&request.message).map_err(AppError::Validation)?;
    validation::validate_user_name(&request.user_name).map_err(AppError::Validation)?;

    let collection = db.collection::<User>("users");

    let user = collection
        .find_one(doc! { "user_name": &request.user_name })
        .await
        .map_err(AppError::db)?
        .ok_or_else(|| AppError::NotFound("username not found | wrong username".to_string()))?;

    if !user.is_accepting_message {
        return Ok(SendOutcome::RecipientNotAccepting);
    }

    let message = Message {
        id: Some(ObjectId::new()),
        content: request.message.clone(),
        created_at: BsonDateTime::now(),
    };
    let message_bson = mongodb::bson::to_bson(&message)
        .map_err(|e| AppError::Internal(format!("Failed to encode message: {}", e)))?;

    collection
        .update_one(
            doc! { "user_name": &request.user_name },
            doc! { "$push": { "messages": message_bson } },
        )
        .await
        .map_err(AppError::db)?;

    if let Err(e) = email_service::send_new_message_email(&user.email, &user.user_name).await {
        log::warn!(
            "⚠️ New-message notification to {} failed (message kept): {}",
            user.email,
            e
        );
    }

    Ok(SendOutcome::Delivered)
}

/// Unwind-sort-group pipeline returning the embedded messages newest-first.
fn messages_pipeline(user_id: ObjectId) -> Vec<Document> {
    vec![
        doc! { "$match": { "_id": user_id } },
        doc! { "$unwind": "$messages" },
        doc! { "$sort": { "messages.created_at": -1 } },
        doc! { "$group": { "_id": "$_id", "messages": { "$push": "$messages" } } },
    ]
}

#[derive(Debug, Deserialize)]
struct GroupedMessages {
    messages: Vec<Message>,
}

pub async fn get_messages(db: &MongoDB, user_id: &str) -> Result<Vec<MessageOut>, AppError> {
    let user_oid = ObjectId::parse_str(user_id)
        .map_err(|_| AppError::Validation("invalid user id in session".to_string()))?;

    let collection = db.collection::<User>("users");

    let mut cursor = collection
        .aggregate(messages_pipeline(user_oid))
        .await
        .map_err(AppError::db)?;

    // A user with an empty inbox produces no documents at all: $unwind on an
    // empty array drops the document.
    match cursor.try_next().await.map_err(AppError::db)? {
        Some(document) => {
            let grouped: GroupedMessages = mongodb::bson::from_document(document)
                .map_err(|e| AppError::Internal(format!("Failed to decode messages: {}", e)))?;
            Ok(grouped.messages.iter().map(MessageOut::from).collect())
        }
        None => Ok(Vec::new()),
    }
}

/// Pulls one embedded message by id. Scoping the update to the session
/// user's `_id` is the authorization check: nobody can reach another inbox.
pub async fn delete_message(db: &MongoDB, user_id: &str, msg_id: &str) -> Result<(), AppError> {
    let user_oid = ObjectId::parse_str(user_id)
        .map_err(|_| AppError::Validation("invalid user id in session".to_string()))?;
    let message_oid = ObjectId::parse_str(msg_id)
        .map_err(|_| AppError::Validation("msgId is not a valid message id".to_string()))?;

    let collection = db.collection::<User>("users");

    let updated = collection
        .find_one_and_update(
            doc! { "_id": user_oid },
            doc! { "$pull": { "messages": { "_id": message_oid } } },
        )
        .await
        .map_err(AppError::db)?;

    if updated.is_none() {
        return Err(AppError::Unauthorized(
            "User not found with given session".to_string(),
        ));
    }

    Ok(())
}

pub async fn get_accepting(db: &MongoDB, user_id: &str) -> Result<bool, AppError> {
    let user_oid = ObjectId::parse_str(user_id)
        .map_err(|_| AppError::Validation("invalid user id in session".to_string()))?;

    let collection = db.collection::<User>("users");

    let user = collection
        .find_one(doc! { "_id": user_oid })
        .await
        .map_err(AppError::db)?
        .ok_or_else(|| AppError::Conflict("User doesn't exist".to_string()))?;

    Ok(user.is_accepting_message)
}

pub async fn set_accepting(db: &MongoDB, user_id: &str, accepting: bool) -> Result<(), AppError> {
    let user_oid = ObjectId::parse_str(user_id)
        .map_err(|_| AppError::Validation("invalid user id in session".to_string()))?;

    let collection = db.collection::<User>("users");

    let updated = collection
        .find_one_and_update(
            doc! { "_id": user_oid },
            doc! { "$set": { "is_accepting_message": accepting, "updated_at": BsonDateTime::now() } },
        )
        .await
        .map_err(AppError::db)?;

    if updated.is_none() {
        return Err(AppError::Conflict("User doesn't exist".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_sorts_newest_first() {
        let pipeline = messages_pipeline(ObjectId::new());
        assert_eq!(pipeline.len(), 4);
        let sort = pipeline[2].get_document("$sort").unwrap();
        assert_eq!(sort.get_i32("messages.created_at").unwrap(), -1);
    }

    #[test]
    fn test_pipeline_unwinds_before_sorting() {
        let pipeline = messages_pipeline(ObjectId::new());
        assert!(pipeline[1].contains_key("$unwind"));
        assert!(pipeline[2].contains_key("$sort"));
        assert!(pipeline[3].contains_key("$group"));
    }

    #[test]
    fn test_message_out_conversion() {
        let id = ObjectId::new();
        let message = Message {
            id: Some(id),
            content: "hello".to_string(),
            created_at: BsonDateTime::from_millis(1_700_000_000_000),
        };
        let out = MessageOut::from(&message);
        assert_eq!(out.id, id.to_hex());
        assert_eq!(out.content, "hello");
        assert!(out.created_at.starts_with("2023-11-14"));
    }
}
