use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

use crate::models::message::Message;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,     // unique
    pub user_name: String, // unique, public handle once verified
    pub password: String,  // bcrypt hash
    pub verification_code: String,
    pub verification_code_expiration: BsonDateTime,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default = "default_is_accepting_message")]
    pub is_accepting_message: bool,
    #[serde(default)]
    pub messages: Vec<Message>,
    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}

// Default functions for serde
fn default_is_accepting_message() -> bool {
    true
}
