use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

// Embedded in the owning user's document; no collection of its own.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Message {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub content: String,
    pub created_at: BsonDateTime,
}

/// Wire shape of a message as the dashboard consumes it.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MessageOut {
    pub id: String,
    pub content: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl From<&Message> for MessageOut {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.map(|id| id.to_hex()).unwrap_or_default(),
            content: message.content.clone(),
            created_at: message
                .created_at
                .try_to_rfc3339_string()
                .unwrap_or_default(),
        }
    }
}
