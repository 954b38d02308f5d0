use chrono::NaiveDateTime;
use salvo::http::{Method, StatusCode};
use salvo::oapi::{self, EndpointOutRegister, ToSchema};
use salvo::prelude::*;
use serde::Serialize;

use crate::core::entities::models::Message;
use crate::core::types::enums::message_type::{ClientMessageType, StoredMessageType};

/// Wire-facing view of a stored message. The `message_type` field always
/// carries the client vocabulary; stored values never leak past this type.
/// `sender_name` is resolved from the sender id at read time, so it tracks
/// the sender's current username.
#[derive(Debug, Serialize, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: i32,
    pub room_id: i32,
    pub sender_id: i32,
    pub sender_name: Option<String>,
    pub content: String,
    pub message_type: ClientMessageType,
    pub file_url: Option<String>,
    pub created_at: NaiveDateTime,
}

impl MessageResponse {
    pub fn from_stored(message: Message, sender_name: Option<String>) -> Self {
        let message_type = StoredMessageType::from_str(&message.message_type)
            .unwrap_or(StoredMessageType::Text)
            .to_client();

        Self {
            id: message.id,
            room_id: message.room_id,
            sender_id: message.sender_id,
            sender_name,
            content: message.content,
            message_type,
            file_url: message.file_url,
            created_at: message.created_at,
        }
    }

    pub fn with_client_type(mut self, message_type: ClientMessageType) -> Self {
        self.message_type = message_type;
        self
    }
}

#[async_trait]
impl Writer for MessageResponse {
    async fn write(self, req: &mut Request, _depot: &mut Depot, res: &mut Response) {
        if req.method() == Method::POST {
            res.status_code(StatusCode::CREATED);
            res.render(Json(self));
        } else {
            res.status_code(StatusCode::OK);
            res.render(Json(self));
        }
    }
}

impl EndpointOutRegister for MessageResponse {
    fn register(components: &mut oapi::Components, operation: &mut oapi::Operation) {
        operation.responses.insert(
            StatusCode::OK.as_str(),
            oapi::Response::new("OK")
                .add_content("application/json", MessageResponse::to_schema(components)),
        );
        operation.responses.insert(
            StatusCode::CREATED.as_str(),
            oapi::Response::new("Created")
                .add_content("application/json", MessageResponse::to_schema(components)),
        );
    }
}
