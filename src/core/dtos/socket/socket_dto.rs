use serde::{Deserialize, Serialize};

/// Payload of a `chat.send_message` event. `message_type` carries the raw
/// client tag; it is normalized to the stored vocabulary at ingress.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RelayMessageDto {
    pub room_id: i32,
    pub content: String,
    pub message_type: Option<String>,
    pub file_url: Option<String>,
}

/// Payload of a `chat.add_user` event.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomDto {
    pub room_id: i32,
}
