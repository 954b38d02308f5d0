#[derive(Debug)]
pub enum WsEvent {
    ChatSendMessage,
    ChatAddUser,
    ChatMessage,
    ChatError,

    Connection,
    Disconnect,
}

impl WsEvent {
    pub fn to_str(&self) -> &str {
        match self {
            WsEvent::ChatSendMessage => "chat.send_message",
            WsEvent::ChatAddUser => "chat.add_user",
            WsEvent::ChatMessage => "chat.message",
            WsEvent::ChatError => "chat.error",

            WsEvent::Connection => "connection",
            WsEvent::Disconnect => "disconnect",
        }
    }
}

/// Broadcast topic for a room; every subscriber of the topic receives the
/// room's published messages.
pub fn room_topic(room_id: i32) -> String {
    format!("chat:{room_id}")
}
