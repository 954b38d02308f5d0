use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

/// Message-type vocabulary as persisted. Closed set; rows never hold
/// anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredMessageType {
    Text,
    Image,
    File,
    System,
}

/// Message-type vocabulary as seen on the wire. Clients send `CHAT` (or
/// nothing) for plain text; the server answers join announcements with the
/// dedicated `JOIN` tag so they can be rendered apart from ordinary system
/// messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessageType {
    Chat,
    Image,
    File,
    System,
    Join,
}

impl StoredMessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoredMessageType::Text => "text",
            StoredMessageType::Image => "image",
            StoredMessageType::File => "file",
            StoredMessageType::System => "system",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "text" => Some(StoredMessageType::Text),
            "image" => Some(StoredMessageType::Image),
            "file" => Some(StoredMessageType::File),
            "system" => Some(StoredMessageType::System),
            _ => None,
        }
    }

    /// Ingress half of the mapping table: normalize whatever tag the client
    /// attached to the stored vocabulary. `CHAT`, an absent tag, and any
    /// unknown tag all land on `text`.
    pub fn from_client_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("IMAGE") => StoredMessageType::Image,
            Some("FILE") => StoredMessageType::File,
            Some("SYSTEM") => StoredMessageType::System,
            _ => StoredMessageType::Text,
        }
    }

    /// Egress half of the mapping table. The join flow overrides the result
    /// with [`ClientMessageType::Join`] after calling this.
    pub fn to_client(&self) -> ClientMessageType {
        match self {
            StoredMessageType::Text => ClientMessageType::Chat,
            StoredMessageType::Image => ClientMessageType::Image,
            StoredMessageType::File => ClientMessageType::File,
            StoredMessageType::System => ClientMessageType::System,
        }
    }
}

impl ClientMessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientMessageType::Chat => "CHAT",
            ClientMessageType::Image => "IMAGE",
            ClientMessageType::File => "FILE",
            ClientMessageType::System => "SYSTEM",
            ClientMessageType::Join => "JOIN",
        }
    }
}
