/// Per-connection session context, attached to the socket as a typed
/// extension at handshake time and read by every relay operation on that
/// connection. The username is trusted for the lifetime of the connection;
/// it is not re-validated against the store per message.
#[derive(Debug, Clone, Default)]
pub struct ConnectionSession {
    pub username: Option<String>,
    pub current_room_id: Option<i32>,
}

impl ConnectionSession {
    pub fn authenticated(username: String) -> Self {
        Self {
            username: Some(username),
            current_room_id: None,
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref().filter(|name| !name.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_username_counts_as_unauthenticated() {
        let session = ConnectionSession {
            username: Some(String::new()),
            current_room_id: None,
        };
        assert!(session.username().is_none());
        assert!(ConnectionSession::default().username().is_none());
    }
}
