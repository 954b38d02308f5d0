use chrono::Utc;
use salvo::async_trait;

use crate::{
    core::{
        dtos::socket::socket_dto::RelayMessageDto,
        entities::models::{MemberRole, NewMessage, NewRoomMember, User},
        types::{
            enums::message_type::{ClientMessageType, StoredMessageType},
            errors::chat_error::ChatError,
            responses::message_response::MessageResponse,
            session::ConnectionSession,
        },
    },
    features::{room::repository::RoomRepository, user::repository::UserRepository},
};

use super::repository::ChatRepository;

#[async_trait]
pub trait ChatService: Send + Sync {
    /// Relay a chat message: resolve the session identity, validate the
    /// room, persist, and hand back the wire-facing record for broadcast.
    /// Nothing is broadcast unless persistence succeeded.
    async fn send_message(
        &self,
        session: &ConnectionSession,
        data: RelayMessageDto,
    ) -> Result<MessageResponse, ChatError>;

    /// Record room membership for the session's user and synthesize the
    /// join announcement. Stored as `system`, broadcast as `JOIN`.
    async fn add_user(
        &self,
        session: &ConnectionSession,
        room_id: i32,
    ) -> Result<MessageResponse, ChatError>;

    async fn get_room_history(&self, room_id: i32) -> Result<Vec<MessageResponse>, ChatError>;
}

#[derive(Debug, Clone)]
pub struct ChatServiceImpl<C: ChatRepository, R: RoomRepository, U: UserRepository> {
    chat_repository: C,
    room_repository: R,
    user_repository: U,
}

impl<C: ChatRepository, R: RoomRepository, U: UserRepository> ChatServiceImpl<C, R, U> {
    pub fn new(chat_repository: C, room_repository: R, user_repository: U) -> Self {
        Self {
            chat_repository,
            room_repository,
            user_repository,
        }
    }

    /// Resolve the session against the store. The username is trusted from
    /// the handshake; the user row behind it is re-fetched on every call so
    /// the relay never works from a stale identity.
    async fn resolve_sender(&self, session: &ConnectionSession) -> Result<User, ChatError> {
        let username = session.username().ok_or(ChatError::Unauthorized)?;

        self.user_repository
            .get_user_by_username(username)
            .await
            .map_err(|_| ChatError::UserNotFound(username.to_string()))
    }
}

#[async_trait]
impl<
    C: ChatRepository + Send + Sync,
    R: RoomRepository + Send + Sync,
    U: UserRepository + Send + Sync,
> ChatService for ChatServiceImpl<C, R, U>
{
    async fn send_message(
        &self,
        session: &ConnectionSession,
        data: RelayMessageDto,
    ) -> Result<MessageResponse, ChatError> {
        let user = self.resolve_sender(session).await?;

        let room = self
            .room_repository
            .get_room_by_id(data.room_id)
            .await
            .map_err(|_| ChatError::RoomNotFound(data.room_id))?;

        let stored_type = StoredMessageType::from_client_tag(data.message_type.as_deref());
        let now = Utc::now().naive_utc();

        let new_message = NewMessage {
            room_id: room.id,
            sender_id: user.id,
            content: &data.content,
            message_type: stored_type.as_str(),
            file_url: data.file_url.as_deref(),
            created_at: now,
        };

        let message = self.chat_repository.create_message(new_message).await?;

        Ok(MessageResponse::from_stored(message, Some(user.username)))
    }

    async fn add_user(
        &self,
        session: &ConnectionSession,
        room_id: i32,
    ) -> Result<MessageResponse, ChatError> {
        let user = self.resolve_sender(session).await?;

        let room = self
            .room_repository
            .get_room_by_id(room_id)
            .await
            .map_err(|_| ChatError::RoomNotFound(room_id))?;

        let now = Utc::now().naive_utc();

        let new_member = NewRoomMember {
            user_id: user.id,
            room_id: room.id,
            role: MemberRole::Member.as_str(),
            joined_at: now,
            nickname: None,
        };

        self.room_repository
            .upsert_member(new_member)
            .await
            .map_err(|_| ChatError::UnexpectedError("Failed to record membership".to_string()))?;

        let content = format!("{} joined the room", user.username);

        let new_message = NewMessage {
            room_id: room.id,
            sender_id: user.id,
            content: &content,
            message_type: StoredMessageType::System.as_str(),
            file_url: None,
            created_at: now,
        };

        let message = self.chat_repository.create_message(new_message).await?;

        Ok(MessageResponse::from_stored(message, Some(user.username))
            .with_client_type(ClientMessageType::Join))
    }

    async fn get_room_history(&self, room_id: i32) -> Result<Vec<MessageResponse>, ChatError> {
        let rows = self
            .chat_repository
            .get_messages_by_room_ordered(room_id)
            .await?;

        let messages = rows
            .into_iter()
            .map(|(message, sender)| {
                let sender_name = sender.map(|user| user.username);
                MessageResponse::from_stored(message, sender_name)
            })
            .collect();

        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entities::models::{Message, NewRoom, NewUser, Room, RoomMember, User};
    use crate::core::types::errors::{room_error::RoomError, user_error::UserError};
    use crate::features::room::repository::RoomRepository;
    use crate::features::user::repository::UserRepository;
    use chrono::{DateTime, NaiveDateTime};
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    };

    // --- Sample Data Helpers ---
    fn ts(secs: i64) -> NaiveDateTime {
        DateTime::from_timestamp(secs, 0).unwrap().naive_utc()
    }

    fn sample_user(id: i32, username: &str) -> User {
        User {
            id,
            username: username.to_string(),
            email: None,
            password_hash: "$2b$12$abcdefghijklmnopqrstuv".to_string(),
            avatar_url: None,
            created_at: ts(0),
            is_online: Some(true),
            last_activity: Some(ts(0)),
        }
    }

    fn sample_room(id: i32, name: &str) -> Room {
        Room {
            id,
            name: name.to_string(),
            description: None,
            is_private: Some(false),
            created_by: Some(1),
            created_at: ts(0),
            max_members: None,
        }
    }

    fn relay_dto(room_id: i32, content: &str, tag: Option<&str>) -> RelayMessageDto {
        RelayMessageDto {
            room_id,
            content: content.to_string(),
            message_type: tag.map(str::to_string),
            file_url: None,
        }
    }

    fn session_for(username: &str) -> ConnectionSession {
        ConnectionSession::authenticated(username.to_string())
    }

    // --- Mock Repositories (shared in-memory store) ---
    #[derive(Clone, Default)]
    struct InMemoryStore {
        users: Arc<Mutex<Vec<User>>>,
        rooms: Arc<Mutex<Vec<Room>>>,
        members: Arc<Mutex<Vec<RoomMember>>>,
        messages: Arc<Mutex<Vec<Message>>>,
        fail_message_insert: Arc<AtomicBool>,
    }

    impl InMemoryStore {
        fn with_user_and_room(username: &str, room_name: &str) -> Self {
            let store = Self::default();
            store.users.lock().unwrap().push(sample_user(1, username));
            store.rooms.lock().unwrap().push(sample_room(1, room_name));
            store
        }
    }

    #[derive(Clone)]
    struct MockChatRepository(InMemoryStore);

    #[async_trait]
    impl ChatRepository for MockChatRepository {
        async fn create_message(&self, message: NewMessage<'_>) -> Result<Message, ChatError> {
            if self.0.fail_message_insert.load(Ordering::SeqCst) {
                return Err(ChatError::UnexpectedError(
                    "Failed to create new message".to_string(),
                ));
            }
            let mut messages = self.0.messages.lock().unwrap();
            let created = Message {
                id: messages.len() as i32 + 1,
                room_id: message.room_id,
                sender_id: message.sender_id,
                content: message.content.to_string(),
                message_type: message.message_type.to_string(),
                file_url: message.file_url.map(str::to_string),
                created_at: message.created_at,
            };
            messages.push(created.clone());
            Ok(created)
        }

        async fn get_messages_by_room_ordered(
            &self,
            room_id: i32,
        ) -> Result<Vec<(Message, Option<User>)>, ChatError> {
            let users = self.0.users.lock().unwrap();
            let mut rows: Vec<Message> = self
                .0
                .messages
                .lock()
                .unwrap()
                .iter()
                .filter(|message| message.room_id == room_id)
                .cloned()
                .collect();
            rows.sort_by_key(|message| message.created_at);
            Ok(rows
                .into_iter()
                .map(|message| {
                    let sender = users.iter().find(|u| u.id == message.sender_id).cloned();
                    (message, sender)
                })
                .collect())
        }
    }

    #[derive(Clone)]
    struct MockRoomRepository(InMemoryStore);

    #[async_trait]
    impl RoomRepository for MockRoomRepository {
        async fn create_room(&self, _room: NewRoom<'_>) -> Result<Room, RoomError> {
            unimplemented!()
        }

        async fn get_room_by_id(&self, room_id: i32) -> Result<Room, RoomError> {
            self.0
                .rooms
                .lock()
                .unwrap()
                .iter()
                .find(|room| room.id == room_id)
                .cloned()
                .ok_or(RoomError::RoomNotFound(room_id))
        }

        async fn find_all(&self) -> Result<Vec<Room>, RoomError> {
            Ok(self.0.rooms.lock().unwrap().clone())
        }

        async fn find_by_privacy(&self, _is_private: bool) -> Result<Vec<Room>, RoomError> {
            unimplemented!()
        }

        async fn upsert_member(&self, member: NewRoomMember<'_>) -> Result<RoomMember, RoomError> {
            let mut members = self.0.members.lock().unwrap();
            if let Some(existing) = members
                .iter()
                .find(|m| m.user_id == member.user_id && m.room_id == member.room_id)
            {
                return Ok(existing.clone());
            }
            let created = RoomMember {
                user_id: member.user_id,
                room_id: member.room_id,
                role: member.role.to_string(),
                joined_at: member.joined_at,
                nickname: member.nickname.map(str::to_string),
            };
            members.push(created.clone());
            Ok(created)
        }
    }

    #[derive(Clone)]
    struct MockUserRepository(InMemoryStore);

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn create_user(&self, _user: NewUser<'_>) -> Result<User, UserError> {
            unimplemented!()
        }

        async fn get_user_by_username(&self, username: &str) -> Result<User, UserError> {
            self.0
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|user| user.username == username)
                .cloned()
                .ok_or(UserError::UserNameNotFound(username.to_string()))
        }

        async fn exists_username(&self, username: &str) -> Result<bool, UserError> {
            Ok(self
                .0
                .users
                .lock()
                .unwrap()
                .iter()
                .any(|user| user.username == username))
        }

        async fn exists_email(&self, _email: &str) -> Result<bool, UserError> {
            Ok(false)
        }

        async fn set_presence(
            &self,
            _user_id: i32,
            _is_online: bool,
            _at: NaiveDateTime,
        ) -> Result<(), UserError> {
            Ok(())
        }
    }

    fn service_over(
        store: &InMemoryStore,
    ) -> ChatServiceImpl<MockChatRepository, MockRoomRepository, MockUserRepository> {
        ChatServiceImpl::new(
            MockChatRepository(store.clone()),
            MockRoomRepository(store.clone()),
            MockUserRepository(store.clone()),
        )
    }

    // --- Tests ---
    #[tokio::test]
    async fn test_send_message_persists_once_and_maps_tag_back() {
        let store = InMemoryStore::with_user_and_room("alice", "general");
        let service = service_over(&store);

        let response = service
            .send_message(&session_for("alice"), relay_dto(1, "hi", Some("CHAT")))
            .await
            .unwrap();

        assert_eq!(response.message_type, ClientMessageType::Chat);
        assert_eq!(response.sender_name.as_deref(), Some("alice"));
        assert_eq!(response.content, "hi");

        let messages = store.messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].message_type, "text");
    }

    #[tokio::test]
    async fn test_send_message_without_tag_defaults_to_chat() {
        let store = InMemoryStore::with_user_and_room("alice", "general");
        let service = service_over(&store);

        let response = service
            .send_message(&session_for("alice"), relay_dto(1, "hi", None))
            .await
            .unwrap();

        assert_eq!(response.message_type, ClientMessageType::Chat);
        assert_eq!(store.messages.lock().unwrap()[0].message_type, "text");
    }

    #[tokio::test]
    async fn test_send_message_unauthenticated_never_persists() {
        let store = InMemoryStore::with_user_and_room("alice", "general");
        let service = service_over(&store);

        let result = service
            .send_message(&ConnectionSession::default(), relay_dto(1, "hi", None))
            .await;

        assert!(matches!(result, Err(ChatError::Unauthorized)));
        assert!(store.messages.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_message_unknown_room_never_persists() {
        let store = InMemoryStore::with_user_and_room("alice", "general");
        let service = service_over(&store);

        let result = service
            .send_message(&session_for("alice"), relay_dto(99, "hi", None))
            .await;

        assert!(matches!(result, Err(ChatError::RoomNotFound(99))));
        assert!(store.messages.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_message_unknown_user_fails_request_only() {
        let store = InMemoryStore::with_user_and_room("alice", "general");
        let service = service_over(&store);

        // Session identity no longer maps to a stored user.
        let result = service
            .send_message(&session_for("ghost"), relay_dto(1, "hi", None))
            .await;

        assert!(matches!(result, Err(ChatError::UserNotFound(name)) if name == "ghost"));
        assert!(store.messages.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_message_persistence_failure_surfaces_error() {
        let store = InMemoryStore::with_user_and_room("alice", "general");
        store.fail_message_insert.store(true, Ordering::SeqCst);
        let service = service_over(&store);

        let result = service
            .send_message(&session_for("alice"), relay_dto(1, "hi", None))
            .await;

        assert!(matches!(result, Err(ChatError::UnexpectedError(_))));
        assert!(store.messages.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_user_stores_system_and_broadcasts_join() {
        let store = InMemoryStore::with_user_and_room("alice", "general");
        let service = service_over(&store);

        let response = service.add_user(&session_for("alice"), 1).await.unwrap();

        assert_eq!(response.message_type, ClientMessageType::Join);
        assert_eq!(response.content, "alice joined the room");

        let messages = store.messages.lock().unwrap();
        assert_eq!(messages[0].message_type, "system");

        let members = store.members.lock().unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].role, "member");
    }

    #[tokio::test]
    async fn test_add_user_is_idempotent_but_still_announces() {
        let store = InMemoryStore::with_user_and_room("alice", "general");
        let service = service_over(&store);

        let first = service.add_user(&session_for("alice"), 1).await.unwrap();
        let second = service.add_user(&session_for("alice"), 1).await.unwrap();

        assert_eq!(first.message_type, ClientMessageType::Join);
        assert_eq!(second.message_type, ClientMessageType::Join);

        // One membership row, two announcements.
        assert_eq!(store.members.lock().unwrap().len(), 1);
        assert_eq!(store.messages.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_add_user_unknown_room_records_nothing() {
        let store = InMemoryStore::with_user_and_room("alice", "general");
        let service = service_over(&store);

        let result = service.add_user(&session_for("alice"), 42).await;

        assert!(matches!(result, Err(ChatError::RoomNotFound(42))));
        assert!(store.members.lock().unwrap().is_empty());
        assert!(store.messages.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_is_ordered_and_resolves_current_names() {
        let store = InMemoryStore::with_user_and_room("alice", "general");
        {
            let mut messages = store.messages.lock().unwrap();
            messages.push(Message {
                id: 2,
                room_id: 1,
                sender_id: 1,
                content: "second".to_string(),
                message_type: "text".to_string(),
                file_url: None,
                created_at: ts(20),
            });
            messages.push(Message {
                id: 1,
                room_id: 1,
                sender_id: 1,
                content: "first".to_string(),
                message_type: "text".to_string(),
                file_url: None,
                created_at: ts(10),
            });
            // Sender that no longer resolves to any user.
            messages.push(Message {
                id: 3,
                room_id: 1,
                sender_id: 9,
                content: "orphan".to_string(),
                message_type: "system".to_string(),
                file_url: None,
                created_at: ts(30),
            });
        }
        let service = service_over(&store);

        let history = service.get_room_history(1).await.unwrap();

        assert_eq!(history.len(), 3);
        assert_eq!(history[0].content, "first");
        assert_eq!(history[1].content, "second");
        assert!(history.windows(2).all(|w| w[0].created_at <= w[1].created_at));

        assert_eq!(history[0].sender_name.as_deref(), Some("alice"));
        assert_eq!(history[2].sender_name, None);
        assert_eq!(history[0].message_type, ClientMessageType::Chat);
        assert_eq!(history[2].message_type, ClientMessageType::System);
    }

    #[tokio::test]
    async fn test_end_to_end_send_then_history_round_trip() {
        let store = InMemoryStore::with_user_and_room("alice", "general");
        let service = service_over(&store);

        service
            .send_message(&session_for("alice"), relay_dto(1, "hi", Some("CHAT")))
            .await
            .unwrap();

        let history = service.get_room_history(1).await.unwrap();

        assert_eq!(history.len(), 1);
        assert_eq!(history[0].content, "hi");
        assert_eq!(history[0].sender_name.as_deref(), Some("alice"));
        assert_eq!(history[0].message_type, ClientMessageType::Chat);
    }

    #[tokio::test]
    async fn test_concurrent_joins_do_not_lose_memberships() {
        let store = InMemoryStore::with_user_and_room("alice", "general");
        store.users.lock().unwrap().push(sample_user(2, "bob"));
        let service = Arc::new(service_over(&store));

        let alice = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.add_user(&session_for("alice"), 1).await })
        };
        let bob = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.add_user(&session_for("bob"), 1).await })
        };

        let (alice, bob) = (alice.await.unwrap(), bob.await.unwrap());

        assert!(alice.is_ok());
        assert!(bob.is_ok());
        assert_eq!(store.members.lock().unwrap().len(), 2);
        assert_eq!(store.messages.lock().unwrap().len(), 2);
    }
}
