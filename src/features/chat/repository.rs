use diesel::{
    ExpressionMethods, JoinOnDsl, PgConnection, QueryDsl, RunQueryDsl, SelectableHelper,
    dsl::insert_into,
    r2d2::{ConnectionManager, Pool, PooledConnection},
};
use salvo::async_trait;

use crate::core::{
    database::schema::{messages, users},
    entities::models::{Message, NewMessage, User},
    types::errors::{chat_error::ChatError, general::GeneralError},
};

#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Inserting assigns the message id; this is the durability point of the
    /// relay.
    async fn create_message(&self, message: NewMessage<'_>) -> Result<Message, ChatError>;

    /// All messages of a room ordered by creation time ascending, each with
    /// its sender resolved at read time, so history reflects the sender's
    /// current username.
    async fn get_messages_by_room_ordered(
        &self,
        room_id: i32,
    ) -> Result<Vec<(Message, Option<User>)>, ChatError>;
}

#[derive(Debug, Clone)]
pub struct ChatRepositoryImpl {
    pool: Pool<ConnectionManager<PgConnection>>,
}

impl ChatRepositoryImpl {
    pub fn new(pool: Pool<ConnectionManager<PgConnection>>) -> Self {
        Self { pool }
    }

    fn get_conn(&self) -> Result<PooledConnection<ConnectionManager<PgConnection>>, GeneralError> {
        self.pool.get().map_err(|_| GeneralError::DbConnectionError)
    }
}

#[async_trait]
impl ChatRepository for ChatRepositoryImpl {
    async fn create_message(&self, message: NewMessage<'_>) -> Result<Message, ChatError> {
        let mut conn = self.get_conn()?;

        let new_message = insert_into(messages::table)
            .values(&message)
            .returning(Message::as_select())
            .get_result(&mut conn);

        match new_message {
            Ok(message) => Ok(message),
            Err(_) => Err(ChatError::UnexpectedError(
                "Failed to create new message".to_string(),
            )),
        }
    }

    async fn get_messages_by_room_ordered(
        &self,
        room_id: i32,
    ) -> Result<Vec<(Message, Option<User>)>, ChatError> {
        let mut conn = self.get_conn()?;

        messages::table
            .filter(messages::room_id.eq(room_id))
            .left_join(users::table.on(messages::sender_id.eq(users::id)))
            .select((Message::as_select(), Option::<User>::as_select()))
            .order(messages::created_at.asc())
            .load::<(Message, Option<User>)>(&mut conn)
            .map_err(|_| ChatError::UnexpectedError("Failed to get messages".to_string()))
    }
}
