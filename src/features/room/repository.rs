use diesel::{
    ExpressionMethods, PgConnection, QueryDsl, RunQueryDsl, SelectableHelper,
    dsl::insert_into,
    r2d2::{ConnectionManager, Pool, PooledConnection},
};
use salvo::async_trait;

use crate::core::{
    database::schema::{room_members, rooms},
    entities::models::{NewRoom, NewRoomMember, Room, RoomMember},
    types::errors::{general::GeneralError, room_error::RoomError},
};

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn create_room(&self, room: NewRoom<'_>) -> Result<Room, RoomError>;

    async fn get_room_by_id(&self, room_id: i32) -> Result<Room, RoomError>;

    async fn find_all(&self) -> Result<Vec<Room>, RoomError>;

    async fn find_by_privacy(&self, is_private: bool) -> Result<Vec<Room>, RoomError>;

    /// Idempotent membership insert: a repeated (user, room) pair leaves the
    /// existing row untouched and returns it unchanged.
    async fn upsert_member(&self, member: NewRoomMember<'_>) -> Result<RoomMember, RoomError>;
}

#[derive(Debug, Clone)]
pub struct RoomRepositoryImpl {
    pool: Pool<ConnectionManager<PgConnection>>,
}

impl RoomRepositoryImpl {
    pub fn new(pool: Pool<ConnectionManager<PgConnection>>) -> Self {
        Self { pool }
    }

    fn get_conn(&self) -> Result<PooledConnection<ConnectionManager<PgConnection>>, GeneralError> {
        self.pool.get().map_err(|_| GeneralError::DbConnectionError)
    }
}

#[async_trait]
impl RoomRepository for RoomRepositoryImpl {
    async fn create_room(&self, room: NewRoom<'_>) -> Result<Room, RoomError> {
        let mut conn = self.get_conn()?;

        let new_room = insert_into(rooms::table)
            .values(&room)
            .returning(Room::as_select())
            .get_result(&mut conn);

        match new_room {
            Ok(room) => Ok(room),
            Err(_) => Err(RoomError::UnexpectedError(
                "Failed to create room".to_string(),
            )),
        }
    }

    async fn get_room_by_id(&self, room_id: i32) -> Result<Room, RoomError> {
        let mut conn = self.get_conn()?;

        let room = rooms::table
            .filter(rooms::id.eq(room_id))
            .first::<Room>(&mut conn);

        match room {
            Ok(room) => Ok(room),
            Err(_) => Err(RoomError::RoomNotFound(room_id)),
        }
    }

    async fn find_all(&self) -> Result<Vec<Room>, RoomError> {
        let mut conn = self.get_conn()?;

        rooms::table
            .order(rooms::created_at.asc())
            .load::<Room>(&mut conn)
            .map_err(|_| RoomError::UnexpectedError("Failed to list rooms".to_string()))
    }

    async fn find_by_privacy(&self, is_private: bool) -> Result<Vec<Room>, RoomError> {
        let mut conn = self.get_conn()?;

        rooms::table
            .filter(rooms::is_private.eq(Some(is_private)))
            .order(rooms::created_at.asc())
            .load::<Room>(&mut conn)
            .map_err(|_| RoomError::UnexpectedError("Failed to list rooms".to_string()))
    }

    async fn upsert_member(&self, member: NewRoomMember<'_>) -> Result<RoomMember, RoomError> {
        let mut conn = self.get_conn()?;

        let user_id = member.user_id;
        let room_id = member.room_id;

        insert_into(room_members::table)
            .values(&member)
            .on_conflict((room_members::user_id, room_members::room_id))
            .do_nothing()
            .execute(&mut conn)
            .map_err(|_| RoomError::UnexpectedError("Failed to join room".to_string()))?;

        room_members::table
            .filter(room_members::user_id.eq(user_id))
            .filter(room_members::room_id.eq(room_id))
            .first::<RoomMember>(&mut conn)
            .map_err(|_| RoomError::UnexpectedError("Failed to read membership".to_string()))
    }
}
