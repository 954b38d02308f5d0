use chrono::Utc;
use salvo::async_trait;

use crate::core::{
    dtos::room::create_room_dto::CreateRoomDto,
    entities::models::{NewRoom, Room},
    types::errors::room_error::RoomError,
};

use super::repository::RoomRepository;

#[async_trait]
pub trait RoomService: Send + Sync {
    async fn create_room(&self, data: CreateRoomDto) -> Result<Room, RoomError>;

    async fn get_room_by_id(&self, room_id: i32) -> Result<Room, RoomError>;

    async fn get_all_rooms(&self) -> Result<Vec<Room>, RoomError>;

    async fn get_rooms_by_privacy(&self, is_private: bool) -> Result<Vec<Room>, RoomError>;
}

#[derive(Debug, Clone)]
pub struct RoomServiceImpl<R: RoomRepository> {
    room_repository: R,
}

impl<R: RoomRepository> RoomServiceImpl<R> {
    pub fn new(room_repository: R) -> Self {
        Self { room_repository }
    }
}

#[async_trait]
impl<R: RoomRepository + Send + Sync> RoomService for RoomServiceImpl<R> {
    async fn create_room(&self, data: CreateRoomDto) -> Result<Room, RoomError> {
        let name = data.name.trim();

        if name.is_empty() {
            return Err(RoomError::EmptyName);
        }

        let now = Utc::now().naive_utc();

        let new_room = NewRoom {
            name,
            description: data.description.as_deref(),
            is_private: data.is_private,
            created_by: data.created_by,
            created_at: now,
            max_members: data.max_members,
        };

        let room = self.room_repository.create_room(new_room).await?;

        Ok(room)
    }

    async fn get_room_by_id(&self, room_id: i32) -> Result<Room, RoomError> {
        self.room_repository.get_room_by_id(room_id).await
    }

    async fn get_all_rooms(&self) -> Result<Vec<Room>, RoomError> {
        self.room_repository.find_all().await
    }

    async fn get_rooms_by_privacy(&self, is_private: bool) -> Result<Vec<Room>, RoomError> {
        self.room_repository.find_by_privacy(is_private).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entities::models::{NewRoomMember, RoomMember};
    use chrono::DateTime;
    use std::sync::{Arc, Mutex};

    fn sample_room(id: i32, name: &str) -> Room {
        let now = DateTime::from_timestamp(0, 0).unwrap().naive_utc();
        Room {
            id,
            name: name.to_string(),
            description: None,
            is_private: Some(false),
            created_by: Some(1),
            created_at: now,
            max_members: None,
        }
    }

    #[derive(Clone, Default)]
    struct MockRoomRepository {
        rooms: Arc<Mutex<Vec<Room>>>,
    }

    #[async_trait]
    impl RoomRepository for MockRoomRepository {
        async fn create_room(&self, room: NewRoom<'_>) -> Result<Room, RoomError> {
            let mut rooms = self.rooms.lock().unwrap();
            let created = Room {
                id: rooms.len() as i32 + 1,
                name: room.name.to_string(),
                description: room.description.map(str::to_string),
                is_private: room.is_private,
                created_by: room.created_by,
                created_at: room.created_at,
                max_members: room.max_members,
            };
            rooms.push(created.clone());
            Ok(created)
        }

        async fn get_room_by_id(&self, room_id: i32) -> Result<Room, RoomError> {
            self.rooms
                .lock()
                .unwrap()
                .iter()
                .find(|room| room.id == room_id)
                .cloned()
                .ok_or(RoomError::RoomNotFound(room_id))
        }

        async fn find_all(&self) -> Result<Vec<Room>, RoomError> {
            Ok(self.rooms.lock().unwrap().clone())
        }

        async fn find_by_privacy(&self, is_private: bool) -> Result<Vec<Room>, RoomError> {
            Ok(self
                .rooms
                .lock()
                .unwrap()
                .iter()
                .filter(|room| room.is_private == Some(is_private))
                .cloned()
                .collect())
        }

        async fn upsert_member(&self, _member: NewRoomMember<'_>) -> Result<RoomMember, RoomError> {
            unimplemented!()
        }
    }

    #[tokio::test]
    async fn test_create_room_rejects_empty_name() {
        let repo = MockRoomRepository::default();
        let service = RoomServiceImpl::new(repo.clone());

        let result = service
            .create_room(CreateRoomDto {
                name: "   ".to_string(),
                description: None,
                is_private: None,
                created_by: None,
                max_members: None,
            })
            .await;

        assert!(matches!(result, Err(RoomError::EmptyName)));
        assert!(repo.rooms.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_room_trims_name() {
        let repo = MockRoomRepository::default();
        let service = RoomServiceImpl::new(repo);

        let room = service
            .create_room(CreateRoomDto {
                name: "  general  ".to_string(),
                description: Some("Anything goes".to_string()),
                is_private: Some(false),
                created_by: Some(1),
                max_members: Some(100),
            })
            .await
            .unwrap();

        assert_eq!(room.name, "general");
        assert_eq!(room.max_members, Some(100));
    }

    #[tokio::test]
    async fn test_privacy_filter() {
        let repo = MockRoomRepository::default();
        {
            let mut rooms = repo.rooms.lock().unwrap();
            rooms.push(sample_room(1, "public"));
            let mut private = sample_room(2, "private");
            private.is_private = Some(true);
            rooms.push(private);
        }
        let service = RoomServiceImpl::new(repo);

        let private_rooms = service.get_rooms_by_privacy(true).await.unwrap();

        assert_eq!(private_rooms.len(), 1);
        assert_eq!(private_rooms[0].name, "private");
    }
}
