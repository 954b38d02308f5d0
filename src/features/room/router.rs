use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};

use crate::core::{
    dtos::room::create_room_dto::CreateRoomDto,
    entities::models::Room,
    types::{errors::room_error::RoomError, responses::list_room_response::ListRoomResponse},
};
use crate::features::room::repository::RoomRepositoryImpl;

use super::service::{RoomService, RoomServiceImpl};

pub fn get_room_router() -> Router {
    Router::new()
        .path("rooms")
        .post(create_room)
        .get(get_all_rooms)
        .push(Router::with_path("private/{is_private}").get(get_rooms_by_privacy))
        .push(Router::with_path("{room_id}").get(get_room_by_id))
}

/// Creates a new room
#[endpoint(tags("rooms"), status_codes(201, 400, 500))]
async fn create_room(
    _res: &mut Response,
    data: JsonBody<CreateRoomDto>,
    depot: &mut Depot,
) -> Result<Room, RoomError> {
    let room_service = depot
        .obtain::<RoomServiceImpl<RoomRepositoryImpl>>()
        .unwrap();

    let room = room_service.create_room(data.0).await?;

    Ok(room)
}

/// Lists every room
#[endpoint(tags("rooms"), status_codes(200, 500))]
async fn get_all_rooms(_res: &mut Response, depot: &mut Depot) -> Result<ListRoomResponse, RoomError> {
    let room_service = depot
        .obtain::<RoomServiceImpl<RoomRepositoryImpl>>()
        .unwrap();

    let rooms = room_service.get_all_rooms().await?;

    Ok(ListRoomResponse { rooms })
}

/// Lists rooms filtered by privacy flag
#[endpoint(tags("rooms"), status_codes(200, 500))]
async fn get_rooms_by_privacy(
    _res: &mut Response,
    is_private: PathParam<bool>,
    depot: &mut Depot,
) -> Result<ListRoomResponse, RoomError> {
    let room_service = depot
        .obtain::<RoomServiceImpl<RoomRepositoryImpl>>()
        .unwrap();

    let rooms = room_service
        .get_rooms_by_privacy(is_private.into_inner())
        .await?;

    Ok(ListRoomResponse { rooms })
}

/// Fetches a room by id
#[endpoint(tags("rooms"), status_codes(200, 404, 500))]
async fn get_room_by_id(
    _res: &mut Response,
    room_id: PathParam<i32>,
    depot: &mut Depot,
) -> Result<Room, RoomError> {
    let room_service = depot
        .obtain::<RoomServiceImpl<RoomRepositoryImpl>>()
        .unwrap();

    let room = room_service.get_room_by_id(room_id.into_inner()).await?;

    Ok(room)
}
