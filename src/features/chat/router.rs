use salvo::{oapi::extract::PathParam, prelude::*};

use crate::core::types::{
    errors::chat_error::ChatError, responses::list_message_response::ListMessageResponse,
};
use crate::features::{
    chat::repository::ChatRepositoryImpl, room::repository::RoomRepositoryImpl,
    user::repository::UserRepositoryImpl,
};

use super::service::{ChatService, ChatServiceImpl};

pub fn get_chat_router() -> Router {
    Router::with_path("rooms/{room_id}/messages").get(get_room_history)
}

/// Room history, ordered by creation time ascending, sender names resolved
/// at read time
#[endpoint(tags("chats"), status_codes(200, 500))]
async fn get_room_history(
    _res: &mut Response,
    room_id: PathParam<i32>,
    depot: &mut Depot,
) -> Result<ListMessageResponse, ChatError> {
    let chat_service = depot
        .obtain::<ChatServiceImpl<ChatRepositoryImpl, RoomRepositoryImpl, UserRepositoryImpl>>()
        .unwrap();

    let messages = chat_service.get_room_history(room_id.into_inner()).await?;

    Ok(ListMessageResponse { messages })
}
