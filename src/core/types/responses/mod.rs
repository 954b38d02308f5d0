pub mod auth_response;
pub mod current_user_response;
pub mod failed_response;
pub mod list_message_response;
pub mod list_room_response;
pub mod message_response;
pub mod room_response;
