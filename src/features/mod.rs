pub mod auth;
pub mod chat;
pub mod room;
pub mod user;
