use chrono::NaiveDateTime;
use diesel::prelude::*;
use salvo::oapi::ToSchema;
use serde::Serialize;

use crate::core::database::schema::{messages, room_members, rooms, users};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, ToSchema)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub avatar_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub is_online: Option<bool>,
    pub last_activity: Option<NaiveDateTime>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: Option<&'a str>,
    pub password_hash: &'a str,
    pub avatar_url: Option<&'a str>,
    pub created_at: NaiveDateTime,
    pub is_online: Option<bool>,
    pub last_activity: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, ToSchema)]
#[diesel(table_name = rooms)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub is_private: Option<bool>,
    pub created_by: Option<i32>,
    pub created_at: NaiveDateTime,
    pub max_members: Option<i32>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = rooms)]
pub struct NewRoom<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub is_private: Option<bool>,
    pub created_by: Option<i32>,
    pub created_at: NaiveDateTime,
    pub max_members: Option<i32>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, ToSchema)]
#[diesel(table_name = room_members)]
#[diesel(primary_key(user_id, room_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct RoomMember {
    pub user_id: i32,
    pub room_id: i32,
    pub role: String,
    pub joined_at: NaiveDateTime,
    pub nickname: Option<String>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = room_members)]
pub struct NewRoomMember<'a> {
    pub user_id: i32,
    pub room_id: i32,
    pub role: &'a str,
    pub joined_at: NaiveDateTime,
    pub nickname: Option<&'a str>,
}

/// Membership roles, persisted as lowercase strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberRole {
    Owner,
    Admin,
    Member,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Owner => "owner",
            MemberRole::Admin => "admin",
            MemberRole::Member => "member",
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, ToSchema)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i32,
    pub room_id: i32,
    pub sender_id: i32,
    pub content: String,
    pub message_type: String,
    pub file_url: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = messages)]
pub struct NewMessage<'a> {
    pub room_id: i32,
    pub sender_id: i32,
    pub content: &'a str,
    pub message_type: &'a str,
    pub file_url: Option<&'a str>,
    pub created_at: NaiveDateTime,
}
