use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use validator_derive::Validate;

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate, Clone)]
#[serde(rename_all = "camelCase")]
#[salvo(schema(example = json!(
    {
        "name": "general",
        "description": "Anything goes",
        "isPrivate": false,
        "maxMembers": 100
    }
)))]
pub struct CreateRoomDto {
    #[validate(length(max = 128))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub is_private: Option<bool>,
    pub created_by: Option<i32>,
    pub max_members: Option<i32>,
}
