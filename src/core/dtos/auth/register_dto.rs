use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use validator_derive::Validate;

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate, Clone)]
#[serde(rename_all = "camelCase")]
#[salvo(schema(example = json!({"username": "alice", "password": "s3cret-pass", "email": "alice@example.com"})))]
pub struct RegisterDto {
    #[validate(length(min = 1, max = 64))]
    pub username: String,

    #[validate(length(min = 6))]
    pub password: String,

    #[validate(email)]
    pub email: Option<String>,

    pub avatar_url: Option<String>,
}
