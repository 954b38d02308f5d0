use salvo::http::StatusCode;
use salvo::oapi::{self, EndpointOutRegister, ToSchema};
use salvo::prelude::*;
use serde::Serialize;
use thiserror::Error;

use super::general::GeneralError;

use super::{BadRequestError, InternalError, NotFoundError};

#[derive(Debug, Error, ToSchema, Serialize, Clone, PartialEq)]
pub enum ChatError {
    #[error("Not logged in or session expired")]
    Unauthorized,

    #[error("Room with ID {0} not found")]
    RoomNotFound(i32),

    #[error("User {0} not found")]
    UserNotFound(String),

    #[error("An unexpected error occurred in chat: {0}")]
    UnexpectedError(String),

    #[error("General error: {0}")]
    General(#[from] GeneralError),
}

#[async_trait]
impl Writer for ChatError {
    async fn write(self, _req: &mut Request, _depot: &mut Depot, res: &mut Response) {
        let status = match self {
            ChatError::Unauthorized => StatusCode::UNAUTHORIZED,
            ChatError::RoomNotFound(_) | ChatError::UserNotFound(_) => StatusCode::NOT_FOUND,
            ChatError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ChatError::General(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        res.status_code(status);
        res.render(Json(serde_json::json!({ "message": self.to_string() })));
    }
}

impl EndpointOutRegister for ChatError {
    fn register(components: &mut oapi::Components, operation: &mut oapi::Operation) {
        operation.responses.insert(
            StatusCode::UNAUTHORIZED.as_str(),
            oapi::Response::new("No resolvable session identity")
                .add_content("application/json", BadRequestError::to_schema(components)),
        );
        operation.responses.insert(
            StatusCode::NOT_FOUND.as_str(),
            oapi::Response::new("Room or user not found")
                .add_content("application/json", NotFoundError::to_schema(components)),
        );
        operation.responses.insert(
            StatusCode::INTERNAL_SERVER_ERROR.as_str(),
            oapi::Response::new("Unexpected or general error")
                .add_content("application/json", InternalError::to_schema(components)),
        );
    }
}
