use salvo::http::StatusCode;
use salvo::oapi::{self, EndpointOutRegister, ToSchema};
use salvo::prelude::*;
use serde::Serialize;
use thiserror::Error;

use super::general::GeneralError;

use super::{BadRequestError, InternalError, NotFoundError};

#[derive(Debug, Error, ToSchema, Serialize, Clone, PartialEq)]
pub enum RoomError {
    #[error("Room with ID {0} not found")]
    RoomNotFound(i32),

    #[error("Room name must not be empty")]
    EmptyName,

    #[error("An unexpected error occurred in room: {0}")]
    UnexpectedError(String),

    #[error("General error: {0}")]
    General(#[from] GeneralError),
}

#[async_trait]
impl Writer for RoomError {
    async fn write(self, _req: &mut Request, _depot: &mut Depot, res: &mut Response) {
        let status = match self {
            RoomError::RoomNotFound(_) => StatusCode::NOT_FOUND,
            RoomError::EmptyName => StatusCode::BAD_REQUEST,
            RoomError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RoomError::General(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        res.status_code(status);
        res.render(Json(serde_json::json!({ "message": self.to_string() })));
    }
}

impl EndpointOutRegister for RoomError {
    fn register(components: &mut oapi::Components, operation: &mut oapi::Operation) {
        operation.responses.insert(
            StatusCode::NOT_FOUND.as_str(),
            oapi::Response::new("Room not found")
                .add_content("application/json", NotFoundError::to_schema(components)),
        );
        operation.responses.insert(
            StatusCode::BAD_REQUEST.as_str(),
            oapi::Response::new("Validation failed")
                .add_content("application/json", BadRequestError::to_schema(components)),
        );
        operation.responses.insert(
            StatusCode::INTERNAL_SERVER_ERROR.as_str(),
            oapi::Response::new("Unexpected or general error")
                .add_content("application/json", InternalError::to_schema(components)),
        );
    }
}
