use thiserror::Error;

use super::general::GeneralError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserError {
    #[error("User with username {0} not found")]
    UserNameNotFound(String),

    #[error("An unexpected error occurred in user: {0}")]
    UnexpectedError(String),

    #[error("General error: {0}")]
    General(#[from] GeneralError),
}
