use std::result;

use serenity::prelude::SerenityError;
use thiserror::Error as ThisError;

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug, Clone, Eq, PartialEq, ThisError)]
pub enum Error {
    #[error("{0}")]
    SerenityError(String),
    // Bad input from the host form or a command argument.
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Permission(String),
    #[error("{0}")]
    NoValidParticipants(String),
    // The requested action is not allowed in the current session state.
    #[error("{0}")]
    Giveaway(String),
    #[error("{0}")]
    Delivery(String),
    #[error("{0}")]
    Database(String),
    #[error("{0}")]
    Serialization(String),
    #[error("{0}")]
    Config(String),
}

impl Error {
    // Errors that are caused by the user and should be shown back to them as is.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::Validation(_)
                | Error::NotFound(_)
                | Error::Permission(_)
                | Error::NoValidParticipants(_)
                | Error::Giveaway(_)
        )
    }
}

impl From<SerenityError> for Error {
    fn from(err: SerenityError) -> Error {
        if let SerenityError::Http(http_err) = &err {
            if http_err.status_code().map(|code| code.as_u16()) == Some(404) {
                return Error::NotFound(http_err.to_string());
            }
        }

        let description = err.to_string();
        Error::SerenityError(description)
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Error {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("The requested row was not found.".to_string()),
            other => Error::Database(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::Serialization(err.to_string())
    }
}
