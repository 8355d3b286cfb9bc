use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::Json;
use shared::{ErrorCode, ErrorResponse, PollId, VoterId};
use thiserror::Error;
use tracing::{debug, error};

/// Failures of the voter record store and the document store beneath it.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Voter {0} already exists")]
    AlreadyExists(VoterId),
    #[error("Voter {0} not found")]
    NotFound(VoterId),
    #[error("Voter {voter_id} has no vote for poll {poll_id}")]
    VoteNotFound { voter_id: VoterId, poll_id: PollId },
    #[error("Document at {0} disappeared while listing")]
    Vanished(String),
    #[error("Deleted {deleted} of {expected} voters")]
    PartialFailure { expected: usize, deleted: u64 },
    #[error("Document store unavailable: {0}")]
    Unavailable(String),
    #[error("Malformed document at {key}: {source}")]
    Deserialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to encode document: {0}")]
    Encode(#[source] serde_json::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid voter ID")]
    InvalidId,
    #[error("Invalid poll ID")]
    InvalidPollId,
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::InvalidId | ApiError::InvalidPollId | ApiError::BadRequest(_) => Status::BadRequest,
            ApiError::Store(StoreError::NotFound(_))
            | ApiError::Store(StoreError::VoteNotFound { .. }) => Status::NotFound,
            ApiError::Store(StoreError::AlreadyExists(_)) => Status::Conflict,
            ApiError::Store(_) => Status::InternalServerError,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ApiError::InvalidId | ApiError::InvalidPollId | ApiError::BadRequest(_) => ErrorCode::InvalidInput,
            ApiError::Store(StoreError::NotFound(_))
            | ApiError::Store(StoreError::VoteNotFound { .. }) => ErrorCode::NotFound,
            ApiError::Store(StoreError::AlreadyExists(_)) => ErrorCode::Conflict,
            ApiError::Store(StoreError::Unavailable(_)) => ErrorCode::Unavailable,
            ApiError::Store(_) => ErrorCode::SystemError,
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for ApiError {
    fn respond_to(self, req: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        let status = self.status();
        let message = if status.code >= 500 {
            error!("Request failed: {}", self);
            "Internal error".to_string()
        } else {
            debug!("Request rejected: {}", self);
            self.to_string()
        };

        (status, Json(ErrorResponse::new(self.code(), message))).respond_to(req)
    }
}
