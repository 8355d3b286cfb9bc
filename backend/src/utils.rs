use shared::{PollId, VoterId};
use crate::error::ApiError;

pub fn parse_voter_id(id: &str) -> Result<VoterId, ApiError> {
    id.parse::<VoterId>().map_err(|_| ApiError::InvalidId)
}

pub fn parse_poll_id(id: &str) -> Result<PollId, ApiError> {
    id.parse::<PollId>().map_err(|_| ApiError::InvalidPollId)
}
