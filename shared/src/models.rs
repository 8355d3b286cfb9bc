use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

pub type VoterId = u64;
pub type PollId = u64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Voter {
    pub voter_id: VoterId,
    pub name: String,
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub vote_history: Vec<VoteRecord>,
}

/// One entry of a voter's history. `vote_id` is the option chosen in the poll.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct VoteRecord {
    pub poll_id: PollId,
    pub vote_id: u64,
    #[serde(with = "time::serde::rfc3339")]
    pub vote_date: OffsetDateTime,
}

impl Voter {
    pub fn new(voter_id: VoterId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            voter_id,
            name: name.into(),
            email: email.into(),
            vote_history: Vec::new(),
        }
    }

    /// First recorded vote for `poll_id`, in stored order.
    pub fn find_vote(&self, poll_id: PollId) -> Option<&VoteRecord> {
        self.vote_history.iter().find(|vote| vote.poll_id == poll_id)
    }

    pub fn record_vote(&mut self, vote: VoteRecord) {
        self.vote_history.push(vote);
    }

    pub fn total_votes(&self) -> usize {
        self.vote_history.len()
    }
}

// Documents written by older clients carry `"VoteHistory": null`.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<VoteRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<VoteRecord>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
