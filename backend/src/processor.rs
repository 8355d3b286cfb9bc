use std::sync::Arc;
use futures::future::try_join_all;
use tracing::{debug, instrument};
use shared::models::*;
use crate::documents::{read_document, voter_key, write_document, DocumentStore, StoreResult, VOTER_KEY_PREFIX};
use crate::error::StoreError;

/// Voter records kept as one JSON document per voter.
///
/// Every multi-step operation (check-then-write on create, read-then-write on
/// update and add_vote, enumerate-then-delete on delete_all) runs without any
/// lock, so concurrent callers on the same voter can interleave.
#[derive(Clone)]
pub struct VoterProcessor {
    store: Arc<dyn DocumentStore>,
}

impl VoterProcessor {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    async fn load(&self, id: VoterId) -> StoreResult<Voter> {
        read_document(self.store(), &voter_key(id))
            .await?
            .ok_or(StoreError::NotFound(id))
    }

    #[instrument(skip(self, voter), fields(voter_id = voter.voter_id))]
    pub async fn create(&self, voter: Voter) -> StoreResult<Voter> {
        let key = voter_key(voter.voter_id);
        if self.store.get(&key).await?.is_some() {
            return Err(StoreError::AlreadyExists(voter.voter_id));
        }

        write_document(self.store(), &key, &voter).await?;
        debug!("Created voter");
        Ok(voter)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: VoterId) -> StoreResult<Voter> {
        self.load(id).await
    }

    /// Replaces the whole document, vote history included.
    #[instrument(skip(self, voter), fields(voter_id = voter.voter_id))]
    pub async fn update(&self, voter: Voter) -> StoreResult<Voter> {
        let key = voter_key(voter.voter_id);
        if self.store.get(&key).await?.is_none() {
            return Err(StoreError::NotFound(voter.voter_id));
        }

        write_document(self.store(), &key, &voter).await?;
        debug!("Updated voter");
        Ok(voter)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: VoterId) -> StoreResult<()> {
        match self.store.delete(&[voter_key(id)]).await? {
            0 => Err(StoreError::NotFound(id)),
            _ => Ok(()),
        }
    }

    #[instrument(skip(self))]
    pub async fn delete_all(&self) -> StoreResult<u64> {
        let keys = self.store.keys(VOTER_KEY_PREFIX).await?;
        if keys.is_empty() {
            return Ok(0);
        }

        let deleted = self.store.delete(&keys).await?;
        if deleted != keys.len() as u64 {
            return Err(StoreError::PartialFailure { expected: keys.len(), deleted });
        }

        debug!("Deleted {} voters", deleted);
        Ok(deleted)
    }

    #[instrument(skip(self))]
    pub async fn list_all(&self) -> StoreResult<Vec<Voter>> {
        let keys = self.store.keys(VOTER_KEY_PREFIX).await?;
        let store = self.store();

        // A key that disappears after enumeration fails the listing.
        let mut voters = try_join_all(keys.iter().map(|key| async move {
            read_document::<Voter>(store, key)
                .await
                .and_then(|voter| voter.ok_or_else(|| StoreError::Vanished(key.clone())))
        }))
        .await?;

        voters.sort_by_key(|voter| voter.voter_id);
        Ok(voters)
    }

    #[instrument(skip(self))]
    pub async fn history(&self, id: VoterId) -> StoreResult<Vec<VoteRecord>> {
        Ok(self.load(id).await?.vote_history)
    }

    #[instrument(skip(self))]
    pub async fn vote(&self, id: VoterId, poll_id: PollId) -> StoreResult<VoteRecord> {
        let voter = self.load(id).await?;
        voter
            .find_vote(poll_id)
            .cloned()
            .ok_or(StoreError::VoteNotFound { voter_id: id, poll_id })
    }

    #[instrument(skip(self, vote), fields(poll_id = vote.poll_id))]
    pub async fn add_vote(&self, id: VoterId, vote: VoteRecord) -> StoreResult<Voter> {
        let mut voter = self.load(id).await?;
        voter.record_vote(vote);

        write_document(self.store(), &voter_key(id), &voter).await?;
        debug!("Recorded vote {} of voter {}", voter.total_votes(), id);
        Ok(voter)
    }
}
