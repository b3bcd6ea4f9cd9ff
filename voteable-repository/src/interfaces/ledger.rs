//! This module defines the `VoteLedger` trait, which provides an interface
//! for mutating the vote ledger: recording votes, deleting them, looking
//! them up, and detaching them when their subject is deleted.
use voteable_shared::types::{EntityRef, Vote};

use crate::errors::VoteRepositoryError;

/// A trait that defines the interface for mutating the vote ledger.
///
/// Implementors persist vote rows and keep any configured denormalized
/// counters consistent with the ledger, applying both as one atomic unit.
#[async_trait::async_trait]
pub trait VoteLedger: Send + Sync {
    /// Records a vote by `voter` against `voteable`.
    ///
    /// The voteable's type must be registered, and the voteable row must
    /// exist; the voter row must exist too when its type has been registered
    /// for resolution. The insert and the counter increment (if the type
    /// keeps one) happen in the same transaction.
    ///
    /// # Arguments
    ///
    /// * `voter` - The entity casting the vote.
    /// * `voteable` - The entity being voted on.
    /// * `value` - The raw vote value; only `+1` and `-1` are accepted.
    ///
    /// # Returns
    ///
    /// * `Ok(Vote)` - The stored ledger entry.
    /// * `Err(VoteRepositoryError)` - `InvalidValue`, `DanglingReference`,
    ///   `InvalidOption` (unregistered voteable type), or a database error.
    async fn create_vote(
        &self,
        voter: &EntityRef,
        voteable: &EntityRef,
        value: i64,
    ) -> Result<Vote, VoteRepositoryError>;

    /// Deletes the vote with the given id.
    ///
    /// The counter decrement (if the voted type keeps one) and the row
    /// removal happen in the same transaction.
    ///
    /// # Arguments
    ///
    /// * `vote_id` - Identifier of the vote to delete.
    ///
    /// # Returns
    ///
    /// * `Ok(Vote)` - The ledger entry as it was before removal.
    /// * `Err(VoteRepositoryError)` - `NotFound` if no such vote exists.
    async fn delete_vote(&self, vote_id: i64) -> Result<Vote, VoteRepositoryError>;

    /// Looks up a vote by its `(voter, voteable)` pair.
    ///
    /// # Arguments
    ///
    /// * `voter` - The voter side of the pair.
    /// * `voteable` - The voteable side of the pair.
    /// * `value` - Optional restriction to a single vote value.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Vote))` - The oldest matching vote.
    /// * `Ok(None)` - No vote matches.
    async fn find_vote(
        &self,
        voter: &EntityRef,
        voteable: &EntityRef,
        value: Option<i64>,
    ) -> Result<Option<Vote>, VoteRepositoryError>;

    /// Detaches all votes from a voteable that the host is about to delete.
    ///
    /// The votes' voteable reference is set to NULL rather than cascading
    /// the delete, so historical vote rows outlive their subject. Hosts call
    /// this when removing a voteable row.
    ///
    /// # Returns
    ///
    /// * `Ok(u64)` - The number of votes that were detached.
    async fn nullify_voteable(&self, voteable: &EntityRef) -> Result<u64, VoteRepositoryError>;
}
