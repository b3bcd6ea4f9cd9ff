//! This module defines the `VoteAggregates` trait, the per-voteable read
//! side of the engine: convenience aggregates computed from the ledger.
use voteable_shared::types::{EntityRef, VoteDirection};

use crate::errors::VoteRepositoryError;

/// A trait that defines the per-voteable aggregate queries.
///
/// Every method reads the ledger directly and ignores any denormalized
/// counter, so results are ground truth even if a counter has drifted. All
/// methods are read-only single statements.
#[async_trait::async_trait]
pub trait VoteAggregates: Send + Sync {
    /// Number of `+1` votes recorded against this voteable.
    async fn votes_for(&self, voteable: &EntityRef) -> Result<i64, VoteRepositoryError>;

    /// Number of `-1` votes recorded against this voteable.
    async fn votes_against(&self, voteable: &EntityRef) -> Result<i64, VoteRepositoryError>;

    /// Total number of votes recorded against this voteable, regardless of
    /// sign.
    async fn votes_count(&self, voteable: &EntityRef) -> Result<i64, VoteRepositoryError>;

    /// Sum of vote values for this voteable; zero when it has no votes.
    async fn votes_total(&self, voteable: &EntityRef) -> Result<i64, VoteRepositoryError>;

    /// References to the voters who voted on this voteable, one per ledger
    /// row in creation order. Duplicates are preserved when a voter voted
    /// more than once.
    async fn voters_who_voted(
        &self,
        voteable: &EntityRef,
    ) -> Result<Vec<EntityRef>, VoteRepositoryError>;

    /// Whether `voter` has a vote recorded against this voteable in the
    /// given direction.
    async fn voted_by(
        &self,
        voteable: &EntityRef,
        voter: &EntityRef,
        direction: VoteDirection,
    ) -> Result<bool, VoteRepositoryError>;

    /// Re-reads the voteable's denormalized counter column from storage.
    ///
    /// This reads the column only and never recomputes it from the ledger;
    /// callers needing ground truth should use `votes_total`.
    ///
    /// # Returns
    ///
    /// * `Ok(i64)` - The stored counter value.
    /// * `Err(VoteRepositoryError)` - `InvalidOption` when the type has no
    ///   counter column configured, `DanglingReference` when the row is gone.
    async fn reload_counter(&self, voteable: &EntityRef) -> Result<i64, VoteRepositoryError>;
}
