//! Error types for vote storage operations.
//! Defines the failure taxonomy shared by the ledger, the aggregate queries,
//! and the tally builder.
use thiserror::Error;
use voteable_shared::types::InvalidVoteValue;

/// Represents errors that can occur within the voteable repository.
///
/// All failures surface to the caller; none are swallowed. A failure while
/// maintaining a denormalized counter aborts the enclosing vote transaction,
/// so the ledger and counter never diverge.
#[derive(Debug, Error)]
pub enum VoteRepositoryError {
    /// A vote value outside the `{+1, -1}` domain.
    #[error("invalid vote value: {0} (expected +1 or -1)")]
    InvalidValue(i64),

    /// A voter or voteable reference did not resolve to a stored row.
    #[error("dangling reference: {entity_type}/{entity_id} does not exist")]
    DanglingReference { entity_type: String, entity_id: i64 },

    /// The vote targeted by a delete or lookup does not exist.
    #[error("vote not found: {0}")]
    NotFound(i64),

    /// A tally option or registry configuration value was rejected. Raised
    /// before any query is issued.
    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<InvalidVoteValue> for VoteRepositoryError {
    fn from(err: InvalidVoteValue) -> Self {
        VoteRepositoryError::InvalidValue(err.0)
    }
}
