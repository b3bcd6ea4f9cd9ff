use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when a raw vote value falls outside the `{+1, -1}` domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid vote value: {0} (expected +1 or -1)")]
pub struct InvalidVoteValue(pub i64);

/// Represents the direction of a single vote.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum VoteValue {
    /// Indicates an upvote, stored as `+1`.
    Up,
    /// Indicates a downvote, stored as `-1`.
    Down,
}

impl VoteValue {
    /// The signed unit value stored in the ledger.
    pub fn value(self) -> i64 {
        match self {
            VoteValue::Up => 1,
            VoteValue::Down => -1,
        }
    }
}

impl TryFrom<i64> for VoteValue {
    type Error = InvalidVoteValue;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(VoteValue::Up),
            -1 => Ok(VoteValue::Down),
            other => Err(InvalidVoteValue(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_value_round_trip() {
        assert_eq!(VoteValue::try_from(1), Ok(VoteValue::Up));
        assert_eq!(VoteValue::try_from(-1), Ok(VoteValue::Down));
        assert_eq!(VoteValue::Up.value(), 1);
        assert_eq!(VoteValue::Down.value(), -1);
    }

    #[test]
    fn test_vote_value_rejects_out_of_domain() {
        assert_eq!(VoteValue::try_from(2), Err(InvalidVoteValue(2)));
        assert_eq!(VoteValue::try_from(0), Err(InvalidVoteValue(0)));
    }
}
