use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::EntityRef;

/// A single ledger entry: one vote cast by a voter against a voteable.
///
/// The voteable reference is optional because deleting the voteable row
/// nullifies it rather than cascading; historical votes outlive their
/// subject.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vote {
    pub id: i64,
    pub voter_type: String,
    pub voter_id: i64,
    pub voteable_type: Option<String>,
    pub voteable_id: Option<i64>,
    pub value: i64,
    pub created_at: DateTime<Utc>,
}

impl Vote {
    /// The polymorphic reference to the voter who cast this vote.
    pub fn voter(&self) -> EntityRef {
        EntityRef::new(self.voter_type.clone(), self.voter_id)
    }

    /// The polymorphic reference to the voted entity, if it has not been
    /// nullified by the host deleting that entity.
    pub fn voteable(&self) -> Option<EntityRef> {
        match (&self.voteable_type, self.voteable_id) {
            (Some(entity_type), Some(entity_id)) => {
                Some(EntityRef::new(entity_type.clone(), entity_id))
            }
            _ => None,
        }
    }
}

/// Restricts a `voted_by` existence check to one side of the ledger.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum VoteDirection {
    /// Only `+1` votes.
    For,
    /// Only `-1` votes.
    Against,
    /// Any vote, regardless of sign.
    Any,
}
