//! This module defines and re-exports the interfaces for the voteable
//! repository. It serves as a central point for accessing traits related to
//! vote storage and aggregation.
mod aggregates;
mod ledger;

pub use aggregates::VoteAggregates;
pub use ledger::VoteLedger;
