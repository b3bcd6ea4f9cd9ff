//! # Voteable Repository
//! This crate provides traits and implementations for the polymorphic voting
//! engine: the vote ledger, per-voteable aggregate queries, denormalized
//! counter maintenance, and the tally builder. It includes definitions for
//! errors, interfaces, the process-wide voteable registry, and a concrete
//! SQLite implementation.
pub mod errors;
pub mod interfaces;
pub mod registry;
pub mod sqlite;
pub mod utils;

pub use errors::VoteRepositoryError;
pub use interfaces::{VoteAggregates, VoteLedger};
pub use registry::{VoteableConfig, VoteableRegistry, VoterConfig};
pub use sqlite::SqliteVoteRepository;
