//! Error types for the voteable repository.
//! Consolidates and re-exports error types related to vote storage operations.
mod repository;

pub use repository::VoteRepositoryError;
