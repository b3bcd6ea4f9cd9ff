//! # Voteable Shared
//! This crate defines the shared data structures for the voting engine.
//! It includes common definitions for entity references, vote values, vote
//! records, and tally options/results.
pub mod types;
