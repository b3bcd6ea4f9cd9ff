//! SQLite implementation of the voteable repository.
//!
//! Provides a production-ready sqlx backend for the `VoteLedger` and
//! `VoteAggregates` traits plus the generic tally builder.
//!
//! ## Key Features
//!
//! - Connection pooling with `sqlx::SqlitePool`
//! - Vote mutation and counter maintenance in a single transaction
//! - Dynamic query assembly with `sqlx::QueryBuilder`
//! - Generic tally rows via `sqlx::FromRow`
//!
//! ## Database Tables
//!
//! - `votes`: the ledger, owned by this crate (see `sqlite/migrations`)
//! - Voteable/voter tables are host-owned; the repository only reads them to
//!   resolve references and writes nothing but a configured counter column.
mod aggregates;
mod counter;
mod ledger;
mod tally;

use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use voteable_shared::types::{EntityRef, Vote};

use crate::errors::VoteRepositoryError;
use crate::registry::{VoteableConfig, VoteableRegistry};

/// SQLite implementation of the voteable repository.
///
/// Holds the connection pool and the process-wide registry. The registry is
/// injected at construction and read-only afterward; all reference
/// resolution and counter maintenance is driven by it.
pub struct SqliteVoteRepository {
    pool: sqlx::SqlitePool,
    registry: VoteableRegistry,
}

impl SqliteVoteRepository {
    /// Creates a new repository over an existing pool.
    ///
    /// # Arguments
    ///
    /// * `pool` - Configured SQLite pool with the votes schema applied.
    /// * `registry` - Voteable/voter configuration built at startup.
    pub fn new(pool: sqlx::SqlitePool, registry: VoteableRegistry) -> Self {
        Self { pool, registry }
    }

    /// The registry this repository was constructed with.
    pub fn registry(&self) -> &VoteableRegistry {
        &self.registry
    }

    pub(crate) fn pool(&self) -> &sqlx::SqlitePool {
        &self.pool
    }

    /// Resolves a voteable type to its configuration, or fails with
    /// `InvalidOption` for types never registered.
    pub(crate) fn voteable_config(
        &self,
        entity_type: &str,
    ) -> Result<&VoteableConfig, VoteRepositoryError> {
        self.registry.voteable(entity_type).ok_or_else(|| {
            VoteRepositoryError::InvalidOption(format!(
                "entity type is not registered as voteable: {}",
                entity_type
            ))
        })
    }

    /// Checks that a referenced row exists in its host table.
    ///
    /// Table and primary-key names come from validated registry
    /// configuration, never from callers.
    pub(crate) async fn resolve_reference(
        &self,
        table: &str,
        primary_key: &str,
        entity: &EntityRef,
    ) -> Result<(), VoteRepositoryError> {
        let mut query = sqlx::QueryBuilder::<sqlx::Sqlite>::new("SELECT EXISTS(SELECT 1 FROM ");
        query
            .push(table)
            .push(" WHERE ")
            .push(primary_key)
            .push(" = ")
            .push_bind(entity.entity_id)
            .push(")");

        let exists: i64 = query.build_query_scalar().fetch_one(&self.pool).await?;
        if exists == 0 {
            return Err(VoteRepositoryError::DanglingReference {
                entity_type: entity.entity_type.clone(),
                entity_id: entity.entity_id,
            });
        }
        Ok(())
    }
}

/// Maps a ledger row to the shared `Vote` type.
pub(crate) fn vote_from_row(row: &SqliteRow) -> Result<Vote, VoteRepositoryError> {
    Ok(Vote {
        id: row.try_get("id")?,
        voter_type: row.try_get("voter_type")?,
        voter_id: row.try_get("voter_id")?,
        voteable_type: row.try_get("voteable_type")?,
        voteable_id: row.try_get("voteable_id")?,
        value: row.try_get("value")?,
        created_at: row.try_get("created_at")?,
    })
}
