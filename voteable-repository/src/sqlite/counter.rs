//! Denormalized counter maintenance.
//!
//! Keeps a voteable's configured counter column equal to the sum of its
//! votes' values. Every delta is a single `SET col = col + ?` statement so
//! concurrent vote mutations never lose updates, and it runs inside the
//! caller's transaction so the ledger and the counter move together or not
//! at all.

use sqlx::{Sqlite, Transaction};

use crate::errors::VoteRepositoryError;
use crate::registry::VoteableConfig;

/// Applies the counter increment for a newly created vote.
pub(crate) async fn on_vote_created(
    tx: &mut Transaction<'_, Sqlite>,
    config: &VoteableConfig,
    voteable_id: i64,
    value: i64,
) -> Result<(), VoteRepositoryError> {
    apply_delta(tx, config, voteable_id, value).await
}

/// Applies the counter decrement for a vote about to be destroyed.
pub(crate) async fn on_vote_destroyed(
    tx: &mut Transaction<'_, Sqlite>,
    config: &VoteableConfig,
    voteable_id: i64,
    value: i64,
) -> Result<(), VoteRepositoryError> {
    apply_delta(tx, config, voteable_id, -value).await
}

async fn apply_delta(
    tx: &mut Transaction<'_, Sqlite>,
    config: &VoteableConfig,
    voteable_id: i64,
    delta: i64,
) -> Result<(), VoteRepositoryError> {
    // Types without a counter column keep no denormalized state.
    let Some(column) = config.counter_column.as_deref() else {
        return Ok(());
    };

    let mut query = sqlx::QueryBuilder::<Sqlite>::new("UPDATE ");
    query
        .push(config.table.as_str())
        .push(" SET ")
        .push(column)
        .push(" = ")
        .push(column)
        .push(" + ")
        .push_bind(delta)
        .push(" WHERE ")
        .push(config.primary_key.as_str())
        .push(" = ")
        .push_bind(voteable_id);

    let result = query.build().execute(&mut **tx).await?;
    if result.rows_affected() == 0 {
        // The voteable row is gone; abort the whole vote mutation.
        return Err(VoteRepositoryError::DanglingReference {
            entity_type: config.entity_type.clone(),
            entity_id: voteable_id,
        });
    }
    Ok(())
}
