//! SQLite implementation of the vote ledger.

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;
use voteable_shared::types::{EntityRef, Vote, VoteValue};

use super::{SqliteVoteRepository, counter, vote_from_row};
use crate::errors::VoteRepositoryError;
use crate::interfaces::VoteLedger;

const SELECT_VOTE: &str =
    "SELECT id, voter_type, voter_id, voteable_type, voteable_id, value, created_at FROM votes";

impl SqliteVoteRepository {
    /// Fetches a single vote row by id.
    pub(crate) async fn fetch_vote(
        &self,
        vote_id: i64,
    ) -> Result<Option<Vote>, VoteRepositoryError> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_VOTE))
            .bind(vote_id)
            .fetch_optional(self.pool())
            .await?;
        row.as_ref().map(vote_from_row).transpose()
    }
}

#[async_trait]
impl VoteLedger for SqliteVoteRepository {
    async fn create_vote(
        &self,
        voter: &EntityRef,
        voteable: &EntityRef,
        value: i64,
    ) -> Result<Vote, VoteRepositoryError> {
        let vote_value = VoteValue::try_from(value)?;
        let config = self.voteable_config(&voteable.entity_type)?;

        // References are resolved before the transaction opens so the
        // transaction itself contains only writes; the reference is weak
        // after creation anyway.
        self.resolve_reference(&config.table, &config.primary_key, voteable)
            .await?;
        if let Some(voter_config) = self.registry().voter(&voter.entity_type) {
            self.resolve_reference(&voter_config.table, &voter_config.primary_key, voter)
                .await?;
        }

        let created_at = Utc::now();
        let mut tx = self.pool().begin().await?;
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO votes (voter_type, voter_id, voteable_type, voteable_id, value, created_at) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(&voter.entity_type)
        .bind(voter.entity_id)
        .bind(&voteable.entity_type)
        .bind(voteable.entity_id)
        .bind(vote_value.value())
        .bind(created_at)
        .fetch_one(&mut *tx)
        .await?;

        counter::on_vote_created(&mut tx, config, voteable.entity_id, vote_value.value()).await?;
        tx.commit().await?;

        debug!(vote_id = id, voter = %voter, voteable = %voteable, value = vote_value.value(), "vote recorded");
        Ok(Vote {
            id,
            voter_type: voter.entity_type.clone(),
            voter_id: voter.entity_id,
            voteable_type: Some(voteable.entity_type.clone()),
            voteable_id: Some(voteable.entity_id),
            value: vote_value.value(),
            created_at,
        })
    }

    async fn delete_vote(&self, vote_id: i64) -> Result<Vote, VoteRepositoryError> {
        let vote = self
            .fetch_vote(vote_id)
            .await?
            .ok_or(VoteRepositoryError::NotFound(vote_id))?;

        let mut tx = self.pool().begin().await?;
        // The decrement runs before the row is removed; both are one
        // transaction, so a failed decrement leaves the ledger untouched.
        if let Some(voteable) = vote.voteable() {
            if let Some(config) = self.registry().voteable(&voteable.entity_type) {
                counter::on_vote_destroyed(&mut tx, config, voteable.entity_id, vote.value).await?;
            }
        }
        let result = sqlx::query("DELETE FROM votes WHERE id = ?")
            .bind(vote_id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            // Lost a race with another delete; roll the decrement back.
            return Err(VoteRepositoryError::NotFound(vote_id));
        }
        tx.commit().await?;

        debug!(vote_id, "vote deleted");
        Ok(vote)
    }

    async fn find_vote(
        &self,
        voter: &EntityRef,
        voteable: &EntityRef,
        value: Option<i64>,
    ) -> Result<Option<Vote>, VoteRepositoryError> {
        let mut query = sqlx::QueryBuilder::<sqlx::Sqlite>::new(SELECT_VOTE);
        query
            .push(" WHERE voter_type = ")
            .push_bind(&voter.entity_type)
            .push(" AND voter_id = ")
            .push_bind(voter.entity_id)
            .push(" AND voteable_type = ")
            .push_bind(&voteable.entity_type)
            .push(" AND voteable_id = ")
            .push_bind(voteable.entity_id);
        if let Some(value) = value {
            query.push(" AND value = ").push_bind(value);
        }
        query.push(" ORDER BY id LIMIT 1");

        let row = query.build().fetch_optional(self.pool()).await?;
        row.as_ref().map(vote_from_row).transpose()
    }

    async fn nullify_voteable(&self, voteable: &EntityRef) -> Result<u64, VoteRepositoryError> {
        let result = sqlx::query(
            "UPDATE votes SET voteable_type = NULL, voteable_id = NULL \
             WHERE voteable_type = ? AND voteable_id = ?",
        )
        .bind(&voteable.entity_type)
        .bind(voteable.entity_id)
        .execute(self.pool())
        .await?;

        debug!(voteable = %voteable, detached = result.rows_affected(), "votes detached from deleted voteable");
        Ok(result.rows_affected())
    }
}
