//! SQLite implementation of the per-voteable aggregate queries.
//!
//! Every aggregate is a single statement against the ledger; the
//! denormalized counter is only touched by `reload_counter`, which reads the
//! column as stored and deliberately never recomputes it.

use async_trait::async_trait;
use sqlx::Row;
use voteable_shared::types::{EntityRef, VoteDirection};

use super::SqliteVoteRepository;
use crate::errors::VoteRepositoryError;
use crate::interfaces::VoteAggregates;

impl SqliteVoteRepository {
    async fn count_votes(
        &self,
        voteable: &EntityRef,
        value: Option<i64>,
    ) -> Result<i64, VoteRepositoryError> {
        let mut query = sqlx::QueryBuilder::<sqlx::Sqlite>::new(
            "SELECT COUNT(*) FROM votes WHERE voteable_type = ",
        );
        query
            .push_bind(&voteable.entity_type)
            .push(" AND voteable_id = ")
            .push_bind(voteable.entity_id);
        if let Some(value) = value {
            query.push(" AND value = ").push_bind(value);
        }

        Ok(query.build_query_scalar().fetch_one(self.pool()).await?)
    }
}

#[async_trait]
impl VoteAggregates for SqliteVoteRepository {
    async fn votes_for(&self, voteable: &EntityRef) -> Result<i64, VoteRepositoryError> {
        self.count_votes(voteable, Some(1)).await
    }

    async fn votes_against(&self, voteable: &EntityRef) -> Result<i64, VoteRepositoryError> {
        self.count_votes(voteable, Some(-1)).await
    }

    async fn votes_count(&self, voteable: &EntityRef) -> Result<i64, VoteRepositoryError> {
        self.count_votes(voteable, None).await
    }

    async fn votes_total(&self, voteable: &EntityRef) -> Result<i64, VoteRepositoryError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(value), 0) FROM votes \
             WHERE voteable_type = ? AND voteable_id = ?",
        )
        .bind(&voteable.entity_type)
        .bind(voteable.entity_id)
        .fetch_one(self.pool())
        .await?;
        Ok(total)
    }

    async fn voters_who_voted(
        &self,
        voteable: &EntityRef,
    ) -> Result<Vec<EntityRef>, VoteRepositoryError> {
        let rows = sqlx::query(
            "SELECT voter_type, voter_id FROM votes \
             WHERE voteable_type = ? AND voteable_id = ? ORDER BY id",
        )
        .bind(&voteable.entity_type)
        .bind(voteable.entity_id)
        .fetch_all(self.pool())
        .await?;

        let mut voters = Vec::with_capacity(rows.len());
        for row in rows {
            voters.push(EntityRef::new(
                row.try_get::<String, _>("voter_type")?,
                row.try_get("voter_id")?,
            ));
        }
        Ok(voters)
    }

    async fn voted_by(
        &self,
        voteable: &EntityRef,
        voter: &EntityRef,
        direction: VoteDirection,
    ) -> Result<bool, VoteRepositoryError> {
        let mut query = sqlx::QueryBuilder::<sqlx::Sqlite>::new(
            "SELECT EXISTS(SELECT 1 FROM votes WHERE voteable_type = ",
        );
        query
            .push_bind(&voteable.entity_type)
            .push(" AND voteable_id = ")
            .push_bind(voteable.entity_id)
            .push(" AND voter_type = ")
            .push_bind(&voter.entity_type)
            .push(" AND voter_id = ")
            .push_bind(voter.entity_id);
        match direction {
            VoteDirection::For => {
                query.push(" AND value = 1");
            }
            VoteDirection::Against => {
                query.push(" AND value = -1");
            }
            VoteDirection::Any => {}
        }
        query.push(")");

        let exists: i64 = query.build_query_scalar().fetch_one(self.pool()).await?;
        Ok(exists != 0)
    }

    async fn reload_counter(&self, voteable: &EntityRef) -> Result<i64, VoteRepositoryError> {
        let config = self.voteable_config(&voteable.entity_type)?;
        let Some(column) = config.counter_column.as_deref() else {
            return Err(VoteRepositoryError::InvalidOption(format!(
                "no counter column configured for entity type: {}",
                voteable.entity_type
            )));
        };

        let mut query = sqlx::QueryBuilder::<sqlx::Sqlite>::new("SELECT ");
        query
            .push(column)
            .push(" FROM ")
            .push(config.table.as_str())
            .push(" WHERE ")
            .push(config.primary_key.as_str())
            .push(" = ")
            .push_bind(voteable.entity_id);

        let counter: Option<i64> = query.build_query_scalar().fetch_optional(self.pool()).await?;
        counter.ok_or_else(|| VoteRepositoryError::DanglingReference {
            entity_type: voteable.entity_type.clone(),
            entity_id: voteable.entity_id,
        })
    }
}
