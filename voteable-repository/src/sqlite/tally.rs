//! The tally builder: ranked, filtered vote aggregates across one entity
//! type.
//!
//! The query left-outer-joins the entity table to the ledger filtered by
//! voteable type, time range, and the caller's opaque vote condition, groups
//! by entity identity, and keeps only groups with at least one matching vote
//! (a tally implies having been voted on). The caller's entity-side scope is
//! merged into the WHERE clause, never discarded.

use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use tracing::debug;
use voteable_shared::types::{Tally, TallyOptions, TallyOrder};

use super::SqliteVoteRepository;
use crate::errors::VoteRepositoryError;
use crate::utils::validate_identifier;

impl SqliteVoteRepository {
    /// Computes the tally for one voteable entity type.
    ///
    /// `T` is the caller's row type for the entity table; the matching vote
    /// count rides alongside it in `Tally<T>`. Options are validated before
    /// any query is issued.
    ///
    /// # Arguments
    ///
    /// * `entity_type` - A registered voteable type.
    /// * `options` - Filters, bounds, ordering, and limit.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Tally<T>>)` - Ranked entities with their vote counts;
    ///   entities with zero matching votes never appear.
    /// * `Err(VoteRepositoryError)` - `InvalidOption` for rejected options or
    ///   an unregistered type, or a database error.
    pub async fn tally<T>(
        &self,
        entity_type: &str,
        options: &TallyOptions,
    ) -> Result<Vec<Tally<T>>, VoteRepositoryError>
    where
        T: for<'r> sqlx::FromRow<'r, SqliteRow> + Send + Unpin,
    {
        validate_options(options)?;
        let config = self.voteable_config(entity_type)?;
        let table = config.table.as_str();
        let primary_key = config.primary_key.as_str();

        let mut query = sqlx::QueryBuilder::<sqlx::Sqlite>::new("SELECT ");
        query
            .push(table)
            .push(".*, COUNT(votes.id) AS tally_count FROM ")
            .push(table)
            .push(" LEFT OUTER JOIN votes ON votes.voteable_id = ")
            .push(table)
            .push(".")
            .push(primary_key)
            .push(" AND votes.voteable_type = ")
            .push_bind(entity_type);
        if let Some(start_at) = options.start_at {
            query.push(" AND votes.created_at >= ").push_bind(start_at);
        }
        if let Some(end_at) = options.end_at {
            query.push(" AND votes.created_at <= ").push_bind(end_at);
        }
        if let Some(condition) = options.condition.as_deref() {
            // Vote-side filters live on the join so zero-vote entities still
            // reach the grouping stage.
            query.push(" AND (").push(condition).push(")");
        }
        if let Some(scope) = options.scope.as_deref() {
            query.push(" WHERE (").push(scope).push(")");
        }
        query
            .push(" GROUP BY ")
            .push(table)
            .push(".")
            .push(primary_key)
            .push(" HAVING COUNT(votes.id) > 0");
        if let Some(at_least) = options.at_least {
            query.push(" AND COUNT(votes.id) >= ").push_bind(at_least);
        }
        if let Some(at_most) = options.at_most {
            query.push(" AND COUNT(votes.id) <= ").push_bind(at_most);
        }
        query.push(" ORDER BY ");
        match &options.order {
            TallyOrder::CountDesc => {
                query.push("tally_count DESC");
            }
            TallyOrder::CountAsc => {
                query.push("tally_count ASC");
            }
            TallyOrder::Column { name, descending } => {
                query
                    .push(table)
                    .push(".")
                    .push(name.as_str())
                    .push(if *descending { " DESC" } else { " ASC" });
            }
        }
        if let Some(limit) = options.limit {
            query.push(" LIMIT ").push_bind(limit);
        }

        let rows = query.build().fetch_all(self.pool()).await?;
        let mut tallies = Vec::with_capacity(rows.len());
        for row in &rows {
            tallies.push(Tally {
                entity: T::from_row(row)?,
                count: row.try_get("tally_count")?,
            });
        }

        debug!(entity_type, rows = tallies.len(), "tally computed");
        Ok(tallies)
    }
}

/// Rejects option values that cannot form a meaningful query, before any SQL
/// is built.
fn validate_options(options: &TallyOptions) -> Result<(), VoteRepositoryError> {
    if let Some(at_least) = options.at_least {
        if at_least < 0 {
            return Err(VoteRepositoryError::InvalidOption(
                "at_least must be non-negative".to_string(),
            ));
        }
    }
    if let Some(at_most) = options.at_most {
        if at_most < 0 {
            return Err(VoteRepositoryError::InvalidOption(
                "at_most must be non-negative".to_string(),
            ));
        }
    }
    if let Some(limit) = options.limit {
        if limit < 0 {
            return Err(VoteRepositoryError::InvalidOption(
                "limit must be non-negative".to_string(),
            ));
        }
    }
    if let Some(condition) = options.condition.as_deref() {
        if condition.trim().is_empty() {
            return Err(VoteRepositoryError::InvalidOption(
                "condition must not be empty".to_string(),
            ));
        }
    }
    if let Some(scope) = options.scope.as_deref() {
        if scope.trim().is_empty() {
            return Err(VoteRepositoryError::InvalidOption(
                "scope must not be empty".to_string(),
            ));
        }
    }
    if let TallyOrder::Column { name, .. } = &options.order {
        validate_identifier("order column", name)?;
    }
    Ok(())
}
