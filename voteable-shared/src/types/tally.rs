use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of tally output: a voteable entity joined with the number of
/// ledger rows that matched the tally filters. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Tally<T> {
    pub entity: T,
    pub count: i64,
}

/// Result ordering for a tally.
///
/// The default ranks entities by descending vote count.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum TallyOrder {
    /// Highest vote count first.
    #[default]
    CountDesc,
    /// Lowest vote count first.
    CountAsc,
    /// Order by a column of the entity table. The name must be a plain
    /// identifier; it is validated before any query is issued.
    Column { name: String, descending: bool },
}

/// Filter options for a tally query.
///
/// This is a closed option set: every supported filter is a field here, and
/// field values are validated before the query is built. Defaults apply no
/// filtering beyond the ever-present "at least one matching vote" rule.
///
/// - `start_at` / `end_at` restrict votes to a `created_at` range (inclusive).
/// - `condition` is an opaque SQL predicate over the `votes` table, ANDed
///   into the vote-side filter.
/// - `scope` is an opaque SQL predicate over the entity table, ANDed into the
///   WHERE clause; a pre-existing caller filter is merged here, never
///   discarded.
/// - `at_least` / `at_most` bound the per-entity vote count after grouping.
/// - `limit` caps the number of returned rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TallyOptions {
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub condition: Option<String>,
    pub scope: Option<String>,
    pub at_least: Option<i64>,
    pub at_most: Option<i64>,
    pub order: TallyOrder,
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order_is_count_desc() {
        let options = TallyOptions::default();
        assert_eq!(options.order, TallyOrder::CountDesc);
        assert_eq!(options.limit, None);
        assert_eq!(options.at_least, None);
    }
}
