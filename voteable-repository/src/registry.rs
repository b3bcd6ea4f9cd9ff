//! Process-wide voteable configuration.
//!
//! The registry maps entity type names to their storage layout: which table
//! holds rows of that type, its primary-key column, and the optional
//! denormalized counter column. It is built once at startup, injected into
//! the repository, and read-only afterward.

use std::collections::HashMap;
use tracing::info;

use crate::errors::VoteRepositoryError;
use crate::utils::validate_identifier;

/// Default counter column when a type enables counting without naming one.
const DEFAULT_COUNTER_COLUMN: &str = "vote_count";

/// Storage configuration for one voteable entity type.
///
/// When `counter_column` is set, that column on the entity's row is kept
/// equal to the live sum of its votes' values by the repository, and no
/// other write path may touch it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteableConfig {
    pub entity_type: String,
    pub table: String,
    pub primary_key: String,
    pub counter_column: Option<String>,
}

impl VoteableConfig {
    /// Creates a configuration for `entity_type` stored in `table`, with the
    /// default `id` primary key and no counter column.
    pub fn new(entity_type: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            table: table.into(),
            primary_key: "id".to_string(),
            counter_column: None,
        }
    }

    /// Overrides the primary-key column.
    pub fn with_primary_key(mut self, primary_key: impl Into<String>) -> Self {
        self.primary_key = primary_key.into();
        self
    }

    /// Enables the denormalized counter on the default `vote_count` column.
    pub fn with_counter(self) -> Self {
        self.with_counter_column(DEFAULT_COUNTER_COLUMN)
    }

    /// Enables the denormalized counter on a custom column.
    pub fn with_counter_column(mut self, counter_column: impl Into<String>) -> Self {
        self.counter_column = Some(counter_column.into());
        self
    }
}

/// Storage configuration for one voter entity type.
///
/// Registering a voter type enables the existence check at vote-creation
/// time; unregistered voter types are accepted as opaque `(type, id)` pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoterConfig {
    pub entity_type: String,
    pub table: String,
    pub primary_key: String,
}

impl VoterConfig {
    /// Creates a configuration for `entity_type` stored in `table`, with the
    /// default `id` primary key.
    pub fn new(entity_type: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            table: table.into(),
            primary_key: "id".to_string(),
        }
    }

    /// Overrides the primary-key column.
    pub fn with_primary_key(mut self, primary_key: impl Into<String>) -> Self {
        self.primary_key = primary_key.into();
        self
    }
}

/// Process-wide mapping of entity type names to storage configuration.
///
/// Registrations live for the process lifetime; there is no removal
/// operation. Re-registering a type overwrites the earlier configuration
/// (last write wins); the replacement is logged rather than treated as an
/// error.
#[derive(Debug, Default)]
pub struct VoteableRegistry {
    voteables: HashMap<String, VoteableConfig>,
    voters: HashMap<String, VoterConfig>,
}

impl VoteableRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a voteable entity type.
    ///
    /// Table, primary-key, and counter-column names are validated as plain
    /// identifiers because they are spliced into query text.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The type is registered.
    /// * `Err(VoteRepositoryError)` - `InvalidOption` when a name fails
    ///   identifier validation or the type name is empty.
    pub fn register(&mut self, config: VoteableConfig) -> Result<(), VoteRepositoryError> {
        if config.entity_type.is_empty() {
            return Err(VoteRepositoryError::InvalidOption(
                "entity type name must not be empty".to_string(),
            ));
        }
        validate_identifier("voteable table", &config.table)?;
        validate_identifier("voteable primary key", &config.primary_key)?;
        if let Some(counter_column) = &config.counter_column {
            validate_identifier("counter column", counter_column)?;
        }

        let entity_type = config.entity_type.clone();
        if self.voteables.insert(entity_type.clone(), config).is_some() {
            info!(entity_type = %entity_type, "voteable registration replaced");
        }
        Ok(())
    }

    /// Registers a voter entity type for existence checks.
    pub fn register_voter(&mut self, config: VoterConfig) -> Result<(), VoteRepositoryError> {
        if config.entity_type.is_empty() {
            return Err(VoteRepositoryError::InvalidOption(
                "entity type name must not be empty".to_string(),
            ));
        }
        validate_identifier("voter table", &config.table)?;
        validate_identifier("voter primary key", &config.primary_key)?;

        self.voters.insert(config.entity_type.clone(), config);
        Ok(())
    }

    /// Looks up the configuration for a voteable entity type.
    pub fn voteable(&self, entity_type: &str) -> Option<&VoteableConfig> {
        self.voteables.get(entity_type)
    }

    /// Looks up the configuration for a voter entity type.
    pub fn voter(&self, entity_type: &str) -> Option<&VoterConfig> {
        self.voters.get(entity_type)
    }

    /// The counter column configured for an entity type, if any.
    pub fn counter_column_for(&self, entity_type: &str) -> Option<&str> {
        self.voteables
            .get(entity_type)
            .and_then(|config| config.counter_column.as_deref())
    }
}
