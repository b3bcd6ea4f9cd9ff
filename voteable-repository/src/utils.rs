//! Utility functions for the voteable repository.

use crate::errors::VoteRepositoryError;

/// Validate that a value can be spliced into SQL as a plain identifier.
///
/// Registry table, primary-key, and counter-column names, along with tally
/// order columns, end up in query text rather than bind parameters, so they
/// are restricted to `[A-Za-z_][A-Za-z0-9_]*`.
///
/// # Arguments
///
/// * `field_name` - What the value configures, used in the error message.
/// * `value` - The candidate identifier.
///
/// # Returns
///
/// * `Ok(())` - The value is a plain identifier.
/// * `Err(VoteRepositoryError)` - `InvalidOption` otherwise.
pub fn validate_identifier(field_name: &str, value: &str) -> Result<(), VoteRepositoryError> {
    let mut chars = value.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(VoteRepositoryError::InvalidOption(format!(
            "{} is not a valid identifier: {:?}",
            field_name, value
        )))
    }
}
