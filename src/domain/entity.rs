//! Domain Layer - Core Entity Trait
//!
//! Every keyed entity in the diary is identified by its name.
//! Names are unique within their owning collection.

use thiserror::Error;

/// Core trait for all named domain entities
pub trait Entity: Clone {
    /// Returns the entity's unique key within its collection
    fn key(&self) -> &str;
}

/// Position of the entity with the given key, if present
pub fn position_of<T: Entity>(items: &[T], key: &str) -> Option<usize> {
    items.iter().position(|item| item.key() == key)
}

/// Whether any entity in the slice already uses the key
pub fn key_taken<T: Entity>(items: &[T], key: &str) -> bool {
    position_of(items, key).is_some()
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    /// Persisted state could not be decoded
    #[error("Stored data is corrupt: {0}")]
    Corrupt(String),
    /// An import file was rejected before touching state
    #[error("Import rejected: {0}")]
    InvalidImport(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Reject blank names and trim surrounding whitespace
pub fn clean_name(raw: &str, what: &str) -> DomainResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(DomainError::InvalidInput(format!("{} name cannot be empty", what)));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct Named(&'static str);

    impl Entity for Named {
        fn key(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_position_of() {
        let items = vec![Named("a"), Named("b")];
        assert_eq!(position_of(&items, "b"), Some(1));
        assert!(!key_taken(&items, "c"));
    }

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("  Water ", "Tracker").unwrap(), "Water");
        assert!(matches!(clean_name("   ", "Tracker"), Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn test_error_display() {
        let err = DomainError::Conflict("Tracker 'Water' already exists".into());
        assert_eq!(err.to_string(), "Conflict: Tracker 'Water' already exists");
    }
}
