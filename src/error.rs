use thiserror::Error;

/// Errors returned by map operations.
///
/// Lookups and removals of absent keys are not errors; they return `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// The key passed to [`set`](crate::AvlTreeMap::set) is not in the map.
    #[error("key not found")]
    KeyNotFound,
}

/// Result type used by this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
