//! Error codes reported by tree operations.

use thiserror::Error;

/// The closed set of failures a tree operation can report. Success is `Ok`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum TreeError {
    /// The node arena could not grow to hold a new entry. The tree is unchanged.
    #[error("insufficient memory to allocate a tree node")]
    NoMemory,
    /// No entry matches the requested key, the tree is empty, or the entry has
    /// no neighbour in the requested direction.
    #[error("no matching entry")]
    NoData,
    /// An entry comparing equal to the inserted key is already stored.
    #[error("an entry with an equal key is already stored")]
    DataConflict,
    /// Ordering and cleanup policies may only be replaced while the tree is empty.
    #[error("cannot replace a tree policy while entries are stored")]
    NotEmpty,
}
