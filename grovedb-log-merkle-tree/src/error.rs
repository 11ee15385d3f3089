use thiserror::Error;

/// Errors from log Merkle tree operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogMerkleError {
    /// A leaf index or snapshot size falls outside the tree.
    #[error("index {index} out of range for tree of size {size}")]
    IndexOutOfRange {
        /// The rejected leaf index or snapshot size.
        index: u64,
        /// Number of leaves in the tree.
        size: u64,
    },
    /// A requested entry window is reversed or extends past the tree.
    #[error("invalid range [{start}, {end}) for tree of size {size}")]
    InvalidRange {
        /// Window start (inclusive).
        start: u64,
        /// Window end (exclusive).
        end: u64,
        /// Number of leaves in the tree.
        size: u64,
    },
    /// A proof is malformed or failed to encode or decode.
    #[error("invalid proof: {0}")]
    InvalidProof(String),
}
