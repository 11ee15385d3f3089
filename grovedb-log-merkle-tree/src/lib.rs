//! Merkle tree hash, audit paths and consistency proofs for append-only logs.
//!
//! Implements the binary Merkle tree of RFC 6962 section 2.1 over an ordered
//! list of opaque entries. The shape of the tree is fixed by the number of
//! entries alone, and leaf and internal node hashes are domain separated.
//!
//! # Core types
//!
//! - [`LogMerkleTree`]: a read-only view over borrowed entries (root hash,
//!   audit paths, consistency proofs).
//! - [`AuditPath`]: sibling hashes proving one leaf's inclusion.
//! - [`ConsistencyProof`]: hashes proving an earlier snapshot is a prefix of
//!   the current tree.
//!
//! # Hashing
//!
//! - [`MerkleHasher`]: the digest function, chosen as a type parameter.
//! - [`Sha256Hasher`]: RFC 6962 (default).
//! - [`Blake3Hasher`]: GroveDB's native hash.
//!
//! Proof verification is left to the consumer; every proof records the tree
//! sizes and the [`HashAlgorithm`] needed to replay it.

#![warn(missing_docs)]

mod error;
mod hash;
mod proof;
pub mod split;
mod tree;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::LogMerkleError;
pub use hash::{
    Blake3Hasher, Digest, HashAlgorithm, LEAF_DOMAIN_TAG, MerkleHasher, NODE_DOMAIN_TAG,
    Sha256Hasher, leaf_hash,
};
pub use proof::{AuditPath, ConsistencyProof};
pub use split::largest_power_of_two_less_than;
pub use tree::LogMerkleTree;
