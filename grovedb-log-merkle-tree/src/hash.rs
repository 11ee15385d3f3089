//! Domain-separated hashing for the log Merkle tree.
//!
//! - Empty tree:     `H()`
//! - Leaf nodes:     `H(0x00 || entry)`
//! - Internal nodes: `H(0x01 || left_hash || right_hash)`
//!
//! The 0x00/0x01 tags keep a leaf hash from ever colliding with an internal
//! node hash. The digest function is chosen by the [`MerkleHasher`] type
//! parameter; [`Sha256Hasher`] produces RFC 6962 compatible roots.

use std::fmt;

use bincode::{Decode, Encode};
use sha2::{Digest as _, Sha256};

/// A 32-byte tree digest.
pub type Digest = [u8; 32];

/// Domain tag prepended to leaf hash inputs.
pub const LEAF_DOMAIN_TAG: u8 = 0x00;
/// Domain tag prepended to internal node hash inputs.
pub const NODE_DOMAIN_TAG: u8 = 0x01;

/// Identifies the digest function a tree or proof was built with.
///
/// Stamped into every serialized proof so that a proof produced under one
/// algorithm can never be mistaken for one produced under another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode)]
pub enum HashAlgorithm {
    /// SHA-256, as mandated by RFC 6962.
    Sha256,
    /// Blake3, the native GroveDB hash.
    Blake3,
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Sha256 => f.write_str("sha256"),
            HashAlgorithm::Blake3 => f.write_str("blake3"),
        }
    }
}

/// A fixed 256-bit digest function with RFC 6962 domain separation.
///
/// Implementors only provide [`digest`](MerkleHasher::digest) over a list of
/// byte slices that are fed to the hash in order; the leaf, node and empty
/// hashes are derived from it.
pub trait MerkleHasher {
    /// The algorithm tag recorded in proofs.
    const ALGORITHM: HashAlgorithm;

    /// Hash the concatenation of `parts`.
    fn digest(parts: &[&[u8]]) -> Digest;

    /// Hash of the empty entry list: `H()`.
    fn empty_hash() -> Digest {
        Self::digest(&[])
    }

    /// Hash of a single entry: `H(0x00 || data)`.
    fn leaf_hash(data: &[u8]) -> Digest {
        Self::digest(&[&[LEAF_DOMAIN_TAG], data])
    }

    /// Hash of an internal node: `H(0x01 || left || right)`.
    fn node_hash(left: &Digest, right: &Digest) -> Digest {
        Self::digest(&[&[NODE_DOMAIN_TAG], left.as_slice(), right.as_slice()])
    }
}

/// SHA-256 hasher (RFC 6962).
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl MerkleHasher for Sha256Hasher {
    const ALGORITHM: HashAlgorithm = HashAlgorithm::Sha256;

    fn digest(parts: &[&[u8]]) -> Digest {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part);
        }
        hasher.finalize().into()
    }
}

/// Blake3 hasher.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Hasher;

impl MerkleHasher for Blake3Hasher {
    const ALGORITHM: HashAlgorithm = HashAlgorithm::Blake3;

    fn digest(parts: &[&[u8]]) -> Digest {
        let mut hasher = blake3::Hasher::new();
        for part in parts {
            hasher.update(part);
        }
        *hasher.finalize().as_bytes()
    }
}

/// Leaf hash of `data` under `H`; convenience for callers building their own
/// verifiers.
pub fn leaf_hash<H: MerkleHasher>(data: &[u8]) -> Digest {
    H::leaf_hash(data)
}
