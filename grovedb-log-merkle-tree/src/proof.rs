//! Audit paths and consistency proofs produced by
//! [`LogMerkleTree`](crate::LogMerkleTree).
//!
//! Both proofs are an ordered list of sibling hashes, leaf-to-root. Neither
//! carries left/right markers: a verifier re-derives each hash's side by
//! replaying the same split-point arithmetic over the recorded sizes.
//!
//! Serialization uses bincode with big-endian integers. Decoding checks that
//! the hash count matches the one implied by the recorded sizes, so a
//! truncated or padded proof is rejected before it reaches a verifier.

use std::fmt;

use bincode::{Decode, Encode};

use crate::{
    Digest, HashAlgorithm, LogMerkleError,
    split::{audit_path_len, consistency_proof_len},
};

/// Upper bound on the encoded size of a proof. The longest possible proof
/// holds 65 hashes.
const MAX_ENCODED_PROOF_BYTES: usize = 64 * 1024;

fn encode_config() -> impl bincode::config::Config {
    bincode::config::standard()
        .with_big_endian()
        .with_no_limit()
}

fn decode_config() -> impl bincode::config::Config {
    bincode::config::standard()
        .with_big_endian()
        .with_limit::<MAX_ENCODED_PROOF_BYTES>()
}

fn write_hashes(f: &mut fmt::Formatter<'_>, hashes: &[Digest]) -> fmt::Result {
    f.write_str("[")?;
    for (i, hash) in hashes.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        f.write_str(&hex::encode(hash))?;
    }
    f.write_str("]")
}

/// An inclusion proof for one leaf: the sibling hashes from the leaf up to
/// the root of a tree of `tree_size` leaves.
///
/// At each level the sibling is a right sibling when the leaf's index within
/// the current subtree is below the split point, and a left sibling otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct AuditPath {
    algorithm: HashAlgorithm,
    tree_size: u64,
    leaf_index: u64,
    hashes: Vec<Digest>,
}

impl AuditPath {
    /// Assemble an audit path, checking that the hash count is the one a
    /// tree of `tree_size` leaves yields for `leaf_index`.
    pub fn new(
        algorithm: HashAlgorithm,
        tree_size: u64,
        leaf_index: u64,
        hashes: Vec<Digest>,
    ) -> Result<Self, LogMerkleError> {
        let path = AuditPath {
            algorithm,
            tree_size,
            leaf_index,
            hashes,
        };
        path.validate()?;
        Ok(path)
    }

    fn validate(&self) -> Result<(), LogMerkleError> {
        if self.leaf_index >= self.tree_size {
            return Err(LogMerkleError::InvalidProof(format!(
                "leaf index {} out of range for tree size {}",
                self.leaf_index, self.tree_size
            )));
        }
        let expected = audit_path_len(self.leaf_index, self.tree_size);
        if self.hashes.len() != expected {
            return Err(LogMerkleError::InvalidProof(format!(
                "audit path for leaf {} of {} must have {} hashes, got {}",
                self.leaf_index,
                self.tree_size,
                expected,
                self.hashes.len()
            )));
        }
        Ok(())
    }

    /// The digest algorithm the path was generated with.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Number of leaves in the tree the path was generated against.
    pub fn tree_size(&self) -> u64 {
        self.tree_size
    }

    /// 0-based index of the proved leaf.
    pub fn leaf_index(&self) -> u64 {
        self.leaf_index
    }

    /// Sibling hashes, ordered leaf-to-root.
    pub fn hashes(&self) -> &[Digest] {
        &self.hashes
    }

    /// Consume the path and return its sibling hashes.
    pub fn into_hashes(self) -> Vec<Digest> {
        self.hashes
    }

    /// Number of sibling hashes.
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    /// `true` for the single-leaf tree, whose root is the leaf hash itself.
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Encode to bytes using bincode.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>, LogMerkleError> {
        bincode::encode_to_vec(self, encode_config())
            .map_err(|e| LogMerkleError::InvalidProof(format!("encode error: {}", e)))
    }

    /// Decode from bytes using bincode, rejecting structurally invalid paths.
    pub fn decode_from_slice(bytes: &[u8]) -> Result<Self, LogMerkleError> {
        let (path, read): (Self, usize) = bincode::decode_from_slice(bytes, decode_config())
            .map_err(|e| LogMerkleError::InvalidProof(format!("decode error: {}", e)))?;
        if read != bytes.len() {
            return Err(LogMerkleError::InvalidProof(format!(
                "{} trailing bytes after audit path",
                bytes.len() - read
            )));
        }
        path.validate()?;
        Ok(path)
    }
}

impl fmt::Display for AuditPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AuditPath {{ algorithm: {}, tree_size: {}, leaf_index: {}, hashes: ",
            self.algorithm, self.tree_size, self.leaf_index
        )?;
        write_hashes(f, &self.hashes)?;
        f.write_str(" }")
    }
}

/// A proof that the tree of `old_size` leaves is a prefix of the tree of
/// `new_size` leaves.
///
/// Empty when `old_size` is 0 or equal to `new_size`: nothing needs proving.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct ConsistencyProof {
    algorithm: HashAlgorithm,
    old_size: u64,
    new_size: u64,
    hashes: Vec<Digest>,
}

impl ConsistencyProof {
    /// Assemble a consistency proof, checking that the hash count is the one
    /// implied by `old_size` and `new_size`.
    pub fn new(
        algorithm: HashAlgorithm,
        old_size: u64,
        new_size: u64,
        hashes: Vec<Digest>,
    ) -> Result<Self, LogMerkleError> {
        let proof = ConsistencyProof {
            algorithm,
            old_size,
            new_size,
            hashes,
        };
        proof.validate()?;
        Ok(proof)
    }

    fn validate(&self) -> Result<(), LogMerkleError> {
        if self.old_size > self.new_size {
            return Err(LogMerkleError::InvalidProof(format!(
                "old size {} exceeds new size {}",
                self.old_size, self.new_size
            )));
        }
        let expected = consistency_proof_len(self.old_size, self.new_size);
        if self.hashes.len() != expected {
            return Err(LogMerkleError::InvalidProof(format!(
                "consistency proof from {} to {} must have {} hashes, got {}",
                self.old_size,
                self.new_size,
                expected,
                self.hashes.len()
            )));
        }
        Ok(())
    }

    /// The digest algorithm the proof was generated with.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Size of the earlier snapshot.
    pub fn old_size(&self) -> u64 {
        self.old_size
    }

    /// Size of the tree the proof was generated against.
    pub fn new_size(&self) -> u64 {
        self.new_size
    }

    /// Proof hashes in generation order.
    pub fn hashes(&self) -> &[Digest] {
        &self.hashes
    }

    /// Consume the proof and return its hashes.
    pub fn into_hashes(self) -> Vec<Digest> {
        self.hashes
    }

    /// Number of proof hashes.
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    /// `true` if the proof has no hashes.
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// `true` for the degenerate snapshots (`old_size == 0` or
    /// `old_size == new_size`) where consistency holds without any hashes.
    pub fn is_trivial(&self) -> bool {
        self.old_size == 0 || self.old_size == self.new_size
    }

    /// Encode to bytes using bincode.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>, LogMerkleError> {
        bincode::encode_to_vec(self, encode_config())
            .map_err(|e| LogMerkleError::InvalidProof(format!("encode error: {}", e)))
    }

    /// Decode from bytes using bincode, rejecting structurally invalid proofs.
    pub fn decode_from_slice(bytes: &[u8]) -> Result<Self, LogMerkleError> {
        let (proof, read): (Self, usize) = bincode::decode_from_slice(bytes, decode_config())
            .map_err(|e| LogMerkleError::InvalidProof(format!("decode error: {}", e)))?;
        if read != bytes.len() {
            return Err(LogMerkleError::InvalidProof(format!(
                "{} trailing bytes after consistency proof",
                bytes.len() - read
            )));
        }
        proof.validate()?;
        Ok(proof)
    }
}

impl fmt::Display for ConsistencyProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ConsistencyProof {{ algorithm: {}, old_size: {}, new_size: {}, hashes: ",
            self.algorithm, self.old_size, self.new_size
        )?;
        write_hashes(f, &self.hashes)?;
        f.write_str(" }")
    }
}
