use std::{collections::HashMap, fmt, marker::PhantomData, sync::RwLock};

use crate::{
    AuditPath, ConsistencyProof, Digest, LogMerkleError, MerkleHasher, Sha256Hasher,
    split::{audit_path_len, consistency_proof_len, largest_power_of_two_less_than},
};

/// Memo of subtree hashes keyed by the `[start, end)` entry window.
///
/// Only windows of two or more entries are stored; leaf hashes are cheaper to
/// recompute than to look up.
#[derive(Default)]
struct SubtreeCache {
    hashes: RwLock<HashMap<(u64, u64), Digest>>,
}

impl SubtreeCache {
    fn get(&self, start: u64, end: u64) -> Option<Digest> {
        // Poisoned locks count as a miss.
        self.hashes.read().ok()?.get(&(start, end)).copied()
    }

    fn insert(&self, start: u64, end: u64, hash: Digest) {
        if let Ok(mut hashes) = self.hashes.write() {
            hashes.insert((start, end), hash);
        }
    }

    fn len(&self) -> usize {
        self.hashes.read().map(|hashes| hashes.len()).unwrap_or(0)
    }
}

/// A read-only Merkle tree over a borrowed, ordered list of log entries.
///
/// Tree shape depends only on the number of entries: every range of `n > 1`
/// entries splits into a left subtree holding the largest power of two
/// smaller than `n` and a right subtree holding the rest.
///
/// The tree borrows the caller's entries and never copies them, so the
/// entries cannot be mutated while the tree is alive. Growing the log means
/// building a new tree over the longer slice.
///
/// `H` selects the digest function; the default [`Sha256Hasher`] yields
/// RFC 6962 compatible hashes.
pub struct LogMerkleTree<'a, E, H = Sha256Hasher> {
    entries: &'a [E],
    cache: Option<SubtreeCache>,
    _hasher: PhantomData<fn() -> H>,
}

impl<'a, E> LogMerkleTree<'a, E, Sha256Hasher>
where
    E: AsRef<[u8]>,
{
    /// Build an RFC 6962 (SHA-256) tree over `entries` that recomputes every
    /// subtree hash on demand.
    pub fn new(entries: &'a [E]) -> Self {
        Self::with_hasher(entries)
    }

    /// Build an RFC 6962 (SHA-256) tree over `entries` that remembers subtree
    /// hashes between calls. Results are identical to [`new`](Self::new).
    pub fn with_subtree_cache(entries: &'a [E]) -> Self {
        Self::with_hasher(entries).cache_subtrees()
    }
}

impl<'a, E, H> LogMerkleTree<'a, E, H>
where
    E: AsRef<[u8]>,
    H: MerkleHasher,
{
    /// Build a tree over `entries` hashed with `H`, e.g.
    /// `LogMerkleTree::<_, Blake3Hasher>::with_hasher(&entries)`.
    pub fn with_hasher(entries: &'a [E]) -> Self {
        LogMerkleTree {
            entries,
            cache: None,
            _hasher: PhantomData,
        }
    }

    /// Enable the subtree hash memo. Hashes, paths and proofs are unchanged;
    /// repeated calls reuse subtree hashes computed by earlier ones.
    pub fn cache_subtrees(mut self) -> Self {
        if self.cache.is_none() {
            self.cache = Some(SubtreeCache::default());
        }
        self
    }

    /// The entries the tree was built over.
    pub fn entries(&self) -> &'a [E] {
        self.entries
    }

    /// Number of leaves.
    pub fn len(&self) -> u64 {
        self.entries.len() as u64
    }

    /// Returns `true` if the tree has no leaves.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of memoized subtree hashes, or `None` for an uncached tree.
    pub fn cached_subtree_count(&self) -> Option<usize> {
        self.cache.as_ref().map(SubtreeCache::len)
    }

    /// The Merkle Tree Hash of all entries.
    ///
    /// The empty tree hashes to `H()`, a single entry `d` to `H(0x00 || d)`.
    pub fn root_hash(&self) -> Digest {
        self.mth(0, self.len())
    }

    /// The Merkle Tree Hash of the entries in `[start, end)`, hashed as a
    /// tree of its own.
    ///
    /// For `start == 0` this is the root hash of the earlier snapshot of
    /// size `end`.
    pub fn range_hash(&self, start: u64, end: u64) -> Result<Digest, LogMerkleError> {
        let size = self.len();
        if start > end || end > size {
            return Err(LogMerkleError::InvalidRange { start, end, size });
        }
        Ok(self.mth(start, end))
    }

    /// The audit path for the leaf at `index`.
    ///
    /// Fails with [`LogMerkleError::IndexOutOfRange`] unless
    /// `index < self.len()`.
    pub fn audit_path(&self, index: u64) -> Result<AuditPath, LogMerkleError> {
        let size = self.len();
        if index >= size {
            return Err(LogMerkleError::IndexOutOfRange { index, size });
        }
        let mut hashes = Vec::with_capacity(audit_path_len(index, size));
        self.path(index, 0, size, &mut hashes);
        let path = AuditPath::new(H::ALGORITHM, size, index, hashes)?;
        #[cfg(feature = "proof_debug")]
        {
            println!("constructed audit path is {}", path);
        }
        Ok(path)
    }

    /// The consistency proof between the snapshot of the first `old_size`
    /// entries and the full tree.
    ///
    /// `old_size == 0` and `old_size == self.len()` yield an empty proof.
    /// Fails with [`LogMerkleError::IndexOutOfRange`] if `old_size` exceeds
    /// the tree size or the tree is empty.
    pub fn consistency_proof(&self, old_size: u64) -> Result<ConsistencyProof, LogMerkleError> {
        let size = self.len();
        if size == 0 || old_size > size {
            return Err(LogMerkleError::IndexOutOfRange {
                index: old_size,
                size,
            });
        }
        let mut hashes = Vec::with_capacity(consistency_proof_len(old_size, size));
        if 0 < old_size && old_size < size {
            self.sub_proof(old_size, 0, size, true, &mut hashes);
        }
        let proof = ConsistencyProof::new(H::ALGORITHM, old_size, size, hashes)?;
        #[cfg(feature = "proof_debug")]
        {
            println!("constructed consistency proof is {}", proof);
        }
        Ok(proof)
    }

    /// MTH over `[start, end)`. Callers guarantee `start <= end <= len`.
    fn mth(&self, start: u64, end: u64) -> Digest {
        match end - start {
            0 => H::empty_hash(),
            1 => H::leaf_hash(self.entries[start as usize].as_ref()),
            n => {
                if let Some(hash) = self.cache.as_ref().and_then(|c| c.get(start, end)) {
                    return hash;
                }
                let k = largest_power_of_two_less_than(n);
                let hash = H::node_hash(&self.mth(start, start + k), &self.mth(start + k, end));
                if let Some(cache) = &self.cache {
                    cache.insert(start, end, hash);
                }
                hash
            }
        }
    }

    /// Append the audit path for leaf `m` (relative to `start`) of the
    /// subtree `[start, end)`.
    fn path(&self, m: u64, start: u64, end: u64, hashes: &mut Vec<Digest>) {
        let n = end - start;
        if n <= 1 {
            return;
        }
        let k = largest_power_of_two_less_than(n);
        if m < k {
            self.path(m, start, start + k, hashes);
            hashes.push(self.mth(start + k, end));
        } else {
            self.path(m - k, start + k, end, hashes);
            hashes.push(self.mth(start, start + k));
        }
    }

    /// Append the consistency subproof for the first `m` leaves of the
    /// subtree `[start, end)`.
    ///
    /// `boundary_exact` stays `true` while every descent so far went left,
    /// i.e. while the subtree of `m` leaves is a prefix the verifier already
    /// holds the hash of. It drops to `false` on the first right descent.
    fn sub_proof(
        &self,
        m: u64,
        start: u64,
        end: u64,
        boundary_exact: bool,
        hashes: &mut Vec<Digest>,
    ) {
        let n = end - start;
        if m == n {
            if !boundary_exact {
                hashes.push(self.mth(start, end));
            }
            return;
        }
        let k = largest_power_of_two_less_than(n);
        if m <= k {
            self.sub_proof(m, start, start + k, boundary_exact, hashes);
            hashes.push(self.mth(start + k, end));
        } else {
            self.sub_proof(m - k, start + k, end, false, hashes);
            hashes.push(self.mth(start, start + k));
        }
    }
}

impl<E, H> fmt::Debug for LogMerkleTree<'_, E, H>
where
    H: MerkleHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogMerkleTree")
            .field("algorithm", &H::ALGORITHM)
            .field("size", &self.entries.len())
            .field("cached", &self.cache.is_some())
            .finish()
    }
}
