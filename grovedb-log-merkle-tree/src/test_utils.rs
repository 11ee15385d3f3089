//! Test utilities: a reference verifier that replays audit paths and
//! consistency proofs using the same split-point rule as the generator.

use crate::{
    AuditPath, ConsistencyProof, Digest, MerkleHasher, split::largest_power_of_two_less_than,
};

/// Entries `"d0"`, `"d1"`, ... as bytes.
pub(crate) fn make_entries(count: usize) -> Vec<Vec<u8>> {
    (0..count).map(|i| format!("d{}", i).into_bytes()).collect()
}

/// Recompute the root implied by `path` for leaf content `leaf`.
pub(crate) fn root_from_audit_path<H: MerkleHasher>(
    leaf: &[u8],
    path: &AuditPath,
) -> Result<Digest, String> {
    run_audit_path::<H>(
        path.hashes(),
        path.leaf_index(),
        path.tree_size(),
        H::leaf_hash(leaf),
    )
}

// Walks from the root down: the last hash in `hashes` is the sibling at the
// current level, the rest prove the subtree holding leaf `m`.
fn run_audit_path<H: MerkleHasher>(
    hashes: &[Digest],
    m: u64,
    n: u64,
    leaf_hash: Digest,
) -> Result<Digest, String> {
    if n == 1 {
        if !hashes.is_empty() {
            return Err(format!("{} unused hashes at leaf", hashes.len()));
        }
        return Ok(leaf_hash);
    }
    let Some((sibling, rest)) = hashes.split_last() else {
        return Err(format!("audit path too short at subtree of size {}", n));
    };
    let k = largest_power_of_two_less_than(n);
    if m < k {
        let left = run_audit_path::<H>(rest, m, k, leaf_hash)?;
        Ok(H::node_hash(&left, sibling))
    } else {
        let right = run_audit_path::<H>(rest, m - k, n - k, leaf_hash)?;
        Ok(H::node_hash(sibling, &right))
    }
}

/// Check that `proof` links `old_root` to `new_root`.
pub(crate) fn verify_consistency<H: MerkleHasher>(
    proof: &ConsistencyProof,
    old_root: &Digest,
    new_root: &Digest,
) -> Result<(), String> {
    if proof.old_size() == 0 {
        return if proof.is_empty() {
            Ok(())
        } else {
            Err("proof from the empty tree must be empty".into())
        };
    }
    if proof.old_size() == proof.new_size() {
        if !proof.is_empty() {
            return Err("proof between equal sizes must be empty".into());
        }
        return if old_root == new_root {
            Ok(())
        } else {
            Err("roots of equal-size trees differ".into())
        };
    }
    let (old, new) = run_consistency_proof::<H>(
        proof.hashes(),
        proof.old_size(),
        proof.new_size(),
        true,
        *old_root,
    )?;
    if &old != old_root {
        return Err(format!("old root mismatch: got {}", hex::encode(old)));
    }
    if &new != new_root {
        return Err(format!("new root mismatch: got {}", hex::encode(new)));
    }
    Ok(())
}

// Returns the implied (old subtree hash, new subtree hash) for the subtree of
// `n` leaves whose first `m` leaves belong to the old tree.
fn run_consistency_proof<H: MerkleHasher>(
    hashes: &[Digest],
    m: u64,
    n: u64,
    boundary_exact: bool,
    old_root: Digest,
) -> Result<(Digest, Digest), String> {
    if m == n {
        if boundary_exact {
            if !hashes.is_empty() {
                return Err(format!("{} unused hashes at old root", hashes.len()));
            }
            return Ok((old_root, old_root));
        }
        return match hashes {
            [hash] => Ok((*hash, *hash)),
            _ => Err(format!("expected one subtree hash, got {}", hashes.len())),
        };
    }
    let Some((sibling, rest)) = hashes.split_last() else {
        return Err(format!("consistency proof too short at subtree of size {}", n));
    };
    let k = largest_power_of_two_less_than(n);
    if m <= k {
        let (old, new) = run_consistency_proof::<H>(rest, m, k, boundary_exact, old_root)?;
        Ok((old, H::node_hash(&new, sibling)))
    } else {
        let (old, new) = run_consistency_proof::<H>(rest, m - k, n - k, false, old_root)?;
        Ok((H::node_hash(sibling, &old), H::node_hash(sibling, &new)))
    }
}
