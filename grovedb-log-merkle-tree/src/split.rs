//! Split-point arithmetic shared by hashing, audit paths and consistency
//! proofs.
//!
//! Every recursive step over `n` entries splits them into a left subtree of
//! `k` entries and a right subtree of `n - k` entries, where `k` is the
//! largest power of two strictly less than `n`. Tree shape is therefore a
//! function of the entry count alone.

/// Return the largest power of two strictly less than `n`, or 0 if `n < 2`.
///
/// For `n >= 2` the result `k` satisfies `k < n <= 2k`.
pub fn largest_power_of_two_less_than(n: u64) -> u64 {
    if n < 2 {
        return 0;
    }
    1 << (n - 1).ilog2()
}

/// `ceil(log2(n))`, the height of a tree with `n` leaves. Zero for `n <= 1`.
///
/// Upper bound on the audit path length; consistency proofs may carry one
/// more hash.
pub(crate) fn tree_height(n: u64) -> u32 {
    if n <= 1 {
        return 0;
    }
    u64::BITS - (n - 1).leading_zeros()
}

/// Number of hashes in the audit path for leaf `index` of a tree with `size`
/// leaves. Requires `index < size`.
pub(crate) fn audit_path_len(index: u64, size: u64) -> usize {
    let (mut m, mut n) = (index, size);
    let mut len = 0;
    while n > 1 {
        let k = largest_power_of_two_less_than(n);
        if m < k {
            n = k;
        } else {
            m -= k;
            n -= k;
        }
        len += 1;
    }
    len
}

/// Number of hashes in the consistency proof from `old_size` to `new_size`.
/// Zero when `old_size` is 0 or equal to `new_size`. Requires
/// `old_size <= new_size`.
pub(crate) fn consistency_proof_len(old_size: u64, new_size: u64) -> usize {
    if old_size == 0 || old_size == new_size {
        return 0;
    }
    let (mut m, mut n) = (old_size, new_size);
    let mut boundary_exact = true;
    let mut len = 0;
    while m != n {
        let k = largest_power_of_two_less_than(n);
        if m <= k {
            n = k;
        } else {
            m -= k;
            n -= k;
            boundary_exact = false;
        }
        len += 1;
    }
    if !boundary_exact {
        len += 1;
    }
    len
}
