//! Myers alignment for section sequences
//!
//! Aligns two sequences under a caller-supplied identity predicate and
//! returns the insert/delete script plus the matched pairs. Only identity is
//! consulted; item content never reaches this level.
//!
//! # Algorithm Choice: Why Myers?
//!
//! | Algorithm | Time | Space | Needs |
//! |-----------|------|-------|-------|
//! | DP | O(n*m) | O(n*m) | equality |
//! | **Myers** | O((n+m)*d) | O(d*(n+m)) | **equality only** |
//! | Heckel | O(n+m) | O(n+m) | hashing |
//!
//! Section identity is a predicate, not a hash key, so the symbol-table
//! engine does not apply here. Section lists are short and mostly stable,
//! which keeps `d` small.
//!
//! # Space Complexity Note
//!
//! The full trace is stored for backtracking (`O(d)` snapshots, each of size
//! `O(n+m)`). The linear-space divide-and-conquer variant would bring this to
//! O(n+m) at twice the time.
//!
//! # References
//!
//! - Myers, E.W. "An O(ND) Difference Algorithm and Its Variations" (1986)

use tracing::debug;

use super::script::Diff;

/// Default bound on the edit distance explored before giving up.
pub const MAX_EDIT_DISTANCE: usize = 512;

/// Inputs up to this length on both sides use the quadratic DP.
const SMALL_LEN: usize = 8;

// =============================================================================
// Public Types
// =============================================================================

/// Result of an alignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct Alignment {
    /// Insert/delete script with the matched pairs
    pub diff: Diff,
    /// The search hit the edit-distance bound; the middle stayed unmatched
    pub exhausted: bool,
}

// =============================================================================
// Main API
// =============================================================================

/// Align `old` against `new` under `is_same`.
///
/// Matched pairs form a longest common subsequence. When the edit distance
/// of the part between the common prefix and suffix exceeds
/// `max_edit_distance`, that part is left unmatched and
/// [`Alignment::exhausted`] is set.
pub fn align<T, F>(old: &[T], new: &[T], is_same: F, max_edit_distance: usize) -> Alignment
where
    F: Fn(&T, &T) -> bool,
{
    let (n, m) = (old.len(), new.len());

    // Quick paths
    if n == 0 || m == 0 {
        return Alignment {
            diff: Diff::replace_all(n, m),
            exhausted: false,
        };
    }

    // Strip common prefix
    let mut prefix_len = 0;
    while prefix_len < n && prefix_len < m && is_same(&old[prefix_len], &new[prefix_len]) {
        prefix_len += 1;
    }

    // Strip common suffix
    let mut suffix_len = 0;
    while suffix_len < n - prefix_len
        && suffix_len < m - prefix_len
        && is_same(&old[n - 1 - suffix_len], &new[m - 1 - suffix_len])
    {
        suffix_len += 1;
    }

    let mut matched: Vec<(usize, usize)> = (0..prefix_len).map(|i| (i, i)).collect();
    let mut exhausted = false;

    let old_mid = &old[prefix_len..n - suffix_len];
    let new_mid = &new[prefix_len..m - suffix_len];

    if !old_mid.is_empty() && !new_mid.is_empty() {
        match lcs(old_mid, new_mid, &is_same, max_edit_distance) {
            Some(pairs) => {
                matched.extend(pairs.into_iter().map(|(o, n)| (o + prefix_len, n + prefix_len)));
            }
            None => {
                debug!(
                    old_len = old_mid.len(),
                    new_len = new_mid.len(),
                    max_edit_distance,
                    "alignment exceeded edit distance bound"
                );
                exhausted = true;
            }
        }
    }

    matched.extend((0..suffix_len).map(|i| (n - suffix_len + i, m - suffix_len + i)));

    Alignment {
        diff: Diff::from_matches(n, m, matched),
        exhausted,
    }
}

// =============================================================================
// Myers Algorithm Core
// =============================================================================

/// LCS pairs of two non-empty sequences, or `None` past the distance bound.
///
/// For each d, tracks the furthest-reaching path on each diagonal k = x - y.
fn lcs<T, F>(old: &[T], new: &[T], is_same: &F, max_edit_distance: usize) -> Option<Vec<(usize, usize)>>
where
    F: Fn(&T, &T) -> bool,
{
    let n = old.len();
    let m = new.len();

    if n <= SMALL_LEN && m <= SMALL_LEN {
        return Some(small_lcs_dp(old, new, is_same));
    }

    let max_d = n + m;
    let offset = max_d;

    // V[k + offset] = furthest x on diagonal k
    let mut v = vec![0usize; 2 * max_d + 1];
    let mut trace: Vec<Vec<usize>> = Vec::with_capacity(max_d.min(max_edit_distance) + 1);

    'outer: for d in 0..=max_d {
        if d > max_edit_distance {
            return None;
        }

        trace.push(v.clone());

        for k in (-(d as isize)..=(d as isize)).step_by(2) {
            let kk = (k + offset as isize) as usize;

            // At k=-d only an insert reaches, at k=d only a delete
            let mut x = if k == -(d as isize) || (k != d as isize && v[kk - 1] < v[kk + 1]) {
                v[kk + 1]
            } else {
                v[kk - 1] + 1
            };
            let mut y = (x as isize - k) as usize;

            // Snake
            while x < n && y < m && is_same(&old[x], &new[y]) {
                x += 1;
                y += 1;
            }

            v[kk] = x;

            if x >= n && y >= m {
                break 'outer;
            }
        }
    }

    Some(backtrack(&trace, n, m, offset))
}

/// Walk the trace back from (n, m), collecting snake diagonals.
fn backtrack(trace: &[Vec<usize>], n: usize, m: usize, offset: usize) -> Vec<(usize, usize)> {
    let mut x = n;
    let mut y = m;
    let mut pairs = Vec::new();

    for (d, v) in trace.iter().enumerate().rev() {
        let k = x as isize - y as isize;
        let kk = (k + offset as isize) as usize;

        let prev_k = if d == 0 {
            0isize
        } else if k == -(d as isize) || (k != d as isize && v[kk - 1] < v[kk + 1]) {
            k + 1
        } else {
            k - 1
        };

        let prev_kk = (prev_k + offset as isize) as usize;
        let prev_x = if d == 0 { 0 } else { v[prev_kk] };
        let prev_y = (prev_x as isize - prev_k) as usize;

        while x > prev_x && y > prev_y {
            x -= 1;
            y -= 1;
            pairs.push((x, y));
        }

        if d > 0 {
            if prev_k < k {
                x = prev_x;
            } else {
                y = prev_y;
            }
        }

        if x == 0 && y == 0 {
            break;
        }
    }

    pairs.reverse();
    pairs
}

/// Quadratic DP for inputs of at most [`SMALL_LEN`] on both sides.
///
/// Ties prefer dropping from `old`, so a reordered item keeps the earlier
/// new slot and the displaced one is the later old item.
fn small_lcs_dp<T, F>(old: &[T], new: &[T], is_same: &F) -> Vec<(usize, usize)>
where
    F: Fn(&T, &T) -> bool,
{
    let n = old.len();
    let m = new.len();

    // dp[i][j] = LCS length of old[0..i] and new[0..j]
    let mut dp = [[0u8; SMALL_LEN + 1]; SMALL_LEN + 1];

    for i in 1..=n {
        for j in 1..=m {
            dp[i][j] = if is_same(&old[i - 1], &new[j - 1]) {
                dp[i - 1][j - 1] + 1
            } else {
                dp[i - 1][j].max(dp[i][j - 1])
            };
        }
    }

    let mut pairs = Vec::with_capacity(dp[n][m] as usize);
    let mut i = n;
    let mut j = m;

    while i > 0 && j > 0 {
        if is_same(&old[i - 1], &new[j - 1]) {
            pairs.push((i - 1, j - 1));
            i -= 1;
            j -= 1;
        } else if dp[i - 1][j] >= dp[i][j - 1] {
            i -= 1;
        } else {
            j -= 1;
        }
    }

    pairs.reverse();
    pairs
}

// =============================================================================
// Tests
// =============================================================================
