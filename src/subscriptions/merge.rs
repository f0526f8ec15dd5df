//! Union of sorted namespace sets.

use crate::types::NamespaceId;

/// Merge two sorted, duplicate-free namespace vectors into their sorted,
/// duplicate-free union.
///
/// When one input already contains every element of the other, that input is
/// returned as-is, without allocating. Renewals usually ask for namespaces the
/// subscription already has, so this is the common path.
pub fn merge_namespaces(mut a: Vec<NamespaceId>, mut b: Vec<NamespaceId>) -> Vec<NamespaceId> {
    // The union starts with the smaller head, so only the vector holding it
    // can be a superset. Make that `a`.
    if let Some(&b0) = b.first() {
        if a.first().map_or(true, |&a0| b0 < a0) {
            std::mem::swap(&mut a, &mut b);
        }
    }

    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if b[j] > a[i] {
            // Only in `a`: still a superset candidate.
            i += 1;
        } else if b[j] == a[i] {
            i += 1;
            j += 1;
        } else {
            break;
        }
    }
    if j == b.len() {
        return a;
    }

    let mut c = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] < b[j] {
            c.push(a[i]);
            i += 1;
        } else if a[i] == b[j] {
            c.push(a[i]);
            i += 1;
            j += 1;
        } else {
            c.push(b[j]);
            j += 1;
        }
    }
    c.extend_from_slice(&a[i..]);
    c.extend_from_slice(&b[j..]);
    c
}

/// True if `namespaces` is strictly ascending (sorted with no duplicates).
pub fn is_sorted_unique(namespaces: &[NamespaceId]) -> bool {
    namespaces.windows(2).all(|w| w[0] < w[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ns(v: &[i16]) -> Vec<NamespaceId> {
        v.iter().copied().map(NamespaceId).collect()
    }

    #[test]
    fn test_subset_returns_superset_allocation() {
        let a = ns(&[1, 3, 5]);
        let ptr = a.as_ptr();
        let merged = merge_namespaces(a, ns(&[3]));
        assert_eq!(merged, ns(&[1, 3, 5]));
        assert_eq!(merged.as_ptr(), ptr);
    }

    #[test]
    fn test_superset_in_second_position() {
        let b = ns(&[1, 3, 5]);
        let ptr = b.as_ptr();
        let merged = merge_namespaces(ns(&[5]), b);
        assert_eq!(merged.as_ptr(), ptr);
        assert_eq!(merged, ns(&[1, 3, 5]));
    }

    #[test]
    fn test_interleaved() {
        assert_eq!(merge_namespaces(ns(&[1, 3]), ns(&[2, 4])), ns(&[1, 2, 3, 4]));
    }

    #[test]
    fn test_overlapping_tail() {
        assert_eq!(merge_namespaces(ns(&[1, 2]), ns(&[2, 3])), ns(&[1, 2, 3]));
        assert_eq!(merge_namespaces(ns(&[2, 3]), ns(&[1, 2])), ns(&[1, 2, 3]));
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(merge_namespaces(vec![], vec![]), ns(&[]));
        assert_eq!(merge_namespaces(ns(&[4]), vec![]), ns(&[4]));
        assert_eq!(merge_namespaces(vec![], ns(&[-2, 4])), ns(&[-2, 4]));
    }

    #[test]
    fn test_equal_heads_subset_fails_late() {
        // Same head, but `b` holds 4 which `a` lacks.
        assert_eq!(merge_namespaces(ns(&[1, 3]), ns(&[1, 4])), ns(&[1, 3, 4]));
    }

    #[test]
    fn test_idempotent() {
        let a = ns(&[-5, 0, 7]);
        assert_eq!(merge_namespaces(a.clone(), a.clone()), a);
    }

    #[test]
    fn test_is_sorted_unique() {
        assert!(is_sorted_unique(&ns(&[])));
        assert!(is_sorted_unique(&ns(&[-1, 0, 9])));
        assert!(!is_sorted_unique(&ns(&[1, 1])));
        assert!(!is_sorted_unique(&ns(&[2, 1])));
    }
}
