//! Support recomputation and anti-monotonicity checks shared by every engine.

use std::collections::HashSet;

use crate::schema::{GradualItem, Pattern};

use super::bitmap::{Bitmap, BitmapProvider, pair_support};

/// Breadth-first confirmation of a candidate pattern.
///
/// Items are committed in order while the running support stays at or above
/// the threshold; items that would break it are skipped. Fewer than two
/// surviving items means the candidate is invalid, and the input pattern is
/// returned unchanged.
pub fn validate(pattern: &Pattern, provider: &dyn BitmapProvider) -> Pattern {
    let min_support = provider.min_support();
    let mut confirmed = Pattern::new();
    let mut accumulated: Option<Bitmap> = None;

    for item in pattern.items() {
        let Some(bitmap) = provider.bitmap(item) else {
            continue;
        };
        match &accumulated {
            None => {
                accumulated = Some(bitmap.clone());
                confirmed.add_item(*item);
            }
            Some(acc) => {
                let candidate = acc.and(bitmap);
                let support = provider.support(&candidate);
                if support >= min_support && confirmed.set_support(support) {
                    accumulated = Some(candidate);
                    confirmed.add_item(*item);
                }
            }
        }
    }

    if confirmed.len() <= 1 {
        pattern.clone()
    } else {
        confirmed
    }
}

/// [`validate`] over row-pair sets instead of bitmaps.
///
/// Each item's bitmap is decomposed into its `(i, j)` edges and the running
/// set is intersected item by item, with the same greedy acceptance rule.
pub fn validate_tree(pattern: &Pattern, provider: &dyn BitmapProvider) -> Pattern {
    let min_support = provider.min_support();
    let row_count = provider.row_count();
    let mut confirmed = Pattern::new();
    let mut tids: Option<HashSet<(usize, usize)>> = None;

    for item in pattern.items() {
        let Some(bitmap) = provider.bitmap(item) else {
            continue;
        };
        let edges: HashSet<(usize, usize)> = bitmap.pairs().collect();
        match &tids {
            None => {
                tids = Some(edges);
                confirmed.add_item(*item);
            }
            Some(current) => {
                let common: HashSet<(usize, usize)> = current.intersection(&edges).copied().collect();
                let support = pair_support(common.len(), row_count);
                if support >= min_support && confirmed.set_support(support) {
                    tids = Some(common);
                    confirmed.add_item(*item);
                }
            }
        }
    }

    if confirmed.len() <= 1 {
        pattern.clone()
    } else {
        confirmed
    }
}

/// Anti-monotonicity check.
///
/// With `subset` set: true if the pattern, or its inverse, is a subset of some
/// existing pattern. Otherwise: true if it is a superset of one.
pub fn is_subset_or_superset<P: AsRef<Pattern>>(pattern: &Pattern, existing: &[P], subset: bool) -> bool {
    let items = pattern.item_set();
    let inverse = pattern.inverse_set();
    existing.iter().any(|other| {
        let other = other.as_ref().item_set();
        if subset {
            items.is_subset(&other) || inverse.is_subset(&other)
        } else {
            items.is_superset(&other) || inverse.is_superset(&other)
        }
    })
}

/// True if the pattern, or its inverse, equals a member of either list.
pub fn is_duplicate<P: AsRef<Pattern>>(pattern: &Pattern, accepted: &[P], rejected: Option<&[P]>) -> bool {
    position_of_duplicate(pattern, accepted).is_some()
        || rejected.is_some_and(|r| position_of_duplicate(pattern, r).is_some())
}

/// Index of the first pattern equivalent to `pattern` (itself or its inverse).
pub fn position_of_duplicate<P: AsRef<Pattern>>(pattern: &Pattern, list: &[P]) -> Option<usize> {
    let items = pattern.item_set();
    let inverse = pattern.inverse_set();
    list.iter().position(|other| {
        let other = other.as_ref().item_set();
        other == items || other == inverse
    })
}

/// Drop every accepted pattern whose items, or inverted items, fall inside
/// `new_items`.
pub fn prune_subsumed<P: AsRef<Pattern>>(accepted: &mut Vec<P>, new_items: &HashSet<GradualItem>) {
    accepted.retain(|p| {
        let p = p.as_ref();
        !(p.item_set().is_subset(new_items) || p.inverse_set().is_subset(new_items))
    });
}
