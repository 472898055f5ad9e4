use std::convert::Infallible;

use tracing::debug;

use crate::error::MetricsError;
use crate::models::RelationPair;

/// Find every pair of items for which `is_related` holds, comparing each item
/// against all items before it.
///
/// `is_related(earlier, later)` is always called with `earlier` positioned
/// before `later` in `items`. The items are not sorted here; order them along
/// the axis the relation cares about before calling.
pub fn find_related<'a, T, R>(items: &'a [T], mut is_related: R) -> Vec<RelationPair<&'a T>>
where
    R: FnMut(&T, &T) -> bool,
{
    let no_pruning: Option<fn(&T, &T) -> Result<bool, Infallible>> = None;
    let result = sweep(items, |a, b| Ok::<_, Infallible>(is_related(a, b)), no_pruning);
    match result {
        Ok(pairs) => to_pairs(items, pairs),
        Err(never) => match never {},
    }
}

/// Like [`find_related`], dropping candidates that `is_possibly_related`
/// rules out.
///
/// `is_possibly_related(later, candidate)` must be monotone: once it returns
/// false for a candidate, that candidate can not be related to `later` nor to
/// any item after it. The candidate is never compared again.
pub fn find_related_pruned<'a, T, R, P>(
    items: &'a [T],
    mut is_related: R,
    mut is_possibly_related: P,
) -> Vec<RelationPair<&'a T>>
where
    R: FnMut(&T, &T) -> bool,
    P: FnMut(&T, &T) -> bool,
{
    let result = sweep(
        items,
        |a, b| Ok::<_, Infallible>(is_related(a, b)),
        Some(|later: &T, candidate: &T| Ok(is_possibly_related(later, candidate))),
    );
    match result {
        Ok(pairs) => to_pairs(items, pairs),
        Err(never) => match never {},
    }
}

/// Fallible form of [`find_related`]. The first predicate error aborts the
/// sweep and is returned as is.
pub fn try_find_related<'a, T, E, R>(
    items: &'a [T],
    is_related: R,
) -> Result<Vec<RelationPair<&'a T>>, E>
where
    R: FnMut(&T, &T) -> Result<bool, E>,
{
    let no_pruning: Option<fn(&T, &T) -> Result<bool, E>> = None;
    let pairs = sweep(items, is_related, no_pruning)?;
    Ok(to_pairs(items, pairs))
}

/// Fallible form of [`find_related_pruned`].
pub fn try_find_related_pruned<'a, T, E, R, P>(
    items: &'a [T],
    is_related: R,
    is_possibly_related: P,
) -> Result<Vec<RelationPair<&'a T>>, E>
where
    R: FnMut(&T, &T) -> Result<bool, E>,
    P: FnMut(&T, &T) -> Result<bool, E>,
{
    let pairs = sweep(items, is_related, Some(is_possibly_related))?;
    Ok(to_pairs(items, pairs))
}

/// Run the pruned sweep and an exhaustive sweep and make sure they agree.
///
/// Meant for tests and small inputs: it costs a full O(n²) pass, and exists to
/// catch a pruning predicate that is not monotone.
pub fn find_related_checked<'a, T, R, P>(
    items: &'a [T],
    mut is_related: R,
    mut is_possibly_related: P,
) -> crate::Result<Vec<RelationPair<&'a T>>>
where
    R: FnMut(&T, &T) -> bool,
    P: FnMut(&T, &T) -> bool,
{
    let no_pruning: Option<fn(&T, &T) -> Result<bool, Infallible>> = None;
    let exhaustive = match sweep(items, |a, b| Ok::<_, Infallible>(is_related(a, b)), no_pruning) {
        Ok(pairs) => pairs,
        Err(never) => match never {},
    };
    let pruned = match sweep(
        items,
        |a, b| Ok::<_, Infallible>(is_related(a, b)),
        Some(|later: &T, candidate: &T| Ok(is_possibly_related(later, candidate))),
    ) {
        Ok(pairs) => pairs,
        Err(never) => match never {},
    };

    if pruned != exhaustive {
        return Err(MetricsError::PruningMismatch {
            pruned: pruned.len(),
            exhaustive: exhaustive.len(),
        });
    }

    Ok(to_pairs(items, pruned))
}

/// Single pass over `items` keeping a window of candidate earlier items.
///
/// Returns `(earlier, later)` index pairs ordered by `later`, then by
/// `earlier` (oldest candidate first).
fn sweep<T, E, R, P>(
    items: &[T],
    mut is_related: R,
    mut is_possibly_related: Option<P>,
) -> Result<Vec<(usize, usize)>, E>
where
    R: FnMut(&T, &T) -> Result<bool, E>,
    P: FnMut(&T, &T) -> Result<bool, E>,
{
    let mut related = Vec::new();
    if items.len() < 2 {
        return Ok(related);
    }

    // the first item has nothing before it to compare against
    let mut candidates: Vec<usize> = vec![0];
    let mut max_window = 1usize;
    let mut comparisons = 0usize;

    for (test_idx, test_item) in items.iter().enumerate().skip(1) {
        if let Some(keep) = is_possibly_related.as_mut() {
            let mut kept = Vec::with_capacity(candidates.len() + 1);
            for &c in &candidates {
                if keep(test_item, &items[c])? {
                    kept.push(c);
                }
            }
            candidates = kept;
        }

        for &c in &candidates {
            comparisons += 1;
            if is_related(&items[c], test_item)? {
                related.push((c, test_idx));
            }
        }

        candidates.push(test_idx);
        max_window = max_window.max(candidates.len());
    }

    debug!(
        "Swept {} items: {} comparisons, max window {}, {} related pairs",
        items.len(),
        comparisons,
        max_window,
        related.len()
    );

    Ok(related)
}

fn to_pairs<T>(items: &[T], pairs: Vec<(usize, usize)>) -> Vec<RelationPair<&T>> {
    pairs
        .into_iter()
        .map(|(earlier, later)| RelationPair::new(&items[earlier], &items[later]))
        .collect()
}
