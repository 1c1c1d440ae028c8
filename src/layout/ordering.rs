//! Box-ordering search
//!
//! Finds a left-to-right sequence of boxes minimizing the number of
//! backward (feedback) lines. Full permutation search is infeasible
//! beyond a handful of boxes, so the search is incremental: boxes are
//! taken in static precedence order and each is inserted at the best
//! position among those already placed, regenerating the candidate line
//! set to count feedback at every position.

use crate::layout::diagram::Diagram;

/// Compute the box ordering as a permutation of stable box indices
pub(crate) fn search(diagram: &Diagram) -> Vec<usize> {
    let mut pending: Vec<usize> = (0..diagram.boxes().len()).collect();
    // heavy producers first, heavy consumers last; declaration order
    // breaks ties (stable sort)
    pending.sort_by_key(|&i| diagram.boxes()[i].precedence_key());

    let mut placed: Vec<usize> = Vec::new();
    let mut best_seen: Option<usize> = None;

    for candidate_box in pending {
        let mut best: Option<(usize, usize)> = None;
        for position in 0..=placed.len() {
            let mut attempt = placed.clone();
            attempt.insert(position, candidate_box);
            let count = diagram.backward_count(&attempt);
            if best.map_or(true, |(c, _)| count < c) {
                best = Some((count, position));
            }
            // placing one more box can never reduce the feedback count,
            // so matching the previous arrangement's count is already
            // minimal for this scan
            if best_seen.is_some_and(|seen| count <= seen) {
                break;
            }
        }
        let (count, position) = best.expect("at least one insertion position");
        placed.insert(position, candidate_box);
        best_seen = Some(count);
    }

    placed
}
