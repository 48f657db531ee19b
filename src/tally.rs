//! Chance-root tallies.
//!
//! The lightweight sibling of the aggregation engine: the same
//! depth-first traversal, but nothing is materialized; only three
//! running counters survive. Useful for global or per-group statistics
//! when the full tree is not needed.

use serde::Serialize;

use crate::game::GameState;

/// Terminal counts over every branch of a chance root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TallyCounts {
    pub win_first: i32,
    pub win_second: i32,
    pub draws: i32,
    pub chance_branches: usize,
}

/// One group's counts in a split tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SplitSlice {
    pub win_first: i32,
    pub win_second: i32,
    pub draws: i32,
    /// Cumulative branch index at the end of an evenly sized group; on
    /// the trailing remainder slice this is the absolute branch total
    /// instead.
    pub branch_mark: usize,
}

fn count_terminals<S: GameState>(state: &S, acc: &mut (i32, i32, i32)) {
    if state.is_terminal() {
        let (first, _) = state.returns();
        if first > 0.0 {
            acc.0 += 1;
        } else if first < 0.0 {
            acc.1 += 1;
        } else {
            acc.2 += 1;
        }
        return;
    }
    let actions = if state.is_chance_node() {
        state
            .chance_outcomes()
            .into_iter()
            .map(|(action, _)| action)
            .collect()
    } else {
        state.legal_actions()
    };
    for action in actions {
        count_terminals(&state.child(action), acc);
    }
}

/// Count terminal outcomes across all chance branches of `state`.
/// A non-chance root counts nothing.
pub fn tally<S: GameState>(state: &S) -> TallyCounts {
    if !state.is_chance_node() {
        return TallyCounts::default();
    }
    let outcomes = state.chance_outcomes();
    let mut acc = (0, 0, 0);
    for (action, _) in &outcomes {
        count_terminals(&state.child(*action), &mut acc);
    }
    TallyCounts {
        win_first: acc.0,
        win_second: acc.1,
        draws: acc.2,
        chance_branches: outcomes.len(),
    }
}

/// Tally chance branches in `split_count` contiguous groups of
/// `⌊branches / split_count⌋`, snapshotting and resetting the counters
/// after each group. The trailing slice is always emitted, covers the
/// (possibly empty, possibly short) remainder, and carries the absolute
/// branch total as its mark.
pub fn split_tally<S: GameState>(state: &S, split_count: usize) -> Vec<SplitSlice> {
    let mut slices = Vec::with_capacity(split_count + 1);
    let mut acc = (0, 0, 0);
    let mut branch_total = 0;

    if state.is_chance_node() {
        let outcomes = state.chance_outcomes();
        branch_total = outcomes.len();
        let group_len = (branch_total / split_count.max(1)).max(1);

        let mut processed = 0;
        for (action, _) in &outcomes {
            count_terminals(&state.child(*action), &mut acc);
            processed += 1;
            if processed % group_len == 0 {
                slices.push(SplitSlice {
                    win_first: acc.0,
                    win_second: acc.1,
                    draws: acc.2,
                    branch_mark: processed,
                });
                acc = (0, 0, 0);
            }
        }
    }

    slices.push(SplitSlice {
        win_first: acc.0,
        win_second: acc.1,
        draws: acc.2,
        branch_mark: branch_total,
    });
    slices
}
