//! Iterative-deepening A* (IDA*).
//!
//! IDA* runs a series of depth-first searches, each bounded by a threshold on
//! `f = g + h`. A pass prunes every node whose f exceeds the threshold and
//! remembers the smallest such f; if the pass finds no goal, that value
//! becomes the next threshold. Memory stays proportional to the depth of the
//! current path since no global open or closed list is kept.
use crate::engine::{Problem, State};
use crate::heuristics::Heuristic;
use crate::solver::{IterationStats, SearchStats, Solution};
use std::collections::HashSet;
use tracing::info;

/// Outcome of a bounded depth-first pass over a subtree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Bound {
    /// A goal was reached; the path stack holds the solution.
    Found,
    /// No goal within the threshold; the smallest f-cost that exceeded it.
    Exceeded(u32),
    /// No goal and nothing was pruned: the subtree is fully explored.
    Exhausted,
}

impl Bound {
    fn lower(self, other: Bound) -> Bound {
        match (self, other) {
            (Bound::Found, _) | (_, Bound::Found) => Bound::Found,
            (Bound::Exceeded(a), Bound::Exceeded(b)) => Bound::Exceeded(a.min(b)),
            (Bound::Exceeded(a), Bound::Exhausted) | (Bound::Exhausted, Bound::Exceeded(a)) => {
                Bound::Exceeded(a)
            }
            (Bound::Exhausted, Bound::Exhausted) => Bound::Exhausted,
        }
    }
}

/// Iterative-deepening search over a problem.
///
/// Cycles are avoided by never stepping onto a state already on the current
/// path. Moves that undo the previous move always lead back to the parent,
/// which is on the path, so they are skipped by the same check.
pub struct IdaStar<'a, H: Heuristic + ?Sized> {
    problem: &'a Problem,
    heuristic: &'a H,
}

impl<'a, H: Heuristic + ?Sized> IdaStar<'a, H> {
    /// Creates a search over `problem`. `heuristic` must already be initialized.
    pub fn new(problem: &'a Problem, heuristic: &'a H) -> Self {
        IdaStar { problem, heuristic }
    }

    /// Finds a shortest sequence of states from the start to a goal.
    ///
    /// Returns an empty vector if no goal is reachable.
    pub fn solve(&self) -> Vec<State> {
        self.solve_with_debug(false)
    }

    /// Same as `solve`; when `debug` is set each pass is logged with its
    /// threshold and its expanded and pruned counts.
    pub fn solve_with_debug(&self, debug: bool) -> Vec<State> {
        self.search(debug).states
    }

    /// Runs the search and returns the path together with per-pass counters.
    pub fn search(&self, debug: bool) -> Solution {
        let start = self.problem.start().clone();
        let mut threshold = self.heuristic.estimate(&start);

        let mut path = Vec::with_capacity(64);
        let mut on_path = HashSet::new();
        path.push(start.clone());
        on_path.insert(start);

        let mut stats = SearchStats::default();

        loop {
            let mut pass = IterationStats {
                threshold,
                ..IterationStats::default()
            };
            let outcome = self.bounded_dfs(0, threshold, &mut path, &mut on_path, &mut pass);

            if debug {
                info!(
                    event = "ida_iteration",
                    iteration = stats.iterations.len(),
                    threshold = pass.threshold,
                    expanded = pass.expanded,
                    pruned = pass.pruned,
                );
            }
            stats.expanded += pass.expanded;
            stats.generated += pass.generated;
            stats.pruned += pass.pruned;
            stats.iterations.push(pass);

            match outcome {
                Bound::Found => {
                    if debug {
                        info!(
                            event = "ida_solved",
                            iterations = stats.iterations.len(),
                            final_threshold = threshold,
                            moves = path.len() - 1,
                            total_expanded = stats.expanded,
                            total_pruned = stats.pruned,
                        );
                    }
                    return Solution { states: path, stats };
                }
                Bound::Exhausted => {
                    if debug {
                        info!(
                            event = "ida_exhausted",
                            iterations = stats.iterations.len(),
                            last_threshold = threshold,
                            total_expanded = stats.expanded,
                            total_pruned = stats.pruned,
                        );
                    }
                    return Solution {
                        states: Vec::new(),
                        stats,
                    };
                }
                Bound::Exceeded(next) => {
                    // Every pass unwinds back to the root before returning.
                    debug_assert_eq!(path.len(), 1);
                    debug_assert_eq!(on_path.len(), 1);
                    threshold = next;
                }
            }
        }
    }

    /// Depth-first search below the last state of `path`, which was reached at cost `g`.
    ///
    /// On `Bound::Found` the path is left holding the solution. Otherwise the
    /// path and `on_path` are restored to what they were on entry.
    fn bounded_dfs(
        &self,
        g: u32,
        threshold: u32,
        path: &mut Vec<State>,
        on_path: &mut HashSet<State>,
        stats: &mut IterationStats,
    ) -> Bound {
        let current = path.last().expect("search path always holds the start state");

        let f = g + self.heuristic.estimate(current);
        if f > threshold {
            stats.pruned += 1;
            return Bound::Exceeded(f);
        }

        if self.problem.is_goal(current) {
            return Bound::Found;
        }

        stats.expanded += 1;
        let children = self.problem.successors(current);
        stats.generated += children.len() as u64;

        let mut result = Bound::Exhausted;
        for child in children {
            if on_path.contains(&child) {
                continue;
            }

            on_path.insert(child.clone());
            path.push(child);

            let outcome = self.bounded_dfs(g + 1, threshold, path, on_path, stats);
            if outcome == Bound::Found {
                return Bound::Found;
            }
            result = result.lower(outcome);

            if let Some(child) = path.pop() {
                on_path.remove(&child);
            }
        }

        result
    }
}
