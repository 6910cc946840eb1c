//! Test utilities for ring_puzzle_solver
//!
//! Provides a brute-force reference solver and fixtures used across the
//! crate's test modules.

use crate::engine::{Problem, State};
use std::collections::{HashMap, HashSet, VecDeque};

/// The optimal number of moves from `from` to any goal, found by plain
/// breadth-first search. `None` if no goal is reachable.
pub fn bfs_distance(problem: &Problem, from: &State) -> Option<usize> {
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(from.clone());
    queue.push_back((from.clone(), 0usize));

    while let Some((state, depth)) = queue.pop_front() {
        if problem.is_goal(&state) {
            return Some(depth);
        }
        for next in problem.successors(&state) {
            if visited.insert(next.clone()) {
                queue.push_back((next, depth + 1));
            }
        }
    }
    None
}

/// Every state reachable from the start, with its optimal distance to a goal.
pub fn reachable_distances(problem: &Problem) -> HashMap<State, Option<usize>> {
    let mut seen = HashSet::new();
    let mut queue = VecDeque::new();
    seen.insert(problem.start().clone());
    queue.push_back(problem.start().clone());

    while let Some(state) = queue.pop_front() {
        for next in problem.successors(&state) {
            if seen.insert(next.clone()) {
                queue.push_back(next);
            }
        }
    }

    seen.into_iter()
        .map(|state| {
            let distance = bfs_distance(problem, &state);
            (state, distance)
        })
        .collect()
}

/// A problem solved by a single step left: `2 2 1 _ 1` becomes `2 2 _ 1 1`.
pub fn one_move_problem() -> Problem {
    Problem::new(vec![1, 2, 1, 2, 1], vec![2, 2, 1, 0, 1], 2).unwrap()
}

/// A problem whose goal cannot be reached: with every hop label at 1 the
/// cyclic order of the tokens never changes, and `1 2 1 2` is not `1 1 2 2`.
pub fn unreachable_problem() -> Problem {
    Problem::new(vec![1, 1, 1, 1, 1], vec![1, 2, 1, 2, 0], 2).unwrap()
}

/// A problem with three 1s and one 2: the goal blocks can never form.
pub fn unbalanced_problem() -> Problem {
    Problem::new(vec![1, 2, 1, 2, 1], vec![1, 1, 1, 0, 2], 2).unwrap()
}

/// One step left solves it; the hop label 0 under the empty slot makes both
/// hop moves swap the empty slot with itself.
pub fn zero_label_problem() -> Problem {
    Problem::new(vec![1, 2, 1, 0, 1], vec![2, 2, 1, 0, 1], 2).unwrap()
}
