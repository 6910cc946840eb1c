//! # Ring Puzzle Solver Library
//!
//! This library models a rotation puzzle played on a ring of `n * n + 1`
//! positions and finds minimum-length solutions for it.
//!
//! Every ring position carries a fixed hop label. The ring holds `n` copies of
//! each token `1..=n` and one empty slot. A move swaps the empty slot with the
//! position one hop label away in either direction, or, when the label is not
//! 1, with a direct neighbour. The puzzle is solved when the tokens following
//! the empty slot form `n` blocks of `n` equal tokens in increasing order.
//!
//! It is used by two binaries:
//! - `ring_solver`: Reads a puzzle file and prints an optimal solution.
//! - `heuristic_evaluator`: Compares the heuristics on seeded random instances.
//!
//! ## Modules
//! - `engine`: The puzzle model (`State`, `Problem`, `Move`), successor generation and the goal test.
//! - `error`: Construction and parsing errors.
//! - `heuristics`: The `Heuristic` trait and the zero, misplaced-count and hop estimators.
//! - `solver`: The best-first `AStar` engine, search results and the `solve` entry point.
//! - `ida_star`: The iterative-deepening `IdaStar` engine.
//! - `utils`: Parsing puzzle descriptions and generating random instances.
//!
//! ## Example
//!
//! ```
//! use ring_puzzle_solver::engine::Problem;
//! use ring_puzzle_solver::heuristics::{Heuristic, HopHeuristic};
//! use ring_puzzle_solver::ida_star::IdaStar;
//!
//! let problem = Problem::new(vec![1, 2, 1, 2, 1], vec![2, 2, 1, 0, 1], 2).unwrap();
//! let mut heuristic = HopHeuristic::new();
//! heuristic.initialize(&problem);
//!
//! let path = IdaStar::new(&problem, &heuristic).solve();
//! assert_eq!(path.len(), 2);
//! assert!(problem.is_goal(&path[1]));
//! ```

pub mod engine;
pub mod error;
pub mod heuristics;
pub mod ida_star;
pub mod solver;
pub mod utils;

#[cfg(test)]
mod test_utils;
