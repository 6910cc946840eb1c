//! Best-first (A*) search and the types shared by both search engines.
//!
//! `AStar` keeps every node it creates in an arena and links each node to its
//! parent by index. The frontier is a binary heap without decrease-key: when a
//! cheaper path to a known state turns up, the arena node is updated in place
//! and pushed again, and the outdated heap entry is discarded when popped.
use crate::engine::{Problem, State};
use crate::heuristics::Heuristic;
use crate::ida_star::IdaStar;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// Counters for a single IDA* threshold pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IterationStats {
    /// The f-cost bound of this pass.
    pub threshold: u32,
    /// Nodes whose successors were generated.
    pub expanded: u64,
    /// Successor states produced.
    pub generated: u64,
    /// Nodes cut off because their f-cost exceeded the threshold.
    pub pruned: u64,
}

/// Diagnostic counters collected during a search. They never affect the result.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes whose successors were generated.
    pub expanded: u64,
    /// Successor states produced.
    pub generated: u64,
    /// Nodes cut off by the IDA* bound.
    pub pruned: u64,
    /// Closed A* nodes put back on the frontier after a cheaper path was found.
    pub reopened: u64,
    /// Outdated A* frontier entries skipped when popped.
    pub stale: u64,
    /// One entry per IDA* threshold pass. Empty for A*.
    pub iterations: Vec<IterationStats>,
}

/// The result of a search.
#[derive(Clone, Debug)]
pub struct Solution {
    /// States from start to goal, both included. Empty if no goal is reachable.
    pub states: Vec<State>,
    /// Counters collected while searching.
    pub stats: SearchStats,
}

impl Solution {
    /// Returns `true` if a goal was reached.
    pub fn is_solved(&self) -> bool {
        !self.states.is_empty()
    }

    /// Returns the number of moves in the solution, or `None` if there is none.
    pub fn move_count(&self) -> Option<usize> {
        self.states.len().checked_sub(1)
    }
}

/// Handle of a node in the A* arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct NodeId(usize);

#[derive(Debug)]
struct Node {
    state: State,
    g: u32,
    h: u32,
    parent: Option<NodeId>,
    closed: bool,
}

impl Node {
    fn f(&self) -> u32 {
        self.g + self.h
    }
}

/// A frontier entry. `g` records the cost the node had when pushed, so an
/// entry whose node has since been improved can be recognised as stale.
#[derive(Debug, PartialEq, Eq)]
struct OpenEntry {
    f: u32,
    h: u32,
    g: u32,
    id: NodeId,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap, the lowest f must come out first.
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.h.cmp(&self.h))
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Best-first search with an open list, a closed set and node reopening.
///
/// Nodes are expanded in non-decreasing f order. With an admissible heuristic
/// the first goal popped is optimal; reopening keeps this true even when the
/// heuristic is not consistent.
pub struct AStar<'a, H: Heuristic + ?Sized> {
    problem: &'a Problem,
    heuristic: &'a H,
}

impl<'a, H: Heuristic + ?Sized> AStar<'a, H> {
    /// Creates a search over `problem`. `heuristic` must already be initialized.
    pub fn new(problem: &'a Problem, heuristic: &'a H) -> Self {
        AStar { problem, heuristic }
    }

    /// Finds a shortest sequence of states from the start to a goal.
    ///
    /// Returns an empty vector if no goal is reachable.
    pub fn solve(&self) -> Vec<State> {
        self.solve_with_debug(false)
    }

    /// Same as `solve`; when `debug` is set the search counters are logged.
    pub fn solve_with_debug(&self, debug: bool) -> Vec<State> {
        self.search(debug).states
    }

    /// Runs the search and returns the path together with its counters.
    pub fn search(&self, debug: bool) -> Solution {
        let mut stats = SearchStats::default();
        let mut store: Vec<Node> = Vec::new();
        let mut best_by_state: HashMap<State, NodeId> = HashMap::new();
        let mut frontier = BinaryHeap::new();

        let start = self.problem.start().clone();
        let h = self.heuristic.estimate(&start);
        best_by_state.insert(start.clone(), NodeId(0));
        store.push(Node {
            state: start,
            g: 0,
            h,
            parent: None,
            closed: false,
        });
        frontier.push(OpenEntry {
            f: h,
            h,
            g: 0,
            id: NodeId(0),
        });

        while let Some(entry) = frontier.pop() {
            let current = &store[entry.id.0];
            if entry.g != current.g || current.closed {
                stats.stale += 1;
                continue;
            }

            if self.problem.is_goal(&current.state) {
                let states = reconstruct_path(&store, entry.id);
                if debug {
                    info!(
                        event = "astar_solved",
                        moves = states.len() - 1,
                        expanded = stats.expanded,
                        generated = stats.generated,
                        reopened = stats.reopened,
                        stale = stats.stale,
                        stored = store.len(),
                    );
                }
                return Solution { states, stats };
            }

            store[entry.id.0].closed = true;
            stats.expanded += 1;

            let child_g = store[entry.id.0].g + 1;
            let children = self.problem.successors(&store[entry.id.0].state);

            for child in children {
                stats.generated += 1;
                let known = best_by_state.get(&child).copied();

                match known {
                    Some(id) if store[id.0].g <= child_g => {
                        // No improvement.
                    }
                    Some(id) => {
                        let node = &mut store[id.0];
                        if node.closed {
                            node.closed = false;
                            stats.reopened += 1;
                        }
                        node.g = child_g;
                        node.parent = Some(entry.id);
                        frontier.push(OpenEntry {
                            f: node.f(),
                            h: node.h,
                            g: node.g,
                            id,
                        });
                    }
                    None => {
                        let id = NodeId(store.len());
                        let h = self.heuristic.estimate(&child);
                        best_by_state.insert(child.clone(), id);
                        store.push(Node {
                            state: child,
                            g: child_g,
                            h,
                            parent: Some(entry.id),
                            closed: false,
                        });
                        frontier.push(OpenEntry {
                            f: child_g + h,
                            h,
                            g: child_g,
                            id,
                        });
                    }
                }
            }
        }

        if debug {
            info!(
                event = "astar_exhausted",
                expanded = stats.expanded,
                generated = stats.generated,
                reopened = stats.reopened,
                stale = stats.stale,
                stored = store.len(),
            );
        }
        Solution {
            states: Vec::new(),
            stats,
        }
    }
}

fn reconstruct_path(store: &[Node], goal: NodeId) -> Vec<State> {
    let mut states = Vec::new();
    let mut cursor = Some(goal);
    while let Some(id) = cursor {
        let node = &store[id.0];
        states.push(node.state.clone());
        cursor = node.parent;
    }
    states.reverse();
    states
}

/// The available search engines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    AStar,
    IdaStar,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Algorithm::AStar => "astar",
            Algorithm::IdaStar => "ida",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "astar" | "a*" => Ok(Algorithm::AStar),
            "ida" | "idastar" | "ida*" => Ok(Algorithm::IdaStar),
            other => Err(format!("unknown algorithm '{}', expected astar or ida", other)),
        }
    }
}

/// Solves `problem` with the chosen engine.
///
/// # Arguments
/// * `problem`: The puzzle instance.
/// * `heuristic`: An initialized heuristic for `problem`.
/// * `algorithm`: Which search engine to run.
/// * `debug`: Whether to log the search counters.
///
/// # Returns
/// The `Solution`, whose `states` are empty if the goal is unreachable.
pub fn solve<H: Heuristic + ?Sized>(
    problem: &Problem,
    heuristic: &H,
    algorithm: Algorithm,
    debug: bool,
) -> Solution {
    match algorithm {
        Algorithm::AStar => AStar::new(problem, heuristic).search(debug),
        Algorithm::IdaStar => IdaStar::new(problem, heuristic).search(debug),
    }
}
