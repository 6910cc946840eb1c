//! Admissible estimates of the number of moves left to reach a goal.
//!
//! Every heuristic implements `Heuristic`. Heuristics that need global
//! information about a problem compute it once in `Heuristic::initialize`,
//! which must be called before the first `Heuristic::estimate`.
use crate::engine::{group_size_for_ring, Disk, Problem, State, EMPTY};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// A cost-to-go estimator used by the search engines.
pub trait Heuristic {
    /// Precomputes anything the estimator needs for `problem`.
    ///
    /// Called exactly once, before any call to `estimate`. The default does nothing.
    fn initialize(&mut self, _problem: &Problem) {}

    /// Returns a lower bound on the number of moves from `state` to a goal.
    fn estimate(&self, state: &State) -> u32;

    /// Returns a short name for reports.
    fn name(&self) -> &'static str;
}

/// Always estimates 0. Turns A* into uniform-cost search.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZeroHeuristic;

impl Heuristic for ZeroHeuristic {
    fn estimate(&self, _state: &State) -> u32 {
        0
    }

    fn name(&self) -> &'static str {
        "zero"
    }
}

/// Counts the tokens that differ from the goal pattern when the goal is
/// aligned as if the empty slot were at `reference`.
///
/// The `group_size * group_size` positions following `reference` are compared
/// with the block pattern `1, .., 1, 2, .., group_size`. A position holding
/// the empty token always counts as misplaced.
///
/// # Arguments
/// * `state`: The layout to inspect.
/// * `reference`: The hypothetical empty-slot position.
/// * `group_size`: The block size `n`.
///
/// # Returns
/// The number of mismatching positions, between 0 and `group_size * group_size`.
pub fn misplaced_count(state: &State, reference: usize, group_size: usize) -> u32 {
    let len = state.len();
    let small = state.small();
    (0..group_size * group_size)
        .filter(|&offset| {
            let expected = (offset / group_size + 1) as Disk;
            small[(reference + 1 + offset) % len] != expected
        })
        .count() as u32
}

/// Estimates the number of misplaced tokens under the best-fitting goal alignment.
///
/// The final position of the empty slot is not known in advance, so every
/// alignment is tried and the smallest count is returned. A move changes the
/// contents of two positions, the old empty slot and its destination. The
/// destination always ends up holding the empty token, so under any fixed
/// alignment a move fixes at most one position and the estimate never exceeds
/// the true distance.
#[derive(Clone, Copy, Debug, Default)]
pub struct MisplacedCountHeuristic;

impl Heuristic for MisplacedCountHeuristic {
    fn estimate(&self, state: &State) -> u32 {
        let group_size = group_size_for_ring(state.len())
            .expect("state length must be group_size * group_size + 1");

        (0..state.len())
            .map(|reference| misplaced_count(state, reference, group_size))
            .min()
            .unwrap_or(0)
    }

    fn name(&self) -> &'static str {
        "misplaced"
    }
}

/// All-pairs minimum hop counts between ring positions.
///
/// Position `i` is connected to `i ± 1` and `i ± large[i]`. Edges are
/// treated as undirected: a move carries a token from the destination back
/// into the empty slot, which is the reverse of the edge the empty slot used.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HopTable {
    size: usize,
    distances: Vec<u32>,
}

impl HopTable {
    /// Builds the table with one breadth-first search per position.
    ///
    /// # Arguments
    /// * `large`: The hop label of every ring position.
    ///
    /// # Returns
    /// A `HopTable` of `large.len() * large.len()` entries. Pairs that cannot
    /// reach each other hold `u32::MAX`; on a ring the `± 1` edges make every
    /// position reachable, so this only happens for an empty ring.
    pub fn build(large: &[Disk]) -> Self {
        let size = large.len();
        let mut neighbors: Vec<Vec<usize>> = vec![Vec::with_capacity(8); size];

        for (i, &label) in large.iter().enumerate() {
            let label = label as usize % size;
            let forward = [
                (i + 1) % size,
                (i + size - 1) % size,
                (i + label) % size,
                (i + size - label) % size,
            ];
            for j in forward {
                if j != i {
                    neighbors[i].push(j);
                    neighbors[j].push(i);
                }
            }
        }

        let mut distances = vec![u32::MAX; size * size];
        let mut queue = VecDeque::with_capacity(size);

        for source in 0..size {
            let row = &mut distances[source * size..(source + 1) * size];
            row[source] = 0;
            queue.push_back(source);

            while let Some(current) = queue.pop_front() {
                let next_cost = row[current] + 1;
                for &neighbor in &neighbors[current] {
                    if row[neighbor] == u32::MAX {
                        row[neighbor] = next_cost;
                        queue.push_back(neighbor);
                    }
                }
            }
        }

        HopTable { size, distances }
    }

    /// Returns the number of positions covered by the table.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the minimum number of hops between two positions.
    ///
    /// # Panics
    /// Panics if either position is outside the table.
    pub fn distance(&self, from: usize, to: usize) -> u32 {
        assert!(from < self.size && to < self.size, "position outside hop table");
        self.distances[from * self.size + to]
    }
}

// Per rotation, value and position: hops to the nearest goal position of that value.
#[derive(Clone, Debug)]
struct GoalDistances {
    ring_size: usize,
    group_size: usize,
    nearest: Vec<u32>,
}

impl GoalDistances {
    fn new(hops: &HopTable, group_size: usize) -> Self {
        let ring_size = hops.size();
        let mut nearest = Vec::with_capacity(ring_size * group_size * ring_size);

        for rotation in 0..ring_size {
            for value in 1..=group_size {
                let block_start = rotation + 1 + group_size * (value - 1);
                for position in 0..ring_size {
                    let best = (0..group_size)
                        .map(|i| hops.distance(position, (block_start + i) % ring_size))
                        .min()
                        .unwrap_or(0);
                    nearest.push(best);
                }
            }
        }

        GoalDistances {
            ring_size,
            group_size,
            nearest,
        }
    }

    fn get(&self, rotation: usize, value: Disk, position: usize) -> u32 {
        let row = rotation * self.group_size + (value as usize - 1);
        self.nearest[row * self.ring_size + position]
    }
}

/// Sums, for every token, the hop distance to the nearest goal position of
/// its value, minimised over all goal rotations.
///
/// Each move carries exactly one token across one edge of the hop graph, so
/// for a fixed rotation the sum drops by at most 1 per move. Interference
/// between tokens is ignored, which only makes the true cost larger.
///
/// The hop table depends only on the hop labels; `initialize` builds it once
/// per problem.
#[derive(Clone, Debug, Default)]
pub struct HopHeuristic {
    hops: Option<HopTable>,
    goals: Option<GoalDistances>,
}

impl HopHeuristic {
    /// Creates an uninitialized hop heuristic.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the precomputed hop table, if `initialize` has run.
    pub fn hop_table(&self) -> Option<&HopTable> {
        self.hops.as_ref()
    }
}

impl Heuristic for HopHeuristic {
    fn initialize(&mut self, problem: &Problem) {
        let hops = HopTable::build(problem.hop_labels());
        let goals = GoalDistances::new(&hops, problem.group_size());
        debug!(
            event = "hop_table_built",
            positions = hops.size(),
            group_size = problem.group_size(),
        );
        self.hops = Some(hops);
        self.goals = Some(goals);
    }

    fn estimate(&self, state: &State) -> u32 {
        let goals = self
            .goals
            .as_ref()
            .expect("HopHeuristic::estimate called before initialize");
        assert_eq!(state.len(), goals.ring_size, "state does not match the initialized problem");

        let mut best = u32::MAX;
        for rotation in 0..goals.ring_size {
            let mut total = 0u32;
            for (position, &disk) in state.small().iter().enumerate() {
                if disk == EMPTY {
                    continue;
                }
                total = total.saturating_add(goals.get(rotation, disk, position));
                if total >= best {
                    break;
                }
            }
            best = best.min(total);
        }
        best
    }

    fn name(&self) -> &'static str {
        "hop"
    }
}

/// The available heuristics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeuristicKind {
    Zero,
    Misplaced,
    Hop,
}

impl HeuristicKind {
    /// Every kind, weakest first.
    pub const ALL: [HeuristicKind; 3] = [HeuristicKind::Zero, HeuristicKind::Misplaced, HeuristicKind::Hop];

    /// Creates an uninitialized heuristic of this kind.
    pub fn create(self) -> Box<dyn Heuristic> {
        match self {
            HeuristicKind::Zero => Box::new(ZeroHeuristic),
            HeuristicKind::Misplaced => Box::new(MisplacedCountHeuristic),
            HeuristicKind::Hop => Box::new(HopHeuristic::new()),
        }
    }

    /// Creates a heuristic of this kind and initializes it for `problem`.
    pub fn create_for(self, problem: &Problem) -> Box<dyn Heuristic> {
        let mut heuristic = self.create();
        heuristic.initialize(problem);
        heuristic
    }

    fn as_str(self) -> &'static str {
        match self {
            HeuristicKind::Zero => "zero",
            HeuristicKind::Misplaced => "misplaced",
            HeuristicKind::Hop => "hop",
        }
    }
}

impl fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HeuristicKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zero" => Ok(HeuristicKind::Zero),
            "misplaced" => Ok(HeuristicKind::Misplaced),
            "hop" => Ok(HeuristicKind::Hop),
            other => Err(format!(
                "unknown heuristic '{}', expected one of: zero, misplaced, hop",
                other
            )),
        }
    }
}
