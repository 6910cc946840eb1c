//! Core model for the ring puzzle.
//!
//! This module defines the puzzle's fundamental components:
//! - `State`: the token layout on the ring, with a cached empty-slot index.
//! - `Problem`: the fixed hop labels, the group size and the starting `State`.
//! - `Move`: the four move operators and the successor generator built on them.
//!
//! A ring of `N = n * n + 1` positions holds `n` copies of each token `1..=n`
//! plus one empty slot (token `0`). A move swaps the empty slot with another
//! position; the puzzle is solved once the `n * n` positions following the
//! empty slot read as `n` blocks of `n` equal tokens in increasing order.
use crate::error::ProblemError;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A token identifier. `EMPTY` marks the empty slot.
pub type Disk = u8;

/// The token value reserved for the empty slot.
pub const EMPTY: Disk = 0;

/// Returns the group size `n` for a ring of `len` positions, if `len == n * n + 1`
/// for some `n >= 1`.
///
/// # Examples
///
/// ```
/// use ring_puzzle_solver::engine::group_size_for_ring;
/// assert_eq!(group_size_for_ring(5), Some(2));
/// assert_eq!(group_size_for_ring(10), Some(3));
/// assert_eq!(group_size_for_ring(6), None);
/// ```
pub fn group_size_for_ring(len: usize) -> Option<usize> {
    let squares = len.checked_sub(1)?;
    let mut n = 0usize;
    while (n + 1) * (n + 1) <= squares {
        n += 1;
    }
    (n > 0 && n * n == squares).then_some(n)
}

/// Returns the ring size `n * n + 1` for group size `n`, or `None` on overflow.
///
/// ```
/// use ring_puzzle_solver::engine::ring_size_for_group;
/// assert_eq!(ring_size_for_group(3), Some(10));
/// assert_eq!(ring_size_for_group(usize::MAX), None);
/// ```
pub fn ring_size_for_group(group_size: usize) -> Option<usize> {
    group_size.checked_mul(group_size)?.checked_add(1)
}

/// Wraps `index + offset` onto a ring of `len` positions.
fn wrap_forward(index: usize, offset: usize, len: usize) -> usize {
    (index + offset % len) % len
}

/// Wraps `index - offset` onto a ring of `len` positions.
fn wrap_backward(index: usize, offset: usize, len: usize) -> usize {
    (index + len - offset % len) % len
}

/// The token layout of the ring.
///
/// Equality and hashing only look at the token sequence, so two states with
/// the same layout are interchangeable no matter how they were reached.
/// States are immutable values: every move produces a new `State`.
#[derive(Clone, Debug)]
pub struct State {
    small: Vec<Disk>,
    zero_index: usize,
}

impl State {
    /// Creates a state from a token layout.
    ///
    /// # Arguments
    /// * `small`: The tokens on the ring, in position order.
    ///
    /// # Returns
    /// * `Ok(State)` with the empty-slot index cached.
    /// * `Err(ProblemError::EmptySlotCount)` if `small` does not contain exactly one `EMPTY`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_puzzle_solver::engine::State;
    /// let state = State::new(vec![2, 2, 0, 1, 1]).unwrap();
    /// assert_eq!(state.zero_index(), 2);
    /// assert!(State::new(vec![1, 1, 2, 2]).is_err());
    /// ```
    pub fn new(small: Vec<Disk>) -> Result<Self, ProblemError> {
        let mut empties = small
            .iter()
            .enumerate()
            .filter(|(_, &disk)| disk == EMPTY)
            .map(|(index, _)| index);

        match (empties.next(), empties.next()) {
            (Some(zero_index), None) => Ok(State { small, zero_index }),
            _ => Err(ProblemError::EmptySlotCount(
                small.iter().filter(|&&disk| disk == EMPTY).count(),
            )),
        }
    }

    /// Returns the tokens in position order.
    pub fn small(&self) -> &[Disk] {
        &self.small
    }

    /// Returns the position of the empty slot.
    pub fn zero_index(&self) -> usize {
        self.zero_index
    }

    /// Returns the number of ring positions.
    pub fn len(&self) -> usize {
        self.small.len()
    }

    /// Returns `true` if the ring has no positions. A valid state never does.
    pub fn is_empty(&self) -> bool {
        self.small.is_empty()
    }

    /// Checks the goal condition for blocks of `group_size` tokens.
    ///
    /// Starting right after the empty slot and wrapping around the ring, the
    /// next `group_size * group_size` tokens must read `1, 1, .., 2, 2, .., n`
    /// in blocks of `group_size`. The check is relative to the empty slot, so
    /// rotating the whole ring never changes the result.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_puzzle_solver::engine::State;
    /// assert!(State::new(vec![2, 2, 0, 1, 1]).unwrap().is_goal(2));
    /// assert!(!State::new(vec![2, 1, 0, 1, 2]).unwrap().is_goal(2));
    /// ```
    pub fn is_goal(&self, group_size: usize) -> bool {
        let len = self.small.len();
        if group_size == 0 || ring_size_for_group(group_size) != Some(len) {
            return false;
        }

        (0..len - 1).all(|offset| {
            let index = (self.zero_index + 1 + offset) % len;
            self.small[index] as usize == offset / group_size + 1
        })
    }

    /// Returns a new state where the empty slot has moved to `index`.
    ///
    /// The token previously at `index` takes the old empty position. The
    /// original state is left untouched. Swapping back with the previous
    /// empty index restores the original layout exactly.
    ///
    /// # Panics
    /// Panics if `index` is outside the ring.
    pub fn swap_empty_with(&self, index: usize) -> State {
        let mut small = self.small.clone();
        small.swap(self.zero_index, index);
        State {
            small,
            zero_index: index,
        }
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.small == other.small
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // zero_index is derived from small, so the layout alone identifies a state.
        self.small.hash(state);
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, disk) in self.small.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", disk)?;
        }
        Ok(())
    }
}

/// A move operator. Every move costs 1.
///
/// `SwapRight` and `SwapLeft` jump by the hop label at the empty slot;
/// `StepRight` and `StepLeft` move to the neighbouring position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    SwapRight,
    SwapLeft,
    StepRight,
    StepLeft,
}

const HOP_MOVES: [Move; 2] = [Move::SwapRight, Move::SwapLeft];
const ALL_MOVES: [Move; 4] = [Move::SwapRight, Move::SwapLeft, Move::StepRight, Move::StepLeft];

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Move::SwapRight => "swap right",
            Move::SwapLeft => "swap left",
            Move::StepRight => "step right",
            Move::StepLeft => "step left",
        };
        write!(f, "{}", s)
    }
}

/// A puzzle instance: fixed hop labels, the group size and the starting layout.
///
/// The hop labels belong to the ring positions, not to the tokens, and never
/// change. A `Problem` is immutable once built and is shared read-only by
/// every search over it.
#[derive(Clone, Debug)]
pub struct Problem {
    large: Vec<Disk>,
    group_size: usize,
    start: State,
}

impl Problem {
    /// Builds a problem after validating its input.
    ///
    /// # Arguments
    /// * `large`: The hop label of every ring position.
    /// * `small`: The starting token layout.
    /// * `group_size`: The block size `n`; the ring must hold `n * n + 1` positions.
    ///
    /// # Returns
    /// * `Ok(Problem)` if the input describes a well-formed puzzle.
    /// * `Err(ProblemError)` if:
    ///     - `group_size` is 0 or so large that the ring size overflows,
    ///     - `large` and `small` differ in length,
    ///     - the ring size is not `group_size * group_size + 1`,
    ///     - `small` does not contain exactly one empty slot,
    ///     - a token lies outside `1..=group_size`.
    ///
    /// Token counts are not checked: a layout that can never form the goal
    /// is a valid problem whose searches come back empty. A hop label of 0
    /// is accepted as well; its hop moves leave the layout unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_puzzle_solver::engine::Problem;
    /// let problem = Problem::new(vec![1, 2, 1, 2, 1], vec![2, 2, 0, 1, 1], 2).unwrap();
    /// assert_eq!(problem.ring_size(), 5);
    /// assert!(Problem::new(vec![1, 2, 1], vec![2, 2, 0, 1, 1], 2).is_err());
    /// ```
    pub fn new(large: Vec<Disk>, small: Vec<Disk>, group_size: usize) -> Result<Self, ProblemError> {
        if group_size == 0 {
            return Err(ProblemError::InvalidGroupSize);
        }
        if large.len() != small.len() {
            return Err(ProblemError::LengthMismatch {
                labels: large.len(),
                tokens: small.len(),
            });
        }
        let expected = ring_size_for_group(group_size).ok_or(ProblemError::GroupSizeTooLarge(group_size))?;
        if small.len() != expected {
            return Err(ProblemError::WrongRingSize {
                len: small.len(),
                group_size,
                expected,
            });
        }

        let start = State::new(small)?;

        if let Some((index, &value)) = start
            .small()
            .iter()
            .enumerate()
            .find(|(_, &value)| value as usize > group_size)
        {
            return Err(ProblemError::TokenOutOfRange {
                index,
                value,
                group_size,
            });
        }

        Ok(Problem {
            large,
            group_size,
            start,
        })
    }

    /// Returns the hop labels of every position.
    pub fn hop_labels(&self) -> &[Disk] {
        &self.large
    }

    /// Returns the hop label at `position`.
    pub fn hop_label(&self, position: usize) -> usize {
        self.large[position] as usize
    }

    /// Returns the block size `n`.
    pub fn group_size(&self) -> usize {
        self.group_size
    }

    /// Returns the number of ring positions, `n * n + 1`.
    pub fn ring_size(&self) -> usize {
        self.large.len()
    }

    /// Returns the starting state.
    pub fn start(&self) -> &State {
        &self.start
    }

    /// Checks whether `state` is solved for this problem's group size.
    pub fn is_goal(&self, state: &State) -> bool {
        state.is_goal(self.group_size)
    }

    /// Lists the moves available from `state`.
    ///
    /// The two hop moves are always available. The two step moves are added
    /// only when the hop label at the empty slot is not 1, since they would
    /// duplicate the hop moves otherwise.
    pub fn legal_moves(&self, state: &State) -> &'static [Move] {
        if self.hop_label(state.zero_index()) == 1 {
            &HOP_MOVES
        } else {
            &ALL_MOVES
        }
    }

    /// Returns the position the empty slot moves to when `mv` is applied to `state`.
    pub fn move_target(&self, state: &State, mv: Move) -> usize {
        let len = state.len();
        let zero = state.zero_index();
        let label = self.hop_label(zero);
        match mv {
            Move::SwapRight => wrap_forward(zero, label, len),
            Move::SwapLeft => wrap_backward(zero, label, len),
            Move::StepRight => wrap_forward(zero, 1, len),
            Move::StepLeft => wrap_backward(zero, 1, len),
        }
    }

    /// Applies `mv` to `state`, returning the successor. `state` is not modified.
    pub fn apply_move(&self, state: &State, mv: Move) -> State {
        state.swap_empty_with(self.move_target(state, mv))
    }

    /// Generates every successor of `state`: 2 when the hop label at the
    /// empty slot is 1, 4 otherwise.
    pub fn successors(&self, state: &State) -> Vec<State> {
        self.legal_moves(state)
            .iter()
            .map(|&mv| self.apply_move(state, mv))
            .collect()
    }

    /// Returns the move that turns `from` into `to`, if they are one legal move apart.
    pub fn move_between(&self, from: &State, to: &State) -> Option<Move> {
        self.legal_moves(from)
            .iter()
            .copied()
            .find(|&mv| &self.apply_move(from, mv) == to)
    }

    /// Checks that `path` is a solution: it starts at the start state, each
    /// step is one legal move, and it ends in a goal state.
    ///
    /// An empty `path` is never a valid solution.
    pub fn is_valid_path(&self, path: &[State]) -> bool {
        let (Some(first), Some(last)) = (path.first(), path.last()) else {
            return false;
        };
        if first != &self.start || !self.is_goal(last) {
            return false;
        }
        path.windows(2)
            .all(|pair| self.move_between(&pair[0], &pair[1]).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::goal_tokens;
    use proptest::prelude::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(state: &State) -> u64 {
        let mut hasher = DefaultHasher::new();
        state.hash(&mut hasher);
        hasher.finish()
    }

    fn small_problem() -> Problem {
        Problem::new(vec![1, 2, 1, 2, 1], vec![2, 2, 0, 1, 1], 2).unwrap()
    }

    #[test]
    fn test_group_size_for_ring() {
        assert_eq!(group_size_for_ring(0), None);
        assert_eq!(group_size_for_ring(1), None);
        assert_eq!(group_size_for_ring(2), Some(1));
        assert_eq!(group_size_for_ring(5), Some(2));
        assert_eq!(group_size_for_ring(17), Some(4));
        assert_eq!(group_size_for_ring(16), None);
    }

    #[test]
    fn test_state_new_caches_zero_index() {
        let state = State::new(vec![1, 1, 1, 2, 2, 3, 2, 3, 3, 0]).unwrap();
        assert_eq!(state.zero_index(), 9);
        assert_eq!(state.len(), 10);
    }

    #[test]
    fn test_state_new_rejects_missing_or_duplicate_empty() {
        assert_eq!(State::new(vec![1, 1, 2, 2]), Err(ProblemError::EmptySlotCount(0)));
        assert_eq!(State::new(vec![0, 1, 0, 2]), Err(ProblemError::EmptySlotCount(2)));
    }

    #[test]
    fn test_is_goal_wrapping_fixture() {
        // Empty at 2, the next four positions wrap to read 1 1 2 2.
        let state = State::new(vec![2, 2, 0, 1, 1]).unwrap();
        assert!(state.is_goal(2));
    }

    #[test]
    fn test_is_goal_negative_fixture() {
        let state = State::new(vec![1, 1, 1, 2, 2, 3, 2, 3, 3, 0]).unwrap();
        assert!(!state.is_goal(3));
    }

    #[test]
    fn test_is_goal_rejects_mismatched_group_size() {
        let state = State::new(vec![2, 2, 0, 1, 1]).unwrap();
        assert!(!state.is_goal(3));
        assert!(!state.is_goal(0));
    }

    #[test]
    fn test_display_state() {
        let state = State::new(vec![2, 2, 0, 1, 1]).unwrap();
        assert_eq!(format!("{}", state), "2 2 0 1 1");
    }

    #[test]
    fn test_problem_new_errors() {
        assert_eq!(
            Problem::new(vec![1], vec![0], 0).unwrap_err(),
            ProblemError::InvalidGroupSize
        );
        assert_eq!(
            Problem::new(vec![1, 2, 1], vec![2, 2, 0, 1, 1], 2).unwrap_err(),
            ProblemError::LengthMismatch { labels: 3, tokens: 5 }
        );
        assert_eq!(
            Problem::new(vec![1; 6], vec![2, 2, 0, 1, 1, 1], 2).unwrap_err(),
            ProblemError::WrongRingSize { len: 6, group_size: 2, expected: 5 }
        );
        assert_eq!(
            Problem::new(vec![1; 5], vec![2, 2, 1, 1, 1], 2).unwrap_err(),
            ProblemError::EmptySlotCount(0)
        );
        assert_eq!(
            Problem::new(vec![1; 5], vec![2, 3, 0, 1, 1], 2).unwrap_err(),
            ProblemError::TokenOutOfRange { index: 1, value: 3, group_size: 2 }
        );
    }

    #[test]
    fn test_problem_new_rejects_overflowing_group_size() {
        let huge = usize::MAX / 2;
        assert_eq!(
            Problem::new(vec![1; 5], vec![2, 2, 0, 1, 1], huge).unwrap_err(),
            ProblemError::GroupSizeTooLarge(huge)
        );
        let state = State::new(vec![2, 2, 0, 1, 1]).unwrap();
        assert!(!state.is_goal(huge));
    }

    #[test]
    fn test_problem_new_accepts_unbalanced_tokens() {
        let problem = Problem::new(vec![1, 2, 1, 2, 1], vec![1, 1, 1, 0, 2], 2).unwrap();
        assert_eq!(problem.start().small(), &[1, 1, 1, 0, 2]);
        assert!(!problem.is_goal(problem.start()));
    }

    #[test]
    fn test_zero_hop_label_swaps_in_place() {
        let problem = Problem::new(vec![1, 2, 1, 0, 1], vec![2, 2, 1, 0, 1], 2).unwrap();
        let start = problem.start();
        assert_eq!(problem.move_target(start, Move::SwapRight), 3);
        assert_eq!(problem.move_target(start, Move::SwapLeft), 3);

        let successors = problem.successors(start);
        assert_eq!(successors.len(), 4);
        assert_eq!(successors.iter().filter(|&next| next == start).count(), 2);
        assert!(successors.iter().any(|next| problem.is_goal(next)));
    }

    #[test]
    fn test_successor_count_depends_on_hop_label() {
        let problem = small_problem();
        // Empty slot at 2 has hop label 1: only the two hop moves.
        assert_eq!(problem.successors(problem.start()).len(), 2);

        // Empty slot at 1 has hop label 2: hop and step moves.
        let state = State::new(vec![2, 0, 2, 1, 1]).unwrap();
        assert_eq!(problem.successors(&state).len(), 4);
    }

    #[test]
    fn test_apply_move_targets() {
        let problem = small_problem();
        let state = State::new(vec![2, 0, 2, 1, 1]).unwrap();

        assert_eq!(problem.move_target(&state, Move::SwapRight), 3);
        assert_eq!(problem.move_target(&state, Move::SwapLeft), 4);
        assert_eq!(problem.move_target(&state, Move::StepRight), 2);
        assert_eq!(problem.move_target(&state, Move::StepLeft), 0);

        let next = problem.apply_move(&state, Move::SwapLeft);
        assert_eq!(next.small(), &[2, 1, 2, 1, 0]);
        assert_eq!(next.zero_index(), 4);
        // The input is left untouched.
        assert_eq!(state.small(), &[2, 0, 2, 1, 1]);
    }

    #[test]
    fn test_move_between() {
        let problem = small_problem();
        let from = State::new(vec![2, 0, 2, 1, 1]).unwrap();
        let to = State::new(vec![0, 2, 2, 1, 1]).unwrap();
        assert_eq!(problem.move_between(&from, &to), Some(Move::StepLeft));
        assert_eq!(problem.move_between(&from, &from), None);
    }

    #[test]
    fn test_is_valid_path() {
        let problem = Problem::new(vec![1, 2, 1, 2, 1], vec![2, 2, 1, 0, 1], 2).unwrap();
        let start = problem.start().clone();
        let goal = State::new(vec![2, 2, 0, 1, 1]).unwrap();

        assert!(problem.is_valid_path(&[start.clone(), goal.clone()]));
        assert!(!problem.is_valid_path(&[]));
        assert!(!problem.is_valid_path(&[start.clone()]));
        assert!(!problem.is_valid_path(&[goal.clone()]));

        // Not one move apart.
        let far = State::new(vec![0, 2, 2, 1, 1]).unwrap();
        assert!(!problem.is_valid_path(&[start, far, goal]));
    }

    #[test]
    fn test_equal_states_hash_identically() {
        let problem = small_problem();
        let a = State::new(vec![2, 0, 2, 1, 1]).unwrap();
        // Reach the same layout through a move.
        let b = problem.apply_move(&State::new(vec![0, 2, 2, 1, 1]).unwrap(), Move::SwapRight);
        assert_eq!(b.small(), a.small());
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        let c = State::new(vec![2, 2, 0, 1, 1]).unwrap();
        assert_ne!(a, c);
        assert_ne!(hash_of(&a), hash_of(&c));
    }

    fn shuffled_state() -> impl Strategy<Value = (usize, State)> {
        (1usize..=3).prop_flat_map(|n| {
            Just(goal_tokens(n))
                .prop_shuffle()
                .prop_map(move |tokens| (n, State::new(tokens).unwrap()))
        })
    }

    fn labels_for(len: usize) -> impl Strategy<Value = Vec<Disk>> {
        prop::collection::vec(1u8..=(len as u8), len)
    }

    proptest! {
        #[test]
        fn prop_goal_test_is_rotation_invariant((n, state) in shuffled_state(), k in 0usize..32) {
            let mut rotated = state.small().to_vec();
            let shift = k % rotated.len();
            rotated.rotate_left(shift);
            let rotated = State::new(rotated).unwrap();
            prop_assert_eq!(rotated.is_goal(n), state.is_goal(n));
        }

        #[test]
        fn prop_rotated_goal_layouts_are_goals(n in 1usize..=4, k in 0usize..32) {
            let mut tokens = goal_tokens(n);
            let shift = k % tokens.len();
            tokens.rotate_right(shift);
            prop_assert!(State::new(tokens).unwrap().is_goal(n));
        }

        #[test]
        fn prop_successor_count_is_two_or_four(
            (labels, (n, state)) in shuffled_state().prop_flat_map(|(n, state)| {
                (labels_for(state.len()), Just((n, state)))
            })
        ) {
            let problem = Problem::new(labels, state.small().to_vec(), n).unwrap();
            let expected = if problem.hop_label(state.zero_index()) == 1 { 2 } else { 4 };
            prop_assert_eq!(problem.successors(&state).len(), expected);
        }

        #[test]
        fn prop_moves_are_reversible(
            (labels, (n, state)) in shuffled_state().prop_flat_map(|(n, state)| {
                (labels_for(state.len()), Just((n, state)))
            })
        ) {
            let problem = Problem::new(labels, state.small().to_vec(), n).unwrap();
            for &mv in problem.legal_moves(&state) {
                let next = problem.apply_move(&state, mv);
                prop_assert_eq!(next.small()[next.zero_index()], EMPTY);
                let back = next.swap_empty_with(state.zero_index());
                prop_assert_eq!(back.small(), state.small());
                prop_assert_eq!(back.zero_index(), state.zero_index());
            }
        }

        #[test]
        fn prop_equality_matches_hash((_, a) in shuffled_state(), (_, b) in shuffled_state()) {
            if a.small() == b.small() {
                prop_assert_eq!(&a, &b);
                prop_assert_eq!(hash_of(&a), hash_of(&b));
            } else {
                prop_assert_ne!(&a, &b);
            }
        }
    }
}
