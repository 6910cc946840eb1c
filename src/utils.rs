use crate::engine::{ring_size_for_group, Disk, Problem, State, EMPTY};
use crate::error::{ParseError, ProblemError};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Builds the canonical solved layout for `group_size`: the empty slot at
/// position 0 followed by `group_size` blocks of `1..=group_size`.
///
/// # Examples
/// ```
/// use ring_puzzle_solver::utils::goal_tokens;
/// assert_eq!(goal_tokens(2), vec![0, 1, 1, 2, 2]);
/// ```
pub fn goal_tokens(group_size: usize) -> Vec<Disk> {
    let mut tokens = Vec::with_capacity(group_size * group_size + 1);
    tokens.push(EMPTY);
    for value in 1..=group_size {
        tokens.extend(std::iter::repeat(value as Disk).take(group_size));
    }
    tokens
}

/// Parses a list of tokens or hop labels separated by whitespace and/or commas.
///
/// # Arguments
/// * `s`: The text to parse, e.g. `"1 2, 1 2 1"`.
/// * `section`: The name of the field being parsed, used in error messages.
///
/// # Returns
/// * `Ok(Vec<Disk>)` with the values in order. Empty input yields an empty vector.
/// * `Err(ParseError::InvalidToken)` if any field is not a number in `0..=255`.
///
/// # Examples
/// ```
/// use ring_puzzle_solver::utils::parse_disks;
/// assert_eq!(parse_disks("2 2, 0,1 1", "tokens").unwrap(), vec![2, 2, 0, 1, 1]);
/// assert!(parse_disks("2 x", "tokens").is_err());
/// ```
pub fn parse_disks(s: &str, section: &'static str) -> Result<Vec<Disk>, ParseError> {
    s.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|field| !field.is_empty())
        .map(|field| {
            field.parse::<Disk>().map_err(|_| ParseError::InvalidToken {
                section,
                token: field.to_string(),
            })
        })
        .collect()
}

/// Parses a puzzle description into a `Problem`.
///
/// The description holds three significant lines, in order:
/// 1. the group size `n`,
/// 2. the `n * n + 1` hop labels,
/// 3. the `n * n + 1` starting tokens (`0` for the empty slot).
///
/// Blank lines are skipped and `#` starts a comment that runs to the end of the line.
///
/// # Examples
/// ```
/// use ring_puzzle_solver::utils::problem_from_str;
/// let problem = problem_from_str("# tiny\n2\n1 2 1 2 1\n2 2 1 0 1\n").unwrap();
/// assert_eq!(problem.group_size(), 2);
/// assert_eq!(problem.start().zero_index(), 3);
/// ```
pub fn problem_from_str(s: &str) -> Result<Problem, ParseError> {
    let mut lines = s
        .lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty());

    let size_line = lines.next().ok_or(ParseError::MissingSection("group size"))?;
    let group_size = size_line
        .parse::<usize>()
        .map_err(|_| ParseError::InvalidToken {
            section: "group size",
            token: size_line.to_string(),
        })?;

    let large = parse_disks(
        lines.next().ok_or(ParseError::MissingSection("hop labels"))?,
        "hop labels",
    )?;
    let small = parse_disks(
        lines.next().ok_or(ParseError::MissingSection("tokens"))?,
        "tokens",
    )?;

    Ok(Problem::new(large, small, group_size)?)
}

// Hop labels are drawn from 1..N so that every label moves the empty slot.
fn generate_random_hop_label(rng: &mut impl Rng, ring_size: usize) -> Disk {
    let max = ring_size.saturating_sub(1).clamp(1, Disk::MAX as usize) as Disk;
    rng.gen_range(1..=max)
}

/// Creates a reproducible random instance.
///
/// Hop labels are drawn at random, then a random walk of `scramble_len`
/// legal moves is applied to the canonical goal layout. The same `seed`
/// always produces the same problem. Because the start is reached from a
/// goal by legal moves, the instance is always solvable in at most
/// `scramble_len` moves.
///
/// # Arguments
/// * `group_size`: The block size `n`.
/// * `scramble_len`: The number of random moves applied to the goal layout.
/// * `seed`: Seed for the random number generator.
///
/// # Returns
/// * `Ok(Problem)` on success.
/// * `Err(ProblemError::InvalidGroupSize)` if `group_size` is 0.
/// * `Err(ProblemError::GroupSizeTooLarge)` if the ring size overflows.
pub fn random_problem(group_size: usize, scramble_len: usize, seed: u64) -> Result<Problem, ProblemError> {
    if group_size == 0 {
        return Err(ProblemError::InvalidGroupSize);
    }

    let mut rng = SmallRng::seed_from_u64(seed);
    let ring_size = ring_size_for_group(group_size).ok_or(ProblemError::GroupSizeTooLarge(group_size))?;
    let large: Vec<Disk> = (0..ring_size)
        .map(|_| generate_random_hop_label(&mut rng, ring_size))
        .collect();

    let solved = Problem::new(large.clone(), goal_tokens(group_size), group_size)?;
    let mut state: State = solved.start().clone();
    for _ in 0..scramble_len {
        if let Some(&mv) = solved.legal_moves(&state).choose(&mut rng) {
            state = solved.apply_move(&state, mv);
        }
    }

    Problem::new(large, state.small().to_vec(), group_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_tokens_is_goal() {
        for n in 1..=4 {
            let tokens = goal_tokens(n);
            assert_eq!(tokens.len(), n * n + 1);
            assert!(State::new(tokens).unwrap().is_goal(n));
        }
    }

    #[test]
    fn test_parse_disks_separators() {
        assert_eq!(parse_disks(" 1,2 ,, 3\t4 ", "hop labels").unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(parse_disks("", "hop labels").unwrap(), Vec::<Disk>::new());
    }

    #[test]
    fn test_parse_disks_invalid_value() {
        let result = parse_disks("1 256", "tokens");
        assert_eq!(
            result.unwrap_err(),
            ParseError::InvalidToken { section: "tokens", token: "256".to_string() }
        );
        assert!(parse_disks("1 -2", "tokens").is_err());
    }

    #[test]
    fn test_problem_from_str_with_comments() {
        let text = "\
# group size
3

1 2 3 1 2 3 1 2 3 1   # hop labels
1,1,1,2,2,3,2,3,3,0
";
        let problem = problem_from_str(text).unwrap();
        assert_eq!(problem.group_size(), 3);
        assert_eq!(problem.hop_labels(), &[1, 2, 3, 1, 2, 3, 1, 2, 3, 1]);
        assert_eq!(problem.start().small(), &[1, 1, 1, 2, 2, 3, 2, 3, 3, 0]);
    }

    #[test]
    fn test_problem_from_str_missing_sections() {
        assert_eq!(problem_from_str("").unwrap_err(), ParseError::MissingSection("group size"));
        assert_eq!(problem_from_str("2\n").unwrap_err(), ParseError::MissingSection("hop labels"));
        assert_eq!(
            problem_from_str("2\n1 1 1 1 1\n").unwrap_err(),
            ParseError::MissingSection("tokens")
        );
    }

    #[test]
    fn test_problem_from_str_reports_problem_errors() {
        let err = problem_from_str("2\n1 1 1\n2 2 0 1 1\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::Problem(ProblemError::LengthMismatch { labels: 3, tokens: 5 })
        );
        assert!(problem_from_str("two\n1\n0\n").is_err());
    }

    #[test]
    fn test_problem_from_str_rejects_huge_group_size() {
        let text = format!("{}\n1 1 1 1 1\n2 2 0 1 1\n", usize::MAX);
        assert_eq!(
            problem_from_str(&text).unwrap_err(),
            ParseError::Problem(ProblemError::GroupSizeTooLarge(usize::MAX))
        );
    }

    #[test]
    fn test_random_problem_is_deterministic() {
        let a = random_problem(3, 12, 42).unwrap();
        let b = random_problem(3, 12, 42).unwrap();
        assert_eq!(a.hop_labels(), b.hop_labels());
        assert_eq!(a.start(), b.start());
    }

    #[test]
    fn test_random_problem_without_scramble_is_solved() {
        let problem = random_problem(2, 0, 7).unwrap();
        assert!(problem.is_goal(problem.start()));
        assert!(problem.hop_labels().iter().all(|&label| (1..5).contains(&label)));
    }

    #[test]
    fn test_random_problem_rejects_zero_group_size() {
        assert_eq!(random_problem(0, 3, 1).unwrap_err(), ProblemError::InvalidGroupSize);
        assert_eq!(
            random_problem(usize::MAX, 3, 1).unwrap_err(),
            ProblemError::GroupSizeTooLarge(usize::MAX)
        );
    }
}
