use clap::Parser;
use ring_puzzle_solver::engine::Problem;
use ring_puzzle_solver::heuristics::HeuristicKind;
use ring_puzzle_solver::solver::{solve, Algorithm};
use ring_puzzle_solver::utils::problem_from_str;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Heuristic guiding the search: zero, misplaced or hop
    #[clap(short = 'H', long, default_value = "hop")]
    heuristic: HeuristicKind,

    /// Search engine: astar or ida
    #[clap(short, long, default_value = "ida")]
    algorithm: Algorithm,

    /// Log search counters while solving
    #[clap(short, long)]
    debug: bool,

    /// Path to the puzzle file (group size, hop labels, tokens; one per line)
    puzzle_file: PathBuf,
}

fn init_tracing(debug: bool) {
    let default_directive = if debug { "ring_puzzle_solver=info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn read_puzzle_file(path: &PathBuf) -> Result<Problem, String> {
    let content = fs::read_to_string(path).map_err(|e| format!("Failed to read file: {}", e))?;
    problem_from_str(&content).map_err(|e| format!("Invalid puzzle format: {}", e))
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.debug);

    let problem = match read_puzzle_file(&args.puzzle_file) {
        Ok(problem) => problem,
        Err(e) => {
            eprintln!("{}: {}", args.puzzle_file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    println!("Loaded puzzle from {}\n", args.puzzle_file.display());
    println!("Group size:  {}", problem.group_size());
    println!(
        "Hop labels:  {}",
        problem
            .hop_labels()
            .iter()
            .map(|label| label.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    );
    println!("Start state: {}\n", problem.start());
    println!("Searching with {} and the {} heuristic...\n", args.algorithm, args.heuristic);

    let heuristic = args.heuristic.create_for(&problem);
    let solution = solve(&problem, heuristic.as_ref(), args.algorithm, args.debug);

    let Some(move_count) = solution.move_count() else {
        println!("No solution: the goal cannot be reached from this start state.");
        return ExitCode::SUCCESS;
    };

    println!("Solution found ({} moves):", move_count);
    println!("  Start:   {}", solution.states[0]);
    for (i, pair) in solution.states.windows(2).enumerate() {
        let label = problem
            .move_between(&pair[0], &pair[1])
            .map(|mv| mv.to_string())
            .unwrap_or_else(|| "?".to_string());
        println!("  Move {:<2} {:<11} -> {}", i + 1, label, pair[1]);
    }
    println!(
        "\nExpanded {} nodes ({} generated, {} pruned, {} reopened).",
        solution.stats.expanded, solution.stats.generated, solution.stats.pruned, solution.stats.reopened
    );

    ExitCode::SUCCESS
}
