use clap::Parser;
use ring_puzzle_solver::heuristics::{Heuristic, HeuristicKind};
use ring_puzzle_solver::solver::{solve, AStar, Algorithm};
use ring_puzzle_solver::utils::random_problem;
use std::collections::HashMap;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Compare heuristics on seeded random ring puzzles", long_about = None)]
struct Args {
    /// Number of random puzzles to evaluate
    #[clap(short, long, default_value_t = 20)]
    boards: usize,

    /// Seed of the first puzzle; puzzle i uses seed + i
    #[clap(short, long, default_value_t = 0)]
    seed: u64,

    /// Block size n; the ring has n * n + 1 positions
    #[clap(short, long, default_value_t = 3)]
    group_size: usize,

    /// Random moves applied to the solved layout
    #[clap(long, default_value_t = 12)]
    scramble: usize,

    /// Search engine used to measure effort: astar or ida
    #[clap(short, long, default_value = "ida")]
    algorithm: Algorithm,
}

#[derive(Default)]
struct Tally {
    estimates: Vec<u32>,
    expanded: Vec<u64>,
    overestimates: usize,
}

fn main() -> ExitCode {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let mut tallies: HashMap<HeuristicKind, Tally> = HashMap::new();
    let mut optimal_lengths = Vec::with_capacity(args.boards);

    println!("Starting heuristic evaluation for {} puzzles...", args.boards);

    for board_idx in 0..args.boards {
        let current_seed = args.seed + board_idx as u64;
        let problem = match random_problem(args.group_size, args.scramble, current_seed) {
            Ok(problem) => problem,
            Err(e) => {
                eprintln!("Cannot generate puzzle: {}", e);
                return ExitCode::FAILURE;
            }
        };

        // The hop heuristic gives the reference optimum through A*.
        let reference = HeuristicKind::Hop.create_for(&problem);
        let Some(optimal) = AStar::new(&problem, reference.as_ref()).search(false).move_count() else {
            eprintln!("Warning: puzzle {} (Seed: {}) has no solution, skipping.", board_idx, current_seed);
            continue;
        };
        optimal_lengths.push(optimal);

        println!("\nPuzzle {} (Seed: {}), start {}, optimal {} moves", board_idx, current_seed, problem.start(), optimal);

        for kind in HeuristicKind::ALL {
            let heuristic = kind.create_for(&problem);
            let estimate = heuristic.estimate(problem.start());
            let solution = solve(&problem, heuristic.as_ref(), args.algorithm, false);

            if solution.move_count() != Some(optimal) {
                eprintln!(
                    "Error: {} with the {} heuristic found {:?} moves, expected {}.",
                    args.algorithm,
                    kind,
                    solution.move_count(),
                    optimal
                );
            }

            let tally = tallies.entry(kind).or_default();
            if estimate as usize > optimal {
                tally.overestimates += 1;
            }
            tally.estimates.push(estimate);
            tally.expanded.push(solution.stats.expanded);

            println!(
                "  Heuristic: {:<10} Estimate: {:<4} Expanded: {}",
                kind, estimate, solution.stats.expanded
            );
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!("Puzzles evaluated: {}", optimal_lengths.len());
    if optimal_lengths.is_empty() {
        return ExitCode::SUCCESS;
    }
    let avg_optimal = optimal_lengths.iter().sum::<usize>() as f64 / optimal_lengths.len() as f64;
    println!("Average optimal length: {:.2}", avg_optimal);
    println!("\n--- Averages ---");

    for kind in HeuristicKind::ALL {
        let Some(tally) = tallies.get(&kind) else {
            continue;
        };
        let samples = tally.estimates.len().max(1) as f64;
        let avg_estimate = tally.estimates.iter().map(|&e| e as f64).sum::<f64>() / samples;
        let avg_expanded = tally.expanded.iter().map(|&e| e as f64).sum::<f64>() / samples;
        println!(
            "Heuristic {:<10}: Average Estimate = {:.2} ({:.0}% of optimal), Average Expanded = {:.1}, Overestimates = {}",
            kind,
            avg_estimate,
            100.0 * avg_estimate / avg_optimal.max(1.0),
            avg_expanded,
            tally.overestimates
        );
    }

    ExitCode::SUCCESS
}
