use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use number_prefix::NumberPrefix;
use tilepack::game::{Game, Strategy, console};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Sliding-tile merge game: play by hand or run a direction-cycling strategy"
)]
struct Cli {
    /// Board side length
    #[arg(long, global = true, default_value_t = 4, value_name = "N")]
    size: usize,

    /// Seed for reproducible tile spawns (random when omitted)
    #[arg(long, global = true, value_name = "SEED")]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play on an interactive screen
    Play,
    /// Replay a fixed direction cycle without interaction
    Auto {
        /// Hyphen-separated direction cycle, e.g. l-u-r-d
        #[arg(long, default_value = "l-r")]
        strategy: Strategy,

        /// Number of move requests to issue
        #[arg(long, default_value_t = 10, value_name = "N")]
        plays: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut game = match cli.seed {
        Some(seed) => Game::from_seed(cli.size, seed)?,
        None => Game::new(cli.size)?,
    };

    match cli.command {
        Command::Play => console::play(&mut game)?,
        Command::Auto { strategy, plays } => run_auto(&mut game, &strategy, plays),
    }

    print_summary(&game);
    Ok(())
}

fn run_auto(game: &mut Game, strategy: &Strategy, plays: usize) {
    info!("issuing {plays} plays of strategy {strategy}");

    let pb = ProgressBar::new(plays as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] {wide_bar} {pos}/{len} ({eta})",
        )
        .unwrap()
        .progress_chars("█▉▊▋▌▍▎▏  "),
    );

    // One chunk per strategy cycle: every run restarts the cycle at its first
    // direction, so whole cycles concatenate into the same move sequence.
    let cycle = strategy.directions().len();
    let mut remaining = plays;

    while remaining > 0 {
        if game.is_terminal() {
            info!("board locked up after {} rounds", game.rounds());
            break;
        }

        let step = cycle.min(remaining);
        game.auto(strategy, step);

        remaining -= step;
        pb.inc(step as u64);
    }

    pb.finish_and_clear();
}

fn print_summary(game: &Game) {
    println!("{}", game.board());
    println!();
    println!("rounds {:>8}", format_count(game.rounds()));
    println!("score  {:>8}", format_count(game.score()));
    println!("max    {:>8}", format_count(game.max_tile()));
}

fn format_count(value: u64) -> String {
    match NumberPrefix::decimal(value as f64) {
        NumberPrefix::Standalone(count) => format!("{count}"),
        NumberPrefix::Prefixed(prefix, count) => format!("{count:.1} {prefix}"),
    }
}
