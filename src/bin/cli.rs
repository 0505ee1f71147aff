use arbiter::board::{Board, START_FEN};
use arbiter::logger::init_logging;
use arbiter::moves::magic::loader::{load_magic_tables, load_or_build_cache};
use arbiter::moves::perft::{perft, perft_divide};
use arbiter::replay::{GameReplay, ReplayReport, replay_stream_with};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::process::{Command, ExitCode, Stdio};
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const USAGE: &str = "\
usage: arbiter [--log <path>] [--magic-cache <path>] <command>

commands:
  run <engine> [args...]       run an engine and replay the games it prints
  replay <file|->              replay games from a file or stdin
  perft <depth> [--fen <fen>]  count leaf nodes
  divide <depth> [--fen <fen>] leaf nodes per root move";

const DEFAULT_LOG: &str = "logs/arbiter.log";
const DEFAULT_FILTER: &str = "arbiter=info";

fn main() -> ExitCode {
    let result = split_global_flags(std::env::args().skip(1).collect())
        .and_then(|(flags, args)| dispatch(flags, &args));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Usage) => {
            eprintln!("{USAGE}");
            ExitCode::from(2)
        }
        Err(CliError::Failed(msg)) => {
            eprintln!("error: {msg}");
            ExitCode::FAILURE
        }
    }
}

fn dispatch(flags: GlobalFlags, args: &[String]) -> Result<(), CliError> {
    let log_path = flags.log.as_deref().unwrap_or(DEFAULT_LOG);
    if let Err(e) = init_logging(log_path, DEFAULT_FILTER) {
        eprintln!("warning: logging disabled ({log_path}: {e})");
    }

    if let Some(cache) = &flags.magic_cache
        && let Err(e) = load_or_build_cache(cache)
    {
        // Tables are still generated in memory; only the file is missing.
        warn!(path = %cache, error = %e, "magic table cache unavailable");
    }

    match args.first().map(String::as_str) {
        Some("run") => run_engine(&args[1..]),
        Some("replay") => replay_source(&args[1..]),
        Some("perft") => run_perft(&args[1..], false),
        Some("divide") => run_perft(&args[1..], true),
        _ => Err(CliError::Usage),
    }
}

#[derive(Debug)]
enum CliError {
    Usage,
    Failed(String),
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Failed(e.to_string())
    }
}

/// Options shared by every command.
#[derive(Debug, Default, PartialEq, Eq)]
struct GlobalFlags {
    log: Option<String>,
    magic_cache: Option<String>,
}

/// Peel global flags off the front of `args`. Scanning stops at the command
/// word, so the rest (an engine's own argv included) passes through intact.
fn split_global_flags(args: Vec<String>) -> Result<(GlobalFlags, Vec<String>), CliError> {
    let mut flags = GlobalFlags::default();
    let mut args = args.into_iter();
    let mut command = Vec::new();
    while let Some(arg) = args.next() {
        let slot = match arg.as_str() {
            "--log" => Some(&mut flags.log),
            "--magic-cache" => Some(&mut flags.magic_cache),
            _ => None,
        };
        let Some(slot) = slot else {
            command.push(arg);
            break;
        };
        *slot = Some(args.next().ok_or(CliError::Usage)?);
    }
    command.extend(args);
    Ok((flags, command))
}

/// Remove `--name value` from `args`, returning the value.
fn take_option(args: &mut Vec<String>, name: &str) -> Option<String> {
    let i = args.iter().position(|a| a == name)?;
    if i + 1 >= args.len() {
        args.remove(i);
        return None;
    }
    let value = args.remove(i + 1);
    args.remove(i);
    Some(value)
}

// --- Engine harness ---
fn run_engine(args: &[String]) -> Result<(), CliError> {
    let (engine, engine_args) = args.split_first().ok_or(CliError::Usage)?;

    println!("Running {engine}...");
    let started = Instant::now();
    let output = Command::new(engine)
        .args(engine_args)
        .stdin(Stdio::null())
        .stderr(Stdio::inherit())
        .output()
        .map_err(|e| CliError::Failed(format!("could not start `{engine}`: {e}")))?;
    info!(
        engine = %engine,
        status = %output.status,
        bytes = output.stdout.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "engine finished"
    );
    if !output.status.success() {
        println!("warning: {engine} exited with {}", output.status);
    }

    let report = replay_with_progress(output.stdout.as_slice())?;
    print_report(&report);
    Ok(())
}

fn replay_source(args: &[String]) -> Result<(), CliError> {
    let source = args.first().ok_or(CliError::Usage)?;
    let report = if source == "-" {
        replay_with_progress(io::stdin().lock())?
    } else {
        let file = File::open(source)
            .map_err(|e| CliError::Failed(format!("could not open `{source}`: {e}")))?;
        replay_with_progress(BufReader::new(file))?
    };
    print_report(&report);
    Ok(())
}

fn replay_with_progress<R: BufRead>(reader: R) -> io::Result<ReplayReport> {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {pos} games replayed, {msg}") {
        bar.set_style(style);
    }
    bar.enable_steady_tick(Duration::from_millis(100));

    let mut failed = 0usize;
    let report = replay_stream_with(reader, |game| {
        if !game.is_ok() {
            failed += 1;
        }
        bar.inc(1);
        bar.set_message(format!("{failed} failed"));
    });
    bar.finish_and_clear();
    report
}

fn print_report(report: &ReplayReport) {
    for game in report.failures() {
        print_failure(game);
    }
    println!("----------------------------------------------------");
    println!(
        "Result: {}/{} games replayed cleanly, {} failed",
        report.passed_count(),
        report.game_count(),
        report.failure_count()
    );
}

fn print_failure(game: &GameReplay) {
    let Some(failure) = &game.failure else {
        return;
    };
    println!(
        "Game on line {}: move {} `{}` rejected: {}",
        game.line, failure.ply, failure.notation, failure.error
    );
    println!("   Moves: {}", game.move_text());
}

// --- Perft ---
fn run_perft(args: &[String], divide: bool) -> Result<(), CliError> {
    let mut args = args.to_vec();
    let fen = take_option(&mut args, "--fen").unwrap_or_else(|| START_FEN.to_string());
    let depth: u32 = args
        .first()
        .and_then(|d| d.parse().ok())
        .ok_or(CliError::Usage)?;

    let mut board =
        Board::from_str(&fen).map_err(|e| CliError::Failed(format!("bad FEN: {e}")))?;
    let tables = load_magic_tables();
    let started = Instant::now();

    let total = if divide {
        let split = perft_divide(&mut board, tables, depth)
            .map_err(|e| CliError::Failed(e.to_string()))?;
        for (mv, count) in &split {
            println!("{mv}: {count}");
        }
        split.iter().map(|(_, n)| n).sum()
    } else {
        perft(&mut board, tables, depth).map_err(|e| CliError::Failed(e.to_string()))?
    };

    let elapsed = started.elapsed();
    println!("Total: {total}");
    println!(
        "Time: {:.3}s ({:.0} nps)",
        elapsed.as_secs_f64(),
        total as f64 / elapsed.as_secs_f64().max(1e-9)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn flags_before_the_command_are_taken() {
        let (flags, rest) =
            split_global_flags(argv("--magic-cache m.bin --log a.log replay -")).unwrap();
        assert_eq!(flags.log.as_deref(), Some("a.log"));
        assert_eq!(flags.magic_cache.as_deref(), Some("m.bin"));
        assert_eq!(rest, argv("replay -"));
    }

    #[test]
    fn engine_arguments_are_left_alone() {
        let line = "run ./engine --log engine.log --magic-cache x";
        let (flags, rest) = split_global_flags(argv(line)).unwrap();
        assert_eq!(flags, GlobalFlags::default());
        assert_eq!(rest, argv(line));

        let (flags, rest) = split_global_flags(argv("--log a.log run ./engine --log b")).unwrap();
        assert_eq!(flags.log.as_deref(), Some("a.log"));
        assert_eq!(rest, argv("run ./engine --log b"));
    }

    #[test]
    fn flag_without_value_is_a_usage_error() {
        assert!(matches!(
            split_global_flags(argv("--log")),
            Err(CliError::Usage)
        ));
    }

    #[test]
    fn perft_fen_option_is_local_to_the_command() {
        let mut args = argv("3 --fen 8/8/8/8/8/8/8/8");
        assert_eq!(take_option(&mut args, "--fen").as_deref(), Some("8/8/8/8/8/8/8/8"));
        assert_eq!(args, argv("3"));
    }
}
