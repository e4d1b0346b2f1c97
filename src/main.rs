//! Plinko Fair CLI
//!
//! Compute commitments, evaluate rounds and verify revealed rounds from the
//! command line. Results go to stdout as JSON; logs go to stderr.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use plinko_fair::{
    game::{
        config::{parse_nonce, BoardConfig, EngineConfig},
        payout::PayoutTable,
        round::{evaluate, SeedPair},
    },
    network::protocol::{handle_message, ClientMessage, ServerMessage},
    proof::{round::Round, verify::verify_reveal},
    commit, verify, VERSION,
};

#[derive(Parser, Debug)]
#[command(name = "plinko-fair", version)]
#[command(about = "Provably fair plinko: commit, evaluate and verify rounds")]
struct Cli {
    #[command(flatten)]
    board: BoardArgs,

    #[command(subcommand)]
    command: Command,
}

/// Overrides for the environment config.
#[derive(Args, Debug)]
struct BoardArgs {
    /// Number of peg rows (env: PLINKO_ROWS)
    #[arg(long, global = true)]
    rows: Option<u32>,

    /// Highest drop column (env: PLINKO_MAX_DROP_COLUMN)
    #[arg(long, global = true)]
    max_drop_column: Option<u32>,

    /// Multipliers by distance from center, comma-separated (env: PLINKO_PAYOUTS)
    #[arg(long, global = true)]
    payouts: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print SHA256(server_seed:nonce)
    Commit {
        #[arg(long)]
        server_seed: String,
        #[arg(long, value_parser = parse_nonce)]
        nonce: u64,
    },

    /// Evaluate a round and print the full outcome
    Evaluate {
        #[arg(long)]
        server_seed: String,
        #[arg(long)]
        client_seed: String,
        #[arg(long, value_parser = parse_nonce)]
        nonce: u64,
        #[arg(long, allow_negative_numbers = true)]
        drop_column: i32,
    },

    /// Check a published commitment and bin against revealed seeds
    Verify {
        #[arg(long)]
        server_seed: String,
        #[arg(long)]
        client_seed: String,
        #[arg(long, value_parser = parse_nonce)]
        nonce: u64,
        #[arg(long, allow_negative_numbers = true)]
        drop_column: i32,
        /// Commitment published before the round
        #[arg(long)]
        commit: String,
        /// Bin the server reported
        #[arg(long)]
        bin: u32,
    },

    /// Run one round through commit, start and reveal with a fresh seed
    Round {
        #[arg(long)]
        client_seed: String,
        #[arg(long, value_parser = parse_nonce, default_value = "0")]
        nonce: u64,
        #[arg(long, allow_negative_numbers = true)]
        drop_column: i32,
    },

    /// Answer JSON requests read line by line from stdin
    Stdio,
}

fn main() {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    if let Err(err) = run() {
        eprintln!("plinko-fair failed: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.board)?;

    info!("Plinko Fair v{}", VERSION);
    info!(
        "Board: {} rows, drop columns 0..={} (center {})",
        config.board.rows,
        config.board.max_drop_column,
        config.board.center_column()
    );

    match cli.command {
        Command::Commit { server_seed, nonce } => {
            print_json(&serde_json::json!({ "commit_hex": commit(&server_seed, nonce) }))
        }
        Command::Evaluate {
            server_seed,
            client_seed,
            nonce,
            drop_column,
        } => {
            let seeds = SeedPair::new(server_seed, client_seed, nonce);
            let round = evaluate(&seeds, drop_column, &config)?;
            info!("Final bin {} pays {}x", round.final_bin, round.multiplier);
            print_json(&round)
        }
        Command::Verify {
            server_seed,
            client_seed,
            nonce,
            drop_column,
            commit,
            bin,
        } => {
            let seeds = SeedPair::new(server_seed, client_seed, nonce);
            let result = verify(&seeds, drop_column, &commit, bin, &config.board)?;
            match result.mismatch {
                None => info!("VERIFIED: commitment and bin match"),
                Some(reason) => warn!("VERIFICATION FAILED: {}", reason),
            }
            print_json(&result)?;
            if !result.ok {
                std::process::exit(2);
            }
            Ok(())
        }
        Command::Round {
            client_seed,
            nonce,
            drop_column,
        } => demo_round(&config, client_seed, nonce, drop_column),
        Command::Stdio => serve_stdio(&config),
    }
}

/// Environment first, then CLI flags on top.
fn load_config(args: &BoardArgs) -> Result<EngineConfig> {
    let mut config = EngineConfig::from_env().context("loading config from environment")?;
    config.board = BoardConfig::new(
        args.rows.unwrap_or(config.board.rows),
        args.max_drop_column.unwrap_or(config.board.max_drop_column),
    )?;
    if let Some(list) = &args.payouts {
        config.payouts = PayoutTable::parse_list(list)?;
    }
    config.validate()?;
    Ok(config)
}

/// Walk one round through the whole protocol and self-verify it.
fn demo_round(config: &EngineConfig, client_seed: String, nonce: u64, drop_column: i32) -> Result<()> {
    info!("=== Committing ===");
    let mut round = Round::generate(nonce);
    info!("Round {} commit {}", round.id(), round.commitment().commit_hex);

    info!("=== Starting ===");
    let outcome = round.start(client_seed, drop_column, config)?;
    info!(
        "Dropped at column {}: bin {} ({}x)",
        drop_column, outcome.final_bin, outcome.multiplier
    );

    info!("=== Revealing ===");
    let revealed = round.reveal()?;
    let result = verify_reveal(&revealed)?;
    if result.ok {
        info!("REVEAL VERIFIED: commitment, board and path all match");
    } else {
        warn!("REVEAL FAILED: {:?}", result.mismatch);
    }

    print_json(&revealed)
}

fn serve_stdio(config: &EngineConfig) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let mut handled = 0usize;

    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        let response = match ClientMessage::from_json(&line) {
            Ok(message) => handle_message(message, config),
            Err(err) => {
                warn!("Invalid request: {}", err);
                ServerMessage::malformed(&err)
            }
        };
        writeln!(stdout, "{}", response.to_json()?)?;
        stdout.flush()?;
        handled += 1;
    }

    info!("Handled {} requests", handled);
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
