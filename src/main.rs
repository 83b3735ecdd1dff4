//! hex-rave: a Hex engine using MCTS with RAVE.
//!
//! ## Usage
//!
//! - `hex-rave` - Show a demo
//! - `hex-rave demo` - One decision on a lightly seeded board
//! - `hex-rave selfplay` - Two engines play a full game

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use log::info;

use hex_rave::board::{Board, HexBoard, Player};
use hex_rave::constants::DEFAULT_SIZE;
use hex_rave::engine::{EngineConfig, HexEngine};

/// hex-rave: a Hex engine using MCTS with RAVE
#[derive(Parser)]
#[command(name = "hex-rave")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Decide one move for player One after a single opponent stone
    Demo(Options),
    /// Let two engines play a full game against each other
    Selfplay(Options),
}

#[derive(Args, Clone, Copy)]
struct Options {
    /// Board size
    #[arg(long, default_value_t = DEFAULT_SIZE)]
    size: usize,
    /// Seconds per decision
    #[arg(long, default_value_t = 2.0)]
    time: f64,
    /// Seed for reproducible games
    #[arg(long)]
    seed: Option<u64>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            time: 2.0,
            seed: None,
        }
    }
}

impl Options {
    fn config(&self, offset: u64) -> Result<EngineConfig> {
        let time_limit = Duration::try_from_secs_f64(self.time)
            .with_context(|| format!("invalid time budget: {}", self.time))?;
        Ok(EngineConfig {
            time_limit,
            seed: self.seed.map(|s| s.wrapping_add(offset)),
            ..EngineConfig::default()
        })
    }

    fn board(&self) -> Result<HexBoard> {
        anyhow::ensure!(self.size >= 2, "board size must be at least 2, got {}", self.size);
        Ok(HexBoard::new(self.size))
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Selfplay(opts)) => run_selfplay(opts),
        Some(Commands::Demo(opts)) => run_demo(opts),
        None => run_demo(Options::default()),
    }
}

fn run_demo(opts: Options) -> Result<()> {
    println!("hex-rave: Hex engine using MCTS with RAVE\n");

    let mut board = opts.board()?;
    let centre = opts.size / 2;
    let (r, c) = (centre.saturating_sub(1), centre);
    board.place(r, c, Player::Two)?;
    println!("Player Two opens at ({r}, {c}):");
    println!("{board}");

    let mut engine = HexEngine::with_config(Player::One, opts.config(0)?);
    let (row, col) = engine.decide_move(&board)?;
    board.place(row, col, Player::One)?;
    println!("Player One answers at ({row}, {col}):");
    println!("{board}");
    Ok(())
}

fn run_selfplay(opts: Options) -> Result<()> {
    let mut board = opts.board()?;
    let mut engines = [
        HexEngine::with_config(Player::One, opts.config(0)?),
        HexEngine::with_config(Player::Two, opts.config(1)?),
    ];

    let mut turn = 0;
    let winner = loop {
        if let Some(winner) = board.winner() {
            break winner;
        }
        let engine = &mut engines[turn % 2];
        let player = engine.player();
        let (row, col) = engine
            .decide_move(&board)
            .with_context(|| format!("{player} failed to move on turn {}", turn + 1))?;
        board.place(row, col, player)?;
        println!("{:>3}. {player} ({row}, {col})", turn + 1);
        turn += 1;
    };

    println!("{board}");
    info!("{winner} wins after {turn} moves");
    println!("Winner: {winner}");
    Ok(())
}
