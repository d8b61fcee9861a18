//! Headless driver for the bounce pitch session engine.
//!
//! Places wagers, kicks off, and fast-forwards a whole match against the
//! kinematic ball stub, printing the final score and settlement as JSON.

mod sim;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::json;

use bp_core::{
    MarketOutcome, MatchPhase, MatchSession, OddsTable, ParityOutcome, ResultOutcome,
    SessionConfig, SessionObserver, TickOutcome, TotalOutcome,
};
use sim::BallStub;

#[derive(Parser, Debug)]
#[command(name = "bp_cli", about = "Run one wagered bouncing-ball match headlessly")]
struct Args {
    /// Seed for kickoff/respawn velocity draws (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Match length in milliseconds
    #[arg(long, default_value_t = 45_000)]
    duration_ms: u64,

    /// Fixed stake per selection
    #[arg(long, default_value_t = 100)]
    stake: u64,

    /// Wager as market:outcome (e.g. result:home, total:over, parity:odd);
    /// repeatable
    #[arg(long = "bet")]
    bets: Vec<String>,
}

/// Logs score and goal notifications as they happen.
#[derive(Debug, Default)]
struct LogObserver;

impl SessionObserver for LogObserver {
    fn on_score_changed(&mut self, home: u32, away: u32) {
        log::info!("score {home}-{away}");
    }

    fn on_phase_changed(&mut self, phase: MatchPhase) {
        log::debug!("phase {phase:?}");
    }
}

fn parse_bet(spec: &str) -> Result<MarketOutcome> {
    let (market, outcome) = spec
        .split_once(':')
        .with_context(|| format!("bet '{spec}' is not market:outcome"))?;
    let parsed = match (market, outcome) {
        ("result", "home") => MarketOutcome::Result(ResultOutcome::Home),
        ("result", "draw") => MarketOutcome::Result(ResultOutcome::Draw),
        ("result", "away") => MarketOutcome::Result(ResultOutcome::Away),
        ("total", "over") => MarketOutcome::Total(TotalOutcome::Over),
        ("total", "under") => MarketOutcome::Total(TotalOutcome::Under),
        ("parity", "odd") => MarketOutcome::Parity(ParityOutcome::Odd),
        ("parity", "even") => MarketOutcome::Parity(ParityOutcome::Even),
        _ => bail!("unknown bet '{spec}'"),
    };
    Ok(parsed)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = SessionConfig {
        total_duration_ms: args.duration_ms,
        fixed_stake: args.stake,
        ..SessionConfig::default()
    };
    let tick_ms = config.tick_interval_ms;

    let ball = BallStub::default();
    let mut session = match args.seed {
        Some(seed) => MatchSession::with_seed(
            config,
            OddsTable::default(),
            Box::new(ball.clone()),
            Box::new(LogObserver),
            seed,
        ),
        None => MatchSession::new(
            config,
            OddsTable::default(),
            Box::new(ball.clone()),
            Box::new(LogObserver),
        ),
    };

    let bets = if args.bets.is_empty() {
        vec!["result:home".to_string()]
    } else {
        args.bets.clone()
    };
    for spec in &bets {
        session.select_wager(parse_bet(spec)?)?;
    }
    session.confirm_wagers()?;

    let mut now = 0u64;
    session.kick_off(now)?;
    let epoch = session.epoch();

    loop {
        now += tick_ms;
        if session.tick(epoch, now) == TickOutcome::Ended {
            break;
        }
        // Contacts are delivered after the tick so expiry always wins a race
        // against a same-instant goal.
        if session.phase() == MatchPhase::Running {
            for contact in ball.advance(tick_ms) {
                session.handle_contact(now, contact);
            }
        }
    }

    let score = session.score();
    let summary = json!({
        "final_score": { "home": score.home, "away": score.away },
        "final_ball_position": ball.position(),
        "outcome": session.final_outcome(),
        "balance": session.balance(),
        "settlement": session.settlement(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
