//! Dodge Arrow entry point
//!
//! Headless driver: runs rounds on the autopilot with a fixed timestep
//! accumulator, logs scores and results, and restarts after each game over.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use clap::Parser;

use dodge_arrow::consts::*;
use dodge_arrow::persistence::{JsonFileRecorder, NullSink, SkillReadyNotice, SkillReadySink};
use dodge_arrow::sim::{GameEvent, RoundPhase, RoundState, TickInput, tick};
use dodge_arrow::{Tuning, TuningError};

/// Wall-clock frame length when not running in real time
const HEADLESS_FRAME: f32 = 1.0 / 30.0;

#[derive(Debug, Parser)]
#[command(author, version, about = "Dodge Arrow headless driver", long_about = None)]
struct Args {
    /// Tuning JSON file (defaults are used when omitted)
    tuning: Option<PathBuf>,

    /// RNG seed for the session (defaults to the current time)
    #[arg(long)]
    seed: Option<u64>,

    /// Rounds to play before exiting
    #[arg(long, default_value_t = 3)]
    rounds: u32,

    /// Directory for skill_state_<role>.json files
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Do not write skill notices
    #[arg(long, default_value_t = false)]
    no_record: bool,

    /// Pace frames against the wall clock
    #[arg(long, default_value_t = false)]
    realtime: bool,
}

/// Game instance holding all state
struct Game {
    state: RoundState,
    sink: Box<dyn SkillReadySink>,
    input: TickInput,
    accumulator: f32,
    /// Simulated milliseconds since the session started
    session_ms: f64,
    /// Simulated milliseconds spent on the game-over screen
    game_over_ms: f64,
    rounds_finished: u32,
    results: Vec<(RoundPhase, u32, u32)>,
}

impl Game {
    fn new(tuning: Tuning, seed: u64, sink: Box<dyn SkillReadySink>) -> Result<Self, TuningError> {
        Ok(Self {
            state: RoundState::new(tuning, seed)?,
            sink,
            input: TickInput {
                autopilot: true,
                ..Default::default()
            },
            accumulator: 0.0,
            session_ms: 0.0,
            game_over_ms: 0.0,
            rounds_finished: 0,
            results: Vec::new(),
        })
    }

    /// Run simulation ticks for one frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.toggle_hitboxes = false;
        }
    }

    fn step(&mut self) {
        let step_ms = f64::from(SIM_DT) * 1000.0;
        self.session_ms += step_ms;

        if self.state.phase.is_terminal() {
            self.game_over_ms += step_ms;
            if self.game_over_ms >= self.state.tuning.round.game_over_delay_ms {
                self.game_over_ms = 0.0;
                self.state.reset();
            }
            return;
        }

        tick(&mut self.state, &self.input, SIM_DT);

        for event in &self.state.events {
            match *event {
                GameEvent::SkillReady { role, .. } => {
                    self.sink
                        .notify(SkillReadyNotice::new(role, self.session_ms as u64));
                }
                GameEvent::RoundEnded { phase } => {
                    self.rounds_finished += 1;
                    self.results.push((
                        phase,
                        self.state.players[0].score,
                        self.state.players[1].score,
                    ));
                }
                _ => {}
            }
        }

        if self.state.time_ticks % 60 == 0 {
            log::info!(
                "t={:>5.1}s  A={:<3} B={:<3} arrows={:<3} interval={:.0}ms",
                self.state.clock_ms / 1000.0,
                self.state.players[0].score,
                self.state.players[1].score,
                self.state.arrows.len(),
                self.state.spawner.interval_ms()
            );
        }
    }
}

fn session_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5EED)
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    log::info!("Dodge Arrow (headless) starting...");

    let tuning = match &args.tuning {
        Some(path) => match Tuning::load(path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Failed to load tuning from {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => Tuning::default(),
    };

    let sink: Box<dyn SkillReadySink> = if args.no_record {
        Box::new(NullSink)
    } else {
        match JsonFileRecorder::spawn(&args.out) {
            Ok(recorder) => Box::new(recorder),
            Err(e) => {
                log::warn!("Skill recorder unavailable ({e}), notices disabled");
                Box::new(NullSink)
            }
        }
    };

    let seed = args.seed.unwrap_or_else(session_seed);
    let mut game = match Game::new(tuning, seed, sink) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Invalid tuning: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut last = Instant::now();
    while game.rounds_finished < args.rounds && !game.state.quit_requested() {
        if args.realtime {
            std::thread::sleep(Duration::from_millis(16));
            let now = Instant::now();
            game.update((now - last).as_secs_f32());
            last = now;
        } else {
            game.update(HEADLESS_FRAME);
        }
    }

    for (i, (phase, a, b)) in game.results.iter().enumerate() {
        println!("Round {}: {:?}  A={} B={} total={}", i + 1, phase, a, b, a + b);
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["dodge-arrow"]).unwrap();
        assert!(args.tuning.is_none());
        assert!(args.seed.is_none());
        assert_eq!(args.rounds, 3);
        assert_eq!(args.out, PathBuf::from("."));
        assert!(!args.no_record);
        assert!(!args.realtime);
    }

    #[test]
    fn test_args_all_flags() {
        let args = Args::try_parse_from([
            "dodge-arrow",
            "balance.json",
            "--seed",
            "42",
            "--rounds",
            "1",
            "--out",
            "/tmp/notices",
            "--no-record",
            "--realtime",
        ])
        .unwrap();
        assert_eq!(args.tuning, Some(PathBuf::from("balance.json")));
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.rounds, 1);
        assert_eq!(args.out, PathBuf::from("/tmp/notices"));
        assert!(args.no_record);
        assert!(args.realtime);
    }

    #[test]
    fn test_args_reject_bad_values() {
        assert!(Args::try_parse_from(["dodge-arrow", "--seed", "abc"]).is_err());
        assert!(Args::try_parse_from(["dodge-arrow", "--bogus"]).is_err());
    }

    #[test]
    fn test_game_restarts_after_delay() {
        let mut game = Game::new(Tuning::default(), 7, Box::new(NullSink)).unwrap();
        game.state.phase = RoundPhase::RoleADead;
        // 2000 ms at 60 Hz is 120 ticks
        for _ in 0..119 {
            game.step();
        }
        assert!(game.state.phase.is_terminal());
        game.step();
        assert_eq!(game.state.phase, RoundPhase::Running);
        assert_eq!(game.state.round_index, 1);
    }
}
