use chrono::{DateTime, SecondsFormat, Utc};
use clap::{Parser, ValueEnum};
use ghost_hunt::engine::{GameEngine, GameEngineOptions, SpawnPolicy};
use ghost_hunt::error::GameError;
use ghost_hunt::input::{normalize_seed, normalize_turn_limit, parse_move_script};
use ghost_hunt::render::{AsciiRenderer, NullRenderer, Renderer, SnapshotRecorder};
use ghost_hunt::rng::RandomSource;
use ghost_hunt::types::{Direction, GameEvent, Tile};
use serde::Serialize;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long)]
    seed: Option<u64>,
    /// Maximum number of turns to play.
    #[arg(long)]
    turns: Option<u64>,
    /// Move script such as "UUDL", "wasd" or "up,left"; omitted means autopilot.
    #[arg(long)]
    moves: Option<String>,
    /// Place the player and ghosts on the fixed reference cells.
    #[arg(long)]
    reference: bool,
    #[arg(long, value_enum, default_value_t = RenderMode::None)]
    render: RenderMode,
    #[arg(long)]
    run_id: Option<String>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum RenderMode {
    None,
    Json,
    Ascii,
}

#[derive(Clone, Debug)]
struct RunConfig {
    seed: u32,
    policy: SpawnPolicy,
    turn_limit: u64,
    script: Option<Vec<Direction>>,
    render: RenderMode,
}

#[derive(Clone, Debug, Default, Serialize)]
struct RunResultLine {
    #[serde(rename = "runId")]
    run_id: String,
    seed: u32,
    driver: String,
    #[serde(rename = "turnsPlayed")]
    turns_played: u64,
    #[serde(rename = "finalLevel")]
    final_level: u32,
    #[serde(rename = "levelsCleared")]
    levels_cleared: u32,
    hits: u32,
    captures: u32,
    deposits: u32,
    #[serde(rename = "breachesSealed")]
    breaches_sealed: u32,
    #[serde(rename = "ghostsRespawned")]
    ghosts_respawned: usize,
    #[serde(rename = "respawnDropped")]
    respawn_dropped: usize,
    anomalies: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
struct AnomalyRecord {
    turn: u64,
    message: String,
}

#[derive(Clone, Debug)]
struct RunOutcome {
    result: RunResultLine,
    anomaly_records: Vec<AnomalyRecord>,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    #[serde(rename = "runId")]
    run_id: String,
    #[serde(rename = "startedAt")]
    started_at: String,
    #[serde(rename = "finishedAt")]
    finished_at: String,
    #[serde(rename = "durationMs")]
    duration_ms: u64,
    #[serde(rename = "anomalyCount")]
    anomaly_count: usize,
    #[serde(rename = "anomalyRecords")]
    anomaly_records: Vec<AnomalyRecord>,
    result: RunResultLine,
}

/// Presentation sink for one run, flushed to stdout after every turn.
enum Output {
    Quiet(NullRenderer),
    Json(SnapshotRecorder),
    Ascii(AsciiRenderer),
}

impl Output {
    fn new(mode: RenderMode) -> Self {
        match mode {
            RenderMode::None => Output::Quiet(NullRenderer),
            RenderMode::Json => Output::Json(SnapshotRecorder::default()),
            RenderMode::Ascii => Output::Ascii(AsciiRenderer::default()),
        }
    }

    fn renderer(&mut self) -> &mut dyn Renderer {
        match self {
            Output::Quiet(renderer) => renderer,
            Output::Json(renderer) => renderer,
            Output::Ascii(renderer) => renderer,
        }
    }

    fn flush(&mut self) {
        match self {
            Output::Quiet(_) => {}
            Output::Json(recorder) => {
                for snapshot in recorder.drain() {
                    match serde_json::to_string(&snapshot) {
                        Ok(line) => println!("{line}"),
                        Err(err) => warn!(error = %err, "snapshot serialization failed"),
                    }
                }
            }
            Output::Ascii(renderer) => {
                for line in &renderer.last_frame {
                    println!("{line}");
                }
                println!();
            }
        }
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let started_at = Utc::now();
    let seed = normalize_seed(cli.seed.unwrap_or_else(rand::random::<u64>));
    let run_id = cli
        .run_id
        .clone()
        .unwrap_or_else(|| default_run_id(seed, started_at));

    let script = match cli.moves.as_deref().map(parse_move_script).transpose() {
        Ok(script) => script,
        Err(err) => {
            error!(run_id = %run_id, error = %err, "invalid move script");
            std::process::exit(2);
        }
    };
    let config = RunConfig {
        seed,
        policy: if cli.reference {
            SpawnPolicy::Reference
        } else {
            SpawnPolicy::Random
        },
        turn_limit: normalize_turn_limit(cli.turns),
        script,
        render: cli.render,
    };

    info!(
        run_id = %run_id,
        seed,
        policy = ?config.policy,
        turn_limit = config.turn_limit,
        scripted = config.script.is_some(),
        "run started"
    );

    let outcome = match run_game(&run_id, &config) {
        Ok(outcome) => outcome,
        Err(err) => {
            error!(run_id = %run_id, seed, error = %err, "run aborted");
            std::process::exit(2);
        }
    };

    for anomaly in &outcome.anomaly_records {
        warn!(
            run_id = %run_id,
            turn = anomaly.turn,
            message = %anomaly.message,
            "anomaly detected"
        );
    }

    match serde_json::to_string(&outcome.result) {
        Ok(line) => println!("{line}"),
        Err(err) => warn!(error = %err, "result serialization failed"),
    }

    let finished_at = Utc::now();
    let has_anomaly = !outcome.result.anomalies.is_empty();
    let summary = build_run_summary(run_id.clone(), started_at, finished_at, outcome);

    let mut summary_out_written: Option<String> = None;
    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(err) = write_summary(path, &summary) {
            error!(
                run_id = %run_id,
                path = %path.display(),
                error = %err,
                "summary write failed"
            );
            std::process::exit(2);
        }
        summary_out_written = Some(path.to_string_lossy().to_string());
    }

    info!(
        run_id = %run_id,
        turns = summary.result.turns_played,
        level = summary.result.final_level,
        anomalies = summary.anomaly_count,
        duration_ms = summary.duration_ms,
        summary_out = ?summary_out_written,
        "run finished"
    );

    if has_anomaly {
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("GHOST_HUNT_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_game(run_id: &str, config: &RunConfig) -> Result<RunOutcome, GameError> {
    let mut engine = GameEngine::new(
        config.seed,
        GameEngineOptions {
            spawn_policy: config.policy,
            ..GameEngineOptions::default()
        },
    )?;
    let mut output = Output::new(config.render);
    let mut script = config.script.clone().map(Vec::into_iter);

    let mut result = RunResultLine {
        run_id: run_id.to_string(),
        seed: config.seed,
        driver: if script.is_some() { "script" } else { "autopilot" }.to_string(),
        final_level: engine.level_number(),
        ..RunResultLine::default()
    };
    let mut anomaly_records = Vec::new();
    let mut anomaly_seen = HashSet::new();

    for _ in 0..config.turn_limit {
        let dir = match script.as_mut() {
            Some(moves) => match moves.next() {
                Some(dir) => dir,
                None => break,
            },
            None => engine.choose_autopilot_direction(),
        };

        let report = engine.play_turn(dir, output.renderer())?;
        output.flush();
        result.turns_played = report.turn;

        for event in &report.events {
            match event {
                GameEvent::GhostHit { .. } => result.hits += 1,
                GameEvent::GhostCaptured { .. } => result.captures += 1,
                GameEvent::Deposited {
                    had_ghost: true, ..
                } => result.deposits += 1,
                GameEvent::BreachSealed { .. } => result.breaches_sealed += 1,
                GameEvent::GhostsRespawned { count } => result.ghosts_respawned += count,
                GameEvent::RespawnOverflow { dropped } => result.respawn_dropped += dropped,
                GameEvent::LevelAdvanced { .. } => result.levels_cleared += 1,
                _ => {}
            }
        }

        for message in collect_anomalies(&engine) {
            push_anomaly(
                &mut result.anomalies,
                &mut anomaly_records,
                &mut anomaly_seen,
                report.turn,
                message,
            );
        }
    }

    result.final_level = engine.level_number();
    Ok(RunOutcome {
        result,
        anomaly_records,
    })
}

fn collect_anomalies<R: RandomSource>(engine: &GameEngine<R>) -> Vec<String> {
    let mut anomalies = Vec::new();
    let level = engine.level();
    let player = engine.player();

    if !level.in_bounds(player.pos.x, player.pos.y) {
        anomalies.push(format!(
            "player out of bounds: ({},{})",
            player.pos.x, player.pos.y
        ));
    } else {
        let tile = level.tile_or_wall(player.pos);
        if tile.blocks_player() {
            anomalies.push(format!("player standing on {tile:?}"));
        }
    }

    if player.energy() < 0 || player.energy() > player.max_energy() {
        anomalies.push(format!(
            "player energy out of range: {}/{}",
            player.energy(),
            player.max_energy()
        ));
    }

    for (slot, ghost) in engine.ghosts().present() {
        if ghost.is_defeated() {
            anomalies.push(format!("defeated ghost remains in slot {slot}"));
        }
        if level.tile_or_wall(ghost.pos) == Tile::Wall {
            anomalies.push(format!("ghost in slot {slot} inside a wall"));
        }
    }

    let banks = level.count_of(Tile::Bank);
    if banks != 1 {
        anomalies.push(format!("expected one bank, found {banks}"));
    }
    anomalies
}

fn push_anomaly(
    anomalies: &mut Vec<String>,
    anomaly_records: &mut Vec<AnomalyRecord>,
    anomaly_seen: &mut HashSet<String>,
    turn: u64,
    message: String,
) {
    anomaly_records.push(AnomalyRecord {
        turn,
        message: message.clone(),
    });
    if anomaly_seen.insert(message.clone()) {
        anomalies.push(message);
    }
}

fn default_run_id(seed: u32, started_at: DateTime<Utc>) -> String {
    format!("sim-{seed}-{}", started_at.timestamp_millis())
}

fn build_run_summary(
    run_id: String,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    outcome: RunOutcome,
) -> RunSummary {
    let duration_ms = (finished_at - started_at).num_milliseconds().max(0) as u64;
    RunSummary {
        run_id,
        started_at: started_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        finished_at: finished_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        duration_ms,
        anomaly_count: outcome.anomaly_records.len(),
        anomaly_records: outcome.anomaly_records,
        result: outcome.result,
    }
}

fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let summary_text = serde_json::to_string_pretty(summary).map_err(io::Error::other)?;
    std::fs::write(path, summary_text)
}
