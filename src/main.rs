//! Time Rush entry point
//!
//! Native builds run a headless autoplayed demo: `time-rush [difficulty] [seed]`.
//! Set `RUST_LOG=info` (or `debug`) to follow the run.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{SystemTime, UNIX_EPOCH};

    use time_rush::consts::TICK_MS;
    use time_rush::sim::{Command, GameEvent, Session, pick_direction};
    use time_rush::{Difficulty, HighScores, ScoreRank};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let difficulty = match args.next() {
        Some(arg) => Difficulty::from_str(&arg).unwrap_or_else(|| {
            log::warn!("Unknown difficulty '{arg}', using normal");
            Difficulty::Normal
        }),
        None => Difficulty::Normal,
    };
    let seed = match args.next() {
        Some(arg) => arg.parse::<u64>().unwrap_or_else(|_| {
            log::warn!("Seed '{arg}' is not a number, using 0");
            0
        }),
        None => 0,
    };

    log::info!(
        "Time Rush (native) starting: {} ({}), seed {seed}",
        difficulty.as_str(),
        difficulty.label()
    );

    // Simulated clock: one tick per TICK_MS, capped at ten minutes of play
    let mut session = Session::new(difficulty, seed, 0);
    let mut now: u64 = 0;
    while session.state().is_active() && now < 600_000 {
        now += TICK_MS;
        let mut events = session.tick(now);
        if session.accepts_moves(now) {
            if let Some(direction) = pick_direction(session.state()) {
                events.extend(session.handle(Command::Move(direction), now));
            }
        }
        for event in events {
            match event {
                GameEvent::Moved(report) if report.merges.iter().any(|m| m.big) => {
                    log::info!("Big merge on move {}", session.state().move_count);
                }
                GameEvent::EventFired(fired) => {
                    println!("[{:>6}ms] {}: {}", now, fired.kind.name(), fired.kind.description());
                }
                GameEvent::PhaseChanged { phase, bonus } => {
                    println!("[{:>6}ms] {} begins (x{bonus})", now, phase.as_str());
                }
                GameEvent::GameOver {
                    score,
                    moves,
                    reason,
                } => {
                    println!("[{:>6}ms] Game over ({reason:?}): {score} points in {moves} moves", now);
                }
                _ => {}
            }
        }
    }
    if session.state().is_active() {
        session.quit();
    }

    let hud = session.hud();
    println!("\nFinal board:");
    for row in session.state().board.to_rows() {
        let cells: Vec<String> = row.iter().map(|v| format!("{v:>5}")).collect();
        println!("{}", cells.join(""));
    }
    println!(
        "Score {} ({}), best tile {}, {} moves",
        hud.score,
        ScoreRank::for_score(hud.score).label(),
        hud.best_tile.unwrap_or(0),
        hud.moves
    );

    let timestamp_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut scores = HighScores::new();
    scores.add_score(hud.score, hud.moves, difficulty, timestamp_ms);
    match scores.to_json() {
        Ok(json) => println!("Leaderboard: {json}"),
        Err(err) => log::warn!("Could not encode leaderboard: {err}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser front ends drive `Session` directly
}
