//! Terminal Blockfall runner (default binary).
//!
//! Environment:
//! - `BLOCKFALL_CONFIG`: path to a JSON engine config (missing fields use defaults)
//! - `BLOCKFALL_SEED`: piece sequence seed (defaults to the wall clock)

use std::env;
use std::fs;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use crossterm::event::{self, Event};

use blockfall::core::{EngineConfig, GameState};
use blockfall::engine::{Session, SystemClock};
use blockfall::input::{handle_key_event, should_quit};
use blockfall::term::{TermFrontend, TerminalRenderer, Viewport};

fn main() -> Result<()> {
    let config = load_config()?;
    let seed = load_seed()?;
    let game = GameState::new(config, seed)?;

    let mut term = TerminalRenderer::stdout();
    term.enter()?;

    let result = run(&mut term, game);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn load_config() -> Result<EngineConfig> {
    let Ok(path) = env::var("BLOCKFALL_CONFIG") else {
        return Ok(EngineConfig::default());
    };
    let text =
        fs::read_to_string(&path).with_context(|| format!("failed to read config {path}"))?;
    let config: EngineConfig =
        serde_json::from_str(&text).with_context(|| format!("invalid config {path}"))?;
    config.validate()?;
    Ok(config)
}

fn load_seed() -> Result<u32> {
    match env::var("BLOCKFALL_SEED") {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("BLOCKFALL_SEED must be a u32, got {raw:?}")),
        Err(_) => Ok(SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
            .unwrap_or(1)),
    }
}

fn run(term: &mut TerminalRenderer, game: GameState) -> Result<()> {
    let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
    let mut frontend = TermFrontend::new(Viewport::new(w, h));
    let mut session = Session::new(game, SystemClock::new());
    let tick = Duration::from_millis(session.config().tick_ms as u64);

    loop {
        session.tick(&mut frontend);
        term.present(frontend.frame_mut())?;

        // Collect input until the next frame is due.
        let deadline = Instant::now() + tick;
        loop {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if !event::poll(timeout)? {
                break;
            }
            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        session.push_intent(action);
                    }
                }
                Event::Resize(w, h) => {
                    frontend.set_viewport(Viewport::new(w, h));
                    term.invalidate();
                }
                _ => {}
            }
        }
    }
}
