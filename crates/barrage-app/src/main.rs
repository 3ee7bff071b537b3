use std::error::Error;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::{mpsc, Mutex};
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use tracing::{error, info};

use barrage_app::game_loop::spawn_game_loop;
use barrage_app::input::{InputAction, InputAdapter};
use barrage_app::render::TerminalRenderer;
use barrage_app::state::{GameLoopCommand, LoopEvent};
use barrage_core::config::GameConfig;
use barrage_sim::SimulationEngine;

/// How long the input thread waits for a key before re-checking held keys.
const INPUT_POLL: Duration = Duration::from_millis(10);

fn init_tracing() -> Result<(), Box<dyn Error>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // The terminal belongs to the game, so logs go to a file.
    let path = std::env::var("BARRAGE_LOG").unwrap_or_else(|_| "barrage.log".to_string());
    let writer = Mutex::new(File::create(path)?);

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(writer)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(false)
            .with_writer(writer)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
    Ok(())
}

/// Config path from the first argument, else `BARRAGE_CONFIG`, else defaults.
fn load_config() -> Result<GameConfig, Box<dyn Error>> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("BARRAGE_CONFIG").ok());
    match path {
        Some(path) => {
            info!(%path, "loading config");
            Ok(GameConfig::load_from_file(&path)?)
        }
        None => Ok(GameConfig::default()),
    }
}

/// Raw mode and the alternate screen, restored on drop.
struct TerminalGuard {
    keyboard_enhanced: bool,
}

impl TerminalGuard {
    fn enter() -> std::io::Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        out.execute(terminal::EnterAlternateScreen)?;
        out.execute(cursor::Hide)?;

        // Ask for key release events; terminals without support fall back
        // to the hold window in the input adapter.
        let keyboard_enhanced = out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
        Ok(Self { keyboard_enhanced })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = stdout();
        if self.keyboard_enhanced {
            let _ = out.execute(PopKeyboardEnhancementFlags);
        }
        let _ = out.execute(cursor::Show);
        let _ = out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Reads keys until the player quits or the loop thread goes away.
/// Returns the last final score reported by the loop, if any.
fn run_input(
    cmd_tx: &mpsc::Sender<GameLoopCommand>,
    events_rx: &mpsc::Receiver<LoopEvent>,
) -> std::io::Result<Option<u64>> {
    let mut input = InputAdapter::new();
    let mut final_score = None;

    loop {
        let actions = if event::poll(INPUT_POLL)? {
            match event::read()? {
                Event::Key(key) => input.on_key(key, Instant::now()),
                _ => input.refresh(Instant::now()),
            }
        } else {
            input.refresh(Instant::now())
        };

        for action in actions {
            let command = match action {
                InputAction::Quit => return Ok(final_score),
                InputAction::Command(command) => command,
            };
            if cmd_tx.send(GameLoopCommand::PlayerCommand(command)).is_err() {
                // Loop thread exited; its handle carries the reason.
                return Ok(final_score);
            }
        }

        while let Ok(LoopEvent::SessionTerminated { final_score: score }) = events_rx.try_recv() {
            info!(final_score = score, "session over");
            final_score = Some(score);
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing()?;
    let config = load_config()?;
    let engine = SimulationEngine::new(config)?;

    let guard = TerminalGuard::enter()?;
    let renderer = TerminalRenderer::new(BufWriter::new(stdout()));
    let (events_tx, events_rx) = mpsc::channel();
    let (cmd_tx, handle) = spawn_game_loop(engine, renderer, events_tx)?;

    let input_result = run_input(&cmd_tx, &events_rx);
    let _ = cmd_tx.send(GameLoopCommand::Shutdown);
    let loop_result = handle
        .join()
        .map_err(|_| "game loop thread panicked")?;
    drop(guard);

    if let Err(err) = &loop_result {
        error!(%err, "game loop failed");
    }
    loop_result?;

    if let Some(score) = input_result? {
        let mut out = stdout();
        writeln!(out, "Final score: {score}")?;
    }
    Ok(())
}
