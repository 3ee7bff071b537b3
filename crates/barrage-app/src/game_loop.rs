//! Game loop thread: ticks the simulation engine at a fixed rate and renders
//! whenever a tick asks for it.
//!
//! The thread owns both the engine and the renderer. Commands arrive via an
//! `mpsc` channel and are queued for the next tick boundary; the terminal
//! event goes back to the host over a second channel.

use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use barrage_core::enums::GamePhase;
use barrage_sim::SimulationEngine;

use crate::render::{RenderError, Renderer};
use crate::state::{GameLoopCommand, LoopEvent};

/// Nominal duration of one tick.
pub fn tick_duration(tick_rate: u32) -> Duration {
    Duration::from_nanos(1_000_000_000 / u64::from(tick_rate.max(1)))
}

/// Spawns the game loop in a new thread.
///
/// Returns the command sender for the input side and the thread handle,
/// which yields the loop's render error if drawing failed.
pub fn spawn_game_loop<R>(
    engine: SimulationEngine,
    renderer: R,
    events_tx: mpsc::Sender<LoopEvent>,
) -> std::io::Result<(
    mpsc::Sender<GameLoopCommand>,
    JoinHandle<Result<(), RenderError>>,
)>
where
    R: Renderer + Send + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("barrage-game-loop".into())
        .spawn(move || run_game_loop(engine, renderer, cmd_rx, events_tx))?;

    Ok((cmd_tx, handle))
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop<R: Renderer>(
    mut engine: SimulationEngine,
    mut renderer: R,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    events_tx: mpsc::Sender<LoopEvent>,
) -> Result<(), RenderError> {
    let tick = tick_duration(engine.config().tick_rate);
    let mut next_tick_time = Instant::now();
    info!(tick_rate = engine.config().tick_rate, "game loop started");

    renderer.render_title()?;

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => {
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    info!(tick = engine.time().tick, "game loop stopped");
                    return Ok(());
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance one tick (engine handles pause and termination)
        let phase_before = engine.phase();
        if let Some(snapshot) = engine.tick() {
            // 3. Draw, then tell the host if the session just ended
            renderer.render(&snapshot)?;
            if let Some(final_score) = snapshot.terminal_score() {
                if events_tx
                    .send(LoopEvent::SessionTerminated { final_score })
                    .is_err()
                {
                    warn!("host dropped the event receiver");
                }
            }
        }
        if engine.phase() == GamePhase::NotStarted && phase_before != GamePhase::NotStarted {
            renderer.render_title()?;
        }

        // 4. Sleep until next tick
        next_tick_time += tick;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > tick * 2 {
            // Too far behind, reset to avoid catch-up spiral
            next_tick_time = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use barrage_core::commands::PlayerCommand;
    use barrage_core::config::GameConfig;
    use barrage_core::enums::GameMode;
    use barrage_core::state::GameStateSnapshot;

    #[derive(Default, Clone)]
    struct Recording {
        frames: Arc<Mutex<Vec<GameStateSnapshot>>>,
        titles: Arc<Mutex<usize>>,
    }

    impl Renderer for Recording {
        fn render(&mut self, snapshot: &GameStateSnapshot) -> Result<(), RenderError> {
            self.frames.lock().unwrap().push(snapshot.clone());
            Ok(())
        }

        fn render_title(&mut self) -> Result<(), RenderError> {
            *self.titles.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn fast_config() -> GameConfig {
        GameConfig {
            tick_rate: 2_000,
            ..Default::default()
        }
    }

    fn wait_for(mut done: impl FnMut() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while !done() {
            assert!(Instant::now() < deadline, "timed out waiting for the game loop");
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_tick_duration() {
        // 60Hz = 16.666ms per tick
        assert_eq!(tick_duration(60).as_nanos(), 1_000_000_000u128 / 60);
        assert_eq!(tick_duration(0), Duration::from_secs(1));
    }

    #[test]
    fn test_loop_renders_only_when_started() {
        let recording = Recording::default();
        let engine = SimulationEngine::new(fast_config()).unwrap();
        let (events_tx, _events_rx) = mpsc::channel();
        let (cmd_tx, handle) = spawn_game_loop(engine, recording.clone(), events_tx).unwrap();

        wait_for(|| *recording.titles.lock().unwrap() == 1);
        std::thread::sleep(Duration::from_millis(20));
        assert!(recording.frames.lock().unwrap().is_empty());

        cmd_tx
            .send(GameLoopCommand::PlayerCommand(PlayerCommand::SelectMode {
                mode: GameMode::Single,
            }))
            .unwrap();
        wait_for(|| recording.frames.lock().unwrap().len() >= 10);

        cmd_tx.send(GameLoopCommand::Shutdown).unwrap();
        handle.join().unwrap().unwrap();

        let frames = recording.frames.lock().unwrap();
        assert_eq!(frames[0].phase, GamePhase::Running);
        assert!(frames.windows(2).all(|w| w[0].time.tick < w[1].time.tick));
    }

    #[test]
    fn test_pause_stops_rendering() {
        let recording = Recording::default();
        let engine = SimulationEngine::new(fast_config()).unwrap();
        let (events_tx, _events_rx) = mpsc::channel();
        let (cmd_tx, handle) = spawn_game_loop(engine, recording.clone(), events_tx).unwrap();

        cmd_tx
            .send(GameLoopCommand::PlayerCommand(PlayerCommand::SelectMode {
                mode: GameMode::Single,
            }))
            .unwrap();
        wait_for(|| !recording.frames.lock().unwrap().is_empty());
        cmd_tx
            .send(GameLoopCommand::PlayerCommand(PlayerCommand::TogglePause))
            .unwrap();

        // Give the pause a moment to land, then count.
        std::thread::sleep(Duration::from_millis(20));
        let paused_at = recording.frames.lock().unwrap().len();
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(recording.frames.lock().unwrap().len(), paused_at);

        cmd_tx
            .send(GameLoopCommand::PlayerCommand(PlayerCommand::TogglePause))
            .unwrap();
        wait_for(|| recording.frames.lock().unwrap().len() > paused_at);

        drop(cmd_tx);
        handle.join().unwrap().unwrap();
    }

    #[test]
    fn test_terminal_event_forwarded_once() {
        let mut config = fast_config();
        config.enemies.spawn_rate = 10_000.0;
        let recording = Recording::default();
        let engine = SimulationEngine::new(config).unwrap();
        let (events_tx, events_rx) = mpsc::channel();
        let (cmd_tx, handle) = spawn_game_loop(engine, recording.clone(), events_tx).unwrap();

        cmd_tx
            .send(GameLoopCommand::PlayerCommand(PlayerCommand::SelectMode {
                mode: GameMode::Single,
            }))
            .unwrap();

        // A stationary ship under a constant stream of enemies runs out of lives.
        let event = events_rx.recv_timeout(Duration::from_secs(20)).unwrap();
        assert!(matches!(event, LoopEvent::SessionTerminated { .. }));

        std::thread::sleep(Duration::from_millis(20));
        assert!(events_rx.try_recv().is_err());

        let frames = recording.frames.lock().unwrap().clone();
        let last = frames.last().unwrap();
        assert_eq!(last.phase, GamePhase::Terminated);
        assert_eq!(event, LoopEvent::SessionTerminated { final_score: last.score });

        cmd_tx.send(GameLoopCommand::Shutdown).unwrap();
        handle.join().unwrap().unwrap();
    }

    #[test]
    fn test_reset_shows_title_again() {
        let recording = Recording::default();
        let engine = SimulationEngine::new(fast_config()).unwrap();
        let (events_tx, _events_rx) = mpsc::channel();
        let (cmd_tx, handle) = spawn_game_loop(engine, recording.clone(), events_tx).unwrap();

        cmd_tx
            .send(GameLoopCommand::PlayerCommand(PlayerCommand::SelectMode {
                mode: GameMode::TwoPlayer,
            }))
            .unwrap();
        wait_for(|| !recording.frames.lock().unwrap().is_empty());
        cmd_tx
            .send(GameLoopCommand::PlayerCommand(PlayerCommand::Reset))
            .unwrap();
        wait_for(|| *recording.titles.lock().unwrap() == 2);

        cmd_tx.send(GameLoopCommand::Shutdown).unwrap();
        handle.join().unwrap().unwrap();
    }
}
