//! Key events to player commands.
//!
//! Movement keys are tracked as held state. Terminals with keyboard
//! enhancement report key releases; classic terminals only repeat presses,
//! so a key also counts as released once no press or repeat has arrived
//! within `HOLD_WINDOW`. `Steer` commands are sent when a player's held
//! state changes, and again after a mode select or reset so fresh ships pick
//! up keys that were already down. Fire keys are edge-triggered: one `Fire`
//! per press.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use barrage_core::commands::PlayerCommand;
use barrage_core::constants::MAX_PLAYERS;
use barrage_core::enums::GameMode;

/// A key counts as held if its last press/repeat arrived within this window.
/// OS key repeat runs at 15 Hz or more, so the window is refreshed in time.
pub const HOLD_WINDOW: Duration = Duration::from_millis(133);

/// What the host should do with one key event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputAction {
    Command(PlayerCommand),
    Quit,
}

/// Per-player key bindings.
struct Bindings {
    left: KeyCode,
    right: KeyCode,
    fire: KeyCode,
}

const BINDINGS: [Bindings; MAX_PLAYERS] = [
    Bindings {
        left: KeyCode::Left,
        right: KeyCode::Right,
        fire: KeyCode::Char(' '),
    },
    Bindings {
        left: KeyCode::Char('a'),
        right: KeyCode::Char('d'),
        fire: KeyCode::Char('w'),
    },
];

/// Letters are matched case-insensitively.
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

#[derive(Debug, Default)]
pub struct InputAdapter {
    /// Each held key and when it was last seen.
    last_seen: HashMap<KeyCode, Instant>,
    /// Last (left, right) state sent per player.
    steer: [(bool, bool); MAX_PLAYERS],
}

impl InputAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate one key event. Also refreshes held state, so a release
    /// yields its `Steer` immediately.
    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> Vec<InputAction> {
        let code = normalize(key.code);
        let mut actions = Vec::new();

        match key.kind {
            KeyEventKind::Press => {
                self.last_seen.insert(code, now);
                if let Some(action) = one_shot(code, key.modifiers) {
                    if starts_fresh_ships(&action) {
                        // New ships start with nothing held; resend what is.
                        self.steer = Default::default();
                    }
                    actions.push(action);
                }
            }
            KeyEventKind::Repeat => {
                self.last_seen.insert(code, now);
            }
            KeyEventKind::Release => {
                self.last_seen.remove(&code);
            }
        }

        actions.extend(self.refresh(now));
        actions
    }

    /// Expire stale keys and emit `Steer` for every player whose held state
    /// changed since the last call.
    pub fn refresh(&mut self, now: Instant) -> Vec<InputAction> {
        self.last_seen
            .retain(|_, seen| now.saturating_duration_since(*seen) <= HOLD_WINDOW);

        let mut actions = Vec::new();
        for (player, bindings) in BINDINGS.iter().enumerate() {
            let held = (
                self.last_seen.contains_key(&bindings.left),
                self.last_seen.contains_key(&bindings.right),
            );
            if held != self.steer[player] {
                self.steer[player] = held;
                actions.push(InputAction::Command(PlayerCommand::Steer {
                    player,
                    left: held.0,
                    right: held.1,
                }));
            }
        }
        actions
    }
}

/// Mode selection and reset replace the ships, dropping their held input.
fn starts_fresh_ships(action: &InputAction) -> bool {
    matches!(
        action,
        InputAction::Command(PlayerCommand::SelectMode { .. } | PlayerCommand::Reset)
    )
}

/// Commands bound to a single key press.
fn one_shot(code: KeyCode, modifiers: KeyModifiers) -> Option<InputAction> {
    let command = match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            return Some(InputAction::Quit)
        }
        KeyCode::Char('q') | KeyCode::Esc => return Some(InputAction::Quit),
        KeyCode::Char('1') => PlayerCommand::SelectMode {
            mode: GameMode::Single,
        },
        KeyCode::Char('2') => PlayerCommand::SelectMode {
            mode: GameMode::TwoPlayer,
        },
        KeyCode::Char('p') => PlayerCommand::TogglePause,
        KeyCode::Char('r') => PlayerCommand::Reset,
        KeyCode::Char('n') => PlayerCommand::AdvanceRound,
        code => {
            let player = BINDINGS.iter().position(|b| b.fire == code)?;
            PlayerCommand::Fire { player }
        }
    };
    debug!(?command, "key command");
    Some(InputAction::Command(command))
}
