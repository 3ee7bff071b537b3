//! Messages exchanged between the input thread and the game loop thread.

use barrage_core::commands::PlayerCommand;

/// Commands sent from the input side to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Notifications sent from the game loop thread back to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopEvent {
    /// Every player is out of lives. Sent once per session.
    SessionTerminated { final_score: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();

        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::TogglePause))
            .unwrap();
        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::Fire { player: 1 }))
            .unwrap();
        tx.send(GameLoopCommand::Shutdown).unwrap();

        let commands: Vec<_> = rx.try_iter().collect();
        assert_eq!(commands.len(), 3);
        assert!(matches!(
            commands[0],
            GameLoopCommand::PlayerCommand(PlayerCommand::TogglePause)
        ));
        assert!(matches!(
            commands[1],
            GameLoopCommand::PlayerCommand(PlayerCommand::Fire { player: 1 })
        ));
        assert!(matches!(commands[2], GameLoopCommand::Shutdown));
    }
}
