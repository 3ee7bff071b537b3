#[cfg(test)]
mod tests {
    use glam::DVec2;

    use crate::commands::PlayerCommand;
    use crate::components::{HeldInput, Projectile};
    use crate::config::{ArchetypeId, ArchetypeTable, GameConfig};
    use crate::enums::*;
    use crate::error::ConfigError;
    use crate::events::GameEvent;
    use crate::state::GameStateSnapshot;
    use crate::types::{Aabb, SimTime, Size};

    fn boxed(x: f64, y: f64, w: f64, h: f64) -> Aabb {
        Aabb::new(DVec2::new(x, y), Size::new(w, h))
    }

    // ---- Geometry ----

    #[test]
    fn test_overlap_basic() {
        let a = boxed(0.0, 0.0, 10.0, 10.0);
        let b = boxed(5.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = boxed(0.0, 0.0, 10.0, 10.0);
        // a.x + a.w == b.x
        let right = boxed(10.0, 0.0, 10.0, 10.0);
        // a.y + a.h == b.y
        let below = boxed(0.0, 10.0, 10.0, 10.0);
        let corner = boxed(10.0, 10.0, 10.0, 10.0);
        assert!(!a.overlaps(&right));
        assert!(!right.overlaps(&a));
        assert!(!a.overlaps(&below));
        assert!(!below.overlaps(&a));
        assert!(!a.overlaps(&corner));
    }

    #[test]
    fn test_containment_overlaps() {
        let outer = boxed(0.0, 0.0, 100.0, 100.0);
        let inner = boxed(40.0, 40.0, 4.0, 10.0);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_sim_time_advance() {
        let mut time = SimTime::default();
        for _ in 0..60 {
            time.advance(60);
        }
        assert_eq!(time.tick, 60);
        assert!((time.elapsed_secs - 1.0).abs() < 1e-9);
    }

    // ---- Components ----

    #[test]
    fn test_held_input_axis() {
        assert_eq!(HeldInput::default().axis(), 0.0);
        assert_eq!(HeldInput { left: true, right: false }.axis(), -1.0);
        assert_eq!(HeldInput { left: false, right: true }.axis(), 1.0);
        assert_eq!(HeldInput { left: true, right: true }.axis(), 0.0);
    }

    #[test]
    fn test_projectile_direction_follows_owner() {
        let up = Projectile {
            owner: ProjectileOwner::Player(0),
            speed: 8.0,
            color: [0, 0, 0],
        };
        let down = Projectile {
            owner: ProjectileOwner::Enemy,
            ..up
        };
        assert_eq!(up.dy(), -8.0);
        assert_eq!(down.dy(), 8.0);
    }

    #[test]
    fn test_drift_reverses() {
        assert_eq!(Drift::Left.reversed(), Drift::Right);
        assert_eq!(Drift::Right.sign(), 1.0);
        assert_eq!(Drift::Left.sign(), -1.0);
    }

    #[test]
    fn test_mode_player_count() {
        assert_eq!(GameMode::Single.player_count(), 1);
        assert_eq!(GameMode::TwoPlayer.player_count(), 2);
    }

    // ---- Configuration ----

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        config.validate().unwrap();
        assert_eq!(config.tick_rate, 60);
        assert_eq!(config.player.starting_lives, 3);
        assert!((config.spawn_probability() - 0.1).abs() < 1e-12);
        assert_eq!(config.enemies.archetypes.len(), 2);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = GameConfig::from_toml_str(
            r#"
            seed = 7

            [enemies]
            spawn_rate = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.enemies.spawn_rate, 0.0);
        assert_eq!(config.spawn_probability(), 0.0);
        assert_eq!(config.field.width, 800.0);
        assert_eq!(config.enemies.archetypes.len(), 2);
    }

    #[test]
    fn test_toml_archetype_table() {
        let config = GameConfig::from_toml_str(
            r#"
            [[enemies.archetypes]]
            kind = "e1"
            size = { width = 20, height = 20 }
            speed = 1
            score = 10
            fire_probability = 0.0
            glyph = "X"
            "#,
        )
        .unwrap();
        assert_eq!(config.enemies.archetypes.len(), 1);
        let e1 = &config.enemies.archetypes[0];
        assert_eq!(e1.kind, "e1");
        assert_eq!(e1.size, Size::new(20.0, 20.0));
        assert_eq!(e1.glyph, 'X');
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = GameConfig::from_toml_str("tick_rate = \"fast\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_empty_archetype_table_rejected() {
        let mut config = GameConfig::default();
        config.enemies.archetypes.clear();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "enemies.archetypes"));
    }

    #[test]
    fn test_negative_speed_rejected() {
        let mut config = GameConfig::default();
        config.enemies.archetypes[0].speed = -1.0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.projectile.speed = 0.0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.player.speed = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_size_rejected() {
        let mut config = GameConfig::default();
        config.player.size = Size::new(0.0, 30.0);
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.enemies.archetypes[1].size = Size::new(20.0, 0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_out_of_range_knobs_rejected() {
        let mut config = GameConfig::default();
        config.enemies.spawn_rate = 10_001.0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.enemies.archetypes[0].fire_probability = 1.5;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.tick_rate = 0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.player.starting_lives = 0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.enemies.archetypes[0].size.width = 800.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ship_width_checked_per_mode() {
        let mut config = GameConfig::default();
        config.field.width = 100.0;
        config.player.size = Size::new(60.0, 30.0);

        config.validate().unwrap();
        config.validate_mode(GameMode::Single).unwrap();
        let err = config.validate_mode(GameMode::TwoPlayer).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "player.size"));

        GameConfig::default()
            .validate_mode(GameMode::TwoPlayer)
            .unwrap();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = GameConfig::load_from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_archetype_table_lookup() {
        let table = ArchetypeTable::new(GameConfig::default().enemies.archetypes);
        assert_eq!(table.len(), 2);
        let id = table.find("enemy2").unwrap();
        assert_eq!(id, ArchetypeId(1));
        assert_eq!(table[id].score, 20);
        assert!(table.get(ArchetypeId(5)).is_none());
        assert!(table.find("boss").is_none());
    }

    // ---- Serde ----

    #[test]
    fn test_command_tagging() {
        let json = serde_json::to_string(&PlayerCommand::Fire { player: 1 }).unwrap();
        assert_eq!(json, r#"{"type":"Fire","player":1}"#);

        let back: PlayerCommand =
            serde_json::from_str(r#"{"type":"SelectMode","mode":"TwoPlayer"}"#).unwrap();
        assert_eq!(
            back,
            PlayerCommand::SelectMode {
                mode: GameMode::TwoPlayer
            }
        );
    }

    #[test]
    fn test_terminal_score_lookup() {
        let mut snapshot = GameStateSnapshot::default();
        assert_eq!(snapshot.terminal_score(), None);
        snapshot.events.push(GameEvent::PlayerEliminated { player: 0 });
        snapshot
            .events
            .push(GameEvent::SessionTerminated { final_score: 130 });
        assert_eq!(snapshot.terminal_score(), Some(130));

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: GameStateSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.terminal_score(), Some(130));
        assert_eq!(back.phase, GamePhase::NotStarted);
    }
}
