//! Load-time configuration.
//!
//! Every field has a default (see `constants`), so a config file only needs
//! the values it changes. `GameConfig::validate` is the single gate that
//! decides whether a session may start.

use std::ops::Index;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::GameMode;
use crate::error::ConfigError;
use crate::types::Size;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Simulation ticks per second.
    pub tick_rate: u32,
    /// RNG seed for determinism.
    pub seed: u64,
    pub field: FieldConfig,
    pub player: PlayerConfig,
    pub projectile: ProjectileConfig,
    pub enemies: EnemyConfig,
}

/// Visible playfield extent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub size: Size,
    /// Units per tick.
    pub speed: f64,
    pub starting_lives: u32,
    /// Gap between the bottom of the field and the top of the player box.
    pub bottom_offset: f64,
    /// Glyph per player slot.
    pub glyphs: [char; MAX_PLAYERS],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    pub size: Size,
    /// Units per tick.
    pub speed: f64,
    pub color: [u8; 3],
    /// Minimum ticks between two shots of the same player. 0 = unlimited.
    pub fire_cooldown_ticks: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Frequency knob: per-tick spawn probability is `spawn_rate / 10000`.
    pub spawn_rate: f64,
    /// Horizontal drift per tick. 0 = straight descent.
    pub drift_speed: f64,
    /// Let enemies shoot back using their archetype's fire probability.
    pub fire_enabled: bool,
    pub projectile_color: [u8; 3],
    pub archetypes: Vec<EnemyArchetype>,
}

/// Immutable enemy template. Instances refer to it by `ArchetypeId`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyArchetype {
    pub kind: String,
    pub size: Size,
    /// Descent in units per tick.
    pub speed: f64,
    /// Awarded once when a player projectile destroys an instance.
    pub score: u64,
    /// Per-tick probability of firing (only with `fire_enabled`).
    pub fire_probability: f64,
    pub glyph: char,
}

/// Index into an `ArchetypeTable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArchetypeId(pub usize);

/// The shared, read-only set of enemy archetypes for a session.
#[derive(Debug, Clone, Default)]
pub struct ArchetypeTable {
    archetypes: Vec<EnemyArchetype>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            seed: DEFAULT_SEED,
            field: FieldConfig::default(),
            player: PlayerConfig::default(),
            projectile: ProjectileConfig::default(),
            enemies: EnemyConfig::default(),
        }
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            size: Size::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            speed: PLAYER_SPEED,
            starting_lives: PLAYER_STARTING_LIVES,
            bottom_offset: PLAYER_BOTTOM_OFFSET,
            glyphs: ['A', 'H'],
        }
    }
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            size: Size::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
            speed: PROJECTILE_SPEED,
            color: PROJECTILE_COLOR,
            fire_cooldown_ticks: FIRE_COOLDOWN_TICKS,
        }
    }
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            spawn_rate: DEFAULT_SPAWN_RATE,
            drift_speed: ENEMY_DRIFT_SPEED,
            fire_enabled: false,
            projectile_color: ENEMY_PROJECTILE_COLOR,
            archetypes: vec![
                EnemyArchetype {
                    kind: "enemy1".into(),
                    size: Size::new(20.0, 20.0),
                    speed: 1.0,
                    score: 10,
                    fire_probability: 0.01,
                    glyph: 'W',
                },
                EnemyArchetype {
                    kind: "enemy2".into(),
                    size: Size::new(20.0, 20.0),
                    speed: 1.5,
                    score: 20,
                    fire_probability: 0.02,
                    glyph: 'M',
                },
            ],
        }
    }
}

impl GameConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Reject anything the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 {
            return Err(ConfigError::invalid("tick_rate", "must be at least 1"));
        }

        let field = Size::new(self.field.width, self.field.height);
        if !field.is_valid() {
            return Err(ConfigError::invalid("field", "width and height must be positive"));
        }

        let player = &self.player;
        if !player.size.is_valid() {
            return Err(ConfigError::invalid("player.size", "must be positive"));
        }
        if player.size.width > field.width {
            return Err(ConfigError::invalid("player.size", "wider than the field"));
        }
        require_positive("player.speed", player.speed)?;
        if player.starting_lives == 0 {
            return Err(ConfigError::invalid("player.starting_lives", "must be at least 1"));
        }
        if !player.bottom_offset.is_finite()
            || player.bottom_offset < player.size.height
            || player.bottom_offset > field.height
        {
            return Err(ConfigError::invalid(
                "player.bottom_offset",
                "player box must sit inside the field",
            ));
        }

        if !self.projectile.size.is_valid() {
            return Err(ConfigError::invalid("projectile.size", "must be positive"));
        }
        require_positive("projectile.speed", self.projectile.speed)?;

        let enemies = &self.enemies;
        if !(0.0..=SPAWN_RATE_SCALE).contains(&enemies.spawn_rate) {
            return Err(ConfigError::invalid(
                "enemies.spawn_rate",
                format!("must be within 0..={SPAWN_RATE_SCALE}"),
            ));
        }
        if !enemies.drift_speed.is_finite() || enemies.drift_speed < 0.0 {
            return Err(ConfigError::invalid("enemies.drift_speed", "must be non-negative"));
        }
        if enemies.archetypes.is_empty() {
            return Err(ConfigError::invalid("enemies.archetypes", "table is empty"));
        }
        for archetype in &enemies.archetypes {
            let field_name = format!("enemies.archetypes[{}]", archetype.kind);
            if !archetype.size.is_valid() {
                return Err(ConfigError::invalid(field_name, "size must be positive"));
            }
            if archetype.size.width >= field.width {
                return Err(ConfigError::invalid(field_name, "not narrower than the field"));
            }
            require_positive(&field_name, archetype.speed)?;
            if !(0.0..=1.0).contains(&archetype.fire_probability) {
                return Err(ConfigError::invalid(field_name, "fire_probability outside 0..=1"));
            }
        }

        Ok(())
    }

    /// Check that the ships of `mode` fit side by side on the field.
    /// Separate from `validate` so a narrow field can still run single-player.
    pub fn validate_mode(&self, mode: GameMode) -> Result<(), ConfigError> {
        let ships = mode.player_count();
        if ships as f64 * self.player.size.width > self.field.width {
            return Err(ConfigError::invalid(
                "player.size",
                format!("{ships} players do not fit side by side"),
            ));
        }
        Ok(())
    }

    /// Per-tick spawn probability derived from the spawn-rate knob.
    pub fn spawn_probability(&self) -> f64 {
        (self.enemies.spawn_rate / SPAWN_RATE_SCALE).clamp(0.0, 1.0)
    }
}

fn require_positive(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, "must be positive"))
    }
}

impl ArchetypeTable {
    pub fn new(archetypes: Vec<EnemyArchetype>) -> Self {
        Self { archetypes }
    }

    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }

    pub fn get(&self, id: ArchetypeId) -> Option<&EnemyArchetype> {
        self.archetypes.get(id.0)
    }

    /// Look up an archetype id by kind name.
    pub fn find(&self, kind: &str) -> Option<ArchetypeId> {
        self.archetypes
            .iter()
            .position(|a| a.kind == kind)
            .map(ArchetypeId)
    }
}

impl Index<ArchetypeId> for ArchetypeTable {
    type Output = EnemyArchetype;

    /// Archetypes are never removed, so every id handed out stays valid.
    fn index(&self, id: ArchetypeId) -> &EnemyArchetype {
        &self.archetypes[id.0]
    }
}
