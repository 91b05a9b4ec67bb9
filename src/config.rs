//=========================================================================
// Engine Configuration
//=========================================================================
//
// Every tunable the simulation accepts, with defaults reproducing the
// reference level.
//
// Sources:
//   EngineConfig::default()        → built-in reference level
//   EngineConfig::from_toml_str()  → partial overrides, missing keys default
//   EngineConfig::load(path)       → same, read from disk
//
// `validate()` is called by `EngineBuilder::build()`; a config that fails
// it never reaches a running engine.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::path::Path;
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::world::{Direction, Rect};
use crate::error::ConfigError;

//=== WorldConfig =========================================================

/// Playfield extent in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

//=== PhysicsConfig =======================================================

/// Motion constants, applied once per physics or patrol tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Added to `vy` each tick while airborne.
    pub gravity: f32,
    /// Vertical velocity set by a jump (negative is up).
    pub jump_impulse: f32,
    /// Horizontal speed applied by a move command.
    pub horizontal_speed: f32,
    /// Multiplier on `horizontal_speed` while airborne.
    pub air_control: f32,
    /// Depth of the band below a surface's top edge that still lands.
    pub landing_tolerance: f32,
    /// Vertical slack when deciding whether an obstacle stands on a surface.
    pub patrol_tolerance: f32,
    /// Default patrol speed for obstacles without their own.
    pub obstacle_speed: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.4,
            jump_impulse: -15.0,
            horizontal_speed: 7.0,
            air_control: 0.8,
            landing_tolerance: 20.0,
            patrol_tolerance: 5.0,
            obstacle_speed: 2.0,
        }
    }
}

//=== ActorConfig =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    pub spawn: [f32; 2],
    pub size: [f32; 2],
    pub initial_lives: u32,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            spawn: [50.0, 400.0],
            size: [30.0, 30.0],
            initial_lives: 3,
        }
    }
}

//=== TickIntervals =======================================================

/// Per-worker cadence in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickIntervals {
    pub physics_ms: u64,
    pub obstacle_ms: u64,
    pub interaction_ms: u64,
    pub cosmetic_ms: u64,
}

impl TickIntervals {
    pub fn physics(&self) -> Duration {
        Duration::from_millis(self.physics_ms)
    }

    pub fn obstacle(&self) -> Duration {
        Duration::from_millis(self.obstacle_ms)
    }

    pub fn interaction(&self) -> Duration {
        Duration::from_millis(self.interaction_ms)
    }

    pub fn cosmetic(&self) -> Duration {
        Duration::from_millis(self.cosmetic_ms)
    }
}

impl Default for TickIntervals {
    fn default() -> Self {
        Self {
            physics_ms: 16,
            obstacle_ms: 30,
            interaction_ms: 20,
            cosmetic_ms: 100,
        }
    }
}

//=== LevelLayout =========================================================

/// Initial placement of one patrolling obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstaclePlacement {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    #[serde(default)]
    pub direction: Direction,
    /// Overrides `physics.obstacle_speed` for this obstacle.
    #[serde(default)]
    pub speed: Option<f32>,
}

impl ObstaclePlacement {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            x,
            y,
            w,
            h,
            direction: Direction::Right,
            speed: None,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

/// Static level description.
///
/// A `[level]` table replaces the whole reference layout: lists it does
/// not mention are empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    #[serde(default)]
    pub surfaces: Vec<Rect>,
    #[serde(default)]
    pub obstacles: Vec<ObstaclePlacement>,
    #[serde(default)]
    pub collectibles: Vec<Rect>,
}

impl LevelLayout {
    /// An empty level with a single full-width floor at `floor_y`.
    pub fn flat(width: f32, floor_y: f32, floor_h: f32) -> Self {
        Self {
            surfaces: vec![Rect::new(0.0, floor_y, width, floor_h)],
            obstacles: Vec::new(),
            collectibles: Vec::new(),
        }
    }

    /// Six platforms, five obstacles and eight collectibles.
    pub fn reference() -> Self {
        Self {
            surfaces: vec![
                Rect::new(0.0, 550.0, 800.0, 50.0),
                Rect::new(100.0, 450.0, 150.0, 20.0),
                Rect::new(300.0, 380.0, 120.0, 20.0),
                Rect::new(500.0, 320.0, 150.0, 20.0),
                Rect::new(200.0, 250.0, 100.0, 20.0),
                Rect::new(450.0, 180.0, 120.0, 20.0),
            ],
            obstacles: vec![
                ObstaclePlacement::new(150.0, 420.0, 25.0, 25.0),
                ObstaclePlacement::new(350.0, 350.0, 25.0, 25.0),
                ObstaclePlacement::new(550.0, 290.0, 25.0, 25.0),
                ObstaclePlacement::new(250.0, 220.0, 25.0, 25.0),
                ObstaclePlacement::new(500.0, 150.0, 25.0, 25.0),
            ],
            collectibles: vec![
                Rect::new(180.0, 410.0, 15.0, 15.0),
                Rect::new(240.0, 410.0, 15.0, 15.0),
                Rect::new(360.0, 340.0, 15.0, 15.0),
                Rect::new(420.0, 340.0, 15.0, 15.0),
                Rect::new(580.0, 280.0, 15.0, 15.0),
                Rect::new(280.0, 210.0, 15.0, 15.0),
                Rect::new(530.0, 140.0, 15.0, 15.0),
                Rect::new(590.0, 140.0, 15.0, 15.0),
            ],
        }
    }
}

impl Default for LevelLayout {
    fn default() -> Self {
        Self::reference()
    }
}

//=== EngineConfig ========================================================

/// Complete engine configuration.
///
/// # Examples
///
/// ```
/// use aetheric_platformer::config::EngineConfig;
///
/// let config = EngineConfig::from_toml_str(r#"
///     actor_pool_limit = 2
///
///     [physics]
///     gravity = 0.5
/// "#).unwrap();
///
/// assert_eq!(config.actor_pool_limit, 2);
/// assert_eq!(config.physics.gravity, 0.5);
/// assert_eq!(config.world.width, 800.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum obstacle workers in their movement phase at once.
    pub actor_pool_limit: usize,
    pub points_per_collectible: u64,
    /// How long `stop()` waits for workers before detaching them.
    pub grace_period_ms: u64,
    /// Capacity of the engine event feed.
    pub event_capacity: usize,
    pub world: WorldConfig,
    pub physics: PhysicsConfig,
    pub actor: ActorConfig,
    pub ticks: TickIntervals,
    pub level: LevelLayout,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            actor_pool_limit: 5,
            points_per_collectible: 10,
            grace_period_ms: 500,
            event_capacity: 128,
            world: WorldConfig::default(),
            physics: PhysicsConfig::default(),
            actor: ActorConfig::default(),
            ticks: TickIntervals::default(),
            level: LevelLayout::default(),
        }
    }
}

impl EngineConfig {
    //--- Loading ----------------------------------------------------------

    /// Parses a TOML document; keys it omits keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!("Loading engine config from {}", path.display());
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    //--- Accessors --------------------------------------------------------

    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }

    pub fn spawn(&self) -> (f32, f32) {
        (self.actor.spawn[0], self.actor.spawn[1])
    }

    pub fn actor_size(&self) -> (f32, f32) {
        (self.actor.size[0], self.actor.size[1])
    }

    //--- Validation -------------------------------------------------------

    /// Rejects configurations the simulation cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("world.width", self.world.width)?;
        positive("world.height", self.world.height)?;
        positive("actor.size[0]", self.actor.size[0])?;
        positive("actor.size[1]", self.actor.size[1])?;

        if self.actor_pool_limit == 0 {
            return Err(ConfigError::ZeroPoolLimit);
        }
        if self.actor.initial_lives == 0 {
            return Err(ConfigError::NonPositive {
                field: "actor.initial_lives",
                value: 0.0,
            });
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::NonPositive {
                field: "event_capacity",
                value: 0.0,
            });
        }

        let ticks = [
            ("ticks.physics_ms", self.ticks.physics_ms),
            ("ticks.obstacle_ms", self.ticks.obstacle_ms),
            ("ticks.interaction_ms", self.ticks.interaction_ms),
            ("ticks.cosmetic_ms", self.ticks.cosmetic_ms),
        ];
        for (field, ms) in ticks {
            if ms == 0 {
                return Err(ConfigError::NonPositive { field, value: 0.0 });
            }
        }

        let p = &self.physics;
        finite("physics.gravity", p.gravity)?;
        finite("physics.jump_impulse", p.jump_impulse)?;
        finite("physics.horizontal_speed", p.horizontal_speed)?;
        finite("physics.air_control", p.air_control)?;
        positive("physics.landing_tolerance", p.landing_tolerance)?;
        positive("physics.patrol_tolerance", p.patrol_tolerance)?;
        positive("physics.obstacle_speed", p.obstacle_speed)?;

        let (sx, sy) = self.spawn();
        let (aw, _) = self.actor_size();
        if !(0.0..=self.world.width - aw).contains(&sx) || !(0.0..self.world.height).contains(&sy) {
            return Err(ConfigError::InvalidLayout(format!(
                "spawn point ({}, {}) lies outside the {}x{} world",
                sx, sy, self.world.width, self.world.height
            )));
        }

        self.validate_layout()
    }

    fn validate_layout(&self) -> Result<(), ConfigError> {
        let level = &self.level;

        for (i, rect) in level.surfaces.iter().enumerate() {
            check_rect("surface", i, rect)?;
        }
        for (i, rect) in level.collectibles.iter().enumerate() {
            check_rect("collectible", i, rect)?;
        }
        for (i, placement) in level.obstacles.iter().enumerate() {
            check_rect("obstacle", i, &placement.rect())?;
            if let Some(speed) = placement.speed {
                if !(speed.is_finite() && speed > 0.0) {
                    return Err(ConfigError::InvalidLayout(format!(
                        "obstacle {} has invalid speed {}",
                        i, speed
                    )));
                }
            }
        }

        Ok(())
    }
}

//=== Validation Helpers ==================================================

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive {
            field,
            value: f64::from(value),
        })
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite {
            field,
            value: f64::from(value),
        })
    }
}

fn check_rect(kind: &str, index: usize, rect: &Rect) -> Result<(), ConfigError> {
    let finite = [rect.x, rect.y, rect.w, rect.h].iter().all(|v| v.is_finite());
    if !finite || rect.w <= 0.0 || rect.h <= 0.0 {
        return Err(ConfigError::InvalidLayout(format!(
            "{} {} has invalid geometry {:?}",
            kind, index, rect
        )));
    }
    Ok(())
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_reference_level() {
        let config = EngineConfig::default();
        assert_eq!(config.world.width, 800.0);
        assert_eq!(config.world.height, 600.0);
        assert_eq!(config.actor_pool_limit, 5);
        assert_eq!(config.points_per_collectible, 10);
        assert_eq!(config.actor.initial_lives, 3);
        assert_eq!(config.level.surfaces.len(), 6);
        assert_eq!(config.level.obstacles.len(), 5);
        assert_eq!(config.level.collectibles.len(), 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            points_per_collectible = 25

            [ticks]
            physics_ms = 8
            "#,
        )
        .unwrap();

        assert_eq!(config.points_per_collectible, 25);
        assert_eq!(config.ticks.physics_ms, 8);
        assert_eq!(config.ticks.obstacle_ms, 30);
        assert_eq!(config.level, LevelLayout::reference());
    }

    #[test]
    fn level_table_replaces_reference_layout() {
        let config = EngineConfig::from_toml_str(
            r#"
            [[level.surfaces]]
            x = 0.0
            y = 550.0
            w = 800.0
            h = 50.0

            [[level.obstacles]]
            x = 100.0
            y = 525.0
            w = 25.0
            h = 25.0
            direction = "Left"
            speed = 3.5
            "#,
        )
        .unwrap();

        assert_eq!(config.level.surfaces.len(), 1);
        assert!(config.level.collectibles.is_empty());
        assert_eq!(config.level.obstacles[0].direction, Direction::Left);
        assert_eq!(config.level.obstacles[0].speed, Some(3.5));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = EngineConfig::from_toml_str("actor_pool_limit = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = EngineConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn rejects_zero_pool_limit() {
        let config = EngineConfig {
            actor_pool_limit: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroPoolLimit)));
    }

    #[test]
    fn rejects_non_positive_world() {
        let mut config = EngineConfig::default();
        config.world.height = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { field: "world.height", .. })
        ));
    }

    #[test]
    fn rejects_zero_tick_interval() {
        let mut config = EngineConfig::default();
        config.ticks.interaction_ms = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { field: "ticks.interaction_ms", .. })
        ));
    }

    #[test]
    fn rejects_nan_gravity() {
        let mut config = EngineConfig::default();
        config.physics.gravity = f32::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::NonFinite { .. })));
    }

    #[test]
    fn rejects_degenerate_surface() {
        let mut config = EngineConfig::default();
        config.level.surfaces.push(Rect::new(0.0, 0.0, 0.0, 10.0));
        assert!(matches!(config.validate(), Err(ConfigError::InvalidLayout(_))));
    }

    #[test]
    fn rejects_spawn_outside_world() {
        let mut config = EngineConfig::default();
        config.actor.spawn = [900.0, 400.0];
        assert!(matches!(config.validate(), Err(ConfigError::InvalidLayout(_))));
    }

    #[test]
    fn tick_intervals_convert_to_durations() {
        let ticks = TickIntervals::default();
        assert_eq!(ticks.physics(), Duration::from_millis(16));
        assert_eq!(ticks.cosmetic(), Duration::from_millis(100));
    }
}
