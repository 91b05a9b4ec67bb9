//=========================================================================
// World State
//=========================================================================
//
// The entity aggregate shared by every worker.
//
// Built once from the level layout when the engine is constructed and
// dropped with it. It carries no locks: score, lives, phase and the
// `collected` flags live in the facade's partitions, and everything here
// is either immutable or a relaxed atomic with a single owning writer.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::entities::{Actor, Collectible, Obstacle, Surface};
use crate::config::EngineConfig;

//=== WorldState ==========================================================

#[derive(Debug)]
pub struct WorldState {
    pub width: f32,
    pub height: f32,
    pub spawn: (f32, f32),
    pub actor: Actor,
    pub surfaces: Vec<Surface>,
    pub obstacles: Vec<Obstacle>,
    pub collectibles: Vec<Collectible>,
}

impl WorldState {
    /// Lays out the level described by `config`.
    pub fn from_config(config: &EngineConfig) -> Self {
        let default_speed = config.physics.obstacle_speed;

        let obstacles = config
            .level
            .obstacles
            .iter()
            .enumerate()
            .map(|(id, p)| {
                Obstacle::new(id, p.rect(), p.speed.unwrap_or(default_speed), p.direction)
            })
            .collect();

        let collectibles = config
            .level
            .collectibles
            .iter()
            .enumerate()
            .map(|(id, &bounds)| Collectible { id, bounds })
            .collect();

        Self {
            width: config.world.width,
            height: config.world.height,
            spawn: config.spawn(),
            actor: Actor::new(config.spawn(), config.actor_size()),
            surfaces: config.level.surfaces.clone(),
            obstacles,
            collectibles,
        }
    }

    pub fn obstacle(&self, id: usize) -> Option<&Obstacle> {
        self.obstacles.get(id)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
