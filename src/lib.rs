//! Monster Chase - a terminal arcade game
//!
//! Dodge the falling rocks. Every hit costs a heart and lets the monster
//! creep closer; with no hearts left it catches you.
//!
//! Core modules:
//! - `game`: Deterministic simulation (movement, spawning, collisions, phases)
//! - `input`: Held-key sampling and one-shot commands
//! - `render`: Scene drawing into a half-block pixel buffer
//! - `hud`: Score, hearts and overlay panels
//! - `scheduler`: Fixed-rate frame loop with a stop condition
//! - `app`: Terminal session and loop wiring

pub mod app;
pub mod assets;
pub mod audio;
pub mod error;
pub mod game;
pub mod hud;
pub mod input;
pub mod pixel;
pub mod render;
pub mod scheduler;
pub mod settings;

pub use error::{Error, Result};
pub use game::{GameEvent, GamePhase, GameState};
pub use settings::Settings;

/// Game configuration constants, in world units and frames.
pub mod consts {
    /// Logical canvas size. The renderer scales this onto the terminal.
    pub const WORLD_W: f32 = 600.0;
    pub const WORLD_H: f32 = 800.0;

    pub const PLAYER_W: f32 = 64.0;
    pub const PLAYER_H: f32 = 90.0;
    /// Units per frame while a direction is held
    pub const PLAYER_SPEED: f32 = 7.0;

    pub const MAX_HEALTH: u8 = 3;
    /// Frames of protection after a hit (one second at 60 fps)
    pub const INVINCIBLE_FRAMES: u32 = 60;

    pub const MONSTER_W: f32 = 128.0;
    pub const MONSTER_H: f32 = 128.0;
    /// Off-screen resting height while at full health
    pub const MONSTER_START_Y: f32 = 900.0;
    /// Fraction of the remaining distance covered each frame
    pub const MONSTER_EASE: f32 = 0.05;
    /// Vertical distance at which a player with no hearts is caught
    pub const CATCH_DISTANCE: f32 = 50.0;
    /// Target offset below the player once health is gone
    pub const CATCH_OFFSET: f32 = 20.0;

    pub const OBSTACLE_SIZE: f32 = 64.0;
    pub const OBSTACLE_SPAWN_Y: f32 = -100.0;

    pub const START_SPEED: f32 = 5.0;
    pub const SPEED_STEP: f32 = 0.5;
    pub const SPEED_STEP_FRAMES: u64 = 600;
    pub const SPAWN_BASE_FRAMES: u64 = 60;
    pub const SPAWN_MIN_FRAMES: u64 = 20;

    pub const PARTICLE_BURST: usize = 10;
    pub const PARTICLE_LIFE: u32 = 30;
    /// Each velocity component is drawn from [-SPREAD/2, SPREAD/2)
    pub const PARTICLE_SPREAD: f32 = 5.0;
    pub const PARTICLE_SIZE: f32 = 4.0;

    /// Internal score ticks per displayed point
    pub const SCORE_DIVISOR: u64 = 10;
}
