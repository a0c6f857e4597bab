//! Game state and the per-frame update
//!
//! Everything the simulation needs lives in [`GameState`]: the loop driver
//! owns one, feeds it the sampled [`Movement`] each frame and reads it back
//! for drawing. Randomness comes from a seeded PCG so a seed plus an input
//! sequence always replays the same run.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::input::Movement;
use crate::pixel::Rgb;

/// Colour of the burst spawned when the player is hit
pub const HIT_PARTICLE: Rgb = Rgb(230, 40, 40);

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title panel, waiting for the start action
    Start,
    Playing,
    /// Caught by the monster, waiting for restart
    GameOver,
}

/// Things that happened during an update, for sound and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Started,
    Hit { health: u8 },
    Caught { score: u64 },
}

/// Axis-aligned box in world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    /// Strict overlap: boxes that only touch at an edge do not collide
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub speed: f32,
    pub invincible: bool,
    /// Frames of protection left; only meaningful while `invincible`
    pub invincible_timer: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            x: WORLD_W / 2.0 - PLAYER_W / 2.0,
            y: WORLD_H / 2.0,
            w: PLAYER_W,
            h: PLAYER_H,
            speed: PLAYER_SPEED,
            invincible: false,
            invincible_timer: 0,
        }
    }
}

impl Player {
    pub fn bounds(&self) -> Aabb {
        Aabb {
            x: self.x,
            y: self.y,
            w: self.w,
            h: self.h,
        }
    }

    fn apply(&mut self, movement: Movement) {
        if movement.left {
            self.x -= self.speed;
        }
        if movement.right {
            self.x += self.speed;
        }
        if movement.up {
            self.y -= self.speed;
        }
        if movement.down {
            self.y += self.speed;
        }
        self.x = self.x.clamp(0.0, WORLD_W - self.w);
        self.y = self.y.clamp(0.0, WORLD_H - self.h);
    }

    fn grant_invincibility(&mut self, frames: u32) {
        self.invincible = frames > 0;
        self.invincible_timer = frames;
    }

    fn tick_invincibility(&mut self) {
        if self.invincible {
            self.invincible_timer = self.invincible_timer.saturating_sub(1);
            if self.invincible_timer == 0 {
                self.invincible = false;
            }
        }
    }
}

/// The chasing monster. Follows the player's column exactly and eases toward
/// a height picked by the remaining health.
#[derive(Debug, Clone)]
pub struct Monster {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub target_y: f32,
}

impl Monster {
    fn new(player: &Player) -> Self {
        let mut monster = Self {
            x: 0.0,
            y: MONSTER_START_Y,
            w: MONSTER_W,
            h: MONSTER_H,
            target_y: MONSTER_START_Y,
        };
        monster.track(player);
        monster
    }

    fn track(&mut self, player: &Player) {
        self.x = player.x + (player.w / 2.0 - self.w / 2.0);
    }

    fn ease(&mut self) {
        self.y += (self.target_y - self.y) * MONSTER_EASE;
    }

    pub fn bounds(&self) -> Aabb {
        Aabb {
            x: self.x,
            y: self.y,
            w: self.w,
            h: self.h,
        }
    }
}

/// Monster target height for a health tier. With no health left the target
/// sits just below the player, wherever the player currently is.
pub fn tier_target_y(health: u8, player_y: f32) -> f32 {
    match health {
        3.. => MONSTER_START_Y,
        2 => 700.0,
        1 => 600.0,
        0 => player_y + CATCH_OFFSET,
    }
}

#[derive(Debug, Clone)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Cleared after the obstacle hits the player once
    pub active: bool,
}

impl Obstacle {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            w: OBSTACLE_SIZE,
            h: OBSTACLE_SIZE,
            active: true,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb {
            x: self.x,
            y: self.y,
            w: self.w,
            h: self.h,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub life: u32,
    pub color: Rgb,
}

pub struct GameState {
    pub phase: GamePhase,
    /// Internal score, one tick per frame played
    pub score: u64,
    pub health: u8,
    /// Fall speed of obstacles, units per frame
    pub speed: f32,
    pub frame: u64,
    pub player: Player,
    pub monster: Monster,
    pub obstacles: Vec<Obstacle>,
    pub particles: Vec<Particle>,
    rng: Pcg32,
    events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(seed: u64) -> Self {
        let player = Player::default();
        let monster = Monster::new(&player);
        Self {
            phase: GamePhase::Start,
            score: 0,
            health: MAX_HEALTH,
            speed: START_SPEED,
            frame: 0,
            player,
            monster,
            obstacles: Vec::new(),
            particles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Start (or restart) a run. Ignored while a run is in progress.
    pub fn start(&mut self) -> bool {
        if self.phase == GamePhase::Playing {
            return false;
        }
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.health = MAX_HEALTH;
        self.speed = START_SPEED;
        self.frame = 0;
        self.player = Player::default();
        self.monster = Monster::new(&self.player);
        self.obstacles.clear();
        self.particles.clear();
        self.events.push(GameEvent::Started);
        log::info!("run started");
        true
    }

    /// Score as shown to the player
    pub fn display_score(&self) -> u64 {
        self.score / SCORE_DIVISOR
    }

    /// Frames between obstacle spawns at the current speed
    pub fn spawn_interval(&self) -> u64 {
        let shrink = (self.speed * 2.0).floor().max(0.0) as u64;
        SPAWN_BASE_FRAMES
            .saturating_sub(shrink)
            .max(SPAWN_MIN_FRAMES)
    }

    /// Events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance one frame. Does nothing outside the playing phase.
    pub fn update(&mut self, movement: Movement) {
        if self.phase != GamePhase::Playing {
            return;
        }

        self.frame += 1;
        self.score += 1;
        if self.frame % SPEED_STEP_FRAMES == 0 {
            self.speed += SPEED_STEP;
            log::debug!("speed up to {:.1}", self.speed);
        }

        self.player.apply(movement);

        self.monster.track(&self.player);
        self.monster.target_y = tier_target_y(self.health, self.player.y);
        self.monster.ease();

        if self.frame % self.spawn_interval() == 0 {
            self.spawn_obstacle();
        }

        let hit = self.advance_obstacles();
        if hit {
            self.hit_player();
        } else {
            self.player.tick_invincibility();
        }

        for p in &mut self.particles {
            p.x += p.vx;
            p.y += p.vy;
            p.life = p.life.saturating_sub(1);
        }
        self.particles.retain(|p| p.life > 0);

        if self.health == 0 && (self.monster.y - self.player.y).abs() < CATCH_DISTANCE {
            self.phase = GamePhase::GameOver;
            let score = self.display_score();
            self.events.push(GameEvent::Caught { score });
            log::info!("caught after {} frames, score {}", self.frame, score);
        }
    }

    /// Move obstacles and resolve at most one qualifying collision.
    fn advance_obstacles(&mut self) -> bool {
        let player = self.player.bounds();
        let vulnerable = !self.player.invincible && self.health > 0;
        let mut hit = false;
        for obs in &mut self.obstacles {
            obs.y += self.speed;
            if vulnerable && !hit && obs.active && obs.bounds().overlaps(&player) {
                obs.active = false;
                hit = true;
            }
        }
        self.obstacles.retain(|o| o.y <= WORLD_H);
        hit
    }

    fn hit_player(&mut self) {
        self.health = self.health.saturating_sub(1);
        self.player.grant_invincibility(INVINCIBLE_FRAMES);
        let (cx, cy) = self.player.bounds().center();
        self.burst(cx, cy, HIT_PARTICLE);
        self.monster.target_y = tier_target_y(self.health, self.player.y);
        self.events.push(GameEvent::Hit {
            health: self.health,
        });
        log::debug!("hit at frame {}, health {}", self.frame, self.health);
    }

    fn spawn_obstacle(&mut self) {
        let x = self.rng.random_range(0.0..WORLD_W - OBSTACLE_SIZE);
        self.obstacles.push(Obstacle::new(x, OBSTACLE_SPAWN_Y));
    }

    fn burst(&mut self, x: f32, y: f32, color: Rgb) {
        for _ in 0..PARTICLE_BURST {
            let vx = (self.rng.random::<f32>() - 0.5) * PARTICLE_SPREAD;
            let vy = (self.rng.random::<f32>() - 0.5) * PARTICLE_SPREAD;
            self.particles.push(Particle {
                x,
                y,
                vx,
                vy,
                life: PARTICLE_LIFE,
                color,
            });
        }
    }
}
