//! Scene drawing
//!
//! The world is a fixed 600x800 canvas scaled to fit the pixel buffer and
//! centred, with black bars on the spare sides.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::assets::{Assets, Sprite};
use crate::consts::*;
use crate::game::{GamePhase, GameState};
use crate::pixel::{BLACK, PixelBuf, Rgb};

const GROUND_FALLBACK: Rgb = Rgb(0x11, 0x11, 0x11);
const OBSTACLE_FALLBACK: Rgb = Rgb(0x55, 0x55, 0x55);
const MONSTER_FALLBACK: Rgb = Rgb(255, 0, 0);
const PLAYER_FALLBACK: Rgb = Rgb(0, 0, 255);
const SPECK: Rgb = Rgb(200, 200, 255);

const OPAQUE: u16 = 256;
const HALF: u16 = 128;

/// Specks of drifting spores drawn each frame
pub const AMBIENT_SPECKS: usize = 5;
const SPECK_SIZE: f32 = 2.0;
/// Invincibility flicker period, in frames (100 ms at 60 fps)
const FLICKER_FRAMES: u32 = 6;
/// The monster is skipped once it sinks this far below the canvas
const MONSTER_CULL_MARGIN: f32 = 100.0;

/// Mapping from world units to buffer pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f32,
    pub ox: f32,
    pub oy: f32,
}

impl Viewport {
    pub fn fit(pw: usize, ph: usize) -> Self {
        let scale = (pw as f32 / WORLD_W).min(ph as f32 / WORLD_H);
        Self {
            scale,
            ox: ((pw as f32 - WORLD_W * scale) / 2.0).floor(),
            oy: ((ph as f32 - WORLD_H * scale) / 2.0).floor(),
        }
    }

    pub fn point(&self, x: f32, y: f32) -> (i32, i32) {
        (
            (self.ox + x * self.scale).floor() as i32,
            (self.oy + y * self.scale).floor() as i32,
        )
    }

    /// World rectangle to pixel rectangle, never thinner than one pixel
    pub fn rect(&self, x: f32, y: f32, w: f32, h: f32) -> (i32, i32, i32, i32) {
        let (x0, y0) = self.point(x, y);
        let (x1, y1) = self.point(x + w, y + h);
        (x0, y0, (x1 - x0).max(1), (y1 - y0).max(1))
    }

    /// Pixel extent of the whole world canvas
    pub fn canvas(&self) -> (i32, i32, i32, i32) {
        self.rect(0.0, 0.0, WORLD_W, WORLD_H)
    }

    /// Black out everything outside the canvas
    fn mask_letterbox(&self, buf: &mut PixelBuf) {
        let (cx, cy, cw, ch) = self.canvas();
        let (bw, bh) = (buf.width() as i32, buf.height() as i32);
        buf.fill_rect(0, 0, bw, cy, BLACK);
        buf.fill_rect(0, cy + ch, bw, bh - (cy + ch), BLACK);
        buf.fill_rect(0, 0, cx, bh, BLACK);
        buf.fill_rect(cx + cw, 0, bw - (cx + cw), bh, BLACK);
    }
}

pub struct Renderer {
    assets: Assets,
    /// Decoration only; the simulation has its own RNG
    rng: Pcg32,
    specks: usize,
}

impl Renderer {
    pub fn new(assets: Assets, seed: u64) -> Self {
        Self {
            assets,
            rng: Pcg32::seed_from_u64(seed),
            specks: AMBIENT_SPECKS,
        }
    }

    #[cfg(test)]
    pub(crate) fn set_specks(&mut self, specks: usize) {
        self.specks = specks;
    }

    pub fn draw(&mut self, state: &GameState, buf: &mut PixelBuf) {
        buf.clear(BLACK);
        let view = Viewport::fit(buf.width(), buf.height());

        self.draw_ground(state, &view, buf);

        for obs in state.obstacles.iter().filter(|o| o.active) {
            draw_sprite(
                buf,
                &view,
                self.assets.obstacle.as_ref(),
                OBSTACLE_FALLBACK,
                (obs.x, obs.y, obs.w, obs.h),
                OPAQUE,
            );
        }

        let m = &state.monster;
        if monster_in_view(m.y) {
            draw_sprite(
                buf,
                &view,
                self.assets.monster.as_ref(),
                MONSTER_FALLBACK,
                (m.x, m.y, m.w, m.h),
                OPAQUE,
            );
        }

        if state.phase != GamePhase::Start {
            let p = &state.player;
            let flicker = p.invincible && (p.invincible_timer / FLICKER_FRAMES) % 2 == 0;
            draw_sprite(
                buf,
                &view,
                self.assets.player.as_ref(),
                PLAYER_FALLBACK,
                (p.x, p.y, p.w, p.h),
                if flicker { HALF } else { OPAQUE },
            );
        }

        for p in &state.particles {
            let (x, y, w, h) = view.rect(p.x, p.y, PARTICLE_SIZE, PARTICLE_SIZE);
            buf.fill_rect(x, y, w, h, p.color);
        }

        for _ in 0..self.specks {
            let sx = self.rng.random_range(0.0..WORLD_W);
            let sy = self.rng.random_range(0.0..WORLD_H);
            let (x, y, w, h) = view.rect(sx, sy, SPECK_SIZE, SPECK_SIZE);
            buf.blend_rect(x, y, w, h, SPECK, HALF);
        }

        view.mask_letterbox(buf);
    }

    /// Ground scrolls down as the player runs up the screen
    fn draw_ground(&self, state: &GameState, view: &Viewport, buf: &mut PixelBuf) {
        match &self.assets.ground {
            Some(ground) => {
                let scroll = (state.frame as f32 * state.speed) % WORLD_H;
                for top in [scroll - WORLD_H, scroll] {
                    let (x, y, w, h) = view.rect(0.0, top, WORLD_W, WORLD_H);
                    ground.blit(buf, x, y, w, h, OPAQUE);
                }
            }
            None => {
                let (x, y, w, h) = view.canvas();
                buf.fill_rect(x, y, w, h, GROUND_FALLBACK);
            }
        }
    }
}

fn monster_in_view(y: f32) -> bool {
    y < WORLD_H + MONSTER_CULL_MARGIN
}

fn draw_sprite(
    buf: &mut PixelBuf,
    view: &Viewport,
    sprite: Option<&Sprite>,
    fallback: Rgb,
    (x, y, w, h): (f32, f32, f32, f32),
    opacity: u16,
) {
    let (px, py, pw, ph) = view.rect(x, y, w, h);
    match sprite {
        Some(sprite) => sprite.blit(buf, px, py, pw, ph, opacity),
        None => buf.blend_rect(px, py, pw, ph, fallback, opacity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Obstacle;

    fn renderer() -> Renderer {
        let mut r = Renderer::new(Assets::default(), 3);
        r.set_specks(0);
        r
    }

    fn pixel_at(buf: &PixelBuf, view: &Viewport, x: f32, y: f32) -> Rgb {
        let (px, py) = view.point(x, y);
        buf.get(px as usize, py as usize)
    }

    #[test]
    fn test_viewport_fits_and_centres() {
        let view = Viewport::fit(120, 80);
        assert_eq!(view.scale, 0.1);
        assert_eq!(view.ox, 30.0);
        assert_eq!(view.oy, 0.0);
        assert_eq!(view.rect(0.0, 0.0, 1.0, 1.0), (30, 0, 1, 1));
    }

    #[test]
    fn test_fallback_scene() {
        let mut state = GameState::new(1);
        state.start();
        state.obstacles.push(Obstacle::new(0.0, 0.0));
        state.monster.y = 600.0;
        let mut buf = PixelBuf::new(120, 80);
        renderer().draw(&state, &mut buf);
        let view = Viewport::fit(120, 80);

        assert_eq!(pixel_at(&buf, &view, 32.0, 32.0), OBSTACLE_FALLBACK);
        let (cx, cy) = state.player.bounds().center();
        assert_eq!(pixel_at(&buf, &view, cx, cy), PLAYER_FALLBACK);
        assert_eq!(pixel_at(&buf, &view, state.monster.x + 4.0, 700.0), MONSTER_FALLBACK);
        assert_eq!(pixel_at(&buf, &view, 590.0, 790.0), GROUND_FALLBACK);
        // Letterbox
        assert_eq!(buf.get(0, 40), BLACK);
    }

    #[test]
    fn test_ground_sprite_scrolls() {
        const TOP: [u8; 4] = [200, 0, 0, 255];
        const BOTTOM: [u8; 4] = [0, 200, 0, 255];
        let ground = Sprite::from_rgba(1, 2, vec![TOP, BOTTOM]);
        let assets = Assets {
            ground,
            ..Assets::default()
        };
        let mut r = Renderer::new(assets, 3);
        r.set_specks(0);
        let mut state = GameState::new(1);
        let mut buf = PixelBuf::new(120, 80);

        // Unscrolled: one tile covering the canvas
        r.draw(&state, &mut buf);
        assert_eq!(buf.get(60, 10), Rgb(200, 0, 0));
        assert_eq!(buf.get(60, 70), Rgb(0, 200, 0));

        // 200 units of scroll push the tiles down 20 pixels
        state.frame = 10;
        state.speed = 20.0;
        r.draw(&state, &mut buf);
        assert_eq!(buf.get(60, 10), Rgb(0, 200, 0));
        assert_eq!(buf.get(60, 30), Rgb(200, 0, 0));
        assert_eq!(buf.get(60, 70), Rgb(0, 200, 0));
    }

    #[test]
    fn test_monster_cull_edge() {
        assert!(monster_in_view(WORLD_H));
        assert!(monster_in_view(899.0));
        assert!(!monster_in_view(900.0));
        assert!(!monster_in_view(MONSTER_START_Y));
    }

    #[test]
    fn test_inactive_obstacle_hidden() {
        let mut state = GameState::new(1);
        state.start();
        let mut obs = Obstacle::new(0.0, 0.0);
        obs.active = false;
        state.obstacles.push(obs);
        let mut buf = PixelBuf::new(120, 80);
        renderer().draw(&state, &mut buf);
        let view = Viewport::fit(120, 80);
        assert_eq!(pixel_at(&buf, &view, 32.0, 32.0), GROUND_FALLBACK);
    }

    #[test]
    fn test_player_hidden_on_title() {
        let state = GameState::new(1);
        let mut buf = PixelBuf::new(120, 80);
        renderer().draw(&state, &mut buf);
        let view = Viewport::fit(120, 80);
        let (cx, cy) = state.player.bounds().center();
        assert_eq!(pixel_at(&buf, &view, cx, cy), GROUND_FALLBACK);
    }

    #[test]
    fn test_invincible_player_flickers() {
        let mut state = GameState::new(1);
        state.start();
        state.player.invincible = true;
        state.player.invincible_timer = 60;
        let mut buf = PixelBuf::new(120, 80);
        renderer().draw(&state, &mut buf);
        let view = Viewport::fit(120, 80);
        let (cx, cy) = state.player.bounds().center();
        assert_eq!(
            pixel_at(&buf, &view, cx, cy),
            Rgb::lerp(GROUND_FALLBACK, PLAYER_FALLBACK, HALF)
        );

        state.player.invincible_timer = 54;
        renderer().draw(&state, &mut buf);
        assert_eq!(pixel_at(&buf, &view, cx, cy), PLAYER_FALLBACK);
    }

    #[test]
    fn test_specks_leave_simulation_untouched() {
        let mut a = GameState::new(42);
        let mut b = GameState::new(42);
        a.start();
        b.start();
        let mut r = Renderer::new(Assets::default(), 9);
        let mut buf = PixelBuf::new(60, 40);
        for _ in 0..120 {
            a.update(Default::default());
            r.draw(&a, &mut buf);
            b.update(Default::default());
        }
        let xs = |s: &GameState| s.obstacles.iter().map(|o| o.x).collect::<Vec<_>>();
        assert_eq!(xs(&a), xs(&b));
    }
}
