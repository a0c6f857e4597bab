//! Sprite images
//!
//! All four images are optional. Anything missing or undecodable leaves its
//! slot empty and the renderer draws a flat rectangle instead.

use std::path::Path;

use crate::pixel::{PixelBuf, Rgb};

/// Decoded RGBA image
pub struct Sprite {
    w: u32,
    h: u32,
    px: Vec<[u8; 4]>,
}

impl Sprite {
    #[cfg(test)]
    pub(crate) fn from_rgba(w: u32, h: u32, px: Vec<[u8; 4]>) -> Option<Self> {
        if w == 0 || h == 0 || px.len() != (w * h) as usize {
            return None;
        }
        Some(Self { w, h, px })
    }

    pub fn load(path: &Path) -> Result<Self, image::ImageError> {
        let img = image::open(path)?.to_rgba8();
        let (w, h) = img.dimensions();
        let px = img.pixels().map(|p| p.0).collect();
        Ok(Self { w, h, px })
    }

    /// Nearest-neighbour sample at normalized coordinates
    fn sample(&self, u: f32, v: f32) -> [u8; 4] {
        let sx = ((u * self.w as f32) as u32).min(self.w - 1);
        let sy = ((v * self.h as f32) as u32).min(self.h - 1);
        self.px[(sy * self.w + sx) as usize]
    }

    /// Stretch the sprite over a destination rectangle in buffer pixels.
    /// `opacity` is out of 256.
    pub fn blit(&self, buf: &mut PixelBuf, x: i32, y: i32, w: i32, h: i32, opacity: u16) {
        if w <= 0 || h <= 0 {
            return;
        }
        for dy in 0..h {
            let v = (dy as f32 + 0.5) / h as f32;
            for dx in 0..w {
                let u = (dx as f32 + 0.5) / w as f32;
                let [r, g, b, a] = self.sample(u, v);
                if a < 128 {
                    continue;
                }
                buf.blend(x + dx, y + dy, Rgb(r, g, b), opacity);
            }
        }
    }
}

#[derive(Default)]
pub struct Assets {
    pub player: Option<Sprite>,
    pub monster: Option<Sprite>,
    pub obstacle: Option<Sprite>,
    pub ground: Option<Sprite>,
}

impl Assets {
    /// Load whatever images exist under `dir`
    pub fn load(dir: &Path) -> Self {
        let assets = Self {
            player: load_slot(dir, "player.png"),
            monster: load_slot(dir, "monster.png"),
            obstacle: load_slot(dir, "obstacle.png"),
            ground: load_slot(dir, "ground.png"),
        };
        log::info!(
            "assets from {}: {}/4 loaded",
            dir.display(),
            assets.loaded()
        );
        assets
    }

    pub fn loaded(&self) -> usize {
        [&self.player, &self.monster, &self.obstacle, &self.ground]
            .iter()
            .filter(|s| s.is_some())
            .count()
    }
}

fn load_slot(dir: &Path, name: &str) -> Option<Sprite> {
    let path = dir.join(name);
    match Sprite::load(&path) {
        Ok(sprite) => {
            log::debug!("loaded {} ({}x{})", path.display(), sprite.w, sprite.h);
            Some(sprite)
        }
        Err(e) => {
            log::warn!("{} unavailable, using fallback: {}", path.display(), e);
            None
        }
    }
}
