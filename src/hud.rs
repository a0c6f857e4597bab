//! Score, hearts and the start / game-over panels
//!
//! Numbers and hearts are pixel art drawn into the frame. Panel text is
//! terminal text printed over the finished frame, since a 3x5 font is
//! unreadable at the sizes a terminal offers.

use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};
use std::io::{self, Write};

use crate::consts::MAX_HEALTH;
use crate::game::{GamePhase, GameState};
use crate::pixel::{PixelBuf, Rgb};
use crate::render::Viewport;

const WHITE: Rgb = Rgb(255, 255, 255);
const SHADOW: Rgb = Rgb(30, 30, 30);
const HEART: Rgb = Rgb(220, 30, 50);
const HEART_LOST: Rgb = Rgb(40, 40, 40);
const PANEL: Rgb = Rgb(24, 20, 36);
const PANEL_EDGE: Rgb = Rgb(120, 40, 60);
const TITLE: Rgb = Rgb(240, 80, 90);
const TEXT_DIM: Rgb = Rgb(170, 170, 200);

// ── 3x5 bitmap digits ──────────────────────────────────────────────────────

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

#[rustfmt::skip]
const HEART_GLYPH: [u8; 25] = [
    0,1,0,1,0,
    1,1,1,1,1,
    1,1,1,1,1,
    0,1,1,1,0,
    0,0,1,0,0,
];

fn draw_digit(buf: &mut PixelBuf, x: i32, y: i32, d: u8, fg: Rgb) {
    let glyph = &DIGITS[d as usize];
    for row in 0..5 {
        for col in 0..3 {
            if glyph[row * 3 + col] == 1 {
                let px = x + col as i32;
                let py = y + row as i32;
                buf.set(px + 1, py + 1, SHADOW);
                buf.set(px, py, fg);
            }
        }
    }
}

pub fn draw_number(buf: &mut PixelBuf, cx: i32, y: i32, n: u64, fg: Rgb) {
    let s = n.to_string();
    let total_w = s.len() as i32 * 4 - 1; // 3px per digit + 1px spacing
    let start_x = cx - total_w / 2;
    for (i, ch) in s.bytes().enumerate() {
        draw_digit(buf, start_x + i as i32 * 4, y, ch - b'0', fg);
    }
}

fn draw_heart(buf: &mut PixelBuf, x: i32, y: i32, c: Rgb) {
    for (i, on) in HEART_GLYPH.iter().enumerate() {
        if *on == 1 {
            buf.set(x + (i % 5) as i32, y + (i / 5) as i32, c);
        }
    }
}

/// A line of terminal text placed over the pixel frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub col: u16,
    pub row: u16,
    pub text: String,
    pub fg: Rgb,
    pub bg: Rgb,
}

impl Label {
    fn centered(cx: i32, row: i32, text: String, fg: Rgb) -> Self {
        let half = text.chars().count() as i32 / 2;
        Self {
            col: (cx - half).max(0) as u16,
            row: row.max(0) as u16,
            text,
            fg,
            bg: PANEL,
        }
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        let Rgb(fr, fg, fb) = self.fg;
        let Rgb(br, bg, bb) = self.bg;
        queue!(
            out,
            cursor::MoveTo(self.col, self.row),
            style::SetForegroundColor(CColor::Rgb { r: fr, g: fg, b: fb }),
            style::SetBackgroundColor(CColor::Rgb { r: br, g: bg, b: bb }),
            style::Print(&self.text),
            style::ResetColor
        )
    }
}

/// Draw score and hearts, plus the panel for the current phase. Returns the
/// panel text to print once the frame is on screen.
pub fn draw(state: &GameState, buf: &mut PixelBuf) -> Vec<Label> {
    let view = Viewport::fit(buf.width(), buf.height());
    let (cx, cy, cw, ch) = view.canvas();

    let lines: Vec<(String, Rgb)> = match state.phase {
        GamePhase::Playing => {
            draw_number(buf, cx + cw / 2, cy + 2, state.display_score(), WHITE);
            for i in 0..MAX_HEALTH {
                let c = if i < state.health { HEART } else { HEART_LOST };
                draw_heart(buf, cx + 2 + i as i32 * 6, cy + 2, c);
            }
            return Vec::new();
        }
        GamePhase::Start => vec![
            ("MONSTER CHASE".to_string(), TITLE),
            (String::new(), WHITE),
            ("Dodge the falling rocks.".to_string(), TEXT_DIM),
            ("Each hit lets the monster closer.".to_string(), TEXT_DIM),
            (String::new(), WHITE),
            ("Arrows / WASD to move".to_string(), WHITE),
            ("ENTER to start   Q to quit".to_string(), WHITE),
        ],
        GamePhase::GameOver => vec![
            ("GAME OVER".to_string(), TITLE),
            (String::new(), WHITE),
            (format!("SCORE: {}", state.display_score()), WHITE),
            (String::new(), WHITE),
            ("ENTER to restart   Q to quit".to_string(), TEXT_DIM),
        ],
    };

    buf.dim();

    // Two pixel rows per text row, one blank text row above and below
    let widest = lines.iter().map(|(t, _)| t.chars().count()).max().unwrap_or(0) as i32;
    let panel_w = (widest + 4).min(buf.width() as i32);
    let panel_h = (lines.len() as i32 + 2) * 2;
    let px = cx + cw / 2 - panel_w / 2;
    let py = (cy + ch / 2 - panel_h / 2) & !1; // align to a text row
    buf.fill_rect(px - 1, py - 1, panel_w + 2, panel_h + 2, PANEL_EDGE);
    buf.fill_rect(px, py, panel_w, panel_h, PANEL);

    let first_row = py / 2 + 1;
    lines
        .into_iter()
        .enumerate()
        .filter(|(_, (text, _))| !text.is_empty())
        .map(|(i, (text, fg))| Label::centered(cx + cw / 2, first_row + i as i32, text, fg))
        .collect()
}
