//! Keyboard sampling
//!
//! Terminals that speak the keyboard enhancement protocol report key
//! releases, so a held key is tracked exactly. Everywhere else only presses
//! and auto-repeats arrive; a key then counts as held until `hold_frames`
//! frames pass without another press or repeat. The timeout has to span the
//! OS delay before the first repeat, typically 500 to 660 ms.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Directions held during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Movement {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Direction::Left),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Direction::Right),
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Direction::Up),
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Direction::Down),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// One-shot actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start from the title panel or restart after game over
    Start,
    Quit,
}

#[derive(Debug, Clone, Copy, Default)]
struct KeyState {
    down: bool,
    /// Frame of the last press or repeat
    last_seen: u64,
}

pub struct HeldKeys {
    keys: [KeyState; 4],
    releases: bool,
    hold_frames: u64,
    frame: u64,
}

impl HeldKeys {
    pub fn new(releases: bool, hold_frames: u64) -> Self {
        Self {
            keys: [KeyState::default(); 4],
            releases,
            hold_frames: hold_frames.max(1),
            frame: 0,
        }
    }

    /// Feed one key event. Returns a command if the key maps to one.
    pub fn handle(&mut self, key: KeyEvent) -> Option<Command> {
        if let Some(dir) = Direction::from_key(key.code) {
            let state = &mut self.keys[dir.index()];
            match key.kind {
                KeyEventKind::Press | KeyEventKind::Repeat => {
                    state.down = true;
                    state.last_seen = self.frame;
                }
                KeyEventKind::Release => state.down = false,
            }
            return None;
        }

        if key.kind == KeyEventKind::Release {
            return None;
        }
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => Some(Command::Start),
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(Command::Quit),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Command::Quit)
            }
            _ => None,
        }
    }

    pub fn is_held(&self, dir: Direction) -> bool {
        let state = &self.keys[dir.index()];
        if !state.down {
            return false;
        }
        self.releases || self.frame - state.last_seen < self.hold_frames
    }

    /// Directions held for the frame about to be simulated
    pub fn movement(&self) -> Movement {
        Movement {
            left: self.is_held(Direction::Left),
            right: self.is_held(Direction::Right),
            up: self.is_held(Direction::Up),
            down: self.is_held(Direction::Down),
        }
    }

    /// Advance the frame clock, dropping keys that timed out
    pub fn end_frame(&mut self) {
        self.frame += 1;
        if self.releases {
            return;
        }
        for dir in Direction::ALL {
            if !self.is_held(dir) {
                self.keys[dir.index()].down = false;
            }
        }
    }

    /// Forget every held key, e.g. when focus is lost
    pub fn clear(&mut self) {
        self.keys = [KeyState::default(); 4];
    }
}
