//! Terminal session and per-frame wiring

use crossterm::{
    cursor,
    event::{
        self, DisableFocusChange, EnableFocusChange, Event, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue, terminal,
};
use std::io::{self, Write, stdout};
use std::time::Duration;

use crate::assets::Assets;
use crate::audio::Sounds;
use crate::error::Result;
use crate::game::GameState;
use crate::hud::{self, Label};
use crate::input::{Command, HeldKeys};
use crate::pixel::PixelBuf;
use crate::render::Renderer;
use crate::scheduler::{Control, FrameScheduler};
use crate::settings::Settings;

/// Raw mode and alternate screen for as long as it lives
pub struct TerminalGuard {
    releases: bool,
}

impl TerminalGuard {
    pub fn enter(out: &mut impl Write) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        // Dropped on any error below, which undoes raw mode too
        let mut guard = Self { releases: false };
        guard.releases = setup(out)?;
        log::info!("terminal ready, key releases reported: {}", guard.releases);
        Ok(guard)
    }

    /// Whether the terminal reports key releases
    pub fn releases(&self) -> bool {
        self.releases
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore(&mut stdout(), self.releases);
        let _ = terminal::disable_raw_mode();
    }
}

/// Enter the alternate screen and ask for key release events. Returns
/// whether release reporting got switched on.
fn setup(out: &mut impl Write) -> io::Result<bool> {
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
        EnableFocusChange,
    )?;
    if !terminal::supports_keyboard_enhancement().unwrap_or(false) {
        return Ok(false);
    }
    execute!(
        out,
        PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
        )
    )?;
    Ok(true)
}

fn restore(out: &mut impl Write, releases: bool) -> io::Result<()> {
    if releases {
        execute!(out, PopKeyboardEnhancementFlags)?;
    }
    execute!(
        out,
        DisableFocusChange,
        terminal::LeaveAlternateScreen,
        cursor::Show,
        terminal::EnableLineWrap,
    )
}

/// Everything the frame loop owns
pub struct App {
    state: GameState,
    renderer: Renderer,
    keys: HeldKeys,
    sounds: Sounds,
    buf: PixelBuf,
}

impl App {
    pub fn new(settings: &Settings, seed: u64, releases: bool, cols: u16, rows: u16) -> Self {
        let sounds = if settings.sound {
            Sounds::new()
        } else {
            Sounds::muted()
        };
        log::info!("sound {}", if sounds.is_live() { "on" } else { "off" });
        Self {
            state: GameState::new(seed),
            renderer: Renderer::new(Assets::load(&settings.assets_dir), seed ^ 0x5EED),
            keys: HeldKeys::new(releases, settings.key_hold_frames()),
            sounds,
            buf: PixelBuf::new(cols as usize, rows as usize * 2),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Apply one terminal event
    pub fn handle_event(&mut self, event: Event) -> Control {
        match event {
            Event::Key(key) => match self.keys.handle(key) {
                Some(Command::Quit) => return Control::Stop,
                Some(Command::Start) => {
                    self.state.start();
                }
                None => {}
            },
            Event::Resize(c, r) => self.buf.resize(c as usize, r as usize * 2),
            Event::FocusLost => self.keys.clear(),
            _ => {}
        }
        Control::Continue
    }

    /// Simulate and draw one frame. Returns the overlay text for it.
    pub fn step(&mut self) -> Vec<Label> {
        self.state.update(self.keys.movement());
        self.keys.end_frame();
        for event in self.state.drain_events() {
            self.sounds.on_event(event);
        }

        self.renderer.draw(&self.state, &mut self.buf);
        hud::draw(&self.state, &mut self.buf)
    }

    pub fn present(&self, out: &mut impl Write, labels: &[Label]) -> io::Result<()> {
        self.buf.render(out)?;
        for label in labels {
            label.render(out)?;
        }
        out.flush()
    }
}

/// Run the game until the player quits
pub fn run(settings: &Settings) -> Result<()> {
    let mut out = stdout();
    let guard = TerminalGuard::enter(&mut out)?;
    let (cols, rows) = terminal::size()?;
    let seed = settings.seed.unwrap_or_else(rand::random);
    log::info!("seed {}, {}x{} cells, {} fps", seed, cols, rows, settings.fps);

    let mut app = App::new(settings, seed, guard.releases(), cols, rows);
    let mut scheduler = FrameScheduler::from_fps(settings.fps);
    scheduler.run(|_| -> Result<Control> {
        while event::poll(Duration::ZERO)? {
            if app.handle_event(event::read()?) == Control::Stop {
                return Ok(Control::Stop);
            }
        }
        let labels = app.step();
        app.present(&mut out, &labels)?;
        Ok(Control::Continue)
    })?;

    queue!(out, terminal::Clear(terminal::ClearType::All))?;
    drop(guard);
    log::info!(
        "quit after {} frames, last score {}",
        scheduler.frames_run(),
        app.state().display_score()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_setup_error_propagates() {
        assert!(setup(&mut Broken).is_err());
    }

    #[test]
    fn test_restore_leaves_alternate_screen() {
        let mut out = Vec::new();
        restore(&mut out, false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\x1b[?1049l"));
        assert!(text.contains("\x1b[?25h"));
        assert!(!text.contains("\x1b[<1u"));

        let mut out = Vec::new();
        restore(&mut out, true).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("\x1b[<1u"));
    }
}
