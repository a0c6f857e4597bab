// Headless runs of the whole frame loop: key events in, game state out.

use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use monster_chase::app::App;
use monster_chase::consts::*;
use monster_chase::game::Obstacle;
use monster_chase::scheduler::{Control, FrameScheduler};
use monster_chase::{GamePhase, Settings};

fn settings() -> Settings {
    Settings {
        seed: Some(99),
        sound: false,
        assets_dir: PathBuf::from("tests/no-assets"),
        ..Settings::default()
    }
}

fn app() -> App {
    App::new(&settings(), 99, true, 80, 40)
}

fn key(code: KeyCode, kind: KeyEventKind) -> Event {
    Event::Key(KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind))
}

fn press(app: &mut App, code: KeyCode) -> Control {
    app.handle_event(key(code, KeyEventKind::Press))
}

fn run_frames(app: &mut App, frames: u64) {
    FrameScheduler::new(Duration::ZERO)
        .with_frame_limit(frames)
        .run(|_| {
            let labels = app.step();
            let mut sink = Vec::new();
            app.present(&mut sink, &labels)?;
            Ok::<_, std::io::Error>(Control::Continue)
        })
        .unwrap();
}

#[test]
fn title_screen_waits_for_start() {
    let mut app = app();
    run_frames(&mut app, 30);
    assert_eq!(app.state().phase, GamePhase::Start);
    assert_eq!(app.state().frame, 0);

    press(&mut app, KeyCode::Enter);
    run_frames(&mut app, 30);
    assert_eq!(app.state().phase, GamePhase::Playing);
    assert_eq!(app.state().frame, 30);
}

#[test]
fn held_key_moves_until_released() {
    let mut app = app();
    press(&mut app, KeyCode::Char(' '));
    let x0 = app.state().player.x;

    press(&mut app, KeyCode::Left);
    run_frames(&mut app, 10);
    assert_eq!(app.state().player.x, x0 - 10.0 * PLAYER_SPEED);

    app.handle_event(key(KeyCode::Left, KeyEventKind::Release));
    run_frames(&mut app, 10);
    assert_eq!(app.state().player.x, x0 - 10.0 * PLAYER_SPEED);
}

#[test]
fn quit_keys_stop_the_loop() {
    let mut app = app();
    assert_eq!(press(&mut app, KeyCode::Char('q')), Control::Stop);
    assert_eq!(press(&mut app, KeyCode::Esc), Control::Stop);
    assert_eq!(press(&mut app, KeyCode::Up), Control::Continue);
}

#[test]
fn resize_follows_terminal() {
    let mut app = app();
    app.handle_event(Event::Resize(100, 30));
    let labels = app.step();
    let mut out = Vec::new();
    app.present(&mut out, &labels).unwrap();
    let text = String::from_utf8(out).unwrap();

    let rows: Vec<&str> = text.split("\r\n").collect();
    assert_eq!(rows.len(), 30);
    let cells = rows[1].chars().filter(|&c| c == ' ' || c == '\u{2580}').count();
    assert_eq!(cells, 100);
}

#[test]
fn standing_still_ends_in_game_over_then_restart() {
    let mut app = app();
    press(&mut app, KeyCode::Enter);

    // Rocks keep falling on a player who never moves; sooner or later three
    // land and the monster closes in.
    let mut frames = 0;
    while app.state().phase == GamePhase::Playing {
        run_frames(&mut app, 60);
        frames += 60;
        assert!(frames < 60 * 60 * 10, "no game over after ten minutes");
    }
    assert_eq!(app.state().phase, GamePhase::GameOver);
    assert_eq!(app.state().health, 0);

    // Restart is the same action as start
    press(&mut app, KeyCode::Enter);
    let state = app.state();
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.score, 0);
    assert_eq!(state.health, MAX_HEALTH);
    assert_eq!(state.speed, START_SPEED);
    assert!(state.obstacles.is_empty());
}

#[test]
fn same_seed_same_run() {
    let mut a = app();
    let mut b = app();
    for app in [&mut a, &mut b] {
        press(app, KeyCode::Enter);
        press(app, KeyCode::Right);
        run_frames(app, 200);
        app.handle_event(key(KeyCode::Right, KeyEventKind::Release));
        press(app, KeyCode::Down);
        run_frames(app, 300);
    }
    let (sa, sb) = (a.state(), b.state());
    assert_eq!(sa.health, sb.health);
    assert_eq!(sa.score, sb.score);
    assert_eq!(sa.player.x, sb.player.x);
    let xs = |s: &monster_chase::GameState| s.obstacles.iter().map(|o: &Obstacle| o.x).collect::<Vec<_>>();
    assert_eq!(xs(sa), xs(sb));
}
