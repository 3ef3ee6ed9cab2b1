use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::{rngs::StdRng, SeedableRng};

use wordelish::app::App;
use wordelish::catalog::CatalogSource;
use wordelish::dialog::Modal;
use wordelish::game::Game;
use wordelish::runtime::{GameEvent, Runner, TestEventSource};
use wordelish::store::MemoryStore;

fn key(code: KeyCode) -> GameEvent {
    GameEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn ctrl(c: char) -> GameEvent {
    GameEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
}

fn drive(app: &mut App, events: Vec<GameEvent>) {
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(5));

    let expected = events.len();
    for ev in events {
        tx.send(ev).unwrap();
    }

    let mut handled = 0;
    while handled < expected {
        if let GameEvent::Key(k) = runner.step() {
            app.handle_key(k);
            handled += 1;
        }
    }
}

fn app() -> App {
    let mut game = Game::new(Box::new(MemoryStore::new()), StdRng::seed_from_u64(11));
    game.load_catalog(CatalogSource::Bundled).unwrap();
    App::new(game)
}

// Headless integration using the runtime + App without a TTY
#[test]
fn headless_round_is_won_and_dismissed() {
    let mut app = app();
    let target = app.game.session().unwrap().target().to_string();

    drive(
        &mut app,
        vec![ctrl('d'), key(KeyCode::F(5)), key(KeyCode::Enter)],
    );

    match app.game.modal() {
        Modal::Result(result) => {
            assert!(result.won);
            assert_eq!(result.guess_count, 1);
            assert_eq!(result.target, target);
        }
        other => panic!("expected result dialog, got {other:?}"),
    }
    assert_eq!(app.game.statistics().games_won, 1);

    drive(&mut app, vec![key(KeyCode::Enter)]);
    assert!(!matches!(app.game.modal(), Modal::Result(_)));
    let next = app.game.session().unwrap();
    assert!(next.guesses().is_empty());
}

#[test]
fn headless_typing_edits_the_buffer_and_escape_quits() {
    let mut app = app();

    drive(
        &mut app,
        vec![
            key(KeyCode::Char('t')),
            key(KeyCode::Char('c')),
            key(KeyCode::Backspace),
        ],
    );
    assert_eq!(app.game.session().unwrap().buffer(), &['א']);
    assert!(!app.should_quit);

    drive(&mut app, vec![key(KeyCode::Esc)]);
    assert!(app.should_quit);
}
