//! Terminal lifecycle and the event loop.
//!
//! Producer threads feed a single channel:
//! - the terminal reader forwards key presses and resizes
//! - one worker per backend fetch sends the result back
//! - the blink ticker, started on first request, sends a tick every 500 ms
//! The loop owns the `App` and is the only place state changes.

use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::CrosstermBackend, Terminal};

use crate::backend::{Backend, QuerySpec};
use crate::config::SessionConfig;
use crate::tui::{
    app::App,
    colors::Theme,
    enums::AppEvent,
    screen::Effect,
    session::Session,
};

const BLINK_INTERVAL: Duration = Duration::from_millis(500);

/// Initialise and run the terminal user interface until the user quits.
pub fn run_tui(config: &SessionConfig, backend: Arc<dyn Backend>) -> io::Result<()> {
    install_panic_hook();
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = event_loop(&mut terminal, config, backend);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &SessionConfig,
    backend: Arc<dyn Backend>,
) -> io::Result<()> {
    let size = terminal.size()?;
    let session = Session::new(backend, config.query.clone(), size.width, size.height);
    let mut app = App::new(session, Theme::default(), config.user.as_deref().unwrap_or(""));

    let (tx, rx) = mpsc::channel::<AppEvent>();
    spawn_terminal_reader(tx.clone());
    tracing::info!(backend = app.session.backend.name(), "terminal ui started");

    loop {
        terminal.draw(|f| app.render(f))?;

        if app.should_quit {
            break;
        }

        let event = match rx.recv() {
            Ok(event) => event,
            Err(_) => break,
        };

        if let Some(effect) = app.handle_event(event) {
            match effect {
                Effect::Fetch { generation, spec } => {
                    spawn_fetch(Arc::clone(&app.session.backend), spec, generation, tx.clone())
                }
                Effect::StartBlink => spawn_ticker(tx.clone()),
            }
        }
    }

    tracing::info!("terminal ui stopped");
    Ok(())
}

/// Restore the terminal before the default hook prints the panic.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

fn spawn_terminal_reader(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        let event = match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => AppEvent::Key(key),
            Ok(Event::Resize(width, height)) => AppEvent::Resize { width, height },
            Ok(_) => continue,
            Err(err) => {
                tracing::warn!(error = %err, "terminal read failed");
                break;
            }
        };
        if tx.send(event).is_err() {
            break;
        }
    });
}

fn spawn_fetch(backend: Arc<dyn Backend>, spec: QuerySpec, generation: u64, tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let result = backend.query(&spec);
        let _ = tx.send(AppEvent::Fetched { generation, result });
    });
}

fn spawn_ticker(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        thread::sleep(BLINK_INTERVAL);
        if tx.send(AppEvent::Tick).is_err() {
            break;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DemoBackend;

    #[test]
    fn fetch_worker_reports_its_generation() {
        let (tx, rx) = mpsc::channel();
        spawn_fetch(Arc::new(DemoBackend::new()), QuerySpec::for_user("sarah"), 9, tx);
        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            AppEvent::Fetched { generation, result } => {
                assert_eq!(generation, 9);
                assert_eq!(result.unwrap().len(), 2);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn ticker_sends_ticks() {
        let (tx, rx) = mpsc::channel();
        spawn_ticker(tx);
        assert!(matches!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), AppEvent::Tick));
    }
}
