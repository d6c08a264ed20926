#![forbid(unsafe_code)]

//! suggest-demo binary entry point.

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use suggest_core::terminal_session::{SessionOptions, TerminalSession};
use suggest_demo::app::App;
use suggest_demo::cli;
use suggest_demo::draw;
use tracing_subscriber::EnvFilter;

fn main() {
    let opts = cli::Opts::parse();

    if let Some(path) = &opts.log_file
        && let Err(e) = init_logging(path)
    {
        eprintln!("Failed to open log file {}: {e}", path.display());
        std::process::exit(1);
    }

    let mut app = App::new(&opts);
    let session_opts = SessionOptions::interactive().with_mouse_capture(opts.mouse);
    let session = match TerminalSession::new(session_opts) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Failed to initialize terminal: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&session, &mut app) {
        drop(session);
        eprintln!("Runtime error: {e}");
        std::process::exit(1);
    }
}

fn run(session: &TerminalSession, app: &mut App) -> io::Result<()> {
    let mut stdout = io::stdout();
    // The field starts focused.
    app.handle_event(&suggest_core::event::Event::Focus(true), Instant::now());

    while !app.should_quit() {
        if app.take_dirty() {
            draw::draw(&mut stdout, app, session.size()?)?;
        }
        let timeout = app.timeout(Instant::now());
        if let Some(event) = session.next_event(timeout)? {
            app.handle_event(&event, Instant::now());
        }
        app.tick(Instant::now());
    }
    tracing::info!("demo exiting");
    Ok(())
}

fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(filter)
        .try_init()
        .map_err(io::Error::other)
}
