#![forbid(unsafe_code)]

//! Demo application state.
//!
//! [`App`] owns the [`SearchField`], forwards terminal events to it, and
//! reacts to its actions: in remote mode a stopped-typing notification sends
//! the query to a background [`Fetcher`], whose replies are applied in
//! arrival order as they come back.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use suggest_core::event::{Event, KeyEvent, MouseButton, MouseEventKind};
use suggest_widgets::{Candidate, FieldAction, FieldEvent, SearchField};
use unicode_segmentation::UnicodeSegmentation;

use crate::cli::{Mode, Opts};
use crate::data;

/// Screen row of the text field.
pub const FIELD_ROW: u16 = 2;
/// Screen row where the panel starts.
pub const PANEL_TOP: u16 = FIELD_ROW + 1;
/// Left column of the field and panel.
pub const LEFT: u16 = 2;

/// Longest the event loop waits for input before polling timers and fetches.
const TICK: Duration = Duration::from_millis(50);

/// Shortest query sent to the remote lookup.
const MIN_REMOTE_QUERY: usize = 2;

// ---------------------------------------------------------------------------
// Fetcher
// ---------------------------------------------------------------------------

/// A completed lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchReply {
    /// Request number, increasing per request.
    pub id: u64,
    /// The query that was looked up.
    pub query: String,
    /// Long forms found.
    pub results: Vec<Candidate>,
}

struct FetchRequest {
    id: u64,
    query: String,
}

/// Simulated remote lookup on a worker thread.
pub struct Fetcher {
    requests: Option<Sender<FetchRequest>>,
    replies: Receiver<FetchReply>,
    worker: Option<JoinHandle<()>>,
    next_id: u64,
    in_flight: usize,
}

impl Fetcher {
    /// Start the worker. Each lookup sleeps for `latency` first.
    pub fn spawn(latency: Duration) -> Self {
        let (req_tx, req_rx) = mpsc::channel::<FetchRequest>();
        let (reply_tx, reply_rx) = mpsc::channel();
        let worker = thread::spawn(move || {
            while let Ok(request) = req_rx.recv() {
                thread::sleep(latency);
                let results = data::lookup_acronym(&request.query);
                let reply = FetchReply {
                    id: request.id,
                    query: request.query,
                    results,
                };
                if reply_tx.send(reply).is_err() {
                    break;
                }
            }
        });
        Self {
            requests: Some(req_tx),
            replies: reply_rx,
            worker: Some(worker),
            next_id: 0,
            in_flight: 0,
        }
    }

    /// Queue a lookup. Returns its id, or `None` if the worker has exited.
    pub fn request(&mut self, query: &str) -> Option<u64> {
        let id = self.next_id;
        let sender = self.requests.as_ref()?;
        sender
            .send(FetchRequest {
                id,
                query: query.to_owned(),
            })
            .ok()?;
        self.next_id += 1;
        self.in_flight += 1;
        tracing::debug!(id, query, "lookup requested");
        Some(id)
    }

    /// A finished lookup, if one is ready.
    pub fn try_recv(&mut self) -> Option<FetchReply> {
        match self.replies.try_recv() {
            Ok(reply) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                Some(reply)
            }
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Lookups sent but not yet received.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

impl Drop for Fetcher {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop.
        self.requests.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Demo state.
pub struct App {
    /// The field under demonstration.
    pub field: SearchField,
    mode: Mode,
    fetcher: Option<Fetcher>,
    status: String,
    dirty: bool,
    quit: bool,
}

impl App {
    /// Build the field for `opts`.
    pub fn new(opts: &Opts) -> Self {
        let mut field = SearchField::new()
            .with_config(opts.field_config())
            .with_theme(opts.theme())
            .with_highlight_style(opts.highlight());
        let fetcher = match opts.mode {
            Mode::Local => {
                field.set_candidates(data::characters());
                None
            }
            Mode::Remote => Some(Fetcher::spawn(Duration::from_millis(opts.latency_ms))),
        };
        let status = match opts.mode {
            Mode::Local => "Type a character name".to_owned(),
            Mode::Remote => "Type an acronym (e.g. ROS, PCR) and pause".to_owned(),
        };
        Self {
            field,
            mode: opts.mode,
            fetcher,
            status,
            dirty: true,
            quit: false,
        }
    }

    /// Candidate source.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Status line text.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Whether the user asked to quit.
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Take the redraw flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// How long the event loop may block.
    pub fn timeout(&self, now: Instant) -> Duration {
        self.field
            .next_deadline()
            .map_or(TICK, |deadline| deadline.saturating_duration_since(now).min(TICK))
    }

    /// Feed one terminal event.
    pub fn handle_event(&mut self, event: &Event, now: Instant) {
        match event {
            Event::Key(key) if is_quit(key) => {
                tracing::info!("quit requested");
                self.quit = true;
            }
            Event::Mouse(mouse) => {
                if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                    self.click(mouse.y, now);
                }
            }
            other => {
                self.field.handle_input(other, now);
            }
        }
        self.process_actions();
    }

    /// Advance timers and apply finished lookups.
    pub fn tick(&mut self, now: Instant) {
        self.field.poll(now);
        self.process_actions();
        self.apply_replies();
    }

    fn click(&mut self, row: u16, now: Instant) {
        if row == FIELD_ROW {
            return;
        }
        let view = self.field.view();
        let hit = row
            .checked_sub(PANEL_TOP)
            .filter(|_| view.visibility.shows_rows())
            .and_then(|offset| view.row_at(offset));
        let event = match hit {
            Some(index) => FieldEvent::RowClicked(index),
            None => FieldEvent::ClickOutside,
        };
        self.field.handle_event(&event, now);
    }

    fn process_actions(&mut self) {
        for action in self.field.drain_actions() {
            match action {
                FieldAction::Selected(candidate) => {
                    tracing::info!(title = candidate.title(), "got selection");
                    self.status = format!("Selected: {}", candidate.title());
                    self.dirty = true;
                }
                FieldAction::StoppedTyping { text } => self.stopped_typing(&text),
                FieldAction::Redraw => self.dirty = true,
            }
        }
    }

    fn stopped_typing(&mut self, text: &str) {
        let Some(fetcher) = self.fetcher.as_mut() else {
            return;
        };
        if text.graphemes(true).count() < MIN_REMOTE_QUERY {
            return;
        }
        if fetcher.request(text).is_some() {
            self.field.show_loading_indicator();
            self.status = format!("Looking up {text}…");
        } else {
            tracing::warn!("lookup worker is gone");
            self.status = "Lookup unavailable".to_owned();
        }
        self.dirty = true;
    }

    fn apply_replies(&mut self) {
        let Some(fetcher) = self.fetcher.as_mut() else {
            return;
        };
        let mut replies = Vec::new();
        while let Some(reply) = fetcher.try_recv() {
            replies.push(reply);
        }
        let idle = fetcher.in_flight() == 0;
        for reply in replies {
            tracing::debug!(
                id = reply.id,
                query = reply.query.as_str(),
                count = reply.results.len(),
                "lookup finished"
            );
            self.status = format!("{} result(s) for {}", reply.results.len(), reply.query);
            self.field.set_candidates(reply.results);
            self.field.show_panel();
        }
        // Overlapping lookups keep the indicator until the last one lands.
        if idle {
            self.field.stop_loading_indicator();
        }
        self.process_actions();
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    key.ctrl() && (key.is_char('c') || key.is_char('q'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use suggest_core::event::{KeyCode, Modifiers, MouseEvent};
    use suggest_widgets::{PanelVisibility, SelectionState};

    fn local() -> App {
        App::new(&Opts::default())
    }

    fn remote() -> App {
        App::new(&Opts {
            mode: Mode::Remote,
            latency_ms: 0,
            ..Opts::default()
        })
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c)))
    }

    fn click(y: u16) -> Event {
        Event::Mouse(MouseEvent::new(MouseEventKind::Down(MouseButton::Left), LEFT, y))
    }

    fn wait_for_reply(app: &mut App, now: Instant) {
        for _ in 0..200 {
            app.tick(now);
            if app.fetcher.as_ref().is_some_and(|f| f.in_flight() == 0) {
                return;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("lookup never finished");
    }

    #[test]
    fn ctrl_c_and_ctrl_q_quit() {
        let mut app = local();
        let t0 = Instant::now();
        app.handle_event(&Event::Key(KeyEvent::new(KeyCode::Char('x'))), t0);
        assert!(!app.should_quit());
        let ctrl_q = KeyEvent::new(KeyCode::Char('q')).with_modifiers(Modifiers::CTRL);
        app.handle_event(&Event::Key(ctrl_q), t0);
        assert!(app.should_quit());
    }

    #[test]
    fn local_mode_lists_on_focus_and_caps_rows() {
        let mut app = local();
        app.handle_event(&Event::Focus(true), Instant::now());
        let view = app.field.view();
        assert_eq!(view.visibility, PanelVisibility::VisibleWithResults);
        assert_eq!(view.rows.len(), 6);
        assert_eq!(view.rows[0].candidate.title(), "Jacob Portman");
    }

    #[test]
    fn clicking_a_row_commits_it() {
        let mut app = local();
        let t0 = Instant::now();
        app.handle_event(&Event::Focus(true), t0);
        app.handle_event(&click(PANEL_TOP + 1), t0);
        assert_eq!(app.field.value(), "Emma Bloom");
        assert_eq!(app.status(), "Selected: Emma Bloom");
    }

    #[test]
    fn clicking_elsewhere_hides_the_panel() {
        let mut app = local();
        let t0 = Instant::now();
        for c in "Miss".chars() {
            app.handle_event(&key(c), t0);
        }
        assert_eq!(app.field.selection_state(), SelectionState::RowSelected(0));
        app.handle_event(&click(40), t0);
        assert_eq!(app.field.panel_visibility(), PanelVisibility::Hidden);
        assert_eq!(app.field.selection_state(), SelectionState::NoSelection);
        assert!(app.take_dirty());
    }

    #[test]
    fn remote_lookup_after_pause() {
        let mut app = remote();
        let t0 = Instant::now();
        for c in "ro".chars() {
            app.handle_event(&key(c), t0);
        }
        assert!(app.field.results().is_empty());

        let fired = t0 + Duration::from_millis(800);
        app.tick(fired);
        assert!(app.field.is_loading());

        wait_for_reply(&mut app, fired);
        assert!(!app.field.is_loading());
        let titles: Vec<&str> = app
            .field
            .results()
            .visible()
            .iter()
            .map(Candidate::title)
            .collect();
        assert_eq!(titles, ["reactive oxygen species", "rosiglitazone", "reactive oxygen"]);
        assert_eq!(app.field.panel_visibility(), PanelVisibility::VisibleWithResults);
    }

    #[test]
    fn loading_indicator_waits_for_the_last_lookup() {
        let mut app = App::new(&Opts {
            mode: Mode::Remote,
            latency_ms: 150,
            ..Opts::default()
        });
        let t0 = Instant::now();
        for c in "ro".chars() {
            app.handle_event(&key(c), t0);
        }
        let t1 = t0 + Duration::from_millis(800);
        app.tick(t1);
        app.handle_event(&key('s'), t1);
        let t2 = t1 + Duration::from_millis(800);
        app.tick(t2);
        assert_eq!(app.fetcher.as_ref().map(Fetcher::in_flight), Some(2));

        let mut saw_partial = false;
        for _ in 0..400 {
            app.tick(t2);
            match app.fetcher.as_ref().map(Fetcher::in_flight) {
                Some(1) => {
                    saw_partial = true;
                    assert!(app.field.is_loading());
                }
                Some(0) => break,
                _ => {}
            }
            thread::sleep(Duration::from_millis(5));
        }
        assert!(saw_partial, "first reply should land before the second");
        assert!(!app.field.is_loading());
    }

    #[test]
    fn remote_ignores_single_character_queries() {
        let mut app = remote();
        let t0 = Instant::now();
        app.handle_event(&key('r'), t0);
        app.tick(t0 + Duration::from_millis(800));
        assert!(!app.field.is_loading());
        assert_eq!(app.fetcher.as_ref().map(Fetcher::in_flight), Some(0));
    }

    #[test]
    fn timeout_never_exceeds_tick() {
        let mut app = local();
        let t0 = Instant::now();
        assert_eq!(app.timeout(t0), TICK);
        app.handle_event(&key('a'), t0);
        assert!(app.timeout(t0) <= TICK);
        assert_eq!(app.timeout(t0 + Duration::from_secs(5)), Duration::ZERO);
    }
}
