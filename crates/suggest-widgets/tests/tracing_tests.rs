#![forbid(unsafe_code)]
#![cfg(feature = "tracing")]

//! Structured logging integration tests.
//!
//! Run with:
//!   cargo test -p suggest-widgets --features tracing --test tracing_tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use suggest_widgets::field::{FieldEvent, SearchField};
use suggest_widgets::FieldConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Test Infrastructure
// ============================================================================

/// A captured event or span with its fields.
#[derive(Debug, Clone)]
struct Captured {
    /// Span name, or the event's `message` field.
    name: String,
    fields: HashMap<String, String>,
    /// Name of the span the record was created in, if any.
    parent: Option<String>,
}

/// A tracing Layer that records spans and events.
struct Capture {
    spans: Arc<Mutex<Vec<Captured>>>,
    events: Arc<Mutex<Vec<Captured>>>,
}

/// Handle to read captured records after the closure ran.
struct CaptureHandle {
    spans: Arc<Mutex<Vec<Captured>>>,
    events: Arc<Mutex<Vec<Captured>>>,
}

impl CaptureHandle {
    fn spans(&self) -> Vec<Captured> {
        self.spans.lock().unwrap().clone()
    }

    fn events(&self) -> Vec<Captured> {
        self.events.lock().unwrap().clone()
    }

    fn event(&self, message: &str) -> Option<Captured> {
        self.events().into_iter().find(|e| e.name == message)
    }
}

/// Visitor that extracts fields as strings.
struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for Capture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);
        let parent = ctx
            .current_span()
            .id()
            .and_then(|id| ctx.span(id))
            .map(|span| span.name().to_string());
        self.spans.lock().unwrap().push(Captured {
            name: attrs.metadata().name().to_string(),
            fields: visitor.0.into_iter().collect(),
            parent,
        });
    }

    fn on_event(&self, event: &tracing::Event<'_>, ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let mut fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let name = fields.remove("message").unwrap_or_default();
        let parent = ctx.event_span(event).map(|span| span.name().to_string());
        self.events.lock().unwrap().push(Captured {
            name,
            fields,
            parent,
        });
    }
}

fn with_captured<F>(f: F) -> CaptureHandle
where
    F: FnOnce(),
{
    let spans = Arc::new(Mutex::new(Vec::new()));
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = Capture {
        spans: spans.clone(),
        events: events.clone(),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    CaptureHandle { spans, events }
}

fn fruit_field() -> SearchField {
    SearchField::new().with_candidates(["Apple", "Apricot", "Banana"])
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn text_change_opens_span_with_refilter_inside() {
    let handle = with_captured(|| {
        let mut field = fruit_field();
        field.handle_event(&FieldEvent::text("Ap"), Instant::now());
    });

    assert!(handle.spans().iter().any(|s| s.name == "text_changed"));
    let refilter = handle.event("refilter").expect("refilter event");
    assert_eq!(refilter.parent.as_deref(), Some("text_changed"));
    assert_eq!(refilter.fields.get("query").map(String::as_str), Some("Ap"));
    assert_eq!(refilter.fields.get("prefix_count").map(String::as_str), Some("2"));
    assert_eq!(refilter.fields.get("total").map(String::as_str), Some("2"));
}

#[test]
fn inline_completion_is_logged() {
    let handle = with_captured(|| {
        let mut field = fruit_field();
        field.handle_event(&FieldEvent::text("App"), Instant::now());
    });

    let event = handle.event("inline completion").expect("inline completion event");
    assert_eq!(event.fields.get("completed").map(String::as_str), Some("Apple"));
}

#[test]
fn commit_and_stopped_typing_are_logged() {
    let handle = with_captured(|| {
        let mut field = fruit_field();
        let t0 = Instant::now();
        field.handle_event(&FieldEvent::text("an"), t0);
        field.handle_event(&FieldEvent::RowClicked(0), t0);
        field.poll(t0 + Duration::from_millis(800));
    });

    let commit = handle.event("selection committed").expect("commit event");
    assert_eq!(commit.fields.get("title").map(String::as_str), Some("Banana"));
    assert!(handle.event("stopped typing").is_some());
}

#[test]
fn config_and_candidate_swaps_are_logged() {
    let handle = with_captured(|| {
        let mut field = fruit_field();
        field.set_config(FieldConfig::default().with_max_results(1));
        field.set_candidates(["Cherry"]);
    });

    let config = handle.event("field config changed").expect("config event");
    assert_eq!(config.fields.get("max_results").map(String::as_str), Some("1"));
    let swap = handle.event("candidates replaced").expect("swap event");
    assert_eq!(swap.fields.get("count").map(String::as_str), Some("1"));
}
