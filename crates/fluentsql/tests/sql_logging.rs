//! Rendered SQL is emitted as `tracing` events on `fluentsql.sql`.
#![cfg(feature = "tracing")]

use fluentsql::{Compiler, CompilerConfig, Query, select, subquery};
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

#[derive(Debug, Clone, PartialEq)]
struct Captured {
    target: String,
    level: Level,
    kind: String,
    sql: String,
}

#[derive(Clone, Default)]
struct CaptureLayer {
    events: Arc<Mutex<Vec<Captured>>>,
}

#[derive(Default)]
struct Fields {
    kind: String,
    sql: String,
}

impl Visit for Fields {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "kind" => self.kind = value.to_string(),
            "sql" => self.sql = value.to_string(),
            _ => {}
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "kind" => self.kind = format!("{:?}", value),
            "sql" => self.sql = format!("{:?}", value),
            _ => {}
        }
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = Fields::default();
        event.record(&mut fields);
        self.events.lock().unwrap().push(Captured {
            target: event.metadata().target().to_string(),
            level: *event.metadata().level(),
            kind: fields.kind,
            sql: fields.sql,
        });
    }
}

fn capture(compiler: &Compiler, query: &Query) -> Vec<Captured> {
    let layer = CaptureLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    tracing::subscriber::with_default(subscriber, || {
        compiler.compile(query).unwrap();
    });
    let events = layer.events.lock().unwrap().clone();
    events
}

fn users() -> Query {
    let mut q = select(["id"]);
    q.from("users").where_("active = 1");
    q
}

#[test]
fn emits_debug_event_by_default() {
    let events = capture(&Compiler::default(), &users());
    assert_eq!(
        events,
        vec![Captured {
            target: "fluentsql.sql".to_string(),
            level: Level::DEBUG,
            kind: "SELECT".to_string(),
            sql: "SELECT id FROM users WHERE active = 1".to_string(),
        }]
    );
}

#[test]
fn emits_trace_event_when_sql_logging_is_disabled() {
    let compiler = Compiler::from_config(&CompilerConfig::new().disable_sql_logging());
    let events = capture(&compiler, &users());
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].target, "fluentsql.sql");
    assert_eq!(events[0].level, Level::TRACE);
}

#[test]
fn logged_sql_is_truncated() {
    let compiler = Compiler::from_config(&CompilerConfig::new().with_max_logged_sql_length(9));
    let events = capture(&compiler, &users());
    assert_eq!(events[0].sql, "SELECT id...");
}

#[test]
fn nested_statements_log_once() {
    let mut q = Query::new();
    q.select(["*"]).from(subquery(|q| {
        q.select(["id"]).from("users");
        "u"
    }));
    let events = capture(&Compiler::default(), &q);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].sql, "SELECT * FROM (SELECT id FROM users) AS u");
}

#[test]
fn bare_conditions_are_tagged() {
    let mut q = Query::new();
    q.where_("a = 1");
    let events = capture(&Compiler::default(), &q);
    assert_eq!(events[0].kind, "CONDITION");
}
