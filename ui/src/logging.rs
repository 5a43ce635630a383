use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use studentdesk_core::ConsoleLevel;
use tracing::Subscriber;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::Context;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{reload, EnvFilter, Layer, Registry};

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: SystemTime,
    pub level: tracing::Level,
    pub target: String,
    pub message: String,
    pub fields: Vec<String>,
}

impl LogEntry {
    pub fn format_line(&self) -> String {
        let secs = self
            .timestamp
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_secs())
            .unwrap_or(0);
        let mut line = format!(
            "[{secs:>10}] {:<5} {:<8} {}",
            self.level.as_str(),
            self.target,
            self.message
        );
        if !self.fields.is_empty() {
            line.push_str(" | ");
            line.push_str(&self.fields.join(" "));
        }
        line
    }
}

/// Bounded buffer of recent events, shared between the subscriber and the UI.
#[derive(Debug, Clone)]
pub struct LogStore {
    inner: Arc<Mutex<VecDeque<LogEntry>>>,
    capacity: usize,
}

impl LogStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn push(&self, entry: LogEntry) {
        if let Ok(mut entries) = self.inner.lock() {
            while entries.len() >= self.capacity.max(1) {
                entries.pop_front();
            }
            entries.push_back(entry);
        }
    }

    pub fn snapshot(&self) -> Vec<LogEntry> {
        match self.inner.lock() {
            Ok(entries) => entries.iter().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }
}

pub type ReloadHandle = reload::Handle<EnvFilter, Registry>;

pub fn level_filter(level: ConsoleLevel) -> LevelFilter {
    match level {
        ConsoleLevel::Error => LevelFilter::ERROR,
        ConsoleLevel::Warn => LevelFilter::WARN,
        ConsoleLevel::Info => LevelFilter::INFO,
        ConsoleLevel::Debug => LevelFilter::DEBUG,
        ConsoleLevel::Trace => LevelFilter::TRACE,
    }
}

fn filter_for(level: ConsoleLevel) -> EnvFilter {
    EnvFilter::default().add_directive(level_filter(level).into())
}

/// Filter in force after startup, and the console level it corresponds to.
/// The level is `None` while a `RUST_LOG` directive is in charge.
pub struct LoggingHandle {
    pub reload: ReloadHandle,
    pub level: Option<ConsoleLevel>,
}

fn startup_filter(env: Option<&str>, level: ConsoleLevel) -> (EnvFilter, Option<ConsoleLevel>) {
    match env.filter(|directives| !directives.trim().is_empty()).map(EnvFilter::try_new) {
        Some(Ok(filter)) => (filter, None),
        _ => (filter_for(level), Some(level)),
    }
}

/// `RUST_LOG` takes precedence over the configured level at startup.
pub fn init_logging(store: LogStore, level: ConsoleLevel) -> LoggingHandle {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (env_filter, active_level) = startup_filter(env.as_deref(), level);
    let (reload_layer, handle) = reload::Layer::new(env_filter);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_ansi(false);

    let subscriber = Registry::default()
        .with(reload_layer)
        .with(CaptureLayer { store })
        .with(stderr_layer);

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("tracing subscriber already installed");
    }

    LoggingHandle {
        reload: handle,
        level: active_level,
    }
}

pub fn apply_log_level(handle: &ReloadHandle, level: ConsoleLevel) {
    if let Err(error) = handle.reload(filter_for(level)) {
        tracing::warn!(target: studentdesk_core::targets::UI, "Log level change failed: {}", error);
    }
}

struct CaptureLayer {
    store: LogStore,
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        self.store.push(LogEntry {
            timestamp: SystemTime::now(),
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    fields: Vec<String>,
}

impl tracing::field::Visit for EventVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(format!("{}={value}", field.name()));
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.push(format!("{}={value:?}", field.name()));
        }
    }
}
