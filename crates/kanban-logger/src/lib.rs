//! Rolling Logger
//!
//! Daily-rolling log files plus an in-memory circular buffer of the most
//! recent lines. Records emitted through the `log` facade are captured as
//! well as `tracing` events.

use std::collections::VecDeque;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Number of lines kept in memory by default
pub const DEFAULT_CAPACITY: usize = 500;

static GLOBAL_RING: OnceLock<RingBuffer> = OnceLock::new();

/// Logger setup errors
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("failed to create log directory: {0}")]
    Io(#[from] io::Error),

    #[error("invalid log filter '{filter}': {message}")]
    Filter { filter: String, message: String },

    #[error("a global logger is already installed: {0}")]
    AlreadyInstalled(String),
}

/// Fixed-capacity buffer of formatted log lines, oldest evicted first
#[derive(Clone, Debug)]
pub struct RingBuffer {
    lines: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn push(&self, line: String) {
        let mut lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    /// Up to `n` most recent lines, oldest first
    pub fn recent(&self, n: usize) -> Vec<String> {
        let lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());
        let skip = lines.len().saturating_sub(n);
        lines.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Per-event writer handed out by [`RingBuffer`]; lines land on drop.
pub struct RingWriter {
    ring: RingBuffer,
    pending: Vec<u8>,
}

impl io::Write for RingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for RingWriter {
    fn drop(&mut self) {
        let text = String::from_utf8_lossy(&self.pending);
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            self.ring.push(line.to_string());
        }
    }
}

impl<'a> MakeWriter<'a> for RingBuffer {
    type Writer = RingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        RingWriter {
            ring: self.clone(),
            pending: Vec::new(),
        }
    }
}

/// Local wall-clock timestamps with millisecond precision
struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Keeps the background file writer alive; drop it to flush and stop.
pub struct LoggerHandle {
    ring: RingBuffer,
    _guard: Option<WorkerGuard>,
}

impl LoggerHandle {
    pub fn ring(&self) -> &RingBuffer {
        &self.ring
    }
}

/// Build the subscriber without installing it
///
/// `file` receives every record that passes `filter`; the ring buffer
/// always does.
pub fn build_subscriber(
    filter: &str,
    ring: RingBuffer,
    file: Option<NonBlocking>,
) -> Result<impl tracing::Subscriber + Send + Sync, LoggerError> {
    let env_filter = EnvFilter::try_new(filter).map_err(|e| LoggerError::Filter {
        filter: filter.to_string(),
        message: e.to_string(),
    })?;

    let file_layer = file.map(|writer| {
        fmt::layer()
            .with_ansi(false)
            .with_timer(LocalTime)
            .with_writer(writer)
    });

    let ring_layer = fmt::layer()
        .with_ansi(false)
        .with_timer(LocalTime)
        .with_writer(ring);

    Ok(tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(ring_layer))
}

/// Install the global logger writing `<log_dir>/<app_name>.log.<date>`
pub fn init_logger(
    log_dir: impl AsRef<Path>,
    app_name: &str,
    filter: &str,
) -> Result<LoggerHandle, LoggerError> {
    let log_dir = log_dir.as_ref();
    std::fs::create_dir_all(log_dir)?;

    let appender = tracing_appender::rolling::daily(log_dir, format!("{}.log", app_name));
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let ring = RingBuffer::new(DEFAULT_CAPACITY);
    build_subscriber(filter, ring.clone(), Some(writer))?
        .try_init()
        .map_err(|e| LoggerError::AlreadyInstalled(e.to_string()))?;

    let _ = GLOBAL_RING.set(ring.clone());
    tracing::info!(target: "kanban_logger", "logger initialized in {}", log_dir.display());

    Ok(LoggerHandle {
        ring,
        _guard: Some(guard),
    })
}

pub fn info(message: &str) {
    tracing::info!(target: "kanban_logger", "{}", message);
}

pub fn error(message: &str) {
    tracing::error!(target: "kanban_logger", "{}", message);
}

/// Recent lines captured by the global logger (empty before `init_logger`)
pub fn recent_lines(n: usize) -> Vec<String> {
    GLOBAL_RING.get().map(|ring| ring.recent(n)).unwrap_or_default()
}
