//! Rolling logger
//!
//! Keeps the most recent log lines in a circular buffer and mirrors them to
//! `<log_dir>/<app_name>.log`. The file is appended to and rewritten from the
//! buffer once it holds twice the buffer capacity, so it never grows without
//! bound. `log` records are captured through `tracing-subscriber`.

use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::writer::MakeWriter;

/// Lines kept in memory
pub const DEFAULT_CAPACITY: usize = 2000;

static LOGGER: OnceLock<Arc<RollingLog>> = OnceLock::new();

struct LogState {
    lines: VecDeque<String>,
    /// Text after the last newline, waiting for the rest of its line
    pending: String,
    /// Lines currently in the file
    file_lines: usize,
}

/// Circular line buffer mirrored to a file
pub struct RollingLog {
    path: PathBuf,
    capacity: usize,
    state: Mutex<LogState>,
}

impl RollingLog {
    /// Open `<dir>/<name>.log`, seeding the buffer with the tail of an existing file
    pub fn open(dir: &Path, name: &str, capacity: usize) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.log", name));
        let capacity = capacity.max(1);

        let existing: Vec<String> = match fs::read_to_string(&path) {
            Ok(text) => text.lines().map(str::to_string).collect(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e),
        };
        let file_lines = existing.len();
        let skip = existing.len().saturating_sub(capacity);
        let lines: VecDeque<String> = existing.into_iter().skip(skip).collect();

        Ok(Self {
            path,
            capacity,
            state: Mutex::new(LogState {
                lines,
                pending: String::new(),
                file_lines,
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Feed formatted output; only complete lines are stored
    pub fn append(&self, text: &str) -> io::Result<()> {
        let mut state = self.state.lock().map_err(|_| io::Error::other("log buffer poisoned"))?;
        state.pending.push_str(text);

        let mut complete = Vec::new();
        while let Some(pos) = state.pending.find('\n') {
            let line: String = state.pending.drain(..=pos).collect();
            complete.push(line.trim_end_matches(['\r', '\n']).to_string());
        }
        if complete.is_empty() {
            return Ok(());
        }

        for line in &complete {
            state.lines.push_back(line.clone());
            if state.lines.len() > self.capacity {
                state.lines.pop_front();
            }
        }

        state.file_lines += complete.len();
        if state.file_lines > self.capacity * 2 {
            let mut text = String::new();
            for line in &state.lines {
                text.push_str(line);
                text.push('\n');
            }
            fs::write(&self.path, text)?;
            state.file_lines = state.lines.len();
        } else {
            let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
            for line in &complete {
                writeln!(file, "{}", line)?;
            }
        }
        Ok(())
    }

    /// Up to `limit` most recent lines, oldest first
    pub fn recent(&self, limit: usize) -> Vec<String> {
        match self.state.lock() {
            Ok(state) => {
                let skip = state.lines.len().saturating_sub(limit);
                state.lines.iter().skip(skip).cloned().collect()
            }
            Err(_) => Vec::new(),
        }
    }

    pub fn make_writer(self: &Arc<Self>) -> RollingMakeWriter {
        RollingMakeWriter { log: self.clone() }
    }
}

/// Writer factory for tracing-subscriber
#[derive(Clone)]
pub struct RollingMakeWriter {
    log: Arc<RollingLog>,
}

impl<'a> MakeWriter<'a> for RollingMakeWriter {
    type Writer = RollingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        RollingWriter { log: self.log.clone() }
    }
}

pub struct RollingWriter {
    log: Arc<RollingLog>,
}

impl Write for RollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.log.append(&String::from_utf8_lossy(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Local wall-clock timestamps
struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Install the global subscriber writing to `<log_dir>/<app_name>.log`.
///
/// Calling it again after a successful init is a no-op.
pub fn init_logger(log_dir: PathBuf, app_name: &str) -> Result<(), String> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let log = Arc::new(
        RollingLog::open(&log_dir, app_name, DEFAULT_CAPACITY)
            .map_err(|e| format!("Failed to open log in {}: {}", log_dir.display(), e))?,
    );

    tracing_subscriber::fmt()
        .with_writer(log.make_writer())
        .with_ansi(false)
        .with_timer(LocalTime)
        .with_max_level(tracing::Level::INFO)
        .try_init()
        .map_err(|e| format!("Failed to install logger: {}", e))?;

    let _ = LOGGER.set(log);
    log::info!("{} logging to {}", app_name, log_dir.display());
    Ok(())
}

fn installed() -> Result<(), String> {
    LOGGER.get().map(|_| ()).ok_or_else(|| "Logger is not initialized".to_string())
}

pub fn info(message: &str) -> Result<(), String> {
    installed()?;
    tracing::info!("{}", message);
    Ok(())
}

pub fn error(message: &str) -> Result<(), String> {
    installed()?;
    tracing::error!("{}", message);
    Ok(())
}

/// Most recent lines of the global logger, oldest first
pub fn recent_lines(limit: usize) -> Vec<String> {
    LOGGER.get().map(|log| log.recent(limit)).unwrap_or_default()
}

/// File the global logger mirrors to
pub fn log_file_path() -> Option<PathBuf> {
    LOGGER.get().map(|log| log.path().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_writes_join_into_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = RollingLog::open(dir.path(), "Test", 10).unwrap();

        log.append("first ").unwrap();
        assert!(log.recent(10).is_empty());
        log.append("line\nsecond line\n").unwrap();

        assert_eq!(log.recent(10), vec!["first line", "second line"]);
        let file = fs::read_to_string(dir.path().join("Test.log")).unwrap();
        assert_eq!(file, "first line\nsecond line\n");
    }

    #[test]
    fn test_buffer_keeps_most_recent_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = RollingLog::open(dir.path(), "Test", 3).unwrap();
        for i in 0..5 {
            log.append(&format!("line {}\n", i)).unwrap();
        }
        assert_eq!(log.recent(10), vec!["line 2", "line 3", "line 4"]);
        assert_eq!(log.recent(1), vec!["line 4"]);
    }

    #[test]
    fn test_file_is_rolled_over() {
        let dir = tempfile::tempdir().unwrap();
        let log = RollingLog::open(dir.path(), "Test", 2).unwrap();
        for i in 0..5 {
            log.append(&format!("line {}\n", i)).unwrap();
        }
        let file = fs::read_to_string(log.path()).unwrap();
        assert_eq!(file.lines().count(), 2);
        assert!(file.ends_with("line 4\n"));
    }

    #[test]
    fn test_reopen_seeds_buffer_from_file() {
        let dir = tempfile::tempdir().unwrap();
        {
            let log = RollingLog::open(dir.path(), "Test", 10).unwrap();
            log.append("kept\n").unwrap();
        }
        let log = RollingLog::open(dir.path(), "Test", 10).unwrap();
        assert_eq!(log.recent(10), vec!["kept"]);
    }

    #[test]
    fn test_subscriber_output_reaches_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let log = Arc::new(RollingLog::open(dir.path(), "Test", 10).unwrap());
        let subscriber = tracing_subscriber::fmt()
            .with_writer(log.make_writer())
            .with_ansi(false)
            .with_timer(LocalTime)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("diary opened");
        });

        let lines = log.recent(10);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("INFO"));
        assert!(lines[0].ends_with("diary opened"));
    }

    #[test]
    fn test_helpers_require_init() {
        if LOGGER.get().is_none() {
            assert!(info("nothing").is_err());
            assert!(recent_lines(5).is_empty());
            assert!(log_file_path().is_none());
        }
    }
}
