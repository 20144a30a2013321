//! Rolling Logger
//!
//! File logger for the inventory app:
//! - size-rotated log files, oldest pruned past `max_files`
//! - in-memory circular buffer of the most recent lines (for an in-app log view)
//! - `log` records are bridged into `tracing`, so library code can use either facade

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::fmt::MakeWriter;

/// Logger settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Rotate the active file once it grows past this many bytes
    pub max_file_bytes: u64,
    /// Rotated files kept on disk (the active file is not counted)
    pub max_files: usize,
    /// Lines kept in the in-memory buffer
    pub buffer_lines: usize,
    /// Max level: "error", "warn", "info", "debug" or "trace"
    pub level: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: 1024 * 1024,
            max_files: 5,
            buffer_lines: 500,
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Failed to open log file: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid log level: {0}")]
    InvalidLevel(String),

    #[error("Failed to install logger: {0}")]
    Install(String),
}

struct Inner {
    dir: PathBuf,
    app_name: String,
    config: LoggerConfig,
    file: File,
    written: u64,
    recent: VecDeque<String>,
    partial: String,
}

impl Inner {
    fn active_path(dir: &Path, app_name: &str) -> PathBuf {
        dir.join(format!("{}.log", app_name))
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        let active = Self::active_path(&self.dir, &self.app_name);
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S%.3f");
        let mut rotated = self.dir.join(format!("{}.{}.log", self.app_name, stamp));
        let mut n = 1;
        while rotated.exists() {
            rotated = self.dir.join(format!("{}.{}-{}.log", self.app_name, stamp, n));
            n += 1;
        }
        fs::rename(&active, &rotated)?;
        self.file = OpenOptions::new().create(true).append(true).open(&active)?;
        self.written = 0;
        self.prune()
    }

    fn prune(&self) -> io::Result<()> {
        let mut rotated = rotated_files(&self.dir, &self.app_name)?;
        while rotated.len() > self.config.max_files {
            let oldest = rotated.remove(0);
            fs::remove_file(oldest)?;
        }
        Ok(())
    }

    fn remember(&mut self, buf: &[u8]) {
        if self.config.buffer_lines == 0 {
            return;
        }
        self.partial.push_str(&String::from_utf8_lossy(buf));
        while let Some(pos) = self.partial.find('\n') {
            let line: String = self.partial.drain(..=pos).collect();
            if self.recent.len() == self.config.buffer_lines {
                self.recent.pop_front();
            }
            self.recent.push_back(line.trim_end().to_string());
        }
    }
}

/// Rotated log files for `app_name`, oldest first
pub fn rotated_files(dir: &Path, app_name: &str) -> io::Result<Vec<PathBuf>> {
    let prefix = format!("{}.", app_name);
    let active = format!("{}.log", app_name);
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .map(|name| name.starts_with(&prefix) && name.ends_with(".log") && name != active)
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Shared writer handed to the subscriber; every clone writes to the same file
#[derive(Clone)]
pub struct RollingWriter {
    inner: Arc<Mutex<Inner>>,
}

impl RollingWriter {
    pub fn open(dir: impl AsRef<Path>, app_name: &str, config: LoggerConfig) -> Result<Self, LoggerError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        let active = Inner::active_path(&dir, app_name);
        let file = OpenOptions::new().create(true).append(true).open(&active)?;
        let written = file.metadata()?.len();
        let capacity = config.buffer_lines;
        Ok(Self {
            inner: Arc::new(Mutex::new(Inner {
                dir,
                app_name: app_name.to_string(),
                config,
                file,
                written,
                recent: VecDeque::with_capacity(capacity),
                partial: String::new(),
            })),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Most recent complete lines, oldest first
    pub fn recent_lines(&self) -> Vec<String> {
        self.lock().recent.iter().cloned().collect()
    }

    pub fn active_path(&self) -> PathBuf {
        let inner = self.lock();
        Inner::active_path(&inner.dir, &inner.app_name)
    }
}

impl Write for RollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self.lock();
        if inner.written > 0 && inner.written + buf.len() as u64 > inner.config.max_file_bytes {
            inner.rotate()?;
        }
        inner.file.write_all(buf)?;
        inner.written += buf.len() as u64;
        inner.remember(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock().file.flush()
    }
}

impl<'a> MakeWriter<'a> for RollingWriter {
    type Writer = RollingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Handle kept by the app after init; exposes the in-memory buffer
#[derive(Clone)]
pub struct LoggerHandle {
    writer: RollingWriter,
}

impl LoggerHandle {
    pub fn recent_lines(&self) -> Vec<String> {
        self.writer.recent_lines()
    }

    pub fn log_file(&self) -> PathBuf {
        self.writer.active_path()
    }
}

/// Install the global logger with default settings
pub fn init_logger(log_dir: PathBuf, app_name: &str) -> Result<LoggerHandle, LoggerError> {
    init_logger_with(log_dir, app_name, LoggerConfig::default())
}

/// Install the global logger. Fails if a global subscriber is already set.
pub fn init_logger_with(
    log_dir: PathBuf,
    app_name: &str,
    config: LoggerConfig,
) -> Result<LoggerHandle, LoggerError> {
    let level = tracing::Level::from_str(&config.level)
        .map_err(|_| LoggerError::InvalidLevel(config.level.clone()))?;
    let writer = RollingWriter::open(&log_dir, app_name, config)?;

    tracing_subscriber::fmt()
        .with_writer(writer.clone())
        .with_ansi(false)
        .with_target(true)
        .with_max_level(level)
        .try_init()
        .map_err(|e| LoggerError::Install(e.to_string()))?;

    log::info!("[{}] logger ready at {}", app_name, log_dir.display());
    Ok(LoggerHandle { writer })
}
