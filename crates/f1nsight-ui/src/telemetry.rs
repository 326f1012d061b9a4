//! Logging initialisation for the dashboard.
//!
//! # Design
//! - One entry point installs a `tracing-subscriber` fmt subscriber.
//! - Formatted lines are routed to the browser console by level; native
//!   builds write to stderr instead.
//! - Timestamps are disabled: the console stamps lines itself and
//!   `SystemTime` is unavailable on `wasm32-unknown-unknown`.

use anyhow::{Result, anyhow};
use std::io;
use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::core::config::DEFAULT_LOG_LEVEL;

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig<'a> {
    /// Filter directive (e.g. `info`, `f1nsight_ui=debug`).
    pub level: &'a str,
    /// Output format selection for the subscriber.
    pub format: LogFormat,
}

impl Default for LoggingConfig<'_> {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL,
            format: LogFormat::infer(),
        }
    }
}

/// Available output formats for the logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line.
    Json,
    /// Human-readable lines.
    Pretty,
}

impl LogFormat {
    /// Choose a sensible default for the current build.
    #[must_use]
    pub const fn infer() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

/// Configure and install the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig<'_>) -> Result<()> {
    let filter = build_env_filter(config.level);
    let installed = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .without_time()
                    .with_ansi(false)
                    .with_writer(ConsoleMakeWriter),
            )
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .without_time()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(ConsoleMakeWriter),
            )
            .try_init(),
    };
    installed.map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}

fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

/// Console method a line is written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    /// `console.error`.
    Error,
    /// `console.warn`.
    Warn,
    /// `console.info`.
    Info,
    /// `console.debug`.
    Debug,
}

impl From<Level> for ConsoleLevel {
    fn from(level: Level) -> Self {
        if level == Level::ERROR {
            Self::Error
        } else if level == Level::WARN {
            Self::Warn
        } else if level == Level::INFO {
            Self::Info
        } else {
            Self::Debug
        }
    }
}

/// [`MakeWriter`] producing one console line per event.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(ConsoleLevel::Info)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(ConsoleLevel::from(*meta.level()))
    }
}

/// Buffers one formatted event and emits it on drop.
#[derive(Debug)]
pub struct ConsoleWriter {
    level: ConsoleLevel,
    buffer: Vec<u8>,
}

impl ConsoleWriter {
    const fn new(level: ConsoleLevel) -> Self {
        Self {
            level,
            buffer: Vec::new(),
        }
    }

    fn take_line(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let text = String::from_utf8_lossy(&self.buffer)
            .trim_end()
            .to_string();
        self.buffer.clear();
        Some(text)
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if let Some(line) = self.take_line() {
            emit(self.level, line);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn emit(level: ConsoleLevel, line: String) {
    match level {
        ConsoleLevel::Error => gloo::console::error!(line),
        ConsoleLevel::Warn => gloo::console::warn!(line),
        ConsoleLevel::Info => gloo::console::info!(line),
        ConsoleLevel::Debug => gloo::console::debug!(line),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(level: ConsoleLevel, line: String) {
    eprintln!("[{level:?}] {line}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn levels_map_to_console_methods() {
        assert_eq!(ConsoleLevel::from(Level::ERROR), ConsoleLevel::Error);
        assert_eq!(ConsoleLevel::from(Level::WARN), ConsoleLevel::Warn);
        assert_eq!(ConsoleLevel::from(Level::INFO), ConsoleLevel::Info);
        assert_eq!(ConsoleLevel::from(Level::TRACE), ConsoleLevel::Debug);
    }

    #[test]
    fn writer_buffers_until_taken() -> io::Result<()> {
        let mut writer = ConsoleWriter::new(ConsoleLevel::Info);
        writer.write_all(b"sidebar toggled ")?;
        writer.write_all(b"mode=desktop\n")?;
        writer.flush()?;
        assert_eq!(
            writer.take_line().as_deref(),
            Some("sidebar toggled mode=desktop")
        );
        assert_eq!(writer.take_line(), None);
        Ok(())
    }

    #[test]
    fn default_config_uses_info_level() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::infer());
    }
}
