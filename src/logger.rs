//! Line-oriented log sink behind the `log` facade.
//!
//! Every record is rendered as `YYYY-MM-DD HH:MM:SS.mmm [LEVEL] message`,
//! appended to the log file and echoed to stdout under a single lock. The
//! file is flushed after each line so a crash loses at most the line being
//! written.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

static TIMESTAMP_FORMAT: &[FormatItem<'static>] = format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]"
);

pub struct FileLogger {
    file: Mutex<File>,
}

impl FileLogger {
    /// Open `path` for appending and wrap it in a logger.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<FileLogger> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(FileLogger {
            file: Mutex::new(file),
        })
    }
}

// The log format has no TRACE level; fold it into DEBUG.
fn level_name(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARNING",
        Level::Info => "INFO",
        Level::Debug | Level::Trace => "DEBUG",
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let now = OffsetDateTime::now_utc();
        let stamp = now
            .format(TIMESTAMP_FORMAT)
            .unwrap_or_else(|_| String::from("????-??-?? ??:??:??.???"));
        let line = format!("{stamp} [{}] {}", level_name(record.level()), record.args());

        let mut file = match self.file.lock() {
            Ok(file) => file,
            Err(poisoned) => poisoned.into_inner(),
        };
        let _ = writeln!(file, "{line}");
        let _ = file.flush();
        println!("{line}");
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// Install the global logger. The level can be raised or lowered later with
/// [`set_level`]; the change is atomic with respect to concurrent `log`
/// calls.
pub fn init(path: impl AsRef<Path>, level: LevelFilter) -> Result<(), InitError> {
    let logger = FileLogger::open(path).map_err(InitError::Open)?;
    log::set_boxed_logger(Box::new(logger)).map_err(InitError::AlreadySet)?;
    log::set_max_level(level);
    Ok(())
}

/// Atomically change the minimum emitted level.
pub fn set_level(level: LevelFilter) {
    log::set_max_level(level);
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("failed to open log file: {0}")]
    Open(#[source] std::io::Error),
    #[error("logger already installed")]
    AlreadySet(#[source] SetLoggerError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Log, MetadataBuilder, RecordBuilder};

    #[test]
    fn line_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.log");
        let logger = FileLogger::open(&path).unwrap();

        log::set_max_level(LevelFilter::Debug);
        let metadata = MetadataBuilder::new().level(Level::Info).build();
        logger.log(
            &RecordBuilder::new()
                .metadata(metadata)
                .args(format_args!("hello"))
                .build(),
        );

        let contents = std::fs::read_to_string(&path).unwrap();
        let line = contents.lines().next().unwrap();
        // 2024-01-01 00:00:00.000 [INFO] hello
        assert!(line.ends_with("[INFO] hello"), "line was {line:?}");
        let stamp = &line[..23];
        assert_eq!(stamp.as_bytes()[4], b'-');
        assert_eq!(stamp.as_bytes()[10], b' ');
        assert_eq!(stamp.as_bytes()[19], b'.');
    }

    #[test]
    fn warning_spelled_out() {
        assert_eq!(level_name(Level::Warn), "WARNING");
        assert_eq!(level_name(Level::Trace), "DEBUG");
    }
}
