//! Logging with indicatif integration and an optional run-log file

use std::fs::File;
use std::io::Write;
use std::sync::Mutex;

use indicatif::MultiProgress;

/// ANSI color code and padded label for a log level.
fn level_style(level: log::Level, color: bool) -> (&'static str, &'static str, &'static str) {
    let label = match level {
        log::Level::Error => "ERROR",
        log::Level::Warn => "WARN ",
        log::Level::Info => "INFO ",
        log::Level::Debug => "DEBUG",
        log::Level::Trace => "TRACE",
    };
    if !color {
        return ("", label, "");
    }
    let ansi = match level {
        log::Level::Error => "\x1b[31m",
        log::Level::Warn => "\x1b[33m",
        log::Level::Info => "\x1b[32m",
        log::Level::Debug => "\x1b[36m",
        log::Level::Trace => "\x1b[35m",
    };
    (ansi, label, "\x1b[0m")
}

/// Logger that prints through indicatif MultiProgress (TTY) or plain stderr,
/// and mirrors every enabled record into the run-log file when one is open.
pub struct PipelineLogger {
    inner: env_logger::Logger,
    multi: Option<MultiProgress>,
    file: Option<Mutex<File>>,
}

impl PipelineLogger {
    pub fn new(inner: env_logger::Logger, multi: Option<MultiProgress>, file: Option<File>) -> Self {
        Self {
            inner,
            multi,
            file: file.map(Mutex::new),
        }
    }
}

impl log::Log for PipelineLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        if !self.inner.enabled(record.metadata()) {
            return;
        }

        match &self.multi {
            Some(multi) => {
                let (pre, label, post) = level_style(record.level(), true);
                let line = format!("[{pre}{label}{post}] {}", record.args());
                multi.suspend(|| eprintln!("{line}"));
            }
            None => {
                let (_, label, _) = level_style(record.level(), false);
                eprintln!("[{label}] {}", record.args());
            }
        }

        if let Some(file) = &self.file {
            let now = chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str();
            if let Ok(mut f) = file.lock() {
                let _ = writeln!(f, "[{now}] [{level}]: {}", record.args());
            }
        }
    }

    fn flush(&self) {
        self.inner.flush();
        if let Some(file) = &self.file {
            if let Ok(mut f) = file.lock() {
                let _ = f.flush();
            }
        }
    }
}

/// Initialize logging.
///
/// `multi` enables TTY mode (colored, routed around progress bars).
/// `log_file` receives a timestamped copy of every enabled record.
/// `RUST_LOG` overrides the default level.
pub fn init_logging(
    quiet: bool,
    debug: bool,
    multi: Option<&MultiProgress>,
    log_file: Option<File>,
) -> Result<(), log::SetLoggerError> {
    let default_level = if debug {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };

    let inner =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .build();
    let max_level = inner.filter();

    log::set_boxed_logger(Box::new(PipelineLogger::new(inner, multi.cloned(), log_file)))?;
    log::set_max_level(max_level);
    Ok(())
}

/// Run-log file name: `MM-DD-YYYY_HH-MM-SS-<command>.log`
pub fn log_file_name(command: &str, now: chrono::DateTime<chrono::Local>) -> String {
    format!("{}-{command}.log", now.format("%m-%d-%Y_%H-%M-%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn level_labels_are_padded() {
        for level in [
            log::Level::Error,
            log::Level::Warn,
            log::Level::Info,
            log::Level::Debug,
            log::Level::Trace,
        ] {
            let (_, label, _) = level_style(level, false);
            assert_eq!(label.len(), 5);
        }
    }

    #[test]
    fn plain_style_has_no_ansi() {
        let (pre, _, post) = level_style(log::Level::Warn, false);
        assert!(pre.is_empty());
        assert!(post.is_empty());
    }

    #[test]
    fn log_file_name_format() {
        let now = chrono::Local.with_ymd_and_hms(2023, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(log_file_name("acquire", now), "03-07-2023_09-05-01-acquire.log");
    }

    #[test]
    fn file_sink_receives_records() {
        use log::Log;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        let file = File::create(&path).unwrap();
        let inner = env_logger::Builder::new()
            .filter_level(log::LevelFilter::Info)
            .build();
        let logger = PipelineLogger::new(inner, None, Some(file));

        logger.log(
            &log::Record::builder()
                .args(format_args!("hello file"))
                .level(log::Level::Warn)
                .build(),
        );
        logger.log(
            &log::Record::builder()
                .args(format_args!("filtered out"))
                .level(log::Level::Debug)
                .build(),
        );
        logger.flush();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[WARN]: hello file"));
        assert!(!content.contains("filtered out"));
    }
}
