use anyhow::{Context, Result};
use env_logger::{Builder, Target, DEFAULT_FILTER_ENV};
use log::{Level, LevelFilter};
use std::env;
use std::ffi::OsStr;
use std::fmt::Display;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// One logfmt-style line. Every line carries the full invocation so a log
/// file shared by many alerts stays attributable.
pub fn format_line(timestamp: &dyn Display, level: Level, message: &dyn Display, args: &str) -> String {
    format!(
        "time=\"{}\" level={} msg={:?} args={:?}",
        timestamp,
        level.as_str().to_lowercase(),
        message.to_string(),
        args
    )
}

/// Opens the log file for appending, creating it owner-only if missing.
pub fn open_log_file(path: &Path) -> Result<File> {
    let mut options = OpenOptions::new();
    options.append(true).create(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

/// Level applied on top of `RUST_LOG`. An explicit `RUST_LOG` wins unless
/// verbose output was asked for.
pub fn level_override(verbose: bool, rust_log: Option<&OsStr>) -> Option<LevelFilter> {
    if verbose {
        Some(LevelFilter::Debug)
    } else if rust_log.is_none() {
        Some(LevelFilter::Info)
    } else {
        None
    }
}

pub fn init(log_file: Option<&Path>, verbose: bool, args: String) -> Result<()> {
    let target = match log_file {
        Some(path) => Target::Pipe(Box::new(open_log_file(path)?)),
        None => Target::Stdout,
    };

    let mut builder = Builder::from_default_env();
    let rust_log = env::var_os(DEFAULT_FILTER_ENV);
    if let Some(level) = level_override(verbose, rust_log.as_deref()) {
        builder.filter_level(level);
    }

    let installed = builder
        .target(target)
        .format(move |buf, record| {
            let timestamp = buf.timestamp();
            writeln!(buf, "{}", format_line(&timestamp, record.level(), record.args(), &args))
        })
        .try_init();

    // A logger installed earlier in the process keeps receiving records.
    if let Err(e) = installed {
        log::debug!("Logger already installed: {}", e);
    }

    Ok(())
}
