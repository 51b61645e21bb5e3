use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

fn level_for(verbose: u8, quiet: u8) -> &'static str {
    let net = i16::from(verbose) - i16::from(quiet);
    match net {
        i16::MIN..=-2 => "error",
        -1 => "warn",
        0 => "info",
        1 => "debug",
        2..=i16::MAX => "trace",
    }
}

fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,mapty={level},mapty_core={level}")))
}

/// Logs to stderr. Default level is INFO; `-v`/`-vv` raise it, `-q`/`-qq`
/// lower it, and `RUST_LOG` overrides everything.
pub fn init_logging(verbose: u8, quiet: u8) {
    let level = level_for(verbose, quiet);
    let show_src = matches!(level, "debug" | "trace");

    fmt()
        .with_env_filter(filter_for(level))
        .with_writer(std::io::stderr)
        .with_timer(fmt::time::ChronoLocal::rfc_3339())
        .with_target(true)
        .with_file(show_src)
        .with_line_number(show_src)
        .compact()
        .init();
}

/// Same levels as `init_logging`, appended to `log_file` so the terminal UI
/// stays clean.
pub fn init_file_logging(verbose: u8, quiet: u8, log_file: &Path) -> Result<()> {
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;
    let level = level_for(verbose, quiet);

    fmt()
        .with_env_filter(filter_for(level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_timer(fmt::time::ChronoLocal::rfc_3339())
        .with_target(true)
        .init();
    Ok(())
}
