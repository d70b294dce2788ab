//! `tracing` setup for the CGI binaries.
//!
//! Standard output carries the CGI response, so all diagnostics go to
//! standard error, which gateways usually append to their error log.

use tracing_subscriber::filter::LevelFilter;


/// Reads the maximum log level from a `RUST_LOG`-style value.
///
/// Unset or empty values select `INFO`. Unparseable values are reported on
/// stderr and also fall back to `INFO`.
#[must_use]
pub fn max_level(var: Result<String, std::env::VarError>) -> LevelFilter {
    match var {
        Ok(var) if !var.is_empty() => match var.parse::<LevelFilter>() {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Ignoring `RUST_LOG={var}`: {e}");
                LevelFilter::INFO
            },
        },
        Ok(_) | Err(std::env::VarError::NotPresent) => LevelFilter::INFO,
        Err(e) => {
            eprintln!("Ignoring `RUST_LOG`: {e}");
            LevelFilter::INFO
        },
    }
}

/// Installs a `fmt` subscriber writing to stderr, with the verbosity taken
/// from the `RUST_LOG` environment variable.
///
/// Does nothing if a global subscriber is already set.
pub fn init_tracing() {
    use tracing_subscriber::fmt;
    let res = fmt::fmt()
        .with_timer(fmt::time::uptime())
        .with_max_level(max_level(std::env::var("RUST_LOG")))
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .try_init();
    if let Err(e) = res {
        eprintln!("Logging is disabled: {e}");
    }
}
