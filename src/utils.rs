//! Process-wide setup shared by the binary and the tests: logging, the ground field and the
//! location of the persistent cache.

use std::{path::PathBuf, sync::Once};

use anyhow::Context;
use fp::prime::{ValidPrime, DEFAULT_PRIME};
use tracing_subscriber::{fmt, fmt::format::FmtSpan, prelude::*, EnvFilter};

/// The ANSI escape code for bold text, used to highlight results.
pub const BOLD_ANSI_CODE: &str = "\x1b[1m";

static INIT_LOGGING: Once = Once::new();

/// Logs to stderr, filtered by `RUST_LOG` (default `warn`). Spans report their duration when
/// they close. Calling this more than once is harmless.
pub fn init_logging() {
    INIT_LOGGING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        // Fails if the process already installed a subscriber, which is fine.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_target(true),
            )
            .with(filter)
            .try_init();
    });
}

/// The smallest accepted characteristic. Harmonic projections divide by factorials of
/// exponents, which vanish modulo small primes.
pub const MIN_PRIME: u32 = 1 << 16;

/// Parses a characteristic, rejecting primes below [`MIN_PRIME`].
pub fn parse_prime(s: &str) -> anyhow::Result<ValidPrime> {
    let p: ValidPrime = s.trim().parse().with_context(|| format!("Invalid prime '{s}'"))?;
    anyhow::ensure!(
        p.as_u32() >= MIN_PRIME,
        "Prime {p} is too small, it must be at least {MIN_PRIME}"
    );
    Ok(p)
}

/// The ground field, read from `HARMONICS_PRIME`. Defaults to [`DEFAULT_PRIME`].
pub fn prime_from_env() -> anyhow::Result<ValidPrime> {
    match std::env::var("HARMONICS_PRIME") {
        Ok(p) => parse_prime(&p).context("Invalid HARMONICS_PRIME"),
        Err(_) => Ok(DEFAULT_PRIME),
    }
}

/// The directory of the persistent cache, read from `HARMONICS_SAVE_DIR`. Defaults to
/// `func_persist` in the working directory.
pub fn save_dir() -> PathBuf {
    std::env::var_os("HARMONICS_SAVE_DIR").map_or_else(|| PathBuf::from("func_persist"), PathBuf::from)
}

/// Sizes the global thread pool from `HARMONICS_THREADS`, if set.
#[cfg(feature = "concurrent")]
pub fn init_thread_pool() -> anyhow::Result<()> {
    let Ok(threads) = std::env::var("HARMONICS_THREADS") else {
        return Ok(());
    };
    let threads: usize = threads
        .parse()
        .with_context(|| format!("Invalid HARMONICS_THREADS '{threads}'"))?;
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .context("Failed to build the thread pool")?;
    tracing::info!(threads, "thread pool initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primes() {
        assert_eq!(parse_prime("2147483647").unwrap(), DEFAULT_PRIME);
        assert_eq!(parse_prime(" 65537 ").unwrap().as_u32(), 65537);
        let small = parse_prime("2").unwrap_err();
        assert!(format!("{small:#}").contains("too small"));
        assert!(parse_prime("65535").is_err());
        assert!(parse_prime("x").is_err());
    }
}
