pub mod builders;

use std::sync::Once;

use chrono::{DateTime, TimeZone, Utc};
use pertrack::clock::FixedClock;
use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// UTC instant on 2024-01-01 at the given hour.
pub fn jan1(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0)
        .single()
        .expect("valid hour")
}

/// A clock frozen at the given instant.
pub fn clock_at(now: DateTime<Utc>) -> FixedClock {
    FixedClock(now)
}
