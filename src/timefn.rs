// timefn - monotonic nanosecond timer used by the benchmark driver.
//
// Built on std::time::Instant, which is monotonic on every supported
// platform. Durations are kept as raw nanosecond counts so accumulation
// across chunks and iterations never loses precision; conversion to
// milliseconds happens only when a report line is formatted.

use std::time::Instant;

/// Nanosecond duration type.
pub type DurationNs = u64;

/// Opaque timestamp. The absolute value is not meaningful; use it only to
/// compute a duration between two measurements.
#[derive(Clone, Copy, Debug)]
pub struct TimeT {
    pub(crate) t: Instant,
}

/// Returns the current monotonic timestamp.
#[inline]
pub fn get_time() -> TimeT {
    TimeT { t: Instant::now() }
}

/// Returns the nanosecond duration between `clock_start` and `clock_end`.
///
/// Saturates to zero if `clock_end` precedes `clock_start`.
#[inline]
pub fn span_ns(clock_start: TimeT, clock_end: TimeT) -> DurationNs {
    clock_end
        .t
        .saturating_duration_since(clock_start.t)
        .as_nanos() as DurationNs
}

/// Converts nanoseconds to fractional milliseconds for display.
#[inline]
pub fn ns_to_ms(ns: DurationNs) -> f64 {
    ns as f64 / 1_000_000.0
}

/// Runs `f` and returns its result together with the elapsed nanoseconds.
#[inline]
pub fn timed<T>(f: impl FnOnce() -> T) -> (T, DurationNs) {
    let start = get_time();
    let out = f();
    let end = get_time();
    (out, span_ns(start, end))
}
