//! Wall-clock abstraction used by the playback engine.
//!
//! The engine never sleeps. It reads the clock once per tick and compares the
//! elapsed time against the interval of the point (or strategy gate) it is
//! waiting on, so any monotonic millisecond-resolution clock will do.

/// Source of the current time (a hardware timer, `embassy_time::Instant::now`, ...).
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    fn now(&self) -> I;
}

/// Trait abstraction for duration types.
pub trait TimeDuration: Copy + PartialEq {
    /// Converts duration to whole milliseconds.
    fn as_millis(&self) -> u64;
}

/// Trait abstraction for instant types.
pub trait TimeInstant: Copy {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Calculates duration since an earlier instant.
    ///
    /// Implementations should saturate to a zero duration rather than
    /// panic when `earlier` is later than `self`.
    fn duration_since(&self, earlier: Self) -> Self::Duration;
}

/// Milliseconds elapsed between `epoch` and `now`.
#[inline]
pub(crate) fn millis_since<I: TimeInstant>(epoch: I, now: I) -> u64 {
    now.duration_since(epoch).as_millis()
}
