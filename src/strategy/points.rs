//! Point-list playback: "points" loops forever, "single" plays a fixed number
//! of passes and stops.
//!
//! Each point is rendered and then held for its own `interval_ms` before the
//! cursor moves on.

use super::Frame;
use crate::sequencer::PlaybackState;

/// Repeat count used by "single" when the bonus is empty, unparsable or zero.
pub const DEFAULT_REPEATS: u32 = 1;

pub(crate) fn start(frame: &mut Frame<'_>, clear: bool) -> PlaybackState {
    if clear {
        frame.strip.clear();
    }
    frame.run.point_index = 0;

    let first = frame.current_point();
    if first.is_terminator() {
        log::warn!("point list is empty, stopping");
        return PlaybackState::Stopping;
    }

    frame.fill(first.rgb());
    frame.mark();
    PlaybackState::Wait
}

pub(crate) fn wait(frame: &mut Frame<'_>) -> PlaybackState {
    if frame.elapsed_ms() < frame.current_point().hold_ms() {
        return PlaybackState::Wait;
    }
    frame.run.point_index += 1;
    PlaybackState::Write
}

pub(crate) fn write(frame: &mut Frame<'_>) -> PlaybackState {
    if frame.current_point().is_terminator() {
        frame.run.point_index = 0;
        if frame.current_point().is_terminator() {
            return PlaybackState::Stopping;
        }
    }

    let point = frame.current_point();
    frame.fill(point.rgb());
    frame.mark();
    PlaybackState::Wait
}

pub(crate) fn start_single(frame: &mut Frame<'_>, clear: bool) -> PlaybackState {
    if clear {
        frame.strip.clear();
    }
    frame.run.point_index = 0;
    frame.run.repeats_left = parse_repeats(frame.bonus);
    log::debug!("single: {} pass(es)", frame.run.repeats_left);

    write_single(frame)
}

/// The terminator ends a pass as soon as it has been shown.
pub(crate) fn wait_single(frame: &mut Frame<'_>) -> PlaybackState {
    let point = frame.current_point();

    if point.is_terminator() {
        frame.run.repeats_left = frame.run.repeats_left.saturating_sub(1);
        if frame.run.repeats_left == 0 {
            log::debug!("single: last pass complete");
            return PlaybackState::Stopping;
        }
        frame.run.point_index = 0;
        return PlaybackState::Write;
    }

    if frame.elapsed_ms() < point.hold_ms() {
        return PlaybackState::Wait;
    }
    frame.run.point_index += 1;
    PlaybackState::Write
}

/// Renders the point under the cursor, terminator included: its color is the
/// closing frame of the pass.
pub(crate) fn write_single(frame: &mut Frame<'_>) -> PlaybackState {
    let point = frame.current_point();
    frame.fill(point.rgb());
    frame.mark();
    PlaybackState::Wait
}

fn parse_repeats(bonus: &str) -> u32 {
    match bonus.trim().parse::<u32>() {
        Ok(0) | Err(_) => DEFAULT_REPEATS,
        Ok(n) => n,
    }
}
