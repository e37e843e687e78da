//! "rainbow": the whole strip shows one turn of the color wheel, scrolled a
//! little further on every write. Point data is ignored.

use super::Frame;
use crate::colors::{WHEEL_SIZE, wheel};
use crate::sequencer::PlaybackState;

/// Fixed gate between frames.
pub const RAINBOW_GATE_MS: u64 = 10;

/// Hue advance per frame, in 16-bit wheel units.
pub const HUE_STEP: u32 = 256;

/// Full wheel turns before the hue accumulator wraps to zero.
pub const RAINBOW_CYCLES: u32 = 5;

pub(crate) fn start(frame: &mut Frame<'_>, _clear: bool) -> PlaybackState {
    frame.blank();
    frame.run.hue = 0;
    frame.mark();
    PlaybackState::Wait
}

pub(crate) fn wait(frame: &mut Frame<'_>) -> PlaybackState {
    if frame.elapsed_ms() < RAINBOW_GATE_MS {
        PlaybackState::Wait
    } else {
        PlaybackState::Write
    }
}

pub(crate) fn write(frame: &mut Frame<'_>) -> PlaybackState {
    let count = frame.strip.pixel_count();
    let hue = frame.run.hue;

    for index in 0..count {
        frame.strip.set_pixel(index, wheel(pixel_hue(hue, index, count)));
    }
    frame.strip.render();

    frame.run.hue = next_hue(hue);
    frame.mark();
    PlaybackState::Wait
}

/// Spreads one wheel turn evenly across the strip, offset by `hue`.
fn pixel_hue(hue: u32, index: usize, count: usize) -> u32 {
    let offset = (index as u64 * u64::from(WHEEL_SIZE)) / count.max(1) as u64;
    hue.wrapping_add(offset as u32)
}

fn next_hue(hue: u32) -> u32 {
    let next = hue + HUE_STEP;
    if next >= RAINBOW_CYCLES * WHEEL_SIZE {
        0
    } else {
        next
    }
}
