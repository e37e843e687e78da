//! Sequences shipped with the firmware, plus the user placeholders.

use crate::sequence::Sequence;
use crate::store::SequenceStore;
use crate::types::{ColorPoint, SequencerError};

/// Labels of the slots the loader may populate.
pub const USER_LABELS: [&str; 3] = ["USER-1", "USER-2", "USER-3"];

/// Number of slots [`install`] occupies.
pub const BUILTIN_SLOTS: usize = 6 + USER_LABELS.len();

/// Hold time of every ramp point.
const RAMP_INTERVAL_MS: i32 = 50;

/// Peak channel intensity of the ramps.
const RAMP_PEAK: u8 = 128;

/// Levels the stock PURPLE-SLOW table skips on its way up.
const PURPLE_RISE_GAPS: [u8; 2] = [28, 36];

impl<const S: usize, const P: usize> SequenceStore<S, P> {
    /// Creates a store holding the built-in library and the user placeholders.
    ///
    /// # Errors
    /// Returns `CapacityExceeded` if `S` or `P` is too small for the library.
    pub fn with_builtins() -> Result<Self, SequencerError> {
        let mut store = Self::new();
        install(&mut store)?;
        Ok(store)
    }
}

/// Installs the built-in library followed by the user placeholders.
pub fn install<const S: usize, const P: usize>(
    store: &mut SequenceStore<S, P>,
) -> Result<(), SequencerError> {
    store.insert(ramp("RED-MED", 8, &[], |v| ColorPoint::new(v, 0, 0, 0, RAMP_INTERVAL_MS))?)?;
    store.insert(ramp("GREEN-MED", 8, &[], |v| ColorPoint::new(0, v, 0, 0, RAMP_INTERVAL_MS))?)?;
    store.insert(ramp("PURPLE-SLOW", 4, &PURPLE_RISE_GAPS, |v| {
        ColorPoint::new(v, 0, v, 0, RAMP_INTERVAL_MS)
    })?)?;

    // Low endpoint holds the pulse length in seconds.
    store.insert(
        Sequence::builder("BLUE-PULSE")
            .strategy("slowp")
            .bonus("3")
            .point(ColorPoint::new(0, 0, 8, 0, 4))?
            .point(ColorPoint::new(0, 0, 160, 0, 0))?
            .point(ColorPoint::TERMINATOR)?
            .build()?,
    )?;

    store.insert(
        Sequence::builder("RAINBOW")
            .strategy("rainbow")
            .point(ColorPoint::TERMINATOR)?
            .build()?,
    )?;

    store.insert(
        Sequence::builder("FLASH-WHITE")
            .strategy("single")
            .bonus("3")
            .point(ColorPoint::new(255, 255, 255, 255, 100))?
            .point(ColorPoint::TERMINATOR)?
            .build()?,
    )?;

    for label in USER_LABELS {
        store.insert(Sequence::placeholder(label, "points")?)?;
    }

    log::debug!("installed {} built-in slots", store.len());
    Ok(())
}

/// Builds a 0 → peak → 0 ramp with both peaks repeated, then the terminator.
///
/// Levels listed in `rise_gaps` are left out of the rising half only.
fn ramp<const P: usize>(
    label: &str,
    step: u8,
    rise_gaps: &[u8],
    color: impl Fn(u8) -> ColorPoint,
) -> Result<Sequence<P>, SequencerError> {
    let up = (0..=RAMP_PEAK)
        .step_by(usize::from(step))
        .filter(|v| !rise_gaps.contains(v));
    let down = (0..=RAMP_PEAK).rev().step_by(usize::from(step));

    Sequence::builder(label)
        .points(up.chain(down).map(&color))?
        .point(ColorPoint::TERMINATOR)?
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SlotKind;

    #[test]
    fn ramp_rises_and_falls_with_both_peaks() {
        let seq = ramp::<64>("R", 8, &[], |v| ColorPoint::new(v, 0, 0, 0, 50)).unwrap();
        let reds: heapless::Vec<u8, 64> = seq.points().iter().map(|p| p.red).collect();

        assert_eq!(seq.playable_len(), 34);
        assert_eq!(reds[0], 0);
        assert_eq!(reds[16], 128);
        assert_eq!(reds[17], 128);
        assert_eq!(reds[33], 0);
        assert!(seq.point(34).is_terminator());
    }

    #[test]
    fn purple_rise_skips_stock_gaps() {
        let store = SequenceStore::<12, 128>::with_builtins().unwrap();
        let purple = store.get(store.find("PURPLE-SLOW").unwrap()).unwrap();
        let reds: heapless::Vec<u8, 128> = purple.points().iter().map(|p| p.red).collect();

        assert_eq!(purple.playable_len(), 64);
        assert_eq!(&reds[5..9], &[20, 24, 32, 40]);
        assert_eq!(reds[30], 128);
        assert_eq!(reds[31], 128);
        assert_eq!(&reds[54..58], &[36, 32, 28, 24]);
        assert_eq!(reds[63], 0);
    }

    #[test]
    fn install_fills_library_and_placeholders() {
        let store = SequenceStore::<12, 128>::with_builtins().unwrap();
        assert_eq!(store.len(), BUILTIN_SLOTS);

        for label in USER_LABELS {
            let slot = store.find(label).unwrap();
            assert_eq!(store.get(slot).unwrap().kind(), SlotKind::User);
        }
        let slot = store.find("RED-MED").unwrap();
        assert_eq!(store.get(slot).unwrap().kind(), SlotKind::BuiltIn);
    }

    #[test]
    fn install_reports_small_store() {
        assert_eq!(
            SequenceStore::<4, 128>::with_builtins().err(),
            Some(SequencerError::CapacityExceeded)
        );
        assert_eq!(
            SequenceStore::<12, 16>::with_builtins().err(),
            Some(SequencerError::CapacityExceeded)
        );
    }
}
