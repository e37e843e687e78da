//! Sequence definitions supplied at runtime.
//!
//! A definition arrives as JSON, e.g.
//!
//! ```json
//! {"label":"USER-1","strategy":"single","bonus":"2",
//!  "points":[{"r":0,"g":0,"b":0,"w":0,"t":50},{"r":255,"g":0,"b":0,"w":0,"t":-1}]}
//! ```
//!
//! and may only replace the contents of a user placeholder slot whose label
//! matches. Every check runs before the slot is touched.

use crate::store::{SequenceStore, SlotId};
use crate::types::{ColorPoint, SequencerError, SlotKind};
use heapless::Vec;
use serde::Deserialize;

/// Most points a definition may carry on the wire.
pub const MAX_PAYLOAD_POINTS: usize = 256;

/// One point of a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PointPayload {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default)]
    pub w: u8,
    pub t: i32,
}

impl From<PointPayload> for ColorPoint {
    fn from(p: PointPayload) -> Self {
        ColorPoint::new(p.r, p.g, p.b, p.w, p.t)
    }
}

/// A parsed sequence definition, borrowing its strings from the input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SequencePayload<'a> {
    pub label: &'a str,
    #[serde(default, borrow)]
    pub strategy: Option<&'a str>,
    #[serde(default, borrow)]
    pub bonus: Option<&'a str>,
    pub points: Vec<PointPayload, MAX_PAYLOAD_POINTS>,
}

/// Parses a JSON sequence definition.
///
/// # Errors
/// Returns `Deserialization` for malformed JSON, missing required fields,
/// out-of-range channel values, escaped strings, or more than
/// [`MAX_PAYLOAD_POINTS`] points.
pub fn parse_payload(json: &[u8]) -> Result<SequencePayload<'_>, SequencerError> {
    serde_json_core::from_slice::<SequencePayload<'_>>(json)
        .map(|(payload, _)| payload)
        .map_err(|err| {
            log::warn!("rejected sequence definition: {:?}", err);
            SequencerError::Deserialization
        })
}

/// Writes a definition into its placeholder slot.
///
/// Replaces the slot's bonus (cleared when absent) and its whole point list,
/// copying every point verbatim. The slot's default strategy is kept.
///
/// # Errors
/// * `NoPlaceholder` - No slot has the payload's label
/// * `NotAUserSequence` - The label names a built-in slot
/// * `CapacityExceeded` - Too many points or too long a bonus for the slot
pub fn load_into<const S: usize, const P: usize>(
    store: &mut SequenceStore<S, P>,
    payload: &SequencePayload<'_>,
) -> Result<SlotId, SequencerError> {
    let Some(slot) = store.find(payload.label) else {
        log::warn!("load: no placeholder for {:?}", payload.label);
        return Err(SequencerError::NoPlaceholder);
    };
    let sequence = store.get_mut(slot).ok_or(SequencerError::NoPlaceholder)?;

    if sequence.kind() != SlotKind::User {
        log::warn!("load: {} is built in", payload.label);
        return Err(SequencerError::NotAUserSequence);
    }

    let points = payload.points.iter().copied().map(ColorPoint::from);
    sequence
        .overwrite(payload.bonus.unwrap_or(""), points)
        .inspect_err(|_| {
            log::warn!(
                "load: {} points do not fit {} (capacity {})",
                payload.points.len(),
                payload.label,
                P
            );
        })?;

    log::info!("loaded {} points into {}", payload.points.len(), payload.label);
    Ok(slot)
}
