//! Named, fixed-capacity color sequences.

use crate::types::{ColorPoint, SequencerError, SlotKind};
use heapless::{String, Vec};

/// Maximum label length in bytes.
pub const LABEL_CAPACITY: usize = 16;

/// Maximum strategy-name length in bytes.
pub const STRATEGY_CAPACITY: usize = 8;

/// Maximum bonus length in bytes.
pub const BONUS_CAPACITY: usize = 16;

/// A labeled list of color points plus the strategy that plays it by default.
///
/// Points are stored in playback order. Any index past the first terminator,
/// or past the end of the list, reads as [`ColorPoint::TERMINATOR`]: nothing
/// stored after a terminator is ever played, and a list without an explicit
/// terminator is still bounded.
///
/// # Type Parameters
/// * `P` - Maximum number of points (terminator included) this sequence can hold
#[derive(Debug, Clone)]
pub struct Sequence<const P: usize> {
    label: String<LABEL_CAPACITY>,
    strategy: String<STRATEGY_CAPACITY>,
    bonus: String<BONUS_CAPACITY>,
    points: Vec<ColorPoint, P>,
    kind: SlotKind,
}

impl<const P: usize> Sequence<P> {
    /// Creates a new sequence builder.
    pub fn builder(label: &str) -> SequenceBuilder<P> {
        SequenceBuilder::new(label)
    }

    /// Creates an empty user placeholder that the loader can populate later.
    pub fn placeholder(label: &str, strategy: &str) -> Result<Self, SequencerError> {
        Self::builder(label)
            .strategy(strategy)
            .kind(SlotKind::User)
            .point(ColorPoint::TERMINATOR)?
            .build()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Name of the strategy used when a selection does not name one.
    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    /// Strategy-specific auxiliary parameter.
    pub fn bonus(&self) -> &str {
        &self.bonus
    }

    pub fn kind(&self) -> SlotKind {
        self.kind
    }

    /// All stored points, terminator included.
    pub fn points(&self) -> &[ColorPoint] {
        &self.points
    }

    /// Returns the point at `index`, or the terminator past the end of the
    /// playable list.
    pub fn point(&self, index: usize) -> ColorPoint {
        point_at(&self.points, index)
    }

    /// Number of playable points before the first terminator.
    pub fn playable_len(&self) -> usize {
        self.points
            .iter()
            .position(ColorPoint::is_terminator)
            .unwrap_or(self.points.len())
    }

    /// Maximum number of points this sequence can hold.
    pub const fn capacity(&self) -> usize {
        P
    }

    /// Replaces bonus and points in one step.
    ///
    /// Everything is validated before anything is written, so on error the
    /// sequence is left exactly as it was.
    pub(crate) fn overwrite<It>(&mut self, bonus: &str, points: It) -> Result<(), SequencerError>
    where
        It: IntoIterator<Item = ColorPoint>,
    {
        let mut fresh = Vec::new();
        for point in points {
            fresh
                .push(point)
                .map_err(|_| SequencerError::CapacityExceeded)?;
        }
        let bonus = bounded::<BONUS_CAPACITY>(bonus)?;

        self.points = fresh;
        self.bonus = bonus;
        Ok(())
    }
}

/// Builder for constructing sequences.
#[derive(Debug)]
pub struct SequenceBuilder<const P: usize> {
    label: Result<String<LABEL_CAPACITY>, SequencerError>,
    strategy: Result<String<STRATEGY_CAPACITY>, SequencerError>,
    bonus: Result<String<BONUS_CAPACITY>, SequencerError>,
    points: Vec<ColorPoint, P>,
    kind: SlotKind,
}

impl<const P: usize> SequenceBuilder<P> {
    /// Creates a new builder for a built-in sequence played with "points".
    pub fn new(label: &str) -> Self {
        Self {
            label: bounded(label),
            strategy: bounded("points"),
            bonus: Ok(String::new()),
            points: Vec::new(),
            kind: SlotKind::BuiltIn,
        }
    }

    /// Sets the default strategy name.
    pub fn strategy(mut self, name: &str) -> Self {
        self.strategy = bounded(name);
        self
    }

    /// Sets the bonus parameter.
    pub fn bonus(mut self, bonus: &str) -> Self {
        self.bonus = bounded(bonus);
        self
    }

    /// Marks the slot as built-in or user-loadable.
    pub fn kind(mut self, kind: SlotKind) -> Self {
        self.kind = kind;
        self
    }

    /// Appends a point.
    ///
    /// # Errors
    /// Returns `CapacityExceeded` if the point list is full.
    pub fn point(mut self, point: ColorPoint) -> Result<Self, SequencerError> {
        self.points
            .push(point)
            .map_err(|_| SequencerError::CapacityExceeded)?;
        Ok(self)
    }

    /// Appends every point from an iterator.
    pub fn points<It>(mut self, points: It) -> Result<Self, SequencerError>
    where
        It: IntoIterator<Item = ColorPoint>,
    {
        for point in points {
            self = self.point(point)?;
        }
        Ok(self)
    }

    /// Builds the sequence.
    ///
    /// # Errors
    /// * `CapacityExceeded` - label, strategy or bonus exceeded its fixed capacity
    pub fn build(self) -> Result<Sequence<P>, SequencerError> {
        Ok(Sequence {
            label: self.label?,
            strategy: self.strategy?,
            bonus: self.bonus?,
            points: self.points,
            kind: self.kind,
        })
    }
}

/// Bounded point lookup.
///
/// The first terminator is returned as stored (its color is a closing frame
/// for "single"). Anything after it, or past the end, reads as
/// [`ColorPoint::TERMINATOR`].
pub(crate) fn point_at(points: &[ColorPoint], index: usize) -> ColorPoint {
    let end = points
        .iter()
        .position(ColorPoint::is_terminator)
        .map_or(points.len(), |t| t + 1);
    points[..end]
        .get(index)
        .copied()
        .unwrap_or(ColorPoint::TERMINATOR)
}

fn bounded<const N: usize>(s: &str) -> Result<String<N>, SequencerError> {
    String::try_from(s).map_err(|_| SequencerError::CapacityExceeded)
}
