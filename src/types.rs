//! Core types shared by the store, the strategies and the engine.

use palette::Srgb;

/// One timed color sample of a sequence.
///
/// A negative `interval_ms` marks the end of the point list. The terminator
/// still carries a color, which the "single" strategy shows as the closing
/// frame of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ColorPoint {
    pub red: u8,
    pub green: u8,
    pub blue: u8,

    /// Fourth channel for RGBW strips. Ignored by RGB strips.
    pub white: u8,

    /// Milliseconds to hold this point before moving to the next one.
    pub interval_ms: i32,
}

impl ColorPoint {
    /// The canonical end-of-list marker.
    pub const TERMINATOR: Self = Self::new(0, 0, 0, 0, -1);

    /// Creates a new point.
    #[inline]
    pub const fn new(red: u8, green: u8, blue: u8, white: u8, interval_ms: i32) -> Self {
        Self {
            red,
            green,
            blue,
            white,
            interval_ms,
        }
    }

    /// Returns true if this point ends the list.
    #[inline]
    pub const fn is_terminator(&self) -> bool {
        self.interval_ms < 0
    }

    /// Hold time in milliseconds; zero for the terminator.
    #[inline]
    pub fn hold_ms(&self) -> u64 {
        u64::try_from(self.interval_ms).unwrap_or(0)
    }

    /// The RGB part of the point as an 8-bit color.
    #[inline]
    pub fn rgb(&self) -> Srgb<u8> {
        Srgb::new(self.red, self.green, self.blue)
    }
}

/// Whether a slot was defined by firmware or is a placeholder for user data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SlotKind {
    /// Shipped with the firmware. Never overwritten by the loader.
    BuiltIn,
    /// Placeholder that the loader may (re)populate at any time.
    User,
}

/// Outcome of a successful selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Selection {
    /// Cursor reset to the first point in the START phase.
    Started,
    /// The requested sequence is already playing; nothing changed.
    Unchanged,
}

/// Errors reported by the sequencer's public operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequencerError {
    /// No slot carries the requested label.
    NotFound,

    /// The strategy name does not match any registered strategy.
    StrategyUndefined,

    /// The sequence definition payload is malformed.
    Deserialization,

    /// The payload's label has no placeholder slot to load into.
    NoPlaceholder,

    /// The payload's label names a built-in sequence.
    NotAUserSequence,

    /// A point list, label or string field does not fit its fixed capacity.
    CapacityExceeded,

    /// A slot with this label already exists.
    DuplicateLabel,
}

impl core::fmt::Display for SequencerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SequencerError::NotFound => write!(f, "sequence not found"),
            SequencerError::StrategyUndefined => write!(f, "strategy undefined"),
            SequencerError::Deserialization => {
                write!(f, "malformed sequence definition")
            }
            SequencerError::NoPlaceholder => {
                write!(f, "no placeholder slot for this label")
            }
            SequencerError::NotAUserSequence => {
                write!(f, "label names a built-in sequence")
            }
            SequencerError::CapacityExceeded => write!(f, "capacity exceeded"),
            SequencerError::DuplicateLabel => write!(f, "label already in use"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SequencerError {}
