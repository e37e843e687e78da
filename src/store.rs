use crate::sequence::Sequence;
use crate::types::SequencerError;
use heapless::Vec;

/// Identifies a slot in a [`SequenceStore`].
///
/// A slot's identity is stable for the lifetime of the store: slots are
/// appended while the store is populated and never removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SlotId(pub usize);

/// Fixed-capacity table of labeled sequences.
///
/// # Type Parameters
/// * `S` - Maximum number of slots
/// * `P` - Maximum number of points per sequence
#[derive(Debug, Clone)]
pub struct SequenceStore<const S: usize, const P: usize> {
    slots: Vec<Sequence<P>, S>,
}

impl<const S: usize, const P: usize> SequenceStore<S, P> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Adds a sequence in a new slot.
    ///
    /// # Errors
    /// * `DuplicateLabel` - A slot with the same label already exists
    /// * `CapacityExceeded` - Every slot is in use
    pub fn insert(&mut self, sequence: Sequence<P>) -> Result<SlotId, SequencerError> {
        if self.find(sequence.label()).is_some() {
            return Err(SequencerError::DuplicateLabel);
        }

        let id = SlotId(self.slots.len());
        self.slots
            .push(sequence)
            .map_err(|_| SequencerError::CapacityExceeded)?;
        Ok(id)
    }

    /// Returns the first slot whose label matches exactly.
    pub fn find(&self, label: &str) -> Option<SlotId> {
        self.slots
            .iter()
            .position(|s| s.label() == label)
            .map(SlotId)
    }

    pub fn get(&self, id: SlotId) -> Option<&Sequence<P>> {
        self.slots.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: SlotId) -> Option<&mut Sequence<P>> {
        self.slots.get_mut(id.0)
    }

    /// Returns the number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        S
    }

    /// Iterates over slots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &Sequence<P>)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(idx, s)| (SlotId(idx), s))
    }

    /// Iterates over labels in slot order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(Sequence::label)
    }
}

impl<const S: usize, const P: usize> Default for SequenceStore<S, P> {
    fn default() -> Self {
        Self::new()
    }
}
