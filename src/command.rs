//! Requests from the console, portal or file loader.

use crate::loader::SequencePayload;
use crate::types::SequencerError;
use serde::Deserialize;

/// Request to play a sequence, optionally with a non-default strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SelectRequest<'a> {
    pub label: &'a str,
    #[serde(default, borrow)]
    pub strategy: Option<&'a str>,
}

impl<'a> SelectRequest<'a> {
    /// Creates a request that uses the sequence's default strategy.
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            strategy: None,
        }
    }

    /// Overrides the strategy.
    pub fn with_strategy(mut self, strategy: &'a str) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Parses a `{"label": ..., "strategy": ...}` request.
    pub fn from_json(json: &'a [u8]) -> Result<Self, SequencerError> {
        serde_json_core::from_slice::<SelectRequest<'a>>(json)
            .map(|(request, _)| request)
            .map_err(|_| SequencerError::Deserialization)
    }
}

/// Commands accepted by [`NeoSequencer::handle_command`](crate::NeoSequencer::handle_command).
#[derive(Debug, Clone, Copy)]
pub enum SequencerCommand<'a> {
    /// Select a sequence.
    Select(SelectRequest<'a>),
    /// Load an already parsed definition and play it.
    Load(&'a SequencePayload<'a>),
    /// Parse a JSON definition, load it and play it.
    LoadJson(&'a [u8]),
    /// Stop playback.
    Stop,
}
