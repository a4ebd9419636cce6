//! Engine error type.

use thiserror::Error;

use crate::render::textures::AtlasKind;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The main screen render target was absent or zero-sized.
    #[error("no main screen found")]
    MissingRenderTarget,

    #[error("map has no cells")]
    EmptyMap,

    /// Maps must be rectangular; raised for the first ragged row.
    #[error("map row {row} has {len} cells, expected {expected}")]
    MalformedMap { row: usize, len: usize, expected: usize },

    #[error("invalid render options: {reason}")]
    InvalidOptions { reason: &'static str },

    /// A draw pass would have to sample an unusable atlas.
    #[error("could not use {kind} texture atlas: image not ready")]
    AtlasNotReady { kind: AtlasKind },
}
