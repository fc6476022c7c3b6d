//! Error types for the transformation engine.
//!
//! Only buffer-shape and contract violations surface as [`EngineError`].
//! Numeric trouble inside an effect is reported as an [`EffectError`]
//! diagnostic next to the untouched source image.

use thiserror::Error;

/// Pixel buffer contract violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// Data length does not match `width * height * channels`.
    #[error("Invalid buffer shape: expected {expected} bytes for {width}x{height}x{channels}, got {actual}")]
    ShapeMismatch {
        width: u32,
        height: u32,
        channels: usize,
        expected: usize,
        actual: usize,
    },

    /// Channel count other than 1 (gray) or 3 (RGB).
    #[error("Unsupported channel count: {0}")]
    UnsupportedChannels(u8),

    /// Channel index outside the buffer's channel range.
    #[error("Channel index {index} out of range for {channels}-channel buffer")]
    ChannelOutOfRange { index: usize, channels: usize },

    /// Two buffers that must share a shape do not.
    #[error("Buffer dimensions differ: {left_width}x{left_height} vs {right_width}x{right_height}")]
    DimensionMismatch {
        left_width: u32,
        left_height: u32,
        right_width: u32,
        right_height: u32,
    },
}

/// Errors surfaced to callers of the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The supplied buffer violates the buffer contract.
    #[error(transparent)]
    Buffer(#[from] BufferError),

    /// No provider is registered under this name.
    #[error("Unknown effect: {0}")]
    UnknownEffect(String),

    /// A provider does not expose this parameter.
    #[error("Unknown parameter '{parameter}' for effect '{effect}'")]
    UnknownParameter { effect: String, parameter: String },

    /// Rejected control-point import.
    #[error("Invalid curve: {0}")]
    InvalidCurve(String),

    /// The caller cancelled the computation.
    #[error("Operation cancelled")]
    Cancelled,

    /// A background job terminated abnormally.
    #[error("Background job failed: {0}")]
    JobFailed(String),
}

/// Diagnostic for an effect that could not be applied.
///
/// The engine pairs this with the original image rather than propagating it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EffectError {
    /// The transform panicked.
    #[error("Effect panicked: {0}")]
    Panicked(String),

    /// The transform produced or consumed a non-finite value.
    #[error("Non-finite value in {0}")]
    NonFinite(&'static str),

    /// The transform rejected its input.
    #[error("Invalid effect input: {0}")]
    InvalidInput(String),
}

impl From<BufferError> for EffectError {
    fn from(err: BufferError) -> Self {
        EffectError::InvalidInput(err.to_string())
    }
}
