//! Tonekit Core - image transformation engine
//!
//! This crate provides the pixel-level engine behind Tonekit's editor:
//! color-space conversions, an interactive tone-curve editor that produces
//! 256-entry lookup tables, and a pipeline of named effects that are
//! dispatched by name and never fail the caller.
//!
//! - [`buffer`] - the [`ImageBuffer`] contract (8-bit gray or RGB, row-major)
//! - [`color`] - RGB/HSV/YUV conversion
//! - [`curve`] - control points, interpolation, LUTs and the gesture editor
//! - [`effects`] - the eight preset effects and their formulas
//! - [`pipeline`] and [`plugin`] - provider registry and guarded dispatch
//! - [`job`] - background execution with cancellation and progress
//! - [`decode`] and [`encode`] - codec adapter over the `image` crate

pub mod buffer;
pub mod color;
pub mod curve;
pub mod debounce;
pub mod decode;
pub mod effects;
pub mod encode;
pub mod error;
pub mod filter;
pub mod histogram;
pub mod job;
pub mod luma;
pub mod ops;
pub mod params;
pub mod pipeline;
pub mod plugin;

pub use buffer::{ChannelLayout, ImageBuffer};
pub use curve::{ControlPoint, CurveEditor, CurveModel, EditorConfig, Interpolation, Lut};
pub use debounce::{Clock, ManualClock, SystemClock};
pub use effects::{apply_effect, EffectKind, EffectParams};
pub use error::{BufferError, EffectError, EngineError};
pub use histogram::{compute_histogram, Histogram};
pub use job::{CancelToken, EffectJob, ProgressSink};
pub use params::{ClampReport, ParamSpec, ParameterSet};
pub use pipeline::{EffectOutcome, EffectPipeline, OutcomeStatus, ProviderInfo};
pub use plugin::EffectProvider;
