//! The eight preset effect families.
//!
//! Each family maps the same three slider values (brightness, contrast,
//! saturation; neutral at 1.0) onto threshold-gated sub-operations. All
//! families take a borrowed image and return a new RGB buffer.
//!
//! - [`basic`] - multiplicative brightness, contrast and color enhance
//! - [`artistic`] - sepia, bilateral smoothing, posterization
//! - [`professional`] - channel equalization, gamma, unsharp mask
//! - [`filters`] - blur or sharpen, emboss, edge enhance
//! - [`edges`] - Canny edge map blended with the source
//! - [`noise`] - non-local means denoise and morphological closing
//! - [`color_transform`] - HSV hue shift and value/saturation scale
//! - [`vintage`] - warm channel balance with a radial vignette

pub mod artistic;
pub mod basic;
pub mod color_transform;
pub mod edges;
pub mod filters;
pub mod noise;
pub mod professional;
pub mod vintage;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::buffer::ImageBuffer;
use crate::error::EngineError;
use crate::job::{CancelToken, NoProgress, ProgressSink};
use crate::params::{ClampReport, ParamSpec, ParameterSet};

/// Effect family selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Basic,
    Artistic,
    Professional,
    Filters,
    Edges,
    Noise,
    ColorTransform,
    Vintage,
}

impl EffectKind {
    /// Every family in menu order.
    pub const ALL: [EffectKind; 8] = [
        EffectKind::Basic,
        EffectKind::Artistic,
        EffectKind::Professional,
        EffectKind::Filters,
        EffectKind::Edges,
        EffectKind::Noise,
        EffectKind::ColorTransform,
        EffectKind::Vintage,
    ];

    /// Registry name.
    pub fn name(self) -> &'static str {
        match self {
            EffectKind::Basic => "basic",
            EffectKind::Artistic => "artistic",
            EffectKind::Professional => "professional",
            EffectKind::Filters => "filters",
            EffectKind::Edges => "edges",
            EffectKind::Noise => "noise",
            EffectKind::ColorTransform => "color",
            EffectKind::Vintage => "vintage",
        }
    }

    /// Human-readable label.
    pub fn display_name(self) -> &'static str {
        match self {
            EffectKind::Basic => "Basic Adjustment",
            EffectKind::Artistic => "Artistic",
            EffectKind::Professional => "Professional Correction",
            EffectKind::Filters => "Filter Effects",
            EffectKind::Edges => "Edge / Contour",
            EffectKind::Noise => "Noise Processing",
            EffectKind::ColorTransform => "Color Transform",
            EffectKind::Vintage => "Vintage",
        }
    }

    /// Look up a family by registry name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EffectKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| EngineError::UnknownEffect(s.to_string()))
    }
}

/// The three normalized slider values shared by every family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectParams {
    /// Brightness role, `[0.01, 3.0]`
    pub brightness: f32,
    /// Contrast role, `[0.01, 3.0]`
    pub contrast: f32,
    /// Saturation role, `[0.0, 3.0]`
    pub saturation: f32,
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            contrast: 1.0,
            saturation: 1.0,
        }
    }
}

/// Slider domains in `brightness, contrast, saturation` order.
pub const EFFECT_PARAM_SPECS: [ParamSpec; 3] = [
    ParamSpec::new("brightness", 0.01, 3.0, 1.0),
    ParamSpec::new("contrast", 0.01, 3.0, 1.0),
    ParamSpec::new("saturation", 0.0, 3.0, 1.0),
];

impl EffectParams {
    pub fn new(brightness: f32, contrast: f32, saturation: f32) -> Self {
        Self {
            brightness,
            contrast,
            saturation,
        }
    }

    /// True when every value is at its neutral 1.0.
    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }

    /// Clamp into the slider domains, reporting each correction.
    pub fn clamped(&self) -> (Self, ClampReport) {
        Self::from_set(&self.to_set())
    }

    /// Read from a parameter set; missing values default to 1.0.
    pub fn from_set(params: &ParameterSet) -> (Self, ClampReport) {
        let (resolved, report) = params.resolve(&EFFECT_PARAM_SPECS);
        let value = |spec: &ParamSpec| resolved.get_or(spec.name, spec.default);
        let clamped = Self {
            brightness: value(&EFFECT_PARAM_SPECS[0]),
            contrast: value(&EFFECT_PARAM_SPECS[1]),
            saturation: value(&EFFECT_PARAM_SPECS[2]),
        };
        (clamped, report)
    }

    pub fn to_set(&self) -> ParameterSet {
        ParameterSet::new()
            .with("brightness", self.brightness)
            .with("contrast", self.contrast)
            .with("saturation", self.saturation)
    }
}

/// Apply an effect family. Parameters are clamped to their domains first.
pub fn apply_effect(image: &ImageBuffer, kind: EffectKind, params: &EffectParams) -> ImageBuffer {
    match apply_effect_cancellable(image, kind, params, &CancelToken::new(), &NoProgress) {
        Ok(out) => out,
        // A fresh token is never cancelled.
        Err(_) => image.to_rgb(),
    }
}

/// Apply an effect family, polling `cancel` and reporting to `progress`.
///
/// Returns [`EngineError::Cancelled`] when the token fires mid-computation.
/// The source image is never touched either way.
pub fn apply_effect_cancellable(
    image: &ImageBuffer,
    kind: EffectKind,
    params: &EffectParams,
    cancel: &CancelToken,
    progress: &dyn ProgressSink,
) -> Result<ImageBuffer, EngineError> {
    let (p, _) = params.clamped();
    debug!(
        effect = kind.name(),
        width = image.width(),
        height = image.height(),
        brightness = p.brightness,
        contrast = p.contrast,
        saturation = p.saturation,
        "Applying effect"
    );
    cancel.check()?;

    let out = match kind {
        EffectKind::Basic => basic::apply(image, &p),
        EffectKind::Artistic => artistic::apply(image, &p),
        EffectKind::Professional => professional::apply(image, &p),
        EffectKind::Filters => filters::apply(image, &p),
        EffectKind::Edges => edges::apply(image, &p),
        EffectKind::Noise => noise::apply(image, &p, cancel, progress)?,
        EffectKind::ColorTransform => color_transform::apply(image, &p),
        EffectKind::Vintage => vintage::apply(image, &p),
    };
    progress.report(1.0);
    Ok(out)
}
