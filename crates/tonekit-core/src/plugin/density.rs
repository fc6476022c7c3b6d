//! Tone density: gamma or curve remap, shadow/highlight recovery and color
//! temperature, plus one-shot binarize and equalize operations.
//!
//! The tone stages run on floating-point values and round once at the end.

use super::{EffectProvider, ProviderState};
use crate::buffer::ImageBuffer;
use crate::color::to_u8;
use crate::curve::Lut;
use crate::error::EffectError;
use crate::luma::luma_u8;
use crate::ops::equalize_luma;
use crate::params::{ParamSpec, ParameterSet};

const SPECS: [ParamSpec; 5] = [
    ParamSpec::new("gamma", 0.1, 3.0, 1.0),
    ParamSpec::new("shadow", -100.0, 100.0, 0.0),
    ParamSpec::new("highlight", -100.0, 100.0, 0.0),
    ParamSpec::new("temperature", -100.0, 100.0, 0.0),
    ParamSpec::new("threshold", 0.0, 255.0, 127.0),
];

/// Source of the gamma stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GammaMode {
    /// Power law from the `gamma` parameter.
    #[default]
    Slider,
    /// Remap through a curve editor's table; `gamma` is ignored.
    Curve(Lut),
}

#[derive(Debug, Clone)]
pub struct DensityAdjustment {
    state: ProviderState,
    gamma_mode: GammaMode,
}

impl DensityAdjustment {
    pub fn new() -> Self {
        Self {
            state: ProviderState::new(&SPECS),
            gamma_mode: GammaMode::Slider,
        }
    }

    pub fn gamma_mode(&self) -> &GammaMode {
        &self.gamma_mode
    }

    /// Switch the gamma stage to a curve table.
    pub fn set_curve_lut(&mut self, lut: Lut) {
        self.gamma_mode = GammaMode::Curve(lut);
    }

    /// Switch the gamma stage back to the slider.
    pub fn use_slider_gamma(&mut self) {
        self.gamma_mode = GammaMode::Slider;
    }

    /// Black and white at the stored `threshold`: luma above it becomes 255.
    pub fn binarize(&self, image: &ImageBuffer) -> ImageBuffer {
        let threshold = self.state.values.get_or("threshold", 127.0);
        binarize(image, threshold)
    }

    /// Equalize the luma histogram.
    pub fn equalize(&self, image: &ImageBuffer) -> ImageBuffer {
        equalize_luma(image)
    }
}

impl Default for DensityAdjustment {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectProvider for DensityAdjustment {
    fn name(&self) -> &'static str {
        "density_adjustment"
    }

    fn display_name(&self) -> &'static str {
        "Density Adjustment"
    }

    fn description(&self) -> &'static str {
        "Gamma correction, shadow/highlight adjustment and color temperature"
    }

    fn parameter_specs(&self) -> &[ParamSpec] {
        &SPECS
    }

    fn state(&self) -> &ProviderState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ProviderState {
        &mut self.state
    }

    fn reset_parameters(&mut self) {
        self.state.values = ParameterSet::defaults(&SPECS);
        self.gamma_mode = GammaMode::Slider;
    }

    fn is_identity(&self, params: &ParameterSet) -> bool {
        self.gamma_mode == GammaMode::Slider
            && params.get_or("gamma", 1.0) == 1.0
            && params.get_or("shadow", 0.0) == 0.0
            && params.get_or("highlight", 0.0) == 0.0
            && params.get_or("temperature", 0.0) == 0.0
    }

    fn apply(&self, image: &ImageBuffer, params: &ParameterSet) -> Result<ImageBuffer, EffectError> {
        super::require_finite(params)?;
        let rgb = image.to_rgb();
        if self.is_identity(params) {
            return Ok(rgb);
        }

        let gamma = params.get_or("gamma", 1.0);
        let shadow = params.get_or("shadow", 0.0) / 100.0;
        let highlight = params.get_or("highlight", 0.0) / 100.0;
        let [red_gain, blue_gain] = temperature_gains(params.get_or("temperature", 0.0));

        let mut data = Vec::with_capacity(rgb.data().len());
        for px in rgb.data().chunks_exact(3) {
            for (channel, &level) in px.iter().enumerate() {
                let mut v = match &self.gamma_mode {
                    GammaMode::Curve(lut) => lut.get(level) as f32,
                    GammaMode::Slider if gamma != 1.0 => 255.0 * (level as f32 / 255.0).powf(1.0 / gamma),
                    GammaMode::Slider => level as f32,
                };
                v = shadow_highlight(v, shadow, highlight);
                v = match channel {
                    0 => (v * red_gain).clamp(0.0, 255.0),
                    2 => (v * blue_gain).clamp(0.0, 255.0),
                    _ => v,
                };
                data.push(to_u8(v));
            }
        }
        Ok(rgb.with_data(data))
    }
}

/// Lift shadows toward mid-gray, then pull highlights toward it.
///
/// `shadow` and `highlight` are fractions in `[-1, 1]`; `value` is a level
/// in `[0, 255]`.
pub fn shadow_highlight(value: f32, shadow: f32, highlight: f32) -> f32 {
    let mut v = value / 255.0;
    if shadow != 0.0 && v < 0.5 {
        v += shadow * (0.5 - v);
    }
    if highlight != 0.0 && v > 0.5 {
        v -= highlight * (v - 0.5);
    }
    v * 255.0
}

/// Red and blue gains for a temperature in `[-100, 100]`.
///
/// Warm shifts boost red by up to 30% and cut blue by up to 20%; cool
/// shifts mirror that.
pub fn temperature_gains(temperature: f32) -> [f32; 2] {
    let t = temperature.abs() / 100.0;
    if temperature > 0.0 {
        [1.0 + 0.3 * t, 1.0 - 0.2 * t]
    } else {
        [1.0 - 0.2 * t, 1.0 + 0.3 * t]
    }
}

/// Luma strictly above `threshold` maps to white, everything else to black.
pub fn binarize(image: &ImageBuffer, threshold: f32) -> ImageBuffer {
    let rgb = image.to_rgb();
    let cutoff = threshold.trunc();
    let data = rgb
        .data()
        .chunks_exact(3)
        .flat_map(|px| {
            let level = if luma_u8(px[0], px[1], px[2]) as f32 > cutoff { 255 } else { 0 };
            [level; 3]
        })
        .collect();
    rgb.with_data(data)
}
