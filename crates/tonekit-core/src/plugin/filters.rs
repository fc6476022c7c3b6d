//! Gaussian blur and sharpening sliders.

use super::{EffectProvider, ProviderState};
use crate::buffer::ImageBuffer;
use crate::effects::filters::sharpen;
use crate::error::EffectError;
use crate::filter::gaussian_blur_sized;
use crate::params::{ParamSpec, ParameterSet};

const SPECS: [ParamSpec; 2] = [
    ParamSpec::new("blur_strength", 0.0, 20.0, 0.0),
    ParamSpec::new("sharpness", 0.0, 3.0, 0.0),
];

#[derive(Debug, Clone)]
pub struct FilterProcessing {
    state: ProviderState,
}

impl FilterProcessing {
    pub fn new() -> Self {
        Self {
            state: ProviderState::new(&SPECS),
        }
    }
}

impl Default for FilterProcessing {
    fn default() -> Self {
        Self::new()
    }
}

/// Odd Gaussian kernel size for a blur strength: `2 * round(strength) + 1`.
pub fn blur_kernel_size(strength: f32) -> usize {
    2 * strength.max(0.0).round() as usize + 1
}

/// Sigma derived from a kernel size when none is given.
pub fn sigma_for_kernel(size: usize) -> f32 {
    0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

impl EffectProvider for FilterProcessing {
    fn name(&self) -> &'static str {
        "filter_processing"
    }

    fn display_name(&self) -> &'static str {
        "Filter Processing"
    }

    fn description(&self) -> &'static str {
        "Gaussian blur and sharpening"
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

    fn is_identity(&self, params: &ParameterSet) -> bool {
        blur_kernel_size(params.get_or("blur_strength", 0.0)) == 1 && params.get_or("sharpness", 0.0) == 0.0
    }

    fn apply(&self, image: &ImageBuffer, params: &ParameterSet) -> Result<ImageBuffer, EffectError> {
        super::require_finite(params)?;
        let mut out = image.to_rgb();
        let size = blur_kernel_size(params.get_or("blur_strength", 0.0));
        if size > 1 {
            out = gaussian_blur_sized(&out, size, sigma_for_kernel(size));
        }
        let sharpness = params.get_or("sharpness", 0.0);
        if sharpness > 0.0 {
            out = sharpen(&out, 1.0 + sharpness);
        }
        Ok(out)
    }
}
