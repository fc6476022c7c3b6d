//! Additive-style brightness, contrast and saturation sliders in `[-100, 100]`.

use super::{EffectProvider, ProviderState};
use crate::buffer::ImageBuffer;
use crate::color::{hsv_to_rgb, rgb_to_hsv};
use crate::error::EffectError;
use crate::ops::scale_channels;
use crate::params::{ParamSpec, ParameterSet};

const SPECS: [ParamSpec; 3] = [
    ParamSpec::new("brightness", -100.0, 100.0, 0.0),
    ParamSpec::new("contrast", -100.0, 100.0, 0.0),
    ParamSpec::new("saturation", -100.0, 100.0, 0.0),
];

/// Brightness scales HSV value, contrast scales every channel and saturation
/// scales HSV saturation, each by `1 + v / 100`.
#[derive(Debug, Clone)]
pub struct BasicAdjustment {
    state: ProviderState,
}

impl BasicAdjustment {
    pub fn new() -> Self {
        Self {
            state: ProviderState::new(&SPECS),
        }
    }
}

impl Default for BasicAdjustment {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectProvider for BasicAdjustment {
    fn name(&self) -> &'static str {
        "basic_adjustment"
    }

    fn display_name(&self) -> &'static str {
        "Basic Adjustment"
    }

    fn description(&self) -> &'static str {
        "Brightness, contrast and saturation sliders"
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
        SPECS.iter().all(|spec| params.get_or(spec.name, 0.0) == 0.0)
    }

    fn apply(&self, image: &ImageBuffer, params: &ParameterSet) -> Result<ImageBuffer, EffectError> {
        super::require_finite(params)?;
        let brightness = params.get_or("brightness", 0.0);
        let contrast = params.get_or("contrast", 0.0);
        let saturation = params.get_or("saturation", 0.0);

        let mut out = image.to_rgb();
        if brightness != 0.0 {
            let factor = 1.0 + brightness / 100.0;
            let mut hsv = rgb_to_hsv(&out);
            for px in &mut hsv.pixels {
                px.v = (px.v * factor).clamp(0.0, 255.0);
            }
            out = hsv_to_rgb(&hsv);
        }
        if contrast != 0.0 {
            let factor = (1.0 + contrast / 100.0).abs();
            out = scale_channels(&out, [factor; 3]);
        }
        if saturation != 0.0 {
            let factor = 1.0 + saturation / 100.0;
            let mut hsv = rgb_to_hsv(&out);
            for px in &mut hsv.pixels {
                px.s = (px.s * factor).clamp(0.0, 255.0);
            }
            out = hsv_to_rgb(&hsv);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(b: f32, c: f32, s: f32, image: &ImageBuffer) -> ImageBuffer {
        let params = ParameterSet::new()
            .with("brightness", b)
            .with("contrast", c)
            .with("saturation", s);
        BasicAdjustment::new().process(image, &params).unwrap().image
    }

    #[test]
    fn test_zero_is_identity() {
        let img = ImageBuffer::from_fn(4, 4, |x, y| [(x * 60) as u8, (y * 60) as u8, 17]);
        assert_eq!(run(0.0, 0.0, 0.0, &img), img);
        assert!(BasicAdjustment::new().is_identity(&ParameterSet::defaults(&SPECS)));
    }

    #[test]
    fn test_brightness_scales_value() {
        let img = ImageBuffer::filled(1, 1, [100, 50, 0]);
        assert_eq!(run(50.0, 0.0, 0.0, &img).data(), &[150, 75, 0]);
    }

    #[test]
    fn test_contrast_scales_channels() {
        let img = ImageBuffer::filled(1, 1, [100, 200, 40]);
        assert_eq!(run(0.0, -50.0, 0.0, &img).data(), &[50, 100, 20]);
        assert_eq!(run(0.0, -100.0, 0.0, &img).data(), &[0, 0, 0]);
    }

    #[test]
    fn test_full_desaturation() {
        let img = ImageBuffer::filled(1, 1, [200, 100, 50]);
        assert_eq!(run(0.0, 0.0, -100.0, &img).data(), &[200, 200, 200]);
    }
}
