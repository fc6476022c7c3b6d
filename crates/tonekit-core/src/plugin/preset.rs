//! The eight effect families exposed as providers.

use super::{EffectProvider, ProviderState};
use crate::buffer::ImageBuffer;
use crate::effects::{apply_effect, EffectKind, EffectParams, EFFECT_PARAM_SPECS};
use crate::error::EffectError;
use crate::params::{ParamSpec, ParameterSet};

/// Provider wrapping one [`EffectKind`].
#[derive(Debug, Clone)]
pub struct PresetEffect {
    kind: EffectKind,
    state: ProviderState,
}

impl PresetEffect {
    pub fn new(kind: EffectKind) -> Self {
        Self {
            kind,
            state: ProviderState::new(&EFFECT_PARAM_SPECS),
        }
    }

    pub fn kind(&self) -> EffectKind {
        self.kind
    }
}

impl EffectProvider for PresetEffect {
    fn name(&self) -> &'static str {
        self.kind.name()
    }

    fn display_name(&self) -> &'static str {
        self.kind.display_name()
    }

    fn description(&self) -> &'static str {
        match self.kind {
            EffectKind::Basic => "Multiplicative brightness, contrast and color enhancement",
            EffectKind::Artistic => "Sepia toning, oil-paint smoothing and posterization",
            EffectKind::Professional => "Channel equalization, gamma and unsharp masking",
            EffectKind::Filters => "Blur or sharpen, emboss and edge enhancement",
            EffectKind::Edges => "Canny edge map blended over the image",
            EffectKind::Noise => "Non-local means denoising and morphological closing",
            EffectKind::ColorTransform => "HSV hue rotation with value and saturation gain",
            EffectKind::Vintage => "Warm channel balance with a radial vignette",
        }
    }

    fn parameter_specs(&self) -> &[ParamSpec] {
        &EFFECT_PARAM_SPECS
    }

    fn state(&self) -> &ProviderState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ProviderState {
        &mut self.state
    }

    fn is_identity(&self, params: &ParameterSet) -> bool {
        self.kind == EffectKind::Basic && EffectParams::from_set(params).0.is_neutral()
    }

    fn apply(&self, image: &ImageBuffer, params: &ParameterSet) -> Result<ImageBuffer, EffectError> {
        super::require_finite(params)?;
        let (params, _) = EffectParams::from_set(params);
        Ok(apply_effect(image, self.kind, &params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_follow_kind() {
        for kind in EffectKind::ALL {
            let provider = PresetEffect::new(kind);
            assert_eq!(provider.name(), kind.name());
            assert_eq!(provider.kind(), kind);
            assert!(!provider.description().is_empty());
        }
    }

    #[test]
    fn test_matches_direct_apply() {
        let img = ImageBuffer::from_fn(6, 6, |x, y| [(x * 40) as u8, (y * 40) as u8, 128]);
        let params = EffectParams::new(1.3, 0.8, 1.6);
        let provider = PresetEffect::new(EffectKind::Vintage);
        let out = provider.process(&img, &params.to_set()).unwrap();
        assert_eq!(out.image, apply_effect(&img, EffectKind::Vintage, &params));
        assert!(out.clamps.is_empty());
    }

    #[test]
    fn test_basic_identity() {
        let provider = PresetEffect::new(EffectKind::Basic);
        assert!(provider.is_identity(&provider.parameters()));
        assert!(!PresetEffect::new(EffectKind::Vintage).is_identity(&provider.parameters()));
    }

    #[test]
    fn test_clamps_reported() {
        let provider = PresetEffect::new(EffectKind::Basic);
        let img = ImageBuffer::filled(2, 2, [10, 20, 30]);
        let out = provider
            .process(&img, &ParameterSet::new().with("brightness", 7.0))
            .unwrap();
        assert_eq!(out.clamps.len(), 1);
        assert_eq!(out.clamps.notes[0].applied, 3.0);
    }
}
