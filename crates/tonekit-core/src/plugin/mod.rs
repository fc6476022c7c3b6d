//! The effect provider capability contract.
//!
//! Every effect the pipeline can run implements [`EffectProvider`]. A
//! provider declares its parameters as [`ParamSpec`]s, keeps its current
//! values and enabled flag in a [`ProviderState`], and supplies one pure
//! transform. Parameter bookkeeping and clamping come from the trait's
//! default methods, so a new effect only has to describe itself and
//! implement [`EffectProvider::apply`].
//!
//! # Built-in providers
//!
//! | Provider | Name | Parameters |
//! |---|---|---|
//! | [`PresetEffect`] | `basic`, `artistic`, ... | brightness, contrast, saturation |
//! | [`BasicAdjustment`] | `basic_adjustment` | brightness, contrast, saturation in `[-100, 100]` |
//! | [`DensityAdjustment`] | `density_adjustment` | gamma, shadow, highlight, temperature, threshold |
//! | [`FilterProcessing`] | `filter_processing` | blur_strength, sharpness |
//! | [`ImageAnalysis`] | `image_analysis` | none |

pub mod adjust;
pub mod analysis;
pub mod density;
pub mod filters;
pub mod preset;

pub use adjust::BasicAdjustment;
pub use analysis::{ImageAnalysis, ImageStats};
pub use density::{DensityAdjustment, GammaMode};
pub use filters::FilterProcessing;
pub use preset::PresetEffect;

use crate::buffer::ImageBuffer;
use crate::error::{EffectError, EngineError};
use crate::params::{ClampNote, ClampReport, ParamSpec, ParameterSet};

/// Mutable state shared by every provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderState {
    pub enabled: bool,
    /// Current value of every declared parameter.
    pub values: ParameterSet,
}

impl ProviderState {
    /// Enabled, with every parameter at its default.
    pub fn new(specs: &[ParamSpec]) -> Self {
        Self {
            enabled: true,
            values: ParameterSet::defaults(specs),
        }
    }
}

/// Output of a provider run.
#[derive(Debug, Clone, PartialEq)]
pub struct Processed {
    pub image: ImageBuffer,
    /// Corrections made while resolving parameters.
    pub clamps: ClampReport,
}

/// Capability interface implemented by every effect.
pub trait EffectProvider: Send + Sync {
    /// Registry key.
    fn name(&self) -> &'static str;

    fn display_name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Declared parameters with ranges and defaults.
    fn parameter_specs(&self) -> &[ParamSpec];

    fn state(&self) -> &ProviderState;

    fn state_mut(&mut self) -> &mut ProviderState;

    /// The transform itself. `params` holds every declared parameter,
    /// already clamped.
    fn apply(&self, image: &ImageBuffer, params: &ParameterSet) -> Result<ImageBuffer, EffectError>;

    /// True when `params` leave the image unchanged.
    fn is_identity(&self, params: &ParameterSet) -> bool {
        let _ = params;
        false
    }

    /// Current parameter values.
    fn parameters(&self) -> ParameterSet {
        self.state().values.clone()
    }

    /// Store a parameter value, clamped into its range.
    ///
    /// Returns the correction made, if any.
    fn set_parameter(&mut self, name: &str, value: f32) -> Result<Option<ClampNote>, EngineError> {
        let spec = self
            .parameter_specs()
            .iter()
            .find(|spec| spec.name == name)
            .copied()
            .ok_or_else(|| EngineError::UnknownParameter {
                effect: self.name().to_string(),
                parameter: name.to_string(),
            })?;
        let (applied, note) = spec.clamp(value);
        self.state_mut().values.set(spec.name, applied);
        Ok(note)
    }

    /// Restore every parameter to its default.
    fn reset_parameters(&mut self) {
        let defaults = ParameterSet::defaults(self.parameter_specs());
        self.state_mut().values = defaults;
    }

    fn enable(&mut self) {
        self.state_mut().enabled = true;
    }

    fn disable(&mut self) {
        self.state_mut().enabled = false;
    }

    fn is_enabled(&self) -> bool {
        self.state().enabled
    }

    /// Merge `overrides` over the stored values and clamp the result.
    fn resolve_parameters(&self, overrides: &ParameterSet) -> (ParameterSet, ClampReport) {
        let mut merged = self.parameters();
        for (name, value) in overrides.iter() {
            merged.set(name, value);
        }
        merged.resolve(self.parameter_specs())
    }

    /// Resolve parameters and run the transform.
    fn process(&self, image: &ImageBuffer, overrides: &ParameterSet) -> Result<Processed, EffectError> {
        let (params, clamps) = self.resolve_parameters(overrides);
        let image = self.apply(image, &params)?;
        Ok(Processed { image, clamps })
    }
}

/// One of each built-in provider, presets first.
pub fn builtin_providers() -> Vec<Box<dyn EffectProvider>> {
    let mut providers: Vec<Box<dyn EffectProvider>> = crate::effects::EffectKind::ALL
        .into_iter()
        .map(|kind| Box::new(PresetEffect::new(kind)) as Box<dyn EffectProvider>)
        .collect();
    providers.push(Box::new(BasicAdjustment::new()));
    providers.push(Box::new(DensityAdjustment::new()));
    providers.push(Box::new(FilterProcessing::new()));
    providers.push(Box::new(ImageAnalysis::new()));
    providers
}

/// Error for a parameter value that is not finite after resolution.
pub(crate) fn require_finite(params: &ParameterSet) -> Result<(), EffectError> {
    match params.iter().find(|(_, v)| !v.is_finite()) {
        Some(_) => Err(EffectError::NonFinite("parameters")),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPECS: [ParamSpec; 1] = [ParamSpec::new("amount", 0.0, 2.0, 1.0)];

    /// Scales every channel by `amount`.
    struct Scale {
        state: ProviderState,
    }

    impl EffectProvider for Scale {
        fn name(&self) -> &'static str {
            "scale"
        }
        fn display_name(&self) -> &'static str {
            "Scale"
        }
        fn description(&self) -> &'static str {
            "Multiply every channel"
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
        fn apply(&self, image: &ImageBuffer, params: &ParameterSet) -> Result<ImageBuffer, EffectError> {
            let amount = params.get_or("amount", 1.0);
            Ok(crate::ops::scale_channels(image, [amount; 3]))
        }
    }

    fn scale() -> Scale {
        Scale {
            state: ProviderState::new(&SPECS),
        }
    }

    #[test]
    fn test_defaults_and_enable() {
        let mut p = scale();
        assert!(p.is_enabled());
        assert_eq!(p.parameters().get("amount"), Some(1.0));
        p.disable();
        assert!(!p.is_enabled());
        p.enable();
        assert!(p.is_enabled());
    }

    #[test]
    fn test_set_parameter_clamps() {
        let mut p = scale();
        let note = p.set_parameter("amount", 5.0).unwrap().unwrap();
        assert_eq!(note.applied, 2.0);
        assert_eq!(p.parameters().get("amount"), Some(2.0));
        assert_eq!(p.set_parameter("amount", 0.5).unwrap(), None);
    }

    #[test]
    fn test_set_unknown_parameter() {
        let mut p = scale();
        assert_eq!(
            p.set_parameter("gain", 1.0),
            Err(EngineError::UnknownParameter {
                effect: "scale".into(),
                parameter: "gain".into()
            })
        );
    }

    #[test]
    fn test_reset_parameters() {
        let mut p = scale();
        p.set_parameter("amount", 0.2).unwrap();
        p.reset_parameters();
        assert_eq!(p.parameters(), ParameterSet::defaults(&SPECS));
    }

    #[test]
    fn test_process_merges_overrides() {
        let mut p = scale();
        p.set_parameter("amount", 0.5).unwrap();
        let img = ImageBuffer::filled(1, 1, [100, 100, 100]);

        let out = p.process(&img, &ParameterSet::new()).unwrap();
        assert_eq!(out.image.data(), &[50, 50, 50]);

        let out = p.process(&img, &ParameterSet::new().with("amount", 9.0)).unwrap();
        assert_eq!(out.image.data(), &[200, 200, 200]);
        assert_eq!(out.clamps.len(), 1);
        // Overrides do not stick.
        assert_eq!(p.parameters().get("amount"), Some(0.5));
    }

    #[test]
    fn test_builtin_names_unique() {
        let providers = builtin_providers();
        let mut names: Vec<_> = providers.iter().map(|p| p.name()).collect();
        assert_eq!(names.len(), 12);
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 12);
    }

    #[test]
    fn test_require_finite() {
        assert!(require_finite(&ParameterSet::new().with("a", 1.0)).is_ok());
        assert_eq!(
            require_finite(&ParameterSet::new().with("a", f32::INFINITY)),
            Err(EffectError::NonFinite("parameters"))
        );
    }
}
