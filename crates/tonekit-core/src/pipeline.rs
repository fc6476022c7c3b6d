//! Name-keyed effect registry with guarded dispatch.
//!
//! The pipeline only talks to providers through [`EffectProvider`]. A
//! provider that fails, whether by returning an [`EffectError`] or by
//! panicking, never takes the caller down: the outcome carries a copy of
//! the original image and the diagnostic.

use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;
use tracing::{debug, warn};

use crate::buffer::ImageBuffer;
use crate::error::{EffectError, EngineError};
use crate::job::panic_message;
use crate::params::{ClampReport, ParameterSet};
use crate::plugin::{builtin_providers, EffectProvider};

/// How a dispatch ended.
#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeStatus {
    /// The provider ran and its output is in the outcome.
    Applied,
    /// The provider is disabled; the image passed through.
    Skipped,
    /// The provider failed; the outcome holds the original image.
    Fallback(EffectError),
}

impl OutcomeStatus {
    pub fn is_applied(&self) -> bool {
        matches!(self, OutcomeStatus::Applied)
    }
}

/// Result of one pipeline dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectOutcome {
    pub image: ImageBuffer,
    pub status: OutcomeStatus,
    /// Parameter corrections made before running.
    pub clamps: ClampReport,
}

/// Registered provider summary for hosts building a menu.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderInfo {
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub enabled: bool,
}

/// Ordered registry of providers keyed by name.
#[derive(Default)]
pub struct EffectPipeline {
    providers: Vec<Box<dyn EffectProvider>>,
}

impl std::fmt::Debug for EffectPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectPipeline").field("providers", &self.names()).finish()
    }
}

impl EffectPipeline {
    /// An empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// A pipeline holding every built-in provider.
    pub fn with_builtin() -> Self {
        let mut pipeline = Self::new();
        for provider in builtin_providers() {
            pipeline.register(provider);
        }
        pipeline
    }

    /// Add a provider, replacing any with the same name.
    ///
    /// Returns the replaced provider.
    pub fn register(&mut self, provider: Box<dyn EffectProvider>) -> Option<Box<dyn EffectProvider>> {
        let name = provider.name();
        debug!(provider = name, "Registering effect provider");
        match self.providers.iter().position(|p| p.name() == name) {
            Some(index) => Some(std::mem::replace(&mut self.providers[index], provider)),
            None => {
                self.providers.push(provider);
                None
            }
        }
    }

    pub fn provider(&self, name: &str) -> Option<&dyn EffectProvider> {
        self.providers.iter().find(|p| p.name() == name).map(|p| p.as_ref())
    }

    pub fn provider_mut(&mut self, name: &str) -> Option<&mut (dyn EffectProvider + 'static)> {
        self.providers.iter_mut().find(|p| p.name() == name).map(|p| p.as_mut())
    }

    /// Registered names in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn infos(&self) -> Vec<ProviderInfo> {
        self.providers
            .iter()
            .map(|p| ProviderInfo {
                name: p.name(),
                display_name: p.display_name(),
                description: p.description(),
                enabled: p.is_enabled(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Run the named provider on `image`.
    ///
    /// `params` override the provider's stored values for this call only.
    /// Unknown names are the only error; provider failures become
    /// [`OutcomeStatus::Fallback`].
    pub fn process(
        &self,
        name: &str,
        image: &ImageBuffer,
        params: &ParameterSet,
    ) -> Result<EffectOutcome, EngineError> {
        let provider = self
            .provider(name)
            .ok_or_else(|| EngineError::UnknownEffect(name.to_string()))?;

        if !provider.is_enabled() {
            debug!(provider = name, "Provider disabled, passing image through");
            return Ok(EffectOutcome {
                image: image.to_rgb(),
                status: OutcomeStatus::Skipped,
                clamps: ClampReport::new(),
            });
        }

        let (resolved, clamps) = provider.resolve_parameters(params);
        let result = panic::catch_unwind(AssertUnwindSafe(|| provider.apply(image, &resolved)));
        let failure = match result {
            Ok(Ok(out)) => {
                return Ok(EffectOutcome {
                    image: out,
                    status: OutcomeStatus::Applied,
                    clamps,
                })
            }
            Ok(Err(err)) => err,
            Err(payload) => EffectError::Panicked(panic_message(payload.as_ref())),
        };

        warn!(provider = name, error = %failure, "Effect failed, returning original image");
        Ok(EffectOutcome {
            image: image.to_rgb(),
            status: OutcomeStatus::Fallback(failure),
            clamps,
        })
    }

    /// Run a slider-driven effect with brightness, contrast and saturation.
    pub fn apply(
        &self,
        image: &ImageBuffer,
        name: &str,
        brightness: f32,
        contrast: f32,
        saturation: f32,
    ) -> Result<EffectOutcome, EngineError> {
        let params = ParameterSet::new()
            .with("brightness", brightness)
            .with("contrast", contrast)
            .with("saturation", saturation);
        self.process(name, image, &params)
    }
}
