//! Pass-through provider that records histogram statistics.

use std::sync::Mutex;

use serde::Serialize;
use tracing::debug;

use super::{EffectProvider, ProviderState};
use crate::buffer::ImageBuffer;
use crate::error::EffectError;
use crate::histogram::{compute_histogram, Histogram};
use crate::params::{ParamSpec, ParameterSet};

/// Summary of one analyzed image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageStats {
    pub width: u32,
    pub height: u32,
    pub histogram: Histogram,
    /// Mean level per channel, `[red, green, blue]`.
    pub means: [f32; 3],
    pub highlight_clipping: bool,
    pub shadow_clipping: bool,
}

impl ImageStats {
    pub fn compute(image: &ImageBuffer) -> Self {
        let histogram = compute_histogram(image);
        Self {
            width: image.width(),
            height: image.height(),
            means: histogram.channel_means(),
            highlight_clipping: histogram.has_highlight_clipping(),
            shadow_clipping: histogram.has_shadow_clipping(),
            histogram,
        }
    }
}

#[derive(Debug)]
pub struct ImageAnalysis {
    state: ProviderState,
    last: Mutex<Option<ImageStats>>,
}

impl ImageAnalysis {
    pub fn new() -> Self {
        Self {
            state: ProviderState::new(&[]),
            last: Mutex::new(None),
        }
    }

    /// Statistics of the most recently processed image.
    pub fn last_stats(&self) -> Option<ImageStats> {
        self.last.lock().ok().and_then(|slot| slot.clone())
    }
}

impl Default for ImageAnalysis {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectProvider for ImageAnalysis {
    fn name(&self) -> &'static str {
        "image_analysis"
    }

    fn display_name(&self) -> &'static str {
        "Image Analysis"
    }

    fn description(&self) -> &'static str {
        "Histogram and clipping statistics; the image passes through unchanged"
    }

    fn parameter_specs(&self) -> &[ParamSpec] {
        &[]
    }

    fn state(&self) -> &ProviderState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ProviderState {
        &mut self.state
    }

    fn is_identity(&self, _params: &ParameterSet) -> bool {
        true
    }

    fn apply(&self, image: &ImageBuffer, _params: &ParameterSet) -> Result<ImageBuffer, EffectError> {
        let stats = ImageStats::compute(image);
        debug!(
            width = stats.width,
            height = stats.height,
            highlight_clipping = stats.highlight_clipping,
            shadow_clipping = stats.shadow_clipping,
            "Analyzed image"
        );
        if let Ok(mut slot) = self.last.lock() {
            *slot = Some(stats);
        }
        Ok(image.to_rgb())
    }
}
