use crate::error::{Error, Result};
use crate::types::{MAX_PIXELS, MAX_SPAN, MIN_SPAN, Viewport};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::time::Duration;
///tunables of a view, everything has a sensible default
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    ///function shown before the user submits one
    pub expression: String,
    ///initial span of the source plane
    pub source_span: f64,
    ///initial span of the destination plane
    pub destination_span: f64,
    ///span multiplier of one zoom step
    pub zoom_factor: f64,
    ///squared magnitude above which values are pulled back, see Guard
    pub max_norm_sqr: f64,
    ///step of the forward difference when no analytic derivative exists
    pub derivative_step: f64,
    ///on screen distance between gridlines in pixels
    pub grid_pitch: f64,
    ///samples per grid cell along each line
    pub grid_steps: usize,
    ///how long scale and viewport changes settle before the grid is resampled
    pub debounce: Duration,
    ///source canvas size until the first resize
    pub viewport: Viewport,
    pub preset_radius: f64,
    ///concentric rings of the disk, samples along each ray of the pacman
    pub preset_rings: usize,
    ///samples around a full circle
    pub preset_segments: usize,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            expression: "e^z".to_string(),
            source_span: 5.0,
            destination_span: 50.0,
            zoom_factor: 1.3,
            max_norm_sqr: 1e6,
            derivative_step: 0.1,
            grid_pitch: 50.0,
            grid_steps: 10,
            debounce: Duration::from_millis(100),
            viewport: Viewport::new(600.0, 600.0),
            preset_radius: 1.0,
            preset_rings: 8,
            preset_segments: 96,
        }
    }
}
impl Config {
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("source_span", self.source_span),
            ("destination_span", self.destination_span),
            ("zoom_factor", self.zoom_factor),
            ("max_norm_sqr", self.max_norm_sqr),
            ("derivative_step", self.derivative_step),
            ("grid_pitch", self.grid_pitch),
            ("preset_radius", self.preset_radius),
        ];
        if let Some((name, value)) = positive
            .into_iter()
            .find(|(_, v)| !v.is_finite() || *v <= 0.0)
        {
            return Err(Error::Config(format!(
                "{name} must be positive and finite, got {value}"
            )));
        }
        if !self.viewport.is_valid() {
            return Err(Error::Config(format!(
                "viewport sides must be in (0, {MAX_PIXELS}], got {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }
        let span = MIN_SPAN..=MAX_SPAN;
        if !span.contains(&self.source_span) || !span.contains(&self.destination_span) {
            return Err(Error::Config(format!(
                "spans must be in [{MIN_SPAN}, {MAX_SPAN}]"
            )));
        }
        if self.grid_pitch < 1.0 {
            return Err(Error::Config(format!(
                "grid_pitch must be at least one pixel, got {}",
                self.grid_pitch
            )));
        }
        if self.grid_steps == 0 || self.preset_rings == 0 || self.preset_segments < 3 {
            return Err(Error::Config(
                "grid_steps and preset_rings must be nonzero, preset_segments at least 3"
                    .to_string(),
            ));
        }
        Ok(())
    }
}
