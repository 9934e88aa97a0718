use crate::colors::{rgb_to_perceptual, rgb_tuple_to_unit, unit_rgb_to_hex, RGBTuple};
use glam::DVec3;
use std::fmt;

/// One weighted color observation from a texture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorSample {
    weight: f64,
    rgb: DVec3,
    perceptual: DVec3,
}

impl ColorSample {
    /// `rgb` is gamma-encoded sRGB in [0, 1].
    pub fn new(weight: f64, rgb: DVec3) -> Self {
        Self {
            weight,
            rgb,
            perceptual: rgb_to_perceptual(rgb),
        }
    }

    /// Builds a sample from a texture pixel color: the weight is the pixel
    /// count scaled by the texture line's weight multiplier.
    pub fn from_pixels(pixel_count: u32, rgb: RGBTuple, weight: f64) -> Self {
        Self::new(pixel_count as f64 * weight, rgb_tuple_to_unit(rgb))
    }

    /// Applies a tint by channel-wise multiplication, keeping the weight.
    pub fn modified(&self, tint: DVec3) -> Self {
        Self::new(self.weight, self.rgb() * tint)
    }

    /// Same color, weight multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            weight: self.weight * factor,
            ..*self
        }
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn rgb(&self) -> DVec3 {
        self.rgb
    }

    pub fn perceptual(&self) -> DVec3 {
        self.perceptual
    }
}

impl fmt::Display for ColorSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}x{}}}", self.weight(), unit_rgb_to_hex(self.rgb()))
    }
}
