//! Wheel geometry: pointer offsets to colors and back to marker positions.

use crate::color::Hsv;
use kurbo::Vec2;
use serde::{Deserialize, Serialize};

/// Fixed dimensions of one configured wheel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelConfig {
    /// Radius of the gradient disc in pixels, white border included.
    pub radius: f64,
    /// Width of the white border between the gradient and its rim.
    pub padding: f64,
    /// Thickness of the outer swatch ring around the wheel.
    pub ring_thickness: f64,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            radius: 150.0,
            padding: 5.0,
            ring_thickness: 15.0,
        }
    }
}

impl WheelConfig {
    /// The usable interactive radius: configured radius minus the border.
    pub fn effective_radius(&self) -> f64 {
        (self.radius - self.padding).max(0.0)
    }

    /// Diameter of the gradient disc.
    pub fn diameter(&self) -> f64 {
        self.radius * 2.0
    }

    /// Radius of the outermost edge, swatch ring included.
    pub fn outer_radius(&self) -> f64 {
        self.radius + self.ring_thickness
    }
}

/// Maps between pointer positions and wheel colors.
///
/// Angle convention, used identically in both directions: hue is the
/// clockwise angle from 12 o'clock in screen coordinates (x right, y down),
/// so hue 0 (red) sits at the top and hue 90 at the right, matching a CSS
/// conic gradient. The renderer draws its gradient segments through
/// [`WheelGeometry::marker_position`], so the visual layout and the math
/// cannot diverge.
#[derive(Debug, Clone, Copy)]
pub struct WheelGeometry {
    config: WheelConfig,
}

impl WheelGeometry {
    /// Create a geometry for the given wheel dimensions.
    pub fn new(config: WheelConfig) -> Self {
        Self { config }
    }

    /// The wheel dimensions this geometry was built with.
    pub fn config(&self) -> &WheelConfig {
        &self.config
    }

    /// Map a pointer offset from the wheel center to a fully-bright HSV
    /// color plus the rim-clamped distance.
    ///
    /// Distances beyond the effective radius clamp to it, so saturation is
    /// exactly 1.0 at and past the rim.
    pub fn point_to_color(&self, offset: Vec2) -> (Hsv, f64) {
        let hue = offset.x.atan2(-offset.y).to_degrees().rem_euclid(360.0);
        let effective = self.config.effective_radius();
        let distance = offset.hypot().min(effective);
        let saturation = if effective > 0.0 { distance / effective } else { 0.0 };
        (Hsv::new(hue, saturation, 1.0), distance)
    }

    /// Map a color to its marker offset from the wheel center.
    ///
    /// Exact inverse of [`WheelGeometry::point_to_color`] for any point
    /// inside the wheel; only hue and saturation matter.
    pub fn marker_position(&self, hsv: &Hsv) -> Vec2 {
        let radians = hsv.h.to_radians();
        let distance = hsv.s.clamp(0.0, 1.0) * self.config.effective_radius();
        Vec2::new(distance * radians.sin(), -distance * radians.cos())
    }
}
