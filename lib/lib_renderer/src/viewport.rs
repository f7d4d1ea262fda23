use glam::{Vec2, vec2};

use crate::RenderError;

/// Viewport size in pixels, the basis for every pixel-to-NDC conversion.
///
/// Construction validates the dimensions, so a `Viewport` can always be
/// divided by. The mapping is viewport-centered: pixel `(width/2, height/2)`
/// lands on NDC `(0, 0)`, `(0, 0)` on `(-1, -1)` and `(width, height)` on
/// `(1, 1)`. No y-flip is applied; callers get whatever vertical convention
/// the surface uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Result<Self, RenderError> {
        if width <= 0.0 || height <= 0.0 || !width.is_finite() || !height.is_finite() {
            return Err(RenderError::InvalidViewport { width, height });
        }

        Ok(Self { width, height })
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn pixel_to_ndc(&self, pixel: Vec2) -> Vec2 {
        let half = vec2(self.width / 2.0, self.height / 2.0);

        (pixel - half) / half
    }

    /// Scales a pixel displacement into NDC units, without the center shift.
    pub fn pixel_delta_to_ndc(&self, delta: Vec2) -> Vec2 {
        delta / vec2(self.width / 2.0, self.height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec2;

    use super::*;

    #[test]
    fn rejects_degenerate_dimensions() {
        assert!(Viewport::new(0.0, 600.0).is_err());
        assert!(Viewport::new(800.0, 0.0).is_err());
        assert!(Viewport::new(-800.0, 600.0).is_err());
        assert!(Viewport::new(f32::NAN, 600.0).is_err());
        assert!(Viewport::new(800.0, f32::INFINITY).is_err());
    }

    #[test]
    fn center_maps_to_origin() {
        let viewport = Viewport::new(800.0, 600.0).unwrap();
        assert_eq!(viewport.pixel_to_ndc(vec2(400.0, 300.0)), vec2(0.0, 0.0));
    }

    #[test]
    fn top_left_maps_to_minus_one() {
        let viewport = Viewport::new(800.0, 600.0).unwrap();
        assert_eq!(viewport.pixel_to_ndc(vec2(0.0, 0.0)), vec2(-1.0, -1.0));
    }

    #[test]
    fn bottom_right_maps_to_one() {
        let viewport = Viewport::new(800.0, 600.0).unwrap();
        assert_eq!(viewport.pixel_to_ndc(vec2(800.0, 600.0)), vec2(1.0, 1.0));
    }

    #[test]
    fn maps_interior_pixel() {
        let viewport = Viewport::new(800.0, 600.0).unwrap();
        let ndc = viewport.pixel_to_ndc(vec2(100.0, 100.0));

        assert_relative_eq!(ndc.x, -0.75);
        assert_relative_eq!(ndc.y, -2.0 / 3.0);
    }

    #[test]
    fn delta_has_no_center_shift() {
        let viewport = Viewport::new(800.0, 600.0).unwrap();

        assert_eq!(viewport.pixel_delta_to_ndc(vec2(0.0, 0.0)), vec2(0.0, 0.0));
        assert_relative_eq!(viewport.pixel_delta_to_ndc(vec2(50.0, 0.0)).x, 0.125);
        assert_relative_eq!(viewport.pixel_delta_to_ndc(vec2(0.0, 300.0)).y, 1.0);
    }
}
