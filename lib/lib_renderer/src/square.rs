use glam::{Vec2, vec2};

use crate::{TextureSize, Viewport};

/// Vertices per square: two triangles, no index sharing.
pub const SQUARE_VERTICES: u32 = 6;

/// An axis-aligned square plus the texture region it samples, both in pixels.
///
/// `top_left` is the corner in window pixels (y grows down), `tex_origin` the
/// corner of the sampled region in texture pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Square {
    pub top_left: Vec2,
    pub width: f32,
    pub tex_origin: Vec2,
    pub tex_width: f32,
}

/// Corner layout shared by position and UV quads: upper-right triangle, then
/// lower-left, starting at the top-left corner.
fn square_corners(origin: Vec2, width: f32) -> [Vec2; 6] {
    [
        origin,
        origin + vec2(width, 0.0),
        origin + vec2(width, width),
        origin,
        origin + vec2(width, width),
        origin + vec2(0.0, width),
    ]
}

pub(crate) fn square_ndc(top_left: Vec2, width: f32, viewport: Viewport) -> [Vec2; 6] {
    square_corners(top_left, width).map(|corner| viewport.pixel_to_ndc(corner))
}

pub(crate) fn square_uv(origin: Vec2, width: f32, texture: TextureSize) -> [Vec2; 6] {
    square_corners(origin, width).map(|corner| texture.pixel_to_uv(corner))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec2;

    use super::*;

    #[test]
    fn corners_start_at_top_left() {
        let corners = square_corners(vec2(10.0, 20.0), 5.0);
        assert_eq!(corners[0], vec2(10.0, 20.0));
        assert_eq!(corners[3], vec2(10.0, 20.0));
    }

    #[test]
    fn corners_form_two_triangles_over_the_square() {
        let corners = square_corners(vec2(0.0, 0.0), 2.0);

        // Upper-right triangle, then lower-left, sharing the diagonal.
        assert_eq!(
            corners,
            [
                vec2(0.0, 0.0),
                vec2(2.0, 0.0),
                vec2(2.0, 2.0),
                vec2(0.0, 0.0),
                vec2(2.0, 2.0),
                vec2(0.0, 2.0),
            ]
        );
    }

    #[test]
    fn zero_width_collapses_to_the_corner() {
        let corners = square_corners(vec2(7.0, 7.0), 0.0);
        assert!(corners.iter().all(|corner| *corner == vec2(7.0, 7.0)));
    }

    #[test]
    fn ndc_square_matches_viewport_mapping() {
        let viewport = Viewport::new(800.0, 600.0).unwrap();
        let ndc = square_ndc(vec2(100.0, 100.0), 50.0, viewport);

        assert_relative_eq!(ndc[0].x, -0.75);
        assert_relative_eq!(ndc[0].y, -2.0 / 3.0);
        // Opposite corner of the diagonal: 50px further on both axes.
        assert_relative_eq!(ndc[2].x, -0.625);
        assert_relative_eq!(ndc[2].y, -0.5);
    }

    #[test]
    fn uv_square_spans_the_sampled_region() {
        let texture = TextureSize {
            width: 128,
            height: 64,
        };
        let uv = square_uv(vec2(32.0, 32.0), 32.0, texture);

        assert_eq!(uv[0], vec2(0.25, 0.5));
        assert_eq!(uv[2], vec2(0.5, 1.0));
    }
}
