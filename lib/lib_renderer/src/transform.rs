use bytemuck::NoUninit;
use glam::{Vec2, vec2};

use crate::Viewport;

/// Per-object transform: one translation and one rotation, both in pixel
/// space. Setting either component replaces its previous value; they never
/// compose. Applied to every vertex at draw time through the object's
/// uniform, never baked into the stored vertex data.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform2d {
    translation: Vec2,
    rotation: Option<Rotation2d>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Rotation2d {
    center: Vec2,
    radians: f32,
}

impl Transform2d {
    pub(crate) fn set_translation(&mut self, offset: Vec2) {
        self.translation = offset;
    }

    pub(crate) fn set_rotation(&mut self, center: Vec2, radians: f32) {
        self.rotation = Some(Rotation2d { center, radians });
    }

    pub(crate) fn to_uniform(&self, viewport: Viewport) -> TransformUniform {
        let (rot_center, rot) = match self.rotation {
            Some(rotation) => (
                viewport.pixel_to_ndc(rotation.center),
                vec2(rotation.radians.cos(), rotation.radians.sin()),
            ),
            None => (Vec2::ZERO, vec2(1.0, 0.0)),
        };

        TransformUniform {
            translation: viewport.pixel_delta_to_ndc(self.translation),
            rot_center,
            rot,
            _pad: Vec2::ZERO,
        }
    }
}

/// GPU-side layout of the transform, rotation pre-split into (cos, sin).
/// Padded to 32 bytes to satisfy uniform buffer sizing.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, NoUninit)]
pub(crate) struct TransformUniform {
    translation: Vec2,
    rot_center: Vec2,
    rot: Vec2,
    _pad: Vec2,
}

impl TransformUniform {
    pub(crate) const IDENTITY: Self = Self {
        translation: Vec2::ZERO,
        rot_center: Vec2::ZERO,
        rot: vec2(1.0, 0.0),
        _pad: Vec2::ZERO,
    };
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec2;

    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0).unwrap()
    }

    #[test]
    fn uniform_is_32_bytes() {
        assert_eq!(size_of::<TransformUniform>(), 32);
    }

    #[test]
    fn default_transform_is_identity() {
        let uniform = Transform2d::default().to_uniform(viewport());
        assert_eq!(uniform, TransformUniform::IDENTITY);
    }

    #[test]
    fn translation_is_scaled_to_ndc() {
        let mut transform = Transform2d::default();
        transform.set_translation(vec2(50.0, 0.0));

        let uniform = transform.to_uniform(viewport());
        assert_relative_eq!(uniform.translation.x, 0.125);
        assert_relative_eq!(uniform.translation.y, 0.0);
    }

    #[test]
    fn rotation_center_is_converted_to_ndc() {
        let mut transform = Transform2d::default();
        transform.set_rotation(vec2(400.0, 300.0), std::f32::consts::FRAC_PI_2);

        let uniform = transform.to_uniform(viewport());
        assert_eq!(uniform.rot_center, vec2(0.0, 0.0));
        assert_relative_eq!(uniform.rot.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(uniform.rot.y, 1.0);
    }

    #[test]
    fn setting_replaces_instead_of_composing() {
        let mut transform = Transform2d::default();

        transform.set_translation(vec2(100.0, 0.0));
        transform.set_translation(vec2(0.0, 50.0));
        transform.set_rotation(vec2(0.0, 0.0), 1.0);
        transform.set_rotation(vec2(400.0, 300.0), 0.0);

        let uniform = transform.to_uniform(viewport());
        assert_eq!(uniform.translation, vec2(0.0, 50.0 / 300.0));
        // The second rotation fully replaced the first: angle 0 about center.
        assert_eq!(uniform.rot, vec2(1.0, 0.0));
        assert_eq!(uniform.rot_center, vec2(0.0, 0.0));
    }
}
