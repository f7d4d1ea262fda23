use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong inside the sprite renderer.
///
/// GPU and window initialization failures are not represented here; those are
/// fatal and abort in the app runner before any of this code runs.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("viewport dimensions must be positive and finite, got {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    #[error("render object buffer is full ({capacity} vertices)")]
    BufferFull { capacity: u32 },

    #[error("square at vertex {first_vertex} is outside the allocated range (0..{allocated})")]
    SlotOutOfRange { first_vertex: u32, allocated: u32 },

    #[error("no texture loaded under the name {name:?}")]
    TextureNotFound { name: String },

    #[error("failed to load texture from {path}")]
    TextureLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("render object requested the custom shader, but none is configured")]
    CustomShaderMissing,

    #[error("render object id is not registered")]
    UnknownObject,
}
