mod error;
mod registry;
mod render_object;
mod renderer;
mod slots;
mod square;
mod texture;
mod transform;
mod viewport;

pub use error::*;
pub use registry::*;
pub use render_object::*;
pub use renderer::*;
pub use slots::SquareSlot;
pub use square::{SQUARE_VERTICES, Square};
pub use texture::*;
pub use viewport::*;
