pub use wgpu::*;
