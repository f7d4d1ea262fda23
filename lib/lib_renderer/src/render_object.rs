use bytemuck::{bytes_of, cast_slice};
use glam::Vec2;
use lib_gpu::{
    BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayout, BindingResource, Buffer,
    BufferDescriptor, BufferUsages, RenderPass, RenderPipeline, Sampler,
};
use log::debug;

use crate::{
    RenderContext, RenderError, Square, SquareSlot, Texture, TextureSize, Viewport,
    slots::SlotAllocator,
    square::{square_ndc, square_uv},
    transform::{Transform2d, TransformUniform},
};

/// A fixed-capacity buffer of squares sharing one texture, one shader, and
/// one transform.
///
/// Positions and UVs live in separate vertex buffers so either side of a
/// square can be rewritten in place without touching the other. Vertex slots
/// are handed out by a bump allocator and never reclaimed; a cleared square
/// keeps its slots and just collapses to zero area.
#[derive(Debug)]
pub struct RenderObject {
    positions: Buffer,
    uvs: Buffer,
    transform_buf: Buffer,
    bind_group: BindGroup,
    pipeline: RenderPipeline,
    texture_size: TextureSize,
    transform: Transform2d,
    slots: SlotAllocator,
}

impl RenderObject {
    pub(crate) fn new(
        capacity: u32,
        texture: &Texture,
        pipeline: RenderPipeline,
        layout: &BindGroupLayout,
        sampler: &Sampler,
        ctx: RenderContext<'_>,
    ) -> Self {
        let positions = ctx.device.create_buffer(&BufferDescriptor {
            label: Some("render object positions"),
            size: capacity as u64 * size_of::<Vec2>() as u64,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uvs = ctx.device.create_buffer(&BufferDescriptor {
            label: Some("render object uvs"),
            size: capacity as u64 * size_of::<Vec2>() as u64,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let transform_buf = ctx.device.create_buffer(&BufferDescriptor {
            label: Some("render object transform"),
            size: size_of::<TransformUniform>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        ctx.queue
            .write_buffer(&transform_buf, 0, bytes_of(&TransformUniform::IDENTITY));

        let bind_group = ctx.device.create_bind_group(&BindGroupDescriptor {
            label: Some("render object bind group"),
            layout,
            entries: &[
                BindGroupEntry {
                    binding: 0,
                    resource: transform_buf.as_entire_binding(),
                },
                BindGroupEntry {
                    binding: 1,
                    resource: BindingResource::TextureView(texture.view()),
                },
                BindGroupEntry {
                    binding: 2,
                    resource: BindingResource::Sampler(sampler),
                },
            ],
        });

        Self {
            positions,
            uvs,
            transform_buf,
            bind_group,
            pipeline,
            texture_size: texture.size(),
            transform: Transform2d::default(),
            slots: SlotAllocator::new(capacity),
        }
    }

    /// Writes a new square and its texture region into the next free slots.
    ///
    /// Capacity is only checked here, at write time. The returned slot
    /// targets this square for later in-place updates.
    pub fn add_square(
        &mut self,
        square: Square,
        viewport: Viewport,
        ctx: RenderContext<'_>,
    ) -> Result<SquareSlot, RenderError> {
        let slot = self.slots.alloc_square()?;

        self.write_positions(slot, square.top_left, square.width, viewport, ctx);
        self.write_uvs(slot, square.tex_origin, square.tex_width, ctx);

        Ok(slot)
    }

    /// Recomputes the six position vertices of `slot` in place; UVs are left
    /// untouched.
    pub fn modify_vert_square(
        &mut self,
        slot: SquareSlot,
        top_left: Vec2,
        width: f32,
        viewport: Viewport,
        ctx: RenderContext<'_>,
    ) -> Result<(), RenderError> {
        self.slots.check(slot)?;
        self.write_positions(slot, top_left, width, viewport, ctx);

        Ok(())
    }

    /// Recomputes the six UV vertices of `slot` in place; positions are left
    /// untouched.
    pub fn modify_tex_square(
        &mut self,
        slot: SquareSlot,
        tex_origin: Vec2,
        tex_width: f32,
        ctx: RenderContext<'_>,
    ) -> Result<(), RenderError> {
        self.slots.check(slot)?;
        self.write_uvs(slot, tex_origin, tex_width, ctx);

        Ok(())
    }

    pub fn modify_square(
        &mut self,
        slot: SquareSlot,
        square: Square,
        viewport: Viewport,
        ctx: RenderContext<'_>,
    ) -> Result<(), RenderError> {
        self.modify_vert_square(slot, square.top_left, square.width, viewport, ctx)?;
        self.modify_tex_square(slot, square.tex_origin, square.tex_width, ctx)?;

        Ok(())
    }

    /// Collapses the square to zero area at the origin, making it invisible.
    /// Its slots stay allocated and can be rewritten later.
    pub fn clear_square(
        &mut self,
        slot: SquareSlot,
        viewport: Viewport,
        ctx: RenderContext<'_>,
    ) -> Result<(), RenderError> {
        self.modify_vert_square(slot, Vec2::ZERO, 0.0, viewport, ctx)
    }

    /// Replaces the object's translation, in pixels.
    pub fn set_translation(&mut self, offset: Vec2, viewport: Viewport, ctx: RenderContext<'_>) {
        self.transform.set_translation(offset);
        self.upload_transform(viewport, ctx);
    }

    /// Replaces the object's rotation: `radians` about the pixel-space
    /// `center`.
    pub fn set_rotation(
        &mut self,
        center: Vec2,
        radians: f32,
        viewport: Viewport,
        ctx: RenderContext<'_>,
    ) {
        self.transform.set_rotation(center, radians);
        self.upload_transform(viewport, ctx);
    }

    /// Vertices written so far; the tail up to capacity is never drawn.
    pub fn vertex_count(&self) -> u32 {
        self.slots.written()
    }

    /// Issues this object's single draw call, covering `0..vertex_count()`.
    pub(crate) fn draw(&self, pass: &mut RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.positions.slice(..));
        pass.set_vertex_buffer(1, self.uvs.slice(..));

        pass.draw(0..self.slots.written(), 0..1);
    }

    /// Releases the GPU buffers. The object must not be used afterward.
    pub fn destroy(&self) {
        debug!(
            "destroying render object ({} of {} vertices written)",
            self.slots.written(),
            self.slots.capacity(),
        );

        self.positions.destroy();
        self.uvs.destroy();
        self.transform_buf.destroy();
    }

    fn upload_transform(&self, viewport: Viewport, ctx: RenderContext<'_>) {
        ctx.queue.write_buffer(
            &self.transform_buf,
            0,
            bytes_of(&self.transform.to_uniform(viewport)),
        );
    }

    fn write_positions(
        &self,
        slot: SquareSlot,
        top_left: Vec2,
        width: f32,
        viewport: Viewport,
        ctx: RenderContext<'_>,
    ) {
        let ndc = square_ndc(top_left, width, viewport);

        ctx.queue.write_buffer(
            &self.positions,
            slot.first_vertex() as u64 * size_of::<Vec2>() as u64,
            cast_slice(&ndc),
        );
    }

    fn write_uvs(&self, slot: SquareSlot, tex_origin: Vec2, tex_width: f32, ctx: RenderContext<'_>) {
        let uv = square_uv(tex_origin, tex_width, self.texture_size);

        ctx.queue.write_buffer(
            &self.uvs,
            slot.first_vertex() as u64 * size_of::<Vec2>() as u64,
            cast_slice(&uv),
        );
    }
}
