use std::collections::HashMap;
use std::path::Path;

use glam::Vec2;
use image::RgbaImage;
use lib_app::AppContext;
use lib_gpu::{
    AddressMode, BindGroupLayout, BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingType,
    BlendState,
    BufferBindingType, Color, ColorTargetState, ColorWrites, CommandEncoderDescriptor, Device,
    FilterMode, FragmentState, FrontFace, LoadOp, MultisampleState, Operations,
    PipelineCompilationOptions, PipelineLayout, PipelineLayoutDescriptor, PolygonMode,
    PrimitiveState, PrimitiveTopology, Queue, RenderPassColorAttachment, RenderPassDescriptor,
    RenderPipeline, RenderPipelineDescriptor, Sampler, SamplerBindingType, SamplerDescriptor,
    ShaderModule, ShaderModuleDescriptor, ShaderSource, ShaderStages, StoreOp, TextureFormat,
    TextureSampleType, TextureView, TextureViewDimension, VertexAttribute, VertexBufferLayout,
    VertexFormat, VertexState, VertexStepMode, include_wgsl,
};
use log::{debug, info};

use crate::{
    ObjectId, Registry, RenderError, RenderObject, Square, SquareSlot, Texture, Viewport,
};

/// The sprite renderer: owns the pipelines, the texture cache, the registry
/// of render objects, and the current viewport.
///
/// Everything runs on the thread that owns the GPU context; the renderer is
/// neither `Send` nor meant to be shared.
#[derive(Debug)]
pub struct Renderer {
    default_pipeline: RenderPipeline,
    custom_pipeline: Option<RenderPipeline>,
    pipeline_layout: PipelineLayout,
    bind_group_layout: BindGroupLayout,
    sampler: Sampler,
    textures: HashMap<String, Texture>,
    objects: Registry<RenderObject>,
    viewport: Viewport,
    clear_color: Color,
}

#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub device: &'a Device,
    pub queue: &'a Queue,
    pub surface_format: TextureFormat,
}

impl Renderer {
    pub fn new(viewport: Viewport, ctx: RenderContext<'_>) -> Self {
        let bind_group_layout = ctx
            .device
            .create_bind_group_layout(&BindGroupLayoutDescriptor {
                label: Some("sprite bind group layout"),
                entries: &[
                    BindGroupLayoutEntry {
                        binding: 0,
                        ty: BindingType::Buffer {
                            ty: BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                        visibility: ShaderStages::VERTEX,
                    },
                    BindGroupLayoutEntry {
                        binding: 1,
                        ty: BindingType::Texture {
                            sample_type: TextureSampleType::Float { filterable: false },
                            view_dimension: TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                        visibility: ShaderStages::VERTEX | ShaderStages::FRAGMENT,
                    },
                    BindGroupLayoutEntry {
                        binding: 2,
                        ty: BindingType::Sampler(SamplerBindingType::NonFiltering),
                        count: None,
                        visibility: ShaderStages::FRAGMENT,
                    },
                ],
            });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some("sprite pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

        let sampler = ctx.device.create_sampler(&SamplerDescriptor {
            label: Some("sprite sampler"),
            address_mode_u: AddressMode::ClampToEdge,
            address_mode_v: AddressMode::ClampToEdge,
            address_mode_w: AddressMode::ClampToEdge,
            anisotropy_clamp: 1,
            border_color: None,
            compare: None,
            lod_max_clamp: 1.0,
            lod_min_clamp: 1.0,
            mag_filter: FilterMode::Nearest,
            min_filter: FilterMode::Nearest,
            mipmap_filter: FilterMode::Nearest,
        });

        let shader = ctx
            .device
            .create_shader_module(include_wgsl!("shader.wgsl"));

        let default_pipeline =
            build_pipeline(&pipeline_layout, &shader, ctx.surface_format, ctx.device);

        info!("sprite renderer initialized");

        Self {
            default_pipeline,
            custom_pipeline: None,
            pipeline_layout,
            bind_group_layout,
            sampler,
            textures: HashMap::new(),
            objects: Registry::new(),
            viewport,
            clear_color: Color::BLACK,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Replaces the viewport used by subsequent coordinate conversions.
    /// Squares already written keep the coordinates they were converted with.
    pub fn set_viewport(&mut self, width: f32, height: f32) -> Result<(), RenderError> {
        self.viewport = Viewport::new(width, height)?;

        Ok(())
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    pub fn load_texture(&mut self, name: &str, image: &RgbaImage, ctx: RenderContext<'_>) {
        debug!("loading texture {name:?}");
        self.textures
            .insert(name.to_owned(), Texture::from_image(image, ctx));
    }

    pub fn load_texture_file(
        &mut self,
        name: &str,
        path: impl AsRef<Path>,
        ctx: RenderContext<'_>,
    ) -> Result<(), RenderError> {
        debug!("loading texture {name:?} from {}", path.as_ref().display());
        self.textures
            .insert(name.to_owned(), Texture::from_path(path, ctx)?);

        Ok(())
    }

    /// Compiles the alternate pipeline selected by creating objects with
    /// `use_default_shader == false`. The module must expose one vertex and
    /// one fragment entry point over the same bind group and vertex layout
    /// as the default shader.
    pub fn set_custom_shader(&mut self, source: &str, ctx: RenderContext<'_>) {
        let shader = ctx.device.create_shader_module(ShaderModuleDescriptor {
            label: Some("sprite custom shader"),
            source: ShaderSource::Wgsl(source.into()),
        });

        self.custom_pipeline = Some(build_pipeline(
            &self.pipeline_layout,
            &shader,
            ctx.surface_format,
            ctx.device,
        ));
    }

    /// Creates a render object with room for `capacity` vertices, bound to
    /// the named texture, and registers it for drawing.
    pub fn create_object(
        &mut self,
        capacity: u32,
        texture: &str,
        use_default_shader: bool,
        ctx: RenderContext<'_>,
    ) -> Result<ObjectId, RenderError> {
        let pipeline = if use_default_shader {
            self.default_pipeline.clone()
        } else {
            self.custom_pipeline
                .clone()
                .ok_or(RenderError::CustomShaderMissing)?
        };

        let texture = self
            .textures
            .get(texture)
            .ok_or_else(|| RenderError::TextureNotFound {
                name: texture.to_owned(),
            })?;

        let object = RenderObject::new(
            capacity,
            texture,
            pipeline,
            &self.bind_group_layout,
            &self.sampler,
            ctx,
        );

        debug!("created render object with capacity {capacity}");

        Ok(self.objects.register(object))
    }

    pub fn object(&self, id: ObjectId) -> Result<&RenderObject, RenderError> {
        self.objects.get(id).ok_or(RenderError::UnknownObject)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Result<&mut RenderObject, RenderError> {
        self.objects.get_mut(id).ok_or(RenderError::UnknownObject)
    }

    pub fn add_square(
        &mut self,
        id: ObjectId,
        square: Square,
        ctx: RenderContext<'_>,
    ) -> Result<SquareSlot, RenderError> {
        let viewport = self.viewport;
        self.object_mut(id)?.add_square(square, viewport, ctx)
    }

    pub fn modify_vert_square(
        &mut self,
        id: ObjectId,
        slot: SquareSlot,
        top_left: Vec2,
        width: f32,
        ctx: RenderContext<'_>,
    ) -> Result<(), RenderError> {
        let viewport = self.viewport;
        self.object_mut(id)?
            .modify_vert_square(slot, top_left, width, viewport, ctx)
    }

    pub fn modify_tex_square(
        &mut self,
        id: ObjectId,
        slot: SquareSlot,
        tex_origin: Vec2,
        tex_width: f32,
        ctx: RenderContext<'_>,
    ) -> Result<(), RenderError> {
        self.object_mut(id)?
            .modify_tex_square(slot, tex_origin, tex_width, ctx)
    }

    pub fn modify_square(
        &mut self,
        id: ObjectId,
        slot: SquareSlot,
        square: Square,
        ctx: RenderContext<'_>,
    ) -> Result<(), RenderError> {
        let viewport = self.viewport;
        self.object_mut(id)?
            .modify_square(slot, square, viewport, ctx)
    }

    pub fn clear_square(
        &mut self,
        id: ObjectId,
        slot: SquareSlot,
        ctx: RenderContext<'_>,
    ) -> Result<(), RenderError> {
        let viewport = self.viewport;
        self.object_mut(id)?.clear_square(slot, viewport, ctx)
    }

    pub fn set_translation(
        &mut self,
        id: ObjectId,
        offset: Vec2,
        ctx: RenderContext<'_>,
    ) -> Result<(), RenderError> {
        let viewport = self.viewport;
        self.object_mut(id)?.set_translation(offset, viewport, ctx);

        Ok(())
    }

    pub fn set_rotation(
        &mut self,
        id: ObjectId,
        center: Vec2,
        radians: f32,
        ctx: RenderContext<'_>,
    ) -> Result<(), RenderError> {
        let viewport = self.viewport;
        self.object_mut(id)?
            .set_rotation(center, radians, viewport, ctx);

        Ok(())
    }

    /// Renders one frame: clears to the background color, then draws every
    /// registered object in registration order.
    pub fn render_frame(&self, output: &TextureView, ctx: RenderContext<'_>) {
        let mut encoder = ctx
            .device
            .create_command_encoder(&CommandEncoderDescriptor::default());

        let mut pass = encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("sprite render pass"),
            timestamp_writes: None,
            occlusion_query_set: None,
            depth_stencil_attachment: None,
            color_attachments: &[Some(RenderPassColorAttachment {
                view: output,
                depth_slice: None,
                ops: Operations {
                    load: LoadOp::Clear(self.clear_color),
                    store: StoreOp::Store,
                },
                resolve_target: None,
            })],
        });

        for (_, object) in self.objects.iter() {
            object.draw(&mut pass);
        }

        drop(pass);

        ctx.queue.submit([encoder.finish()]);
    }

    /// Releases every object's GPU buffers. Shutdown only; the registry is
    /// not cleared and the objects must not be used afterward.
    pub fn teardown(&mut self) {
        debug!("tearing down {} render objects", self.objects.len());

        for (_, object) in self.objects.iter() {
            object.destroy();
        }
    }
}

impl<'a> From<AppContext<'a>> for RenderContext<'a> {
    fn from(value: AppContext<'a>) -> Self {
        Self {
            device: value.device,
            queue: value.queue,
            surface_format: value.surface_format,
        }
    }
}

fn build_pipeline(
    layout: &PipelineLayout,
    shader: &ShaderModule,
    surface_format: TextureFormat,
    device: &Device,
) -> RenderPipeline {
    device.create_render_pipeline(&RenderPipelineDescriptor {
        label: Some("sprite pipeline"),
        cache: None,
        depth_stencil: None,
        layout: Some(layout),
        multiview: None,
        primitive: PrimitiveState {
            front_face: FrontFace::Ccw,
            conservative: false,
            cull_mode: None,
            polygon_mode: PolygonMode::Fill,
            strip_index_format: None,
            topology: PrimitiveTopology::TriangleList,
            unclipped_depth: false,
        },
        vertex: VertexState {
            module: shader,
            entry_point: None,
            compilation_options: PipelineCompilationOptions::default(),
            buffers: &[POSITION_BUFFER_LAYOUT, UV_BUFFER_LAYOUT],
        },
        fragment: Some(FragmentState {
            module: shader,
            targets: &[Some(ColorTargetState {
                blend: Some(BlendState::ALPHA_BLENDING),
                format: surface_format,
                write_mask: ColorWrites::all(),
            })],
            entry_point: None,
            compilation_options: PipelineCompilationOptions::default(),
        }),
        multisample: MultisampleState::default(),
    })
}

const POSITION_BUFFER_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: size_of::<Vec2>() as u64,
    step_mode: VertexStepMode::Vertex,
    attributes: &[VertexAttribute {
        format: VertexFormat::Float32x2,
        offset: 0,
        shader_location: 0,
    }],
};

const UV_BUFFER_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: size_of::<Vec2>() as u64,
    step_mode: VertexStepMode::Vertex,
    attributes: &[VertexAttribute {
        format: VertexFormat::Float32x2,
        offset: 0,
        shader_location: 1,
    }],
};
