use std::time::Duration;

use anyhow::Context;
use glam::{Vec2, vec2};
use image::{Rgba, RgbaImage};
use lib_app::{AppContext, AppEvent, AppFlow, AppHandler};
use lib_gpu::TextureView;
use lib_renderer::{
    ObjectId, RenderContext, RenderError, Renderer, Square, SquareSlot, Viewport,
};
use log::{debug, error, info};

const CHECKER_CELL: u32 = 32;
const BEACON_PERIOD: f32 = 1.5;

/// Tints the checker texture; used by the cursor object to show the
/// non-default shader path. Same bind group and vertex layout as the
/// built-in shader.
const CURSOR_SHADER: &str = r#"
struct Transform {
    translation: vec2<f32>,
    rot_center: vec2<f32>,
    rot: vec2<f32>,
    _pad: vec2<f32>,
}

@group(0) @binding(0) var<uniform> transform: Transform;
@group(0) @binding(1) var sprite_texture: texture_2d<f32>;
@group(0) @binding(2) var sprite_sampler: sampler;

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

@vertex
fn vs_main(@location(0) position: vec2<f32>, @location(1) uv: vec2<f32>) -> VertexOutput {
    let local = position - transform.rot_center;
    let rotated = vec2<f32>(
        local.x * transform.rot.x - local.y * transform.rot.y,
        local.x * transform.rot.y + local.y * transform.rot.x,
    );

    var out: VertexOutput;
    out.position = vec4<f32>(rotated + transform.rot_center + transform.translation, 0.0, 1.0);
    out.uv = uv;

    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(sprite_texture, sprite_sampler, in.uv) * vec4<f32>(1.0, 0.6, 0.3, 1.0);
}
"#;

pub struct SpriteDemo {
    renderer: Renderer,
    backdrop: ObjectId,
    cursor: ObjectId,
    cursor_slot: SquareSlot,
    beacon_slot: SquareSlot,
    beacon_visible: bool,
    elapsed: f32,
}

impl AppHandler for SpriteDemo {
    const TITLE: &str = "quadrille";

    fn new(ctx: AppContext<'_>) -> Self {
        build_scene(ctx).expect("Failed to build demo scene")
    }

    fn update(&mut self, delta_time: Duration, ctx: AppContext<'_>) -> AppFlow {
        if let Err(err) = self.animate(delta_time.as_secs_f32(), ctx.into()) {
            error!("animation failed: {err}");
            return AppFlow::Exit;
        }

        AppFlow::Continue
    }

    fn event(&mut self, event: AppEvent<'_>, _ctx: AppContext<'_>) -> AppFlow {
        match event {
            AppEvent::CloseRequested => {
                self.renderer.teardown();
                return AppFlow::Exit;
            }
            AppEvent::Resized { width, height } => {
                // A minimized window reports 0x0; keep the old viewport.
                if let Err(err) = self.renderer.set_viewport(width as f32, height as f32) {
                    debug!("ignoring resize: {err}");
                }
            }
            _ => {}
        }

        AppFlow::Continue
    }

    fn draw(&mut self, output: &TextureView, ctx: AppContext<'_>) {
        self.renderer.render_frame(output, ctx.into());
    }
}

impl SpriteDemo {
    fn animate(&mut self, delta_time: f32, ctx: RenderContext<'_>) -> Result<(), RenderError> {
        let previous = self.elapsed;
        self.elapsed += delta_time;

        let viewport = self.renderer.viewport();
        let center = vec2(viewport.width() / 2.0, viewport.height() / 2.0);

        // The backdrop sways and slowly spins about the viewport center;
        // each call replaces the previous transform outright.
        self.renderer.set_translation(
            self.backdrop,
            vec2(0.0, (self.elapsed * 0.8).sin() * 30.0),
            ctx,
        )?;
        self.renderer
            .set_rotation(self.backdrop, center, self.elapsed * 0.2, ctx)?;

        // The cursor square is rewritten in place along a lissajous path.
        let cursor_pos = center
            + vec2(
                (self.elapsed * 1.3).cos() * viewport.width() * 0.3,
                (self.elapsed * 0.9).sin() * viewport.height() * 0.3,
            );
        self.renderer
            .modify_vert_square(self.cursor, self.cursor_slot, cursor_pos, 48.0, ctx)?;

        // Once a second the cursor samples the other checker cell.
        let cell = if (self.elapsed as u32) % 2 == 0 { 0.0 } else { CHECKER_CELL as f32 };
        self.renderer.modify_tex_square(
            self.cursor,
            self.cursor_slot,
            vec2(cell, 0.0),
            CHECKER_CELL as f32,
            ctx,
        )?;

        // The beacon blinks: cleared to zero area, then fully rewritten.
        if crossed_period(previous, self.elapsed, BEACON_PERIOD) {
            if self.beacon_visible {
                self.renderer.clear_square(self.backdrop, self.beacon_slot, ctx)?;
            } else {
                self.renderer
                    .modify_square(self.backdrop, self.beacon_slot, beacon_square(), ctx)?;
            }
            self.beacon_visible = !self.beacon_visible;
        }

        Ok(())
    }
}

fn build_scene(ctx: AppContext<'_>) -> anyhow::Result<SpriteDemo> {
    let size = ctx.window.inner_size();
    let viewport = Viewport::new(size.width as f32, size.height as f32)
        .context("window has no drawable area")?;

    let mut renderer = Renderer::new(viewport, ctx.into());
    renderer.load_texture("checker", &checker_image(), ctx.into());
    renderer.set_custom_shader(CURSOR_SHADER, ctx.into());

    // 16 static squares plus the blinking beacon.
    let backdrop = renderer.create_object(6 * 17, "checker", true, ctx.into())?;

    for i in 0..16 {
        renderer.add_square(
            backdrop,
            Square {
                top_left: vec2(40.0 + i as f32 * 45.0, 40.0),
                width: 40.0,
                tex_origin: Vec2::ZERO,
                tex_width: CHECKER_CELL as f32,
            },
            ctx.into(),
        )?;
    }

    let beacon_slot = renderer.add_square(backdrop, beacon_square(), ctx.into())?;

    let cursor = renderer.create_object(6, "checker", false, ctx.into())?;
    let cursor_slot = renderer.add_square(
        cursor,
        Square {
            top_left: vec2(size.width as f32 / 2.0, size.height as f32 / 2.0),
            width: 48.0,
            tex_origin: Vec2::ZERO,
            tex_width: CHECKER_CELL as f32,
        },
        ctx.into(),
    )?;

    info!(
        "demo scene ready: backdrop has {} vertices written",
        renderer.object(backdrop)?.vertex_count(),
    );

    Ok(SpriteDemo {
        renderer,
        backdrop,
        cursor,
        cursor_slot,
        beacon_slot,
        beacon_visible: true,
        elapsed: 0.0,
    })
}

fn beacon_square() -> Square {
    Square {
        top_left: vec2(40.0, 120.0),
        width: 60.0,
        tex_origin: Vec2::ZERO,
        tex_width: CHECKER_CELL as f32 * 2.0,
    }
}

fn crossed_period(previous: f32, now: f32, period: f32) -> bool {
    (previous / period) as u32 != (now / period) as u32
}

fn checker_image() -> RgbaImage {
    RgbaImage::from_fn(CHECKER_CELL * 2, CHECKER_CELL * 2, |x, y| {
        if ((x / CHECKER_CELL) + (y / CHECKER_CELL)) % 2 == 0 {
            Rgba([230, 225, 210, 255])
        } else {
            Rgba([30, 60, 90, 255])
        }
    })
}
