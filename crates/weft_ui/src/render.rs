//! UI rendering system.
//!
//! Turns painted quads into one vertex array, one index array and a list of
//! draw commands. Consecutive quads on the same texture extend the previous
//! command's index range; a texture change starts a new command.
//!
//! ## Clipping
//!
//! Clip rectangles never become commands. Each quad is clipped on the CPU
//! against the clip rect of the control that painted it: fully hidden quads are
//! dropped, partially hidden quads are trimmed with their UVs interpolated.
//! Batching therefore depends only on texture changes, even under nested
//! scroll views.

// bytemuck derives on `Vertex` expand to `unsafe impl`.
#![allow(unsafe_code)]

use tracing::warn;
use weft_core::{CoreResult, GrowBuffer};

use crate::layout::Rect;
use crate::style::Color;

/// Opaque texture identifier, compared only for equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextureId(pub u32);

/// Texture-space rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UvRect {
    /// Left.
    pub u0: f32,
    /// Top.
    pub v0: f32,
    /// Right.
    pub u1: f32,
    /// Bottom.
    pub v1: f32,
}

impl UvRect {
    /// Degenerate UVs used for solid-color quads.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// The whole texture.
    pub const FULL: Self = Self::new(0.0, 0.0, 1.0, 1.0);

    /// Creates UVs from corners.
    #[must_use]
    pub const fn new(u0: f32, v0: f32, u1: f32, v1: f32) -> Self {
        Self { u0, v0, u1, v1 }
    }
}

/// Vertex for UI rendering.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position (x, y).
    pub position: [f32; 2],
    /// UV coordinates.
    pub uv: [f32; 2],
    /// Color (RGBA).
    pub color: [f32; 4],
}

impl Vertex {
    /// Creates a new vertex.
    #[must_use]
    pub const fn new(x: f32, y: f32, u: f32, v: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
            color,
        }
    }
}

/// One draw call: a texture and a contiguous index range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCommand {
    /// Texture to bind; `None` draws solid color.
    pub texture: Option<TextureId>,
    /// First index.
    pub index_start: u32,
    /// Number of indices.
    pub index_count: u32,
}

impl DrawCommand {
    /// Index range as a `Range`.
    #[must_use]
    pub const fn range(&self) -> std::ops::Range<u32> {
        self.index_start..self.index_start + self.index_count
    }
}

/// Tells the batcher which textures exist. Unresolved textures fall back to
/// solid color with zero UVs instead of failing the frame.
pub trait TextureResolver {
    /// Returns true if `texture` can be bound by the renderer.
    fn is_resident(&self, texture: TextureId) -> bool;
}

/// Resolver that accepts every texture.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllResident;

impl TextureResolver for AllResident {
    fn is_resident(&self, _texture: TextureId) -> bool {
        true
    }
}

/// Per-window render output. Rebuilt every frame; valid until the next
/// frame of the same window begins batching.
#[derive(Debug, Clone)]
pub struct WindowRender {
    vertices: GrowBuffer<Vertex>,
    indices: GrowBuffer<u32>,
    commands: GrowBuffer<DrawCommand>,
}

impl WindowRender {
    /// Creates empty output with element limits on the vertex and index arrays.
    #[must_use]
    pub fn new(max_vertices: usize, max_indices: usize) -> Self {
        Self {
            vertices: GrowBuffer::with_limit(max_vertices),
            indices: GrowBuffer::with_limit(max_indices),
            commands: GrowBuffer::new(),
        }
    }

    /// Vertices in emission order.
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Indices, six per quad.
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Draw commands in paint order.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Vertex data as bytes for upload.
    #[must_use]
    pub fn vertex_bytes(&self) -> &[u8] {
        self.vertices.as_bytes()
    }

    /// Changes the element limits. Takes effect from the next batch.
    pub(crate) fn set_limits(&mut self, max_vertices: usize, max_indices: usize) {
        self.vertices.set_limit(max_vertices);
        self.indices.set_limit(max_indices);
    }

    fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.commands.clear();
    }
}

/// Statistics from one batching pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BatchStats {
    /// Quads written.
    pub quads: u32,
    /// Quads dropped because they were fully clipped.
    pub culled: u32,
    /// Draw commands written.
    pub draw_calls: u32,
}

/// Writes quads into a [`WindowRender`], merging same-texture runs.
pub struct Batcher<'a> {
    out: &'a mut WindowRender,
    resolver: &'a dyn TextureResolver,
    clip: Option<Rect>,
    stats: BatchStats,
    failure: Option<weft_core::CoreError>,
}

impl<'a> Batcher<'a> {
    /// Clears `out` and starts a new batch.
    pub fn begin(out: &'a mut WindowRender, resolver: &'a dyn TextureResolver) -> Self {
        out.clear();
        Self {
            out,
            resolver,
            clip: None,
            stats: BatchStats::default(),
            failure: None,
        }
    }

    /// Sets the clip rect applied to subsequent quads.
    pub fn set_clip(&mut self, clip: Option<Rect>) {
        self.clip = clip;
    }

    /// Paints a solid-color rectangle.
    pub fn solid(&mut self, rect: Rect, color: Color) {
        if color.is_invisible() {
            return;
        }
        self.quad(rect, UvRect::ZERO, None, color);
    }

    /// Paints a textured rectangle tinted by `color`.
    pub fn textured(&mut self, rect: Rect, uv: UvRect, texture: TextureId, color: Color) {
        self.quad(rect, uv, Some(texture), color);
    }

    /// Paints one quad. Does nothing once a buffer has refused to grow.
    pub fn quad(&mut self, rect: Rect, uv: UvRect, texture: Option<TextureId>, color: Color) {
        if self.failure.is_some() || rect.width <= 0.0 || rect.height <= 0.0 {
            return;
        }

        let (texture, uv) = match texture {
            Some(t) if self.resolver.is_resident(t) => (Some(t), uv),
            _ => (None, UvRect::ZERO),
        };

        let Some((rect, uv)) = clip_quad(rect, uv, self.clip) else {
            self.stats.culled += 1;
            return;
        };

        if let Err(err) = self.write_quad(rect, uv, texture, color.to_array()) {
            warn!("render buffer full, dropping remaining geometry: {err}");
            self.failure = Some(err);
            return;
        }
        self.stats.quads += 1;
    }

    fn write_quad(
        &mut self,
        rect: Rect,
        uv: UvRect,
        texture: Option<TextureId>,
        color: [f32; 4],
    ) -> CoreResult<()> {
        // Reserve both arrays first so a failure never leaves half a quad.
        self.out.vertices.try_reserve(4)?;
        self.out.indices.try_reserve(6)?;

        #[allow(clippy::cast_possible_truncation)]
        let base = self.out.vertices.len() as u32;
        #[allow(clippy::cast_possible_truncation)]
        let index_start = self.out.indices.len() as u32;

        let merge = self
            .out
            .commands
            .last()
            .is_some_and(|last| last.texture == texture);
        if !merge {
            self.out.commands.try_push(DrawCommand {
                texture,
                index_start,
                index_count: 0,
            })?;
            self.stats.draw_calls += 1;
        }

        let (x0, y0, x1, y1) = (rect.x, rect.y, rect.right(), rect.bottom());
        self.out.vertices.try_extend_from_slice(&[
            Vertex::new(x0, y0, uv.u0, uv.v0, color),
            Vertex::new(x1, y0, uv.u1, uv.v0, color),
            Vertex::new(x1, y1, uv.u1, uv.v1, color),
            Vertex::new(x0, y1, uv.u0, uv.v1, color),
        ])?;
        self.out.indices.try_extend_from_slice(&[
            base,
            base + 1,
            base + 2,
            base + 2,
            base + 3,
            base,
        ])?;

        if let Some(last) = self.out.commands.last_mut() {
            last.index_count += 6;
        }
        Ok(())
    }

    /// Finishes the batch.
    ///
    /// # Errors
    ///
    /// Returns the first buffer failure; geometry emitted before it is intact.
    pub fn finish(self) -> (BatchStats, CoreResult<()>) {
        (self.stats, self.failure.map_or(Ok(()), Err))
    }
}

/// Clips a quad to `clip`, interpolating UVs. Returns None if nothing remains.
fn clip_quad(rect: Rect, uv: UvRect, clip: Option<Rect>) -> Option<(Rect, UvRect)> {
    let Some(clip) = clip else {
        return Some((rect, uv));
    };
    if clip.contains_rect(&rect) {
        return Some((rect, uv));
    }
    let visible = rect.intersection(&clip)?;
    if visible.width <= 0.0 || visible.height <= 0.0 {
        return None;
    }

    let du = (uv.u1 - uv.u0) / rect.width;
    let dv = (uv.v1 - uv.v0) / rect.height;
    let clipped = UvRect::new(
        uv.u0 + (visible.x - rect.x) * du,
        uv.v0 + (visible.y - rect.y) * dv,
        uv.u0 + (visible.right() - rect.x) * du,
        uv.v0 + (visible.bottom() - rect.y) * dv,
    );
    Some((visible, clipped))
}
