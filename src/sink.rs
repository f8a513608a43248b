//
// Copyright 2022-Present (c) Raja Lehtihet & Wael El Oraiby
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice,
// this list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
// this list of conditions and the following disclaimer in the documentation
// and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its contributors
// may be used to endorse or promote products derived from this software without
// specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
// ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE
// LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR
// CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF
// SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS
// INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN
// CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE)
// ARISING IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE
// POSSIBILITY OF SUCH DAMAGE.
//
//! Per-phase geometry batches. The drawer only appends to them; a [`RenderBackend`] consumes them.

use crate::{vec2f, Color, TextureId, UIBox, Vec2f};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
/// Ordering category for both geometry and interaction resolution.
pub enum DrawPhase {
    #[default]
    /// Regular page content.
    Normal,
    /// Overlays drawn after the content of the same window (highlights, popups inside a window).
    Late,
    /// System-level overlays; always drawn and resolved last.
    System,
}

impl DrawPhase {
    /// Every phase in draw order.
    pub const ALL: [DrawPhase; 3] = [DrawPhase::Normal, DrawPhase::Late, DrawPhase::System];

    /// Position of the phase in [`DrawPhase::ALL`].
    pub fn index(self) -> usize {
        match self {
            Self::Normal => 0,
            Self::Late => 1,
            Self::System => 2,
        }
    }
}

#[derive(Default, Copy, Clone, Debug)]
#[repr(C)]
/// Vertex of a solid-color quad.
pub struct SolidVertex {
    /// Screen position.
    pub position: Vec2f,
    /// Vertex color.
    pub color: Color,
}

#[derive(Default, Copy, Clone, Debug)]
#[repr(C)]
/// Vertex of a textured quad; used for both sprites and text glyphs.
pub struct SpriteVertex {
    /// Screen position (or local position inside cached text).
    pub position: Vec2f,
    /// Texture coordinate.
    pub uv: Vec2f,
    /// Vertex color.
    pub color: Color,
}

/// Number of vertices emitted for one quad (two triangles).
pub const QUAD_VERTICES: usize = 6;

/// Expands a box into the six corner positions of two triangles: top-left, top-right, bottom-left,
/// top-right, bottom-right, bottom-left.
pub fn quad_corners(b: &UIBox) -> [Vec2f; QUAD_VERTICES] {
    let (l, t, r, bt) = (b.x(), b.y(), b.right(), b.bottom());
    [vec2f(l, t), vec2f(r, t), vec2f(l, bt), vec2f(r, t), vec2f(r, bt), vec2f(l, bt)]
}

/// Expands a UV rectangle in the same corner order as [`quad_corners`].
pub fn quad_uvs(tl: Vec2f, br: Vec2f) -> [Vec2f; QUAD_VERTICES] {
    [tl, vec2f(br.x, tl.y), vec2f(tl.x, br.y), vec2f(br.x, tl.y), br, vec2f(tl.x, br.y)]
}

#[derive(Default, Clone, Debug)]
/// Geometry emitted into one phase.
pub struct PhaseBatch {
    /// Solid quads, six vertices each.
    pub solid: Vec<SolidVertex>,
    /// Sprite quads, six vertices each.
    pub sprites: Vec<SpriteVertex>,
    /// Texture of each sprite quad, one entry per quad.
    pub sprite_textures: Vec<TextureId>,
    /// Text glyph quads, six vertices each, sampled from the glyph atlas.
    pub text: Vec<SpriteVertex>,
}

impl PhaseBatch {
    /// Number of solid vertices.
    pub fn solid_count(&self) -> usize { self.solid.len() }
    /// Number of sprite vertices.
    pub fn sprite_count(&self) -> usize { self.sprites.len() }
    /// Number of text vertices.
    pub fn text_count(&self) -> usize { self.text.len() }

    fn clear(&mut self) {
        self.solid.clear();
        self.sprites.clear();
        self.sprite_textures.clear();
        self.text.clear();
    }
}

#[derive(Default, Clone, Debug)]
/// Append-only geometry sink owned by one window.
pub struct GeometrySink {
    batches: [PhaseBatch; 3],
}

impl GeometrySink {
    /// Returns the batch of `phase`.
    pub fn phase(&self, phase: DrawPhase) -> &PhaseBatch { &self.batches[phase.index()] }

    /// Appends a solid-color quad.
    pub fn push_solid_quad(&mut self, phase: DrawPhase, rect: &UIBox, color: Color) {
        let batch = &mut self.batches[phase.index()];
        batch.solid.extend(quad_corners(rect).into_iter().map(|position| SolidVertex { position, color }));
    }

    /// Appends a textured quad.
    pub fn push_sprite(&mut self, phase: DrawPhase, rect: &UIBox, uv_tl: Vec2f, uv_br: Vec2f, color: Color, texture: TextureId) {
        let batch = &mut self.batches[phase.index()];
        let uvs = quad_uvs(uv_tl, uv_br);
        batch.sprites.extend(quad_corners(rect).into_iter().zip(uvs).map(|(position, uv)| SpriteVertex { position, uv, color }));
        batch.sprite_textures.push(texture);
    }

    /// Appends text glyph vertices expressed relative to `origin`.
    pub fn push_text(&mut self, phase: DrawPhase, vertices: &[SpriteVertex], origin: Vec2f) {
        let batch = &mut self.batches[phase.index()];
        batch.text.extend(vertices.iter().map(|v| SpriteVertex { position: vec2f(v.position.x + origin.x, v.position.y + origin.y), ..*v }));
    }

    /// Appends text glyph vertices with a color override.
    pub fn push_text_colored(&mut self, phase: DrawPhase, vertices: &[SpriteVertex], origin: Vec2f, color: Color) {
        let batch = &mut self.batches[phase.index()];
        batch.text.extend(vertices.iter().map(|v| SpriteVertex { position: vec2f(v.position.x + origin.x, v.position.y + origin.y), uv: v.uv, color }));
    }

    /// Total number of vertices across all phases and streams.
    pub fn vertex_count(&self) -> usize { self.batches.iter().map(|b| b.solid_count() + b.sprite_count() + b.text_count()).sum() }

    /// Drops all geometry. Called by the owning system at the start of each window's draw.
    pub(crate) fn clear(&mut self) {
        for batch in self.batches.iter_mut() {
            batch.clear();
        }
    }

    /// Streams the batch of `phase` into `backend`, grouping consecutive sprites sharing a texture.
    pub fn submit<B: RenderBackend + ?Sized>(&self, phase: DrawPhase, backend: &mut B) {
        let batch = self.phase(phase);
        if !batch.solid.is_empty() {
            backend.draw_solid(phase, &batch.solid, batch.solid_count());
        }
        let mut start = 0;
        while start < batch.sprite_textures.len() {
            let texture = batch.sprite_textures[start];
            let mut end = start + 1;
            while end < batch.sprite_textures.len() && batch.sprite_textures[end] == texture {
                end += 1;
            }
            let vertices = &batch.sprites[start * QUAD_VERTICES..end * QUAD_VERTICES];
            backend.draw_sprites(phase, texture, vertices, vertices.len());
            start = end;
        }
        if !batch.text.is_empty() {
            backend.draw_text(phase, &batch.text, batch.text_count());
        }
    }
}

/// Trait implemented by render backends consuming `(buffer, vertex_count)` streams.
pub trait RenderBackend {
    /// Draws solid-color triangles.
    fn draw_solid(&mut self, phase: DrawPhase, vertices: &[SolidVertex], count: usize);
    /// Draws textured triangles sampling `texture`.
    fn draw_sprites(&mut self, phase: DrawPhase, texture: TextureId, vertices: &[SpriteVertex], count: usize);
    /// Draws text triangles sampling the glyph atlas.
    fn draw_text(&mut self, phase: DrawPhase, vertices: &[SpriteVertex], count: usize);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(DrawPhase, &'static str, usize)>,
    }

    impl RenderBackend for Recorder {
        fn draw_solid(&mut self, phase: DrawPhase, _: &[SolidVertex], count: usize) { self.calls.push((phase, "solid", count)); }
        fn draw_sprites(&mut self, phase: DrawPhase, _: TextureId, _: &[SpriteVertex], count: usize) { self.calls.push((phase, "sprite", count)); }
        fn draw_text(&mut self, phase: DrawPhase, _: &[SpriteVertex], count: usize) { self.calls.push((phase, "text", count)); }
    }

    #[test]
    fn solid_quad_winding() {
        let mut sink = GeometrySink::default();
        sink.push_solid_quad(DrawPhase::Late, &UIBox::new(1.0, 2.0, 3.0, 4.0), color(1, 2, 3, 4));
        let batch = sink.phase(DrawPhase::Late);
        assert_eq!(batch.solid_count(), 6);
        let p: Vec<(f32, f32)> = batch.solid.iter().map(|v| (v.position.x, v.position.y)).collect();
        assert_eq!(p, vec![(1.0, 2.0), (4.0, 2.0), (1.0, 6.0), (4.0, 2.0), (4.0, 6.0), (1.0, 6.0)]);
        assert_eq!(sink.phase(DrawPhase::Normal).solid_count(), 0);
    }

    #[test]
    fn sprites_are_grouped_by_texture() {
        let mut sink = GeometrySink::default();
        let r = UIBox::new(0.0, 0.0, 1.0, 1.0);
        let white = color(255, 255, 255, 255);
        sink.push_sprite(DrawPhase::Normal, &r, vec2f(0.0, 0.0), vec2f(1.0, 1.0), white, TextureId(1));
        sink.push_sprite(DrawPhase::Normal, &r, vec2f(0.0, 0.0), vec2f(1.0, 1.0), white, TextureId(1));
        sink.push_sprite(DrawPhase::Normal, &r, vec2f(0.0, 0.0), vec2f(1.0, 1.0), white, TextureId(2));
        let mut rec = Recorder::default();
        sink.submit(DrawPhase::Normal, &mut rec);
        assert_eq!(rec.calls, vec![(DrawPhase::Normal, "sprite", 12), (DrawPhase::Normal, "sprite", 6)]);
    }

    #[test]
    fn text_is_offset_by_origin() {
        let mut sink = GeometrySink::default();
        let v = SpriteVertex { position: vec2f(1.0, 1.0), ..Default::default() };
        sink.push_text(DrawPhase::System, &[v], vec2f(10.0, 20.0));
        let t = &sink.phase(DrawPhase::System).text[0];
        assert_eq!((t.position.x, t.position.y), (11.0, 21.0));
        sink.clear();
        assert_eq!(sink.vertex_count(), 0);
    }
}
