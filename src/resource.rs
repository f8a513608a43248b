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
//! Window-owned widget resources, addressed by resolved identifier and by generational handle.
//!
//! Resources created through [`WindowResources::get_or_create`] live until the window is destroyed
//! or they are released. Resources created through [`WindowResources::add_dynamic`] are reference
//! counted instead: every frame they are drawn counts as one reference, holders (an open popup for
//! instance) add their own, and a resource that stays unreferenced for the configured number of
//! frames is evicted.

use std::any::Any;
use std::collections::HashMap;

use crate::{convert_characters_to_sprites, vec2f, Color, GlyphSource, SpriteVertex, Vec2f};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Stable handle of a resource inside one window.
pub struct ResourceHandle {
    index: u32,
    generation: u32,
}

#[derive(Default, Debug)]
struct DynamicRefs {
    frame_references: usize,
    held_references: usize,
    idle_frames: usize,
}

struct ResourceSlot {
    identifier: String,
    generation: u32,
    object: Option<Box<dyn Any>>,
    dynamic: Option<DynamicRefs>,
}

/// Resource table of one window.
pub struct WindowResources {
    slots: Vec<ResourceSlot>,
    lookup: HashMap<String, ResourceHandle>,
    free: Vec<u32>,
    eviction_frames: usize,
    epoch: u64,
}

impl WindowResources {
    /// Creates an empty table whose dynamic resources are evicted after `eviction_frames` idle frames.
    pub fn new(eviction_frames: usize) -> Self {
        Self { slots: Vec::new(), lookup: HashMap::new(), free: Vec::new(), eviction_frames: eviction_frames.max(1), epoch: 0 }
    }

    /// Looks up a resource by resolved identifier.
    pub fn find(&self, identifier: &str) -> Option<ResourceHandle> { self.lookup.get(identifier).copied() }

    /// Returns the resource registered under `identifier`, creating it with `init` the first time.
    pub fn get_or_create<T: Any>(&mut self, identifier: &str, init: impl FnOnce(&str) -> T) -> ResourceHandle {
        if let Some(handle) = self.find(identifier) {
            return handle;
        }
        let object: Box<dyn Any> = Box::new(init(identifier));
        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.identifier = identifier.to_string();
                slot.object = Some(object);
                slot.dynamic = None;
                ResourceHandle { index, generation: slot.generation }
            }
            None => {
                self.slots.push(ResourceSlot { identifier: identifier.to_string(), generation: 0, object: Some(object), dynamic: None });
                ResourceHandle { index: (self.slots.len() - 1) as u32, generation: 0 }
            }
        };
        self.lookup.insert(identifier.to_string(), handle);
        handle
    }

    /// Dynamic counterpart of [`WindowResources::get_or_create`]; also counts this frame's draw.
    pub fn add_dynamic<T: Any>(&mut self, identifier: &str, init: impl FnOnce(&str) -> T) -> ResourceHandle {
        let handle = self.get_or_create(identifier, init);
        if let Some(slot) = self.slot_mut(handle) {
            slot.dynamic.get_or_insert_with(DynamicRefs::default);
        }
        self.mark_drawn(handle);
        handle
    }

    fn slot(&self, handle: ResourceHandle) -> Option<&ResourceSlot> {
        self.slots.get(handle.index as usize).filter(|s| s.generation == handle.generation && s.object.is_some())
    }

    fn slot_mut(&mut self, handle: ResourceHandle) -> Option<&mut ResourceSlot> {
        self.slots.get_mut(handle.index as usize).filter(|s| s.generation == handle.generation && s.object.is_some())
    }

    /// Returns `true` while `handle` refers to a live resource.
    pub fn contains(&self, handle: ResourceHandle) -> bool { self.slot(handle).is_some() }

    /// Identifier `handle` was registered under.
    pub fn identifier(&self, handle: ResourceHandle) -> Option<&str> { self.slot(handle).map(|s| s.identifier.as_str()) }

    /// Borrows the resource if it is alive and of type `T`.
    pub fn get<T: Any>(&self, handle: ResourceHandle) -> Option<&T> { self.slot(handle).and_then(|s| s.object.as_ref()).and_then(|o| o.downcast_ref::<T>()) }

    /// Mutably borrows the resource if it is alive and of type `T`.
    pub fn get_mut<T: Any>(&mut self, handle: ResourceHandle) -> Option<&mut T> {
        self.slot_mut(handle).and_then(|s| s.object.as_mut()).and_then(|o| o.downcast_mut::<T>())
    }

    /// Mutably borrows the resource.
    ///
    /// Panics when the resource does not exist or has another type: widgets are always initialized
    /// before their first draw.
    pub fn expect_mut<T: Any>(&mut self, handle: ResourceHandle) -> &mut T {
        match self.get_mut::<T>(handle) {
            Some(r) => r,
            None => panic!("resource {:?} of type {} not found", handle, std::any::type_name::<T>()),
        }
    }

    /// Counts one draw of a dynamic resource in the current frame.
    pub fn mark_drawn(&mut self, handle: ResourceHandle) {
        if let Some(refs) = self.slot_mut(handle).and_then(|s| s.dynamic.as_mut()) {
            refs.frame_references = 1;
        }
    }

    /// Adds a holder reference keeping a dynamic resource alive while it is not drawn.
    pub fn acquire_reference(&mut self, handle: ResourceHandle) {
        if let Some(refs) = self.slot_mut(handle).and_then(|s| s.dynamic.as_mut()) {
            refs.held_references += 1;
        }
    }

    /// Drops a holder reference.
    pub fn release_reference(&mut self, handle: ResourceHandle) {
        if let Some(refs) = self.slot_mut(handle).and_then(|s| s.dynamic.as_mut()) {
            refs.held_references = refs.held_references.saturating_sub(1);
        }
    }

    /// Current reference count of a dynamic resource.
    pub fn reference_count(&self, handle: ResourceHandle) -> Option<usize> {
        self.slot(handle).and_then(|s| s.dynamic.as_ref()).map(|r| r.frame_references + r.held_references)
    }

    /// Releases a resource; its handle becomes stale.
    pub fn release(&mut self, handle: ResourceHandle) -> bool {
        let Some(slot) = self.slot_mut(handle) else {
            return false;
        };
        slot.object = None;
        slot.dynamic = None;
        slot.generation = slot.generation.wrapping_add(1);
        let identifier = std::mem::take(&mut slot.identifier);
        self.lookup.remove(&identifier);
        self.free.push(handle.index);
        true
    }

    /// Ends the frame for dynamic resources: unreferenced ones age, expired ones are evicted.
    pub(crate) fn advance_frame(&mut self) {
        let mut expired = Vec::new();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let Some(refs) = slot.dynamic.as_mut() else {
                continue;
            };
            if refs.frame_references + refs.held_references == 0 {
                refs.idle_frames += 1;
                if refs.idle_frames >= self.eviction_frames {
                    expired.push(ResourceHandle { index: index as u32, generation: slot.generation });
                }
            } else {
                refs.idle_frames = 0;
            }
            refs.frame_references = 0;
        }
        for handle in expired {
            log::debug!("evicting dynamic resource '{}'", self.identifier(handle).unwrap_or_default());
            self.release(handle);
        }
    }

    /// Number of live resources.
    pub fn len(&self) -> usize { self.lookup.len() }

    /// Returns `true` when no resource is alive.
    pub fn is_empty(&self) -> bool { self.lookup.is_empty() }

    /// Drops every resource.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            if slot.object.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            slot.dynamic = None;
        }
        self.free = (0..self.slots.len() as u32).rev().collect();
        self.lookup.clear();
    }

    /// Geometry epoch; cached text shaped under an older epoch is reshaped.
    pub fn epoch(&self) -> u64 { self.epoch }

    /// Invalidates all cached geometry of the window.
    pub fn invalidate_geometry(&mut self) { self.epoch += 1; }
}

#[derive(Clone, Debug, PartialEq)]
struct TextParams {
    font_size: f32,
    spacing: f32,
    color: Color,
}

#[derive(Clone, Debug)]
/// Pre-shaped text geometry kept across frames, in local space with the origin at the text's top-left.
pub struct CachedText {
    text: String,
    params: TextParams,
    vertices: Vec<SpriteVertex>,
    span: Vec2f,
    zoom: Vec2f,
    epoch: u64,
    shapes: usize,
}

impl Default for CachedText {
    fn default() -> Self {
        Self {
            text: String::new(),
            params: TextParams { font_size: 0.0, spacing: 0.0, color: Color::default() },
            vertices: Vec::new(),
            span: Vec2f::default(),
            zoom: vec2f(1.0, 1.0),
            epoch: 0,
            shapes: 0,
        }
    }
}

impl CachedText {
    /// Brings the geometry up to date. Text, font, or epoch changes reshape; a zoom change alone
    /// rescales the existing vertices; a color change alone recolors them.
    #[allow(clippy::too_many_arguments)]
    pub fn sync(&mut self, glyphs: &dyn GlyphSource, text: &str, font_size: f32, spacing: f32, color: Color, zoom: Vec2f, epoch: u64) {
        let params = TextParams { font_size, spacing, color };
        let same_shape = self.shapes > 0 && self.text == text && self.params.font_size == font_size && self.params.spacing == spacing && self.epoch == epoch;
        if !same_shape {
            self.reshape(glyphs, text, params, zoom, epoch);
            return;
        }
        if self.zoom.x != zoom.x || self.zoom.y != zoom.y {
            self.rescale(zoom);
        }
        if self.params.color != color {
            for v in self.vertices.iter_mut() {
                v.color = color;
            }
            self.params.color = color;
        }
    }

    fn reshape(&mut self, glyphs: &dyn GlyphSource, text: &str, params: TextParams, zoom: Vec2f, epoch: u64) {
        self.vertices.clear();
        let span = convert_characters_to_sprites(glyphs, text, Vec2f::default(), &mut self.vertices, params.color, params.font_size, params.spacing);
        self.text.clear();
        self.text.push_str(text);
        self.params = params;
        self.span = span;
        self.zoom = vec2f(1.0, 1.0);
        self.epoch = epoch;
        self.shapes += 1;
        self.rescale(zoom);
    }

    fn rescale(&mut self, zoom: Vec2f) {
        let fx = zoom.x / self.zoom.x;
        let fy = zoom.y / self.zoom.y;
        for v in self.vertices.iter_mut() {
            v.position.x *= fx;
            v.position.y *= fy;
        }
        self.span = vec2f(self.span.x * fx, self.span.y * fy);
        self.zoom = zoom;
    }

    /// Local-space glyph vertices.
    pub fn vertices(&self) -> &[SpriteVertex] { &self.vertices }

    /// Size of the shaped text at the current zoom.
    pub fn span(&self) -> Vec2f { self.span }

    /// Text the geometry was shaped from.
    pub fn text(&self) -> &str { &self.text }

    /// Number of full shaping passes performed so far.
    pub fn shape_count(&self) -> usize { self.shapes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{color, MonospaceGlyphs};

    #[derive(Debug, PartialEq)]
    struct Counter(u32);

    #[test]
    fn initializer_runs_once() {
        let mut res = WindowResources::new(3);
        let mut calls = 0;
        let a = res.get_or_create("a#1", |id| {
            calls += 1;
            assert_eq!(id, "a#1");
            Counter(0)
        });
        let b = res.get_or_create("a#1", |_| Counter(99));
        assert_eq!(a, b);
        assert_eq!(calls, 1);
        res.expect_mut::<Counter>(a).0 += 1;
        assert_eq!(res.get::<Counter>(b), Some(&Counter(1)));
        assert!(res.get::<String>(a).is_none());
    }

    #[test]
    fn released_handles_go_stale() {
        let mut res = WindowResources::new(3);
        let a = res.get_or_create("a", |_| Counter(1));
        assert!(res.release(a));
        assert!(!res.contains(a));
        let b = res.get_or_create("b", |_| Counter(2));
        assert_ne!(a, b);
        assert!(res.get::<Counter>(a).is_none());
        assert_eq!(res.find("b"), Some(b));
        assert_eq!(res.find("a"), None);
    }

    #[test]
    fn dynamic_resources_expire_when_unreferenced() {
        let mut res = WindowResources::new(2);
        let h = res.add_dynamic("menu", |_| Counter(0));
        res.advance_frame();
        res.advance_frame();
        assert!(res.contains(h));
        res.advance_frame();
        assert!(!res.contains(h));
    }

    #[test]
    fn held_references_keep_dynamic_alive() {
        let mut res = WindowResources::new(1);
        let h = res.add_dynamic("combo", |_| Counter(0));
        res.acquire_reference(h);
        for _ in 0..5 {
            res.advance_frame();
        }
        assert!(res.contains(h));
        assert_eq!(res.reference_count(h), Some(1));
        res.release_reference(h);
        res.advance_frame();
        assert!(!res.contains(h));
    }

    #[test]
    fn eager_resources_never_expire() {
        let mut res = WindowResources::new(1);
        let h = res.get_or_create("label", |_| Counter(0));
        for _ in 0..5 {
            res.advance_frame();
        }
        assert!(res.contains(h));
        res.clear();
        assert!(res.is_empty());
        assert!(!res.contains(h));
    }

    #[test]
    fn cached_text_rescales_on_zoom() {
        let glyphs = MonospaceGlyphs::new(0.5);
        let white = color(255, 255, 255, 255);
        let mut text = CachedText::default();
        text.sync(&glyphs, "abc", 16.0, 0.0, white, vec2f(1.0, 1.0), 0);
        assert_eq!(text.shape_count(), 1);
        assert_eq!(text.span().x, 24.0);
        text.sync(&glyphs, "abc", 16.0, 0.0, white, vec2f(2.0, 2.0), 0);
        assert_eq!(text.shape_count(), 1);
        assert_eq!(text.span().x, 48.0);
        assert_eq!(text.vertices()[6].position.x, 16.0);
        text.sync(&glyphs, "abcd", 16.0, 0.0, white, vec2f(2.0, 2.0), 0);
        assert_eq!(text.shape_count(), 2);
        assert_eq!(text.span().x, 64.0);
        text.sync(&glyphs, "abcd", 16.0, 0.0, white, vec2f(2.0, 2.0), 1);
        assert_eq!(text.shape_count(), 3);
    }
}
