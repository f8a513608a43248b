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
// -----------------------------------------------------------------------------
// Ported to rust from https://github.com/rxi/microui/ and the original license
//
// Copyright (c) 2020 rxi
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to
// deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS
// IN THE SOFTWARE.
//
//! Window table: windows live in an arena and are addressed by generational handles, so a handle
//! held by a popup or a handler can never reach a window that replaced a destroyed one.

use crate::{
    vec2f, DrawerStyle, GeometrySink, HandlerRegistry, RenderBounds, ResourceHandle, RevertCommandStack, UIBox, UIDrawer, Vec2f, WindowError,
    WindowResources,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Stable handle of a window.
pub struct WindowHandle {
    index: u32,
    generation: u32,
}

/// Draw callback of a window, called once per frame with a fresh drawer.
pub type DrawCallback = Box<dyn FnMut(&mut UIDrawer<'_>)>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Activity {
    Open,
    Closed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Role of a window.
pub enum WindowKind {
    /// Regular application window.
    Regular,
    /// Transient popup spawned by a widget.
    Popup,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Widget resource that spawned a popup.
pub struct PopupOwner {
    /// Window holding the resource.
    pub window: WindowHandle,
    /// The widget resource.
    pub resource: ResourceHandle,
}

/// Parameters of [`crate::UiSystem::create_window`].
pub struct WindowDescriptor {
    /// Unique window name.
    pub name: String,
    /// Screen region.
    pub region: UIBox,
    /// Window role.
    pub kind: WindowKind,
    /// Spawning widget of a popup.
    pub owner: Option<PopupOwner>,
    /// Draw callback.
    pub draw: DrawCallback,
}

impl WindowDescriptor {
    /// Describes a regular window.
    pub fn new(name: &str, region: UIBox, draw: impl FnMut(&mut UIDrawer<'_>) + 'static) -> Self {
        Self { name: name.to_string(), region, kind: WindowKind::Regular, owner: None, draw: Box::new(draw) }
    }

    /// Turns the descriptor into a popup owned by `owner`.
    pub fn popup(mut self, owner: PopupOwner) -> Self {
        self.kind = WindowKind::Popup;
        self.owner = Some(owner);
        self
    }
}

/// A screen region with its own resources, handlers and geometry.
pub struct Window {
    pub(crate) name: String,
    pub(crate) kind: WindowKind,
    pub(crate) owner: Option<PopupOwner>,
    pub(crate) activity: Activity,
    pub(crate) region: UIBox,
    pub(crate) resources: WindowResources,
    pub(crate) handlers: HandlerRegistry,
    pub(crate) sink: GeometrySink,
    pub(crate) revert_commands: RevertCommandStack,
    pub(crate) render_offset: Vec2f,
    pub(crate) zoom: Vec2f,
    pub(crate) render_bounds: RenderBounds,
    pub(crate) draw: Option<DrawCallback>,
}

impl Window {
    pub(crate) fn new(descriptor: WindowDescriptor, style: &DrawerStyle) -> Self {
        Self {
            name: descriptor.name,
            kind: descriptor.kind,
            owner: descriptor.owner,
            activity: Activity::Open,
            region: descriptor.region,
            resources: WindowResources::new(style.dynamic_eviction_frames),
            handlers: HandlerRegistry::new(style.handler_capacity),
            sink: GeometrySink::default(),
            revert_commands: RevertCommandStack::new(style.revert_command_capacity),
            render_offset: Vec2f::default(),
            zoom: vec2f(1.0, 1.0),
            render_bounds: RenderBounds::default(),
            draw: Some(descriptor.draw),
        }
    }

    /// Window name.
    pub fn name(&self) -> &str { &self.name }

    /// Window role.
    pub fn kind(&self) -> WindowKind { self.kind }

    /// Spawning widget of a popup.
    pub fn owner(&self) -> Option<PopupOwner> { self.owner }

    /// Screen region.
    pub fn region(&self) -> UIBox { self.region }

    /// Resource table.
    pub fn resources(&self) -> &WindowResources { &self.resources }

    /// Mutable resource table.
    pub fn resources_mut(&mut self) -> &mut WindowResources { &mut self.resources }

    /// Handler lists of the last drawn frame.
    pub fn handlers(&self) -> &HandlerRegistry { &self.handlers }

    /// Geometry of the last drawn frame.
    pub fn sink(&self) -> &GeometrySink { &self.sink }

    /// Undo log.
    pub fn revert_commands(&self) -> &RevertCommandStack { &self.revert_commands }

    /// Scroll offset of the content.
    pub fn render_offset(&self) -> Vec2f { self.render_offset }

    /// Zoom factor.
    pub fn zoom(&self) -> Vec2f { self.zoom }

    /// Bounds of the content drawn last frame, relative to the unscrolled content origin.
    pub fn render_bounds(&self) -> RenderBounds { self.render_bounds }

    /// Returns `true` until the window is destroyed.
    pub fn is_open(&self) -> bool { self.activity == Activity::Open }

    /// Largest scroll offset the content allows on each axis.
    pub(crate) fn max_render_offset(&self, padding: Vec2f) -> Vec2f {
        let extent = self.render_bounds.extent();
        vec2f(
            (extent.x + padding.x * 2.0 - self.region.width()).max(0.0),
            (extent.y + padding.y * 2.0 - self.region.height()).max(0.0),
        )
    }

    /// Moves the scroll offset by `delta`, clamped to the content.
    pub(crate) fn scroll_by(&mut self, delta: Vec2f, padding: Vec2f) {
        let max = self.max_render_offset(padding);
        self.render_offset = vec2f((self.render_offset.x + delta.x).clamp(0.0, max.x), (self.render_offset.y + delta.y).clamp(0.0, max.y));
    }
}

struct WindowSlot {
    generation: u32,
    alive: bool,
    window: Option<Window>,
}

#[derive(Default)]
/// Arena of windows plus their z-order.
pub struct WindowTable {
    slots: Vec<WindowSlot>,
    order: Vec<WindowHandle>,
    free: Vec<u32>,
}

impl WindowTable {
    fn slot(&self, handle: WindowHandle) -> Option<&WindowSlot> { self.slots.get(handle.index as usize).filter(|s| s.alive && s.generation == handle.generation) }

    /// Adds a window on top of the z-order.
    pub(crate) fn insert(&mut self, window: Window) -> WindowHandle {
        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.alive = true;
                slot.window = Some(window);
                WindowHandle { index, generation: slot.generation }
            }
            None => {
                self.slots.push(WindowSlot { generation: 0, alive: true, window: Some(window) });
                WindowHandle { index: (self.slots.len() - 1) as u32, generation: 0 }
            }
        };
        self.order.push(handle);
        handle
    }

    /// Removes a window; its handle becomes stale.
    pub(crate) fn remove(&mut self, handle: WindowHandle) -> Result<Option<Window>, WindowError> {
        if self.slot(handle).is_none() {
            return Err(WindowError::Destroyed(handle));
        }
        let slot = &mut self.slots[handle.index as usize];
        slot.alive = false;
        slot.generation = slot.generation.wrapping_add(1);
        let mut window = slot.window.take();
        if let Some(w) = window.as_mut() {
            w.activity = Activity::Closed;
        }
        self.free.push(handle.index);
        self.order.retain(|h| *h != handle);
        Ok(window)
    }

    /// Returns `true` while `handle` refers to a live window, even while it is being drawn.
    pub fn contains(&self, handle: WindowHandle) -> bool { self.slot(handle).is_some() }

    /// Borrows a window.
    pub fn get(&self, handle: WindowHandle) -> Result<&Window, WindowError> {
        match self.slot(handle) {
            None => Err(WindowError::Destroyed(handle)),
            Some(slot) => slot.window.as_ref().ok_or(WindowError::Busy(handle)),
        }
    }

    /// Mutably borrows a window.
    pub fn get_mut(&mut self, handle: WindowHandle) -> Result<&mut Window, WindowError> {
        if self.slot(handle).is_none() {
            return Err(WindowError::Destroyed(handle));
        }
        self.slots[handle.index as usize].window.as_mut().ok_or(WindowError::Busy(handle))
    }

    /// Finds a live window by name.
    pub fn find(&self, name: &str) -> Option<WindowHandle> {
        self.order.iter().copied().find(|h| self.get(*h).map(|w| w.name == name).unwrap_or(false))
    }

    /// Handles from bottom to top.
    pub fn order(&self) -> &[WindowHandle] { &self.order }

    /// Number of live windows.
    pub fn len(&self) -> usize { self.order.len() }

    /// Returns `true` when no window is alive.
    pub fn is_empty(&self) -> bool { self.order.is_empty() }

    /// Raises a window to the top of the z-order.
    pub fn bring_to_front(&mut self, handle: WindowHandle) {
        if let Some(pos) = self.order.iter().position(|h| *h == handle) {
            let h = self.order.remove(pos);
            self.order.push(h);
        }
    }

    /// Topmost window whose region contains `point`.
    pub fn topmost_at(&self, point: Vec2f) -> Option<WindowHandle> {
        self.order.iter().rev().copied().find(|h| self.get(*h).map(|w| w.region.contains(point)).unwrap_or(false))
    }

    /// Checks a window out for drawing; other windows stay reachable.
    pub(crate) fn take(&mut self, handle: WindowHandle) -> Option<Window> {
        self.slot(handle)?;
        self.slots[handle.index as usize].window.take()
    }

    /// Returns a checked-out window. A window destroyed meanwhile is dropped.
    pub(crate) fn restore(&mut self, handle: WindowHandle, window: Window) {
        if self.slot(handle).is_some() {
            self.slots[handle.index as usize].window = Some(window);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(name: &str, region: UIBox) -> Window { Window::new(WindowDescriptor::new(name, region, |_| {}), &DrawerStyle::default()) }

    #[test]
    fn handles_go_stale_after_removal() {
        let mut table = WindowTable::default();
        let a = table.insert(window("a", UIBox::new(0.0, 0.0, 10.0, 10.0)));
        assert!(table.remove(a).is_ok());
        let b = table.insert(window("b", UIBox::new(0.0, 0.0, 10.0, 10.0)));
        assert_ne!(a, b);
        assert_eq!(table.get(a).err(), Some(WindowError::Destroyed(a)));
        assert_eq!(table.find("b"), Some(b));
        assert_eq!(table.find("a"), None);
    }

    #[test]
    fn z_order_and_hit_testing() {
        let mut table = WindowTable::default();
        let a = table.insert(window("a", UIBox::new(0.0, 0.0, 100.0, 100.0)));
        let b = table.insert(window("b", UIBox::new(50.0, 50.0, 100.0, 100.0)));
        assert_eq!(table.topmost_at(vec2f(60.0, 60.0)), Some(b));
        table.bring_to_front(a);
        assert_eq!(table.topmost_at(vec2f(60.0, 60.0)), Some(a));
        assert_eq!(table.topmost_at(vec2f(140.0, 140.0)), Some(b));
        assert_eq!(table.order(), &[b, a]);
    }

    #[test]
    fn checked_out_window_is_busy() {
        let mut table = WindowTable::default();
        let a = table.insert(window("a", UIBox::new(0.0, 0.0, 10.0, 10.0)));
        let w = table.take(a);
        assert!(w.is_some());
        assert!(table.contains(a));
        assert_eq!(table.get(a).err(), Some(WindowError::Busy(a)));
        if let Some(w) = w {
            table.restore(a, w);
        }
        assert!(table.get(a).is_ok());
    }

    #[test]
    fn scroll_is_clamped_to_content() {
        let mut w = window("a", UIBox::new(0.0, 0.0, 100.0, 100.0));
        w.render_bounds.include(&UIBox::new(0.0, 0.0, 50.0, 300.0));
        w.scroll_by(vec2f(20.0, 500.0), vec2f(0.0, 0.0));
        assert_eq!((w.render_offset.x, w.render_offset.y), (0.0, 200.0));
        w.scroll_by(vec2f(0.0, -1000.0), vec2f(0.0, 0.0));
        assert_eq!(w.render_offset.y, 0.0);
    }
}
