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
//! Interaction handlers. Widgets register boxes with handlers while drawing; once the frame's draw
//! calls are done the system resolves which box the pointer hits and calls its handler.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::{
    ClipboardHandle, Color, DrawPhase, DrawerStyle, GlyphSource, InputSnapshot, ResourceHandle, SystemServices, UIBox, UiSystem, Vec2f, Window,
    WindowError, WindowHandle, WindowResources, WindowTable,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Why a handler is being called.
pub enum ActionMode {
    /// Regular call with fresh input.
    Normal,
    /// The persistent general handler is called on a frame without input activity.
    Repeat,
    /// The handler is about to be replaced or removed; flush state and release ownership.
    CleanUp,
}

type ActionFn = dyn Fn(&mut ActionContext<'_>);

#[derive(Clone)]
/// Callback plus the phase it is resolved in and the resource that owns it.
pub struct ActionHandler {
    action: Rc<ActionFn>,
    /// Resolution phase.
    pub phase: DrawPhase,
    /// Resource the handler acts on; identifies general handlers across frames.
    pub owner: Option<ResourceHandle>,
}

impl ActionHandler {
    /// Wraps `action` as a [`DrawPhase::Normal`] handler without an owner.
    pub fn new(action: impl Fn(&mut ActionContext<'_>) + 'static) -> Self { Self { action: Rc::new(action), phase: DrawPhase::Normal, owner: None } }

    /// Sets the resolution phase.
    pub fn with_phase(mut self, phase: DrawPhase) -> Self {
        self.phase = phase;
        self
    }

    /// Sets the owning resource.
    pub fn with_owner(mut self, owner: ResourceHandle) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Invokes the callback.
    pub fn call(&self, ctx: &mut ActionContext<'_>) { (self.action)(ctx) }
}

impl fmt::Debug for ActionHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.debug_struct("ActionHandler").field("phase", &self.phase).field("owner", &self.owner).finish() }
}

impl PartialEq for ActionHandler {
    fn eq(&self, other: &Self) -> bool { Rc::ptr_eq(&self.action, &other.action) && self.phase == other.phase && self.owner == other.owner }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Registration category of a box.
pub enum HandlerKind {
    /// Called every frame the pointer is over the box.
    Hoverable,
    /// Called when the left button is pressed over the box.
    Clickable,
    /// Captured as the persistent general handler when the left button is pressed over the box.
    General,
}

impl HandlerKind {
    fn index(self) -> usize {
        match self {
            Self::Hoverable => 0,
            Self::Clickable => 1,
            Self::General => 2,
        }
    }
}

#[derive(Clone, Debug)]
/// A box registered for the current frame.
pub struct RegisteredBox {
    /// Screen-space bounds.
    pub rect: UIBox,
    /// Handler to call.
    pub handler: ActionHandler,
}

fn highlight_handler(color: Color, percentage: f32, phase: DrawPhase) -> ActionHandler {
    let overlay = color.brighten(percentage).fade(percentage);
    let target = if phase == DrawPhase::System { DrawPhase::System } else { DrawPhase::Late };
    ActionHandler::new(move |ctx| {
        let bounds = ctx.bounds();
        if let Some(window) = ctx.window_mut() {
            window.sink.push_solid_quad(target, &bounds, overlay);
        }
    })
    .with_phase(phase)
}

/// Per-window handler lists, one per kind and phase, each of bounded capacity.
pub struct HandlerRegistry {
    capacity: usize,
    lists: [[Vec<RegisteredBox>; 3]; 3],
}

impl HandlerRegistry {
    /// Creates empty lists holding at most `capacity` boxes each.
    pub fn new(capacity: usize) -> Self { Self { capacity, lists: Default::default() } }

    fn push(&mut self, kind: HandlerKind, rect: UIBox, handler: ActionHandler) {
        let capacity = self.capacity;
        let list = &mut self.lists[kind.index()][handler.phase.index()];
        assert!(list.len() < capacity, "more than {} {:?} handlers registered in phase {:?}", capacity, kind, handler.phase);
        list.push(RegisteredBox { rect, handler });
    }

    /// Registers a hoverable box.
    pub fn add_hoverable(&mut self, rect: UIBox, handler: ActionHandler) { self.push(HandlerKind::Hoverable, rect, handler) }

    /// Registers a clickable box.
    pub fn add_clickable(&mut self, rect: UIBox, handler: ActionHandler) { self.push(HandlerKind::Clickable, rect, handler) }

    /// Registers a general box.
    pub fn add_general(&mut self, rect: UIBox, handler: ActionHandler) { self.push(HandlerKind::General, rect, handler) }

    /// Registers a hoverable that brightens `color` by `percentage` over the box.
    pub fn add_default_hoverable(&mut self, rect: UIBox, color: Color, percentage: f32, phase: DrawPhase) {
        self.add_hoverable(rect, highlight_handler(color, percentage, phase))
    }

    /// Registers `handler` as clickable plus the default hover highlight on the same box.
    pub fn add_default_clickable_hoverable(&mut self, rect: UIBox, handler: ActionHandler, color: Color, percentage: f32) {
        let phase = handler.phase;
        self.add_clickable(rect, handler);
        self.add_default_hoverable(rect, color, percentage, phase);
    }

    /// Last registered box of `kind` in `phase` containing `point`.
    pub fn resolve(&self, kind: HandlerKind, phase: DrawPhase, point: Vec2f) -> Option<&RegisteredBox> {
        self.lists[kind.index()][phase.index()].iter().rev().find(|b| b.rect.contains(point))
    }

    /// Most recent general box owned by `owner`, in any phase.
    pub fn general_of(&self, owner: ResourceHandle) -> Option<&RegisteredBox> {
        self.lists[HandlerKind::General.index()].iter().flat_map(|l| l.iter().rev()).find(|b| b.handler.owner == Some(owner))
    }

    /// General boxes of every phase, in registration order within each phase.
    pub fn generals(&self) -> impl Iterator<Item = &RegisteredBox> { self.lists[HandlerKind::General.index()].iter().flatten() }

    /// Number of boxes of `kind` in `phase`.
    pub fn count(&self, kind: HandlerKind, phase: DrawPhase) -> usize { self.lists[kind.index()][phase.index()].len() }

    pub(crate) fn clear(&mut self) {
        for lists in self.lists.iter_mut() {
            for list in lists.iter_mut() {
                list.clear();
            }
        }
    }
}

/// Everything a handler may touch while it runs.
pub struct ActionContext<'a> {
    pub(crate) mode: ActionMode,
    pub(crate) bounds: UIBox,
    pub(crate) window: WindowHandle,
    pub(crate) owner: Option<ResourceHandle>,
    pub(crate) windows: &'a mut WindowTable,
    pub(crate) services: &'a mut SystemServices,
    pub(crate) retired: bool,
}

impl<'a> ActionContext<'a> {
    /// Invocation mode.
    pub fn mode(&self) -> ActionMode { self.mode }

    /// Box the handler was registered with.
    pub fn bounds(&self) -> UIBox { self.bounds }

    /// Window the handler was registered in.
    pub fn window(&self) -> WindowHandle { self.window }

    /// Input of the current frame.
    pub fn input(&self) -> &InputSnapshot { &self.services.snapshot }

    /// Seconds elapsed since the previous frame.
    pub fn delta_time(&self) -> f32 { self.services.snapshot.delta_time }

    /// Frame counter.
    pub fn frame(&self) -> u64 { self.services.frame }

    /// Active style.
    pub fn style(&self) -> &DrawerStyle { &self.services.style }

    /// Glyph service.
    pub fn glyphs(&self) -> Rc<dyn GlyphSource> { self.services.glyphs.clone() }

    /// Screen rectangle.
    pub fn screen(&self) -> UIBox { self.services.screen }

    /// Clipboard.
    pub fn clipboard(&self) -> ClipboardHandle { self.services.clipboard.clone() }

    /// The window the handler was registered in, unless it has been destroyed.
    pub fn window_mut(&mut self) -> Option<&mut Window> { self.windows.get_mut(self.window).ok() }

    /// Resource table of the handler's window.
    pub fn resources_mut(&mut self) -> Option<&mut WindowResources> { self.window_mut().map(|w| &mut w.resources) }

    /// A resource of the handler's window.
    pub fn resource_mut<T: Any>(&mut self, handle: ResourceHandle) -> Option<&mut T> { self.resources_mut().and_then(|r| r.get_mut::<T>(handle)) }

    /// A resource of another window; `None` when that window or resource is gone.
    pub fn foreign_resource_mut<T: Any>(&mut self, window: WindowHandle, handle: ResourceHandle) -> Option<&mut T> {
        self.windows.get_mut(window).ok().and_then(|w| w.resources.get_mut::<T>(handle))
    }

    /// Screen region of `window`.
    pub fn window_region(&self, window: WindowHandle) -> Result<UIBox, WindowError> { self.windows.get(window).map(|w| w.region) }

    /// Returns `true` while `window` is alive.
    pub fn window_exists(&self, window: WindowHandle) -> bool { self.windows.contains(window) }

    /// Defers `f` until the end of the frame, after every handler ran.
    pub fn push_system_handler(&mut self, f: impl FnOnce(&mut UiSystem) + 'static) { self.services.system_queue.push(Box::new(f)); }

    /// Registers `handler` to run every frame, after hoverables, until it retires itself.
    pub fn add_frame_handler(&mut self, handler: ActionHandler) { self.services.add_frame_handler(self.window, handler); }

    /// Makes `handler` the persistent general handler of this window, bounded by this handler's box.
    pub fn set_general_handler(&mut self, handler: ActionHandler) {
        let bounds = self.bounds;
        self.services.capture_general(self.window, bounds, handler);
    }

    /// Makes `handler` the persistent general handler of this window, bounded by `bounds`.
    pub fn set_general_handler_at(&mut self, bounds: UIBox, handler: ActionHandler) { self.services.capture_general(self.window, bounds, handler); }

    /// Returns `true` when the persistent general handler belongs to the calling handler's owner.
    pub fn is_general_handler(&self) -> bool { self.owner.is_some() && self.services.is_general(self.window, self.owner) }

    /// Releases the persistent general handler if it belongs to the calling handler's owner.
    pub fn release_general_handler(&mut self) {
        if self.services.is_general(self.window, self.owner) {
            self.services.release_general();
        }
    }

    /// Removes the calling frame handler after this call.
    pub fn retire(&mut self) { self.retired = true; }
}
