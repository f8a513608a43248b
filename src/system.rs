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
//! The UI system: owns the windows and the services shared by every drawer, runs the per-frame
//! draw pass and resolves interaction once all windows were drawn.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use crate::{
    vec2f, ActionContext, ActionHandler, ActionMode, ClipboardHandle, DrawPhase, DrawerStyle, GlyphSource, HandlerKind, Input, InputSnapshot,
    LocalClipboard, RegisteredBox, RenderBackend, ResourceHandle, UIBox, UIDrawer, Vec2f, Window, WindowDescriptor, WindowError, WindowHandle,
    WindowKind, WindowTable,
};

/// Deferred one-shot callback run after the frame's handlers.
pub type SystemHandler = Box<dyn FnOnce(&mut UiSystem)>;

#[derive(Clone)]
pub(crate) struct GeneralFocus {
    pub window: WindowHandle,
    pub bounds: UIBox,
    pub handler: ActionHandler,
}

impl GeneralFocus {
    fn same_owner(&self, window: WindowHandle, owner: Option<ResourceHandle>) -> bool { owner.is_some() && self.window == window && self.handler.owner == owner }
}

struct FrameHandler {
    window: WindowHandle,
    handler: ActionHandler,
}

/// Services shared by drawers and handlers: style, glyphs, input, clipboard and the handler queues.
pub struct SystemServices {
    pub(crate) style: DrawerStyle,
    pub(crate) glyphs: Rc<dyn GlyphSource>,
    pub(crate) input: Rc<RefCell<Input>>,
    pub(crate) snapshot: InputSnapshot,
    pub(crate) clipboard: ClipboardHandle,
    pub(crate) system_queue: Vec<SystemHandler>,
    frame_handlers: Vec<FrameHandler>,
    pub(crate) general: Option<GeneralFocus>,
    cleanup_queue: Vec<GeneralFocus>,
    pub(crate) screen: UIBox,
    pub(crate) frame: u64,
    time: f64,
}

impl SystemServices {
    pub(crate) fn add_frame_handler(&mut self, window: WindowHandle, handler: ActionHandler) { self.frame_handlers.push(FrameHandler { window, handler }); }

    /// Installs `handler` as the persistent general handler. A different previous owner gets its
    /// clean-up call once the current handler returns.
    pub(crate) fn capture_general(&mut self, window: WindowHandle, bounds: UIBox, handler: ActionHandler) {
        if let Some(old) = self.general.take() {
            if !old.same_owner(window, handler.owner) {
                log::debug!("general handler transferred from {:?}/{:?} to {:?}/{:?}", old.window, old.handler.owner, window, handler.owner);
                self.cleanup_queue.push(old);
            }
        } else {
            log::debug!("general handler captured by {:?}/{:?}", window, handler.owner);
        }
        self.general = Some(GeneralFocus { window, bounds, handler });
    }

    pub(crate) fn is_general(&self, window: WindowHandle, owner: Option<ResourceHandle>) -> bool {
        self.general.as_ref().map(|g| g.same_owner(window, owner)).unwrap_or(false)
    }

    pub(crate) fn release_general(&mut self) {
        if let Some(g) = self.general.take() {
            log::debug!("general handler released by {:?}/{:?}", g.window, g.handler.owner);
        }
    }
}

/// Owner of every window and of the frame loop.
pub struct UiSystem {
    pub(crate) windows: WindowTable,
    pub(crate) services: SystemServices,
}

impl UiSystem {
    /// Creates a system drawing into `screen`.
    pub fn new(glyphs: Rc<dyn GlyphSource>, style: DrawerStyle, screen: UIBox) -> Self {
        Self {
            windows: WindowTable::default(),
            services: SystemServices {
                style,
                glyphs,
                input: Rc::new(RefCell::new(Input::default())),
                snapshot: InputSnapshot::default(),
                clipboard: Rc::new(RefCell::new(LocalClipboard::default())),
                system_queue: Vec::new(),
                frame_handlers: Vec::new(),
                general: None,
                cleanup_queue: Vec::new(),
                screen,
                frame: 0,
                time: 0.0,
            },
        }
    }

    /// Shared input accumulator; feed events into it between frames.
    pub fn input(&self) -> Rc<RefCell<Input>> { self.services.input.clone() }

    /// Snapshot used by the last frame.
    pub fn last_input(&self) -> &InputSnapshot { &self.services.snapshot }

    /// Replaces the clipboard.
    pub fn set_clipboard(&mut self, clipboard: ClipboardHandle) { self.services.clipboard = clipboard; }

    /// Clipboard used by text inputs.
    pub fn clipboard(&self) -> ClipboardHandle { self.services.clipboard.clone() }

    /// Active style.
    pub fn style(&self) -> &DrawerStyle { &self.services.style }

    /// Mutable style; changes apply from the next frame.
    pub fn style_mut(&mut self) -> &mut DrawerStyle { &mut self.services.style }

    /// Screen rectangle.
    pub fn screen(&self) -> UIBox { self.services.screen }

    /// Resizes the screen.
    pub fn set_screen(&mut self, screen: UIBox) { self.services.screen = screen; }

    /// Number of frames run so far.
    pub fn frame_count(&self) -> u64 { self.services.frame }

    /// Window table.
    pub fn windows(&self) -> &WindowTable { &self.windows }

    /// Borrows a window.
    pub fn window(&self, handle: WindowHandle) -> Result<&Window, WindowError> { self.windows.get(handle) }

    /// Mutably borrows a window.
    pub fn window_mut(&mut self, handle: WindowHandle) -> Result<&mut Window, WindowError> { self.windows.get_mut(handle) }

    /// Finds a window by name.
    pub fn find_window(&self, name: &str) -> Result<WindowHandle, WindowError> { self.windows.find(name).ok_or_else(|| WindowError::NotFound(name.to_string())) }

    /// Creates a window on top of the z-order. A live window with the same name is destroyed first.
    pub fn create_window(&mut self, descriptor: WindowDescriptor) -> WindowHandle {
        if let Some(existing) = self.windows.find(&descriptor.name) {
            log::warn!("window '{}' already exists; replacing it", descriptor.name);
            let _ = self.destroy_window(existing);
        }
        let name = descriptor.name.clone();
        let handle = self.windows.insert(Window::new(descriptor, &self.services.style));
        log::debug!("window '{}' created as {:?}", name, handle);
        handle
    }

    /// Destroys a window, the popups it spawned, its frame handlers and its general handler.
    pub fn destroy_window(&mut self, handle: WindowHandle) -> Result<(), WindowError> {
        let window = self.windows.remove(handle)?;
        log::debug!("window {:?} '{}' destroyed", handle, window.as_ref().map(|w| w.name()).unwrap_or_default());
        let owned: Vec<WindowHandle> = self
            .windows
            .order()
            .iter()
            .copied()
            .filter(|h| self.windows.get(*h).ok().and_then(|w| w.owner()).map(|o| o.window == handle).unwrap_or(false))
            .collect();
        for popup in owned {
            let _ = self.destroy_window(popup);
        }
        self.services.frame_handlers.retain(|f| f.window != handle);
        if self.services.general.as_ref().map(|g| g.window == handle).unwrap_or(false) {
            self.reset_general_handler();
        }
        Ok(())
    }

    /// Destroys the window called `name` if it exists.
    pub fn destroy_window_if_found(&mut self, name: &str) -> bool {
        match self.windows.find(name) {
            Some(handle) => self.destroy_window(handle).is_ok(),
            None => false,
        }
    }

    /// Screen region of a window.
    pub fn window_region(&self, handle: WindowHandle) -> Result<UIBox, WindowError> { self.windows.get(handle).map(|w| w.region()) }

    /// Moves or resizes a window, invalidating its cached geometry.
    pub fn set_window_region(&mut self, handle: WindowHandle, region: UIBox) -> Result<(), WindowError> {
        let window = self.windows.get_mut(handle)?;
        window.region = region;
        window.resources.invalidate_geometry();
        Ok(())
    }

    /// Sets the zoom factor of a window.
    pub fn set_window_zoom(&mut self, handle: WindowHandle, zoom: Vec2f) -> Result<(), WindowError> {
        self.windows.get_mut(handle)?.zoom = zoom;
        Ok(())
    }

    /// Raises a window; popups stay above regular windows.
    pub fn bring_to_front(&mut self, handle: WindowHandle) {
        self.windows.bring_to_front(handle);
        let popups: Vec<WindowHandle> =
            self.windows.order().iter().copied().filter(|h| self.windows.get(*h).map(|w| w.kind() == WindowKind::Popup).unwrap_or(false)).collect();
        for popup in popups {
            self.windows.bring_to_front(popup);
        }
    }

    /// Queues `f` to run after the handlers of the current (or next) frame.
    pub fn push_system_handler(&mut self, f: impl FnOnce(&mut UiSystem) + 'static) { self.services.system_queue.push(Box::new(f)); }

    /// Registers a handler called every frame until it retires.
    pub fn add_frame_handler(&mut self, window: WindowHandle, handler: ActionHandler) { self.services.add_frame_handler(window, handler); }

    /// Returns `true` while a persistent general handler is installed.
    pub fn has_general_handler(&self) -> bool { self.services.general.is_some() }

    /// Removes the persistent general handler, giving it its clean-up call.
    pub fn reset_general_handler(&mut self) {
        if let Some(old) = self.services.general.take() {
            log::debug!("general handler reset for {:?}/{:?}", old.window, old.handler.owner);
            self.call(old.window, old.bounds, &old.handler, ActionMode::CleanUp);
        }
    }

    /// Resource of a window.
    pub fn resource_mut<T: Any>(&mut self, window: WindowHandle, handle: ResourceHandle) -> Option<&mut T> {
        self.windows.get_mut(window).ok().and_then(|w| w.resources.get_mut::<T>(handle))
    }

    /// Runs one frame: draws every window, dispatches interaction, runs the deferred queue and
    /// expires dynamic resources.
    pub fn frame(&mut self, delta_time: f32) {
        self.services.frame += 1;
        self.services.time += delta_time as f64;
        self.services.snapshot = self.services.input.borrow().snapshot(self.services.time, delta_time);

        let order = self.windows.order().to_vec();
        for handle in order {
            self.draw_window(handle);
        }

        self.dispatch();

        let queue = std::mem::take(&mut self.services.system_queue);
        for f in queue {
            f(self);
        }

        for handle in self.windows.order().to_vec() {
            if let Ok(window) = self.windows.get_mut(handle) {
                window.resources.advance_frame();
            }
        }
        self.services.input.borrow_mut().epilogue();
    }

    /// Streams every window's geometry into `backend`, phase by phase, bottom window first.
    pub fn render<B: RenderBackend + ?Sized>(&self, backend: &mut B) {
        for phase in DrawPhase::ALL {
            for handle in self.windows.order() {
                if let Ok(window) = self.windows.get(*handle) {
                    window.sink.submit(phase, backend);
                }
            }
        }
    }

    fn draw_window(&mut self, handle: WindowHandle) {
        let Some(mut window) = self.windows.take(handle) else {
            return;
        };
        if let Some(mut draw) = window.draw.take() {
            window.handlers.clear();
            window.sink.clear();
            let mut drawer = UIDrawer::new(handle, &mut window, &mut self.windows, &mut self.services);
            draw(&mut drawer);
            drawer.finish();
            window.draw = Some(draw);
        }
        self.windows.restore(handle, window);
    }

    fn call(&mut self, window: WindowHandle, bounds: UIBox, handler: &ActionHandler, mode: ActionMode) -> bool {
        let mut ctx = ActionContext { mode, bounds, window, owner: handler.owner, windows: &mut self.windows, services: &mut self.services, retired: false };
        handler.call(&mut ctx);
        let retired = ctx.retired;
        self.flush_cleanups();
        retired
    }

    fn flush_cleanups(&mut self) {
        while let Some(old) = self.services.cleanup_queue.pop() {
            let mut ctx = ActionContext {
                mode: ActionMode::CleanUp,
                bounds: old.bounds,
                window: old.window,
                owner: old.handler.owner,
                windows: &mut self.windows,
                services: &mut self.services,
                retired: false,
            };
            old.handler.call(&mut ctx);
        }
    }

    /// System-phase boxes of every window first (topmost window first), then the hovered window's
    /// Late and Normal boxes.
    fn resolve(&self, kind: HandlerKind, point: Vec2f) -> Option<(WindowHandle, RegisteredBox)> {
        for handle in self.windows.order().iter().rev() {
            if let Some(found) = self.windows.get(*handle).ok().and_then(|w| w.handlers.resolve(kind, DrawPhase::System, point)) {
                return Some((*handle, found.clone()));
            }
        }
        let hovered = self.windows.topmost_at(point)?;
        let window = self.windows.get(hovered).ok()?;
        [DrawPhase::Late, DrawPhase::Normal].into_iter().find_map(|phase| window.handlers.resolve(kind, phase, point)).map(|found| (hovered, found.clone()))
    }

    fn refresh_general(&mut self) {
        let Some(general) = self.services.general.as_mut() else {
            return;
        };
        if !self.windows.contains(general.window) {
            self.services.general = None;
            return;
        }
        let Some(owner) = general.handler.owner else {
            return;
        };
        if let Some(found) = self.windows.get(general.window).ok().and_then(|w| w.handlers.general_of(owner)) {
            general.bounds = found.rect;
            general.handler = found.handler.clone();
        }
    }

    fn dispatch(&mut self) {
        let mouse = self.services.snapshot.mouse_pos;
        let pressed = self.services.snapshot.mouse_pressed.is_left();

        self.refresh_general();
        if pressed {
            if let Some((window, found)) = self.resolve(HandlerKind::General, mouse) {
                self.services.capture_general(window, found.rect, found.handler);
                self.flush_cleanups();
            }
        }
        if let Some(general) = self.services.general.clone() {
            let mode = if self.services.snapshot.has_activity() { ActionMode::Normal } else { ActionMode::Repeat };
            log::trace!("general handler {:?}/{:?} called in {:?}", general.window, general.handler.owner, mode);
            self.call(general.window, general.bounds, &general.handler, mode);
        }

        if pressed {
            if let Some((window, found)) = self.resolve(HandlerKind::Clickable, mouse) {
                log::trace!("click resolved in {:?} at {:?}", window, found.rect);
                self.call(window, found.rect, &found.handler, ActionMode::Normal);
            }
        }

        if let Some((window, found)) = self.resolve(HandlerKind::Hoverable, mouse) {
            self.call(window, found.rect, &found.handler, ActionMode::Normal);
        }

        let scroll = self.services.snapshot.scroll_delta;
        if scroll.x != 0.0 || scroll.y != 0.0 {
            if let Some(hovered) = self.windows.topmost_at(mouse) {
                let step = self.services.style.default_element_scale.y;
                let padding = self.services.style.region_padding;
                if let Ok(window) = self.windows.get_mut(hovered) {
                    let padding = vec2f(padding.x * window.zoom.x, padding.y * window.zoom.y);
                    window.scroll_by(vec2f(-scroll.x * step, -scroll.y * step), padding);
                }
            }
        }

        let handlers = std::mem::take(&mut self.services.frame_handlers);
        let mut kept = Vec::with_capacity(handlers.len());
        for frame_handler in handlers {
            let Ok(region) = self.windows.get(frame_handler.window).map(|w| w.region()) else {
                continue;
            };
            if !self.call(frame_handler.window, region, &frame_handler.handler, ActionMode::Normal) && self.windows.contains(frame_handler.window) {
                kept.push(frame_handler);
            }
        }
        kept.append(&mut self.services.frame_handlers);
        self.services.frame_handlers = kept;

        if pressed {
            if let Some(hovered) = self.windows.topmost_at(mouse) {
                if self.windows.order().last() != Some(&hovered) {
                    self.bring_to_front(hovered);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::system;
    use crate::MouseButton;
    use std::cell::Cell;

    #[test]
    fn general_handler_persists_and_cleans_up() {
        let mut sys = system();
        let log: Rc<RefCell<Vec<ActionMode>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        let w = sys.create_window(WindowDescriptor::new("main", UIBox::new(0.0, 0.0, 200.0, 200.0), move |d| {
            let owner = d.resources_mut().get_or_create("focus", |_| ());
            let sink = sink.clone();
            let handler = ActionHandler::new(move |ctx| sink.borrow_mut().push(ctx.mode())).with_owner(owner);
            d.handlers_mut().add_general(UIBox::new(0.0, 0.0, 50.0, 50.0), handler);
        }));
        sys.input().borrow_mut().mousedown(10.0, 10.0, MouseButton::LEFT);
        sys.frame(0.016);
        assert!(sys.has_general_handler());
        sys.input().borrow_mut().mouseup(10.0, 10.0, MouseButton::LEFT);
        sys.frame(0.016);
        sys.frame(0.016);
        assert_eq!(*log.borrow(), vec![ActionMode::Normal, ActionMode::Normal, ActionMode::Repeat]);
        sys.reset_general_handler();
        assert_eq!(log.borrow().last(), Some(&ActionMode::CleanUp));
        assert!(!sys.has_general_handler());
        assert!(sys.window(w).is_ok());
    }

    #[test]
    fn system_phase_wins_over_topmost_normal() {
        let mut sys = system();
        let hits = Rc::new(Cell::new(0u32));
        let (a, b) = (hits.clone(), hits.clone());
        sys.create_window(WindowDescriptor::new("back", UIBox::new(0.0, 0.0, 100.0, 100.0), move |d| {
            let a = a.clone();
            let h = ActionHandler::new(move |_| a.set(a.get() + 1)).with_phase(DrawPhase::System);
            d.handlers_mut().add_clickable(UIBox::new(0.0, 0.0, 100.0, 100.0), h);
        }));
        sys.create_window(WindowDescriptor::new("front", UIBox::new(0.0, 0.0, 100.0, 100.0), move |d| {
            let b = b.clone();
            d.handlers_mut().add_clickable(UIBox::new(0.0, 0.0, 100.0, 100.0), ActionHandler::new(move |_| b.set(b.get() + 100)));
        }));
        sys.input().borrow_mut().mousedown(5.0, 5.0, MouseButton::LEFT);
        sys.frame(0.016);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn system_queue_runs_after_handlers() {
        let mut sys = system();
        sys.push_system_handler(|s| {
            s.create_window(WindowDescriptor::new("late", UIBox::new(0.0, 0.0, 10.0, 10.0), |_| {}));
        });
        assert!(sys.find_window("late").is_err());
        sys.frame(0.016);
        assert!(sys.find_window("late").is_ok());
        assert!(sys.destroy_window_if_found("late"));
        assert_eq!(sys.find_window("late"), Err(WindowError::NotFound("late".into())));
    }

    #[test]
    fn destroying_owner_destroys_popups() {
        let mut sys = system();
        let owner = sys.create_window(WindowDescriptor::new("owner", UIBox::new(0.0, 0.0, 10.0, 10.0), |_| {}));
        let resource = sys.window_mut(owner).map(|w| w.resources_mut().get_or_create("menu", |_| ())).ok();
        let Some(resource) = resource else { panic!("owner window missing") };
        let popup = sys.create_window(WindowDescriptor::new("popup", UIBox::new(0.0, 0.0, 10.0, 10.0), |_| {}).popup(crate::PopupOwner { window: owner, resource }));
        assert!(sys.destroy_window(owner).is_ok());
        assert!(sys.window(popup).is_err());
        assert_eq!(sys.destroy_window(owner), Err(WindowError::Destroyed(owner)));
    }

    #[test]
    fn frame_handlers_retire() {
        let mut sys = system();
        let w = sys.create_window(WindowDescriptor::new("w", UIBox::new(0.0, 0.0, 10.0, 10.0), |_| {}));
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        sys.add_frame_handler(w, ActionHandler::new(move |ctx| {
            c.set(c.get() + 1);
            if c.get() == 2 {
                ctx.retire();
            }
        }));
        for _ in 0..4 {
            sys.frame(0.016);
        }
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn window_region_change_invalidates_geometry() {
        let mut sys = system();
        let w = sys.create_window(WindowDescriptor::new("w", UIBox::new(0.0, 0.0, 10.0, 10.0), |_| {}));
        let before = sys.window(w).map(|w| w.resources().epoch()).ok();
        assert!(sys.set_window_region(w, UIBox::new(5.0, 5.0, 20.0, 20.0)).is_ok());
        assert_eq!(sys.window_region(w).ok(), Some(UIBox::new(5.0, 5.0, 20.0, 20.0)));
        assert_eq!(sys.window(w).map(|w| w.resources().epoch()).ok(), before.map(|e| e + 1));
    }
}
