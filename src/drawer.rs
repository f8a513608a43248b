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
//! The per-frame, per-window drawer. Widgets are methods on [`UIDrawer`]; each call places a box
//! through the layout engine, fetches its cached state, appends geometry and registers handlers.

use std::any::Any;
use std::rc::Rc;

use crate::scrollbar::{scrollbar_base, scrollbar_drag_delta, scrollbar_thumb, ScrollAxis};
use crate::{
    vec2f, ActionHandler, ActionMode, Alignment, BorderOption, CachedText, CallbackOption, Color, ColorOption, ConfigOption, DrawConfig, DrawCursor, DrawMode, DrawPhase,
    DrawerStyle, DrawnIdentifiers, GeometrySink, GlyphSource, HandlerRegistry, HoverableOption, IdentifierStack, InputSnapshot, LayoutEngine,
    LayoutMetrics, ResourceHandle, ScaleOption, SystemHandler, SystemServices, TextOption, TextureId, ThemeColor, TransformOption, UIBox, UiSystem,
    Vec2f, Window, WindowHandle, WindowResources, WindowTable,
};

/// Drawer bound to one window for one frame.
pub struct UIDrawer<'a> {
    pub(crate) handle: WindowHandle,
    pub(crate) window: &'a mut Window,
    pub(crate) others: &'a mut WindowTable,
    pub(crate) services: &'a mut SystemServices,
    pub(crate) layout: LayoutEngine,
    identifiers: IdentifierStack,
    drawn: DrawnIdentifiers,
}

impl<'a> UIDrawer<'a> {
    pub(crate) fn new(handle: WindowHandle, window: &'a mut Window, others: &'a mut WindowTable, services: &'a mut SystemServices) -> Self {
        let zoom = window.zoom;
        let style = &services.style;
        let metrics = LayoutMetrics {
            padding: vec2f(style.region_padding.x * zoom.x, style.region_padding.y * zoom.y),
            element_indentation: style.element_indentation * zoom.x,
            row_offset: style.row_offset * zoom.y,
        };
        let layout = LayoutEngine::new(window.region, window.render_offset, metrics);
        Self { handle, window, others, services, layout, identifiers: IdentifierStack::new(), drawn: DrawnIdentifiers::default() }
    }

    /// Handle of the window being drawn.
    pub fn window_handle(&self) -> WindowHandle { self.handle }

    /// Screen region of the window.
    pub fn region(&self) -> UIBox { self.window.region }

    /// Zoom factor of the window.
    pub fn zoom(&self) -> Vec2f { self.window.zoom }

    /// Active style.
    pub fn style(&self) -> &DrawerStyle { &self.services.style }

    /// Input of the current frame.
    pub fn input(&self) -> &InputSnapshot { &self.services.snapshot }

    /// Glyph service.
    pub fn glyphs(&self) -> Rc<dyn GlyphSource> { self.services.glyphs.clone() }

    /// Screen rectangle.
    pub fn screen(&self) -> UIBox { self.services.screen }

    /// Frame counter.
    pub fn frame(&self) -> u64 { self.services.frame }

    /// Layout engine.
    pub fn layout(&self) -> &LayoutEngine { &self.layout }

    /// Current cursor.
    pub fn cursor(&self) -> DrawCursor { self.layout.cursor() }

    /// Replaces the cursor.
    pub fn set_cursor(&mut self, cursor: DrawCursor) { self.layout.set_cursor(cursor) }

    /// Pushes a segment onto the identifier stack.
    pub fn push_identifier_stack(&mut self, segment: &str) { self.identifiers.push(segment) }

    /// Pushes a loop index onto the identifier stack.
    pub fn push_identifier_index(&mut self, index: usize) { self.identifiers.push_index(index) }

    /// Pops the identifier stack.
    pub fn pop_identifier_stack(&mut self) { self.identifiers.pop() }

    /// Concatenates `name` with the identifier stack suffix.
    pub fn resolve_identifier(&self, name: &str) -> String { self.identifiers.resolve(name) }

    /// Starts a new row.
    pub fn next_row(&mut self) { self.layout.next_row() }

    /// Moves the cursor right by `amount` unzoomed pixels.
    pub fn indent(&mut self, amount: f32) { self.layout.indent(amount * self.window.zoom.x) }

    /// Switches the draw mode.
    pub fn set_draw_mode(&mut self, mode: DrawMode, target: usize) { self.layout.set_draw_mode(mode, target) }

    /// Multiplies an unzoomed size by the window zoom.
    pub fn zoomed(&self, v: Vec2f) -> Vec2f { vec2f(v.x * self.window.zoom.x, v.y * self.window.zoom.y) }

    /// Box of the next element: absolute with [`TransformOption`], otherwise placed by the layout
    /// with [`ScaleOption`] or `default_scale` (both unzoomed).
    pub fn element_box(&mut self, config: &DrawConfig, default_scale: Vec2f) -> UIBox {
        if let Some(t) = config.get::<TransformOption>() {
            let origin = self.layout.origin();
            let position = self.zoomed(t.position);
            return UIBox::from_parts(vec2f(origin.x + position.x, origin.y + position.y), self.zoomed(t.scale));
        }
        let scale = config.get::<ScaleOption>().map(|s| s.0).unwrap_or(default_scale);
        let scale = self.zoomed(scale);
        self.layout.place(scale, config.behaviour)
    }

    /// Records a drawn box. Absolutely placed boxes only grow the render bounds.
    pub fn finalize_rectangle(&mut self, placed: &UIBox, config: &DrawConfig) {
        if config.has(TransformOption::FLAG) {
            if !config.behaviour.is_not_bounding() {
                self.layout.include_bounds(placed);
            }
            return;
        }
        self.layout.finalize_rectangle(placed, config.behaviour);
    }

    /// Returns `true` when geometry for `rect` should be emitted.
    pub fn is_visible(&self, rect: &UIBox, config: &DrawConfig) -> bool { config.behaviour.is_not_validating() || self.layout.validate_position(rect) }

    /// Cached resource of `name` in this window, created by `init` the first time. The dynamic
    /// path is taken when the configuration carries [`crate::DrawBehaviour::DYNAMIC_RESOURCE`].
    pub fn resource<T: Any>(&mut self, name: &str, config: &DrawConfig, init: impl FnOnce(&str) -> T) -> ResourceHandle {
        let identifier = self.identifiers.resolve(name);
        self.drawn.record(&identifier);
        if config.behaviour.is_dynamic() {
            self.window.resources.add_dynamic(&identifier, init)
        } else {
            self.window.resources.get_or_create(&identifier, init)
        }
    }

    /// Resource table of this window.
    pub fn resources_mut(&mut self) -> &mut WindowResources { &mut self.window.resources }

    /// Typed resource of this window.
    ///
    /// Panics when the resource does not exist.
    pub fn expect_resource<T: Any>(&mut self, handle: ResourceHandle) -> &mut T { self.window.resources.expect_mut::<T>(handle) }

    /// Resource of another window; `None` when that window or resource is gone.
    pub fn foreign_resource_mut<T: Any>(&mut self, window: WindowHandle, handle: ResourceHandle) -> Option<&mut T> {
        if window == self.handle {
            return self.window.resources.get_mut::<T>(handle);
        }
        self.others.get_mut(window).ok().and_then(|w| w.resources.get_mut::<T>(handle))
    }

    /// Returns `true` while `window` is alive.
    pub fn window_exists(&self, window: WindowHandle) -> bool { window == self.handle || self.others.contains(window) }

    /// Screen region of another window.
    pub fn window_region_of(&self, window: WindowHandle) -> Option<UIBox> {
        if window == self.handle {
            return Some(self.window.region);
        }
        self.others.get(window).ok().map(|w| w.region())
    }

    /// Geometry sink of this window.
    pub fn sink_mut(&mut self) -> &mut GeometrySink { &mut self.window.sink }

    /// Handler registry of this window.
    pub fn handlers_mut(&mut self) -> &mut HandlerRegistry { &mut self.window.handlers }

    /// Defers `f` until the end of the frame.
    pub fn push_system_handler(&mut self, f: impl FnOnce(&mut UiSystem) + 'static) {
        let f: SystemHandler = Box::new(f);
        self.services.system_queue.push(f);
    }

    /// Registers a handler called every frame until it retires.
    pub fn add_frame_handler(&mut self, handler: ActionHandler) { self.services.add_frame_handler(self.handle, handler) }

    /// Returns `true` when the persistent general handler is owned by `owner` in this window.
    pub fn is_focused(&self, owner: ResourceHandle) -> bool { self.services.is_general(self.handle, Some(owner)) }

    /// Text size, spacing and color for `config`, unzoomed.
    pub fn text_params(&self, config: &DrawConfig) -> TextOption {
        let style = &self.services.style;
        config.get::<TextOption>().copied().unwrap_or(TextOption { size: style.font_size, spacing: style.character_spacing, color: style.color(ThemeColor::Text) })
    }

    /// Background quad plus the optional border of `config`.
    pub fn draw_background(&mut self, rect: &UIBox, color: Color, config: &DrawConfig) {
        let phase = config.phase();
        if !config.behaviour.has_no_background() {
            self.window.sink.push_solid_quad(phase, rect, color);
        }
        if let Some(border) = config.get::<BorderOption>() {
            let t = border.thickness * self.window.zoom.x;
            let edges = [
                UIBox::new(rect.x(), rect.y(), rect.width(), t),
                UIBox::new(rect.x(), rect.bottom() - t, rect.width(), t),
                UIBox::new(rect.x(), rect.y() + t, t, rect.height() - 2.0 * t),
                UIBox::new(rect.right() - t, rect.y() + t, t, rect.height() - 2.0 * t),
            ];
            for edge in edges.iter() {
                self.window.sink.push_solid_quad(phase, edge, border.color);
            }
        }
    }

    /// Registers the hover highlight and click callback carried by `config` for `rect`.
    pub fn register_config_handlers(&mut self, rect: &UIBox, config: &DrawConfig) {
        let phase = config.phase();
        if let Some(hover) = config.get::<HoverableOption>() {
            self.window.handlers.add_default_hoverable(*rect, hover.color, hover.percentage, phase);
        }
        if let Some(CallbackOption(handler)) = config.get::<CallbackOption>() {
            self.window.handlers.add_clickable(*rect, handler.clone().with_phase(phase));
        }
    }

    /// Solid quad of the configured color, with optional hover highlight and click callback.
    pub fn solid_color_rectangle(&mut self, config: &DrawConfig) -> UIBox {
        let default = self.services.style.default_element_scale;
        let rect = self.element_box(config, default);
        if self.is_visible(&rect, config) {
            let color = config.color_or(self.services.style.color(ThemeColor::Element));
            self.draw_background(&rect, color, config);
            self.register_config_handlers(&rect, config);
        }
        self.finalize_rectangle(&rect, config);
        rect
    }

    /// Textured quad sampling `texture` between the given UV corners.
    pub fn sprite_rectangle(&mut self, config: &DrawConfig, texture: TextureId, uv_top_left: Vec2f, uv_bottom_right: Vec2f) -> UIBox {
        let default = self.services.style.default_element_scale;
        let rect = self.element_box(config, default);
        if self.is_visible(&rect, config) {
            let color = config.color_or(Color { r: 255, g: 255, b: 255, a: 255 });
            self.window.sink.push_sprite(config.phase(), &rect, uv_top_left, uv_bottom_right, color, texture);
            self.register_config_handlers(&rect, config);
        }
        self.finalize_rectangle(&rect, config);
        rect
    }

    /// Text element whose shaped geometry is cached under `name`. The box fits the text plus the
    /// element padding unless the configuration fixes a scale.
    pub fn text_label(&mut self, name: &str, text: &str, config: &DrawConfig) -> UIBox {
        let handle = self.resource(name, config, |_| CachedText::default());
        let params = self.text_params(config);
        let glyphs = self.services.glyphs.clone();
        let zoom = self.window.zoom;
        let epoch = self.window.resources.epoch();
        let span = match self.window.resources.get_mut::<CachedText>(handle) {
            Some(cached) => {
                cached.sync(glyphs.as_ref(), text, params.size, params.spacing, params.color, zoom, epoch);
                cached.span()
            }
            None => Vec2f::default(),
        };
        let padding = self.services.style.element_padding;
        let unzoomed = vec2f(span.x / zoom.x + padding.x * 2.0, span.y / zoom.y + padding.y * 2.0);
        let rect = self.element_box(config, unzoomed);
        if self.is_visible(&rect, config) {
            if let Some(color) = config.get::<ColorOption>() {
                self.draw_background(&rect, color.0, config);
            }
            self.emit_text::<CachedText>(handle, &rect, config.alignment(), config.phase(), None, |c| c);
            self.register_config_handlers(&rect, config);
        }
        self.finalize_rectangle(&rect, config);
        rect
    }

    /// Brings the [`CachedText`] selected from resource `T` up to date with `text`.
    pub fn sync_text<T: Any>(&mut self, handle: ResourceHandle, text: &str, params: TextOption, select: impl FnOnce(&mut T) -> &mut CachedText) -> Vec2f {
        let glyphs = self.services.glyphs.clone();
        let zoom = self.window.zoom;
        let epoch = self.window.resources.epoch();
        match self.window.resources.get_mut::<T>(handle) {
            Some(state) => {
                let cached = select(state);
                cached.sync(glyphs.as_ref(), text, params.size, params.spacing, params.color, zoom, epoch);
                cached.span()
            }
            None => Vec2f::default(),
        }
    }

    /// Appends the cached text of resource `T` aligned inside `rect` minus the element padding.
    pub fn emit_text<T: Any>(
        &mut self,
        handle: ResourceHandle,
        rect: &UIBox,
        alignment: Alignment,
        phase: DrawPhase,
        color: Option<Color>,
        select: impl FnOnce(&mut T) -> &mut CachedText,
    ) {
        let padding = self.zoomed(self.services.style.element_padding);
        let window = &mut *self.window;
        let Some(state) = window.resources.get_mut::<T>(handle) else {
            return;
        };
        let cached = select(state);
        let inner = UIBox::new(rect.x() + padding.x, rect.y() + padding.y, (rect.width() - padding.x * 2.0).max(0.0), (rect.height() - padding.y * 2.0).max(0.0));
        let offset = alignment.offset(inner.scale, cached.span());
        let origin = vec2f(inner.x() + offset.x, inner.y() + offset.y);
        match color {
            Some(color) => window.sink.push_text_colored(phase, cached.vertices(), origin, color),
            None => window.sink.push_text(phase, cached.vertices(), origin),
        }
    }

    /// Stores the render bounds, clamps the scroll offset and draws the render-region sliders.
    ///
    /// Panics when the identifier stack is unbalanced.
    pub(crate) fn finish(mut self) {
        assert!(self.identifiers.depth() == 0, "identifier stack unbalanced at the end of the frame: {} segment(s) left", self.identifiers.depth());
        let zoom = self.window.zoom;
        let padding = vec2f(self.services.style.region_padding.x * zoom.x, self.services.style.region_padding.y * zoom.y);
        self.window.render_bounds = self.layout.render_bounds();
        let max = self.window.max_render_offset(padding);
        let offset = self.window.render_offset;
        self.window.render_offset = vec2f(offset.x.clamp(0.0, max.x), offset.y.clamp(0.0, max.y));
        if max.y > 0.0 {
            self.region_slider(ScrollAxis::Vertical, padding);
        }
        if max.x > 0.0 {
            self.region_slider(ScrollAxis::Horizontal, padding);
        }
    }

    fn region_slider(&mut self, axis: ScrollAxis, padding: Vec2f) {
        let style = &self.services.style;
        let (size, thumb_min) = (style.scrollbar_size * self.window.zoom.x, style.scrollbar_thumb_min);
        let (base_color, thumb_color) = (style.color(ThemeColor::ScrollBase), style.color(ThemeColor::ScrollThumb));
        let region = self.window.region;
        let extent = self.window.render_bounds.extent();
        let content = axis.along(extent) + axis.along(padding) * 2.0;
        let view = axis.along(region.scale);
        let scroll = axis.along(self.window.render_offset);
        let base = scrollbar_base(axis, region, size);
        let thumb = scrollbar_thumb(axis, base, view, content, scroll, thumb_min);
        self.window.sink.push_solid_quad(DrawPhase::System, &base, base_color);
        self.window.sink.push_solid_quad(DrawPhase::System, &thumb, thumb_color);

        let name = match axis {
            ScrollAxis::Vertical => "##scroll-v",
            ScrollAxis::Horizontal => "##scroll-h",
        };
        let owner = self.window.resources.get_or_create(name, |_| ());
        let drag = ActionHandler::new(move |ctx| {
            if ctx.mode() == ActionMode::CleanUp {
                return;
            }
            if !ctx.input().mouse_down.is_left() {
                ctx.release_general_handler();
                return;
            }
            let amount = scrollbar_drag_delta(axis, ctx.input().mouse_delta, content, ctx.bounds());
            let delta = match axis {
                ScrollAxis::Vertical => vec2f(0.0, amount),
                ScrollAxis::Horizontal => vec2f(amount, 0.0),
            };
            if let Some(window) = ctx.window_mut() {
                window.scroll_by(delta, padding);
            }
        })
        .with_phase(DrawPhase::System)
        .with_owner(owner);
        self.window.handlers.add_general(base, drag);
        self.window.handlers.add_clickable(base, ActionHandler::new(|_| {}).with_phase(DrawPhase::System));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::system;
    use crate::{DrawBehaviour, WindowDescriptor};
    use std::cell::RefCell;

    #[test]
    fn label_is_shaped_once_and_rescaled_on_zoom() {
        let mut sys = system();
        let w = sys.create_window(WindowDescriptor::new("labels", UIBox::new(0.0, 0.0, 400.0, 300.0), |d| {
            d.text_label("title", "hello", &DrawConfig::new());
        }));
        sys.frame(0.016);
        sys.frame(0.016);
        let shapes = |sys: &UiSystem| {
            let window = sys.window(w).ok()?;
            let handle = window.resources().find("title")?;
            window.resources().get::<CachedText>(handle).map(|c| (c.shape_count(), c.span().x))
        };
        assert_eq!(shapes(&sys), Some((1, 40.0)));
        assert!(sys.set_window_zoom(w, vec2f(2.0, 2.0)).is_ok());
        sys.frame(0.016);
        assert_eq!(shapes(&sys), Some((1, 80.0)));
        assert!(sys.set_window_region(w, UIBox::new(10.0, 10.0, 400.0, 300.0)).is_ok());
        sys.frame(0.016);
        assert_eq!(shapes(&sys).map(|s| s.0), Some(2));
    }

    #[test]
    fn invisible_elements_advance_without_geometry() {
        let mut sys = system();
        let w = sys.create_window(WindowDescriptor::new("cull", UIBox::new(0.0, 0.0, 200.0, 50.0), |d| {
            d.set_draw_mode(DrawMode::NextRow, 0);
            for _ in 0..5 {
                d.solid_color_rectangle(&DrawConfig::new().with(ColorOption(crate::color(255, 0, 0, 255))));
            }
        }));
        sys.frame(0.016);
        let window = sys.window(w).ok();
        let Some(window) = window else { panic!("window missing") };
        assert_eq!(window.sink().phase(DrawPhase::Normal).solid_count(), 2 * crate::QUAD_VERTICES);
        assert_eq!(window.render_bounds().extent().y, 24.0 * 5.0 + 6.0 * 4.0);
        assert!(window.sink().phase(DrawPhase::System).solid_count() > 0);
    }

    #[test]
    fn transform_places_relative_to_origin() {
        let placed = Rc::new(RefCell::new(UIBox::default()));
        let out = placed.clone();
        let mut sys = system();
        sys.create_window(WindowDescriptor::new("abs", UIBox::new(100.0, 100.0, 200.0, 200.0), move |d| {
            let config = DrawConfig::new().with(TransformOption { position: vec2f(10.0, 20.0), scale: vec2f(30.0, 40.0) });
            *out.borrow_mut() = d.solid_color_rectangle(&config);
            assert_eq!(d.cursor().current_x, 108.0);
        }));
        sys.frame(0.016);
        assert_eq!(*placed.borrow(), UIBox::new(118.0, 128.0, 30.0, 40.0));
    }

    #[test]
    fn dynamic_resources_expire_when_not_drawn() {
        let draw = Rc::new(RefCell::new(true));
        let flag = draw.clone();
        let mut sys = system();
        let w = sys.create_window(WindowDescriptor::new("dyn", UIBox::new(0.0, 0.0, 200.0, 200.0), move |d| {
            if *flag.borrow() {
                d.text_label("transient", "x", &DrawConfig::new().behaviour(DrawBehaviour::DYNAMIC_RESOURCE));
            }
        }));
        sys.frame(0.016);
        let alive = |sys: &UiSystem| sys.window(w).map(|w| w.resources().find("transient").is_some()).unwrap_or(false);
        assert!(alive(&sys));
        *draw.borrow_mut() = false;
        for _ in 0..sys.style().dynamic_eviction_frames + 1 {
            sys.frame(0.016);
        }
        assert!(!alive(&sys));
    }

    #[test]
    #[should_panic(expected = "identifier stack unbalanced")]
    fn unbalanced_stack_panics_at_finish() {
        let mut sys = system();
        sys.create_window(WindowDescriptor::new("bad", UIBox::new(0.0, 0.0, 100.0, 100.0), |d| d.push_identifier_stack("row")));
        sys.frame(0.016);
    }

    #[test]
    fn border_adds_four_quads() {
        let mut sys = system();
        let w = sys.create_window(WindowDescriptor::new("border", UIBox::new(0.0, 0.0, 200.0, 200.0), |d| {
            d.solid_color_rectangle(&DrawConfig::new().with(BorderOption { thickness: 1.0, color: crate::color(0, 0, 0, 255) }));
        }));
        sys.frame(0.016);
        assert_eq!(sys.window(w).map(|w| w.sink().phase(DrawPhase::Normal).solid_count()).ok(), Some(5 * crate::QUAD_VERTICES));
    }
}
