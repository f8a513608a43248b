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
//! Menus: a header box opening a cascade of popup windows. Each popup lists the rows of one
//! level; rows may fire an action or open a nested level to the right of their popup.

use crate::*;

#[derive(Clone, Debug, Default)]
/// Rows of one menu level.
pub struct MenuDescriptor {
    rows: Vec<MenuRow>,
}

#[derive(Clone, Debug)]
/// One row of a [`MenuDescriptor`].
pub struct MenuRow {
    /// Displayed text.
    pub label: String,
    /// Fired when the row is clicked; the cascade closes afterwards.
    pub action: Option<ActionHandler>,
    /// Level opened from this row.
    pub submenu: Option<MenuDescriptor>,
    /// Unavailable rows are drawn dimmed and ignore the pointer.
    pub available: bool,
}

impl MenuDescriptor {
    /// Empty menu.
    pub fn new() -> Self { Self::default() }

    /// Appends a row firing `action` when clicked.
    pub fn row(mut self, label: &str, action: ActionHandler) -> Self {
        self.rows.push(MenuRow { label: label.to_string(), action: Some(action), submenu: None, available: true });
        self
    }

    /// Appends a row opening the level built by `build`.
    pub fn submenu(mut self, label: &str, build: impl FnOnce(MenuDescriptor) -> MenuDescriptor) -> Self {
        self.rows.push(MenuRow { label: label.to_string(), action: None, submenu: Some(build(MenuDescriptor::new())), available: true });
        self
    }

    /// Appends a dimmed row that cannot be interacted with.
    pub fn unavailable(mut self, label: &str) -> Self {
        self.rows.push(MenuRow { label: label.to_string(), action: None, submenu: None, available: false });
        self
    }

    /// Rows of this level.
    pub fn rows(&self) -> &[MenuRow] { &self.rows }

    /// Level reached by following the submenu rows at `path`.
    pub fn at(&self, path: &[usize]) -> Option<&MenuDescriptor> { path.iter().try_fold(self, |menu, i| menu.rows.get(*i)?.submenu.as_ref()) }
}

#[derive(Copy, Clone, Debug)]
struct MenuLevel {
    popup: WindowHandle,
    parent_row: Option<usize>,
    hover_row: Option<usize>,
    hover_frame: u64,
    hover_time: f32,
    open_row: Option<usize>,
}

#[derive(Clone, Debug)]
/// Persistent state of a menu: its descriptor plus the popup windows of the open cascade,
/// indexed by depth. The state stays referenced while the cascade is open.
pub struct MenuState {
    header: CachedText,
    descriptor: MenuDescriptor,
    levels: Vec<MenuLevel>,
}

impl MenuState {
    fn new(descriptor: MenuDescriptor) -> Self { Self { header: CachedText::default(), descriptor, levels: Vec::new() } }

    /// Menu rows.
    pub fn descriptor(&self) -> &MenuDescriptor { &self.descriptor }

    /// Returns `true` while at least the root popup is open.
    pub fn is_open(&self) -> bool { !self.levels.is_empty() }

    /// Popup windows of the open cascade, root first.
    pub fn popups(&self) -> impl Iterator<Item = WindowHandle> + '_ { self.levels.iter().map(|l| l.popup) }

    fn path(&self, depth: usize) -> Vec<usize> { self.levels.iter().take(depth + 1).skip(1).filter_map(|l| l.parent_row).collect() }

    fn rows_at(&self, depth: usize) -> Option<&[MenuRow]> { self.descriptor.at(&self.path(depth)).map(|m| m.rows()) }
}

fn close_menu_from(sys: &mut UiSystem, menu: PopupOwner, depth: usize) {
    let Some(state) = sys.resource_mut::<MenuState>(menu.window, menu.resource) else {
        return;
    };
    if state.levels.len() <= depth {
        return;
    }
    let closed: Vec<WindowHandle> = state.levels.drain(depth..).map(|l| l.popup).collect();
    if let Some(parent) = state.levels.last_mut() {
        parent.open_row = None;
    }
    log::debug!("menu {:?} closed from depth {} ({} popup(s))", menu.resource, depth, closed.len());
    for popup in closed.into_iter().rev() {
        let _ = sys.destroy_window(popup);
    }
    if depth == 0 {
        if let Ok(window) = sys.window_mut(menu.window) {
            window.resources_mut().release_reference(menu.resource);
        }
    }
}

fn spawn_level(sys: &mut UiSystem, menu: PopupOwner, depth: usize, parent_row: Option<usize>, anchor: Vec2f) {
    let capacity = sys.style().popup_window_capacity;
    let glyphs = sys.services.glyphs.clone();
    let style = sys.style();
    let (font_size, spacing, padding, element_padding, default, gap) =
        (style.font_size, style.character_spacing, style.region_padding, style.element_padding, style.default_element_scale, style.row_offset);
    let screen = sys.screen();
    let Some(name) = sys.window(menu.window).ok().and_then(|w| w.resources().identifier(menu.resource)).map(|id| format!("{}##menu{}", id, depth)) else {
        return;
    };
    let Some(state) = sys.resource_mut::<MenuState>(menu.window, menu.resource) else {
        return;
    };
    if state.levels.len() != depth {
        return;
    }
    assert!(depth < capacity, "menu cascade exceeds {} popup windows", capacity);
    let mut path = state.path(depth.saturating_sub(1));
    path.extend(parent_row);
    let Some(labels) = state.descriptor.at(&path).map(|m| m.rows.iter().map(|r| r.label.clone()).collect::<Vec<_>>()) else {
        return;
    };

    let widest = labels.iter().map(|l| text_span(glyphs.as_ref(), l, font_size, spacing).x).fold(0.0, f32::max);
    let width = (widest + element_padding.x * 2.0).max(default.x) + padding.x * 2.0;
    let rows = labels.len() as f32;
    let height = (rows * (default.y + gap) - gap).max(0.0) + padding.y * 2.0;
    let x = anchor.x.min(screen.right() - width).max(screen.x());
    let y = anchor.y.min(screen.bottom() - height).max(screen.y());
    let region = UIBox::new(x, y, width, height);

    let popup = sys.create_window(WindowDescriptor::new(&name, region, move |d| draw_level(d, menu, depth)).popup(menu));
    let Some(state) = sys.resource_mut::<MenuState>(menu.window, menu.resource) else {
        let _ = sys.destroy_window(popup);
        return;
    };
    state.levels.push(MenuLevel { popup, parent_row, hover_row: None, hover_frame: 0, hover_time: 0.0, open_row: None });
    log::debug!("menu {:?} opened depth {} at {:?}", menu.resource, depth, region);
    if depth == 0 {
        if let Ok(window) = sys.window_mut(menu.window) {
            window.resources_mut().acquire_reference(menu.resource);
        }
    }
}

fn open_submenu(sys: &mut UiSystem, menu: PopupOwner, depth: usize, row: usize, anchor: Vec2f) {
    let Some(state) = sys.resource_mut::<MenuState>(menu.window, menu.resource) else {
        return;
    };
    let Some(level) = state.levels.get(depth) else {
        return;
    };
    if level.open_row == Some(row) && state.levels.len() > depth + 1 {
        return;
    }
    close_menu_from(sys, menu, depth + 1);
    if let Some(level) = sys.resource_mut::<MenuState>(menu.window, menu.resource).and_then(|s| s.levels.get_mut(depth)) {
        level.open_row = Some(row);
    }
    spawn_level(sys, menu, depth + 1, Some(row), anchor);
}

fn row_hover(menu: PopupOwner, depth: usize, index: usize, has_submenu: bool, overlay: Color) -> ActionHandler {
    ActionHandler::new(move |ctx| {
        let bounds = ctx.bounds();
        let (frame, dt, threshold) = (ctx.frame(), ctx.delta_time(), ctx.style().menu_hover_threshold);
        let right = ctx.window_region(ctx.window()).map(|r| r.right()).unwrap_or(bounds.right());
        if let Some(window) = ctx.window_mut() {
            window.sink.push_solid_quad(DrawPhase::Late, &bounds, overlay);
        }
        let Some(level) = ctx.foreign_resource_mut::<MenuState>(menu.window, menu.resource).and_then(|s| s.levels.get_mut(depth)) else {
            return;
        };
        if level.hover_row != Some(index) || level.hover_frame + 1 != frame {
            level.hover_row = Some(index);
            level.hover_time = 0.0;
        }
        level.hover_frame = frame;
        level.hover_time += dt;
        if level.hover_time < threshold {
            return;
        }
        let anchor = vec2f(right, bounds.y());
        if has_submenu && level.open_row != Some(index) {
            ctx.push_system_handler(move |sys| open_submenu(sys, menu, depth, index, anchor));
        } else if !has_submenu && level.open_row.is_some() {
            ctx.push_system_handler(move |sys| close_menu_from(sys, menu, depth + 1));
        }
    })
}

fn row_click(menu: PopupOwner, depth: usize, index: usize) -> ActionHandler {
    ActionHandler::new(move |ctx| {
        let Some((action, has_submenu)) = ctx
            .foreign_resource_mut::<MenuState>(menu.window, menu.resource)
            .and_then(|s| s.rows_at(depth).and_then(|rows| rows.get(index)).map(|r| (r.action.clone(), r.submenu.is_some())))
        else {
            return;
        };
        if has_submenu {
            let bounds = ctx.bounds();
            let right = ctx.window_region(ctx.window()).map(|r| r.right()).unwrap_or(bounds.right());
            ctx.push_system_handler(move |sys| open_submenu(sys, menu, depth, index, vec2f(right, bounds.y())));
            return;
        }
        if let Some(action) = action {
            action.call(ctx);
        }
        ctx.push_system_handler(move |sys| close_menu_from(sys, menu, 0));
    })
}

fn draw_level(d: &mut UIDrawer<'_>, menu: PopupOwner, depth: usize) {
    let me = d.window_handle();
    let rows = d.foreign_resource_mut::<MenuState>(menu.window, menu.resource).and_then(|state| {
        if state.levels.get(depth).map(|l| l.popup) != Some(me) {
            return None;
        }
        state.rows_at(depth).map(|rows| rows.iter().map(|r| (r.label.clone(), r.submenu.is_some(), r.available)).collect::<Vec<_>>())
    });
    let Some(rows) = rows else {
        log::warn!("menu popup {:?} no longer belongs to an open level; closing it", me);
        d.push_system_handler(move |sys| {
            let _ = sys.destroy_window(me);
        });
        return;
    };

    let style = d.style();
    let (background, hover, text, dimmed) =
        (style.color(ThemeColor::MenuBackground), style.color(ThemeColor::MenuHover), style.color(ThemeColor::Text), style.color(ThemeColor::Unavailable));
    let (size, spacing, row_height) = (style.font_size, style.character_spacing, style.default_element_scale.y);
    let region = d.region();
    d.sink_mut().push_solid_quad(DrawPhase::Normal, &region, background);
    d.set_draw_mode(DrawMode::NextRow, 0);
    let width = d.layout().content_width() / d.zoom().x;
    for (index, (label, has_submenu, available)) in rows.iter().enumerate() {
        let color = if *available { text } else { dimmed };
        let config = DrawConfig::new()
            .with(ScaleOption(vec2f(width, row_height)))
            .with(Alignment::new(AlignX::Left, AlignY::Center))
            .with(TextOption { size, spacing, color });
        d.push_identifier_index(index);
        let rect = d.text_label("row", label, &config);
        if *has_submenu {
            let h = rect.height();
            let marker = UIBox::new(rect.right() - h * 0.5, rect.y() + h * 0.35, h * 0.2, h * 0.3);
            d.sink_mut().push_solid_quad(DrawPhase::Normal, &marker, color);
        }
        if *available {
            d.handlers_mut().add_hoverable(rect, row_hover(menu, depth, index, *has_submenu, hover));
            d.handlers_mut().add_clickable(rect, row_click(menu, depth, index));
        }
        d.pop_identifier_stack();
    }
}

/// Closes the whole cascade when the left button goes down outside the header and every popup.
fn outside_click_closer(menu: PopupOwner, header: UIBox) -> ActionHandler {
    ActionHandler::new(move |ctx| {
        let popups: Vec<WindowHandle> = ctx.foreign_resource_mut::<MenuState>(menu.window, menu.resource).map(|s| s.popups().collect()).unwrap_or_default();
        if popups.is_empty() {
            ctx.retire();
            return;
        }
        if !ctx.input().mouse_pressed.is_left() {
            return;
        }
        let mouse = ctx.input().mouse_pos;
        let inside = header.contains(mouse) || popups.iter().any(|p| ctx.window_region(*p).map(|r| r.contains(mouse)).unwrap_or(false));
        if !inside {
            ctx.push_system_handler(move |sys| close_menu_from(sys, menu, 0));
            ctx.retire();
        }
    })
}

fn header_handler(owner: ResourceHandle, phase: DrawPhase) -> ActionHandler {
    ActionHandler::new(move |ctx| {
        let menu = PopupOwner { window: ctx.window(), resource: owner };
        let Some(open) = ctx.resource_mut::<MenuState>(owner).map(|s| s.is_open()) else {
            return;
        };
        if open {
            ctx.push_system_handler(move |sys| close_menu_from(sys, menu, 0));
            return;
        }
        let bounds = ctx.bounds();
        ctx.add_frame_handler(outside_click_closer(menu, bounds));
        ctx.push_system_handler(move |sys| spawn_level(sys, menu, 0, None, vec2f(bounds.x(), bounds.bottom())));
    })
    .with_phase(phase)
    .with_owner(owner)
}

impl UIDrawer<'_> {
    /// Menu header labelled `label`. `init` builds the rows the first time `name` is seen.
    /// Returns `true` while the cascade is open.
    pub fn menu(&mut self, name: &str, label: &str, init: impl FnOnce() -> MenuDescriptor, config: &DrawConfig) -> bool {
        let handle = self.resource(name, config, |_| MenuState::new(init()));
        let popups: Vec<WindowHandle> = self.expect_resource::<MenuState>(handle).popups().collect();
        if let Some(gone) = popups.iter().position(|p| !self.window_exists(*p)) {
            let state = self.expect_resource::<MenuState>(handle);
            state.levels.truncate(gone);
            if let Some(parent) = state.levels.last_mut() {
                parent.open_row = None;
            }
            for popup in popups[gone..].iter().copied().filter(|p| self.window_exists(*p)).collect::<Vec<_>>() {
                self.push_system_handler(move |sys| {
                    let _ = sys.destroy_window(popup);
                });
            }
            if gone == 0 {
                self.window.resources.release_reference(handle);
            }
        }
        let open = self.expect_resource::<MenuState>(handle).is_open();

        let params = self.text_params(config);
        let span = self.sync_text::<MenuState>(handle, label, params, |s| &mut s.header);
        let fitted = self.fitted_scale(span);
        let rect = self.element_box(config, fitted);
        if self.is_visible(&rect, config) {
            let phase = config.phase();
            let base = if open { ThemeColor::ButtonActive } else { ThemeColor::Button };
            let color = config.color_or(self.services.style.color(base));
            let hover = self.services.style.hover_percentage;
            self.draw_background(&rect, color, config);
            self.emit_text::<MenuState>(handle, &rect, super::centered_or_configured(config), phase, None, |s| &mut s.header);
            self.window.handlers.add_default_clickable_hoverable(rect, header_handler(handle, phase), color, hover);
        }
        self.finalize_rectangle(&rect, config);
        open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::system;
    use std::cell::Cell;
    use std::rc::Rc;

    fn file_menu(fired: Rc<Cell<u32>>) -> MenuDescriptor {
        let fired = fired.clone();
        MenuDescriptor::new()
            .row("Open", ActionHandler::new(move |_| fired.set(fired.get() + 1)))
            .submenu("Recent", |m| m.row("a.txt", ActionHandler::new(|_| {})).row("b.txt", ActionHandler::new(|_| {})))
            .unavailable("Quit")
    }

    fn menu_system(region: UIBox, fired: Rc<Cell<u32>>) -> (UiSystem, WindowHandle) {
        let mut sys = system();
        let w = sys.create_window(WindowDescriptor::new("w", region, move |d| {
            let fired = fired.clone();
            d.menu("file", "File", move || file_menu(fired), &DrawConfig::new());
        }));
        (sys, w)
    }

    fn click(sys: &mut UiSystem, x: f32, y: f32) {
        sys.input().borrow_mut().mousedown(x, y, MouseButton::LEFT);
        sys.frame(0.016);
        sys.input().borrow_mut().mouseup(x, y, MouseButton::LEFT);
        sys.frame(0.016);
    }

    fn popups(sys: &UiSystem, w: WindowHandle) -> Vec<WindowHandle> {
        let Ok(window) = sys.window(w) else { return Vec::new() };
        let Some(handle) = window.resources().find("file") else { return Vec::new() };
        window.resources().get::<MenuState>(handle).map(|s| s.popups().collect()).unwrap_or_default()
    }

    #[test]
    fn hovering_a_submenu_row_spawns_one_clamped_child() {
        let (mut sys, w) = menu_system(UIBox::new(600.0, 0.0, 200.0, 300.0), Rc::new(Cell::new(0)));
        click(&mut sys, 620.0, 20.0);
        assert_eq!(popups(&sys, w).len(), 1);
        assert_eq!(sys.window_region(popups(&sys, w)[0]).ok(), Some(UIBox::new(608.0, 32.0, 136.0, 100.0)));

        sys.input().borrow_mut().mousemove(650.0, 82.0);
        for _ in 0..6 {
            sys.frame(0.1);
        }
        let open = popups(&sys, w);
        assert_eq!(open.len(), 2);
        let child = sys.window_region(open[1]).ok();
        assert_eq!(child, Some(UIBox::new(664.0, 70.0, 136.0, 70.0)));
        assert!(child.map(|r| r.right() <= sys.screen().right()).unwrap_or(false));

        for _ in 0..5 {
            sys.frame(0.1);
        }
        assert_eq!(popups(&sys, w), open);
        assert_eq!(sys.windows().len(), 3);
    }

    #[test]
    fn action_row_fires_and_closes_cascade() {
        let fired = Rc::new(Cell::new(0));
        let (mut sys, w) = menu_system(UIBox::new(0.0, 0.0, 300.0, 300.0), fired.clone());
        click(&mut sys, 20.0, 20.0);
        click(&mut sys, 20.0, 50.0);
        assert_eq!(fired.get(), 1);
        assert!(popups(&sys, w).is_empty());
        assert_eq!(sys.windows().len(), 1);
    }

    #[test]
    fn submenu_row_click_opens_immediately_and_unavailable_rows_ignore_clicks() {
        let fired = Rc::new(Cell::new(0));
        let (mut sys, w) = menu_system(UIBox::new(0.0, 0.0, 300.0, 300.0), fired.clone());
        click(&mut sys, 20.0, 20.0);
        click(&mut sys, 20.0, 80.0);
        assert_eq!(popups(&sys, w).len(), 2);
        click(&mut sys, 20.0, 110.0);
        assert_eq!(popups(&sys, w).len(), 2);
        assert_eq!(fired.get(), 0);
    }

    #[test]
    fn outside_click_closes_every_level() {
        let (mut sys, w) = menu_system(UIBox::new(0.0, 0.0, 300.0, 300.0), Rc::new(Cell::new(0)));
        click(&mut sys, 20.0, 20.0);
        click(&mut sys, 20.0, 80.0);
        click(&mut sys, 500.0, 500.0);
        assert!(popups(&sys, w).is_empty());
        assert_eq!(sys.windows().len(), 1);
    }

    #[test]
    fn descriptor_paths_follow_submenus() {
        let menu = file_menu(Rc::new(Cell::new(0)));
        assert_eq!(menu.at(&[]).map(|m| m.rows().len()), Some(3));
        assert_eq!(menu.at(&[1]).map(|m| m.rows()[1].label.as_str()), Some("b.txt"));
        assert!(menu.at(&[0]).is_none());
        assert!(!menu.rows()[2].available);
    }
}
