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
//! Combo box: a box showing the chosen item that opens a popup window listing every item.

use crate::*;

#[derive(Clone, Debug, Default)]
/// Persistent state of a combo box. It stays referenced while its popup is open.
pub struct ComboBox {
    label: CachedText,
    items: Vec<String>,
    popup: Option<WindowHandle>,
    pending: Option<usize>,
}

impl ComboBox {
    /// Popup window listing the items, while open.
    pub fn popup(&self) -> Option<WindowHandle> { self.popup }

    /// Returns `true` while the popup is open.
    pub fn is_open(&self) -> bool { self.popup.is_some() }
}

fn close_combo(sys: &mut UiSystem, window: WindowHandle, owner: ResourceHandle) {
    let Some(popup) = sys.resource_mut::<ComboBox>(window, owner).and_then(|s| s.popup.take()) else {
        return;
    };
    log::debug!("combo box popup {:?} closed", popup);
    let _ = sys.destroy_window(popup);
    if let Ok(w) = sys.window_mut(window) {
        w.resources_mut().release_reference(owner);
    }
}

fn draw_rows(d: &mut UIDrawer<'_>, window: WindowHandle, owner: ResourceHandle) {
    let Some(items) = d.foreign_resource_mut::<ComboBox>(window, owner).map(|s| s.items.clone()) else {
        let me = d.window_handle();
        log::warn!("combo box popup {:?} lost its owner; closing it", me);
        d.push_system_handler(move |sys| {
            let _ = sys.destroy_window(me);
        });
        return;
    };
    let style = d.style();
    let (background, hover, percentage, row_height) =
        (style.color(ThemeColor::MenuBackground), style.color(ThemeColor::MenuHover), style.hover_percentage, style.default_element_scale.y);
    let region = d.region();
    d.sink_mut().push_solid_quad(DrawPhase::Normal, &region, background);
    d.set_draw_mode(DrawMode::NextRow, 0);
    let width = d.layout().content_width() / d.zoom().x;
    for (index, item) in items.iter().enumerate() {
        let pick = ActionHandler::new(move |ctx| {
            if let Some(state) = ctx.foreign_resource_mut::<ComboBox>(window, owner) {
                state.pending = Some(index);
            }
            ctx.push_system_handler(move |sys| close_combo(sys, window, owner));
        });
        let config = DrawConfig::new()
            .with(ScaleOption(vec2f(width, row_height)))
            .with(Alignment::new(AlignX::Left, AlignY::Center))
            .with(HoverableOption { color: hover, percentage })
            .with(CallbackOption(pick));
        d.push_identifier_index(index);
        d.text_label("row", item, &config);
        d.pop_identifier_stack();
    }
}

/// Closes the popup when the left button goes down outside both the popup and the combo box.
fn outside_click_closer(owner: ResourceHandle, combo_bounds: UIBox) -> ActionHandler {
    ActionHandler::new(move |ctx| {
        let window = ctx.window();
        let Some(popup) = ctx.resource_mut::<ComboBox>(owner).map(|s| s.popup) else {
            ctx.retire();
            return;
        };
        let Some(popup) = popup else {
            ctx.retire();
            return;
        };
        let input = ctx.input();
        if !input.mouse_pressed.is_left() {
            return;
        }
        let mouse = input.mouse_pos;
        let inside_popup = ctx.window_region(popup).map(|r| r.contains(mouse)).unwrap_or(false);
        if !inside_popup && !combo_bounds.contains(mouse) {
            ctx.push_system_handler(move |sys| close_combo(sys, window, owner));
            ctx.retire();
        }
    })
}

fn toggle_handler(owner: ResourceHandle, phase: DrawPhase) -> ActionHandler {
    ActionHandler::new(move |ctx| {
        let window = ctx.window();
        let Some((open, count)) = ctx.resource_mut::<ComboBox>(owner).map(|s| (s.popup.is_some(), s.items.len())) else {
            return;
        };
        if open {
            ctx.push_system_handler(move |sys| close_combo(sys, window, owner));
            return;
        }
        let style = ctx.style();
        let (row, gap, padding) = (style.default_element_scale.y, style.row_offset, style.region_padding.y);
        let height = count as f32 * (row + gap) - gap + padding * 2.0;
        let (bounds, screen) = (ctx.bounds(), ctx.screen());
        let mut y = bounds.bottom();
        if y + height > screen.bottom() {
            y = (bounds.y() - height).max(screen.y());
        }
        let region = UIBox::new(bounds.x(), y, bounds.width(), height);
        let Some(resources) = ctx.resources_mut() else {
            return;
        };
        resources.acquire_reference(owner);
        let name = format!("{}##popup", resources.identifier(owner).unwrap_or_default());
        ctx.add_frame_handler(outside_click_closer(owner, bounds));
        ctx.push_system_handler(move |sys| {
            let descriptor = WindowDescriptor::new(&name, region, move |d| draw_rows(d, window, owner)).popup(PopupOwner { window, resource: owner });
            let popup = sys.create_window(descriptor);
            match sys.resource_mut::<ComboBox>(window, owner) {
                Some(state) => {
                    log::debug!("combo box popup {:?} opened at {:?}", popup, region);
                    state.popup = Some(popup);
                }
                None => {
                    let _ = sys.destroy_window(popup);
                }
            }
        });
    })
    .with_phase(phase)
    .with_owner(owner)
}

impl UIDrawer<'_> {
    /// Combo box bound to `selected`. A row picked in the popup is applied on the next draw;
    /// returns `true` when `selected` changed.
    pub fn combo_box(&mut self, name: &str, selected: &mut usize, items: &[&str], config: &DrawConfig) -> bool {
        let handle = self.resource(name, config, |_| ComboBox::default());
        let mut changed = false;
        let popup = {
            let state = self.expect_resource::<ComboBox>(handle);
            if let Some(pending) = state.pending.take() {
                if pending < items.len() && pending != *selected {
                    *selected = pending;
                    changed = true;
                }
            }
            if state.items.len() != items.len() || state.items.iter().zip(items).any(|(a, b)| a != b) {
                state.items = items.iter().map(|s| s.to_string()).collect();
            }
            state.popup
        };
        if let Some(popup) = popup {
            if !self.window_exists(popup) {
                self.expect_resource::<ComboBox>(handle).popup = None;
                self.window.resources.release_reference(handle);
            }
        }

        let label = items.get(*selected).copied().unwrap_or_default();
        let params = self.text_params(config);
        self.sync_text::<ComboBox>(handle, label, params, |s| &mut s.label);
        let style = &self.services.style;
        let (base, arrow_color, hover) = (style.color(ThemeColor::Button), style.color(ThemeColor::Text), style.hover_percentage);
        let default = style.default_element_scale;
        let rect = self.element_box(config, default);
        if self.is_visible(&rect, config) {
            let phase = config.phase();
            let color = config.color_or(base);
            self.draw_background(&rect, color, config);
            let h = rect.height();
            let arrow = UIBox::new(rect.right() - h * 0.6, rect.y() + h * 0.45, h * 0.3, h * 0.1);
            self.window.sink.push_solid_quad(phase, &arrow, arrow_color);
            let alignment = config.get::<Alignment>().copied().unwrap_or(Alignment::new(AlignX::Left, AlignY::Center));
            self.emit_text::<ComboBox>(handle, &rect, alignment, phase, None, |s| &mut s.label);
            self.window.handlers.add_default_clickable_hoverable(rect, toggle_handler(handle, phase), color, hover);
        }
        self.finalize_rectangle(&rect, config);
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::system;
    use std::cell::Cell;
    use std::rc::Rc;

    fn combo_system(region: UIBox, selected: Rc<Cell<usize>>) -> (UiSystem, WindowHandle) {
        let mut sys = system();
        let w = sys.create_window(WindowDescriptor::new("w", region, move |d| {
            let mut s = selected.get();
            d.combo_box("fruit", &mut s, &["apple", "pear", "plum"], &DrawConfig::new());
            selected.set(s);
        }));
        (sys, w)
    }

    fn click(sys: &mut UiSystem, x: f32, y: f32) {
        sys.input().borrow_mut().mousedown(x, y, MouseButton::LEFT);
        sys.frame(0.016);
        sys.input().borrow_mut().mouseup(x, y, MouseButton::LEFT);
        sys.frame(0.016);
    }

    fn combo_popup(sys: &UiSystem, w: WindowHandle) -> Option<Option<WindowHandle>> {
        let window = sys.window(w).ok()?;
        let handle = window.resources().find("fruit")?;
        Some(window.resources().get::<ComboBox>(handle)?.popup())
    }

    #[test]
    fn picking_a_row_updates_selection_and_closes() {
        let selected = Rc::new(Cell::new(0));
        let (mut sys, w) = combo_system(UIBox::new(0.0, 0.0, 300.0, 300.0), selected.clone());
        click(&mut sys, 20.0, 20.0);
        let Some(Some(popup)) = combo_popup(&sys, w) else { panic!("popup not open") };
        assert_eq!(sys.window_region(popup).ok(), Some(UIBox::new(8.0, 32.0, 120.0, 100.0)));
        click(&mut sys, 20.0, 80.0);
        assert_eq!(selected.get(), 1);
        assert!(sys.window(popup).is_err());
        assert_eq!(combo_popup(&sys, w), Some(None));
    }

    #[test]
    fn popup_flips_above_near_screen_bottom() {
        let (mut sys, w) = combo_system(UIBox::new(0.0, 500.0, 300.0, 100.0), Rc::new(Cell::new(0)));
        click(&mut sys, 20.0, 520.0);
        let Some(Some(popup)) = combo_popup(&sys, w) else { panic!("popup not open") };
        assert_eq!(sys.window_region(popup).ok(), Some(UIBox::new(8.0, 408.0, 120.0, 100.0)));
    }

    #[test]
    fn click_outside_closes_without_changing_selection() {
        let selected = Rc::new(Cell::new(2));
        let (mut sys, w) = combo_system(UIBox::new(0.0, 0.0, 300.0, 300.0), selected.clone());
        click(&mut sys, 20.0, 20.0);
        click(&mut sys, 250.0, 250.0);
        assert_eq!(combo_popup(&sys, w), Some(None));
        assert_eq!(selected.get(), 2);
        assert_eq!(sys.windows().len(), 1);
    }
}
