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
use std::ops::RangeInclusive;

use crate::*;

use super::centered_or_configured;

const ENTRY_CAPACITY: usize = 32;

#[derive(Clone, Debug, Default)]
/// Persistent state of a slider.
pub struct Slider {
    label: CachedText,
    pending: Option<f64>,
    editing: bool,
    entry_started: bool,
}

impl Slider {
    /// Returns `true` while the slider shows its text entry.
    pub fn is_editing(&self) -> bool { self.editing }
}

fn snap(value: f64, low: f64, high: f64, step: f64) -> f64 {
    let v = if step > 0.0 { low + ((value - low) / step).round() * step } else { value };
    v.clamp(low.min(high), high.max(low))
}

fn drag_handler(owner: ResourceHandle, low: f64, high: f64, step: f64, handle_width: f32, phase: DrawPhase) -> ActionHandler {
    ActionHandler::new(move |ctx| {
        if ctx.mode() == ActionMode::CleanUp {
            return;
        }
        let input = ctx.input();
        let (pressed, down, shift, mouse) = (input.mouse_pressed.is_left(), input.mouse_down.is_left(), input.key_mods.is_shift(), input.mouse_pos);
        let bounds = ctx.bounds();
        if pressed && shift {
            if let Some(state) = ctx.resource_mut::<Slider>(owner) {
                state.editing = true;
                state.entry_started = false;
            }
            ctx.release_general_handler();
            return;
        }
        if !down {
            ctx.release_general_handler();
            return;
        }
        let track = (bounds.width() - handle_width).max(1.0);
        let t = ((mouse.x - bounds.x() - handle_width * 0.5) / track).clamp(0.0, 1.0) as f64;
        if let Some(state) = ctx.resource_mut::<Slider>(owner) {
            state.pending = Some(snap(low + t * (high - low), low, high, step));
        }
    })
    .with_phase(phase)
    .with_owner(owner)
}

impl UIDrawer<'_> {
    /// Horizontal slider bound to `value`. Dragging moves the value; a shift-press switches to a
    /// text entry whose commit is parsed and clamped. Returns `true` when `value` changed.
    pub fn slider<T: InputNumber>(&mut self, name: &str, value: &mut T, range: RangeInclusive<T>, step: T, config: &DrawConfig) -> bool {
        let handle = self.resource(name, config, |_| Slider::default());
        let (low, high) = (range.start().to_f64(), range.end().to_f64());
        let precision = self.services.style.number_precision;
        let mut changed = false;

        let (pending, editing, entry_started) = {
            let state = self.expect_resource::<Slider>(handle);
            (state.pending.take(), state.editing, state.entry_started)
        };
        if let Some(pending) = pending {
            let next = clamp_number(T::from_f64(pending), &range);
            if next != *value {
                *value = next;
                changed = true;
            }
        }

        if editing {
            let entry = self.resource(&format!("{}##entry", name), config, |_| TextInput::new(ENTRY_CAPACITY).with_filter(T::accepts));
            if !entry_started {
                let text = value.format(precision);
                let glyphs = self.glyphs();
                self.expect_resource::<TextInput>(entry).set_text(glyphs.as_ref(), &text);
                self.expect_resource::<Slider>(handle).entry_started = true;
            }
            if let Some(committed) = self.text_field(entry, config, None, !entry_started) {
                match parse_clamped(&committed, &range) {
                    Some(parsed) if parsed != *value => {
                        *value = parsed;
                        changed = true;
                    }
                    Some(_) => {}
                    None => log::debug!("slider entry '{}' is not a number", committed),
                }
                let state = self.expect_resource::<Slider>(handle);
                state.editing = false;
                state.entry_started = false;
            }
            return changed;
        }

        let style = &self.services.style;
        let (track_color, text_params) = (config.color_or(style.color(ThemeColor::SliderBackground)), self.text_params(config));
        let slider = config.get::<SliderOption>().copied().unwrap_or(SliderOption { handle_color: style.color(ThemeColor::SliderHandle), handle_width: style.slider_handle_width });
        let default = style.default_element_scale;
        let text = value.format(precision);
        self.sync_text::<Slider>(handle, &text, text_params, |s| &mut s.label);
        let rect = self.element_box(config, default);
        if self.is_visible(&rect, config) {
            let phase = config.phase();
            let handle_width = slider.handle_width * self.window.zoom.x;
            let t = if high > low { ((value.to_f64() - low) / (high - low)).clamp(0.0, 1.0) as f32 } else { 0.0 };
            let knob = UIBox::new(rect.x() + t * (rect.width() - handle_width), rect.y(), handle_width, rect.height());
            self.draw_background(&rect, track_color, config);
            self.window.sink.push_solid_quad(phase, &knob, slider.handle_color);
            self.emit_text::<Slider>(handle, &rect, centered_or_configured(config), phase, None, |s| &mut s.label);
            let hover = self.services.style.hover_percentage;
            self.window.handlers.add_default_hoverable(rect, track_color, hover, phase);
            let drag = drag_handler(handle, low, high, step.to_f64(), handle_width, phase);
            self.window.handlers.add_general(rect, drag);
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

    #[test]
    fn snapping_respects_step_and_range() {
        assert_eq!(snap(0.26, 0.0, 1.0, 0.25), 0.25);
        assert_eq!(snap(7.0, 0.0, 5.0, 0.0), 5.0);
        assert_eq!(snap(-1.0, 0.0, 5.0, 1.0), 0.0);
    }

    fn slider_system(value: Rc<Cell<f32>>) -> UiSystem {
        let mut sys = system();
        sys.create_window(WindowDescriptor::new("w", UIBox::new(0.0, 0.0, 300.0, 100.0), move |d| {
            let mut v = value.get();
            d.slider("volume", &mut v, 0.0..=10.0, 0.0, &DrawConfig::new().with(ScaleOption(vec2f(108.0, 24.0))));
            value.set(v);
        }));
        sys
    }

    #[test]
    fn drag_sets_value_on_next_draw() {
        let value = Rc::new(Cell::new(0.0f32));
        let mut sys = slider_system(value.clone());
        sys.input().borrow_mut().mousedown(8.0 + 4.0 + 50.0, 20.0, MouseButton::LEFT);
        sys.frame(0.016);
        sys.frame(0.016);
        assert_eq!(value.get(), 5.0);
        sys.input().borrow_mut().mouseup(8.0 + 4.0 + 50.0, 20.0, MouseButton::LEFT);
        sys.frame(0.016);
        assert!(!sys.has_general_handler());
    }

    #[test]
    fn shift_press_enters_text_and_commit_clamps() {
        let value = Rc::new(Cell::new(1.0f32));
        let mut sys = slider_system(value.clone());
        {
            let input = sys.input();
            let mut input = input.borrow_mut();
            input.keydown(KeyMode::SHIFT);
            input.mousedown(20.0, 20.0, MouseButton::LEFT);
        }
        sys.frame(0.016);
        {
            let input = sys.input();
            let mut input = input.borrow_mut();
            input.keyup(KeyMode::SHIFT);
            input.mouseup(20.0, 20.0, MouseButton::LEFT);
        }
        sys.frame(0.016);
        assert!(sys.has_general_handler());
        sys.input().borrow_mut().text("42");
        sys.frame(0.016);
        sys.input().borrow_mut().keydown_code(KeyCode::RETURN);
        sys.frame(0.016);
        sys.frame(0.016);
        assert_eq!(value.get(), 10.0);
        assert!(!sys.has_general_handler());
    }
}
