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
//! Input accumulation and the read-only per-frame snapshot handed to the drawer and its handlers.

use std::cell::RefCell;
use std::rc::Rc;

use bitflags::*;

use crate::{vec2f, Vec2f};

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    /// Mouse button state as reported by the input system.
    pub struct MouseButton : u32 {
        /// Middle mouse button.
        const MIDDLE = 4;
        /// Right mouse button.
        const RIGHT = 2;
        /// Left mouse button.
        const LEFT = 1;
        /// No buttons pressed.
        const NONE = 0;
    }
}

impl MouseButton {
    /// Returns `true` if the middle mouse button is set.
    pub fn is_middle(&self) -> bool { self.intersects(Self::MIDDLE) }
    /// Returns `true` if the right mouse button is set.
    pub fn is_right(&self) -> bool { self.intersects(Self::RIGHT) }
    /// Returns `true` if the left mouse button is set.
    pub fn is_left(&self) -> bool { self.intersects(Self::LEFT) }
    /// Returns `true` if no mouse buttons are set.
    pub fn is_none(&self) -> bool { self.bits() == 0 }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    /// Modifier key state.
    pub struct KeyMode : u32 {
        /// Alt key held.
        const ALT = 4;
        /// Control key held.
        const CTRL = 2;
        /// Shift key held.
        const SHIFT = 1;
        /// No modifiers active.
        const NONE = 0;
    }
}

impl KeyMode {
    /// Returns `true` if no modifiers are active.
    pub fn is_none(&self) -> bool { self.bits() == 0 }
    /// Returns `true` if Alt is held.
    pub fn is_alt(&self) -> bool { self.intersects(Self::ALT) }
    /// Returns `true` if Control is held.
    pub fn is_ctrl(&self) -> bool { self.intersects(Self::CTRL) }
    /// Returns `true` if Shift is held.
    pub fn is_shift(&self) -> bool { self.intersects(Self::SHIFT) }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    /// Logical keys consumed by the drawer's widgets.
    pub struct KeyCode : u32 {
        /// Up arrow.
        const UP = 1;
        /// Down arrow.
        const DOWN = 2;
        /// Left arrow.
        const LEFT = 4;
        /// Right arrow.
        const RIGHT = 8;
        /// Home key.
        const HOME = 16;
        /// End key.
        const END = 32;
        /// Delete key.
        const DELETE = 64;
        /// Backspace key.
        const BACKSPACE = 128;
        /// Return/Enter key.
        const RETURN = 256;
        /// Tab key.
        const TAB = 512;
        /// Escape key.
        const ESCAPE = 1024;
        /// `A` key, used with Control for select-all.
        const A = 2048;
        /// `C` key, used with Control for copy.
        const C = 4096;
        /// `V` key, used with Control for paste.
        const V = 8192;
        /// `X` key, used with Control for cut.
        const X = 16384;
        /// `Z` key, used with Control for undo.
        const Z = 32768;
        /// No keys pressed.
        const NONE = 0;
    }
}

impl KeyCode {
    /// Returns `true` if no key is set.
    pub fn is_none(&self) -> bool { self.bits() == 0 }
    /// Returns `true` if Return is set.
    pub fn is_return(&self) -> bool { self.intersects(Self::RETURN) }
    /// Returns `true` if Backspace is set.
    pub fn is_backspace(&self) -> bool { self.intersects(Self::BACKSPACE) }
    /// Returns `true` if Delete is set.
    pub fn is_delete(&self) -> bool { self.intersects(Self::DELETE) }
    /// Returns `true` if Escape is set.
    pub fn is_escape(&self) -> bool { self.intersects(Self::ESCAPE) }
}

#[derive(Clone, Debug)]
/// Read-only snapshot of the input state for one frame.
pub struct InputSnapshot {
    /// Absolute mouse position in screen coordinates.
    pub mouse_pos: Vec2f,
    /// Mouse movement since the previous frame.
    pub mouse_delta: Vec2f,
    /// Scroll wheel movement accumulated this frame.
    pub scroll_delta: Vec2f,
    /// Currently held mouse buttons.
    pub mouse_down: MouseButton,
    /// Mouse buttons pressed this frame.
    pub mouse_pressed: MouseButton,
    /// Mouse buttons released this frame.
    pub mouse_released: MouseButton,
    /// Active modifier keys.
    pub key_mods: KeyMode,
    /// Keys currently held.
    pub key_codes: KeyCode,
    /// Keys pressed this frame.
    pub key_code_pressed: KeyCode,
    /// UTF-8 text typed this frame.
    pub text_input: String,
    /// Seconds since the system started.
    pub time: f64,
    /// Seconds elapsed since the previous frame.
    pub delta_time: f32,
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self {
            mouse_pos: Vec2f::default(),
            mouse_delta: Vec2f::default(),
            scroll_delta: Vec2f::default(),
            mouse_down: MouseButton::NONE,
            mouse_pressed: MouseButton::NONE,
            mouse_released: MouseButton::NONE,
            key_mods: KeyMode::NONE,
            key_codes: KeyCode::NONE,
            key_code_pressed: KeyCode::NONE,
            text_input: String::new(),
            time: 0.0,
            delta_time: 0.0,
        }
    }
}

impl InputSnapshot {
    /// Returns `true` when anything happened this frame: typed text, key or button transitions,
    /// held buttons, pointer motion or scrolling.
    pub fn has_activity(&self) -> bool {
        !self.text_input.is_empty()
            || !self.key_code_pressed.is_none()
            || !self.mouse_pressed.is_none()
            || !self.mouse_released.is_none()
            || !self.mouse_down.is_none()
            || self.mouse_delta.x != 0.0
            || self.mouse_delta.y != 0.0
            || self.scroll_delta.x != 0.0
            || self.scroll_delta.y != 0.0
    }

    /// Returns `true` when `code` went down this frame.
    pub fn key_pressed(&self, code: KeyCode) -> bool { self.key_code_pressed.intersects(code) }

    /// Returns `true` when Control is held and `code` went down this frame.
    pub fn shortcut(&self, code: KeyCode) -> bool { self.key_mods.is_ctrl() && self.key_pressed(code) }
}

#[derive(Clone, Debug)]
/// Aggregates raw input events delivered between two frames.
pub struct Input {
    mouse_pos: Vec2f,
    last_mouse_pos: Vec2f,
    scroll_delta: Vec2f,
    mouse_down: MouseButton,
    mouse_pressed: MouseButton,
    mouse_released: MouseButton,
    key_mods: KeyMode,
    key_code_down: KeyCode,
    key_code_pressed: KeyCode,
    input_text: String,
}

impl Default for Input {
    fn default() -> Self {
        Self {
            mouse_pos: Vec2f::default(),
            last_mouse_pos: Vec2f::default(),
            scroll_delta: Vec2f::default(),
            mouse_down: MouseButton::NONE,
            mouse_pressed: MouseButton::NONE,
            mouse_released: MouseButton::NONE,
            key_mods: KeyMode::NONE,
            key_code_down: KeyCode::NONE,
            key_code_pressed: KeyCode::NONE,
            input_text: String::default(),
        }
    }
}

impl Input {
    /// Returns the current pointer position.
    pub fn mouse_pos(&self) -> Vec2f { self.mouse_pos }

    /// Updates the current mouse pointer position.
    pub fn mousemove(&mut self, x: f32, y: f32) { self.mouse_pos = vec2f(x, y); }

    /// Records that the specified mouse button was pressed.
    pub fn mousedown(&mut self, x: f32, y: f32, btn: MouseButton) {
        self.mousemove(x, y);
        self.mouse_down |= btn;
        self.mouse_pressed |= btn;
    }

    /// Records that the specified mouse button was released.
    pub fn mouseup(&mut self, x: f32, y: f32, btn: MouseButton) {
        self.mousemove(x, y);
        self.mouse_down &= !btn;
        self.mouse_released |= btn;
    }

    /// Accumulates scroll wheel movement.
    pub fn scroll(&mut self, x: f32, y: f32) {
        self.scroll_delta.x += x;
        self.scroll_delta.y += y;
    }

    /// Records that a modifier key was pressed.
    pub fn keydown(&mut self, key: KeyMode) { self.key_mods |= key; }

    /// Records that a modifier key was released.
    pub fn keyup(&mut self, key: KeyMode) { self.key_mods &= !key; }

    /// Records that a key was pressed.
    pub fn keydown_code(&mut self, code: KeyCode) {
        self.key_code_pressed |= code;
        self.key_code_down |= code;
    }

    /// Records that a key was released.
    pub fn keyup_code(&mut self, code: KeyCode) { self.key_code_down &= !code; }

    /// Appends UTF-8 text to the input buffer.
    pub fn text(&mut self, text: &str) { self.input_text.push_str(text); }

    /// Freezes the events accumulated so far into a snapshot for the coming frame.
    pub(crate) fn snapshot(&self, time: f64, delta_time: f32) -> InputSnapshot {
        InputSnapshot {
            mouse_pos: self.mouse_pos,
            mouse_delta: vec2f(self.mouse_pos.x - self.last_mouse_pos.x, self.mouse_pos.y - self.last_mouse_pos.y),
            scroll_delta: self.scroll_delta,
            mouse_down: self.mouse_down,
            mouse_pressed: self.mouse_pressed,
            mouse_released: self.mouse_released,
            key_mods: self.key_mods,
            key_codes: self.key_code_down,
            key_code_pressed: self.key_code_pressed,
            text_input: self.input_text.clone(),
            time,
            delta_time,
        }
    }

    pub(crate) fn epilogue(&mut self) {
        self.key_code_pressed = KeyCode::NONE;
        self.input_text.clear();
        self.mouse_pressed = MouseButton::NONE;
        self.mouse_released = MouseButton::NONE;
        self.scroll_delta = Vec2f::default();
        self.last_mouse_pos = self.mouse_pos;
    }
}

/// Text clipboard used by text inputs for cut, copy and paste.
pub trait Clipboard {
    /// Returns the current clipboard text, if any.
    fn get_text(&self) -> Option<String>;
    /// Replaces the clipboard text.
    fn set_text(&mut self, text: &str);
}

#[derive(Default, Clone, Debug)]
/// In-process clipboard used when the host does not provide one.
pub struct LocalClipboard {
    text: Option<String>,
}

impl Clipboard for LocalClipboard {
    fn get_text(&self) -> Option<String> { self.text.clone() }
    fn set_text(&mut self, text: &str) { self.text = Some(text.to_string()); }
}

/// Shared clipboard handle.
pub type ClipboardHandle = Rc<RefCell<dyn Clipboard>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reports_transitions_once() {
        let mut input = Input::default();
        input.mousedown(10.0, 20.0, MouseButton::LEFT);
        input.keydown_code(KeyCode::BACKSPACE);
        input.text("ab");
        let snap = input.snapshot(0.0, 0.016);
        assert!(snap.mouse_pressed.is_left());
        assert!(snap.key_pressed(KeyCode::BACKSPACE));
        assert_eq!(snap.text_input, "ab");
        assert_eq!(snap.mouse_delta.x, 10.0);
        input.epilogue();

        let snap = input.snapshot(0.016, 0.016);
        assert!(snap.mouse_pressed.is_none());
        assert!(snap.mouse_down.is_left());
        assert!(!snap.key_pressed(KeyCode::BACKSPACE));
        assert_eq!(snap.mouse_delta.x, 0.0);
        assert!(snap.has_activity());
    }

    #[test]
    fn idle_snapshot_has_no_activity() {
        let mut input = Input::default();
        input.mousemove(5.0, 5.0);
        input.epilogue();
        assert!(!input.snapshot(1.0, 0.016).has_activity());
    }

    #[test]
    fn shortcut_requires_control() {
        let mut input = Input::default();
        input.keydown_code(KeyCode::Z);
        assert!(!input.snapshot(0.0, 0.0).shortcut(KeyCode::Z));
        input.keydown(KeyMode::CTRL);
        assert!(input.snapshot(0.0, 0.0).shortcut(KeyCode::Z));
    }
}
