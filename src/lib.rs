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
#![warn(missing_docs)]
//! `ui-drawer` is an immediate-mode UI drawer that keeps expensive per-widget work alive across frames.
//! Every frame a [`UIDrawer`] is built for each window region, widgets are issued through it, and the
//! drawer appends vertex geometry into per-phase batches while registering interaction handlers that
//! the [`UiSystem`] resolves once the frame's draw calls are done.

use std::ops::Range;

mod config;
mod drawer;
mod error;
mod glyph;
mod handler;
mod identifier;
mod input;
mod layout;
mod resource;
mod revert;
mod scrollbar;
mod sink;
mod system;
mod widgets;
mod window;

pub use config::*;
pub use drawer::UIDrawer;
pub use error::*;
pub use glyph::*;
pub use handler::*;
pub use identifier::*;
pub use input::*;
pub use layout::*;
pub use resource::*;
pub use revert::*;
pub use rs_math3d::*;
pub use sink::*;
pub use system::*;
pub use widgets::*;
pub use window::*;

#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
#[repr(C)]
/// Simple RGBA color stored with 8-bit components.
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Moves every color channel `percentage` of the way towards white, keeping alpha.
    pub fn brighten(self, percentage: f32) -> Self {
        let p = percentage.clamp(0.0, 1.0);
        let lift = |c: u8| -> u8 { (c as f32 + (255.0 - c as f32) * p).round().min(255.0) as u8 };
        Self { r: lift(self.r), g: lift(self.g), b: lift(self.b), a: self.a }
    }

    /// Scales the alpha channel by `factor`.
    pub fn fade(self, factor: f32) -> Self { Self { a: (self.a as f32 * factor.clamp(0.0, 1.0)) as u8, ..self } }
}

/// Convenience constructor for [`Color`].
pub fn color(r: u8, g: u8, b: u8, a: u8) -> Color { Color { r, g, b, a } }

/// Convenience constructor for [`Vec2f`].
pub fn vec2f(x: f32, y: f32) -> Vec2f { Vec2f::new(x, y) }

#[derive(Copy, Clone, Debug, Default)]
/// Axis-aligned box described by its top-left corner and its extent.
pub struct UIBox {
    /// Top-left corner.
    pub position: Vec2f,
    /// Width and height.
    pub scale: Vec2f,
}

impl UIBox {
    /// Creates a box from its components.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self { Self { position: vec2f(x, y), scale: vec2f(width, height) } }

    /// Creates a box from a position and a scale.
    pub fn from_parts(position: Vec2f, scale: Vec2f) -> Self { Self { position, scale } }

    /// Left edge.
    pub fn x(&self) -> f32 { self.position.x }

    /// Top edge.
    pub fn y(&self) -> f32 { self.position.y }

    /// Width of the box.
    pub fn width(&self) -> f32 { self.scale.x }

    /// Height of the box.
    pub fn height(&self) -> f32 { self.scale.y }

    /// Right edge.
    pub fn right(&self) -> f32 { self.position.x + self.scale.x }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 { self.position.y + self.scale.y }

    /// Returns `true` when `point` lies inside the box, edges included.
    pub fn contains(&self, point: Vec2f) -> bool {
        point.x >= self.position.x && point.x <= self.right() && point.y >= self.position.y && point.y <= self.bottom()
    }

    /// Returns `true` when both boxes overlap, touching edges included.
    pub fn intersects(&self, other: &UIBox) -> bool {
        !(other.position.x > self.right() || other.right() < self.position.x || other.position.y > self.bottom() || other.bottom() < self.position.y)
    }

    /// Returns the box moved by `offset`.
    pub fn translate(&self, offset: Vec2f) -> Self { Self::new(self.position.x + offset.x, self.position.y + offset.y, self.scale.x, self.scale.y) }

    /// Returns the box grown by `amount` on every side.
    pub fn expand(&self, amount: f32) -> Self {
        Self::new(self.position.x - amount, self.position.y - amount, self.scale.x + amount * 2.0, self.scale.y + amount * 2.0)
    }
}

impl PartialEq for UIBox {
    fn eq(&self, other: &Self) -> bool {
        self.position.x == other.position.x && self.position.y == other.position.y && self.scale.x == other.scale.x && self.scale.y == other.scale.y
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
/// Handle referencing a renderer-owned texture used by sprite quads.
pub struct TextureId(pub u32);

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
#[repr(u32)]
/// Identifiers for each of the built-in theme colors.
pub enum ThemeColor {
    /// Default text color.
    Text = 0,
    /// Outline/border color.
    Border = 1,
    /// Window background.
    WindowBackground = 2,
    /// Default element background.
    Element = 3,
    /// Element background while hovered.
    ElementHover = 4,
    /// Element background while active.
    ElementActive = 5,
    /// Default button color.
    Button = 6,
    /// Button color while hovered.
    ButtonHover = 7,
    /// Button color while active.
    ButtonActive = 8,
    /// Slider track.
    SliderBackground = 9,
    /// Slider handle.
    SliderHandle = 10,
    /// Text selection highlight.
    Selection = 11,
    /// Text caret.
    Caret = 12,
    /// Popup/menu background.
    MenuBackground = 13,
    /// Menu row while hovered.
    MenuHover = 14,
    /// Dimmed color for unavailable elements.
    Unavailable = 15,
    /// Base of render-region sliders.
    ScrollBase = 16,
    /// Thumb of render-region sliders.
    ScrollThumb = 17,
    /// Number of color entries in [`DrawerStyle::colors`].
    Max = 18,
}

impl ThemeColor {
    /// Promotes the color to its hover variant when one exists.
    pub fn hover(&mut self) {
        *self = match self {
            Self::Element => Self::ElementHover,
            Self::Button => Self::ButtonHover,
            Self::MenuBackground => Self::MenuHover,
            _ => *self,
        }
    }

    /// Promotes the color to its active variant when one exists.
    pub fn active(&mut self) {
        *self = match self {
            Self::Element | Self::ElementHover => Self::ElementActive,
            Self::Button | Self::ButtonHover => Self::ButtonActive,
            _ => *self,
        }
    }
}

#[derive(Clone, Debug)]
/// Collection of visual constants and capacities that drive the drawer.
pub struct DrawerStyle {
    /// Font size in pixels before zoom.
    pub font_size: f32,
    /// Extra horizontal space between characters, as a fraction of the font size.
    pub character_spacing: f32,
    /// Horizontal gap inserted after each element in indent-based draw modes.
    pub element_indentation: f32,
    /// Vertical gap inserted between rows.
    pub row_offset: f32,
    /// Inner padding between a window region and its first element.
    pub region_padding: Vec2f,
    /// Scale used by widgets when the configuration carries no explicit scale.
    pub default_element_scale: Vec2f,
    /// Inner padding of text inside elements.
    pub element_padding: Vec2f,
    /// Brightening applied by default hoverables.
    pub hover_percentage: f32,
    /// Seconds a menu row must stay hovered before its submenu opens.
    pub menu_hover_threshold: f32,
    /// Width of slider handles.
    pub slider_handle_width: f32,
    /// Thickness of render-region sliders.
    pub scrollbar_size: f32,
    /// Minimum length of a render-region slider thumb.
    pub scrollbar_thumb_min: f32,
    /// Maximum number of handlers per phase and category in one window.
    pub handler_capacity: usize,
    /// Maximum number of revert commands kept per window.
    pub revert_command_capacity: usize,
    /// Maximum depth of popup windows tracked by a single menu.
    pub popup_window_capacity: usize,
    /// Number of unreferenced frames after which a dynamic resource is evicted.
    pub dynamic_eviction_frames: usize,
    /// Digits after the decimal point used when formatting floating point values.
    pub number_precision: usize,
    /// Palette of [`ThemeColor`] entries.
    pub colors: [Color; ThemeColor::Max as usize],
}

impl DrawerStyle {
    /// Returns the palette entry for `id`.
    pub fn color(&self, id: ThemeColor) -> Color { self.colors[id as usize] }
}

impl Default for DrawerStyle {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            character_spacing: 0.0,
            element_indentation: 8.0,
            row_offset: 6.0,
            region_padding: vec2f(8.0, 8.0),
            default_element_scale: vec2f(120.0, 24.0),
            element_padding: vec2f(6.0, 4.0),
            hover_percentage: 0.25,
            menu_hover_threshold: 0.35,
            slider_handle_width: 8.0,
            scrollbar_size: 10.0,
            scrollbar_thumb_min: 12.0,
            handler_capacity: 512,
            revert_command_capacity: 64,
            popup_window_capacity: 8,
            dynamic_eviction_frames: 3,
            number_precision: 2,
            colors: [
                color(230, 230, 230, 255),
                color(25, 25, 25, 255),
                color(50, 50, 50, 255),
                color(30, 30, 30, 255),
                color(35, 35, 35, 255),
                color(40, 40, 40, 255),
                color(75, 75, 75, 255),
                color(95, 95, 95, 255),
                color(115, 115, 115, 255),
                color(43, 43, 43, 255),
                color(120, 120, 120, 255),
                color(60, 90, 150, 160),
                color(230, 230, 230, 255),
                color(45, 45, 45, 250),
                color(70, 70, 70, 255),
                color(110, 110, 110, 255),
                color(43, 43, 43, 255),
                color(30, 30, 30, 255),
            ],
        }
    }
}

pub(crate) fn char_index_to_byte(text: &str, index: usize) -> usize {
    text.char_indices().nth(index).map(|(b, _)| b).unwrap_or(text.len())
}

pub(crate) fn char_range_to_bytes(text: &str, range: Range<usize>) -> Range<usize> {
    char_index_to_byte(text, range.start)..char_index_to_byte(text, range.end)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brighten_moves_towards_white() {
        let c = color(100, 0, 255, 10).brighten(0.5);
        assert_eq!(c, color(178, 128, 255, 10));
    }

    #[test]
    fn box_edges_are_inclusive() {
        let b = UIBox::new(10.0, 10.0, 20.0, 5.0);
        assert!(b.contains(vec2f(30.0, 15.0)));
        assert!(!b.contains(vec2f(30.5, 15.0)));
        assert!(b.intersects(&UIBox::new(30.0, 0.0, 5.0, 10.0)));
        assert!(!b.intersects(&UIBox::new(31.0, 0.0, 5.0, 10.0)));
    }

    #[test]
    fn char_offsets_follow_utf8() {
        assert_eq!(char_index_to_byte("a\u{e9}b", 2), 3);
        assert_eq!(char_index_to_byte("ab", 5), 2);
        assert_eq!(char_range_to_bytes("a\u{e9}b", 1..3), 1..4);
    }
}
