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
//! Widgets are methods on [`crate::UIDrawer`]. Each keeps its state in a window resource and
//! receives the outcome of last frame's handlers through pending fields applied on the next draw.

mod combo_box;
mod core_widgets;
mod hierarchy;
mod menu;
mod number_input;
mod slider;
mod text_input;

pub use combo_box::*;
pub use core_widgets::*;
pub use hierarchy::*;
pub use menu::*;
pub use number_input::*;
pub use slider::*;
pub use text_input::*;

use crate::{vec2f, AlignX, AlignY, Alignment, DrawConfig, UIBox, UIDrawer, Vec2f};

/// Centered alignment unless the configuration sets one.
pub(crate) fn centered_or_configured(config: &DrawConfig) -> Alignment {
    config.get::<Alignment>().copied().unwrap_or(Alignment::new(AlignX::Center, AlignY::Center))
}

impl UIDrawer<'_> {
    /// Unzoomed scale fitting `span` (zoomed) plus the element padding, at least the default scale.
    pub(crate) fn fitted_scale(&self, span: Vec2f) -> Vec2f {
        let zoom = self.window.zoom;
        let style = &self.services.style;
        let padding = style.element_padding;
        vec2f(
            (span.x / zoom.x + padding.x * 2.0).max(style.default_element_scale.x),
            (span.y / zoom.y + padding.y * 2.0).max(style.default_element_scale.y),
        )
    }

    /// `rect` shrunk by the zoomed element padding.
    pub(crate) fn inner_box(&self, rect: &UIBox) -> UIBox {
        let padding = self.zoomed(self.services.style.element_padding);
        UIBox::new(rect.x() + padding.x, rect.y() + padding.y, (rect.width() - padding.x * 2.0).max(0.0), (rect.height() - padding.y * 2.0).max(0.0))
    }
}
