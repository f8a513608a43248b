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
use crate::*;

use super::centered_or_configured;

#[derive(Default, Clone, Debug)]
/// Persistent state of a push button.
pub struct Button {
    label: CachedText,
    clicked: bool,
}

impl Button {
    /// Cached label geometry.
    pub fn label(&self) -> &CachedText { &self.label }
}

#[derive(Default, Clone, Debug)]
/// Persistent state of a toggle button.
pub struct StateButton {
    label: CachedText,
    toggled: bool,
}

fn click_handler<T: 'static>(owner: ResourceHandle, phase: DrawPhase, callback: Option<ActionHandler>, mark: fn(&mut T)) -> ActionHandler {
    ActionHandler::new(move |ctx| {
        if let Some(state) = ctx.resource_mut::<T>(owner) {
            mark(state);
        }
        if let Some(callback) = &callback {
            callback.call(ctx);
        }
    })
    .with_phase(phase)
    .with_owner(owner)
}

impl UIDrawer<'_> {
    /// Push button. Returns `true` on the frame after it was clicked; a [`CallbackOption`] fires
    /// during dispatch of the click itself.
    pub fn button(&mut self, name: &str, label: &str, config: &DrawConfig) -> bool {
        let handle = self.resource(name, config, |_| Button::default());
        let clicked = std::mem::take(&mut self.expect_resource::<Button>(handle).clicked);
        let base = self.services.style.color(ThemeColor::Button);
        self.labelled_box::<Button>(handle, label, config, base, |b| &mut b.label, |b| b.clicked = true);
        clicked
    }

    /// Toggle button bound to `value`. Returns `true` when `value` changed.
    pub fn state_button(&mut self, name: &str, label: &str, value: &mut bool, config: &DrawConfig) -> bool {
        let handle = self.resource(name, config, |_| StateButton::default());
        let toggled = std::mem::take(&mut self.expect_resource::<StateButton>(handle).toggled);
        if toggled {
            *value = !*value;
        }
        let base = if *value { self.services.style.color(ThemeColor::ButtonActive) } else { self.services.style.color(ThemeColor::Button) };
        self.labelled_box::<StateButton>(handle, label, config, base, |b| &mut b.label, |b| b.toggled = true);
        toggled
    }

    fn labelled_box<T: 'static>(
        &mut self,
        handle: ResourceHandle,
        label: &str,
        config: &DrawConfig,
        base: Color,
        text: fn(&mut T) -> &mut CachedText,
        mark: fn(&mut T),
    ) -> UIBox {
        let params = self.text_params(config);
        let span = self.sync_text::<T>(handle, label, params, text);
        let fitted = self.fitted_scale(span);
        let rect = self.element_box(config, fitted);
        if self.is_visible(&rect, config) {
            let color = config.color_or(base);
            let phase = config.phase();
            self.draw_background(&rect, color, config);
            self.emit_text::<T>(handle, &rect, centered_or_configured(config), phase, None, text);
            let callback = config.get::<CallbackOption>().map(|c| c.0.clone());
            let (hover_color, percentage) =
                config.get::<HoverableOption>().map(|h| (h.color, h.percentage)).unwrap_or((color, self.services.style.hover_percentage));
            let click = click_handler::<T>(handle, phase, callback, mark);
            self.window.handlers.add_default_clickable_hoverable(rect, click, hover_color, percentage);
        }
        self.finalize_rectangle(&rect, config);
        rect
    }
}
