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
//! Cursor based layout. Every element is placed at the cursor (or wrapped first under a fit-space
//! mode) and then finalized, which grows the row/column extents and advances the cursor according
//! to the active [`DrawMode`].

use crate::{vec2f, DrawBehaviour, UIBox, Vec2f};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
/// How the cursor advances after each finalized element.
pub enum DrawMode {
    #[default]
    /// Flow right by the element width plus the indentation.
    Indent,
    /// Return to the row start and move down below the tallest element of the row.
    NextRow,
    /// Flow like [`DrawMode::Indent`] until `target` elements were placed, then break the row once.
    NextRowCount,
    /// Stay in place; the caller positions elements manually.
    Nothing,
    /// Stack elements vertically, moving to the next column after `target` elements.
    ColumnDraw,
    /// [`DrawMode::ColumnDraw`] that starts a new row of columns when the next element would overflow.
    ColumnDrawFitSpace,
    /// [`DrawMode::Indent`] that wraps to a new row when the next element would overflow.
    FitSpace,
}

impl DrawMode {
    /// Returns `true` for the column stacking modes.
    pub fn is_column(self) -> bool { matches!(self, Self::ColumnDraw | Self::ColumnDrawFitSpace) }

    /// Returns `true` for modes that wrap before placing.
    pub fn fits_space(self) -> bool { matches!(self, Self::FitSpace | Self::ColumnDrawFitSpace) }
}

#[derive(Copy, Clone, Debug, Default)]
/// Drawing cursor and row/column extents.
pub struct DrawCursor {
    /// Cursor x in screen space.
    pub current_x: f32,
    /// Cursor y in screen space.
    pub current_y: f32,
    /// Height of the current row measured from `row_start.y`.
    pub current_row_y_scale: f32,
    /// Width accumulated by the current column (or element) since the last horizontal advance.
    pub current_column_x_scale: f32,
    /// Active draw mode.
    pub draw_mode: DrawMode,
    /// Elements finalized since the mode was set or last wrapped.
    pub draw_mode_count: usize,
    /// Element count driving [`DrawMode::NextRowCount`] and the column modes.
    pub draw_mode_target: usize,
    /// Top-left corner of the current row.
    pub row_start: Vec2f,
}

#[derive(Copy, Clone, Debug, Default)]
/// Running extent of everything drawn, relative to the unscrolled content origin.
pub struct RenderBounds {
    min: Option<Vec2f>,
    max: Vec2f,
}

impl RenderBounds {
    /// Grows the bounds to include `rect`.
    pub fn include(&mut self, rect: &UIBox) {
        match self.min {
            None => {
                self.min = Some(rect.position);
                self.max = vec2f(rect.right(), rect.bottom());
            }
            Some(min) => {
                self.min = Some(vec2f(min.x.min(rect.x()), min.y.min(rect.y())));
                self.max = vec2f(self.max.x.max(rect.right()), self.max.y.max(rect.bottom()));
            }
        }
    }

    /// Returns `true` when nothing was recorded.
    pub fn is_empty(&self) -> bool { self.min.is_none() }

    /// Bounds as a box, or `None` when empty.
    pub fn rect(&self) -> Option<UIBox> { self.min.map(|min| UIBox::new(min.x, min.y, self.max.x - min.x, self.max.y - min.y)) }

    /// Far corner of the bounds, or the origin when empty.
    pub fn extent(&self) -> Vec2f { if self.is_empty() { Vec2f::default() } else { self.max } }
}

#[derive(Copy, Clone, Debug)]
/// Spacing parameters of a layout, already multiplied by the window zoom.
pub struct LayoutMetrics {
    /// Padding between the region edge and content.
    pub padding: Vec2f,
    /// Horizontal gap after flowing elements.
    pub element_indentation: f32,
    /// Vertical gap between rows.
    pub row_offset: f32,
}

#[derive(Clone, Debug)]
/// Layout state of one drawer.
pub struct LayoutEngine {
    region: UIBox,
    origin: Vec2f,
    boundary: f32,
    metrics: LayoutMetrics,
    cursor: DrawCursor,
    bounds: RenderBounds,
}

impl LayoutEngine {
    /// Creates a layout for `region` scrolled by `render_offset`. The cursor starts at the padded
    /// content origin in [`DrawMode::Indent`].
    pub fn new(region: UIBox, render_offset: Vec2f, metrics: LayoutMetrics) -> Self {
        let origin = vec2f(region.x() + metrics.padding.x - render_offset.x, region.y() + metrics.padding.y - render_offset.y);
        let boundary = origin.x + (region.width() - metrics.padding.x * 2.0).max(0.0);
        let cursor = DrawCursor { current_x: origin.x, current_y: origin.y, row_start: origin, ..Default::default() };
        Self { region, origin, boundary, metrics, cursor, bounds: RenderBounds::default() }
    }

    /// Visible screen region.
    pub fn region(&self) -> UIBox { self.region }

    /// Screen position of the content origin.
    pub fn origin(&self) -> Vec2f { self.origin }

    /// Right fit-space boundary in screen space.
    pub fn boundary(&self) -> f32 { self.boundary }

    /// Width available to content.
    pub fn content_width(&self) -> f32 { self.boundary - self.origin.x }

    /// Current cursor.
    pub fn cursor(&self) -> DrawCursor { self.cursor }

    /// Replaces the cursor.
    pub fn set_cursor(&mut self, cursor: DrawCursor) { self.cursor = cursor; }

    /// Cursor position.
    pub fn position(&self) -> Vec2f { vec2f(self.cursor.current_x, self.cursor.current_y) }

    /// Switches the draw mode; `target` is the element count used by counting and column modes.
    pub fn set_draw_mode(&mut self, mode: DrawMode, target: usize) {
        self.cursor.draw_mode = mode;
        self.cursor.draw_mode_target = target;
        self.cursor.draw_mode_count = 0;
        if mode.is_column() {
            self.cursor.current_column_x_scale = 0.0;
        }
    }

    /// Breaks the row: back to the row start x, below the tallest element of the row.
    pub fn next_row(&mut self) {
        let c = &mut self.cursor;
        let y = c.row_start.y + c.current_row_y_scale + self.metrics.row_offset;
        c.row_start = vec2f(c.row_start.x, y);
        c.current_x = c.row_start.x;
        c.current_y = y;
        c.current_row_y_scale = 0.0;
        c.current_column_x_scale = 0.0;
        c.draw_mode_count = 0;
    }

    /// Moves the cursor right by `amount` without placing anything.
    pub fn indent(&mut self, amount: f32) { self.cursor.current_x += amount; }

    fn wraps(&self, scale: Vec2f) -> bool {
        let at_row_start = self.cursor.current_x <= self.cursor.row_start.x;
        !at_row_start && self.cursor.current_x + scale.x > self.boundary
    }

    /// Wraps first when a fit-space mode is active and an element of `scale` would overflow the
    /// boundary, then returns the position the element goes to. An exact fit does not wrap.
    pub fn fit_position(&mut self, scale: Vec2f) -> Vec2f {
        if self.cursor.draw_mode.fits_space() && self.wraps(scale) {
            self.next_row();
        }
        self.position()
    }

    /// Returns the box an element of `scale` occupies, applying the fit-space rule unless disabled.
    pub fn place(&mut self, scale: Vec2f, behaviour: DrawBehaviour) -> UIBox {
        let position = if behaviour.is_not_fitting() { self.position() } else { self.fit_position(scale) };
        UIBox::from_parts(position, scale)
    }

    /// Records a drawn element and advances the cursor for the active mode.
    pub fn finalize_rectangle(&mut self, placed: &UIBox, behaviour: DrawBehaviour) {
        if !behaviour.is_not_bounding() {
            self.include_bounds(placed);
        }
        if behaviour.is_not_advancing() {
            return;
        }
        let indentation = self.metrics.element_indentation;
        let row_offset = self.metrics.row_offset;
        let c = &mut self.cursor;
        c.current_row_y_scale = c.current_row_y_scale.max(placed.bottom() - c.row_start.y);
        c.current_column_x_scale = c.current_column_x_scale.max(placed.width());
        match c.draw_mode {
            DrawMode::Indent | DrawMode::FitSpace => {
                c.current_x += c.current_column_x_scale + indentation;
                c.current_column_x_scale = 0.0;
            }
            DrawMode::NextRow => self.next_row(),
            DrawMode::NextRowCount => {
                c.draw_mode_count += 1;
                if c.draw_mode_count >= c.draw_mode_target.max(1) {
                    self.next_row();
                } else {
                    c.current_x += c.current_column_x_scale + indentation;
                    c.current_column_x_scale = 0.0;
                }
            }
            DrawMode::Nothing => c.current_column_x_scale = 0.0,
            DrawMode::ColumnDraw | DrawMode::ColumnDrawFitSpace => {
                c.draw_mode_count += 1;
                if c.draw_mode_target > 0 && c.draw_mode_count >= c.draw_mode_target {
                    c.current_x += c.current_column_x_scale + indentation;
                    c.current_y = c.row_start.y;
                    c.current_column_x_scale = 0.0;
                    c.draw_mode_count = 0;
                } else {
                    c.current_y = placed.bottom() + row_offset;
                }
            }
        }
    }

    /// Returns `true` when `rect` is at least partly inside the visible region.
    pub fn validate_position(&self, rect: &UIBox) -> bool { self.region.intersects(rect) }

    /// Grows the render bounds by `rect` (screen space).
    pub fn include_bounds(&mut self, rect: &UIBox) {
        let local = UIBox::new(rect.x() - self.origin.x, rect.y() - self.origin.y, rect.width(), rect.height());
        self.bounds.include(&local);
    }

    /// Render bounds accumulated so far.
    pub fn render_bounds(&self) -> RenderBounds { self.bounds }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(width: f32) -> LayoutEngine {
        let metrics = LayoutMetrics { padding: vec2f(0.0, 0.0), element_indentation: 5.0, row_offset: 2.0 };
        LayoutEngine::new(UIBox::new(0.0, 0.0, width, 200.0), Vec2f::default(), metrics)
    }

    fn add(layout: &mut LayoutEngine, w: f32, h: f32) -> UIBox {
        let b = layout.place(vec2f(w, h), DrawBehaviour::NONE);
        layout.finalize_rectangle(&b, DrawBehaviour::NONE);
        b
    }

    #[test]
    fn indent_flows_right() {
        let mut l = engine(500.0);
        let a = add(&mut l, 40.0, 10.0);
        let b = add(&mut l, 30.0, 20.0);
        assert_eq!((a.x(), b.x()), (0.0, 45.0));
        l.next_row();
        assert_eq!((l.position().x, l.position().y), (0.0, 22.0));
    }

    #[test]
    fn exact_fit_does_not_wrap() {
        let mut l = engine(100.0);
        l.set_draw_mode(DrawMode::FitSpace, 0);
        add(&mut l, 35.0, 10.0);
        let b = add(&mut l, 60.0, 10.0);
        assert_eq!((b.x(), b.y()), (40.0, 0.0));
        let c = add(&mut l, 1.0, 10.0);
        assert_eq!((c.x(), c.y()), (0.0, 12.0));
    }

    #[test]
    fn oversized_first_element_stays_on_row() {
        let mut l = engine(100.0);
        l.set_draw_mode(DrawMode::FitSpace, 0);
        let a = add(&mut l, 150.0, 10.0);
        assert_eq!((a.x(), a.y()), (0.0, 0.0));
    }

    #[test]
    fn next_row_count_breaks_after_target() {
        let mut l = engine(500.0);
        l.set_draw_mode(DrawMode::NextRowCount, 2);
        let a = add(&mut l, 10.0, 10.0);
        let b = add(&mut l, 10.0, 14.0);
        let c = add(&mut l, 10.0, 10.0);
        assert_eq!((a.x(), b.x(), c.x()), (0.0, 15.0, 0.0));
        assert_eq!(c.y(), 16.0);
    }

    #[test]
    fn next_row_mode_stacks() {
        let mut l = engine(500.0);
        l.set_draw_mode(DrawMode::NextRow, 0);
        add(&mut l, 10.0, 10.0);
        let b = add(&mut l, 10.0, 10.0);
        assert_eq!((b.x(), b.y()), (0.0, 12.0));
    }

    #[test]
    fn nothing_keeps_cursor() {
        let mut l = engine(500.0);
        l.set_draw_mode(DrawMode::Nothing, 0);
        add(&mut l, 10.0, 30.0);
        add(&mut l, 20.0, 10.0);
        assert_eq!((l.position().x, l.position().y), (0.0, 0.0));
        assert_eq!(l.cursor().current_column_x_scale, 0.0);
        l.next_row();
        assert_eq!(l.position().y, 32.0);
    }

    #[test]
    fn columns_track_tallest_column() {
        let mut l = engine(500.0);
        l.set_draw_mode(DrawMode::ColumnDraw, 2);
        let a = add(&mut l, 20.0, 10.0);
        let b = add(&mut l, 30.0, 20.0);
        let c = add(&mut l, 10.0, 10.0);
        assert_eq!((a.x(), a.y()), (0.0, 0.0));
        assert_eq!((b.x(), b.y()), (0.0, 12.0));
        assert_eq!((c.x(), c.y()), (35.0, 0.0));
        l.next_row();
        assert_eq!((l.position().x, l.position().y), (0.0, 34.0));
    }

    #[test]
    fn column_fit_space_starts_new_row_of_columns() {
        let mut l = engine(60.0);
        l.set_draw_mode(DrawMode::ColumnDrawFitSpace, 1);
        add(&mut l, 30.0, 10.0);
        let b = add(&mut l, 30.0, 15.0);
        assert_eq!((b.x(), b.y()), (0.0, 12.0));
    }

    #[test]
    fn do_not_advance_and_bounds() {
        let mut l = engine(500.0);
        let b = l.place(vec2f(10.0, 10.0), DrawBehaviour::NONE);
        l.finalize_rectangle(&b, DrawBehaviour::DO_NOT_ADVANCE);
        assert_eq!(l.position().x, 0.0);
        let far = UIBox::new(400.0, 300.0, 10.0, 10.0);
        l.finalize_rectangle(&far, DrawBehaviour::DO_NOT_ADVANCE | DrawBehaviour::DO_NOT_UPDATE_RENDER_BOUNDS);
        assert_eq!(l.render_bounds().extent().y, 10.0);
        assert!(!l.validate_position(&far));
        assert!(l.validate_position(&b));
    }

    #[test]
    fn render_offset_scrolls_origin() {
        let metrics = LayoutMetrics { padding: vec2f(4.0, 4.0), element_indentation: 5.0, row_offset: 2.0 };
        let mut l = LayoutEngine::new(UIBox::new(10.0, 10.0, 100.0, 100.0), vec2f(0.0, 30.0), metrics);
        assert_eq!((l.origin().x, l.origin().y), (14.0, -16.0));
        assert_eq!(l.boundary(), 106.0);
        let b = add(&mut l, 10.0, 10.0);
        assert_eq!(l.render_bounds().extent().x, 10.0);
        assert_eq!(b.y(), -16.0);
    }
}
