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
//! Geometry of the render-region sliders drawn when a window's content outgrows its region.

use crate::{UIBox, Vec2f};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ScrollAxis {
    Vertical,
    Horizontal,
}

impl ScrollAxis {
    pub fn along(self, v: Vec2f) -> f32 {
        match self {
            Self::Vertical => v.y,
            Self::Horizontal => v.x,
        }
    }

    fn length(self, b: &UIBox) -> f32 {
        match self {
            Self::Vertical => b.height(),
            Self::Horizontal => b.width(),
        }
    }
}

/// Track of the slider, laid along the inner right (vertical) or bottom (horizontal) edge of `region`.
pub(crate) fn scrollbar_base(axis: ScrollAxis, region: UIBox, scrollbar_size: f32) -> UIBox {
    match axis {
        ScrollAxis::Vertical => UIBox::new(region.right() - scrollbar_size, region.y(), scrollbar_size, region.height()),
        ScrollAxis::Horizontal => UIBox::new(region.x(), region.bottom() - scrollbar_size, region.width(), scrollbar_size),
    }
}

pub(crate) fn scrollbar_max_scroll(content_len: f32, view_len: f32) -> f32 { (content_len - view_len).max(0.0) }

/// Converts a pointer movement along the track into a content offset change.
pub(crate) fn scrollbar_drag_delta(axis: ScrollAxis, delta: Vec2f, content_len: f32, base: UIBox) -> f32 {
    let base_len = axis.length(&base);
    if base_len <= 0.0 {
        return 0.0;
    }
    axis.along(delta) * content_len / base_len
}

pub(crate) fn scrollbar_thumb(axis: ScrollAxis, base: UIBox, view_len: f32, content_len: f32, scroll: f32, thumb_min: f32) -> UIBox {
    let base_len = axis.length(&base);
    if base_len <= 0.0 || content_len <= 0.0 || view_len <= 0.0 {
        return base;
    }
    let thumb_len = (base_len * view_len / content_len).max(thumb_min).min(base_len);
    let max_scroll = scrollbar_max_scroll(content_len, view_len);
    let offset = if max_scroll > 0.0 { scroll.clamp(0.0, max_scroll) * (base_len - thumb_len) / max_scroll } else { 0.0 };
    match axis {
        ScrollAxis::Vertical => UIBox::new(base.x(), base.y() + offset, base.width(), thumb_len),
        ScrollAxis::Horizontal => UIBox::new(base.x() + offset, base.y(), thumb_len, base.height()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec2f;

    #[test]
    fn thumb_tracks_scroll() {
        let region = UIBox::new(0.0, 0.0, 100.0, 100.0);
        let base = scrollbar_base(ScrollAxis::Vertical, region, 10.0);
        assert_eq!(base, UIBox::new(90.0, 0.0, 10.0, 100.0));
        let top = scrollbar_thumb(ScrollAxis::Vertical, base, 100.0, 400.0, 0.0, 5.0);
        assert_eq!(top, UIBox::new(90.0, 0.0, 10.0, 25.0));
        let bottom = scrollbar_thumb(ScrollAxis::Vertical, base, 100.0, 400.0, 1000.0, 5.0);
        assert_eq!(bottom.bottom(), 100.0);
    }

    #[test]
    fn drag_scales_to_content() {
        let base = UIBox::new(0.0, 90.0, 100.0, 10.0);
        assert_eq!(scrollbar_drag_delta(ScrollAxis::Horizontal, vec2f(10.0, 3.0), 300.0, base), 30.0);
        assert_eq!(scrollbar_max_scroll(50.0, 100.0), 0.0);
    }
}
