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
//! Glyph lookup and text shaping into sprite quads.

use crate::{vec2f, Color, SpriteVertex, UIBox, Vec2f, QUAD_VERTICES};
use crate::sink::{quad_corners, quad_uvs};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Coarse classification of a character, reported by the glyph service.
pub enum CharacterType {
    /// `a`..`z` and other lowercase letters.
    Lowercase,
    /// `A`..`Z` and other uppercase letters.
    Uppercase,
    /// Decimal digits.
    Digit,
    /// Punctuation and symbols.
    Symbol,
    /// Whitespace.
    Space,
    /// Anything the atlas cannot represent.
    Unknown,
}

impl CharacterType {
    /// Classifies `c`.
    pub fn of(c: char) -> Self {
        if c.is_whitespace() {
            Self::Space
        } else if c.is_ascii_digit() {
            Self::Digit
        } else if c.is_lowercase() {
            Self::Lowercase
        } else if c.is_uppercase() {
            Self::Uppercase
        } else if c.is_ascii_punctuation() {
            Self::Symbol
        } else {
            Self::Unknown
        }
    }
}

#[derive(Copy, Clone, Debug)]
/// Atlas entry of a character.
pub struct GlyphInfo {
    /// Top-left texture coordinate.
    pub uv_top_left: Vec2f,
    /// Bottom-right texture coordinate.
    pub uv_bottom_right: Vec2f,
    /// Horizontal advance as a fraction of the font size.
    pub advance: f32,
    /// Character classification.
    pub kind: CharacterType,
}

/// Pure character to atlas lookup.
pub trait GlyphSource {
    /// Returns the atlas entry for `c`. Unknown characters map to a fallback glyph.
    fn character_to_uv(&self, c: char) -> GlyphInfo;
}

/// Horizontal advance of `c` in pixels.
pub fn character_advance(glyphs: &dyn GlyphSource, c: char, font_size: f32, spacing: f32) -> f32 { (glyphs.character_to_uv(c).advance + spacing) * font_size }

/// Size of `text` laid out on one line.
pub fn text_span(glyphs: &dyn GlyphSource, text: &str, font_size: f32, spacing: f32) -> Vec2f {
    let width = text.chars().map(|c| character_advance(glyphs, c, font_size, spacing)).sum();
    vec2f(width, font_size)
}

/// Appends one glyph quad per character of `text`, starting at `position`, and returns the span.
pub fn convert_characters_to_sprites(
    glyphs: &dyn GlyphSource,
    text: &str,
    position: Vec2f,
    out: &mut Vec<SpriteVertex>,
    color: Color,
    font_size: f32,
    spacing: f32,
) -> Vec2f {
    out.reserve(text.chars().count() * QUAD_VERTICES);
    let mut pen = position.x;
    for c in text.chars() {
        let info = glyphs.character_to_uv(c);
        let advance = (info.advance + spacing) * font_size;
        push_glyph(out, &info, UIBox::new(pen, position.y, info.advance * font_size, font_size), color);
        pen += advance;
    }
    vec2f(pen - position.x, font_size)
}

pub(crate) fn push_glyph(out: &mut Vec<SpriteVertex>, info: &GlyphInfo, rect: UIBox, color: Color) {
    let uvs = quad_uvs(info.uv_top_left, info.uv_bottom_right);
    out.extend(quad_corners(&rect).into_iter().zip(uvs).map(|(position, uv)| SpriteVertex { position, uv, color }));
}

#[derive(Copy, Clone, Debug)]
/// Fixed-advance glyph source laying printable ASCII out on a 16x16 atlas grid.
pub struct MonospaceGlyphs {
    advance: f32,
}

impl MonospaceGlyphs {
    /// Creates a source where every glyph advances `advance` times the font size.
    pub fn new(advance: f32) -> Self { Self { advance } }
}

impl GlyphSource for MonospaceGlyphs {
    fn character_to_uv(&self, c: char) -> GlyphInfo {
        let code = if c.is_ascii() { c as u32 } else { '?' as u32 };
        let cell = 1.0 / 16.0;
        let x = (code % 16) as f32 * cell;
        let y = (code / 16) as f32 * cell;
        GlyphInfo { uv_top_left: vec2f(x, y), uv_bottom_right: vec2f(x + cell, y + cell), advance: self.advance, kind: CharacterType::of(c) }
    }
}

#[cfg(feature = "builder")]
pub use builder::FontAtlas;

#[cfg(feature = "builder")]
mod builder {
    use std::collections::HashMap;
    use std::io::{Error, ErrorKind, Result};

    use fontdue::*;

    use super::*;

    #[derive(Clone)]
    /// RGBA glyph atlas rasterized from a TrueType/OpenType font.
    pub struct FontAtlas {
        width: usize,
        height: usize,
        pixels: Vec<Color>,
        entries: HashMap<char, GlyphInfo>,
        fallback: GlyphInfo,
    }

    impl FontAtlas {
        /// Rasterizes printable ASCII of `bytes` at `size` pixels into a `width` x `height` atlas.
        pub fn from_font_bytes(bytes: &[u8], size: f32, width: usize, height: usize) -> Result<Self> {
            let font = Font::from_bytes(bytes, FontSettings::default()).map_err(|error| Error::new(ErrorKind::Other, format!("{}", error)))?;
            let mut atlas = Self {
                width,
                height,
                pixels: vec![Color::default(); width * height],
                entries: HashMap::new(),
                fallback: GlyphInfo { uv_top_left: Vec2f::default(), uv_bottom_right: Vec2f::default(), advance: 0.5, kind: CharacterType::Unknown },
            };
            let (mut x, mut y, mut shelf) = (0usize, 0usize, 0usize);
            for i in 32u8..127 {
                let ch = i as char;
                let (metrics, bitmap) = font.rasterize(ch, size);
                if x + metrics.width > width {
                    x = 0;
                    y += shelf + 1;
                    shelf = 0;
                }
                if y + metrics.height > height {
                    let error = format!("Bitmap size of {}x{} is not enough to hold the atlas, please resize", width, height);
                    return Err(Error::new(ErrorKind::Other, error));
                }
                for row in 0..metrics.height {
                    for col in 0..metrics.width {
                        let a = bitmap[col + row * metrics.width];
                        atlas.pixels[x + col + (y + row) * width] = Color { r: 0xFF, g: 0xFF, b: 0xFF, a };
                    }
                }
                let info = GlyphInfo {
                    uv_top_left: vec2f(x as f32 / width as f32, y as f32 / height as f32),
                    uv_bottom_right: vec2f((x + metrics.width) as f32 / width as f32, (y + metrics.height) as f32 / height as f32),
                    advance: metrics.advance_width / size,
                    kind: CharacterType::of(ch),
                };
                atlas.entries.insert(ch, info);
                x += metrics.width + 1;
                shelf = shelf.max(metrics.height);
            }
            if let Some(q) = atlas.entries.get(&'?') {
                atlas.fallback = GlyphInfo { kind: CharacterType::Unknown, ..*q };
            }
            Ok(atlas)
        }

        /// Atlas width in pixels.
        pub fn width(&self) -> usize { self.width }

        /// Atlas height in pixels.
        pub fn height(&self) -> usize { self.height }

        /// RGBA pixels, row major.
        pub fn pixels(&self) -> &[Color] { &self.pixels }
    }

    impl GlyphSource for FontAtlas {
        fn character_to_uv(&self, c: char) -> GlyphInfo { self.entries.get(&c).copied().unwrap_or(self.fallback) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color;

    #[test]
    fn span_sums_advances() {
        let g = MonospaceGlyphs::new(0.5);
        let span = text_span(&g, "abcd", 16.0, 0.0);
        assert_eq!((span.x, span.y), (32.0, 16.0));
        assert_eq!(text_span(&g, "ab", 16.0, 0.25).x, 24.0);
    }

    #[test]
    fn sprites_one_quad_per_character() {
        let g = MonospaceGlyphs::new(0.5);
        let mut out = Vec::new();
        let span = convert_characters_to_sprites(&g, "a b", vec2f(10.0, 5.0), &mut out, color(255, 255, 255, 255), 16.0, 0.0);
        assert_eq!(out.len(), 3 * QUAD_VERTICES);
        assert_eq!(span.x, 24.0);
        assert_eq!(out[QUAD_VERTICES * 2].position.x, 26.0);
        assert_eq!(out[QUAD_VERTICES * 2].position.y, 5.0);
    }

    #[test]
    fn classification() {
        assert_eq!(CharacterType::of('a'), CharacterType::Lowercase);
        assert_eq!(CharacterType::of('Q'), CharacterType::Uppercase);
        assert_eq!(CharacterType::of('7'), CharacterType::Digit);
        assert_eq!(CharacterType::of('#'), CharacterType::Symbol);
        assert_eq!(CharacterType::of(' '), CharacterType::Space);
    }
}
