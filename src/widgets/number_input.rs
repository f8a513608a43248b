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
//! Numeric inputs layered on the text input: the text is regenerated from the bound value while
//! the field is unfocused and parsed back, then clamped, on commit.

use std::ops::RangeInclusive;

use crate::*;

/// Number types editable through text.
pub trait InputNumber: Copy + PartialOrd + 'static {
    /// Formats the value with `precision` fractional digits where that applies.
    fn format(self, precision: usize) -> String;
    /// Parses user text.
    fn parse(text: &str) -> Option<Self>;
    /// Returns `true` for characters that can appear in the text form.
    fn accepts(c: char) -> bool;
    /// Lossy conversion used by sliders.
    fn to_f64(self) -> f64;
    /// Lossy conversion used by sliders; integers round to the nearest value.
    fn from_f64(v: f64) -> Self;
}

macro_rules! input_integer {
    ($($t:ty),*) => {$(
        impl InputNumber for $t {
            fn format(self, _precision: usize) -> String { self.to_string() }
            fn parse(text: &str) -> Option<Self> { text.trim().parse().ok() }
            fn accepts(c: char) -> bool { c.is_ascii_digit() || c == '-' || c == '+' }
            fn to_f64(self) -> f64 { self as f64 }
            fn from_f64(v: f64) -> Self { v.round() as $t }
        }
    )*};
}

macro_rules! input_float {
    ($($t:ty),*) => {$(
        impl InputNumber for $t {
            fn format(self, precision: usize) -> String { format!("{:.*}", precision, self) }
            fn parse(text: &str) -> Option<Self> { text.trim().parse().ok() }
            fn accepts(c: char) -> bool { c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E') }
            fn to_f64(self) -> f64 { self as f64 }
            fn from_f64(v: f64) -> Self { v as $t }
        }
    )*};
}

input_integer!(i32, i64, u32, usize);
input_float!(f32, f64);

/// Clamps `value` into `range`.
pub fn clamp_number<T: InputNumber>(value: T, range: &RangeInclusive<T>) -> T {
    if value < *range.start() {
        *range.start()
    } else if value > *range.end() {
        *range.end()
    } else {
        value
    }
}

/// Parses `text` and clamps it into `range`; `None` keeps the current value.
pub fn parse_clamped<T: InputNumber>(text: &str, range: &RangeInclusive<T>) -> Option<T> { T::parse(text).map(|v| clamp_number(v, range)) }

const NUMBER_CAPACITY: usize = 32;

impl UIDrawer<'_> {
    /// Numeric input bound to `value`. Returns `true` when a commit changed the value.
    pub fn number_input<T: InputNumber>(&mut self, name: &str, value: &mut T, range: RangeInclusive<T>, config: &DrawConfig) -> bool {
        let handle = self.resource(name, config, |_| TextInput::new(NUMBER_CAPACITY).with_filter(T::accepts));
        let shown = value.format(self.services.style.number_precision);
        let Some(committed) = self.text_field(handle, config, Some(&shown), false) else {
            return false;
        };
        match parse_clamped(&committed, &range) {
            Some(parsed) if parsed != *value => {
                *value = parsed;
                true
            }
            Some(_) => false,
            None => {
                log::debug!("'{}' is not a number; keeping {}", committed, value.format(self.services.style.number_precision));
                false
            }
        }
    }

    /// Integer input.
    pub fn input_int(&mut self, name: &str, value: &mut i64, range: RangeInclusive<i64>, config: &DrawConfig) -> bool { self.number_input(name, value, range, config) }

    /// Single precision input.
    pub fn input_float(&mut self, name: &str, value: &mut f32, range: RangeInclusive<f32>, config: &DrawConfig) -> bool {
        self.number_input(name, value, range, config)
    }

    /// Double precision input.
    pub fn input_double(&mut self, name: &str, value: &mut f64, range: RangeInclusive<f64>, config: &DrawConfig) -> bool {
        self.number_input(name, value, range, config)
    }
}
