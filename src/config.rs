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
//! Per-call draw configuration: a small fixed-capacity ordered list of typed options whose presence
//! is tracked by a bit set, so widgets can test for an option without scanning the list.

use bitflags::*;

use crate::{ActionHandler, Color, DrawPhase, Vec2f};

/// Maximum number of options a single [`DrawConfig`] can carry.
pub const MAX_CONFIG_OPTIONS: usize = 8;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    /// Presence bit of each option kind.
    pub struct ConfigFlag : u32 {
        /// [`Alignment`] is present.
        const ALIGNMENT = 1;
        /// [`ColorOption`] is present.
        const COLOR = 2;
        /// [`TransformOption`] is present.
        const TRANSFORM = 4;
        /// [`ScaleOption`] is present.
        const SCALE = 8;
        /// [`BorderOption`] is present.
        const BORDER = 16;
        /// [`TextOption`] is present.
        const TEXT = 32;
        /// [`CallbackOption`] is present.
        const CALLBACK = 64;
        /// [`HoverableOption`] is present.
        const HOVERABLE = 128;
        /// [`PhaseOption`] is present.
        const PHASE = 256;
        /// [`SliderOption`] is present.
        const SLIDER = 512;
        /// No options.
        const NONE = 0;
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    /// Payload-free behaviour switches of a draw call.
    pub struct DrawBehaviour : u32 {
        /// Leave the cursor where it is after placing the element.
        const DO_NOT_ADVANCE = 1;
        /// Skip the fit-space wrap check.
        const DO_NOT_FIT_SPACE = 2;
        /// Keep the element out of the render bounds used for region sliders.
        const DO_NOT_UPDATE_RENDER_BOUNDS = 4;
        /// Store the element's state through the reference-counted dynamic path.
        const DYNAMIC_RESOURCE = 8;
        /// Do not draw the element's background quad.
        const NO_BACKGROUND = 16;
        /// Emit geometry even when the element lies outside the visible region.
        const DO_NOT_VALIDATE_POSITION = 32;
        /// Default behaviour.
        const NONE = 0;
    }
}

impl DrawBehaviour {
    /// Returns `true` if the cursor must not advance.
    pub fn is_not_advancing(&self) -> bool { self.intersects(Self::DO_NOT_ADVANCE) }
    /// Returns `true` if the fit-space wrap is disabled.
    pub fn is_not_fitting(&self) -> bool { self.intersects(Self::DO_NOT_FIT_SPACE) }
    /// Returns `true` if render bounds must not grow.
    pub fn is_not_bounding(&self) -> bool { self.intersects(Self::DO_NOT_UPDATE_RENDER_BOUNDS) }
    /// Returns `true` if the dynamic resource path is requested.
    pub fn is_dynamic(&self) -> bool { self.intersects(Self::DYNAMIC_RESOURCE) }
    /// Returns `true` if the background is suppressed.
    pub fn has_no_background(&self) -> bool { self.intersects(Self::NO_BACKGROUND) }
    /// Returns `true` if visibility culling is disabled.
    pub fn is_not_validating(&self) -> bool { self.intersects(Self::DO_NOT_VALIDATE_POSITION) }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
/// Horizontal alignment.
pub enum AlignX {
    #[default]
    /// Left edge.
    Left,
    /// Centered.
    Center,
    /// Right edge.
    Right,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
/// Vertical alignment.
pub enum AlignY {
    /// Top edge.
    Top,
    #[default]
    /// Centered.
    Center,
    /// Bottom edge.
    Bottom,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
/// Alignment of content inside an element.
pub struct Alignment {
    /// Horizontal alignment.
    pub x: AlignX,
    /// Vertical alignment.
    pub y: AlignY,
}

impl Alignment {
    /// Creates an alignment.
    pub fn new(x: AlignX, y: AlignY) -> Self { Self { x, y } }

    /// Offset placing `content` inside `container` with this alignment.
    pub fn offset(&self, container: Vec2f, content: Vec2f) -> Vec2f {
        let x = match self.x {
            AlignX::Left => 0.0,
            AlignX::Center => (container.x - content.x) * 0.5,
            AlignX::Right => container.x - content.x,
        };
        let y = match self.y {
            AlignY::Top => 0.0,
            AlignY::Center => (container.y - content.y) * 0.5,
            AlignY::Bottom => container.y - content.y,
        };
        Vec2f::new(x, y)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Main color of the element.
pub struct ColorOption(pub Color);

#[derive(Copy, Clone, Debug)]
/// Absolute placement inside the region, bypassing the cursor.
pub struct TransformOption {
    /// Position relative to the region's content origin.
    pub position: Vec2f,
    /// Element scale.
    pub scale: Vec2f,
}

impl PartialEq for TransformOption {
    fn eq(&self, o: &Self) -> bool {
        self.position.x == o.position.x && self.position.y == o.position.y && self.scale.x == o.scale.x && self.scale.y == o.scale.y
    }
}

#[derive(Copy, Clone, Debug)]
/// Element scale used with cursor placement.
pub struct ScaleOption(pub Vec2f);

impl PartialEq for ScaleOption {
    fn eq(&self, o: &Self) -> bool { self.0.x == o.0.x && self.0.y == o.0.y }
}

#[derive(Copy, Clone, Debug, PartialEq)]
/// Outline drawn around the element.
pub struct BorderOption {
    /// Outline thickness in pixels.
    pub thickness: f32,
    /// Outline color.
    pub color: Color,
}

#[derive(Copy, Clone, Debug, PartialEq)]
/// Text parameters overriding the style.
pub struct TextOption {
    /// Font size before zoom.
    pub size: f32,
    /// Character spacing as a fraction of the font size.
    pub spacing: f32,
    /// Text color.
    pub color: Color,
}

#[derive(Clone, Debug, PartialEq)]
/// Handler fired when the element is clicked.
pub struct CallbackOption(pub ActionHandler);

#[derive(Copy, Clone, Debug, PartialEq)]
/// Hover highlight drawn over the element.
pub struct HoverableOption {
    /// Highlight base color.
    pub color: Color,
    /// Brightening percentage applied to `color`.
    pub percentage: f32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Phase the element's geometry and handlers belong to.
pub struct PhaseOption(pub DrawPhase);

#[derive(Copy, Clone, Debug, PartialEq)]
/// Appearance of slider handles.
pub struct SliderOption {
    /// Handle color.
    pub handle_color: Color,
    /// Handle width in pixels before zoom.
    pub handle_width: f32,
}

/// Implemented by every option payload that can live in a [`DrawConfig`].
pub trait ConfigOption: Sized {
    /// Presence bit of the option kind.
    const FLAG: ConfigFlag;
    /// Borrows the payload if `option` is of this kind.
    fn from_option(option: &DrawOption) -> Option<&Self>;
    /// Wraps the payload.
    fn into_option(self) -> DrawOption;
}

macro_rules! config_options {
    ($($(#[$doc:meta])* $variant:ident($ty:ty) => $flag:ident;)*) => {
        #[derive(Clone, Debug)]
        /// A single typed option record.
        pub enum DrawOption {
            $($(#[$doc])* $variant($ty),)*
        }

        impl DrawOption {
            /// Presence bit of this option.
            pub fn flag(&self) -> ConfigFlag {
                match self {
                    $(Self::$variant(_) => ConfigFlag::$flag,)*
                }
            }
        }

        impl PartialEq for DrawOption {
            fn eq(&self, other: &Self) -> bool {
                match (self, other) {
                    $((Self::$variant(a), Self::$variant(b)) => a == b,)*
                    _ => false,
                }
            }
        }

        $(
            impl ConfigOption for $ty {
                const FLAG: ConfigFlag = ConfigFlag::$flag;
                fn from_option(option: &DrawOption) -> Option<&Self> {
                    match option {
                        DrawOption::$variant(v) => Some(v),
                        _ => None,
                    }
                }
                fn into_option(self) -> DrawOption { DrawOption::$variant(self) }
            }

            impl From<$ty> for DrawOption {
                fn from(value: $ty) -> Self { DrawOption::$variant(value) }
            }
        )*
    };
}

config_options! {
    /// Content alignment.
    Alignment(Alignment) => ALIGNMENT;
    /// Main color.
    Color(ColorOption) => COLOR;
    /// Absolute placement.
    Transform(TransformOption) => TRANSFORM;
    /// Element scale.
    Scale(ScaleOption) => SCALE;
    /// Outline.
    Border(BorderOption) => BORDER;
    /// Text parameters.
    Text(TextOption) => TEXT;
    /// Click callback.
    Callback(CallbackOption) => CALLBACK;
    /// Hover highlight.
    Hoverable(HoverableOption) => HOVERABLE;
    /// Draw phase.
    Phase(PhaseOption) => PHASE;
    /// Slider appearance.
    Slider(SliderOption) => SLIDER;
}

#[must_use = "a saved flag must be handed back to `restore_flag`"]
#[derive(Debug)]
/// Token returned by [`DrawConfig::set_existing_flag`]; restores the previous state when passed to
/// [`DrawConfig::restore_flag`].
pub enum SavedFlag {
    /// The option existed and was overwritten with a new value.
    Replaced(DrawOption),
    /// The option did not exist and was appended.
    Added(ConfigFlag),
}

#[derive(Clone, Debug, PartialEq)]
/// Configuration attached to a single draw call.
pub struct DrawConfig {
    /// Behaviour switches.
    pub behaviour: DrawBehaviour,
    flags: ConfigFlag,
    options: [Option<DrawOption>; MAX_CONFIG_OPTIONS],
    count: usize,
}

impl Default for DrawConfig {
    fn default() -> Self { Self { behaviour: DrawBehaviour::NONE, flags: ConfigFlag::NONE, options: Default::default(), count: 0 } }
}

impl DrawConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self { Self::default() }

    /// Builder form of setting the behaviour switches.
    pub fn behaviour(mut self, behaviour: DrawBehaviour) -> Self {
        self.behaviour |= behaviour;
        self
    }

    /// Builder form of [`DrawConfig::add_flag`]. A duplicate option is ignored.
    pub fn with<T: ConfigOption>(mut self, option: T) -> Self {
        self.add_flag(option);
        self
    }

    /// Presence bits of every option carried.
    pub fn flags(&self) -> ConfigFlag { self.flags }

    /// Number of options carried.
    pub fn len(&self) -> usize { self.count }

    /// Returns `true` when no option is carried.
    pub fn is_empty(&self) -> bool { self.count == 0 }

    /// Returns `true` when every bit of `flag` is present.
    pub fn has(&self, flag: ConfigFlag) -> bool { self.flags.contains(flag) }

    /// Appends `option` unless its kind is already present; returns whether it was added.
    ///
    /// Panics when the configuration is full.
    pub fn add_flag<T: ConfigOption>(&mut self, option: T) -> bool {
        if self.flags.intersects(T::FLAG) {
            return false;
        }
        assert!(self.count < MAX_CONFIG_OPTIONS, "draw configuration holds at most {} options", MAX_CONFIG_OPTIONS);
        self.options[self.count] = Some(option.into_option());
        self.count += 1;
        self.flags |= T::FLAG;
        true
    }

    /// Returns the option of kind `T` if present.
    pub fn get<T: ConfigOption>(&self) -> Option<&T> {
        if !self.flags.intersects(T::FLAG) {
            return None;
        }
        self.iter().find_map(T::from_option)
    }

    /// Returns the option of kind `T`.
    ///
    /// Panics when the option is absent: callers are expected to have checked [`DrawConfig::has`].
    pub fn parameter<T: ConfigOption>(&self) -> &T {
        match self.get::<T>() {
            Some(v) => v,
            None => panic!("draw configuration parameter {:?} read without its flag", T::FLAG),
        }
    }

    /// Iterates the options in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &DrawOption> { self.options[..self.count].iter().filter_map(|o| o.as_ref()) }

    fn slot_of(&self, flag: ConfigFlag) -> Option<usize> { self.options[..self.count].iter().position(|o| o.as_ref().map(|o| o.flag() == flag).unwrap_or(false)) }

    /// Temporarily overrides (or adds) the option of kind `T`. The returned token must be handed to
    /// [`DrawConfig::restore_flag`] before the caller returns.
    pub fn set_existing_flag<T: ConfigOption>(&mut self, option: T) -> SavedFlag {
        match self.slot_of(T::FLAG) {
            Some(slot) => match self.options[slot].replace(option.into_option()) {
                Some(previous) => SavedFlag::Replaced(previous),
                None => unreachable!("configuration slot below count is always occupied"),
            },
            None => {
                self.add_flag(option);
                SavedFlag::Added(T::FLAG)
            }
        }
    }

    /// Undoes a [`DrawConfig::set_existing_flag`].
    pub fn restore_flag(&mut self, saved: SavedFlag) {
        match saved {
            SavedFlag::Replaced(previous) => {
                let slot = self.slot_of(previous.flag());
                assert!(slot.is_some(), "restoring option {:?} that was removed in between", previous.flag());
                if let Some(slot) = slot {
                    self.options[slot] = Some(previous);
                }
            }
            SavedFlag::Added(flag) => {
                self.remove_flag(flag);
            }
        }
    }

    /// Runs `f` with `option` overriding the current option of its kind, restoring afterwards.
    pub fn with_override<T: ConfigOption, R>(&mut self, option: T, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = self.set_existing_flag(option);
        let result = f(self);
        self.restore_flag(saved);
        result
    }

    /// Removes the option with presence bit `flag`, keeping the order of the others.
    pub fn remove_flag(&mut self, flag: ConfigFlag) -> Option<DrawOption> {
        let slot = self.slot_of(flag)?;
        let removed = self.options[slot].take();
        for i in slot..self.count - 1 {
            self.options[i] = self.options[i + 1].take();
        }
        self.count -= 1;
        self.flags.remove(flag);
        removed
    }

    /// Color option or `fallback`.
    pub fn color_or(&self, fallback: Color) -> Color { self.get::<ColorOption>().map(|c| c.0).unwrap_or(fallback) }

    /// Phase option or [`DrawPhase::Normal`].
    pub fn phase(&self) -> DrawPhase { self.get::<PhaseOption>().map(|p| p.0).unwrap_or_default() }

    /// Alignment option or the default alignment.
    pub fn alignment(&self) -> Alignment { self.get::<Alignment>().copied().unwrap_or_default() }
}
