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
//! Single-line text input. The widget keeps its own glyph vertex array and splices it on every
//! edit instead of reshaping the whole string; each edit is recorded in the window's revert stack.

use std::ops::Range;

use crate::*;

/// Character filter of a text input; rejected characters never reach the buffer.
pub type CharacterFilter = fn(char) -> bool;

#[derive(Clone, Debug)]
/// Persistent state of a text input.
pub struct TextInput {
    text: String,
    capacity: usize,
    caret: usize,
    selection_anchor: usize,
    is_currently_selected: bool,
    editing: bool,
    vertices: Vec<SpriteVertex>,
    width: f32,
    font_size: f32,
    spacing: f32,
    color: Color,
    zoom: Vec2f,
    epoch: u64,
    shapes: usize,
    pub(crate) view_offset: f32,
    filter: Option<CharacterFilter>,
    pending_commit: Option<String>,
}

impl TextInput {
    /// Creates an empty input accepting at most `capacity` characters.
    pub fn new(capacity: usize) -> Self {
        Self {
            text: String::new(),
            capacity,
            caret: 0,
            selection_anchor: 0,
            is_currently_selected: false,
            editing: false,
            vertices: Vec::with_capacity(capacity * QUAD_VERTICES),
            width: 0.0,
            font_size: 0.0,
            spacing: 0.0,
            color: Color::default(),
            zoom: vec2f(1.0, 1.0),
            epoch: 0,
            shapes: 0,
            view_offset: 0.0,
            filter: None,
            pending_commit: None,
        }
    }

    /// Restricts the accepted characters.
    pub fn with_filter(mut self, filter: CharacterFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Current text.
    pub fn text(&self) -> &str { &self.text }

    /// Number of characters.
    pub fn len(&self) -> usize { self.vertices.len() / QUAD_VERTICES }

    /// Returns `true` when the text is empty.
    pub fn is_empty(&self) -> bool { self.vertices.is_empty() }

    /// Maximum number of characters.
    pub fn capacity(&self) -> usize { self.capacity }

    /// Caret position as a character index.
    pub fn caret(&self) -> usize { self.caret }

    /// Selected character range, if any.
    pub fn selection(&self) -> Option<Range<usize>> {
        if !self.is_currently_selected {
            return None;
        }
        Some(self.caret.min(self.selection_anchor)..self.caret.max(self.selection_anchor))
    }

    /// Selected text, if any.
    pub fn selected_text(&self) -> Option<&str> { self.selection().map(|r| &self.text[char_range_to_bytes(&self.text, r)]) }

    /// Returns `true` while the input has keyboard focus.
    pub fn is_editing(&self) -> bool { self.editing }

    /// Local-space glyph vertices, one quad per character.
    pub fn vertices(&self) -> &[SpriteVertex] { &self.vertices }

    /// Width of the text at the current zoom.
    pub fn width(&self) -> f32 { self.width }

    /// Number of full shaping passes performed so far.
    pub fn shape_count(&self) -> usize { self.shapes }

    /// Local x of the boundary before character `index`.
    pub fn x_of(&self, index: usize) -> f32 {
        match self.vertices.get(index * QUAD_VERTICES) {
            Some(v) if index < self.len() => v.position.x,
            _ => self.width,
        }
    }

    /// Character boundary nearest to local `x`.
    pub fn character_at(&self, x: f32) -> usize {
        let len = self.len();
        (0..len).find(|i| x < (self.x_of(*i) + self.x_of(i + 1)) * 0.5).unwrap_or(len)
    }

    /// Updates the shaping parameters. Font or epoch changes reshape, a zoom change rescales the
    /// vertex array in place, a color change recolors it.
    pub fn configure(&mut self, glyphs: &dyn GlyphSource, params: TextOption, zoom: Vec2f, epoch: u64) {
        if self.shapes == 0 || self.font_size != params.size || self.spacing != params.spacing || self.epoch != epoch {
            self.font_size = params.size;
            self.spacing = params.spacing;
            self.color = params.color;
            self.zoom = zoom;
            self.epoch = epoch;
            self.reshape(glyphs);
            return;
        }
        if self.zoom.x != zoom.x || self.zoom.y != zoom.y {
            let (fx, fy) = (zoom.x / self.zoom.x, zoom.y / self.zoom.y);
            for v in self.vertices.iter_mut() {
                v.position = vec2f(v.position.x * fx, v.position.y * fy);
            }
            self.width *= fx;
            self.view_offset *= fx;
            self.zoom = zoom;
        }
        if self.color != params.color {
            self.color = params.color;
            for v in self.vertices.iter_mut() {
                v.color = params.color;
            }
        }
    }

    fn reshape(&mut self, glyphs: &dyn GlyphSource) {
        self.vertices.clear();
        let span = convert_characters_to_sprites(glyphs, &self.text, Vec2f::default(), &mut self.vertices, self.color, self.font_size, self.spacing);
        for v in self.vertices.iter_mut() {
            v.position = vec2f(v.position.x * self.zoom.x, v.position.y * self.zoom.y);
        }
        self.width = span.x * self.zoom.x;
        self.shapes += 1;
    }

    /// Replaces the text without recording an edit; the text is cut to the capacity.
    pub fn set_text(&mut self, glyphs: &dyn GlyphSource, text: &str) {
        self.text.clear();
        self.text.extend(text.chars().take(self.capacity));
        self.reshape(glyphs);
        self.caret = self.len();
        self.selection_anchor = self.caret;
        self.is_currently_selected = false;
        self.view_offset = 0.0;
    }

    fn check(&self, s: &str, removed: usize) -> Result<usize, TextEditError> {
        if let Some(filter) = self.filter {
            if let Some(c) = s.chars().find(|c| !filter(*c)) {
                return Err(TextEditError::Rejected(c));
            }
        }
        let count = s.chars().count();
        let requested = self.len() - removed + count;
        if requested > self.capacity {
            return Err(TextEditError::CapacityExceeded { requested, capacity: self.capacity });
        }
        Ok(count)
    }

    fn splice_in(&mut self, glyphs: &dyn GlyphSource, at: usize, s: &str) {
        let x = self.x_of(at);
        let mut run = Vec::with_capacity(s.len() * QUAD_VERTICES);
        let span = convert_characters_to_sprites(glyphs, s, Vec2f::default(), &mut run, self.color, self.font_size, self.spacing);
        let dx = span.x * self.zoom.x;
        for v in run.iter_mut() {
            v.position = vec2f(v.position.x * self.zoom.x + x, v.position.y * self.zoom.y);
        }
        let start = at * QUAD_VERTICES;
        for v in self.vertices[start..].iter_mut() {
            v.position.x += dx;
        }
        self.vertices.splice(start..start, run);
        let byte = char_index_to_byte(&self.text, at);
        self.text.insert_str(byte, s);
        self.width += dx;
    }

    fn splice_out(&mut self, at: usize, end: usize) -> String {
        let dx = self.x_of(end) - self.x_of(at);
        self.vertices.drain(at * QUAD_VERTICES..end * QUAD_VERTICES);
        for v in self.vertices[at * QUAD_VERTICES..].iter_mut() {
            v.position.x -= dx;
        }
        self.width -= dx;
        let bytes = char_range_to_bytes(&self.text, at..end);
        self.text.drain(bytes).collect()
    }

    fn clamp_caret(&mut self) {
        let len = self.len();
        self.caret = self.caret.min(len);
        self.selection_anchor = self.selection_anchor.min(len);
        self.is_currently_selected = self.caret != self.selection_anchor;
    }

    /// Inserts `s` before character `at`.
    pub fn insert(&mut self, glyphs: &dyn GlyphSource, at: usize, s: &str) -> Result<RevertCommandKind, TextEditError> {
        let count = self.check(s, 0)?;
        let at = at.min(self.len());
        self.splice_in(glyphs, at, s);
        Ok(RevertCommandKind::TextAdd { text_position: at, text_count: count })
    }

    /// Removes up to `count` characters starting at `at`. Returns `None` when nothing was removed.
    pub fn remove(&mut self, at: usize, count: usize) -> Option<RevertCommandKind> {
        let len = self.len();
        let at = at.min(len);
        let end = (at + count).min(len);
        if at == end {
            return None;
        }
        let text = self.splice_out(at, end);
        self.clamp_caret();
        Some(RevertCommandKind::TextRemove { text_position: at, text_count: end - at, text })
    }

    /// Overwrites `count` characters at `at` with `s`. Nothing changes when `s` does not fit.
    pub fn replace(&mut self, glyphs: &dyn GlyphSource, at: usize, count: usize, s: &str) -> Result<RevertCommandKind, TextEditError> {
        let at = at.min(self.len());
        let end = (at + count).min(self.len());
        let written = self.check(s, end - at)?;
        let replaced = if end > at { self.splice_out(at, end) } else { String::new() };
        self.splice_in(glyphs, at, s);
        self.clamp_caret();
        Ok(RevertCommandKind::TextReplace { text_position: at, text_count: written, replaced })
    }

    /// Applies the inverse of `command` and places the caret after the restored text.
    pub fn revert(&mut self, glyphs: &dyn GlyphSource, command: &RevertCommandKind) {
        match command {
            RevertCommandKind::TextAdd { text_position, text_count } => {
                self.remove(*text_position, *text_count);
                self.move_caret(*text_position, false);
            }
            RevertCommandKind::TextRemove { text_position, text_count, text } => {
                if let Err(err) = self.insert(glyphs, *text_position, text) {
                    log::warn!("undo of a removal failed: {}", err);
                }
                self.move_caret(text_position + text_count, false);
            }
            RevertCommandKind::TextReplace { text_position, text_count, replaced } => {
                self.remove(*text_position, *text_count);
                if let Err(err) = self.insert(glyphs, *text_position, replaced) {
                    log::warn!("undo of a replacement failed: {}", err);
                }
                self.move_caret(text_position + replaced.chars().count(), false);
            }
        }
    }

    /// Moves the caret; with `extend` the selection anchor stays, otherwise it follows.
    pub fn move_caret(&mut self, to: usize, extend: bool) {
        self.caret = to.min(self.len());
        if !extend {
            self.selection_anchor = self.caret;
        }
        self.is_currently_selected = self.caret != self.selection_anchor;
    }

    /// Selects the whole text.
    pub fn select_all(&mut self) {
        self.selection_anchor = 0;
        self.move_caret(self.len(), true);
    }

    /// Gives the input focus with its whole text selected.
    pub fn begin_edit(&mut self) {
        self.editing = true;
        self.select_all();
    }

    /// Leaves editing and queues the text for the owner's next draw. Returns `false` when the input
    /// was not editing.
    pub fn commit(&mut self) -> bool {
        if !self.editing {
            return false;
        }
        self.editing = false;
        self.move_caret(self.caret, false);
        self.pending_commit = Some(self.text.clone());
        true
    }

    pub(crate) fn take_commit(&mut self) -> Option<String> { self.pending_commit.take() }

    fn delete_selection(&mut self) -> Option<RevertCommandKind> {
        let range = self.selection()?;
        let command = self.remove(range.start, range.len());
        self.move_caret(range.start, false);
        command
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum EditOutcome {
    Continue,
    Committed,
    Tabbed,
}

struct EditEnv<'a> {
    owner: ResourceHandle,
    glyphs: &'a dyn GlyphSource,
    clipboard: &'a ClipboardHandle,
    input: &'a InputSnapshot,
    bounds: UIBox,
    padding: f32,
}

fn record(revert: &mut RevertCommandStack, owner: ResourceHandle, kind: Option<RevertCommandKind>) {
    if let Some(kind) = kind {
        revert.push(RevertCommand { owner, kind });
    }
}

fn undo(resources: &mut WindowResources, revert: &mut RevertCommandStack, glyphs: &dyn GlyphSource) {
    let Some(command) = revert.pop() else {
        return;
    };
    match resources.get_mut::<TextInput>(command.owner) {
        Some(target) => target.revert(glyphs, &command.kind),
        None => log::warn!("revert command for a released text input dropped"),
    }
}

fn apply_edit(resources: &mut WindowResources, revert: &mut RevertCommandStack, env: &EditEnv<'_>, mode: ActionMode) -> EditOutcome {
    let input = env.input;
    let owner = env.owner;
    let Some(state) = resources.get_mut::<TextInput>(owner) else {
        return EditOutcome::Continue;
    };
    let committed = |state: &mut TextInput| if state.commit() { EditOutcome::Committed } else { EditOutcome::Continue };
    if mode == ActionMode::CleanUp {
        return committed(state);
    }

    if input.mouse_pressed.is_left() {
        if !env.bounds.contains(input.mouse_pos) {
            return committed(state);
        }
        let index = state.character_at(input.mouse_pos.x - env.bounds.x() - env.padding + state.view_offset);
        state.editing = true;
        state.move_caret(index, input.key_mods.is_shift());
    } else if input.mouse_down.is_left() && state.editing && input.mouse_delta.x != 0.0 {
        let index = state.character_at(input.mouse_pos.x - env.bounds.x() - env.padding + state.view_offset);
        state.move_caret(index, true);
    }
    if !state.editing {
        return EditOutcome::Continue;
    }

    if input.shortcut(KeyCode::Z) {
        undo(resources, revert, env.glyphs);
        return EditOutcome::Continue;
    }

    let shift = input.key_mods.is_shift();
    if input.shortcut(KeyCode::A) {
        state.select_all();
    } else if input.shortcut(KeyCode::C) || input.shortcut(KeyCode::X) {
        if let Some(selected) = state.selected_text() {
            env.clipboard.borrow_mut().set_text(selected);
            if input.shortcut(KeyCode::X) {
                let command = state.delete_selection();
                record(revert, owner, command);
            }
        }
    } else if input.shortcut(KeyCode::V) {
        let pasted = env.clipboard.borrow().get_text().map(|t| t.chars().filter(|c| !c.is_control()).collect::<String>());
        if let Some(pasted) = pasted.filter(|t| !t.is_empty()) {
            let range = state.selection().unwrap_or(state.caret..state.caret);
            match state.replace(env.glyphs, range.start, range.len(), &pasted) {
                Ok(command) => {
                    let written = pasted.chars().count();
                    record(revert, owner, Some(command));
                    state.move_caret(range.start + written, false);
                }
                Err(err) => log::debug!("paste rejected: {}", err),
            }
        }
    } else {
        if input.key_pressed(KeyCode::LEFT) {
            state.move_caret(state.caret.saturating_sub(1), shift);
        }
        if input.key_pressed(KeyCode::RIGHT) {
            state.move_caret(state.caret + 1, shift);
        }
        if input.key_pressed(KeyCode::HOME | KeyCode::UP) {
            state.move_caret(0, shift);
        }
        if input.key_pressed(KeyCode::END | KeyCode::DOWN) {
            state.move_caret(state.len(), shift);
        }
        if input.key_code_pressed.is_backspace() {
            let command = if state.is_currently_selected {
                state.delete_selection()
            } else if state.caret > 0 {
                let at = state.caret - 1;
                let command = state.remove(at, 1);
                state.move_caret(at, false);
                command
            } else {
                None
            };
            record(revert, owner, command);
        }
        if input.key_code_pressed.is_delete() {
            let command = if state.is_currently_selected { state.delete_selection() } else { state.remove(state.caret, 1) };
            record(revert, owner, command);
        }
        for c in input.text_input.chars().filter(|c| !c.is_control()) {
            let mut buf = [0u8; 4];
            let typed = c.encode_utf8(&mut buf);
            let range = state.selection().unwrap_or(state.caret..state.caret);
            let result = if range.is_empty() { state.insert(env.glyphs, range.start, typed) } else { state.replace(env.glyphs, range.start, range.len(), typed) };
            match result {
                Ok(command) => {
                    record(revert, owner, Some(command));
                    state.move_caret(range.start + 1, false);
                }
                Err(err) => log::trace!("character dropped: {}", err),
            }
        }
    }

    if input.key_pressed(KeyCode::TAB) {
        return if state.commit() { EditOutcome::Tabbed } else { EditOutcome::Continue };
    }
    if input.key_code_pressed.is_return() || input.key_code_pressed.is_escape() {
        return committed(state);
    }
    EditOutcome::Continue
}

/// General handler of a text input owned by `owner`. `on_commit` runs once per commit, with the
/// input's resource as the context owner.
pub(crate) fn text_input_handler(owner: ResourceHandle, padding: f32, phase: DrawPhase, on_commit: Option<ActionHandler>) -> ActionHandler {
    ActionHandler::new(move |ctx| {
        let mode = ctx.mode();
        if mode == ActionMode::Repeat {
            return;
        }
        let glyphs = ctx.glyphs();
        let clipboard = ctx.clipboard();
        let input = ctx.input().clone();
        let env = EditEnv { owner, glyphs: glyphs.as_ref(), clipboard: &clipboard, input: &input, bounds: ctx.bounds(), padding };
        let outcome = match ctx.window_mut() {
            Some(window) => apply_edit(&mut window.resources, &mut window.revert_commands, &env, mode),
            None => return,
        };
        if outcome == EditOutcome::Continue {
            return;
        }
        log::debug!("text input {:?} committed", owner);
        ctx.release_general_handler();
        if let Some(on_commit) = &on_commit {
            on_commit.call(ctx);
        }
        if outcome == EditOutcome::Tabbed {
            focus_next_input(ctx, owner);
        }
    })
    .with_phase(phase)
    .with_owner(owner)
}

/// Hands keyboard focus to the text input registered after `owner` in the same window, wrapping
/// to the first one.
fn focus_next_input(ctx: &mut ActionContext<'_>, owner: ResourceHandle) {
    let Some(window) = ctx.window_mut() else {
        return;
    };
    let inputs: Vec<RegisteredBox> = window
        .handlers
        .generals()
        .filter(|b| b.handler.owner.is_some_and(|o| window.resources.get::<TextInput>(o).is_some()))
        .cloned()
        .collect();
    let Some(current) = inputs.iter().position(|b| b.handler.owner == Some(owner)) else {
        return;
    };
    let next = inputs[(current + 1) % inputs.len()].clone();
    let Some(next_owner) = next.handler.owner.filter(|o| *o != owner) else {
        return;
    };
    if let Some(state) = window.resources.get_mut::<TextInput>(next_owner) {
        state.begin_edit();
    }
    log::debug!("focus moved from text input {:?} to {:?}", owner, next_owner);
    ctx.set_general_handler_at(next.rect, next.handler);
}

impl UIDrawer<'_> {
    /// Single-line text input bound to `text`. While the input is not focused, `text` is shown;
    /// while focused, the input's own buffer is authoritative. Returns `true` on the frame the
    /// edit is committed back into `text` (Enter, Escape, Tab, click-away, or focus transfer). A
    /// [`CallbackOption`] fires once per commit during dispatch.
    pub fn text_input(&mut self, name: &str, text: &mut String, capacity: usize, config: &DrawConfig) -> bool {
        let handle = self.resource(name, config, |_| TextInput::new(capacity));
        match self.text_field(handle, config, Some(text.as_str()), false) {
            Some(committed) => {
                *text = committed;
                true
            }
            None => false,
        }
    }

    /// Draws the text input resource `handle`. Returns the text committed since the last draw.
    /// While unfocused and without a pending commit, the input shows `bound`. With `focus` the
    /// input takes the general handler and selects its text.
    pub(crate) fn text_field(&mut self, handle: ResourceHandle, config: &DrawConfig, bound: Option<&str>, focus: bool) -> Option<String> {
        let params = self.text_params(config);
        let glyphs = self.glyphs();
        let zoom = self.window.zoom;
        let epoch = self.window.resources.epoch();
        let (committed, reset) = {
            let state = self.expect_resource::<TextInput>(handle);
            state.configure(glyphs.as_ref(), params, zoom, epoch);
            let committed = state.take_commit();
            let mut reset = false;
            if let Some(bound) = bound {
                if committed.is_none() && !state.editing && state.text != bound {
                    state.set_text(glyphs.as_ref(), bound);
                    reset = true;
                }
            }
            if focus {
                state.begin_edit();
            }
            (committed, reset)
        };
        // old positions no longer describe the replaced buffer
        if reset {
            self.window.revert_commands.clear_owner(handle);
        }

        let default = self.services.style.default_element_scale;
        let rect = self.element_box(config, default);
        let padding = self.zoomed(self.services.style.element_padding).x;
        let phase = config.phase();
        if self.is_visible(&rect, config) {
            self.draw_text_field(handle, &rect, config, params.size * zoom.y);
        }
        let on_commit = config.get::<CallbackOption>().map(|c| c.0.clone());
        let handler = text_input_handler(handle, padding, phase, on_commit);
        if focus {
            self.services.capture_general(self.handle, rect, handler.clone());
        }
        self.window.handlers.add_general(rect, handler);
        self.finalize_rectangle(&rect, config);
        committed
    }

    fn draw_text_field(&mut self, handle: ResourceHandle, rect: &UIBox, config: &DrawConfig, font_height: f32) {
        let inner = self.inner_box(rect);
        let style = &self.services.style;
        let (selection_color, caret_color) = (style.color(ThemeColor::Selection), style.color(ThemeColor::Caret));
        let (element, active) = (style.color(ThemeColor::Element), style.color(ThemeColor::ElementActive));
        let hover_percentage = style.hover_percentage;
        let caret_width = self.window.zoom.x.max(1.0);
        let phase = config.phase();

        let editing = self.window.resources.get::<TextInput>(handle).map(|s| s.editing).unwrap_or(false);
        let background = config.color_or(if editing { active } else { element });
        self.draw_background(rect, background, config);
        if !editing {
            self.window.handlers.add_default_hoverable(*rect, background, hover_percentage, phase);
        }

        let window = &mut *self.window;
        let Some(state) = window.resources.get_mut::<TextInput>(handle) else {
            return;
        };
        let caret_x = state.x_of(state.caret);
        if caret_x - state.view_offset > inner.width() {
            state.view_offset = caret_x - inner.width();
        }
        if caret_x < state.view_offset {
            state.view_offset = caret_x;
        }
        state.view_offset = state.view_offset.clamp(0.0, (state.width - inner.width()).max(0.0));
        let view = state.view_offset;
        let top = inner.y() + (inner.height() - font_height) * 0.5;
        let origin = vec2f(inner.x() - view, top);

        if let Some(range) = state.selection() {
            let start = (state.x_of(range.start) - view).max(0.0);
            let end = (state.x_of(range.end) - view).min(inner.width());
            if end > start {
                window.sink.push_solid_quad(phase, &UIBox::new(inner.x() + start, top, end - start, font_height), selection_color);
            }
        }
        for quad in state.vertices.chunks(QUAD_VERTICES) {
            let (left, right) = (quad[0].position.x - view, quad[1].position.x - view);
            if left >= 0.0 && right <= inner.width() + 0.5 {
                window.sink.push_text(phase, quad, origin);
            }
        }
        if state.editing {
            window.sink.push_solid_quad(phase, &UIBox::new(inner.x() + caret_x - view, top, caret_width, font_height), caret_color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::glyphs;

    fn input(capacity: usize) -> TextInput {
        let mut t = TextInput::new(capacity);
        t.configure(glyphs().as_ref(), TextOption { size: 16.0, spacing: 0.0, color: color(255, 255, 255, 255) }, vec2f(1.0, 1.0), 0);
        t
    }

    #[test]
    fn insert_splices_geometry() {
        let g = glyphs();
        let mut t = input(20);
        assert!(t.insert(g.as_ref(), 0, "held").is_ok());
        assert!(t.insert(g.as_ref(), 3, "l").is_ok());
        assert_eq!(t.text(), "helld");
        assert_eq!(t.x_of(4), 32.0);
        assert_eq!(t.width(), 40.0);
        let mut fresh = input(20);
        fresh.set_text(g.as_ref(), "helld");
        assert_eq!(t.vertices().len(), fresh.vertices().len());
        for (a, b) in t.vertices().iter().zip(fresh.vertices()) {
            assert_eq!((a.position.x, a.position.y), (b.position.x, b.position.y));
        }
        assert_eq!(t.shape_count(), 1);
    }

    #[test]
    fn overflow_is_rejected_without_mutation() {
        let g = glyphs();
        let mut t = input(4);
        assert!(t.insert(g.as_ref(), 0, "abc").is_ok());
        assert_eq!(t.insert(g.as_ref(), 3, "de"), Err(TextEditError::CapacityExceeded { requested: 5, capacity: 4 }));
        assert_eq!(t.replace(g.as_ref(), 0, 1, "xyz"), Err(TextEditError::CapacityExceeded { requested: 5, capacity: 4 }));
        assert_eq!(t.text(), "abc");
        assert_eq!(t.vertices().len(), 3 * QUAD_VERTICES);
    }

    #[test]
    fn filter_rejects_characters() {
        let g = glyphs();
        let mut t = TextInput::new(8).with_filter(|c| c.is_ascii_digit());
        t.configure(g.as_ref(), TextOption { size: 16.0, spacing: 0.0, color: Color::default() }, vec2f(1.0, 1.0), 0);
        assert_eq!(t.insert(g.as_ref(), 0, "1a"), Err(TextEditError::Rejected('a')));
        assert!(t.is_empty());
    }

    #[test]
    fn replace_reverts_to_original() {
        let g = glyphs();
        let mut t = input(20);
        t.set_text(g.as_ref(), "hello world");
        let before: Vec<f32> = t.vertices().iter().map(|v| v.position.x).collect();
        let command = t.replace(g.as_ref(), 6, 5, "there!");
        assert_eq!(t.text(), "hello there!");
        let Ok(command) = command else { panic!("replace failed") };
        assert_eq!(command, RevertCommandKind::TextReplace { text_position: 6, text_count: 6, replaced: "world".into() });
        t.revert(g.as_ref(), &command);
        assert_eq!(t.text(), "hello world");
        let after: Vec<f32> = t.vertices().iter().map(|v| v.position.x).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn shift_extends_selection_and_plain_moves_collapse() {
        let g = glyphs();
        let mut t = input(20);
        t.set_text(g.as_ref(), "abcdef");
        t.move_caret(2, false);
        t.move_caret(4, true);
        assert_eq!(t.selection(), Some(2..4));
        assert_eq!(t.selected_text(), Some("cd"));
        t.move_caret(5, false);
        assert_eq!(t.selection(), None);
        assert_eq!(t.caret(), 5);
    }

    #[test]
    fn zoom_rescales_in_place() {
        let g = glyphs();
        let mut t = input(20);
        t.set_text(g.as_ref(), "abc");
        t.configure(g.as_ref(), TextOption { size: 16.0, spacing: 0.0, color: color(255, 255, 255, 255) }, vec2f(2.0, 2.0), 0);
        assert_eq!(t.width(), 48.0);
        assert_eq!(t.x_of(1), 16.0);
        assert_eq!(t.shape_count(), 2);
    }

    #[test]
    fn character_at_picks_nearest_boundary() {
        let g = glyphs();
        let mut t = input(20);
        t.set_text(g.as_ref(), "abcd");
        assert_eq!(t.character_at(-3.0), 0);
        assert_eq!(t.character_at(3.0), 0);
        assert_eq!(t.character_at(5.0), 1);
        assert_eq!(t.character_at(100.0), 4);
    }
}
