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
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use ui_drawer::*;

fn system() -> UiSystem { UiSystem::new(Rc::new(MonospaceGlyphs::new(0.5)), DrawerStyle::default(), UIBox::new(0.0, 0.0, 800.0, 600.0)) }

fn click(sys: &mut UiSystem, x: f32, y: f32) {
    sys.input().borrow_mut().mousedown(x, y, MouseButton::LEFT);
    sys.frame(0.016);
    sys.input().borrow_mut().mouseup(x, y, MouseButton::LEFT);
    sys.frame(0.016);
}

fn press_key(sys: &mut UiSystem, code: KeyCode) {
    sys.input().borrow_mut().keydown_code(code);
    sys.frame(0.016);
    sys.input().borrow_mut().keyup_code(code);
}

fn shortcut(sys: &mut UiSystem, code: KeyCode) {
    sys.input().borrow_mut().keydown(KeyMode::CTRL);
    press_key(sys, code);
    sys.input().borrow_mut().keyup(KeyMode::CTRL);
}

fn type_text(sys: &mut UiSystem, text: &str) {
    sys.input().borrow_mut().text(text);
    sys.frame(0.016);
}

fn bound_input(sys: &mut UiSystem, name: &'static str) -> (WindowHandle, Rc<RefCell<String>>, Rc<Cell<usize>>) {
    let bound = Rc::new(RefCell::new(String::new()));
    let commits = Rc::new(Cell::new(0));
    let (shown, count) = (bound.clone(), commits.clone());
    let w = sys.create_window(WindowDescriptor::new("editor", UIBox::new(0.0, 0.0, 300.0, 100.0), move |d| {
        let mut text = shown.borrow().clone();
        if d.text_input(name, &mut text, 20, &DrawConfig::new()) {
            *shown.borrow_mut() = text;
            count.set(count.get() + 1);
        }
    }));
    (w, bound, commits)
}

fn text_input_state(sys: &UiSystem, w: WindowHandle, name: &str) -> Option<(String, usize)> {
    let window = sys.window(w).ok()?;
    let input = window.resources().find(name).and_then(|h| window.resources().get::<TextInput>(h))?;
    Some((input.text().to_string(), input.caret()))
}

#[test]
fn typing_then_backspace_records_revert_commands() {
    let mut sys = system();
    let bound = Rc::new(RefCell::new(String::new()));
    let shown = bound.clone();
    let w = sys.create_window(WindowDescriptor::new("editor", UIBox::new(0.0, 0.0, 300.0, 100.0), move |d| {
        let mut text = shown.borrow().clone();
        if d.text_input("name", &mut text, 20, &DrawConfig::new()) {
            *shown.borrow_mut() = text;
        }
    }));

    click(&mut sys, 20.0, 20.0);
    sys.input().borrow_mut().text("hello");
    sys.frame(0.016);
    assert_eq!(text_input_state(&sys, w, "name"), Some(("hello".to_string(), 5)));

    let adds: Vec<RevertCommandKind> = sys.window(w).map(|win| win.revert_commands().iter().map(|c| c.kind.clone()).collect()).unwrap_or_default();
    assert_eq!(adds.len(), 5);
    for (i, kind) in adds.iter().enumerate() {
        assert_eq!(*kind, RevertCommandKind::TextAdd { text_position: i, text_count: 1 });
    }

    press_key(&mut sys, KeyCode::BACKSPACE);
    assert_eq!(text_input_state(&sys, w, "name"), Some(("hell".to_string(), 4)));
    let last = sys.window(w).ok().and_then(|win| win.revert_commands().last().map(|c| c.kind.clone()));
    assert_eq!(last, Some(RevertCommandKind::TextRemove { text_position: 4, text_count: 1, text: "o".to_string() }));

    sys.input().borrow_mut().keydown(KeyMode::CTRL);
    press_key(&mut sys, KeyCode::Z);
    sys.input().borrow_mut().keyup(KeyMode::CTRL);
    assert_eq!(text_input_state(&sys, w, "name"), Some(("hello".to_string(), 5)));

    press_key(&mut sys, KeyCode::RETURN);
    sys.frame(0.016);
    assert_eq!(bound.borrow().as_str(), "hello");
    assert!(!sys.has_general_handler());
}

#[test]
fn duplicate_option_is_rejected() {
    let red = color(255, 0, 0, 255);
    let blue = color(0, 0, 255, 255);
    let mut config = DrawConfig::new();
    assert!(config.add_flag(ColorOption(red)));
    assert!(!config.add_flag(ColorOption(blue)));
    assert_eq!(config.get::<ColorOption>(), Some(&ColorOption(red)));
    assert_eq!(config.len(), 1);
}

#[derive(Default)]
struct Counter {
    solid: [usize; 3],
    text: [usize; 3],
}

impl RenderBackend for Counter {
    fn draw_solid(&mut self, phase: DrawPhase, _: &[SolidVertex], count: usize) { self.solid[phase.index()] += count; }
    fn draw_sprites(&mut self, _: DrawPhase, _: TextureId, _: &[SpriteVertex], _: usize) {}
    fn draw_text(&mut self, phase: DrawPhase, _: &[SpriteVertex], count: usize) { self.text[phase.index()] += count; }
}

#[test]
fn submenu_hover_spawns_one_child_inside_the_screen() {
    let mut sys = system();
    let w = sys.create_window(WindowDescriptor::new("bar", UIBox::new(680.0, 0.0, 120.0, 200.0), |d| {
        d.menu(
            "edit",
            "Edit",
            || {
                MenuDescriptor::new()
                    .row("Undo", ActionHandler::new(|_| {}))
                    .submenu("Transform", |m| m.row("Upper", ActionHandler::new(|_| {})).row("Lower", ActionHandler::new(|_| {})))
                    .row("Redo", ActionHandler::new(|_| {}))
            },
            &DrawConfig::new(),
        );
    }));

    click(&mut sys, 700.0, 20.0);
    assert_eq!(sys.windows().len(), 2);
    let root = sys.windows().order()[1];
    let root_region = sys.window_region(root).ok();
    assert_eq!(root_region.map(|r| r.right()), Some(800.0));

    let row = root_region.map(|r| vec2f(r.x() + 20.0, r.y() + 8.0 + 30.0 + 12.0)).unwrap_or_default();
    sys.input().borrow_mut().mousemove(row.x, row.y);
    let threshold = sys.style().menu_hover_threshold;
    let mut elapsed = 0.0;
    while elapsed < threshold * 3.0 {
        sys.frame(0.05);
        elapsed += 0.05;
    }
    assert_eq!(sys.windows().len(), 3);
    let child = sys.windows().order()[2];
    let region = sys.window_region(child).ok();
    assert!(region.map(|r| r.right() <= 800.0).unwrap_or(false));
    assert_eq!(sys.window(child).ok().and_then(|c| c.owner()).map(|o| o.window), Some(w));

    let mut counter = Counter::default();
    sys.render(&mut counter);
    assert!(counter.solid[DrawPhase::Late.index()] >= QUAD_VERTICES);
    assert!(counter.text[DrawPhase::Normal.index()] > 0);
}

#[test]
fn destroying_a_window_closes_its_combo_popup() {
    let mut sys = system();
    let selected = Rc::new(Cell::new(0usize));
    let value = selected.clone();
    let w = sys.create_window(WindowDescriptor::new("form", UIBox::new(0.0, 0.0, 300.0, 300.0), move |d| {
        let mut s = value.get();
        d.combo_box("mode", &mut s, &["fast", "slow"], &DrawConfig::new());
        value.set(s);
    }));
    click(&mut sys, 20.0, 20.0);
    assert_eq!(sys.windows().len(), 2);
    assert!(sys.destroy_window(w).is_ok());
    assert!(sys.windows().is_empty());
    sys.frame(0.016);
    assert_eq!(selected.get(), 0);
    assert!(matches!(sys.window(w), Err(WindowError::Destroyed(_)) | Err(WindowError::NotFound(_))));
}

#[test]
fn external_reset_drops_stale_undo_history() {
    let mut sys = system();
    let (w, bound, commits) = bound_input(&mut sys, "name");
    click(&mut sys, 20.0, 20.0);
    type_text(&mut sys, "abc");
    press_key(&mut sys, KeyCode::RETURN);
    sys.frame(0.016);
    assert_eq!(bound.borrow().as_str(), "abc");
    assert_eq!(commits.get(), 1);

    *bound.borrow_mut() = "xyz123".to_string();
    sys.frame(0.016);
    assert_eq!(text_input_state(&sys, w, "name").map(|s| s.0), Some("xyz123".to_string()));
    assert_eq!(sys.window(w).map(|win| win.revert_commands().len()).ok(), Some(0));

    click(&mut sys, 20.0, 20.0);
    shortcut(&mut sys, KeyCode::Z);
    assert_eq!(text_input_state(&sys, w, "name").map(|s| s.0), Some("xyz123".to_string()));
}

#[test]
fn rejected_character_keeps_the_selection() {
    let mut sys = system();
    let value = Rc::new(Cell::new(123i64));
    let shown = value.clone();
    let w = sys.create_window(WindowDescriptor::new("numbers", UIBox::new(0.0, 0.0, 300.0, 100.0), move |d| {
        let mut v = shown.get();
        d.input_int("count", &mut v, 0..=1000, &DrawConfig::new());
        shown.set(v);
    }));
    sys.frame(0.016);
    click(&mut sys, 20.0, 20.0);
    shortcut(&mut sys, KeyCode::A);
    type_text(&mut sys, "x");
    assert_eq!(text_input_state(&sys, w, "count").map(|s| s.0), Some("123".to_string()));
    assert_eq!(sys.window(w).map(|win| win.revert_commands().len()).ok(), Some(0));

    type_text(&mut sys, "4");
    assert_eq!(text_input_state(&sys, w, "count"), Some(("4".to_string(), 1)));
    press_key(&mut sys, KeyCode::RETURN);
    sys.frame(0.016);
    assert_eq!(value.get(), 4);
}

#[test]
fn paste_drops_control_characters() {
    let mut sys = system();
    let (w, _, _) = bound_input(&mut sys, "name");
    sys.clipboard().borrow_mut().set_text("ab\ncd\t");
    click(&mut sys, 20.0, 20.0);
    shortcut(&mut sys, KeyCode::V);
    assert_eq!(text_input_state(&sys, w, "name"), Some(("abcd".to_string(), 4)));
}

#[test]
fn tab_commits_once_and_focuses_the_next_input() {
    let mut sys = system();
    let first = Rc::new(RefCell::new(String::new()));
    let second = Rc::new(RefCell::new(String::new()));
    let commits = Rc::new(RefCell::new(Vec::new()));
    let (a, b, log) = (first.clone(), second.clone(), commits.clone());
    let w = sys.create_window(WindowDescriptor::new("form", UIBox::new(0.0, 0.0, 300.0, 200.0), move |d| {
        d.set_draw_mode(DrawMode::NextRow, 0);
        for (name, bound) in [("first", &a), ("second", &b)] {
            let mut text = bound.borrow().clone();
            if d.text_input(name, &mut text, 20, &DrawConfig::new()) {
                *bound.borrow_mut() = text;
                log.borrow_mut().push(name);
            }
        }
    }));

    click(&mut sys, 20.0, 20.0);
    type_text(&mut sys, "ab");
    press_key(&mut sys, KeyCode::TAB);
    sys.frame(0.016);
    assert_eq!(first.borrow().as_str(), "ab");
    assert_eq!(commits.borrow().as_slice(), &["first"]);
    let editing = |name: &str| {
        sys.window(w).ok().and_then(|win| win.resources().find(name).and_then(|h| win.resources().get::<TextInput>(h)).map(|t| t.is_editing()))
    };
    assert_eq!(editing("first"), Some(false));
    assert_eq!(editing("second"), Some(true));
    assert!(sys.has_general_handler());

    type_text(&mut sys, "c");
    assert_eq!(text_input_state(&sys, w, "second").map(|s| s.0), Some("c".to_string()));
    press_key(&mut sys, KeyCode::RETURN);
    sys.frame(0.016);
    assert_eq!(second.borrow().as_str(), "c");
    assert_eq!(commits.borrow().as_slice(), &["first", "second"]);
    assert!(!sys.has_general_handler());
}

#[test]
fn random_identifiers_keep_runtime_rows_apart() {
    let mut sys = system();
    let rows: Vec<(String, &str)> = vec![(random_identifier("note"), "todo"), (random_identifier("note"), "todo")];
    let ids: Vec<String> = rows.iter().map(|r| r.0.clone()).collect();
    let w = sys.create_window(WindowDescriptor::new("notes", UIBox::new(0.0, 0.0, 300.0, 200.0), move |d| {
        d.set_draw_mode(DrawMode::NextRow, 0);
        for (id, text) in rows.iter() {
            d.text_label(id, text, &DrawConfig::new());
        }
    }));
    sys.frame(0.016);
    sys.frame(0.016);
    let handles: Vec<Option<ResourceHandle>> = ids.iter().map(|id| sys.window(w).ok().and_then(|win| win.resources().find(id))).collect();
    assert!(handles.iter().all(|h| h.is_some()));
    assert_ne!(handles[0], handles[1]);
}
