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
//! Headless frame loop: draws a small form for a few frames, feeding synthetic input, and prints
//! the vertex counts each phase would hand to a renderer.

use std::cell::RefCell;
use std::rc::Rc;

use ui_drawer::*;

#[derive(Default)]
struct Tally {
    solid: [usize; 3],
    sprites: [usize; 3],
    text: [usize; 3],
}

impl RenderBackend for Tally {
    fn draw_solid(&mut self, phase: DrawPhase, _: &[SolidVertex], count: usize) { self.solid[phase.index()] += count; }
    fn draw_sprites(&mut self, phase: DrawPhase, _: TextureId, _: &[SpriteVertex], count: usize) { self.sprites[phase.index()] += count; }
    fn draw_text(&mut self, phase: DrawPhase, _: &[SpriteVertex], count: usize) { self.text[phase.index()] += count; }
}

#[derive(Default)]
struct Form {
    name: String,
    volume: f32,
    quality: usize,
    muted: bool,
    notes: Vec<(String, String)>,
}

fn main() {
    env_logger::init();
    let glyphs = Rc::new(MonospaceGlyphs::new(0.5));
    let mut sys = UiSystem::new(glyphs, DrawerStyle::default(), UIBox::new(0.0, 0.0, 640.0, 480.0));
    let form = Rc::new(RefCell::new(Form { name: "untitled".to_string(), volume: 0.5, ..Default::default() }));

    let state = form.clone();
    sys.create_window(WindowDescriptor::new("form", UIBox::new(20.0, 20.0, 400.0, 300.0), move |d| {
        let mut form = state.borrow_mut();
        d.set_draw_mode(DrawMode::NextRow, 0);
        d.text_label("title", "Settings", &DrawConfig::new());
        d.text_input("name", &mut form.name, 32, &DrawConfig::new());
        d.slider("volume", &mut form.volume, 0.0..=1.0, 0.05, &DrawConfig::new());
        d.combo_box("quality", &mut form.quality, &["low", "medium", "high"], &DrawConfig::new());
        let mut muted = form.muted;
        d.state_button("mute", "Mute", &mut muted, &DrawConfig::new());
        form.muted = muted;
        if d.button("add_note", "Add note", &DrawConfig::new()) {
            // stable across reorders
            let text = format!("note {}", form.notes.len() + 1);
            form.notes.push((random_identifier("note"), text));
        }
        for (id, text) in form.notes.iter() {
            d.text_label(id, text, &DrawConfig::new());
        }
        d.menu(
            "file",
            "File",
            || MenuDescriptor::new().row("Save", ActionHandler::new(|_| {})).submenu("Export", |m| m.row("PNG", ActionHandler::new(|_| {}))),
            &DrawConfig::new(),
        );
    }));

    let script: [(f32, f32, bool); 8] = [
        (60.0, 70.0, true),
        (60.0, 70.0, false),
        (80.0, 220.0, true),
        (80.0, 220.0, false),
        (80.0, 220.0, true),
        (80.0, 220.0, false),
        (200.0, 400.0, true),
        (200.0, 400.0, false),
    ];
    for (frame, (x, y, down)) in script.iter().enumerate() {
        {
            let input = sys.input();
            let mut input = input.borrow_mut();
            input.mousemove(*x, *y);
            if *down {
                input.mousedown(*x, *y, MouseButton::LEFT);
            } else {
                input.mouseup(*x, *y, MouseButton::LEFT);
            }
        }
        sys.frame(1.0 / 60.0);
        let mut tally = Tally::default();
        sys.render(&mut tally);
        for phase in DrawPhase::ALL {
            let i = phase.index();
            println!("frame {} {:?}: solid {} sprite {} text {}", frame, phase, tally.solid[i], tally.sprites[i], tally.text[i]);
        }
    }
    let form = form.borrow();
    println!("name '{}' volume {:.2} quality {} muted {} notes {}", form.name, form.volume, form.quality, form.muted, form.notes.len());
}
