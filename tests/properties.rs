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
use proptest::prelude::*;
use ui_drawer::*;

fn white() -> Color { color(255, 255, 255, 255) }

proptest! {
    #[test]
    fn identifiers_resolve_the_same_every_frame(segments in prop::collection::vec("[a-z0-9]{1,6}", 0..5), name in "[a-z]{1,8}") {
        let frame = || {
            let mut stack = IdentifierStack::new();
            for segment in &segments {
                stack.push(segment);
            }
            let id = stack.resolve(&name);
            for _ in &segments {
                stack.pop();
            }
            (id, stack.depth())
        };
        let (first, depth) = frame();
        prop_assert_eq!(depth, 0);
        prop_assert_eq!(frame().0, first.clone());
        prop_assert!(first.starts_with(name.as_str()));
    }

    #[test]
    fn override_then_restore_leaves_config_unchanged(r in any::<u8>(), g in any::<u8>(), other in any::<u8>(), present in any::<bool>()) {
        let mut config = DrawConfig::new().with(ScaleOption(vec2f(10.0, 20.0))).with(PhaseOption(DrawPhase::Late));
        if present {
            config.add_flag(ColorOption(color(r, g, 0, 255)));
        }
        let before = config.clone();
        let saved = config.set_existing_flag(ColorOption(color(other, other, other, 255)));
        prop_assert_eq!(config.get::<ColorOption>(), Some(&ColorOption(color(other, other, other, 255))));
        config.restore_flag(saved);
        prop_assert_eq!(config, before);
    }

    #[test]
    fn undoing_every_insert_restores_the_buffer(initial in "[a-z ]{0,10}", inserts in prop::collection::vec((0usize..16, "[a-zA-Z]{1,3}"), 1..6)) {
        let glyphs = MonospaceGlyphs::new(0.5);
        let mut input = TextInput::new(40);
        input.configure(&glyphs, TextOption { size: 16.0, spacing: 0.0, color: white() }, vec2f(1.0, 1.0), 0);
        input.set_text(&glyphs, &initial);
        let text = input.text().to_string();
        let positions: Vec<f32> = input.vertices().iter().map(|v| v.position.x).collect();

        let mut commands = Vec::new();
        for (at, s) in &inserts {
            let command = input.insert(&glyphs, *at, s);
            prop_assert!(command.is_ok());
            commands.extend(command.ok());
        }
        for command in commands.iter().rev() {
            input.revert(&glyphs, command);
        }

        prop_assert_eq!(input.text(), text.as_str());
        prop_assert_eq!(input.len(), initial.chars().count());
        let restored: Vec<f32> = input.vertices().iter().map(|v| v.position.x).collect();
        prop_assert_eq!(restored.len(), positions.len());
        for (a, b) in restored.iter().zip(positions.iter()) {
            prop_assert!((a - b).abs() < 1e-3);
        }
    }

    #[test]
    fn exact_fit_stays_on_the_row_and_overflow_wraps(first in 1u16..100, width in 200u16..400) {
        let (first, width) = (first as f32, width as f32);
        let metrics = LayoutMetrics { padding: vec2f(0.0, 0.0), element_indentation: 0.0, row_offset: 2.0 };
        let row = |second: f32| {
            let mut layout = LayoutEngine::new(UIBox::new(0.0, 0.0, width, 500.0), Vec2f::default(), metrics);
            layout.set_draw_mode(DrawMode::FitSpace, 0);
            let a = layout.place(vec2f(first, 10.0), DrawBehaviour::NONE);
            layout.finalize_rectangle(&a, DrawBehaviour::NONE);
            layout.place(vec2f(second, 10.0), DrawBehaviour::NONE)
        };
        let exact = row(width - first);
        prop_assert_eq!((exact.x(), exact.y()), (first, 0.0));
        let over = row(width - first + 1.0);
        prop_assert_eq!((over.x(), over.y()), (0.0, 12.0));
    }
}
