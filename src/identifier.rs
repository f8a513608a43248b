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
//! Identifier stack: callers push suffixes around repeated widgets so that the same local name
//! resolves to distinct cache keys, and stays stable from one frame to the next.

use std::collections::HashSet;

use rand::{rng, Rng};

const SEPARATOR: char = '#';

#[derive(Default, Clone, Debug)]
/// Stack of identifier suffixes.
pub struct IdentifierStack {
    marks: Vec<usize>,
    suffix: String,
}

impl IdentifierStack {
    /// Creates an empty stack.
    pub fn new() -> Self { Self::default() }

    /// Pushes `segment` onto the suffix.
    pub fn push(&mut self, segment: &str) {
        self.marks.push(self.suffix.len());
        self.suffix.push(SEPARATOR);
        self.suffix.push_str(segment);
    }

    /// Pushes a loop index onto the suffix.
    pub fn push_index(&mut self, index: usize) { self.push(&index.to_string()) }

    /// Pops the most recent segment.
    ///
    /// Panics when the stack is empty.
    pub fn pop(&mut self) {
        match self.marks.pop() {
            Some(mark) => self.suffix.truncate(mark),
            None => panic!("identifier stack popped more often than pushed"),
        }
    }

    /// Number of pushed segments.
    pub fn depth(&self) -> usize { self.marks.len() }

    /// Current suffix.
    pub fn suffix(&self) -> &str { &self.suffix }

    /// Concatenates `name` with the current suffix.
    pub fn resolve(&self, name: &str) -> String {
        let mut id = String::with_capacity(name.len() + self.suffix.len());
        id.push_str(name);
        id.push_str(&self.suffix);
        id
    }
}

/// Returns `prefix` followed by a random tag, for widgets created outside the stack discipline.
pub fn random_identifier(prefix: &str) -> String {
    let tag: u64 = rng().random();
    format!("{}{}{:016x}", prefix, SEPARATOR, tag)
}

#[derive(Default, Debug)]
/// Identifiers drawn in the current frame of one window.
pub(crate) struct DrawnIdentifiers {
    seen: HashSet<String>,
}

impl DrawnIdentifiers {
    /// Records `id`; a second record in the same frame is a caller bug that would alias two widgets.
    pub fn record(&mut self, id: &str) {
        if self.seen.insert(id.to_string()) {
            return;
        }
        #[cfg(debug_assertions)]
        panic!("identifier '{}' drawn twice in one frame; push the identifier stack around repeated widgets", id);
        #[cfg(not(debug_assertions))]
        log::warn!("identifier '{}' drawn twice in one frame; widget state is shared", id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_appends_suffix() {
        let mut stack = IdentifierStack::new();
        assert_eq!(stack.resolve("button"), "button");
        stack.push("row");
        stack.push_index(3);
        assert_eq!(stack.resolve("button"), "button#row#3");
        stack.pop();
        assert_eq!(stack.resolve("button"), "button#row");
        stack.pop();
        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.resolve("button"), "button");
    }

    #[test]
    #[should_panic(expected = "popped more often")]
    fn unbalanced_pop_panics() { IdentifierStack::new().pop(); }

    #[test]
    fn random_identifiers_differ() {
        let a = random_identifier("menu");
        let b = random_identifier("menu");
        assert!(a.starts_with("menu#"));
        assert_ne!(a, b);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "drawn twice")]
    fn duplicate_in_frame_is_detected() {
        let mut drawn = DrawnIdentifiers::default();
        drawn.record("x");
        drawn.record("x");
    }
}
