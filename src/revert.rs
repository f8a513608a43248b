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
//! Bounded per-window undo log of text edits.

use std::collections::VecDeque;

use crate::ResourceHandle;

#[derive(Clone, Debug, PartialEq, Eq)]
/// What an edit did, recorded so that it can be inverted.
pub enum RevertCommandKind {
    /// `text_count` characters were inserted at `text_position`; undo removes them.
    TextAdd {
        /// Character index of the insertion.
        text_position: usize,
        /// Number of inserted characters.
        text_count: usize,
    },
    /// `text` was removed from `text_position`; undo inserts it back.
    TextRemove {
        /// Character index of the removal.
        text_position: usize,
        /// Number of removed characters.
        text_count: usize,
        /// The removed characters.
        text: String,
    },
    /// `replaced` at `text_position` was overwritten by `text_count` characters; undo swaps it back.
    TextReplace {
        /// Character index of the replacement.
        text_position: usize,
        /// Number of characters written.
        text_count: usize,
        /// The overwritten characters.
        replaced: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// An undoable edit and the text input resource it applies to.
pub struct RevertCommand {
    /// Text input the edit belongs to.
    pub owner: ResourceHandle,
    /// The edit.
    pub kind: RevertCommandKind,
}

#[derive(Clone, Debug)]
/// Fixed-capacity stack; pushing onto a full stack evicts the oldest command.
pub struct RevertCommandStack {
    commands: VecDeque<RevertCommand>,
    capacity: usize,
}

impl RevertCommandStack {
    /// Creates an empty stack holding at most `capacity` commands.
    pub fn new(capacity: usize) -> Self { Self { commands: VecDeque::with_capacity(capacity), capacity: capacity.max(1) } }

    /// Pushes a command, evicting the oldest one when full.
    pub fn push(&mut self, command: RevertCommand) {
        if self.commands.len() == self.capacity {
            self.commands.pop_front();
        }
        self.commands.push_back(command);
    }

    /// Pops the most recent command.
    pub fn pop(&mut self) -> Option<RevertCommand> { self.commands.pop_back() }

    /// Most recent command.
    pub fn last(&self) -> Option<&RevertCommand> { self.commands.back() }

    /// Number of stored commands.
    pub fn len(&self) -> usize { self.commands.len() }

    /// Returns `true` when empty.
    pub fn is_empty(&self) -> bool { self.commands.is_empty() }

    /// Iterates from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &RevertCommand> { self.commands.iter() }

    /// Drops every command of `owner`.
    pub fn clear_owner(&mut self, owner: ResourceHandle) { self.commands.retain(|c| c.owner != owner); }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WindowResources;

    #[test]
    fn oldest_command_is_evicted() {
        let mut res = WindowResources::new(1);
        let owner = res.get_or_create("input", |_| ());
        let mut stack = RevertCommandStack::new(2);
        for i in 0..3 {
            stack.push(RevertCommand { owner, kind: RevertCommandKind::TextAdd { text_position: i, text_count: 1 } });
        }
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.pop().map(|c| c.kind), Some(RevertCommandKind::TextAdd { text_position: 2, text_count: 1 }));
        assert_eq!(stack.pop().map(|c| c.kind), Some(RevertCommandKind::TextAdd { text_position: 1, text_count: 1 }));
        assert!(stack.pop().is_none());
    }

    #[test]
    fn clear_owner_keeps_others() {
        let mut res = WindowResources::new(1);
        let a = res.get_or_create("a", |_| ());
        let b = res.get_or_create("b", |_| ());
        let mut stack = RevertCommandStack::new(8);
        stack.push(RevertCommand { owner: a, kind: RevertCommandKind::TextAdd { text_position: 0, text_count: 1 } });
        stack.push(RevertCommand { owner: b, kind: RevertCommandKind::TextAdd { text_position: 0, text_count: 1 } });
        stack.clear_owner(a);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.last().map(|c| c.owner), Some(b));
    }
}
