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
use std::fmt;

use crate::WindowHandle;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Recoverable failures of a text edit. The buffer is left untouched when one is returned.
pub enum TextEditError {
    /// The edit would grow the text past the input's capacity.
    CapacityExceeded {
        /// Character count the edit would produce.
        requested: usize,
        /// Maximum number of characters the input accepts.
        capacity: usize,
    },
    /// The input's character filter rejected the character.
    Rejected(char),
}

impl fmt::Display for TextEditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded { requested, capacity } => write!(f, "text of {} characters exceeds capacity {}", requested, capacity),
            Self::Rejected(c) => write!(f, "character {:?} rejected by input filter", c),
        }
    }
}

impl std::error::Error for TextEditError {}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Failures of window lookups.
pub enum WindowError {
    /// No live window carries this name.
    NotFound(String),
    /// The handle refers to a window that has been destroyed.
    Destroyed(WindowHandle),
    /// The window is checked out while its own draw callback runs.
    Busy(WindowHandle),
}

impl fmt::Display for WindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(name) => write!(f, "window '{}' not found", name),
            Self::Destroyed(handle) => write!(f, "window {:?} has been destroyed", handle),
            Self::Busy(handle) => write!(f, "window {:?} is being drawn", handle),
        }
    }
}

impl std::error::Error for WindowError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let e = TextEditError::CapacityExceeded { requested: 21, capacity: 20 };
        assert_eq!(e.to_string(), "text of 21 characters exceeds capacity 20");
        assert_eq!(WindowError::NotFound("menu".into()).to_string(), "window 'menu' not found");
    }
}
