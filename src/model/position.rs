// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Pythia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pythia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Position descriptors: the `file:#start[,#end]` strings the oracle expects in its `pos`
//! parameter.
//!
//! Offsets are character offsets into the displayed text. The oracle counts bytes, so the two
//! disagree for files with non-ASCII content before the selection. This is a known gap; no
//! conversion happens here.

use std::fmt;
use std::str::FromStr;

/// A text selection in the displayed source, read at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    file: String,
    start: usize,
    end: usize,
}

impl Selection {
    /// Builds a selection from two ends in either order.
    pub fn new(file: impl Into<String>, anchor: usize, head: usize) -> Self {
        Self {
            file: file.into(),
            start: anchor.min(head),
            end: anchor.max(head),
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn start_offset(&self) -> usize {
        self.start
    }

    pub fn end_offset(&self) -> usize {
        self.end
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    pub fn position(&self) -> PositionDescriptor {
        encode(&self.file, self.start, self.end)
    }
}

/// Encodes a file and offset range as `file:#start` or `file:#start,#end`.
///
/// Callers guarantee `start <= end`.
pub fn encode(file: &str, start: usize, end: usize) -> PositionDescriptor {
    let mut value = format!("{file}:#{start}");
    if start != end {
        value.push_str(&format!(",#{end}"));
    }
    PositionDescriptor(value)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PositionDescriptor(String);

impl PositionDescriptor {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Splits the descriptor back into `(file, start, end)`.
    ///
    /// The file part is everything before the last `:#`, so paths containing `:` survive.
    pub fn decode(&self) -> Option<(&str, usize, usize)> {
        let split = self.0.rfind(":#")?;
        let file = &self.0[..split];
        let offsets = &self.0[split + 2..];
        let (start, end) = match offsets.split_once(",#") {
            Some((start, end)) => (start.parse().ok()?, end.parse().ok()?),
            None => {
                let start = offsets.parse().ok()?;
                (start, start)
            }
        };
        if file.is_empty() || start > end {
            return None;
        }
        Some((file, start, end))
    }
}

impl fmt::Display for PositionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PositionDescriptor {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid position descriptor: {0} (expected file:#start[,#end])")]
pub struct ParsePositionError(pub String);

impl FromStr for PositionDescriptor {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let candidate = Self(s.to_owned());
        if candidate.decode().is_none() {
            return Err(ParsePositionError(s.to_owned()));
        }
        Ok(candidate)
    }
}
