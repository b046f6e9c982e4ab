// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Pythia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pythia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

// Characters form encoding leaves alone (`encodeURIComponent` semantics, space handled apart).
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// State recorded for one navigation: the file and the line scrolled to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HistoryEntry {
    pub file: String,
    pub line: u32,
}

impl HistoryEntry {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Location form of this entry: `source?file=<path>#L<line>`.
    pub fn url(&self) -> String {
        format!("source?file={}#L{}", form_encode(&self.file), self.line)
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

fn form_encode(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string().replace("%20", "+")
}

/// Browser-style session history: a list of entries and a cursor.
///
/// Pushing drops every entry after the cursor. Moving back and forth only moves the cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    entries: Vec<HistoryEntry>,
    index: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.index)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.index + 1);
        }
        self.entries.push(entry);
        self.index = self.entries.len() - 1;
    }

    /// Overwrites the current entry, or adds the first one.
    pub fn replace_current(&mut self, entry: HistoryEntry) {
        match self.entries.get_mut(self.index) {
            Some(current) => *current = entry,
            None => self.push(entry),
        }
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn back(&mut self) -> Option<&HistoryEntry> {
        if !self.can_go_back() {
            return None;
        }
        self.index -= 1;
        self.entries.get(self.index)
    }

    pub fn forward(&mut self) -> Option<&HistoryEntry> {
        if !self.can_go_forward() {
            return None;
        }
        self.index += 1;
        self.entries.get(self.index)
    }
}
