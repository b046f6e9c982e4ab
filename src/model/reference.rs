// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Pythia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pythia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

/// A 1-based `line.col` address as printed by the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    pub line: u32,
    pub col: u32,
}

impl Location {
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.line, self.col)
    }
}

/// A `from-to` region of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub from: Location,
    pub to: Location,
}

/// One classified line of an oracle response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseLine {
    /// `file:line.col-line.col: message`
    Range {
        file: String,
        from: Location,
        to: Location,
        message: String,
    },
    /// `file:line:col: message`
    Point {
        file: String,
        at: Location,
        message: String,
    },
    /// `-: message`
    Message { message: String },
    /// Anything else, kept as received.
    Verbatim { text: String },
}

impl ResponseLine {
    /// Where activating this line should navigate to. Ranges target their start line.
    pub fn target(&self) -> Option<NavTarget> {
        match self {
            Self::Range { file, from, to, .. } => Some(NavTarget {
                file: file.clone(),
                line: from.line,
                span: Some(Span { from: *from, to: *to }),
            }),
            Self::Point { file, at, .. } => Some(NavTarget {
                file: file.clone(),
                line: at.line,
                span: None,
            }),
            Self::Message { .. } | Self::Verbatim { .. } => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Range { message, .. } | Self::Point { message, .. } | Self::Message { message } => {
                message
            }
            Self::Verbatim { text } => text,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Range { .. } | Self::Point { .. })
    }
}

/// A navigation request derived from a reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavTarget {
    pub file: String,
    pub line: u32,
    pub span: Option<Span>,
}

impl NavTarget {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
            span: None,
        }
    }
}

impl fmt::Display for NavTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}
