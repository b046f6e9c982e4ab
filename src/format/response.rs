// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Pythia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pythia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Line classifier for plain-format oracle output.
//!
//! Each line is tried against the range, point and no-address grammars in that order; the first
//! match wins. Range must precede point so that `file:1.2-3.4: msg` never reads as a point.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::model::{Location, ResponseLine};

// file:line.col-line.col: message
static RANGE_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*):([0-9]+)\.([0-9]+)-([0-9]+)\.([0-9]+): (.*)$").expect("range regex")
});

// file:line:col: message
static POINT_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*):([0-9]+):([0-9]+): (.*)$").expect("point regex"));

// -: message, matched anywhere in the line
static NO_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-: (.*)$").expect("no-address regex"));

/// Lazily classifies `text` line by line.
///
/// The iterator is `Clone`, so a response can be walked again from the start.
pub fn parse_response(text: &str) -> ResponseLines<'_> {
    ResponseLines {
        lines: text.split('\n'),
    }
}

#[derive(Debug, Clone)]
pub struct ResponseLines<'a> {
    lines: std::str::Split<'a, char>,
}

impl<'a> ResponseLines<'a> {
    /// Pairs each classified line with the raw text it came from.
    pub fn with_raw(self) -> impl Iterator<Item = (&'a str, ResponseLine)> + Clone {
        self.lines.map(|raw| (raw, classify_line(raw)))
    }
}

impl Iterator for ResponseLines<'_> {
    type Item = ResponseLine;

    fn next(&mut self) -> Option<Self::Item> {
        self.lines.next().map(classify_line)
    }
}

/// Classifies a single line. Never fails: unrecognized input comes back as
/// [`ResponseLine::Verbatim`].
pub fn classify_line(line: &str) -> ResponseLine {
    if let Some(parsed) = RANGE_ADDRESS.captures(line).and_then(|caps| range_from(&caps)) {
        return parsed;
    }
    if let Some(parsed) = POINT_ADDRESS.captures(line).and_then(|caps| point_from(&caps)) {
        return parsed;
    }
    if let Some(caps) = NO_ADDRESS.captures(line) {
        return ResponseLine::Message {
            message: caps[1].to_owned(),
        };
    }
    ResponseLine::Verbatim {
        text: line.to_owned(),
    }
}

fn range_from(caps: &Captures<'_>) -> Option<ResponseLine> {
    Some(ResponseLine::Range {
        file: caps[1].to_owned(),
        from: Location::new(number(caps, 2)?, number(caps, 3)?),
        to: Location::new(number(caps, 4)?, number(caps, 5)?),
        message: caps[6].to_owned(),
    })
}

fn point_from(caps: &Captures<'_>) -> Option<ResponseLine> {
    Some(ResponseLine::Point {
        file: caps[1].to_owned(),
        at: Location::new(number(caps, 2)?, number(caps, 3)?),
        message: caps[4].to_owned(),
    })
}

// Out-of-range numbers make the grammar fail so the next one gets a chance.
fn number(caps: &Captures<'_>, group: usize) -> Option<u32> {
    caps.get(group)?.as_str().parse().ok()
}
