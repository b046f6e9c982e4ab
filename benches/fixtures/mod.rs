// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Pythia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pythia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use std::fmt::Write as _;

use pythia::model::ResponseLine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Small,
    CallgraphLarge,
    LongMessages,
}

impl Case {
    pub fn id(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::CallgraphLarge => "callgraph_large",
            Self::LongMessages => "long_messages",
        }
    }
}

/// An oracle answer mixing all line grammars.
pub fn response(case: Case) -> String {
    match case {
        Case::Small => referrers(12, 24),
        Case::CallgraphLarge => callgraph(2_000),
        Case::LongMessages => referrers(300, 400),
    }
}

fn referrers(count: usize, message_len: usize) -> String {
    let mut out = String::from("pkg/main.go:9.2-9.6: references to var name string\n");
    for i in 0..count {
        let file = format!("pkg/file_{:02}.go", i % 17);
        let filler = "x".repeat(message_len.saturating_sub(10));
        let _ = writeln!(out, "{file}:{}:{}: use {i} {filler}", 10 + i * 3, 1 + i % 40);
    }
    out.push_str("-: done\n");
    out
}

fn callgraph(count: usize) -> String {
    let mut out = String::from(
        "-: Below is a call graph of the program.\n-: Each line is a function; indentation shows callees.\n",
    );
    for i in 0..count {
        let depth = i % 6;
        let indent = "\t".repeat(depth);
        let _ = writeln!(
            out,
            "internal/pkg{}/f.go:{}:{}: {indent}pkg{}.Func{i}",
            i % 23,
            1 + (i * 7) % 900,
            1 + i % 13,
            i % 23,
        );
        if i % 97 == 0 {
            let _ = writeln!(out, "warning: unresolved call site {i}");
        }
    }
    out
}

/// Go-looking source with `lines` lines, some tab-indented, some with multibyte text.
pub fn go_source(lines: usize) -> String {
    let mut out = String::from("package main\n\n");
    for i in 2..lines {
        match i % 5 {
            0 => {
                let _ = writeln!(out, "func f{i}(n int) int {{");
            }
            1 => {
                let _ = writeln!(out, "\tv := n * {i} // größe");
            }
            2 => {
                let _ = writeln!(out, "\tif v > {i} {{ return v }}");
            }
            3 => out.push_str("\treturn n\n"),
            _ => out.push_str("}\n"),
        }
    }
    out
}

pub fn checksum(lines: impl Iterator<Item = ResponseLine>) -> u64 {
    let mut acc = 0u64;
    for line in lines {
        acc = acc.wrapping_mul(31).wrapping_add(line.message().len() as u64);
        if let Some(target) = line.target() {
            acc = acc.wrapping_add(u64::from(target.line));
        }
    }
    acc
}
