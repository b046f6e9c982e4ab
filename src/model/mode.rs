// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Pythia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pythia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

/// One kind of query the oracle answers.
///
/// The catalog is fixed. Ids, names and descriptions are user-visible and part of the external
/// contract, so they must not change silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mode {
    Describe,
    Callees,
    Callers,
    Callgraph,
    Callstack,
    Freevars,
    Implements,
    Peers,
    Referrers,
}

impl Mode {
    /// Catalog order, as presented in the mode menu.
    pub const ALL: [Mode; 9] = [
        Self::Describe,
        Self::Callees,
        Self::Callers,
        Self::Callgraph,
        Self::Callstack,
        Self::Freevars,
        Self::Implements,
        Self::Peers,
        Self::Referrers,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Describe => "describe",
            Self::Callees => "callees",
            Self::Callers => "callers",
            Self::Callgraph => "callgraph",
            Self::Callstack => "callstack",
            Self::Freevars => "freevars",
            Self::Implements => "implements",
            Self::Peers => "peers",
            Self::Referrers => "referrers",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Describe => "Describe",
            Self::Callees => "Call targets",
            Self::Callers => "Callers",
            Self::Callgraph => "Call graph",
            Self::Callstack => "Call stack",
            Self::Freevars => "Free variables",
            Self::Implements => "Implements",
            Self::Peers => "Channel peers",
            Self::Referrers => "Referrers",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Describe => "Describe the expression at the current point.",
            Self::Callees => "Show possible callees of the function call at the current point.",
            Self::Callers => "Show the set of callers of the function containing the current point.",
            Self::Callgraph => "Show the callgraph of the current program.",
            Self::Callstack => {
                "Show an arbitrary path from a root of the call graph to the function containing the current point."
            }
            Self::Freevars => "Enumerate the free variables of the current selection.",
            Self::Implements => {
                "Describe the 'implements' relation for types in the package containing the current point."
            }
            Self::Peers => {
                "Enumerate the set of possible corresponding sends/receives for this channel receive/send operation."
            }
            Self::Referrers => {
                "Enumerate all references to the object denoted by the selected identifier."
            }
        }
    }

    /// Position of this mode in [`Mode::ALL`].
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|mode| *mode == self).unwrap_or(0)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown query mode: {0}")]
pub struct ParseModeError(pub String);

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.id() == s)
            .ok_or_else(|| ParseModeError(s.to_owned()))
    }
}
