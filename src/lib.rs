// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Pythia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pythia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Pythia: a terminal client for the Go source code oracle.
//!
//! Select source text, ask the oracle a question about it, and follow the answer's references
//! through the program with browser-style back/forward history.

pub mod backend;
pub mod config;
pub mod controller;
pub mod format;
pub mod logging;
pub mod model;
pub mod nav;
pub mod session;
pub mod tui;
