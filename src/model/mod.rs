// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Pythia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pythia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! Query modes, selections and their position descriptors, and the references parsed out of
//! oracle responses.

pub mod mode;
pub mod position;
pub mod reference;

pub use mode::{Mode, ParseModeError};
pub use position::{encode, ParsePositionError, PositionDescriptor, Selection};
pub use reference::{Location, NavTarget, ResponseLine, Span};
