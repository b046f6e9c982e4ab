// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Pythia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pythia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;

use ratatui::style::{Color, Modifier, Style};

pub const PALETTE_ENV: &str = "PYTHIA_PALETTE";

/// Styles for every UI role, optionally remapped through a user palette.
#[derive(Debug, Clone, Default)]
pub struct TuiTheme {
    palette: Option<TuiPalette>,
}

impl TuiTheme {
    pub fn from_env() -> Result<Self, ThemeError> {
        let palette = palette_override_from_env()?;
        Ok(Self { palette })
    }

    pub(crate) fn base_style(&self) -> Style {
        match &self.palette {
            Some(palette) => Style::default().fg(palette.fg).bg(palette.bg),
            None => Style::default(),
        }
    }

    fn ansi_color(&self, color: Ansi16) -> Color {
        match &self.palette {
            Some(palette) => palette.ansi[color as usize],
            None => color.into(),
        }
    }

    pub(crate) fn panel_border_style(&self, focused: bool) -> Style {
        if focused {
            self.base_style().fg(self.ansi_color(Ansi16::BrightGreen))
        } else {
            self.base_style()
        }
    }

    pub(crate) fn gutter_style(&self) -> Style {
        self.base_style().fg(self.ansi_color(Ansi16::BrightBlack))
    }

    pub(crate) fn dim_style(&self) -> Style {
        self.base_style().fg(self.ansi_color(Ansi16::BrightBlack))
    }

    pub(crate) fn target_line_style(&self) -> Style {
        self.base_style().bg(self.ansi_color(Ansi16::Black)).add_modifier(Modifier::BOLD)
    }

    pub(crate) fn span_style(&self) -> Style {
        self.base_style()
            .fg(self.ansi_color(Ansi16::Black))
            .bg(self.ansi_color(Ansi16::Yellow))
    }

    pub(crate) fn selection_style(&self) -> Style {
        self.base_style()
            .fg(self.ansi_color(Ansi16::Black))
            .bg(self.ansi_color(Ansi16::Cyan))
    }

    pub(crate) fn cursor_style(&self) -> Style {
        self.base_style().add_modifier(Modifier::REVERSED)
    }

    pub(crate) fn link_style(&self) -> Style {
        self.base_style().fg(self.ansi_color(Ansi16::BrightBlue))
    }

    pub(crate) fn output_cursor_style(&self) -> Style {
        self.base_style()
            .fg(self.ansi_color(Ansi16::BrightWhite))
            .bg(self.ansi_color(Ansi16::BrightBlack))
    }

    pub(crate) fn working_style(&self) -> Style {
        self.dim_style().add_modifier(Modifier::ITALIC)
    }

    pub(crate) fn error_style(&self) -> Style {
        self.base_style().fg(self.ansi_color(Ansi16::Red))
    }

    pub(crate) fn hint_label_style(&self) -> Style {
        self.base_style()
            .fg(self.ansi_color(Ansi16::Black))
            .bg(self.ansi_color(Ansi16::Magenta))
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn menu_item_style(&self, highlighted: bool) -> Style {
        if highlighted {
            self.base_style()
                .fg(self.ansi_color(Ansi16::Black))
                .bg(self.ansi_color(Ansi16::BrightGreen))
                .add_modifier(Modifier::BOLD)
        } else {
            self.base_style()
        }
    }

    pub(crate) fn key_style(&self) -> Style {
        self.base_style().fg(self.ansi_color(Ansi16::Cyan)).add_modifier(Modifier::BOLD)
    }

    pub(crate) fn label_style(&self) -> Style {
        self.base_style().fg(self.ansi_color(Ansi16::White))
    }

    pub(crate) fn header_style(&self) -> Style {
        self.base_style().fg(self.ansi_color(Ansi16::BrightWhite)).add_modifier(Modifier::BOLD)
    }
}

#[derive(Debug, Clone)]
struct TuiPalette {
    fg: Color,
    bg: Color,
    ansi: [Color; 16],
}

impl TuiPalette {
    const CSV_LEN: usize = 18;

    fn parse_csv(value: &str) -> Result<Self, String> {
        let parts: Vec<&str> = value.split(',').map(str::trim).collect();
        if parts.len() != Self::CSV_LEN {
            return Err(format!(
                "expected {} comma-separated colors (fg,bg, then the 16 ansi colors), got {}",
                Self::CSV_LEN,
                parts.len()
            ));
        }

        let fg = parse_palette_color(parts[0])?;
        let bg = parse_palette_color(parts[1])?;
        let mut ansi = [Color::Reset; 16];
        for (slot, part) in ansi.iter_mut().zip(&parts[2..]) {
            *slot = parse_palette_color(part)?;
        }

        Ok(Self { fg, bg, ansi })
    }
}

fn palette_override_from_env() -> Result<Option<TuiPalette>, ThemeError> {
    let value = match env::var(PALETTE_ENV) {
        Ok(value) => value,
        Err(env::VarError::NotPresent) => return Ok(None),
        Err(env::VarError::NotUnicode(_)) => {
            return Err(ThemeError::InvalidEnv {
                name: PALETTE_ENV.to_owned(),
                value: "<non-unicode>".to_owned(),
            });
        }
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    TuiPalette::parse_csv(trimmed)
        .map(Some)
        .map_err(|error| ThemeError::InvalidEnv {
            name: PALETTE_ENV.to_owned(),
            value: format!("{trimmed} ({error})"),
        })
}

fn parse_palette_color(value: &str) -> Result<Color, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("empty color".to_owned());
    }

    let lower = trimmed.to_ascii_lowercase();
    if let Some(rest) = lower.strip_prefix("rgb:") {
        let channels = rest
            .split('/')
            .map(parse_hex_channel)
            .collect::<Result<Vec<u8>, String>>()?;
        let [r, g, b] = channels[..] else {
            return Err(format!("invalid rgb: value: {trimmed}"));
        };
        return Ok(Color::Rgb(r, g, b));
    }

    let hex = trimmed
        .strip_prefix('#')
        .or_else(|| lower.strip_prefix("0x"))
        .unwrap_or(trimmed);
    if hex.len() != 6 || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(format!("invalid hex color: {trimmed} (expected #RRGGBB)"));
    }
    let rgb = u32::from_str_radix(hex, 16).map_err(|_| format!("invalid hex color: {trimmed}"))?;
    Ok(Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8))
}

fn parse_hex_channel(value: &str) -> Result<u8, String> {
    let value = value.trim();
    let invalid = || format!("invalid rgb: component {value} (expected 2 or 4 hex digits)");
    match value.len() {
        2 => u8::from_str_radix(value, 16).map_err(|_| invalid()),
        4 => u16::from_str_radix(value, 16)
            .map(|wide| (wide >> 8) as u8)
            .map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
enum Ansi16 {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl From<Ansi16> for Color {
    fn from(value: Ansi16) -> Self {
        match value {
            Ansi16::Black => Color::Black,
            Ansi16::Red => Color::Red,
            Ansi16::Green => Color::Green,
            Ansi16::Yellow => Color::Yellow,
            Ansi16::Blue => Color::Blue,
            Ansi16::Magenta => Color::Magenta,
            Ansi16::Cyan => Color::Cyan,
            Ansi16::White => Color::Gray,
            Ansi16::BrightBlack => Color::DarkGray,
            Ansi16::BrightRed => Color::LightRed,
            Ansi16::BrightGreen => Color::LightGreen,
            Ansi16::BrightYellow => Color::LightYellow,
            Ansi16::BrightBlue => Color::LightBlue,
            Ansi16::BrightMagenta => Color::LightMagenta,
            Ansi16::BrightCyan => Color::LightCyan,
            Ansi16::BrightWhite => Color::White,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ThemeError {
    #[error("invalid env {name}={value}")]
    InvalidEnv { name: String, value: String },
}
