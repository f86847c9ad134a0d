// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Session configuration.

use std::path::PathBuf;

use peniko::Color;

/// Configuration passed by the host when a session is created.
///
/// Colors arrive from hosts as hex strings; use [`parse_hex_color`] to
/// convert them before constructing the options value.
#[derive(Clone, Debug)]
pub struct EditorOptions {
    /// Source documents, in stacking order.
    pub file_paths: Vec<PathBuf>,
    /// Whether the host should suppress its tool bar chrome.
    pub is_tool_bar_hidden: bool,
    /// Fill color behind and between documents.
    pub view_background_color: Color,
    /// Stroke color for subsequently created curves.
    pub line_color: Color,
    /// Stroke width for subsequently created curves, in content units at the
    /// fit scale.
    pub line_width: f64,
    /// Start in draw mode instead of scroll mode.
    pub start_with_edit: bool,
}

impl EditorOptions {
    /// Options for the given sources with neutral styling defaults.
    #[must_use]
    pub fn new(file_paths: Vec<PathBuf>) -> Self {
        Self {
            file_paths,
            is_tool_bar_hidden: false,
            view_background_color: Color::WHITE,
            line_color: Color::BLACK,
            line_width: 4.0,
            start_with_edit: false,
        }
    }
}

/// A malformed option value.
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    /// A color string was not one of the accepted hex forms.
    #[error("invalid hex color {value:?}; expected #RGB, #RRGGBB, or #RRGGBBAA")]
    InvalidColor {
        /// The offending input.
        value: String,
    },
}

/// Parses a `#RGB`, `#RRGGBB`, or `#RRGGBBAA` color string.
///
/// The short form expands each digit (`#f80` is `#ff8800`); without an alpha
/// component the color is opaque.
pub fn parse_hex_color(value: &str) -> Result<Color, OptionsError> {
    let invalid = || OptionsError::InvalidColor {
        value: value.to_owned(),
    };
    let digits = value.strip_prefix('#').ok_or_else(invalid)?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let byte = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
    match digits.len() {
        3 => {
            let mut channels = [0_u8; 3];
            for (channel, digit) in channels.iter_mut().zip(digits.chars()) {
                let repeated: String = [digit, digit].iter().collect();
                *channel = byte(&repeated)?;
            }
            Ok(Color::from_rgba8(channels[0], channels[1], channels[2], 255))
        }
        6 => Ok(Color::from_rgba8(
            byte(&digits[0..2])?,
            byte(&digits[2..4])?,
            byte(&digits[4..6])?,
            255,
        )),
        8 => Ok(Color::from_rgba8(
            byte(&digits[0..2])?,
            byte(&digits[2..4])?,
            byte(&digits[4..6])?,
            byte(&digits[6..8])?,
        )),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_three_hex_forms() {
        assert_eq!(
            parse_hex_color("#4287f5").unwrap(),
            Color::from_rgba8(0x42, 0x87, 0xf5, 0xff)
        );
        assert_eq!(
            parse_hex_color("#f80").unwrap(),
            Color::from_rgba8(0xff, 0x88, 0x00, 0xff)
        );
        assert_eq!(
            parse_hex_color("#40a35f80").unwrap(),
            Color::from_rgba8(0x40, 0xa3, 0x5f, 0x80)
        );
    }

    #[test]
    fn rejects_malformed_colors() {
        for bad in ["4287f5", "#12345", "#gg0011", "#", "#12345678ff"] {
            assert!(parse_hex_color(bad).is_err(), "accepted {bad:?}");
        }
    }
}
