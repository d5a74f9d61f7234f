//! Highlight colors and their document-format encodings.

use std::fmt;
use std::str::FromStr;

use crate::error::MorphmarkError;

/// Fallback color when a configured value cannot be parsed.
pub const DEFAULT_COLOR: Rgb = Rgb(0x00, 0xff, 0x00);

/// The named highlight colors a word-processor `w:highlight` accepts.
const NAMED_HIGHLIGHTS: &[(&str, Rgb)] = &[
    ("black", Rgb(0x00, 0x00, 0x00)),
    ("blue", Rgb(0x00, 0x00, 0xff)),
    ("cyan", Rgb(0x00, 0xff, 0xff)),
    ("green", Rgb(0x00, 0xff, 0x00)),
    ("magenta", Rgb(0xff, 0x00, 0xff)),
    ("red", Rgb(0xff, 0x00, 0x00)),
    ("yellow", Rgb(0xff, 0xff, 0x00)),
    ("white", Rgb(0xff, 0xff, 0xff)),
    ("darkBlue", Rgb(0x00, 0x00, 0x80)),
    ("darkCyan", Rgb(0x00, 0x80, 0x80)),
    ("darkGreen", Rgb(0x00, 0x80, 0x00)),
    ("darkMagenta", Rgb(0x80, 0x00, 0x80)),
    ("darkRed", Rgb(0x80, 0x00, 0x00)),
    ("darkYellow", Rgb(0x80, 0x80, 0x00)),
    ("darkGray", Rgb(0x80, 0x80, 0x80)),
    ("lightGray", Rgb(0xc0, 0xc0, 0xc0)),
];

/// An 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse `#RRGGBB` (the `#` is optional), falling back to green.
    pub fn from_hex_or_default(hex: &str) -> Rgb {
        hex.parse().unwrap_or(DEFAULT_COLOR)
    }

    /// Uppercase `RRGGBB`, as used by `w:shd w:fill`.
    pub fn to_ooxml_fill(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }

    /// Components scaled to `[0, 1]`, as used by PDF color arrays.
    pub fn to_pdf_rgb(&self) -> [f32; 3] {
        [
            f32::from(self.0) / 255.0,
            f32::from(self.1) / 255.0,
            f32::from(self.2) / 255.0,
        ]
    }

    /// Closest named `w:highlight` value.
    pub fn nearest_highlight_name(&self) -> &'static str {
        NAMED_HIGHLIGHTS
            .iter()
            .min_by_key(|(_, named)| self.distance(named))
            .map(|(name, _)| *name)
            .unwrap_or("green")
    }

    fn distance(&self, other: &Rgb) -> u32 {
        let d = |a: u8, b: u8| (i32::from(a) - i32::from(b)).unsigned_abs().pow(2);
        d(self.0, other.0) + d(self.1, other.1) + d(self.2, other.2)
    }
}

impl FromStr for Rgb {
    type Err = MorphmarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(MorphmarkError::config(format!("Invalid color: {s}")));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| MorphmarkError::config(format!("Invalid color: {s}")))
        };
        Ok(Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}
