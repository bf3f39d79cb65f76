//! Explicit colour configuration handed to every render call.
//!
//! Callers refresh a [`ThemeColors`] whenever the page theme may have changed (the CLI re-reads
//! its theme file before each redraw); renderers never cache one.

use crate::error::ChartError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb8 {
    type Err = ChartError;

    /// Accepts `#rrggbb` and `#rgb` (the `#` is optional), surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ChartError::InvalidColor(s.to_string());
        let hex = s.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |h: &str| u8::from_str_radix(h, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Rgb8::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let expand = |h: &str| channel(&h.repeat(2));
                Ok(Rgb8::new(
                    expand(&hex[0..1])?,
                    expand(&hex[1..2])?,
                    expand(&hex[2..3])?,
                ))
            }
            _ => Err(invalid()),
        }
    }
}

/// Colours read from the active theme: label text, baseline rule, bar fill, and the colour the
/// surface is cleared to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThemeColors {
    pub text: Rgb8,
    pub border: Rgb8,
    pub accent: Rgb8,
    pub background: Rgb8,
}

pub const DEFAULT_TEXT: Rgb8 = Rgb8::new(0xe8, 0xee, 0xf7);
pub const DEFAULT_BORDER: Rgb8 = Rgb8::new(0x1f, 0x2a, 0x3a);
pub const DEFAULT_ACCENT: Rgb8 = Rgb8::new(0x74, 0xb3, 0xff);
pub const DEFAULT_BACKGROUND: Rgb8 = Rgb8::new(0x0b, 0x10, 0x18);

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT,
            border: DEFAULT_BORDER,
            accent: DEFAULT_ACCENT,
            background: DEFAULT_BACKGROUND,
        }
    }
}

/// On-disk theme: CSS-like colour strings, each optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeFile {
    pub text: Option<String>,
    pub border: Option<String>,
    pub accent: Option<String>,
    pub background: Option<String>,
}

impl ThemeColors {
    /// Resolve a theme file, falling back field by field to the defaults when a value is
    /// missing, blank, or unparsable.
    pub fn from_file_values(file: &ThemeFile) -> Self {
        let pick = |v: &Option<String>, fallback: Rgb8| {
            v.as_deref()
                .filter(|s| !s.trim().is_empty())
                .and_then(|s| s.parse::<Rgb8>().ok())
                .unwrap_or(fallback)
        };
        let d = ThemeColors::default();
        Self {
            text: pick(&file.text, d.text),
            border: pick(&file.border, d.border),
            accent: pick(&file.accent, d.accent),
            background: pick(&file.background, d.background),
        }
    }

    /// Read a JSON theme file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ChartError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ChartError::ThemeRead {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ThemeFile =
            serde_json::from_str(&text).map_err(|source| ChartError::ThemeParse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_file_values(&file))
    }

    /// Load `path` if given; on any failure log and use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match path {
            None => Self::default(),
            Some(p) => Self::load(p).unwrap_or_else(|e| {
                log::warn!("{e}; using default theme");
                Self::default()
            }),
        }
    }
}
