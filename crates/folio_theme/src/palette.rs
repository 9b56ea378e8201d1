//! Color palettes as CSS custom properties
//!
//! The stylesheet reads every color through `var(--color-*)`. Applying a
//! scheme writes the matching token set onto the root element.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ThemeError;
use crate::scheme::ColorScheme;

/// RGBA color, serialized as a hex string
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn from_hex(hex: u32) -> Self {
        Self::rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// `#rrggbb`, or `#rrggbbaa` when translucent
    pub fn to_css(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// `r, g, b` triple for `rgba(var(--color-*-rgb), alpha)`
    pub fn to_rgb_triple(self) -> String {
        format!("{}, {}, {}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl FromStr for Color {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ThemeError::InvalidColor {
            value: s.to_string(),
            reason: reason.to_string(),
        };
        let hex = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| invalid("expected a leading `#`"))?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid("non-hex digit"));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid("bad channel"))
        };
        let short = |i: usize| {
            u8::from_str_radix(&hex[i..i + 1], 16)
                .map(|v| v * 17)
                .map_err(|_| invalid("bad channel"))
        };
        match hex.len() {
            3 => Ok(Color::rgb(short(0)?, short(1)?, short(2)?)),
            6 => Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?).with_alpha(channel(6)?)),
            _ => Err(invalid("expected 3, 6 or 8 hex digits")),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ThemeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_css()
    }
}

/// Semantic color slots
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorToken {
    Background,
    Surface,
    Text,
    TextSecondary,
    Primary,
    PrimaryHover,
    BtnPrimaryText,
    Border,
    Success,
    Error,
    Warning,
    Info,
}

impl ColorToken {
    pub const ALL: [ColorToken; 12] = [
        ColorToken::Background,
        ColorToken::Surface,
        ColorToken::Text,
        ColorToken::TextSecondary,
        ColorToken::Primary,
        ColorToken::PrimaryHover,
        ColorToken::BtnPrimaryText,
        ColorToken::Border,
        ColorToken::Success,
        ColorToken::Error,
        ColorToken::Warning,
        ColorToken::Info,
    ];

    /// Custom property name, e.g. `--color-btn-primary-text`
    pub fn css_variable(self) -> &'static str {
        match self {
            ColorToken::Background => "--color-background",
            ColorToken::Surface => "--color-surface",
            ColorToken::Text => "--color-text",
            ColorToken::TextSecondary => "--color-text-secondary",
            ColorToken::Primary => "--color-primary",
            ColorToken::PrimaryHover => "--color-primary-hover",
            ColorToken::BtnPrimaryText => "--color-btn-primary-text",
            ColorToken::Border => "--color-border",
            ColorToken::Success => "--color-success",
            ColorToken::Error => "--color-error",
            ColorToken::Warning => "--color-warning",
            ColorToken::Info => "--color-info",
        }
    }
}

/// A complete token set for one scheme
#[derive(Clone, Debug, PartialEq)]
pub struct ColorTokens {
    colors: BTreeMap<ColorToken, Color>,
}

impl ColorTokens {
    pub fn light() -> Self {
        Self::from_pairs(&[
            (ColorToken::Background, Color::from_hex(0xFCFCF9)),
            (ColorToken::Surface, Color::from_hex(0xFFFFFD)),
            (ColorToken::Text, Color::from_hex(0x134252)),
            (ColorToken::TextSecondary, Color::from_hex(0x626C71)),
            (ColorToken::Primary, Color::from_hex(0x21808D)),
            (ColorToken::PrimaryHover, Color::from_hex(0x1D7480)),
            (ColorToken::BtnPrimaryText, Color::from_hex(0xFCFCF9)),
            (ColorToken::Border, Color::from_hex(0x5E5240).with_alpha(0x33)),
            (ColorToken::Success, Color::from_hex(0x21808D)),
            (ColorToken::Error, Color::from_hex(0xC0152F)),
            (ColorToken::Warning, Color::from_hex(0xA84B2F)),
            (ColorToken::Info, Color::from_hex(0x626C71)),
        ])
    }

    pub fn dark() -> Self {
        Self::from_pairs(&[
            (ColorToken::Background, Color::from_hex(0x1F2121)),
            (ColorToken::Surface, Color::from_hex(0x262828)),
            (ColorToken::Text, Color::from_hex(0xF5F5F5)),
            (ColorToken::TextSecondary, Color::from_hex(0xA7A9A9)),
            (ColorToken::Primary, Color::from_hex(0x32B8C6)),
            (ColorToken::PrimaryHover, Color::from_hex(0x2DA6B2)),
            (ColorToken::BtnPrimaryText, Color::from_hex(0x134252)),
            (ColorToken::Border, Color::from_hex(0x777C7C).with_alpha(0x4D)),
            (ColorToken::Success, Color::from_hex(0x32B8C6)),
            (ColorToken::Error, Color::from_hex(0xFF5459)),
            (ColorToken::Warning, Color::from_hex(0xE68161)),
            (ColorToken::Info, Color::from_hex(0xA7A9A9)),
        ])
    }

    pub fn for_scheme(scheme: ColorScheme) -> Self {
        match scheme {
            ColorScheme::Light => Self::light(),
            ColorScheme::Dark => Self::dark(),
        }
    }

    fn from_pairs(pairs: &[(ColorToken, Color)]) -> Self {
        Self {
            colors: pairs.iter().copied().collect(),
        }
    }

    pub fn get(&self, token: ColorToken) -> Color {
        self.colors
            .get(&token)
            .copied()
            .unwrap_or(Color::rgb(0, 0, 0))
    }

    pub fn set(&mut self, token: ColorToken, color: Color) {
        self.colors.insert(token, color);
    }

    /// Apply user overrides on top of the built-in tokens
    pub fn with_overrides(mut self, overrides: &BTreeMap<ColorToken, Color>) -> Self {
        for (token, color) in overrides {
            self.colors.insert(*token, *color);
        }
        self
    }

    /// `(name, value)` pairs in stable order; the background also gets an
    /// `-rgb` triple for translucent backdrops
    pub fn css_variables(&self) -> Vec<(String, String)> {
        let mut vars: Vec<(String, String)> = ColorToken::ALL
            .iter()
            .map(|token| (token.css_variable().to_string(), self.get(*token).to_css()))
            .collect();
        vars.push((
            "--color-background-rgb".to_string(),
            self.get(ColorToken::Background).to_rgb_triple(),
        ));
        vars
    }
}

/// Light and dark token sets
#[derive(Clone, Debug, PartialEq)]
pub struct ThemePalette {
    pub light: ColorTokens,
    pub dark: ColorTokens,
}

impl ThemePalette {
    pub fn for_scheme(&self, scheme: ColorScheme) -> &ColorTokens {
        match scheme {
            ColorScheme::Light => &self.light,
            ColorScheme::Dark => &self.dark,
        }
    }
}

impl Default for ThemePalette {
    fn default() -> Self {
        Self {
            light: ColorTokens::light(),
            dark: ColorTokens::dark(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex_parsing() {
        assert_eq!("#21808d".parse::<Color>().unwrap(), Color::from_hex(0x21808D));
        assert_eq!("#fff".parse::<Color>().unwrap(), Color::rgb(255, 255, 255));
        assert_eq!(
            "#00000080".parse::<Color>().unwrap(),
            Color::rgb(0, 0, 0).with_alpha(0x80)
        );
        assert!("21808d".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gggggg".parse::<Color>().is_err());
    }

    #[test]
    fn test_css_output() {
        assert_eq!(Color::from_hex(0x21808D).to_css(), "#21808d");
        assert_eq!(Color::rgb(1, 2, 3).with_alpha(0x4d).to_css(), "#0102034d");
        assert_eq!(Color::from_hex(0xFCFCF9).to_rgb_triple(), "252, 252, 249");
    }

    #[test]
    fn test_every_token_is_exported() {
        let vars = ColorTokens::light().css_variables();
        assert_eq!(vars.len(), ColorToken::ALL.len() + 1);
        assert!(vars
            .iter()
            .any(|(name, value)| name == "--color-primary" && value == "#21808d"));
    }

    #[test]
    fn test_overrides_replace_tokens() {
        let mut overrides = BTreeMap::new();
        overrides.insert(ColorToken::Primary, Color::from_hex(0xFF5500));
        let tokens = ColorTokens::dark().with_overrides(&overrides);
        assert_eq!(tokens.get(ColorToken::Primary), Color::from_hex(0xFF5500));
        assert_eq!(tokens.get(ColorToken::Text), ColorTokens::dark().get(ColorToken::Text));
    }
}
