//! Literal values carried by constants and produced by evaluation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A CSS-level value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// Unitless number: `1.5`
    Number(f64),

    /// Number with a unit: `12px`, `50%`
    Dimension { value: f64, unit: String },

    /// RGB color: `#ff0000`
    Color(Color),

    /// Quoted string: `"Helvetica Neue"`
    Str(String),

    /// Bare keyword: `solid`, `auto`
    Ident(String),

    Bool(bool),
}

impl Value {
    pub fn number(n: f64) -> Self {
        Value::Number(n)
    }

    pub fn dimension(value: f64, unit: impl Into<String>) -> Self {
        Value::Dimension {
            value,
            unit: unit.into(),
        }
    }

    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    pub fn ident(s: impl Into<String>) -> Self {
        Value::Ident(s.into())
    }

    /// Numeric magnitude and unit (empty for plain numbers).
    pub fn as_numeric(&self) -> Option<(f64, &str)> {
        match self {
            Value::Number(n) => Some((*n, "")),
            Value::Dimension { value, unit } => Some((*value, unit.as_str())),
            _ => None,
        }
    }

    /// Text used when a value is spliced into a string.
    pub fn to_plain_string(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Bool(false))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Dimension { value, unit } => write!(f, "{}{unit}", format_number(*value)),
            Value::Color(c) => c.fmt(f),
            Value::Str(s) => write!(f, "\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
            Value::Ident(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Format a number, removing `.0` for integers.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        // also folds -0
        "0".to_string()
    } else if n.fract() == 0.0 && n.is_finite() {
        format!("{n:.0}")
    } else {
        format!("{n}")
    }
}

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from floating channels, clamping each to `0..=255`.
    pub fn from_channels(r: f64, g: f64, b: f64) -> Self {
        fn clamp(c: f64) -> u8 {
            c.round().clamp(0.0, 255.0) as u8
        }
        Self::new(clamp(r), clamp(g), clamp(b))
    }

    pub fn channels(self) -> [f64; 3] {
        [self.r as f64, self.g as f64, self.b as f64]
    }

    /// Parse `#rgb` or `#rrggbb`.
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
        match hex.len() {
            3 => Some(Self::new(digit(0)? * 17, digit(1)? * 17, digit(2)? * 17)),
            6 => {
                let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
                Some(Self::new(byte(0)?, byte(2)?, byte(4)?))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
