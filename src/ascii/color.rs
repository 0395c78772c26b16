//! 8-bit display colors and hex color parsing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AsciifyError;

/// An 8-bit RGB display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or the `#RGB` shorthand (each digit doubled).
    pub fn from_hex(s: &str) -> Result<Self, AsciifyError> {
        let invalid = || AsciifyError::InvalidColorFormat(s.to_string());
        let digits = s.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.is_ascii() {
            return Err(invalid());
        }

        match digits.len() {
            6 => {
                let bytes = hex::decode(digits).map_err(|_| invalid())?;
                Ok(Rgb::new(bytes[0], bytes[1], bytes[2]))
            }
            3 => {
                let mut channels = [0u8; 3];
                for (slot, c) in channels.iter_mut().zip(digits.chars()) {
                    let v = c.to_digit(16).ok_or_else(invalid)? as u8;
                    *slot = v * 17;
                }
                Ok(Rgb::new(channels[0], channels[1], channels[2]))
            }
            _ => Err(invalid()),
        }
    }

    /// Lowercase `#rrggbb` form.
    pub fn to_hex(self) -> String {
        format!("#{}", hex::encode([self.r, self.g, self.b]))
    }

    /// Multiply every channel by `factor`, saturating at 255.
    pub fn burn(self, factor: f64) -> Rgb {
        Rgb::new(
            burn_channel(self.r, factor),
            burn_channel(self.g, factor),
            burn_channel(self.b, factor),
        )
    }
}

/// `min(255, c * factor)`, truncated to an integer channel.
pub fn burn_channel(c: u8, factor: f64) -> u8 {
    (c as f64 * factor).clamp(0.0, 255.0) as u8
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = AsciifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::from_hex(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = AsciifyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&s)
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_hex()
    }
}
