//! Hex color parsing and RGB/HSL conversion.
//!
//! The accent theme is driven by hue, saturation and lightness variables, so
//! the configured `#rrggbb` color is converted into integer HSL components.

use std::str::FromStr;

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// HSL color with hue in degrees `0..360`, saturation and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsl {
    pub h: u16,
    pub s: u8,
    pub l: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    #[error("expected 6 hex digits, found {0}")]
    Length(usize),

    #[error("invalid hex digit {0:?}")]
    InvalidDigit(char),
}

/// Convert a hex color string into HSL.
///
/// Returns `None` for anything that is not exactly six hex digits with an
/// optional leading `#`; callers keep their current theme in that case.
#[must_use]
pub fn hex_to_hsl(input: &str) -> Option<Hsl> {
    input.parse::<Rgb>().ok().map(Rgb::to_hsl)
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let digits = input.strip_prefix('#').unwrap_or(input);

        if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidDigit(bad));
        }
        if digits.len() != 6 {
            return Err(ColorParseError::Length(digits.len()));
        }

        let bytes = digits.as_bytes();
        Ok(Self {
            r: channel(bytes[0], bytes[1])?,
            g: channel(bytes[2], bytes[3])?,
            b: channel(bytes[4], bytes[5])?,
        })
    }
}

fn channel(high: u8, low: u8) -> Result<u8, ColorParseError> {
    Ok(nibble(high)? << 4 | nibble(low)?)
}

fn nibble(digit: u8) -> Result<u8, ColorParseError> {
    let c = char::from(digit);
    c.to_digit(16)
        .and_then(|d| u8::try_from(d).ok())
        .ok_or(ColorParseError::InvalidDigit(c))
}

impl Rgb {
    #[must_use]
    pub fn to_hsl(self) -> Hsl {
        let max_channel = self.r.max(self.g).max(self.b);
        let min_channel = self.r.min(self.g).min(self.b);

        let r = unit(self.r);
        let g = unit(self.g);
        let b = unit(self.b);
        let max = unit(max_channel);
        let min = unit(min_channel);
        let l = (max + min) / 2.0;

        if max_channel == min_channel {
            return Hsl {
                h: 0,
                s: 0,
                l: percent(l),
            };
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };

        let sector = if max_channel == self.r {
            (g - b) / d + if self.g < self.b { 6.0 } else { 0.0 }
        } else if max_channel == self.g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        Hsl {
            h: round_u16(sector * 60.0) % 360,
            s: percent(s),
            l: percent(l),
        }
    }

    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Hsl {
    /// Inverse conversion, used to render swatches from theme values.
    #[must_use]
    pub fn to_rgb(self) -> Rgb {
        let l = f64::from(self.l.min(100)) / 100.0;

        if self.s == 0 {
            let v = to_byte(l);
            return Rgb { r: v, g: v, b: v };
        }

        let h = f64::from(self.h % 360) / 360.0;
        let s = f64::from(self.s.min(100)) / 100.0;
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        Rgb {
            r: to_byte(hue_to_channel(p, q, h + 1.0 / 3.0)),
            g: to_byte(hue_to_channel(p, q, h)),
            b: to_byte(hue_to_channel(p, q, h - 1.0 / 3.0)),
        }
    }
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn unit(channel: u8) -> f64 {
    f64::from(channel) / 255.0
}

// Inputs are bounded to [0, 360] and [0, 255], so the casts cannot truncate.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_u16(value: f64) -> u16 {
    value.round().clamp(0.0, 360.0) as u16
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percent(fraction: f64) -> u8 {
    (fraction * 100.0).round().clamp(0.0, 100.0) as u8
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_byte(fraction: f64) -> u8 {
    (fraction * 255.0).round().clamp(0.0, 255.0) as u8
}
