//! Color models.
//!
//! Every model projects to [`Rgb`], which is what the content-stream
//! emitters write. Components are validated on construction.

use crate::error::{Error, Result};

/// RGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

/// CMYK color, components in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cmyk {
    c: f32,
    m: f32,
    y: f32,
    k: f32,
}

/// HSV color: hue in degrees 0..=360, saturation and value in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    h: f32,
    s: f32,
    v: f32,
}

/// Gray level in 0.0..=1.0 (0 is black).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grayscale(f32);

fn check_unit(name: &str, value: f32) -> Result<f32> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(Error::InvalidArgument(format!(
            "{} component must be within 0.0..=1.0, got {}",
            name, value
        )))
    }
}

fn to_byte(unit: f32) -> u8 {
    (unit * 255.0).round().clamp(0.0, 255.0) as u8
}

impl Rgb {
    /// Create a color from 8-bit channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or `RRGGBB`.
    ///
    /// ```
    /// use quire::color::Rgb;
    ///
    /// assert_eq!(Rgb::from_hex("#FF8000").unwrap(), Rgb::new(255, 128, 0));
    /// assert!(Rgb::from_hex("#12").is_err());
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim_start_matches('#');
        let bad = || Error::InvalidArgument(format!("invalid hex color '{}'", hex));
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(bad());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| bad());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Channels as floats in 0.0..=1.0, as written into content streams.
    pub fn components(&self) -> (f32, f32, f32) {
        (self.r as f32 / 255.0, self.g as f32 / 255.0, self.b as f32 / 255.0)
    }

    /// Convert to HSV.
    pub fn to_hsv(&self) -> Hsv {
        let (r, g, b) = self.components();
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let h = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        let s = if max == 0.0 { 0.0 } else { delta / max };
        Hsv {
            h: h.clamp(0.0, 360.0),
            s: s.clamp(0.0, 1.0),
            v: max,
        }
    }

    /// Lighten (positive) or darken (negative) each channel by a fraction.
    pub fn adjust(&self, fraction: f32) -> Rgb {
        let f = |c: u8| -> u8 {
            let c = c as f32;
            let target = if fraction >= 0.0 { 255.0 - c } else { c };
            (c + target * fraction).round().clamp(0.0, 255.0) as u8
        };
        Rgb::new(f(self.r), f(self.g), f(self.b))
    }
}

impl Cmyk {
    /// Create a CMYK color.
    pub fn new(c: f32, m: f32, y: f32, k: f32) -> Result<Self> {
        Ok(Self {
            c: check_unit("cyan", c)?,
            m: check_unit("magenta", m)?,
            y: check_unit("yellow", y)?,
            k: check_unit("key", k)?,
        })
    }

    /// Convert to RGB.
    ///
    /// ```
    /// use quire::color::{Cmyk, Rgb};
    ///
    /// assert_eq!(Cmyk::new(0.0, 1.0, 1.0, 0.0).unwrap().to_rgb(), Rgb::new(255, 0, 0));
    /// ```
    pub fn to_rgb(&self) -> Rgb {
        let k = 1.0 - self.k;
        Rgb::new(
            to_byte((1.0 - self.c) * k),
            to_byte((1.0 - self.m) * k),
            to_byte((1.0 - self.y) * k),
        )
    }
}

impl Hsv {
    /// Create an HSV color.
    pub fn new(h: f32, s: f32, v: f32) -> Result<Self> {
        if !(0.0..=360.0).contains(&h) {
            return Err(Error::InvalidArgument(format!("hue must be within 0..=360, got {}", h)));
        }
        Ok(Self {
            h,
            s: check_unit("saturation", s)?,
            v: check_unit("value", v)?,
        })
    }

    /// Hue in degrees.
    pub fn hue(&self) -> f32 {
        self.h
    }

    /// Saturation.
    pub fn saturation(&self) -> f32 {
        self.s
    }

    /// Value.
    pub fn value(&self) -> f32 {
        self.v
    }

    /// Convert to RGB.
    pub fn to_rgb(&self) -> Rgb {
        let c = self.v * self.s;
        let h = (self.h % 360.0) / 60.0;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = self.v - c;
        Rgb::new(to_byte(r + m), to_byte(g + m), to_byte(b + m))
    }
}

impl Grayscale {
    /// Create a gray level.
    pub fn new(level: f32) -> Result<Self> {
        Ok(Self(check_unit("gray", level)?))
    }

    /// Convert to RGB.
    pub fn to_rgb(&self) -> Rgb {
        let v = to_byte(self.0);
        Rgb::new(v, v, v)
    }
}

/// A color in any supported model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    /// RGB
    Rgb(Rgb),
    /// CMYK
    Cmyk(Cmyk),
    /// HSV
    Hsv(Hsv),
    /// Gray level
    Gray(Grayscale),
}

impl Color {
    /// Black.
    pub const BLACK: Color = Color::Rgb(Rgb::new(0, 0, 0));
    /// White.
    pub const WHITE: Color = Color::Rgb(Rgb::new(255, 255, 255));
    /// Pure red.
    pub const RED: Color = Color::Rgb(Rgb::new(255, 0, 0));
    /// Pure green.
    pub const GREEN: Color = Color::Rgb(Rgb::new(0, 255, 0));
    /// Pure blue.
    pub const BLUE: Color = Color::Rgb(Rgb::new(0, 0, 255));
    /// Mid gray.
    pub const GRAY: Color = Color::Rgb(Rgb::new(128, 128, 128));
    /// Light gray, used for default table striping.
    pub const LIGHT_GRAY: Color = Color::Rgb(Rgb::new(211, 211, 211));
    /// Yellow, the default highlight color.
    pub const YELLOW: Color = Color::Rgb(Rgb::new(255, 255, 0));

    /// Project to RGB.
    pub fn to_rgb(&self) -> Rgb {
        match self {
            Color::Rgb(c) => *c,
            Color::Cmyk(c) => c.to_rgb(),
            Color::Hsv(c) => c.to_rgb(),
            Color::Gray(c) => c.to_rgb(),
        }
    }

    /// RGB components as floats in 0.0..=1.0.
    pub fn components(&self) -> (f32, f32, f32) {
        self.to_rgb().components()
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl From<Rgb> for Color {
    fn from(c: Rgb) -> Self {
        Color::Rgb(c)
    }
}

impl From<Cmyk> for Color {
    fn from(c: Cmyk) -> Self {
        Color::Cmyk(c)
    }
}

impl From<Hsv> for Color {
    fn from(c: Hsv) -> Self {
        Color::Hsv(c)
    }
}

impl From<Grayscale> for Color {
    fn from(c: Grayscale) -> Self {
        Color::Gray(c)
    }
}
