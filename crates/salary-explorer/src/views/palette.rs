//! Category colours for the scatter view.

use std::fmt;

/// Alpha of de-emphasized points.
pub const FADED_ALPHA: f64 = 0.2;

/// Lightness factor applied to trend line colours.
pub const DARKEN_FACTOR: f64 = 0.8;

/// Default base colours.
pub const DEFAULT_COLORS: [&str; 5] = ["#1f77b4", "#d62728", "#2ca02c", "#9467bd", "#ff7f0e"];

/// An sRGB colour with alpha, rendered as a CSS `rgba()` string.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Opacity in `[0, 1]`.
    pub a: f64,
}

impl Rgba {
    /// Parses `#rrggbb` (the leading `#` is optional) as an opaque colour.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: 1.0,
        })
    }

    /// Same colour with a different alpha.
    pub fn with_alpha(self, a: f64) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Scales the HLS lightness by `factor`, keeping hue and saturation.
    ///
    /// Channels are truncated back to bytes, so darkening pure red by 0.8
    /// gives `(204, 0, 0)`.
    pub fn darken(self, factor: f64) -> Self {
        let (h, l, s) = rgb_to_hls(
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        );
        let (r, g, b) = hls_to_rgb(h, (l * factor).max(0.0), s);
        let to_byte = |v: f64| (v * 255.0).clamp(0.0, 255.0) as u8;
        Self {
            r: to_byte(r),
            g: to_byte(g),
            b: to_byte(b),
            a: self.a,
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

fn rgb_to_hls(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    if max == min {
        return (0.0, l, 0.0);
    }
    let range = max - min;
    let s = if l <= 0.5 {
        range / (max + min)
    } else {
        range / (2.0 - max - min)
    };
    let rc = (max - r) / range;
    let gc = (max - g) / range;
    let bc = (max - b) / range;
    let h = if r == max {
        bc - gc
    } else if g == max {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    ((h / 6.0).rem_euclid(1.0), l, s)
}

fn hls_to_rgb(h: f64, l: f64, s: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (l, l, l);
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;
    (
        hue_channel(m1, m2, h + 1.0 / 3.0),
        hue_channel(m1, m2, h),
        hue_channel(m1, m2, h - 1.0 / 3.0),
    )
}

fn hue_channel(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}

/// The three renderings of one palette colour.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorVariants {
    /// Emphasized points.
    pub opaque: Rgba,
    /// De-emphasized points.
    pub faded: Rgba,
    /// Trend lines.
    pub darker: Rgba,
}

impl ColorVariants {
    /// Derives the variants of a base colour.
    pub fn of(base: Rgba) -> Self {
        Self {
            opaque: base.with_alpha(1.0),
            faded: base.with_alpha(FADED_ALPHA),
            darker: base.darken(DARKEN_FACTOR).with_alpha(1.0),
        }
    }
}

/// A non-empty cyclic list of category colours.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    variants: Vec<ColorVariants>,
}

impl Palette {
    /// Builds a palette from hex colours.
    ///
    /// Returns `None` if the list is empty or any entry fails to parse.
    pub fn from_hex<I, S>(colors: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let variants = colors
            .into_iter()
            .map(|hex| Rgba::from_hex(hex.as_ref()).map(ColorVariants::of))
            .collect::<Option<Vec<_>>>()?;
        if variants.is_empty() {
            return None;
        }
        Some(Self { variants })
    }

    /// Number of distinct colours.
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Colours for category index `index`, wrapping past the end.
    pub fn variants(&self, index: usize) -> ColorVariants {
        self.variants[index % self.variants.len()]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            variants: DEFAULT_COLORS
                .iter()
                .filter_map(|hex| Rgba::from_hex(hex))
                .map(ColorVariants::of)
                .collect(),
        }
    }
}
