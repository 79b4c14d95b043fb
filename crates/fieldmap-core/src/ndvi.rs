//! NDVI color scale.
//!
//! The band thresholds and colors below are the single definition used by
//! the map overlay, the legend, chart tooltips and list thumbnails. Every
//! consumer goes through [`color_for`] or [`NdviBand::classify`].

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Lowest value of the vegetation-index domain
pub const NDVI_MIN: f64 = -1.0;

/// Highest value of the vegetation-index domain
pub const NDVI_MAX: f64 = 1.0;

/// sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn rgba(self, alpha: u8) -> [u8; 4] {
        [self.r, self.g, self.b, alpha]
    }

    /// Linear blend towards `other`; `t` is clamped to [0, 1]
    pub fn mix(self, other: Color, t: f64) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Color::new(lerp(self.r, other.r), lerp(self.g, other.g), lerp(self.b, other.b))
    }

    /// Move towards black by `amount` in [0, 1]
    pub fn darken(self, amount: f64) -> Color {
        self.mix(Color::new(0, 0, 0), amount)
    }

    /// Move towards the color's own luminance grey by `amount` in [0, 1]
    pub fn desaturate(self, amount: f64) -> Color {
        let luma = (0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64)
            .round() as u8;
        self.mix(Color::new(luma, luma, luma), amount)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Named NDVI band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NdviBand {
    VeryLow,
    Low,
    Moderate,
    Good,
    Excellent,
}

impl NdviBand {
    pub const ALL: [NdviBand; 5] =
        [Self::VeryLow, Self::Low, Self::Moderate, Self::Good, Self::Excellent];

    /// Band of a raw index value.
    ///
    /// Total over `f64`: values outside [-1, 1] clamp to the nearest band,
    /// NaN is treated as bare ground.
    pub fn classify(value: f64) -> Self {
        match value {
            v if v.is_nan() => Self::VeryLow,
            v if v < 0.2 => Self::VeryLow,
            v if v < 0.4 => Self::Low,
            v if v < 0.6 => Self::Moderate,
            v if v < 0.8 => Self::Good,
            _ => Self::Excellent,
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::VeryLow => Color::new(215, 48, 39),
            Self::Low => Color::new(252, 141, 89),
            Self::Moderate => Color::new(254, 224, 139),
            Self::Good => Color::new(145, 207, 96),
            Self::Excellent => Color::new(26, 152, 80),
        }
    }

    /// Value range `[min, max)` covered by the band; the top band also
    /// takes everything at or above its max
    pub fn range(self) -> (f64, f64) {
        match self {
            Self::VeryLow => (NDVI_MIN, 0.2),
            Self::Low => (0.2, 0.4),
            Self::Moderate => (0.4, 0.6),
            Self::Good => (0.6, 0.8),
            Self::Excellent => (0.8, NDVI_MAX),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::VeryLow => "Very low",
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
        }
    }
}

impl fmt::Display for NdviBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Display color of an NDVI value
pub fn color_for(value: f64) -> Color {
    NdviBand::classify(value).color()
}

/// An index reading; its band is always derived from the value
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct NdviSample {
    pub value: f64,
}

impl NdviSample {
    pub fn new(value: f64) -> Self {
        Self { value }
    }

    pub fn color_class(&self) -> NdviBand {
        NdviBand::classify(self.value)
    }

    pub fn color(&self) -> Color {
        color_for(self.value)
    }
}

impl Serialize for NdviSample {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("NdviSample", 3)?;
        state.serialize_field("value", &self.value)?;
        state.serialize_field("colorClass", &self.color_class())?;
        state.serialize_field("color", &self.color())?;
        state.end()
    }
}

/// One legend swatch
#[derive(Debug, Clone, Serialize)]
pub struct LegendEntry {
    pub band: NdviBand,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub color: Color,
}

/// Legend swatches, lowest band first
pub fn legend() -> Vec<LegendEntry> {
    NdviBand::ALL
        .iter()
        .map(|&band| {
            let (min, max) = band.range();
            LegendEntry { band, label: band.label(), min, max, color: band.color() }
        })
        .collect()
}
