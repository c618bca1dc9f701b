use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::math::{hsl_to_rgb, rgb_to_u8};

/// Trail color in HSL. Hue in degrees [0, 360), saturation and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailColor {
    hue: f32,
    saturation: f32,
    lightness: f32,
}

impl TrailColor {
    pub fn new(hue: f32, saturation: f32, lightness: f32) -> Self {
        Self {
            hue: normalize_hue(hue),
            saturation,
            lightness,
        }
    }

    pub fn hue(&self) -> f32 {
        self.hue
    }

    pub fn saturation(&self) -> f32 {
        self.saturation
    }

    pub fn lightness(&self) -> f32 {
        self.lightness
    }

    /// sRGB bytes for drawing
    pub fn to_rgb8(&self) -> [u8; 3] {
        rgb_to_u8(hsl_to_rgb(
            self.hue,
            self.saturation / 100.0,
            self.lightness / 100.0,
        ))
    }
}

fn normalize_hue(hue: f32) -> f32 {
    let wrapped = hue.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

impl fmt::Display for TrailColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({}, {}%, {}%)", self.hue, self.saturation, self.lightness)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid hsl color: {0:?}")]
pub struct ParseColorError(String);

impl FromStr for TrailColor {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());

        let inner = s
            .trim()
            .strip_prefix("hsl(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(err)?;

        let mut parts = inner.split(',').map(str::trim);
        let hue = parts.next().and_then(|p| p.parse::<f32>().ok());
        let saturation = parts
            .next()
            .and_then(|p| p.strip_suffix('%'))
            .and_then(|p| p.parse::<f32>().ok());
        let lightness = parts
            .next()
            .and_then(|p| p.strip_suffix('%'))
            .and_then(|p| p.parse::<f32>().ok());

        match (hue, saturation, lightness, parts.next()) {
            (Some(h), Some(s), Some(l), None) if h.is_finite() => Ok(Self::new(h, s, l)),
            _ => Err(err()),
        }
    }
}

impl Serialize for TrailColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TrailColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Source of hues for new trail colors
pub trait HueSource {
    /// Next hue in [0, 360)
    fn next_hue(&mut self) -> f32;
}

/// xorshift64 hue generator - not cryptographic, just varied
#[derive(Debug, Clone)]
pub struct XorShiftHue {
    state: u64,
}

impl XorShiftHue {
    pub fn new(seed: u64) -> Self {
        // xorshift is stuck at zero forever
        let state = if seed == 0 { 0x9e37_79b9_7f4a_7c15 } else { seed };
        Self { state }
    }

    /// Seed from the wall clock
    pub fn from_time() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        Self::new(nanos)
    }
}

impl HueSource for XorShiftHue {
    fn next_hue(&mut self) -> f32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;

        // Top 24 bits fit an f32 mantissa exactly, so the result stays below 360
        let unit = (x >> 40) as f32 / (1u64 << 24) as f32;
        unit * 360.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_as_css_hsl() {
        let color = TrailColor::new(212.5, 100.0, 50.0);
        assert_eq!(color.to_string(), "hsl(212.5, 100%, 50%)");
    }

    #[test]
    fn parses_css_hsl() {
        let color: TrailColor = "hsl(12.25, 100%, 50%)".parse().unwrap();
        assert_eq!(color, TrailColor::new(12.25, 100.0, 50.0));

        let spaced: TrailColor = "  hsl( 300 ,80% , 40% ) ".parse().unwrap();
        assert_eq!(spaced, TrailColor::new(300.0, 80.0, 40.0));
    }

    #[test]
    fn display_round_trips() {
        let color = TrailColor::new(359.99, 100.0, 50.0);
        assert_eq!(color.to_string().parse::<TrailColor>(), Ok(color));
    }

    #[test]
    fn rejects_malformed_strings() {
        for raw in ["cyan", "hsl(1, 2, 3)", "hsl(1, 2%)", "hsl(1, 2%, 3%, 4%)", "rgb(1, 2%, 3%)"] {
            assert!(raw.parse::<TrailColor>().is_err(), "{raw} should not parse");
        }
    }

    #[test]
    fn hue_is_normalized() {
        assert_eq!(TrailColor::new(370.0, 100.0, 50.0).hue(), 10.0);
        assert_eq!(TrailColor::new(-90.0, 100.0, 50.0).hue(), 270.0);
        assert!(TrailColor::new(-1e-7, 100.0, 50.0).hue() < 360.0);
    }

    #[test]
    fn rgb_bytes() {
        assert_eq!(TrailColor::new(0.0, 100.0, 50.0).to_rgb8(), [255, 0, 0]);
        assert_eq!(TrailColor::new(120.0, 100.0, 50.0).to_rgb8(), [0, 255, 0]);
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&TrailColor::new(90.0, 100.0, 50.0)).unwrap();
        assert_eq!(json, "\"hsl(90, 100%, 50%)\"");
        let back: TrailColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back.hue(), 90.0);
    }

    #[test]
    fn xorshift_hues_stay_in_range() {
        let mut hues = XorShiftHue::new(42);
        for _ in 0..10_000 {
            let h = hues.next_hue();
            assert!((0.0..360.0).contains(&h));
        }
    }

    #[test]
    fn xorshift_is_deterministic_per_seed() {
        let a: Vec<f32> = {
            let mut h = XorShiftHue::new(7);
            (0..5).map(|_| h.next_hue()).collect()
        };
        let b: Vec<f32> = {
            let mut h = XorShiftHue::new(7);
            (0..5).map(|_| h.next_hue()).collect()
        };
        assert_eq!(a, b);
        assert_ne!(a[0], a[1]);
    }

    #[test]
    fn zero_seed_still_varies() {
        let mut h = XorShiftHue::new(0);
        let first = h.next_hue();
        assert_ne!(first, h.next_hue());
    }
}
