//! RGBA colors and per-color polygon grouping.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ColorError;
use crate::types::Polygon;

/// 8-bit RGBA color, serialized as `[r, g, b, a]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
  pub const WHITE: Self = Self([255, 255, 255, 255]);

  pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
    Self([r, g, b, a])
  }

  /// Parse `#rrggbb` (leading `#` optional) with an explicit alpha.
  pub fn from_hex(hex: &str, alpha: u8) -> Result<Self, ColorError> {
    let digits = hex.trim().trim_start_matches('#');
    let err = || ColorError {
      text: hex.to_string(),
    };
    if digits.len() != 6 || !digits.is_ascii() {
      return Err(err());
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| err());
    Ok(Self([channel(0)?, channel(2)?, channel(4)?, alpha]))
  }

  /// Replace alpha with an opacity fraction clamped to `[0, 1]`.
  pub fn with_opacity(mut self, opacity: f32) -> Self {
    self.0[3] = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    self
  }

  #[inline]
  pub fn alpha(&self) -> u8 {
    self.0[3]
  }
}

impl Default for Rgba {
  fn default() -> Self {
    Self::WHITE
  }
}

impl FromStr for Rgba {
  type Err = ColorError;

  /// Opaque color from `#rrggbb`.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::from_hex(s, 255)
  }
}

/// Group polygons by color, preserving the order in which colors first appear.
///
/// A renderer draws each group as one layer.
pub fn group_by_color(polygons: impl IntoIterator<Item = Polygon>) -> Vec<(Rgba, Vec<Polygon>)> {
  let mut groups: Vec<(Rgba, Vec<Polygon>)> = Vec::new();
  let mut slots: HashMap<Rgba, usize> = HashMap::new();
  for polygon in polygons {
    let slot = *slots.entry(polygon.color).or_insert_with(|| {
      groups.push((polygon.color, Vec::new()));
      groups.len() - 1
    });
    groups[slot].1.push(polygon);
  }
  groups
}
