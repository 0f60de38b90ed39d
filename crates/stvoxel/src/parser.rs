//! Identifier parser: text to [`VoxelDefinition`]s.
//!
//! # Grammar
//!
//! ```text
//! input   := token ("," token)*          decoration [ ] ' " is ignored
//! token   := Z "/" F "/" X "/" Y ["_" interval "/" T]
//! axis    := n | "-" | n ":-" | "-:" n | n ":" n
//! ```
//!
//! | axis text | F                   | X / Y                         |
//! |-----------|---------------------|-------------------------------|
//! | `n`       | `n`                 | `n`                           |
//! | `-`       | unbounded           | `[0, 2^Z-1]` (`0` at `Z = 0`) |
//! | `a:-`     | `[a, 2^Z-1]`        | `[a, 2^Z-1]`                  |
//! | `-:b`     | `[-2^Z, b]`         | `[0, b]`                      |
//! | `a:b`     | sorted              | X as written, Y sorted        |
//!
//! The time part maps tick indices to `[interval * lo, interval * (hi + 1))`.
//!
//! Parsing is recoverable per token: [`parse_identifiers`] returns every
//! definition that parsed together with a typed error for each one that
//! did not.

use std::str::FromStr;

use smallvec::SmallVec;

use crate::constants::{max_index, min_floor, MAX_ZOOM};
use crate::error::{Axis, ParseError, TokenError};
use crate::types::{DimensionValue, FloorValue, TimeWindow, VoxelDefinition};

/// Result of parsing a batch of identifiers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParseReport {
  /// Successfully parsed definitions, in input order.
  pub definitions: Vec<VoxelDefinition>,
  /// One entry per token that failed.
  pub errors: Vec<TokenError>,
}

impl ParseReport {
  /// True if every token parsed.
  pub fn is_clean(&self) -> bool {
    self.errors.is_empty()
  }
}

/// Shape of one axis sub-token before zoom-dependent resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shape {
  Full,
  From(i64),
  To(i64),
  Between(i64, i64),
  Single(i64),
}

/// Parse a comma-separated list of identifiers.
pub fn parse_identifiers(input: &str) -> ParseReport {
  let cleaned: String = input
    .chars()
    .filter(|c| !matches!(c, '[' | ']' | '\'' | '"'))
    .collect();

  let mut report = ParseReport::default();
  let tokens = cleaned.split(',').map(str::trim).filter(|t| !t.is_empty());
  for (index, token) in tokens.enumerate() {
    match parse_identifier(token) {
      Ok(definition) => report.definitions.push(definition),
      Err(error) => {
        tracing::warn!(index, token, %error, "skipping malformed voxel identifier");
        report.errors.push(TokenError {
          index,
          token: token.to_string(),
          error,
        });
      }
    }
  }
  report
}

/// Parse a single `Z/F/X/Y[_interval/T]` token.
pub fn parse_identifier(token: &str) -> Result<VoxelDefinition, ParseError> {
  let token = token.trim();
  let (spatial, time_part) = match token.rsplit_once('_') {
    Some((spatial, time)) => (spatial, Some(time)),
    None => (token, None),
  };

  let segments: SmallVec<[&str; 4]> = spatial.split('/').map(str::trim).collect();
  if segments.len() != 4 {
    return Err(ParseError::SegmentCount {
      found: segments.len(),
    });
  }

  let z = parse_zoom(segments[0])?;
  let f = parse_floor(z, segments[1])?;
  let x = parse_axis(z, Axis::X, segments[2])?;
  let y = parse_axis(z, Axis::Y, segments[3])?;
  let time = match time_part {
    Some(text) => parse_time(text)?,
    None => None,
  };

  Ok(VoxelDefinition { z, f, x, y, time })
}

impl FromStr for VoxelDefinition {
  type Err = ParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    parse_identifier(s)
  }
}

fn parse_int(axis: Axis, text: &str) -> Result<i64, ParseError> {
  text
    .trim()
    .parse::<i64>()
    .map_err(|_| ParseError::InvalidInteger {
      axis,
      text: text.to_string(),
    })
}

fn parse_shape(axis: Axis, text: &str) -> Result<Shape, ParseError> {
  let text = text.trim();
  if text == "-" {
    return Ok(Shape::Full);
  }
  if let Some(start) = text.strip_suffix(":-") {
    return Ok(Shape::From(parse_int(axis, start)?));
  }
  if let Some(end) = text.strip_prefix("-:") {
    return Ok(Shape::To(parse_int(axis, end)?));
  }
  if let Some((a, b)) = text.split_once(':') {
    return Ok(Shape::Between(parse_int(axis, a)?, parse_int(axis, b)?));
  }
  Ok(Shape::Single(parse_int(axis, text)?))
}

fn parse_zoom(text: &str) -> Result<u8, ParseError> {
  let zoom = text
    .trim()
    .parse::<u64>()
    .map_err(|_| ParseError::InvalidInteger {
      axis: Axis::Z,
      text: text.to_string(),
    })?;
  if zoom > MAX_ZOOM as u64 {
    return Err(ParseError::ZoomOutOfRange { zoom });
  }
  Ok(zoom as u8)
}

/// Check that both bounds of `value` lie in `[min, max]`.
fn check_bounds(
  axis: Axis,
  zoom: u8,
  value: DimensionValue,
  min: i64,
  max: i64,
) -> Result<DimensionValue, ParseError> {
  let (a, b) = value.bounds();
  for v in [a, b] {
    if v < min || v > max {
      return Err(ParseError::IndexOutOfRange {
        axis,
        value: v,
        min,
        max,
        zoom,
      });
    }
  }
  Ok(value)
}

/// Parse an X or Y sub-token.
fn parse_axis(zoom: u8, axis: Axis, text: &str) -> Result<DimensionValue, ParseError> {
  // Zoom is already capped at MAX_ZOOM, so these cannot fail.
  let max = max_index(zoom).unwrap_or(i64::MAX);
  let value = match parse_shape(axis, text)? {
    Shape::Full if zoom == 0 => DimensionValue::Scalar(0),
    Shape::Full => DimensionValue::Range(0, max),
    Shape::From(start) => DimensionValue::Range(start, max),
    Shape::To(end) => DimensionValue::Range(0, end),
    Shape::Between(a, b) if axis == Axis::X => DimensionValue::Range(a, b),
    Shape::Between(a, b) => DimensionValue::sorted(a, b),
    Shape::Single(v) => DimensionValue::Scalar(v),
  };
  check_bounds(axis, zoom, value, 0, max)
}

/// Parse the F sub-token.
fn parse_floor(zoom: u8, text: &str) -> Result<FloorValue, ParseError> {
  let max = max_index(zoom).unwrap_or(i64::MAX);
  let min = min_floor(zoom).unwrap_or(i64::MIN);
  let value = match parse_shape(Axis::F, text)? {
    Shape::Full => return Ok(FloorValue::Unbounded),
    Shape::From(start) => DimensionValue::sorted(start, max),
    Shape::To(end) => DimensionValue::sorted(min, end),
    Shape::Between(a, b) => DimensionValue::sorted(a, b),
    Shape::Single(v) => DimensionValue::Scalar(v),
  };
  check_bounds(Axis::F, zoom, value, min, max).map(FloorValue::Bounded)
}

/// Parse `interval/T` into a time window; `T = -` means unconstrained.
fn parse_time(text: &str) -> Result<Option<TimeWindow>, ParseError> {
  let invalid = || ParseError::InvalidTimePart {
    text: text.to_string(),
  };
  let (interval_text, ticks) = text.split_once('/').ok_or_else(invalid)?;
  let interval = interval_text
    .trim()
    .parse::<f64>()
    .ok()
    .filter(|i| i.is_finite() && *i > 0.0)
    .ok_or_else(|| ParseError::InvalidInterval {
      text: interval_text.to_string(),
    })?;

  let tick = |t: i64| interval * t as f64;
  let (start, end) = match parse_shape(Axis::T, ticks)? {
    Shape::Full => return Ok(None),
    Shape::From(t) => (tick(t), f64::INFINITY),
    Shape::To(t) => (0.0, tick(t.saturating_add(1))),
    Shape::Between(a, b) => (tick(a.min(b)), tick(a.max(b).saturating_add(1))),
    Shape::Single(t) => (tick(t), tick(t.saturating_add(1))),
  };
  if !(start < end) {
    return Err(invalid());
  }
  Ok(Some(TimeWindow::new(start, end)))
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod parser_test;
