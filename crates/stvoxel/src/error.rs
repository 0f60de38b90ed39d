//! Error types for every stage of the voxel pipeline.

use thiserror::Error;

use crate::constants::MAX_ZOOM;

/// Axis of a voxel identifier, used in error reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
  Z,
  F,
  X,
  Y,
  T,
}

impl std::fmt::Display for Axis {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let name = match self {
      Axis::Z => "Z",
      Axis::F => "F",
      Axis::X => "X",
      Axis::Y => "Y",
      Axis::T => "T",
    };
    f.write_str(name)
  }
}

/// Failure to parse a single identifier token.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ParseError {
  #[error("expected 4 '/'-separated segments (Z/F/X/Y), found {found}")]
  SegmentCount { found: usize },

  #[error("{axis}: '{text}' is not an integer")]
  InvalidInteger { axis: Axis, text: String },

  #[error("zoom {zoom} exceeds the maximum of {max}", max = MAX_ZOOM)]
  ZoomOutOfRange { zoom: u64 },

  #[error("{axis}: index {value} is outside [{min}, {max}] at zoom {zoom}")]
  IndexOutOfRange {
    axis: Axis,
    value: i64,
    min: i64,
    max: i64,
    zoom: u8,
  },

  #[error("time part '{text}' must look like 'interval/T'")]
  InvalidTimePart { text: String },

  #[error("time interval '{text}' must be a positive finite number")]
  InvalidInterval { text: String },
}

/// A token that failed to parse, with its position in the input batch.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("token {index} ('{token}'): {error}")]
pub struct TokenError {
  /// Zero-based index among the non-empty tokens of the batch.
  pub index: usize,
  /// Token text after trimming.
  pub token: String,
  pub error: ParseError,
}

/// Failure to compile or expand a definition into tiles.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum CompileError {
  #[error("zoom {zoom} exceeds the maximum of {max}", max = MAX_ZOOM)]
  ZoomOverflow { zoom: u8 },

  #[error("'{id}' expands to {cells} cells, budget is {max}")]
  TooManyCells { id: String, cells: u128, max: u64 },
}

/// Failure to project a tile into geographic space.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ProjectError {
  #[error("zoom {zoom} exceeds the maximum of {max}", max = MAX_ZOOM)]
  ZoomOverflow { zoom: u8 },

  #[error("tile '{id}' has an inverted range")]
  InvertedRange { id: String },

  #[error("tile '{id}': {axis} range [{lo}, {hi}] is outside the index space of zoom {zoom}")]
  OutOfRange {
    id: String,
    axis: Axis,
    lo: i64,
    hi: i64,
    zoom: u8,
  },
}

/// Failure to import a structured voxel document.
#[derive(Debug, Error)]
pub enum ImportError {
  #[error("malformed voxel document: {0}")]
  Json(#[from] serde_json::Error),

  #[error("entry '{name}' id {index}: {axis} must hold one or two integers, found {len}")]
  DimensionArity {
    name: String,
    index: usize,
    axis: Axis,
    len: usize,
  },

  #[error("entry '{name}' id {index}: {error}")]
  InvalidId {
    name: String,
    index: usize,
    error: ParseError,
  },
}

/// Failure while rendering one source item.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RenderError {
  #[error(transparent)]
  Compile(#[from] CompileError),

  #[error(transparent)]
  Project(#[from] ProjectError),
}

/// Failure to read a `#rrggbb` color.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("'{text}' is not a #rrggbb color")]
pub struct ColorError {
  pub text: String,
}
