//! Tile pyramid constants shared by the codec and the projector.
//!
//! # Index Space
//!
//! ```text
//! zoom Z      tiles per axis     X, Y range        F range
//! ─────────────────────────────────────────────────────────────────
//!   0              1             [0, 0]            [-1, 0]
//!   1              2             [0, 1]            [-2, 1]
//!   Z             2^Z            [0, 2^Z - 1]      [-2^Z, 2^Z - 1]
//! ```
//!
//! # Altitude Bands
//!
//! The vertical axis spans a fixed `2^25` meters. At zoom `Z` it is cut into
//! `2^Z` equal bands, so one band is `2^(25 - Z)` meters tall and band `F`
//! starts at `F * 2^(25 - Z)` meters. These values are part of the identifier
//! format and must not change.

/// Log2 of the vertical extent in meters.
pub const ALTITUDE_EXTENT_LOG2: i32 = 25;

/// Vertical extent of the pyramid in meters (`2^25`).
pub const ALTITUDE_EXTENT: f64 = 33_554_432.0;

/// Largest zoom whose index space (`-2^Z ..= 2^Z`) fits in `i64`.
pub const MAX_ZOOM: u8 = 62;

/// Mercator latitude clamp used by the viewport window.
pub const MAX_LATITUDE: f64 = 85.0;

/// Default polygon cache capacity (entries, not polygons).
pub const DEFAULT_CACHE_CAPACITY: usize = 500;

/// Default capacity of each range memo table.
pub const DEFAULT_MEMO_CAPACITY: usize = 1024;

/// Default width of a cache time bucket, in the time unit of the identifiers.
pub const DEFAULT_TIME_BUCKET: f64 = 10.0;

/// Default viewport margin in degrees.
pub const DEFAULT_MARGIN_DEGREES: f64 = 10.0;

/// Number of tiles per axis at `zoom`, or `None` past [`MAX_ZOOM`].
#[inline]
pub fn tiles_per_axis(zoom: u8) -> Option<i64> {
  if zoom > MAX_ZOOM {
    return None;
  }
  1i64.checked_shl(zoom as u32)
}

/// Largest valid X/Y index at `zoom`.
#[inline]
pub fn max_index(zoom: u8) -> Option<i64> {
  tiles_per_axis(zoom).map(|n| n - 1)
}

/// Smallest valid F index at `zoom`.
#[inline]
pub fn min_floor(zoom: u8) -> Option<i64> {
  tiles_per_axis(zoom).map(|n| -n)
}

/// Height of one altitude band at `zoom`: `2^(25 - Z)` meters.
#[inline]
pub fn band_height(zoom: u8) -> f64 {
  2f64.powi(ALTITUDE_EXTENT_LOG2 - zoom as i32)
}

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
