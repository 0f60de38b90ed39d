//! Viewport culling and level of detail.
//!
//! Per item and frame, definitions go through:
//!
//! ```text
//! definitions ──► zoom cut ──► spatial cull ──► subsample ──► compiler
//!                 (lod)        (filter)         (lod)
//! ```
//!
//! The zoom cut and spatial cull never empty a non-empty list; when they
//! would, the input is kept as is.

pub mod bounds;
pub mod filter;
pub mod lod;

pub use bounds::{wrap_longitude, GeoBounds};
pub use filter::{Viewport, ViewportFilter};
pub use lod::{detail_level, min_voxel_zoom_level, subsample, MAX_DETAIL_LEVEL};
