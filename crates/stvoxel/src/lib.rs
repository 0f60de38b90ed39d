//! stvoxel - spatiotemporal voxel identifiers to renderable polygons
//!
//! Voxels are cells of the Web-Mercator tile pyramid extended with an
//! altitude band and an optional time window, written as compact text
//! identifiers such as `4/0/14:1/3` or `20/2/931/412_60/5:9`.
//!
//! # Pipeline
//!
//! ```text
//! "Z/F/X/Y_i/T, ..."        JSON document
//!        │                        │
//!        ▼                        ▼
//!     parser ───► VoxelDefinition ◄─── import
//!                       │
//!                       ▼
//!         viewport filter + LOD subsample
//!                       │
//!                       ▼
//!     compile (compact | exhaustive) ──► Tile
//!                       │
//!                       ▼
//!     projector ──► Polygon (ring, base altitude, extrusion)
//!                       │
//!                       ▼
//!     time filter ──► PolygonCache ──► Arc<[Polygon]>
//! ```
//!
//! [`RenderSession`] owns the stateful parts (range memo, cache, metrics) and
//! drives the whole chain per item; the stages are also usable on their own.
//!
//! # Example
//!
//! ```ignore
//! use stvoxel::{parse_identifiers, RenderSession, Rgba, Viewport, VoxelItem};
//!
//! let report = parse_identifiers("4/0/14:1/3, 20/2/931/412_60/5:9");
//! let item = VoxelItem::new(report.definitions, Rgba::from_hex("#ff8800", 200)?);
//!
//! let mut session = RenderSession::default();
//! let view = Viewport::new(11.0, 139.7, 35.6);
//! let polygons = session.render_item(&item, Some(&view), 330.0)?;
//! ```
//!
//! # Features
//!
//! - `metrics`: collect [`SessionMetrics`] (runtime toggle in [`metrics`])
//! - `parallel`: project large tile batches on the rayon pool

pub mod budget;
pub mod color;
pub mod constants;
pub mod error;
pub mod fifo;
pub mod types;

pub use budget::{ExpandBudget, SubsampleBudget};
pub use color::{group_by_color, Rgba};
pub use error::{
  Axis, ColorError, CompileError, ImportError, ParseError, ProjectError, RenderError, TokenError,
};
pub use types::{DimensionValue, FloorValue, Polygon, Tile, TimeWindow, VoxelDefinition};

// Identifier codec
pub mod parser;
pub mod range;
pub use parser::{parse_identifier, parse_identifiers, ParseReport};
pub use range::RangeMemo;

// Tiles and geometry
pub mod compile;
pub mod projector;
pub use compile::{CompileMode, CompileReport, Compiler};
pub use projector::{focus_target, project, project_all, tile_bounds, FocusTarget};

// Culling and level of detail
pub mod viewport;
pub use viewport::{GeoBounds, Viewport, ViewportFilter};

// Structured documents
pub mod import;
pub use import::{import_str, JsonImport, VoxelDocument};

// Stateful rendering
pub mod cache;
pub mod config;
pub mod metrics;
pub mod session;
pub use cache::{CacheKey, PolygonCache};
pub use config::SessionConfig;
pub use metrics::SessionMetrics;
pub use session::{Frame, ItemId, RenderSession, VoxelItem};
