//! RenderSession - stateful driver of the voxel pipeline.
//!
//! A session owns everything that survives between frames: the compiler and
//! its range memo, the viewport filter, the polygon cache and metrics. Items
//! are plain values passed in on every frame.
//!
//! ```text
//!              ┌──────────── cache hit ─────────────────────────────┐
//!              │                                                    ▼
//! VoxelItem ──► key ──► viewport ──► subsample ──► compile ──► project ──► time ──► Arc<[Polygon]>
//!                       filter                                             filter
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use web_time::Instant;

use crate::cache::{CacheKey, PolygonCache};
use crate::color::{group_by_color, Rgba};
use crate::compile::Compiler;
use crate::config::SessionConfig;
use crate::error::RenderError;
use crate::metrics::SessionMetrics;
use crate::projector::project_all;
use crate::types::{visible_at, Polygon, VoxelDefinition};
use crate::viewport::{detail_level, subsample, Viewport, ViewportFilter, MAX_DETAIL_LEVEL};

/// Tile count above which projection runs on the rayon pool.
#[cfg(feature = "parallel")]
const PARALLEL_THRESHOLD: usize = 4096;

// =============================================================================
// ItemId - unique identifier
// =============================================================================

static ITEM_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Opaque source item identifier.
///
/// Generated atomically - unique within the process lifetime.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ItemId(u64);

impl ItemId {
  pub fn new() -> Self {
    Self(ITEM_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
  }

  pub fn raw(&self) -> u64 {
    self.0
  }
}

impl Default for ItemId {
  fn default() -> Self {
    Self::new()
  }
}

// =============================================================================
// VoxelItem - one source entry
// =============================================================================

/// One user entry or one imported document, drawn in a single color.
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelItem {
  pub id: ItemId,
  pub definitions: Vec<VoxelDefinition>,
  pub color: Rgba,
}

impl VoxelItem {
  pub fn new(definitions: Vec<VoxelDefinition>, color: Rgba) -> Self {
    Self {
      id: ItemId::new(),
      definitions,
      color,
    }
  }
}

// =============================================================================
// Frame - output of one render pass
// =============================================================================

/// Polygons of one item.
#[derive(Clone, Debug)]
pub struct RenderedItem {
  pub item: ItemId,
  pub polygons: Arc<[Polygon]>,
}

/// An item that failed to render.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemError {
  pub item: ItemId,
  pub error: RenderError,
}

/// Result of rendering a list of items; items keep their input order.
#[derive(Clone, Debug, Default)]
pub struct Frame {
  pub items: Vec<RenderedItem>,
  pub errors: Vec<ItemError>,
}

impl Frame {
  /// All polygons, item by item.
  pub fn polygons(&self) -> impl Iterator<Item = &Polygon> {
    self.items.iter().flat_map(|item| item.polygons.iter())
  }

  pub fn polygon_count(&self) -> usize {
    self.items.iter().map(|item| item.polygons.len()).sum()
  }

  /// Polygons grouped by color, first-seen color order.
  pub fn by_color(&self) -> Vec<(Rgba, Vec<Polygon>)> {
    group_by_color(self.polygons().cloned())
  }
}

// =============================================================================
// RenderSession
// =============================================================================

#[derive(Debug, Clone)]
pub struct RenderSession {
  config: SessionConfig,
  compiler: Compiler,
  filter: ViewportFilter,
  cache: PolygonCache,
  metrics: SessionMetrics,
}

impl Default for RenderSession {
  fn default() -> Self {
    Self::new(SessionConfig::default())
  }
}

impl RenderSession {
  pub fn new(config: SessionConfig) -> Self {
    Self {
      compiler: Compiler::new(config.memo_capacity, config.expand),
      filter: ViewportFilter::new(config.margin_degrees),
      cache: PolygonCache::new(config.cache_capacity),
      metrics: SessionMetrics::new(),
      config,
    }
  }

  pub fn config(&self) -> &SessionConfig {
    &self.config
  }

  pub fn cache(&self) -> &PolygonCache {
    &self.cache
  }

  pub fn compiler(&self) -> &Compiler {
    &self.compiler
  }

  pub fn metrics(&self) -> &SessionMetrics {
    &self.metrics
  }

  /// Render every item, collecting per-item failures.
  pub fn render(
    &mut self,
    items: &[VoxelItem],
    viewport: Option<&Viewport>,
    current_time: f64,
  ) -> Frame {
    let _span = tracing::info_span!("render", items = items.len(), current_time).entered();
    let start = Instant::now();

    let mut frame = Frame::default();
    for item in items {
      match self.render_item(item, viewport, current_time) {
        Ok(polygons) => frame.items.push(RenderedItem {
          item: item.id,
          polygons,
        }),
        Err(error) => {
          tracing::warn!(item = item.id.raw(), %error, "voxel item failed to render");
          frame.errors.push(ItemError {
            item: item.id,
            error,
          });
        }
      }
    }

    self
      .metrics
      .record_frame_timing(start.elapsed().as_micros() as u64);
    frame
  }

  /// Polygons of one item at `current_time`, from the cache when possible.
  ///
  /// Without a viewport the item is rendered at full detail and unculled.
  /// Below the configured skip zoom nothing is drawn and nothing is cached.
  pub fn render_item(
    &mut self,
    item: &VoxelItem,
    viewport: Option<&Viewport>,
    current_time: f64,
  ) -> Result<Arc<[Polygon]>, RenderError> {
    if let Some(view) = viewport {
      if !self.config.renders_at(view.zoom) {
        return Ok(Arc::from(Vec::new()));
      }
    }

    let detail = viewport.map_or(MAX_DETAIL_LEVEL, |view| detail_level(view.zoom));
    let key = CacheKey::new(item.id, detail, current_time, self.config.time_bucket);
    let before = self.cache.stats();

    let Self {
      config,
      compiler,
      filter,
      cache,
      metrics,
    } = self;
    let polygons = cache.get_or_try_insert_with(key, || {
      let start = Instant::now();
      let (tiles, polygons) = build(
        config,
        compiler,
        filter,
        item,
        viewport,
        detail,
        current_time,
      )?;
      metrics.record_build(detail, tiles, polygons.len(), start.elapsed().as_micros() as u64);
      Ok::<_, RenderError>(polygons)
    })?;

    let after = self.cache.stats();
    self.metrics.record_lookup(
      after.hits > before.hits,
      (after.evictions - before.evictions) as usize,
    );
    Ok(polygons)
  }

  /// Drop cached polygons for an item whose definitions changed.
  pub fn invalidate(&mut self, item: ItemId) -> usize {
    let removed = self.cache.invalidate(item);
    tracing::debug!(item = item.raw(), removed, "invalidated cached polygons");
    removed
  }

  /// Drop all cached polygons.
  pub fn clear_cache(&mut self) {
    self.cache.clear();
  }
}

/// Cache-miss path: returns the tile count and the visible polygons.
fn build(
  config: &SessionConfig,
  compiler: &mut Compiler,
  filter: &ViewportFilter,
  item: &VoxelItem,
  viewport: Option<&Viewport>,
  detail: u8,
  current_time: f64,
) -> Result<(usize, Vec<Polygon>), RenderError> {
  let _span = tracing::info_span!("build_item", item = item.id.raw(), detail).entered();

  let culled = match viewport {
    Some(view) => filter.filter(&item.definitions, view),
    None => item.definitions.clone(),
  };
  let definitions = subsample(&culled, detail, &config.subsample);

  let report = compiler.compile(&definitions, config.mode);
  if report.tiles.is_empty() {
    // Everything failed: surface the first cause instead of an empty list.
    if let Some(first) = report.errors.into_iter().next() {
      return Err(first.error.into());
    }
  }

  #[cfg(feature = "parallel")]
  let mut polygons = if report.tiles.len() >= PARALLEL_THRESHOLD {
    crate::projector::project_all_par(&report.tiles, item.color)?
  } else {
    project_all(&report.tiles, item.color)?
  };
  #[cfg(not(feature = "parallel"))]
  let mut polygons = project_all(&report.tiles, item.color)?;

  polygons.retain(|polygon| visible_at(polygon.time.as_ref(), current_time));
  tracing::debug!(
    definitions = definitions.len(),
    tiles = report.tiles.len(),
    polygons = polygons.len(),
    "built voxel polygons"
  );
  Ok((report.tiles.len(), polygons))
}

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;
