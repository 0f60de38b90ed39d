//! Range compiler: [`VoxelDefinition`]s to concrete [`Tile`]s.
//!
//! # Modes
//!
//! - **Compact** keeps ranges intact. A definition becomes one tile, or two
//!   when its X range crosses the antimeridian.
//! - **Exhaustive** emits one unit tile per `(x, y, f)` cell.
//!
//! ```text
//! "4/0/14:1/3"
//!
//! Compact:     X[14,15] Y3 F0  (wrapped)     Exhaustive:  4/0/14/3
//!              X[0,1]   Y3 F0  (wrapped)                  4/0/15/3
//!                                                         4/0/0/3
//!                                                         4/0/1/3
//! ```
//!
//! Both modes go through the [`RangeMemo`] owned by the [`Compiler`], so the
//! same ranges compiled on every frame are split and enumerated once.
//! Exhaustive expansion is capped per definition by an [`ExpandBudget`].

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::budget::ExpandBudget;
use crate::constants::tiles_per_axis;
use crate::error::CompileError;
use crate::range::RangeMemo;
use crate::types::{DimensionValue, FloorValue, Tile, VoxelDefinition};

/// Output shape of the compiler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompileMode {
  /// One tile per definition (two across the antimeridian).
  #[default]
  Compact,
  /// One unit tile per cell.
  Exhaustive,
}

impl std::str::FromStr for CompileMode {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "compact" => Ok(CompileMode::Compact),
      "exhaustive" => Ok(CompileMode::Exhaustive),
      other => Err(format!("unknown compile mode '{}'", other)),
    }
  }
}

/// A definition that failed to compile.
#[derive(Clone, Debug, PartialEq)]
pub struct DefinitionError {
  /// Position of the definition in the compiled slice.
  pub index: usize,
  pub error: CompileError,
}

/// Tiles from every definition that compiled, plus per-definition errors.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompileReport {
  pub tiles: Vec<Tile>,
  pub errors: Vec<DefinitionError>,
}

/// Tiles produced by compact compilation of one definition.
pub type CompactTiles = SmallVec<[Tile; 2]>;

/// Stateful compiler owning the range memo tables.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
  memo: RangeMemo,
  budget: ExpandBudget,
}

impl Compiler {
  pub fn new(memo_capacity: usize, budget: ExpandBudget) -> Self {
    Self {
      memo: RangeMemo::new(memo_capacity),
      budget,
    }
  }

  pub fn memo(&self) -> &RangeMemo {
    &self.memo
  }

  pub fn budget(&self) -> ExpandBudget {
    self.budget
  }

  /// Compile every definition in `mode`, in input order.
  pub fn compile(&mut self, definitions: &[VoxelDefinition], mode: CompileMode) -> CompileReport {
    let _span = tracing::debug_span!("compile", ?mode, definitions = definitions.len()).entered();

    let mut report = CompileReport::default();
    for (index, definition) in definitions.iter().enumerate() {
      let result = match mode {
        CompileMode::Compact => self
          .compact(definition)
          .map(|tiles| report.tiles.extend(tiles)),
        CompileMode::Exhaustive => self.expand_into(definition, &mut report.tiles).map(|_| ()),
      };
      if let Err(error) = result {
        tracing::warn!(index, id = %definition, %error, "dropping voxel definition");
        report.errors.push(DefinitionError { index, error });
      }
    }
    report
  }

  /// Compact compilation of a single definition.
  pub fn compact(&mut self, definition: &VoxelDefinition) -> Result<CompactTiles, CompileError> {
    let z = definition.z;
    let overflow = CompileError::ZoomOverflow { zoom: z };
    let (f, f2) = definition.f.resolve(z).ok_or_else(|| overflow.clone())?;
    let (y, y2) = definition.y.normalized();
    let segments = self.memo.x_segments(definition.x, z).ok_or(overflow)?;

    let original_id = definition.spatial_id();
    let wrapped = segments.len() > 1;
    Ok(
      segments
        .into_iter()
        .map(|(x, x2)| Tile {
          z,
          x,
          x2,
          y,
          y2,
          f,
          f2,
          original_id: original_id.clone(),
          wrapped,
          time: definition.time,
        })
        .collect(),
    )
  }

  /// Exhaustive expansion of a single definition into `out`.
  ///
  /// Returns the number of tiles appended. Nothing is appended on error.
  pub fn expand_into(
    &mut self,
    definition: &VoxelDefinition,
    out: &mut Vec<Tile>,
  ) -> Result<usize, CompileError> {
    let z = definition.z;
    let cells = cell_count(definition).ok_or(CompileError::ZoomOverflow { zoom: z })?;
    if !self.budget.allows(cells) {
      return Err(CompileError::TooManyCells {
        id: definition.spatial_id(),
        cells,
        max: self.budget.max_cells,
      });
    }

    let overflow = CompileError::ZoomOverflow { zoom: z };
    let xs = self.memo.expand_x(definition.x, z).ok_or_else(|| overflow.clone())?;
    let ys = self.memo.expand(definition.y, z);
    let (f_lo, f_hi) = definition.f.resolve(z).ok_or(overflow)?;
    let fs = self.memo.expand(DimensionValue::Range(f_lo, f_hi), z);

    out.reserve(cells.min(1 << 20) as usize);
    for &x in xs.iter() {
      for &y in ys.iter() {
        for &f in fs.iter() {
          let mut tile = Tile::unit(z, f, x, y);
          tile.time = definition.time;
          out.push(tile);
        }
      }
    }
    Ok(xs.len() * ys.len() * fs.len())
  }

  /// Exhaustive expansion of a single definition.
  pub fn expand(&mut self, definition: &VoxelDefinition) -> Result<Vec<Tile>, CompileError> {
    let mut tiles = Vec::new();
    self.expand_into(definition, &mut tiles)?;
    Ok(tiles)
  }
}

/// Number of unit cells a definition covers, wrap-aware on X.
///
/// Returns `None` when the zoom is past the addressable range.
pub fn cell_count(definition: &VoxelDefinition) -> Option<u128> {
  let n = tiles_per_axis(definition.z)? as i128;
  let span = |lo: i64, hi: i64| (hi as i128 - lo as i128 + 1).max(0) as u128;

  let x = match definition.x.bounds() {
    (lo, hi) if lo > hi => (n - lo as i128) as u128 + span(0, hi),
    (lo, hi) => span(lo, hi),
  };
  let (y_lo, y_hi) = definition.y.normalized();
  let (f_lo, f_hi) = match definition.f {
    FloorValue::Unbounded => (-(n as i64), (n - 1) as i64),
    FloorValue::Bounded(value) => value.normalized(),
  };
  Some(
    x.saturating_mul(span(y_lo, y_hi))
      .saturating_mul(span(f_lo, f_hi)),
  )
}

#[cfg(test)]
#[path = "compile_test.rs"]
mod compile_test;
