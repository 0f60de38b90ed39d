//! Structured voxel documents: JSON to definitions plus tooltips.
//!
//! ```json
//! {
//!   "meta": { "kasaneSchemaVersion": "1.0" },
//!   "data": [
//!     {
//!       "name": "temperature",
//!       "value": [21.5, 23.0],
//!       "ids": [{ "z": 4, "x": [14, 1], "y": [3], "i": 60, "t": [2], "ref": 0 }]
//!     }
//!   ]
//! }
//! ```
//!
//! Dimension arrays hold one or two integers. A missing `f` covers every
//! altitude band, a missing `x`/`y` the whole axis. Each id is rendered to
//! identifier text and run through the identifier parser, so documents and
//! typed identifiers share one set of validation rules.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Axis, ImportError};
use crate::parser::parse_identifier;
use crate::types::VoxelDefinition;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMeta {
  pub kasane_schema_version: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

/// Root of a voxel document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoxelDocument {
  pub meta: DocumentMeta,
  /// Free-form options; carried but not interpreted.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub option: Option<Value>,
  pub data: Vec<DataEntry>,
}

/// One named series of values and the voxels that reference them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataEntry {
  pub name: String,
  #[serde(default)]
  pub value: Vec<Value>,
  pub ids: Vec<IdEntry>,
}

/// One voxel reference inside a [`DataEntry`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IdEntry {
  pub z: u64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub f: Option<Vec<i64>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub x: Option<Vec<i64>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub y: Option<Vec<i64>>,
  /// Time interval; the id is timed only when both `i` and `t` are set.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub i: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub t: Option<Vec<i64>>,
  /// Index into the entry's `value` array.
  #[serde(rename = "ref")]
  pub reference: usize,
}

/// Definitions and tooltip text extracted from a document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JsonImport {
  /// Unique definitions in document order.
  pub definitions: Vec<VoxelDefinition>,
  /// Tooltip per spatial id (`VoxelDefinition::spatial_id`).
  pub tooltips: HashMap<String, String>,
}

impl JsonImport {
  pub fn tooltip(&self, spatial_id: &str) -> Option<&str> {
    self.tooltips.get(spatial_id).map(String::as_str)
  }
}

/// Parse and import a JSON document.
pub fn import_str(text: &str) -> Result<JsonImport, ImportError> {
  let document: VoxelDocument = serde_json::from_str(text)?;
  import_document(&document)
}

/// Import an already-parsed document.
///
/// Definitions are de-duplicated by spatial id; every reference to a
/// repeated id adds a line to its tooltip.
pub fn import_document(document: &VoxelDocument) -> Result<JsonImport, ImportError> {
  let mut import = JsonImport::default();

  for entry in &document.data {
    for (index, id) in entry.ids.iter().enumerate() {
      let text = identifier_text(&entry.name, index, id)?;
      let definition = parse_identifier(&text).map_err(|error| ImportError::InvalidId {
        name: entry.name.clone(),
        index,
        error,
      })?;

      let key = definition.spatial_id();
      let line = format!(
        "{}: {}",
        entry.name,
        format_value(entry.value.get(id.reference))
      );
      match import.tooltips.get_mut(&key) {
        Some(tooltip) => {
          tooltip.push('\n');
          tooltip.push_str(&line);
        }
        None => {
          import.tooltips.insert(key.clone(), format!("{} | {}", key, line));
          import.definitions.push(definition);
        }
      }
    }
  }

  tracing::debug!(
    entries = document.data.len(),
    definitions = import.definitions.len(),
    "imported voxel document"
  );
  Ok(import)
}

/// Render an id entry as `Z/F/X/Y[_i/T]` identifier text.
pub fn identifier_text(name: &str, index: usize, id: &IdEntry) -> Result<String, ImportError> {
  let dim = |axis: Axis, values: Option<&Vec<i64>>| -> Result<String, ImportError> {
    match values.map(Vec::as_slice) {
      None => Ok("-".to_string()),
      Some([v]) => Ok(v.to_string()),
      Some([a, b]) => Ok(format!("{}:{}", a, b)),
      Some(other) => Err(ImportError::DimensionArity {
        name: name.to_string(),
        index,
        axis,
        len: other.len(),
      }),
    }
  };

  let mut text = format!(
    "{}/{}/{}/{}",
    id.z,
    dim(Axis::F, id.f.as_ref())?,
    dim(Axis::X, id.x.as_ref())?,
    dim(Axis::Y, id.y.as_ref())?
  );
  if let (Some(interval), Some(ticks)) = (id.i, id.t.as_ref()) {
    text.push_str(&format!("_{}/{}", interval, dim(Axis::T, Some(ticks))?));
  }
  Ok(text)
}

/// Tooltip rendering of a referenced value.
fn format_value(value: Option<&Value>) -> String {
  match value {
    Some(Value::String(s)) => s.clone(),
    Some(other) => other.to_string(),
    None => "null".to_string(),
  }
}

#[cfg(test)]
#[path = "import_test.rs"]
mod import_test;
