//! Configuration parsing for the command-line renderer.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use stvoxel::{Rgba, SessionConfig};

/// Root configuration, read from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
	/// Render session tuning.
	pub session: SessionConfig,
	/// Polygon output options.
	pub output: OutputConfig,
}

/// How polygons are written.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
	/// Item color as `#rrggbb`.
	pub color: String,
	/// Opacity 0.0-1.0.
	pub opacity: f32,
	/// Emit one layer per color instead of a flat list.
	pub group_by_color: bool,
	/// Pretty-print JSON.
	pub pretty: bool,
}

impl Default for OutputConfig {
	fn default() -> Self {
		Self {
			color: "#ffffff".to_string(),
			opacity: 1.0,
			group_by_color: false,
			pretty: false,
		}
	}
}

impl OutputConfig {
	/// Item color with opacity applied.
	pub fn rgba(&self) -> Result<Rgba> {
		let color: Rgba = self.color.parse()?;
		Ok(color.with_opacity(self.opacity))
	}
}

impl Config {
	/// Load configuration from a TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read config file: {}", path.display()))?;
		Self::from_toml(&content)
	}

	/// Parse and validate TOML text.
	pub fn from_toml(content: &str) -> Result<Self> {
		let config: Config =
			toml::from_str(content).with_context(|| "Failed to parse config TOML")?;
		config.validate()?;
		Ok(config)
	}

	pub fn validate(&self) -> Result<()> {
		let session = &self.session;
		if session.cache_capacity == 0 {
			anyhow::bail!("session.cache_capacity must be at least 1");
		}
		if session.memo_capacity == 0 {
			anyhow::bail!("session.memo_capacity must be at least 1");
		}
		if !session.time_bucket.is_finite() || session.time_bucket <= 0.0 {
			anyhow::bail!(
				"session.time_bucket must be positive, got {}",
				session.time_bucket
			);
		}
		if !session.margin_degrees.is_finite() || session.margin_degrees < 0.0 {
			anyhow::bail!(
				"session.margin_degrees must be non-negative, got {}",
				session.margin_degrees
			);
		}
		if !(0.0..=1.0).contains(&self.output.opacity) {
			anyhow::bail!(
				"output.opacity must be within 0.0-1.0, got {}",
				self.output.opacity
			);
		}
		self.output
			.rgba()
			.with_context(|| "Invalid output.color")?;
		Ok(())
	}
}
