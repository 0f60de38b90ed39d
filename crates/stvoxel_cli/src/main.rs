//! Voxel identifier renderer.
//!
//! Parses spatial voxel identifiers, or imports a voxel document, and prints
//! the extruded polygons as JSON on stdout. Logging goes to stderr and is
//! controlled with `RUST_LOG`.
//!
//! ```text
//! stvoxel parse "4/0/14:1/3, 20/2/0/0_60/1"
//! stvoxel render --ids "4/0/14:1/3" --mode exhaustive --pretty
//! stvoxel render --json sensors.json --zoom 16 --lon 139.7 --lat 35.6 --time 120
//! ```

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use stvoxel::{
	focus_target, import_str, parse_identifiers, CompileMode, Polygon, RenderSession, TokenError,
	Viewport, VoxelDefinition, VoxelItem,
};

use config::Config;

/// Spatial voxel identifier renderer.
#[derive(Parser, Debug)]
#[command(name = "stvoxel")]
#[command(about = "Renders spatial voxel identifiers into extruded polygons")]
struct Args {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Parse identifiers and report definitions and per-token errors.
	Parse {
		/// Comma-separated identifiers.
		ids: String,

		/// Pretty-print JSON.
		#[arg(long)]
		pretty: bool,
	},
	/// Render identifiers or a voxel document to polygons.
	Render(RenderArgs),
}

#[derive(clap::Args, Debug)]
struct RenderArgs {
	/// Comma-separated identifiers.
	#[arg(long, required_unless_present = "json", conflicts_with = "json")]
	ids: Option<String>,

	/// Voxel document (JSON) to import.
	#[arg(long)]
	json: Option<PathBuf>,

	/// Path to configuration TOML file.
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// Compile mode override: compact or exhaustive.
	#[arg(long)]
	mode: Option<CompileMode>,

	/// Map zoom; enables viewport culling and level of detail.
	#[arg(long, requires_all = ["lon", "lat"])]
	zoom: Option<f64>,

	/// Viewport center longitude.
	#[arg(long, allow_negative_numbers = true, requires = "zoom")]
	lon: Option<f64>,

	/// Viewport center latitude.
	#[arg(long, allow_negative_numbers = true, requires = "zoom")]
	lat: Option<f64>,

	/// Current time for time-windowed voxels.
	#[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
	time: f64,

	/// Item color override as #rrggbb.
	#[arg(long)]
	color: Option<String>,

	/// Opacity override 0.0-1.0.
	#[arg(long, visible_alias = "opacity")]
	alpha: Option<f32>,

	/// Emit one layer per color.
	#[arg(long)]
	group_by_color: bool,

	/// Pretty-print JSON.
	#[arg(long)]
	pretty: bool,
}

/// Definitions to render plus what came with them.
#[derive(Debug, Default)]
struct Source {
	definitions: Vec<VoxelDefinition>,
	/// Tooltip per spatial id (documents only).
	tooltips: HashMap<String, String>,
	/// Identifiers that failed to parse.
	errors: Vec<TokenError>,
}

fn main() -> Result<()> {
	env_logger::init();
	let args = Args::parse();

	match args.command {
		Command::Parse { ids, pretty } => print_json(&parse_output(&ids), pretty),
		Command::Render(render) => run_render(render),
	}
}

fn run_render(args: RenderArgs) -> Result<()> {
	let mut config = match &args.config {
		Some(path) => {
			log::info!("Loading config from: {}", path.display());
			Config::load(path)?
		}
		None => Config::default(),
	};

	if let Some(mode) = args.mode {
		config.session.mode = mode;
	}
	if let Some(color) = &args.color {
		config.output.color = color.clone();
	}
	if let Some(alpha) = args.alpha {
		config.output.opacity = alpha;
	}
	config.output.group_by_color |= args.group_by_color;
	config.output.pretty |= args.pretty;
	config.validate()?;

	let source = load_source(&args)?;
	let viewport = match (args.zoom, args.lon, args.lat) {
		(Some(zoom), Some(lon), Some(lat)) => Some(Viewport::new(zoom, lon, lat)),
		_ => None,
	};

	let pretty = config.output.pretty;
	let output = render_output(source, config, viewport, args.time)?;
	print_json(&output, pretty)
}

fn load_source(args: &RenderArgs) -> Result<Source> {
	if let Some(path) = &args.json {
		log::info!("Importing voxel document: {}", path.display());
		let text = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read voxel document: {}", path.display()))?;
		let import = import_str(&text)
			.with_context(|| format!("Failed to import voxel document: {}", path.display()))?;
		return Ok(Source {
			definitions: import.definitions,
			tooltips: import.tooltips,
			errors: Vec::new(),
		});
	}

	let report = parse_identifiers(args.ids.as_deref().unwrap_or_default());
	for error in &report.errors {
		log::warn!(
			"Skipping identifier #{} '{}': {}",
			error.index,
			error.token,
			error.error
		);
	}
	Ok(Source {
		definitions: report.definitions,
		tooltips: HashMap::new(),
		errors: report.errors,
	})
}

fn parse_output(ids: &str) -> Value {
	let report = parse_identifiers(ids);
	log::info!(
		"Parsed {} definitions, {} errors",
		report.definitions.len(),
		report.errors.len()
	);
	json!({
		"definitions": report.definitions.iter().map(definition_json).collect::<Vec<_>>(),
		"errors": errors_json(&report.errors),
	})
}

/// Render one item and shape the result for stdout.
fn render_output(
	source: Source,
	config: Config,
	viewport: Option<Viewport>,
	time: f64,
) -> Result<Value> {
	let item = VoxelItem::new(source.definitions, config.output.rgba()?);
	let focus = focus_target(&item.definitions);

	let mut session = RenderSession::new(config.session);
	let frame = session.render(std::slice::from_ref(&item), viewport.as_ref(), time);
	if let Some(failure) = frame.errors.first() {
		anyhow::bail!("Failed to render voxels: {}", failure.error);
	}
	log::info!(
		"Rendered {} definitions into {} polygons",
		item.definitions.len(),
		frame.polygon_count()
	);

	let mut output = json!({
		"focus": focus.map(|target| json!({
			"longitude": target.longitude,
			"latitude": target.latitude,
			"start_time": target.start_time,
		})),
		"errors": errors_json(&source.errors),
	});

	if config.output.group_by_color {
		let layers = frame
			.by_color()
			.into_iter()
			.map(|(color, polygons)| {
				let polygons = polygons
					.iter()
					.map(|polygon| polygon_json(polygon, &source.tooltips))
					.collect::<Result<Vec<_>>>()?;
				Ok(json!({ "color": color, "polygons": polygons }))
			})
			.collect::<Result<Vec<_>>>()?;
		output["layers"] = Value::Array(layers);
	} else {
		let polygons = frame
			.polygons()
			.map(|polygon| polygon_json(polygon, &source.tooltips))
			.collect::<Result<Vec<_>>>()?;
		output["polygons"] = Value::Array(polygons);
	}

	Ok(output)
}

fn definition_json(definition: &VoxelDefinition) -> Value {
	json!({
		"id": definition.spatial_id(),
		"z": definition.z,
		"start_time": definition.start_time(),
		"end_time": definition.end_time(),
	})
}

fn errors_json(errors: &[TokenError]) -> Vec<Value> {
	errors
		.iter()
		.map(|error| {
			json!({
				"index": error.index,
				"token": error.token,
				"error": error.error.to_string(),
			})
		})
		.collect()
}

fn polygon_json(polygon: &Polygon, tooltips: &HashMap<String, String>) -> Result<Value> {
	let mut value = serde_json::to_value(polygon).context("Failed to serialize polygon")?;
	if let Some(tooltip) = tooltips.get(&polygon.source_id) {
		value["tooltip"] = Value::String(tooltip.clone());
	}
	Ok(value)
}

fn print_json(value: &Value, pretty: bool) -> Result<()> {
	let text = if pretty {
		serde_json::to_string_pretty(value)?
	} else {
		serde_json::to_string(value)?
	};
	println!("{}", text);
	Ok(())
}
