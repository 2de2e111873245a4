//! raypick - headless pointer hit-testing driver
//!
//! Loads a TOML scene description, replays pointer queries against it, and
//! prints the ranked hits as JSON lines.

mod config;

use anyhow::{bail, Context, Result};
use config::SceneConfig;
use glam::Vec2;
use raypick_ui::{HitResult, PointerQuery};
use serde::Serialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::info;

const DEFAULT_SCENE_PATH: &str = "config/scene.toml";

fn main() -> Result<()> {
    // WARN by default; override via RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let options = options_from_args()?;

    let scene_config = SceneConfig::load_from_path(&options.scene)?;
    let mut scene = scene_config.build()?;
    info!(
        surfaces = scene.pipeline.surface_count(),
        elements = scene.registry.len(),
        "scene loaded"
    );

    let mut queries = options.queries.clone();
    if let Some(script) = &options.script {
        queries.extend(queries_from_script(script)?);
    }
    if queries.is_empty() {
        bail!("no queries given; pass --query x,y[,display] or --script <path>");
    }

    let stdout = std::io::stdout();
    for spec in &queries {
        let mut query = PointerQuery::at(Vec2::new(spec.x, spec.y));
        if let Some(display) = spec.display {
            query = query.on_display(display);
        }
        let hits = scene.pipeline.raycast_all(&scene.registry, &query);
        let report = QueryReport::new(spec, &hits, &scene.names);
        serde_json::to_writer(stdout.lock(), &report)?;
        println!();
    }

    Ok(())
}

/// One pointer query parsed from the command line or a script file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
struct QuerySpec {
    x: f32,
    y: f32,
    display: Option<usize>,
}

struct Options {
    scene: PathBuf,
    queries: Vec<QuerySpec>,
    script: Option<PathBuf>,
}

fn options_from_args() -> Result<Options> {
    options_from_iter(env::args().skip(1))
}

fn options_from_iter<I>(mut args: I) -> Result<Options>
where
    I: Iterator<Item = String>,
{
    let mut scene = PathBuf::from(DEFAULT_SCENE_PATH);
    let mut queries = Vec::new();
    let mut script = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--scene" => {
                scene = args
                    .next()
                    .map(PathBuf::from)
                    .context("--scene needs a path")?;
            }
            "--query" => {
                let spec = args.next().context("--query needs x,y[,display]")?;
                queries.push(parse_query(&spec)?);
            }
            "--script" => {
                script = args.next().map(PathBuf::from);
            }
            other => bail!("unknown argument {other}"),
        }
    }
    Ok(Options {
        scene,
        queries,
        script,
    })
}

fn parse_query(spec: &str) -> Result<QuerySpec> {
    let parts: Vec<&str> = spec.split(',').map(str::trim).collect();
    if parts.len() < 2 || parts.len() > 3 {
        bail!("query must be x,y or x,y,display: {spec}");
    }
    let x = parts[0].parse().with_context(|| format!("bad x in {spec}"))?;
    let y = parts[1].parse().with_context(|| format!("bad y in {spec}"))?;
    let display = match parts.get(2) {
        Some(text) => Some(text.parse().with_context(|| format!("bad display in {spec}"))?),
        None => None,
    };
    Ok(QuerySpec { x, y, display })
}

/// Read whitespace-separated queries from a script file; empty lines and
/// `#` comments are skipped.
fn queries_from_script(path: &Path) -> Result<Vec<QuerySpec>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read script from {}", path.display()))?;
    let mut queries = Vec::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let normalized = line.split_whitespace().collect::<Vec<_>>().join(",");
        queries.push(parse_query(&normalized)?);
    }
    Ok(queries)
}

#[derive(Debug, Serialize)]
struct QueryReport<'a> {
    query: &'a QuerySpec,
    hits: Vec<HitRecord>,
}

/// Flattened, serializable view of a [`HitResult`].
#[derive(Debug, Serialize)]
struct HitRecord {
    element: u64,
    name: String,
    surface: u32,
    distance: f32,
    screen_position: [f32; 2],
    index: usize,
    depth: i32,
    sorting_layer: i32,
    sorting_order: i32,
}

impl<'a> QueryReport<'a> {
    fn new(
        query: &'a QuerySpec,
        hits: &[HitResult],
        names: &[(raypick_ui::ElementHandle, String)],
    ) -> Self {
        let hits = hits
            .iter()
            .map(|hit| HitRecord {
                element: hit.element.0,
                name: names
                    .iter()
                    .find(|(handle, _)| *handle == hit.element)
                    .map(|(_, name)| name.clone())
                    .unwrap_or_default(),
                surface: hit.surface.0,
                distance: hit.distance,
                screen_position: [hit.screen_position.x, hit.screen_position.y],
                index: hit.index,
                depth: hit.depth,
                sorting_layer: hit.sorting_layer,
                sorting_order: hit.sorting_order,
            })
            .collect();
        Self { query, hits }
    }
}
