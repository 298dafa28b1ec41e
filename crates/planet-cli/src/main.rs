/// Command-line front end: sample heights, build patch meshes and summarise
/// the terrain of a configured planet.
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use planet_core::noise::GeneratorTree;
use planet_core::{CubeFace, Patch, PatchMesh, Planet, PlanetConfig, Vec3};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;

// ── CLI ──────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "planet", about = "Procedural planet height field tool")]
struct Args {
    /// Planet config JSON (defaults to an Earth-sized planet)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Surface height along one direction
    Query {
        /// Latitude in degrees
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in degrees
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        lon: f64,

        /// Cartesian direction instead of lat/lon
        #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_hyphen_values = true)]
        dir: Option<Vec<f64>>,
    },

    /// Build one patch mesh and write it as JSON
    Patch {
        #[arg(short, long, value_enum, default_value = "front")]
        face: Face,

        /// Child indices (0-3) to descend through, e.g. `--path 0,2,2`
        #[arg(short, long, value_delimiter = ',')]
        path: Vec<usize>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Height statistics over random surface directions
    Stats {
        #[arg(short = 'n', long, default_value = "10000")]
        samples: usize,

        #[arg(long, default_value = "42")]
        seed: u64,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Face {
    Right,
    Left,
    Top,
    Bottom,
    Front,
    Back,
}

impl From<Face> for CubeFace {
    fn from(f: Face) -> Self {
        match f {
            Face::Right => CubeFace::Right,
            Face::Left => CubeFace::Left,
            Face::Top => CubeFace::Top,
            Face::Bottom => CubeFace::Bottom,
            Face::Front => CubeFace::Front,
            Face::Back => CubeFace::Back,
        }
    }
}

// ── Output ───────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct PatchOutput<'a> {
    face: CubeFace,
    path: &'a [usize],
    patch: Patch,
    mesh: PatchMesh,
    /// Full-resolution triangle list.
    indices: &'a [u32],
}

#[derive(Serialize)]
struct Stats {
    samples: usize,
    min: f64,
    max: f64,
    mean: f64,
    std_dev: f64,
    /// Fraction of samples above the base radius.
    above_base: f64,
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn load_config(path: Option<&PathBuf>) -> Result<PlanetConfig> {
    let Some(path) = path else {
        return Ok(PlanetConfig::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?;
    PlanetConfig::from_json(&text).with_context(|| format!("Invalid config {}", path.display()))
}

fn random_direction(rng: &mut StdRng) -> Vec3 {
    loop {
        let v = Vec3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
        let len2 = v.dot(v);
        if len2 > 1e-6 && len2 <= 1.0 {
            return v.normalize();
        }
    }
}

/// Summary of elevations relative to the base radius. `elevations` must be
/// non-empty.
fn summarize(elevations: &[f64]) -> Stats {
    let n = elevations.len() as f64;
    let mean = elevations.iter().sum::<f64>() / n;
    let var = elevations.iter().map(|h| (h - mean).powi(2)).sum::<f64>() / n;
    Stats {
        samples: elevations.len(),
        min: elevations.iter().copied().fold(f64::INFINITY, f64::min),
        max: elevations.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        mean,
        std_dev: var.sqrt(),
        above_base: elevations.iter().filter(|&&h| h > 0.0).count() as f64 / n,
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = load_config(args.config.as_ref())?;
    info!(
        "planet radius {} m, scale {} m, tile size {}",
        config.radius, config.scale, config.tile_size
    );

    let mut tree = GeneratorTree::new();
    let terrain = tree.ridged_terrain(&config.terrain)?;
    let planet = Planet::new(&config, tree.field(terrain.root)?)?;

    match args.command {
        Command::Query { lat, lon, dir } => {
            let v = match dir {
                Some(d) => Vec3::new(d[0], d[1], d[2]),
                None => Vec3::from_latlon(lat, lon),
            };
            if v.length() == 0.0 {
                bail!("direction must be non-zero");
            }
            let h = planet.height(v);
            let (lat, lon) = v.to_latlon();
            println!("lat {lat:.4} lon {lon:.4}: height {h:.3} m (elevation {:+.3} m)", h - planet.radius());
        }

        Command::Patch { face, path, output } => {
            let face = CubeFace::from(face);
            let mut patch = planet.patch(face.corners(), 1);
            for &child in &path {
                if child > 3 {
                    bail!("child index {child} out of range 0-3");
                }
                let Some(children) = planet.subdivide(&patch) else {
                    bail!("level {} patch cannot be subdivided further", patch.level);
                };
                patch = children[child];
            }
            info!("building {} patch at level {}", face.name(), patch.level);

            let mesh = planet.build_patch(&patch)?;
            let out = PatchOutput {
                face,
                path: &path,
                patch,
                mesh,
                indices: planet.indices().triangles([true; 4]),
            };
            let json = serde_json::to_string(&out)?;
            match output {
                Some(p) => {
                    fs::write(&p, json).with_context(|| format!("Write failed: {}", p.display()))?;
                    eprintln!("[planet] wrote {}", p.display());
                }
                None => println!("{json}"),
            }
        }

        Command::Stats { samples, seed } => {
            if samples == 0 {
                bail!("need at least one sample");
            }
            let mut rng = StdRng::seed_from_u64(seed);
            let heights: Vec<f64> = (0..samples)
                .map(|_| planet.height(random_direction(&mut rng)) - planet.radius())
                .collect();
            println!("{}", serde_json::to_string_pretty(&summarize(&heights))?);
        }
    }

    Ok(())
}
