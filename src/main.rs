use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use terrain_maker::export::{
    export_geometry_to_glb, export_heightmap_csv, export_heightmap_raw, load_image, save_image,
};
use terrain_maker::splat::bake_splat_map;
use terrain_maker::{derive_normal_map, generate_terrain, TerrainConfig, TextureSlots};

/// Procedural terrain generator
#[derive(Parser, Debug)]
#[command(name = "terrain-maker", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Synthesize a terrain and export it as GLB
    Generate(GenerateArgs),
    /// Derive a tangent-space normal map from an image
    NormalMap {
        /// Source image
        #[arg(short, long)]
        input: PathBuf,
        /// Output PNG
        #[arg(short, long)]
        output: PathBuf,
        /// Gradient strength
        #[arg(short, long, default_value_t = 1.0)]
        strength: f32,
    },
    /// Print the default configuration as TOML
    DefaultConfig,
}

#[derive(clap::Args, Debug)]
struct GenerateArgs {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Override the noise seed
    #[arg(long, conflicts_with = "random_seed")]
    seed: Option<i64>,
    /// Draw a random noise seed
    #[arg(long)]
    random_seed: bool,
    /// Override the grid resolution
    #[arg(short, long)]
    resolution: Option<usize>,
    /// Override the world size
    #[arg(short, long)]
    world_size: Option<f32>,
    /// Output GLB file
    #[arg(short, long, default_value = "terrain.glb")]
    output: PathBuf,
    /// Also write the heightmap as a CSV grid
    #[arg(long)]
    heightmap_csv: Option<PathBuf>,
    /// Also write the heightmap as raw f32 samples
    #[arg(long)]
    heightmap_raw: Option<PathBuf>,
    /// Also bake the texture blend into a PNG splat map
    #[arg(long)]
    splat_map: Option<PathBuf>,
    /// Derive normal maps for texture slots without one into this directory
    #[arg(long)]
    normal_maps: Option<PathBuf>,
    /// Strength used for derived normal maps
    #[arg(long, default_value_t = 1.0)]
    strength: f32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Generate(args) => generate(args),
        Command::NormalMap {
            input,
            output,
            strength,
        } => normal_map(&input, &output, strength),
        Command::DefaultConfig => {
            print!("{}", TerrainConfig::default().to_toml_string()?);
            Ok(())
        }
    }
}

fn generate(args: GenerateArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => TerrainConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TerrainConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.terrain.noise.seed = seed;
    } else if args.random_seed {
        config.terrain.noise.seed = rand::random::<u32>() as i64;
    }
    if let Some(resolution) = args.resolution {
        config.terrain.resolution = resolution;
    }
    if let Some(world_size) = args.world_size {
        config.terrain.world_size = world_size;
    }
    config.validate().context("invalid terrain configuration")?;

    let terrain_params = &config.terrain;
    log::info!(
        "Generating {}x{} terrain (seed {}, world size {})",
        terrain_params.resolution,
        terrain_params.resolution,
        terrain_params.noise.seed,
        terrain_params.world_size
    );
    let terrain = generate_terrain(terrain_params)?;

    export_geometry_to_glb(&terrain.geometry, &args.output)
        .with_context(|| format!("exporting {}", args.output.display()))?;
    log::info!("Exported terrain mesh to {}", args.output.display());

    if let Some(path) = &args.heightmap_csv {
        export_heightmap_csv(&terrain.heightmap, path)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("Exported heightmap grid to {}", path.display());
    }

    if let Some(path) = &args.heightmap_raw {
        export_heightmap_raw(&terrain.heightmap, path)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("Exported raw heightmap to {}", path.display());
    }

    if let Some(path) = &args.splat_map {
        let splat_map = bake_splat_map(&terrain.heightmap, &terrain.geometry.normals, &config.textures)?;
        save_image(&splat_map, path).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Exported splat map to {}", path.display());
    }

    if let Some(dir) = &args.normal_maps {
        derive_slot_normal_maps(&config.textures, dir, args.strength)?;
    }

    Ok(())
}

/// Derive a normal map for each textured slot that has none
fn derive_slot_normal_maps(slots: &TextureSlots, dir: &Path, strength: f32) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    for slot in slots.iter() {
        let Some(diffuse) = &slot.diffuse else {
            log::debug!("slot {} ({}) has no diffuse texture", slot.index, slot.name);
            continue;
        };
        if slot.normal.is_some() {
            continue;
        }

        let output = dir.join(format!("{}_normal.png", slot.name.to_lowercase()));
        normal_map(diffuse, &output, strength)?;
    }

    Ok(())
}

fn normal_map(input: &Path, output: &Path, strength: f32) -> Result<()> {
    let source = load_image(input).with_context(|| format!("loading {}", input.display()))?;
    let normal_map = derive_normal_map(&source, strength)?;
    save_image(&normal_map, output).with_context(|| format!("writing {}", output.display()))?;
    log::info!("Derived normal map {} -> {}", input.display(), output.display());
    Ok(())
}
