//! Pillow Mesher CLI
//!
//! Generate 3D pillow models from cut-out pictures.

use clap::{Parser, Subcommand};
use pillow_mesher::{
    MesherConfig, PillowMesher, PuffinessPreset, ShapeConfig, ThicknessPreset,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pillow-mesher")]
#[command(author, version, about = "Generate 3D pillow models from cut-out pictures", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a GLB pillow from a picture with a transparent background
    Mesh {
        /// Input image (PNG with alpha)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Thickness preset
        #[arg(short, long, value_enum, default_value = "medium")]
        thickness: ThicknessPreset,

        /// Puffiness preset
        #[arg(short, long, value_enum, default_value = "medium")]
        puffiness: PuffinessPreset,

        /// JSON file with a full shape config (overrides the presets)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override seam subdivisions
        #[arg(long)]
        subdivisions: Option<u32>,

        /// Override outline simplification tolerance (fraction of perimeter)
        #[arg(long)]
        tolerance: Option<f64>,

        /// Seam colour as RRGGBB hex
        #[arg(long, value_parser = parse_color)]
        seam_color: Option<[u8; 3]>,
    },

    /// Print the traced outline of a picture as JSON
    Contour {
        /// Input image (PNG with alpha)
        #[arg(short, long)]
        input: PathBuf,

        /// Outline simplification tolerance (fraction of perimeter)
        #[arg(long, default_value = "0.004")]
        tolerance: f64,
    },

    /// Print the preset table as JSON
    Presets,
}

fn parse_color(s: &str) -> Result<[u8; 3], String> {
    let hex = s.trim_start_matches('#');
    if hex.len() != 6 {
        return Err(format!("Invalid colour '{}'. Use RRGGBB", s));
    }
    let value = u32::from_str_radix(hex, 16).map_err(|e| format!("Invalid colour '{}': {}", s, e))?;
    Ok([(value >> 16) as u8, (value >> 8) as u8, value as u8])
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Mesh {
            input,
            output,
            thickness,
            puffiness,
            config,
            subdivisions,
            tolerance,
            seam_color,
        } => {
            let mut shape = match &config {
                Some(path) => load_shape_config(path)?,
                None => ShapeConfig::from_presets(thickness, puffiness),
            };
            if let Some(subdivisions) = subdivisions {
                shape = shape.with_seam_subdivisions(subdivisions);
            }
            if let Some(tolerance) = tolerance {
                shape = shape.with_simplify_tolerance(tolerance);
            }

            let mut mesher_config = MesherConfig::default();
            if let Some(color) = seam_color {
                mesher_config = mesher_config.with_seam_color(color);
            }

            mesh_image(&input, &output, &shape, mesher_config)?;
        }
        Commands::Contour { input, tolerance } => {
            print_contour(&input, tolerance)?;
        }
        Commands::Presets => {
            print_presets()?;
        }
    }

    Ok(())
}

fn load_shape_config(path: &Path) -> Result<ShapeConfig, Box<dyn std::error::Error>> {
    println!("Loading shape config from {:?}...", path);
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn mesh_image(
    input: &Path,
    output: &Path,
    shape: &ShapeConfig,
    config: MesherConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading image from {:?}...", input);
    let bytes = fs::read(input)?;

    println!("Meshing with config:");
    println!("  - Thickness: {}", shape.thickness);
    println!("  - Front/back puffiness: {} / {}", shape.effective_front_puffiness(), shape.effective_back_puffiness());
    println!("  - Border width: {}", shape.border_width);
    println!("  - Seam subdivisions: {}", shape.seam_subdivisions);
    println!("  - Flat: {}", shape.flat);

    let mesher = PillowMesher::with_config(config);
    let result = mesher.build(&bytes, shape)?;
    let stats = result.stats();

    println!(
        "  Generated {} vertices, {} triangles from {} outline points",
        result.total_vertices(),
        result.total_triangles(),
        stats.contour_points
    );
    println!(
        "  Texture: {}x{} (picture fraction {:.3})",
        result.texture.width(),
        result.texture.height(),
        result.texture.image_fraction()
    );

    let glb_path = if output.extension().is_some() {
        output.to_path_buf()
    } else {
        output.with_extension("glb")
    };
    let glb_data = result.to_glb()?;
    fs::write(&glb_path, &glb_data)?;
    println!("Exported GLB ({} bytes) to {:?}", glb_data.len(), glb_path);

    Ok(())
}

fn print_contour(input: &Path, tolerance: f64) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = fs::read(input)?;
    let shape = ShapeConfig::default().with_simplify_tolerance(tolerance);
    let (contour, crop) = PillowMesher::new().contour(&bytes, &shape)?;

    let report = serde_json::json!({
        "crop": crop,
        "area": contour.area(),
        "perimeter": contour.perimeter(),
        "points": contour.points,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_presets() -> Result<(), Box<dyn std::error::Error>> {
    let mut table = Vec::new();
    for thickness in ThicknessPreset::ALL {
        for puffiness in PuffinessPreset::ALL {
            table.push(serde_json::json!({
                "thickness": thickness,
                "puffiness": puffiness,
                "shape": ShapeConfig::from_presets(thickness, puffiness),
            }));
        }
    }
    println!("{}", serde_json::to_string_pretty(&table)?);
    Ok(())
}
