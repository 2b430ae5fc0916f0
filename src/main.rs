use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blockpaint::assets::AssetLoader;
use blockpaint::rendering::{encode_png, load_png, render_preview};
use blockpaint::services::{ConvertMode, ConvertOptions, Converter, LoadedCatalog};
use block_match::{Argb, Matcher, MatcherBuilder};

#[derive(Parser)]
#[command(name = "blockpaint")]
#[command(about = "Turn images into grids of colored blocks")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a PNG image into a block grid
    Convert {
        /// Input PNG file
        #[arg(short, long)]
        input: PathBuf,

        /// Output grid JSON file
        #[arg(short, long)]
        output: PathBuf,

        /// Conversion mode
        #[arg(short, long, value_enum, default_value_t = ConvertMode::Nearest)]
        mode: ConvertMode,

        /// Only use these entries (comma-separated names)
        #[arg(long, value_delimiter = ',')]
        only: Option<Vec<String>>,

        /// Favor biome-tinted cells by this distance in terrain mode
        #[arg(long, default_value_t = 0)]
        biome_priority: u64,

        /// Seed for dither jitter
        #[arg(long)]
        seed: Option<u64>,

        /// Also write a PNG preview of the grid
        #[arg(long)]
        preview: Option<PathBuf>,

        /// Convert on a single thread (reproducible dithering)
        #[arg(long)]
        sequential: bool,
    },
    /// Show what one color matches
    Match {
        /// Color as #RGB, #RRGGBB or #AARRGGBB
        color: String,

        /// Biome context for grass-like entries
        #[arg(long)]
        biome: Option<u8>,
    },
    /// Write the embedded catalog.yaml to disk for customization
    Init {
        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,

        /// List embedded assets without extracting
        #[arg(long)]
        list: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blockpaint=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let loader = AssetLoader::from_env();
    if let Err(e) = loader.seed_if_configured() {
        tracing::warn!(%e, "Failed to seed catalog file");
    }

    match cli.command {
        Some(Commands::Convert {
            input,
            output,
            mode,
            only,
            biome_priority,
            seed,
            preview,
            sequential,
        }) => {
            let loaded = LoadedCatalog::load(&loader)?;
            let only = only
                .map(|names| loaded.resolve_names(names.iter().map(String::as_str)))
                .transpose()?;
            let options = ConvertOptions {
                mode,
                biome_priority,
                seed,
                only,
                cached: true,
                parallel: !sequential,
            };
            run_convert_command(&loaded, options, &input, &output, preview.as_deref())
        }
        Some(Commands::Match { color, biome }) => {
            let loaded = LoadedCatalog::load(&loader)?;
            run_match_command(&loaded, &color, biome)
        }
        Some(Commands::Init { force, list }) => run_init_command(&loader, force, list),
        None => run_status_command(&loader),
    }
}

fn run_convert_command(
    loaded: &LoadedCatalog,
    options: ConvertOptions,
    input: &Path,
    output: &Path,
    preview: Option<&Path>,
) -> anyhow::Result<()> {
    let image = load_png(input)?;
    let start = std::time::Instant::now();
    let grid = Converter::new(loaded, options).convert(&image.pixels, image.width, image.height)?;
    tracing::info!(
        width = grid.width,
        height = grid.height,
        entries = grid.used_entries().len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Converted image"
    );

    std::fs::write(output, grid.to_json(&loaded.ids)?)?;
    println!("Wrote {}", output.display());

    if let Some(path) = preview {
        let colors = render_preview(&grid, &loaded.catalog);
        let png_bytes = encode_png(grid.width, grid.height, &colors)?;
        std::fs::write(path, &png_bytes)?;
        println!("Wrote {} ({} bytes)", path.display(), png_bytes.len());
    }
    Ok(())
}

fn run_match_command(loaded: &LoadedCatalog, color: &str, biome: Option<u8>) -> anyhow::Result<()> {
    let color: Argb = color.parse()?;
    let mut builder = MatcherBuilder::new(loaded.catalog.clone());
    if biome.is_some() {
        builder = builder.biome(biome);
    }
    let mut matcher = builder.build()?;

    let entry = |id: Option<u32>| match id {
        Some(id) => format!(
            "{} ({})",
            loaded.describe(id),
            loaded.color_of(id).map(|c| c.to_string()).unwrap_or_default()
        ),
        None => "-".to_string(),
    };

    println!("Color:        {color}");
    println!("Nearest:      {}", entry(matcher.nearest(color)));
    println!("Next nearest: {}", entry(matcher.next_nearest(color)));
    println!("Lighter:      {}", entry(matcher.lighter(color)));
    println!("Darker:       {}", entry(matcher.darker(color)));

    match matcher.nearest_layer_pair(color) {
        Some(pair) => println!(
            "Layer pair:   {} over {}",
            loaded.describe(pair.top),
            loaded.describe(pair.bottom)
        ),
        None => println!("Layer pair:   -"),
    }

    let biome_name = |id: u8| {
        loaded
            .catalog
            .biome(id)
            .map(|b| format!("{} ({})", b.name, b.tint_combined))
            .unwrap_or_else(|| id.to_string())
    };
    match matcher.nearest_biome(color) {
        Some(id) => println!("Biome:        {}", biome_name(id)),
        None => println!("Biome:        -"),
    }
    match matcher.nearest_biome_mix(color) {
        Some(mix) => {
            let names: Vec<String> = mix.ids.iter().map(|&id| biome_name(id)).collect();
            println!("Biome mix:    {} -> {}", names.join(" + "), mix.average);
        }
        None => println!("Biome mix:    -"),
    }
    Ok(())
}

fn run_init_command(loader: &AssetLoader, force: bool, list: bool) -> anyhow::Result<()> {
    if list {
        println!("Embedded assets:\n");
        for f in AssetLoader::list_embedded() {
            println!("  {f}");
        }
        return Ok(());
    }

    let report = loader.init(force)?;
    for path in &report.written {
        println!("Wrote {path}");
    }
    for path in &report.skipped {
        println!("Skipped {path} (exists, use --force to overwrite)");
    }
    Ok(())
}

fn run_status_command(loader: &AssetLoader) -> anyhow::Result<()> {
    println!("blockpaint {}", env!("CARGO_PKG_VERSION"));
    println!("Catalog: {}", loader.catalog_source());

    let loaded = LoadedCatalog::load(loader)?;
    let catalog = &loaded.catalog;
    println!("  entries:     {}", catalog.len());
    println!("  layer pairs: {}", catalog.layer_pairs().len());
    println!(
        "  biomes:      {} ({} valid)",
        catalog.biomes().count(),
        catalog.valid_biomes().count()
    );
    println!("  biome mixes: {}", catalog.mix_colors().len());
    if let Some(id) = loaded.fallback() {
        println!("  fallback:    {}", loaded.describe(id));
    }
    println!("\nRun 'blockpaint --help' for commands");
    Ok(())
}
