use clap::{Parser, Subcommand};
use pixfit::drawing::{Color, ColorDefinition, Size, color_tool};
use pixfit::imaging::{self, Quality, RustBackend};
use pixfit::reducer::{self, ImageSizeReducer};
use pixfit::{config, logging, output, process};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pixfit")]
#[command(about = "Deterministic image size reduction")]
#[command(long_about = "\
Deterministic image size reduction

A reducer turns an image size into exact integer dimensions and an optional
crop rectangle. Four policies are available:

  crop        fill width x height, then cut at a gravity anchor
  resize      fit inside width x height, keeping the aspect ratio
  long side   limit the longer side (landscape / portrait lengths)
  short side  limit the shorter side (landscape / portrait lengths)

Reducers are given as a preset name from pixfit.toml, as a JSON record
  {\"type\":0,\"width\":200,\"height\":200,\"gravity\":4}
or as an XML element
  <ImageSizeReducer type=\"crop\" width=\"200\" height=\"200\" gravity=\"4\"/>

Run 'pixfit gen-config' to generate a documented pixfit.toml.")]
#[command(version)]
struct Cli {
    /// Config file; stock defaults apply when it does not exist
    #[arg(long, default_value = config::CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Log plan decisions and file operations to stderr (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the reduction plan for a size without touching any file
    Plan {
        /// Source size, "width=N; height=N" or "N,N"
        #[arg(long)]
        size: String,
        /// Preset name, JSON record or XML element
        #[arg(long)]
        reducer: String,
    },
    /// Reduce one image file
    Reduce {
        source: PathBuf,
        output: PathBuf,
        /// Preset name, JSON record or XML element
        #[arg(long)]
        reducer: String,
        /// JPEG quality (1-100); defaults to output.quality from the config
        #[arg(long)]
        quality: Option<u32>,
    },
    /// Apply every configured preset to every image under a directory
    Batch {
        #[arg(long, default_value = "images")]
        source: PathBuf,
        #[arg(long, default_value = "reduced")]
        output: PathBuf,
    },
    /// Resolve a color definition (name, hex, JSON channels or record)
    Color {
        definition: String,
        /// Opacity percentage (0-100)
        #[arg(long)]
        opacity: Option<i64>,
    },
    /// Print a stock pixfit.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_subscriber(logging::level_for_verbosity(cli.verbose));

    match cli.command {
        Command::Plan { size, reducer } => {
            let config = config::load_config(&cli.config)?;
            let reducer = resolve_reducer(&reducer, &config)?;
            let size: Size = size.parse()?;
            let plan = reducer.run(size)?;
            output::print_plan(&reducer, &plan);
        }
        Command::Reduce {
            source,
            output: target,
            reducer,
            quality,
        } => {
            let config = config::load_config(&cli.config)?;
            let reducer = resolve_reducer(&reducer, &config)?;
            let quality = quality.map(Quality::new).unwrap_or_else(|| config.quality());
            let plan = imaging::reduce_image(
                &RustBackend::new(),
                &source,
                &target,
                &reducer,
                quality,
            )?;
            output::print_plan(&reducer, &plan);
            println!("Wrote {}", target.display());
        }
        Command::Batch { source, output: target } => {
            let config = config::load_config(&cli.config)?;
            init_thread_pool(&config.processing);
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_process_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let manifest = process::process(&source, &target, &config, Some(tx))?;
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            let manifest_path = process::write_manifest(&manifest, &target)?;
            output::print_batch_summary(&manifest);
            println!("Manifest: {}", manifest_path.display());
        }
        Command::Color {
            definition,
            opacity,
        } => {
            let definition = parse_color_definition(&definition);
            let mut color = Color::BLACK;
            color.set_web_color(&definition)?;
            if opacity.is_some() {
                color.set_opacity(opacity)?;
            }
            output::print_color(&color, color_tool::is_named_color(&definition));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

/// Preset name first, then JSON record, then XML element.
fn resolve_reducer(
    text: &str,
    config: &config::PixfitConfig,
) -> Result<ImageSizeReducer, String> {
    if let Some(preset) = config.preset(text) {
        return Ok(*preset);
    }
    let text = text.trim();
    reducer::record::try_parse_str(text)
        .or_else(|| reducer::xml::try_parse_xml(text))
        .ok_or_else(|| {
            format!(
                "'{text}' is neither a preset ({}) nor a reducer record",
                preset_names(config)
            )
        })
}

fn preset_names(config: &config::PixfitConfig) -> String {
    config
        .presets
        .keys()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// JSON arrays and objects become channel definitions; anything else is
/// taken as text (a name, hex string or `rgb(...)`).
fn parse_color_definition(text: &str) -> ColorDefinition {
    serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|value| ColorDefinition::from_json(&value))
        .unwrap_or_else(|| ColorDefinition::Text(text.to_string()))
}
