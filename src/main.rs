use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

use ncview::{
    class_colour, depth_range, init_logging, ViewError, ViewTransform, ViewerConfig, Visualizer,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable report
    Summary,
    /// Toolpath as JSON
    Json,
    /// Standalone SVG document
    Svg,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input G-code file
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Summary)]
    format: OutputFormat,

    /// Config file (JSON or TOML); defaults to the platform config directory
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 600.0)]
    height: f64,

    /// Fail when any line could not be turned into geometry
    #[arg(long)]
    strict: bool,
}

fn load_config(path: Option<&PathBuf>) -> Result<ViewerConfig> {
    match path {
        Some(path) => ViewerConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config: {:?}", path)),
        None => ViewerConfig::load_or_default().context("Failed to load default config"),
    }
}

fn print_summary(vis: &Visualizer, view: Option<ViewTransform>) {
    let toolpath = vis.toolpath();
    println!("segments:    {}", toolpath.segments.len());
    println!("path length: {:.3}", toolpath.path_length());
    if toolpath.bounds.is_empty() {
        println!("bounds:      none");
    } else {
        println!(
            "bounds:      {} .. {} ({:.3} x {:.3})",
            toolpath.bounds.min,
            toolpath.bounds.max,
            toolpath.bounds.width(),
            toolpath.bounds.height()
        );
    }
    if let Some((low, high)) = depth_range(&toolpath.segments) {
        println!("depth:       {:.3} .. {:.3}", low, high);
    }
    if let Some(view) = view {
        println!(
            "fit:         scale {:.4}, translate {}",
            view.scale(),
            view.translate()
        );
    }
    println!(
        "diagnostics: {} error(s), {} warning(s)",
        toolpath.error_count(),
        toolpath.warning_count()
    );
    for diagnostic in &toolpath.diagnostics {
        println!("  {}", diagnostic);
    }
}

fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    let config = load_config(cli.config.as_ref())?;
    debug!("Using config: {:?}", config);

    let content = fs::read_to_string(&cli.input)
        .with_context(|| format!("Failed to read input file: {:?}", cli.input))?;

    let vis = Visualizer::new(config.parser, config.view);
    vis.load(&content);
    info!(
        "Parsed {:?}: {} segments",
        cli.input,
        vis.toolpath().segments.len()
    );

    if cli.strict {
        vis.toolpath()
            .check()
            .with_context(|| format!("Invalid program: {:?}", cli.input))?;
    }

    // An empty program has nothing to fit
    let view = match vis.fit_to_view(cli.width, cli.height) {
        Ok(view) => Some(view),
        Err(ViewError::EmptyBounds) => None,
        Err(err) => return Err(err).context("Invalid viewport size"),
    };

    match cli.format {
        OutputFormat::Summary => print_summary(&vis, view),
        OutputFormat::Json => {
            let json = vis.toolpath().to_json().context("Failed to serialize toolpath")?;
            println!("{}", json);
        }
        OutputFormat::Svg => {
            let document = vis.svg_document(cli.width, cli.height, |class| {
                class_colour(&config.display, class)
            });
            println!("{}", document);
        }
    }

    Ok(())
}
