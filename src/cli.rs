use crate::config::load_config;
use crate::render::{BoardView, write_output_svg};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "pcbsvg", version, about = "PCB board renderer (interactive-BOM data to SVG)")]
pub struct Args {
    /// Input file (.html interactive BOM or .json board payload) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme and render overrides)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Also draw the fabrication layer
    #[arg(long = "fabrication")]
    pub fabrication: bool,

    /// Raster width for PNG output
    #[arg(short = 'w', long = "width", default_value_t = 1200.0)]
    pub width: f32,

    /// Raster height for PNG output
    #[arg(short = 'H', long = "height", default_value_t = 800.0)]
    pub height: f32,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    config.render.width = args.width;
    config.render.height = args.height;
    if args.fabrication {
        config.render.fabrication = true;
    }

    let input = read_input(args.input.as_deref())?;
    let mut view = BoardView::new(config.clone());
    let svg = view.update(&input)?.to_string();

    match args.output_format {
        OutputFormat::Svg => {
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_png(&svg, &output, &config.render)?;
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, render_cfg: &crate::config::RenderConfig) -> Result<()> {
    crate::render::write_output_png(svg, output, render_cfg)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _render_cfg: &crate::config::RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!("built without PNG support"))
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok(buf);
        }
        return Ok(std::fs::read_to_string(path)?);
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
