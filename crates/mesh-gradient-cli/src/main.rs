use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use mesh_gradient::config::parse_hex_color;
use mesh_gradient::{Color, Grid, MeshGenerator, MeshGradient, MeshGradientConfig, MeshVertex};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Control points per row
    #[arg(long, default_value_t = 3)]
    width: usize,

    /// Control points per column
    #[arg(long, default_value_t = 3)]
    height: usize,

    /// Colors as #rrggbb, cycled over the grid row by row
    #[arg(long, value_delimiter = ',', default_value = "#ff4e50,#fc913a,#f9d62e,#2a9d8f")]
    colors: Vec<String>,

    /// Samples per patch axis (overrides the config file)
    #[arg(long)]
    subdivisions: Option<u32>,

    /// Number of frames to render
    #[arg(long, default_value_t = 1)]
    frames: usize,

    /// Animation frame rate (overrides the config file)
    #[arg(long)]
    fps: Option<u32>,

    /// Random seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Render the generated grid without animating it
    #[arg(long = "static")]
    is_static: bool,

    /// Output JSON path, stdout when omitted
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Serialize)]
struct FrameOutput<'a> {
    vertex_count: usize,
    vertices: &'a [MeshVertex],
}

#[derive(Serialize)]
struct RenderOutput<'a> {
    frames: Vec<FrameOutput<'a>>,
}

fn init_logging(level: LogLevel, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(level.to_string().parse()?)
        .from_env_lossy();

    // Logs go to stderr; stdout may carry the frame JSON.
    let subscriber_builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false);

    match format {
        LogFormat::Json => subscriber_builder.json().init(),
        LogFormat::Pretty => subscriber_builder.pretty().init(),
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<MeshGradientConfig> {
    let mut config = match &cli.config {
        Some(path) => MeshGradientConfig::from_path(path)
            .with_context(|| format!("failed to load config {:?}", path))?,
        None => MeshGradientConfig::default(),
    };
    if let Some(subdivisions) = cli.subdivisions {
        config.subdivisions = subdivisions;
    }
    if let Some(fps) = cli.fps {
        config.frames_per_second = fps;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    config.is_static |= cli.is_static;
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn color_distribution(width: usize, height: usize, colors: &[String]) -> Result<Grid<Color>> {
    if width < 2 || height < 2 {
        bail!("grid of {}x{} is too small, both sides need at least 2 cells", width, height);
    }
    let palette = colors
        .iter()
        .map(|c| parse_hex_color(c))
        .collect::<Result<Vec<_>, _>>()?;
    if palette.is_empty() {
        bail!("at least one color is required");
    }
    Ok(Grid::from_fn(width, height, |x, y| {
        palette[(y * width + x) % palette.len()]
    }))
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let colors = color_distribution(cli.width, cli.height, &cli.colors)?;
    let grid = MeshGenerator::generate(&colors);

    info!(
        width = cli.width,
        height = cli.height,
        subdivisions = config.subdivisions,
        animated = !config.is_static,
        "rendering {} frame(s)",
        cli.frames
    );

    let mut gradient = MeshGradient::from_config(grid, &config)?;
    let meshes: Vec<_> = (0..cli.frames).map(|_| gradient.next_frame()).collect();
    let output = RenderOutput {
        frames: meshes
            .iter()
            .map(|mesh| FrameOutput {
                vertex_count: mesh.vertex_count(),
                vertices: &mesh.vertices,
            })
            .collect(),
    };

    match &cli.output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("failed to create {:?}", path))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, &output)?;
            writer.flush()?;
            info!("Wrote {:?}", path);
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            serde_json::to_writer(&mut writer, &output)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log_level, cli.log_format) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
