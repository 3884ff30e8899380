use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, LevelFilter};
use moldraw_cairo::{load_options, CairoDrawer, DrawColour};
use roxmltree::Document;

mod scene;

use scene::Scene;

#[derive(Parser)]
#[command(author, version, about = "Render molecule drawing scripts to PNG", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Command {
    /// Replay an XML drawing script onto a canvas and save it as PNG
    Draw {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value = "drawing.png")]
        output: PathBuf,
        /// Drawing options (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = LevelFilter::from_str(&cli.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", cli.log_level);
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    match cli.command {
        Command::Draw {
            input,
            output,
            config,
        } => draw(&input, &output, config.as_deref()),
    }
}

fn draw(input: &Path, output: &Path, config: Option<&Path>) -> Result<()> {
    let options = load_options(config).context("Failed to load drawing options")?;
    let xml = fs::read_to_string(input).with_context(|| format!("Failed to read {:?}", input))?;
    let doc = Document::parse(&xml).context("Failed to parse drawing XML")?;
    let scene = Scene::parse(&doc)?;

    let mut drawer = CairoDrawer::with_size(scene.width, scene.height, scene.transform(), options)
        .context("Failed to create canvas")?;
    drawer.init_drawing();
    drawer.clear_drawing()?;
    drawer.set_colour(DrawColour::BLACK);
    scene.replay(&mut drawer).context("Failed to render drawing")?;
    drawer.finish_drawing();

    let png = drawer.get_drawing_text().context("Failed to encode PNG")?;
    fs::write(output, png).with_context(|| format!("Failed to write {:?}", output))?;
    info!(output = output.display().to_string(); "Wrote drawing");
    Ok(())
}
