/// rig3d terminal demo
///
/// Renders either the articulated block figure or the lit sphere as ASCII art.
/// Controls:
///   - Drag: rotate (Shift pans, Ctrl zooms)
///   - Figure: ,/. torso  w/e head  a/s d/f arms  z/x c/v legs  r reset  space walk
///   - Moon: l light mode  space orbit  0-3 surface
///   - Q/ESC: Quit
use clap::{Parser, ValueEnum};
use color_eyre::Report;
use eyre::WrapErr;
use rig3d_core::{Config, SceneKind};
use rig3d_terminal::{CellSize, TerminalApp, TerminalOptions};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SceneArg {
    /// Textured sphere with a head or orbiting light
    Moon,
    /// Articulated block figure
    Figure,
}

impl From<SceneArg> for SceneKind {
    fn from(scene: SceneArg) -> Self {
        match scene {
            SceneArg::Moon => SceneKind::Moon,
            SceneArg::Figure => SceneKind::Figure,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "rig3d-terminal")]
#[command(about = "Trackball-driven 3D scenes rendered in the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Scene to show
    #[arg(value_enum, default_value_t = SceneArg::Figure)]
    scene: SceneArg,

    /// RON config file (falls back to RIG3D_CONFIG_PATH, then ./rig3d.ron)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where log output goes; the terminal itself is owned by the renderer
    #[arg(long, default_value = "rig3d.log")]
    log_file: PathBuf,

    /// Target frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Size of one terminal cell in virtual pixels
    #[arg(long, num_args = 2, value_names = ["W", "H"], default_values_t = [8u32, 16])]
    cell: Vec<u32>,
}

fn init_logging(path: &Path) -> Result<(), Report> {
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> Result<(), Report> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let config = Config::load_default(cli.config.as_deref()).wrap_err("failed to load config")?;
    let cell = match cli.cell.as_slice() {
        [width, height] => CellSize {
            width: *width,
            height: *height,
        },
        _ => CellSize::default(),
    };
    let options = TerminalOptions { fps: cli.fps, cell };

    tracing::info!(scene = ?cli.scene, ?options, "starting");
    let mut app = TerminalApp::new(cli.scene.into(), &config, options)?;
    app.run()
}
