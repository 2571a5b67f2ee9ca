use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use term_snake::app::App;
use term_snake::config::Config;
use term_snake::game::Game;
use term_snake::haptics::{BellHaptics, Haptics, NoHaptics};
use term_snake::render::TermRenderer;
use term_snake::speed::Speed;
use term_snake::store::FileStore;
use term_snake::term::{self, TermManager};

#[derive(Parser)]
#[command(name = "snake")]
#[command(version, about = "Snake in the terminal")]
struct Cli {
    /// YAML config file; missing means defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width in cells
    #[arg(long)]
    width: Option<u16>,

    /// Grid height in cells
    #[arg(long)]
    height: Option<u16>,

    /// Starting speed preset
    #[arg(long, value_enum)]
    speed: Option<Speed>,

    /// Where the high score is kept
    #[arg(long)]
    high_score_file: Option<PathBuf>,

    /// Disable the terminal bell feedback
    #[arg(long)]
    no_haptics: bool,

    /// Write logs to this file (RUST_LOG controls the level)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if let Some(speed) = self.speed {
            config.speed = speed;
        }
        if let Some(path) = self.high_score_file {
            config.high_score_file = path;
        }
        if self.no_haptics {
            config.haptics = false;
        }
        if self.log_file.is_some() {
            config.log_file = self.log_file;
        }

        config.checked()
    }
}

fn init_logging(config: &Config) -> Result<()> {
    // Stdout is the game screen; without a file, logs are dropped.
    let Some(path) = &config.log_file else {
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let config = Cli::parse().into_config()?;
    init_logging(&config)?;
    tracing::info!(?config, "starting snake");

    let store = FileStore::new(&config.high_score_file);
    let game = Game::new(config.rules(), config.speed, store);
    let haptics: Box<dyn Haptics> = if config.haptics {
        Box::new(BellHaptics::stdout())
    } else {
        Box::new(NoHaptics)
    };

    let mut app = App::new(game, TermRenderer::new(TermManager::stdout()?), haptics);

    let result = app
        .renderer_mut()
        .term_mut()
        .setup()
        .and_then(|_| app.run(term::next_event));
    // Restore the terminal even if the game loop failed
    let restored = app.renderer_mut().term_mut().restore();

    if let Err(e) = &result {
        tracing::error!("game loop failed: {:#}", e);
    }
    result.and(restored)
}
