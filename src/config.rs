use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::game::Rules;
use crate::snake::Grid;
use crate::speed::Speed;

const SCORE_FILE_NAME: &str = ".snake_scores.json";

pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub grid_width: u16,
    pub grid_height: u16,
    pub initial_length: usize,
    pub food_reward: u32,
    pub speed: Speed,
    pub high_score_file: PathBuf,
    pub haptics: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            grid_width: 20,
            grid_height: 20,
            initial_length: 3,
            food_reward: 10,
            speed: Speed::Normal,
            high_score_file: default_score_file(),
            haptics: true,
            log_file: None,
        }
    }
}

impl Validate for Config {
    fn validate(&self) -> Result<(), String> {
        if !(5..=100).contains(&self.grid_width) {
            return Err("Grid width must be between 5 and 100".to_string());
        }
        if !(5..=100).contains(&self.grid_height) {
            return Err("Grid height must be between 5 and 100".to_string());
        }
        if self.initial_length < 1 || self.initial_length > self.grid_width as usize / 2 {
            return Err(format!(
                "Initial length must be between 1 and {}",
                self.grid_width / 2
            ));
        }
        if self.food_reward == 0 {
            return Err("Food reward must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Config> {
        let config = match fs::read_to_string(path) {
            Ok(content) => Config::from_yaml(&content)
                .with_context(|| format!("Failed to parse config {}", path.display()))?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!("no config at {}, using defaults", path.display());
                Config::default()
            }
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to read config {}", path.display()))
            }
        };
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Config> {
        Ok(serde_yaml_ng::from_str(content)?)
    }

    pub fn checked(self) -> Result<Config> {
        self.validate().map_err(|e| anyhow!("Config validation error: {}", e))?;
        Ok(self)
    }

    pub fn rules(&self) -> Rules {
        Rules {
            grid: Grid::new(self.grid_width as i32, self.grid_height as i32),
            initial_length: self.initial_length,
            food_reward: self.food_reward,
        }
    }
}

fn default_score_file() -> PathBuf {
    env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(SCORE_FILE_NAME)
}
