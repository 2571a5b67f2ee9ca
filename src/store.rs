use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub const HIGH_SCORE_KEY: &str = "snake_high_score";

pub trait ScoreStore {
    fn high_score(&self) -> Result<u32>;
    fn set_high_score(&mut self, score: u32) -> Result<()>;
}

/// Small JSON key/value file. Other keys in the file are preserved on write.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_content(&self) -> Result<String> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(err) => Err(err)
                .with_context(|| format!("failed to read score file {}", self.path.display())),
        }
    }

    fn parse_entries(&self, content: &str) -> Result<BTreeMap<String, u32>> {
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(content)
            .with_context(|| format!("malformed score file {}", self.path.display()))
    }
}

impl ScoreStore for FileStore {
    fn high_score(&self) -> Result<u32> {
        let entries = self.parse_entries(&self.read_content()?)?;
        Ok(entries.get(HIGH_SCORE_KEY).copied().unwrap_or(0))
    }

    fn set_high_score(&mut self, score: u32) -> Result<()> {
        // Unreadable files are left alone; only a corrupt one is replaced.
        let content = self.read_content()?;
        let mut entries = self.parse_entries(&content).unwrap_or_else(|e| {
            tracing::warn!("replacing score file: {:#}", e);
            BTreeMap::new()
        });
        entries.insert(HIGH_SCORE_KEY.to_string(), score);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(&entries)?;
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write score file {}", self.path.display()))
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    high: u32,
    pub(crate) writes: usize,
}

#[cfg(test)]
impl MemoryStore {
    pub fn with_high_score(high: u32) -> Self {
        MemoryStore { high, writes: 0 }
    }
}

#[cfg(test)]
impl ScoreStore for MemoryStore {
    fn high_score(&self) -> Result<u32> {
        Ok(self.high)
    }

    fn set_high_score(&mut self, score: u32) -> Result<()> {
        self.high = score;
        self.writes += 1;
        Ok(())
    }
}
