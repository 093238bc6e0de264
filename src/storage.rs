use crate::config::Config;
use anyhow::Result;
use std::fs;
use std::path::PathBuf;

pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn get_base_dir() -> Result<PathBuf> {
        let mut path =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
        path.push(".medtrack");
        if !path.exists() {
            fs::create_dir_all(&path)?;
        }
        Ok(path)
    }

    pub fn new() -> Result<Self> {
        let path = Self::get_base_dir()?;
        Ok(Self::from_path(path.join("config.json")))
    }

    pub fn from_path(path: PathBuf) -> Self {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                let _ = fs::create_dir_all(parent);
            }
        }
        Self { path }
    }

    /// Loads the config, writing the defaults out on first run.
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            let config = Config::default();
            self.save(&config)?;
            log::info!("Created default config at {}", self.path.display());
            return Ok(config);
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data).map_err(|e| {
            anyhow::anyhow!("Invalid config file {}: {}", self.path.display(), e)
        })?;
        config.reminders.validate().map_err(|e| {
            anyhow::anyhow!("Invalid config file {}: {}", self.path.display(), e)
        })?;
        log::info!("Loaded config from {}", self.path.display());
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let data = serde_json::to_string_pretty(config)?;
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, &data)?;
        fs::rename(&tmp_path, &self.path)?;
        log::debug!("Saved config to {}", self.path.display());
        Ok(())
    }
}
