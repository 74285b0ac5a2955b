mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::Path;

pub const SETTINGS_FILE: &str = "filingcast.yaml";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub settings: Settings,
}

impl AppConfig {
    /// Load settings from `config_dir`, falling back to defaults when the file is absent
    pub fn load(config_dir: &Path) -> Result<Self> {
        let path = config_dir.join(SETTINGS_FILE);
        let settings = if path.exists() {
            Settings::load(&path)?
        } else {
            Settings::default()
        };

        Ok(Self { settings })
    }
}
