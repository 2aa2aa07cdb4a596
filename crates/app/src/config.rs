use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

/// Optional on-disk settings, read from `config.toml` in the platform
/// config dir. Everything has a sensible default; the file rarely exists.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub data_dir: Option<PathBuf>,
    pub export_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Holds portfolio.db and the images dir.
    pub data_dir: PathBuf,
    /// Default destination for CSV exports.
    pub export_dir: PathBuf,
    pub images_dir: PathBuf,
}

impl AdminConfig {
    pub fn load(data_dir_override: Option<PathBuf>) -> anyhow::Result<Self> {
        let dirs = directories::ProjectDirs::from("pt", "fardaria", "Fardaria")
            .context("could not determine application directories")?;

        let config_path = dirs.config_dir().join("config.toml");
        let file = if config_path.exists() {
            let raw = std::fs::read_to_string(&config_path)
                .with_context(|| format!("could not read {}", config_path.display()))?;
            toml::from_str(&raw)
                .with_context(|| format!("invalid config at {}", config_path.display()))?
        } else {
            ConfigFile::default()
        };

        Ok(Self::resolve(
            data_dir_override,
            file,
            dirs.data_dir().to_path_buf(),
        ))
    }

    /// Precedence: CLI flag, then config file, then the platform default.
    fn resolve(
        data_dir_override: Option<PathBuf>,
        file: ConfigFile,
        platform_data_dir: PathBuf,
    ) -> Self {
        let data_dir = data_dir_override
            .or(file.data_dir)
            .unwrap_or(platform_data_dir);
        let export_dir = file.export_dir.unwrap_or_else(|| PathBuf::from("."));
        let images_dir = data_dir.join("images");
        AdminConfig {
            data_dir,
            export_dir,
            images_dir,
        }
    }
}
