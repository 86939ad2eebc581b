use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::tools::{
    Compressor, CwebpCompressor, InkscapeRasterizer, Rasterizer, ResvgRasterizer, ToolCommand,
};

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "mipmapgen.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Application configuration
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub tools: ToolsConfig,
    pub output: OutputConfig,
}

/// Input and output locations
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    /// Source SVG
    pub source: PathBuf,
    /// Android resource directory the mipmap folders are created in
    pub res_dir: PathBuf,
}

/// Which rasterizer backend to use
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// External Inkscape process
    Inkscape,
    /// Built-in resvg renderer
    Resvg,
}

/// External tool configuration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ToolsConfig {
    pub backend: Backend,
    /// Command prefix for Inkscape, e.g. ["flatpak", "run", "org.inkscape.Inkscape"]
    pub rasterizer: Vec<String>,
    /// Command prefix for cwebp
    pub compressor: Vec<String>,
    /// WebP quality, 0-100
    pub quality: u8,
}

/// Output behavior
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Keep the intermediate PNG next to each WebP
    pub keep_png: bool,
    /// Write the mipmap-anydpi-v26 descriptors after a successful run
    pub adaptive_icons: bool,
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            source: PathBuf::from("app_icon_simple.svg"),
            res_dir: PathBuf::from("app/src/main/res"),
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        ToolsConfig {
            backend: Backend::Inkscape,
            rasterizer: vec!["inkscape".to_string()],
            compressor: vec!["cwebp".to_string()],
            quality: CwebpCompressor::DEFAULT_QUALITY,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            keep_png: false,
            adaptive_icons: true,
        }
    }
}

impl Config {
    /// Get the path to the per-user config file
    pub fn user_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "mipmapgen")
            .map(|proj_dirs| proj_dirs.config_dir().join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist and parse. Otherwise `./mipmapgen.toml`
    /// and then the per-user file are tried; problems with those are logged
    /// and the defaults are used.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let candidates = [Some(PathBuf::from(LOCAL_CONFIG_FILE)), Self::user_config_path()];
        for path in candidates.into_iter().flatten() {
            if !path.exists() {
                continue;
            }
            match Self::from_file(&path) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    warn!("{}", e);
                    warn!("Using default configuration");
                    return Ok(Config::default());
                }
            }
        }
        Ok(Config::default())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = Self::from_toml(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tools.quality > 100 {
            return Err(ConfigError::Invalid(format!(
                "quality must be between 0 and 100, got {}",
                self.tools.quality
            )));
        }
        if self.tools.backend == Backend::Inkscape {
            self.rasterizer_command()?;
        }
        self.compressor_command()?;
        Ok(())
    }

    fn rasterizer_command(&self) -> Result<ToolCommand, ConfigError> {
        ToolCommand::from_argv(&self.tools.rasterizer)
            .ok_or_else(|| ConfigError::Invalid("tools.rasterizer must name a program".into()))
    }

    fn compressor_command(&self) -> Result<ToolCommand, ConfigError> {
        ToolCommand::from_argv(&self.tools.compressor)
            .ok_or_else(|| ConfigError::Invalid("tools.compressor must name a program".into()))
    }

    /// Build the configured rasterizer backend
    pub fn rasterizer(&self) -> Result<Box<dyn Rasterizer>, ConfigError> {
        Ok(match self.tools.backend {
            Backend::Inkscape => Box::new(InkscapeRasterizer::new(self.rasterizer_command()?)),
            Backend::Resvg => Box::new(ResvgRasterizer::new()),
        })
    }

    pub fn compressor(&self) -> Result<Box<dyn Compressor>, ConfigError> {
        Ok(Box::new(CwebpCompressor::new(
            self.compressor_command()?,
            self.tools.quality,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.paths.source, PathBuf::from("app_icon_simple.svg"));
        assert_eq!(config.paths.res_dir, PathBuf::from("app/src/main/res"));
        assert_eq!(config.tools.backend, Backend::Inkscape);
        assert_eq!(config.tools.rasterizer, vec!["inkscape"]);
        assert_eq!(config.tools.compressor, vec!["cwebp"]);
        assert_eq!(config.tools.quality, 90);
        assert!(!config.output.keep_png);
        assert!(config.output.adaptive_icons);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = config.to_toml().expect("Failed to serialize");
        let deserialized = Config::from_toml(&toml_str).expect("Failed to deserialize");
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::from_toml(
            r#"
            [tools]
            backend = "resvg"
            quality = 75
            "#,
        )
        .unwrap();
        assert_eq!(config.tools.backend, Backend::Resvg);
        assert_eq!(config.tools.quality, 75);
        assert_eq!(config.tools.compressor, vec!["cwebp"]);
        assert_eq!(config.paths, PathsConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.tools.quality = 101;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.tools.rasterizer.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.tools.compressor.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resvg_backend_ignores_rasterizer_command() {
        let mut config = Config::default();
        config.tools.backend = Backend::Resvg;
        config.tools.rasterizer.clear();
        assert!(config.validate().is_ok());
        assert_eq!(config.rasterizer().unwrap().name(), "resvg");
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_explicit_invalid_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[tools\nquality = ").unwrap();
        assert!(matches!(
            Config::load(Some(&path)),
            Err(ConfigError::Parse { .. })
        ));
    }
}
