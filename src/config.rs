//! Configuration file handling for ascii-mosaic.
//!
//! Loads configuration from `<config dir>/ascii-mosaic/config.toml` or a custom path.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::ascii::{CharSet, ContrastMode};
use crate::settings::SettingsBuilder;

/// Configuration file structure for ascii-mosaic.
#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub fal: FalConfig,
}

/// `[render]`: conversion settings. Unset fields fall back to built-in defaults.
#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    pub resolution: Option<f64>,
    pub contrast: Option<f64>,
    pub brightness: Option<i32>,
    pub invert: Option<bool>,
    pub charset: Option<String>,
    pub contrast_mode: Option<String>,
}

/// `[output]`: how rasters are drawn.
#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// TTF/OTF font used for raster export instead of the built-in bitmap face.
    pub font: Option<PathBuf>,
}

/// `[fal]`: image generation provider.
#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FalConfig {
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
    pub image_size: Option<String>,
}

impl RenderConfig {
    /// Layer the configured values onto a settings builder.
    ///
    /// Range checks happen later in `SettingsBuilder::build`; only the
    /// string-typed fields are validated here.
    pub fn apply(&self, mut builder: SettingsBuilder) -> Result<SettingsBuilder, ConfigError> {
        if let Some(resolution) = self.resolution {
            builder = builder.resolution(resolution);
        }
        if let Some(contrast) = self.contrast {
            builder = builder.contrast(contrast);
        }
        if let Some(brightness) = self.brightness {
            builder = builder.brightness(brightness);
        }
        if let Some(invert) = self.invert {
            builder = builder.invert(invert);
        }
        if let Some(ref name) = self.charset {
            let charset = name
                .parse::<CharSet>()
                .map_err(|e| ConfigError::Invalid(e.to_string()))?;
            builder = builder.charset(charset);
        }
        if let Some(ref name) = self.contrast_mode {
            let mode = name.parse::<ContrastMode>().map_err(ConfigError::Invalid)?;
            builder = builder.contrast_mode(mode);
        }
        Ok(builder)
    }
}

impl Config {
    /// Load configuration from a file path, or the default path when `None`.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            Self::read(&path)
        } else {
            log::debug!("No config file at {}, using defaults", path.display());
            Ok(Config::default())
        }
    }

    /// Load configuration from a path the user asked for explicitly.
    /// A missing file is an error.
    pub fn load_from_explicit(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        Self::read(path)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = Self::from_toml(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{}': {source}", .path.display())]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config file '{}' not found", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("ascii-mosaic").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/ascii-mosaic/config.toml")
        })
}

/// Commented config file written by `config init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"# ascii-mosaic configuration

[render]
# Detail, 0.1 (coarse) to 1.0 (fine)
resolution = 0.5
# Contrast, 0.5 to 3.0 (1.0 leaves tones unchanged)
contrast = 1.1
# Brightness offset, -100 to 100
brightness = 0
invert = false
# halftone, detail, ascii, binary, blocks
charset = "detail"
# midpoint or legacy
contrast_mode = "midpoint"

[output]
# font = "/path/to/monospace.ttf"

[fal]
model = "fal-ai/flux/schnell"
timeout_secs = 120
image_size = "square_hd"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_default_toml_parses() {
        let config = Config::from_toml(DEFAULT_CONFIG_TOML).unwrap();
        assert_eq!(config.render.resolution, Some(0.5));
        assert_eq!(config.render.charset.as_deref(), Some("detail"));
        assert_eq!(config.fal.timeout_secs, Some(120));
        assert!(config.output.font.is_none());
    }

    #[test]
    fn test_default_toml_matches_builtin_settings() {
        let config = Config::from_toml(DEFAULT_CONFIG_TOML).unwrap();
        let settings = config.render.apply(Settings::builder()).unwrap().build().unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_apply_overrides_only_set_fields() {
        let config = Config::from_toml("[render]\ninvert = true\ncharset = \"blocks\"\n").unwrap();
        let settings = config.render.apply(Settings::builder()).unwrap().build().unwrap();
        assert!(settings.invert());
        assert_eq!(settings.charset(), CharSet::Blocks);
        assert_eq!(settings.contrast(), 1.1);
    }

    #[test]
    fn test_apply_rejects_unknown_charset() {
        let config = Config::from_toml("[render]\ncharset = \"braille\"\n").unwrap();
        let err = config.render.apply(Settings::builder()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(Config::from_toml("[render]\ncolour = true\n").is_err());
    }

    #[test]
    fn test_default_path_ends_with_config_toml() {
        let path = default_path();
        assert!(path.ends_with("ascii-mosaic/config.toml"));
    }
}
