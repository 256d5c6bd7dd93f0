//! CLI argument parsing with clap.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use ascii_mosaic::settings::{BRIGHTNESS_RANGE, CONTRAST_RANGE, RESOLUTION_RANGE};

use super::enums::{CharacterSet, ContrastCurve};

/// Parse and validate resolution (0.1-1.0)
fn parse_resolution(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    let (min, max) = RESOLUTION_RANGE;
    if !(min..=max).contains(&value) {
        return Err(format!(
            "Resolution must be between {} and {}, got {}",
            min, max, value
        ));
    }
    Ok(value)
}

/// Parse and validate contrast (0.5-3.0)
fn parse_contrast(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    let (min, max) = CONTRAST_RANGE;
    if !(min..=max).contains(&value) {
        return Err(format!(
            "Contrast must be between {} and {}, got {}",
            min, max, value
        ));
    }
    Ok(value)
}

/// Parse and validate brightness (-100 to 100)
fn parse_brightness(s: &str) -> Result<i32, String> {
    let value: i32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid integer", s))?;
    let (min, max) = BRIGHTNESS_RANGE;
    if !(min..=max).contains(&value) {
        return Err(format!(
            "Brightness must be between {} and {}, got {}",
            min, max, value
        ));
    }
    Ok(value)
}

/// Convert images into character mosaics
#[derive(Parser, Debug)]
#[command(name = "ascii-mosaic")]
#[command(version, about = "Convert images into character mosaics", long_about = None)]
#[command(after_help = "EXAMPLES:
    # Print a mosaic of a photo to the terminal
    ascii-mosaic render photo.jpg

    # Fine detail, block glyphs, saved as PNG
    ascii-mosaic render photo.jpg -r 1.0 --charset blocks -o mosaic.png

    # Generate an image with fal.ai and convert it
    ascii-mosaic generate \"lighthouse at dusk\" -o lighthouse.png")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config file path (default: <config dir>/ascii-mosaic/config.toml)
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug)
    #[arg(long, short, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Conversion options shared by `render` and `generate`.
///
/// Every option is optional so unset values fall through to the config file.
#[derive(clap::Args, Debug, Clone, Default, PartialEq)]
pub struct RenderArgs {
    /// Detail, 0.1 (coarse, large glyphs) to 1.0 (fine, small glyphs)
    #[arg(long, short, value_parser = parse_resolution)]
    pub resolution: Option<f64>,

    /// Contrast, 0.5 to 3.0
    #[arg(long, value_parser = parse_contrast)]
    pub contrast: Option<f64>,

    /// Brightness offset, -100 to 100
    #[arg(long, short, value_parser = parse_brightness, allow_negative_numbers = true)]
    pub brightness: Option<i32>,

    /// Invert tones (dense glyphs for highlights)
    #[arg(long, overrides_with = "no_invert")]
    pub invert: bool,

    /// Do not invert tones, even if the config file enables it
    #[arg(long, overrides_with = "invert")]
    pub no_invert: bool,

    /// Character ramp
    #[arg(long)]
    pub charset: Option<CharacterSet>,

    /// Contrast curve
    #[arg(long)]
    pub contrast_mode: Option<ContrastCurve>,

    /// TTF/OTF font for raster output (default: built-in bitmap font)
    #[arg(long)]
    pub font: Option<PathBuf>,
}

impl RenderArgs {
    /// Inversion requested on the command line, if any. The last of
    /// `--invert`/`--no-invert` wins.
    pub fn invert_flag(&self) -> Option<bool> {
        match (self.invert, self.no_invert) {
            (true, _) => Some(true),
            (false, true) => Some(false),
            (false, false) => None,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert an image file
    #[command(after_help = "Output format follows the extension of --output: \
        png, jpg, jpeg, webp or txt. Without --output the mosaic is printed as text.")]
    Render {
        /// Image to convert (PNG, JPEG or WebP)
        input: PathBuf,

        /// Output file
        #[arg(long, short)]
        output: Option<PathBuf>,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Generate an image from a text prompt with fal.ai and convert it
    #[command(after_help = "ENVIRONMENT:
    FAL_API_KEY    Required. Your fal.ai API key (also read from .env).")]
    Generate {
        /// The text prompt describing the image
        prompt: String,

        /// Output file
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// fal.ai model endpoint (default: fal-ai/flux/schnell)
        #[arg(long)]
        model: Option<String>,

        /// Image size preset, e.g. square_hd or landscape_4_3
        #[arg(long)]
        image_size: Option<String>,

        /// Give up after this many seconds (default: 120)
        #[arg(long)]
        timeout: Option<u64>,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// List the available character ramps
    Charsets,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}
