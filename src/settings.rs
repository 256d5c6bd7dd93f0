//! Validated conversion settings.

use crate::ascii::{CharSet, ContrastMode};

/// Valid detail range.
pub const RESOLUTION_RANGE: (f64, f64) = (0.1, 1.0);
/// Valid contrast range.
pub const CONTRAST_RANGE: (f64, f64) = (0.5, 3.0);
/// Valid brightness range.
pub const BRIGHTNESS_RANGE: (i32, i32) = (-100, 100);

pub const DEFAULT_RESOLUTION: f64 = 0.5;
pub const DEFAULT_CONTRAST: f64 = 1.1;
pub const DEFAULT_BRIGHTNESS: i32 = 0;

/// Errors raised when building [`Settings`] from out-of-range values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
}

/// Immutable settings for one conversion.
///
/// Construct through [`Settings::builder`] or [`Settings::new`]; both reject
/// values outside the documented ranges, so every `Settings` value is valid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    resolution: f64,
    contrast: f64,
    brightness: i32,
    invert: bool,
    charset: CharSet,
    contrast_mode: ContrastMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            contrast: DEFAULT_CONTRAST,
            brightness: DEFAULT_BRIGHTNESS,
            invert: false,
            charset: CharSet::default(),
            contrast_mode: ContrastMode::default(),
        }
    }
}

impl Settings {
    /// Build settings with the default contrast mode.
    pub fn new(
        resolution: f64,
        contrast: f64,
        brightness: i32,
        invert: bool,
        charset: CharSet,
    ) -> Result<Self, SettingsError> {
        Self::builder()
            .resolution(resolution)
            .contrast(contrast)
            .brightness(brightness)
            .invert(invert)
            .charset(charset)
            .build()
    }

    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::default()
    }

    /// A builder seeded with these settings, for deriving variants.
    pub fn to_builder(&self) -> SettingsBuilder {
        SettingsBuilder { settings: *self }
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn contrast(&self) -> f64 {
        self.contrast
    }

    pub fn brightness(&self) -> i32 {
        self.brightness
    }

    pub fn invert(&self) -> bool {
        self.invert
    }

    pub fn charset(&self) -> CharSet {
        self.charset
    }

    pub fn contrast_mode(&self) -> ContrastMode {
        self.contrast_mode
    }
}

/// Builder for [`Settings`]. Validation happens in [`SettingsBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct SettingsBuilder {
    settings: Settings,
}

impl SettingsBuilder {
    pub fn resolution(mut self, resolution: f64) -> Self {
        self.settings.resolution = resolution;
        self
    }

    pub fn contrast(mut self, contrast: f64) -> Self {
        self.settings.contrast = contrast;
        self
    }

    pub fn brightness(mut self, brightness: i32) -> Self {
        self.settings.brightness = brightness;
        self
    }

    pub fn invert(mut self, invert: bool) -> Self {
        self.settings.invert = invert;
        self
    }

    pub fn charset(mut self, charset: CharSet) -> Self {
        self.settings.charset = charset;
        self
    }

    pub fn contrast_mode(mut self, mode: ContrastMode) -> Self {
        self.settings.contrast_mode = mode;
        self
    }

    pub fn build(self) -> Result<Settings, SettingsError> {
        let s = self.settings;
        check_range("resolution", s.resolution, RESOLUTION_RANGE)?;
        check_range("contrast", s.contrast, CONTRAST_RANGE)?;
        check_range(
            "brightness",
            s.brightness as f64,
            (BRIGHTNESS_RANGE.0 as f64, BRIGHTNESS_RANGE.1 as f64),
        )?;
        Ok(s)
    }
}

fn check_range(field: &'static str, value: f64, (min, max): (f64, f64)) -> Result<(), SettingsError> {
    if !value.is_finite() {
        return Err(SettingsError::NotFinite { field });
    }
    if !(min..=max).contains(&value) {
        return Err(SettingsError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}
