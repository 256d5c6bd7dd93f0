//! Per-pixel tone adjustment: brightness, contrast, clamp and inversion.

use std::fmt;
use std::str::FromStr;

use super::grayscale::luminance;

/// Pivot of the contrast curve (mid-gray).
pub const CONTRAST_PIVOT: f64 = 128.0;

/// How the contrast setting is turned into a curve steepness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContrastMode {
    /// Treat the setting as a multiplier around 1.0: 1.0 leaves tones
    /// unchanged, values below flatten and values above steepen the curve.
    #[default]
    Midpoint,
    /// Feed `contrast * 255` straight into the fast-contrast formula.
    /// Produces a negative factor once `contrast > 259/255`.
    Legacy,
}

impl ContrastMode {
    pub fn name(&self) -> &'static str {
        match self {
            ContrastMode::Midpoint => "midpoint",
            ContrastMode::Legacy => "legacy",
        }
    }
}

impl fmt::Display for ContrastMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ContrastMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "midpoint" => Ok(ContrastMode::Midpoint),
            "legacy" => Ok(ContrastMode::Legacy),
            other => Err(format!(
                "unknown contrast mode '{}' (expected midpoint or legacy)",
                other
            )),
        }
    }
}

/// Fast-contrast factor for a contrast level `c` in [-255, 259).
///
/// factor = 259 * (c + 255) / (255 * (259 - c))
#[inline]
fn fast_contrast(level: f64) -> f64 {
    (259.0 * (level + 255.0)) / (255.0 * (259.0 - level))
}

/// Curve steepness for a contrast setting.
///
/// No clamping is applied; keeping `contrast` within its documented range is
/// the caller's job.
pub fn contrast_factor(contrast: f64, mode: ContrastMode) -> f64 {
    match mode {
        ContrastMode::Midpoint => fast_contrast((contrast - 1.0) * CONTRAST_PIVOT),
        ContrastMode::Legacy => fast_contrast(contrast * 255.0),
    }
}

/// Precomputed tone curve shared by every cell of one conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneCurve {
    brightness: f64,
    factor: f64,
    invert: bool,
}

impl ToneCurve {
    pub fn new(brightness: i32, contrast: f64, mode: ContrastMode, invert: bool) -> Self {
        Self {
            brightness: brightness as f64,
            factor: contrast_factor(contrast, mode),
            invert,
        }
    }

    /// The contrast factor this curve applies.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Adjust a luminance value. The result is in [0, 255].
    ///
    /// Brightness is added before contrast; inversion runs after clamping.
    #[inline]
    pub fn apply(&self, gray: f64) -> f64 {
        let gray = gray + self.brightness;
        let gray = self.factor * (gray - CONTRAST_PIVOT) + CONTRAST_PIVOT;
        let gray = gray.clamp(0.0, 255.0);
        if self.invert {
            255.0 - gray
        } else {
            gray
        }
    }

    /// Luminance of an RGB pixel passed through the curve.
    #[inline]
    pub fn tone(&self, r: u8, g: u8, b: u8) -> f64 {
        self.apply(luminance(r, g, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint_identity_at_one() {
        assert!((contrast_factor(1.0, ContrastMode::Midpoint) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_midpoint_factor_for_default() {
        let factor = contrast_factor(1.1, ContrastMode::Midpoint);
        assert!((factor - 1.104_796_037).abs() < 1e-6);
    }

    #[test]
    fn test_midpoint_is_positive_and_increasing_over_range() {
        let mut previous = 0.0;
        for step in 0..=25 {
            let contrast = 0.5 + step as f64 * 0.1;
            let factor = contrast_factor(contrast, ContrastMode::Midpoint);
            assert!(factor.is_finite() && factor > 0.0, "contrast {}", contrast);
            assert!(factor > previous, "contrast {}", contrast);
            previous = factor;
        }
    }

    #[test]
    fn test_legacy_goes_negative_above_threshold() {
        let factor = contrast_factor(1.1, ContrastMode::Legacy);
        assert!((factor - (-25.297_674)).abs() < 1e-5);
    }

    #[test]
    fn test_apply_clamps() {
        let curve = ToneCurve::new(100, 3.0, ContrastMode::Midpoint, false);
        assert_eq!(curve.apply(255.0), 255.0);
        let curve = ToneCurve::new(-100, 3.0, ContrastMode::Midpoint, false);
        assert_eq!(curve.apply(0.0), 0.0);
    }

    #[test]
    fn test_brightness_before_contrast() {
        let curve = ToneCurve::new(100, 1.1, ContrastMode::Midpoint, false);
        let expected = curve.factor() * (100.0 - 128.0) + 128.0;
        assert!((curve.apply(0.0) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_invert_after_clamp() {
        let curve = ToneCurve::new(0, 1.1, ContrastMode::Midpoint, true);
        assert_eq!(curve.tone(255, 255, 255), 0.0);
        assert_eq!(curve.tone(0, 0, 0), 255.0);
    }

    #[test]
    fn test_contrast_mode_parse() {
        assert_eq!("Legacy".parse::<ContrastMode>(), Ok(ContrastMode::Legacy));
        assert_eq!("midpoint".parse::<ContrastMode>(), Ok(ContrastMode::Midpoint));
        assert!("steep".parse::<ContrastMode>().is_err());
    }
}
