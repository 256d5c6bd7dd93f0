//! RGB to luminance using the ITU-R BT.601 formula.

/// Red weight of BT.601 luma.
pub const LUMA_R: f64 = 0.299;
/// Green weight of BT.601 luma.
pub const LUMA_G: f64 = 0.587;
/// Blue weight of BT.601 luma.
pub const LUMA_B: f64 = 0.114;

/// Luminance of one pixel: Y = 0.299*R + 0.587*G + 0.114*B.
///
/// Unlike a flat RGB average this tracks perceived brightness, so green reads
/// brighter than red, and red brighter than blue.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    LUMA_R * r as f64 + LUMA_G * g as f64 + LUMA_B * b as f64
}
