//! Unit tests for the conversion core.
//!
//! These tests cover:
//! - Grid geometry bounds and monotonicity
//! - Tone curve (brightness, contrast, inversion)
//! - Glyph selection and ramp fidelity
//! - End-to-end conversion of uniform and gradient bitmaps

use ascii_mosaic::ascii::*;
use ascii_mosaic::bitmap::SourceBitmap;
use ascii_mosaic::{convert, Settings};

const BLACK: [u8; 4] = [0, 0, 0, 255];
const WHITE: [u8; 4] = [255, 255, 255, 255];

fn settings_with(f: impl FnOnce(ascii_mosaic::SettingsBuilder) -> ascii_mosaic::SettingsBuilder) -> Settings {
    f(Settings::builder()).build().unwrap()
}

/// Horizontal gray ramp from black on the left to white on the right.
fn gradient(width: u32, height: u32) -> SourceBitmap {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for _y in 0..height {
        for x in 0..width {
            let v = (x * 255 / (width - 1).max(1)) as u8;
            data.extend_from_slice(&[v, v, v, 255]);
        }
    }
    SourceBitmap::new(width, height, data)
}

// === Geometry Tests ===

#[test]
fn test_geometry_bounds_hold_for_extreme_sizes() {
    let sizes = [
        (1, 1),
        (1, 5000),
        (5000, 1),
        (37, 91),
        (640, 480),
        (4000, 3000),
        (20000, 100),
    ];
    let resolutions = [0.1, 0.25, 0.5, 0.75, 1.0];

    for &(w, h) in &sizes {
        for &r in &resolutions {
            let g = resolve(w, h, r);
            assert!(
                (MIN_COLS..=MAX_COLS).contains(&g.cols),
                "{}x{} @ {} gave {} cols",
                w,
                h,
                r,
                g.cols
            );
            assert!(g.rows >= 1, "{}x{} @ {} gave 0 rows", w, h, r);
        }
    }
}

#[test]
fn test_higher_resolution_never_decreases_cols() {
    for &(w, h) in &[(50, 50), (320, 240), (1000, 750), (1920, 1080), (6000, 4000)] {
        let mut previous = 0;
        for step in 0..=90 {
            let r = 0.1 + step as f64 * 0.01;
            let cols = resolve(w, h, r).cols;
            assert!(
                cols >= previous,
                "{}x{}: cols dropped from {} to {} at resolution {}",
                w,
                h,
                previous,
                cols,
                r
            );
            previous = cols;
        }
    }
}

#[test]
fn test_large_image_at_full_resolution_clamps_to_max_cols() {
    let g = resolve(2000, 1500, 1.0);
    assert_eq!(g.cols, 600);
    // floor(600 * 0.75 * 0.55)
    assert_eq!(g.rows, 247);
    assert_eq!(g.font_size, 5.0);
}

#[test]
fn test_1000x750_at_full_resolution() {
    // 1000 / 2.75 = 363.6, below the 600 cap.
    let g = resolve(1000, 750, 1.0);
    assert_eq!(g.cols, 363);
    assert_eq!(g.rows, 149);
}

#[test]
fn test_tiny_image_at_lowest_resolution_clamps_up_to_min_cols() {
    let g = resolve(50, 50, 0.1);
    assert_eq!(g.cols, 40);
    assert_eq!(g.font_size, 18.0);
}

#[test]
fn test_output_aspect_tracks_image_aspect() {
    let g = resolve(1600, 900, 0.6);
    let image_aspect = 900.0 / 1600.0;
    let output_aspect = g.output_height() / g.output_width();
    // Rows are floored, so the output can be at most one row short.
    assert!(output_aspect <= image_aspect + 1e-9);
    assert!(image_aspect - output_aspect < g.cell_height / g.output_width());
}

// === Tone Tests ===

#[test]
fn test_luminance_weights() {
    assert_eq!(luminance(0, 0, 0), 0.0);
    assert!((luminance(255, 255, 255) - 255.0).abs() < 1e-9);
    assert!((luminance(255, 0, 0) - 76.245).abs() < 1e-9);
    assert!(luminance(0, 255, 0) > luminance(255, 0, 0));
    assert!(luminance(255, 0, 0) > luminance(0, 0, 255));
}

#[test]
fn test_midpoint_contrast_is_increasing_over_range() {
    let mut previous = 0.0;
    for step in 0..=25 {
        let c = 0.5 + step as f64 * 0.1;
        let factor = contrast_factor(c, ContrastMode::Midpoint);
        assert!(factor > 0.0, "factor at {} is {}", c, factor);
        assert!(factor > previous, "factor not increasing at {}", c);
        previous = factor;
    }
}

#[test]
fn test_legacy_contrast_is_negative_past_the_pole() {
    assert!(contrast_factor(1.1, ContrastMode::Legacy) < 0.0);
    assert!(contrast_factor(0.5, ContrastMode::Legacy) > 0.0);
}

#[test]
fn test_tone_curve_order_of_operations() {
    // Brightness is applied before contrast: (100 + 28 - 128) * f + 128 = 128.
    let curve = ToneCurve::new(28, 2.0, ContrastMode::Midpoint, false);
    assert!((curve.apply(100.0) - 128.0).abs() < 1e-9);

    // Clamping happens before inversion.
    let curve = ToneCurve::new(100, 1.0, ContrastMode::Midpoint, true);
    assert_eq!(curve.apply(250.0), 0.0);
}

// === Glyph Selection Tests ===

#[test]
fn test_ramp_literals_are_exact() {
    assert_eq!(CharSet::Halftone.ramp(), " .·:+*?%S#@");
    assert_eq!(
        CharSet::Detail.ramp(),
        " `.-':_,^=;><+!rc*/z?sLTv)J7(|Fi{C}fI31tlu[neoZ5Yxjya]2ESwqkP6h9d4VpOGbUAKXHm8RD#$Bg0MNWQ%&@$"
    );
    assert_eq!(
        CharSet::Ascii.ramp(),
        " .`^\",:;Il!i~+_-?][}{1)(|\\/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$"
    );
    assert_eq!(CharSet::Binary.ramp(), " 01");
    assert_eq!(CharSet::Blocks.ramp(), " ░▒▓█");
}

#[test]
fn test_ramp_lengths() {
    assert_eq!(CharSet::Halftone.len(), 11);
    assert_eq!(CharSet::Detail.len(), 93);
    assert_eq!(CharSet::Ascii.len(), 67);
    assert_eq!(CharSet::Binary.len(), 3);
    assert_eq!(CharSet::Blocks.len(), 5);
}

#[test]
fn test_every_ramp_starts_with_space() {
    for charset in CharSet::ALL {
        assert_eq!(charset.glyphs()[0], ' ', "{} ramp", charset);
    }
}

#[test]
fn test_select_glyph_endpoints() {
    for charset in CharSet::ALL {
        let glyphs = charset.glyphs();
        assert_eq!(select_glyph(0.0, &glyphs), ' ');
        assert_eq!(select_glyph(255.0, &glyphs), *glyphs.last().unwrap());
    }
}

#[test]
#[should_panic(expected = "must not be empty")]
fn test_select_glyph_empty_ramp_panics() {
    select_glyph(10.0, &[]);
}

#[test]
fn test_render_rejects_wrong_buffer_size() {
    let result = std::panic::catch_unwind(|| {
        render(&[0u8; 12], 2, 2, &Settings::default());
    });
    assert!(result.is_err());
}

// === Conversion Tests ===

#[test]
fn test_black_image_is_all_empty() {
    let bitmap = SourceBitmap::filled(100, 100, BLACK);
    let mosaic = convert(&bitmap, &Settings::default());
    assert_eq!(mosaic.grid.painted_count(), 0);
    assert!(mosaic.grid.cells().iter().all(|c| *c == Cell::Empty));
}

#[test]
fn test_black_image_with_full_brightness() {
    let bitmap = SourceBitmap::filled(100, 100, BLACK);
    let settings = settings_with(|b| b.brightness(100));
    let mosaic = convert(&bitmap, &settings);

    // gray = 100, factor(1.1) = 259 * 267.8 / (255 * 246.2)
    let factor: f64 = 259.0 * (12.8 + 255.0) / (255.0 * (259.0 - 12.8));
    let gray = factor * (100.0 - 128.0) + 128.0;
    let expected_index = ((gray / 255.0) * 92.0).floor() as usize;
    assert_eq!(expected_index, 35);

    let expected = Cell::Glyph(CharSet::Detail.glyphs()[expected_index]);
    assert_eq!(expected, Cell::Glyph('f'));
    assert!(mosaic.grid.cells().iter().all(|c| *c == expected));
}

#[test]
fn test_white_image_inverted_is_all_empty() {
    let bitmap = SourceBitmap::filled(100, 100, WHITE);
    let settings = settings_with(|b| b.invert(true));
    let mosaic = convert(&bitmap, &settings);
    assert_eq!(mosaic.grid.painted_count(), 0);
}

#[test]
fn test_invert_flips_to_opposite_end_of_ramp() {
    let bitmap = SourceBitmap::filled(64, 64, WHITE);
    for charset in CharSet::ALL {
        let plain = convert(&bitmap, &settings_with(|b| b.charset(charset)));
        let inverted = convert(&bitmap, &settings_with(|b| b.charset(charset).invert(true)));

        let densest = *charset.glyphs().last().unwrap();
        assert!(plain.grid.cells().iter().all(|c| *c == Cell::Glyph(densest)));
        assert!(inverted.grid.cells().iter().all(|c| *c == Cell::Empty));
    }
}

#[test]
fn test_conversion_is_deterministic() {
    let bitmap = gradient(317, 211);
    let settings = settings_with(|b| {
        b.resolution(0.8)
            .contrast(1.7)
            .brightness(-15)
            .charset(CharSet::Ascii)
    });

    let first = convert(&bitmap, &settings);
    for _ in 0..5 {
        assert_eq!(convert(&bitmap, &settings), first);
    }
}

#[test]
fn test_gradient_density_increases_left_to_right() {
    let bitmap = gradient(400, 100);
    let settings = settings_with(|b| b.charset(CharSet::Halftone).contrast(1.0));
    let mosaic = convert(&bitmap, &settings);
    let glyphs = CharSet::Halftone.glyphs();

    let row = mosaic.grid.row(0).unwrap();
    let indices: Vec<usize> = row
        .iter()
        .map(|c| glyphs.iter().position(|g| *g == c.as_char()).unwrap())
        .collect();
    assert!(indices.windows(2).all(|w| w[0] <= w[1]), "{:?}", indices);
    assert_eq!(indices[0], 0);
    assert!(*indices.last().unwrap() >= glyphs.len() - 2);
}

#[test]
fn test_text_has_one_line_per_row() {
    let bitmap = gradient(240, 180);
    let mosaic = convert(&bitmap, &Settings::default());
    let text = mosaic.grid.to_text();
    let lines: Vec<&str> = text.split('\n').collect();
    assert_eq!(lines.len(), mosaic.geometry.rows as usize);
    assert!(lines
        .iter()
        .all(|l| l.chars().count() == mosaic.geometry.cols as usize));
}

// === Settings Tests ===

#[test]
fn test_settings_reject_out_of_range_values() {
    assert!(Settings::builder().resolution(0.05).build().is_err());
    assert!(Settings::builder().resolution(1.01).build().is_err());
    assert!(Settings::builder().contrast(0.4).build().is_err());
    assert!(Settings::builder().contrast(3.1).build().is_err());
    assert!(Settings::builder().brightness(-101).build().is_err());
    assert!(Settings::builder().brightness(101).build().is_err());
    assert!(Settings::builder().resolution(f64::NAN).build().is_err());
}

#[test]
fn test_settings_accept_range_endpoints() {
    assert!(Settings::new(0.1, 0.5, -100, false, CharSet::Binary).is_ok());
    assert!(Settings::new(1.0, 3.0, 100, true, CharSet::Blocks).is_ok());
}
