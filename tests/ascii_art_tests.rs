use image::{DynamicImage, GrayImage, Luma, RgbImage};

use picturebot::ascii_art::{max_rows, render, target_height, Ramp, DEFAULT_RAMP};
use picturebot::config::AsciiSettings;
use picturebot::errors::BotError;

/// Deterministic gradient-with-noise test picture
fn textured(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        let v = ((x * 7 + y * 13) ^ (x * y)) % 256;
        image::Rgb([v as u8, (255 - v) as u8, ((x + y) % 256) as u8])
    }))
}

#[test]
fn test_default_ramp_has_ten_levels() {
    assert_eq!(Ramp::default().levels(), 10);
    assert_eq!(Ramp::default().as_string(), DEFAULT_RAMP);
}

#[test]
fn test_rendering_is_deterministic() {
    let image = textured(123, 77);
    let settings = AsciiSettings::default();
    let ramp = Ramp::default();

    let first = render(&image, &ramp, &settings).unwrap();
    let second = render(&image, &ramp, &settings).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_every_row_has_exact_width() {
    let settings = AsciiSettings::default();
    for (w, h) in [(123, 77), (40, 40), (1, 500), (640, 480)] {
        let art = render(&textured(w, h), &Ramp::default(), &settings).unwrap();
        assert!(art.ends_with('\n'));
        for row in art.lines() {
            assert_eq!(row.chars().count(), 40, "image {w}x{h}");
        }
    }
}

#[test]
fn test_row_count_follows_aspect_ratio() {
    let settings = AsciiSettings::default();
    // floor(480 / 640 * 40 * 0.55) = 16
    assert_eq!(target_height(640, 480, &settings), 16);
    let art = render(&textured(640, 480), &Ramp::default(), &settings).unwrap();
    assert_eq!(art.lines().count(), 16);
}

#[test]
fn test_tall_images_are_truncated_to_message_ceiling() {
    let settings = AsciiSettings::default();
    let limit = max_rows(&settings);

    for height in [500, 2_000, 20_000] {
        let art = render(&textured(10, height), &Ramp::default(), &settings).unwrap();
        assert!(art.lines().count() <= limit);
        assert!(art.chars().count() <= settings.message_limit);
    }

    let art = render(&textured(10, 20_000), &Ramp::default(), &settings).unwrap();
    assert_eq!(art.lines().count(), limit);
}

#[test]
fn test_custom_width_and_limit() {
    let settings = AsciiSettings {
        width: 10,
        message_limit: 100,
        ..AsciiSettings::default()
    };
    // (100 - 11) / 11 = 8
    assert_eq!(max_rows(&settings), 8);

    let art = render(&textured(10, 1000), &Ramp::default(), &settings).unwrap();
    assert_eq!(art.lines().count(), 8);
    assert!(art.lines().all(|row| row.chars().count() == 10));
}

#[test]
fn test_width_that_leaves_no_rows_is_degenerate() {
    let settings = AsciiSettings {
        width: 60,
        message_limit: 100,
        ..AsciiSettings::default()
    };
    assert!(matches!(
        render(&textured(50, 50), &Ramp::default(), &settings),
        Err(BotError::DegenerateGeometry(_))
    ));
}

#[test]
fn test_luminance_extremes_map_to_ramp_ends() {
    let settings = AsciiSettings::default();
    let ramp = Ramp::new("XYZ").unwrap();

    let black = DynamicImage::ImageLuma8(GrayImage::from_pixel(40, 40, Luma([0])));
    let white = DynamicImage::ImageLuma8(GrayImage::from_pixel(40, 40, Luma([255])));

    let dark = render(&black, &ramp, &settings).unwrap();
    let light = render(&white, &ramp, &settings).unwrap();
    assert!(dark.lines().all(|row| row.chars().all(|c| c == 'X')));
    assert!(light.lines().all(|row| row.chars().all(|c| c == 'Z')));
}

#[test]
fn test_multibyte_ramp_characters() {
    let ramp = Ramp::from_user_text("█▓");
    assert_eq!(ramp.levels(), 3);

    let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(40, 40, Luma([0])));
    let art = render(&image, &ramp, &AsciiSettings::default()).unwrap();
    for row in art.lines() {
        assert_eq!(row, "█".repeat(40));
    }
}
