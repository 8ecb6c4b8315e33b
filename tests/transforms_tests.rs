use image::{DynamicImage, GenericImageView, Rgb, RgbImage, Rgba, RgbaImage};

use picturebot::transforms::{decode, invert, pixelate, reflect, Axis, PhotoEffect};

fn textured(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            ((x * 31 + y * 17) % 256) as u8,
            ((x * y + 11) % 256) as u8,
            ((x ^ y) * 5 % 256) as u8,
        ])
    }))
}

#[test]
fn test_pixelate_is_idempotent_for_matching_block_size() {
    let image = textured(60, 40);

    let once = pixelate(&image, 4);
    let twice = pixelate(&once, 4);

    assert_eq!(once.dimensions(), (60, 40));
    assert_eq!(once.to_rgb8().as_raw(), twice.to_rgb8().as_raw());
}

#[test]
fn test_pixelate_produces_uniform_blocks() {
    let pixelated = pixelate(&textured(60, 40), 5).to_rgb8();

    for by in 0..8 {
        for bx in 0..12 {
            let corner = pixelated.get_pixel(bx * 5, by * 5);
            for dy in 0..5 {
                for dx in 0..5 {
                    assert_eq!(pixelated.get_pixel(bx * 5 + dx, by * 5 + dy), corner);
                }
            }
        }
    }
}

#[test]
fn test_pixelate_rounds_dimensions_down_to_blocks() {
    let pixelated = pixelate(&textured(65, 43), 20);
    assert_eq!(pixelated.dimensions(), (60, 40));
}

#[test]
fn test_reflection_twice_is_identity() {
    let image = textured(31, 17);
    for axis in [Axis::Horizontal, Axis::Vertical] {
        let back = reflect(&reflect(&image, axis), axis);
        assert_eq!(back.to_rgb8().as_raw(), image.to_rgb8().as_raw());
    }
}

#[test]
fn test_horizontal_and_vertical_axes() {
    let image = textured(31, 17);
    let original = image.to_rgb8();

    let mirrored = reflect(&image, Axis::Horizontal).to_rgb8();
    assert_eq!(mirrored.get_pixel(0, 3), original.get_pixel(30, 3));

    let flipped = reflect(&image, Axis::Vertical).to_rgb8();
    assert_eq!(flipped.get_pixel(4, 0), original.get_pixel(4, 16));
}

#[test]
fn test_inversion_is_an_involution() {
    let image = textured(33, 21);
    let back = invert(&invert(&image));
    assert_eq!(back.to_rgb8().as_raw(), image.to_rgb8().as_raw());

    let inverted = invert(&image).to_rgb8();
    let original = image.to_rgb8();
    let (p, q) = (original.get_pixel(7, 9), inverted.get_pixel(7, 9));
    for channel in 0..3 {
        assert_eq!(p.0[channel] as u16 + q.0[channel] as u16, 255);
    }
}

#[test]
fn test_inversion_keeps_alpha() {
    let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 77])));
    let inverted = invert(&image).to_rgba8();
    assert_eq!(inverted.get_pixel(1, 1), &Rgba([245, 235, 225, 77]));
}

#[test]
fn test_photo_effect_dispatch() {
    let image = textured(40, 40);
    assert_eq!(
        PhotoEffect::Reflect(Axis::Vertical).apply(&image).to_rgb8().as_raw(),
        reflect(&image, Axis::Vertical).to_rgb8().as_raw()
    );
    assert_eq!(PhotoEffect::Pixelate(8).apply(&image).dimensions(), (40, 40));
}

#[test]
fn test_decode_rejects_truncated_png() {
    let mut bytes = Vec::new();
    textured(8, 8)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
        .unwrap();
    assert!(decode(&bytes).is_ok());
    assert!(decode(&bytes[..bytes.len() / 2]).is_err());
}
