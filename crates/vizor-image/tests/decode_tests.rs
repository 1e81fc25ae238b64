use crates_image::ImageEncoder;
use vizor_image::{decode_frame, ChannelOrder, ImageError};

#[test]
fn test_decode_png_rgb() {
    let mut buffer = Vec::new();
    let img = crates_image::RgbImage::from_fn(3, 2, |x, y| crates_image::Rgb([x as u8 * 10, y as u8 * 20, 200]));
    crates_image::codecs::png::PngEncoder::new(&mut buffer)
        .write_image(img.as_raw(), 3, 2, crates_image::ExtendedColorType::Rgb8)
        .unwrap();

    let frame = decode_frame(&buffer).unwrap();

    assert_eq!(frame.width(), 3);
    assert_eq!(frame.height(), 2);
    assert_eq!(frame.order(), ChannelOrder::Rgb);
    assert_eq!(frame.pixel(2, 1), [20, 20, 200]);
}

#[test]
fn test_decode_png_rgba_drops_alpha() {
    let mut buffer = Vec::new();
    let img = crates_image::RgbaImage::from_fn(2, 2, |_, _| crates_image::Rgba([1, 2, 3, 128]));
    crates_image::codecs::png::PngEncoder::new(&mut buffer)
        .write_image(img.as_raw(), 2, 2, crates_image::ExtendedColorType::Rgba8)
        .unwrap();

    let frame = decode_frame(&buffer).unwrap();

    assert_eq!((frame.width(), frame.height()), (2, 2));
    assert_eq!(frame.data().len(), 2 * 2 * 3);
    assert_eq!(frame.pixel(0, 0), [1, 2, 3]);
}

#[test]
fn test_decode_jpeg_dimensions() {
    let mut buffer = Vec::new();
    let img = crates_image::RgbImage::from_pixel(16, 8, crates_image::Rgb([128, 128, 128]));
    crates_image::codecs::jpeg::JpegEncoder::new(&mut buffer)
        .encode_image(&img)
        .unwrap();

    let frame = decode_frame(&buffer).unwrap();

    assert_eq!((frame.width(), frame.height()), (16, 8));
    // JPEG is lossy but a flat gray survives closely
    for &v in frame.data() {
        assert!((v as i32 - 128).abs() <= 2);
    }
}

#[test]
fn test_decode_garbage_is_decode_error() {
    let result = decode_frame(&[0x00, 0x01, 0x02, 0x03]);
    assert!(matches!(result, Err(ImageError::Decode(_))));
}
