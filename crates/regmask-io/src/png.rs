use std::{fs, fs::File, io::Read, path::Path};

use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use regmask_image::{ImageSize, Mask};

use crate::error::IoError;

/// Read a mask from a PNG file.
///
/// Grayscale, grayscale with alpha, RGB and RGBA images at 8 or 16 bits are
/// accepted; palettes and sub-byte depths are expanded. A pixel is
/// foreground when its first sample is non-zero.
///
/// # Arguments
///
/// * `file_path` - The path to the PNG file.
pub fn read_mask_png(file_path: impl AsRef<Path>) -> Result<Mask, IoError> {
    // verify the file exists
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    // verify the file extension
    match file_path.extension() {
        Some(extension) if extension.eq_ignore_ascii_case("png") => {}
        _ => return Err(IoError::InvalidFileExtension(file_path.to_path_buf())),
    }

    let file = fs::File::open(file_path)?;
    decode_png_impl(file)
}

/// Decode a mask from the raw bytes of a PNG file.
///
/// # Arguments
///
/// - `bytes` - Raw bytes of the png file
pub fn decode_mask_png(bytes: &[u8]) -> Result<Mask, IoError> {
    decode_png_impl(bytes)
}

pub(crate) fn decode_png_impl<R: Read>(source: R) -> Result<Mask, IoError> {
    let mut decoder = Decoder::new(source);
    decoder.set_transformations(Transformations::EXPAND);

    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;

    let width = info.width as usize;
    let height = info.height as usize;
    let bytes_per_sample = match info.bit_depth {
        BitDepth::Sixteen => 2,
        _ => 1,
    };
    let pixel_stride = info.color_type.samples() * bytes_per_sample;

    let mut data = Vec::with_capacity(width * height);
    for row in buf.chunks(info.line_size).take(height) {
        for x in 0..width {
            let first_sample = &row[x * pixel_stride..x * pixel_stride + bytes_per_sample];
            data.push(u8::from(first_sample.iter().any(|&b| b != 0)));
        }
    }

    Ok(Mask::new(ImageSize { width, height }, data)?)
}

/// Writes the given mask as an 8-bit grayscale PNG.
///
/// Foreground pixels are written as 255, background as 0.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `mask` - The mask to write.
pub fn write_mask_png(file_path: impl AsRef<Path>, mask: &Mask) -> Result<(), IoError> {
    let file = File::create(file_path)?;

    let mut encoder = Encoder::new(file, mask.width() as u32, mask.height() as u32);
    encoder.set_color(ColorType::Grayscale);
    encoder.set_depth(BitDepth::Eight);

    let image_data = mask
        .as_slice()
        .iter()
        .map(|&v| if v != 0 { 255 } else { 0 })
        .collect::<Vec<u8>>();

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    writer
        .write_image_data(&image_data)
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    Ok(())
}
