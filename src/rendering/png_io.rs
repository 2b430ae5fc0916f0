//! PNG decoding to packed colors and encoding back to RGBA8

use std::io::Cursor;
use std::path::Path;

use block_match::Argb;

use crate::error::ImageError;

/// A decoded image in row-major order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Argb>,
}

/// Decode PNG bytes.
///
/// Palette, 16-bit and low bit depth images are expanded to 8 bits per
/// channel. Images without alpha decode as opaque.
pub fn decode_png(bytes: &[u8]) -> Result<DecodedImage, ImageError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| ImageError::PngDecode(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| ImageError::PngDecode(e.to_string()))?;
    let data = &buf[..info.buffer_size()];

    if info.bit_depth != png::BitDepth::Eight {
        return Err(ImageError::UnsupportedFormat(format!(
            "{:?} bit depth",
            info.bit_depth
        )));
    }

    let pixels: Vec<Argb> = match info.color_type {
        png::ColorType::Rgba => data
            .chunks_exact(4)
            .map(|p| Argb::from_rgba([p[0], p[1], p[2], p[3]]))
            .collect(),
        png::ColorType::Rgb => data
            .chunks_exact(3)
            .map(|p| Argb::from_rgb(p[0], p[1], p[2]))
            .collect(),
        png::ColorType::GrayscaleAlpha => data
            .chunks_exact(2)
            .map(|p| Argb::new(p[1], p[0], p[0], p[0]))
            .collect(),
        png::ColorType::Grayscale => data.iter().map(|&v| Argb::from_rgb(v, v, v)).collect(),
        other => {
            return Err(ImageError::UnsupportedFormat(format!("{other:?}")));
        }
    };

    let expected = info.width as usize * info.height as usize;
    if pixels.len() != expected {
        return Err(ImageError::SizeMismatch {
            expected,
            actual: pixels.len(),
        });
    }

    tracing::trace!(width = info.width, height = info.height, color_type = ?info.color_type, "Decoded PNG");
    Ok(DecodedImage {
        width: info.width,
        height: info.height,
        pixels,
    })
}

/// Read and decode a PNG file
pub fn load_png(path: &Path) -> Result<DecodedImage, ImageError> {
    let bytes = std::fs::read(path)?;
    decode_png(&bytes)
}

/// Encode packed colors as an RGBA8 PNG
pub fn encode_png(width: u32, height: u32, pixels: &[Argb]) -> Result<Vec<u8>, ImageError> {
    let expected = width as usize * height as usize;
    if pixels.len() != expected {
        return Err(ImageError::SizeMismatch {
            expected,
            actual: pixels.len(),
        });
    }

    let data: Vec<u8> = pixels.iter().flat_map(|c| c.to_rgba()).collect();

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| ImageError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(&data)
            .map_err(|e| ImageError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}
