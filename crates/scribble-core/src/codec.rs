//! PNG and data-URL encoding of pixel buffers.

use crate::surface::{PixelBuffer, SurfaceError};
use base64::{Engine, engine::general_purpose::STANDARD};
use thiserror::Error;
use tiny_skia::{ColorU8, PremultipliedColorU8};

/// MIME type of encoded images.
pub const PNG_MIME: &str = "image/png";

const DATA_URL_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64";

/// Codec errors.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("PNG decoding failed: {0}")]
    Decode(#[from] png::DecodingError),
    #[error("Unsupported PNG format: {0:?} at {1:?}")]
    UnsupportedFormat(png::ColorType, png::BitDepth),
    #[error("Malformed data URL: {0}")]
    DataUrl(String),
    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Encode a buffer as an 8-bit RGBA PNG.
///
/// The buffer holds premultiplied pixels; PNG stores straight alpha, so each
/// pixel is demultiplied on the way out.
pub fn encode_png(buffer: &PixelBuffer) -> CodecResult<Vec<u8>> {
    let mut straight = Vec::with_capacity(buffer.byte_len());
    for px in buffer.data().chunks_exact(4) {
        let color = match PremultipliedColorU8::from_rgba(px[0], px[1], px[2], px[3]) {
            Some(premultiplied) => premultiplied.demultiply(),
            // Channels above alpha cannot come out of the rasterizer.
            None => ColorU8::from_rgba(px[0], px[1], px[2], px[3]),
        };
        straight.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }

    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, buffer.width(), buffer.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&straight)?;
        writer.finish()?;
    }
    Ok(png_data)
}

/// Decode a PNG into a premultiplied buffer.
///
/// Palette, low bit depth and 16-bit images are normalized to 8 bits per
/// channel; gray and RGB images become opaque RGBA.
pub fn decode_png(bytes: &[u8]) -> CodecResult<PixelBuffer> {
    let mut decoder = png::Decoder::new(bytes);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    let raw = &buf[..info.buffer_size()];

    if info.bit_depth != png::BitDepth::Eight {
        return Err(CodecError::UnsupportedFormat(info.color_type, info.bit_depth));
    }

    let pixel_count = info.width as usize * info.height as usize;
    let mut data = Vec::with_capacity(pixel_count * 4);
    let mut push = |r: u8, g: u8, b: u8, a: u8| {
        let px = ColorU8::from_rgba(r, g, b, a).premultiply();
        data.extend_from_slice(&[px.red(), px.green(), px.blue(), px.alpha()]);
    };

    match info.color_type {
        png::ColorType::Rgba => raw.chunks_exact(4).for_each(|p| push(p[0], p[1], p[2], p[3])),
        png::ColorType::Rgb => raw.chunks_exact(3).for_each(|p| push(p[0], p[1], p[2], 255)),
        png::ColorType::GrayscaleAlpha => {
            raw.chunks_exact(2).for_each(|p| push(p[0], p[0], p[0], p[1]))
        }
        png::ColorType::Grayscale => raw.iter().for_each(|&v| push(v, v, v, 255)),
        other => return Err(CodecError::UnsupportedFormat(other, info.bit_depth)),
    }

    Ok(PixelBuffer::new(info.width, info.height, data)?)
}

/// Wrap PNG bytes as a `data:image/png;base64,...` URL.
pub fn to_data_url(png_data: &[u8]) -> String {
    format!("{DATA_URL_PREFIX}{PNG_MIME}{BASE64_MARKER},{}", STANDARD.encode(png_data))
}

/// Extract the bytes of a base64 data URL.
pub fn from_data_url(url: &str) -> CodecResult<Vec<u8>> {
    let rest = url
        .trim()
        .strip_prefix(DATA_URL_PREFIX)
        .ok_or_else(|| CodecError::DataUrl("missing data: scheme".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| CodecError::DataUrl("missing payload separator".to_string()))?;
    if !header.ends_with(BASE64_MARKER) {
        return Err(CodecError::DataUrl(format!("not base64 encoded: {header}")));
    }
    Ok(STANDARD.decode(payload)?)
}

/// Encode a buffer straight to a PNG data URL.
pub fn encode_data_url(buffer: &PixelBuffer) -> CodecResult<String> {
    Ok(to_data_url(&encode_png(buffer)?))
}

/// Decode a PNG data URL to a buffer.
pub fn decode_data_url(url: &str) -> CodecResult<PixelBuffer> {
    decode_png(&from_data_url(url)?)
}
