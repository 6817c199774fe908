//! Truevision TGA (Targa) decoder.
//!
//! Handles color-mapped, true-color and grayscale images at 8, 16, 24 and 32
//! bits per pixel, stored raw or run-length encoded. Output is always 8 bits
//! per channel: gray, gray+alpha, RGB or RGBA.

mod decoder;
mod header;
mod palette;
mod pixel;
mod scanline;
mod source;

pub use decoder::TgaDecoder;
pub use header::{ChannelType, IMAGE_DESCRIPTION, ImageType, Linearity, TgaHeader, TgaInfo};

use enough::Stop;

use crate::decode::DecodeOutput;
use crate::error::BitmapError;
use crate::limits::Limits;

/// Format name.
pub const FORMAT_NAME: &str = "targa";

/// File extensions handled by this decoder.
pub const EXTENSIONS: &[&str] = &["tga"];

/// Parse and validate the header and comment without decoding pixels.
pub(crate) fn probe(data: &[u8]) -> Result<TgaInfo, BitmapError> {
    let mut source = source::ByteSource::new(data);
    let (_, info) = header::read_header(&mut source)?;
    Ok(info)
}

/// Decode a whole TGA image held in memory, rows top to bottom.
pub(crate) fn decode(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<DecodeOutput, BitmapError> {
    let mut dec = TgaDecoder::<&[u8]>::for_reader()
        .with_limits(limits.cloned().unwrap_or_default());
    let info = dec.open_reader(data)?.clone();
    stop.check()?;
    dec.decode(stop)?;

    let mut pixels = vec![0u8; info.scanline_bytes() * info.height as usize];
    dec.read_image(&mut pixels)?;
    dec.close();
    Ok(DecodeOutput::new(pixels, info))
}
