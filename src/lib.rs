//! # zentga
//!
//! Truevision TGA (Targa) image decoder.
//!
//! ## Supported Images
//!
//! - Color-mapped (type 1), true-color (type 2) and grayscale (type 3)
//! - Their run-length encoded variants (types 9, 10, 11), including runs
//!   that cross scanline boundaries
//! - 8, 16 (5-5-5), 24 and 32 bits per pixel; 15, 16, 24 and 32-bit palettes
//! - Horizontal and vertical orientation flags
//! - The image ID field, exposed as the `ImageDescription` attribute
//!
//! Output is always 8 bits per channel: gray, gray+alpha, RGB or RGBA.
//!
//! ## Non-Goals
//!
//! - Encoding
//! - TGA 2.0 extension and developer areas, footer
//! - Color management
//!
//! ## Usage
//!
//! Scanline access through [`TgaDecoder`]:
//!
//! ```no_run
//! use zentga::TgaDecoder;
//!
//! let mut dec = TgaDecoder::new();
//! let info = dec.open("input.tga")?.clone();
//! println!("{}x{} {:?}", info.width, info.height, info.layout);
//! let mut row = vec![0u8; info.scanline_bytes()];
//! dec.read_scanline(0, &mut row)?;
//! # Ok::<(), zentga::BitmapError>(())
//! ```
//!
//! Whole-image decode of bytes in memory:
//!
//! ```no_run
//! use zentga::Unstoppable;
//!
//! let data: &[u8] = &[]; // your TGA bytes
//! let info = zentga::probe_tga(data)?;
//! let decoded = zentga::decode_tga(data, Unstoppable)?;
//! assert_eq!(decoded.pixels().len(), info.scanline_bytes() * info.height as usize);
//! # Ok::<(), zentga::BitmapError>(())
//! ```

#![forbid(unsafe_code)]

mod decode;
mod error;
mod limits;
mod pixel;

pub mod tga;

// Re-exports
pub use decode::{DecodeOutput, DecodeRequest};
pub use enough::{Stop, Unstoppable};
pub use error::BitmapError;
pub use limits::Limits;
#[cfg(feature = "rgb")]
pub use pixel::DecodePixel;
pub use pixel::PixelLayout;
pub use tga::{ImageType, TgaDecoder, TgaHeader, TgaInfo};

/// Decode TGA bytes to 8-bit gray, gray+alpha, RGB or RGBA, rows top to bottom.
pub fn decode_tga(data: &[u8], stop: impl Stop) -> Result<DecodeOutput, BitmapError> {
    DecodeRequest::new(data).decode(stop)
}

/// Like [`decode_tga`], rejecting images that exceed `limits`.
pub fn decode_tga_with_limits(
    data: &[u8],
    limits: &Limits,
    stop: impl Stop,
) -> Result<DecodeOutput, BitmapError> {
    DecodeRequest::new(data).with_limits(limits).decode(stop)
}

/// Read and validate the header of TGA bytes without decoding pixels.
pub fn probe_tga(data: &[u8]) -> Result<TgaInfo, BitmapError> {
    tga::probe(data)
}
