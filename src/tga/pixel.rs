//! Per-pixel conversion from TGA source encodings to R,G,B[,A] or gray bytes.

use super::header::{ImageType, TgaHeader};
use super::palette::Palette;

/// What a pixel holds before the source bytes are written over it.
/// Channels a source does not supply keep these values, so a missing
/// alpha channel reads as opaque.
pub(crate) const DEFAULT_PIXEL: [u8; 4] = [0, 0, 0, 0xFF];

/// Packed direct-color encodings, keyed by their byte width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ColorEncoding {
    /// Two bytes, 5-5-5 packed.
    Packed555,
    /// Three bytes, stored B, G, R.
    Bgr,
    /// Four bytes, stored B, G, R, A.
    Bgra,
}

impl ColorEncoding {
    pub(crate) fn from_byte_width(bytes: usize) -> Option<Self> {
        match bytes {
            2 => Some(Self::Packed555),
            3 => Some(Self::Bgr),
            4 => Some(Self::Bgra),
            _ => None,
        }
    }

    /// Unpack `src` into `out` in R, G, B[, A] order.
    ///
    /// 5-bit channels are not scaled up: their low three bits stay zero.
    pub(crate) fn unpack(self, src: &[u8], out: &mut [u8; 4]) {
        match self {
            Self::Packed555 => {
                let (b0, b1) = (src[0], src[1]);
                out[0] = (b0 & 0xF8) >> 3;
                out[1] = ((b1 & 0xC0) >> 5) | ((b0 & 0x07) << 3);
                out[2] = b1 & 0x3E;
            }
            Self::Bgr => {
                out[0] = src[2];
                out[1] = src[1];
                out[2] = src[0];
            }
            Self::Bgra => {
                out[0] = src[2];
                out[1] = src[1];
                out[2] = src[0];
                out[3] = src[3];
            }
        }
    }
}

/// Decoding rule for one image, chosen once from the image type and the
/// source byte widths.
pub(crate) enum PixelDecoder<'p> {
    /// Bytes are copied as stored (little-endian for multi-byte gray).
    Gray { bytes: usize },
    Direct(ColorEncoding),
    /// Pixel value is a little-endian index into the palette, whose entries
    /// use `encoding`.
    Paletted {
        index_bytes: usize,
        palette: &'p Palette,
        encoding: ColorEncoding,
    },
    /// No rule applies; every pixel keeps [`DEFAULT_PIXEL`].
    Blank,
}

impl<'p> PixelDecoder<'p> {
    pub(crate) fn new(
        header: &TgaHeader,
        image_type: ImageType,
        palette: Option<&'p Palette>,
    ) -> Self {
        let bytes = header.pixel_bytes();
        if image_type.is_grayscale() {
            return Self::Gray { bytes };
        }
        if image_type.is_paletted() {
            return match palette {
                Some(palette) => match ColorEncoding::from_byte_width(palette.entry_bytes()) {
                    Some(encoding) => Self::Paletted {
                        index_bytes: bytes,
                        palette,
                        encoding,
                    },
                    None => Self::Blank,
                },
                None => Self::Blank,
            };
        }
        match ColorEncoding::from_byte_width(bytes) {
            Some(encoding) => Self::Direct(encoding),
            None => Self::Blank,
        }
    }

    /// Decode one source pixel (`src` holds the pixel's source bytes).
    ///
    /// Returns `false` if a palette index pointed past the palette.
    pub(crate) fn decode(&self, src: &[u8], out: &mut [u8; 4]) -> bool {
        *out = DEFAULT_PIXEL;
        match self {
            Self::Gray { bytes } => {
                let n = (*bytes).min(out.len());
                out[..n].copy_from_slice(&src[..n]);
            }
            Self::Direct(encoding) => encoding.unpack(src, out),
            Self::Paletted {
                index_bytes,
                palette,
                encoding,
            } => {
                let mut index = [0u8; 4];
                index[..*index_bytes].copy_from_slice(&src[..*index_bytes]);
                match palette.entry(u32::from_le_bytes(index)) {
                    Some(entry) => encoding.unpack(entry, out),
                    None => return false,
                }
            }
            Self::Blank => {}
        }
        true
    }
}
