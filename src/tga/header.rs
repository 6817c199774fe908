//! TGA file header: the fixed 18-byte block, its validation, and the image
//! descriptor derived from it.

use std::io::Read;

use log::{debug, warn};

use super::source::ByteSource;
use crate::error::BitmapError;
use crate::pixel::PixelLayout;

/// Attribute-byte bits.
const ATTR_ALPHA_BITS: u8 = 0x0F;
const ATTR_FLIP_X: u8 = 0x10;
const ATTR_FLIP_Y: u8 = 0x20;

/// Comments are at most 255 bytes long.
const MAX_COMMENT_LEN: usize = u8::MAX as usize;

/// Name of the descriptor attribute that carries the file comment.
pub const IMAGE_DESCRIPTION: &str = "ImageDescription";

/// Image type byte of the TGA header.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageType {
    /// Type 0. Rejected when opening.
    NoData,
    /// Type 1: color-mapped pixels.
    Paletted,
    /// Type 2: direct BGR(A) pixels.
    TrueColor,
    /// Type 3: grayscale pixels.
    Grayscale,
    /// Type 9: run-length encoded color-mapped pixels.
    PalettedRle,
    /// Type 10: run-length encoded direct pixels.
    TrueColorRle,
    /// Type 11: run-length encoded grayscale pixels.
    GrayscaleRle,
}

impl ImageType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::NoData),
            1 => Some(Self::Paletted),
            2 => Some(Self::TrueColor),
            3 => Some(Self::Grayscale),
            9 => Some(Self::PalettedRle),
            10 => Some(Self::TrueColorRle),
            11 => Some(Self::GrayscaleRle),
            _ => None,
        }
    }

    pub fn is_paletted(self) -> bool {
        matches!(self, Self::Paletted | Self::PalettedRle)
    }

    pub fn is_grayscale(self) -> bool {
        matches!(self, Self::Grayscale | Self::GrayscaleRle)
    }

    pub fn is_rle(self) -> bool {
        matches!(self, Self::PalettedRle | Self::TrueColorRle | Self::GrayscaleRle)
    }
}

/// Component type of every output channel.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelType {
    U8,
}

/// Transfer characteristics of the decoded samples.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Linearity {
    /// TGA carries no color-space information.
    Unknown,
    Linear,
    Srgb,
}

/// The raw TGA header, fields in file order, already in native byte order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TgaHeader {
    pub id_length: u8,
    pub cmap_type: u8,
    pub image_type: u8,
    pub cmap_first: u16,
    pub cmap_length: u16,
    pub cmap_entry_bits: u8,
    pub x_origin: u16,
    pub y_origin: u16,
    pub width: u16,
    pub height: u16,
    pub bits_per_pixel: u8,
    pub attributes: u8,
}

impl TgaHeader {
    /// Size of the header on disk.
    pub const SIZE: usize = 18;

    /// Read the header one field at a time. Multi-byte fields are
    /// little-endian on disk and are converted to native order here.
    pub(crate) fn read<R: Read>(src: &mut ByteSource<R>) -> Result<Self, BitmapError> {
        Ok(Self {
            id_length: src.read_u8()?,
            cmap_type: src.read_u8()?,
            image_type: src.read_u8()?,
            cmap_first: src.read_u16_le()?,
            cmap_length: src.read_u16_le()?,
            cmap_entry_bits: src.read_u8()?,
            x_origin: src.read_u16_le()?,
            y_origin: src.read_u16_le()?,
            width: src.read_u16_le()?,
            height: src.read_u16_le()?,
            bits_per_pixel: src.read_u8()?,
            attributes: src.read_u8()?,
        })
    }

    /// Validate the header, returning its image type.
    pub fn validate(&self) -> Result<ImageType, BitmapError> {
        if !matches!(self.bits_per_pixel, 8 | 16 | 24 | 32) {
            return Err(BitmapError::InvalidFormat(format!(
                "illegal pixel size: {} bits per pixel",
                self.bits_per_pixel
            )));
        }

        let image_type = match ImageType::from_u8(self.image_type) {
            Some(ImageType::NoData) => {
                return Err(BitmapError::InvalidFormat("image with no data".into()));
            }
            Some(t) => t,
            None => {
                return Err(BitmapError::InvalidFormat(format!(
                    "illegal image type: {}",
                    self.image_type
                )));
            }
        };

        if self.has_palette() {
            if image_type.is_grayscale() {
                return Err(BitmapError::InvalidFormat(
                    "palette defined for grayscale image".into(),
                ));
            }
            if !matches!(self.cmap_entry_bits, 15 | 16 | 24 | 32) {
                return Err(BitmapError::InvalidFormat(format!(
                    "illegal palette entry size: {} bits",
                    self.cmap_entry_bits
                )));
            }
            // Some very old true-color files declare a palette they don't use.
            if !image_type.is_paletted() {
                warn!("palette defined for true-color image, ignoring it");
            }
        } else if image_type.is_paletted() {
            warn!("color-mapped image without a palette, pixels will decode as black");
        }

        Ok(image_type)
    }

    pub fn has_palette(&self) -> bool {
        self.cmap_type != 0
    }

    /// Source bytes per pixel; 15-bit data occupies two bytes.
    pub fn pixel_bytes(&self) -> usize {
        byte_width(self.bits_per_pixel)
    }

    /// Bytes per palette entry; 15-bit entries occupy two bytes.
    pub fn palette_entry_bytes(&self) -> usize {
        byte_width(self.cmap_entry_bits)
    }

    pub fn alpha_bits(&self) -> u8 {
        self.attributes & ATTR_ALPHA_BITS
    }

    /// Rows are stored right to left.
    pub fn flip_x(&self) -> bool {
        self.attributes & ATTR_FLIP_X != 0
    }

    /// Rows are stored top to bottom.
    pub fn flip_y(&self) -> bool {
        self.attributes & ATTR_FLIP_Y != 0
    }

    fn has_alpha(&self) -> bool {
        self.bits_per_pixel == 32 || self.alpha_bits() > 0
    }
}

fn byte_width(bits: u8) -> usize {
    if bits == 15 { 2 } else { usize::from(bits) / 8 }
}

/// Externally visible description of an opened TGA image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TgaInfo {
    pub width: u32,
    pub height: u32,
    pub image_type: ImageType,
    pub layout: PixelLayout,
    pub channel_type: ChannelType,
    pub linearity: Linearity,
    pub x_origin: u16,
    pub y_origin: u16,
    /// Attribute byte of the header: alpha depth and orientation bits.
    pub attributes: u8,
    /// Free-text comment from the file, if it carries one.
    pub comment: Option<String>,
}

impl TgaInfo {
    pub(crate) fn from_header(header: &TgaHeader, image_type: ImageType) -> Self {
        Self {
            width: u32::from(header.width),
            height: u32::from(header.height),
            image_type,
            layout: PixelLayout::new(image_type.is_grayscale(), header.has_alpha()),
            channel_type: ChannelType::U8,
            linearity: Linearity::Unknown,
            x_origin: header.x_origin,
            y_origin: header.y_origin,
            attributes: header.attributes,
            comment: None,
        }
    }

    pub fn channels(&self) -> usize {
        self.layout.channels()
    }

    pub fn alpha_bits(&self) -> u8 {
        self.attributes & ATTR_ALPHA_BITS
    }

    /// Rows are stored right to left.
    pub fn flip_x(&self) -> bool {
        self.attributes & ATTR_FLIP_X != 0
    }

    /// Rows are stored top to bottom.
    pub fn flip_y(&self) -> bool {
        self.attributes & ATTR_FLIP_Y != 0
    }

    /// Bytes in one output scanline.
    pub fn scanline_bytes(&self) -> usize {
        self.width as usize * self.channels()
    }

    pub fn image_description(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Look up a free-form string attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match name {
            IMAGE_DESCRIPTION => self.image_description(),
            _ => None,
        }
    }
}

/// Read and validate the header and comment, leaving `src` at the start of
/// the palette (or pixel data if there is none).
pub(crate) fn read_header<R: Read>(
    src: &mut ByteSource<R>,
) -> Result<(TgaHeader, TgaInfo), BitmapError> {
    let header = TgaHeader::read(src)?;
    let image_type = header.validate()?;
    let mut info = TgaInfo::from_header(&header, image_type);

    debug!(
        "TGA {}x{} type {:?}, {} bpp, attr {:#04x}, {} channels",
        info.width,
        info.height,
        image_type,
        header.bits_per_pixel,
        header.attributes,
        info.channels()
    );

    if header.id_length > 0 {
        // One spare byte so the text is terminated even when the file's isn't.
        let mut id = [0u8; MAX_COMMENT_LEN + 1];
        src.read_exact(&mut id[..usize::from(header.id_length)])?;
        let end = id.iter().position(|&b| b == 0).unwrap_or(id.len());
        info.comment = Some(String::from_utf8_lossy(&id[..end]).into_owned());
    }

    Ok((header, info))
}
