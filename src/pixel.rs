/// Output pixel memory layout. Every channel is one `u8`.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelLayout {
    /// Single channel grayscale.
    Gray8,
    /// Grayscale followed by alpha.
    GrayAlpha8,
    /// 3 channels, R, G, B.
    Rgb8,
    /// 4 channels, R, G, B, A.
    Rgba8,
}

impl PixelLayout {
    /// Layout for a color or grayscale image with or without alpha.
    pub(crate) fn new(grayscale: bool, alpha: bool) -> Self {
        match (grayscale, alpha) {
            (true, false) => Self::Gray8,
            (true, true) => Self::GrayAlpha8,
            (false, false) => Self::Rgb8,
            (false, true) => Self::Rgba8,
        }
    }

    /// Bytes per pixel for this layout.
    pub fn bytes_per_pixel(&self) -> usize {
        self.channels()
    }

    /// Number of channels.
    pub fn channels(&self) -> usize {
        match self {
            Self::Gray8 => 1,
            Self::GrayAlpha8 => 2,
            Self::Rgb8 => 3,
            Self::Rgba8 => 4,
        }
    }

    /// Whether the last channel is alpha.
    pub fn has_alpha(&self) -> bool {
        matches!(self, Self::GrayAlpha8 | Self::Rgba8)
    }
}

/// Typed pixels that a decoded TGA buffer can be viewed as.
///
/// The byte-to-pixel cast itself is done by [`rgb::AsPixels`]; this trait
/// only ties each pixel type to the [`PixelLayout`] it matches.
#[cfg(feature = "rgb")]
pub trait DecodePixel: Copy + 'static {
    fn layout() -> PixelLayout;
}

#[cfg(feature = "rgb")]
impl DecodePixel for rgb::Gray<u8> {
    fn layout() -> PixelLayout {
        PixelLayout::Gray8
    }
}

#[cfg(feature = "rgb")]
impl DecodePixel for rgb::GrayAlpha<u8> {
    fn layout() -> PixelLayout {
        PixelLayout::GrayAlpha8
    }
}

#[cfg(feature = "rgb")]
impl DecodePixel for rgb::RGB8 {
    fn layout() -> PixelLayout {
        PixelLayout::Rgb8
    }
}

#[cfg(feature = "rgb")]
impl DecodePixel for rgb::RGBA8 {
    fn layout() -> PixelLayout {
        PixelLayout::Rgba8
    }
}
