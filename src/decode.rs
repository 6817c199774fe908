use enough::Stop;
#[cfg(feature = "rgb")]
use rgb::AsPixels as _;

use crate::error::BitmapError;
use crate::limits::Limits;
use crate::pixel::PixelLayout;
use crate::tga::TgaInfo;

/// One-shot decode of an in-memory TGA file.
///
/// ```no_run
/// use zentga::{DecodeRequest, Limits, Unstoppable};
///
/// let data: &[u8] = &[]; // your TGA bytes
/// let limits = Limits { max_pixels: Some(1 << 24), ..Default::default() };
/// let decoded = DecodeRequest::new(data)
///     .with_limits(&limits)
///     .decode(Unstoppable)?;
/// println!("{}x{} {:?}", decoded.width, decoded.height, decoded.layout);
/// # Ok::<(), zentga::BitmapError>(())
/// ```
#[derive(Clone, Debug)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    limits: Option<&'a Limits>,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, limits: None }
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Decode the image, rows top to bottom in display order.
    pub fn decode(self, stop: impl Stop) -> Result<DecodeOutput, BitmapError> {
        crate::tga::decode(self.data, self.limits, &stop)
    }
}

/// Decoded image output.
#[derive(Clone, Debug)]
pub struct DecodeOutput {
    pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub layout: PixelLayout,
    info: TgaInfo,
}

impl DecodeOutput {
    pub(crate) fn new(pixels: Vec<u8>, info: TgaInfo) -> Self {
        Self {
            pixels,
            width: info.width,
            height: info.height,
            layout: info.layout,
            info,
        }
    }

    /// Access the pixel data.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Take ownership of the pixel data.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Descriptor the image was decoded with.
    pub fn info(&self) -> &TgaInfo {
        &self.info
    }

    /// The file comment, if any.
    pub fn comment(&self) -> Option<&str> {
        self.info.image_description()
    }

    /// Reinterpret pixel data as a typed pixel slice.
    ///
    /// Returns [`BitmapError::LayoutMismatch`] if the pixel layout doesn't match `P`.
    #[cfg(feature = "rgb")]
    pub fn as_pixels<P: crate::DecodePixel>(&self) -> Result<&[P], BitmapError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        if self.layout != P::layout() {
            return Err(BitmapError::LayoutMismatch {
                expected: P::layout(),
                actual: self.layout,
            });
        }
        Ok(self.pixels().as_pixels())
    }

    /// Copy pixel data into a typed pixel vector.
    ///
    /// Returns [`BitmapError::LayoutMismatch`] if the pixel layout doesn't match `P`.
    #[cfg(feature = "rgb")]
    pub fn to_pixels<P: crate::DecodePixel>(&self) -> Result<Vec<P>, BitmapError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        Ok(self.as_pixels::<P>()?.to_vec())
    }

    /// Zero-copy view as an [`imgref::ImgRef`] of typed pixels.
    ///
    /// Returns [`BitmapError::LayoutMismatch`] if the pixel layout doesn't match `P`.
    #[cfg(feature = "imgref")]
    pub fn as_imgref<P: crate::DecodePixel>(&self) -> Result<imgref::ImgRef<'_, P>, BitmapError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        let pixels: &[P] = self.as_pixels()?;
        Ok(imgref::ImgRef::new(
            pixels,
            self.width as usize,
            self.height as usize,
        ))
    }

    /// Convert to an [`imgref::ImgVec`] of typed pixels.
    ///
    /// Returns [`BitmapError::LayoutMismatch`] if the pixel layout doesn't match `P`.
    #[cfg(feature = "imgref")]
    pub fn to_imgvec<P: crate::DecodePixel>(&self) -> Result<imgref::ImgVec<P>, BitmapError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        Ok(imgref::ImgVec::new(
            self.to_pixels::<P>()?,
            self.width as usize,
            self.height as usize,
        ))
    }
}
