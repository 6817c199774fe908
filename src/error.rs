use enough::StopReason;

/// Errors from TGA decoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BitmapError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("invalid TGA file: {0}")]
    InvalidFormat(String),

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("pixel layout mismatch: expected {expected:?}, got {actual:?}")]
    LayoutMismatch {
        expected: crate::PixelLayout,
        actual: crate::PixelLayout,
    },

    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("scanline {row} out of range (image height {height})")]
    RowOutOfRange { row: u32, height: u32 },

    #[error("no image is open")]
    NotOpen,

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for BitmapError {
    fn from(r: StopReason) -> Self {
        BitmapError::Cancelled(r)
    }
}

impl BitmapError {
    /// Map an I/O error raised while reading a fixed-size field.
    ///
    /// A short read there means the file ended early, which is reported as
    /// [`BitmapError::UnexpectedEof`] rather than a generic I/O failure.
    pub(crate) fn from_header_io(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            BitmapError::UnexpectedEof
        } else {
            BitmapError::Io(err)
        }
    }
}
