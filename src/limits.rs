use crate::BitmapError;

/// Resource limits applied when a TGA file is opened.
///
/// All fields default to `None` (no limit). Limits are checked against the
/// header geometry before any palette or pixel data is read, so an oversized
/// file is rejected without allocating its pixel buffer.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum size in bytes of the decoded pixel buffer.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// No limits at all.
    pub const fn none() -> Self {
        Self {
            max_width: None,
            max_height: None,
            max_pixels: None,
            max_memory_bytes: None,
        }
    }

    /// Check an image of `width` x `height` with `channels` bytes per output
    /// pixel, returning the pixel buffer size on success.
    pub(crate) fn check_image(
        &self,
        width: u32,
        height: u32,
        channels: usize,
    ) -> Result<usize, BitmapError> {
        exceeds("width", u64::from(width), self.max_width)?;
        exceeds("height", u64::from(height), self.max_height)?;
        exceeds(
            "pixel count",
            u64::from(width) * u64::from(height),
            self.max_pixels,
        )?;

        let bytes = (width as usize)
            .checked_mul(height as usize)
            .and_then(|wh| wh.checked_mul(channels))
            .ok_or(BitmapError::DimensionsTooLarge { width, height })?;
        exceeds("pixel buffer bytes", bytes as u64, self.max_memory_bytes)?;
        Ok(bytes)
    }
}

fn exceeds(what: &str, value: u64, limit: Option<u64>) -> Result<(), BitmapError> {
    match limit {
        Some(max) if value > max => Err(BitmapError::LimitExceeded(format!(
            "{what} {value} exceeds limit {max}"
        ))),
        _ => Ok(()),
    }
}
