use std::io::Read;

use log::{trace, warn};

use super::header::TgaHeader;
use super::source::ByteSource;
use crate::error::BitmapError;

/// Color map: `cmap_length` entries of `entry_bytes` each, stored flat.
pub(crate) struct Palette {
    data: Vec<u8>,
    entry_bytes: usize,
    first_index: usize,
}

impl Palette {
    /// Load the color map declared by `header`, if any.
    pub(crate) fn load<R: Read>(
        header: &TgaHeader,
        src: &mut ByteSource<R>,
    ) -> Result<Option<Self>, BitmapError> {
        if !header.has_palette() {
            return Ok(None);
        }
        let entry_bytes = header.palette_entry_bytes();
        let mut data = vec![0u8; entry_bytes * usize::from(header.cmap_length)];
        if !src.read_lenient(&mut data)? {
            warn!("palette data truncated");
        }
        trace!(
            "loaded palette: {} entries of {} bytes, first index {}",
            header.cmap_length, entry_bytes, header.cmap_first
        );
        Ok(Some(Self {
            data,
            entry_bytes,
            first_index: usize::from(header.cmap_first),
        }))
    }

    pub(crate) fn entry_bytes(&self) -> usize {
        self.entry_bytes
    }

    /// Entry for pixel value `index`, offset by the palette's first index.
    pub(crate) fn entry(&self, index: u32) -> Option<&[u8]> {
        let start = self
            .first_index
            .checked_add(index as usize)?
            .checked_mul(self.entry_bytes)?;
        self.data.get(start..start.checked_add(self.entry_bytes)?)
    }

    #[cfg(test)]
    pub(crate) fn from_raw(data: Vec<u8>, entry_bytes: usize, first_index: usize) -> Self {
        Self {
            data,
            entry_bytes,
            first_index,
        }
    }
}
