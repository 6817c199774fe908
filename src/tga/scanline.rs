//! Whole-image assembly: raw rows or run-length packets into one buffer.
//!
//! Rows are stored bottom-up in the file, so decoding fills buffer rows from
//! `height - 1` down to 0. The buffer therefore holds the file's last stored
//! row first. The horizontal flip is applied here; the vertical flip is left
//! to scanline retrieval.

use std::io::Read;

use enough::Stop;
use log::{trace, warn};

use super::header::{TgaHeader, TgaInfo};
use super::palette::Palette;
use super::pixel::{DEFAULT_PIXEL, PixelDecoder};
use super::source::ByteSource;
use crate::error::BitmapError;

const RLE_RUN_FLAG: u8 = 0x80;
const RLE_COUNT_MASK: u8 = 0x7F;

/// Position in the output buffer, walking columns left to right and rows
/// from the bottom of the buffer to the top.
#[derive(Debug)]
pub(crate) struct RowCursor {
    width: usize,
    row: usize,
    col: usize,
    done: bool,
}

impl RowCursor {
    pub(crate) fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            row: height.saturating_sub(1),
            col: 0,
            done: width == 0 || height == 0,
        }
    }

    /// Current `(row, col)`, or `None` once the cursor has left row 0.
    pub(crate) fn position(&self) -> Option<(usize, usize)> {
        (!self.done).then_some((self.row, self.col))
    }

    /// Pixels left in the current row.
    pub(crate) fn row_remaining(&self) -> usize {
        if self.done { 0 } else { self.width - self.col }
    }

    /// Step `count` pixels forward, wrapping onto the next row up.
    /// Returns `false` when that runs past the end of row 0.
    pub(crate) fn advance(&mut self, count: usize) -> bool {
        if self.done {
            return false;
        }
        let pos = self.col + count;
        let rows_up = pos / self.width;
        self.col = pos % self.width;
        if rows_up > self.row {
            self.done = true;
            return false;
        }
        self.row -= rows_up;
        true
    }
}

/// Decode the pixel data of an opened image into a fresh buffer of
/// `info.height` rows of `info.scanline_bytes()` each.
///
/// `src` must be positioned just past the header and comment.
pub(crate) fn decode_image<R: Read>(
    header: &TgaHeader,
    info: &TgaInfo,
    src: &mut ByteSource<R>,
    stop: &dyn Stop,
) -> Result<Vec<u8>, BitmapError> {
    let stride = info.scanline_bytes();
    let mut buf = vec![0u8; stride * info.height as usize];

    // Only needed until the pixels are decoded.
    let palette = Palette::load(header, src)?;

    let mut asm = Assembler {
        decoder: PixelDecoder::new(header, info.image_type, palette.as_ref()),
        pixel_bytes: header.pixel_bytes(),
        channels: info.channels(),
        width: info.width as usize,
        bad_indices: 0,
    };

    stop.check()?;
    if !buf.is_empty() {
        if info.image_type.is_rle() {
            asm.decode_rle(src, &mut buf, info.height as usize, stop)?;
        } else {
            asm.decode_raw(src, &mut buf, stop)?;
        }
    }

    if asm.bad_indices > 0 {
        warn!(
            "{} pixels referenced entries past the end of the palette",
            asm.bad_indices
        );
    }

    if header.flip_x() {
        flip_horizontal(&mut buf, asm.width, asm.channels);
    }
    trace!("decoded {} bytes of pixel data", buf.len());
    Ok(buf)
}

struct Assembler<'p> {
    decoder: PixelDecoder<'p>,
    pixel_bytes: usize,
    channels: usize,
    width: usize,
    bad_indices: usize,
}

impl Assembler<'_> {
    fn decode_pixel(&mut self, raw: &[u8], pixel: &mut [u8; 4]) {
        if !self.decoder.decode(raw, pixel) {
            self.bad_indices += 1;
        }
    }

    fn decode_raw<R: Read>(
        &mut self,
        src: &mut ByteSource<R>,
        buf: &mut [u8],
        stop: &dyn Stop,
    ) -> Result<(), BitmapError> {
        let channels = self.channels;
        let mut raw = [0u8; 4];
        let mut pixel = DEFAULT_PIXEL;

        for (row_idx, row) in buf.rchunks_exact_mut(self.width * channels).enumerate() {
            if row_idx % 16 == 0 {
                stop.check()?;
            }
            for out in row.chunks_exact_mut(channels) {
                if !src.read_lenient(&mut raw[..self.pixel_bytes])? {
                    warn!("pixel data truncated after {row_idx} rows");
                    return Ok(());
                }
                self.decode_pixel(&raw, &mut pixel);
                out.copy_from_slice(&pixel[..channels]);
            }
        }
        Ok(())
    }

    fn decode_rle<R: Read>(
        &mut self,
        src: &mut ByteSource<R>,
        buf: &mut [u8],
        height: usize,
        stop: &dyn Stop,
    ) -> Result<(), BitmapError> {
        let channels = self.channels;
        let pixel_bytes = self.pixel_bytes;
        let mut cursor = RowCursor::new(self.width, height);
        // Packet header byte followed by the first pixel.
        let mut packet = [0u8; 5];
        let mut pixel = DEFAULT_PIXEL;
        let mut packets = 0u32;

        while cursor.position().is_some() {
            packets = packets.wrapping_add(1);
            if packets % 1024 == 0 {
                stop.check()?;
            }

            if !src.read_lenient(&mut packet[..1 + pixel_bytes])? {
                warn!("run-length data truncated");
                return Ok(());
            }
            let count = usize::from(packet[0] & RLE_COUNT_MASK) + 1;
            self.decode_pixel(&packet[1..], &mut pixel);

            let mut remaining = count;
            if packet[0] & RLE_RUN_FLAG != 0 {
                // One pixel repeated; the run may cross row boundaries.
                while remaining > 0 {
                    let Some((row, col)) = cursor.position() else {
                        break;
                    };
                    let span = remaining.min(cursor.row_remaining());
                    let start = (row * self.width + col) * channels;
                    for out in buf[start..start + span * channels].chunks_exact_mut(channels) {
                        out.copy_from_slice(&pixel[..channels]);
                    }
                    remaining -= span;
                    cursor.advance(span);
                }
            } else {
                // Literal pixels, each with its own source bytes.
                while remaining > 0 {
                    let Some((row, col)) = cursor.position() else {
                        break;
                    };
                    if remaining < count {
                        if !src.read_lenient(&mut packet[1..1 + pixel_bytes])? {
                            warn!("run-length data truncated");
                            return Ok(());
                        }
                        self.decode_pixel(&packet[1..], &mut pixel);
                    }
                    let start = (row * self.width + col) * channels;
                    buf[start..start + channels].copy_from_slice(&pixel[..channels]);
                    remaining -= 1;
                    cursor.advance(1);
                }
            }

            if remaining > 0 {
                warn!("run-length packet runs {remaining} pixels past the last row");
            }
        }
        Ok(())
    }
}

/// Mirror every row of `buf` in place, one pixel of `channels` bytes at a time.
pub(crate) fn flip_horizontal(buf: &mut [u8], width: usize, channels: usize) {
    if width < 2 || channels == 0 {
        return;
    }
    for row in buf.chunks_exact_mut(width * channels) {
        for left in 0..width / 2 {
            let right = width - 1 - left;
            let (head, tail) = row.split_at_mut(right * channels);
            head[left * channels..(left + 1) * channels].swap_with_slice(&mut tail[..channels]);
        }
    }
}
