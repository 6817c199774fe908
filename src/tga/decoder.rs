use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use enough::{Stop, Unstoppable};
use log::debug;

use super::header::{TgaHeader, TgaInfo, read_header};
use super::scanline::decode_image;
use super::source::ByteSource;
use crate::error::BitmapError;
use crate::limits::Limits;

/// Header parsed, pixel data not read yet.
struct Opened<R> {
    source: ByteSource<R>,
    header: TgaHeader,
    info: TgaInfo,
}

/// Whole image decoded; the source has been released.
struct Decoded {
    header: TgaHeader,
    info: TgaInfo,
    pixels: Vec<u8>,
}

enum State<R> {
    Closed,
    Opened(Opened<R>),
    Decoded(Decoded),
}

/// Scanline-oriented TGA decoder.
///
/// One decoder handles one image at a time:
///
/// 1. [`open`](Self::open) (or [`open_reader`](Self::open_reader)) parses and
///    validates the header and comment.
/// 2. The first [`read_scanline`](Self::read_scanline) decodes the whole image
///    into memory; later calls copy rows out of it.
/// 3. [`close`](Self::close) releases everything. The decoder can then be
///    opened again.
///
/// Scanline indices always run top to bottom.
///
/// ```no_run
/// use zentga::TgaDecoder;
///
/// let mut dec = TgaDecoder::new();
/// let info = dec.open("image.tga")?.clone();
/// let mut row = vec![0u8; info.scanline_bytes()];
/// for y in 0..info.height {
///     dec.read_scanline(y, &mut row)?;
/// }
/// dec.close();
/// # Ok::<(), zentga::BitmapError>(())
/// ```
pub struct TgaDecoder<R = BufReader<File>> {
    state: State<R>,
    limits: Limits,
}

impl<R> Default for TgaDecoder<R> {
    fn default() -> Self {
        Self {
            state: State::Closed,
            limits: Limits::none(),
        }
    }
}

impl TgaDecoder<BufReader<File>> {
    /// Create a decoder that reads from files.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the TGA file at `path`.
    ///
    /// On failure the file is closed again and the decoder stays closed.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<&TgaInfo, BitmapError> {
        self.close();
        let path = path.as_ref();
        let file = File::open(path).inspect_err(|e| {
            debug!("could not open file \"{}\": {e}", path.display());
        })?;
        self.open_reader(BufReader::new(file))
    }
}

impl<R: Read> TgaDecoder<R> {
    /// Create a decoder for an arbitrary reader type.
    pub fn for_reader() -> Self {
        Self::default()
    }

    /// Apply resource limits to subsequent opens.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Start decoding a TGA stream positioned at its first byte.
    ///
    /// Any previously open image is closed first. If the header is invalid the
    /// reader is dropped and the decoder stays closed.
    pub fn open_reader(&mut self, reader: R) -> Result<&TgaInfo, BitmapError> {
        self.close();
        let mut source = ByteSource::new(reader);
        let (header, info) = read_header(&mut source).inspect_err(|e| {
            debug!("rejected TGA header: {e}");
        })?;
        self.limits
            .check_image(info.width, info.height, info.channels())?;

        self.state = State::Opened(Opened {
            source,
            header,
            info,
        });
        self.info().ok_or(BitmapError::NotOpen)
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, State::Closed)
    }

    /// Whether the pixel data has been decoded into memory.
    pub fn is_decoded(&self) -> bool {
        matches!(self.state, State::Decoded(_))
    }

    /// Descriptor of the open image.
    pub fn info(&self) -> Option<&TgaInfo> {
        match &self.state {
            State::Closed => None,
            State::Opened(o) => Some(&o.info),
            State::Decoded(d) => Some(&d.info),
        }
    }

    /// Raw header of the open image.
    pub fn header(&self) -> Option<&TgaHeader> {
        match &self.state {
            State::Closed => None,
            State::Opened(o) => Some(&o.header),
            State::Decoded(d) => Some(&d.header),
        }
    }

    /// Decode the whole image now, checking `stop` as it goes.
    ///
    /// Does nothing if the image is already decoded. If decoding fails the
    /// decoder is closed.
    pub fn decode(&mut self, stop: &dyn Stop) -> Result<(), BitmapError> {
        match std::mem::replace(&mut self.state, State::Closed) {
            State::Closed => Err(BitmapError::NotOpen),
            State::Decoded(d) => {
                self.state = State::Decoded(d);
                Ok(())
            }
            State::Opened(mut o) => {
                let pixels = decode_image(&o.header, &o.info, &mut o.source, stop)?;
                if o.source.exhausted() {
                    debug!("input ended before the image was complete");
                }
                self.state = State::Decoded(Decoded {
                    header: o.header,
                    info: o.info,
                    pixels,
                });
                Ok(())
            }
        }
    }

    /// Copy scanline `y` (0 = top of the displayed image) into `out`.
    ///
    /// Decodes the image first if that has not happened yet.
    pub fn read_scanline(&mut self, y: u32, out: &mut [u8]) -> Result<(), BitmapError> {
        self.decode(&Unstoppable)?;
        let State::Decoded(d) = &self.state else {
            return Err(BitmapError::NotOpen);
        };
        let height = d.info.height;
        if y >= height {
            return Err(BitmapError::RowOutOfRange { row: y, height });
        }
        let size = d.info.scanline_bytes();
        if out.len() < size {
            return Err(BitmapError::BufferTooSmall {
                needed: size,
                actual: out.len(),
            });
        }
        let row = if d.header.flip_y() { height - 1 - y } else { y };
        let row = row as usize;
        out[..size].copy_from_slice(&d.pixels[row * size..(row + 1) * size]);
        Ok(())
    }

    /// Copy every scanline, top to bottom, into `out`.
    pub fn read_image(&mut self, out: &mut [u8]) -> Result<(), BitmapError> {
        let (size, height) = match self.info() {
            Some(info) => (info.scanline_bytes(), info.height),
            None => return Err(BitmapError::NotOpen),
        };
        let needed = size * height as usize;
        if out.len() < needed {
            return Err(BitmapError::BufferTooSmall {
                needed,
                actual: out.len(),
            });
        }
        if size == 0 {
            return Ok(());
        }
        for (y, row) in (0..height).zip(out.chunks_exact_mut(size)) {
            self.read_scanline(y, row)?;
        }
        Ok(())
    }

    /// Release the source and all buffers, returning to the initial state.
    pub fn close(&mut self) {
        self.state = State::Closed;
    }
}
