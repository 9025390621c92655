//! Packed 1-bit frame buffer and the image encoder that fills it.
//!
//! Rows are `ROW_BYTES` wide, pixels are packed MSB first, and a set bit is a
//! white pixel. The panel scans its source lines mirrored, so native images
//! are written right-to-left.

use crate::common::{BUFFER_SIZE, HEIGHT, Orientation, ROW_BYTES, WIDTH};
use crate::error::{EpdResult, Error};
use image::{Rgba, RgbaImage};

const WHITE_BYTE: u8 = 0xFF;
/// Channel distance from pure white/transparent still counted as white.
const COLOR_TOLERANCE: u8 = 10;

/// Byte index into the buffer and bit index counted from the MSB.
pub type BitPosition = (usize, u8);

#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    bytes: Box<[u8]>,
}

impl PixelBuffer {
    /// An all-white buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bytes: vec![WHITE_BYTE; BUFFER_SIZE].into_boxed_slice(),
        }
    }

    /// Wraps caller-packed bytes, rejecting anything but the exact panel size.
    pub fn from_bytes(bytes: impl Into<Box<[u8]>>) -> EpdResult<Self> {
        let bytes = bytes.into();
        check_len(&bytes)?;
        Ok(Self { bytes })
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn fill(&mut self, byte: u8) {
        self.bytes.fill(byte);
    }

    /// Sets (white) or clears (black) a single bit.
    ///
    /// Returns `false` and leaves the buffer untouched when `at` lies outside it.
    pub fn set_pixel(&mut self, at: BitPosition, white: bool) -> bool {
        let Some((byte, mask)) = locate(&mut self.bytes, at) else {
            return false;
        };
        if white {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
        true
    }

    /// `None` when `at` lies outside the buffer.
    #[must_use]
    pub fn is_white(&self, (index, bit): BitPosition) -> Option<bool> {
        let mask = bit_mask(bit)?;
        self.bytes.get(index).map(|byte| byte & mask != 0)
    }

    /// Resets to white and draws every black pixel of `image`.
    ///
    /// On a size mismatch the buffer is left all white.
    pub fn paint(&mut self, image: &RgbaImage) -> EpdResult<Orientation> {
        self.fill(WHITE_BYTE);
        let (width, height) = image.dimensions();
        let orientation =
            Orientation::detect(width, height).ok_or(Error::DimensionMismatch { width, height })?;
        let position = match orientation {
            Orientation::Native => native_position,
            Orientation::Rotated => rotated_position,
        };
        for (x, y, pixel) in image.enumerate_pixels() {
            if !is_black(*pixel) {
                continue;
            }
            if let Some(at) = position(x, y) {
                self.set_pixel(at, false);
            }
        }
        Ok(orientation)
    }
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<[u8]> for PixelBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl core::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let black = self.bytes.iter().map(|b| b.count_zeros()).sum::<u32>();
        f.debug_struct("PixelBuffer")
            .field("len", &self.bytes.len())
            .field("black_bits", &black)
            .finish()
    }
}

fn bit_mask(bit: u8) -> Option<u8> {
    (bit < 8).then(|| 0x80 >> bit)
}

fn locate(bytes: &mut [u8], (index, bit): BitPosition) -> Option<(&mut u8, u8)> {
    let mask = bit_mask(bit)?;
    bytes.get_mut(index).map(|byte| (byte, mask))
}

pub(crate) fn check_len(bytes: &[u8]) -> EpdResult<()> {
    if bytes.len() == BUFFER_SIZE {
        Ok(())
    } else {
        Err(Error::BufferSize {
            expected: BUFFER_SIZE,
            actual: bytes.len(),
        })
    }
}

/// Encodes an image of either supported size into a new buffer.
pub fn encode(image: &RgbaImage) -> EpdResult<PixelBuffer> {
    let mut buffer = PixelBuffer::new();
    buffer.paint(image)?;
    Ok(buffer)
}

/// Like [`encode`], but the image must match `orientation` exactly.
pub fn encode_as(image: &RgbaImage, orientation: Orientation) -> EpdResult<PixelBuffer> {
    let (width, height) = image.dimensions();
    if orientation.dimensions() != (width, height) {
        return Err(Error::DimensionMismatch { width, height });
    }
    encode(image)
}

/// Dark enough on every channel and not transparent.
///
/// Thresholds apply to straight (non-premultiplied) alpha channel values.
#[must_use]
pub fn is_black(pixel: Rgba<u8>) -> bool {
    let Rgba([r, g, b, a]) = pixel;
    let limit = u8::MAX - COLOR_TOLERANCE;
    r < limit && g < limit && b < limit && a > COLOR_TOLERANCE
}

/// Maps a pixel of a `WIDTH` x `HEIGHT` image onto the buffer.
///
/// Columns are mirrored: `pos = WIDTH - x`, so x = 0 lands in the last
/// populated byte of the row.
#[must_use]
pub fn native_position(x: u32, y: u32) -> Option<BitPosition> {
    if x >= WIDTH || y >= HEIGHT {
        return None;
    }
    let pos = (WIDTH - x) as usize;
    Some((pos / 8 + y as usize * ROW_BYTES, (pos % 8) as u8))
}

/// Maps a pixel of a `HEIGHT` x `WIDTH` image onto the buffer.
///
/// Source rows become panel columns and source columns become panel rows.
/// The bit is selected by the source row, which equals the panel column here.
#[must_use]
pub fn rotated_position(x: u32, y: u32) -> Option<BitPosition> {
    if x >= HEIGHT || y >= WIDTH {
        return None;
    }
    let posx = y as usize;
    // Source is HEIGHT wide: HEIGHT - (HEIGHT - x - 1) - 1 == x.
    let posy = (HEIGHT - (HEIGHT - x - 1) - 1) as usize;
    Some((posx / 8 + posy * ROW_BYTES, (y % 8) as u8))
}
