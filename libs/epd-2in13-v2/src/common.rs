pub const WIDTH: u32 = 122;
pub const HEIGHT: u32 = 250;
/// Bytes per panel row, including the padding bits of the last byte.
pub const ROW_BYTES: usize = (WIDTH as usize).div_ceil(8);
pub const BUFFER_SIZE: usize = ROW_BYTES * HEIGHT as usize;

/// How a source image lies on the panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Image is `WIDTH` x `HEIGHT`, the panel's own scan layout.
    Native,
    /// Image is `HEIGHT` x `WIDTH`, turned a quarter to landscape.
    Rotated,
}

impl Orientation {
    /// Picks the orientation whose dimensions match the image, if any.
    #[must_use]
    pub fn detect(width: u32, height: u32) -> Option<Self> {
        match (width, height) {
            (WIDTH, HEIGHT) => Some(Self::Native),
            (HEIGHT, WIDTH) => Some(Self::Rotated),
            _ => None,
        }
    }

    /// Source image dimensions as `(width, height)`.
    #[must_use]
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            Self::Native => (WIDTH, HEIGHT),
            Self::Rotated => (HEIGHT, WIDTH),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_size_covers_padded_rows() {
        assert_eq!(ROW_BYTES, 16);
        assert_eq!(BUFFER_SIZE, 4000);
    }

    #[test]
    fn detect_orientation() {
        assert_eq!(Orientation::detect(122, 250), Some(Orientation::Native));
        assert_eq!(Orientation::detect(250, 122), Some(Orientation::Rotated));
        assert_eq!(Orientation::detect(128, 250), None);
        assert_eq!(Orientation::detect(0, 0), None);
    }

    #[test]
    fn dimensions_round_trip_through_detect() {
        for orientation in [Orientation::Native, Orientation::Rotated] {
            let (width, height) = orientation.dimensions();
            assert_eq!(Orientation::detect(width, height), Some(orientation));
        }
    }
}
