use crate::buffer::{BitPosition, PixelBuffer, native_position, rotated_position};
use crate::common::Orientation;
use embedded_graphics::{
    geometry::Dimensions,
    pixelcolor::BinaryColor,
    prelude::{DrawTarget, OriginDimensions, Pixel, PointsIter, Size},
    primitives::Rectangle,
};

pub trait AsFillByte {
    fn as_byte(&self) -> u8;
}

impl AsFillByte for BinaryColor {
    fn as_byte(&self) -> u8 {
        if self.is_on() { 0xFF } else { 0x00 }
    }
}

/// Drawing surface over a [`PixelBuffer`].
///
/// `BinaryColor::On` is white. Pixels go through the same mapping as the
/// image encoder, so a drawn frame and an encoded image of the same content
/// produce the same bytes.
pub struct Canvas {
    buffer: PixelBuffer,
    orientation: Orientation,
}

impl Canvas {
    #[must_use]
    pub fn new(orientation: Orientation) -> Self {
        Self {
            buffer: PixelBuffer::new(),
            orientation,
        }
    }

    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    #[must_use]
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    #[must_use]
    pub fn into_buffer(self) -> PixelBuffer {
        self.buffer
    }

    fn position(&self, x: u32, y: u32) -> Option<BitPosition> {
        match self.orientation {
            Orientation::Native => native_position(x, y),
            Orientation::Rotated => rotated_position(x, y),
        }
    }
}

impl DrawTarget for Canvas {
    type Color = BinaryColor;
    type Error = crate::error::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            let (Ok(x), Ok(y)) = (u32::try_from(coord.x), u32::try_from(coord.y)) else {
                continue;
            };
            if let Some(at) = self.position(x, y) {
                self.buffer.set_pixel(at, color.is_on());
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let clipped_area = area.intersection(&self.bounding_box());

        if clipped_area.is_zero_sized() {
            return Ok(());
        }

        self.draw_iter(clipped_area.points().map(|p| Pixel(p, color)))
    }

    fn clear(&mut self, color: BinaryColor) -> Result<(), Self::Error> {
        self.buffer.fill(color.as_byte());
        Ok(())
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        let (width, height) = self.orientation.dimensions();
        Size::new(width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::encode;
    use crate::common::{HEIGHT, WIDTH};
    use embedded_graphics::prelude::{Point, Primitive};
    use embedded_graphics::primitives::{Line, PrimitiveStyle};
    use embedded_graphics::Drawable;
    use image::{Rgba, RgbaImage};

    #[test]
    fn size_follows_orientation() {
        assert_eq!(Canvas::new(Orientation::Native).size(), Size::new(WIDTH, HEIGHT));
        assert_eq!(Canvas::new(Orientation::Rotated).size(), Size::new(HEIGHT, WIDTH));
    }

    #[test]
    fn drawing_matches_encoded_image() {
        for orientation in [Orientation::Native, Orientation::Rotated] {
            let (width, height) = orientation.dimensions();
            let mut canvas = Canvas::new(orientation);
            Line::new(Point::new(0, 3), Point::new(40, 3))
                .into_styled(PrimitiveStyle::with_stroke(BinaryColor::Off, 1))
                .draw(&mut canvas)
                .unwrap();

            let mut image = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
            for x in 0..=40 {
                image.put_pixel(x, 3, Rgba([0, 0, 0, 255]));
            }

            assert_eq!(canvas.buffer(), &encode(&image).unwrap(), "{orientation:?}");
        }
    }

    #[test]
    fn out_of_bounds_pixels_are_ignored() {
        let mut canvas = Canvas::new(Orientation::Native);
        canvas
            .draw_iter([
                Pixel(Point::new(-1, 0), BinaryColor::Off),
                Pixel(Point::new(0, -1), BinaryColor::Off),
                Pixel(Point::new(122, 0), BinaryColor::Off),
                Pixel(Point::new(0, 250), BinaryColor::Off),
            ])
            .unwrap();
        assert_eq!(canvas.buffer(), &PixelBuffer::new());
    }

    #[test]
    fn clear_fills_whole_buffer() {
        let mut canvas = Canvas::new(Orientation::Rotated);
        canvas.clear(BinaryColor::Off).unwrap();
        assert!(canvas.buffer().as_bytes().iter().all(|&b| b == 0x00));
        canvas.clear(BinaryColor::On).unwrap();
        assert!(canvas.into_buffer().as_bytes().iter().all(|&b| b == 0xFF));
    }
}
