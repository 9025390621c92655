use embedded_graphics::{
    mono_font::{MonoTextStyle, ascii::FONT_10X20},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Alignment, Text},
};
use epd_2in13_v2::{BusyWait, Canvas, DeviceConfig, LinuxEpd, Orientation, encode};
use image::{Rgba, RgbaImage};

const BUSY_TIMEOUT_MS: u32 = 30_000;

fn main() -> epd_2in13_v2::EpdResult<()> {
    env_logger::init();
    log::info!("EPD_2in13_V2 demo");

    let mut epd = LinuxEpd::open(DeviceConfig {
        busy_wait: Some(BusyWait::with_timeout(BUSY_TIMEOUT_MS)),
        ..DeviceConfig::default()
    })?;

    log::info!("Clearing");
    epd.clear()?;

    log::info!("Drawing test card from an image");
    let card = encode(&test_card())?;
    epd.display(card.as_bytes())?;

    log::info!("Drawing text");
    let mut canvas = Canvas::new(Orientation::Rotated);
    let bounding_box = canvas.bounding_box();
    Rectangle::new(bounding_box.top_left, bounding_box.size)
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::Off, 2))
        .draw(&mut canvas)?;
    Text::with_alignment(
        "Hello e-Paper",
        bounding_box.center(),
        MonoTextStyle::new(&FONT_10X20, BinaryColor::Off),
        Alignment::Center,
    )
    .draw(&mut canvas)?;
    epd.display(canvas.buffer().as_bytes())?;

    epd.sleep()?;
    drop(epd.release());
    Ok(())
}

/// Landscape checkerboard with a solid bar, built in memory.
fn test_card() -> RgbaImage {
    const CELL: u32 = 25;
    let (width, height) = Orientation::Rotated.dimensions();
    RgbaImage::from_fn(width, height, |x, y| {
        let in_bar = y >= height - CELL;
        let dark_cell = (x / CELL + y / CELL) % 2 == 0;
        if in_bar || dark_cell {
            Rgba([0, 0, 0, 255])
        } else {
            Rgba([255, 255, 255, 255])
        }
    })
}
