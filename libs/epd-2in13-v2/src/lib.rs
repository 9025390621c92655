pub mod buffer;
pub mod canvas;
pub mod command;
pub mod common;
pub mod device;
mod display_driver;
mod error;
mod init;
pub mod interface;
pub mod lut;
#[cfg(test)]
mod test_utils;

pub use buffer::{PixelBuffer, encode, encode_as};
pub use canvas::Canvas;
pub use common::Orientation;
pub use device::{ChipSelect, DeviceConfig, LinuxEpd};
pub use display_driver::Epd2in13v2;
pub use error::{EpdResult, Error};
pub use init::PowerState;
pub use interface::{BusyWait, CommandChannel};
