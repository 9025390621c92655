use embedded_hal::digital::ErrorKind as PinErrorKind;
use embedded_hal::spi::ErrorKind as SpiErrorKind;
use linux_embedded_hal::CdevPinError;
use linux_embedded_hal::gpio_cdev::Error as GpioError;
use std::io::Error as IoError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Timeout waiting for busy pin after {waited_ms}ms")]
    Timeout { waited_ms: u32 },
    #[error("SPI error: {0:?}")]
    Spi(SpiErrorKind),
    #[error("Pin error: {0:?}")]
    Pin(PinErrorKind),
    #[error("IO error: {0}")]
    Io(#[from] IoError),
    #[error("GPIO error: {0}")]
    Gpio(#[from] GpioError),
    #[error("Cdev pin error: {0}")]
    CdevPin(#[from] CdevPinError),
    #[error("Image is {width}x{height}, expected 122x250 or 250x122")]
    DimensionMismatch { width: u32, height: u32 },
    #[error("Buffer is {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
    #[error("Display controller is not initialized")]
    NotReady,
}

pub(crate) fn spi_error<E: embedded_hal::spi::Error>(error: E) -> Error {
    Error::Spi(error.kind())
}

pub(crate) fn pin_error<E: embedded_hal::digital::Error>(error: E) -> Error {
    Error::Pin(error.kind())
}

pub type EpdResult<T> = Result<T, Error>;
