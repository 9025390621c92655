use crate::display_driver::Epd2in13v2;
use crate::error::{EpdResult, spi_error};
use crate::interface::{BusyWait, CommandChannel};
use embedded_hal::digital::{ErrorType, OutputPin};
use linux_embedded_hal::{
    CdevPin, CdevPinError, Delay, SpidevBus,
    gpio_cdev::{Chip, LineRequestFlags},
    spidev::{SpiModeFlags, SpidevOptions},
};
use log::info;

const DEFAULT_SPI_BUS_PATH: &str = "/dev/spidev0.0";
const DEFAULT_SPI_BITS_PER_WORD: u8 = 8;
const DEFAULT_SPI_MAX_SPEED_HZ: u32 = 3_000_000;
const DEFAULT_GPIO_CHIP_PATH: &str = "/dev/gpiochip0";
const DEFAULT_BUSY_PIN: u32 = 24;
const DEFAULT_DC_PIN: u32 = 25;
const DEFAULT_RST_PIN: u32 = 17;

const EPD_BUSY_CONSUMER: &str = "epd-busy";
const EPD_DC_CONSUMER: &str = "epd-dc";
const EPD_RST_CONSUMER: &str = "epd-rst";
const EPD_CS_CONSUMER: &str = "epd-cs";

/// The driver bound to spidev and GPIO character device lines.
pub type LinuxEpd = Epd2in13v2<SpidevBus, ChipSelect, CdevPin, CdevPin, CdevPin, Delay>;

/// Chip-select line as seen by the command channel.
///
/// `Hardware` leaves CS to the spidev controller, which asserts it around
/// every transfer; the channel's CS toggles become no-ops.
pub enum ChipSelect {
    Gpio(CdevPin),
    Hardware,
}

impl ErrorType for ChipSelect {
    type Error = CdevPinError;
}

impl OutputPin for ChipSelect {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        match self {
            Self::Gpio(pin) => pin.set_low(),
            Self::Hardware => Ok(()),
        }
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        match self {
            Self::Gpio(pin) => pin.set_high(),
            Self::Hardware => Ok(()),
        }
    }
}

/// Bus and line binding. Unset fields fall back to the Raspberry Pi HAT wiring.
///
/// With `cs_pin` unset (the default) the spidev device drives its own CE0
/// line, which the kernel SPI driver already owns on a Pi. Setting `cs_pin`
/// requests that line as GPIO output and opens spidev with `SPI_NO_CS`; the
/// line must not be claimed by the SPI controller in that case.
#[derive(Default)]
pub struct DeviceConfig {
    pub spi_bus_path: Option<String>,
    pub spi_options: Option<SpidevOptions>,
    pub gpio_chip_path: Option<String>,
    pub busy_pin: Option<u32>,
    pub dc_pin: Option<u32>,
    pub rst_pin: Option<u32>,
    pub cs_pin: Option<u32>,
    pub busy_wait: Option<BusyWait>,
}

impl LinuxEpd {
    /// Opens the bus and lines, then initializes the panel.
    ///
    /// Any failure aborts construction; lines already requested are released
    /// when their handles drop.
    pub fn open(config: DeviceConfig) -> EpdResult<Self> {
        let spi_bus_path = config
            .spi_bus_path
            .unwrap_or_else(|| DEFAULT_SPI_BUS_PATH.to_string());
        let spi_options = config
            .spi_options
            .unwrap_or_else(|| default_spi_options(config.cs_pin.is_some()));
        let gpio_chip_path = config
            .gpio_chip_path
            .unwrap_or_else(|| DEFAULT_GPIO_CHIP_PATH.to_string());
        let busy_pin = config.busy_pin.unwrap_or(DEFAULT_BUSY_PIN);
        let dc_pin = config.dc_pin.unwrap_or(DEFAULT_DC_PIN);
        let rst_pin = config.rst_pin.unwrap_or(DEFAULT_RST_PIN);
        let busy_wait = config.busy_wait.unwrap_or_default();

        info!("Initializing EPD device on {spi_bus_path}...");

        let mut spi_bus = SpidevBus::open(spi_bus_path).map_err(spi_error)?;
        spi_bus.configure(&spi_options)?;

        let mut chip = Chip::new(gpio_chip_path)?;
        let busy = CdevPin::new(chip.get_line(busy_pin)?.request(
            LineRequestFlags::INPUT,
            0,
            EPD_BUSY_CONSUMER,
        )?)?;
        let dc = CdevPin::new(chip.get_line(dc_pin)?.request(
            LineRequestFlags::OUTPUT,
            0,
            EPD_DC_CONSUMER,
        )?)?;
        let rst = CdevPin::new(chip.get_line(rst_pin)?.request(
            LineRequestFlags::OUTPUT,
            1,
            EPD_RST_CONSUMER,
        )?)?;
        let cs = match config.cs_pin {
            Some(cs_pin) => ChipSelect::Gpio(CdevPin::new(chip.get_line(cs_pin)?.request(
                LineRequestFlags::OUTPUT,
                1,
                EPD_CS_CONSUMER,
            )?)?),
            None => ChipSelect::Hardware,
        };

        let interface =
            CommandChannel::new(spi_bus, cs, busy, dc, rst, Delay {}).with_busy_wait(busy_wait);
        Epd2in13v2::new(interface)
    }
}

fn default_spi_options(gpio_cs: bool) -> SpidevOptions {
    let mode = if gpio_cs {
        SpiModeFlags::SPI_MODE_0 | SpiModeFlags::SPI_NO_CS
    } else {
        SpiModeFlags::SPI_MODE_0
    };
    SpidevOptions::new()
        .bits_per_word(DEFAULT_SPI_BITS_PER_WORD)
        .max_speed_hz(DEFAULT_SPI_MAX_SPEED_HZ)
        .mode(mode)
        .build()
}
