use crate::buffer::check_len;
use crate::command::{Command, EpdData};
use crate::common::{BUFFER_SIZE, ROW_BYTES};
use crate::error::{EpdResult, Error};
use crate::init::{INIT_PROGRAM, INIT_SETTLE_MS, InitStep, PowerState};
use crate::interface::CommandChannel;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiBus;
use log::{debug, info};

pub(crate) const SLEEP_DELAY_MS: u32 = 100;
const WHITE_BYTE: u8 = 0xFF;

/// Waveshare 2.13" V2 black/white panel.
///
/// Owns the bus and control lines for its whole lifetime. Dropping the driver
/// drops them; [`Epd2in13v2::release`] hands them back instead.
pub struct Epd2in13v2<SPI, CS, BUSY, DC, RST, DELAY> {
    interface: CommandChannel<SPI, CS, BUSY, DC, RST, DELAY>,
    state: PowerState,
}

impl<SPI, CS, BUSY, DC, RST, DELAY> Epd2in13v2<SPI, CS, BUSY, DC, RST, DELAY>
where
    SPI: SpiBus,
    CS: OutputPin,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Takes ownership of the channel and runs the power-on sequence.
    pub fn new(interface: CommandChannel<SPI, CS, BUSY, DC, RST, DELAY>) -> EpdResult<Self> {
        let mut driver = Self {
            interface,
            state: PowerState::Unpowered,
        };
        driver.init()?;
        Ok(driver)
    }

    pub fn state(&self) -> PowerState {
        self.state
    }

    /// Hardware reset followed by the full register and waveform program.
    pub fn init(&mut self) -> EpdResult<()> {
        self.state = PowerState::Resetting;
        self.interface.hardware_reset()?;
        self.state = PowerState::Configuring;
        for step in INIT_PROGRAM {
            match step {
                InitStep::WaitIdle => self.interface.wait_idle()?,
                InitStep::Write(command, payload) => {
                    debug!("EPD: init {command:?}");
                    self.interface.execute_command(command, payload)?;
                }
            }
        }
        self.interface.delay_ms(INIT_SETTLE_MS);
        self.state = PowerState::Ready;
        info!("EPD: init done");
        Ok(())
    }

    /// Leaves deep sleep. The controller needs the whole init again.
    pub fn wake(&mut self) -> EpdResult<()> {
        self.init()
    }

    /// Fills controller RAM with white and starts a refresh without waiting.
    pub fn clear(&mut self) -> EpdResult<()> {
        self.ensure_ready()?;
        debug!("EPD: clear");
        self.interface.send_command(Command::WriteRam)?;
        for _ in 0..BUFFER_SIZE {
            self.interface.send_data(WHITE_BYTE)?;
        }
        self.turn_display_off()
    }

    /// Writes a packed frame and blocks until the refresh completes.
    pub fn display(&mut self, buffer: &[u8]) -> EpdResult<()> {
        check_len(buffer)?;
        self.ensure_ready()?;
        debug!("EPD: display() called with buffer_len={}", buffer.len());
        self.interface.send_command(Command::WriteRam)?;
        for line in buffer.chunks_exact(ROW_BYTES) {
            for &byte in line {
                self.interface.send_data(byte)?;
            }
        }
        self.turn_display_on()
    }

    pub fn turn_display_on(&mut self) -> EpdResult<()> {
        self.trigger_full_update()?;
        self.interface.wait_idle()
    }

    pub fn turn_display_off(&mut self) -> EpdResult<()> {
        self.trigger_full_update()
    }

    /// Enters deep sleep. Call [`Self::wake`] before the next frame.
    pub fn sleep(&mut self) -> EpdResult<()> {
        self.ensure_ready()?;
        self.interface
            .execute_command(Command::DeepSleep, EpdData::DeepSleep.as_slice())?;
        self.interface.delay_ms(SLEEP_DELAY_MS);
        self.state = PowerState::Asleep;
        info!("EPD: asleep");
        Ok(())
    }

    /// Gives the bus, pins and delay back to the caller.
    pub fn release(self) -> (SPI, CS, BUSY, DC, RST, DELAY) {
        self.interface.release()
    }

    fn trigger_full_update(&mut self) -> EpdResult<()> {
        self.ensure_ready()?;
        self.interface.execute_command(
            Command::DisplayUpdateControl,
            EpdData::FullUpdate.as_slice(),
        )?;
        self.interface.send_command(Command::ActivateDisplayUpdate)
    }

    fn ensure_ready(&self) -> EpdResult<()> {
        if self.state == PowerState::Ready {
            Ok(())
        } else {
            Err(Error::NotReady)
        }
    }
}
