use crate::command::Command;
use crate::error::{EpdResult, Error, pin_error, spi_error};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiBus;
use log::{debug, trace};

pub(crate) const RESET_HOLD_MS: u32 = 200;
pub(crate) const RESET_PULSE_MS: u32 = 5;
pub(crate) const DEFAULT_POLL_INTERVAL_MS: u32 = 100;
const MIN_POLL_INTERVAL_MS: u32 = 1;

/// Polling policy for the busy line.
///
/// The default polls every 100 ms and waits as long as the controller stays
/// busy. A timeout turns a stuck busy line into [`Error::Timeout`]. Elapsed
/// time is the sum of poll intervals, which never drop below 1 ms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BusyWait {
    poll_interval_ms: u32,
    timeout_ms: Option<u32>,
}

impl Default for BusyWait {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL_MS, None)
    }
}

impl BusyWait {
    #[must_use]
    pub fn new(poll_interval_ms: u32, timeout_ms: Option<u32>) -> Self {
        Self {
            poll_interval_ms: poll_interval_ms.max(MIN_POLL_INTERVAL_MS),
            timeout_ms,
        }
    }

    #[must_use]
    pub fn with_timeout(timeout_ms: u32) -> Self {
        Self::new(DEFAULT_POLL_INTERVAL_MS, Some(timeout_ms))
    }

    pub fn poll_interval_ms(&self) -> u32 {
        self.poll_interval_ms
    }

    pub fn timeout_ms(&self) -> Option<u32> {
        self.timeout_ms
    }
}

/// Byte-at-a-time command/data framing over the SPI bus and control lines.
///
/// Every transferred byte is followed by a busy wait, so no transaction is
/// ever issued while the controller is still processing the previous one.
pub struct CommandChannel<SPI, CS, BUSY, DC, RST, DELAY> {
    spi: SPI,
    cs: CS,
    busy: BUSY,
    dc: DC,
    rst: RST,
    delay: DELAY,
    busy_wait: BusyWait,
}

impl<SPI, CS, BUSY, DC, RST, DELAY> CommandChannel<SPI, CS, BUSY, DC, RST, DELAY>
where
    SPI: SpiBus,
    CS: OutputPin,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    pub fn new(spi: SPI, cs: CS, busy: BUSY, dc: DC, rst: RST, delay: DELAY) -> Self {
        Self {
            spi,
            cs,
            busy,
            dc,
            rst,
            delay,
            busy_wait: BusyWait::default(),
        }
    }

    #[must_use]
    pub fn with_busy_wait(mut self, busy_wait: BusyWait) -> Self {
        self.busy_wait = busy_wait;
        self
    }

    pub(crate) fn hardware_reset(&mut self) -> EpdResult<()> {
        debug!("EPD: Hardware reset starting");
        self.rst.set_high().map_err(pin_error)?;
        self.delay.delay_ms(RESET_HOLD_MS);
        self.rst.set_low().map_err(pin_error)?;
        self.delay.delay_ms(RESET_PULSE_MS);
        self.rst.set_high().map_err(pin_error)?;
        self.delay.delay_ms(RESET_HOLD_MS);
        debug!("EPD: Hardware reset complete");
        Ok(())
    }

    pub fn send_command(&mut self, command: Command) -> EpdResult<()> {
        trace!("EPD: send_command {:?} (0x{:02X})", command, command.opcode());
        self.dc.set_low().map_err(pin_error)?;
        self.transfer(command.opcode())?;
        self.wait_idle()
    }

    pub fn send_data(&mut self, data: u8) -> EpdResult<()> {
        self.dc.set_high().map_err(pin_error)?;
        self.transfer(data)?;
        self.wait_idle()
    }

    /// Sends `command` followed by each payload byte as its own data transfer.
    pub fn execute_command(&mut self, command: Command, payload: &[u8]) -> EpdResult<()> {
        self.send_command(command)?;
        for &byte in payload {
            self.send_data(byte)?;
        }
        trace!("EPD: sent {} bytes of data", payload.len());
        Ok(())
    }

    /// Blocks until the busy line reads low, polling per [`BusyWait`].
    pub fn wait_idle(&mut self) -> EpdResult<()> {
        let mut waited_ms: u32 = 0;
        while self.busy.is_high().map_err(pin_error)? {
            if self.busy_wait.timeout_ms.is_some_and(|limit| waited_ms >= limit) {
                debug!("EPD: wait_idle TIMEOUT after {waited_ms}ms");
                return Err(Error::Timeout { waited_ms });
            }
            self.delay.delay_ms(self.busy_wait.poll_interval_ms);
            waited_ms = waited_ms.saturating_add(self.busy_wait.poll_interval_ms);
        }
        if waited_ms > 0 {
            trace!("EPD: wait_idle done in {waited_ms}ms");
        }
        Ok(())
    }

    pub(crate) fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// Hands back the bus, pins and delay in constructor order.
    pub fn release(self) -> (SPI, CS, BUSY, DC, RST, DELAY) {
        (self.spi, self.cs, self.busy, self.dc, self.rst, self.delay)
    }

    fn transfer(&mut self, byte: u8) -> EpdResult<()> {
        self.cs.set_low().map_err(pin_error)?;
        let written = self.spi.write(&[byte]).map_err(spi_error);
        // Deselect even when the write failed.
        self.cs.set_high().map_err(pin_error)?;
        written
    }
}
