//! Recording fake transport for driver tests
//!
//! Every pin, the SPI bus and the delay share one `Bus`, which logs what the
//! controller would have seen. Chip-select is not logged; instead the fake
//! asserts that bytes are only written while selected and that the busy line
//! is only polled while deselected.

use crate::interface::CommandChannel;
use core::convert::Infallible;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType as PinErrorType, InputPin, OutputPin};
use embedded_hal::spi::{ErrorType as SpiErrorType, SpiBus};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusEvent {
    Command(u8),
    Data(u8),
    Reset(bool),
    BusyPoll(bool),
    DelayMs(u32),
}

#[derive(Default)]
struct BusState {
    dc_high: bool,
    selected: bool,
    events: Vec<BusEvent>,
    busy_levels: VecDeque<bool>,
    busy_triggers: Vec<(u8, Vec<bool>)>,
}

#[derive(Clone, Default)]
pub struct Bus(Rc<RefCell<BusState>>);

impl Bus {
    pub fn channel(&self) -> CommandChannel<Fake, Fake, Fake, Fake, Fake, Fake> {
        CommandChannel::new(
            self.fake(Role::Spi),
            self.fake(Role::ChipSelect),
            self.fake(Role::Busy),
            self.fake(Role::DataCommand),
            self.fake(Role::Reset),
            self.fake(Role::Delay),
        )
    }

    /// Queues busy-line levels to be read right after `opcode` is written.
    pub fn script_busy_after(&self, opcode: u8, levels: &[bool]) {
        self.0
            .borrow_mut()
            .busy_triggers
            .push((opcode, levels.to_vec()));
    }

    pub fn events(&self) -> Vec<BusEvent> {
        self.0.borrow().events.clone()
    }

    pub fn reset_log(&self) {
        self.0.borrow_mut().events.clear();
    }

    /// Groups the log into `(opcode, payload)` pairs.
    pub fn transactions(&self) -> Vec<(u8, Vec<u8>)> {
        let mut transactions: Vec<(u8, Vec<u8>)> = Vec::new();
        for event in self.events() {
            match event {
                BusEvent::Command(opcode) => transactions.push((opcode, Vec::new())),
                BusEvent::Data(byte) => transactions
                    .last_mut()
                    .expect("data byte before any command")
                    .1
                    .push(byte),
                _ => {}
            }
        }
        transactions
    }

    fn fake(&self, role: Role) -> Fake {
        Fake {
            bus: self.clone(),
            role,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Role {
    Spi,
    ChipSelect,
    Busy,
    DataCommand,
    Reset,
    Delay,
}

pub struct Fake {
    bus: Bus,
    role: Role,
}

impl Fake {
    fn set_level(&mut self, high: bool) {
        let mut state = self.bus.0.borrow_mut();
        match self.role {
            Role::ChipSelect => state.selected = !high,
            Role::DataCommand => state.dc_high = high,
            Role::Reset => state.events.push(BusEvent::Reset(high)),
            role => panic!("{role:?} is not an output"),
        }
    }
}

impl PinErrorType for Fake {
    type Error = Infallible;
}

impl OutputPin for Fake {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.set_level(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.set_level(true);
        Ok(())
    }
}

impl InputPin for Fake {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        assert_eq!(self.role, Role::Busy);
        let mut state = self.bus.0.borrow_mut();
        assert!(!state.selected, "busy polled while selected");
        let level = state.busy_levels.pop_front().unwrap_or(false);
        state.events.push(BusEvent::BusyPoll(level));
        Ok(level)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        self.is_high().map(|high| !high)
    }
}

impl SpiErrorType for Fake {
    type Error = Infallible;
}

impl SpiBus for Fake {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Infallible> {
        words.fill(0);
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Infallible> {
        assert_eq!(self.role, Role::Spi);
        let mut state = self.bus.0.borrow_mut();
        assert!(state.selected, "write while deselected");
        for &byte in words {
            if state.dc_high {
                state.events.push(BusEvent::Data(byte));
            } else {
                state.events.push(BusEvent::Command(byte));
                let levels: Vec<bool> = state
                    .busy_triggers
                    .iter()
                    .filter(|(opcode, _)| *opcode == byte)
                    .flat_map(|(_, levels)| levels.iter().copied())
                    .collect();
                state.busy_levels.extend(levels);
            }
        }
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Infallible> {
        self.write(write)?;
        read.fill(0);
        Ok(())
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Infallible> {
        self.write(&words.to_vec())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

impl DelayNs for Fake {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        assert_eq!(self.role, Role::Delay);
        self.bus.0.borrow_mut().events.push(BusEvent::DelayMs(ms));
    }
}
