//! Power-on register program.

use crate::command::{Command, EpdData};
use crate::lut::{FULL_UPDATE, LUT_BODY_LEN};

pub(crate) const INIT_SETTLE_MS: u32 = 100;

/// Controller lifecycle as seen by the driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerState {
    Unpowered,
    Resetting,
    Configuring,
    Ready,
    /// Deep sleep; only a full re-initialization leaves this state.
    Asleep,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum InitStep {
    WaitIdle,
    Write(Command, &'static [u8]),
}

const GATE_VOLTAGE: &[u8] = &[FULL_UPDATE.timing.gate_driving_voltage];
const SOURCE_VOLTAGE: &[u8] = &FULL_UPDATE.timing.source_driving_voltage;
const DUMMY_LINE: &[u8] = &[FULL_UPDATE.timing.dummy_line_period];
const GATE_TIME: &[u8] = &[FULL_UPDATE.timing.gate_line_width];
const LUT_BODY: &[u8; LUT_BODY_LEN] = &FULL_UPDATE.body;

/// Everything after the hardware reset, in the order the controller expects.
pub(crate) const INIT_PROGRAM: [InitStep; 19] = [
    InitStep::WaitIdle,
    InitStep::Write(Command::SoftwareReset, &[]),
    InitStep::WaitIdle,
    InitStep::Write(
        Command::AnalogBlockControl,
        EpdData::AnalogBlockControl.as_slice(),
    ),
    InitStep::Write(
        Command::DigitalBlockControl,
        EpdData::DigitalBlockControl.as_slice(),
    ),
    InitStep::Write(
        Command::DriverOutputControl,
        EpdData::DriverOutputControl.as_slice(),
    ),
    InitStep::Write(Command::DataEntryMode, EpdData::DataEntryMode.as_slice()),
    InitStep::Write(Command::SetRamXAddress, EpdData::RamX.as_slice()),
    InitStep::Write(Command::SetRamYAddress, EpdData::RamY.as_slice()),
    InitStep::Write(Command::BorderWaveform, EpdData::BorderWaveform.as_slice()),
    InitStep::Write(Command::WriteVcom, EpdData::Vcom.as_slice()),
    InitStep::Write(Command::GateDrivingVoltage, GATE_VOLTAGE),
    InitStep::Write(Command::SourceDrivingVoltage, SOURCE_VOLTAGE),
    InitStep::Write(Command::DummyLinePeriod, DUMMY_LINE),
    InitStep::Write(Command::GateLineWidth, GATE_TIME),
    InitStep::Write(Command::WriteLut, LUT_BODY),
    InitStep::Write(
        Command::SetRamXAddressCounter,
        EpdData::RamXCounter.as_slice(),
    ),
    InitStep::Write(
        Command::SetRamYAddressCounter,
        EpdData::RamYCounter.as_slice(),
    ),
    InitStep::WaitIdle,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lut_upload_carries_full_body() {
        let lut_payload = INIT_PROGRAM.iter().find_map(|step| match step {
            InitStep::Write(Command::WriteLut, payload) => Some(*payload),
            _ => None,
        });
        assert_eq!(lut_payload.map(<[u8]>::len), Some(LUT_BODY_LEN));
    }

    #[test]
    fn program_is_bracketed_by_idle_waits() {
        assert_eq!(INIT_PROGRAM[0], InitStep::WaitIdle);
        assert_eq!(INIT_PROGRAM[2], InitStep::WaitIdle);
        assert_eq!(INIT_PROGRAM.last(), Some(&InitStep::WaitIdle));
    }
}
