//! Controller opcodes and the fixed register payloads sent with them.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    DriverOutputControl = 0x01,
    GateDrivingVoltage = 0x03,
    SourceDrivingVoltage = 0x04,
    DeepSleep = 0x10,
    DataEntryMode = 0x11,
    SoftwareReset = 0x12,
    ActivateDisplayUpdate = 0x20,
    DisplayUpdateControl = 0x22,
    WriteRam = 0x24,
    WriteVcom = 0x2C,
    WriteLut = 0x32,
    DummyLinePeriod = 0x3A,
    GateLineWidth = 0x3B,
    BorderWaveform = 0x3C,
    SetRamXAddress = 0x44,
    SetRamYAddress = 0x45,
    SetRamXAddressCounter = 0x4E,
    SetRamYAddressCounter = 0x4F,
    AnalogBlockControl = 0x74,
    DigitalBlockControl = 0x7E,
}

impl Command {
    #[must_use]
    pub const fn opcode(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy)]
pub enum EpdData {
    AnalogBlockControl,
    DigitalBlockControl,
    /// 0xF9 + 1 = 250 gate lines.
    DriverOutputControl,
    /// X increments, Y decrements.
    DataEntryMode,
    /// Bytes 0x00..=0x0F, (15 + 1) * 8 = 128 source columns.
    RamX,
    /// Lines 0xF9 down to 0x00.
    RamY,
    BorderWaveform,
    Vcom,
    RamXCounter,
    RamYCounter,
    FullUpdate,
    DeepSleep,
}

impl EpdData {
    pub(crate) const fn as_slice(self) -> &'static [u8] {
        match self {
            EpdData::AnalogBlockControl => &[0x54],
            EpdData::DigitalBlockControl => &[0x3B],
            EpdData::DriverOutputControl => &[0xF9, 0x00, 0x00],
            EpdData::DataEntryMode => &[0x01],
            EpdData::RamX => &[0x00, 0x0F],
            EpdData::RamY => &[0xF9, 0x00, 0x00, 0x00],
            EpdData::BorderWaveform => &[0x03],
            EpdData::Vcom => &[0x55],
            EpdData::RamXCounter => &[0x00],
            EpdData::RamYCounter => &[0xF9, 0x00],
            EpdData::FullUpdate => &[0xC7],
            EpdData::DeepSleep => &[0x03],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcodes_match_register_map() {
        assert_eq!(Command::DeepSleep.opcode(), 0x10);
        assert_eq!(Command::WriteRam.opcode(), 0x24);
        assert_eq!(Command::WriteLut.opcode(), 0x32);
        assert_eq!(Command::SetRamYAddressCounter.opcode(), 0x4F);
        assert_eq!(Command::DigitalBlockControl.opcode(), 0x7E);
    }

    #[test]
    fn ram_window_spans_panel() {
        let [x_start, x_end] = EpdData::RamX.as_slice() else {
            panic!("RAM X window takes two bytes");
        };
        assert_eq!(usize::from(x_end - x_start + 1), crate::common::ROW_BYTES);
        assert_eq!(
            u32::from(EpdData::RamY.as_slice()[0]) + 1,
            crate::common::HEIGHT
        );
    }
}
