//! Full-refresh waveform table.
//!
//! The controller takes the table in two parts: a 70 byte voltage/phase body
//! uploaded through `WriteLut`, and six trailing timing bytes that each go to
//! their own register during initialization.

pub const LUT_BODY_LEN: usize = 70;
pub const LUT_TIMING_LEN: usize = 6;
pub const LUT_LEN: usize = LUT_BODY_LEN + LUT_TIMING_LEN;

/// The trailing bytes of the table, at offsets 70..76.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingParameters {
    /// Offset 70, register 0x03.
    pub gate_driving_voltage: u8,
    /// Offsets 71..74, register 0x04.
    pub source_driving_voltage: [u8; 3],
    /// Offset 74, register 0x3A.
    pub dummy_line_period: u8,
    /// Offset 75, register 0x3B.
    pub gate_line_width: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveformTable {
    pub body: [u8; LUT_BODY_LEN],
    pub timing: TimingParameters,
}

impl WaveformTable {
    /// Byte at `offset` in the flat on-wire layout, body first.
    #[must_use]
    pub fn byte(&self, offset: usize) -> Option<u8> {
        match offset {
            0..LUT_BODY_LEN => Some(self.body[offset]),
            70 => Some(self.timing.gate_driving_voltage),
            71..=73 => Some(self.timing.source_driving_voltage[offset - 71]),
            74 => Some(self.timing.dummy_line_period),
            75 => Some(self.timing.gate_line_width),
            _ => None,
        }
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; LUT_LEN] {
        let mut bytes = [0; LUT_LEN];
        bytes[..LUT_BODY_LEN].copy_from_slice(&self.body);
        bytes[LUT_BODY_LEN] = self.timing.gate_driving_voltage;
        bytes[71..74].copy_from_slice(&self.timing.source_driving_voltage);
        bytes[74] = self.timing.dummy_line_period;
        bytes[75] = self.timing.gate_line_width;
        bytes
    }
}

#[rustfmt::skip]
pub const FULL_UPDATE: WaveformTable = WaveformTable {
    body: [
        // Voltage selection, one row per transition group
        0x80, 0x60, 0x40, 0x00, 0x00, 0x00, 0x00,
        0x10, 0x60, 0x20, 0x00, 0x00, 0x00, 0x00,
        0x80, 0x60, 0x40, 0x00, 0x00, 0x00, 0x00,
        0x10, 0x60, 0x20, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        // Phase lengths and repeat counts
        0x03, 0x03, 0x00, 0x00, 0x02,
        0x09, 0x09, 0x00, 0x00, 0x02,
        0x03, 0x03, 0x00, 0x00, 0x02,
        0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00,
    ],
    timing: TimingParameters {
        gate_driving_voltage: 0x15,
        source_driving_voltage: [0x41, 0xA8, 0x32],
        dummy_line_period: 0x30,
        gate_line_width: 0x0A,
    },
};
