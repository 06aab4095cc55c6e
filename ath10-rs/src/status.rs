use bitfield_struct::bitfield;

/// Status bits that must be clear for the sensor to be idle in normal mode.
pub(crate) const READY_MASK: u8 = 0x60;

#[bitfield(u8)]
#[derive(PartialEq, Eq)]
/// The status byte reported by the ATH10.
pub struct Status {
    #[bits(3)]
    __: u8,
    /// Calibration coefficients are loaded.
    pub calibrated: bool,
    #[bits(1)]
    __: u8,
    /// Operating mode; any non-normal mode fails the readiness check.
    #[bits(2, default = WorkMode::Normal)]
    pub mode: WorkMode,
    /// A conversion is in progress.
    pub busy: bool,
}

impl Status {
    /// Whether the sensor finished its self-check and sits idle in normal mode.
    ///
    /// Only the mode bits (`0x60`) take part in the check.
    pub fn is_ready(&self) -> bool {
        self.into_bits() & READY_MASK == 0
    }
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Operating mode reported in the status byte.
pub enum WorkMode {
    #[default]
    /// Normal mode, one conversion per measure command.
    Normal = 0b00,
    /// Cyclic conversion mode.
    Cycle = 0b01,
    /// Command mode.
    Command = 0b10,
}

impl WorkMode {
    pub(crate) const fn from_bits(bits: u8) -> Self {
        match bits {
            0b00 => WorkMode::Normal,
            0b01 => WorkMode::Cycle,
            _ => WorkMode::Command,
        }
    }

    pub(crate) const fn into_bits(self) -> u8 {
        self as u8
    }
}
