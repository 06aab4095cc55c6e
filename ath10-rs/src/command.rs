/// 7-bit bus address of the ATH10.
pub const ATH10_ADDRESS: u8 = 0x38;

/// Time the sensor needs after [`Command::Initialize`] to load its calibration, in milliseconds.
pub const SETTLE_TIME_MS: u32 = 250;

/// Minimum conversion time after [`Command::Measure`], in milliseconds.
pub const CONVERSION_TIME_MS: u32 = 150;

/// Length of the data frame returned after a measurement.
pub const FRAME_LEN: usize = 6;

const INITIALIZE: [u8; 3] = [0xe1, 0x08, 0x00];
const MEASURE: [u8; 3] = [0xac, 0x33, 0x00];
const RESET: [u8; 1] = [0xba];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Commands understood by the ATH10.
pub enum Command {
    /// Load the calibration coefficients and enter normal mode.
    Initialize,
    /// Start a temperature and humidity conversion.
    Measure,
    /// Soft reset.
    Reset,
}

impl Command {
    /// The bytes written to the bus for this command.
    pub const fn bytes(self) -> &'static [u8] {
        match self {
            Command::Initialize => &INITIALIZE,
            Command::Measure => &MEASURE,
            Command::Reset => &RESET,
        }
    }
}
