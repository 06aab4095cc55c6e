#[derive(Debug)]
/// Represents errors that can occur while interacting with the ATH10 sensor.
pub enum Error<E> {
    /// An error occurred while communicating over the bus.
    Bus(E),
    /// The bus returned fewer bytes than the transaction requires.
    ShortFrame {
        /// Number of bytes the transaction requires.
        expected: usize,
        /// Number of bytes actually received.
        received: usize,
    },
    /// The sensor did not report idle and calibrated after initialization.
    NotReady,
}

impl<E> From<E> for Error<E> {
    fn from(e: E) -> Self {
        Error::Bus(e)
    }
}
