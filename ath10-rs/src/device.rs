use embedded_hal::delay::DelayNs;

use crate::{
    Error, Humidity, Measurement, RawFrame, Temperature,
    command::{ATH10_ADDRESS, CONVERSION_TIME_MS, Command, FRAME_LEN, SETTLE_TIME_MS},
    status::Status,
    transport::Transport,
};

#[derive(Debug, Default)]
/// Represents the ATH10 sensor.
///
/// The driver does not own the bus. Every operation borrows the bus (and the
/// delay provider where the sensor needs time) for its whole duration, so a
/// request, the conversion wait and the read cannot interleave with other
/// traffic issued through the same handle.
pub struct Ath10 {
    pub(crate) ready: bool,
}

impl Ath10 {
    /// Create a driver for a sensor that has not been initialized yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a driver and run [`Ath10::begin`].
    ///
    /// Unlike `begin`, a sensor that fails its self-check is reported as [`Error::NotReady`].
    pub fn init<T: Transport, D: DelayNs>(
        bus: &mut T,
        delay: &mut D,
    ) -> Result<Self, Error<T::Error>> {
        let mut dev = Self::new();
        if !dev.begin(bus, delay)? {
            return Err(Error::NotReady);
        }
        Ok(dev)
    }

    /// Get the address of the device.
    pub fn address(&self) -> u8 {
        ATH10_ADDRESS
    }

    /// Whether the last [`Ath10::begin`] found the sensor ready and no reset happened since.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Initialize the bus and the sensor.
    ///
    /// Sends the initialize command, waits 250 ms for the calibration data to
    /// load, then reads the status byte.
    ///
    /// # Returns:
    /// - `true` if the sensor is idle and calibrated, `false` otherwise. A
    ///   sensor that is not ready is not an error; call `begin` again to retry.
    pub fn begin<T: Transport, D: DelayNs>(
        &mut self,
        bus: &mut T,
        delay: &mut D,
    ) -> Result<bool, Error<T::Error>> {
        self.ready = false;
        bus.begin()?;
        self.send(bus, Command::Initialize)?;
        delay.delay_ms(SETTLE_TIME_MS);
        let status = self.read_status(bus)?;
        self.ready = status.is_ready();
        if self.ready {
            log::debug!("ATH10 0x{ATH10_ADDRESS:02x} ready, status {status:?}");
        } else {
            log::warn!(
                "ATH10 0x{ATH10_ADDRESS:02x} not ready after initialize, status 0x{:02x}",
                status.into_bits()
            );
        }
        Ok(self.ready)
    }

    /// Read the status byte.
    pub fn read_status<T: Transport>(&mut self, bus: &mut T) -> Result<Status, Error<T::Error>> {
        let mut buf = [0u8; 1];
        let received = bus.read(ATH10_ADDRESS, &mut buf)?;
        if received < buf.len() {
            return Err(Error::ShortFrame {
                expected: buf.len(),
                received,
            });
        }
        Ok(Status::from_bits(buf[0]))
    }

    /// Ask the sensor to start a conversion.
    ///
    /// The result is available after [`Ath10::wait_for_conversion`].
    pub fn request_measurement<T: Transport>(
        &mut self,
        bus: &mut T,
    ) -> Result<(), Error<T::Error>> {
        self.send(bus, Command::Measure)
    }

    /// Block for the minimum conversion time of 150 ms.
    pub fn wait_for_conversion<D: DelayNs>(&self, delay: &mut D) {
        delay.delay_ms(CONVERSION_TIME_MS);
    }

    /// Read the 6-byte data frame of a finished conversion.
    ///
    /// Fails with [`Error::ShortFrame`] if the bus delivers fewer than 6 bytes.
    pub fn read_frame<T: Transport>(&mut self, bus: &mut T) -> Result<RawFrame, Error<T::Error>> {
        let mut buf = [0u8; FRAME_LEN];
        let received = bus.read(ATH10_ADDRESS, &mut buf)?;
        if received < FRAME_LEN {
            log::debug!(
                "ATH10 0x{ATH10_ADDRESS:02x} short frame: {:02x?}",
                &buf[..received]
            );
            return Err(Error::ShortFrame {
                expected: FRAME_LEN,
                received,
            });
        }
        log::debug!("ATH10 0x{ATH10_ADDRESS:02x} frame: {buf:02x?}");
        Ok(RawFrame::new(buf))
    }

    /// Run a full conversion and read both temperature and humidity.
    pub fn measure<T: Transport, D: DelayNs>(
        &mut self,
        bus: &mut T,
        delay: &mut D,
    ) -> Result<Measurement, Error<T::Error>> {
        let frame = self.convert(bus, delay)?;
        let m = frame.measurement();
        log::debug!(
            "ATH10 0x{ATH10_ADDRESS:02x}: {:.2} C, {:.2} %RH",
            m.temperature,
            m.humidity
        );
        Ok(m)
    }

    /// Run a full conversion and read the temperature.
    ///
    /// The sensor always converts both quantities, so this costs as much as [`Ath10::measure`].
    pub fn read_temperature<T: Transport, D: DelayNs>(
        &mut self,
        bus: &mut T,
        delay: &mut D,
    ) -> Result<Temperature, Error<T::Error>> {
        Ok(self.convert(bus, delay)?.temperature())
    }

    /// Run a full conversion and read the humidity.
    ///
    /// The sensor always converts both quantities, so this costs as much as [`Ath10::measure`].
    pub fn read_humidity<T: Transport, D: DelayNs>(
        &mut self,
        bus: &mut T,
        delay: &mut D,
    ) -> Result<Humidity, Error<T::Error>> {
        Ok(self.convert(bus, delay)?.humidity())
    }

    /// Perform a soft reset of the ATH10 sensor.
    ///
    /// The sensor is not checked afterwards; call [`Ath10::begin`] before measuring again.
    pub fn reset<T: Transport>(&mut self, bus: &mut T) -> Result<(), Error<T::Error>> {
        self.ready = false;
        self.send(bus, Command::Reset)
    }

    fn convert<T: Transport, D: DelayNs>(
        &mut self,
        bus: &mut T,
        delay: &mut D,
    ) -> Result<RawFrame, Error<T::Error>> {
        self.request_measurement(bus)?;
        self.wait_for_conversion(delay);
        self.read_frame(bus)
    }

    fn send<T: Transport>(&mut self, bus: &mut T, cmd: Command) -> Result<(), Error<T::Error>> {
        log::debug!("ATH10 0x{ATH10_ADDRESS:02x} <- {cmd:?} {:02x?}", cmd.bytes());
        bus.write(ATH10_ADDRESS, cmd.bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::{
        delay::{CheckedDelay, Transaction as DelayTransaction},
        i2c::{Mock as I2cMock, Transaction},
    };

    use super::Ath10;
    use crate::{ATH10_ADDRESS, Error, transport::Transport};

    const FRAME: [u8; 6] = [0x1c, 0x19, 0x99, 0x99, 0x5a, 0x00];

    /// Hands out at most `available` bytes per read and records everything written.
    struct ShortBus {
        available: usize,
        fill: u8,
        written: Vec<Vec<u8>>,
        reads: usize,
    }

    impl ShortBus {
        fn new(available: usize) -> Self {
            Self {
                available,
                fill: 0xaa,
                written: Vec::new(),
                reads: 0,
            }
        }
    }

    impl Transport for ShortBus {
        type Error = ();

        fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), ()> {
            assert_eq!(address, ATH10_ADDRESS);
            self.written.push(bytes.to_vec());
            Ok(())
        }

        fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<usize, ()> {
            assert_eq!(address, ATH10_ADDRESS);
            self.reads += 1;
            let n = self.available.min(buf.len());
            buf[..n].fill(self.fill);
            Ok(n)
        }
    }

    fn settle() -> CheckedDelay {
        CheckedDelay::new(&[DelayTransaction::delay_ms(250)])
    }

    fn conversions(n: usize) -> CheckedDelay {
        CheckedDelay::new(&vec![DelayTransaction::delay_ms(150); n])
    }

    fn begin_with_status(status: u8) -> (bool, Ath10) {
        let expectations = [
            Transaction::write(ATH10_ADDRESS, vec![0xe1, 0x08, 0x00]),
            Transaction::read(ATH10_ADDRESS, vec![status]),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut delay = settle();
        let mut dev = Ath10::new();
        let ready = dev.begin(&mut i2c, &mut delay).unwrap();
        delay.done();
        i2c.done();
        (ready, dev)
    }

    #[test]
    fn begin_ready() {
        let (ready, dev) = begin_with_status(0x18);
        assert!(ready);
        assert!(dev.is_ready());
    }

    #[test]
    fn begin_not_ready() {
        for status in [0x60, 0x6f] {
            let (ready, dev) = begin_with_status(status);
            assert!(!ready);
            assert!(!dev.is_ready());
        }
    }

    #[test]
    fn failed_begin_clears_ready() {
        let expectations = [
            Transaction::write(ATH10_ADDRESS, vec![0xe1, 0x08, 0x00]),
            Transaction::read(ATH10_ADDRESS, vec![0x18]),
            Transaction::write(ATH10_ADDRESS, vec![0xe1, 0x08, 0x00]),
            Transaction::read(ATH10_ADDRESS, vec![0x00]).with_error(ErrorKind::Other),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut delay = CheckedDelay::new(&[
            DelayTransaction::delay_ms(250),
            DelayTransaction::delay_ms(250),
        ]);
        let mut dev = Ath10::new();
        assert!(dev.begin(&mut i2c, &mut delay).unwrap());
        assert!(dev.is_ready());
        let res = dev.begin(&mut i2c, &mut delay);
        assert!(matches!(res, Err(Error::Bus(ErrorKind::Other))));
        assert!(!dev.is_ready());
        delay.done();
        i2c.done();
    }

    #[test]
    fn failed_initialize_write_clears_ready() {
        let (_, mut dev) = begin_with_status(0x18);
        let expectations = [Transaction::write(ATH10_ADDRESS, vec![0xe1, 0x08, 0x00])
            .with_error(ErrorKind::Other)];
        let mut i2c = I2cMock::new(&expectations);
        let mut delay = CheckedDelay::new(&[]);
        assert!(dev.begin(&mut i2c, &mut delay).is_err());
        assert!(!dev.is_ready());
        delay.done();
        i2c.done();
    }

    #[test]
    fn init_reports_not_ready() {
        let expectations = [
            Transaction::write(ATH10_ADDRESS, vec![0xe1, 0x08, 0x00]),
            Transaction::read(ATH10_ADDRESS, vec![0x68]),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut delay = settle();
        let res = Ath10::init(&mut i2c, &mut delay);
        assert!(matches!(res, Err(Error::NotReady)));
        delay.done();
        i2c.done();
    }

    #[test]
    fn measure_sequence() {
        let expectations = [
            Transaction::write(ATH10_ADDRESS, vec![0xac, 0x33, 0x00]),
            Transaction::read(ATH10_ADDRESS, FRAME.to_vec()),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut delay = conversions(1);
        let m = Ath10::new().measure(&mut i2c, &mut delay).unwrap();
        assert!((m.humidity - 10.0).abs() < 0.01);
        assert!((m.temperature - 66.89).abs() < 0.01);
        delay.done();
        i2c.done();
    }

    #[test]
    fn single_quantity_wrappers_run_full_cycle() {
        let expectations = [
            Transaction::write(ATH10_ADDRESS, vec![0xac, 0x33, 0x00]),
            Transaction::read(ATH10_ADDRESS, FRAME.to_vec()),
            Transaction::write(ATH10_ADDRESS, vec![0xac, 0x33, 0x00]),
            Transaction::read(ATH10_ADDRESS, FRAME.to_vec()),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut delay = conversions(2);
        let mut dev = Ath10::new();
        let t = dev.read_temperature(&mut i2c, &mut delay).unwrap();
        let h = dev.read_humidity(&mut i2c, &mut delay).unwrap();
        assert_eq!(t.raw(), 0x95a00);
        assert_eq!(h.raw(), 0x19999);
        delay.done();
        i2c.done();
    }

    #[test]
    fn reset_sends_single_byte() {
        let (_, mut dev) = begin_with_status(0x18);
        let expectations = [Transaction::write(ATH10_ADDRESS, vec![0xba])];
        let mut i2c = I2cMock::new(&expectations);
        dev.reset(&mut i2c).unwrap();
        assert!(!dev.is_ready());
        i2c.done();
    }

    #[test]
    fn short_data_frame() {
        for available in 0..6 {
            let mut bus = ShortBus::new(available);
            let mut delay = conversions(1);
            let res = Ath10::new().measure(&mut bus, &mut delay);
            match res {
                Err(Error::ShortFrame { expected, received }) => {
                    assert_eq!(expected, 6);
                    assert_eq!(received, available);
                }
                other => panic!("expected short frame, got {other:?}"),
            }
            assert_eq!(bus.written, [vec![0xac, 0x33, 0x00]]);
            delay.done();
        }
    }

    #[test]
    fn full_frame_from_custom_transport() {
        let mut bus = ShortBus::new(6);
        let frame = Ath10::new().read_frame(&mut bus).unwrap();
        assert_eq!(frame.as_bytes(), &[0xaa; 6]);
        assert_eq!(bus.reads, 1);
    }

    #[test]
    fn short_status_read() {
        let mut bus = ShortBus::new(0);
        let mut delay = settle();
        let mut dev = Ath10::new();
        let res = dev.begin(&mut bus, &mut delay);
        assert!(matches!(
            res,
            Err(Error::ShortFrame {
                expected: 1,
                received: 0
            })
        ));
        assert!(!dev.is_ready());
        assert_eq!(bus.written, [vec![0xe1, 0x08, 0x00]]);
        delay.done();
    }

    #[test]
    fn bus_error_propagates() {
        let expectations =
            [Transaction::write(ATH10_ADDRESS, vec![0xac, 0x33, 0x00]).with_error(ErrorKind::Other)];
        let mut i2c = I2cMock::new(&expectations);
        let mut delay = CheckedDelay::new(&[]);
        let res = Ath10::new().measure(&mut i2c, &mut delay);
        assert!(matches!(res, Err(Error::Bus(ErrorKind::Other))));
        delay.done();
        i2c.done();
    }
}
