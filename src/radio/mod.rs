//! Ra-02 driver context
//!
//! [`Ra02`] owns the register interface and everything the transmit and receive sequences
//! need around it: a delay provider for the settle pauses after timing-sensitive writes, a
//! [`Timeout`] bounding the wait for TX_DONE, the [`Config`] applied by [`Ra02::init`], and the
//! last IRQ flags and RSSI sample observed.
//!
//! The operating mode is not cached. Every sequence writes the mode it needs
//! before relying on it, and [`Ra02::read_mode`] asks the chip.
//!
//! The operations are split by concern:
//! - this module: lifecycle, identification and accessors
//! - `mode`: operating mode transitions
//! - `params`: RF and modem parameters
//! - `rxtx`: IRQ polling and the transmit and receive sequences
//!
//! # Example
//! ```no_run
//! use embedded_hal::{delay::DelayNs, spi::SpiDevice};
//! use ra02::{Config, Error, Ra02, Timeout};
//!
//! fn ping<SPI, DELAY, TIMER>(spi: SPI, delay: DELAY, timer: TIMER) -> Result<(), Error<SPI::Error>>
//! where
//!     SPI: SpiDevice,
//!     DELAY: DelayNs,
//!     TIMER: Timeout,
//! {
//!     let mut radio = Ra02::new(spi, delay, timer, Config::default());
//!     radio.init()?;
//!     radio.send(b"ping")
//! }
//! ```

mod mode;
mod params;
mod rxtx;

pub use mode::Mode;
pub use params::{frequency_to_frf, ocp_trim, MAX_POWER_DB};

use embedded_hal::{delay::DelayNs, spi::SpiDevice};

use crate::{
    device::{Device, MAX_BURST_LEN},
    registers::{IrqFlags, ModemConfig2, OpMode, Version},
    Config, Error, Timeout,
};

/// Version byte reported by SX1276/77/78/79 silicon
pub const EXPECTED_VERSION: u8 = 0x12;

/// Largest payload [`Ra02::send`] accepts: one FIFO burst minus its address byte
pub const MAX_PACKET_SIZE: usize = MAX_BURST_LEN - 1;

/// Offset from the raw RSSI register to dBm on the low frequency port
pub const RSSI_OFFSET_LF: i16 = -164;

/// Driver for one Ra-02 module.
///
/// # Type Parameters
/// * `SPI` - SPI device the module is wired to. Pass `&mut` to a device to keep ownership.
/// * `DELAY` - Delay provider for register settle times
/// * `TIMER` - Timeout armed by [`send`](Ra02::send) while waiting for TX_DONE
pub struct Ra02<SPI, DELAY, TIMER> {
    device: Device<SPI>,
    delay: DELAY,
    timer: TIMER,
    config: Config,
    irq_flags: IrqFlags,
    last_rssi: u8,
}

impl<SPI, DELAY, TIMER> Ra02<SPI, DELAY, TIMER> {
    /// Creates a driver without touching the bus.
    ///
    /// Nothing but the accessors is meaningful until [`init`](Ra02::init) has succeeded.
    pub fn new(spi: SPI, delay: DELAY, timer: TIMER, config: Config) -> Self {
        Self {
            device: Device::new(spi),
            delay,
            timer,
            config,
            irq_flags: IrqFlags::empty(),
            last_rssi: 0,
        }
    }

    /// Tears the driver down and hands back its collaborators.
    ///
    /// The radio is left in whatever mode the last operation put it in; [`send`](Ra02::send)
    /// and [`recv`](Ra02::recv) always finish in SLEEP.
    pub fn deinit(self) -> (SPI, DELAY, TIMER) {
        debug!("deinit");
        (self.device.release(), self.delay, self.timer)
    }

    /// Configuration applied by [`init`](Ra02::init), updated by the parameter setters
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// IRQ flags seen by the most recent poll
    pub fn irq_flags(&self) -> IrqFlags {
        self.irq_flags
    }

    /// Raw RSSI sampled when the last valid header arrived
    pub fn last_rssi(&self) -> u8 {
        self.last_rssi
    }

    /// [`last_rssi`](Ra02::last_rssi) in dBm
    pub fn last_rssi_dbm(&self) -> i16 {
        RSSI_OFFSET_LF + i16::from(self.last_rssi)
    }

    /// Register interface, for diagnostics and registers the driver does not wrap
    pub fn device_mut(&mut self) -> &mut Device<SPI> {
        &mut self.device
    }
}

impl<SPI, DELAY, TIMER> Ra02<SPI, DELAY, TIMER>
where
    SPI: SpiDevice,
    DELAY: DelayNs,
    TIMER: Timeout,
{
    /// Brings the radio from power-up into LoRa STANDBY with the stored [`Config`].
    ///
    /// The version register is checked before anything is written, so a missing or
    /// miswired module is reported without side effects.
    ///
    /// # Errors
    /// * `Error::NoResponse` - the chip did not report [`EXPECTED_VERSION`]
    /// * `Error::InvalidArgument` - the configured power is outside 1-20
    /// * `Error::Bus` - SPI communication failed
    pub fn init(&mut self) -> Result<(), Error<SPI::Error>> {
        self.irq_flags = IrqFlags::empty();
        self.last_rssi = 0;

        self.reset()?;

        let version = self.version()?;
        if version != EXPECTED_VERSION {
            error!("init: unexpected version {}", version);
            return Err(Error::NoResponse);
        }

        // LongRangeMode only latches while the chip sleeps
        self.device.write_register(OpMode::default())?;
        self.set_mode(Mode::Sleep)?;

        let config = self.config;
        self.set_frequency(config.frequency_khz)?;
        self.set_power(config.power_db)?;
        self.set_ocp(config.ocp_ma)?;
        self.set_lna(config.lna)?;

        self.device.write_register(ModemConfig2 {
            spreading_factor: 0,
            tx_continuous: false,
            crc_on: false,
            symb_timeout_msb: 0,
        })?;
        self.set_implicit_header_mode(false)?;
        self.set_rx_symbol_timeout(config.rx_symbol_timeout)?;
        self.set_spreading_factor(config.spreading_factor)?;
        self.set_bandwidth(config.bandwidth_hz)?;
        self.set_preamble(config.preamble_len)?;

        self.set_mode(Mode::Standby)?;

        info!("init: version {} at {} kHz", version, config.frequency_khz);
        Ok(())
    }

    /// Hardware reset.
    ///
    /// The Ra-02 reset line is not driven by this crate, so this only logs. Power-cycle the
    /// module or drive NRESET yourself before [`init`](Ra02::init) if a clean state matters.
    pub fn reset(&mut self) -> Result<(), Error<SPI::Error>> {
        debug!("reset: no reset line, skipped");
        Ok(())
    }

    /// Reads the silicon version byte
    pub fn version(&mut self) -> Result<u8, Error<SPI::Error>> {
        let version: Version = self.device.read_register()?;
        Ok(version.value)
    }
}
