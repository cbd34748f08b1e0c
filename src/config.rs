//! Initial radio configuration applied by [`Ra02::init`](crate::Ra02::init)

use crate::registers::{CodingRate, Lna};

/// Default time to wait for TX_DONE after a transmission was started
pub const DEFAULT_SEND_TIMEOUT_MS: u32 = 500;

/// Parameters written to the radio during initialization.
///
/// Every value can also be changed later through the matching `set_*` method on
/// [`Ra02`](crate::Ra02); the configuration itself is only read by `init`, except for
/// [`send_timeout_ms`](Config::send_timeout_ms) which bounds every `send`.
///
/// # Example
/// ```
/// use ra02::Config;
///
/// let config = Config::default()
///     .with_frequency_khz(434_000)
///     .with_power_db(14)
///     .with_spreading_factor(9);
/// assert_eq!(config.bandwidth_hz, 125_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Carrier frequency in kHz
    pub frequency_khz: u32,
    /// Output power, 1-20
    pub power_db: u8,
    /// Over-current protection limit in mA
    pub ocp_ma: u16,
    /// LNA gain and boost
    pub lna: Lna,
    /// Signal bandwidth in Hz
    pub bandwidth_hz: u32,
    /// Error coding rate written together with the bandwidth
    pub coding_rate: CodingRate,
    /// Preamble length in symbols
    pub preamble_len: u16,
    /// Spreading factor, clamped to 6-12
    pub spreading_factor: u8,
    /// RX single timeout in symbols, 10 bits
    pub rx_symbol_timeout: u16,
    /// Upper bound on the wait for TX_DONE in [`send`](crate::Ra02::send)
    pub send_timeout_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frequency_khz: 433_000,
            power_db: 17,
            ocp_ma: 120,
            lna: Lna::default(),
            bandwidth_hz: 125_000,
            coding_rate: CodingRate::Cr4_7,
            preamble_len: 10,
            spreading_factor: 6,
            rx_symbol_timeout: 0x2FF,
            send_timeout_ms: DEFAULT_SEND_TIMEOUT_MS,
        }
    }
}

impl Config {
    /// Sets the carrier frequency in kHz
    pub fn with_frequency_khz(mut self, khz: u32) -> Self {
        self.frequency_khz = khz;
        self
    }

    /// Sets the output power
    pub fn with_power_db(mut self, db: u8) -> Self {
        self.power_db = db;
        self
    }

    /// Sets the over-current protection limit
    pub fn with_ocp_ma(mut self, ma: u16) -> Self {
        self.ocp_ma = ma;
        self
    }

    /// Sets the LNA configuration
    pub fn with_lna(mut self, lna: Lna) -> Self {
        self.lna = lna;
        self
    }

    /// Sets the signal bandwidth in Hz
    pub fn with_bandwidth_hz(mut self, hz: u32) -> Self {
        self.bandwidth_hz = hz;
        self
    }

    /// Sets the error coding rate
    pub fn with_coding_rate(mut self, coding_rate: CodingRate) -> Self {
        self.coding_rate = coding_rate;
        self
    }

    /// Sets the preamble length
    pub fn with_preamble_len(mut self, len: u16) -> Self {
        self.preamble_len = len;
        self
    }

    /// Sets the spreading factor
    pub fn with_spreading_factor(mut self, sf: u8) -> Self {
        self.spreading_factor = sf;
        self
    }

    /// Sets the RX single timeout in symbols
    pub fn with_rx_symbol_timeout(mut self, symbols: u16) -> Self {
        self.rx_symbol_timeout = symbols;
        self
    }

    /// Sets the TX_DONE wait bound
    pub fn with_send_timeout_ms(mut self, ms: u32) -> Self {
        self.send_timeout_ms = ms;
        self
    }
}
